//! Profile & collection store
//!
//! Holds the skin profile, routines, progress entries and wishlist in
//! memory and mirrors them to key-value storage. Operations apply to memory
//! immediately; the full state is then queued for the background writer.
//!
//! Nothing is written until `load` has finished, so defaults never
//! overwrite persisted data that hasn't been read yet.

use crate::config::{SLOT_PROGRESS_ENTRIES, SLOT_ROUTINES, SLOT_USER_PROFILE, SLOT_WISHLIST};
use crate::models::{
    AppSnapshot, ProfilePatch, ProgressEntry, Routine, RoutinePatch, RoutineType,
    UserSkinProfile, WishlistItem,
};
use crate::services::persistence::PersistenceWriter;
use crate::services::quiz::QuizAnswers;
use crate::storage::{codec, KeyValueStorage};
use serde::de::DeserializeOwned;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Outcome of reading the persisted slots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Slots whose stored value replaced the in-memory default
    pub restored: Vec<&'static str>,
    /// Slots never written before
    pub missing: Vec<&'static str>,
    /// Slots that could not be read or decoded; defaults were kept
    pub failed: Vec<&'static str>,
}

#[derive(Default)]
struct StoreState {
    data: AppSnapshot,
    load_started: bool,
    loaded: bool,
    /// Changed before load completed, so a save is owed once it does
    dirty_before_load: bool,
}

struct StoreInner {
    state: RwLock<StoreState>,
    storage: Arc<dyn KeyValueStorage>,
    writer: PersistenceWriter,
}

/// Service owning the user's local data
#[derive(Clone)]
pub struct ProfileStore {
    inner: Arc<StoreInner>,
}

enum SlotRead<T> {
    Restored(T),
    Missing,
    Failed,
}

impl ProfileStore {
    /// Create an empty store and start its writer.
    /// Must be called inside a tokio runtime.
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        let writer = PersistenceWriter::start(storage.clone());

        Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(StoreState::default()),
                storage,
                writer,
            }),
        }
    }

    /// Read all slots from storage.
    ///
    /// Each slot is independent: a missing or unreadable slot keeps its
    /// in-memory value and the rest still load. Errors are logged, never
    /// returned. Only the first call does anything.
    pub async fn load(&self) -> LoadReport {
        {
            let mut state = self.write_state();
            if state.load_started {
                tracing::warn!("Store load requested more than once; ignoring");
                return LoadReport::default();
            }
            state.load_started = true;
        }

        tracing::info!("Loading stored profile and collections");

        let storage = self.inner.storage.as_ref();
        let profile = read_slot::<UserSkinProfile>(storage, SLOT_USER_PROFILE).await;
        let routines = read_slot::<Vec<Routine>>(storage, SLOT_ROUTINES).await;
        let progress = read_slot::<Vec<ProgressEntry>>(storage, SLOT_PROGRESS_ENTRIES).await;
        let wishlist = read_slot::<Vec<WishlistItem>>(storage, SLOT_WISHLIST).await;

        let mut report = LoadReport::default();
        let mut state = self.write_state();

        if let Some(value) = record(&mut report, SLOT_USER_PROFILE, profile) {
            state.data.user_profile = value;
        }
        if let Some(value) = record(&mut report, SLOT_ROUTINES, routines) {
            state.data.routines = value;
        }
        if let Some(value) = record(&mut report, SLOT_PROGRESS_ENTRIES, progress) {
            state.data.progress_entries = value;
        }
        if let Some(value) = record(&mut report, SLOT_WISHLIST, wishlist) {
            state.data.wishlist = value;
        }

        state.loaded = true;

        if state.dirty_before_load {
            tracing::debug!("Saving changes made before load completed");
            state.dirty_before_load = false;
            self.schedule_save(&state);
        }

        tracing::info!(
            "Store loaded: {} restored, {} missing, {} failed",
            report.restored.len(),
            report.missing.len(),
            report.failed.len()
        );

        report
    }

    // ===== Reads =====

    pub fn is_loaded(&self) -> bool {
        self.read_state().loaded
    }

    /// Copy of the whole aggregate
    pub fn snapshot(&self) -> AppSnapshot {
        self.read_state().data.clone()
    }

    pub fn user_profile(&self) -> UserSkinProfile {
        self.read_state().data.user_profile.clone()
    }

    pub fn routines(&self) -> Vec<Routine> {
        self.read_state().data.routines.clone()
    }

    pub fn routines_of_type(&self, routine_type: RoutineType) -> Vec<Routine> {
        self.read_state()
            .data
            .routines
            .iter()
            .filter(|r| r.routine_type == routine_type)
            .cloned()
            .collect()
    }

    /// First routine with the given id
    pub fn routine(&self, id: &str) -> Option<Routine> {
        self.read_state()
            .data
            .routines
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    pub fn progress_entries(&self) -> Vec<ProgressEntry> {
        self.read_state().data.progress_entries.clone()
    }

    pub fn wishlist(&self) -> Vec<WishlistItem> {
        self.read_state().data.wishlist.clone()
    }

    pub fn is_in_wishlist(&self, product_id: &str) -> bool {
        self.read_state()
            .data
            .wishlist
            .iter()
            .any(|i| i.id == product_id)
    }

    // ===== Profile =====

    /// Merge the given fields into the profile; absent fields are kept
    pub fn update_user_profile(&self, patch: ProfilePatch) {
        self.mutate("update_user_profile", |data| {
            data.user_profile.apply(patch);
            ((), true)
        })
    }

    /// Record quiz results and mark the profile completed
    pub fn submit_quiz(&self, answers: QuizAnswers) {
        tracing::info!("Skin quiz submitted");
        self.update_user_profile(answers.into_patch());
    }

    // ===== Routines =====

    /// Append a routine. The caller supplies a unique id.
    pub fn add_routine(&self, routine: Routine) {
        self.mutate("add_routine", |data| {
            data.routines.push(routine);
            ((), true)
        })
    }

    /// Merge into the first routine with `id`. Returns false if none matched.
    pub fn update_routine(&self, id: &str, patch: RoutinePatch) -> bool {
        self.mutate("update_routine", |data| {
            match data.routines.iter_mut().find(|r| r.id == id) {
                Some(routine) => {
                    routine.apply(patch);
                    (true, true)
                }
                None => (false, false),
            }
        })
    }

    /// Remove every routine with `id`. Returns false if none matched.
    pub fn delete_routine(&self, id: &str) -> bool {
        self.mutate("delete_routine", |data| {
            let before = data.routines.len();
            data.routines.retain(|r| r.id != id);
            let removed = data.routines.len() != before;
            (removed, removed)
        })
    }

    /// Flip a step's completion in the first routine with `routine_id`
    pub fn toggle_step_completion(&self, routine_id: &str, step_id: &str) -> bool {
        self.mutate("toggle_step_completion", |data| {
            let toggled = data
                .routines
                .iter_mut()
                .find(|r| r.id == routine_id)
                .map(|r| r.toggle_step(step_id))
                .unwrap_or(false);
            (toggled, toggled)
        })
    }

    // ===== Progress =====

    pub fn add_progress_entry(&self, entry: ProgressEntry) {
        self.mutate("add_progress_entry", |data| {
            data.progress_entries.push(entry);
            ((), true)
        })
    }

    pub fn delete_progress_entry(&self, id: &str) -> bool {
        self.mutate("delete_progress_entry", |data| {
            let before = data.progress_entries.len();
            data.progress_entries.retain(|e| e.id != id);
            let removed = data.progress_entries.len() != before;
            (removed, removed)
        })
    }

    // ===== Wishlist =====

    /// Add unless an item with the same id is already present or its
    /// price is not a finite number. Returns whether the item was added.
    pub fn add_to_wishlist(&self, item: WishlistItem) -> bool {
        if !item.has_valid_price() {
            tracing::warn!("Rejected wishlist item {} with price {}", item.id, item.price);
            return false;
        }
        self.mutate("add_to_wishlist", |data| {
            if data.wishlist.iter().any(|i| i.id == item.id) {
                return (false, false);
            }
            data.wishlist.push(item);
            (true, true)
        })
    }

    pub fn remove_from_wishlist(&self, id: &str) -> bool {
        self.mutate("remove_from_wishlist", |data| {
            let before = data.wishlist.len();
            data.wishlist.retain(|i| i.id != id);
            let removed = data.wishlist.len() != before;
            (removed, removed)
        })
    }

    /// Remove the item if present, add it otherwise (unless its price is
    /// not finite). Returns whether it is in the wishlist afterwards.
    pub fn toggle_wishlist(&self, item: WishlistItem) -> bool {
        self.mutate("toggle_wishlist", |data| {
            let before = data.wishlist.len();
            data.wishlist.retain(|i| i.id != item.id);
            if data.wishlist.len() != before {
                return (false, true);
            }
            if !item.has_valid_price() {
                tracing::warn!("Rejected wishlist item {} with price {}", item.id, item.price);
                return (false, false);
            }
            data.wishlist.push(item);
            (true, true)
        })
    }

    // ===== Lifecycle =====

    /// Wait for every save scheduled so far to reach storage
    pub async fn flush(&self) {
        self.inner.writer.flush().await;
    }

    /// Flush pending saves and stop the writer. Later changes stay in memory only.
    pub async fn shutdown(&self) {
        tracing::info!("Shutting down store");
        self.inner.writer.shutdown().await;
    }

    // ===== Internals =====

    /// Apply `f` under the write lock. `f` returns its result and whether
    /// it changed anything; changes are saved once the store has loaded.
    fn mutate<R>(&self, op: &str, f: impl FnOnce(&mut AppSnapshot) -> (R, bool)) -> R {
        let mut state = self.write_state();
        let (result, changed) = f(&mut state.data);

        if !changed {
            tracing::debug!("{}: no matching entry, nothing changed", op);
            return result;
        }

        tracing::debug!("{}: state changed", op);

        if state.loaded {
            self.schedule_save(&state);
        } else {
            state.dirty_before_load = true;
        }

        result
    }

    /// Queue a save while the state lock is held, so queue order matches
    /// mutation order
    fn schedule_save(&self, state: &StoreState) {
        if !self.inner.writer.schedule(state.data.clone()) {
            tracing::warn!("Store writer is stopped; change kept in memory only");
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, StoreState> {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

async fn read_slot<T: DeserializeOwned>(storage: &dyn KeyValueStorage, key: &'static str) -> SlotRead<T> {
    let text = match storage.get(key).await {
        Ok(Some(text)) => text,
        Ok(None) => return SlotRead::Missing,
        Err(e) => {
            tracing::error!("Error reading slot {}: {}", key, e);
            return SlotRead::Failed;
        }
    };

    match codec::decode(key, &text) {
        Ok(value) => SlotRead::Restored(value),
        Err(e) => {
            tracing::error!("Error decoding slot {}, keeping default: {}", key, e);
            SlotRead::Failed
        }
    }
}

fn record<T>(report: &mut LoadReport, key: &'static str, read: SlotRead<T>) -> Option<T> {
    match read {
        SlotRead::Restored(value) => {
            report.restored.push(key);
            Some(value)
        }
        SlotRead::Missing => {
            report.missing.push(key);
            None
        }
        SlotRead::Failed => {
            report.failed.push(key);
            None
        }
    }
}
