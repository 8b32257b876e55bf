//! Integration tests for skincare core
//!
//! These tests verify end-to-end behavior against real backends:
//! - Full state round-trip through SQLite and slot files
//! - Legacy unversioned payloads
//! - Per-slot failure isolation on load

use skincare_core::config::{SLOT_PROGRESS_ENTRIES, SLOT_ROUTINES, SLOT_USER_PROFILE, SLOT_WISHLIST};
use skincare_core::models::{
    AppSnapshot, ProfilePatch, ProgressEntry, Routine, RoutinePatch, RoutineType, WishlistItem,
};
use skincare_core::services::{ProfileStore, QuizAnswers};
use skincare_core::storage::{FileStorage, KeyValueStorage, MemoryStorage, SqliteStorage};
use std::sync::Arc;
use tempfile::TempDir;

/// Helper to open a SQLite-backed store in a temp directory
async fn open_sqlite_store(temp: &TempDir) -> ProfileStore {
    let storage = SqliteStorage::open(&temp.path().join("skincare.db"))
        .await
        .unwrap();
    let store = ProfileStore::new(Arc::new(storage));
    store.load().await;
    store
}

/// Fill a store with one of everything
fn populate(store: &ProfileStore) {
    store.submit_quiz(QuizAnswers {
        skin_type: Some("combination".to_string()),
        concerns: vec!["hyperpigmentation".to_string(), "dullness".to_string()],
        sensitivity: Some("moderately-sensitive".to_string()),
    });

    let mut morning = Routine::from_template(RoutineType::Morning);
    morning.steps[0].product_name = Some("Gel Cleanser".to_string());
    let morning_id = morning.id.clone();
    let first_step = morning.steps[0].id.clone();
    store.add_routine(morning);
    store.toggle_step_completion(&morning_id, &first_step);

    store.add_routine(Routine::from_template(RoutineType::Evening));

    store.add_progress_entry(ProgressEntry {
        id: "progress-1".to_string(),
        date: "2025-03-01".to_string(),
        image_uri: "file:///photos/1.jpg".to_string(),
        notes: "Less redness".to_string(),
        concerns: vec!["Redness".to_string()],
    });

    store.add_to_wishlist(WishlistItem {
        id: "p3".to_string(),
        name: "Vitamin C Serum".to_string(),
        price: 24.99,
        image_url: "https://img.example/p3.jpg".to_string(),
        added_date: "2025-03-02T10:00:00+00:00".to_string(),
    });
}

#[tokio::test]
async fn test_sqlite_round_trip() {
    let temp = TempDir::new().unwrap();

    let expected: AppSnapshot = {
        let store = open_sqlite_store(&temp).await;
        populate(&store);
        store.shutdown().await;
        store.snapshot()
    };

    let reopened = open_sqlite_store(&temp).await;

    assert_eq!(reopened.snapshot(), expected);
    assert!(reopened.user_profile().is_completed());
    assert_eq!(
        reopened.user_profile().concerns,
        Some(vec!["Hyperpigmentation".to_string(), "Dullness".to_string()])
    );
    reopened.shutdown().await;
}

#[tokio::test]
async fn test_file_round_trip() {
    let temp = TempDir::new().unwrap();
    let files = FileStorage::new(temp.path().join("slots"));
    files.initialize().await.unwrap();

    let store = ProfileStore::new(Arc::new(files.clone()));
    store.load().await;
    populate(&store);
    store.shutdown().await;

    let reopened = ProfileStore::new(Arc::new(files));
    let report = reopened.load().await;

    assert_eq!(report.restored.len(), 4);
    assert_eq!(reopened.snapshot(), store.snapshot());
}

#[tokio::test]
async fn test_routine_edit_flow() {
    let temp = TempDir::new().unwrap();
    let store = open_sqlite_store(&temp).await;

    let routine = Routine::from_template(RoutineType::Evening);
    let id = routine.id.clone();
    store.add_routine(routine);

    // Editing replaces the step list wholesale
    let mut edited = store.routine(&id).unwrap();
    edited.steps.retain(|s| s.step_type != "ampoule");
    edited.name = "Night Repair".to_string();
    assert!(store.update_routine(
        &id,
        RoutinePatch {
            name: Some(edited.name.clone()),
            steps: Some(edited.steps.clone()),
            ..Default::default()
        },
    ));
    store.shutdown().await;

    let reopened = open_sqlite_store(&temp).await;
    let saved = reopened.routine(&id).unwrap();
    assert_eq!(saved.name, "Night Repair");
    assert_eq!(saved.steps.len(), 7);
    assert!(saved.steps.iter().all(|s| s.step_type != "ampoule"));
    reopened.shutdown().await;
}

#[tokio::test]
async fn test_legacy_payloads_load() {
    let storage = MemoryStorage::with_slots([
        (
            SLOT_USER_PROFILE,
            r#"{"skinType":"Oily","concerns":["Acne"],"sensitivity":"Not Sensitive","completed":true}"#,
        ),
        (
            SLOT_ROUTINES,
            r#"[{"id":"routine-1700000000000","name":"My Morning Routine","type":"morning","steps":[{"id":"routine-1700000000000-step-cleanser","type":"cleanser","productName":"","completed":true}]}]"#,
        ),
        (SLOT_PROGRESS_ENTRIES, "[]"),
        (
            SLOT_WISHLIST,
            r#"[{"id":"1","name":"Toner","price":18,"imageUrl":"x","addedDate":"2024-05-01T00:00:00.000Z"}]"#,
        ),
    ]);
    let store = ProfileStore::new(Arc::new(storage.clone()));

    let report = store.load().await;

    assert_eq!(report.restored.len(), 4);
    assert_eq!(store.user_profile().skin_type.as_deref(), Some("Oily"));
    assert_eq!(store.routines()[0].completed_steps(), 1);
    assert_eq!(store.wishlist()[0].price, 18.0);

    // The next save upgrades every slot to the versioned envelope
    store.update_user_profile(ProfilePatch {
        sensitivity: Some("Slightly Sensitive".to_string()),
        ..Default::default()
    });
    store.flush().await;

    let text = storage.get(SLOT_ROUTINES).await.unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["schemaVersion"], 1);
    assert_eq!(value["data"][0]["id"], "routine-1700000000000");
}

#[tokio::test]
async fn test_bad_slots_fall_back_independently() {
    let storage = MemoryStorage::with_slots([
        (SLOT_USER_PROFILE, "not json"),
        (SLOT_ROUTINES, r#"{"schemaVersion":1,"data":[]}"#),
        (SLOT_PROGRESS_ENTRIES, r#"{"schemaVersion":42,"data":[]}"#),
        (
            SLOT_WISHLIST,
            r#"{"schemaVersion":1,"data":[{"id":"p1","name":"Toner","price":10,"imageUrl":"x","addedDate":"2025-01-01"}]}"#,
        ),
    ]);
    let store = ProfileStore::new(Arc::new(storage));

    let report = store.load().await;

    assert_eq!(report.failed, vec![SLOT_USER_PROFILE, SLOT_PROGRESS_ENTRIES]);
    assert_eq!(report.restored, vec![SLOT_ROUTINES, SLOT_WISHLIST]);
    assert!(store.user_profile().skin_type.is_none());
    assert!(store.progress_entries().is_empty());
    assert_eq!(store.wishlist().len(), 1);
}
