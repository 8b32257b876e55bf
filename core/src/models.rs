//! Store models
//!
//! Plain records held by the store and persisted as JSON.
//! Field names are camelCase on the wire so payloads written by earlier
//! versions of the app still decode.

use crate::catalog::{self, StepDescriptor};
use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// The user's skin profile, filled in by the quiz or profile editor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSkinProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skin_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concerns: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensitivity: Option<String>,
    /// Set explicitly by the UI once the quiz is finished
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl UserSkinProfile {
    /// Shallow merge: fields present in the patch overwrite, others are kept
    pub fn apply(&mut self, patch: ProfilePatch) {
        if let Some(skin_type) = patch.skin_type {
            self.skin_type = Some(skin_type);
        }
        if let Some(concerns) = patch.concerns {
            self.concerns = Some(concerns);
        }
        if let Some(sensitivity) = patch.sensitivity {
            self.sensitivity = Some(sensitivity);
        }
        if let Some(completed) = patch.completed {
            self.completed = Some(completed);
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed.unwrap_or(false)
    }
}

/// Partial profile update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[serde(default)]
    pub skin_type: Option<String>,
    #[serde(default)]
    pub concerns: Option<Vec<String>>,
    #[serde(default)]
    pub sensitivity: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

/// Time of day a routine is meant for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutineType {
    Morning,
    Evening,
}

impl RoutineType {
    pub fn label(self) -> &'static str {
        match self {
            RoutineType::Morning => "Morning",
            RoutineType::Evening => "Evening",
        }
    }
}

/// A single step of a routine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineStep {
    /// Unique within the parent routine
    pub id: String,
    /// Step type id, see [`catalog::STEP_TYPES`]
    #[serde(rename = "type")]
    pub step_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl RoutineStep {
    pub fn is_completed(&self) -> bool {
        self.completed.unwrap_or(false)
    }

    /// Display metadata, `None` for types this build doesn't know
    pub fn descriptor(&self) -> Option<&'static StepDescriptor> {
        catalog::step_descriptor(&self.step_type)
    }
}

/// A morning or evening skincare routine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routine {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub routine_type: RoutineType,
    #[serde(default)]
    pub steps: Vec<RoutineStep>,
}

impl Routine {
    /// Build a fresh routine with one empty step per applicable step type
    pub fn from_template(routine_type: RoutineType) -> Self {
        let id = new_id("routine");
        let steps = catalog::steps_for(routine_type)
            .map(|descriptor| RoutineStep {
                id: format!("{}-step-{}", id, descriptor.id),
                step_type: descriptor.id.to_string(),
                product_id: None,
                product_name: Some(String::new()),
                completed: None,
            })
            .collect();

        Self {
            name: default_routine_name(routine_type),
            id,
            routine_type,
            steps,
        }
    }

    /// Shallow merge: fields present in the patch overwrite, others are kept
    pub fn apply(&mut self, patch: RoutinePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(routine_type) = patch.routine_type {
            self.routine_type = routine_type;
        }
        if let Some(steps) = patch.steps {
            self.steps = steps;
        }
    }

    /// Flip the completion flag of a step. Returns false if no step matches.
    pub fn toggle_step(&mut self, step_id: &str) -> bool {
        match self.steps.iter_mut().find(|s| s.id == step_id) {
            Some(step) => {
                step.completed = Some(!step.is_completed());
                true
            }
            None => false,
        }
    }

    pub fn completed_steps(&self) -> usize {
        self.steps.iter().filter(|s| s.is_completed()).count()
    }
}

/// Name given to routines created from a template
pub fn default_routine_name(routine_type: RoutineType) -> String {
    format!("My {} Routine", routine_type.label())
}

/// Partial routine update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutinePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub routine_type: Option<RoutineType>,
    /// Replaces the whole step list
    #[serde(default)]
    pub steps: Option<Vec<RoutineStep>>,
}

/// A dated progress photo with notes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    pub id: String,
    /// ISO date string
    pub date: String,
    /// Local file reference to the photo
    pub image_uri: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub concerns: Vec<String>,
}

impl ProgressEntry {
    /// New entry dated today (UTC)
    pub fn new(image_uri: impl Into<String>, notes: impl Into<String>, concerns: Vec<String>) -> Self {
        Self {
            id: new_id("progress"),
            date: Utc::now().date_naive().to_string(),
            image_uri: image_uri.into(),
            notes: notes.into(),
            concerns,
        }
    }
}

/// A catalog product saved for later. `id` is the product's catalog id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub id: String,
    pub name: String,
    /// `null` (how JSON writes a non-finite number) reads back as 0
    #[serde(deserialize_with = "price_or_zero")]
    pub price: f64,
    pub image_url: String,
    /// ISO timestamp
    pub added_date: String,
}

impl WishlistItem {
    /// Prices JSON can represent; NaN and infinities cannot round-trip
    pub fn has_valid_price(&self) -> bool {
        self.price.is_finite()
    }

    pub fn new(
        product_id: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            id: product_id.into(),
            name: name.into(),
            price,
            image_url: image_url.into(),
            added_date: Utc::now().to_rfc3339(),
        }
    }
}

/// The whole in-memory state, persisted as four slots
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSnapshot {
    pub user_profile: UserSkinProfile,
    pub routines: Vec<Routine>,
    pub progress_entries: Vec<ProgressEntry>,
    pub wishlist: Vec<WishlistItem>,
}

fn price_or_zero<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4())
}
