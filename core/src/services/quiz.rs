//! Skin quiz answers
//!
//! The quiz collects option ids; the profile stores their labels.

use crate::catalog::{option_label, SENSITIVITY_LEVELS, SKIN_CONCERNS, SKIN_TYPES};
use crate::models::ProfilePatch;
use serde::{Deserialize, Serialize};

/// Option ids picked in the quiz
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAnswers {
    pub skin_type: Option<String>,
    #[serde(default)]
    pub concerns: Vec<String>,
    pub sensitivity: Option<String>,
}

impl QuizAnswers {
    /// Whether every question has an answer
    pub fn is_complete(&self) -> bool {
        self.skin_type.is_some() && !self.concerns.is_empty() && self.sensitivity.is_some()
    }

    /// Toggle a concern in or out of the selection
    pub fn toggle_concern(&mut self, concern_id: &str) {
        if let Some(pos) = self.concerns.iter().position(|c| c == concern_id) {
            self.concerns.remove(pos);
        } else {
            self.concerns.push(concern_id.to_string());
        }
    }

    /// Profile update recorded when the quiz is submitted.
    ///
    /// Unanswered single-choice questions are stored as empty labels and
    /// unknown concern ids are dropped. Always marks the profile completed.
    pub fn into_patch(self) -> ProfilePatch {
        let skin_type = self
            .skin_type
            .as_deref()
            .and_then(|id| option_label(SKIN_TYPES, id))
            .unwrap_or_default()
            .to_string();

        let sensitivity = self
            .sensitivity
            .as_deref()
            .and_then(|id| option_label(SENSITIVITY_LEVELS, id))
            .unwrap_or_default()
            .to_string();

        let concerns = self
            .concerns
            .iter()
            .filter_map(|id| option_label(SKIN_CONCERNS, id))
            .map(str::to_string)
            .collect();

        ProfilePatch {
            skin_type: Some(skin_type),
            concerns: Some(concerns),
            sensitivity: Some(sensitivity),
            completed: Some(true),
        }
    }
}
