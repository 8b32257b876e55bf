//! Static lookup tables referenced by stored data
//!
//! Routine steps store their type as a plain string; the descriptors here
//! are only used for display (icon, label, description) and for building
//! routine templates. Quiz option tables map the ids picked in the quiz to
//! the labels stored in the skin profile.

use crate::models::RoutineType;

/// Display metadata for a routine step type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDescriptor {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub order: u8,
    pub morning_only: bool,
    pub evening_only: bool,
}

impl StepDescriptor {
    /// Whether this step belongs in a routine for the given time of day
    pub fn applies_to(&self, routine_type: RoutineType) -> bool {
        match routine_type {
            RoutineType::Morning => !self.evening_only,
            RoutineType::Evening => !self.morning_only,
        }
    }
}

const fn step(
    id: &'static str,
    label: &'static str,
    description: &'static str,
    icon: &'static str,
    order: u8,
) -> StepDescriptor {
    StepDescriptor {
        id,
        label,
        description,
        icon,
        order,
        morning_only: false,
        evening_only: false,
    }
}

/// Known step types, in routine order
pub const STEP_TYPES: &[StepDescriptor] = &[
    step("cleanser", "Cleanser", "Remove dirt, oil, and makeup", "🧼", 1),
    step("toner", "Toner", "Balance pH and prep skin", "💧", 2),
    step("essence", "Essence", "Lightweight hydration", "💦", 3),
    step("serum", "Serum", "Target specific concerns", "⚗️", 4),
    step("ampoule", "Ampoule", "Concentrated treatment", "💉", 5),
    step("eye-cream", "Eye Cream", "For delicate eye area", "👁️", 6),
    step("moisturizer", "Moisturizer", "Hydrate and seal in moisture", "🧴", 7),
    StepDescriptor {
        morning_only: true,
        ..step("sunscreen", "Sunscreen", "Protect from UV rays", "☀️", 8)
    },
    StepDescriptor {
        evening_only: true,
        ..step("sleeping-mask", "Sleeping Mask", "Overnight nourishment", "😴", 9)
    },
];

/// Look up the descriptor for a stored step type.
///
/// Unknown types return `None`; the step is still valid, it just renders
/// without decoration.
pub fn step_descriptor(step_type: &str) -> Option<&'static StepDescriptor> {
    STEP_TYPES.iter().find(|d| d.id == step_type)
}

/// Descriptors applicable to a morning or evening routine
pub fn steps_for(routine_type: RoutineType) -> impl Iterator<Item = &'static StepDescriptor> {
    STEP_TYPES.iter().filter(move |d| d.applies_to(routine_type))
}

/// One selectable answer in the skin quiz
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizOption {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

const fn option(id: &'static str, label: &'static str, description: &'static str) -> QuizOption {
    QuizOption {
        id,
        label,
        description,
    }
}

pub const SKIN_TYPES: &[QuizOption] = &[
    option("dry", "Dry", "Feels tight, flaky patches"),
    option("oily", "Oily", "Shiny, especially T-zone"),
    option("combination", "Combination", "Oily T-zone, dry cheeks"),
    option("normal", "Normal", "Balanced, not too dry or oily"),
    option("sensitive", "Sensitive", "Reacts easily, prone to redness"),
];

pub const SKIN_CONCERNS: &[QuizOption] = &[
    option("acne", "Acne", "Breakouts, blemishes"),
    option("aging", "Aging", "Fine lines, wrinkles"),
    option("hyperpigmentation", "Hyperpigmentation", "Dark spots, uneven tone"),
    option("redness", "Redness", "Rosacea, irritation"),
    option("dehydration", "Dehydration", "Lacks water, not oil"),
    option("dullness", "Dullness", "Lacks radiance, uneven texture"),
    option("pores", "Large Pores", "Visible, enlarged pores"),
    option("blackheads", "Blackheads", "Clogged pores, especially on nose"),
];

pub const SENSITIVITY_LEVELS: &[QuizOption] = &[
    option("not-sensitive", "Not Sensitive", "Can use most products without issues"),
    option("slightly-sensitive", "Slightly Sensitive", "Occasional reactions to strong actives"),
    option("moderately-sensitive", "Moderately Sensitive", "Regular reactions to many products"),
    option("very-sensitive", "Very Sensitive", "Reacts easily to most products"),
];

/// Resolve a quiz option id to its display label
pub fn option_label(table: &[QuizOption], id: &str) -> Option<&'static str> {
    table.iter().find(|o| o.id == id).map(|o| o.label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_step_lookup() {
        let serum = step_descriptor("serum").unwrap();
        assert_eq!(serum.label, "Serum");
        assert_eq!(serum.order, 4);
    }

    #[test]
    fn test_unknown_step_has_no_descriptor() {
        assert!(step_descriptor("jade-roller").is_none());
    }

    #[test]
    fn test_time_of_day_filtering() {
        let morning: Vec<_> = steps_for(RoutineType::Morning).map(|d| d.id).collect();
        let evening: Vec<_> = steps_for(RoutineType::Evening).map(|d| d.id).collect();

        assert_eq!(morning.len(), 8);
        assert_eq!(evening.len(), 8);
        assert!(morning.contains(&"sunscreen"));
        assert!(!morning.contains(&"sleeping-mask"));
        assert!(evening.contains(&"sleeping-mask"));
        assert!(!evening.contains(&"sunscreen"));
    }

    #[test]
    fn test_step_types_are_ordered() {
        assert!(STEP_TYPES.windows(2).all(|w| w[0].order < w[1].order));
    }

    #[test]
    fn test_option_label() {
        assert_eq!(option_label(SKIN_TYPES, "oily"), Some("Oily"));
        assert_eq!(option_label(SKIN_CONCERNS, "pores"), Some("Large Pores"));
        assert_eq!(option_label(SENSITIVITY_LEVELS, "unknown"), None);
    }
}
