//! Built-in exercise catalog.
//!
//! Static tables: the exercise database by muscle group, the category lists
//! used to estimate the big three lifts, and the heavy compound set that gets
//! the long rest timer.

use crate::MuscleGroup;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Exercise names grouped by muscle group
pub static EXERCISE_DATABASE: &[(MuscleGroup, &[&str])] = &[
    (
        MuscleGroup::Chest,
        &[
            "Barbell Bench Press",
            "Incline Bench Press",
            "Incline Dumbbell Chest Press",
            "Dumbbell Press",
            "Chest Fly",
            "Machine Press",
            "Cable Crossover",
            "Dips (Chest)",
            "Push-ups",
        ],
    ),
    (
        MuscleGroup::Back,
        &[
            "Deadlift",
            "Barbell Row",
            "Lat Pulldown",
            "Pull-ups",
            "Seated Row",
            "T-Bar Row",
            "Face Pulls",
            "Single Arm Dumbbell Row",
        ],
    ),
    (
        MuscleGroup::Shoulders,
        &[
            "Overhead Press",
            "Dumbbell Shoulder Press",
            "Dumbbell Lateral Raise",
            "Front Raise",
            "Arnold Press",
            "Reverse Fly",
            "Upright Row",
            "Cable Lateral Raise",
        ],
    ),
    (
        MuscleGroup::Biceps,
        &[
            "Barbell Curl",
            "Dumbbell Curl",
            "Hammer Curl",
            "Preacher Curl",
            "Concentration Curl",
            "Cable Curl",
            "EZ Bar Curl",
        ],
    ),
    (
        MuscleGroup::Triceps,
        &[
            "Tricep Pushdown",
            "Overhead Tricep Extension",
            "Skull Crushers",
            "Close Grip Bench Press",
            "Dips (Triceps)",
            "Kickbacks",
            "Cable Overhead Extension",
        ],
    ),
    (
        MuscleGroup::Legs,
        &[
            "Barbell Squat",
            "Leg Press",
            "Romanian Deadlift",
            "Leg Extension",
            "Leg Curl",
            "Bulgarian Split Squat",
            "Hip Thrust",
            "Lunges",
            "Hack Squat",
            "Goblet Squat",
        ],
    ),
    (
        MuscleGroup::Core,
        &[
            "Plank",
            "Cable Crunch",
            "Hanging Leg Raise",
            "Ab Rollout",
            "Russian Twist",
            "Decline Sit-ups",
            "Woodchoppers",
        ],
    ),
    (
        MuscleGroup::Calves,
        &[
            "Standing Calf Raise",
            "Seated Calf Raise",
            "Donkey Calf Raise",
            "Leg Press Calf Raise",
            "Smith Machine Calf Raise",
        ],
    ),
];

/// Pressing movements that stand in for the bench press
pub static PUSH_EXERCISES: &[&str] = &[
    "Barbell Bench Press",
    "Incline Bench Press",
    "Incline Dumbbell Chest Press",
    "Dumbbell Press",
    "Machine Press",
    "Overhead Press",
    "Dumbbell Shoulder Press",
    "Close Grip Bench Press",
];

/// Pulling movements that stand in for the deadlift
pub static PULL_EXERCISES: &[&str] = &[
    "Deadlift",
    "Barbell Row",
    "Lat Pulldown",
    "Pull-ups",
    "Seated Row",
    "T-Bar Row",
    "Single Arm Dumbbell Row",
];

/// Lower-body movements that stand in for the squat
pub static LOWER_EXERCISES: &[&str] = &[
    "Barbell Squat",
    "Leg Press",
    "Romanian Deadlift",
    "Bulgarian Split Squat",
    "Hip Thrust",
    "Hack Squat",
    "Goblet Squat",
    "Lunges",
];

/// Heavy compounds that get the long rest timer
pub static HEAVY_COMPOUNDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "Barbell Bench Press",
        "Incline Bench Press",
        "Incline Dumbbell Chest Press",
        "Lat Pulldown",
        "Pull-ups",
        "Deadlift",
        "Barbell Squat",
        "Romanian Deadlift",
        "Barbell Row",
        "Overhead Press",
        "Hack Squat",
        "Bulgarian Split Squat",
        "Hip Thrust",
        "T-Bar Row",
        "Close Grip Bench Press",
    ]
    .into_iter()
    .collect()
});

/// Exercise name → muscle group, built once
static MUSCLE_GROUP_INDEX: Lazy<HashMap<&'static str, MuscleGroup>> = Lazy::new(|| {
    EXERCISE_DATABASE
        .iter()
        .flat_map(|(group, names)| names.iter().map(move |name| (*name, *group)))
        .collect()
});

/// The three lifts the strength score is built from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalLift {
    Squat,
    Bench,
    Deadlift,
}

impl CanonicalLift {
    pub const ALL: [CanonicalLift; 3] = [
        CanonicalLift::Squat,
        CanonicalLift::Bench,
        CanonicalLift::Deadlift,
    ];

    /// Exact exercise name that counts as this lift
    pub fn exercise_name(self) -> &'static str {
        match self {
            CanonicalLift::Squat => "Barbell Squat",
            CanonicalLift::Bench => "Barbell Bench Press",
            CanonicalLift::Deadlift => "Deadlift",
        }
    }

    /// Category-equivalent exercises used when the exact lift was never logged
    pub fn fallback_exercises(self) -> &'static [&'static str] {
        match self {
            CanonicalLift::Squat => LOWER_EXERCISES,
            CanonicalLift::Bench => PUSH_EXERCISES,
            CanonicalLift::Deadlift => PULL_EXERCISES,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CanonicalLift::Squat => "Squat",
            CanonicalLift::Bench => "Bench",
            CanonicalLift::Deadlift => "Deadlift",
        }
    }
}

/// Exercises listed for a muscle group
pub fn exercises_for(group: MuscleGroup) -> &'static [&'static str] {
    EXERCISE_DATABASE
        .iter()
        .find(|(g, _)| *g == group)
        .map(|(_, names)| *names)
        .unwrap_or(&[])
}

/// Muscle group a catalog exercise belongs to
pub fn muscle_group_of(exercise_name: &str) -> Option<MuscleGroup> {
    MUSCLE_GROUP_INDEX.get(exercise_name).copied()
}

/// Check the static tables agree with each other
///
/// Returns a list of problems; empty means the catalog is consistent.
pub fn validate() -> Vec<String> {
    let mut errors = Vec::new();

    for group in MuscleGroup::ALL {
        if exercises_for(group).is_empty() {
            errors.push(format!("Muscle group {} has no exercises", group));
        }
    }

    for lift in CanonicalLift::ALL {
        if muscle_group_of(lift.exercise_name()).is_none() {
            errors.push(format!(
                "Canonical lift {} not in exercise database",
                lift.exercise_name()
            ));
        }
        for name in lift.fallback_exercises() {
            if muscle_group_of(name).is_none() {
                errors.push(format!(
                    "Fallback exercise {} for {} not in exercise database",
                    name,
                    lift.label()
                ));
            }
        }
    }

    for name in HEAVY_COMPOUNDS.iter() {
        if muscle_group_of(name).is_none() {
            errors.push(format!(
                "Heavy compound {} not in exercise database",
                name
            ));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_group_has_exercises() {
        for group in MuscleGroup::ALL {
            assert!(!exercises_for(group).is_empty(), "{} is empty", group);
        }
    }

    #[test]
    fn test_muscle_group_lookup() {
        assert_eq!(muscle_group_of("Hip Thrust"), Some(MuscleGroup::Legs));
        assert_eq!(muscle_group_of("Face Pulls"), Some(MuscleGroup::Back));
        assert_eq!(muscle_group_of("Underwater Basket Weaving"), None);
    }

    #[test]
    fn test_canonical_lifts_are_in_their_fallback_lists() {
        for lift in CanonicalLift::ALL {
            assert!(lift.fallback_exercises().contains(&lift.exercise_name()));
        }
    }

    #[test]
    fn test_heavy_compounds_membership() {
        assert!(HEAVY_COMPOUNDS.contains("Deadlift"));
        assert!(!HEAVY_COMPOUNDS.contains("Push-ups"));
        assert_eq!(HEAVY_COMPOUNDS.len(), 15);
    }

    #[test]
    fn test_default_catalog_validates() {
        let errors = validate();
        assert!(
            errors.is_empty(),
            "Default catalog has validation errors: {:?}",
            errors
        );
    }
}
