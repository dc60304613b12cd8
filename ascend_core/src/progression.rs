//! Double-progression logic for planned exercises.
//!
//! Reps climb first, then weight:
//! 1. Top out the base range on every set → move up one rep range
//! 2. Top out that next range on every set → add 2.5 and drop back to base
//!
//! e.g. 6-8 @ 60 → 8-10 @ 60 → 6-8 @ 62.5

use crate::catalog::HEAVY_COMPOUNDS;
use crate::rep_range::RepRange;
use crate::{ExerciseTarget, ProgressionPhase, WorkoutRecord};
use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// Weight added each time a full progression cycle completes
pub const WEIGHT_INCREMENT: f64 = 2.5;

/// Rest after a set of a heavy compound
pub const HEAVY_REST_SECONDS: u32 = 150;

/// Rest after any other set
pub const DEFAULT_REST_SECONDS: u32 = 120;

/// Next target for a planned exercise
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProgressionSuggestion {
    pub suggested_rep_range: RepRange,
    pub suggested_weight: f64,
    pub next_phase: ProgressionPhase,
    pub message: String,
}

impl ProgressionSuggestion {
    /// Whether following this suggestion changes the rep range or weight
    pub fn changes(&self, target: &ExerciseTarget) -> bool {
        self.suggested_rep_range != target.target_rep_range
            || self.suggested_weight != target.target_weight
    }
}

/// Decide the next target after a session.
///
/// Progression only happens when every planned set was completed and
/// `last_reps` reached the range's upper bound. Otherwise the current target
/// is returned unchanged.
pub fn suggest_progression(
    current_rep_range: RepRange,
    phase: ProgressionPhase,
    target_weight: f64,
    last_reps: u32,
    sets_completed: u32,
    target_sets: u32,
) -> ProgressionSuggestion {
    let all_sets_complete = sets_completed >= target_sets;
    let hit_upper_bound = last_reps >= current_rep_range.upper_bound();

    if !all_sets_complete || !hit_upper_bound {
        return ProgressionSuggestion {
            suggested_rep_range: current_rep_range,
            suggested_weight: target_weight,
            next_phase: phase,
            message: format!(
                "Keep pushing, aim for {} reps on every set",
                current_rep_range.upper_bound()
            ),
        };
    }

    match phase {
        ProgressionPhase::Base => {
            let next_range = current_rep_range.successor();
            tracing::debug!("Base range {} complete, moving to {}", current_rep_range, next_range);
            ProgressionSuggestion {
                suggested_rep_range: next_range,
                suggested_weight: target_weight,
                next_phase: ProgressionPhase::Next,
                message: format!("Great work! Push to {} reps this week", next_range),
            }
        }
        ProgressionPhase::Next => {
            let base_range = current_rep_range.predecessor();
            let new_weight = target_weight + WEIGHT_INCREMENT;
            tracing::debug!(
                "Next range {} complete, weight {} -> {}",
                current_rep_range,
                target_weight,
                new_weight
            );
            ProgressionSuggestion {
                suggested_rep_range: base_range,
                suggested_weight: new_weight,
                next_phase: ProgressionPhase::Base,
                message: format!(
                    "+{} unlocked! Drop back to {} reps with more weight",
                    WEIGHT_INCREMENT, base_range
                ),
            }
        }
    }
}

/// Rest timer for an exercise, in seconds
pub fn rest_seconds(exercise_name: &str) -> u32 {
    if HEAVY_COMPOUNDS.contains(exercise_name) {
        HEAVY_REST_SECONDS
    } else {
        DEFAULT_REST_SECONDS
    }
}

/// Apply a suggestion to a planned exercise
pub fn apply_suggestion(target: &mut ExerciseTarget, suggestion: &ProgressionSuggestion) {
    target.target_rep_range = suggestion.suggested_rep_range;
    target.target_weight = suggestion.suggested_weight;
    target.phase = suggestion.next_phase;

    tracing::info!(
        "Updated {}: {} @ {} ({})",
        target.exercise_name,
        target.target_rep_range,
        target.target_weight,
        target.phase
    );
}

/// Review recent log entries for a planned exercise before a session.
///
/// Takes up to `target_sets` of the newest records for the exercise dated
/// within `window_days` of `today`, averages their reps and runs
/// [`suggest_progression`] with the record count as sets completed. Returns
/// the suggestion only if it would change the target.
///
/// `history` must be sorted newest first.
pub fn review_recent_logs(
    target: &ExerciseTarget,
    history: &[WorkoutRecord],
    today: NaiveDate,
    window_days: i64,
) -> Option<ProgressionSuggestion> {
    let cutoff = today - Duration::days(window_days);
    let recent: Vec<&WorkoutRecord> = history
        .iter()
        .filter(|r| r.exercise_name == target.exercise_name && r.date >= cutoff)
        .take(target.target_sets as usize)
        .collect();

    if recent.is_empty() {
        return None;
    }

    let total_reps: u32 = recent.iter().map(|r| r.reps).sum();
    let avg_reps = (f64::from(total_reps) / recent.len() as f64).round() as u32;

    let suggestion = suggest_progression(
        target.target_rep_range,
        target.phase,
        target.target_weight,
        avg_reps,
        recent.len() as u32,
        target.target_sets,
    );

    if suggestion.changes(target) {
        Some(suggestion)
    } else {
        None
    }
}
