//! Strength estimates derived from the workout log.
//!
//! One-rep maxes use the Epley formula. The total strength score (TSS) is the
//! sum of the squat, bench and deadlift 1RMs relative to bodyweight.

use crate::catalog::CanonicalLift;
use crate::WorkoutRecord;
use chrono::NaiveDate;
use serde::Serialize;

/// Round to a fixed number of decimal places
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Epley one-rep-max estimate, rounded to one decimal
///
/// A single rep is already a max and is returned unchanged.
pub fn calculate_1rm(weight: f64, reps: u32) -> f64 {
    if reps == 1 {
        return weight;
    }
    round_to(weight * (1.0 + f64::from(reps) / 30.0), 1)
}

/// (squat + bench + deadlift) / bodyweight, rounded to two decimals
///
/// Returns 0 when bodyweight is not positive.
pub fn total_strength_score(squat_1rm: f64, bench_1rm: f64, deadlift_1rm: f64, bodyweight: f64) -> f64 {
    if bodyweight <= 0.0 {
        return 0.0;
    }
    round_to((squat_1rm + bench_1rm + deadlift_1rm) / bodyweight, 2)
}

/// Body mass index rounded to one decimal; 0 when height is not positive
pub fn body_mass_index(height_cm: f64, weight_kg: f64) -> f64 {
    let height_m = height_cm / 100.0;
    if height_m <= 0.0 {
        return 0.0;
    }
    round_to(weight_kg / (height_m * height_m), 1)
}

/// 1RM for a record: the stored estimate, or Epley when missing or zero
pub fn record_1rm(record: &WorkoutRecord) -> f64 {
    record
        .estimated_1rm
        .filter(|rm| *rm > 0.0)
        .unwrap_or_else(|| calculate_1rm(record.weight, record.reps))
}

/// Best known 1RM for each canonical lift
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BestLifts {
    pub squat_1rm: f64,
    pub bench_1rm: f64,
    pub deadlift_1rm: f64,
    /// Lifts whose value came from a category-equivalent exercise
    pub estimated: Vec<CanonicalLift>,
}

impl BestLifts {
    pub fn get(&self, lift: CanonicalLift) -> f64 {
        match lift {
            CanonicalLift::Squat => self.squat_1rm,
            CanonicalLift::Bench => self.bench_1rm,
            CanonicalLift::Deadlift => self.deadlift_1rm,
        }
    }

    fn set(&mut self, lift: CanonicalLift, value: f64) {
        match lift {
            CanonicalLift::Squat => self.squat_1rm = value,
            CanonicalLift::Bench => self.bench_1rm = value,
            CanonicalLift::Deadlift => self.deadlift_1rm = value,
        }
    }

    pub fn is_estimated(&self, lift: CanonicalLift) -> bool {
        self.estimated.contains(&lift)
    }

    pub fn total(&self) -> f64 {
        self.squat_1rm + self.bench_1rm + self.deadlift_1rm
    }
}

/// Scan the history for the best squat, bench and deadlift.
///
/// Exact exercise-name matches win. A lift with no exact match falls back to
/// the strongest category-equivalent exercise and is flagged as estimated.
pub fn best_lifts<'a, I>(history: I) -> BestLifts
where
    I: IntoIterator<Item = &'a WorkoutRecord>,
{
    let records: Vec<&WorkoutRecord> = history.into_iter().collect();
    let mut best = BestLifts::default();

    for record in &records {
        for lift in CanonicalLift::ALL {
            if record.exercise_name == lift.exercise_name() {
                let rm = record_1rm(record);
                if rm > best.get(lift) {
                    best.set(lift, rm);
                }
            }
        }
    }

    for lift in CanonicalLift::ALL {
        if best.get(lift) > 0.0 {
            continue;
        }

        let fallbacks = lift.fallback_exercises();
        let substitute = records
            .iter()
            .filter(|r| fallbacks.contains(&r.exercise_name.as_str()))
            .map(|r| record_1rm(r))
            .fold(0.0_f64, f64::max);

        if substitute > 0.0 {
            tracing::debug!(
                "No {} logged, estimating from category best {}",
                lift.label(),
                substitute
            );
            best.set(lift, substitute);
            best.estimated.push(lift);
        }
    }

    best
}

/// TSS on a given date
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StrengthPoint {
    pub date: NaiveDate,
    pub score: f64,
}

/// Total strength score after each training day, oldest first.
///
/// Each point uses every record on or before its date.
pub fn strength_curve(history: &[WorkoutRecord], bodyweight: f64) -> Vec<StrengthPoint> {
    let mut sorted: Vec<&WorkoutRecord> = history.iter().collect();
    sorted.sort_by_key(|r| r.date);

    let mut points = Vec::new();
    let mut end = 0;
    while end < sorted.len() {
        let date = sorted[end].date;
        while end < sorted.len() && sorted[end].date == date {
            end += 1;
        }

        let lifts = best_lifts(sorted[..end].iter().copied());
        points.push(StrengthPoint {
            date,
            score: total_strength_score(lifts.squat_1rm, lifts.bench_1rm, lifts.deadlift_1rm, bodyweight),
        });
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MuscleGroup;
    use uuid::Uuid;

    fn record(name: &str, weight: f64, reps: u32, estimate: Option<f64>, day: u32) -> WorkoutRecord {
        WorkoutRecord {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
            muscle_group: crate::catalog::muscle_group_of(name).unwrap_or(MuscleGroup::Core),
            exercise_name: name.into(),
            weight,
            reps,
            sets: 1,
            estimated_1rm: estimate,
        }
    }

    #[test]
    fn test_single_rep_is_the_max() {
        assert_eq!(calculate_1rm(100.0, 1), 100.0);
    }

    #[test]
    fn test_epley_rounds_to_one_decimal() {
        assert_eq!(calculate_1rm(100.0, 5), 116.7);
        assert_eq!(calculate_1rm(60.0, 10), 80.0);
    }

    #[test]
    fn test_total_strength_score() {
        assert_eq!(total_strength_score(100.0, 80.0, 120.0, 80.0), 3.75);
        assert_eq!(total_strength_score(100.0, 80.0, 120.0, 0.0), 0.0);
        assert_eq!(total_strength_score(100.0, 80.0, 120.0, -5.0), 0.0);
    }

    #[test]
    fn test_body_mass_index() {
        assert_eq!(body_mass_index(175.0, 75.0), 24.5);
        assert_eq!(body_mass_index(0.0, 75.0), 0.0);
    }

    #[test]
    fn test_best_lifts_prefers_exact_matches() {
        let history = vec![
            record("Barbell Squat", 100.0, 5, None, 1),
            record("Barbell Squat", 120.0, 1, None, 2),
            record("Leg Press", 250.0, 10, None, 2),
            record("Barbell Bench Press", 80.0, 1, Some(82.5), 3),
            record("Deadlift", 140.0, 3, None, 3),
        ];

        let best = best_lifts(&history);
        assert_eq!(best.squat_1rm, 120.0);
        assert_eq!(best.bench_1rm, 82.5);
        assert_eq!(best.deadlift_1rm, 154.0);
        assert!(best.estimated.is_empty());
    }

    #[test]
    fn test_zero_estimate_is_recomputed() {
        let history = vec![record("Deadlift", 100.0, 5, Some(0.0), 1)];
        assert_eq!(best_lifts(&history).deadlift_1rm, 116.7);
    }

    #[test]
    fn test_category_fallback_is_flagged() {
        let history = vec![
            record("Leg Press", 200.0, 1, None, 1),
            record("Overhead Press", 50.0, 1, None, 1),
            record("Incline Bench Press", 70.0, 1, None, 2),
            record("Deadlift", 150.0, 1, None, 2),
            record("Plank", 0.0, 1, None, 2),
        ];

        let best = best_lifts(&history);
        assert_eq!(best.squat_1rm, 200.0);
        assert_eq!(best.bench_1rm, 70.0);
        assert_eq!(best.deadlift_1rm, 150.0);
        assert!(best.is_estimated(CanonicalLift::Squat));
        assert!(best.is_estimated(CanonicalLift::Bench));
        assert!(!best.is_estimated(CanonicalLift::Deadlift));
    }

    #[test]
    fn test_empty_history() {
        let best = best_lifts(&Vec::<WorkoutRecord>::new());
        assert_eq!(best, BestLifts::default());
    }

    #[test]
    fn test_strength_curve_accumulates_by_date() {
        let history = vec![
            record("Deadlift", 100.0, 1, None, 3),
            record("Barbell Squat", 80.0, 1, None, 1),
            record("Barbell Bench Press", 60.0, 1, None, 1),
        ];

        let curve = strength_curve(&history, 80.0);
        assert_eq!(curve.len(), 2);
        assert_eq!(curve[0].date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(curve[0].score, 1.75);
        assert_eq!(curve[1].score, 3.0);
    }
}
