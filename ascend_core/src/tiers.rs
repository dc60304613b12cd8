//! Tier rankings within a training path.
//!
//! Each path has five named tiers with ascending TSS thresholds. The shred
//! path also rewards a lower BMI.

use crate::strength::{best_lifts, body_mass_index, total_strength_score, BestLifts};
use crate::{Profile, TierInfo, TrainingPath, WorkoutRecord};
use serde::Serialize;

const TIER_COUNT: usize = 5;

/// Tier names for a path, lowest first
pub fn tier_names(path: TrainingPath) -> &'static [&'static str; TIER_COUNT] {
    match path {
        TrainingPath::Shred => &["Lean", "Defined", "Shredded", "Stage", "Elite Physique"],
        TrainingPath::Strength => &["Iron", "Heavy", "Strong", "Max", "Elite Lifter"],
        TrainingPath::Hybrid => &["Built", "Athletic", "Powerful", "Complete", "Prime"],
    }
}

/// Minimum score for each tier; the first is always 0
fn tier_thresholds(path: TrainingPath) -> &'static [f64; TIER_COUNT] {
    match path {
        TrainingPath::Shred => &[0.0, 2.0, 3.5, 5.0, 6.5],
        TrainingPath::Strength => &[0.0, 3.0, 5.0, 7.0, 9.0],
        TrainingPath::Hybrid => &[0.0, 2.5, 4.0, 6.0, 8.0],
    }
}

/// Score adjustment applied on the shred path
pub fn shred_bmi_bonus(bmi: f64) -> f64 {
    if bmi < 20.0 {
        1.0
    } else if bmi < 22.0 {
        0.5
    } else if bmi < 25.0 {
        0.0
    } else if bmi < 28.0 {
        -0.5
    } else {
        -1.0
    }
}

/// Place a score within a path's tiers.
///
/// Progress toward the next tier is a percentage clamped to 0..=100. The top
/// tier reports 100 and no next tier.
pub fn tier_info(path: TrainingPath, total_strength_score: f64, bmi: f64) -> TierInfo {
    let names = tier_names(path);
    let thresholds = tier_thresholds(path);

    let effective = match path {
        TrainingPath::Shred => total_strength_score + shred_bmi_bonus(bmi),
        TrainingPath::Strength | TrainingPath::Hybrid => total_strength_score,
    };

    let index = (0..TIER_COUNT)
        .rev()
        .find(|&i| effective >= thresholds[i])
        .unwrap_or(0);

    let (progress, next_tier) = match thresholds.get(index + 1) {
        Some(&next_threshold) => {
            let current = thresholds[index];
            let pct = ((effective - current) / (next_threshold - current) * 100.0).round();
            (pct.clamp(0.0, 100.0) as u8, Some(names[index + 1]))
        }
        None => (100, None),
    };

    TierInfo {
        name: names[index],
        index,
        progress,
        next_tier,
    }
}

/// Strength picture for a user, recomputed from the log
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StrengthSnapshot {
    pub lifts: BestLifts,
    pub total_strength_score: f64,
    pub bmi: f64,
    pub tier: TierInfo,
}

impl StrengthSnapshot {
    pub fn compute(history: &[WorkoutRecord], profile: &Profile) -> Self {
        let lifts = best_lifts(history);
        let score = total_strength_score(
            lifts.squat_1rm,
            lifts.bench_1rm,
            lifts.deadlift_1rm,
            profile.weight_kg,
        );
        let bmi = body_mass_index(profile.height_cm, profile.weight_kg);
        let tier = tier_info(profile.path, score, bmi);

        tracing::debug!(
            "Snapshot: TSS {} BMI {} -> {} ({}%)",
            score,
            bmi,
            tier.name,
            tier.progress
        );

        Self {
            lifts,
            total_strength_score: score,
            bmi,
            tier,
        }
    }
}
