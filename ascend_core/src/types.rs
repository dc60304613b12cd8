//! Core domain types for the Ascend training system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Planned exercises and their progression phase
//! - Set outcomes and logged workout records
//! - Profile, training paths and tier results
//! - Persistent user state

use crate::progression::WEIGHT_INCREMENT;
use crate::rep_range::RepRange;
use crate::schedule::Schedule;
use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Calendar and Muscle Groups
// ============================================================================

/// Day of the training week (Monday first)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(day: Weekday) -> Self {
        DayOfWeek::ALL[day.num_days_from_monday() as usize]
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for DayOfWeek {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        DayOfWeek::ALL
            .iter()
            .copied()
            .find(|d| {
                let name = d.as_str().to_lowercase();
                name == lower || name[..3] == lower
            })
            .ok_or_else(|| Error::Plan(format!("Unknown day of week: {}", s)))
    }
}

/// Muscle group an exercise is filed under
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MuscleGroup {
    Chest,
    Back,
    Shoulders,
    Biceps,
    Triceps,
    Legs,
    Core,
    Calves,
}

impl MuscleGroup {
    pub const ALL: [MuscleGroup; 8] = [
        MuscleGroup::Chest,
        MuscleGroup::Back,
        MuscleGroup::Shoulders,
        MuscleGroup::Biceps,
        MuscleGroup::Triceps,
        MuscleGroup::Legs,
        MuscleGroup::Core,
        MuscleGroup::Calves,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MuscleGroup::Chest => "Chest",
            MuscleGroup::Back => "Back",
            MuscleGroup::Shoulders => "Shoulders",
            MuscleGroup::Biceps => "Biceps",
            MuscleGroup::Triceps => "Triceps",
            MuscleGroup::Legs => "Legs",
            MuscleGroup::Core => "Core",
            MuscleGroup::Calves => "Calves",
        }
    }
}

impl fmt::Display for MuscleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MuscleGroup {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        MuscleGroup::ALL
            .iter()
            .copied()
            .find(|g| g.as_str().to_lowercase() == lower)
            .ok_or_else(|| Error::Plan(format!("Unknown muscle group: {}", s)))
    }
}

// ============================================================================
// Planned Exercises and Progression
// ============================================================================

/// Double-progression phase of a planned exercise
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProgressionPhase {
    /// Working in the base range; topping it out moves reps up a range
    #[default]
    Base,
    /// Working in the range above base; topping it out adds weight
    Next,
}

impl fmt::Display for ProgressionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressionPhase::Base => f.write_str("base"),
            ProgressionPhase::Next => f.write_str("next"),
        }
    }
}

/// One planned exercise for one weekday
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExerciseTarget {
    pub id: Uuid,
    pub day: DayOfWeek,
    pub exercise_name: String,
    pub muscle_group: MuscleGroup,
    pub target_sets: u32,
    pub target_rep_range: RepRange,
    pub target_weight: f64,
    #[serde(default)]
    pub phase: ProgressionPhase,
    pub created_at: DateTime<Utc>,
}

impl ExerciseTarget {
    /// New target in the base phase.
    ///
    /// Sets must be positive; weight must be non-negative and land on the
    /// 2.5 increment grid.
    pub fn new(
        day: DayOfWeek,
        exercise_name: impl Into<String>,
        muscle_group: MuscleGroup,
        target_sets: u32,
        target_rep_range: RepRange,
        target_weight: f64,
    ) -> Result<Self> {
        let exercise_name = exercise_name.into();
        if exercise_name.trim().is_empty() {
            return Err(Error::Plan("Exercise name must not be empty".into()));
        }
        check_sets(target_sets)?;
        check_weight(target_weight)?;

        Ok(Self {
            id: Uuid::new_v4(),
            day,
            exercise_name,
            muscle_group,
            target_sets,
            target_rep_range,
            target_weight,
            phase: ProgressionPhase::Base,
            created_at: Utc::now(),
        })
    }

    /// Change sets, rep range or weight in place.
    ///
    /// Identity, phase and creation time are kept. Nothing changes unless
    /// every given value is valid.
    pub fn edit(
        &mut self,
        target_sets: Option<u32>,
        target_rep_range: Option<RepRange>,
        target_weight: Option<f64>,
    ) -> Result<()> {
        if let Some(sets) = target_sets {
            check_sets(sets)?;
        }
        if let Some(weight) = target_weight {
            check_weight(weight)?;
        }

        if let Some(sets) = target_sets {
            self.target_sets = sets;
        }
        if let Some(range) = target_rep_range {
            self.target_rep_range = range;
        }
        if let Some(weight) = target_weight {
            self.target_weight = weight;
        }
        Ok(())
    }
}

fn check_sets(target_sets: u32) -> Result<()> {
    if target_sets == 0 {
        return Err(Error::Plan("Target sets must be at least 1".into()));
    }
    Ok(())
}

fn check_weight(target_weight: f64) -> Result<()> {
    let steps = target_weight / WEIGHT_INCREMENT;
    if !target_weight.is_finite() || target_weight < 0.0 || (steps - steps.round()).abs() > 1e-9 {
        return Err(Error::Plan(format!(
            "Target weight must be a non-negative multiple of {} (got {})",
            WEIGHT_INCREMENT, target_weight
        )));
    }
    Ok(())
}

/// One completed set inside an active session
#[derive(Clone, Debug, PartialEq)]
pub struct SetOutcome {
    pub exercise_id: Uuid,
    pub set_index: u32,
    pub reps: u32,
    pub weight: f64,
}

/// Immutable log entry for performed work
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutRecord {
    pub id: Uuid,
    pub date: NaiveDate,
    pub muscle_group: MuscleGroup,
    pub exercise_name: String,
    pub weight: f64,
    pub reps: u32,
    pub sets: u32,
    #[serde(default)]
    pub estimated_1rm: Option<f64>,
}

// ============================================================================
// Profile, Paths and Tiers
// ============================================================================

/// Goal orientation that selects tier names and thresholds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrainingPath {
    Shred,
    #[default]
    Strength,
    Hybrid,
}

impl TrainingPath {
    pub fn as_str(self) -> &'static str {
        match self {
            TrainingPath::Shred => "shred",
            TrainingPath::Strength => "strength",
            TrainingPath::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for TrainingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrainingPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "shred" => Ok(TrainingPath::Shred),
            "strength" => Ok(TrainingPath::Strength),
            "hybrid" => Ok(TrainingPath::Hybrid),
            other => Err(Error::Plan(format!("Unknown training path: {}", other))),
        }
    }
}

/// Self-reported gym experience
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GymExperience {
    #[default]
    Beginner,
    Experienced,
}

impl FromStr for GymExperience {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(GymExperience::Beginner),
            "experienced" => Ok(GymExperience::Experienced),
            other => Err(Error::Plan(format!("Unknown gym experience: {}", other))),
        }
    }
}

/// Weekly split the schedule is derived from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutSplit {
    #[default]
    Ppl,
    UpperLower,
    BroSplit,
    FullBody,
    Custom,
}

impl FromStr for WorkoutSplit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "ppl" => Ok(WorkoutSplit::Ppl),
            "upper_lower" => Ok(WorkoutSplit::UpperLower),
            "bro_split" => Ok(WorkoutSplit::BroSplit),
            "full_body" => Ok(WorkoutSplit::FullBody),
            "custom" => Ok(WorkoutSplit::Custom),
            other => Err(Error::Plan(format!("Unknown workout split: {}", other))),
        }
    }
}

/// User profile used for scoring and scheduling
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub height_cm: f64,
    #[serde(default)]
    pub weight_kg: f64,
    #[serde(default)]
    pub path: TrainingPath,
    #[serde(default)]
    pub experience: GymExperience,
    #[serde(default)]
    pub split: WorkoutSplit,
    #[serde(default)]
    pub schedule: Schedule,
    #[serde(default)]
    pub skipped_muscle_groups: Vec<MuscleGroup>,
}

impl Default for Profile {
    fn default() -> Self {
        let split = WorkoutSplit::default();
        Self {
            username: None,
            height_cm: 0.0,
            weight_kg: 0.0,
            path: TrainingPath::default(),
            experience: GymExperience::default(),
            split,
            schedule: Schedule::for_split(split),
            skipped_muscle_groups: Vec::new(),
        }
    }
}

/// Where a user sits within their training path
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TierInfo {
    pub name: &'static str,
    pub index: usize,
    pub progress: u8,
    pub next_tier: Option<&'static str>,
}

// ============================================================================
// Persistent State
// ============================================================================

/// User's persistent state: profile plus the weekly plan
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct UserState {
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub plan: Vec<ExerciseTarget>,
}

impl UserState {
    /// Planned exercises for a day in creation order
    pub fn plan_for_day(&self, day: DayOfWeek) -> Vec<&ExerciseTarget> {
        let mut targets: Vec<_> = self.plan.iter().filter(|t| t.day == day).collect();
        targets.sort_by_key(|t| t.created_at);
        targets
    }

    /// Find a planned exercise by id
    pub fn target_mut(&mut self, id: Uuid) -> Option<&mut ExerciseTarget> {
        self.plan.iter_mut().find(|t| t.id == id)
    }

    /// Remove a planned exercise; returns whether anything was removed
    pub fn remove_target(&mut self, id: Uuid) -> bool {
        let before = self.plan.len();
        self.plan.retain(|t| t.id != id);
        self.plan.len() != before
    }
}
