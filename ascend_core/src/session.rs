//! Guided training session over one day's plan.
//!
//! A session walks the day's planned exercises set by set. Each completed set
//! yields a workout record for the log and a rest timer. Completing the last
//! set of an exercise yields the progression to store on its target.

use crate::config::SessionConfig;
use crate::progression::{review_recent_logs, rest_seconds, suggest_progression, ProgressionSuggestion};
use crate::strength::calculate_1rm;
use crate::{DayOfWeek, Error, ExerciseTarget, Result, SetOutcome, UserState, WorkoutRecord};
use chrono::NaiveDate;
use uuid::Uuid;

/// One planned exercise inside an active session
#[derive(Clone, Debug)]
pub struct SessionExercise {
    pub target: ExerciseTarget,
    /// Weight used for every set this session
    pub working_weight: f64,
    /// Progression already earned by recent log entries
    pub hint: Option<ProgressionSuggestion>,
    pub sets: Vec<SetOutcome>,
}

impl SessionExercise {
    fn new(target: &ExerciseTarget, hint: Option<ProgressionSuggestion>) -> Self {
        let working_weight = match &hint {
            Some(h) if h.suggested_weight != target.target_weight => h.suggested_weight,
            _ => target.target_weight,
        };

        Self {
            target: target.clone(),
            working_weight,
            hint,
            sets: Vec::new(),
        }
    }

    pub fn sets_completed(&self) -> u32 {
        self.sets.len() as u32
    }

    pub fn is_done(&self) -> bool {
        self.sets_completed() >= self.target.target_sets
    }

    /// Fewest reps performed in any set so far
    fn min_reps(&self) -> u32 {
        self.sets.iter().map(|s| s.reps).min().unwrap_or(0)
    }
}

/// Result of completing one set
#[derive(Clone, Debug)]
pub struct SetCompletion {
    /// Record to append to the workout log
    pub record: WorkoutRecord,
    pub set_index: u32,
    pub rest_seconds: u32,
    /// Present once the final set of the exercise is done
    pub progression: Option<ProgressionSuggestion>,
}

/// In-progress session for one weekday
#[derive(Clone, Debug)]
pub struct ActiveSession {
    day: DayOfWeek,
    exercises: Vec<SessionExercise>,
}

impl ActiveSession {
    /// Start a session from the plan for `day`.
    ///
    /// `history` must be sorted newest first. Hints are computed from entries
    /// within the configured history window of `today`.
    pub fn start(
        state: &UserState,
        day: DayOfWeek,
        history: &[WorkoutRecord],
        today: NaiveDate,
        config: &SessionConfig,
    ) -> Self {
        let exercises: Vec<SessionExercise> = state
            .plan_for_day(day)
            .into_iter()
            .map(|target| {
                let hint = review_recent_logs(target, history, today, config.history_window_days);
                if let Some(h) = &hint {
                    tracing::info!("Hint for {}: {}", target.exercise_name, h.message);
                }
                SessionExercise::new(target, hint)
            })
            .collect();

        tracing::info!("Started {} session with {} exercises", day, exercises.len());

        Self { day, exercises }
    }

    pub fn day(&self) -> DayOfWeek {
        self.day
    }

    pub fn exercises(&self) -> &[SessionExercise] {
        &self.exercises
    }

    pub fn exercise(&self, exercise_id: Uuid) -> Option<&SessionExercise> {
        self.exercises.iter().find(|e| e.target.id == exercise_id)
    }

    /// First exercise in plan order that still has sets left
    pub fn next_exercise(&self) -> Option<&SessionExercise> {
        self.exercises.iter().find(|e| !e.is_done())
    }

    /// Every set performed so far, in completion order per exercise
    pub fn outcomes(&self) -> impl Iterator<Item = &SetOutcome> {
        self.exercises.iter().flat_map(|e| e.sets.iter())
    }

    /// True when every exercise reached its target sets
    pub fn is_done(&self) -> bool {
        self.exercises.iter().all(SessionExercise::is_done)
    }

    /// Complete the next set of an exercise.
    ///
    /// `reps` defaults to the midpoint of the planned rep range.
    pub fn complete_set(
        &mut self,
        exercise_id: Uuid,
        reps: Option<u32>,
        today: NaiveDate,
    ) -> Result<SetCompletion> {
        let exercise = self
            .exercises
            .iter_mut()
            .find(|e| e.target.id == exercise_id)
            .ok_or_else(|| Error::Session(format!("Exercise {} is not in this session", exercise_id)))?;

        if exercise.is_done() {
            return Err(Error::Session(format!(
                "All {} sets of {} are already complete",
                exercise.target.target_sets, exercise.target.exercise_name
            )));
        }

        let target = &exercise.target;
        let reps = reps.unwrap_or_else(|| target.target_rep_range.midpoint());
        let weight = exercise.working_weight;
        let set_index = exercise.sets_completed() + 1;

        let record = WorkoutRecord {
            id: Uuid::new_v4(),
            date: today,
            muscle_group: target.muscle_group,
            exercise_name: target.exercise_name.clone(),
            weight,
            reps,
            sets: 1,
            estimated_1rm: Some(calculate_1rm(weight, reps)),
        };
        let rest = rest_seconds(&target.exercise_name);

        exercise.sets.push(SetOutcome {
            exercise_id,
            set_index,
            reps,
            weight,
        });

        tracing::debug!(
            "Set {}/{} of {}: {} x {}",
            set_index,
            exercise.target.target_sets,
            exercise.target.exercise_name,
            weight,
            reps
        );

        let progression = if exercise.is_done() {
            let target = &exercise.target;
            Some(suggest_progression(
                target.target_rep_range,
                target.phase,
                weight,
                exercise.min_reps(),
                exercise.sets_completed(),
                target.target_sets,
            ))
        } else {
            None
        };

        Ok(SetCompletion {
            record,
            set_index,
            rest_seconds: rest,
            progression,
        })
    }
}
