//! Chat payloads for the coach assistant.
//!
//! The coach runs on an external chat-completion service. This module only
//! assembles the request body: a system prompt carrying the user's training
//! data, the prior conversation and the new message.

use crate::config::CoachConfig;
use crate::tiers::StrengthSnapshot;
use crate::{Error, Result, UserState, WorkoutRecord};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

const COACH_PERSONA: &str = "\
You are the training coach inside Ascend, a strength tracker that turns lifting into a \
tiered progression game. You know exercise technique, program design, nutrition, muscle \
anatomy, recovery and injury prevention.

The user's current numbers are listed below. Treat them as the source of truth:
- Refer to their real lifts, tier and path when you give advice.
- Read their recent workouts before suggesting changes to the routine.
- Point out concrete gains when you encourage them.

Keep answers short and specific. Use bullet points when they help. Send anything \
medical to a professional.";

/// Speaker of a chat turn
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One chat turn
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Request body for the completion service
#[derive(Clone, Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// A planned exercise as the coach sees it
#[derive(Clone, Debug, Serialize)]
pub struct RoutineEntry {
    pub day: String,
    pub exercise: String,
    pub sets: u32,
    pub reps: String,
}

/// A logged workout as the coach sees it
#[derive(Clone, Debug, Serialize)]
pub struct RecentWorkout {
    pub date: String,
    pub exercise: String,
    pub weight: f64,
    pub reps: u32,
    pub muscle_group: String,
}

/// Snapshot of the user's data embedded in the system prompt
#[derive(Clone, Debug, Serialize)]
pub struct CoachContext {
    pub path: String,
    pub tier: String,
    pub bmi: f64,
    pub squat: f64,
    pub bench: f64,
    pub deadlift: f64,
    pub routine: Vec<RoutineEntry>,
    pub recent_workouts: Vec<RecentWorkout>,
}

impl CoachContext {
    /// Build the context from saved state and history sorted newest first
    pub fn build(state: &UserState, history: &[WorkoutRecord], recent_limit: usize) -> Self {
        let snapshot = StrengthSnapshot::compute(history, &state.profile);

        let mut plan: Vec<_> = state.plan.iter().collect();
        plan.sort_by_key(|t| (t.day, t.created_at));
        let routine = plan
            .into_iter()
            .map(|t| RoutineEntry {
                day: t.day.to_string(),
                exercise: t.exercise_name.clone(),
                sets: t.target_sets,
                reps: t.target_rep_range.to_string(),
            })
            .collect();

        let recent_workouts = history
            .iter()
            .take(recent_limit)
            .map(|w| RecentWorkout {
                date: w.date.format("%Y-%m-%d").to_string(),
                exercise: w.exercise_name.clone(),
                weight: w.weight,
                reps: w.reps,
                muscle_group: w.muscle_group.to_string(),
            })
            .collect();

        Self {
            path: state.profile.path.to_string(),
            tier: snapshot.tier.name.to_string(),
            bmi: snapshot.bmi,
            squat: snapshot.lifts.squat_1rm,
            bench: snapshot.lifts.bench_1rm,
            deadlift: snapshot.lifts.deadlift_1rm,
            routine,
            recent_workouts,
        }
    }

    /// Full system prompt: persona followed by the user's data
    pub fn system_prompt(&self) -> String {
        let mut prompt = String::from(COACH_PERSONA);

        let _ = write!(
            prompt,
            "\n\nUSER DATA\n- Path: {}\n- Tier: {}\n- BMI: {}\n- Best lifts: Squat {}kg, Bench {}kg, Deadlift {}kg\n",
            self.path, self.tier, self.bmi, self.squat, self.bench, self.deadlift
        );

        prompt.push_str("\nPLANNED ROUTINE\n");
        if self.routine.is_empty() {
            prompt.push_str("  (nothing planned yet)\n");
        }
        for r in &self.routine {
            let _ = writeln!(prompt, "  * {}: {} ({} sets, {} reps)", r.day, r.exercise, r.sets, r.reps);
        }

        let _ = writeln!(prompt, "\nRECENT WORKOUTS (last {})", self.recent_workouts.len());
        if self.recent_workouts.is_empty() {
            prompt.push_str("  (no workouts logged yet)\n");
        }
        for w in &self.recent_workouts {
            let _ = writeln!(
                prompt,
                "  * {}: {} - {}kg x {} ({})",
                w.date, w.exercise, w.weight, w.reps, w.muscle_group
            );
        }

        prompt.push_str(
            "\nAnswer questions about the user's routine, history or progress from this data. \
             It is complete; never claim you cannot see it.",
        );
        prompt
    }
}

/// Assemble a chat request for the first configured model.
///
/// `history` holds earlier turns. A trailing user turn equal to `message` is
/// dropped so the new message is not sent twice.
pub fn build_request(
    message: &str,
    history: &[ChatMessage],
    ctx: &CoachContext,
    config: &CoachConfig,
) -> Result<ChatRequest> {
    let message = message.trim();
    if message.is_empty() {
        return Err(Error::Other("Message is required".into()));
    }

    let model = config
        .models
        .first()
        .cloned()
        .ok_or_else(|| Error::Config("No coach models configured".into()))?;

    let prior = match history.last() {
        Some(last) if last.role == Role::User && last.content.trim() == message => {
            &history[..history.len() - 1]
        }
        _ => history,
    };

    let mut messages = Vec::with_capacity(prior.len() + 2);
    messages.push(ChatMessage::new(Role::System, ctx.system_prompt()));
    messages.extend(
        prior
            .iter()
            .filter(|m| m.role != Role::System)
            .cloned(),
    );
    messages.push(ChatMessage::new(Role::User, message));

    tracing::debug!("Built coach request for {} with {} messages", model, messages.len());

    Ok(ChatRequest {
        model,
        messages,
        max_tokens: config.max_tokens,
        temperature: config.temperature,
    })
}
