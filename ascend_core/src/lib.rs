#![forbid(unsafe_code)]

//! Core domain model and business logic for Ascend.
//!
//! This crate provides:
//! - Domain types (planned exercises, workout records, profile, tiers)
//! - Double-progression engine and rest timers
//! - Strength scoring and training-path tiers
//! - Exercise catalog and weekly schedules
//! - Persistence (WAL, CSV, state)
//! - Guided sessions and coach chat payloads

pub mod types;
pub mod error;
pub mod rep_range;
pub mod catalog;
pub mod schedule;
pub mod config;
pub mod logging;
pub mod wal;
pub mod csv_rollup;
pub mod state;
pub mod strength;
pub mod tiers;
pub mod history;
pub mod progression;
pub mod session;
pub mod coach;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use rep_range::RepRange;
pub use schedule::{Schedule, ScheduledDay, WorkoutType};
pub use config::Config;
pub use wal::{JsonlSink, WorkoutSink};
pub use strength::{best_lifts, calculate_1rm, BestLifts};
pub use tiers::{tier_info, StrengthSnapshot};
pub use history::{load_history, load_recent_history};
pub use progression::{rest_seconds, suggest_progression, ProgressionSuggestion};
pub use session::{ActiveSession, SetCompletion};
