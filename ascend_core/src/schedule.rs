//! Weekly training split.
//!
//! Each weekday is assigned a workout type (Push, Legs, Rest, ...) with an
//! optional display label. Stored schedules come in a few historical shapes,
//! all accepted by [`Schedule::from_json`].

use crate::{DayOfWeek, Error, MuscleGroup, Result, WorkoutSplit};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Kind of session a day is assigned
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkoutType {
    Push,
    Pull,
    Legs,
    Upper,
    Lower,
    #[serde(rename = "Full Body")]
    FullBody,
    Chest,
    Back,
    Shoulders,
    Arms,
    Core,
    Custom,
    Rest,
}

impl WorkoutType {
    pub const ALL: [WorkoutType; 13] = [
        WorkoutType::Push,
        WorkoutType::Pull,
        WorkoutType::Legs,
        WorkoutType::Upper,
        WorkoutType::Lower,
        WorkoutType::FullBody,
        WorkoutType::Chest,
        WorkoutType::Back,
        WorkoutType::Shoulders,
        WorkoutType::Arms,
        WorkoutType::Core,
        WorkoutType::Custom,
        WorkoutType::Rest,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WorkoutType::Push => "Push",
            WorkoutType::Pull => "Pull",
            WorkoutType::Legs => "Legs",
            WorkoutType::Upper => "Upper",
            WorkoutType::Lower => "Lower",
            WorkoutType::FullBody => "Full Body",
            WorkoutType::Chest => "Chest",
            WorkoutType::Back => "Back",
            WorkoutType::Shoulders => "Shoulders",
            WorkoutType::Arms => "Arms",
            WorkoutType::Core => "Core",
            WorkoutType::Custom => "Custom",
            WorkoutType::Rest => "Rest",
        }
    }

    /// Muscle groups trained on a day of this type
    pub fn muscle_groups(self) -> &'static [MuscleGroup] {
        use MuscleGroup::*;
        match self {
            WorkoutType::Push => &[Chest, Shoulders, Triceps],
            WorkoutType::Pull => &[Back, Biceps],
            WorkoutType::Legs => &[Legs, Calves],
            WorkoutType::Upper => &[Chest, Back, Shoulders, Biceps, Triceps],
            WorkoutType::Lower => &[Legs, Calves, Core],
            WorkoutType::FullBody => &[Chest, Back, Shoulders, Legs, Core],
            WorkoutType::Chest => &[Chest],
            WorkoutType::Back => &[Back],
            WorkoutType::Shoulders => &[Shoulders],
            WorkoutType::Arms => &[Biceps, Triceps],
            WorkoutType::Core => &[Core],
            WorkoutType::Custom | WorkoutType::Rest => &[],
        }
    }

    fn default_label(self) -> String {
        format!("{} Day", self.as_str())
    }
}

impl fmt::Display for WorkoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkoutType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        WorkoutType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().replace(' ', "").to_lowercase() == wanted)
            .ok_or_else(|| Error::Plan(format!("Unknown workout type: {}", s)))
    }
}

/// One day's assignment
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScheduledDay {
    #[serde(rename = "type")]
    pub workout_type: WorkoutType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ScheduledDay {
    fn rest() -> Self {
        Self {
            workout_type: WorkoutType::Rest,
            label: None,
        }
    }

    fn labelled(workout_type: WorkoutType) -> Self {
        Self {
            workout_type,
            label: Some(workout_type.default_label()),
        }
    }

    /// Label to show, falling back to the type name
    pub fn display_label(&self) -> &str {
        self.label
            .as_deref()
            .unwrap_or_else(|| self.workout_type.as_str())
    }
}

/// Today's resolved workout
#[derive(Clone, Debug, PartialEq)]
pub struct TodayWorkout {
    pub day: DayOfWeek,
    pub workout_type: WorkoutType,
    pub label: String,
    pub muscle_groups: &'static [MuscleGroup],
    pub is_rest: bool,
}

/// A non-rest day in the week
#[derive(Clone, Debug, PartialEq)]
pub struct WorkoutDay {
    pub day: DayOfWeek,
    pub workout_type: WorkoutType,
    pub label: String,
}

/// Weekday → assignment. Missing days are rest days.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Schedule {
    days: BTreeMap<DayOfWeek, ScheduledDay>,
}

impl Default for Schedule {
    fn default() -> Self {
        Schedule::for_split(WorkoutSplit::Custom)
    }
}

impl Schedule {
    /// Default week for a split, each day labelled "<Type> Day"
    pub fn for_split(split: WorkoutSplit) -> Self {
        use WorkoutType::*;
        let week: [WorkoutType; 7] = match split {
            WorkoutSplit::Ppl => [Push, Pull, Legs, Push, Pull, Legs, Rest],
            WorkoutSplit::UpperLower => [Upper, Lower, Rest, Upper, Lower, Rest, Rest],
            WorkoutSplit::BroSplit => [Chest, Back, Shoulders, Arms, Legs, Core, Rest],
            WorkoutSplit::FullBody => [FullBody, Rest, FullBody, Rest, FullBody, Rest, Rest],
            WorkoutSplit::Custom => [Rest; 7],
        };

        let days = DayOfWeek::ALL
            .iter()
            .zip(week)
            .map(|(day, t)| (*day, ScheduledDay::labelled(t)))
            .collect();

        Self { days }
    }

    /// Parse a stored schedule.
    ///
    /// Accepts null (split default), legacy `{"Monday": "Push"}` maps and
    /// `{"Monday": {"type": "Push", "label": "..."}}` maps, including the
    /// doubly-nested `type`/`label` objects older clients wrote. Unknown
    /// workout types become rest days.
    pub fn from_json(raw: &Value, split: WorkoutSplit) -> Self {
        let map = match raw {
            Value::Object(map) => map,
            Value::Null => return Self::for_split(split),
            other => {
                tracing::warn!("Unexpected schedule shape {}, using split default", other);
                return Self::for_split(split);
            }
        };

        let mut days = BTreeMap::new();
        for (key, value) in map {
            let day = match key.parse::<DayOfWeek>() {
                Ok(day) => day,
                Err(_) => {
                    tracing::warn!("Ignoring unknown schedule day {:?}", key);
                    continue;
                }
            };
            days.insert(day, parse_day(value));
        }

        Self { days }
    }

    /// Assignment for a day (rest if unassigned)
    pub fn get(&self, day: DayOfWeek) -> ScheduledDay {
        self.days.get(&day).cloned().unwrap_or_else(ScheduledDay::rest)
    }

    /// Replace a day's assignment
    pub fn set(&mut self, day: DayOfWeek, workout_type: WorkoutType, label: Option<String>) {
        self.days.insert(day, ScheduledDay { workout_type, label });
    }

    /// Resolve the workout for a calendar date
    pub fn today(&self, date: NaiveDate) -> TodayWorkout {
        let day = DayOfWeek::from(date.weekday());
        let entry = self.get(day);
        TodayWorkout {
            day,
            workout_type: entry.workout_type,
            label: entry.display_label().to_string(),
            muscle_groups: entry.workout_type.muscle_groups(),
            is_rest: entry.workout_type == WorkoutType::Rest,
        }
    }

    /// Non-rest days in week order
    pub fn workout_days(&self) -> Vec<WorkoutDay> {
        DayOfWeek::ALL
            .iter()
            .map(|day| (*day, self.get(*day)))
            .filter(|(_, entry)| entry.workout_type != WorkoutType::Rest)
            .map(|(day, entry)| WorkoutDay {
                day,
                workout_type: entry.workout_type,
                label: entry.display_label().to_string(),
            })
            .collect()
    }
}

impl<'de> Deserialize<'de> for Schedule {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        Ok(Schedule::from_json(&raw, WorkoutSplit::Custom))
    }
}

fn parse_type(value: Option<&Value>) -> WorkoutType {
    let name = match value {
        Some(Value::String(s)) => s.as_str(),
        Some(Value::Object(inner)) => inner.get("type").and_then(Value::as_str).unwrap_or("Rest"),
        _ => "Rest",
    };
    name.parse().unwrap_or_else(|_| {
        tracing::warn!("Unknown workout type {:?}, treating as rest", name);
        WorkoutType::Rest
    })
}

fn parse_day(value: &Value) -> ScheduledDay {
    match value {
        Value::String(_) => {
            let workout_type = parse_type(Some(value));
            ScheduledDay::labelled(workout_type)
        }
        Value::Object(entry) => {
            let workout_type = parse_type(entry.get("type"));
            let label = match entry.get("label") {
                Some(Value::String(s)) => Some(s.clone()),
                Some(Value::Object(inner)) => inner
                    .get("label")
                    .or_else(|| inner.get("type"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .or_else(|| Some(workout_type.as_str().to_string())),
                _ => None,
            };
            ScheduledDay { workout_type, label }
        }
        _ => ScheduledDay::rest(),
    }
}
