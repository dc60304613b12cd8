use ascend_core::catalog::{self, CanonicalLift};
use ascend_core::coach::{self, ChatMessage, CoachContext};
use ascend_core::csv_rollup;
use ascend_core::history::records_for_exercise;
use ascend_core::progression::apply_suggestion;
use ascend_core::strength::strength_curve;
use ascend_core::*;
use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ascend")]
#[command(about = "Strength training tracker with double progression and tiers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show or update the profile
    Profile {
        #[arg(long)]
        username: Option<String>,

        /// Height in centimetres
        #[arg(long)]
        height: Option<f64>,

        /// Bodyweight in kilograms
        #[arg(long)]
        weight: Option<f64>,

        /// Training path (shred, strength, hybrid)
        #[arg(long)]
        path: Option<String>,

        /// Workout split (ppl, upper_lower, bro_split, full_body, custom); resets the schedule
        #[arg(long)]
        split: Option<String>,

        /// Gym experience (beginner, experienced)
        #[arg(long)]
        experience: Option<String>,
    },

    /// Manage the weekly plan
    Plan {
        #[command(subcommand)]
        action: PlanAction,
    },

    /// Log a workout by hand
    Log {
        #[arg(long)]
        exercise: String,

        /// Muscle group; looked up in the catalog when omitted
        #[arg(long)]
        muscle: Option<String>,

        #[arg(long)]
        weight: f64,

        /// Reps performed, or a rep range such as 8-10 to log its midpoint
        #[arg(long)]
        reps: String,

        #[arg(long, default_value_t = 1)]
        sets: u32,

        /// Workout date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Run a guided session for a day's plan
    Session {
        /// Day to train, defaults to today's weekday
        #[arg(long)]
        day: Option<String>,

        /// Dry run - show the plan and hints without logging
        #[arg(long)]
        dry_run: bool,

        /// Auto-complete (for testing) - finish every set without prompting
        #[arg(long)]
        auto_complete: bool,

        /// Reps to record for auto-completed sets (defaults to the range midpoint)
        #[arg(long, requires = "auto_complete")]
        reps: Option<u32>,

        /// Session date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show best lifts, strength score and tier
    Stats {
        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or edit the weekly schedule
    Schedule {
        /// Day to change
        #[arg(long, requires = "workout")]
        day: Option<String>,

        /// Workout type for --day (push, pull, legs, upper, lower, full body, ..., rest)
        #[arg(long, requires = "day")]
        workout: Option<String>,

        /// Custom label for --day
        #[arg(long, requires = "day")]
        label: Option<String>,
    },

    /// List logged workouts, newest first
    History {
        #[arg(long)]
        exercise: Option<String>,

        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Print the chat request for the coach assistant
    Coach {
        #[arg(long)]
        message: String,

        /// JSON file with earlier chat turns
        #[arg(long)]
        history: Option<PathBuf>,
    },

    /// Roll up WAL workouts to CSV
    Rollup {
        /// Clean up processed WAL files after rollup
        #[arg(long)]
        cleanup: bool,
    },
}

#[derive(Subcommand)]
enum PlanAction {
    /// Add a planned exercise
    Add {
        #[arg(long)]
        day: String,

        #[arg(long)]
        exercise: String,

        /// Muscle group; looked up in the catalog when omitted
        #[arg(long)]
        muscle: Option<String>,

        #[arg(long, default_value_t = 3)]
        sets: u32,

        /// Rep range (2-4, 4-6, 6-8, 8-10, 10-12, 12-15, 15+)
        #[arg(long)]
        reps: String,

        /// Working weight in kg, in steps of 2.5
        #[arg(long)]
        weight: f64,
    },

    /// Change a planned exercise's sets, rep range or weight
    Edit {
        id: uuid::Uuid,

        #[arg(long)]
        sets: Option<u32>,

        /// New rep range
        #[arg(long)]
        reps: Option<String>,

        /// New working weight in kg, in steps of 2.5
        #[arg(long)]
        weight: Option<f64>,
    },

    /// Remove a planned exercise by id
    Remove { id: uuid::Uuid },

    /// Show the plan
    Show {
        #[arg(long)]
        day: Option<String>,
    },
}

/// File locations under the data directory
struct DataPaths {
    wal_dir: PathBuf,
    wal: PathBuf,
    state: PathBuf,
    csv: PathBuf,
}

impl DataPaths {
    fn new(data_dir: &Path) -> Self {
        let wal_dir = data_dir.join("wal");
        Self {
            wal: wal_dir.join("workouts.wal"),
            state: wal_dir.join("state.json"),
            csv: data_dir.join("workouts.csv"),
            wal_dir,
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    ascend_core::logging::init();

    let errors = catalog::validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::Other("Invalid exercise catalog".into()));
    }

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Using data directory {:?}", data_dir);
    let paths = DataPaths::new(&data_dir);

    match cli.command {
        Commands::Profile {
            username,
            height,
            weight,
            path,
            split,
            experience,
        } => cmd_profile(&paths, username, height, weight, path, split, experience),
        Commands::Plan { action } => cmd_plan(&paths, action),
        Commands::Log {
            exercise,
            muscle,
            weight,
            reps,
            sets,
            date,
        } => cmd_log(&paths, exercise, muscle, weight, &reps, sets, date),
        Commands::Session {
            day,
            dry_run,
            auto_complete,
            reps,
            date,
        } => cmd_session(&paths, &config, day, dry_run, auto_complete, reps, date),
        Commands::Stats { json } => cmd_stats(&paths, json),
        Commands::Schedule {
            day,
            workout,
            label,
        } => cmd_schedule(&paths, day, workout, label),
        Commands::History { exercise, limit } => cmd_history(&paths, exercise, limit),
        Commands::Coach { message, history } => cmd_coach(&paths, &config, &message, history),
        Commands::Rollup { cleanup } => cmd_rollup(&paths, cleanup),
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Muscle group from the flag, or from the catalog by exercise name
fn resolve_muscle(exercise: &str, muscle: Option<String>) -> Result<MuscleGroup> {
    match muscle {
        Some(m) => m.parse(),
        None => catalog::muscle_group_of(exercise).ok_or_else(|| {
            Error::Plan(format!(
                "{} is not in the exercise catalog, pass --muscle",
                exercise
            ))
        }),
    }
}

fn cmd_profile(
    paths: &DataPaths,
    username: Option<String>,
    height: Option<f64>,
    weight: Option<f64>,
    path: Option<String>,
    split: Option<String>,
    experience: Option<String>,
) -> Result<()> {
    for (name, value) in [("height", height), ("weight", weight)] {
        if value.is_some_and(|v| !v.is_finite() || v < 0.0) {
            return Err(Error::Plan(format!("{} must not be negative", name)));
        }
    }
    let path: Option<TrainingPath> = path.map(|p| p.parse()).transpose()?;
    let split: Option<WorkoutSplit> = split.map(|s| s.parse()).transpose()?;
    let experience: Option<GymExperience> = experience.map(|e| e.parse()).transpose()?;

    let changed = username.is_some()
        || height.is_some()
        || weight.is_some()
        || path.is_some()
        || split.is_some()
        || experience.is_some();

    let state = if changed {
        let (state, ()) = UserState::update(&paths.state, |state| {
            let profile = &mut state.profile;
            if let Some(u) = username {
                profile.username = Some(u);
            }
            if let Some(h) = height {
                profile.height_cm = h;
            }
            if let Some(w) = weight {
                profile.weight_kg = w;
            }
            if let Some(p) = path {
                profile.path = p;
            }
            if let Some(e) = experience {
                profile.experience = e;
            }
            if let Some(s) = split {
                profile.split = s;
                profile.schedule = Schedule::for_split(s);
            }
            Ok(())
        })?;
        println!("✓ Profile updated");
        state
    } else {
        UserState::load(&paths.state)?
    };

    let profile = &state.profile;
    println!();
    if let Some(ref name) = profile.username {
        println!("  Username:   {}", name);
    }
    println!("  Height:     {} cm", profile.height_cm);
    println!("  Weight:     {} kg", profile.weight_kg);
    println!("  Path:       {}", profile.path);
    println!("  Experience: {:?}", profile.experience);
    println!("  Split:      {:?}", profile.split);
    Ok(())
}

fn cmd_plan(paths: &DataPaths, action: PlanAction) -> Result<()> {
    match action {
        PlanAction::Add {
            day,
            exercise,
            muscle,
            sets,
            reps,
            weight,
        } => {
            let day: DayOfWeek = day.parse()?;
            let rep_range: RepRange = reps.parse()?;
            let muscle = resolve_muscle(&exercise, muscle)?;
            let target = ExerciseTarget::new(day, exercise, muscle, sets, rep_range, weight)?;

            println!(
                "✓ Planned {} on {}: {} x {} @ {} kg",
                target.exercise_name, day, target.target_sets, rep_range, target.target_weight
            );
            println!("  id: {}", target.id);

            UserState::update(&paths.state, |state| {
                state.plan.push(target);
                Ok(())
            })?;
        }

        PlanAction::Edit {
            id,
            sets,
            reps,
            weight,
        } => {
            if sets.is_none() && reps.is_none() && weight.is_none() {
                return Err(Error::Plan("Nothing to change: pass --sets, --reps or --weight".into()));
            }
            let rep_range = reps.map(|r| r.parse::<RepRange>()).transpose()?;

            let (_, target) = UserState::update(&paths.state, |state| {
                let target = state
                    .target_mut(id)
                    .ok_or_else(|| Error::Plan(format!("No planned exercise with id {}", id)))?;
                target.edit(sets, rep_range, weight)?;
                Ok(target.clone())
            })?;

            println!(
                "✓ Updated {} on {}: {} x {} @ {} kg",
                target.exercise_name, target.day, target.target_sets, target.target_rep_range, target.target_weight
            );
        }

        PlanAction::Remove { id } => {
            let (_, removed) = UserState::update(&paths.state, |state| Ok(state.remove_target(id)))?;
            if !removed {
                return Err(Error::Plan(format!("No planned exercise with id {}", id)));
            }
            println!("✓ Removed {}", id);
        }

        PlanAction::Show { day } => {
            let state = UserState::load(&paths.state)?;
            let days = match day {
                Some(d) => vec![d.parse::<DayOfWeek>()?],
                None => DayOfWeek::ALL.to_vec(),
            };

            let mut shown = 0;
            for day in days {
                let targets = state.plan_for_day(day);
                if targets.is_empty() {
                    continue;
                }
                println!("\n{}", day);
                for t in targets {
                    println!(
                        "  {} | {} x {} @ {} kg ({}) [{}]",
                        t.exercise_name, t.target_sets, t.target_rep_range, t.target_weight, t.phase, t.id
                    );
                    shown += 1;
                }
            }

            if shown == 0 {
                println!("No exercises planned.");
            }
        }
    }
    Ok(())
}

fn cmd_log(
    paths: &DataPaths,
    exercise: String,
    muscle: Option<String>,
    weight: f64,
    reps: &str,
    sets: u32,
    date: Option<NaiveDate>,
) -> Result<()> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(Error::Plan("Weight must not be negative".into()));
    }
    if sets == 0 {
        return Err(Error::Plan("Sets must be at least 1".into()));
    }

    // A range logs its midpoint
    let reps = match reps.parse::<RepRange>() {
        Ok(range) => range.midpoint(),
        Err(_) => reps
            .trim()
            .parse::<u32>()
            .map_err(|_| Error::InvalidRepRange(reps.to_string()))?,
    };

    let muscle_group = resolve_muscle(&exercise, muscle)?;
    let record = WorkoutRecord {
        id: uuid::Uuid::new_v4(),
        date: date.unwrap_or_else(today),
        muscle_group,
        exercise_name: exercise,
        weight,
        reps,
        sets,
        estimated_1rm: Some(calculate_1rm(weight, reps)),
    };

    let mut sink = JsonlSink::new(&paths.wal);
    sink.append(&record)?;

    println!(
        "✓ Logged {} {} kg x {} ({} sets), est. 1RM {} kg",
        record.exercise_name,
        record.weight,
        record.reps,
        record.sets,
        record.estimated_1rm.unwrap_or_default()
    );
    Ok(())
}

fn cmd_session(
    paths: &DataPaths,
    config: &Config,
    day: Option<String>,
    dry_run: bool,
    auto_complete: bool,
    reps: Option<u32>,
    date: Option<NaiveDate>,
) -> Result<()> {
    let date = date.unwrap_or_else(today);
    let day = match day {
        Some(d) => d.parse()?,
        None => DayOfWeek::from(date.weekday()),
    };

    let mut state = UserState::load(&paths.state)?;
    let history = load_history(&paths.wal, &paths.csv)?;
    let mut session = ActiveSession::start(&state, day, &history, date, &config.session);

    if session.exercises().is_empty() {
        let scheduled = state.profile.schedule.get(day);
        println!("Nothing planned for {} ({}).", day, scheduled.display_label());
        return Ok(());
    }

    display_session(&session);

    if dry_run {
        println!("\n[Dry run - not logging session]");
        return Ok(());
    }

    let mut sink = JsonlSink::new(&paths.wal);

    while let Some(exercise) = session.next_exercise() {
        let id = exercise.target.id;
        let name = exercise.target.exercise_name.clone();
        let set_number = exercise.sets_completed() + 1;
        let target_sets = exercise.target.target_sets;
        let range = exercise.target.target_rep_range;

        let set_reps = if auto_complete {
            reps
        } else {
            match prompt_reps(&name, set_number, target_sets, range)? {
                RepsInput::Quit => {
                    println!("\nSession stopped early.");
                    break;
                }
                RepsInput::Reps(r) => r,
            }
        };

        let done = session.complete_set(id, set_reps, date)?;
        sink.append(&done.record)?;

        println!(
            "✓ {} set {}/{}: {} kg x {} | rest {}s",
            name, done.set_index, target_sets, done.record.weight, done.record.reps, done.rest_seconds
        );

        if let Some(suggestion) = done.progression {
            if let Some(target) = state.target_mut(id) {
                apply_suggestion(target, &suggestion);
            }
            println!(
                "  → {} (next: {} @ {} kg)",
                suggestion.message, suggestion.suggested_rep_range, suggestion.suggested_weight
            );
        }
    }

    state.save(&paths.state)?;

    let sets = session.outcomes().count();
    if session.is_done() {
        println!("\n✓ Session complete! {} sets logged.", sets);
    } else {
        println!("\n{} sets logged.", sets);
    }
    Ok(())
}

fn display_session(session: &ActiveSession) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {} SESSION", session.day().as_str().to_uppercase());
    println!("╰─────────────────────────────────────────╯");

    for exercise in session.exercises() {
        let t = &exercise.target;
        println!();
        println!("  {}", t.exercise_name);
        println!(
            "  → {} x {} @ {} kg",
            t.target_sets, t.target_rep_range, exercise.working_weight
        );
        if let Some(ref hint) = exercise.hint {
            println!("  ★ {}", hint.message);
        }
    }
    println!();
}

enum RepsInput {
    Reps(Option<u32>),
    Quit,
}

fn prompt_reps(name: &str, set: u32, target_sets: u32, range: RepRange) -> Result<RepsInput> {
    println!("─────────────────────────────────────────");
    println!("{} set {}/{} ({} reps)", name, set, target_sets, range);
    println!("  Enter reps, blank for {}, 'q' to stop", range.midpoint());
    print!("> ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let input = input.trim();
    if input.eq_ignore_ascii_case("q") {
        return Ok(RepsInput::Quit);
    }
    if input.is_empty() {
        return Ok(RepsInput::Reps(None));
    }

    match input.parse::<u32>() {
        Ok(r) => Ok(RepsInput::Reps(Some(r))),
        Err(_) => {
            eprintln!("Not a number, using {}", range.midpoint());
            Ok(RepsInput::Reps(None))
        }
    }
}

fn cmd_stats(paths: &DataPaths, json: bool) -> Result<()> {
    let state = UserState::load(&paths.state)?;
    let history = load_history(&paths.wal, &paths.csv)?;
    let snapshot = StrengthSnapshot::compute(&history, &state.profile);

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!("\nBest lifts (1RM)");
    for lift in CanonicalLift::ALL {
        let marker = if snapshot.lifts.is_estimated(lift) {
            " (estimated)"
        } else {
            ""
        };
        println!("  {:<9} {} kg{}", lift.label(), snapshot.lifts.get(lift), marker);
    }

    println!();
    println!("  Strength score: {}", snapshot.total_strength_score);
    println!("  BMI:            {}", snapshot.bmi);
    println!("  Path:           {}", state.profile.path);
    println!("  Tier:           {} ({}%)", snapshot.tier.name, snapshot.tier.progress);
    match snapshot.tier.next_tier {
        Some(next) => println!("  Next tier:      {}", next),
        None => println!("  Top tier reached"),
    }

    let curve = strength_curve(&history, state.profile.weight_kg);
    if !curve.is_empty() {
        println!("\nStrength curve");
        for point in curve {
            println!("  {}  {}", point.date, point.score);
        }
    }
    Ok(())
}

fn cmd_schedule(
    paths: &DataPaths,
    day: Option<String>,
    workout: Option<String>,
    label: Option<String>,
) -> Result<()> {
    let state = match (day, workout) {
        (Some(day), Some(workout)) => {
            let day: DayOfWeek = day.parse()?;
            let workout: WorkoutType = workout.parse()?;
            let (state, ()) = UserState::update(&paths.state, |state| {
                state.profile.schedule.set(day, workout, label);
                Ok(())
            })?;
            println!("✓ {} set to {}", day, workout);
            state
        }
        _ => UserState::load(&paths.state)?,
    };

    let schedule = &state.profile.schedule;
    println!("\nWeek");
    for day in DayOfWeek::ALL {
        println!("  {:<10} {}", day, schedule.get(day).display_label());
    }

    let today = schedule.today(today());
    println!();
    if today.is_rest {
        println!("Today ({}): rest day", today.day);
    } else {
        let groups: Vec<_> = today.muscle_groups.iter().map(|g| g.as_str()).collect();
        println!("Today ({}): {} [{}]", today.day, today.label, groups.join(", "));
    }
    Ok(())
}

fn cmd_history(paths: &DataPaths, exercise: Option<String>, limit: usize) -> Result<()> {
    let history = load_history(&paths.wal, &paths.csv)?;
    let records: Vec<&WorkoutRecord> = match exercise {
        Some(ref name) => records_for_exercise(&history, name),
        None => history.iter().collect(),
    };

    if records.is_empty() {
        println!("No workouts logged.");
        return Ok(());
    }

    for r in records.into_iter().take(limit) {
        println!(
            "{}  {:<28} {} kg x {} ({} sets) [{}]",
            r.date, r.exercise_name, r.weight, r.reps, r.sets, r.muscle_group
        );
    }
    Ok(())
}

fn cmd_coach(
    paths: &DataPaths,
    config: &Config,
    message: &str,
    history_path: Option<PathBuf>,
) -> Result<()> {
    let state = UserState::load(&paths.state)?;
    let history = load_history(&paths.wal, &paths.csv)?;

    let turns: Vec<ChatMessage> = match history_path {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => Vec::new(),
    };

    let ctx = CoachContext::build(&state, &history, config.coach.recent_workouts);
    let request = coach::build_request(message, &turns, &ctx, &config.coach)?;

    println!("{}", serde_json::to_string_pretty(&request)?);
    Ok(())
}

fn cmd_rollup(paths: &DataPaths, cleanup: bool) -> Result<()> {
    if !paths.wal.exists() {
        println!("No WAL file found - nothing to roll up.");
        return Ok(());
    }

    let count = csv_rollup::wal_to_csv_and_archive(&paths.wal, &paths.csv)?;

    println!("✓ Rolled up {} workouts to CSV", count);
    println!("  CSV: {}", paths.csv.display());

    if cleanup {
        let cleaned = csv_rollup::cleanup_processed_wals(&paths.wal_dir)?;
        if cleaned > 0 {
            println!("✓ Cleaned up {} processed WAL files", cleaned);
        }
    }

    Ok(())
}
