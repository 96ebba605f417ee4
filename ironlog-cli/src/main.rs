use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use log::debug;
use serde::Serialize;

use ironlog::db::models::SetField;
use ironlog::logging;
use ironlog::session::{SaveOutcome, SessionScreen};
use ironlog::views::SessionExercise;
use ironlog::{Config, Database, SqliteWorkoutRepository, WorkoutService};

type Service = WorkoutService<SqliteWorkoutRepository>;

#[derive(Parser, Debug)]
#[command(version, about = "Ironlog - Strength Training Tracker CLI", long_about = None)]
struct Args {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List all workout plans
    Plans,
    Plan {
        #[command(subcommand)]
        command: PlanCommand,
    },
    /// List the workouts of a plan
    Workouts { plan: i32 },
    Workout {
        #[command(subcommand)]
        command: WorkoutCommand,
    },
    /// Show a workout session
    Show {
        workout: i32,
        /// Show the lighter deload variant instead
        #[arg(long)]
        deload: bool,
    },
    Exercise {
        #[command(subcommand)]
        command: ExerciseCommand,
    },
    /// List the exercise catalog
    Exercises,
    Set {
        #[command(subcommand)]
        command: SetCommand,
    },
    /// Finish a regular session: resolve weights, save sets, count the session
    Finish { workout: i32 },
    Deload {
        #[command(subcommand)]
        command: DeloadCommand,
    },
    Orm {
        #[command(subcommand)]
        command: OrmCommand,
    },
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum PlanCommand {
    Add { name: String },
    Rename { id: i32, name: String },
    /// Remove a plan with its workouts, links and sets
    Rm { id: i32 },
}

#[derive(Subcommand, Debug)]
enum WorkoutCommand {
    Add { plan: i32, name: String },
    Rename { id: i32, name: String },
    Rm { id: i32 },
}

#[derive(Subcommand, Debug)]
enum ExerciseCommand {
    /// Create a catalog exercise, optionally straight into a workout
    Add {
        name: String,
        #[arg(short, long)]
        workout: Option<i32>,
        #[arg(short, long, default_value_t = 3)]
        sets: i32,
    },
    /// Link an existing exercise to a workout
    Link {
        exercise: i32,
        workout: i32,
        #[arg(short, long, default_value_t = 3)]
        sets: i32,
    },
    Rename { id: i32, name: String },
    /// Remove from the catalog, or only from a workout with --link
    Rm {
        id: i32,
        #[arg(long)]
        link: bool,
    },
}

#[derive(Subcommand, Debug)]
enum SetCommand {
    Add { workout_exercise: i32, set_number: i32 },
    /// Save one field (weight, reps, rir, percentage) of a set
    Edit {
        workout: i32,
        set: i32,
        field: String,
        value: f64,
    },
    Rm { id: i32 },
}

#[derive(Subcommand, Debug)]
enum DeloadCommand {
    /// Finish a deload session: sets are discarded, the counter is reset
    Finish { workout: i32 },
}

#[derive(Subcommand, Debug)]
enum OrmCommand {
    List,
    Set { exercise: i32, weight: f64 },
    Rm { id: i32 },
}

#[derive(Subcommand, Debug)]
enum SettingsCommand {
    Show,
    Set {
        #[arg(long)]
        enabled: bool,
        #[arg(long, default_value_t = 0)]
        every: i32,
    },
}

struct Output {
    json: bool,
}

impl Output {
    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", text());
        }
        Ok(())
    }

    fn done(&self, message: String) -> Result<()> {
        self.emit(&serde_json::json!({ "ok": true }), || message)
    }
}

fn require_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        bail!("name must not be empty");
    }
    Ok(name)
}

fn require_set_count(count: i32) -> Result<i32> {
    if count < 1 {
        bail!("set count must be at least 1, got {}", count);
    }
    Ok(count)
}

fn render_session(exercises: &[SessionExercise]) -> String {
    if exercises.is_empty() {
        return "No exercises in this workout".to_string();
    }
    let mut lines = Vec::new();
    for exercise in exercises {
        lines.push(format!(
            "[{}] {} (exercise {})",
            exercise.workout_exercise_id, exercise.exercise.name, exercise.exercise.id
        ));
        for set in &exercise.sets {
            lines.push(format!("  ({}) {}", set.id, set));
        }
    }
    lines.join("\n")
}

async fn show(service: &Service, out: &Output, workout: i32, deload: bool) -> Result<()> {
    let mut screen = SessionScreen::open(service, workout)
        .await
        .with_context(|| format!("workout {} not found", workout))?;

    if deload {
        let exercises = screen.deloaded_exercises().await?;
        return out.emit(&exercises, || {
            format!("{} (deload)\n{}", screen.workout().name, render_session(&exercises))
        });
    }

    let prompt = screen.take_deload_prompt();
    let exercises = screen.exercises();
    out.emit(&exercises, || {
        let mut text = format!(
            "{} (session {})\n{}",
            screen.workout().name,
            screen.workout().counter,
            render_session(exercises)
        );
        if prompt {
            text.push_str("\nA deload session is due. Run with --deload to see it.");
        }
        text
    })
}

async fn run(service: &Service, out: &Output, command: Commands) -> Result<()> {
    match command {
        Commands::Plans => {
            let plans = service.get_workout_plans().await?;
            out.emit(&plans, || {
                plans
                    .iter()
                    .map(|p| format!("{:>4}  {}", p.id, p.name))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
        Commands::Plan { command } => match command {
            PlanCommand::Add { name } => {
                let id = service.create_workout_plan(require_name(&name)?).await?;
                out.emit(&id, || format!("Created plan {}", id))
            }
            PlanCommand::Rename { id, name } => {
                service.rename_workout_plan(id, require_name(&name)?).await?;
                out.done(format!("Renamed plan {}", id))
            }
            PlanCommand::Rm { id } => {
                service.remove_workout_plan(id).await?;
                out.done(format!("Removed plan {}", id))
            }
        },
        Commands::Workouts { plan } => {
            let workouts = service.get_workouts_of_workout_plan(plan).await?;
            out.emit(&workouts, || {
                workouts
                    .iter()
                    .map(|w| format!("{:>4}  {} (session {})", w.id, w.name, w.counter))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
        Commands::Workout { command } => match command {
            WorkoutCommand::Add { plan, name } => {
                if service.get_workout_plan(plan).await?.is_none() {
                    bail!("plan {} not found", plan);
                }
                let id = service.create_workout(require_name(&name)?, plan).await?;
                out.emit(&id, || format!("Created workout {}", id))
            }
            WorkoutCommand::Rename { id, name } => {
                service.rename_workout(id, require_name(&name)?).await?;
                out.done(format!("Renamed workout {}", id))
            }
            WorkoutCommand::Rm { id } => {
                service.remove_workout(id).await?;
                out.done(format!("Removed workout {}", id))
            }
        },
        Commands::Show { workout, deload } => show(service, out, workout, deload).await,
        Commands::Exercise { command } => match command {
            ExerciseCommand::Add {
                name,
                workout: Some(workout),
                sets,
            } => {
                let created = service
                    .create_exercise_for_workout(
                        require_name(&name)?,
                        workout,
                        require_set_count(sets)?,
                    )
                    .await?;
                out.emit(&created, || {
                    format!(
                        "Created exercise {} in workout {} with {} sets",
                        created.exercise_id,
                        workout,
                        created.set_ids.len()
                    )
                })
            }
            ExerciseCommand::Add {
                name,
                workout: None,
                ..
            } => {
                let id = service.create_exercise(require_name(&name)?).await?;
                out.emit(&id, || format!("Created exercise {}", id))
            }
            ExerciseCommand::Link {
                exercise,
                workout,
                sets,
            } => {
                let created = service
                    .add_exercise_to_workout(exercise, workout, require_set_count(sets)?)
                    .await?;
                out.emit(&created, || {
                    format!(
                        "Linked exercise {} to workout {} as {}",
                        exercise, workout, created.workout_exercise_id
                    )
                })
            }
            ExerciseCommand::Rename { id, name } => {
                service.rename_exercise(id, require_name(&name)?).await?;
                out.done(format!("Renamed exercise {}", id))
            }
            ExerciseCommand::Rm { id, link: true } => {
                service.remove_workout_exercise(id).await?;
                out.done(format!("Removed workout exercise {}", id))
            }
            ExerciseCommand::Rm { id, link: false } => {
                service.remove_exercise(id).await?;
                out.done(format!("Removed exercise {}", id))
            }
        },
        Commands::Exercises => {
            let exercises = service.get_exercises().await?;
            out.emit(&exercises, || {
                exercises
                    .iter()
                    .map(|e| format!("{:>4}  {}", e.id, e.name))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
        Commands::Set { command } => match command {
            SetCommand::Add {
                workout_exercise,
                set_number,
            } => {
                let id = service.add_set_to_exercise(set_number, workout_exercise).await?;
                out.emit(&id, || format!("Created set {}", id))
            }
            SetCommand::Edit {
                workout,
                set,
                field,
                value,
            } => {
                let field = SetField::parse(&field, value)?;
                let mut screen = SessionScreen::open(service, workout)
                    .await
                    .with_context(|| format!("workout {} not found", workout))?;
                let outcome = screen
                    .save_field(set, field)
                    .await
                    .with_context(|| format!("set {} is not part of workout {}", set, workout))?;
                out.emit(&outcome, || match outcome {
                    SaveOutcome::Written => format!("Saved {} of set {}", field.kind(), set),
                    SaveOutcome::Unchanged => {
                        format!("Set {} already has that {}", set, field.kind())
                    }
                    SaveOutcome::Locked => format!(
                        "Weight of set {} is derived from the one-rep max ({:.2}kg)",
                        set,
                        screen.derived_weight(set).unwrap_or_default()
                    ),
                })
            }
            SetCommand::Rm { id } => {
                service.remove_exercise_set(id).await?;
                out.done(format!("Removed set {}", id))
            }
        },
        Commands::Finish { workout } => {
            let mut screen = SessionScreen::open(service, workout)
                .await
                .with_context(|| format!("workout {} not found", workout))?;
            let outcome = screen.finish().await?;
            out.emit(&outcome, || {
                let mut text = format!(
                    "Finished workout {} (session {})",
                    workout, outcome.counter
                );
                if outcome.deload_due {
                    text.push_str("\nA deload session is due next.");
                }
                text
            })
        }
        Commands::Deload {
            command: DeloadCommand::Finish { workout },
        } => {
            let mut screen = SessionScreen::open(service, workout)
                .await
                .with_context(|| format!("workout {} not found", workout))?;
            screen.finish_deload().await?;
            out.done(format!("Finished deload of workout {}; counter reset", workout))
        }
        Commands::Orm { command } => match command {
            OrmCommand::List => {
                let orms = service.get_one_rep_maxes().await?;
                out.emit(&orms, || {
                    orms.iter()
                        .map(|o| format!("{:>4}  {}: {:.2}kg", o.id, o.name, o.weight))
                        .collect::<Vec<_>>()
                        .join("\n")
                })
            }
            OrmCommand::Set { exercise, weight } => {
                if !(weight.is_finite() && weight > 0.0) {
                    bail!("one-rep max must be a positive weight, got {}", weight);
                }
                let id = service.create_one_rep_max(exercise, weight).await?;
                out.emit(&id, || {
                    format!(
                        "One-rep max of exercise {} is now {:.2}kg",
                        exercise, weight
                    )
                })
            }
            OrmCommand::Rm { id } => {
                service.remove_one_rep_max(id).await?;
                out.done(format!("Removed one-rep max {}", id))
            }
        },
        Commands::Settings { command } => match command {
            SettingsCommand::Show => {
                let settings = service.get_settings().await?;
                out.emit(&settings, || {
                    format!(
                        "Deload: {} (every {} sessions)",
                        if settings.deload_enabled { "on" } else { "off" },
                        settings.deload_every_sessions
                    )
                })
            }
            SettingsCommand::Set { enabled, every } => {
                if enabled && every < 1 {
                    bail!("--every must be at least 1 when deload is enabled");
                }
                let settings = service.update_settings(enabled, every).await?;
                out.emit(&settings, || "Settings saved".to_string())
            }
        },
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();

    if !logging::set_log_level(&args.log_level) {
        bail!("unknown log level '{}'", args.log_level);
    }

    let config = Config::from_env()?;
    debug!("Opening database at {}", config.database_url);
    let db = Database::open(&config.database_url, config.pool_size)
        .with_context(|| format!("failed to open {}", config.database_url))?;
    let service = WorkoutService::new(SqliteWorkoutRepository::new(db), config.training);

    run(&service, &Output { json: args.json }, args.command).await
}
