//! Workout orchestration service.
//!
//! `WorkoutService` is the one API the front end talks to. Each operation
//! composes one or more gateway calls; multi-step writes are issued in order
//! and are not atomic, so a failure part way through leaves the earlier steps
//! applied. Gateway errors are returned as they are.

mod exercises;
mod one_rep_max;
mod plans;
#[cfg(test)]
pub(crate) mod recording;
mod sets;
mod settings;

pub use exercises::CreatedWorkoutExercise;

use crate::config::TrainingConfig;
use crate::repository::WorkoutRepository;
use crate::training;

pub struct WorkoutService<R> {
    repo: R,
    training: TrainingConfig,
}

impl<R: WorkoutRepository> WorkoutService<R> {
    pub fn new(repo: R, training: TrainingConfig) -> Self {
        Self { repo, training }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn training(&self) -> &TrainingConfig {
        &self.training
    }

    /// Percentage-of-one-rep-max weight using the configured plate step.
    pub fn calculate_weight(&self, one_rep_max: f64, percentage: f64) -> f64 {
        training::calculate_weight(one_rep_max, percentage, self.training.plate_step)
    }
}

#[cfg(test)]
pub(crate) fn test_service() -> WorkoutService<crate::repository::SqliteWorkoutRepository> {
    use crate::db::Database;
    use crate::repository::SqliteWorkoutRepository;

    let db = Database::open_in_memory().expect("in-memory database");
    WorkoutService::new(SqliteWorkoutRepository::new(db), TrainingConfig::default())
}
