//! Test repository that logs every delete before passing it on to SQLite.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::config::TrainingConfig;
use crate::db::Database;
use crate::db::models::{
    Exercise, ExerciseSet, OneRepMax, SetField, Settings, Workout, WorkoutExercise, WorkoutPlan,
};
use crate::error::StoreError;
use crate::repository::{SqliteWorkoutRepository, WorkoutRepository};
use crate::service::WorkoutService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Deleted {
    Set(i32),
    WorkoutExercise(i32),
    Workout(i32),
    WorkoutPlan(i32),
    Exercise(i32),
    OneRepMax(i32),
}

pub(crate) struct RecordingRepository {
    inner: SqliteWorkoutRepository,
    deletes: Mutex<Vec<Deleted>>,
}

impl RecordingRepository {
    fn record(&self, deleted: Deleted) {
        if let Ok(mut deletes) = self.deletes.lock() {
            deletes.push(deleted);
        }
    }

    /// Deletes seen so far, in call order. Clears the log.
    pub(crate) fn take_deletes(&self) -> Vec<Deleted> {
        self.deletes
            .lock()
            .map(|mut deletes| std::mem::take(&mut *deletes))
            .unwrap_or_default()
    }
}

pub(crate) fn recording_service() -> WorkoutService<RecordingRepository> {
    let db = Database::open_in_memory().expect("in-memory database");
    let repo = RecordingRepository {
        inner: SqliteWorkoutRepository::new(db),
        deletes: Mutex::new(Vec::new()),
    };
    WorkoutService::new(repo, TrainingConfig::default())
}

#[async_trait]
impl WorkoutRepository for RecordingRepository {
    async fn select_workout_plans(&self) -> Result<Vec<WorkoutPlan>, StoreError> {
        self.inner.select_workout_plans().await
    }

    async fn select_workout_plan(&self, id: i32) -> Result<Option<WorkoutPlan>, StoreError> {
        self.inner.select_workout_plan(id).await
    }

    async fn select_workouts_of_plan(&self, id: i32) -> Result<Vec<Workout>, StoreError> {
        self.inner.select_workouts_of_plan(id).await
    }

    async fn select_workout(&self, id: i32) -> Result<Option<Workout>, StoreError> {
        self.inner.select_workout(id).await
    }

    async fn select_workout_exercises(&self, id: i32) -> Result<Vec<WorkoutExercise>, StoreError> {
        self.inner.select_workout_exercises(id).await
    }

    async fn select_workout_exercises_of_exercise(
        &self,
        id: i32,
    ) -> Result<Vec<WorkoutExercise>, StoreError> {
        self.inner.select_workout_exercises_of_exercise(id).await
    }

    async fn select_exercise(&self, id: i32) -> Result<Option<Exercise>, StoreError> {
        self.inner.select_exercise(id).await
    }

    async fn select_exercises(&self) -> Result<Vec<Exercise>, StoreError> {
        self.inner.select_exercises().await
    }

    async fn select_exercise_sets(&self, id: i32) -> Result<Vec<ExerciseSet>, StoreError> {
        self.inner.select_exercise_sets(id).await
    }

    async fn select_one_rep_maxes(&self) -> Result<Vec<OneRepMax>, StoreError> {
        self.inner.select_one_rep_maxes().await
    }

    async fn select_exercise_one_rep_max(&self, id: i32) -> Result<Option<OneRepMax>, StoreError> {
        self.inner.select_exercise_one_rep_max(id).await
    }

    async fn select_settings(&self) -> Result<Settings, StoreError> {
        self.inner.select_settings().await
    }

    async fn insert_workout_plan(&self, name: &str) -> Result<i32, StoreError> {
        self.inner.insert_workout_plan(name).await
    }

    async fn insert_workout(&self, name: &str, plan_id: i32) -> Result<i32, StoreError> {
        self.inner.insert_workout(name, plan_id).await
    }

    async fn insert_exercise(&self, name: &str) -> Result<i32, StoreError> {
        self.inner.insert_exercise(name).await
    }

    async fn insert_workout_exercise(
        &self,
        exercise_id: i32,
        workout_id: i32,
    ) -> Result<i32, StoreError> {
        self.inner.insert_workout_exercise(exercise_id, workout_id).await
    }

    async fn insert_exercise_set(
        &self,
        set_number: i32,
        workout_exercise_id: i32,
    ) -> Result<i32, StoreError> {
        self.inner.insert_exercise_set(set_number, workout_exercise_id).await
    }

    async fn insert_one_rep_max(&self, exercise_id: i32, weight: f64) -> Result<i32, StoreError> {
        self.inner.insert_one_rep_max(exercise_id, weight).await
    }

    async fn update_exercise_set(&self, set: &ExerciseSet) -> Result<(), StoreError> {
        self.inner.update_exercise_set(set).await
    }

    async fn update_exercise_set_field(&self, id: i32, field: SetField) -> Result<(), StoreError> {
        self.inner.update_exercise_set_field(id, field).await
    }

    async fn update_exercise_name(&self, id: i32, name: &str) -> Result<(), StoreError> {
        self.inner.update_exercise_name(id, name).await
    }

    async fn update_workout_name(&self, id: i32, name: &str) -> Result<(), StoreError> {
        self.inner.update_workout_name(id, name).await
    }

    async fn update_workout_plan_name(&self, id: i32, name: &str) -> Result<(), StoreError> {
        self.inner.update_workout_plan_name(id, name).await
    }

    async fn update_workout_counter(&self, id: i32, counter: i32) -> Result<(), StoreError> {
        self.inner.update_workout_counter(id, counter).await
    }

    async fn update_one_rep_max(&self, id: i32, weight: f64) -> Result<(), StoreError> {
        self.inner.update_one_rep_max(id, weight).await
    }

    async fn update_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        self.inner.update_settings(settings).await
    }

    async fn delete_exercise_set(&self, id: i32) -> Result<usize, StoreError> {
        self.record(Deleted::Set(id));
        self.inner.delete_exercise_set(id).await
    }

    async fn delete_workout_exercise(&self, id: i32) -> Result<usize, StoreError> {
        self.record(Deleted::WorkoutExercise(id));
        self.inner.delete_workout_exercise(id).await
    }

    async fn delete_workout(&self, id: i32) -> Result<usize, StoreError> {
        self.record(Deleted::Workout(id));
        self.inner.delete_workout(id).await
    }

    async fn delete_workout_plan(&self, id: i32) -> Result<usize, StoreError> {
        self.record(Deleted::WorkoutPlan(id));
        self.inner.delete_workout_plan(id).await
    }

    async fn delete_exercise(&self, id: i32) -> Result<usize, StoreError> {
        self.record(Deleted::Exercise(id));
        self.inner.delete_exercise(id).await
    }

    async fn delete_one_rep_max(&self, id: i32) -> Result<usize, StoreError> {
        self.record(Deleted::OneRepMax(id));
        self.inner.delete_one_rep_max(id).await
    }
}
