//! Storage gateway: the persistence contract the rest of the core depends on.

use async_trait::async_trait;
use diesel::QueryResult;
use diesel::sqlite::SqliteConnection;
use log::debug;

use crate::db::models::{
    Exercise, ExerciseSet, OneRepMax, SetField, Settings, Workout, WorkoutExercise, WorkoutPlan,
};
use crate::db::{Database, operations};
use crate::error::StoreError;

/// Durable CRUD over the training records.
///
/// Implementations persist faithfully and validate nothing. Updates that match
/// no row fail with a not-found [`StoreError`]; deletes report how many rows
/// they removed.
#[async_trait]
pub trait WorkoutRepository: Send + Sync {
    // selects
    async fn select_workout_plans(&self) -> Result<Vec<WorkoutPlan>, StoreError>;

    async fn select_workout_plan(&self, workout_plan_id: i32)
    -> Result<Option<WorkoutPlan>, StoreError>;

    async fn select_workouts_of_plan(&self, workout_plan_id: i32)
    -> Result<Vec<Workout>, StoreError>;

    async fn select_workout(&self, workout_id: i32) -> Result<Option<Workout>, StoreError>;

    async fn select_workout_exercises(
        &self,
        workout_id: i32,
    ) -> Result<Vec<WorkoutExercise>, StoreError>;

    async fn select_workout_exercises_of_exercise(
        &self,
        exercise_id: i32,
    ) -> Result<Vec<WorkoutExercise>, StoreError>;

    async fn select_exercise(&self, exercise_id: i32) -> Result<Option<Exercise>, StoreError>;

    async fn select_exercises(&self) -> Result<Vec<Exercise>, StoreError>;

    async fn select_exercise_sets(
        &self,
        workout_exercise_id: i32,
    ) -> Result<Vec<ExerciseSet>, StoreError>;

    async fn select_one_rep_maxes(&self) -> Result<Vec<OneRepMax>, StoreError>;

    async fn select_exercise_one_rep_max(
        &self,
        exercise_id: i32,
    ) -> Result<Option<OneRepMax>, StoreError>;

    async fn select_settings(&self) -> Result<Settings, StoreError>;

    // inserts
    async fn insert_workout_plan(&self, name: &str) -> Result<i32, StoreError>;

    async fn insert_workout(&self, name: &str, workout_plan_id: i32) -> Result<i32, StoreError>;

    async fn insert_exercise(&self, name: &str) -> Result<i32, StoreError>;

    async fn insert_workout_exercise(
        &self,
        exercise_id: i32,
        workout_id: i32,
    ) -> Result<i32, StoreError>;

    async fn insert_exercise_set(
        &self,
        set_number: i32,
        workout_exercise_id: i32,
    ) -> Result<i32, StoreError>;

    async fn insert_one_rep_max(&self, exercise_id: i32, weight: f64) -> Result<i32, StoreError>;

    // updates
    async fn update_exercise_set(&self, set: &ExerciseSet) -> Result<(), StoreError>;

    async fn update_exercise_set_field(&self, set_id: i32, field: SetField)
    -> Result<(), StoreError>;

    async fn update_exercise_name(&self, exercise_id: i32, name: &str) -> Result<(), StoreError>;

    async fn update_workout_name(&self, workout_id: i32, name: &str) -> Result<(), StoreError>;

    async fn update_workout_plan_name(
        &self,
        workout_plan_id: i32,
        name: &str,
    ) -> Result<(), StoreError>;

    async fn update_workout_counter(&self, workout_id: i32, counter: i32)
    -> Result<(), StoreError>;

    async fn update_one_rep_max(&self, one_rep_max_id: i32, weight: f64)
    -> Result<(), StoreError>;

    async fn update_settings(&self, settings: &Settings) -> Result<(), StoreError>;

    // deletes
    async fn delete_exercise_set(&self, set_id: i32) -> Result<usize, StoreError>;

    async fn delete_workout_exercise(&self, workout_exercise_id: i32)
    -> Result<usize, StoreError>;

    async fn delete_workout(&self, workout_id: i32) -> Result<usize, StoreError>;

    async fn delete_workout_plan(&self, workout_plan_id: i32) -> Result<usize, StoreError>;

    async fn delete_exercise(&self, exercise_id: i32) -> Result<usize, StoreError>;

    async fn delete_one_rep_max(&self, one_rep_max_id: i32) -> Result<usize, StoreError>;
}

/// [`WorkoutRepository`] backed by SQLite through diesel.
#[derive(Clone)]
pub struct SqliteWorkoutRepository {
    db: Database,
}

impl SqliteWorkoutRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Runs a blocking query on a pooled connection off the async executor.
    async fn run<T, F>(&self, op: &'static str, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut SqliteConnection) -> QueryResult<T> + Send + 'static,
    {
        debug!("storage: {}", op);
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = db.conn()?;
            f(&mut conn).map_err(StoreError::from)
        })
        .await?
    }
}

#[async_trait]
impl WorkoutRepository for SqliteWorkoutRepository {
    async fn select_workout_plans(&self) -> Result<Vec<WorkoutPlan>, StoreError> {
        self.run("select_workout_plans", operations::select_workout_plans).await
    }

    async fn select_workout_plan(
        &self,
        workout_plan_id: i32,
    ) -> Result<Option<WorkoutPlan>, StoreError> {
        self.run("select_workout_plan", move |conn| {
            operations::select_workout_plan(conn, workout_plan_id)
        })
        .await
    }

    async fn select_workouts_of_plan(
        &self,
        workout_plan_id: i32,
    ) -> Result<Vec<Workout>, StoreError> {
        self.run("select_workouts_of_plan", move |conn| {
            operations::select_workouts_of_plan(conn, workout_plan_id)
        })
        .await
    }

    async fn select_workout(&self, workout_id: i32) -> Result<Option<Workout>, StoreError> {
        self.run("select_workout", move |conn| {
            operations::select_workout(conn, workout_id)
        })
        .await
    }

    async fn select_workout_exercises(
        &self,
        workout_id: i32,
    ) -> Result<Vec<WorkoutExercise>, StoreError> {
        self.run("select_workout_exercises", move |conn| {
            operations::select_workout_exercises(conn, workout_id)
        })
        .await
    }

    async fn select_workout_exercises_of_exercise(
        &self,
        exercise_id: i32,
    ) -> Result<Vec<WorkoutExercise>, StoreError> {
        self.run("select_workout_exercises_of_exercise", move |conn| {
            operations::select_workout_exercises_of_exercise(conn, exercise_id)
        })
        .await
    }

    async fn select_exercise(&self, exercise_id: i32) -> Result<Option<Exercise>, StoreError> {
        self.run("select_exercise", move |conn| {
            operations::select_exercise(conn, exercise_id)
        })
        .await
    }

    async fn select_exercises(&self) -> Result<Vec<Exercise>, StoreError> {
        self.run("select_exercises", operations::select_exercises).await
    }

    async fn select_exercise_sets(
        &self,
        workout_exercise_id: i32,
    ) -> Result<Vec<ExerciseSet>, StoreError> {
        self.run("select_exercise_sets", move |conn| {
            operations::select_exercise_sets(conn, workout_exercise_id)
        })
        .await
    }

    async fn select_one_rep_maxes(&self) -> Result<Vec<OneRepMax>, StoreError> {
        self.run("select_one_rep_maxes", operations::select_one_rep_maxes).await
    }

    async fn select_exercise_one_rep_max(
        &self,
        exercise_id: i32,
    ) -> Result<Option<OneRepMax>, StoreError> {
        self.run("select_exercise_one_rep_max", move |conn| {
            operations::select_exercise_one_rep_max(conn, exercise_id)
        })
        .await
    }

    async fn select_settings(&self) -> Result<Settings, StoreError> {
        self.run("select_settings", operations::select_settings).await
    }

    async fn insert_workout_plan(&self, name: &str) -> Result<i32, StoreError> {
        let name = name.to_string();
        self.run("insert_workout_plan", move |conn| {
            operations::insert_workout_plan(conn, &name)
        })
        .await
    }

    async fn insert_workout(&self, name: &str, workout_plan_id: i32) -> Result<i32, StoreError> {
        let name = name.to_string();
        self.run("insert_workout", move |conn| {
            operations::insert_workout(conn, &name, workout_plan_id)
        })
        .await
    }

    async fn insert_exercise(&self, name: &str) -> Result<i32, StoreError> {
        let name = name.to_string();
        self.run("insert_exercise", move |conn| {
            operations::insert_exercise(conn, &name)
        })
        .await
    }

    async fn insert_workout_exercise(
        &self,
        exercise_id: i32,
        workout_id: i32,
    ) -> Result<i32, StoreError> {
        self.run("insert_workout_exercise", move |conn| {
            operations::insert_workout_exercise(conn, exercise_id, workout_id)
        })
        .await
    }

    async fn insert_exercise_set(
        &self,
        set_number: i32,
        workout_exercise_id: i32,
    ) -> Result<i32, StoreError> {
        self.run("insert_exercise_set", move |conn| {
            operations::insert_exercise_set(conn, set_number, workout_exercise_id)
        })
        .await
    }

    async fn insert_one_rep_max(&self, exercise_id: i32, weight: f64) -> Result<i32, StoreError> {
        self.run("insert_one_rep_max", move |conn| {
            operations::insert_one_rep_max(conn, exercise_id, weight)
        })
        .await
    }

    async fn update_exercise_set(&self, set: &ExerciseSet) -> Result<(), StoreError> {
        let set = set.clone();
        self.run("update_exercise_set", move |conn| {
            operations::update_exercise_set(conn, &set)
        })
        .await
    }

    async fn update_exercise_set_field(
        &self,
        set_id: i32,
        field: SetField,
    ) -> Result<(), StoreError> {
        self.run("update_exercise_set_field", move |conn| {
            operations::update_exercise_set_field(conn, set_id, field)
        })
        .await
    }

    async fn update_exercise_name(&self, exercise_id: i32, name: &str) -> Result<(), StoreError> {
        let name = name.to_string();
        self.run("update_exercise_name", move |conn| {
            operations::update_exercise_name(conn, exercise_id, &name)
        })
        .await
    }

    async fn update_workout_name(&self, workout_id: i32, name: &str) -> Result<(), StoreError> {
        let name = name.to_string();
        self.run("update_workout_name", move |conn| {
            operations::update_workout_name(conn, workout_id, &name)
        })
        .await
    }

    async fn update_workout_plan_name(
        &self,
        workout_plan_id: i32,
        name: &str,
    ) -> Result<(), StoreError> {
        let name = name.to_string();
        self.run("update_workout_plan_name", move |conn| {
            operations::update_workout_plan_name(conn, workout_plan_id, &name)
        })
        .await
    }

    async fn update_workout_counter(
        &self,
        workout_id: i32,
        counter: i32,
    ) -> Result<(), StoreError> {
        self.run("update_workout_counter", move |conn| {
            operations::update_workout_counter(conn, workout_id, counter)
        })
        .await
    }

    async fn update_one_rep_max(
        &self,
        one_rep_max_id: i32,
        weight: f64,
    ) -> Result<(), StoreError> {
        self.run("update_one_rep_max", move |conn| {
            operations::update_one_rep_max(conn, one_rep_max_id, weight)
        })
        .await
    }

    async fn update_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        let settings = settings.clone();
        self.run("update_settings", move |conn| {
            operations::update_settings(conn, &settings)
        })
        .await
    }

    async fn delete_exercise_set(&self, set_id: i32) -> Result<usize, StoreError> {
        self.run("delete_exercise_set", move |conn| {
            operations::delete_exercise_set(conn, set_id)
        })
        .await
    }

    async fn delete_workout_exercise(
        &self,
        workout_exercise_id: i32,
    ) -> Result<usize, StoreError> {
        self.run("delete_workout_exercise", move |conn| {
            operations::delete_workout_exercise(conn, workout_exercise_id)
        })
        .await
    }

    async fn delete_workout(&self, workout_id: i32) -> Result<usize, StoreError> {
        self.run("delete_workout", move |conn| {
            operations::delete_workout(conn, workout_id)
        })
        .await
    }

    async fn delete_workout_plan(&self, workout_plan_id: i32) -> Result<usize, StoreError> {
        self.run("delete_workout_plan", move |conn| {
            operations::delete_workout_plan(conn, workout_plan_id)
        })
        .await
    }

    async fn delete_exercise(&self, exercise_id: i32) -> Result<usize, StoreError> {
        self.run("delete_exercise", move |conn| {
            operations::delete_exercise(conn, exercise_id)
        })
        .await
    }

    async fn delete_one_rep_max(&self, one_rep_max_id: i32) -> Result<usize, StoreError> {
        self.run("delete_one_rep_max", move |conn| {
            operations::delete_one_rep_max(conn, one_rep_max_id)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> SqliteWorkoutRepository {
        SqliteWorkoutRepository::new(Database::open_in_memory().unwrap())
    }

    #[tokio::test]
    async fn inserted_sets_start_empty() {
        let repo = repo();
        let plan = repo.insert_workout_plan("PPL").await.unwrap();
        let workout = repo.insert_workout("Push", plan).await.unwrap();
        let bench = repo.insert_exercise("Bench Press").await.unwrap();
        let link = repo.insert_workout_exercise(bench, workout).await.unwrap();
        let set_id = repo.insert_exercise_set(1, link).await.unwrap();

        let sets = repo.select_exercise_sets(link).await.unwrap();
        assert_eq!(sets.len(), 1);
        let set = &sets[0];
        assert_eq!(set.id, set_id);
        assert_eq!(set.set_number, 1);
        assert_eq!(set.weight, 0.0);
        assert_eq!(set.reps, 0);
        assert_eq!(set.rir, 0);
        assert_eq!(set.percentage, 0.0);

        let stored = repo.select_workout(workout).await.unwrap().unwrap();
        assert_eq!(stored.counter, 0);
        assert_eq!(stored.workout_plan_id, plan);
    }

    #[tokio::test]
    async fn single_field_update_touches_only_that_column() {
        let repo = repo();
        let set_id = repo.insert_exercise_set(2, 10).await.unwrap();

        repo.update_exercise_set_field(set_id, SetField::Reps(8))
            .await
            .unwrap();
        repo.update_exercise_set_field(set_id, SetField::Percentage(72.5))
            .await
            .unwrap();

        let set = &repo.select_exercise_sets(10).await.unwrap()[0];
        assert_eq!(set.reps, 8);
        assert_eq!(set.percentage, 72.5);
        assert_eq!(set.weight, 0.0);
        assert_eq!(set.rir, 0);
        assert_eq!(set.set_number, 2);
    }

    #[tokio::test]
    async fn whole_row_update_and_stale_ids() {
        let repo = repo();
        let set_id = repo.insert_exercise_set(1, 3).await.unwrap();
        let mut set = repo.select_exercise_sets(3).await.unwrap().remove(0);
        set.weight = 102.5;
        set.reps = 5;
        set.rir = 2;
        repo.update_exercise_set(&set).await.unwrap();
        assert_eq!(repo.select_exercise_sets(3).await.unwrap()[0], set);

        set.id = set_id + 100;
        let err = repo.update_exercise_set(&set).await.unwrap_err();
        assert!(err.is_not_found());
        let err = repo
            .update_exercise_set_field(set_id + 100, SetField::Weight(1.0))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(repo.delete_exercise_set(set_id + 100).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn settings_round_trip() {
        let repo = repo();
        repo.update_settings(&Settings::new(true, 5)).await.unwrap();
        let settings = repo.select_settings().await.unwrap();
        assert_eq!(settings, Settings::new(true, 5));
    }

    #[tokio::test]
    async fn renames_and_deletes() {
        let repo = repo();
        let plan = repo.insert_workout_plan("Old plan").await.unwrap();
        let workout = repo.insert_workout("Old workout", plan).await.unwrap();
        let exercise = repo.insert_exercise("Old exercise").await.unwrap();

        repo.update_workout_plan_name(plan, "Plan").await.unwrap();
        repo.update_workout_name(workout, "Workout").await.unwrap();
        repo.update_exercise_name(exercise, "Exercise").await.unwrap();
        repo.update_workout_counter(workout, 3).await.unwrap();

        assert_eq!(
            repo.select_workout_plan(plan).await.unwrap().unwrap().name,
            "Plan"
        );
        let stored = repo.select_workout(workout).await.unwrap().unwrap();
        assert_eq!(stored.name, "Workout");
        assert_eq!(stored.counter, 3);
        assert_eq!(
            repo.select_exercise(exercise).await.unwrap().unwrap().name,
            "Exercise"
        );

        assert_eq!(repo.delete_exercise(exercise).await.unwrap(), 1);
        assert_eq!(repo.select_exercise(exercise).await.unwrap(), None);
        assert_eq!(repo.delete_workout(workout).await.unwrap(), 1);
        assert!(repo.select_workouts_of_plan(plan).await.unwrap().is_empty());
        assert_eq!(repo.delete_workout_plan(plan).await.unwrap(), 1);
        assert!(repo.select_workout_plans().await.unwrap().is_empty());
    }
}
