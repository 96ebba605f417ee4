//! Workout plans and workouts.

use log::info;

use crate::db::models::{Workout, WorkoutPlan};
use crate::error::StoreError;
use crate::repository::WorkoutRepository;
use crate::service::WorkoutService;

impl<R: WorkoutRepository> WorkoutService<R> {
    pub async fn get_workout_plans(&self) -> Result<Vec<WorkoutPlan>, StoreError> {
        self.repo.select_workout_plans().await
    }

    pub async fn get_workout_plan(
        &self,
        workout_plan_id: i32,
    ) -> Result<Option<WorkoutPlan>, StoreError> {
        self.repo.select_workout_plan(workout_plan_id).await
    }

    pub async fn get_workouts_of_workout_plan(
        &self,
        workout_plan_id: i32,
    ) -> Result<Vec<Workout>, StoreError> {
        self.repo.select_workouts_of_plan(workout_plan_id).await
    }

    pub async fn get_workout(&self, workout_id: i32) -> Result<Option<Workout>, StoreError> {
        self.repo.select_workout(workout_id).await
    }

    pub async fn create_workout_plan(&self, name: &str) -> Result<i32, StoreError> {
        self.repo.insert_workout_plan(name).await
    }

    pub async fn create_workout(
        &self,
        name: &str,
        workout_plan_id: i32,
    ) -> Result<i32, StoreError> {
        self.repo.insert_workout(name, workout_plan_id).await
    }

    pub async fn rename_workout_plan(
        &self,
        workout_plan_id: i32,
        name: &str,
    ) -> Result<(), StoreError> {
        self.repo.update_workout_plan_name(workout_plan_id, name).await
    }

    pub async fn rename_workout(&self, workout_id: i32, name: &str) -> Result<(), StoreError> {
        self.repo.update_workout_name(workout_id, name).await
    }

    /// Removes a workout together with its exercise links and their sets.
    pub async fn remove_workout(&self, workout_id: i32) -> Result<(), StoreError> {
        let links = self.repo.select_workout_exercises(workout_id).await?;
        for link in &links {
            self.remove_workout_exercise(link.id).await?;
        }
        self.repo.delete_workout(workout_id).await?;
        info!(
            "Removed workout {} ({} exercise links)",
            workout_id,
            links.len()
        );
        Ok(())
    }

    /// Removes a plan and everything below it.
    pub async fn remove_workout_plan(&self, workout_plan_id: i32) -> Result<(), StoreError> {
        let workouts = self.repo.select_workouts_of_plan(workout_plan_id).await?;
        for workout in &workouts {
            self.remove_workout(workout.id).await?;
        }
        self.repo.delete_workout_plan(workout_plan_id).await?;
        info!(
            "Removed workout plan {} ({} workouts)",
            workout_plan_id,
            workouts.len()
        );
        Ok(())
    }
}
