//! Settings and the deload counter.

use log::info;

use crate::db::models::Settings;
use crate::error::StoreError;
use crate::repository::WorkoutRepository;
use crate::service::WorkoutService;
use crate::training::{SessionFinish, is_deload_due};

impl<R: WorkoutRepository> WorkoutService<R> {
    pub async fn get_settings(&self) -> Result<Settings, StoreError> {
        self.repo.select_settings().await
    }

    /// Stores the deload configuration as given. A positive cycle length while
    /// enabled is the caller's to check.
    pub async fn update_settings(
        &self,
        deload_enabled: bool,
        deload_every_sessions: i32,
    ) -> Result<Settings, StoreError> {
        let settings = Settings::new(deload_enabled, deload_every_sessions);
        self.repo.update_settings(&settings).await?;
        Ok(settings)
    }

    /// Records a completed regular session. Returns the new counter.
    pub async fn increment_workout_counter(
        &self,
        workout_id: i32,
        current: i32,
    ) -> Result<i32, StoreError> {
        let next = SessionFinish::Regular.next_counter(current);
        self.repo.update_workout_counter(workout_id, next).await?;
        info!("Workout {} counter {} -> {}", workout_id, current, next);
        Ok(next)
    }

    /// Records a completed deload session.
    pub async fn reset_workout_counter(&self, workout_id: i32) -> Result<(), StoreError> {
        let next = SessionFinish::Deload.next_counter(0);
        self.repo.update_workout_counter(workout_id, next).await?;
        info!("Workout {} counter reset after deload", workout_id);
        Ok(())
    }

    /// Finishing a deload session writes no sets; it only resets the counter.
    pub async fn finish_deload_session(&self, workout_id: i32) -> Result<(), StoreError> {
        self.reset_workout_counter(workout_id).await
    }

    /// Whether a deload should be suggested for the workout. A missing workout
    /// never is.
    pub async fn is_deload_due(&self, workout_id: i32) -> Result<bool, StoreError> {
        let (workout, settings) = tokio::try_join!(
            self.repo.select_workout(workout_id),
            self.repo.select_settings()
        )?;
        Ok(workout.is_some_and(|w| is_deload_due(w.counter, &settings)))
    }
}
