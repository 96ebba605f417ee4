use log::debug;

use crate::db::models::{ExerciseSet, SetField};
use crate::error::StoreError;
use crate::repository::WorkoutRepository;
use crate::service::WorkoutService;

impl<R: WorkoutRepository> WorkoutService<R> {
    pub async fn add_set_to_exercise(
        &self,
        set_number: i32,
        workout_exercise_id: i32,
    ) -> Result<i32, StoreError> {
        self.repo
            .insert_exercise_set(set_number, workout_exercise_id)
            .await
    }

    /// Overwrites the whole row. `set.weight` must already be resolved against
    /// the one-rep max (see [`crate::training::resolve_weight`]).
    pub async fn update_exercise_set(&self, set: &ExerciseSet) -> Result<(), StoreError> {
        self.repo.update_exercise_set(set).await
    }

    /// Live-saves one cell. The derived-weight lock is not re-checked here;
    /// callers must not send a weight for a locked set.
    pub async fn update_exercise_set_field(
        &self,
        set_id: i32,
        field: SetField,
    ) -> Result<(), StoreError> {
        debug!("Saving {} of set {}", field.kind(), set_id);
        self.repo.update_exercise_set_field(set_id, field).await
    }

    pub async fn remove_exercise_set(&self, set_id: i32) -> Result<(), StoreError> {
        self.repo.delete_exercise_set(set_id).await?;
        Ok(())
    }
}
