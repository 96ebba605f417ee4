use log::debug;

use crate::db::models::OneRepMax;
use crate::error::StoreError;
use crate::repository::WorkoutRepository;
use crate::service::WorkoutService;
use crate::views::{self, OneRepMaxEntry};

impl<R: WorkoutRepository> WorkoutService<R> {
    /// All one-rep maxes with exercise names. Rows pointing at a deleted
    /// exercise are reported as "Unknown exercise".
    pub async fn get_one_rep_maxes(&self) -> Result<Vec<OneRepMaxEntry>, StoreError> {
        let (orms, exercises) = tokio::try_join!(
            self.repo.select_one_rep_maxes(),
            self.repo.select_exercises()
        )?;
        Ok(views::join_one_rep_maxes(orms, &exercises))
    }

    pub async fn get_one_rep_max_of_exercise(
        &self,
        exercise_id: i32,
    ) -> Result<Option<OneRepMax>, StoreError> {
        self.repo.select_exercise_one_rep_max(exercise_id).await
    }

    /// Records the current one-rep max of an exercise, replacing the previous
    /// value if there is one. Returns the row id.
    pub async fn create_one_rep_max(
        &self,
        exercise_id: i32,
        weight: f64,
    ) -> Result<i32, StoreError> {
        match self.repo.select_exercise_one_rep_max(exercise_id).await? {
            Some(existing) => {
                debug!(
                    "Replacing one-rep max of exercise {}: {} -> {}",
                    exercise_id, existing.weight, weight
                );
                self.repo.update_one_rep_max(existing.id, weight).await?;
                Ok(existing.id)
            }
            None => self.repo.insert_one_rep_max(exercise_id, weight).await,
        }
    }

    pub async fn remove_one_rep_max(&self, one_rep_max_id: i32) -> Result<(), StoreError> {
        self.repo.delete_one_rep_max(one_rep_max_id).await?;
        Ok(())
    }
}
