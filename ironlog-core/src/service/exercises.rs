//! Exercise catalog, workout links and the session views built on them.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::db::models::Exercise;
use crate::error::StoreError;
use crate::repository::WorkoutRepository;
use crate::service::WorkoutService;
use crate::views::{self, SessionExercise};

/// Ids produced by attaching an exercise to a workout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedWorkoutExercise {
    pub exercise_id: i32,
    pub workout_exercise_id: i32,
    /// In set-number order, starting at set 1.
    pub set_ids: Vec<i32>,
}

impl<R: WorkoutRepository> WorkoutService<R> {
    pub async fn get_exercises(&self) -> Result<Vec<Exercise>, StoreError> {
        self.repo.select_exercises().await
    }

    pub async fn get_exercises_of_workout(
        &self,
        workout_id: i32,
    ) -> Result<Vec<SessionExercise>, StoreError> {
        views::assemble_session_exercises(&self.repo, workout_id).await
    }

    /// The session view with every set lightened by the configured deload
    /// policy. Nothing is written.
    pub async fn get_deloaded_exercises(
        &self,
        workout_id: i32,
    ) -> Result<Vec<SessionExercise>, StoreError> {
        let (exercises, orms) = tokio::try_join!(
            views::assemble_session_exercises(&self.repo, workout_id),
            self.repo.select_one_rep_maxes()
        )?;
        let orm_by_exercise = views::one_rep_max_by_exercise(&orms);
        let policy = self.training.deload;
        let step = self.training.plate_step;

        Ok(exercises
            .into_iter()
            .map(|mut session_exercise| {
                let orm = orm_by_exercise.get(&session_exercise.exercise.id).copied();
                session_exercise.sets = session_exercise
                    .sets
                    .iter()
                    .map(|set| policy.apply(set, orm, step))
                    .collect();
                session_exercise
            })
            .collect())
    }

    pub async fn create_exercise(&self, name: &str) -> Result<i32, StoreError> {
        self.repo.insert_exercise(name).await
    }

    /// Links an existing exercise to a workout and gives it `set_count` empty
    /// sets numbered from 1.
    pub async fn add_exercise_to_workout(
        &self,
        exercise_id: i32,
        workout_id: i32,
        set_count: i32,
    ) -> Result<CreatedWorkoutExercise, StoreError> {
        let workout_exercise_id = self
            .repo
            .insert_workout_exercise(exercise_id, workout_id)
            .await?;

        let mut set_ids = Vec::with_capacity(set_count.max(0) as usize);
        for set_number in 1..=set_count {
            set_ids.push(
                self.repo
                    .insert_exercise_set(set_number, workout_exercise_id)
                    .await?,
            );
        }
        debug!(
            "Linked exercise {} to workout {} as {} with {} sets",
            exercise_id,
            workout_id,
            workout_exercise_id,
            set_ids.len()
        );

        Ok(CreatedWorkoutExercise {
            exercise_id,
            workout_exercise_id,
            set_ids,
        })
    }

    /// Adds a brand-new catalog exercise straight into a workout.
    pub async fn create_exercise_for_workout(
        &self,
        name: &str,
        workout_id: i32,
        set_count: i32,
    ) -> Result<CreatedWorkoutExercise, StoreError> {
        let exercise_id = self.repo.insert_exercise(name).await?;
        self.add_exercise_to_workout(exercise_id, workout_id, set_count)
            .await
    }

    pub async fn rename_exercise(&self, exercise_id: i32, name: &str) -> Result<(), StoreError> {
        self.repo.update_exercise_name(exercise_id, name).await
    }

    /// Detaches an exercise from its workout, deleting its sets first.
    pub async fn remove_workout_exercise(
        &self,
        workout_exercise_id: i32,
    ) -> Result<(), StoreError> {
        let sets = self.repo.select_exercise_sets(workout_exercise_id).await?;
        for set in &sets {
            self.repo.delete_exercise_set(set.id).await?;
        }
        self.repo.delete_workout_exercise(workout_exercise_id).await?;
        debug!(
            "Removed workout exercise {} and {} sets",
            workout_exercise_id,
            sets.len()
        );
        Ok(())
    }

    /// Deletes an exercise from the catalog.
    ///
    /// Order: sets of every link → the links → its one-rep max → the exercise.
    pub async fn remove_exercise(&self, exercise_id: i32) -> Result<(), StoreError> {
        let links = self
            .repo
            .select_workout_exercises_of_exercise(exercise_id)
            .await?;
        for link in &links {
            self.remove_workout_exercise(link.id).await?;
        }

        let orms = self.repo.select_one_rep_maxes().await?;
        for orm in orms.iter().filter(|o| o.exercise_id == exercise_id) {
            self.repo.delete_one_rep_max(orm.id).await?;
        }

        self.repo.delete_exercise(exercise_id).await?;
        info!(
            "Removed exercise {} from the catalog ({} workout links)",
            exercise_id,
            links.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::db::models::SetField;
    use crate::repository::WorkoutRepository;
    use crate::service::recording::{Deleted, recording_service};
    use crate::service::test_service;
    use crate::views::UNKNOWN_EXERCISE;

    #[tokio::test]
    async fn create_exercise_for_workout_numbers_sets() {
        let service = test_service();
        let plan = service.create_workout_plan("Plan").await.unwrap();
        let workout = service.create_workout("Push", plan).await.unwrap();

        let created = service
            .create_exercise_for_workout("Bench Press", workout, 3)
            .await
            .unwrap();
        assert_eq!(created.set_ids.len(), 3);

        let view = service.get_exercises_of_workout(workout).await.unwrap();
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].workout_exercise_id, created.workout_exercise_id);
        assert_eq!(view[0].exercise.id, created.exercise_id);
        assert_eq!(view[0].exercise.name, "Bench Press");
        let numbers: Vec<i32> = view[0].sets.iter().map(|s| s.set_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert!(
            view[0]
                .sets
                .iter()
                .all(|s| s.workout_exercise_id == created.workout_exercise_id)
        );
        assert_eq!(service.get_exercises().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn existing_exercise_can_be_linked_twice() {
        let service = test_service();
        let plan = service.create_workout_plan("Plan").await.unwrap();
        let a = service.create_workout("A", plan).await.unwrap();
        let b = service.create_workout("B", plan).await.unwrap();
        let squat = service.create_exercise("Squat").await.unwrap();

        let first = service.add_exercise_to_workout(squat, a, 2).await.unwrap();
        let second = service.add_exercise_to_workout(squat, b, 0).await.unwrap();
        assert_ne!(first.workout_exercise_id, second.workout_exercise_id);
        assert!(second.set_ids.is_empty());
        assert_eq!(service.get_exercises().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn removing_a_workout_exercise_leaves_no_orphan_sets() {
        let service = test_service();
        let plan = service.create_workout_plan("Plan").await.unwrap();
        let workout = service.create_workout("Pull", plan).await.unwrap();
        let created = service
            .create_exercise_for_workout("Row", workout, 4)
            .await
            .unwrap();

        service
            .remove_workout_exercise(created.workout_exercise_id)
            .await
            .unwrap();

        let repo = service.repository();
        assert!(
            repo.select_exercise_sets(created.workout_exercise_id)
                .await
                .unwrap()
                .is_empty()
        );
        assert!(service.get_exercises_of_workout(workout).await.unwrap().is_empty());
        // the catalog entry survives
        assert!(repo.select_exercise(created.exercise_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn removing_an_exercise_cascades_everywhere() {
        let service = test_service();
        let plan = service.create_workout_plan("Plan").await.unwrap();
        let a = service.create_workout("A", plan).await.unwrap();
        let b = service.create_workout("B", plan).await.unwrap();
        let deadlift = service.create_exercise("Deadlift").await.unwrap();
        let curl = service.create_exercise("Curl").await.unwrap();

        let in_a = service.add_exercise_to_workout(deadlift, a, 2).await.unwrap();
        let in_b = service.add_exercise_to_workout(deadlift, b, 3).await.unwrap();
        let curls = service.add_exercise_to_workout(curl, b, 1).await.unwrap();
        service.create_one_rep_max(deadlift, 200.0).await.unwrap();
        service.create_one_rep_max(curl, 40.0).await.unwrap();

        service.remove_exercise(deadlift).await.unwrap();

        let repo = service.repository();
        for link in [&in_a, &in_b] {
            assert!(
                repo.select_exercise_sets(link.workout_exercise_id)
                    .await
                    .unwrap()
                    .is_empty()
            );
        }
        assert!(
            repo.select_workout_exercises_of_exercise(deadlift)
                .await
                .unwrap()
                .is_empty()
        );
        assert!(repo.select_exercise_one_rep_max(deadlift).await.unwrap().is_none());
        assert!(repo.select_exercise(deadlift).await.unwrap().is_none());

        let orms = service.get_one_rep_maxes().await.unwrap();
        assert_eq!(orms.len(), 1);
        assert_eq!(orms[0].name, "Curl");
        assert!(orms.iter().all(|o| o.name != UNKNOWN_EXERCISE));
        assert_eq!(
            repo.select_exercise_sets(curls.workout_exercise_id)
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn exercise_removal_deletes_children_first() {
        let service = recording_service();
        let plan = service.create_workout_plan("Plan").await.unwrap();
        let a = service.create_workout("A", plan).await.unwrap();
        let b = service.create_workout("B", plan).await.unwrap();
        let press = service.create_exercise("Overhead Press").await.unwrap();

        let in_a = service.add_exercise_to_workout(press, a, 2).await.unwrap();
        let in_b = service.add_exercise_to_workout(press, b, 1).await.unwrap();
        let orm = service.create_one_rep_max(press, 70.0).await.unwrap();
        service.repository().take_deletes();

        service.remove_exercise(press).await.unwrap();
        assert_eq!(
            service.repository().take_deletes(),
            vec![
                Deleted::Set(in_a.set_ids[0]),
                Deleted::Set(in_a.set_ids[1]),
                Deleted::WorkoutExercise(in_a.workout_exercise_id),
                Deleted::Set(in_b.set_ids[0]),
                Deleted::WorkoutExercise(in_b.workout_exercise_id),
                Deleted::OneRepMax(orm),
                Deleted::Exercise(press),
            ]
        );
    }

    #[tokio::test]
    async fn workout_exercise_removal_deletes_sets_before_the_link() {
        let service = recording_service();
        let plan = service.create_workout_plan("Plan").await.unwrap();
        let workout = service.create_workout("Legs", plan).await.unwrap();
        let created = service
            .create_exercise_for_workout("Lunge", workout, 3)
            .await
            .unwrap();

        service
            .remove_workout_exercise(created.workout_exercise_id)
            .await
            .unwrap();

        let mut expected: Vec<Deleted> =
            created.set_ids.iter().map(|&id| Deleted::Set(id)).collect();
        expected.push(Deleted::WorkoutExercise(created.workout_exercise_id));
        assert_eq!(service.repository().take_deletes(), expected);
    }

    #[tokio::test]
    async fn deloaded_view_is_lighter_and_not_persisted() {
        let service = test_service();
        let plan = service.create_workout_plan("Plan").await.unwrap();
        let workout = service.create_workout("Heavy", plan).await.unwrap();
        let created = service
            .create_exercise_for_workout("Squat", workout, 2)
            .await
            .unwrap();
        service.create_one_rep_max(created.exercise_id, 140.0).await.unwrap();

        let &[pct_set, plain_set] = created.set_ids.as_slice() else {
            panic!("expected two sets");
        };
        service
            .update_exercise_set_field(pct_set, SetField::Percentage(75.0))
            .await
            .unwrap();
        service
            .update_exercise_set_field(pct_set, SetField::Weight(105.0))
            .await
            .unwrap();
        service
            .update_exercise_set_field(plain_set, SetField::Weight(100.0))
            .await
            .unwrap();
        service
            .update_exercise_set_field(plain_set, SetField::Rir(1))
            .await
            .unwrap();

        let deloaded = service.get_deloaded_exercises(workout).await.unwrap();
        let sets = &deloaded[0].sets;
        assert_eq!(sets[0].percentage, 67.5);
        assert_eq!(sets[0].weight, 95.0);
        assert_eq!(sets[1].percentage, 0.0);
        assert_eq!(sets[1].weight, 90.0);
        assert!(sets.iter().all(|s| s.rir == 4));

        let stored = service.get_exercises_of_workout(workout).await.unwrap();
        assert_eq!(stored[0].sets[0].weight, 105.0);
        assert_eq!(stored[0].sets[1].weight, 100.0);
        assert_eq!(stored[0].sets[1].rir, 1);
    }
}
