//! Composite read models assembled from gateway rows.

use futures::future::try_join_all;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::db::models::{Exercise, ExerciseSet, OneRepMax};
use crate::error::StoreError;
use crate::repository::WorkoutRepository;

/// Display name used when a row points at an exercise that no longer exists.
pub const UNKNOWN_EXERCISE: &str = "Unknown exercise";

/// One exercise of a workout session, with its sets in set-number order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionExercise {
    pub workout_exercise_id: i32,
    pub exercise: Exercise,
    pub sets: Vec<ExerciseSet>,
}

/// A one-rep max joined with its exercise name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneRepMaxEntry {
    pub id: i32,
    pub exercise_id: i32,
    pub name: String,
    pub weight: f64,
}

fn unknown_exercise(exercise_id: i32) -> Exercise {
    Exercise {
        id: exercise_id,
        name: UNKNOWN_EXERCISE.to_string(),
    }
}

/// Builds the session view of a workout. Recomputed on every call.
pub async fn assemble_session_exercises<R>(
    repo: &R,
    workout_id: i32,
) -> Result<Vec<SessionExercise>, StoreError>
where
    R: WorkoutRepository + ?Sized,
{
    let links = repo.select_workout_exercises(workout_id).await?;
    debug!(
        "Assembling {} exercises for workout {}",
        links.len(),
        workout_id
    );

    try_join_all(links.into_iter().map(|link| async move {
        let (exercise, mut sets) = tokio::try_join!(
            repo.select_exercise(link.exercise_id),
            repo.select_exercise_sets(link.id)
        )?;
        let exercise = exercise.unwrap_or_else(|| {
            warn!(
                "Workout exercise {} references missing exercise {}",
                link.id, link.exercise_id
            );
            unknown_exercise(link.exercise_id)
        });
        sets.sort_by_key(|s| s.set_number);

        Ok::<_, StoreError>(SessionExercise {
            workout_exercise_id: link.id,
            exercise,
            sets,
        })
    }))
    .await
}

/// Joins one-rep maxes with exercise names, never failing on a dangling
/// reference.
pub fn join_one_rep_maxes(orms: Vec<OneRepMax>, exercises: &[Exercise]) -> Vec<OneRepMaxEntry> {
    let names: HashMap<i32, &str> = exercises.iter().map(|e| (e.id, e.name.as_str())).collect();

    orms.into_iter()
        .map(|orm| OneRepMaxEntry {
            id: orm.id,
            exercise_id: orm.exercise_id,
            name: names
                .get(&orm.exercise_id)
                .copied()
                .unwrap_or(UNKNOWN_EXERCISE)
                .to_string(),
            weight: orm.weight,
        })
        .collect()
}

/// Exercise id to one-rep max weight. The latest row wins when an exercise
/// has several.
pub fn one_rep_max_by_exercise(orms: &[OneRepMax]) -> HashMap<i32, f64> {
    let mut latest: HashMap<i32, &OneRepMax> = HashMap::new();
    for orm in orms {
        latest
            .entry(orm.exercise_id)
            .and_modify(|cur| {
                if orm.id > cur.id {
                    *cur = orm;
                }
            })
            .or_insert(orm);
    }
    latest
        .into_iter()
        .map(|(exercise_id, orm)| (exercise_id, orm.weight))
        .collect()
}
