use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::db::models::{ExerciseSet, SetField, SetFieldKind, Settings, Workout};
use crate::error::StoreError;
use crate::repository::WorkoutRepository;
use crate::service::WorkoutService;
use crate::session::autosave::AutoSaveCache;
use crate::session::prompt::DeloadPrompt;
use crate::training::{self, is_deload_due};
use crate::views::{self, SessionExercise};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveOutcome {
    Written,
    /// Same value as the last save; nothing sent to storage.
    Unchanged,
    /// Weight is derived from the one-rep max and cannot be entered.
    Locked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinishOutcome {
    pub counter: i32,
    pub deload_due: bool,
}

/// State of one activation of a workout screen.
///
/// Holds the loaded session, the auto-save cache and the deload prompt flag;
/// all of it is dropped with the screen.
pub struct SessionScreen<'a, R> {
    service: &'a WorkoutService<R>,
    workout: Workout,
    exercises: Vec<SessionExercise>,
    one_rep_maxes: HashMap<i32, f64>,
    settings: Settings,
    saved: AutoSaveCache,
    prompt: DeloadPrompt,
}

struct Loaded {
    workout: Workout,
    exercises: Vec<SessionExercise>,
    one_rep_maxes: HashMap<i32, f64>,
    settings: Settings,
}

async fn load<R: WorkoutRepository>(
    service: &WorkoutService<R>,
    workout_id: i32,
) -> Result<Loaded, StoreError> {
    let repo = service.repository();
    let (workout, exercises, orms, settings) = tokio::try_join!(
        repo.select_workout(workout_id),
        views::assemble_session_exercises(repo, workout_id),
        repo.select_one_rep_maxes(),
        repo.select_settings()
    )?;
    let workout = workout.ok_or(StoreError::Query(diesel::result::Error::NotFound))?;

    Ok(Loaded {
        workout,
        exercises,
        one_rep_maxes: views::one_rep_max_by_exercise(&orms),
        settings,
    })
}

impl<'a, R: WorkoutRepository> SessionScreen<'a, R> {
    /// Activates the screen for a workout. Fails with not-found when the
    /// workout does not exist.
    pub async fn open(service: &'a WorkoutService<R>, workout_id: i32) -> Result<Self, StoreError> {
        let loaded = load(service, workout_id).await?;
        let mut prompt = DeloadPrompt::new();
        prompt.activate(workout_id);

        let mut screen = SessionScreen {
            service,
            workout: loaded.workout,
            exercises: Vec::new(),
            one_rep_maxes: HashMap::new(),
            settings: loaded.settings,
            saved: AutoSaveCache::default(),
            prompt,
        };
        screen.replace_exercises(loaded.exercises, loaded.one_rep_maxes);
        Ok(screen)
    }

    /// Loads `workout_id` into this screen. The deload prompt flag survives
    /// only when the workout stays the same.
    pub async fn reload(&mut self, workout_id: i32) -> Result<(), StoreError> {
        let loaded = load(self.service, workout_id).await?;
        self.prompt.activate(workout_id);
        self.workout = loaded.workout;
        self.settings = loaded.settings;
        self.replace_exercises(loaded.exercises, loaded.one_rep_maxes);
        Ok(())
    }

    fn replace_exercises(&mut self, exercises: Vec<SessionExercise>, orms: HashMap<i32, f64>) {
        self.saved = AutoSaveCache::seeded(exercises.iter().flat_map(|e| e.sets.iter()));
        self.exercises = exercises;
        self.one_rep_maxes = orms;
    }

    pub fn workout(&self) -> &Workout {
        &self.workout
    }

    pub fn exercises(&self) -> &[SessionExercise] {
        &self.exercises
    }

    pub fn deload_due(&self) -> bool {
        is_deload_due(self.workout.counter, &self.settings)
    }

    /// Whether to suggest a deload now. True at most once per activation.
    pub fn take_deload_prompt(&mut self) -> bool {
        let due = self.deload_due();
        self.prompt.take(due)
    }

    fn locate(&self, set_id: i32) -> Option<(i32, &ExerciseSet)> {
        self.exercises.iter().find_map(|e| {
            e.sets
                .iter()
                .find(|s| s.id == set_id)
                .map(|s| (e.exercise.id, s))
        })
    }

    fn locate_mut(&mut self, set_id: i32) -> Option<&mut ExerciseSet> {
        self.exercises
            .iter_mut()
            .flat_map(|e| e.sets.iter_mut())
            .find(|s| s.id == set_id)
    }

    pub fn one_rep_max(&self, exercise_id: i32) -> Option<f64> {
        self.one_rep_maxes.get(&exercise_id).copied()
    }

    pub fn is_weight_locked(&self, set_id: i32) -> bool {
        self.locate(set_id).is_some_and(|(exercise_id, set)| {
            training::is_weight_locked(set.percentage, self.one_rep_max(exercise_id))
        })
    }

    /// Weight prescribed by the one-rep max while the set is locked.
    pub fn derived_weight(&self, set_id: i32) -> Option<f64> {
        let (exercise_id, set) = self.locate(set_id)?;
        let orm = self.one_rep_max(exercise_id)?;
        training::is_weight_locked(set.percentage, Some(orm))
            .then(|| self.service.calculate_weight(orm, set.percentage))
    }

    /// Changes a cell locally without saving it.
    pub fn edit(&mut self, set_id: i32, field: SetField) -> bool {
        match self.locate_mut(set_id) {
            Some(set) => {
                set.apply(field);
                true
            }
            None => false,
        }
    }

    /// Auto-saves one cell as the user edits it.
    pub async fn save_field(
        &mut self,
        set_id: i32,
        field: SetField,
    ) -> Result<SaveOutcome, StoreError> {
        if self.locate(set_id).is_none() {
            return Err(StoreError::Query(diesel::result::Error::NotFound));
        }
        if field.kind() == SetFieldKind::Weight && self.is_weight_locked(set_id) {
            debug!("Weight of set {} is derived; not saving", set_id);
            return Ok(SaveOutcome::Locked);
        }
        if self.saved.is_unchanged(set_id, field) {
            self.edit(set_id, field);
            return Ok(SaveOutcome::Unchanged);
        }

        self.service.update_exercise_set_field(set_id, field).await?;
        self.saved.record(set_id, field);
        self.edit(set_id, field);
        Ok(SaveOutcome::Written)
    }

    /// Finishes a regular session: every set is written with its weight
    /// resolved against the one-rep max, then the counter goes up by one.
    ///
    /// Writes go out one by one. The first failure is returned as is; sets
    /// written before it stay written and the counter is left untouched.
    pub async fn finish(&mut self) -> Result<FinishOutcome, StoreError> {
        let step = self.service.training().plate_step;
        let resolved: Vec<ExerciseSet> = self
            .exercises
            .iter()
            .flat_map(|e| {
                let orm = self.one_rep_max(e.exercise.id);
                e.sets.iter().map(move |set| ExerciseSet {
                    weight: training::resolve_weight(set.weight, set.percentage, orm, step),
                    ..set.clone()
                })
            })
            .collect();

        for (written, set) in resolved.iter().enumerate() {
            if let Err(e) = self.service.update_exercise_set(set).await {
                warn!(
                    "Finishing workout {} failed after {} of {} sets: {}",
                    self.workout.id,
                    written,
                    resolved.len(),
                    e
                );
                return Err(e);
            }
            for kind in SetFieldKind::ALL {
                self.saved.record(set.id, set.field(kind));
            }
            if let Some(local) = self.locate_mut(set.id) {
                *local = set.clone();
            }
        }

        let counter = self
            .service
            .increment_workout_counter(self.workout.id, self.workout.counter)
            .await?;
        self.workout.counter = counter;
        let deload_due = self.deload_due();
        info!(
            "Finished workout {} ({} sets), counter now {}{}",
            self.workout.id,
            resolved.len(),
            counter,
            if deload_due { ", deload due" } else { "" }
        );

        Ok(FinishOutcome {
            counter,
            deload_due,
        })
    }

    /// The lighter variant of this session. Nothing is written.
    pub async fn deloaded_exercises(&self) -> Result<Vec<SessionExercise>, StoreError> {
        self.service.get_deloaded_exercises(self.workout.id).await
    }

    /// Finishes a deload session: set edits are discarded and only the counter
    /// is reset.
    pub async fn finish_deload(&mut self) -> Result<(), StoreError> {
        self.service.finish_deload_session(self.workout.id).await?;
        self.workout.counter = 0;
        Ok(())
    }
}
