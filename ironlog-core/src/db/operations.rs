//! Synchronous diesel queries, one per gateway method.
//!
//! These run on a blocking thread; [`crate::repository::SqliteWorkoutRepository`]
//! is the async face over them.

use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel::sqlite::SqliteConnection;

use crate::db::models::{
    Exercise, ExerciseSet, NewExercise, NewExerciseSet, NewOneRepMax, NewWorkout,
    NewWorkoutExercise, NewWorkoutPlan, OneRepMax, SETTINGS_ID, SetField, Settings, Workout,
    WorkoutExercise, WorkoutPlan,
};
use crate::db::schema::{
    exercise_sets, exercises, one_rep_maxes, settings, workout_exercises, workout_plans, workouts,
};

/// Updates address exactly one row; touching none means the id was stale.
fn expect_row(affected: usize) -> QueryResult<()> {
    if affected == 0 {
        Err(DieselError::NotFound)
    } else {
        Ok(())
    }
}

// Workout plans
pub fn select_workout_plans(conn: &mut SqliteConnection) -> QueryResult<Vec<WorkoutPlan>> {
    workout_plans::table
        .order(workout_plans::id.asc())
        .select(WorkoutPlan::as_select())
        .load(conn)
}

pub fn select_workout_plan(
    conn: &mut SqliteConnection,
    workout_plan_id: i32,
) -> QueryResult<Option<WorkoutPlan>> {
    workout_plans::table
        .find(workout_plan_id)
        .select(WorkoutPlan::as_select())
        .first(conn)
        .optional()
}

pub fn insert_workout_plan(conn: &mut SqliteConnection, name: &str) -> QueryResult<i32> {
    diesel::insert_into(workout_plans::table)
        .values(&NewWorkoutPlan { name })
        .returning(workout_plans::id)
        .get_result(conn)
}

pub fn update_workout_plan_name(
    conn: &mut SqliteConnection,
    workout_plan_id: i32,
    name: &str,
) -> QueryResult<()> {
    let affected = diesel::update(workout_plans::table.find(workout_plan_id))
        .set(workout_plans::name.eq(name))
        .execute(conn)?;
    expect_row(affected)
}

pub fn delete_workout_plan(
    conn: &mut SqliteConnection,
    workout_plan_id: i32,
) -> QueryResult<usize> {
    diesel::delete(workout_plans::table.find(workout_plan_id)).execute(conn)
}

// Workouts
pub fn select_workouts_of_plan(
    conn: &mut SqliteConnection,
    workout_plan_id: i32,
) -> QueryResult<Vec<Workout>> {
    workouts::table
        .filter(workouts::workout_plan_id.eq(workout_plan_id))
        .order(workouts::id.asc())
        .select(Workout::as_select())
        .load(conn)
}

pub fn select_workout(
    conn: &mut SqliteConnection,
    workout_id: i32,
) -> QueryResult<Option<Workout>> {
    workouts::table
        .find(workout_id)
        .select(Workout::as_select())
        .first(conn)
        .optional()
}

pub fn insert_workout(
    conn: &mut SqliteConnection,
    name: &str,
    workout_plan_id: i32,
) -> QueryResult<i32> {
    diesel::insert_into(workouts::table)
        .values(&NewWorkout {
            name,
            workout_plan_id,
        })
        .returning(workouts::id)
        .get_result(conn)
}

pub fn update_workout_name(
    conn: &mut SqliteConnection,
    workout_id: i32,
    name: &str,
) -> QueryResult<()> {
    let affected = diesel::update(workouts::table.find(workout_id))
        .set(workouts::name.eq(name))
        .execute(conn)?;
    expect_row(affected)
}

pub fn update_workout_counter(
    conn: &mut SqliteConnection,
    workout_id: i32,
    counter: i32,
) -> QueryResult<()> {
    let affected = diesel::update(workouts::table.find(workout_id))
        .set(workouts::counter.eq(counter))
        .execute(conn)?;
    expect_row(affected)
}

pub fn delete_workout(conn: &mut SqliteConnection, workout_id: i32) -> QueryResult<usize> {
    diesel::delete(workouts::table.find(workout_id)).execute(conn)
}

// Exercises
pub fn select_exercises(conn: &mut SqliteConnection) -> QueryResult<Vec<Exercise>> {
    exercises::table
        .order(exercises::id.asc())
        .select(Exercise::as_select())
        .load(conn)
}

pub fn select_exercise(
    conn: &mut SqliteConnection,
    exercise_id: i32,
) -> QueryResult<Option<Exercise>> {
    exercises::table
        .find(exercise_id)
        .select(Exercise::as_select())
        .first(conn)
        .optional()
}

pub fn insert_exercise(conn: &mut SqliteConnection, name: &str) -> QueryResult<i32> {
    diesel::insert_into(exercises::table)
        .values(&NewExercise { name })
        .returning(exercises::id)
        .get_result(conn)
}

pub fn update_exercise_name(
    conn: &mut SqliteConnection,
    exercise_id: i32,
    name: &str,
) -> QueryResult<()> {
    let affected = diesel::update(exercises::table.find(exercise_id))
        .set(exercises::name.eq(name))
        .execute(conn)?;
    expect_row(affected)
}

pub fn delete_exercise(conn: &mut SqliteConnection, exercise_id: i32) -> QueryResult<usize> {
    diesel::delete(exercises::table.find(exercise_id)).execute(conn)
}

// Workout exercises
pub fn select_workout_exercises(
    conn: &mut SqliteConnection,
    workout_id: i32,
) -> QueryResult<Vec<WorkoutExercise>> {
    workout_exercises::table
        .filter(workout_exercises::workout_id.eq(workout_id))
        .order(workout_exercises::id.asc())
        .select(WorkoutExercise::as_select())
        .load(conn)
}

pub fn select_workout_exercises_of_exercise(
    conn: &mut SqliteConnection,
    exercise_id: i32,
) -> QueryResult<Vec<WorkoutExercise>> {
    workout_exercises::table
        .filter(workout_exercises::exercise_id.eq(exercise_id))
        .order(workout_exercises::id.asc())
        .select(WorkoutExercise::as_select())
        .load(conn)
}

pub fn insert_workout_exercise(
    conn: &mut SqliteConnection,
    exercise_id: i32,
    workout_id: i32,
) -> QueryResult<i32> {
    diesel::insert_into(workout_exercises::table)
        .values(&NewWorkoutExercise {
            exercise_id,
            workout_id,
        })
        .returning(workout_exercises::id)
        .get_result(conn)
}

pub fn delete_workout_exercise(
    conn: &mut SqliteConnection,
    workout_exercise_id: i32,
) -> QueryResult<usize> {
    diesel::delete(workout_exercises::table.find(workout_exercise_id)).execute(conn)
}

// Sets
pub fn select_exercise_sets(
    conn: &mut SqliteConnection,
    workout_exercise_id: i32,
) -> QueryResult<Vec<ExerciseSet>> {
    exercise_sets::table
        .filter(exercise_sets::workout_exercise_id.eq(workout_exercise_id))
        .order(exercise_sets::id.asc())
        .select(ExerciseSet::as_select())
        .load(conn)
}

pub fn insert_exercise_set(
    conn: &mut SqliteConnection,
    set_number: i32,
    workout_exercise_id: i32,
) -> QueryResult<i32> {
    diesel::insert_into(exercise_sets::table)
        .values(&NewExerciseSet {
            set_number,
            workout_exercise_id,
        })
        .returning(exercise_sets::id)
        .get_result(conn)
}

pub fn update_exercise_set(conn: &mut SqliteConnection, set: &ExerciseSet) -> QueryResult<()> {
    let affected = diesel::update(exercise_sets::table.find(set.id))
        .set((
            exercise_sets::set_number.eq(set.set_number),
            exercise_sets::weight.eq(set.weight),
            exercise_sets::reps.eq(set.reps),
            exercise_sets::rir.eq(set.rir),
            exercise_sets::percentage.eq(set.percentage),
            exercise_sets::workout_exercise_id.eq(set.workout_exercise_id),
        ))
        .execute(conn)?;
    expect_row(affected)
}

/// Writes one column of a set. The column is chosen by the variant, never by
/// a caller-supplied name.
pub fn update_exercise_set_field(
    conn: &mut SqliteConnection,
    set_id: i32,
    field: SetField,
) -> QueryResult<()> {
    let target = exercise_sets::table.find(set_id);
    let affected = match field {
        SetField::Weight(weight) => diesel::update(target)
            .set(exercise_sets::weight.eq(weight))
            .execute(conn)?,
        SetField::Reps(reps) => diesel::update(target)
            .set(exercise_sets::reps.eq(reps))
            .execute(conn)?,
        SetField::Rir(rir) => diesel::update(target)
            .set(exercise_sets::rir.eq(rir))
            .execute(conn)?,
        SetField::Percentage(percentage) => diesel::update(target)
            .set(exercise_sets::percentage.eq(percentage))
            .execute(conn)?,
    };
    expect_row(affected)
}

pub fn delete_exercise_set(conn: &mut SqliteConnection, set_id: i32) -> QueryResult<usize> {
    diesel::delete(exercise_sets::table.find(set_id)).execute(conn)
}

// One-rep maxes
pub fn select_one_rep_maxes(conn: &mut SqliteConnection) -> QueryResult<Vec<OneRepMax>> {
    one_rep_maxes::table
        .order(one_rep_maxes::id.asc())
        .select(OneRepMax::as_select())
        .load(conn)
}

/// Latest one-rep max recorded for an exercise.
pub fn select_exercise_one_rep_max(
    conn: &mut SqliteConnection,
    exercise_id: i32,
) -> QueryResult<Option<OneRepMax>> {
    one_rep_maxes::table
        .filter(one_rep_maxes::exercise_id.eq(exercise_id))
        .order(one_rep_maxes::id.desc())
        .select(OneRepMax::as_select())
        .first(conn)
        .optional()
}

pub fn insert_one_rep_max(
    conn: &mut SqliteConnection,
    exercise_id: i32,
    weight: f64,
) -> QueryResult<i32> {
    diesel::insert_into(one_rep_maxes::table)
        .values(&NewOneRepMax {
            exercise_id,
            weight,
        })
        .returning(one_rep_maxes::id)
        .get_result(conn)
}

pub fn update_one_rep_max(
    conn: &mut SqliteConnection,
    one_rep_max_id: i32,
    weight: f64,
) -> QueryResult<()> {
    let affected = diesel::update(one_rep_maxes::table.find(one_rep_max_id))
        .set(one_rep_maxes::weight.eq(weight))
        .execute(conn)?;
    expect_row(affected)
}

pub fn delete_one_rep_max(conn: &mut SqliteConnection, one_rep_max_id: i32) -> QueryResult<usize> {
    diesel::delete(one_rep_maxes::table.find(one_rep_max_id)).execute(conn)
}

// Settings
pub fn select_settings(conn: &mut SqliteConnection) -> QueryResult<Settings> {
    settings::table
        .find(SETTINGS_ID)
        .select(Settings::as_select())
        .first(conn)
}

pub fn update_settings(conn: &mut SqliteConnection, update: &Settings) -> QueryResult<()> {
    let affected = diesel::update(settings::table.find(SETTINGS_ID))
        .set((
            settings::deload_enabled.eq(update.deload_enabled),
            settings::deload_every_sessions.eq(update.deload_every_sessions),
        ))
        .execute(conn)?;
    expect_row(affected)
}
