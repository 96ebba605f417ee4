use diesel::{Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::db::schema;
use crate::error::FieldError;

/// Primary key of the one and only settings row.
pub const SETTINGS_ID: i32 = 1;

// Workout plan models
#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = schema::workout_plans)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WorkoutPlan {
    pub id: i32,
    pub name: String,
}

#[derive(Insertable)]
#[diesel(table_name = schema::workout_plans)]
pub struct NewWorkoutPlan<'a> {
    pub name: &'a str,
}

// Workout models
#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = schema::workouts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Workout {
    pub id: i32,
    pub name: String,
    pub workout_plan_id: i32,
    /// Sessions completed since the last deload.
    pub counter: i32,
}

#[derive(Insertable)]
#[diesel(table_name = schema::workouts)]
pub struct NewWorkout<'a> {
    pub name: &'a str,
    pub workout_plan_id: i32,
}

// Exercise models
#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = schema::exercises)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Exercise {
    pub id: i32,
    pub name: String,
}

#[derive(Insertable)]
#[diesel(table_name = schema::exercises)]
pub struct NewExercise<'a> {
    pub name: &'a str,
}

/// Link between an exercise of the catalog and a workout. Owns its sets.
#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = schema::workout_exercises)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WorkoutExercise {
    pub id: i32,
    pub exercise_id: i32,
    pub workout_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = schema::workout_exercises)]
pub struct NewWorkoutExercise {
    pub exercise_id: i32,
    pub workout_id: i32,
}

// Set models
#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = schema::exercise_sets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ExerciseSet {
    pub id: i32,
    pub set_number: i32,
    /// Written at save time. Derived from the one-rep max while `percentage > 0`
    /// and a one-rep max exists; never recomputed at rest.
    pub weight: f64,
    pub reps: i32,
    pub rir: i32,
    pub percentage: f64,
    pub workout_exercise_id: i32,
}

impl ExerciseSet {
    /// Current value of one updatable field.
    pub fn field(&self, kind: SetFieldKind) -> SetField {
        match kind {
            SetFieldKind::Weight => SetField::Weight(self.weight),
            SetFieldKind::Reps => SetField::Reps(self.reps),
            SetFieldKind::Rir => SetField::Rir(self.rir),
            SetFieldKind::Percentage => SetField::Percentage(self.percentage),
        }
    }

    pub fn apply(&mut self, field: SetField) {
        match field {
            SetField::Weight(weight) => self.weight = weight,
            SetField::Reps(reps) => self.reps = reps,
            SetField::Rir(rir) => self.rir = rir,
            SetField::Percentage(percentage) => self.percentage = percentage,
        }
    }
}

impl fmt::Display for ExerciseSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pct_str = if self.percentage > 0.0 {
            format!(" ({}%)", self.percentage)
        } else {
            String::new()
        };

        write!(
            f,
            "Set #{}: {:.2}kg x {} reps @{} RIR{}",
            self.set_number, self.weight, self.reps, self.rir, pct_str
        )
    }
}

#[derive(Insertable)]
#[diesel(table_name = schema::exercise_sets)]
pub struct NewExerciseSet {
    pub set_number: i32,
    pub workout_exercise_id: i32,
}

/// The columns of a set that may be written one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetFieldKind {
    Weight,
    Reps,
    Rir,
    Percentage,
}

impl SetFieldKind {
    pub const ALL: [SetFieldKind; 4] = [
        SetFieldKind::Weight,
        SetFieldKind::Reps,
        SetFieldKind::Rir,
        SetFieldKind::Percentage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SetFieldKind::Weight => "weight",
            SetFieldKind::Reps => "reps",
            SetFieldKind::Rir => "rir",
            SetFieldKind::Percentage => "percentage",
        }
    }
}

impl fmt::Display for SetFieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SetFieldKind {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weight" => Ok(SetFieldKind::Weight),
            "reps" => Ok(SetFieldKind::Reps),
            "rir" => Ok(SetFieldKind::Rir),
            "percentage" => Ok(SetFieldKind::Percentage),
            _ => Err(FieldError::UnknownField(s.to_string())),
        }
    }
}

/// A single-field set update together with its new value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "lowercase")]
pub enum SetField {
    Weight(f64),
    Reps(i32),
    Rir(i32),
    Percentage(f64),
}

impl SetField {
    /// Builds an update from a column name as typed by a user.
    ///
    /// Integer columns round the value to the nearest whole number.
    pub fn parse(name: &str, value: f64) -> Result<Self, FieldError> {
        Ok(SetField::new(name.parse()?, value))
    }

    pub fn new(kind: SetFieldKind, value: f64) -> Self {
        match kind {
            SetFieldKind::Weight => SetField::Weight(value),
            SetFieldKind::Reps => SetField::Reps(value.round() as i32),
            SetFieldKind::Rir => SetField::Rir(value.round() as i32),
            SetFieldKind::Percentage => SetField::Percentage(value),
        }
    }

    pub fn kind(&self) -> SetFieldKind {
        match self {
            SetField::Weight(_) => SetFieldKind::Weight,
            SetField::Reps(_) => SetFieldKind::Reps,
            SetField::Rir(_) => SetFieldKind::Rir,
            SetField::Percentage(_) => SetFieldKind::Percentage,
        }
    }
}

// One-rep max models
#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = schema::one_rep_maxes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OneRepMax {
    pub id: i32,
    pub exercise_id: i32,
    pub weight: f64,
}

#[derive(Insertable)]
#[diesel(table_name = schema::one_rep_maxes)]
pub struct NewOneRepMax {
    pub exercise_id: i32,
    pub weight: f64,
}

/// Process-wide configuration row. Created by the initial migration.
#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = schema::settings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Settings {
    pub id: i32,
    pub deload_enabled: bool,
    pub deload_every_sessions: i32,
}

impl Settings {
    pub fn new(deload_enabled: bool, deload_every_sessions: i32) -> Self {
        Settings {
            id: SETTINGS_ID,
            deload_enabled,
            deload_every_sessions,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings::new(false, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_are_allow_listed() {
        assert_eq!(SetField::parse("weight", 82.5), Ok(SetField::Weight(82.5)));
        assert_eq!(SetField::parse(" Reps ", 8.0), Ok(SetField::Reps(8)));
        assert_eq!(SetField::parse("RIR", 2.4), Ok(SetField::Rir(2)));
        assert_eq!(
            SetField::parse("percentage", 75.0),
            Ok(SetField::Percentage(75.0))
        );

        for bad in ["id", "set_number", "workout_exercise_id", "weight; DROP TABLE", ""] {
            assert_eq!(
                SetField::parse(bad, 1.0),
                Err(FieldError::UnknownField(bad.to_string()))
            );
        }
    }

    #[test]
    fn apply_and_read_back_fields() {
        let mut set = ExerciseSet {
            id: 1,
            set_number: 1,
            weight: 0.0,
            reps: 0,
            rir: 0,
            percentage: 0.0,
            workout_exercise_id: 7,
        };
        set.apply(SetField::Weight(100.0));
        set.apply(SetField::Rir(3));

        assert_eq!(set.field(SetFieldKind::Weight), SetField::Weight(100.0));
        assert_eq!(set.field(SetFieldKind::Rir), SetField::Rir(3));
        assert_eq!(set.field(SetFieldKind::Reps), SetField::Reps(0));
        assert_eq!(set.to_string(), "Set #1: 100.00kg x 0 reps @3 RIR");
    }
}
