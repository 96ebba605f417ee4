pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod repository;
pub mod service;
pub mod session;
pub mod training;
pub mod views;

pub use config::{Config, TrainingConfig};
pub use db::Database;
pub use error::{FieldError, StoreError};
pub use repository::{SqliteWorkoutRepository, WorkoutRepository};
pub use service::WorkoutService;
