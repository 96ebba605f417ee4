//! Training-load engine. Pure functions only; nothing here touches storage.

pub mod deload;
pub mod load;

pub use self::deload::{DeloadPolicy, SessionFinish, SessionState, is_deload_due};
pub use self::load::{
    DEFAULT_PLATE_STEP, calculate_weight, is_weight_locked, resolve_weight, round_to_step,
};
