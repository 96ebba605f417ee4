//! Per-activation state of the workout screen.
//!
//! Everything here lives only as long as the screen is open: the deload
//! prompt flag, the auto-save cache and the locally edited sets.

mod autosave;
mod prompt;
mod screen;

pub use autosave::AutoSaveCache;
pub use prompt::DeloadPrompt;
pub use screen::{FinishOutcome, SaveOutcome, SessionScreen};
