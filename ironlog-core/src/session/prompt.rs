/// Remembers whether the deload suggestion was already shown during the
/// current screen activation.
#[derive(Debug, Default, Clone)]
pub struct DeloadPrompt {
    workout_id: Option<i32>,
    prompted: bool,
}

impl DeloadPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the prompt to a workout. Switching to another workout forgets
    /// the earlier prompt; re-activating the same one keeps it.
    pub fn activate(&mut self, workout_id: i32) {
        if self.workout_id != Some(workout_id) {
            self.workout_id = Some(workout_id);
            self.prompted = false;
        }
    }

    /// True the first time `due` holds for the active workout, false after.
    pub fn take(&mut self, due: bool) -> bool {
        if due && !self.prompted {
            self.prompted = true;
            return true;
        }
        false
    }

    pub fn prompted(&self) -> bool {
        self.prompted
    }
}
