use serde::{Deserialize, Serialize};

/// Elapsed-time counters for one run.
///
/// Rest seconds also absorb get-ready and paused time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub workout_secs: u64,
    pub rest_secs: u64,
    pub completed_rounds: u32,
}

impl SessionStats {
    pub fn total_active_secs(&self) -> u64 {
        self.workout_secs.saturating_add(self.rest_secs)
    }

    /// Fraction of active time spent working, `None` before any activity.
    pub fn workout_share(&self) -> Option<f64> {
        let total = self.total_active_secs();
        if total == 0 {
            return None;
        }
        Some(self.workout_secs as f64 / total as f64)
    }

    /// Labelled durations for an insights chart, zero-valued entries omitted.
    pub fn breakdown(&self) -> Vec<(&'static str, u64)> {
        [
            ("Workout Time", self.workout_secs),
            ("Prep & Rest Time", self.rest_secs),
        ]
        .into_iter()
        .filter(|(_, secs)| *secs > 0)
        .collect()
    }

    pub(crate) fn credit_workout(&mut self) {
        self.workout_secs = self.workout_secs.saturating_add(1);
    }

    pub(crate) fn credit_rest(&mut self) {
        self.rest_secs = self.rest_secs.saturating_add(1);
    }

    pub(crate) fn complete_round(&mut self) {
        self.completed_rounds = self.completed_rounds.saturating_add(1);
    }
}
