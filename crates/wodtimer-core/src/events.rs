use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timer::Phase;

/// Symbolic sound signal raised at a phase boundary.
///
/// The engine only decides which cue fires and when; mapping a cue to an
/// actual sound is up to the audio side (see [`crate::sound`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SoundCue {
    SessionStart,
    WorkoutStart,
    RestStart,
}

impl SoundCue {
    pub const ALL: [SoundCue; 3] = [
        SoundCue::SessionStart,
        SoundCue::WorkoutStart,
        SoundCue::RestStart,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCue::SessionStart => "session-start",
            SoundCue::WorkoutStart => "workout-start",
            SoundCue::RestStart => "rest-start",
        }
    }
}

impl fmt::Display for SoundCue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every state change of the session engine produces an Event.
/// Renderers poll snapshots; drivers log or forward the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A run began. `fresh` is false when a stopped run was picked up again.
    TimerStarted {
        run_id: Option<Uuid>,
        fresh: bool,
        phase: Phase,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        phase: Phase,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerResumed {
        phase: Phase,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerStopped {
        phase: Phase,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    /// A countdown reached zero and the next phase began.
    PhaseChanged {
        from: Phase,
        to: Phase,
        remaining_secs: u32,
        completed_rounds: u32,
        exercise: Option<String>,
        at: DateTime<Utc>,
    },
    DurationsUpdated {
        workout_secs: u32,
        rest_secs: u32,
        /// Whether the idle display was reset to the get-ready countdown.
        display_reset: bool,
        at: DateTime<Utc>,
    },
    ScheduleReplaced {
        len: usize,
        cursor: usize,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        run_id: Option<Uuid>,
        running: bool,
        phase: Phase,
        /// Phase shown to the user; the pre-pause phase while paused.
        display_phase: Phase,
        remaining_secs: u32,
        display_time: String,
        progress_pct: u8,
        current_exercise: Option<String>,
        next_exercise: Option<String>,
        completed_rounds: u32,
        workout_secs: u64,
        rest_secs: u64,
        total_active_secs: u64,
        at: DateTime<Utc>,
    },
}
