//! Session engine implementation.
//!
//! The session engine is a whole-second countdown state machine. It does not
//! use internal threads or clocks - the caller is responsible for calling
//! `tick()` once per second while the session is running.
//!
//! ## Phase Transitions
//!
//! ```text
//! GetReady -> Workout -> Rest -> Workout -> Rest -> ...
//!      \          |        |
//!       `----- Paused (overlay, via pause()/resume())
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = SessionEngine::new(Durations::new(30, 10));
//! engine.start();
//! // Once per second:
//! if let Some(event) = engine.tick() { /* phase changed */ }
//! for cue in engine.drain_cues() { /* play it */ }
//! ```

use std::collections::VecDeque;
use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use uuid::Uuid;

use super::durations::{Durations, GET_READY_SECS};
use super::schedule::ExerciseSchedule;
use super::stats::SessionStats;
use crate::error::ValidationError;
use crate::events::{Event, SoundCue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    GetReady,
    Workout,
    Rest,
    /// Overlay over one of the other phases; see [`PausedSnapshot`].
    Paused,
}

impl Phase {
    /// Heading shown by the display for this phase.
    pub fn label(&self) -> &'static str {
        match self {
            Phase::GetReady => "GET READY!",
            Phase::Workout => "WORKOUT!",
            Phase::Rest => "REST",
            Phase::Paused => "PAUSED",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::GetReady => "GET_READY",
            Phase::Workout => "WORKOUT",
            Phase::Rest => "REST",
            Phase::Paused => "PAUSED",
        })
    }
}

/// Countdown position saved on pause and restored on resume or stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PausedSnapshot {
    pub phase: Phase,
    pub remaining_secs: u32,
}

/// Read-only view handed to the coaching feedback collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackSnapshot {
    pub completed_rounds: u32,
    pub total_workout_secs: u64,
    pub total_rest_secs: u64,
    pub current_exercise: String,
}

/// Core session engine.
///
/// Owned by exactly one session; commands and ticks must be serialized by
/// the driver. Commands issued in the wrong state are silent no-ops and
/// return `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEngine {
    phase: Phase,
    running: bool,
    remaining_secs: u32,
    durations: Durations,
    /// Set exactly while `phase` is `Paused`.
    #[serde(default)]
    pre_pause: Option<PausedSnapshot>,
    stats: SessionStats,
    schedule: ExerciseSchedule,
    /// True once the current run has passed get-ready with fresh counters.
    stats_initialized: bool,
    #[serde(default)]
    run_id: Option<Uuid>,
    #[serde(skip)]
    pending_cues: VecDeque<SoundCue>,
}

impl SessionEngine {
    /// Create an idle engine showing the get-ready countdown.
    pub fn new(durations: Durations) -> Self {
        Self {
            phase: Phase::GetReady,
            running: false,
            remaining_secs: GET_READY_SECS,
            durations,
            pre_pause: None,
            stats: SessionStats::default(),
            schedule: ExerciseSchedule::default(),
            stats_initialized: false,
            run_id: None,
            pending_cues: VecDeque::new(),
        }
    }

    pub fn with_schedule(mut self, schedule: ExerciseSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// Counting down a non-paused phase.
    pub fn is_running(&self) -> bool {
        self.running && self.phase != Phase::Paused
    }

    /// Active at all, paused or not.
    pub fn is_running_or_paused(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.running && self.phase == Phase::Paused
    }

    pub fn durations(&self) -> Durations {
        self.durations
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn completed_rounds(&self) -> u32 {
        self.stats.completed_rounds
    }

    pub fn total_workout_secs(&self) -> u64 {
        self.stats.workout_secs
    }

    pub fn total_rest_secs(&self) -> u64 {
        self.stats.rest_secs
    }

    pub fn total_active_secs(&self) -> u64 {
        self.stats.total_active_secs()
    }

    pub fn stats_initialized_for_run(&self) -> bool {
        self.stats_initialized
    }

    pub fn pre_pause_snapshot(&self) -> Option<PausedSnapshot> {
        self.pre_pause
    }

    pub fn run_id(&self) -> Option<Uuid> {
        self.run_id
    }

    pub fn schedule(&self) -> &ExerciseSchedule {
        &self.schedule
    }

    pub fn current_exercise_index(&self) -> usize {
        self.schedule.cursor()
    }

    pub fn current_exercise(&self) -> Option<&str> {
        self.schedule.current()
    }

    pub fn next_exercise(&self) -> Option<&str> {
        self.schedule.next()
    }

    /// Configured length of `phase`. Zero for `Paused`, which has no length
    /// of its own.
    pub fn phase_duration(&self, phase: Phase) -> u32 {
        match phase {
            Phase::GetReady => GET_READY_SECS,
            Phase::Workout => self.durations.workout_secs,
            Phase::Rest => self.durations.rest_secs,
            Phase::Paused => 0,
        }
    }

    /// Phase and remaining time as the user sees them; the saved position
    /// while paused.
    pub fn display_position(&self) -> (Phase, u32) {
        match (self.phase, self.pre_pause) {
            (Phase::Paused, Some(snap)) => (snap.phase, snap.remaining_secs),
            _ => (self.phase, self.remaining_secs),
        }
    }

    /// Remaining time as `MM:SS`.
    pub fn display_time(&self) -> String {
        format_clock(u64::from(self.display_position().1))
    }

    /// 0.0 ..= 1.0 progress through the displayed phase.
    pub fn progress(&self) -> f64 {
        let (phase, remaining) = self.display_position();
        let total = self.phase_duration(phase);
        if total == 0 {
            return 0.0;
        }
        let elapsed = total as f64 - remaining as f64;
        (elapsed / total as f64).clamp(0.0, 1.0)
    }

    /// Integer percent for a progress bar, truncated.
    pub fn progress_pct(&self) -> u8 {
        let (phase, remaining) = self.display_position();
        let total = u64::from(self.phase_duration(phase));
        if total == 0 {
            return 0;
        }
        let elapsed = total.saturating_sub(u64::from(remaining));
        (elapsed * 100 / total) as u8
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        let (display_phase, _) = self.display_position();
        Event::StateSnapshot {
            run_id: self.run_id,
            running: self.running,
            phase: self.phase,
            display_phase,
            remaining_secs: self.remaining_secs,
            display_time: self.display_time(),
            progress_pct: self.progress_pct(),
            current_exercise: self.current_exercise().map(str::to_string),
            next_exercise: self.next_exercise().map(str::to_string),
            completed_rounds: self.stats.completed_rounds,
            workout_secs: self.stats.workout_secs,
            rest_secs: self.stats.rest_secs,
            total_active_secs: self.stats.total_active_secs(),
            at: Utc::now(),
        }
    }

    /// Stats for the coaching collaborator; only offered while paused and
    /// with a schedule to talk about.
    pub fn feedback_snapshot(&self) -> Result<FeedbackSnapshot, ValidationError> {
        if !self.is_paused() {
            return Err(ValidationError::InvalidState(
                "feedback is only available while paused".into(),
            ));
        }
        let current_exercise = self
            .current_exercise()
            .ok_or_else(|| ValidationError::EmptyCollection("workout schedule".into()))?
            .to_string();
        Ok(FeedbackSnapshot {
            completed_rounds: self.stats.completed_rounds,
            total_workout_secs: self.stats.workout_secs,
            total_rest_secs: self.stats.rest_secs,
            current_exercise,
        })
    }

    // ── Sound cues ───────────────────────────────────────────────────

    /// Hand queued cues to the audio side, oldest first.
    pub fn drain_cues(&mut self) -> Vec<SoundCue> {
        self.pending_cues.drain(..).collect()
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if self.running || self.phase == Phase::Paused {
            trace!(phase = %self.phase, running = self.running, "start ignored");
            return None;
        }

        let fresh = !self.stats_initialized;
        if fresh {
            self.stats = SessionStats::default();
            self.schedule.rewind();
            self.phase = Phase::GetReady;
            self.remaining_secs = GET_READY_SECS;
            self.pre_pause = None;
            self.run_id = Some(Uuid::new_v4());
            self.emit(SoundCue::SessionStart);
        } else if self.remaining_secs == 0 {
            self.remaining_secs = self.phase_duration(self.phase);
        }
        self.running = true;

        debug!(fresh, phase = %self.phase, remaining = self.remaining_secs, "session started");
        Some(Event::TimerStarted {
            run_id: self.run_id,
            fresh,
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.running || self.phase == Phase::Paused {
            trace!(phase = %self.phase, running = self.running, "pause ignored");
            return None;
        }

        let snap = PausedSnapshot {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
        };
        self.pre_pause = Some(snap);
        self.phase = Phase::Paused;

        debug!(phase = %snap.phase, remaining = snap.remaining_secs, "session paused");
        Some(Event::TimerPaused {
            phase: snap.phase,
            remaining_secs: snap.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn resume(&mut self) -> Option<Event> {
        if !self.running || self.phase != Phase::Paused {
            trace!(phase = %self.phase, running = self.running, "resume ignored");
            return None;
        }

        self.restore_pre_pause();

        debug!(phase = %self.phase, remaining = self.remaining_secs, "session resumed");
        Some(Event::TimerResumed {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Halt the countdown. A paused session is first put back on the phase
    /// it was paused in.
    pub fn stop(&mut self) -> Option<Event> {
        let was_active = self.running || self.phase == Phase::Paused;
        self.running = false;
        if self.phase == Phase::Paused {
            self.restore_pre_pause();
        }
        if !was_active {
            trace!("stop ignored");
            return None;
        }

        debug!(phase = %self.phase, remaining = self.remaining_secs, "session stopped");
        Some(Event::TimerStopped {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.running = false;
        self.phase = Phase::GetReady;
        self.remaining_secs = GET_READY_SECS;
        self.stats = SessionStats::default();
        self.schedule.rewind();
        self.stats_initialized = false;
        self.pre_pause = None;
        self.run_id = None;

        debug!("session reset");
        Some(Event::TimerReset { at: Utc::now() })
    }

    /// Store new phase lengths. An idle engine also goes back to the
    /// get-ready countdown so the new lengths apply to the next run; an
    /// active or paused run keeps its position.
    pub fn update_durations(&mut self, workout_secs: u32, rest_secs: u32) -> Option<Event> {
        self.durations = Durations::new(workout_secs, rest_secs);

        let display_reset = !self.running && self.phase != Phase::Paused;
        if display_reset {
            self.phase = Phase::GetReady;
            self.remaining_secs = GET_READY_SECS;
            self.stats_initialized = false;
            self.pre_pause = None;
        }

        debug!(workout_secs, rest_secs, display_reset, "durations updated");
        Some(Event::DurationsUpdated {
            workout_secs,
            rest_secs,
            display_reset,
            at: Utc::now(),
        })
    }

    /// Replace the exercise list, keeping the rotation position when it is
    /// still in range.
    pub fn replace_schedule<I, S>(&mut self, exercises: I) -> Option<Event>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schedule.replace(exercises);
        debug!(len = self.schedule.len(), cursor = self.schedule.cursor(), "schedule replaced");
        Some(Event::ScheduleReplaced {
            len: self.schedule.len(),
            cursor: self.schedule.cursor(),
            at: Utc::now(),
        })
    }

    /// Replace the exercise list and restart the rotation from the top.
    pub fn edit_schedule<I, S>(&mut self, exercises: I) -> Option<Event>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schedule.replace(exercises);
        self.schedule.rewind();
        debug!(len = self.schedule.len(), "schedule edited");
        Some(Event::ScheduleReplaced {
            len: self.schedule.len(),
            cursor: 0,
            at: Utc::now(),
        })
    }

    /// Call once per second. Returns `Some(Event::PhaseChanged)` when a
    /// countdown expires.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }

        // Credit the second being spent. The expiring tick at zero is not
        // counted again.
        match self.phase {
            Phase::Paused => {
                self.stats.credit_rest();
                return None;
            }
            Phase::Workout if self.remaining_secs > 0 => self.stats.credit_workout(),
            Phase::GetReady | Phase::Rest if self.remaining_secs > 0 => self.stats.credit_rest(),
            _ => {}
        }

        if self.remaining_secs > 0 {
            self.remaining_secs -= 1;
            return None;
        }

        self.advance_phase()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn advance_phase(&mut self) -> Option<Event> {
        let from = self.phase;
        match from {
            Phase::GetReady => {
                self.phase = Phase::Workout;
                self.remaining_secs = self.durations.workout_secs;
                self.stats_initialized = true;
                self.emit(SoundCue::WorkoutStart);
            }
            Phase::Workout => {
                self.phase = Phase::Rest;
                self.remaining_secs = self.durations.rest_secs;
                self.stats.complete_round();
                self.emit(SoundCue::RestStart);
            }
            Phase::Rest => {
                // The upcoming workout's exercise must be current before it starts.
                self.schedule.advance();
                self.phase = Phase::Workout;
                self.remaining_secs = self.durations.workout_secs;
                self.emit(SoundCue::WorkoutStart);
            }
            Phase::Paused => return None,
        }

        debug!(
            from = %from,
            to = %self.phase,
            remaining = self.remaining_secs,
            rounds = self.stats.completed_rounds,
            "phase transition"
        );
        Some(Event::PhaseChanged {
            from,
            to: self.phase,
            remaining_secs: self.remaining_secs,
            completed_rounds: self.stats.completed_rounds,
            exercise: self.current_exercise().map(str::to_string),
            at: Utc::now(),
        })
    }

    fn restore_pre_pause(&mut self) {
        // A paused engine always carries a snapshot; fall back to the
        // get-ready countdown if a deserialized state lost it.
        let snap = self.pre_pause.take().unwrap_or(PausedSnapshot {
            phase: Phase::GetReady,
            remaining_secs: GET_READY_SECS,
        });
        self.phase = snap.phase;
        self.remaining_secs = snap.remaining_secs;
    }

    fn emit(&mut self, cue: SoundCue) {
        trace!(%cue, "sound cue queued");
        self.pending_cues.push_back(cue);
    }
}

impl Default for SessionEngine {
    fn default() -> Self {
        Self::new(Durations::default())
    }
}

/// Format whole seconds as zero-padded `MM:SS`.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
