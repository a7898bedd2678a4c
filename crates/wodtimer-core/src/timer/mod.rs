mod durations;
mod engine;
mod schedule;
mod stats;

pub use durations::{
    slider_options, validate_duration, Durations, DEFAULT_REST_SECS,
    DEFAULT_WORKOUT_SECS, DURATION_STEP_SECS, GET_READY_SECS, MAX_DURATION_SECS,
    MIN_DURATION_SECS,
};
pub use engine::{format_clock, FeedbackSnapshot, PausedSnapshot, Phase, SessionEngine};
pub use schedule::ExerciseSchedule;
pub use stats::SessionStats;
