//! Phase lengths and the selectable duration range.
//!
//! Workout and rest lengths are picked from a discrete slider of 5..=180
//! seconds in steps of 5. The get-ready countdown is fixed.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Length of the get-ready countdown before the first workout interval.
pub const GET_READY_SECS: u32 = 10;

pub const MIN_DURATION_SECS: u32 = 5;
pub const MAX_DURATION_SECS: u32 = 180;
pub const DURATION_STEP_SECS: u32 = 5;

pub const DEFAULT_WORKOUT_SECS: u32 = 45;
pub const DEFAULT_REST_SECS: u32 = 15;

/// Configured workout and rest lengths in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Durations {
    pub workout_secs: u32,
    pub rest_secs: u32,
}

impl Durations {
    /// Build from values already checked by the configuration surface.
    pub fn new(workout_secs: u32, rest_secs: u32) -> Self {
        Self {
            workout_secs,
            rest_secs,
        }
    }

    /// Build from user input, rejecting values off the slider.
    pub fn validated(workout_secs: u32, rest_secs: u32) -> Result<Self, ValidationError> {
        Ok(Self {
            workout_secs: validate_duration("workout_duration", workout_secs)?,
            rest_secs: validate_duration("rest_duration", rest_secs)?,
        })
    }
}

impl Default for Durations {
    fn default() -> Self {
        Self::new(DEFAULT_WORKOUT_SECS, DEFAULT_REST_SECS)
    }
}

/// Check that `value` is one of the selectable slider positions.
pub fn validate_duration(field: &str, value: u32) -> Result<u32, ValidationError> {
    if !(MIN_DURATION_SECS..=MAX_DURATION_SECS).contains(&value) {
        return Err(ValidationError::DurationOutOfRange {
            field: field.to_string(),
            value,
            min: MIN_DURATION_SECS,
            max: MAX_DURATION_SECS,
        });
    }
    if value % DURATION_STEP_SECS != 0 {
        return Err(ValidationError::DurationNotOnStep {
            field: field.to_string(),
            value,
            step: DURATION_STEP_SECS,
        });
    }
    Ok(value)
}

/// All selectable slider positions, ascending.
pub fn slider_options() -> Vec<u32> {
    (MIN_DURATION_SECS..=MAX_DURATION_SECS)
        .step_by(DURATION_STEP_SECS as usize)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slider_covers_range_in_steps() {
        let opts = slider_options();
        assert_eq!(opts.len(), 36);
        assert_eq!(opts.first(), Some(&5));
        assert_eq!(opts.last(), Some(&180));
        assert!(opts.windows(2).all(|w| w[1] - w[0] == 5));
    }

    #[test]
    fn validate_accepts_slider_values() {
        assert_eq!(validate_duration("workout_duration", 5), Ok(5));
        assert_eq!(validate_duration("workout_duration", 180), Ok(180));
        assert!(Durations::validated(45, 15).is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_and_off_step() {
        assert!(matches!(
            validate_duration("rest_duration", 0),
            Err(ValidationError::DurationOutOfRange { value: 0, .. })
        ));
        assert!(matches!(
            validate_duration("rest_duration", 185),
            Err(ValidationError::DurationOutOfRange { .. })
        ));
        assert!(matches!(
            validate_duration("rest_duration", 17),
            Err(ValidationError::DurationNotOnStep { value: 17, .. })
        ));
    }

    #[test]
    fn defaults_match_slider() {
        let d = Durations::default();
        assert_eq!(d.workout_secs, 45);
        assert_eq!(d.rest_secs, 15);
        assert!(Durations::validated(d.workout_secs, d.rest_secs).is_ok());
    }
}
