//! Sound cue delivery.
//!
//! The engine queues [`SoundCue`]s; this module maps each cue to the sound
//! the user picked for it and hands it to a [`CuePlayer`]. Delivery failures
//! are logged and reported in the returned [`CueDispatch`], never propagated.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::SoundError;
use crate::events::SoundCue;

/// Choice that silences a cue.
pub const SOUND_NONE: &str = "None";

/// Sounds a cue can be mapped to.
pub const SOUND_OPTIONS: [&str; 7] = ["None", "coin", "error", "ping", "ready", "success", "message"];

pub const DEFAULT_SOUND: &str = "ping";

pub fn is_known_sound(name: &str) -> bool {
    SOUND_OPTIONS.iter().any(|s| s.eq_ignore_ascii_case(name))
}

/// Per-cue sound choices behind a master toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundSettings {
    #[serde(default = "default_true")]
    pub master_enabled: bool,
    #[serde(default = "default_sound")]
    pub session_start: String,
    #[serde(default = "default_sound")]
    pub workout_start: String,
    #[serde(default = "default_sound")]
    pub rest_start: String,
}

fn default_true() -> bool {
    true
}

fn default_sound() -> String {
    DEFAULT_SOUND.into()
}

impl Default for SoundSettings {
    fn default() -> Self {
        Self {
            master_enabled: true,
            session_start: default_sound(),
            workout_start: default_sound(),
            rest_start: default_sound(),
        }
    }
}

impl SoundSettings {
    pub fn choice(&self, cue: SoundCue) -> &str {
        match cue {
            SoundCue::SessionStart => &self.session_start,
            SoundCue::WorkoutStart => &self.workout_start,
            SoundCue::RestStart => &self.rest_start,
        }
    }

    pub fn set_choice(&mut self, cue: SoundCue, sound: impl Into<String>) {
        let sound = sound.into();
        match cue {
            SoundCue::SessionStart => self.session_start = sound,
            SoundCue::WorkoutStart => self.workout_start = sound,
            SoundCue::RestStart => self.rest_start = sound,
        }
    }

    /// Sound to play for `cue`, or `None` when muted.
    pub fn sound_for(&self, cue: SoundCue) -> Option<&str> {
        if !self.master_enabled {
            return None;
        }
        let choice = self.choice(cue).trim();
        if choice.is_empty() || choice.eq_ignore_ascii_case(SOUND_NONE) {
            return None;
        }
        Some(choice)
    }

    /// Every cue must name a sound from [`SOUND_OPTIONS`].
    pub fn validate(&self) -> Result<(), SoundError> {
        for cue in SoundCue::ALL {
            let choice = self.choice(cue);
            if !is_known_sound(choice) {
                return Err(SoundError::UnknownSound {
                    cue: cue.as_str().to_string(),
                    sound: choice.to_string(),
                    expected: SOUND_OPTIONS.join(", "),
                });
            }
        }
        Ok(())
    }
}

/// Audio side of the cue channel.
pub trait CuePlayer {
    /// Play `sound` for `cue`. `trigger` increases with every played cue so
    /// a front-end can tell two identical cues apart.
    fn play(&mut self, cue: SoundCue, sound: &str, trigger: u64) -> Result<(), SoundError>;
}

/// Outcome of delivering one cue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DispatchStatus {
    Played { sound: String, trigger: u64 },
    Muted,
    Failed { sound: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CueDispatch {
    pub cue: SoundCue,
    pub status: DispatchStatus,
}

/// Resolves cues against [`SoundSettings`] and feeds a [`CuePlayer`].
#[derive(Debug, Clone, Default)]
pub struct SoundDispatcher {
    settings: SoundSettings,
    trigger_count: u64,
}

impl SoundDispatcher {
    pub fn new(settings: SoundSettings) -> Self {
        Self {
            settings,
            trigger_count: 0,
        }
    }

    pub fn settings(&self) -> &SoundSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: SoundSettings) {
        self.settings = settings;
    }

    pub fn trigger_count(&self) -> u64 {
        self.trigger_count
    }

    pub fn dispatch(&mut self, cue: SoundCue, player: &mut dyn CuePlayer) -> CueDispatch {
        let Some(sound) = self.settings.sound_for(cue).map(str::to_string) else {
            debug!(%cue, "sound cue muted");
            return CueDispatch {
                cue,
                status: DispatchStatus::Muted,
            };
        };

        self.trigger_count += 1;
        let trigger = self.trigger_count;
        let status = match player.play(cue, &sound, trigger) {
            Ok(()) => DispatchStatus::Played { sound, trigger },
            Err(e) => {
                warn!(%cue, error = %e, "sound cue delivery failed");
                DispatchStatus::Failed {
                    sound,
                    reason: e.to_string(),
                }
            }
        };
        CueDispatch { cue, status }
    }

    /// Deliver a batch of cues in order, typically `engine.drain_cues()`.
    pub fn dispatch_all<I>(&mut self, cues: I, player: &mut dyn CuePlayer) -> Vec<CueDispatch>
    where
        I: IntoIterator<Item = SoundCue>,
    {
        cues.into_iter()
            .map(|cue| self.dispatch(cue, player))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        played: Vec<(SoundCue, String, u64)>,
        fail_on: Option<SoundCue>,
    }

    impl CuePlayer for Recorder {
        fn play(&mut self, cue: SoundCue, sound: &str, trigger: u64) -> Result<(), SoundError> {
            if self.fail_on == Some(cue) {
                return Err(SoundError::Playback {
                    sound: sound.into(),
                    message: "device busy".into(),
                });
            }
            self.played.push((cue, sound.into(), trigger));
            Ok(())
        }
    }

    #[test]
    fn default_settings_ping_on_every_cue() {
        let settings = SoundSettings::default();
        for cue in SoundCue::ALL {
            assert_eq!(settings.sound_for(cue), Some("ping"));
        }
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn master_toggle_and_none_choice_mute() {
        let mut settings = SoundSettings::default();
        settings.set_choice(SoundCue::RestStart, "none");
        assert_eq!(settings.sound_for(SoundCue::RestStart), None);
        assert_eq!(settings.sound_for(SoundCue::WorkoutStart), Some("ping"));

        settings.master_enabled = false;
        assert_eq!(settings.sound_for(SoundCue::WorkoutStart), None);
    }

    #[test]
    fn validate_rejects_unknown_sound() {
        let mut settings = SoundSettings::default();
        settings.set_choice(SoundCue::WorkoutStart, "airhorn");
        let err = settings.validate().unwrap_err();
        assert!(matches!(
            err,
            SoundError::UnknownSound { ref cue, ref sound, .. }
                if cue == "workout-start" && sound == "airhorn"
        ));
    }

    #[test]
    fn dispatch_counts_triggers_for_played_cues_only() {
        let mut settings = SoundSettings::default();
        settings.set_choice(SoundCue::SessionStart, "coin");
        settings.set_choice(SoundCue::RestStart, "None");
        let mut dispatcher = SoundDispatcher::new(settings);
        let mut player = Recorder::default();

        let results = dispatcher.dispatch_all(
            [SoundCue::SessionStart, SoundCue::RestStart, SoundCue::WorkoutStart],
            &mut player,
        );
        assert_eq!(results[1].status, DispatchStatus::Muted);
        assert_eq!(
            player.played,
            vec![
                (SoundCue::SessionStart, "coin".to_string(), 1),
                (SoundCue::WorkoutStart, "ping".to_string(), 2),
            ]
        );
        assert_eq!(dispatcher.trigger_count(), 2);
    }

    #[test]
    fn playback_failure_is_reported_not_raised() {
        let mut dispatcher = SoundDispatcher::default();
        let mut player = Recorder {
            fail_on: Some(SoundCue::WorkoutStart),
            ..Default::default()
        };
        let result = dispatcher.dispatch(SoundCue::WorkoutStart, &mut player);
        assert!(matches!(result.status, DispatchStatus::Failed { .. }));

        let result = dispatcher.dispatch(SoundCue::RestStart, &mut player);
        assert_eq!(
            result.status,
            DispatchStatus::Played {
                sound: "ping".into(),
                trigger: 2
            }
        );
    }
}
