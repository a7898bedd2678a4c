//! Integration tests for a full workout session driven tick by tick.

use wodtimer_core::sound::{CuePlayer, DispatchStatus};
use wodtimer_core::timer::GET_READY_SECS;
use wodtimer_core::{
    Config, Durations, Event, Phase, SessionEngine, SoundCue, SoundDispatcher, SoundError,
};

fn tick_until_phase(engine: &mut SessionEngine, phase: Phase, limit: usize) -> usize {
    for n in 1..=limit {
        engine.tick();
        if engine.phase() == phase {
            return n;
        }
    }
    panic!("phase {phase} not reached within {limit} ticks");
}

#[derive(Default)]
struct CollectingPlayer {
    sounds: Vec<String>,
}

impl CuePlayer for CollectingPlayer {
    fn play(&mut self, _cue: SoundCue, sound: &str, _trigger: u64) -> Result<(), SoundError> {
        self.sounds.push(sound.to_string());
        Ok(())
    }
}

struct BrokenSpeaker;

impl CuePlayer for BrokenSpeaker {
    fn play(&mut self, _cue: SoundCue, sound: &str, _trigger: u64) -> Result<(), SoundError> {
        Err(SoundError::Playback {
            sound: sound.to_string(),
            message: "no audio device".to_string(),
        })
    }
}

#[test]
fn test_full_two_round_session() {
    let mut engine = SessionEngine::new(Durations::new(3, 2));
    engine.edit_schedule(["Squats", "Push-ups", "Plank"]);
    engine.start();

    // Get ready: 10 countdown ticks plus the expiring tick.
    let ticks = tick_until_phase(&mut engine, Phase::Workout, 20);
    assert_eq!(ticks, GET_READY_SECS as usize + 1);
    assert_eq!(engine.current_exercise(), Some("Squats"));
    assert_eq!(engine.next_exercise(), Some("Push-ups"));

    // Workout 3s -> rest.
    assert_eq!(tick_until_phase(&mut engine, Phase::Rest, 10), 4);
    assert_eq!(engine.completed_rounds(), 1);
    assert_eq!(engine.current_exercise(), Some("Squats"));

    // Rest 2s -> workout on the next exercise.
    assert_eq!(tick_until_phase(&mut engine, Phase::Workout, 10), 3);
    assert_eq!(engine.current_exercise(), Some("Push-ups"));
    assert_eq!(engine.remaining_secs(), 3);

    tick_until_phase(&mut engine, Phase::Rest, 10);
    assert_eq!(engine.completed_rounds(), 2);

    assert_eq!(engine.total_workout_secs(), 6);
    assert_eq!(engine.total_rest_secs(), 10 + 2);
    assert_eq!(engine.total_active_secs(), 18);

    assert_eq!(
        engine.drain_cues(),
        vec![
            SoundCue::SessionStart,
            SoundCue::WorkoutStart,
            SoundCue::RestStart,
            SoundCue::WorkoutStart,
            SoundCue::RestStart,
        ]
    );
}

#[test]
fn test_phase_change_event_carries_upcoming_exercise() {
    let mut engine = SessionEngine::new(Durations::new(1, 1));
    engine.edit_schedule(["Jumping Jacks", "Lunges"]);
    engine.start();

    let events: Vec<Event> = (0..40).filter_map(|_| engine.tick()).collect();
    let workout_exercises: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            Event::PhaseChanged {
                to: Phase::Workout,
                exercise,
                ..
            } => exercise.clone(),
            _ => None,
        })
        .collect();
    assert_eq!(
        &workout_exercises[..4],
        &["Jumping Jacks", "Lunges", "Jumping Jacks", "Lunges"]
    );
}

#[test]
fn test_schedule_rotation_is_cyclic() {
    let mut engine = SessionEngine::new(Durations::new(1, 1));
    engine.edit_schedule(["a", "b", "c", "d"]);
    engine.start();
    tick_until_phase(&mut engine, Phase::Workout, 20);
    let start_index = engine.current_exercise_index();

    for _ in 0..4 {
        tick_until_phase(&mut engine, Phase::Rest, 5);
        tick_until_phase(&mut engine, Phase::Workout, 5);
    }
    assert_eq!(engine.current_exercise_index(), start_index);
    assert_eq!(engine.completed_rounds(), 4);
}

#[test]
fn test_single_exercise_never_has_next() {
    let mut engine = SessionEngine::new(Durations::new(2, 2));
    engine.edit_schedule(["Burpees"]);
    engine.start();
    for _ in 0..50 {
        engine.tick();
        assert_eq!(engine.next_exercise(), None);
        assert_eq!(engine.current_exercise(), Some("Burpees"));
    }
}

#[test]
fn test_schedule_swap_mid_session_clamps_cursor() {
    let mut engine = SessionEngine::new(Durations::new(1, 1));
    engine.edit_schedule(["a", "b", "c", "d", "e", "f"]);
    engine.start();
    tick_until_phase(&mut engine, Phase::Workout, 20);
    for _ in 0..5 {
        tick_until_phase(&mut engine, Phase::Rest, 5);
        tick_until_phase(&mut engine, Phase::Workout, 5);
    }
    assert_eq!(engine.current_exercise_index(), 5);

    engine.replace_schedule(["x", "y", "z"]);
    assert_eq!(engine.current_exercise_index(), 0);
    assert_eq!(engine.current_exercise(), Some("x"));
    assert!(engine.is_running());
}

#[test]
fn test_editor_clears_schedule() {
    let mut engine = SessionEngine::default();
    engine.edit_schedule(["a", "b"]);
    engine.edit_schedule(Vec::<String>::new());
    assert!(engine.schedule().is_empty());
    assert_eq!(engine.current_exercise(), None);
    assert_eq!(engine.next_exercise(), None);
}

#[test]
fn test_reset_then_start_reinitializes_stats() {
    let mut engine = SessionEngine::new(Durations::new(5, 5));
    engine.start();
    for _ in 0..30 {
        engine.tick();
    }
    assert!(engine.total_active_secs() > 0);

    engine.reset();
    engine.start();
    assert_eq!(engine.total_active_secs(), 0);
    assert_eq!(engine.completed_rounds(), 0);
    assert_eq!(engine.phase(), Phase::GetReady);
    assert_eq!(engine.remaining_secs(), GET_READY_SECS);
}

#[test]
fn test_cues_reach_player_and_failures_do_not_stop_the_clock() {
    let mut config = Config::default();
    config.set("sound.rest_start", "success").unwrap();
    let mut engine = SessionEngine::new(Durations::new(1, 1));
    let mut dispatcher = SoundDispatcher::new(config.sound.clone());
    let mut player = CollectingPlayer::default();

    engine.start();
    dispatcher.dispatch_all(engine.drain_cues(), &mut player);
    for _ in 0..14 {
        engine.tick();
        dispatcher.dispatch_all(engine.drain_cues(), &mut player);
    }
    assert_eq!(player.sounds, vec!["ping", "ping", "success"]);

    let before = engine.remaining_secs();
    let phase = engine.phase();
    let mut broken = BrokenSpeaker;
    engine.tick();
    engine.tick();
    let results = dispatcher.dispatch_all(engine.drain_cues(), &mut broken);
    assert!(results
        .iter()
        .all(|r| matches!(r.status, DispatchStatus::Failed { .. })));
    assert!(engine.is_running());
    assert!(engine.phase() != phase || engine.remaining_secs() != before);
}

#[test]
fn test_muted_master_suppresses_everything() {
    let mut config = Config::default();
    config.set("sound.master_enabled", "false").unwrap();
    let mut engine = config.engine();
    let mut dispatcher = SoundDispatcher::new(config.sound.clone());
    let mut player = CollectingPlayer::default();

    engine.start();
    for _ in 0..100 {
        engine.tick();
    }
    let results = dispatcher.dispatch_all(engine.drain_cues(), &mut player);
    assert!(!results.is_empty());
    assert!(player.sounds.is_empty());
    assert_eq!(dispatcher.trigger_count(), 0);
}
