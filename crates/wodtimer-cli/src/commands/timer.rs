use std::io::Write;
use std::time::Duration;

use clap::Subcommand;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use wodtimer_core::timer::format_clock;
use wodtimer_core::{
    Config, CuePlayer, Durations, Event, Phase, SessionEngine, SoundCue, SoundDispatcher,
    SoundError,
};

const BAR_WIDTH: usize = 20;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run a live session. Reads commands from stdin:
    /// g start, p pause, r resume, s stop, x reset,
    /// d <workout> <rest> durations, f feedback, q quit
    Run {
        /// Workout interval in seconds (default from config)
        #[arg(long)]
        workout: Option<u32>,
        /// Rest interval in seconds (default from config)
        #[arg(long)]
        rest: Option<u32>,
        /// Stop after this many completed rounds
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        rounds: Option<u32>,
        /// Emit JSON lines instead of a status line
        #[arg(long)]
        json: bool,
        /// Tick period in milliseconds
        #[arg(long, default_value_t = 1000, hide = true)]
        tick_ms: u64,
    },
    /// Print the idle session state for the current configuration as JSON
    Status,
}

enum Control {
    Continue,
    Quit,
}

/// Writes cues to the terminal: a bell and a note, or a JSON line.
struct ConsolePlayer {
    json: bool,
}

impl CuePlayer for ConsolePlayer {
    fn play(&mut self, cue: SoundCue, sound: &str, trigger: u64) -> Result<(), SoundError> {
        let mut out = std::io::stdout().lock();
        let written = if self.json {
            let line = serde_json::json!({
                "type": "sound",
                "cue": cue,
                "sound": sound,
                "trigger": trigger,
            });
            writeln!(out, "{line}")
        } else {
            writeln!(out, "\x07\n  ♪ {sound} ({cue})")
        };
        written.map_err(|e| SoundError::Playback {
            sound: sound.to_string(),
            message: e.to_string(),
        })
    }
}

/// Owns one session and serializes ticks and commands against it.
struct SessionDriver {
    engine: SessionEngine,
    dispatcher: SoundDispatcher,
    player: ConsolePlayer,
    json: bool,
    rounds_limit: Option<u32>,
}

impl SessionDriver {
    fn new(
        engine: SessionEngine,
        dispatcher: SoundDispatcher,
        json: bool,
        rounds_limit: Option<u32>,
    ) -> Self {
        Self {
            engine,
            dispatcher,
            player: ConsolePlayer { json },
            json,
            rounds_limit,
        }
    }

    fn apply(&mut self, event: Option<Event>) {
        if let Some(event) = event {
            self.report(&event);
        }
        let cues = self.engine.drain_cues();
        self.dispatcher.dispatch_all(cues, &mut self.player);
        self.render();
    }

    fn on_tick(&mut self) -> Control {
        if !self.engine.is_running_or_paused() {
            return Control::Continue;
        }
        let event = self.engine.tick();
        self.apply(event);

        match self.rounds_limit {
            Some(limit) if self.engine.completed_rounds() >= limit => {
                let stopped = self.engine.stop();
                self.apply(stopped);
                Control::Quit
            }
            _ => Control::Continue,
        }
    }

    fn handle_line(&mut self, line: &str) -> Control {
        let mut parts = line.split_whitespace();
        let event = match parts.next() {
            None => return Control::Continue,
            Some("g" | "start") => self.engine.start(),
            Some("p" | "pause") => self.engine.pause(),
            Some("r" | "resume") => self.engine.resume(),
            Some("s" | "stop") => self.engine.stop(),
            Some("x" | "reset") => self.engine.reset(),
            Some("d" | "durations") => {
                let workout = parts.next().and_then(|s| s.parse().ok());
                let rest = parts.next().and_then(|s| s.parse().ok());
                match (workout, rest) {
                    (Some(w), Some(r)) => match Durations::validated(w, r) {
                        Ok(d) => self.engine.update_durations(d.workout_secs, d.rest_secs),
                        Err(e) => {
                            eprintln!("\n{e}");
                            None
                        }
                    },
                    _ => {
                        eprintln!("\nusage: d <workout-secs> <rest-secs>");
                        None
                    }
                }
            }
            Some("f" | "feedback") => {
                match self.engine.feedback_snapshot() {
                    Ok(snapshot) => match serde_json::to_string(&snapshot) {
                        Ok(json) => println!("\n{json}"),
                        Err(e) => eprintln!("\n{e}"),
                    },
                    Err(e) => eprintln!("\nfeedback unavailable: {e}"),
                }
                None
            }
            Some("q" | "quit") => return Control::Quit,
            Some(other) => {
                eprintln!("\nunknown command '{other}' (g p r s x d f q)");
                None
            }
        };
        self.apply(event);
        Control::Continue
    }

    fn report(&self, event: &Event) {
        if self.json {
            if let Ok(line) = serde_json::to_string(event) {
                println!("{line}");
            }
            return;
        }
        let message = match event {
            Event::TimerStarted { fresh: true, .. } => "session started".to_string(),
            Event::TimerStarted { .. } => "session continued".to_string(),
            Event::TimerPaused { .. } => "paused".to_string(),
            Event::TimerResumed { .. } => "resumed".to_string(),
            Event::TimerStopped { .. } => "stopped".to_string(),
            Event::TimerReset { .. } => "reset".to_string(),
            Event::PhaseChanged {
                to,
                completed_rounds,
                exercise,
                ..
            } => match (to, exercise) {
                (Phase::Workout, Some(name)) => format!("go: {name}"),
                (Phase::Rest, _) => format!("rest (round {completed_rounds} done)"),
                _ => format!("{}", to.label()),
            },
            Event::DurationsUpdated {
                workout_secs,
                rest_secs,
                ..
            } => format!("durations {workout_secs}s / {rest_secs}s"),
            Event::ScheduleReplaced { len, .. } => format!("{len} exercises scheduled"),
            Event::StateSnapshot { .. } => return,
        };
        println!("\n» {message}");
    }

    fn render(&self) {
        if self.json {
            if let Ok(line) = serde_json::to_string(&self.engine.snapshot()) {
                println!("{line}");
            }
            return;
        }
        if let Err(e) = self.write_status_line() {
            tracing::debug!(error = %e, "status line write failed");
        }
    }

    fn write_status_line(&self) -> std::io::Result<()> {
        let (phase, _) = self.engine.display_position();
        let heading = match (self.engine.phase(), self.engine.current_exercise()) {
            (Phase::Paused, _) => Phase::Paused.label(),
            (Phase::Workout, Some(name)) => name,
            _ => phase.label(),
        };
        let pct = self.engine.progress_pct();
        let filled = usize::from(pct) * BAR_WIDTH / 100;
        let bar = format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled));
        let next = match (phase, self.engine.next_exercise()) {
            (Phase::Rest | Phase::Workout, Some(name)) => format!("  next: {name}"),
            _ => String::new(),
        };

        let mut out = std::io::stdout().lock();
        write!(
            out,
            "\r{heading:<16} {}  {bar} {pct:>3}%  rounds {}{next}\x1b[K",
            self.engine.display_time(),
            self.engine.completed_rounds(),
        )?;
        out.flush()
    }

    fn summary(&self) {
        let stats = self.engine.stats();
        if self.json {
            if let Ok(line) = serde_json::to_string(stats) {
                println!("{line}");
            }
            return;
        }
        println!();
        println!("Rounds completed: {}", stats.completed_rounds);
        for (label, secs) in stats.breakdown() {
            println!("{label}: {}", format_clock(secs));
        }
        println!("Total Active Time: {}", format_clock(stats.total_active_secs()));
        if let Some(share) = stats.workout_share() {
            println!("Workout Share: {:.0}%", share * 100.0);
        }
    }
}

async fn drive(mut driver: SessionDriver, period: Duration) -> Result<(), Box<dyn std::error::Error>> {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let started = driver.engine.start();
    driver.apply(started);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Control::Quit = driver.on_tick() {
                    break;
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(line) => {
                        if let Control::Quit = driver.handle_line(&line) {
                            break;
                        }
                    }
                    None => {
                        tracing::debug!("stdin closed, continuing without commands");
                        stdin_open = false;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                break;
            }
        }

        if !stdin_open && !driver.engine.is_running_or_paused() {
            break;
        }
    }

    driver.summary();
    Ok(())
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimerAction::Run {
            workout,
            rest,
            rounds,
            json,
            tick_ms,
        } => {
            let config = Config::load_or_default();
            let durations = Durations::validated(
                workout.unwrap_or(config.timer.workout_duration),
                rest.unwrap_or(config.timer.rest_duration),
            )?;

            let mut engine = config.engine();
            engine.update_durations(durations.workout_secs, durations.rest_secs);
            let dispatcher = SoundDispatcher::new(config.sound.clone());
            let driver = SessionDriver::new(engine, dispatcher, json, rounds);

            let rt = tokio::runtime::Runtime::new()
                .map_err(|e| format!("Failed to create runtime: {e}"))?;
            rt.block_on(drive(driver, Duration::from_millis(tick_ms.max(1))))?;
        }
        TimerAction::Status => {
            let config = Config::load()?;
            let snapshot = config.engine().snapshot();
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
    }
    Ok(())
}
