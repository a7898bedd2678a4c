use clap::Subcommand;
use wodtimer_core::sound::SOUND_OPTIONS;
use wodtimer_core::{Config, SoundCue};

#[derive(Subcommand)]
pub enum SoundsAction {
    /// List the sounds a cue can use
    List,
    /// Show the sound chosen for each cue
    Show,
    /// Choose the sound for a cue
    Set {
        /// Cue: session-start, workout-start or rest-start
        cue: String,
        /// Sound name, or "None" to mute the cue
        sound: String,
    },
    /// Turn all sounds on
    On,
    /// Turn all sounds off
    Off,
}

fn parse_cue(name: &str) -> Result<SoundCue, String> {
    SoundCue::ALL
        .into_iter()
        .find(|cue| cue.as_str() == name)
        .ok_or_else(|| {
            let names: Vec<_> = SoundCue::ALL.iter().map(|c| c.as_str()).collect();
            format!("unknown cue '{name}', expected one of: {}", names.join(", "))
        })
}

pub fn run(action: SoundsAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SoundsAction::List => {
            for sound in SOUND_OPTIONS {
                println!("{sound}");
            }
        }
        SoundsAction::Show => {
            let config = Config::load()?;
            let state = if config.sound.master_enabled { "on" } else { "off" };
            println!("master: {state}");
            for cue in SoundCue::ALL {
                println!("{cue}: {}", config.sound.choice(cue));
            }
        }
        SoundsAction::Set { cue, sound } => {
            let cue = parse_cue(&cue)?;
            let mut config = Config::load()?;
            config.sound.set_choice(cue, sound);
            config.validate()?;
            config.save()?;
            println!("ok");
        }
        SoundsAction::On => set_master(true)?,
        SoundsAction::Off => set_master(false)?,
    }
    Ok(())
}

fn set_master(enabled: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load()?;
    config.sound.master_enabled = enabled;
    config.save()?;
    println!("sounds {}", if enabled { "on" } else { "off" });
    Ok(())
}
