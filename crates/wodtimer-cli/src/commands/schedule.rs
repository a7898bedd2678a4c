use std::path::PathBuf;

use clap::Subcommand;
use wodtimer_core::{Config, ExerciseSchedule};

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Show the exercise rotation
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Replace the rotation with the given exercises
    Set {
        /// Exercise names, in order
        #[arg(required = true)]
        exercises: Vec<String>,
    },
    /// Replace the rotation from a text file, one exercise per line
    Load {
        /// Path to the file ("-" reads stdin)
        file: PathBuf,
    },
    /// Remove all exercises
    Clear,
}

fn save_schedule(schedule: &ExerciseSchedule) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load()?;
    config.schedule.exercises = schedule.exercises().to_vec();
    config.save()?;
    print_schedule(schedule);
    Ok(())
}

fn print_schedule(schedule: &ExerciseSchedule) {
    if schedule.is_empty() {
        println!("no exercises scheduled");
        return;
    }
    for (i, exercise) in schedule.exercises().iter().enumerate() {
        println!("{}. {exercise}", i + 1);
    }
}

pub fn run(action: ScheduleAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ScheduleAction::Show { json } => {
            let schedule = Config::load()?.exercise_schedule();
            if json {
                println!("{}", serde_json::to_string_pretty(schedule.exercises())?);
            } else {
                print_schedule(&schedule);
            }
        }
        ScheduleAction::Set { exercises } => {
            let schedule = ExerciseSchedule::new(exercises);
            if schedule.is_empty() {
                return Err("all exercise names were blank".into());
            }
            save_schedule(&schedule)?;
        }
        ScheduleAction::Load { file } => {
            let text = if file.as_os_str() == "-" {
                std::io::read_to_string(std::io::stdin())?
            } else {
                std::fs::read_to_string(&file)?
            };
            save_schedule(&ExerciseSchedule::parse(&text))?;
        }
        ScheduleAction::Clear => {
            save_schedule(&ExerciseSchedule::default())?;
        }
    }
    Ok(())
}
