pub mod config;
pub mod schedule;
pub mod sounds;
pub mod timer;
