//! Command-line workflow: argument types and resolution orchestration

pub mod orchestration;

pub use orchestration::{Driver, LevelSource, Resolution};
