//! Command-line front end for the trial data generators.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
pub mod types;
