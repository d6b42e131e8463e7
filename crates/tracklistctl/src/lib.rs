//! Tracklistctl library - exposes modules for testing

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod output;
pub mod preflight;
pub mod progress;
