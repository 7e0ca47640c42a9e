pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod config;
pub mod error;
