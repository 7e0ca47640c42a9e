//! Porcelain commands
//!
//! ## Commands
//!
//! - `bump`: Increment the build number of the configured plists
//! - `align`: Set version and build number of the configured plists
//! - `replace`: Regex replacement over arbitrary files
//! - `trigger`: Ask the CI service to build a branch

pub mod align;
pub mod bump;
pub mod replace;
pub mod trigger;
