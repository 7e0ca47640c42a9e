//! Command implementations
//!
//! - `plumbing`: Inspection commands (check-branch, ls-tree, cat-file)
//! - `porcelain`: Commands that publish commits or trigger builds (bump, align,
//!   replace, trigger)
//!
//! Every command is an `impl Repository` block and writes its human readable
//! result to the repository's writer.

pub mod plumbing;
pub mod porcelain;
