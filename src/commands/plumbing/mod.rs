//! Plumbing commands
//!
//! ## Commands
//!
//! - `check-branch`: Verify a branch exists, suggesting near matches otherwise
//! - `ls-tree`: List the snapshot of a branch
//! - `cat-file`: Print the content of a blob

pub mod cat_file;
pub mod check_branch;
pub mod ls_tree;
