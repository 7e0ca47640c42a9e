//! Data structures and algorithms of the commit pipeline
//!
//! - `branch`: Branch names and fuzzy branch matching
//! - `message`: Commit message templating
//! - `objects`: Remote git-data objects (blob, tree, commit)
//! - `pipeline`: Snapshot, batch rewrite and the commit pipeline itself
//! - `updater`: Pluggable content transformations
//! - `version`: Version/build model and plist helpers

pub mod branch;
pub mod message;
pub mod objects;
pub mod pipeline;
pub mod updater;
pub mod version;
