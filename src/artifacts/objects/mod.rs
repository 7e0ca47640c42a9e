//! Object types exchanged with the hosting service
//!
//! All content is stored remotely as objects identified by SHA-1 hashes:
//!
//! - **Blob**: File content
//! - **Tree**: Directory listing (paths, modes, and object IDs)
//! - **Commit**: Snapshot with metadata (author, message, parent commits, tree)
//!
//! Objects are immutable once the service assigns them an id. The pipeline only
//! creates new ones and repoints branch refs.

pub mod blob;
pub mod commit;
pub mod object_id;
pub mod tree;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;
