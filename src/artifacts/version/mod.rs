//! Version and build numbers of iOS bundles
//!
//! - `version`: the pure `Version`/`Build` value types and the bump algorithm
//! - `plist`: reading and rewriting the bundle keys of an `Info.plist`

pub mod plist;
#[allow(clippy::module_inception)]
pub mod version;
