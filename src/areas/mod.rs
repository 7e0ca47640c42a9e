//! Stateful collaborators
//!
//! - `github`: GitHub REST implementation of the remote object API
//! - `memory`: In-process, content-addressed implementation of the same API
//! - `remote`: The `RemoteObjectClient` seam between the pipeline and a remote
//! - `repository`: Handle the commands hang off
//! - `travis`: CI build trigger client

pub mod github;
pub mod memory;
pub mod remote;
pub mod repository;
pub mod travis;
