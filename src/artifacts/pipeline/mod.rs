//! Atomic multi-file commit pipeline
//!
//! A run reads one consistent snapshot of a branch, rewrites the files an
//! updater selects, and publishes the result as a single new commit:
//!
//! ```text
//! branch check -> snapshot (branch -> commit -> tree) -> blobs -> tree -> commit -> ref
//! ```
//!
//! The remote has no multi-object transactions. The fast-forward check of the
//! final ref update is the only serialization point between concurrent runs, so
//! a run whose snapshot went stale fails with `Conflict` instead of overwriting
//! another writer's commit. Objects created by a failed run stay behind
//! unreferenced.

pub mod batch_rewriter;
pub mod commit_pipeline;
pub mod snapshot;
