use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::{Commit, NewCommit, ShaRef};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::{Tree, TreeItem};
use crate::error::Result;
use async_trait::async_trait;
use serde::Deserialize;

/// Head of a branch as reported by the remote
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BranchDetail {
    name: BranchName,
    commit: ShaRef,
}

impl BranchDetail {
    pub fn new(name: BranchName, commit_sha: ObjectId) -> Self {
        BranchDetail {
            name,
            commit: ShaRef { sha: commit_sha },
        }
    }

    pub fn name(&self) -> &BranchName {
        &self.name
    }

    pub fn commit_sha(&self) -> &ObjectId {
        &self.commit.sha
    }
}

/// One call per git-data concept of the hosting service
///
/// Implementations are stateless request/response mappings and never retry.
/// Any non-success answer is `Error::Remote`, except a rejected non fast-forward
/// ref update which is `Error::Conflict`.
#[async_trait]
pub trait RemoteObjectClient: Send + Sync {
    /// Branch names in the order the remote lists them
    async fn branches(&self) -> Result<Vec<BranchName>>;

    async fn branch(&self, name: &BranchName) -> Result<BranchDetail>;

    async fn commit(&self, sha: &ObjectId) -> Result<Commit>;

    /// Full recursive listing of a tree
    async fn tree(&self, sha: &ObjectId) -> Result<Tree>;

    /// Decoded text content of a blob
    async fn blob(&self, sha: &ObjectId) -> Result<Blob>;

    async fn create_blob(&self, content: &str) -> Result<ObjectId>;

    /// Compose `base`'s entries with `items`, overriding by path
    async fn create_tree(&self, base: &ObjectId, items: &[TreeItem]) -> Result<ObjectId>;

    async fn create_commit(&self, commit: &NewCommit) -> Result<ObjectId>;

    /// Point `branch` at `sha`; only fast-forwards are accepted
    async fn update_ref(&self, branch: &BranchName, sha: &ObjectId) -> Result<()>;
}
