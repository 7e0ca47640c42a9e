use crate::areas::remote::RemoteObjectClient;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::TreeItem;
use crate::error::Result;

/// Tree items, head commit and root tree of a branch at one read instant
///
/// Captured fresh for every run and never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySnapshot {
    items: Vec<TreeItem>,
    commit_sha: ObjectId,
    tree_sha: ObjectId,
}

impl RepositorySnapshot {
    /// Three dependent reads: branch head, its commit, the recursive tree
    pub async fn capture(client: &dyn RemoteObjectClient, branch: &BranchName) -> Result<Self> {
        let head = client.branch(branch).await?;
        let commit = client.commit(head.commit_sha()).await?;
        let tree = client.tree(commit.tree_oid()).await?;

        Ok(RepositorySnapshot {
            items: tree.into_items(),
            commit_sha: head.commit_sha().clone(),
            tree_sha: commit.tree_oid().clone(),
        })
    }

    pub fn items(&self) -> &[TreeItem] {
        &self.items
    }

    pub fn commit_sha(&self) -> &ObjectId {
        &self.commit_sha
    }

    pub fn tree_sha(&self) -> &ObjectId {
        &self.tree_sha
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::areas::memory::InMemoryRemote;
    use crate::artifacts::objects::commit::Author;
    use crate::error::Error;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_capture_reads_head_commit_and_tree() {
        let remote = InMemoryRemote::new();
        let author = Author::new("Bob".to_string(), "bob@example.com".to_string());
        let head = remote
            .seed_branch("main", &[("README.md", "hi"), ("src/lib.rs", "")], &author)
            .unwrap();
        let branch = BranchName::try_parse("main".to_string()).unwrap();

        let snapshot = RepositorySnapshot::capture(&remote, &branch).await.unwrap();

        assert_eq!(snapshot.commit_sha(), &head);
        assert_eq!(snapshot.tree_sha(), remote.head_tree("main").unwrap().oid());
        assert_eq!(
            snapshot.items().iter().map(|i| i.path.as_str()).collect::<Vec<_>>(),
            vec!["README.md", "src/lib.rs"]
        );
        let calls = remote.calls();
        assert_eq!((calls.branch, calls.commit, calls.tree), (1, 1, 1));
    }

    #[tokio::test]
    async fn test_capture_of_unknown_branch_fails() {
        let remote = InMemoryRemote::new();
        let branch = BranchName::try_parse("nope".to_string()).unwrap();

        let result = RepositorySnapshot::capture(&remote, &branch).await;

        assert!(matches!(result, Err(Error::Remote { status: 404, .. })));
        assert_eq!(remote.calls().commit, 0);
    }
}
