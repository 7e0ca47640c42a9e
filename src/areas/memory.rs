//! In-process object store
//!
//! Behaves like the hosting service as far as the commit pipeline can tell:
//! objects are content addressed (SHA-1 over `"<kind> <len>\0<body>"`, as git
//! hashes loose objects), new trees compose a base tree with overrides by path,
//! and a ref only moves forward along history.
//!
//! Trees are stored flat, one entry per full path, which is how the service
//! lists them recursively.
//!
//! Every call is counted, and ref updates can be held behind a barrier so
//! concurrent pipeline runs interleave deterministically.

use crate::areas::remote::{BranchDetail, RemoteObjectClient};
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::{Author, Commit, NewCommit};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::{EntryKind, Tree, TreeItem};
use crate::error::{Error, Result};
use async_trait::async_trait;
use sha1::{Digest, Sha1};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Barrier;

const REGULAR_FILE_MODE: &str = "100644";

/// Number of calls made per operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallSnapshot {
    pub branches: usize,
    pub branch: usize,
    pub commit: usize,
    pub tree: usize,
    pub blob: usize,
    pub create_blob: usize,
    pub create_tree: usize,
    pub create_commit: usize,
    pub update_ref: usize,
}

#[derive(Debug, Default)]
struct CallCounters {
    branches: AtomicUsize,
    branch: AtomicUsize,
    commit: AtomicUsize,
    tree: AtomicUsize,
    blob: AtomicUsize,
    create_blob: AtomicUsize,
    create_tree: AtomicUsize,
    create_commit: AtomicUsize,
    update_ref: AtomicUsize,
}

fn count(counter: &AtomicUsize) {
    counter.fetch_add(1, Ordering::SeqCst);
}

impl CallCounters {
    fn snapshot(&self) -> CallSnapshot {
        CallSnapshot {
            branches: self.branches.load(Ordering::SeqCst),
            branch: self.branch.load(Ordering::SeqCst),
            commit: self.commit.load(Ordering::SeqCst),
            tree: self.tree.load(Ordering::SeqCst),
            blob: self.blob.load(Ordering::SeqCst),
            create_blob: self.create_blob.load(Ordering::SeqCst),
            create_tree: self.create_tree.load(Ordering::SeqCst),
            create_commit: self.create_commit.load(Ordering::SeqCst),
            update_ref: self.update_ref.load(Ordering::SeqCst),
        }
    }
}

#[derive(Debug, Default)]
struct Store {
    /// Kept in creation order, which is the order `branches` lists them in
    refs: Vec<(BranchName, ObjectId)>,
    blobs: HashMap<ObjectId, String>,
    trees: HashMap<ObjectId, Vec<TreeItem>>,
    commits: HashMap<ObjectId, Commit>,
}

impl Store {
    fn head(&self, branch: &BranchName) -> Option<&ObjectId> {
        self.refs
            .iter()
            .find(|(name, _)| name == branch)
            .map(|(_, head)| head)
    }

    fn insert_blob(&mut self, content: &str) -> Result<ObjectId> {
        let oid = hash_object("blob", content.as_bytes())?;
        self.blobs
            .entry(oid.clone())
            .or_insert_with(|| content.to_string());
        Ok(oid)
    }

    fn insert_tree(&mut self, items: Vec<TreeItem>) -> Result<ObjectId> {
        let body = items
            .iter()
            .map(|item| {
                format!(
                    "{} {} {}\t{}\n",
                    item.mode,
                    item.kind.as_str(),
                    item.sha,
                    item.path
                )
            })
            .collect::<String>();
        let oid = hash_object("tree", body.as_bytes())?;
        self.trees.entry(oid.clone()).or_insert(items);
        Ok(oid)
    }

    fn insert_commit(&mut self, commit: &NewCommit) -> Result<ObjectId> {
        let mut body = format!("tree {}\n", commit.tree);
        for parent in &commit.parents {
            body.push_str(&format!("parent {parent}\n"));
        }
        let signature = format!(
            "{} {}",
            commit.author.display_name(),
            commit.author.wire_date()
        );
        body.push_str(&format!("author {signature}\ncommitter {signature}\n\n"));
        body.push_str(&commit.message);

        let oid = hash_object("commit", body.as_bytes())?;
        self.commits.entry(oid.clone()).or_insert_with(|| {
            Commit::new(
                oid.clone(),
                commit.parents.clone(),
                commit.tree.clone(),
                commit.author.clone(),
                commit.message.clone(),
            )
        });
        Ok(oid)
    }

    /// `ancestor` is `descendant` or reachable from it through parents
    fn is_ancestor(&self, ancestor: &ObjectId, descendant: &ObjectId) -> bool {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([descendant.clone()]);

        while let Some(oid) = queue.pop_front() {
            if &oid == ancestor {
                return true;
            }
            if !visited.insert(oid.clone()) {
                continue;
            }
            if let Some(commit) = self.commits.get(&oid) {
                queue.extend(commit.parents().iter().cloned());
            }
        }

        false
    }
}

fn hash_object(kind: &str, body: &[u8]) -> Result<ObjectId> {
    let mut hasher = Sha1::new();
    hasher.update(format!("{kind} {}\0", body.len()).as_bytes());
    hasher.update(body);

    let oid = hasher.finalize();
    ObjectId::try_parse(format!("{oid:x}"))
}

fn not_found(kind: &str, sha: impl std::fmt::Display) -> Error {
    Error::Remote {
        status: 404,
        body: format!("{kind} {sha} not found"),
    }
}

fn unprocessable(reason: String) -> Error {
    Error::Remote {
        status: 422,
        body: reason,
    }
}

#[derive(Debug, Default)]
pub struct InMemoryRemote {
    store: Mutex<Store>,
    calls: CallCounters,
    ref_barrier: Mutex<Option<Arc<Barrier>>>,
}

impl InMemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    fn store(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create `name` pointing at a root commit holding `files`
    pub fn seed_branch(&self, name: &str, files: &[(&str, &str)], author: &Author) -> Result<ObjectId> {
        let branch = BranchName::try_parse(name.to_string())?;
        let mut store = self.store();

        let items = files
            .iter()
            .map(|(path, content)| {
                store.insert_blob(content).map(|sha| {
                    TreeItem::new(
                        path.to_string(),
                        REGULAR_FILE_MODE.to_string(),
                        EntryKind::Blob,
                        sha,
                    )
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let tree = store.insert_tree(items)?;
        let commit = store.insert_commit(&NewCommit::new(
            format!("Initial commit of {branch}"),
            tree,
            vec![],
            author.clone(),
        ))?;

        store.refs.retain(|(existing, _)| existing != &branch);
        store.refs.push((branch, commit.clone()));
        Ok(commit)
    }

    pub fn branch_head(&self, name: &str) -> Option<ObjectId> {
        let branch = BranchName::try_parse(name.to_string()).ok()?;
        self.store().head(&branch).cloned()
    }

    /// Tree of the commit `name` currently points at
    pub fn head_tree(&self, name: &str) -> Option<Tree> {
        let head = self.branch_head(name)?;
        let store = self.store();
        let commit = store.commits.get(&head)?;
        let items = store.trees.get(commit.tree_oid())?;

        Some(Tree::new(commit.tree_oid().clone(), items.clone()))
    }

    pub fn blob_content(&self, sha: &ObjectId) -> Option<String> {
        self.store().blobs.get(sha).cloned()
    }

    pub fn find_commit(&self, sha: &ObjectId) -> Option<Commit> {
        self.store().commits.get(sha).cloned()
    }

    /// Whether any branch's history contains `commit`
    pub fn is_referenced(&self, commit: &ObjectId) -> bool {
        let store = self.store();
        store
            .refs
            .iter()
            .any(|(_, head)| store.is_ancestor(commit, head))
    }

    /// Commits no branch history contains, sorted
    pub fn unreferenced_commits(&self) -> Vec<ObjectId> {
        let store = self.store();
        let mut orphans = store
            .commits
            .keys()
            .filter(|oid| !store.refs.iter().any(|(_, head)| store.is_ancestor(oid, head)))
            .cloned()
            .collect::<Vec<_>>();
        orphans.sort();
        orphans
    }

    pub fn calls(&self) -> CallSnapshot {
        self.calls.snapshot()
    }

    /// Make every ref update wait until `parties` of them are pending
    pub fn hold_ref_updates(&self, parties: usize) {
        *self
            .ref_barrier
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(Barrier::new(parties)));
    }
}

#[async_trait]
impl RemoteObjectClient for InMemoryRemote {
    async fn branches(&self) -> Result<Vec<BranchName>> {
        count(&self.calls.branches);
        Ok(self.store().refs.iter().map(|(name, _)| name.clone()).collect())
    }

    async fn branch(&self, name: &BranchName) -> Result<BranchDetail> {
        count(&self.calls.branch);
        let store = self.store();
        let head = store.head(name).ok_or_else(|| not_found("branch", name))?;

        Ok(BranchDetail::new(name.clone(), head.clone()))
    }

    async fn commit(&self, sha: &ObjectId) -> Result<Commit> {
        count(&self.calls.commit);
        self.store()
            .commits
            .get(sha)
            .cloned()
            .ok_or_else(|| not_found("commit", sha))
    }

    async fn tree(&self, sha: &ObjectId) -> Result<Tree> {
        count(&self.calls.tree);
        let store = self.store();
        let items = store.trees.get(sha).ok_or_else(|| not_found("tree", sha))?;

        Ok(Tree::new(sha.clone(), items.clone()))
    }

    async fn blob(&self, sha: &ObjectId) -> Result<Blob> {
        count(&self.calls.blob);
        let store = self.store();
        let content = store.blobs.get(sha).ok_or_else(|| not_found("blob", sha))?;

        Ok(Blob::new(sha.clone(), content.clone()))
    }

    async fn create_blob(&self, content: &str) -> Result<ObjectId> {
        count(&self.calls.create_blob);
        self.store().insert_blob(content)
    }

    async fn create_tree(&self, base: &ObjectId, items: &[TreeItem]) -> Result<ObjectId> {
        count(&self.calls.create_tree);
        let mut store = self.store();

        let mut composed = store
            .trees
            .get(base)
            .cloned()
            .ok_or_else(|| unprocessable(format!("base_tree {base} does not exist")))?;
        for item in items {
            if item.is_blob() && !store.blobs.contains_key(&item.sha) {
                return Err(unprocessable(format!("blob {} does not exist", item.sha)));
            }

            match composed.iter_mut().find(|existing| existing.path == item.path) {
                Some(existing) => *existing = item.clone(),
                None => composed.push(item.clone()),
            }
        }

        store.insert_tree(composed)
    }

    async fn create_commit(&self, commit: &NewCommit) -> Result<ObjectId> {
        count(&self.calls.create_commit);
        let mut store = self.store();

        if !store.trees.contains_key(&commit.tree) {
            return Err(unprocessable(format!("tree {} does not exist", commit.tree)));
        }
        if let Some(parent) = commit
            .parents
            .iter()
            .find(|parent| !store.commits.contains_key(*parent))
        {
            return Err(unprocessable(format!("parent {parent} does not exist")));
        }

        store.insert_commit(commit)
    }

    async fn update_ref(&self, branch: &BranchName, sha: &ObjectId) -> Result<()> {
        count(&self.calls.update_ref);

        let barrier = self
            .ref_barrier
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(barrier) = barrier {
            barrier.wait().await;
        }

        let mut store = self.store();
        if !store.commits.contains_key(sha) {
            return Err(unprocessable(format!("object {sha} does not exist")));
        }
        let head = store
            .head(branch)
            .cloned()
            .ok_or_else(|| unprocessable("Reference does not exist".to_string()))?;
        if !store.is_ancestor(&head, sha) {
            return Err(Error::Conflict {
                branch: branch.to_string(),
                body: "Update is not a fast forward".to_string(),
            });
        }

        if let Some((_, current)) = store.refs.iter_mut().find(|(name, _)| name == branch) {
            *current = sha.clone();
        }
        Ok(())
    }
}
