use crate::areas::remote::RemoteObjectClient;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::matcher::BranchMatcher;
use crate::artifacts::message::{self, Placeholders};
use crate::artifacts::objects::commit::{Author, NewCommit};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::pipeline::batch_rewriter::BatchRewriter;
use crate::artifacts::pipeline::snapshot::RepositorySnapshot;
use crate::artifacts::updater::ContentUpdater;
use crate::error::Result;

/// Last stage a run completed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Start,
    BranchValidated,
    SnapshotTaken,
    ItemsRewritten,
    TreeCreated,
    CommitCreated,
    RefUpdated,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Start => "start",
            PipelineStage::BranchValidated => "branch validated",
            PipelineStage::SnapshotTaken => "snapshot taken",
            PipelineStage::ItemsRewritten => "items rewritten",
            PipelineStage::TreeCreated => "tree created",
            PipelineStage::CommitCreated => "commit created",
            PipelineStage::RefUpdated => "ref updated",
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A branch that was moved to a freshly built commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCommitRef<O> {
    pub branch: BranchName,
    pub commit: ObjectId,
    /// Head of the branch the commit was built on
    pub parent: ObjectId,
    pub tree: ObjectId,
    pub message: String,
    /// Paths whose content changed, sorted
    pub paths: Vec<String>,
    /// Side output of the updater, if it reported any
    pub output: Option<O>,
}

pub struct CommitPipeline<'r> {
    client: &'r dyn RemoteObjectClient,
    max_concurrency: usize,
}

impl<'r> CommitPipeline<'r> {
    pub fn new(client: &'r dyn RemoteObjectClient, max_concurrency: usize) -> Self {
        CommitPipeline {
            client,
            max_concurrency,
        }
    }

    /// Fail with `BranchNotFound` and near matches unless `branch` exists
    pub async fn assert_branch_exists(&self, branch: &BranchName) -> Result<()> {
        let branches = self.client.branches().await?;
        BranchMatcher::assert_exists(branch, &branches)
    }

    /// Rewrite the files `updater` selects and move `branch` to the new commit
    ///
    /// There is no internal retry. On `Conflict` the snapshot is stale and the
    /// caller has to run the pipeline again from the top.
    #[tracing::instrument(skip_all, fields(branch = %branch, updater = updater.name()))]
    pub async fn run<U>(
        &self,
        branch: &BranchName,
        updater: &U,
        author: &Author,
        template: &str,
    ) -> Result<NewCommitRef<U::Output>>
    where
        U: ContentUpdater,
    {
        let mut stage = PipelineStage::Start;

        match self.execute(&mut stage, branch, updater, author, template).await {
            Ok(new_ref) => {
                tracing::info!(commit = %new_ref.commit, parent = %new_ref.parent, "branch updated");
                Ok(new_ref)
            }
            Err(err) => {
                tracing::warn!(after = %stage, error = %err, "commit pipeline failed");
                Err(err)
            }
        }
    }

    async fn execute<U>(
        &self,
        stage: &mut PipelineStage,
        branch: &BranchName,
        updater: &U,
        author: &Author,
        template: &str,
    ) -> Result<NewCommitRef<U::Output>>
    where
        U: ContentUpdater,
    {
        self.assert_branch_exists(branch).await?;
        advance(stage, PipelineStage::BranchValidated);

        let snapshot = RepositorySnapshot::capture(self.client, branch).await?;
        advance(stage, PipelineStage::SnapshotTaken);

        let rewritten = BatchRewriter::new(self.client, self.max_concurrency)
            .rewrite(snapshot.items(), updater)
            .await?;
        advance(stage, PipelineStage::ItemsRewritten);

        let tree = self
            .client
            .create_tree(snapshot.tree_sha(), &rewritten)
            .await?;
        advance(stage, PipelineStage::TreeCreated);

        let output = updater.output();
        let message = message::render(
            template,
            output.as_ref().map(|output| output as &dyn Placeholders),
        );
        let commit = self
            .client
            .create_commit(&NewCommit::new(
                message.clone(),
                tree.clone(),
                vec![snapshot.commit_sha().clone()],
                author.clone(),
            ))
            .await?;
        advance(stage, PipelineStage::CommitCreated);

        self.client.update_ref(branch, &commit).await?;
        advance(stage, PipelineStage::RefUpdated);

        let mut paths = rewritten
            .into_iter()
            .map(|item| item.path)
            .collect::<Vec<_>>();
        paths.sort();

        Ok(NewCommitRef {
            branch: branch.clone(),
            commit,
            parent: snapshot.commit_sha().clone(),
            tree,
            message,
            paths,
            output,
        })
    }
}

fn advance(stage: &mut PipelineStage, next: PipelineStage) {
    tracing::debug!(from = %stage, to = %next, "pipeline stage reached");
    *stage = next;
}
