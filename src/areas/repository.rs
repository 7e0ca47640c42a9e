use crate::areas::github::{Credential, GitHubClient};
use crate::areas::remote::RemoteObjectClient;
use crate::areas::travis::TravisClient;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::pipeline::commit_pipeline::CommitPipeline;
use crate::config::Config;
use std::cell::{RefCell, RefMut};
use std::sync::Arc;

pub struct Repository {
    writer: RefCell<Box<dyn std::io::Write>>,
    client: Arc<dyn RemoteObjectClient>,
    travis: Option<TravisClient>,
    config: Config,
}

impl Repository {
    pub fn new(
        config: Config,
        client: Arc<dyn RemoteObjectClient>,
        writer: Box<dyn std::io::Write>,
    ) -> anyhow::Result<Self> {
        let travis = config
            .travis
            .as_ref()
            .map(TravisClient::from_config)
            .transpose()?;

        Ok(Repository {
            writer: RefCell::new(writer),
            client,
            travis,
            config,
        })
    }

    /// Repository backed by the GitHub API named in `config`
    pub fn from_config(config: Config, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let credential =
            Credential::resolve(config.github.username.as_deref(), &config.github.token);
        let client = GitHubClient::new(&config.github.repo_url, credential)?;

        Self::new(config, Arc::new(client), writer)
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn client(&self) -> &dyn RemoteObjectClient {
        self.client.as_ref()
    }

    pub fn travis(&self) -> Option<&TravisClient> {
        self.travis.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pipeline(&self) -> CommitPipeline<'_> {
        CommitPipeline::new(self.client.as_ref(), self.config.github.max_concurrency)
    }

    /// `branch` if given, the configured default branch otherwise
    pub fn target_branch(&self, branch: Option<&str>) -> anyhow::Result<BranchName> {
        let name = branch.unwrap_or(&self.config.github.default_branch);
        Ok(BranchName::try_parse(name.to_string())?)
    }
}
