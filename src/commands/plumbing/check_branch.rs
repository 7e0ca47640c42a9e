use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use std::io::Write;

impl Repository {
    pub async fn check_branch(&self, branch: &str) -> anyhow::Result<()> {
        let branch = BranchName::try_parse(branch.to_string())?;
        self.pipeline().assert_branch_exists(&branch).await?;

        writeln!(self.writer(), "Branch `{branch}` exists.")?;

        Ok(())
    }
}
