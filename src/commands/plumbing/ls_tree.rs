use crate::areas::repository::Repository;
use crate::artifacts::pipeline::snapshot::RepositorySnapshot;
use std::io::Write;

impl Repository {
    pub async fn ls_tree(&self, branch: Option<&str>) -> anyhow::Result<()> {
        let branch = self.target_branch(branch)?;
        let snapshot = RepositorySnapshot::capture(self.client(), &branch).await?;

        let mut writer = self.writer();
        for item in snapshot.items() {
            writeln!(
                writer,
                "{} {} {}\t{}",
                item.mode,
                item.kind.as_str(),
                item.sha,
                item.path
            )?;
        }

        Ok(())
    }
}
