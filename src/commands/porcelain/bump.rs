use crate::areas::repository::Repository;
use crate::artifacts::updater::bump::BumpUpdater;
use std::io::Write;

impl Repository {
    pub async fn bump(&self, branch: Option<&str>) -> anyhow::Result<()> {
        let branch = self.target_branch(branch)?;
        let ios = &self.config().ios;
        if ios.plist_paths.is_empty() {
            anyhow::bail!("no plist files configured; set ios.plist_paths");
        }

        let updater = BumpUpdater::new(ios.plist_paths.clone());
        let author = self.config().author()?;
        let new_ref = self
            .pipeline()
            .run(&branch, &updater, &author, &ios.bump_message)
            .await?;

        match &new_ref.output {
            Some(version) => writeln!(
                self.writer(),
                "Done. Build number bumped up. New version is {}.",
                version.full_version()
            )?,
            None => writeln!(self.writer(), "Done. Build number bumped up.")?,
        }
        writeln!(
            self.writer(),
            "[{} {}] {}",
            branch,
            new_ref.commit.to_short_oid(),
            new_ref.message
        )?;

        Ok(())
    }
}
