use crate::areas::repository::Repository;
use crate::artifacts::updater::align::AlignUpdater;
use crate::artifacts::version::version::{Build, Version};
use std::io::Write;

const DEFAULT_BUILD: &str = "1";

impl Repository {
    pub async fn align(
        &self,
        version: &str,
        build: Option<&str>,
        branch: Option<&str>,
    ) -> anyhow::Result<()> {
        let branch = self.target_branch(branch)?;
        let ios = &self.config().ios;
        if ios.plist_paths.is_empty() {
            anyhow::bail!("no plist files configured; set ios.plist_paths");
        }

        let target = Version::new(
            version.to_string(),
            Build::new(build.unwrap_or(DEFAULT_BUILD)),
        );
        let updater = AlignUpdater::new(ios.plist_paths.clone(), target.clone())?;
        let author = self.config().author()?;
        let new_ref = self
            .pipeline()
            .run(&branch, &updater, &author, &ios.align_message)
            .await?;

        let aligned = new_ref.output.unwrap_or(target);
        writeln!(
            self.writer(),
            "Done. Version aligned to {} on branch {}",
            aligned.full_version(),
            branch
        )?;
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
