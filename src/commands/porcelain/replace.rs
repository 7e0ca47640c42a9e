use crate::areas::repository::Repository;
use crate::artifacts::updater::text::TextUpdater;
use std::io::Write;

impl Repository {
    pub async fn replace(
        &self,
        paths: &[String],
        pattern: &str,
        replacement: &str,
        message: Option<&str>,
        branch: Option<&str>,
    ) -> anyhow::Result<()> {
        let branch = self.target_branch(branch)?;
        let updater =
            TextUpdater::regex_replace(paths.to_vec(), pattern, replacement.to_string())?;
        let message = match message {
            Some(message) => message.trim().to_string(),
            None => format!("[General] Replaces `{pattern}` with `{replacement}`."),
        };
        let author = self.config().author()?;

        let new_ref = self
            .pipeline()
            .run(&branch, &updater, &author, &message)
            .await?;

        writeln!(
            self.writer(),
            "Done. Updated {} on branch {}",
            new_ref.paths.join(", "),
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
