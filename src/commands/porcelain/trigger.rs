use crate::areas::repository::Repository;
use crate::config::TravisTarget;
use anyhow::{anyhow, bail};
use std::io::Write;

impl Repository {
    pub async fn trigger(&self, target: Option<&str>, branch: Option<&str>) -> anyhow::Result<()> {
        let travis = self
            .travis()
            .ok_or_else(|| anyhow!("no CI service configured; add a [travis] section"))?;
        let targets = self
            .config()
            .travis
            .as_ref()
            .map(|travis| travis.targets.as_slice())
            .unwrap_or_default();
        let target = select_target(targets, target)?;
        let branch = self.target_branch(branch)?;

        self.pipeline().assert_branch_exists(&branch).await?;
        travis.execute(target, &branch).await?;

        writeln!(
            self.writer(),
            "Done. Triggered `{}` on branch {}",
            target.name,
            branch
        )?;

        Ok(())
    }
}

/// The named target, or the only one when no name is given
fn select_target<'t>(targets: &'t [TravisTarget], name: Option<&str>) -> anyhow::Result<&'t TravisTarget> {
    let available = targets
        .iter()
        .map(|target| target.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    match (name, targets) {
        (Some(name), _) => targets
            .iter()
            .find(|target| target.name == name)
            .ok_or_else(|| anyhow!("unknown target `{name}`; available targets: {available}")),
        (None, [only]) => Ok(only),
        (None, []) => bail!("no build targets configured"),
        (None, _) => bail!("several targets configured, pick one of: {available}"),
    }
}
