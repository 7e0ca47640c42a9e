use crate::artifacts::objects::tree::TreeItem;
use crate::artifacts::updater::{ContentUpdater, SideOutput, select_paths};
use crate::artifacts::version::plist::{self, BUILD_NUMBER_KEY};
use crate::artifacts::version::version::Version;
use crate::error::Result;

/// Increments the build number of the configured plists
#[derive(Debug)]
pub struct BumpUpdater {
    plist_paths: Vec<String>,
    bumped: SideOutput<Version>,
}

impl BumpUpdater {
    pub fn new(plist_paths: Vec<String>) -> Self {
        BumpUpdater {
            plist_paths,
            bumped: SideOutput::new(),
        }
    }
}

impl ContentUpdater for BumpUpdater {
    type Output = Version;

    fn name(&self) -> &str {
        "bump"
    }

    fn items_to_update(&self, items: &[TreeItem]) -> Vec<TreeItem> {
        select_paths(items, &self.plist_paths)
    }

    fn update(&self, item: &TreeItem, content: &str) -> Result<String> {
        let bumped = Version::from_plist_content(&item.path, content)?.bump()?;
        let updated = plist::replace_value(
            &item.path,
            content,
            BUILD_NUMBER_KEY,
            bumped.build().value(),
        )?;

        self.bumped.record(&item.path, bumped);
        Ok(updated)
    }

    fn output(&self) -> Option<Version> {
        self.bumped.first()
    }
}
