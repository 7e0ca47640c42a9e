use crate::artifacts::objects::tree::TreeItem;
use crate::artifacts::updater::{ContentUpdater, SideOutput, select_paths};
use crate::artifacts::version::plist::{self, BUILD_NUMBER_KEY, VERSION_KEY};
use crate::artifacts::version::version::Version;
use crate::error::Result;

/// Sets version and build number of the configured plists
#[derive(Debug)]
pub struct AlignUpdater {
    plist_paths: Vec<String>,
    target: Version,
    aligned: SideOutput<Version>,
}

impl AlignUpdater {
    /// Fails with `MalformedContent` when the target could not be read back from a plist
    pub fn new(plist_paths: Vec<String>, target: Version) -> Result<Self> {
        plist::check_value(VERSION_KEY, target.version())?;
        plist::check_value(BUILD_NUMBER_KEY, target.build().value())?;

        Ok(AlignUpdater {
            plist_paths,
            target,
            aligned: SideOutput::new(),
        })
    }
}

impl ContentUpdater for AlignUpdater {
    type Output = Version;

    fn name(&self) -> &str {
        "align"
    }

    fn items_to_update(&self, items: &[TreeItem]) -> Vec<TreeItem> {
        select_paths(items, &self.plist_paths)
    }

    fn update(&self, item: &TreeItem, content: &str) -> Result<String> {
        let content = plist::replace_value(&item.path, content, VERSION_KEY, self.target.version())?;
        let content = plist::replace_value(
            &item.path,
            &content,
            BUILD_NUMBER_KEY,
            self.target.build().value(),
        )?;

        self.aligned.record(&item.path, self.target.clone());
        Ok(content)
    }

    fn output(&self) -> Option<Version> {
        self.aligned.first()
    }
}
