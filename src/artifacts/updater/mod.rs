//! Pluggable content transformation
//!
//! A [`ContentUpdater`] selects the files of a tree snapshot it cares about and
//! computes their new text. Updates for different files run concurrently, so
//! anything an updater wants to report back (e.g. the version it wrote) goes
//! through a [`SideOutput`] accumulator and is handed to the caller through the
//! pipeline's return value.
//!
//! Variants:
//!
//! - `bump`: increments the build number of iOS plists
//! - `align`: sets version and build number of iOS plists
//! - `text`: generic path selection plus a text transform

pub mod align;
pub mod bump;
pub mod side_output;
pub mod text;

use crate::artifacts::message::Placeholders;
use crate::artifacts::objects::tree::TreeItem;
use crate::error::Result;

pub use side_output::SideOutput;

pub trait ContentUpdater: Send + Sync {
    /// Typed value the updater reports after a run, used to template the commit message
    type Output: Placeholders + Send;

    /// Short name used in diagnostics
    fn name(&self) -> &str;

    /// Pure filter over the snapshot; no I/O
    fn items_to_update(&self, items: &[TreeItem]) -> Vec<TreeItem>;

    /// Pure transform of one selected file
    fn update(&self, item: &TreeItem, content: &str) -> Result<String>;

    /// Side output gathered by the updates of the last run
    fn output(&self) -> Option<Self::Output>;
}

/// Blob items whose path is listed in `paths`
pub(crate) fn select_paths(items: &[TreeItem], paths: &[String]) -> Vec<TreeItem> {
    items
        .iter()
        .filter(|item| item.is_blob() && paths.iter().any(|path| path == &item.path))
        .cloned()
        .collect()
}
