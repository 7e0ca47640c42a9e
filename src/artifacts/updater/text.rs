use crate::artifacts::objects::tree::TreeItem;
use crate::artifacts::updater::{ContentUpdater, select_paths};
use crate::error::{Error, Result};
use regex::{NoExpand, Regex};

type Transform = dyn Fn(&TreeItem, &str) -> Result<String> + Send + Sync;

/// Generic updater: a fixed set of paths and a text transform
pub struct TextUpdater {
    name: String,
    paths: Vec<String>,
    transform: Box<Transform>,
}

impl TextUpdater {
    pub fn new<F>(name: impl Into<String>, paths: Vec<String>, transform: F) -> Self
    where
        F: Fn(&TreeItem, &str) -> Result<String> + Send + Sync + 'static,
    {
        TextUpdater {
            name: name.into(),
            paths,
            transform: Box::new(transform),
        }
    }

    /// Replace every match of `pattern` with the literal `replacement`
    ///
    /// A selected file without any match fails the run.
    pub fn regex_replace(paths: Vec<String>, pattern: &str, replacement: String) -> Result<Self> {
        let re = Regex::new(pattern)
            .map_err(|err| Error::malformed(pattern, format!("invalid pattern: {err}")))?;

        Ok(TextUpdater::new("replace", paths, move |item, content| {
            if !re.is_match(content) {
                return Err(Error::malformed(
                    &item.path,
                    format!("pattern `{}` not found", re.as_str()),
                ));
            }
            Ok(re.replace_all(content, NoExpand(&replacement)).into_owned())
        }))
    }
}

impl std::fmt::Debug for TextUpdater {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextUpdater")
            .field("name", &self.name)
            .field("paths", &self.paths)
            .finish_non_exhaustive()
    }
}

impl ContentUpdater for TextUpdater {
    type Output = ();

    fn name(&self) -> &str {
        &self.name
    }

    fn items_to_update(&self, items: &[TreeItem]) -> Vec<TreeItem> {
        select_paths(items, &self.paths)
    }

    fn update(&self, item: &TreeItem, content: &str) -> Result<String> {
        (self.transform)(item, content)
    }

    fn output(&self) -> Option<()> {
        None
    }
}
