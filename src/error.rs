//! Error taxonomy for the commit pipeline and its remote collaborators
//!
//! Every failure short-circuits the pipeline at the step where it happens and
//! reaches the caller unchanged. `Conflict` is kept apart from `Remote` so callers
//! can decide whether re-running the whole pipeline is worthwhile.

use crate::artifacts::branch::branch_name::BranchName;
use thiserror::Error;

/// Result type alias for pipeline and remote operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The branch does not exist; carries near matches in the order the remote listed them
    #[error("branch `{branch}` doesn't exist.{}", render_suggestions(.suggestions))]
    BranchNotFound {
        branch: String,
        suggestions: Vec<BranchName>,
    },

    #[error("the {updater} updater did not match any items to update")]
    NoMatchingItems { updater: String },

    #[error("malformed content in `{path}`: {reason}")]
    MalformedContent { path: String, reason: String },

    #[error("could not bump build number `{0}` because it's not numeric")]
    NonNumericBuild(String),

    #[error("remote request failed with status {status}: {body}")]
    Remote { status: u16, body: String },

    /// The branch ref moved after the snapshot was read
    #[error("branch `{branch}` moved while the commit was being built: {body}")]
    Conflict { branch: String, body: String },

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid response from `{url}`: {reason}")]
    InvalidResponse { url: String, reason: String },

    #[error("invalid object id: {0}")]
    InvalidObjectId(String),

    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedContent {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

fn render_suggestions(suggestions: &[BranchName]) -> String {
    if suggestions.is_empty() {
        return String::new();
    }

    suggestions
        .iter()
        .fold(" Did you mean one of these:".to_string(), |acc, branch| {
            format!("{acc}\n • {branch}")
        })
}
