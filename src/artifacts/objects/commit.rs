//! Commit objects
//!
//! Commits represent snapshots of the repository at specific points in time.
//! They contain:
//! - A tree object ID (directory snapshot)
//! - Parent commit ID(s) (for history)
//! - Author and committer information
//! - Commit message
//!
//! ## Wire format
//!
//! Read from `GET /git/commits/{sha}`:
//! ```text
//! {"sha": .., "message": .., "author": {..}, "committer": {..},
//!  "tree": {"sha": ..}, "parents": [{"sha": ..}]}
//! ```
//!
//! Written to `POST /git/commits` as a [`NewCommit`]:
//! ```text
//! {"message": .., "tree": .., "parents": [..], "author": {"name", "email", "date"}}
//! ```

use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use chrono::{DateTime, FixedOffset, SecondsFormat};
use derive_new::new;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Author or committer information
///
/// Contains name, email, and timestamp with timezone information.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
#[serde(from = "AuthorPayload")]
pub struct Author {
    name: String,
    email: String,
    timestamp: DateTime<FixedOffset>,
}

#[derive(Deserialize)]
struct AuthorPayload {
    name: String,
    email: String,
    date: DateTime<FixedOffset>,
}

impl From<AuthorPayload> for Author {
    fn from(payload: AuthorPayload) -> Self {
        Author::new_with_timestamp(payload.name, payload.email, payload.date)
    }
}

impl Author {
    /// Create a new author with the current timestamp
    ///
    /// # Arguments
    ///
    /// * `name` - Author's name
    /// * `email` - Author's email address
    pub fn new(name: String, email: String) -> Self {
        Author {
            name,
            email,
            timestamp: chrono::Local::now().fixed_offset(),
        }
    }

    /// Create a new author with a specific timestamp
    pub fn new_with_timestamp(name: String, email: String, timestamp: DateTime<FixedOffset>) -> Self {
        Author {
            name,
            email,
            timestamp,
        }
    }

    /// Load author information from environment variables
    ///
    /// Reads GIT_AUTHOR_NAME, GIT_AUTHOR_EMAIL, and optionally GIT_AUTHOR_DATE.
    /// If no date is provided, uses current time.
    pub fn load_from_env() -> anyhow::Result<Self> {
        let name = std::env::var("GIT_AUTHOR_NAME").context("GIT_AUTHOR_NAME not set")?;
        let email = std::env::var("GIT_AUTHOR_EMAIL").context("GIT_AUTHOR_EMAIL not set")?;
        let timestamp = std::env::var("GIT_AUTHOR_DATE").ok().and_then(|date_str| {
            DateTime::parse_from_rfc2822(&date_str)
                .or_else(|_| DateTime::parse_from_rfc3339(&date_str))
                .or_else(|_| DateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S %z"))
                .ok()
        });

        match timestamp {
            Some(ts) => Ok(Author::new_with_timestamp(name, email, ts)),
            None => Ok(Author::new(name, email)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// Format author name and email for display
    ///
    /// # Returns
    ///
    /// String in format "Name <email@example.com>"
    pub fn display_name(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }

    /// Timestamp as the remote service expects it, e.g. `2024-01-01T12:34:56Z`
    pub fn wire_date(&self) -> String {
        self.timestamp
            .to_utc()
            .to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

impl Serialize for Author {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut author = serializer.serialize_struct("Author", 3)?;
        author.serialize_field("name", &self.name)?;
        author.serialize_field("email", &self.email)?;
        author.serialize_field("date", &self.wire_date())?;
        author.end()
    }
}

/// Commit object as read back from the remote service
#[derive(Debug, Clone, Eq, PartialEq, Deserialize)]
#[serde(from = "CommitPayload")]
pub struct Commit {
    oid: ObjectId,
    /// Parent commit IDs (empty for a root commit, several for merges)
    parents: Vec<ObjectId>,
    tree_oid: ObjectId,
    author: Author,
    committer: Author,
    message: String,
}

#[derive(Deserialize)]
struct CommitPayload {
    sha: ObjectId,
    message: String,
    author: Author,
    committer: Author,
    tree: ShaRef,
    #[serde(default)]
    parents: Vec<ShaRef>,
}

/// `{"sha": ..}` wrapper the remote uses for nested object references
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct ShaRef {
    pub(crate) sha: ObjectId,
}

impl From<CommitPayload> for Commit {
    fn from(payload: CommitPayload) -> Self {
        Commit {
            oid: payload.sha,
            parents: payload.parents.into_iter().map(|parent| parent.sha).collect(),
            tree_oid: payload.tree.sha,
            author: payload.author,
            committer: payload.committer,
            message: payload.message,
        }
    }
}

impl Commit {
    pub fn new(
        oid: ObjectId,
        parents: Vec<ObjectId>,
        tree_oid: ObjectId,
        author: Author,
        message: String,
    ) -> Self {
        Commit {
            oid,
            parents,
            tree_oid,
            author: author.clone(),
            committer: author,
            message,
        }
    }

    pub fn oid(&self) -> &ObjectId {
        &self.oid
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn committer(&self) -> &Author {
        &self.committer
    }
}

/// Request body for creating a commit
#[derive(Debug, Clone, Serialize, new)]
pub struct NewCommit {
    pub message: String,
    pub tree: ObjectId,
    pub parents: Vec<ObjectId>,
    pub author: Author,
}
