//! Blob objects
//!
//! Blobs store file content. They carry no filename or permissions (those live
//! in the tree entry pointing at them).
//!
//! ## Wire format
//!
//! `GET /git/blobs/{sha}` returns the content base64 encoded, wrapped at 60
//! columns with `\n`. The wrapping is stripped before decoding.

use crate::artifacts::objects::object_id::ObjectId;
use crate::error::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use derive_new::new;
use serde::{Deserialize, Serialize};

/// Decoded text blob
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    oid: ObjectId,
    content: String,
}

impl Blob {
    pub fn oid(&self) -> &ObjectId {
        &self.oid
    }

    /// Get the file content as a string
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Raw `GET /git/blobs/{sha}` response
#[derive(Debug, Clone, Deserialize)]
pub struct EncodedBlob {
    pub sha: ObjectId,
    pub content: String,
    #[serde(default)]
    pub encoding: Option<String>,
}

impl EncodedBlob {
    /// Decode the transport encoding into text
    pub fn decode(self) -> Result<Blob> {
        let content = match self.encoding.as_deref() {
            Some("utf-8") => self.content,
            _ => decode_base64_text(&self.content)
                .map_err(|reason| Error::malformed(self.sha.as_ref(), reason))?,
        };

        Ok(Blob::new(self.sha, content))
    }
}

/// Request body for `POST /git/blobs`
#[derive(Debug, Clone, Serialize, new)]
pub struct NewBlob<'c> {
    pub content: &'c str,
    pub encoding: &'static str,
}

impl<'c> NewBlob<'c> {
    pub fn utf8(content: &'c str) -> Self {
        NewBlob::new(content, "utf-8")
    }
}

fn decode_base64_text(wrapped: &str) -> std::result::Result<String, String> {
    let unwrapped = wrapped
        .chars()
        .filter(|c| *c != '\n' && *c != '\r')
        .collect::<String>();

    let bytes = STANDARD
        .decode(unwrapped.as_bytes())
        .map_err(|err| format!("invalid base64 content: {err}"))?;

    String::from_utf8(bytes).map_err(|_| "blob content is not valid UTF-8 text".to_string())
}
