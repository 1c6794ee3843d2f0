use serde::{Deserialize, Serialize};

/// Media that travels alongside a single-shot prompt
///
/// Only URI-referenced media is supported: the provider fetches the resource
/// itself (e.g. a YouTube video URL), nothing is uploaded inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Attachment {
    FileUri {
        uri: String,
        mime_type: String,
    },
}

impl Attachment {
    /// Attach a remote file by URI
    pub fn file_uri(uri: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self::FileUri {
            uri: uri.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Attach a video by URL
    pub fn video(uri: impl Into<String>) -> Self {
        Self::file_uri(uri, "video/*")
    }

    pub fn uri(&self) -> &str {
        match self {
            Self::FileUri { uri, .. } => uri,
        }
    }
}
