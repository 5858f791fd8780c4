// SPDX-License-Identifier: MIT

//! Book model for storage and API.

use serde::{Deserialize, Serialize};

/// Cover filename shared by books without an uploaded image.
/// Never deleted from storage.
pub const DEFAULT_COVER: &str = "default-book.png";

/// Reading status of a tracked book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReadingStatus {
    #[default]
    ToRead,
    Reading,
    Finished,
    Abandoned,
}

impl ReadingStatus {
    /// Parse the wire form (`to-read`, `reading`, `finished`, `abandoned`).
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "to-read" => Some(Self::ToRead),
            "reading" => Some(Self::Reading),
            "finished" => Some(Self::Finished),
            "abandoned" => Some(Self::Abandoned),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ToRead => "to-read",
            Self::Reading => "reading",
            Self::Finished => "finished",
            Self::Abandoned => "abandoned",
        }
    }
}

/// Book record stored in Firestore.
///
/// Every read, write, and delete is scoped by (`id`, `user_id`); a book
/// id alone never grants access.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Document ID (UUID v4)
    pub id: String,
    pub title: String,
    pub author: String,
    pub notes: String,
    pub conclusion: String,
    /// 0-5 stars
    pub rate: u8,
    pub status: ReadingStatus,
    pub pages: u32,
    /// When reading started (RFC 3339, defaults to creation time)
    pub start_date: String,
    /// When reading finished (RFC 3339)
    pub end_date: Option<String>,
    /// Cover image filename under the uploads directory
    pub cover: String,
    /// Owning user; immutable after creation
    pub user_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Book {
    /// Case-insensitive substring match over title and author.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.author.to_lowercase().contains(&needle)
    }
}
