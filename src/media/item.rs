//! Media item representation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::media::parser::file_extension;

/// Kind of downloadable media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    #[serde(rename = "gif")]
    AnimatedGif,
}

impl MediaKind {
    /// Map the platform's `type` field to a media kind.
    pub fn from_wire(kind: &str) -> Option<Self> {
        match kind {
            "photo" => Some(MediaKind::Image),
            "video" => Some(MediaKind::Video),
            "animated_gif" => Some(MediaKind::AnimatedGif),
            _ => None,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, MediaKind::Image)
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::AnimatedGif => "gif",
        };
        f.pad(name)
    }
}

/// A downloadable media item extracted from a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    pub kind: MediaKind,

    /// Absolute URL of the highest-quality representation.
    pub source_url: String,

    /// Filename stem, without extension.
    pub display_name: String,

    /// Record that directly contains this media.
    pub record_id: String,

    /// Record that quotes `record_id`, when reached through a quote.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenced_by: Option<String>,
}

impl MediaItem {
    /// Final filename: the display stem plus the extension inferred from the URL.
    pub fn filename(&self) -> String {
        format!("{}.{}", self.display_name, file_extension(&self.source_url))
    }

    /// Whether a download of `record_id` should include this item.
    pub fn belongs_to(&self, record_id: &str) -> bool {
        self.record_id == record_id || self.referenced_by.as_deref() == Some(record_id)
    }
}
