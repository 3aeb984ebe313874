//! Media module: item representation, JSON views and extraction.

pub mod extract;
pub mod item;
pub mod json;
pub mod parser;

pub use extract::{extract, extract_with, ExtractOptions};
pub use item::{MediaItem, MediaKind};
pub use json::{GraphRef, GraphValue, JsonGraph, JsonNode, NodeId};
pub use parser::{best_mp4_url, file_extension, original_photo_url};
