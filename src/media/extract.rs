//! Schema-tolerant media extraction from GraphQL response documents.
//!
//! Records are found anywhere in the document: any object exposing a
//! `legacy` block with `extended_entities.media` and a `core` block that
//! resolves to the author's handle, either directly or under a wrapping
//! `tweet` field. Nodes that do not match are skipped silently, since the
//! response schema changes without notice.
//!
//! Extraction runs in two passes over the same document. The first pass maps
//! every quoted record (by node identity) to the id of the record quoting it;
//! the second pass emits items. Quote back-references therefore attach no
//! matter where the quoted record sits in traversal order, and the document
//! itself is never modified.

use std::collections::{HashMap, HashSet};

use crate::fs::naming::{derive_stem, timestamp_suffix, TimestampZone};
use crate::media::item::{MediaItem, MediaKind};
use crate::media::json::JsonNode;
use crate::media::parser::{best_mp4_url, original_photo_url};

/// Extraction settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    /// Zone used for the timestamp part of display names.
    pub zone: TimestampZone,
}

/// Transient state for one walk.
#[derive(Debug, Default)]
struct ExtractionContext {
    visited: HashSet<usize>,
    quoted_by: HashMap<usize, String>,
    items: Vec<MediaItem>,
}

/// A node recognised as a media-bearing record.
struct Record<'a, N> {
    node: N,
    record_id: &'a str,
    handle: &'a str,
    created_at: Option<&'a str>,
    media: Vec<N>,
}

/// Extract media items with default options.
pub fn extract<'a, N: JsonNode<'a>>(root: N) -> Vec<MediaItem> {
    extract_with(root, &ExtractOptions::default())
}

/// Extract every media item reachable from `root`.
///
/// Each container is visited at most once, so shared sub-objects yield their
/// items once and cyclic documents terminate. A scalar root yields nothing.
pub fn extract_with<'a, N: JsonNode<'a>>(root: N, options: &ExtractOptions) -> Vec<MediaItem> {
    if !root.is_container() {
        return Vec::new();
    }

    let mut ctx = ExtractionContext::default();

    let mut seen = HashSet::new();
    collect_quote_links(root, &mut seen, &mut ctx.quoted_by);

    walk(root, options, &mut ctx);

    tracing::debug!(
        "Extracted {} media items ({} quote links)",
        ctx.items.len(),
        ctx.quoted_by.len()
    );
    ctx.items
}

/// Named block of the node itself, falling back to the one under `tweet`.
fn record_block<'a, N: JsonNode<'a>>(node: N, name: &str) -> Option<N> {
    node.field(name)
        .filter(|block| block.is_container())
        .or_else(|| node.path(&["tweet", name]))
        .filter(|block| block.is_container())
}

/// Author handle from a `core` block.
///
/// Older payloads keep it under `user_results.result.legacy`, newer ones under
/// `user_results.result.core`.
fn author_handle<'a, N: JsonNode<'a>>(core: N) -> Option<&'a str> {
    let user = core.path(&["user_results", "result"])?;
    user.path(&["legacy", "screen_name"])
        .and_then(|name| name.as_str())
        .filter(|name| !name.is_empty())
        .or_else(|| {
            user.path(&["core", "screen_name"])
                .and_then(|name| name.as_str())
                .filter(|name| !name.is_empty())
        })
}

fn media_record<'a, N: JsonNode<'a>>(node: N) -> Option<Record<'a, N>> {
    let legacy = record_block(node, "legacy")?;
    let core = record_block(node, "core")?;

    let media = legacy.path(&["extended_entities", "media"])?.elements()?;
    let handle = author_handle(core)?;
    let record_id = legacy.field("id_str").and_then(|id| id.as_str())?;
    let created_at = legacy.field("created_at").and_then(|ts| ts.as_str());

    Some(Record {
        node,
        record_id,
        handle,
        created_at,
        media,
    })
}

/// First pass: map quoted records to the record quoting them.
fn collect_quote_links<'a, N: JsonNode<'a>>(
    node: N,
    seen: &mut HashSet<usize>,
    links: &mut HashMap<usize, String>,
) {
    if !node.is_container() || !seen.insert(node.identity()) {
        return;
    }

    let quoted = node
        .path(&["quoted_status_result", "result"])
        .filter(|quoted| quoted.is_container());
    let outer_id = record_block(node, "legacy")
        .and_then(|legacy| legacy.field("id_str"))
        .and_then(|id| id.as_str());

    if let (Some(quoted), Some(outer_id)) = (quoted, outer_id) {
        links
            .entry(quoted.identity())
            .or_insert_with(|| outer_id.to_string());
    }

    for child in node.children() {
        collect_quote_links(child, seen, links);
    }
}

/// Second pass: emit items for every record reachable from `node`.
fn walk<'a, N: JsonNode<'a>>(node: N, options: &ExtractOptions, ctx: &mut ExtractionContext) {
    if !node.is_container() || !ctx.visited.insert(node.identity()) {
        return;
    }

    if let Some(record) = media_record(node) {
        emit_record(&record, options, ctx);
    }

    for child in node.children() {
        walk(child, options, ctx);
    }
}

fn emit_record<'a, N: JsonNode<'a>>(
    record: &Record<'a, N>,
    options: &ExtractOptions,
    ctx: &mut ExtractionContext,
) {
    let timestamp = timestamp_suffix(record.created_at, options.zone);
    let referenced_by = ctx.quoted_by.get(&record.node.identity()).cloned();
    let total = record.media.len();

    for (index, media) in record.media.iter().enumerate() {
        let display_name = derive_stem(record.handle, record.record_id, &timestamp, index, total);

        let Some(kind) = media
            .field("type")
            .and_then(|kind| kind.as_str())
            .and_then(MediaKind::from_wire)
        else {
            continue;
        };

        let source_url = match kind {
            MediaKind::Video | MediaKind::AnimatedGif => {
                let variants = media
                    .path(&["video_info", "variants"])
                    .and_then(|variants| variants.elements())
                    .unwrap_or_default();
                match best_mp4_url(&variants) {
                    Some(url) => url.to_string(),
                    None => {
                        tracing::debug!("No MP4 variant for {} in {}", display_name, record.record_id);
                        continue;
                    }
                }
            }
            MediaKind::Image => match media.field("media_url_https").and_then(|url| url.as_str()) {
                Some(url) if !url.is_empty() => original_photo_url(url),
                _ => continue,
            },
        };

        ctx.items.push(MediaItem {
            kind,
            source_url,
            display_name,
            record_id: record.record_id.to_string(),
            referenced_by: referenced_by.clone(),
        });
    }
}
