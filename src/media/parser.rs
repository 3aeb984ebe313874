//! Media variant selection and URL utilities.

use url::Url;

use crate::media::json::JsonNode;

/// Container type accepted for video and animated GIF variants.
const MP4_CONTENT_TYPE: &str = "video/mp4";

/// Extension used when a URL path carries none.
const DEFAULT_EXTENSION: &str = "mp4";

/// Pick the MP4 variant with the highest bitrate.
///
/// A missing bitrate counts as zero. On ties the earlier variant wins.
pub fn best_mp4_url<'a, N: JsonNode<'a>>(variants: &[N]) -> Option<&'a str> {
    let mut best: Option<(f64, &'a str)> = None;

    for &variant in variants {
        let content_type = variant.field("content_type").and_then(|v| v.as_str());
        if content_type != Some(MP4_CONTENT_TYPE) {
            continue;
        }

        let Some(url) = variant.field("url").and_then(|v| v.as_str()) else {
            continue;
        };
        let bitrate = variant
            .field("bitrate")
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);

        match best {
            Some((best_bitrate, _)) if bitrate <= best_bitrate => {}
            _ => best = Some((bitrate, url)),
        }
    }

    best.map(|(_, url)| url)
}

/// Rewrite a photo URL to request the original, unscaled resolution.
///
/// Unparseable URLs are returned untouched.
pub fn original_photo_url(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return raw.to_string();
    };

    let mut replaced = false;
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter_map(|(key, value)| {
            if key != "name" {
                return Some((key.into_owned(), value.into_owned()));
            }
            if replaced {
                None
            } else {
                replaced = true;
                Some((key.into_owned(), "orig".to_string()))
            }
        })
        .collect();

    {
        let mut query = url.query_pairs_mut();
        query.clear();
        for (key, value) in &pairs {
            query.append_pair(key, value);
        }
        if !replaced {
            query.append_pair("name", "orig");
        }
    }

    url.to_string()
}

/// Infer a file extension from the last path segment of a URL.
///
/// Falls back to `mp4` when the URL does not parse or its last segment has no
/// period.
pub fn file_extension(raw: &str) -> String {
    let Ok(url) = Url::parse(raw) else {
        return DEFAULT_EXTENSION.to_string();
    };

    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("");

    match segment.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext.to_string(),
        _ => DEFAULT_EXTENSION.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn variants(doc: &Value) -> Vec<&Value> {
        doc.as_array().unwrap().iter().collect()
    }

    #[test]
    fn test_best_mp4_picks_highest_bitrate() {
        let doc = json!([
            {"content_type": "application/x-mpegURL", "url": "https://v/x.m3u8"},
            {"content_type": "video/mp4", "bitrate": 632000, "url": "https://v/low.mp4"},
            {"content_type": "video/mp4", "bitrate": 2176000, "url": "https://v/high.mp4"},
            {"content_type": "video/mp4", "bitrate": 950000, "url": "https://v/mid.mp4"}
        ]);
        assert_eq!(best_mp4_url(&variants(&doc)), Some("https://v/high.mp4"));
    }

    #[test]
    fn test_best_mp4_missing_bitrate_is_zero() {
        let doc = json!([
            {"content_type": "video/mp4", "url": "https://v/nobitrate.mp4"},
            {"content_type": "video/mp4", "bitrate": 1, "url": "https://v/one.mp4"}
        ]);
        assert_eq!(best_mp4_url(&variants(&doc)), Some("https://v/one.mp4"));
    }

    #[test]
    fn test_best_mp4_tie_keeps_first() {
        let doc = json!([
            {"content_type": "video/mp4", "url": "https://v/first.mp4"},
            {"content_type": "video/mp4", "bitrate": 0, "url": "https://v/second.mp4"}
        ]);
        assert_eq!(best_mp4_url(&variants(&doc)), Some("https://v/first.mp4"));
    }

    #[test]
    fn test_best_mp4_none_without_mp4() {
        let doc = json!([
            {"content_type": "application/x-mpegURL", "url": "https://v/x.m3u8"}
        ]);
        assert_eq!(best_mp4_url(&variants(&doc)), None);
        let empty: Vec<&Value> = Vec::new();
        assert_eq!(best_mp4_url(&empty), None);
    }

    #[test]
    fn test_original_photo_url_appends_name() {
        assert_eq!(
            original_photo_url("https://pbs.twimg.com/media/abc.jpg"),
            "https://pbs.twimg.com/media/abc.jpg?name=orig"
        );
    }

    #[test]
    fn test_original_photo_url_replaces_name() {
        assert_eq!(
            original_photo_url("https://pbs.twimg.com/media/abc?format=jpg&name=small"),
            "https://pbs.twimg.com/media/abc?format=jpg&name=orig"
        );
    }

    #[test]
    fn test_original_photo_url_keeps_unparseable() {
        assert_eq!(original_photo_url("not a url"), "not a url");
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(
            file_extension("https://pbs.twimg.com/media/abc.jpg?name=orig"),
            "jpg"
        );
        assert_eq!(
            file_extension("https://video.twimg.com/ext_tw_video/1/pu/vid/720x1280/x.mp4?tag=12"),
            "mp4"
        );
        assert_eq!(
            file_extension("https://pbs.twimg.com/media/abc?format=png"),
            "mp4"
        );
        assert_eq!(file_extension("garbage"), "mp4");
    }
}
