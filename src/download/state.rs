//! Dispatch outcome tracking.

use std::fmt;
use std::path::PathBuf;

use crate::media::MediaKind;

/// Ways of delivering a set of images, tried in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageStrategy {
    /// Fetch all images and submit them as one ZIP.
    Archive,
    /// Submit each image on its own.
    Individual,
}

impl fmt::Display for ImageStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageStrategy::Archive => write!(f, "archive"),
            ImageStrategy::Individual => write!(f, "individual"),
        }
    }
}

/// A download that the sink rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedDownload {
    pub filename: String,
    pub reason: String,
}

/// Outcome of one dispatch.
#[derive(Debug, Default)]
pub struct DispatchReport {
    /// Files the sink accepted, in completion order.
    pub downloaded: Vec<PathBuf>,

    /// Individual downloads that failed.
    pub failed: Vec<FailedDownload>,

    /// Name of the archive submitted, if the archive strategy succeeded.
    pub archive: Option<String>,

    /// Strategies abandoned before a later one took over.
    pub strategy_failures: Vec<(ImageStrategy, String)>,

    // Statistics
    pub pic_count: u64,
    pub vid_count: u64,
    pub gif_count: u64,
}

impl DispatchReport {
    /// Record an accepted download of `count` items of `kind`.
    pub fn record_success(&mut self, kind: MediaKind, path: PathBuf, count: u64) {
        self.downloaded.push(path);
        match kind {
            MediaKind::Image => self.pic_count += count,
            MediaKind::Video => self.vid_count += count,
            MediaKind::AnimatedGif => self.gif_count += count,
        }
    }

    pub fn record_failure(&mut self, filename: String, reason: String) {
        self.failed.push(FailedDownload { filename, reason });
    }

    pub fn record_strategy_failure(&mut self, strategy: ImageStrategy, reason: String) {
        self.strategy_failures.push((strategy, reason));
    }

    /// Fold the outcome of a concurrently run batch into this report.
    pub fn merge(&mut self, other: DispatchReport) {
        self.downloaded.extend(other.downloaded);
        self.failed.extend(other.failed);
        self.archive = self.archive.take().or(other.archive);
        self.strategy_failures.extend(other.strategy_failures);
        self.pic_count += other.pic_count;
        self.vid_count += other.vid_count;
        self.gif_count += other.gif_count;
    }

    /// Whether the archive path was attempted and abandoned.
    pub fn fell_back(&self) -> bool {
        self.strategy_failures
            .iter()
            .any(|(strategy, _)| *strategy == ImageStrategy::Archive)
    }

    /// Number of media items delivered, counting archive members.
    pub fn total_downloaded(&self) -> u64 {
        self.pic_count + self.vid_count + self.gif_count
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_by_kind() {
        let mut report = DispatchReport::default();
        report.record_success(MediaKind::Image, PathBuf::from("a.zip"), 3);
        report.record_success(MediaKind::Video, PathBuf::from("b.mp4"), 1);
        report.record_success(MediaKind::AnimatedGif, PathBuf::from("c.mp4"), 1);
        report.record_failure("d.mp4".to_string(), "HTTP 404".to_string());

        assert_eq!(report.pic_count, 3);
        assert_eq!(report.total_downloaded(), 5);
        assert_eq!(report.downloaded.len(), 3);
        assert_eq!(report.failed_count(), 1);
    }

    #[test]
    fn test_merge() {
        let mut videos = DispatchReport::default();
        videos.record_success(MediaKind::Video, PathBuf::from("v.mp4"), 1);
        videos.record_failure("g.mp4".to_string(), "HTTP 500".to_string());

        let mut images = DispatchReport::default();
        images.record_strategy_failure(ImageStrategy::Archive, "fetch failed".to_string());
        images.record_success(MediaKind::Image, PathBuf::from("p1.jpg"), 1);
        images.record_success(MediaKind::Image, PathBuf::from("p2.jpg"), 1);

        videos.merge(images);

        assert_eq!(videos.total_downloaded(), 3);
        assert_eq!(videos.downloaded.len(), 3);
        assert_eq!(videos.failed_count(), 1);
        assert!(videos.fell_back());
        assert_eq!(videos.archive, None);
    }

    #[test]
    fn test_fell_back() {
        let mut report = DispatchReport::default();
        assert!(!report.fell_back());
        report.record_strategy_failure(ImageStrategy::Archive, "fetch failed".to_string());
        assert!(report.fell_back());
    }
}
