//! Download dispatch: individual transfers and image archive bundling.
//!
//! Videos and GIFs always go out one by one. Several images are first tried
//! as a single ZIP; if any fetch, the packaging, or the archive submission
//! fails, every image is resubmitted individually instead.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{join_all, try_join_all};
use futures::join;

use crate::download::archive::{build_archive, ArchiveEntry};
use crate::download::blob::BlobStore;
use crate::download::fetch::MediaFetcher;
use crate::download::sink::{DownloadRequest, DownloadSink, DownloadSource};
use crate::download::state::{DispatchReport, ImageStrategy};
use crate::error::{Error, Result};
use crate::fs::naming::archive_base_name;
use crate::media::{MediaItem, MediaKind};

/// How long an archive blob stays alive after a successful submission.
pub const DEFAULT_RELEASE_DELAY: Duration = Duration::from_secs(60);

/// Routes media items to a download sink.
pub struct Dispatcher {
    sink: Arc<dyn DownloadSink>,
    fetcher: Arc<dyn MediaFetcher>,
    blobs: BlobStore,
    bundle_images: bool,
    release_delay: Duration,
}

impl Dispatcher {
    pub fn new(sink: Arc<dyn DownloadSink>, fetcher: Arc<dyn MediaFetcher>, blobs: BlobStore) -> Self {
        Self {
            sink,
            fetcher,
            blobs,
            bundle_images: true,
            release_delay: DEFAULT_RELEASE_DELAY,
        }
    }

    /// Enable or disable the archive strategy for multiple images.
    pub fn with_bundling(mut self, bundle_images: bool) -> Self {
        self.bundle_images = bundle_images;
        self
    }

    pub fn with_release_delay(mut self, release_delay: Duration) -> Self {
        self.release_delay = release_delay;
        self
    }

    /// Image strategies to try, in order, for `image_count` images.
    pub fn image_strategies(&self, image_count: usize) -> Vec<ImageStrategy> {
        if self.bundle_images && image_count > 1 {
            vec![ImageStrategy::Archive, ImageStrategy::Individual]
        } else {
            vec![ImageStrategy::Individual]
        }
    }

    /// Deliver every item. Failures are recorded in the report, never raised.
    pub async fn dispatch(&self, items: &[MediaItem]) -> DispatchReport {
        let (images, others): (Vec<&MediaItem>, Vec<&MediaItem>) =
            items.iter().partition(|item| item.kind.is_image());

        tracing::debug!(
            "Dispatching {} images and {} videos/gifs",
            images.len(),
            others.len()
        );

        // Videos and GIFs do not wait for image bundling, nor it for them.
        let (mut report, image_report) = join!(
            self.download_batch(&others),
            self.download_images(&images)
        );
        report.merge(image_report);
        report
    }

    async fn download_batch(&self, items: &[&MediaItem]) -> DispatchReport {
        let mut report = DispatchReport::default();
        self.download_individually(items, &mut report).await;
        report
    }

    /// Try the image strategies in order until one succeeds.
    async fn download_images(&self, images: &[&MediaItem]) -> DispatchReport {
        let mut report = DispatchReport::default();

        for strategy in self.image_strategies(images.len()) {
            match self.run_strategy(strategy, images, &mut report).await {
                Ok(()) => break,
                Err(e) => {
                    tracing::warn!(
                        "ZIP creation failed, falling back to individual downloads: {}",
                        e
                    );
                    report.record_strategy_failure(strategy, e.to_string());
                }
            }
        }

        report
    }

    async fn run_strategy(
        &self,
        strategy: ImageStrategy,
        images: &[&MediaItem],
        report: &mut DispatchReport,
    ) -> Result<()> {
        match strategy {
            ImageStrategy::Archive => {
                let (name, path) = self.download_archive(images).await?;
                report.record_success(MediaKind::Image, path, images.len() as u64);
                report.archive = Some(name);
                Ok(())
            }
            ImageStrategy::Individual => {
                self.download_individually(images, report).await;
                Ok(())
            }
        }
    }

    /// Submit each item on its own; one failure does not affect the others.
    async fn download_individually(&self, items: &[&MediaItem], report: &mut DispatchReport) {
        let submissions = items.iter().map(|item| async move {
            let request = DownloadRequest::for_item(item);
            let filename = request.filename.clone();
            (item.kind, filename, self.sink.submit(request).await)
        });

        for (kind, filename, result) in join_all(submissions).await {
            match result {
                Ok(path) => report.record_success(kind, path, 1),
                Err(e) => {
                    tracing::error!("Download failed: {} ({})", filename, e);
                    report.record_failure(filename, e.to_string());
                }
            }
        }
    }

    /// Fetch all images, zip them and submit the archive as one download.
    async fn download_archive(&self, images: &[&MediaItem]) -> Result<(String, PathBuf)> {
        let fetches = images.iter().map(|item| async move {
            let bytes = self.fetcher.fetch(&item.source_url).await?;
            Ok::<_, Error>(ArchiveEntry {
                filename: item.filename(),
                bytes,
            })
        });
        let entries = try_join_all(fetches).await?;

        let archive = build_archive(&entries)?;
        let base = images
            .first()
            .map(|item| archive_base_name(&item.display_name))
            .unwrap_or("media");
        let name = format!("{}.zip", base);

        let handle = self.blobs.create(archive).await;
        let request = DownloadRequest::new(DownloadSource::Blob(handle.clone()), name.clone());

        match self.sink.submit(request).await {
            Ok(path) => {
                self.blobs.revoke_after(handle, self.release_delay);
                Ok((name, path))
            }
            Err(e) => {
                self.blobs.revoke(&handle).await;
                Err(e)
            }
        }
    }
}
