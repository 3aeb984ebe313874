//! Download submission.
//!
//! A [`DownloadSink`] plays the role of the native download manager: it takes
//! a source and a filename and stores the file. [`FsDownloadSink`] writes into
//! a directory on disk and never overwrites an existing file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{header, Client};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::download::blob::{BlobHandle, BlobStore};
use crate::error::{Error, Result};
use crate::fs::naming::{numbered_filename, sanitize_filename, MAX_UNIQUE_ATTEMPTS};
use crate::fs::paths::ensure_dir;
use crate::media::MediaItem;
use crate::output::progress::create_download_bar;

/// Minimum file size to show progress bar (20 MB).
const PROGRESS_THRESHOLD: u64 = 20 * 1024 * 1024;

/// Where the bytes of a download come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadSource {
    Url(String),
    Blob(BlobHandle),
}

/// One file handed to a sink. A taken filename is uniquified, never replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub source: DownloadSource,
    pub filename: String,
}

impl DownloadRequest {
    pub fn new(source: DownloadSource, filename: impl Into<String>) -> Self {
        Self {
            source,
            filename: filename.into(),
        }
    }

    /// Request for a single media item under its derived filename.
    pub fn for_item(item: &MediaItem) -> Self {
        Self::new(DownloadSource::Url(item.source_url.clone()), item.filename())
    }
}

/// Destination for downloads.
#[async_trait]
pub trait DownloadSink: Send + Sync {
    /// Store one file and return where it landed.
    async fn submit(&self, request: DownloadRequest) -> Result<PathBuf>;
}

/// Sink writing into a local directory.
pub struct FsDownloadSink {
    client: Client,
    directory: PathBuf,
    blobs: BlobStore,
    show_progress: bool,
}

impl FsDownloadSink {
    pub fn new(client: Client, directory: PathBuf, blobs: BlobStore) -> Self {
        Self {
            client,
            directory,
            blobs,
            show_progress: true,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Claim a free name by creating the file, trying `name`, `name_1`, ...
    ///
    /// Creation fails when the file exists, so concurrent submissions of the
    /// same name can never claim the same path.
    async fn reserve_file(&self, filename: &str) -> Result<(PathBuf, File)> {
        let path = self.directory.join(sanitize_filename(filename)?);

        for attempt in 0..=MAX_UNIQUE_ATTEMPTS {
            let candidate = numbered_filename(&path, attempt);
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&candidate)
                .await
            {
                Ok(file) => return Ok((candidate, file)),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(Error::Io(e)),
            }
        }

        Err(Error::Download(format!(
            "No free filename for {} after {} attempts",
            filename, MAX_UNIQUE_ATTEMPTS
        )))
    }

    async fn write_source(&self, source: &DownloadSource, file: &mut File) -> Result<()> {
        match source {
            DownloadSource::Url(url) => {
                tracing::debug!("GET {}", url);
                self.write_url(url, file).await
            }
            DownloadSource::Blob(handle) => {
                let bytes = self.blobs.read(handle).await?;
                file.write_all(bytes.as_slice()).await?;
                file.flush().await?;
                Ok(())
            }
        }
    }

    async fn write_url(&self, url: &str, file: &mut File) -> Result<()> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(Error::Download(format!(
                "Failed to download {}: HTTP {}",
                url,
                response.status()
            )));
        }

        let content_length = response.content_length();
        let progress = if self.show_progress
            && content_length.map(|l| l > PROGRESS_THRESHOLD).unwrap_or(false)
        {
            Some(create_download_bar(content_length.unwrap_or(0)))
        } else {
            None
        };

        let mut stream = response.bytes_stream();
        let streamed = async {
            let mut downloaded: u64 = 0;
            while let Some(chunk) = stream.next().await {
                let chunk = chunk.map_err(|e| Error::Download(format!("Stream error: {}", e)))?;
                file.write_all(&chunk).await?;
                downloaded += chunk.len() as u64;

                if let Some(ref pb) = progress {
                    pb.set_position(downloaded);
                }
            }
            file.flush().await?;
            Ok::<_, Error>(downloaded)
        }
        .await;

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        let downloaded = streamed?;
        match content_length {
            Some(expected) if expected != downloaded => Err(Error::Download(format!(
                "Incomplete download {}: {} of {} bytes",
                url, downloaded, expected
            ))),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl DownloadSink for FsDownloadSink {
    async fn submit(&self, request: DownloadRequest) -> Result<PathBuf> {
        ensure_dir(&self.directory)?;
        let (output_path, mut file) = self.reserve_file(&request.filename).await?;

        if let Err(e) = self.write_source(&request.source, &mut file).await {
            drop(file);
            // A partial file must not be left under the final name.
            if let Err(remove_err) = tokio::fs::remove_file(&output_path).await {
                tracing::warn!(
                    "Could not remove partial file {}: {}",
                    output_path.display(),
                    remove_err
                );
            }
            return Err(e);
        }

        tracing::info!("Downloaded: {}", output_path.display());
        Ok(output_path)
    }
}

/// Shared HTTP client for media transfers.
pub fn media_client(user_agent: &str) -> Result<Client> {
    let mut headers = header::HeaderMap::new();
    headers.insert(header::ACCEPT, header::HeaderValue::from_static("*/*"));

    Client::builder()
        .user_agent(user_agent)
        .default_headers(headers)
        .build()
        .map_err(|e| Error::Download(format!("Failed to create HTTP client: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::Arc;

    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    use crate::download::dispatcher::Dispatcher;
    use crate::download::fetch::HttpFetcher;
    use crate::media::MediaKind;

    /// Route served by [`serve`]: body bytes and the announced Content-Length.
    type Route = (Vec<u8>, usize);

    /// Minimal HTTP/1.1 server on a random local port; returns its base URL.
    async fn serve(routes: HashMap<&'static str, Route>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let routes = Arc::new(routes);

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let routes = routes.clone();
                tokio::spawn(async move {
                    let mut request = Vec::new();
                    let mut buf = [0u8; 1024];
                    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                        match socket.read(&mut buf).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => request.extend_from_slice(&buf[..n]),
                        }
                    }

                    let request = String::from_utf8_lossy(&request);
                    let path = request.split_whitespace().nth(1).unwrap_or("/");
                    let (status, body, length) = match routes.get(path) {
                        Some((body, length)) => ("200 OK", body.clone(), *length),
                        None => ("404 Not Found", Vec::new(), 0),
                    };

                    let head = format!(
                        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                        status, length
                    );
                    let _ = socket.write_all(head.as_bytes()).await;
                    let _ = socket.write_all(&body).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        format!("http://{}", addr)
    }

    fn full(body: Vec<u8>) -> Route {
        let length = body.len();
        (body, length)
    }

    fn client() -> Client {
        Client::builder().no_proxy().build().unwrap()
    }

    fn sink(dir: &Path, blobs: BlobStore) -> FsDownloadSink {
        FsDownloadSink::new(client(), dir.to_path_buf(), blobs).with_progress(false)
    }

    fn files_in(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    fn video(name: &str, url: String) -> MediaItem {
        MediaItem {
            kind: MediaKind::Video,
            source_url: url,
            display_name: name.to_string(),
            record_id: "42".to_string(),
            referenced_by: None,
        }
    }

    #[test]
    fn test_request_for_item() {
        let item = video("alice-42", "https://video.twimg.com/x/vid.mp4?tag=12".to_string());
        let request = DownloadRequest::for_item(&item);
        assert_eq!(request.filename, "alice-42.mp4");
        assert_eq!(
            request.source,
            DownloadSource::Url("https://video.twimg.com/x/vid.mp4?tag=12".to_string())
        );
    }

    #[tokio::test]
    async fn test_blob_submission_uniquifies() {
        let dir = tempfile::tempdir().unwrap();
        let blobs = BlobStore::new();
        let sink = sink(dir.path(), blobs.clone());

        let handle = blobs.create(b"zipdata".to_vec()).await;
        let request = DownloadRequest::new(DownloadSource::Blob(handle), "alice-42.zip");

        let first = sink.submit(request.clone()).await.unwrap();
        let second = sink.submit(request).await.unwrap();

        assert_eq!(first, dir.path().join("alice-42.zip"));
        assert_eq!(second, dir.path().join("alice-42_1.zip"));
        assert_eq!(std::fs::read(&second).unwrap(), b"zipdata");
    }

    #[tokio::test]
    async fn test_concurrent_same_name_downloads_keep_both_files() {
        let server = serve(HashMap::from([
            ("/a.mp4", full(vec![b'A'; 200_000])),
            ("/b.mp4", full(vec![b'B'; 200_000])),
        ]))
        .await;
        let dir = tempfile::tempdir().unwrap();
        let blobs = BlobStore::new();
        let dispatcher = Dispatcher::new(
            Arc::new(sink(dir.path(), blobs.clone())),
            Arc::new(HttpFetcher::new(client())),
            blobs,
        );
        let items = vec![
            video("alice-42", format!("{}/a.mp4", server)),
            video("alice-42", format!("{}/b.mp4", server)),
        ];

        let report = dispatcher.dispatch(&items).await;

        assert_eq!(report.vid_count, 2);
        assert_eq!(report.failed_count(), 0);
        let reported: HashSet<&PathBuf> = report.downloaded.iter().collect();
        assert_eq!(reported.len(), 2);
        assert_eq!(files_in(dir.path()), vec!["alice-42.mp4", "alice-42_1.mp4"]);

        let contents: HashSet<Vec<u8>> = report
            .downloaded
            .iter()
            .map(|path| std::fs::read(path).unwrap())
            .collect();
        assert!(contents.contains(&vec![b'A'; 200_000]));
        assert!(contents.contains(&vec![b'B'; 200_000]));
    }

    #[tokio::test]
    async fn test_truncated_download_leaves_no_file() {
        let server = serve(HashMap::from([("/short.mp4", (vec![b'x'; 10], 1000))])).await;
        let dir = tempfile::tempdir().unwrap();
        let sink = sink(dir.path(), BlobStore::new());

        let result = sink
            .submit(DownloadRequest::new(
                DownloadSource::Url(format!("{}/short.mp4", server)),
                "alice-42.mp4",
            ))
            .await;

        assert!(result.is_err());
        assert!(files_in(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_http_error_leaves_no_file() {
        let server = serve(HashMap::new()).await;
        let dir = tempfile::tempdir().unwrap();
        let sink = sink(dir.path(), BlobStore::new());

        let result = sink
            .submit(DownloadRequest::new(
                DownloadSource::Url(format!("{}/missing.jpg", server)),
                "alice-42.jpg",
            ))
            .await;

        assert!(matches!(result, Err(Error::Download(_))));
        assert!(files_in(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_revoked_blob_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blobs = BlobStore::new();
        let sink = sink(dir.path(), blobs.clone());

        let handle = blobs.create(vec![1]).await;
        blobs.revoke(&handle).await;

        let result = sink
            .submit(DownloadRequest::new(DownloadSource::Blob(handle), "x.zip"))
            .await;
        assert!(matches!(result, Err(Error::BlobRevoked(_))));
        assert!(files_in(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_traversal_filename_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let blobs = BlobStore::new();
        let sink = sink(dir.path(), blobs.clone());
        let handle = blobs.create(vec![1]).await;

        let result = sink
            .submit(DownloadRequest::new(DownloadSource::Blob(handle), "../escape.zip"))
            .await;
        assert!(matches!(result, Err(Error::InvalidFilename(_))));
    }
}
