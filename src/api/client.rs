//! TweetDetail GraphQL client used when the session cache has nothing.

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Request};
use serde_json::Value;

use crate::api::auth::Credentials;
use crate::api::types::{detail_features, DetailVariables};
use crate::dedup::dedupe;
use crate::download::lookup::RecordLookup;
use crate::error::{Error, Result};
use crate::media::{extract_with, ExtractOptions, MediaItem};

/// Persisted query path of the TweetDetail operation.
pub const TWEET_DETAIL_PATH: &str = "/i/api/graphql/-Ls3CrSQNo2fRKH6i6Na1A/TweetDetail";

/// Client for the detail endpoint of one host.
pub struct TweetDetailApi {
    client: Client,
    base_url: String,
    credentials: Credentials,
    options: ExtractOptions,
}

impl TweetDetailApi {
    pub fn new(client: Client, host: &str, credentials: Credentials) -> Self {
        Self {
            client,
            base_url: format!("https://{}", host.trim_end_matches('/')),
            credentials,
            options: ExtractOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    fn build_headers(&self, csrf_token: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(
            "x-twitter-auth-type",
            HeaderValue::from_static("OAuth2Session"),
        );
        headers.insert("x-twitter-active-user", HeaderValue::from_static("yes"));
        headers.insert("x-csrf-token", header_value("x-csrf-token", csrf_token)?);
        headers.insert(
            header::AUTHORIZATION,
            header_value(
                "authorization",
                &format!("Bearer {}", self.credentials.bearer_token),
            )?,
        );
        if let Some(cookie) = self.credentials.cookie.as_deref() {
            headers.insert(header::COOKIE, header_value("cookie", cookie)?);
        }

        Ok(headers)
    }

    /// Build the detail request for `record_id` without sending it.
    pub fn detail_request(&self, record_id: &str) -> Result<Request> {
        let csrf_token = self
            .credentials
            .csrf_token()
            .ok_or(Error::CredentialMissing)?;

        let variables = serde_json::to_string(&DetailVariables::for_record(record_id))?;
        let features = serde_json::to_string(&detail_features())?;
        let url = format!("{}{}", self.base_url, TWEET_DETAIL_PATH);

        let request = self
            .client
            .get(&url)
            .query(&[("variables", variables), ("features", features)])
            .headers(self.build_headers(&csrf_token)?)
            .build()?;

        Ok(request)
    }

    /// Fetch the record's conversation and return the media of the record itself.
    pub async fn fetch_record_media(&self, record_id: &str) -> Result<Vec<MediaItem>> {
        let request = self.detail_request(record_id)?;
        tracing::debug!("GET {}", request.url());

        let response = self.client.execute(request).await?;
        let status = response.status();
        tracing::debug!("Response status: {}", status);

        if !status.is_success() {
            return Err(Error::Api(format!("Detail fetch failed: HTTP {}", status)));
        }

        let text = response.text().await?;
        let body: Value = serde_json::from_str(&text)
            .map_err(|e| Error::Api(format!("Failed to parse detail response: {}", e)))?;

        let items = dedupe(extract_with(&body, &self.options))
            .into_iter()
            .filter(|item| item.record_id == record_id)
            .collect::<Vec<_>>();

        tracing::debug!("Detail response for {} held {} items", record_id, items.len());
        Ok(items)
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| Error::Api(format!("Invalid characters in {} header", name)))
}

#[async_trait]
impl RecordLookup for TweetDetailApi {
    fn name(&self) -> &'static str {
        "network"
    }

    async fn lookup(&self, record_id: &str) -> Result<Vec<MediaItem>> {
        self.fetch_record_media(record_id).await
    }
}
