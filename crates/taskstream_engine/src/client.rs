use std::collections::BTreeMap;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use engine_logging::{engine_info, engine_trace, engine_warn};
use futures_util::StreamExt;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::types::{OutputKind, SitesWire};
use crate::{ApiError, CancelReply, DriveReply, DriveRequest, JobsListing, OutputItem, SiteDirectory};

/// Default mount point of the server extension.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8888/tvbextunicore";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    /// Sent as a bearer token when present.
    pub token: Option<String>,
    pub connect_timeout: Duration,
    /// Whole-request timeout; `None` waits for as long as the server takes.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
        }
    }
}

/// The extension's REST surface.
#[async_trait::async_trait]
pub trait ApiClient: Send + Sync {
    async fn sites(&self) -> Result<SiteDirectory, ApiError>;
    async fn jobs(&self, site: &str, page: u32) -> Result<JobsListing, ApiError>;
    async fn cancel_job(&self, resource_url: &str) -> Result<CancelReply, ApiError>;
    async fn job_outputs(&self, job_url: &str) -> Result<Vec<OutputItem>, ApiError>;
    /// Asks the server to copy `in_file` of a job into a browser directory.
    async fn download_to_drive(&self, request: &DriveRequest) -> Result<DriveReply, ApiError>;
    /// Fetches the raw content of one output file.
    async fn stream_file(&self, job_url: &str, file: &str) -> Result<Bytes, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestApiClient {
    settings: ClientSettings,
    base: Url,
    client: reqwest::Client,
}

impl ReqwestApiClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let base = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::InvalidUrl(format!("{}: {err}", settings.base_url)))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(settings.base_url.clone()));
        }

        let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ApiError::Network(err.to_string()))?;

        Ok(Self {
            settings,
            base,
            client,
        })
    }

    /// Appends path segments to the base url; each segment is percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let request = match &self.settings.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.bytes().await.unwrap_or_default();
        let message = response_message(status, &body);
        engine_warn!("Request failed with {}: {}", status, message);
        Err(ApiError::Response {
            status: status.as_u16(),
            message,
        })
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&body).map_err(|err| ApiError::Decode(err.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        engine_info!("GET {}", url);
        let response = self.send(self.client.get(url)).await?;
        Self::read_json(response).await
    }

    async fn post_json<B: serde::Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, ApiError> {
        engine_info!("POST {}", url);
        let payload = serde_json::to_vec(body).map_err(|err| ApiError::Decode(err.to_string()))?;
        let request = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(payload);
        let response = self.send(request).await?;
        Self::read_json(response).await
    }
}

#[async_trait::async_trait]
impl ApiClient for ReqwestApiClient {
    async fn sites(&self) -> Result<SiteDirectory, ApiError> {
        let wire: SitesWire = self.get_json(self.endpoint(&["sites"])?).await?;
        Ok(wire.into())
    }

    async fn jobs(&self, site: &str, page: u32) -> Result<JobsListing, ApiError> {
        let mut url = self.endpoint(&["jobs"])?;
        url.query_pairs_mut()
            .append_pair("site", site)
            .append_pair("page", &page.to_string());
        self.get_json(url).await
    }

    async fn cancel_job(&self, resource_url: &str) -> Result<CancelReply, ApiError> {
        let body = serde_json::json!({ "resource_url": resource_url });
        self.post_json(self.endpoint(&["jobs"])?, &body).await
    }

    async fn job_outputs(&self, job_url: &str) -> Result<Vec<OutputItem>, ApiError> {
        let mut url = self.endpoint(&["job_output"])?;
        url.query_pairs_mut().append_pair("job_url", job_url);
        let listing: BTreeMap<String, OutputKind> = self.get_json(url).await?;
        Ok(listing
            .into_iter()
            .map(|(name, kind)| OutputItem {
                name,
                is_file: kind.is_file,
            })
            .collect())
    }

    async fn download_to_drive(&self, request: &DriveRequest) -> Result<DriveReply, ApiError> {
        let url = self.endpoint(&["drive", &request.job_url, &request.in_file])?;
        self.post_json(url, request).await
    }

    async fn stream_file(&self, job_url: &str, file: &str) -> Result<Bytes, ApiError> {
        let url = self.endpoint(&["stream", job_url, file])?;
        engine_info!("GET {}", url);
        let response = self.send(self.client.get(url)).await?;

        let mut data = BytesMut::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            data.extend_from_slice(&chunk);
            engine_trace!("Streamed {} bytes of {}", data.len(), file);
        }
        Ok(data.freeze())
    }
}

/// Picks the most useful human-readable message out of a failed response.
fn response_message(status: StatusCode, body: &[u8]) -> String {
    if let Ok(serde_json::Value::Object(fields)) = serde_json::from_slice(body) {
        if let Some(serde_json::Value::String(message)) = fields.get("message") {
            if !message.is_empty() {
                return message.clone();
            }
        }
    }
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if !text.is_empty() {
        return text.to_string();
    }
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string())
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::Timeout;
    }
    ApiError::Network(err.to_string())
}
