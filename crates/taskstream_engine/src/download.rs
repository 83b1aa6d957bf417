use std::sync::Arc;

use engine_logging::{engine_info, engine_warn};
use serde::Deserialize;

use crate::{ApiClient, DownloadError, DriveRequest, DriveStatus, HostCapabilities};

/// How an output file reaches the file browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadStyle {
    /// The server writes the file into the browser's directory.
    Server,
    /// The client streams the file, then uploads it through the browser.
    #[default]
    Stream,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub job_url: String,
    pub file: String,
    /// Name the file gets in the browser directory.
    pub target_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Completed { status: DriveStatus, message: String },
    /// The user declined to overwrite an existing file.
    Skipped,
}

pub struct DownloadPipeline {
    api: Arc<dyn ApiClient>,
    host: HostCapabilities,
    style: DownloadStyle,
}

impl DownloadPipeline {
    pub fn new(api: Arc<dyn ApiClient>, host: HostCapabilities, style: DownloadStyle) -> Self {
        Self { api, host, style }
    }

    pub fn style(&self) -> DownloadStyle {
        self.style
    }

    pub async fn run(&self, request: &DownloadRequest) -> Result<DownloadOutcome, DownloadError> {
        let browser = &self.host.browser;
        let existing = browser
            .list_entries()
            .await
            .map_err(DownloadError::Upload)?;

        if existing.iter().any(|name| *name == request.target_name) {
            let message = format!(
                "{} already exists in {}. Do you want to replace it?",
                request.target_name,
                browser.current_path()
            );
            if !self.host.dialogs.confirm("File already exists", &message).await {
                engine_info!("Download of {} skipped by user", request.target_name);
                return Ok(DownloadOutcome::Skipped);
            }
        }

        match self.style {
            DownloadStyle::Server => self.run_on_server(request).await,
            DownloadStyle::Stream => self.run_streamed(request).await,
        }
    }

    async fn run_on_server(&self, request: &DownloadRequest) -> Result<DownloadOutcome, DownloadError> {
        let drive = DriveRequest {
            job_url: request.job_url.clone(),
            in_file: request.file.clone(),
            path: self.host.browser.current_path(),
            out_file: request.target_name.clone(),
        };
        let reply = self
            .api
            .download_to_drive(&drive)
            .await
            .map_err(DownloadError::Download)?;
        self.host.browser.refresh();
        Ok(DownloadOutcome::Completed {
            status: reply.status,
            message: reply.message,
        })
    }

    async fn run_streamed(&self, request: &DownloadRequest) -> Result<DownloadOutcome, DownloadError> {
        let data = self
            .api
            .stream_file(&request.job_url, &request.file)
            .await
            .map_err(|err| {
                engine_warn!("Download of {} failed: {}", request.file, err);
                DownloadError::Download(err)
            })?;
        let size = data.len();
        self.host
            .browser
            .upload(data, &request.target_name)
            .await
            .map_err(|err| {
                engine_warn!("Upload of {} failed: {}", request.target_name, err);
                DownloadError::Upload(err)
            })?;
        self.host.browser.refresh();
        Ok(DownloadOutcome::Completed {
            status: DriveStatus::Success,
            message: format!("Downloaded {} ({} bytes)", request.target_name, size),
        })
    }
}
