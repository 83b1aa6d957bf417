use thiserror::Error;

/// Failure of a call against the extension's REST API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    /// The request could not be sent or its response could not be received.
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    /// The server answered with a non-success status.
    #[error("{message}")]
    Response { status: u16, message: String },
    #[error("unexpected response body: {0}")]
    Decode(String),
}

/// The file browser refused an upload or could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("{0}")]
    Rejected(String),
    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for UploadError {
    fn from(err: std::io::Error) -> Self {
        UploadError::Io(err.to_string())
    }
}

/// A row action's invocation failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("{0}")]
    Rejected(String),
    #[error("missing action argument #{0}")]
    MissingArgument(usize),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// A download failed in one of its two stages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DownloadError {
    #[error("download failed: {0}")]
    Download(ApiError),
    #[error("upload failed: {0}")]
    Upload(UploadError),
}
