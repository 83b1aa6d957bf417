//! Task stream engine: REST client, host capabilities and effect execution.
mod action;
mod client;
mod download;
mod drop_zone;
mod engine;
mod error;
mod host;
mod local_browser;
mod persist;
mod types;

pub use action::{ActionReply, CancelJobAction, RowAction};
pub use client::{ApiClient, ClientSettings, ReqwestApiClient, DEFAULT_BASE_URL};
pub use download::{DownloadOutcome, DownloadPipeline, DownloadRequest, DownloadStyle};
pub use drop_zone::{DropEvent, DropListenerGuard, DropZone};
pub use engine::{EngineConfig, EngineHandle, KERNEL_UNAVAILABLE};
pub use error::{ActionError, ApiError, DownloadError, UploadError};
pub use host::{
    Dialogs, DragDrop, DragPayload, DropResult, FileBrowser, HostCapabilities, KernelInfo,
    KernelLookup, TEXT_MIME,
};
pub use local_browser::LocalDirBrowser;
pub use persist::{ensure_directory, AtomicFileWriter, PersistError};
pub use types::{
    CancelReply, DriveReply, DriveRequest, DriveStatus, EngineEvent, JobsListing, OutputItem,
    RemoteJob, SiteDirectory,
};
