use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{ActionError, ActionReply, ApiError, DownloadError, DownloadOutcome, DropResult};

/// Job record as serialized by the jobs endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteJob {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub site: String,
    #[serde(default)]
    pub status: String,
    pub resource_url: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub is_cancelable: bool,
    #[serde(default)]
    pub logs: Option<Vec<String>>,
}

/// Available sites, name -> site url.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SiteDirectory {
    pub sites: BTreeMap<String, String>,
    pub message: String,
}

impl SiteDirectory {
    pub fn names(&self) -> Vec<String> {
        self.sites.keys().cloned().collect()
    }
}

/// Older servers answer the sites call with a bare list of names.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum SitesWire {
    Directory {
        sites: BTreeMap<String, String>,
        #[serde(default)]
        message: String,
    },
    Names(Vec<String>),
}

impl From<SitesWire> for SiteDirectory {
    fn from(wire: SitesWire) -> Self {
        match wire {
            SitesWire::Directory { sites, message } => Self { sites, message },
            SitesWire::Names(names) => Self {
                sites: names.into_iter().map(|name| (name, String::new())).collect(),
                message: String::new(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct JobsListing {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub jobs: Vec<RemoteJob>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct CancelReply {
    #[serde(default)]
    pub job: Option<RemoteJob>,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OutputKind {
    pub(crate) is_file: bool,
}

/// One entry of a job's working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputItem {
    pub name: String,
    pub is_file: bool,
}

/// Body of the server-mediated download call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriveRequest {
    pub job_url: String,
    pub in_file: String,
    pub path: String,
    pub out_file: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriveStatus {
    Success,
    Warning,
    #[serde(other)]
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DriveReply {
    pub status: DriveStatus,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    SitesLoaded(Result<SiteDirectory, ApiError>),
    JobsLoaded {
        request: u64,
        result: Result<JobsListing, ApiError>,
    },
    ActionCompleted {
        job_id: String,
        result: Result<ActionReply, ActionError>,
    },
    OutputsLoaded {
        job_id: String,
        generation: u64,
        result: Result<Vec<OutputItem>, ApiError>,
    },
    DownloadFinished {
        job_id: String,
        file: String,
        result: Result<DownloadOutcome, DownloadError>,
    },
    /// No usable kernel; the drag was never started.
    DragRejected { message: String },
    /// A dragged output file was dropped on the file browser.
    BrowserDrop { job_id: String, file: String },
    DragFinished { result: DropResult },
}
