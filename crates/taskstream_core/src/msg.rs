use crate::{DownloadResult, JobId, JobsPage, OutputEntry, RequestId, SiteSelection};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Host attached the panel with the available sites.
    Mounted {
        sites: Vec<String>,
        default_site: Option<String>,
        message: String,
        now_ms: u64,
    },
    /// Host detached the panel.
    Unmounted,
    /// Recurring timer tick.
    ReloadCheck { now_ms: u64 },
    PageSelected(u32),
    NextPageClicked,
    PrevPageClicked,
    SiteSelected(SiteSelection),
    AutoReloadToggled(bool),
    /// User clicked the refresh button.
    RefreshClicked,
    /// Completion of a `FetchJobs` effect.
    JobsLoaded {
        request: RequestId,
        result: Result<JobsPage, String>,
        now_ms: u64,
    },
    RowActionClicked { job_id: JobId },
    /// Completion of an `InvokeRowAction` effect; `Ok` carries the server message.
    RowActionCompleted {
        job_id: JobId,
        result: Result<String, String>,
    },
    /// User clicked a job row to show or hide its details.
    RowToggled { job_id: JobId },
    OutputsLoaded {
        job_id: JobId,
        generation: u64,
        result: Result<Vec<OutputEntry>, String>,
    },
    DownloadClicked { job_id: JobId, file: String },
    DownloadFinished {
        job_id: JobId,
        file: String,
        result: DownloadResult,
    },
    /// User started dragging a job row (`file: None`) or one of its output files.
    DragRequested { job_id: JobId, file: Option<String> },
    /// Host refused to start a drag.
    DragRejected { message: String },
    ModalDismissed,
    NoOp,
}
