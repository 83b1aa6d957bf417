use crate::JobId;

/// Identifies one job-list fetch so late completions can be matched up.
pub type RequestId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start the recurring reload check; each tick should come back as `Msg::ReloadCheck`.
    StartReloadTimer { check_interval_ms: u64 },
    /// Cancel the recurring reload check.
    StopReloadTimer,
    FetchJobs {
        request: RequestId,
        site: String,
        page: u32,
    },
    InvokeRowAction { job_id: JobId, args: Vec<String> },
    FetchOutputs {
        job_id: JobId,
        generation: u64,
        job_url: String,
    },
    DownloadOutput {
        job_id: JobId,
        job_url: String,
        file: String,
        target_name: String,
    },
    /// Start a drag carrying `payload`; the host must check for a usable kernel first.
    StartDrag {
        payload: String,
        browser_drop: Option<BrowserDropTarget>,
    },
}

/// Download to trigger when a dragged output file is dropped on the file browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserDropTarget {
    pub job_id: JobId,
    pub file: String,
}
