#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use bytes::Bytes;
use taskstream_engine::{
    ApiClient, ApiError, CancelReply, Dialogs, DragDrop, DragPayload, DriveReply, DriveRequest,
    DriveStatus, DropEvent, DropResult, DropZone, FileBrowser, HostCapabilities, JobsListing,
    KernelInfo, KernelLookup, OutputItem, SiteDirectory, UploadError,
};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

/// Records the download calls it receives and answers from canned results.
pub struct FakeApi {
    pub drive_reply: Result<DriveReply, ApiError>,
    pub stream_reply: Result<Bytes, ApiError>,
    pub drive_calls: Mutex<Vec<DriveRequest>>,
    pub stream_calls: AtomicUsize,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            drive_reply: Ok(DriveReply {
                status: DriveStatus::Success,
                message: "File downloaded".to_string(),
            }),
            stream_reply: Ok(Bytes::from_static(b"simulation output")),
            drive_calls: Mutex::new(Vec::new()),
            stream_calls: AtomicUsize::new(0),
        }
    }

    pub fn network_calls(&self) -> usize {
        self.drive_calls.lock().unwrap().len() + self.stream_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ApiClient for FakeApi {
    async fn sites(&self) -> Result<SiteDirectory, ApiError> {
        Ok(SiteDirectory::default())
    }

    async fn jobs(&self, _site: &str, _page: u32) -> Result<JobsListing, ApiError> {
        Ok(JobsListing::default())
    }

    async fn cancel_job(&self, _resource_url: &str) -> Result<CancelReply, ApiError> {
        Ok(CancelReply::default())
    }

    async fn job_outputs(&self, _job_url: &str) -> Result<Vec<OutputItem>, ApiError> {
        Ok(Vec::new())
    }

    async fn download_to_drive(&self, request: &DriveRequest) -> Result<DriveReply, ApiError> {
        self.drive_calls.lock().unwrap().push(request.clone());
        self.drive_reply.clone()
    }

    async fn stream_file(&self, _job_url: &str, _file: &str) -> Result<Bytes, ApiError> {
        self.stream_calls.fetch_add(1, Ordering::SeqCst);
        self.stream_reply.clone()
    }
}

pub struct FakeBrowser {
    pub entries: Vec<String>,
    pub upload_error: Option<UploadError>,
    pub uploads: Mutex<Vec<(String, Bytes)>>,
    pub refreshes: AtomicUsize,
    pub zone: Arc<DropZone>,
}

impl FakeBrowser {
    pub fn with_entries(entries: &[&str]) -> Self {
        Self {
            entries: entries.iter().map(|e| e.to_string()).collect(),
            upload_error: None,
            uploads: Mutex::new(Vec::new()),
            refreshes: AtomicUsize::new(0),
            zone: DropZone::new(),
        }
    }
}

#[async_trait::async_trait]
impl FileBrowser for FakeBrowser {
    fn current_path(&self) -> String {
        "notebooks/results".to_string()
    }

    async fn list_entries(&self) -> Result<Vec<String>, UploadError> {
        Ok(self.entries.clone())
    }

    async fn upload(&self, data: Bytes, name: &str) -> Result<(), UploadError> {
        if let Some(err) = &self.upload_error {
            return Err(err.clone());
        }
        self.uploads.lock().unwrap().push((name.to_string(), data));
        Ok(())
    }

    fn refresh(&self) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
    }

    fn drop_zone(&self) -> Arc<DropZone> {
        Arc::clone(&self.zone)
    }
}

pub struct FakeDialogs {
    pub answer: bool,
    pub asked: Mutex<Vec<String>>,
}

impl FakeDialogs {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            asked: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl Dialogs for FakeDialogs {
    async fn confirm(&self, _title: &str, message: &str) -> bool {
        self.asked.lock().unwrap().push(message.to_string());
        self.answer
    }
}

pub struct FakeKernel(pub Option<KernelInfo>);

impl FakeKernel {
    pub fn python() -> Self {
        Self(Some(KernelInfo {
            name: "python3".to_string(),
            language: "python".to_string(),
        }))
    }
}

#[async_trait::async_trait]
impl KernelLookup for FakeKernel {
    async fn active_kernel(&self) -> Option<KernelInfo> {
        self.0.clone()
    }
}

/// Ends every gesture with one drop on `zone`, as if released over the browser.
pub struct DropOnBrowser {
    pub zone: Arc<DropZone>,
    pub payloads: Mutex<Vec<DragPayload>>,
    pub listeners_seen: Mutex<Vec<usize>>,
}

impl DropOnBrowser {
    pub fn new(zone: Arc<DropZone>) -> Self {
        Self {
            zone,
            payloads: Mutex::new(Vec::new()),
            listeners_seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl DragDrop for DropOnBrowser {
    async fn start_drag(&self, payload: DragPayload) -> DropResult {
        let event = DropEvent {
            mime: payload.mime.to_string(),
            text: payload.text.clone(),
        };
        let seen = self.zone.dispatch(&event);
        self.listeners_seen.lock().unwrap().push(seen);
        self.payloads.lock().unwrap().push(payload);
        DropResult::Copied
    }
}

pub struct Fakes {
    pub api: Arc<FakeApi>,
    pub browser: Arc<FakeBrowser>,
    pub dialogs: Arc<FakeDialogs>,
    pub drag: Arc<DropOnBrowser>,
}

impl Fakes {
    pub fn new(api: FakeApi, browser: FakeBrowser, dialogs: FakeDialogs) -> Self {
        let browser = Arc::new(browser);
        Self {
            api: Arc::new(api),
            drag: Arc::new(DropOnBrowser::new(Arc::clone(&browser.zone))),
            browser,
            dialogs: Arc::new(dialogs),
        }
    }

    pub fn host(&self, kernel: FakeKernel) -> HostCapabilities {
        HostCapabilities {
            kernel: Arc::new(kernel),
            browser: self.browser.clone(),
            dialogs: self.dialogs.clone(),
            drag: self.drag.clone(),
        }
    }
}
