use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use engine_logging::{engine_debug, engine_info};

use crate::{
    ApiClient, DownloadPipeline, DownloadRequest, DownloadStyle, DragPayload, DropEvent,
    EngineEvent, HostCapabilities, RowAction,
};

/// Shown when no Python kernel can receive an injected snippet.
pub const KERNEL_UNAVAILABLE: &str = "Current kernel can't be used to handle this operation!";

enum EngineCommand {
    LoadSites,
    ListJobs {
        request: u64,
        site: String,
        page: u32,
    },
    InvokeAction {
        job_id: String,
        args: Vec<String>,
    },
    ListOutputs {
        job_id: String,
        generation: u64,
        job_url: String,
    },
    Download {
        job_id: String,
        request: DownloadRequest,
    },
    StartDrag {
        payload: String,
        browser_drop: Option<(String, String)>,
    },
}

/// Everything the engine needs to run commands.
#[derive(Clone)]
pub struct EngineConfig {
    pub api: Arc<dyn ApiClient>,
    pub host: HostCapabilities,
    pub action: Arc<dyn RowAction>,
    pub download_style: DownloadStyle,
}

/// Runs commands on a tokio runtime in a background thread and reports each
/// completion as an [`EngineEvent`].
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> std::io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;
        let context = Arc::new(EngineContext {
            pipeline: DownloadPipeline::new(
                Arc::clone(&config.api),
                config.host.clone(),
                config.download_style,
            ),
            config,
        });

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let context = Arc::clone(&context);
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    context.handle(command, event_tx).await;
                });
            }
            engine_debug!("Engine command channel closed");
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn load_sites(&self) {
        self.send(EngineCommand::LoadSites);
    }

    pub fn list_jobs(&self, request: u64, site: impl Into<String>, page: u32) {
        self.send(EngineCommand::ListJobs {
            request,
            site: site.into(),
            page,
        });
    }

    pub fn invoke_action(&self, job_id: impl Into<String>, args: Vec<String>) {
        self.send(EngineCommand::InvokeAction {
            job_id: job_id.into(),
            args,
        });
    }

    pub fn list_outputs(&self, job_id: impl Into<String>, generation: u64, job_url: impl Into<String>) {
        self.send(EngineCommand::ListOutputs {
            job_id: job_id.into(),
            generation,
            job_url: job_url.into(),
        });
    }

    pub fn download(&self, job_id: impl Into<String>, request: DownloadRequest) {
        self.send(EngineCommand::Download {
            job_id: job_id.into(),
            request,
        });
    }

    /// Starts a drag carrying `payload`. With `browser_drop` set, a drop on the
    /// file browser during this gesture is reported as [`EngineEvent::BrowserDrop`].
    pub fn start_drag(&self, payload: impl Into<String>, browser_drop: Option<(String, String)>) {
        self.send(EngineCommand::StartDrag {
            payload: payload.into(),
            browser_drop,
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        let _ = self.cmd_tx.send(command);
    }
}

struct EngineContext {
    config: EngineConfig,
    pipeline: DownloadPipeline,
}

impl EngineContext {
    async fn handle(&self, command: EngineCommand, event_tx: mpsc::Sender<EngineEvent>) {
        let event = match command {
            EngineCommand::LoadSites => EngineEvent::SitesLoaded(self.config.api.sites().await),
            EngineCommand::ListJobs {
                request,
                site,
                page,
            } => EngineEvent::JobsLoaded {
                request,
                result: self.config.api.jobs(&site, page).await,
            },
            EngineCommand::InvokeAction { job_id, args } => EngineEvent::ActionCompleted {
                result: self.config.action.invoke(&args).await,
                job_id,
            },
            EngineCommand::ListOutputs {
                job_id,
                generation,
                job_url,
            } => EngineEvent::OutputsLoaded {
                job_id,
                generation,
                result: self.config.api.job_outputs(&job_url).await,
            },
            EngineCommand::Download { job_id, request } => EngineEvent::DownloadFinished {
                result: self.pipeline.run(&request).await,
                job_id,
                file: request.file,
            },
            EngineCommand::StartDrag {
                payload,
                browser_drop,
            } => self.drag(payload, browser_drop, &event_tx).await,
        };
        let _ = event_tx.send(event);
    }

    async fn drag(
        &self,
        payload: String,
        browser_drop: Option<(String, String)>,
        event_tx: &mpsc::Sender<EngineEvent>,
    ) -> EngineEvent {
        let host = &self.config.host;
        if host.usable_kernel().await.is_none() {
            return EngineEvent::DragRejected {
                message: KERNEL_UNAVAILABLE.to_string(),
            };
        }

        // Held for the whole gesture; dropping it detaches the listener.
        let _guard = browser_drop.map(|(job_id, file)| {
            let tx = event_tx.clone();
            host.browser.drop_zone().attach(move |_: &DropEvent| {
                let _ = tx.send(EngineEvent::BrowserDrop {
                    job_id: job_id.clone(),
                    file: file.clone(),
                });
            })
        });

        let result = host.drag.start_drag(DragPayload::text(payload)).await;
        engine_info!("Drag finished: {:?}", result);
        EngineEvent::DragFinished { result }
    }
}
