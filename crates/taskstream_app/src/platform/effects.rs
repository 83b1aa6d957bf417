use std::sync::{mpsc, Arc};
use std::time::Duration;

use chrono::Utc;
use engine_logging::{engine_debug, engine_info, engine_warn};
use taskstream_core::{
    DownloadResult, DownloadStage, Effect, Job, JobsPage, Msg, OutputEntry, Severity,
};
use taskstream_engine::{
    DownloadError, DownloadOutcome, DownloadRequest, DriveStatus, EngineEvent, EngineHandle,
    RemoteJob,
};

use super::app::AppInput;
use super::host::{DropSpot, TerminalDrag};
use super::timer::ReloadTimer;

pub fn now_ms() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}

/// Executes core effects against the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
    drag: Arc<TerminalDrag>,
    timer: ReloadTimer,
    input_tx: mpsc::Sender<AppInput>,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, drag: Arc<TerminalDrag>, input_tx: mpsc::Sender<AppInput>) -> Self {
        Self {
            engine,
            drag,
            timer: ReloadTimer::default(),
            input_tx,
        }
    }

    /// Where the next drag is released; set before the drag effect runs.
    pub fn release_next_drag_at(&self, spot: DropSpot) {
        self.drag.release_at(spot);
    }

    pub fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartReloadTimer { check_interval_ms } => {
                    let input_tx = self.input_tx.clone();
                    self.timer
                        .start(Duration::from_millis(check_interval_ms), move || {
                            input_tx
                                .send(AppInput::Msg(Msg::ReloadCheck { now_ms: now_ms() }))
                                .is_ok()
                        });
                }
                Effect::StopReloadTimer => self.timer.stop(),
                Effect::FetchJobs {
                    request,
                    site,
                    page,
                } => {
                    engine_info!("FetchJobs request={} site={} page={}", request, site, page);
                    self.engine.list_jobs(request, site, page);
                }
                Effect::InvokeRowAction { job_id, args } => {
                    engine_info!("InvokeRowAction job_id={}", job_id);
                    self.engine.invoke_action(job_id, args);
                }
                Effect::FetchOutputs {
                    job_id,
                    generation,
                    job_url,
                } => self.engine.list_outputs(job_id, generation, job_url),
                Effect::DownloadOutput {
                    job_id,
                    job_url,
                    file,
                    target_name,
                } => {
                    engine_info!("DownloadOutput job_id={} file={} as {}", job_id, file, target_name);
                    self.engine.download(
                        job_id,
                        DownloadRequest {
                            job_url,
                            file,
                            target_name,
                        },
                    );
                }
                Effect::StartDrag {
                    payload,
                    browser_drop,
                } => self.engine.start_drag(
                    payload,
                    browser_drop.map(|target| (target.job_id, target.file)),
                ),
            }
        }
    }

    /// Drains finished engine work as messages for the core.
    pub fn poll_events(&self) -> Vec<Msg> {
        let mut msgs = Vec::new();
        while let Some(event) = self.engine.try_recv() {
            if let Some(msg) = event_to_msg(event) {
                msgs.push(msg);
            }
        }
        msgs
    }
}

pub(crate) fn event_to_msg(event: EngineEvent) -> Option<Msg> {
    let msg = match event {
        EngineEvent::SitesLoaded(_) => {
            engine_debug!("Ignoring late sites listing");
            return None;
        }
        EngineEvent::JobsLoaded { request, result } => Msg::JobsLoaded {
            request,
            result: result
                .map(|listing| JobsPage {
                    message: listing.message,
                    jobs: listing.jobs.into_iter().map(to_job).collect(),
                })
                .map_err(|err| {
                    engine_warn!("Jobs request {} failed: {}", request, err);
                    err.to_string()
                }),
            now_ms: now_ms(),
        },
        EngineEvent::ActionCompleted { job_id, result } => Msg::RowActionCompleted {
            job_id,
            result: result.map(|reply| reply.message).map_err(|err| err.to_string()),
        },
        EngineEvent::OutputsLoaded {
            job_id,
            generation,
            result,
        } => Msg::OutputsLoaded {
            job_id,
            generation,
            result: result
                .map(|items| {
                    items
                        .into_iter()
                        .map(|item| OutputEntry {
                            name: item.name,
                            is_directory: !item.is_file,
                        })
                        .collect()
                })
                .map_err(|err| err.to_string()),
        },
        EngineEvent::DownloadFinished {
            job_id,
            file,
            result,
        } => Msg::DownloadFinished {
            job_id,
            file,
            result: to_download_result(result),
        },
        EngineEvent::DragRejected { message } => Msg::DragRejected { message },
        EngineEvent::BrowserDrop { job_id, file } => Msg::DownloadClicked { job_id, file },
        EngineEvent::DragFinished { result } => {
            engine_debug!("Drag ended: {:?}", result);
            return None;
        }
    };
    Some(msg)
}

fn to_job(remote: RemoteJob) -> Job {
    Job {
        id: remote.id,
        name: remote.name,
        owner: remote.owner,
        site: remote.site,
        status: remote.status,
        resource_url: remote.resource_url,
        start_time: remote.start_time,
        is_cancelable: remote.is_cancelable,
        logs: remote.logs.unwrap_or_default(),
    }
}

fn to_download_result(result: Result<DownloadOutcome, DownloadError>) -> DownloadResult {
    match result {
        Ok(DownloadOutcome::Completed { status, message }) => DownloadResult::Completed {
            severity: match status {
                DriveStatus::Success => Severity::Success,
                DriveStatus::Warning => Severity::Warning,
                DriveStatus::Error => Severity::Error,
            },
            message,
        },
        Ok(DownloadOutcome::Skipped) => DownloadResult::Skipped,
        Err(DownloadError::Download(err)) => DownloadResult::Failed {
            stage: DownloadStage::Download,
            message: err.to_string(),
        },
        Err(DownloadError::Upload(err)) => DownloadResult::Failed {
            stage: DownloadStage::Upload,
            message: err.to_string(),
        },
    }
}
