use engine_logging::{engine_debug, engine_info, engine_warn};

use crate::codegen::{download_file_code, job_code};
use crate::outputs::{download_target_name, loaded_listing, OutputListing};
use crate::state::FetchKey;
use crate::{
    AppState, BrowserDropTarget, DownloadResult, DownloadStage, Effect, FileStatus, ModalKind, Msg,
    Severity, SiteSelection,
};

/// Pure update function: applies a message to state and returns any effects.
///
/// Every message ends with exactly one reconciliation pass, so a transition
/// that changes several fields at once (a site change also resets the page)
/// issues at most one fetch.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let mut effects = match msg {
        Msg::Mounted {
            sites,
            default_site,
            message,
            now_ms,
        } => on_mounted(&mut state, sites, default_site, message, now_ms),
        Msg::Unmounted => {
            if !state.mounted {
                return (state, Vec::new());
            }
            engine_info!("Poller unmounted; stopping reload timer");
            state.mounted = false;
            state.mark_dirty();
            return (state, vec![Effect::StopReloadTimer]);
        }
        Msg::ReloadCheck { now_ms } => {
            on_reload_check(&mut state, now_ms);
            Vec::new()
        }
        Msg::PageSelected(page) => {
            if page >= 1 && page != state.page {
                state.page = page;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::NextPageClicked => {
            if state.has_next_page && !state.loading {
                state.page += 1;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::PrevPageClicked => {
            if state.has_prev_page && !state.loading && state.page > 1 {
                state.page -= 1;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SiteSelected(selection) => {
            on_site_selected(&mut state, selection);
            Vec::new()
        }
        Msg::AutoReloadToggled(enabled) => {
            if state.auto_reload != enabled {
                state.auto_reload = enabled;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::RefreshClicked => {
            if !state.site.is_none() {
                state.refresh_requested = true;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::JobsLoaded {
            request,
            result,
            now_ms,
        } => {
            on_jobs_loaded(&mut state, request, result, now_ms);
            Vec::new()
        }
        Msg::RowActionClicked { job_id } => on_row_action_clicked(&mut state, job_id),
        Msg::RowActionCompleted { job_id, result } => {
            state.pending_actions.remove(&job_id);
            state.mark_dirty();
            match result {
                Ok(message) => {
                    if !message.is_empty() {
                        state.message = message;
                    }
                    // Trust the next full snapshot, not the action response.
                    state.refresh_requested = true;
                }
                Err(message) => {
                    engine_warn!("Row action for job {} failed: {}", job_id, message);
                    state.show_modal(ModalKind::Error, "Error on request:", message);
                }
            }
            Vec::new()
        }
        Msg::RowToggled { job_id } => on_row_toggled(&mut state, job_id),
        Msg::OutputsLoaded {
            job_id,
            generation,
            result,
        } => {
            let current = matches!(
                state.expanded.get(&job_id),
                Some(OutputListing::Loading { generation: pending }) if *pending == generation
            );
            if current {
                let listing = match result {
                    Ok(entries) => loaded_listing(entries),
                    Err(message) => OutputListing::Failed(message),
                };
                state.expanded.insert(job_id, listing);
                state.mark_dirty();
            } else {
                engine_debug!(
                    "Discarding stale output listing for job {} (generation {})",
                    job_id,
                    generation
                );
            }
            Vec::new()
        }
        Msg::DownloadClicked { job_id, file } => on_download_clicked(&mut state, job_id, file),
        Msg::DownloadFinished {
            job_id,
            file,
            result,
        } => {
            on_download_finished(&mut state, &job_id, &file, result);
            Vec::new()
        }
        Msg::DragRequested { job_id, file } => on_drag_requested(&state, job_id, file),
        Msg::DragRejected { message } => {
            state.show_modal(ModalKind::Error, "Kernel not available", message);
            state.mark_dirty();
            Vec::new()
        }
        Msg::ModalDismissed => {
            if state.modal.take().is_some() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    effects.extend(reconcile(&mut state));
    (state, effects)
}

fn on_mounted(
    state: &mut AppState,
    sites: Vec<String>,
    default_site: Option<String>,
    message: String,
    now_ms: u64,
) -> Vec<Effect> {
    if state.mounted {
        return Vec::new();
    }
    state.reset_for_mount();
    let (site, warning) = crate::validate_default_site(default_site.as_deref(), &sites);
    if let Some(warning) = warning {
        state.show_modal(ModalKind::Error, "SITE ERROR", warning);
    }
    engine_info!("Poller mounted with {} sites, starting on {}", sites.len(), site);
    state.mounted = true;
    state.sites = sites;
    state.site = site;
    state.page = 1;
    state.message = message;
    state.mounted_at_ms = now_ms;
    state.mark_dirty();
    vec![Effect::StartReloadTimer {
        check_interval_ms: state.settings.check_interval_ms,
    }]
}

fn on_reload_check(state: &mut AppState, now_ms: u64) {
    engine_logging::set_poll_cycle(engine_logging::poll_cycle() + 1);
    if !state.mounted || !state.auto_reload || state.site.is_none() {
        return;
    }
    // A fetch in flight stamps the timestamp itself; raising the flag now
    // would only queue a redundant follow-up.
    if state.in_flight.is_some() || state.refresh_requested {
        return;
    }
    let elapsed = now_ms.saturating_sub(state.reload_baseline_ms());
    if elapsed >= state.settings.reload_interval_ms {
        engine_debug!("Reload due after {} ms", elapsed);
        state.refresh_requested = true;
    }
}

fn on_site_selected(state: &mut AppState, selection: SiteSelection) {
    if selection == state.site {
        return;
    }
    if let SiteSelection::Site(name) = &selection {
        if !state.sites.iter().any(|site| site == name) {
            engine_warn!("Ignoring selection of unknown site {}", name);
            state.show_modal(
                ModalKind::Error,
                "SITE ERROR",
                format!("Site {name} is not available at this time!"),
            );
            state.mark_dirty();
            return;
        }
    }
    state.site = selection;
    state.page = 1;
    state.expanded.clear();
    state.mark_dirty();
}

fn on_jobs_loaded(
    state: &mut AppState,
    request: u64,
    result: Result<crate::JobsPage, String>,
    now_ms: u64,
) {
    let matches_in_flight = state
        .in_flight
        .as_ref()
        .is_some_and(|in_flight| in_flight.request == request);
    if !matches_in_flight {
        engine_debug!("Ignoring completion of unknown request {}", request);
        return;
    }
    let Some(in_flight) = state.in_flight.take() else {
        return;
    };
    state.set_loading(false);
    state.mark_dirty();

    let still_current = state.site.site() == Some(in_flight.key.site.as_str())
        && state.page == in_flight.key.page;

    match result {
        Ok(page) if still_current => {
            engine_debug!(
                "Request {} loaded {} jobs for {} page {}",
                request,
                page.jobs.len(),
                in_flight.key.site,
                in_flight.key.page
            );
            state.apply_page(page, now_ms);
        }
        Ok(_) => {
            engine_debug!("Request {} superseded; discarding its jobs", request);
            state.restore_pagination();
        }
        Err(message) => {
            engine_warn!("Request {} failed: {}", request, message);
            state.show_modal(ModalKind::Error, "Error on request:", message);
            state.restore_pagination();
        }
    }
}

fn on_row_action_clicked(state: &mut AppState, job_id: String) -> Vec<Effect> {
    if state.pending_actions.contains(&job_id) {
        return Vec::new();
    }
    let Some(job) = state.find_job(&job_id) else {
        return Vec::new();
    };
    if !job.flag(state.table.button_condition) {
        return Vec::new();
    }
    let args = state
        .button
        .arg_fields
        .iter()
        .map(|field| job.field(*field))
        .collect();
    state.pending_actions.insert(job_id.clone());
    state.mark_dirty();
    vec![Effect::InvokeRowAction { job_id, args }]
}

fn on_row_toggled(state: &mut AppState, job_id: String) -> Vec<Effect> {
    if state.expanded.remove(&job_id).is_some() {
        state.mark_dirty();
        return Vec::new();
    }
    let Some(job_url) = state.find_job(&job_id).map(|job| job.resource_url.clone()) else {
        return Vec::new();
    };
    let generation = state.next_generation();
    state
        .expanded
        .insert(job_id.clone(), OutputListing::Loading { generation });
    state.mark_dirty();
    vec![Effect::FetchOutputs {
        job_id,
        generation,
        job_url,
    }]
}

fn on_download_clicked(state: &mut AppState, job_id: String, file: String) -> Vec<Effect> {
    let Some(job_url) = state.find_job(&job_id).map(|job| job.resource_url.clone()) else {
        return Vec::new();
    };
    let Some(entry) = state
        .expanded
        .get_mut(&job_id)
        .and_then(|listing| listing.file_mut(&file))
    else {
        return Vec::new();
    };
    if entry.entry.is_directory || entry.downloading {
        return Vec::new();
    }
    entry.downloading = true;
    state.mark_dirty();
    let target_name = download_target_name(&file, &job_id);
    vec![Effect::DownloadOutput {
        job_id,
        job_url,
        file,
        target_name,
    }]
}

fn on_download_finished(state: &mut AppState, job_id: &str, file: &str, result: DownloadResult) {
    let Some(entry) = state
        .expanded
        .get_mut(job_id)
        .and_then(|listing| listing.file_mut(file))
    else {
        engine_debug!("Download of {} for job {} finished after its row closed", file, job_id);
        return;
    };
    entry.downloading = false;
    match result {
        DownloadResult::Completed { severity, message } => {
            entry.status = Some(FileStatus {
                severity,
                text: message,
            });
        }
        DownloadResult::Skipped => {}
        DownloadResult::Failed { stage, message } => {
            let prefix = match stage {
                DownloadStage::Download => "Download failed",
                DownloadStage::Upload => "Upload failed",
            };
            entry.status = Some(FileStatus {
                severity: Severity::Error,
                text: format!("{prefix}: {message}"),
            });
        }
    }
    state.mark_dirty();
}

fn on_drag_requested(state: &AppState, job_id: String, file: Option<String>) -> Vec<Effect> {
    let Some(job) = state.find_job(&job_id) else {
        return Vec::new();
    };
    match file {
        None => vec![Effect::StartDrag {
            payload: job_code(&job.resource_url),
            browser_drop: None,
        }],
        Some(file) => {
            let Some(entry) = state
                .expanded
                .get(&job_id)
                .and_then(|listing| listing.file(&file))
            else {
                return Vec::new();
            };
            let browser_drop = (!entry.entry.is_directory).then(|| BrowserDropTarget {
                job_id: job_id.clone(),
                file: file.clone(),
            });
            vec![Effect::StartDrag {
                payload: download_file_code(&job.resource_url, &file),
                browser_drop,
            }]
        }
    }
}

/// Decides whether the current state calls for a job-list fetch.
///
/// A fetch is issued when the (site, page) pair differs from the last issued
/// one or a refresh was requested, the site is not the sentinel and nothing is
/// in flight. Anything that changes while a fetch is in flight stays in state
/// and is picked up by the pass that runs when that fetch completes.
fn reconcile(state: &mut AppState) -> Option<Effect> {
    if !state.mounted {
        return None;
    }
    let Some(site) = state.site.site().map(str::to_string) else {
        if !state.jobs.is_empty() || state.loading {
            engine_debug!("No site selected; clearing job list without fetching");
            state.mark_dirty();
        }
        state.clear_for_no_site();
        return None;
    };

    let key = FetchKey {
        site,
        page: state.page,
    };
    let changed = state.last_issued.as_ref() != Some(&key);
    if !changed && !state.refresh_requested {
        return None;
    }
    if let Some(in_flight_request) = state.in_flight.as_ref().map(|f| f.request) {
        // The deferred fetch is as good as issued for the controls.
        if !state.loading {
            state.set_loading(true);
            state.mark_dirty();
        }
        engine_debug!(
            "Deferring fetch of {} page {} behind request {}",
            key.site,
            key.page,
            in_flight_request
        );
        return None;
    }

    let request = state.issue_fetch(key.clone());
    state.mark_dirty();
    engine_info!(
        "Fetching jobs for {} page {} (request {})",
        key.site,
        key.page,
        request
    );
    Some(Effect::FetchJobs {
        request,
        site: key.site,
        page: key.page,
    })
}
