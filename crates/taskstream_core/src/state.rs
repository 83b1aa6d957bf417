use std::collections::BTreeSet;

use engine_logging::engine_debug;

use crate::outputs::{ExpandedRows, OutputListing};
use crate::view_model::{
    AppViewModel, JobDetailsView, JobRowView, ModalView, OutputFileView, OutputListingView,
    RowActionView,
};
use crate::{
    ButtonSettings, Job, JobId, JobsPage, PollSettings, RequestId, SiteSelection, TableFormat,
    NO_SITE_LABEL,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    Error,
}

/// The single shared modal slot; a newer modal replaces an older one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modal {
    pub kind: ModalKind,
    pub title: String,
    pub message: String,
}

/// Query a fetch was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FetchKey {
    pub(crate) site: String,
    pub(crate) page: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InFlightFetch {
    pub(crate) request: RequestId,
    pub(crate) key: FetchKey,
}

/// Poller state plus the per-row state of the job table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub(crate) settings: PollSettings,
    pub(crate) table: TableFormat,
    pub(crate) button: ButtonSettings,
    pub(crate) mounted: bool,
    pub(crate) sites: Vec<String>,
    pub(crate) site: SiteSelection,
    pub(crate) page: u32,
    pub(crate) jobs: Vec<Job>,
    pub(crate) message: String,
    pub(crate) loading: bool,
    pub(crate) sites_selection_disabled: bool,
    pub(crate) has_prev_page: bool,
    pub(crate) has_next_page: bool,
    pub(crate) auto_reload: bool,
    pub(crate) refresh_requested: bool,
    pub(crate) mounted_at_ms: u64,
    pub(crate) last_update_ms: Option<u64>,
    pub(crate) in_flight: Option<InFlightFetch>,
    pub(crate) last_issued: Option<FetchKey>,
    pub(crate) next_request: RequestId,
    pub(crate) pending_actions: BTreeSet<JobId>,
    pub(crate) expanded: ExpandedRows,
    pub(crate) next_generation: u64,
    pub(crate) modal: Option<Modal>,
    pub(crate) dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_settings(
            PollSettings::default(),
            TableFormat::default(),
            ButtonSettings::default(),
        )
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: PollSettings, table: TableFormat, button: ButtonSettings) -> Self {
        Self {
            settings,
            table,
            button,
            mounted: false,
            sites: Vec::new(),
            site: SiteSelection::NoSite,
            page: 1,
            jobs: Vec::new(),
            message: String::new(),
            loading: true,
            sites_selection_disabled: true,
            has_prev_page: false,
            has_next_page: false,
            auto_reload: true,
            refresh_requested: false,
            mounted_at_ms: 0,
            last_update_ms: None,
            in_flight: None,
            last_issued: None,
            next_request: 1,
            pending_actions: BTreeSet::new(),
            expanded: ExpandedRows::new(),
            next_generation: 1,
            modal: None,
            dirty: false,
        }
    }

    pub fn settings(&self) -> &PollSettings {
        &self.settings
    }

    pub fn site(&self) -> &SiteSelection {
        &self.site
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_fetch_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn refresh_requested(&self) -> bool {
        self.refresh_requested
    }

    pub fn auto_reload(&self) -> bool {
        self.auto_reload
    }

    pub fn last_update_ms(&self) -> Option<u64> {
        self.last_update_ms
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn find_job(&self, job_id: &str) -> Option<&Job> {
        self.jobs.iter().find(|job| job.id == job_id)
    }

    /// Keeps `sites_selection_disabled` tied to `loading`.
    pub(crate) fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        self.sites_selection_disabled = loading;
    }

    pub(crate) fn show_modal(&mut self, kind: ModalKind, title: &str, message: impl Into<String>) {
        self.modal = Some(Modal {
            kind,
            title: title.to_string(),
            message: message.into(),
        });
    }

    /// Timestamp the reload timer measures against.
    pub(crate) fn reload_baseline_ms(&self) -> u64 {
        self.last_update_ms.unwrap_or(self.mounted_at_ms)
    }

    pub(crate) fn issue_fetch(&mut self, key: FetchKey) -> RequestId {
        let request = self.next_request;
        self.next_request += 1;
        self.set_loading(true);
        self.has_prev_page = false;
        self.has_next_page = false;
        self.refresh_requested = false;
        self.in_flight = Some(InFlightFetch {
            request,
            key: key.clone(),
        });
        self.last_issued = Some(key);
        request
    }

    pub(crate) fn apply_page(&mut self, page: JobsPage, now_ms: u64) {
        self.has_next_page = page.jobs.len() >= self.settings.items_per_page;
        self.has_prev_page = self.page > 1;
        self.jobs = page.jobs;
        self.message = page.message;
        self.last_update_ms = Some(now_ms);

        let jobs = &self.jobs;
        let before = self.expanded.len();
        self.expanded
            .retain(|job_id, _| jobs.iter().any(|job| job.id == *job_id));
        if self.expanded.len() != before {
            engine_debug!(
                "Dropped {} expanded rows no longer on page {}",
                before - self.expanded.len(),
                self.page
            );
        }
    }

    /// Restores the pagination controls from what is currently displayed.
    pub(crate) fn restore_pagination(&mut self) {
        let has_site = !self.site.is_none();
        self.has_prev_page = has_site && self.page > 1;
        self.has_next_page = has_site && self.jobs.len() >= self.settings.items_per_page;
    }

    /// Clears the table for the sentinel. An outstanding fetch stays recorded
    /// so its completion is still matched and discarded.
    pub(crate) fn clear_for_no_site(&mut self) {
        self.jobs.clear();
        self.expanded.clear();
        self.refresh_requested = false;
        self.last_issued = None;
        self.has_prev_page = false;
        self.has_next_page = false;
        self.set_loading(false);
    }

    /// Drops everything a previous mount left behind. Request ids and
    /// listing generations keep counting so late completions stay unmatched.
    pub(crate) fn reset_for_mount(&mut self) {
        self.jobs.clear();
        self.expanded.clear();
        self.pending_actions.clear();
        self.modal = None;
        self.in_flight = None;
        self.last_issued = None;
        self.last_update_ms = None;
        self.refresh_requested = false;
        self.auto_reload = true;
        self.has_prev_page = false;
        self.has_next_page = false;
        self.set_loading(true);
    }

    pub(crate) fn next_generation(&mut self) -> u64 {
        let generation = self.next_generation;
        self.next_generation += 1;
        generation
    }

    pub fn view(&self) -> AppViewModel {
        let mut site_options = Vec::with_capacity(self.sites.len() + 1);
        site_options.push(NO_SITE_LABEL.to_string());
        site_options.extend(self.sites.iter().cloned());

        AppViewModel {
            site_options,
            selected_site: self.site.to_string(),
            sites_selection_disabled: self.sites_selection_disabled,
            page: self.page,
            show_prev: self.has_prev_page && !self.loading,
            show_next: self.has_next_page && !self.loading,
            loading: self.loading,
            message: self.message.clone(),
            last_update_ms: self.last_update_ms,
            auto_reload: self.auto_reload,
            refresh_disabled: self.loading || self.site.is_none(),
            columns: self
                .table
                .columns
                .iter()
                .map(|c| c.name().to_string())
                .collect(),
            action_label: self.button.label.clone(),
            rows: self.jobs.iter().map(|job| self.row_view(job)).collect(),
            modal: self.modal.as_ref().map(|modal| ModalView {
                kind: modal.kind,
                title: modal.title.clone(),
                message: modal.message.clone(),
            }),
            dirty: self.dirty,
        }
    }

    fn row_view(&self, job: &Job) -> JobRowView {
        let pending = self.pending_actions.contains(&job.id);
        let action = if !job.flag(self.table.button_condition) {
            RowActionView::Hidden
        } else if pending && self.button.is_async {
            RowActionView::Loading
        } else if pending {
            RowActionView::Disabled {
                label: self.button.label.clone(),
            }
        } else {
            RowActionView::Button {
                label: self.button.label.clone(),
            }
        };

        let details = self.expanded.get(&job.id).map(|listing| JobDetailsView {
            logs: job.log_text(),
            outputs: match listing {
                OutputListing::Loading { .. } => OutputListingView::Loading,
                OutputListing::Failed(message) => OutputListingView::Failed(message.clone()),
                OutputListing::Loaded(files) => OutputListingView::Files(
                    files
                        .iter()
                        .map(|file| OutputFileView {
                            name: file.entry.name.clone(),
                            is_directory: file.entry.is_directory,
                            downloadable: !file.entry.is_directory && !file.downloading,
                            downloading: file.downloading,
                            status: file.status.clone(),
                        })
                        .collect(),
                ),
            },
        });

        JobRowView {
            job_id: job.id.clone(),
            cells: self.table.columns.iter().map(|c| job.field(*c)).collect(),
            action,
            expanded: details.is_some(),
            details,
        }
    }
}
