use crate::{FileStatus, ModalKind};

/// Everything a host needs to draw the panel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    /// Dropdown entries, sentinel first.
    pub site_options: Vec<String>,
    pub selected_site: String,
    pub sites_selection_disabled: bool,
    pub page: u32,
    pub show_prev: bool,
    pub show_next: bool,
    pub loading: bool,
    pub message: String,
    /// Wall-clock millis of the last successful fetch.
    pub last_update_ms: Option<u64>,
    pub auto_reload: bool,
    pub refresh_disabled: bool,
    pub columns: Vec<String>,
    pub action_label: String,
    pub rows: Vec<JobRowView>,
    pub modal: Option<ModalView>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRowView {
    pub job_id: String,
    pub cells: Vec<String>,
    pub action: RowActionView,
    pub expanded: bool,
    pub details: Option<JobDetailsView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowActionView {
    Hidden,
    Button { label: String },
    /// Pending invocation of a synchronous-style action.
    Disabled { label: String },
    Loading,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDetailsView {
    pub logs: String,
    pub outputs: OutputListingView,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputListingView {
    Loading,
    Failed(String),
    Files(Vec<OutputFileView>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFileView {
    pub name: String,
    pub is_directory: bool,
    pub downloadable: bool,
    pub downloading: bool,
    pub status: Option<FileStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalView {
    pub kind: ModalKind,
    pub title: String,
    pub message: String,
}
