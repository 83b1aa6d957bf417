//! Task stream core: the pure poller/pagination state machine and view-model helpers.
mod codegen;
mod effect;
mod job;
mod msg;
mod outputs;
mod settings;
mod site;
mod state;
mod update;
mod view_model;

pub use codegen::{download_file_code, job_code};
pub use effect::{BrowserDropTarget, Effect, RequestId};
pub use job::{Job, JobField, JobId, JobsPage};
pub use msg::Msg;
pub use outputs::{
    download_target_name, DownloadResult, DownloadStage, FileStatus, OutputEntry, Severity,
    GENERIC_OUTPUT_NAMES,
};
pub use settings::{
    ButtonSettings, PollSettings, TableFormat, ITEMS_PER_PAGE, RELOAD_CHECK_INTERVAL_MS,
    RELOAD_INTERVAL_MS,
};
pub use site::{validate_default_site, SiteSelection, NO_SITE_LABEL};
pub use state::{AppState, Modal, ModalKind};
pub use update::update;
pub use view_model::{
    AppViewModel, JobDetailsView, JobRowView, ModalView, OutputFileView, OutputListingView,
    RowActionView,
};
