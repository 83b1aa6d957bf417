use crate::JobField;

/// Minimum time between automatic background reloads.
pub const RELOAD_INTERVAL_MS: u64 = 60_000;
/// How often the reload timer checks whether a reload is due.
pub const RELOAD_CHECK_INTERVAL_MS: u64 = 10_000;
/// Page size assumed by the jobs endpoint.
pub const ITEMS_PER_PAGE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSettings {
    pub reload_interval_ms: u64,
    pub check_interval_ms: u64,
    pub items_per_page: usize,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            reload_interval_ms: RELOAD_INTERVAL_MS,
            check_interval_ms: RELOAD_CHECK_INTERVAL_MS,
            items_per_page: ITEMS_PER_PAGE,
        }
    }
}

/// Which job fields are shown as columns and which one decides whether the
/// row button is rendered. Rows are always keyed by the job id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableFormat {
    pub columns: Vec<JobField>,
    pub button_condition: JobField,
}

impl Default for TableFormat {
    fn default() -> Self {
        Self {
            columns: vec![
                JobField::Id,
                JobField::Name,
                JobField::Owner,
                JobField::Site,
                JobField::Status,
                JobField::StartTime,
            ],
            button_condition: JobField::IsCancelable,
        }
    }
}

/// Row button configuration. The invocation itself is performed by the host
/// in response to `Effect::InvokeRowAction`, with arguments pulled from the
/// job by `arg_fields`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonSettings {
    pub label: String,
    pub arg_fields: Vec<JobField>,
    /// When set, the button is replaced by a loading indicator while pending.
    pub is_async: bool,
}

impl Default for ButtonSettings {
    fn default() -> Self {
        Self {
            label: "Cancel Job".to_string(),
            arg_fields: vec![JobField::ResourceUrl],
            is_async: true,
        }
    }
}
