use crate::JobId;

/// Output names every job produces; downloads of these get the job id appended
/// so files from different jobs do not overwrite each other.
pub const GENERIC_OUTPUT_NAMES: [&str; 3] = ["stdout", "stderr", "UNICORE_SCRIPT_EXIT_CODE"];

/// Destination name for a downloaded output file.
pub fn download_target_name(file: &str, job_id: &str) -> String {
    if GENERIC_OUTPUT_NAMES.contains(&file) {
        format!("{file}_{job_id}")
    } else {
        file.to_string()
    }
}

/// One entry of a job's working directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputEntry {
    pub name: String,
    pub is_directory: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
    Error,
}

/// Inline status line attached to an output file row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStatus {
    pub severity: Severity,
    pub text: String,
}

/// Which half of a client-side download failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadStage {
    Download,
    Upload,
}

/// Result of a download request as reported back by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadResult {
    Completed { severity: Severity, message: String },
    /// The user declined to overwrite an existing file.
    Skipped,
    Failed { stage: DownloadStage, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OutputFileState {
    pub(crate) entry: OutputEntry,
    pub(crate) downloading: bool,
    pub(crate) status: Option<FileStatus>,
}

/// Listing state of an expanded job row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum OutputListing {
    Loading { generation: u64 },
    Loaded(Vec<OutputFileState>),
    Failed(String),
}

impl OutputListing {
    pub(crate) fn file_mut(&mut self, name: &str) -> Option<&mut OutputFileState> {
        match self {
            OutputListing::Loaded(files) => files.iter_mut().find(|f| f.entry.name == name),
            _ => None,
        }
    }

    pub(crate) fn file(&self, name: &str) -> Option<&OutputFileState> {
        match self {
            OutputListing::Loaded(files) => files.iter().find(|f| f.entry.name == name),
            _ => None,
        }
    }
}

pub(crate) fn loaded_listing(mut entries: Vec<OutputEntry>) -> OutputListing {
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    OutputListing::Loaded(
        entries
            .into_iter()
            .map(|entry| OutputFileState {
                entry,
                downloading: false,
                status: None,
            })
            .collect(),
    )
}

/// Expanded detail rows keyed by job.
pub(crate) type ExpandedRows = std::collections::BTreeMap<JobId, OutputListing>;
