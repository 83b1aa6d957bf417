/// Stable server-side job identifier; also the row key.
pub type JobId = String;

/// Immutable snapshot of a remote job as returned by a list call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Job {
    pub id: JobId,
    pub name: String,
    pub owner: String,
    pub site: String,
    pub status: String,
    /// Opaque handle used for every follow-up call (cancel, outputs, logs).
    pub resource_url: String,
    /// Rendered verbatim, never parsed.
    pub start_time: String,
    pub is_cancelable: bool,
    pub logs: Vec<String>,
}

/// Named job fields, used by the table columns and the row action arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum JobField {
    Id,
    Name,
    Owner,
    Site,
    Status,
    ResourceUrl,
    StartTime,
    IsCancelable,
}

impl JobField {
    pub fn name(self) -> &'static str {
        match self {
            JobField::Id => "id",
            JobField::Name => "name",
            JobField::Owner => "owner",
            JobField::Site => "site",
            JobField::Status => "status",
            JobField::ResourceUrl => "resource_url",
            JobField::StartTime => "start_time",
            JobField::IsCancelable => "is_cancelable",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let field = match name {
            "id" => JobField::Id,
            "name" => JobField::Name,
            "owner" => JobField::Owner,
            "site" => JobField::Site,
            "status" => JobField::Status,
            "resource_url" => JobField::ResourceUrl,
            "start_time" => JobField::StartTime,
            "is_cancelable" => JobField::IsCancelable,
            _ => return None,
        };
        Some(field)
    }
}

impl Job {
    /// Text value of a field, as rendered in a table cell or passed to an action.
    pub fn field(&self, field: JobField) -> String {
        match field {
            JobField::Id => self.id.clone(),
            JobField::Name => self.name.clone(),
            JobField::Owner => self.owner.clone(),
            JobField::Site => self.site.clone(),
            JobField::Status => self.status.clone(),
            JobField::ResourceUrl => self.resource_url.clone(),
            JobField::StartTime => self.start_time.clone(),
            JobField::IsCancelable => self.is_cancelable.to_string(),
        }
    }

    /// Truthiness of a field: booleans as-is, text fields when non-empty.
    pub fn flag(&self, field: JobField) -> bool {
        match field {
            JobField::IsCancelable => self.is_cancelable,
            other => !self.field(other).is_empty(),
        }
    }

    /// Log lines joined for the detail row.
    pub fn log_text(&self) -> String {
        if self.logs.is_empty() {
            "No logs for this job!".to_string()
        } else {
            self.logs.join("\n")
        }
    }
}

/// One page of jobs as delivered by the list call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobsPage {
    pub message: String,
    pub jobs: Vec<Job>,
}
