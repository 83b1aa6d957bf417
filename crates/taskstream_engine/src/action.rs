use std::sync::Arc;

use engine_logging::engine_info;

use crate::{ActionError, ApiClient, RemoteJob};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReply {
    /// Fresh record of the job, when the server sends one back.
    pub job: Option<RemoteJob>,
    pub message: String,
}

/// Remote operation bound to a job row's button.
#[async_trait::async_trait]
pub trait RowAction: Send + Sync {
    fn label(&self) -> &str;
    async fn invoke(&self, args: &[String]) -> Result<ActionReply, ActionError>;
}

/// Cancels a job; its single argument is the job's resource url.
pub struct CancelJobAction {
    api: Arc<dyn ApiClient>,
}

impl CancelJobAction {
    pub fn new(api: Arc<dyn ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl RowAction for CancelJobAction {
    fn label(&self) -> &str {
        "Cancel Job"
    }

    async fn invoke(&self, args: &[String]) -> Result<ActionReply, ActionError> {
        let resource_url = args.first().ok_or(ActionError::MissingArgument(0))?;
        engine_info!("Cancelling job {}", resource_url);
        let reply = self.api.cancel_job(resource_url).await?;
        match reply.job {
            Some(job) => Ok(ActionReply {
                job: Some(job),
                message: reply.message,
            }),
            // The server answers a refused cancel with only a message.
            None if !reply.message.is_empty() => Err(ActionError::Rejected(reply.message)),
            None => Ok(ActionReply {
                job: None,
                message: reply.message,
            }),
        }
    }
}
