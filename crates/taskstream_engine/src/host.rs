use std::sync::Arc;

use bytes::Bytes;

use crate::{DropZone, UploadError};

/// Kernel attached to the active notebook or console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelInfo {
    pub name: String,
    pub language: String,
}

impl KernelInfo {
    /// Injected snippets are Python, so only Python kernels can take them.
    pub fn is_usable(&self) -> bool {
        self.language.to_ascii_lowercase().contains("python")
    }
}

#[async_trait::async_trait]
pub trait KernelLookup: Send + Sync {
    async fn active_kernel(&self) -> Option<KernelInfo>;
}

/// The host's file browser: a current directory that accepts uploads.
#[async_trait::async_trait]
pub trait FileBrowser: Send + Sync {
    fn current_path(&self) -> String;
    async fn list_entries(&self) -> Result<Vec<String>, UploadError>;
    async fn upload(&self, data: Bytes, name: &str) -> Result<(), UploadError>;
    /// Re-reads the directory after a server-side write.
    fn refresh(&self) {}
    fn drop_zone(&self) -> Arc<DropZone>;
}

#[async_trait::async_trait]
pub trait Dialogs: Send + Sync {
    /// Resolves to `true` when the user accepts.
    async fn confirm(&self, title: &str, message: &str) -> bool;
}

pub const TEXT_MIME: &str = "text/plain";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPayload {
    pub mime: &'static str,
    pub text: String,
}

impl DragPayload {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            mime: TEXT_MIME,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropResult {
    Copied,
    Cancelled,
}

#[async_trait::async_trait]
pub trait DragDrop: Send + Sync {
    /// Resolves once the gesture ends.
    async fn start_drag(&self, payload: DragPayload) -> DropResult;
}

/// Capabilities the host environment lends to the engine.
#[derive(Clone)]
pub struct HostCapabilities {
    pub kernel: Arc<dyn KernelLookup>,
    pub browser: Arc<dyn FileBrowser>,
    pub dialogs: Arc<dyn Dialogs>,
    pub drag: Arc<dyn DragDrop>,
}

impl HostCapabilities {
    pub async fn usable_kernel(&self) -> Option<KernelInfo> {
        self.kernel
            .active_kernel()
            .await
            .filter(KernelInfo::is_usable)
    }
}
