use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use engine_logging::{engine_debug, engine_info};

use crate::persist::{ensure_directory, AtomicFileWriter};
use crate::{DropZone, FileBrowser, UploadError};

/// A plain directory acting as the host file browser.
pub struct LocalDirBrowser {
    root: PathBuf,
    zone: Arc<DropZone>,
}

impl LocalDirBrowser {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, UploadError> {
        let root = root.into();
        ensure_directory(&root).map_err(|err| UploadError::Io(err.to_string()))?;
        Ok(Self {
            root,
            zone: DropZone::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait::async_trait]
impl FileBrowser for LocalDirBrowser {
    fn current_path(&self) -> String {
        self.root.display().to_string()
    }

    async fn list_entries(&self) -> Result<Vec<String>, UploadError> {
        let mut dir = tokio::fs::read_dir(&self.root).await?;
        let mut names = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    async fn upload(&self, data: Bytes, name: &str) -> Result<(), UploadError> {
        let writer = AtomicFileWriter::new(self.root.clone());
        let name = name.to_string();
        let path = tokio::task::spawn_blocking(move || writer.write(&name, &data))
            .await
            .map_err(|err| UploadError::Io(err.to_string()))?
            .map_err(|err| UploadError::Rejected(err.to_string()))?;
        engine_info!("Saved {}", path.display());
        Ok(())
    }

    fn refresh(&self) {
        engine_debug!("Browser directory {} refreshed", self.root.display());
    }

    fn drop_zone(&self) -> Arc<DropZone> {
        Arc::clone(&self.zone)
    }
}
