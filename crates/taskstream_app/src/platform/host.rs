use std::sync::{mpsc, Arc, Mutex, PoisonError};

use engine_logging::{engine_debug, engine_warn};
use taskstream_engine::{
    Dialogs, DragDrop, DragPayload, DropEvent, DropResult, DropZone, KernelInfo, KernelLookup,
};
use tokio::sync::oneshot;

use super::app::AppInput;

/// Kernel whose language comes from the config.
pub struct ConfiguredKernel {
    language: Option<String>,
}

impl ConfiguredKernel {
    pub fn new(language: Option<String>) -> Self {
        Self { language }
    }
}

#[async_trait::async_trait]
impl KernelLookup for ConfiguredKernel {
    async fn active_kernel(&self) -> Option<KernelInfo> {
        self.language.as_ref().map(|language| KernelInfo {
            name: format!("{language} (terminal)"),
            language: language.clone(),
        })
    }
}

/// Routes confirm dialogs to the terminal and the typed answer back.
///
/// Only one question is open at a time; asking again abandons the previous
/// one, which then resolves as declined.
pub struct PromptBroker {
    pending: Mutex<Option<oneshot::Sender<bool>>>,
    input_tx: mpsc::Sender<AppInput>,
}

impl PromptBroker {
    pub fn new(input_tx: mpsc::Sender<AppInput>) -> Arc<Self> {
        Arc::new(Self {
            pending: Mutex::new(None),
            input_tx,
        })
    }

    pub fn has_pending(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Resolves the open question; returns `false` when none was open.
    pub fn answer(&self, accepted: bool) -> bool {
        let sender = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match sender {
            Some(sender) => sender.send(accepted).is_ok(),
            None => false,
        }
    }
}

#[async_trait::async_trait]
impl Dialogs for PromptBroker {
    async fn confirm(&self, title: &str, message: &str) -> bool {
        let (tx, rx) = oneshot::channel();
        *self.pending.lock().unwrap_or_else(PoisonError::into_inner) = Some(tx);
        let prompt = AppInput::Prompt {
            title: title.to_string(),
            message: message.to_string(),
        };
        if self.input_tx.send(prompt).is_err() {
            engine_warn!("Prompt {:?} could not be shown", title);
            return false;
        }
        rx.await.unwrap_or(false)
    }
}

/// Where a terminal drag is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropSpot {
    /// Into the active notebook: the payload is printed for the user.
    #[default]
    Notebook,
    /// Onto the file browser.
    Browser,
}

/// Drag source for a terminal: gestures end immediately at the chosen spot.
pub struct TerminalDrag {
    zone: Arc<DropZone>,
    spot: Mutex<DropSpot>,
    input_tx: mpsc::Sender<AppInput>,
}

impl TerminalDrag {
    pub fn new(zone: Arc<DropZone>, input_tx: mpsc::Sender<AppInput>) -> Self {
        Self {
            zone,
            spot: Mutex::new(DropSpot::default()),
            input_tx,
        }
    }

    /// Chooses where the next gesture ends.
    pub fn release_at(&self, spot: DropSpot) {
        *self.spot.lock().unwrap_or_else(PoisonError::into_inner) = spot;
    }
}

#[async_trait::async_trait]
impl DragDrop for TerminalDrag {
    async fn start_drag(&self, payload: DragPayload) -> DropResult {
        let spot = std::mem::take(&mut *self.spot.lock().unwrap_or_else(PoisonError::into_inner));
        match spot {
            DropSpot::Notebook => {
                let _ = self.input_tx.send(AppInput::Injected(payload.text));
                DropResult::Copied
            }
            DropSpot::Browser => {
                let event = DropEvent {
                    mime: payload.mime.to_string(),
                    text: payload.text,
                };
                let listeners = self.zone.dispatch(&event);
                engine_debug!("Drop on browser reached {} listener(s)", listeners);
                if listeners == 0 {
                    DropResult::Cancelled
                } else {
                    DropResult::Copied
                }
            }
        }
    }
}
