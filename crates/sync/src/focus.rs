use tokio::{sync::mpsc, task::JoinHandle};

use crate::{error::Result, list::ResourceListController};

/// Visibility change reported by the hosting UI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusEvent {
    Focused,
    Blurred,
}

/// Reloads a list every time its screen gains focus.
///
/// Every `Focused` event starts a new load, even when the previous one is
/// still running; the list keeps the answer of the latest load.
#[derive(Clone, Debug)]
pub struct FocusRefreshPolicy {
    controller: ResourceListController,
}

impl FocusRefreshPolicy {
    pub fn new(controller: ResourceListController) -> Self {
        Self { controller }
    }

    pub fn on_event(&self, event: FocusEvent) -> Option<JoinHandle<Result<()>>> {
        match event {
            FocusEvent::Focused => {
                tracing::debug!(resource = self.controller.kind().name, "focus gained, reloading");
                Some(self.controller.reload_in_background())
            }
            FocusEvent::Blurred => None,
        }
    }

    /// Consumes `events` until the sender side is dropped.
    pub fn attach(self, mut events: mpsc::Receiver<FocusEvent>) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                self.on_event(event);
            }
            tracing::debug!(resource = self.controller.kind().name, "focus stream closed");
        })
    }
}
