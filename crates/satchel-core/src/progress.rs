//! Shared progress overlay
//!
//! Several operations may run at once (a batch download while the user
//! picks files). The overlay stays up until the last of them is done.

use parking_lot::Mutex;

use satchel_dispatch::{MessageKey, ProgressIndicator};

#[derive(Debug, Default)]
struct OverlayState {
    depth: usize,
    message: Option<MessageKey>,
}

#[derive(Debug, Default)]
pub struct ProgressOverlay {
    state: Mutex<OverlayState>,
}

impl ProgressOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.state.lock().depth > 0
    }

    /// Message currently shown, if any
    pub fn message(&self) -> Option<MessageKey> {
        self.state.lock().message
    }
}

impl ProgressIndicator for ProgressOverlay {
    fn show(&self, message: MessageKey) {
        let mut state = self.state.lock();
        state.depth += 1;
        state.message = Some(message);
        tracing::trace!(depth = state.depth, message = %message, "Progress overlay shown");
    }

    fn dismiss(&self) {
        let mut state = self.state.lock();
        state.depth = state.depth.saturating_sub(1);
        if state.depth == 0 {
            state.message = None;
        }
        tracing::trace!(depth = state.depth, "Progress overlay dismissed");
    }
}
