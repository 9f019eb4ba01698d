//! Notification queue.
//!
//! Two independent mechanisms share this module:
//!
//! - [`ContextualNotifier`]: one slot, shake-then-reveal, hold, clear. A new
//!   notification supersedes the current one and restarts the cycle.
//! - [`ToastQueue`]: one toast per unlock, each expiring on its own timer.

mod chime;
mod contextual;
mod toast;

pub use chime::{Chime, ChimeTone, SilentChime, TerminalBell, Waveform, LEVEL_UP};
pub use contextual::{ContextualNotifier, NotificationPhase, NotificationTimings};
pub use toast::{Toast, ToastQueue, ToastTimings};

use serde::{Deserialize, Serialize};

/// Transient contextual message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

impl Notification {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }
}
