//! Developer-tools signal.
//!
//! The detection heuristic lives outside this crate and only reports
//! booleans. A positive report opens the signal and (re)arms an auto-reset;
//! the signal closes `reset_ms` after the last positive report.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::achievement::AchievementId;
use crate::events::Event;
use crate::progress::{EyesMood, ProgressStore};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevToolsConfig {
    #[serde(default = "default_reset_ms")]
    pub reset_ms: u64,
}

fn default_reset_ms() -> u64 {
    3_000
}

impl Default for DevToolsConfig {
    fn default() -> Self {
        Self {
            reset_ms: default_reset_ms(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DevToolsMonitor {
    config: DevToolsConfig,
    open: bool,
    reset_at: Option<u64>,
    greeted: bool,
}

impl DevToolsMonitor {
    pub fn new(config: DevToolsConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.reset_at
    }

    /// Feed one detector reading. Negative readings are ignored; closing is
    /// driven by the auto-reset only.
    pub fn report(&mut self, open: bool, now_ms: u64, store: &mut ProgressStore) -> Vec<Event> {
        if !open {
            debug!("devtools reported closed; waiting for auto-reset");
            return Vec::new();
        }

        let mut events = Vec::new();
        self.reset_at = Some(now_ms + self.config.reset_ms);
        if !self.open {
            self.open = true;
            events.push(Event::DevToolsOpened { at_ms: now_ms });
        }
        if !self.greeted {
            self.greeted = true;
            info!("Looking for the source? 👁️ I see you...");
        }
        if store.set_eyes_mood(EyesMood::Alert) {
            events.push(Event::MoodChanged {
                mood: EyesMood::Alert,
                at_ms: now_ms,
            });
        }
        events.extend(store.unlock_achievement(AchievementId::CodeHunter, now_ms));
        events
    }

    pub fn tick(&mut self, now_ms: u64, store: &mut ProgressStore) -> Vec<Event> {
        let Some(reset_at) = self.reset_at else {
            return Vec::new();
        };
        if now_ms < reset_at {
            return Vec::new();
        }

        self.reset_at = None;
        self.open = false;
        let mut events = vec![Event::DevToolsClosed { at_ms: reset_at }];
        if store.set_eyes_mood(EyesMood::Cold) {
            events.push(Event::MoodChanged {
                mood: EyesMood::Cold,
                at_ms: reset_at,
            });
        }
        events
    }

    pub fn cancel(&mut self) {
        self.reset_at = None;
        self.open = false;
    }
}
