//! Throttled pointer feed for the ambient renderers.
//!
//! The first raw event in a window is held and committed when the window
//! elapses; events arriving while one is held are dropped.

use serde::{Deserialize, Serialize};

use crate::events::Event;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointerConfig {
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,
}

fn default_throttle_ms() -> u64 {
    50
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            throttle_ms: default_throttle_ms(),
        }
    }
}

/// Normalized pointer position, both axes in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl Default for PointerPosition {
    fn default() -> Self {
        Self { x: 0.5, y: 0.5 }
    }
}

impl PointerPosition {
    /// Normalize client coordinates by the viewport. A degenerate viewport
    /// maps to the center.
    pub fn from_client(client_x: f64, client_y: f64, width: f64, height: f64) -> Self {
        Self {
            x: normalize(client_x, width),
            y: normalize(client_y, height),
        }
    }
}

fn normalize(value: f64, extent: f64) -> f64 {
    if !(extent > 0.0) || !value.is_finite() {
        return 0.5;
    }
    (value / extent).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Default)]
pub struct PointerFeed {
    config: PointerConfig,
    position: PointerPosition,
    held: Option<(PointerPosition, u64)>,
}

impl PointerFeed {
    pub fn new(config: PointerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn position(&self) -> PointerPosition {
        self.position
    }

    /// End of the current throttle window, if an update is held.
    pub fn next_deadline(&self) -> Option<u64> {
        self.held.map(|(_, due)| due)
    }

    pub fn on_move(&mut self, client_x: f64, client_y: f64, width: f64, height: f64, now_ms: u64) {
        if self.held.is_some() {
            return;
        }
        let pos = PointerPosition::from_client(client_x, client_y, width, height);
        self.held = Some((pos, now_ms + self.config.throttle_ms));
    }

    pub fn tick(&mut self, now_ms: u64) -> Option<Event> {
        let (pos, due) = self.held?;
        if now_ms < due {
            return None;
        }
        self.held = None;
        self.position = pos;
        Some(Event::PointerMoved {
            x: pos.x,
            y: pos.y,
            at_ms: due,
        })
    }
}
