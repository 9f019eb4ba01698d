//! Single-slot contextual notification.
//!
//! ```text
//! trigger ──shake_ms──▶ Visible ──(hold_ms from trigger)──▶ Hiding ──clear_ms──▶ cleared
//! ```
//!
//! All deadlines are measured from the trigger instant. Triggering again
//! drops the current cycle, so none of its deadlines can fire.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Notification;
use crate::events::Event;
use crate::progress::{EyesMood, ProgressStore};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationTimings {
    /// Screen shake before the notification slides in.
    #[serde(default = "default_shake_ms")]
    pub shake_ms: u64,
    /// From trigger until the notification starts hiding.
    #[serde(default = "default_hold_ms")]
    pub hold_ms: u64,
    /// Exit animation before the slot is emptied.
    #[serde(default = "default_clear_ms")]
    pub clear_ms: u64,
}

fn default_shake_ms() -> u64 {
    600
}
fn default_hold_ms() -> u64 {
    4_500
}
fn default_clear_ms() -> u64 {
    500
}

impl Default for NotificationTimings {
    fn default() -> Self {
        Self {
            shake_ms: default_shake_ms(),
            hold_ms: default_hold_ms(),
            clear_ms: default_clear_ms(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPhase {
    Shaking,
    Visible,
    Hiding,
}

#[derive(Debug, Clone)]
struct Active {
    notification: Notification,
    triggered_at: u64,
    phase: NotificationPhase,
}

#[derive(Debug, Clone, Default)]
pub struct ContextualNotifier {
    timings: NotificationTimings,
    active: Option<Active>,
}

impl ContextualNotifier {
    pub fn new(timings: NotificationTimings) -> Self {
        Self {
            timings,
            active: None,
        }
    }

    pub fn current(&self) -> Option<&Notification> {
        self.active.as_ref().map(|a| &a.notification)
    }

    pub fn phase(&self) -> Option<NotificationPhase> {
        self.active.as_ref().map(|a| a.phase)
    }

    pub fn is_visible(&self) -> bool {
        self.phase() == Some(NotificationPhase::Visible)
    }

    pub fn is_shaking(&self) -> bool {
        self.phase() == Some(NotificationPhase::Shaking)
    }

    /// Instant of the next phase change of the current cycle.
    pub fn next_deadline(&self) -> Option<u64> {
        let active = self.active.as_ref()?;
        let t = &self.timings;
        let offset = match active.phase {
            NotificationPhase::Shaking => t.shake_ms.min(t.hold_ms),
            NotificationPhase::Visible => t.hold_ms,
            NotificationPhase::Hiding => t.hold_ms + t.clear_ms,
        };
        Some(active.triggered_at + offset)
    }

    /// Start a fresh cycle for `notification`, superseding any current one.
    pub fn trigger(
        &mut self,
        notification: Notification,
        now_ms: u64,
        store: &mut ProgressStore,
    ) -> Vec<Event> {
        let mut events = Vec::new();
        if let Some(prev) = self.active.take() {
            debug!(kind = %prev.notification.kind, "superseding notification");
            events.push(Event::NotificationSuperseded {
                kind: prev.notification.kind,
                at_ms: now_ms,
            });
        }

        events.push(Event::NotificationTriggered {
            kind: notification.kind.clone(),
            at_ms: now_ms,
        });
        store.set_current_notification(Some(notification.clone()));
        set_mood(store, EyesMood::Alert, now_ms, &mut events);

        self.active = Some(Active {
            notification,
            triggered_at: now_ms,
            phase: NotificationPhase::Shaking,
        });
        events
    }

    /// Fire every phase change due at or before `now_ms`.
    pub fn tick(&mut self, now_ms: u64, store: &mut ProgressStore) -> Vec<Event> {
        let mut events = Vec::new();
        let timings = &self.timings;

        while let Some(active) = self.active.as_mut() {
            let t0 = active.triggered_at;
            let kind = active.notification.kind.clone();
            match active.phase {
                NotificationPhase::Shaking => {
                    // Reveal before hide even if the hold is shorter than the shake.
                    let due = t0 + timings.shake_ms.min(timings.hold_ms);
                    if now_ms < due {
                        break;
                    }
                    active.phase = NotificationPhase::Visible;
                    events.push(Event::NotificationShown {
                        kind: kind.clone(),
                        at_ms: due,
                    });
                    if let Some(mood) = reveal_mood(&kind) {
                        set_mood(store, mood, due, &mut events);
                    }
                }
                NotificationPhase::Visible => {
                    let due = t0 + timings.hold_ms;
                    if now_ms < due {
                        break;
                    }
                    active.phase = NotificationPhase::Hiding;
                    events.push(Event::NotificationHidden { kind, at_ms: due });
                    set_mood(store, EyesMood::Cold, due, &mut events);
                }
                NotificationPhase::Hiding => {
                    let due = t0 + timings.hold_ms + timings.clear_ms;
                    if now_ms < due {
                        break;
                    }
                    self.active = None;
                    store.set_current_notification(None);
                    events.push(Event::NotificationCleared { kind, at_ms: due });
                }
            }
        }
        events
    }

    /// Drop the current cycle and empty the slot (unmount).
    pub fn cancel(&mut self, store: &mut ProgressStore) {
        if let Some(prev) = self.active.take() {
            debug!(kind = %prev.notification.kind, "notification cancelled");
        }
        store.set_current_notification(None);
    }
}

fn reveal_mood(kind: &str) -> Option<EyesMood> {
    match kind {
        "about" => Some(EyesMood::Soft),
        "technologies" | "projects" => Some(EyesMood::Happy),
        _ => None,
    }
}

fn set_mood(store: &mut ProgressStore, mood: EyesMood, at_ms: u64, events: &mut Vec<Event>) {
    if store.set_eyes_mood(mood) {
        events.push(Event::MoodChanged { mood, at_ms });
    }
}
