//! Stackable unlock toasts.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::chime::{Chime, SilentChime, LEVEL_UP};
use crate::achievement::Achievement;
use crate::events::Event;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToastTimings {
    #[serde(default = "default_toast_ms")]
    pub duration_ms: u64,
    #[serde(default = "default_true")]
    pub chime_enabled: bool,
}

fn default_toast_ms() -> u64 {
    4_000
}
fn default_true() -> bool {
    true
}

impl Default for ToastTimings {
    fn default() -> Self {
        Self {
            duration_ms: default_toast_ms(),
            chime_enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toast {
    /// Unique per queue, strictly increasing from 1.
    pub id: u64,
    pub achievement: Achievement,
    pub shown_at_ms: u64,
    pub expires_at_ms: u64,
}

pub struct ToastQueue {
    timings: ToastTimings,
    toasts: Vec<Toast>,
    last_id: u64,
    chime: Box<dyn Chime>,
}

impl std::fmt::Debug for ToastQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToastQueue")
            .field("timings", &self.timings)
            .field("toasts", &self.toasts)
            .field("last_id", &self.last_id)
            .finish_non_exhaustive()
    }
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(ToastTimings::default(), Box::new(SilentChime))
    }
}

impl ToastQueue {
    pub fn new(timings: ToastTimings, chime: Box<dyn Chime>) -> Self {
        Self {
            timings,
            toasts: Vec::new(),
            last_id: 0,
            chime,
        }
    }

    pub fn set_chime(&mut self, chime: Box<dyn Chime>) {
        self.chime = chime;
    }

    /// Visible toasts, oldest first.
    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.toasts.iter().map(|t| t.expires_at_ms).min()
    }

    /// Show a toast for `achievement` and play the chime.
    ///
    /// A chime failure is logged and otherwise ignored.
    pub fn push(&mut self, achievement: Achievement, now_ms: u64) -> Event {
        self.last_id += 1;
        let id = self.last_id;
        let event = Event::ToastShown {
            toast_id: id,
            achievement: achievement.id,
            at_ms: now_ms,
        };
        self.toasts.push(Toast {
            id,
            achievement,
            shown_at_ms: now_ms,
            expires_at_ms: now_ms + self.timings.duration_ms,
        });

        if self.timings.chime_enabled {
            if let Err(e) = self.chime.play(LEVEL_UP) {
                warn!(error = %e, "unlock chime failed");
            }
        }
        event
    }

    /// Remove every toast whose own timer has run out, in expiry order.
    pub fn tick(&mut self, now_ms: u64) -> Vec<Event> {
        let (mut expired, kept): (Vec<Toast>, Vec<Toast>) = std::mem::take(&mut self.toasts)
            .into_iter()
            .partition(|t| t.expires_at_ms <= now_ms);
        self.toasts = kept;
        expired.sort_by_key(|t| (t.expires_at_ms, t.id));
        expired
            .into_iter()
            .map(|t| {
                debug!(toast_id = t.id, achievement = %t.achievement.id, "toast expired");
                Event::ToastExpired {
                    toast_id: t.id,
                    achievement: t.achievement.id,
                    at_ms: t.expires_at_ms,
                }
            })
            .collect()
    }

    /// Drop all toasts (unmount). Ids keep counting.
    pub fn clear(&mut self) {
        self.toasts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChimeError;
    use crate::notification::ChimeTone;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct BrokenChime(Arc<AtomicUsize>);

    impl Chime for BrokenChime {
        fn play(&self, _tones: &[ChimeTone]) -> Result<(), ChimeError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Err(ChimeError::Unavailable("no audio device".into()))
        }
    }

    fn achievement(i: usize) -> Achievement {
        Achievement::catalog().remove(i)
    }

    #[test]
    fn toasts_expire_independently() {
        let mut queue = ToastQueue::default();
        queue.push(achievement(0), 0);
        queue.push(achievement(1), 1_500);
        assert_eq!(queue.toasts().len(), 2);

        let first = queue.tick(4_000);
        assert_eq!(first.len(), 1);
        assert_eq!(queue.toasts().len(), 1);
        assert_eq!(queue.toasts()[0].id, 2);

        assert!(queue.tick(5_499).is_empty());
        assert_eq!(queue.tick(5_500).len(), 1);
        assert!(queue.toasts().is_empty());
    }

    #[test]
    fn ids_increase_monotonically() {
        let mut queue = ToastQueue::default();
        let ids: Vec<u64> = (0..3)
            .map(|i| match queue.push(achievement(i), 0) {
                Event::ToastShown { toast_id, .. } => toast_id,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(ids, [1, 2, 3]);
        queue.clear();
        match queue.push(achievement(3), 0) {
            Event::ToastShown { toast_id, .. } => assert_eq!(toast_id, 4),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn failing_chime_does_not_block_toast() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut queue = ToastQueue::new(
            ToastTimings::default(),
            Box::new(BrokenChime(calls.clone())),
        );
        queue.push(achievement(5), 10);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(queue.toasts().len(), 1);
    }

    #[test]
    fn disabled_chime_is_not_called() {
        let calls = Arc::new(AtomicUsize::new(0));
        let timings = ToastTimings {
            chime_enabled: false,
            ..ToastTimings::default()
        };
        let mut queue = ToastQueue::new(timings, Box::new(BrokenChime(calls.clone())));
        queue.push(achievement(0), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
