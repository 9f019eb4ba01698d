//! Dwell timer.
//!
//! While a section is mounted, commits `base + elapsed` into the store every
//! sampling interval. `base` is the stored total at mount time. Crossing the
//! threshold unlocks the reward and stops sampling at once; unmount always
//! commits the final total.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::achievement::AchievementId;
use crate::events::Event;
use crate::navigation::Section;
use crate::progress::{rules, ProgressStore};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DwellConfig {
    #[serde(default = "default_sample_interval_ms")]
    pub sample_interval_ms: u64,
    #[serde(default = "default_threshold_ms")]
    pub threshold_ms: u64,
}

fn default_sample_interval_ms() -> u64 {
    1_000
}
fn default_threshold_ms() -> u64 {
    60_000
}

impl Default for DwellConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: default_sample_interval_ms(),
            threshold_ms: default_threshold_ms(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Mount {
    at_ms: u64,
    base_ms: u64,
    next_sample_ms: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct DwellTimer {
    config: DwellConfig,
    section: Section,
    reward: AchievementId,
    mount: Option<Mount>,
}

impl DwellTimer {
    /// Dwell tracking for the About section, rewarding `fast_reader`.
    pub fn about(config: DwellConfig) -> Self {
        Self {
            config,
            section: Section::About,
            reward: AchievementId::FastReader,
            mount: None,
        }
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn is_mounted(&self) -> bool {
        self.mount.is_some()
    }

    pub fn is_sampling(&self) -> bool {
        self.mount.is_some_and(|m| m.next_sample_ms.is_some())
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.mount.and_then(|m| m.next_sample_ms)
    }

    pub fn mount(&mut self, now_ms: u64, store: &ProgressStore) {
        if self.mount.is_some() {
            return;
        }
        let interval = self.config.sample_interval_ms.max(1);
        self.mount = Some(Mount {
            at_ms: now_ms,
            base_ms: store.about_time_spent(),
            next_sample_ms: Some(now_ms + interval),
        });
        debug!(section = %self.section, base_ms = store.about_time_spent(), "dwell timer mounted");
    }

    pub fn tick(&mut self, now_ms: u64, store: &mut ProgressStore) -> Vec<Event> {
        let mut events = Vec::new();
        let interval = self.config.sample_interval_ms.max(1);
        let Some(mount) = self.mount.as_mut() else {
            return events;
        };

        while let Some(sample_at) = mount.next_sample_ms {
            if now_ms < sample_at {
                break;
            }
            let total = mount.base_ms + (sample_at - mount.at_ms);
            store.set_about_time_spent(total);
            events.push(Event::DwellCommitted {
                section: self.section,
                total_ms: total,
                at_ms: sample_at,
            });

            if rules::fast_reader(store.state(), self.config.threshold_ms) {
                events.extend(store.unlock_achievement(self.reward, sample_at));
                mount.next_sample_ms = None;
            } else {
                mount.next_sample_ms = Some(sample_at + interval);
            }
        }
        events
    }

    /// Final commit of the time since mount.
    pub fn unmount(&mut self, now_ms: u64, store: &mut ProgressStore) -> Vec<Event> {
        let mut events = self.tick(now_ms, store);
        if let Some(mount) = self.mount.take() {
            let total = mount.base_ms + now_ms.saturating_sub(mount.at_ms);
            store.set_about_time_spent(total);
            events.push(Event::DwellCommitted {
                section: self.section,
                total_ms: total,
                at_ms: now_ms,
            });
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unlocked(store: &ProgressStore) -> bool {
        store.is_achievement_unlocked(AchievementId::FastReader)
    }

    #[test]
    fn samples_every_interval() {
        let mut store = ProgressStore::new();
        let mut timer = DwellTimer::about(DwellConfig::default());
        timer.mount(10_000, &store);
        assert!(timer.tick(10_999, &mut store).is_empty());
        timer.tick(11_000, &mut store);
        assert_eq!(store.about_time_spent(), 1_000);
        let events = timer.tick(13_500, &mut store);
        assert_eq!(events.len(), 2);
        assert_eq!(store.about_time_spent(), 3_000);
    }

    #[test]
    fn unmount_flushes_partial_interval_and_base_accumulates() {
        let mut store = ProgressStore::new();
        let mut timer = DwellTimer::about(DwellConfig::default());
        timer.mount(0, &store);
        timer.unmount(2_400, &mut store);
        assert_eq!(store.about_time_spent(), 2_400);
        assert!(!timer.is_mounted());

        timer.mount(50_000, &store);
        timer.unmount(51_100, &mut store);
        assert_eq!(store.about_time_spent(), 3_500);
    }

    #[test]
    fn threshold_unlocks_and_stops_sampling() {
        let mut store = ProgressStore::new();
        store.set_about_time_spent(58_500);
        let mut timer = DwellTimer::about(DwellConfig::default());
        timer.mount(0, &store);
        timer.tick(1_000, &mut store);
        assert!(!unlocked(&store));
        timer.tick(2_000, &mut store);
        assert!(unlocked(&store));
        assert_eq!(store.about_time_spent(), 60_500);
        assert!(!timer.is_sampling());
        assert!(timer.tick(30_000, &mut store).is_empty());

        timer.unmount(31_000, &mut store);
        assert_eq!(store.about_time_spent(), 89_500);
    }

    #[test]
    fn committed_total_never_decreases_while_mounted() {
        let mut store = ProgressStore::new();
        let mut timer = DwellTimer::about(DwellConfig::default());
        timer.mount(0, &store);
        let mut last = 0;
        for now in (0..70_000).step_by(333) {
            timer.tick(now, &mut store);
            assert!(store.about_time_spent() >= last);
            last = store.about_time_spent();
        }
        assert!(unlocked(&store));
    }
}
