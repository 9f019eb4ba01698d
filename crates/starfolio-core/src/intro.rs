//! Intro sequencer.
//!
//! A one-shot, time-driven state machine. The caller starts it and then
//! calls `tick()`; it never reverses and takes no user input.
//!
//! ## Timeline
//!
//! ```text
//! start ─┬─ letter every letter_interval_ms ─┬─ all letters visible (t0)
//!        │                                   ├─ t0 + glow_delay_ms      glow
//!        │                                   ├─ t0 + subtitle_delay_ms  subtitle
//!        │                                   ├─ t0 + fade_delay_ms      fade out
//!        │                                   └─ t0 + complete_delay_ms  complete
//! ```
//!
//! ## States
//!
//! ```text
//! Idle -> RevealingLetters -> GlowDelay -> SubtitleDelay -> Holding -> FadeOut -> Complete
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::events::Event;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntroConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_subtitle")]
    pub subtitle: String,
    #[serde(default = "default_letter_interval_ms")]
    pub letter_interval_ms: u64,
    /// Delays below are measured from the last letter becoming visible.
    #[serde(default = "default_glow_delay_ms")]
    pub glow_delay_ms: u64,
    #[serde(default = "default_subtitle_delay_ms")]
    pub subtitle_delay_ms: u64,
    #[serde(default = "default_fade_delay_ms")]
    pub fade_delay_ms: u64,
    #[serde(default = "default_complete_delay_ms")]
    pub complete_delay_ms: u64,
    /// After completion, how long the intro overlay stays on top of home.
    #[serde(default = "default_overlay_linger_ms")]
    pub overlay_linger_ms: u64,
    /// After the overlay is gone (or the intro was skipped), home reveal delay.
    #[serde(default = "default_home_reveal_ms")]
    pub home_reveal_ms: u64,
}

fn default_title() -> String {
    "Canpolat Kaya".into()
}
fn default_subtitle() -> String {
    "Full Stack Developer".into()
}
fn default_letter_interval_ms() -> u64 {
    150
}
fn default_glow_delay_ms() -> u64 {
    500
}
fn default_subtitle_delay_ms() -> u64 {
    1_000
}
fn default_fade_delay_ms() -> u64 {
    3_000
}
fn default_complete_delay_ms() -> u64 {
    4_000
}
fn default_overlay_linger_ms() -> u64 {
    500
}
fn default_home_reveal_ms() -> u64 {
    100
}

impl Default for IntroConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            subtitle: default_subtitle(),
            letter_interval_ms: default_letter_interval_ms(),
            glow_delay_ms: default_glow_delay_ms(),
            subtitle_delay_ms: default_subtitle_delay_ms(),
            fade_delay_ms: default_fade_delay_ms(),
            complete_delay_ms: default_complete_delay_ms(),
            overlay_linger_ms: default_overlay_linger_ms(),
            home_reveal_ms: default_home_reveal_ms(),
        }
    }
}

/// Session flags for the intro.
///
/// Persisted with [`PersistPolicy::None`](crate::PersistPolicy::None) by
/// default, so `has_seen_intro` resets on every launch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntroState {
    pub has_seen_intro: bool,
    pub intro_complete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntroPhase {
    Idle,
    RevealingLetters,
    /// All letters visible, glow not yet on.
    GlowDelay,
    /// Glow on, subtitle not yet shown.
    SubtitleDelay,
    /// Subtitle shown, waiting for the fade.
    Holding,
    FadeOut,
    Complete,
}

type CompletionCallback = Box<dyn FnOnce() + Send>;

pub struct IntroSequencer {
    config: IntroConfig,
    title_len: usize,
    phase: IntroPhase,
    started_at: Option<u64>,
    visible_letters: usize,
    glow: bool,
    subtitle: bool,
    fading: bool,
    cancelled: bool,
    on_complete: Option<CompletionCallback>,
}

impl std::fmt::Debug for IntroSequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntroSequencer")
            .field("phase", &self.phase)
            .field("started_at", &self.started_at)
            .field("visible_letters", &self.visible_letters)
            .field("glow", &self.glow)
            .field("subtitle", &self.subtitle)
            .field("fading", &self.fading)
            .field("cancelled", &self.cancelled)
            .finish_non_exhaustive()
    }
}

impl IntroSequencer {
    pub fn new(config: IntroConfig) -> Self {
        let title_len = config.title.chars().count();
        Self {
            config,
            title_len,
            phase: IntroPhase::Idle,
            started_at: None,
            visible_letters: 0,
            glow: false,
            subtitle: false,
            fading: false,
            cancelled: false,
            on_complete: None,
        }
    }

    /// Register the callback invoked once when the sequence completes.
    pub fn on_complete(mut self, callback: impl FnOnce() + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> IntroPhase {
        self.phase
    }

    pub fn title(&self) -> &str {
        &self.config.title
    }

    pub fn subtitle(&self) -> &str {
        &self.config.subtitle
    }

    pub fn visible_letters(&self) -> usize {
        self.visible_letters
    }

    /// The visible prefix of the title.
    pub fn visible_title(&self) -> String {
        self.config.title.chars().take(self.visible_letters).collect()
    }

    pub fn glow(&self) -> bool {
        self.glow
    }

    pub fn subtitle_visible(&self) -> bool {
        self.subtitle
    }

    pub fn fading(&self) -> bool {
        self.fading
    }

    pub fn is_complete(&self) -> bool {
        self.phase == IntroPhase::Complete
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some() && !self.cancelled && !self.is_complete()
    }

    /// Instant at which the last letter becomes visible.
    pub fn letters_done_at(&self) -> Option<u64> {
        self.started_at
            .map(|s| s + self.title_len as u64 * self.config.letter_interval_ms)
    }

    /// Instant at which the completion fires.
    pub fn completes_at(&self) -> Option<u64> {
        self.letters_done_at()
            .map(|t0| t0 + self.config.complete_delay_ms)
    }

    /// Instant of the next pending transition, if the sequence is running.
    pub fn next_deadline(&self) -> Option<u64> {
        if !self.is_running() {
            return None;
        }
        let start = self.started_at?;
        let interval = self.config.letter_interval_ms;
        if self.visible_letters < self.title_len {
            return Some(start + (self.visible_letters as u64 + 1) * interval);
        }
        let t0 = start + self.title_len as u64 * interval;
        let c = &self.config;
        let delay = match self.phase {
            IntroPhase::RevealingLetters => 0,
            IntroPhase::GlowDelay => c.glow_delay_ms,
            IntroPhase::SubtitleDelay => c.subtitle_delay_ms,
            IntroPhase::Holding => c.fade_delay_ms,
            IntroPhase::FadeOut => c.complete_delay_ms,
            IntroPhase::Idle | IntroPhase::Complete => return None,
        };
        Some(t0 + delay)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin the sequence. A second call while running or after
    /// completion is ignored.
    pub fn start(&mut self, now_ms: u64) -> Vec<Event> {
        if self.started_at.is_some() {
            debug!("intro already started");
            return Vec::new();
        }
        self.started_at = Some(now_ms);
        self.phase = IntroPhase::RevealingLetters;
        info!(title_len = self.title_len, "intro started");
        self.tick(now_ms)
    }

    /// Start over from zero visible letters. Completion fires again for the
    /// new run only if a callback is registered again.
    pub fn restart(&mut self, now_ms: u64) -> Vec<Event> {
        self.phase = IntroPhase::Idle;
        self.started_at = None;
        self.visible_letters = 0;
        self.glow = false;
        self.subtitle = false;
        self.fading = false;
        self.cancelled = false;
        self.start(now_ms)
    }

    /// Drop all pending transitions (unmount). Nothing fires afterwards.
    pub fn cancel(&mut self) {
        if self.is_running() {
            debug!(phase = ?self.phase, "intro cancelled");
        }
        self.cancelled = true;
        self.on_complete = None;
    }

    /// Apply every transition due at or before `now_ms`.
    pub fn tick(&mut self, now_ms: u64) -> Vec<Event> {
        let mut events = Vec::new();
        let Some(start) = self.started_at else {
            return events;
        };
        if self.cancelled || self.is_complete() {
            return events;
        }

        let interval = self.config.letter_interval_ms;
        let due_letters = if interval == 0 {
            self.title_len
        } else {
            let elapsed = now_ms.saturating_sub(start);
            ((elapsed / interval) as usize).min(self.title_len)
        };
        while self.visible_letters < due_letters {
            self.visible_letters += 1;
            events.push(Event::IntroLetterRevealed {
                visible: self.visible_letters,
                at_ms: start + self.visible_letters as u64 * interval,
            });
        }

        if self.visible_letters < self.title_len {
            return events;
        }
        let t0 = start + self.title_len as u64 * interval;
        if self.phase == IntroPhase::RevealingLetters {
            self.phase = IntroPhase::GlowDelay;
        }

        let c = &self.config;
        let steps = [
            (c.glow_delay_ms, IntroPhase::GlowDelay),
            (c.subtitle_delay_ms, IntroPhase::SubtitleDelay),
            (c.fade_delay_ms, IntroPhase::Holding),
            (c.complete_delay_ms, IntroPhase::FadeOut),
        ];
        for (delay, from) in steps {
            let due = t0 + delay;
            if self.phase != from {
                continue;
            }
            if now_ms < due {
                break;
            }
            self.advance(from, due, &mut events);
        }
        events
    }

    fn advance(&mut self, from: IntroPhase, at_ms: u64, events: &mut Vec<Event>) {
        match from {
            IntroPhase::GlowDelay => {
                self.glow = true;
                self.phase = IntroPhase::SubtitleDelay;
                events.push(Event::IntroGlow { at_ms });
            }
            IntroPhase::SubtitleDelay => {
                self.subtitle = true;
                self.phase = IntroPhase::Holding;
                events.push(Event::IntroSubtitle { at_ms });
            }
            IntroPhase::Holding => {
                self.fading = true;
                self.phase = IntroPhase::FadeOut;
                events.push(Event::IntroFadeOut { at_ms });
            }
            IntroPhase::FadeOut => {
                self.phase = IntroPhase::Complete;
                info!(at_ms, "intro complete");
                events.push(Event::IntroCompleted { at_ms });
                if let Some(callback) = self.on_complete.take() {
                    callback();
                }
            }
            IntroPhase::Idle | IntroPhase::RevealingLetters | IntroPhase::Complete => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counted() -> (IntroSequencer, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        let seq = IntroSequencer::new(IntroConfig::default()).on_complete(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        (seq, calls)
    }

    #[test]
    fn letters_reveal_every_interval() {
        let (mut seq, _) = counted();
        seq.start(0);
        assert_eq!(seq.visible_letters(), 0);
        seq.tick(149);
        assert_eq!(seq.visible_letters(), 0);
        seq.tick(150);
        assert_eq!(seq.visible_letters(), 1);
        seq.tick(1_949);
        assert_eq!(seq.visible_letters(), 12);
        seq.tick(1_950);
        assert_eq!(seq.visible_letters(), 13);
        assert_eq!(seq.visible_title(), "Canpolat Kaya");
        assert_eq!(seq.phase(), IntroPhase::GlowDelay);
    }

    #[test]
    fn phases_follow_last_letter() {
        let (mut seq, calls) = counted();
        seq.start(0);
        seq.tick(2_449);
        assert!(!seq.glow());
        seq.tick(2_450);
        assert!(seq.glow());
        seq.tick(2_950);
        assert!(seq.subtitle_visible());
        assert_eq!(seq.phase(), IntroPhase::Holding);
        seq.tick(4_950);
        assert!(seq.fading());
        seq.tick(5_949);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        let events = seq.tick(5_950);
        assert_eq!(events, vec![Event::IntroCompleted { at_ms: 5_950 }]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(seq.completes_at(), Some(5_950));
    }

    #[test]
    fn completion_fires_once_under_spurious_ticks() {
        let (mut seq, calls) = counted();
        seq.start(0);
        let mut fired = 0;
        for i in 0..200u64 {
            fired += seq.tick(5_000 + i * 37).len();
        }
        assert!(seq.start(9_000).is_empty());
        assert!(seq.tick(99_999).is_empty());
        assert!(fired > 0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(seq.is_complete());
    }

    #[test]
    fn single_late_tick_emits_everything_in_order() {
        let (mut seq, _) = counted();
        let mut events = seq.start(1_000);
        events.extend(seq.tick(100_000));
        assert_eq!(events.len(), 13 + 4);
        let stamps: Vec<u64> = events.iter().map(Event::at_ms).collect();
        let mut sorted = stamps.clone();
        sorted.sort_unstable();
        assert_eq!(stamps, sorted);
        assert_eq!(*stamps.last().unwrap(), 1_000 + 1_950 + 4_000);
    }

    #[test]
    fn cancel_suppresses_completion() {
        let (mut seq, calls) = counted();
        seq.start(0);
        seq.tick(3_000);
        seq.cancel();
        assert!(seq.tick(10_000).is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!seq.is_complete());
    }

    #[test]
    fn restart_resets_letters() {
        let (mut seq, _) = counted();
        seq.start(0);
        seq.tick(900);
        assert_eq!(seq.visible_letters(), 6);
        seq.restart(1_000);
        assert_eq!(seq.visible_letters(), 0);
        seq.tick(1_150);
        assert_eq!(seq.visible_letters(), 1);
    }

    #[test]
    fn empty_title_goes_straight_to_delays() {
        let config = IntroConfig {
            title: String::new(),
            ..IntroConfig::default()
        };
        let mut seq = IntroSequencer::new(config);
        seq.start(0);
        assert_eq!(seq.phase(), IntroPhase::GlowDelay);
        seq.tick(4_000);
        assert!(seq.is_complete());
    }
}
