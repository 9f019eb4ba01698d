use serde::{Deserialize, Serialize};

use crate::achievement::AchievementId;
use crate::navigation::Section;
use crate::progress::EyesMood;

/// Every state change in the system produces an Event.
/// The presentation layer drains them after each input or tick.
///
/// `at_ms` is the instant the change was scheduled for, which can be earlier
/// than the tick that observed it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    IntroLetterRevealed {
        visible: usize,
        at_ms: u64,
    },
    IntroGlow {
        at_ms: u64,
    },
    IntroSubtitle {
        at_ms: u64,
    },
    IntroFadeOut {
        at_ms: u64,
    },
    IntroCompleted {
        at_ms: u64,
    },
    /// Home page finished its reveal and accepts the full UI.
    HomeReady {
        bypassed_intro: bool,
        at_ms: u64,
    },
    SectionEntered {
        from: Section,
        to: Section,
        at_ms: u64,
    },
    /// Request dropped by the transition cooldown.
    NavigationRejected {
        requested: Section,
        at_ms: u64,
    },
    ReturnedHome {
        from: Section,
        at_ms: u64,
    },
    AchievementUnlocked {
        id: AchievementId,
        at_ms: u64,
    },
    ToastShown {
        toast_id: u64,
        achievement: AchievementId,
        at_ms: u64,
    },
    ToastExpired {
        toast_id: u64,
        achievement: AchievementId,
        at_ms: u64,
    },
    NotificationTriggered {
        kind: String,
        at_ms: u64,
    },
    /// A pending or visible notification was replaced before it cleared.
    NotificationSuperseded {
        kind: String,
        at_ms: u64,
    },
    NotificationShown {
        kind: String,
        at_ms: u64,
    },
    NotificationHidden {
        kind: String,
        at_ms: u64,
    },
    NotificationCleared {
        kind: String,
        at_ms: u64,
    },
    MoodChanged {
        mood: EyesMood,
        at_ms: u64,
    },
    DevToolsOpened {
        at_ms: u64,
    },
    DevToolsClosed {
        at_ms: u64,
    },
    SecretSequenceMatched {
        at_ms: u64,
    },
    DwellCommitted {
        section: Section,
        total_ms: u64,
        at_ms: u64,
    },
    PointerMoved {
        x: f64,
        y: f64,
        at_ms: u64,
    },
}

impl Event {
    pub fn at_ms(&self) -> u64 {
        match self {
            Event::IntroLetterRevealed { at_ms, .. }
            | Event::IntroGlow { at_ms }
            | Event::IntroSubtitle { at_ms }
            | Event::IntroFadeOut { at_ms }
            | Event::IntroCompleted { at_ms }
            | Event::HomeReady { at_ms, .. }
            | Event::SectionEntered { at_ms, .. }
            | Event::NavigationRejected { at_ms, .. }
            | Event::ReturnedHome { at_ms, .. }
            | Event::AchievementUnlocked { at_ms, .. }
            | Event::ToastShown { at_ms, .. }
            | Event::ToastExpired { at_ms, .. }
            | Event::NotificationTriggered { at_ms, .. }
            | Event::NotificationSuperseded { at_ms, .. }
            | Event::NotificationShown { at_ms, .. }
            | Event::NotificationHidden { at_ms, .. }
            | Event::NotificationCleared { at_ms, .. }
            | Event::MoodChanged { at_ms, .. }
            | Event::DevToolsOpened { at_ms }
            | Event::DevToolsClosed { at_ms }
            | Event::SecretSequenceMatched { at_ms }
            | Event::DwellCommitted { at_ms, .. }
            | Event::PointerMoved { at_ms, .. } => *at_ms,
        }
    }
}
