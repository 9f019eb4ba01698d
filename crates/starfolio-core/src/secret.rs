//! Secret key sequence watcher.
//!
//! Every key code is appended to the store's trailing window. When the
//! window equals the target exactly, `king_mode` unlocks and the window is
//! cleared. There is no partial-progress bookkeeping: a wrong key simply
//! slides out of the window.
//!
//! Every match also shakes the screen for [`MATCH_SHAKE_MS`].

use tracing::info;

use crate::achievement::AchievementId;
use crate::events::Event;
use crate::progress::{rules, ProgressStore, SECRET_WINDOW};

/// ↑ ↑ ↓ ↓ ← → ← → B A as legacy key codes.
pub const SECRET_SEQUENCE: [u32; SECRET_WINDOW] = [38, 38, 40, 40, 37, 39, 37, 39, 66, 65];

pub const MATCH_SHAKE_MS: u64 = 500;

#[derive(Debug, Clone)]
pub struct SecretSequenceDetector {
    target: [u32; SECRET_WINDOW],
    reward: AchievementId,
    shake_until: Option<u64>,
}

impl Default for SecretSequenceDetector {
    fn default() -> Self {
        Self::new(SECRET_SEQUENCE)
    }
}

impl SecretSequenceDetector {
    pub fn new(target: [u32; SECRET_WINDOW]) -> Self {
        Self {
            target,
            reward: AchievementId::KingMode,
            shake_until: None,
        }
    }

    pub fn target(&self) -> &[u32] {
        &self.target
    }

    pub fn screen_shake(&self, now_ms: u64) -> bool {
        self.shake_until.is_some_and(|until| now_ms < until)
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.shake_until
    }

    pub fn tick(&mut self, now_ms: u64) {
        if self.shake_until.is_some_and(|until| now_ms >= until) {
            self.shake_until = None;
        }
    }

    pub fn cancel(&mut self) {
        self.shake_until = None;
    }

    pub fn on_key(&mut self, code: u32, now_ms: u64, store: &mut ProgressStore) -> Vec<Event> {
        let window = store.add_konami_key(code);
        if !rules::secret_sequence(window, &self.target) {
            return Vec::new();
        }

        info!("secret sequence entered");
        store.reset_konami_progress();
        self.shake_until = Some(now_ms + MATCH_SHAKE_MS);
        let mut events = vec![Event::SecretSequenceMatched { at_ms: now_ms }];
        events.extend(store.unlock_achievement(self.reward, now_ms));
        events
    }
}

/// Legacy key code for a key name as reported by the browser
/// (`"ArrowUp"`, `"b"`, `"Enter"`, ...).
pub fn key_code(name: &str) -> Option<u32> {
    let code = match name {
        "ArrowLeft" | "Left" => 37,
        "ArrowUp" | "Up" => 38,
        "ArrowRight" | "Right" => 39,
        "ArrowDown" | "Down" => 40,
        "Enter" => 13,
        "Escape" | "Esc" => 27,
        " " | "Space" | "Spacebar" => 32,
        "Backspace" => 8,
        "Tab" => 9,
        "Shift" => 16,
        "Control" => 17,
        "Alt" => 18,
        "F12" => 123,
        other => {
            let mut chars = other.chars();
            let c = chars.next()?;
            if chars.next().is_some() || !c.is_ascii_alphanumeric() {
                return None;
            }
            c.to_ascii_uppercase() as u32
        }
    };
    Some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(detector: &mut SecretSequenceDetector, store: &mut ProgressStore, codes: &[u32]) -> Vec<Event> {
        codes
            .iter()
            .flat_map(|&c| detector.on_key(c, 7, store))
            .collect()
    }

    #[test]
    fn exact_sequence_unlocks_and_resets_window() {
        let mut detector = SecretSequenceDetector::default();
        let mut store = ProgressStore::new();
        let events = feed(&mut detector, &mut store, &SECRET_SEQUENCE);
        assert_eq!(
            events,
            vec![
                Event::SecretSequenceMatched { at_ms: 7 },
                Event::AchievementUnlocked {
                    id: AchievementId::KingMode,
                    at_ms: 7
                },
            ]
        );
        assert!(store.konami_progress().is_empty());
    }

    #[test]
    fn noise_before_sequence_still_matches() {
        let mut detector = SecretSequenceDetector::default();
        let mut store = ProgressStore::new();
        feed(&mut detector, &mut store, &[65, 66, 38, 38, 13]);
        feed(&mut detector, &mut store, &SECRET_SEQUENCE);
        assert!(store.is_achievement_unlocked(AchievementId::KingMode));
    }

    #[test]
    fn any_single_altered_code_fails() {
        let mut detector = SecretSequenceDetector::default();
        for i in 0..SECRET_WINDOW {
            let mut store = ProgressStore::new();
            let mut codes = SECRET_SEQUENCE;
            codes[i] = 13;
            feed(&mut detector, &mut store, &codes);
            assert!(!store.is_achievement_unlocked(AchievementId::KingMode), "slot {i}");
        }
    }

    #[test]
    fn second_entry_matches_but_does_not_unlock_again() {
        let mut detector = SecretSequenceDetector::default();
        let mut store = ProgressStore::new();
        feed(&mut detector, &mut store, &SECRET_SEQUENCE);
        let events = feed(&mut detector, &mut store, &SECRET_SEQUENCE);
        assert_eq!(events, vec![Event::SecretSequenceMatched { at_ms: 7 }]);
    }

    #[test]
    fn match_shakes_for_half_a_second() {
        let mut detector = SecretSequenceDetector::default();
        let mut store = ProgressStore::new();
        feed(&mut detector, &mut store, &SECRET_SEQUENCE[..SECRET_WINDOW - 1]);
        assert!(detector.next_deadline().is_none());
        detector.on_key(65, 1_000, &mut store);
        assert!(detector.screen_shake(1_000));
        assert!(detector.screen_shake(1_499));
        assert!(!detector.screen_shake(1_500));
        assert_eq!(detector.next_deadline(), Some(1_500));
        detector.tick(1_500);
        assert!(detector.next_deadline().is_none());
    }

    #[test]
    fn key_names_map_to_legacy_codes() {
        let codes: Vec<u32> = [
            "ArrowUp", "ArrowUp", "ArrowDown", "ArrowDown", "ArrowLeft", "ArrowRight",
            "ArrowLeft", "ArrowRight", "b", "a",
        ]
        .iter()
        .filter_map(|k| key_code(k))
        .collect();
        assert_eq!(codes, SECRET_SEQUENCE);
        assert_eq!(key_code("Z"), Some(90));
        assert_eq!(key_code("!"), None);
        assert_eq!(key_code("Meta"), None);
    }
}
