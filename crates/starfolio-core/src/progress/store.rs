//! Progress store.
//!
//! Single owner of [`ProgressState`]. Every mutation goes through one of the
//! operations below; all of them are total. Unknown ids and duplicate
//! inserts are no-ops, never errors.
//!
//! ## Invariants
//!
//! - `unlocked` only ever goes from `false` to `true`.
//! - `unlocked_at` is written once, on that transition.
//! - Each progress set holds no duplicates.
//! - `konami_progress` never exceeds [`SECRET_WINDOW`] entries.

use tracing::{debug, info};

use super::state::{EyesMood, ProgressState, SECRET_WINDOW};
use crate::achievement::{Achievement, AchievementId};
use crate::error::ValidationError;
use crate::events::Event;
use crate::notification::Notification;

#[derive(Debug, Clone, Default)]
pub struct ProgressStore {
    state: ProgressState,
}

impl ProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap previously persisted state, realigned with the current catalog.
    pub fn from_state(mut state: ProgressState) -> Self {
        state.normalize();
        Self { state }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    pub fn achievements(&self) -> &[Achievement] {
        &self.state.achievements
    }

    pub fn is_achievement_unlocked(&self, id: AchievementId) -> bool {
        self.state.achievement(id).is_some_and(|a| a.unlocked)
    }

    pub fn unlocked_count(&self) -> usize {
        self.state.achievements.iter().filter(|a| a.unlocked).count()
    }

    /// Panel header, e.g. `"3/7"`.
    pub fn summary(&self) -> String {
        format!("{}/{}", self.unlocked_count(), self.state.achievements.len())
    }

    pub fn about_time_spent(&self) -> u64 {
        self.state.about_time_spent
    }

    pub fn konami_progress(&self) -> &[u32] {
        &self.state.konami_progress
    }

    pub fn eyes_mood(&self) -> EyesMood {
        self.state.eyes_mood
    }

    pub fn current_notification(&self) -> Option<&Notification> {
        self.state.current_notification.as_ref()
    }

    pub fn show_achievement_panel(&self) -> bool {
        self.state.show_achievement_panel
    }

    // ── Unlocks ──────────────────────────────────────────────────────

    /// Unlock `id` at `now_ms`.
    ///
    /// Returns the unlock event only for the first effective call; every
    /// later call leaves state untouched and returns `None`.
    pub fn unlock_achievement(&mut self, id: AchievementId, now_ms: u64) -> Option<Event> {
        let achievement = self.state.achievements.iter_mut().find(|a| a.id == id)?;
        if achievement.unlocked {
            debug!(achievement = %id, "already unlocked");
            return None;
        }
        achievement.unlocked = true;
        achievement.unlocked_at = Some(now_ms);
        info!(achievement = %id, at_ms = now_ms, "achievement unlocked");
        Some(Event::AchievementUnlocked { id, at_ms: now_ms })
    }

    /// Unlock by raw id. Unknown ids are ignored.
    pub fn unlock_named(&mut self, raw: &str, now_ms: u64) -> Option<Event> {
        match raw.parse::<AchievementId>() {
            Ok(id) => self.unlock_achievement(id, now_ms),
            Err(_) => {
                debug!(id = raw, "ignoring unlock for unknown achievement");
                None
            }
        }
    }

    /// Unlock by raw id, rejecting ids outside the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownAchievement`] for unknown ids.
    pub fn try_unlock_named(
        &mut self,
        raw: &str,
        now_ms: u64,
    ) -> Result<Option<Event>, ValidationError> {
        let id = raw.parse::<AchievementId>()?;
        Ok(self.unlock_achievement(id, now_ms))
    }

    // ── Progress sets ────────────────────────────────────────────────

    /// Returns `true` if `name` was not yet recorded.
    pub fn add_visited_section(&mut self, name: &str) -> bool {
        insert_unique(&mut self.state.visited_sections, name)
    }

    pub fn add_hovered_technology(&mut self, name: &str) -> bool {
        insert_unique(&mut self.state.hovered_technologies, name)
    }

    pub fn add_visited_project(&mut self, id: &str) -> bool {
        insert_unique(&mut self.state.visited_projects, id)
    }

    pub fn add_clicked_external_link(&mut self, name: &str) -> bool {
        insert_unique(&mut self.state.clicked_external_links, name)
    }

    // ── Setters ──────────────────────────────────────────────────────

    /// Overwrite, not add. The dwell timer passes its own running total.
    pub fn set_about_time_spent(&mut self, ms: u64) {
        self.state.about_time_spent = ms;
    }

    /// Append a key code and return the trailing window.
    pub fn add_konami_key(&mut self, code: u32) -> &[u32] {
        let window = &mut self.state.konami_progress;
        window.push(code);
        if window.len() > SECRET_WINDOW {
            let excess = window.len() - SECRET_WINDOW;
            window.drain(..excess);
        }
        window
    }

    pub fn reset_konami_progress(&mut self) {
        self.state.konami_progress.clear();
    }

    /// Returns `true` if the mood actually changed.
    pub fn set_eyes_mood(&mut self, mood: EyesMood) -> bool {
        if self.state.eyes_mood == mood {
            return false;
        }
        self.state.eyes_mood = mood;
        true
    }

    pub fn set_current_notification(&mut self, notification: Option<Notification>) {
        self.state.current_notification = notification;
    }

    pub fn set_show_achievement_panel(&mut self, show: bool) {
        self.state.show_achievement_panel = show;
    }
}

fn insert_unique(set: &mut Vec<String>, value: &str) -> bool {
    if set.iter().any(|v| v == value) {
        return false;
    }
    set.push(value.to_string());
    true
}
