use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::achievement::{Achievement, AchievementId};
use crate::error::ValidationError;
use crate::notification::Notification;

/// Length of the trailing key window kept for the secret sequence.
pub const SECRET_WINDOW: usize = 10;

/// Display-only mood of the ambient eyes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EyesMood {
    #[default]
    Cold,
    Soft,
    Alert,
    Happy,
    Angry,
}

impl EyesMood {
    pub fn as_str(self) -> &'static str {
        match self {
            EyesMood::Cold => "cold",
            EyesMood::Soft => "soft",
            EyesMood::Alert => "alert",
            EyesMood::Happy => "happy",
            EyesMood::Angry => "angry",
        }
    }
}

impl fmt::Display for EyesMood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EyesMood {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cold" => Ok(EyesMood::Cold),
            "soft" => Ok(EyesMood::Soft),
            "alert" => Ok(EyesMood::Alert),
            "happy" => Ok(EyesMood::Happy),
            "angry" => Ok(EyesMood::Angry),
            _ => Err(ValidationError::UnknownMood(s.to_string())),
        }
    }
}

/// Exploration progress for one session.
///
/// Sets are kept as insertion-ordered vectors without duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressState {
    pub achievements: Vec<Achievement>,
    pub visited_sections: Vec<String>,
    pub hovered_technologies: Vec<String>,
    pub visited_projects: Vec<String>,
    pub clicked_external_links: Vec<String>,
    /// Cumulative milliseconds on the About section.
    pub about_time_spent: u64,
    /// Last [`SECRET_WINDOW`] key codes, oldest first.
    pub konami_progress: Vec<u32>,
    pub eyes_mood: EyesMood,
    pub current_notification: Option<Notification>,
    pub show_achievement_panel: bool,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self {
            achievements: Achievement::catalog(),
            visited_sections: Vec::new(),
            hovered_technologies: Vec::new(),
            visited_projects: Vec::new(),
            clicked_external_links: Vec::new(),
            about_time_spent: 0,
            konami_progress: Vec::new(),
            eyes_mood: EyesMood::Cold,
            current_notification: None,
            show_achievement_panel: false,
        }
    }
}

impl ProgressState {
    pub fn achievement(&self, id: AchievementId) -> Option<&Achievement> {
        self.achievements.iter().find(|a| a.id == id)
    }

    /// Realign `achievements` with the catalog.
    ///
    /// Persisted state may come from an older catalog: entries are reordered
    /// to catalog order, missing ones are added locked, duplicates dropped,
    /// and metadata refreshed. Unlock flags and timestamps survive.
    pub fn normalize(&mut self) {
        let previous = std::mem::take(&mut self.achievements);
        self.achievements = Achievement::catalog()
            .into_iter()
            .map(|mut fresh| {
                if let Some(old) = previous.iter().find(|a| a.id == fresh.id && a.unlocked) {
                    fresh.unlocked = true;
                    fresh.unlocked_at = old.unlocked_at;
                }
                fresh
            })
            .collect();

        if self.konami_progress.len() > SECRET_WINDOW {
            let excess = self.konami_progress.len() - SECRET_WINDOW;
            self.konami_progress.drain(..excess);
        }
        for set in [
            &mut self.visited_sections,
            &mut self.hovered_technologies,
            &mut self.visited_projects,
            &mut self.clicked_external_links,
        ] {
            dedup_preserving_order(set);
        }
    }
}

fn dedup_preserving_order(items: &mut Vec<String>) {
    let mut seen = Vec::with_capacity(items.len());
    items.retain(|item| {
        if seen.contains(item) {
            false
        } else {
            seen.push(item.clone());
            true
        }
    });
}
