//! Achievement definitions.
//!
//! The set of achievements is fixed. Each definition carries immutable
//! display metadata plus the mutable unlock flag and timestamp, which only
//! [`ProgressStore`](crate::ProgressStore) changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    /// Entered the site.
    FirstContact,
    /// Opened the developer tools.
    CodeHunter,
    /// Stayed on the About section for a minute.
    FastReader,
    /// Hovered every technology.
    FullDiagnosis,
    /// Opened every project.
    ArchiveExpert,
    /// Entered the secret key sequence.
    KingMode,
    /// Followed every tracked external link.
    Explorer,
}

impl AchievementId {
    /// All ids in catalog order.
    pub const ALL: [AchievementId; 7] = [
        AchievementId::FirstContact,
        AchievementId::CodeHunter,
        AchievementId::FastReader,
        AchievementId::FullDiagnosis,
        AchievementId::ArchiveExpert,
        AchievementId::KingMode,
        AchievementId::Explorer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AchievementId::FirstContact => "first_contact",
            AchievementId::CodeHunter => "code_hunter",
            AchievementId::FastReader => "fast_reader",
            AchievementId::FullDiagnosis => "full_diagnosis",
            AchievementId::ArchiveExpert => "archive_expert",
            AchievementId::KingMode => "king_mode",
            AchievementId::Explorer => "explorer",
        }
    }
}

impl fmt::Display for AchievementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AchievementId {
    type Err = ValidationError;

    /// Accepts the snake_case form and the kebab-case form
    /// (`king_mode` / `king-mode`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "_");
        AchievementId::ALL
            .into_iter()
            .find(|id| id.as_str() == normalized)
            .ok_or_else(|| ValidationError::UnknownAchievement(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: AchievementId,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub unlocked: bool,
    /// Epoch milliseconds of the first effective unlock.
    #[serde(default)]
    pub unlocked_at: Option<u64>,
}

impl Achievement {
    fn locked(id: AchievementId, name: &str, description: &str, icon: &str) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            icon: icon.into(),
            unlocked: false,
            unlocked_at: None,
        }
    }

    /// The full catalog, every entry locked.
    pub fn catalog() -> Vec<Achievement> {
        vec![
            Self::locked(
                AchievementId::FirstContact,
                "First Contact",
                "You entered the site for the first time",
                "🔭",
            ),
            Self::locked(
                AchievementId::CodeHunter,
                "Code Hunter",
                "You opened the developer console",
                "🐛",
            ),
            Self::locked(
                AchievementId::FastReader,
                "Fast Reader",
                "You spent a minute in the About section",
                "📖",
            ),
            Self::locked(
                AchievementId::FullDiagnosis,
                "Full Diagnosis",
                "You inspected every technology",
                "🔧",
            ),
            Self::locked(
                AchievementId::ArchiveExpert,
                "Archive Expert",
                "You looked at every project in detail",
                "🌀",
            ),
            Self::locked(
                AchievementId::KingMode,
                "King Mode",
                "You entered the secret code",
                "👑",
            ),
            Self::locked(
                AchievementId::Explorer,
                "Explorer",
                "You followed every external link",
                "🚀",
            ),
        ]
    }

    pub fn unlocked_at_utc(&self) -> Option<DateTime<Utc>> {
        self.unlocked_at
            .and_then(|ms| DateTime::<Utc>::from_timestamp_millis(ms as i64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_matches_id_order_and_is_locked() {
        let catalog = Achievement::catalog();
        assert_eq!(catalog.len(), AchievementId::ALL.len());
        for (entry, id) in catalog.iter().zip(AchievementId::ALL) {
            assert_eq!(entry.id, id);
            assert!(!entry.unlocked);
            assert!(entry.unlocked_at.is_none());
        }
    }

    #[test]
    fn parses_both_spellings() {
        assert_eq!("king_mode".parse::<AchievementId>(), Ok(AchievementId::KingMode));
        assert_eq!("first-contact".parse::<AchievementId>(), Ok(AchievementId::FirstContact));
        assert_eq!(
            "queen_mode".parse::<AchievementId>(),
            Err(ValidationError::UnknownAchievement("queen_mode".into()))
        );
    }

    #[test]
    fn unlocked_at_converts_to_utc() {
        let mut a = Achievement::catalog().remove(0);
        a.unlocked_at = Some(1_700_000_000_000);
        assert_eq!(a.unlocked_at_utc().unwrap().timestamp(), 1_700_000_000);
    }
}
