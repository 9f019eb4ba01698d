//! Derived unlock conditions.
//!
//! Pure predicates over progress state and the content catalog. The store
//! does not enforce these; the [`Session`](crate::Session) evaluates them
//! after each mutation that could satisfy one.

use super::state::ProgressState;
use crate::achievement::AchievementId;
use crate::catalog::Catalog;

/// Every catalog technology hovered at least once.
pub fn full_diagnosis(state: &ProgressState, catalog: &Catalog) -> bool {
    covers(&state.hovered_technologies, catalog.technology_names())
}

/// Every catalog project opened.
pub fn archive_expert(state: &ProgressState, catalog: &Catalog) -> bool {
    covers(&state.visited_projects, catalog.project_ids())
}

/// Every tracked external link followed.
pub fn explorer(state: &ProgressState, catalog: &Catalog) -> bool {
    covers(&state.clicked_external_links, catalog.tracked_links())
}

/// Accumulated About time has reached `threshold_ms`.
pub fn fast_reader(state: &ProgressState, threshold_ms: u64) -> bool {
    state.about_time_spent >= threshold_ms
}

/// Exact positional match of the trailing window against `target`.
pub fn secret_sequence(window: &[u32], target: &[u32]) -> bool {
    !target.is_empty() && window == target
}

/// Set-based achievements whose condition holds but which are still locked.
pub fn satisfied_but_locked(state: &ProgressState, catalog: &Catalog) -> Vec<AchievementId> {
    let checks = [
        (AchievementId::FullDiagnosis, full_diagnosis(state, catalog)),
        (AchievementId::ArchiveExpert, archive_expert(state, catalog)),
        (AchievementId::Explorer, explorer(state, catalog)),
    ];
    checks
        .into_iter()
        .filter(|(id, ok)| *ok && !state.achievement(*id).is_some_and(|a| a.unlocked))
        .map(|(id, _)| id)
        .collect()
}

/// An empty requirement list never counts as covered.
fn covers<'a>(have: &[String], mut required: impl Iterator<Item = &'a str>) -> bool {
    let mut any = false;
    let all = required.all(|name| {
        any = true;
        have.iter().any(|h| h == name)
    });
    any && all
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_diagnosis_needs_every_technology() {
        let catalog = Catalog::default();
        let names: Vec<String> = catalog.technology_names().map(String::from).collect();
        let mut state = ProgressState::default();
        state.hovered_technologies = names[..names.len() - 1].to_vec();
        assert!(!full_diagnosis(&state, &catalog));
        state.hovered_technologies.push(names.last().unwrap().clone());
        assert!(full_diagnosis(&state, &catalog));
    }

    #[test]
    fn explorer_ignores_untracked_links() {
        let catalog = Catalog::default();
        let mut state = ProgressState::default();
        state.clicked_external_links = vec!["github".into(), "email".into()];
        assert!(!explorer(&state, &catalog));
        state.clicked_external_links.push("linkedin".into());
        assert!(explorer(&state, &catalog));
    }

    #[test]
    fn empty_catalog_satisfies_nothing() {
        let mut catalog = Catalog::default();
        catalog.projects.clear();
        assert!(!archive_expert(&ProgressState::default(), &catalog));
    }

    #[test]
    fn satisfied_but_locked_skips_unlocked() {
        let catalog = Catalog::default();
        let mut state = ProgressState::default();
        state.visited_projects = catalog.project_ids().map(String::from).collect();
        assert_eq!(
            satisfied_but_locked(&state, &catalog),
            vec![AchievementId::ArchiveExpert]
        );
        state.achievements[4].unlocked = true;
        assert!(satisfied_but_locked(&state, &catalog).is_empty());
    }

    #[test]
    fn fast_reader_is_inclusive() {
        let mut state = ProgressState::default();
        state.about_time_spent = 59_999;
        assert!(!fast_reader(&state, 60_000));
        state.about_time_spent = 60_000;
        assert!(fast_reader(&state, 60_000));
    }

    #[test]
    fn secret_sequence_requires_exact_window() {
        let target = [1, 2, 3];
        assert!(secret_sequence(&[1, 2, 3], &target));
        assert!(!secret_sequence(&[2, 3], &target));
        assert!(!secret_sequence(&[1, 9, 3], &target));
        assert!(!secret_sequence(&[], &[]));
    }
}
