//! Property-based invariant tests for the progress store and its feeders.
//!
//! 1. Unlocking twice keeps the first `unlocked_at`.
//! 2. Set-inserts are idempotent.
//! 3. Unlocks never revert, whatever else happens to the store.
//! 4. The key window keeps only the trailing ten codes.
//! 5. The exact sequence after any noise unlocks `king_mode`.
//! 6. Any single altered code does not.
//! 7. Dwell time never decreases while the section stays mounted.

use proptest::prelude::*;
use starfolio_core::dwell::DwellConfig;
use starfolio_core::secret::SECRET_SEQUENCE;
use starfolio_core::{AchievementId, DwellTimer, EyesMood, ProgressStore, SecretSequenceDetector};

// ── Helpers ─────────────────────────────────────────────────────────────

fn achievement_strategy() -> impl Strategy<Value = AchievementId> {
    prop::sample::select(AchievementId::ALL.to_vec())
}

#[derive(Debug, Clone)]
enum Op {
    Unlock(AchievementId, u64),
    Section(String),
    Key(u32),
    ResetKeys,
    Mood(u8),
    Panel(bool),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (achievement_strategy(), 0u64..1_000_000).prop_map(|(id, t)| Op::Unlock(id, t)),
        "[a-z]{1,8}".prop_map(Op::Section),
        (0u32..256).prop_map(Op::Key),
        Just(Op::ResetKeys),
        (0u8..5).prop_map(Op::Mood),
        any::<bool>().prop_map(Op::Panel),
    ]
}

fn apply(store: &mut ProgressStore, op: &Op) {
    match op {
        Op::Unlock(id, t) => {
            store.unlock_achievement(*id, *t);
        }
        Op::Section(name) => {
            store.add_visited_section(name);
        }
        Op::Key(code) => {
            store.add_konami_key(*code);
        }
        Op::ResetKeys => store.reset_konami_progress(),
        Op::Mood(m) => {
            let mood = [
                EyesMood::Cold,
                EyesMood::Soft,
                EyesMood::Alert,
                EyesMood::Happy,
                EyesMood::Angry,
            ][*m as usize];
            store.set_eyes_mood(mood);
        }
        Op::Panel(show) => store.set_show_achievement_panel(*show),
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 1-2. Idempotence
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn unlock_keeps_first_timestamp(id in achievement_strategy(), first in 0u64..1_000_000, later in 0u64..1_000_000) {
        let mut store = ProgressStore::new();
        prop_assert!(store.unlock_achievement(id, first).is_some());
        prop_assert!(store.unlock_achievement(id, later).is_none());
        let achievement = store.state().achievement(id).unwrap();
        prop_assert!(achievement.unlocked);
        prop_assert_eq!(achievement.unlocked_at, Some(first));
        prop_assert_eq!(store.unlocked_count(), 1);
    }

    #[test]
    fn set_inserts_are_idempotent(names in prop::collection::vec("[a-z-]{1,12}", 1..20)) {
        let mut store = ProgressStore::new();
        for name in &names {
            store.add_hovered_technology(name);
            store.add_visited_project(name);
        }
        let hovered = store.state().hovered_technologies.len();
        let projects = store.state().visited_projects.len();
        for name in &names {
            prop_assert!(!store.add_hovered_technology(name));
            prop_assert!(!store.add_visited_project(name));
        }
        prop_assert_eq!(store.state().hovered_technologies.len(), hovered);
        prop_assert_eq!(store.state().visited_projects.len(), projects);

        let mut unique = names.clone();
        unique.sort();
        unique.dedup();
        prop_assert_eq!(hovered, unique.len());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Monotonic unlocks
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn unlocks_never_revert(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut store = ProgressStore::new();
        let mut seen: Vec<AchievementId> = Vec::new();
        for op in &ops {
            apply(&mut store, op);
            for id in &seen {
                prop_assert!(store.is_achievement_unlocked(*id), "{:?} reverted after {:?}", id, op);
            }
            seen = AchievementId::ALL
                .iter()
                .copied()
                .filter(|id| store.is_achievement_unlocked(*id))
                .collect();
        }
        prop_assert_eq!(store.achievements().len(), 7);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4-6. Sliding window
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn window_keeps_trailing_ten(codes in prop::collection::vec(0u32..256, 0..40)) {
        let mut store = ProgressStore::new();
        for code in &codes {
            store.add_konami_key(*code);
        }
        let tail = &codes[codes.len().saturating_sub(10)..];
        prop_assert_eq!(store.konami_progress(), tail);
    }

    #[test]
    fn sequence_after_noise_unlocks(noise in prop::collection::vec(0u32..256, 0..30)) {
        let mut detector = SecretSequenceDetector::default();
        let mut store = ProgressStore::new();
        for code in noise.iter().chain(SECRET_SEQUENCE.iter()) {
            detector.on_key(*code, 1, &mut store);
        }
        prop_assert!(store.is_achievement_unlocked(AchievementId::KingMode));
    }

    #[test]
    fn single_altered_code_does_not_unlock(pos in 0usize..10, bump in 1u32..200) {
        let mut altered = SECRET_SEQUENCE;
        altered[pos] = altered[pos].wrapping_add(bump) % 256;
        prop_assume!(altered[pos] != SECRET_SEQUENCE[pos]);

        let mut detector = SecretSequenceDetector::default();
        let mut store = ProgressStore::new();
        for code in altered {
            detector.on_key(code, 1, &mut store);
        }
        prop_assert!(!store.is_achievement_unlocked(AchievementId::KingMode));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Dwell monotonicity
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn dwell_never_decreases_while_mounted(
        base in 0u64..50_000,
        steps in prop::collection::vec(0u64..5_000, 1..40),
    ) {
        let mut store = ProgressStore::new();
        store.set_about_time_spent(base);
        let mut dwell = DwellTimer::about(DwellConfig::default());
        let mut now = 1_000;
        dwell.mount(now, &store);

        let mut last = store.about_time_spent();
        for step in steps {
            now += step;
            dwell.tick(now, &mut store);
            let current = store.about_time_spent();
            prop_assert!(current >= last, "dwell went from {} to {}", last, current);
            last = current;
        }
        dwell.unmount(now, &mut store);
        prop_assert!(store.about_time_spent() >= last);
        prop_assert_eq!(store.about_time_spent(), base + (now - 1_000));
    }
}
