//! Section navigation.
//!
//! Steady-state orchestrator after the intro. Accepts explicit navigation
//! requests only, with a cooldown that drops (never queues) requests arriving
//! while a transition is in flight.
//!
//! Returning home from a section records the section as visited, shakes the
//! screen, and after `return_notice_delay_ms` raises a contextual
//! notification whose type is the section just left.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::error::ValidationError;
use crate::events::Event;
use crate::notification::{ContextualNotifier, Notification};
use crate::progress::ProgressStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    #[default]
    Home,
    Technologies,
    Projects,
    About,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Home,
        Section::Technologies,
        Section::Projects,
        Section::About,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Section::Home => "home",
            Section::Technologies => "technologies",
            Section::Projects => "projects",
            Section::About => "about",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Section::ALL
            .into_iter()
            .find(|section| section.as_str() == lowered)
            .ok_or_else(|| ValidationError::UnknownSection(s.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
    /// Screen shake on return home, then the notification.
    #[serde(default = "default_return_notice_delay_ms")]
    pub return_notice_delay_ms: u64,
}

fn default_cooldown_ms() -> u64 {
    300
}
fn default_return_notice_delay_ms() -> u64 {
    500
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: default_cooldown_ms(),
            return_notice_delay_ms: default_return_notice_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingNotice {
    due_ms: u64,
    from: Section,
}

#[derive(Debug, Clone, Default)]
pub struct NavigationController {
    config: NavigationConfig,
    current: Section,
    transition_until: Option<u64>,
    shake_until: Option<u64>,
    pending: Vec<PendingNotice>,
    catalog: Catalog,
}

impl NavigationController {
    pub fn new(config: NavigationConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Notification copy comes from `catalog`.
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn current(&self) -> Section {
        self.current
    }

    pub fn is_transitioning(&self, now_ms: u64) -> bool {
        self.transition_until.is_some_and(|until| now_ms < until)
    }

    pub fn screen_shake(&self, now_ms: u64) -> bool {
        self.shake_until.is_some_and(|until| now_ms < until)
    }

    pub fn pending_notices(&self) -> usize {
        self.pending.len()
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.transition_until
            .into_iter()
            .chain(self.shake_until)
            .chain(self.pending.iter().map(|p| p.due_ms))
            .min()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Request a transition to `section`.
    ///
    /// Dropped with [`Event::NavigationRejected`] while the cooldown from
    /// the previous accepted request is still running.
    pub fn navigate_to(
        &mut self,
        section: Section,
        now_ms: u64,
        store: &mut ProgressStore,
    ) -> Vec<Event> {
        if self.is_transitioning(now_ms) {
            debug!(requested = %section, "navigation dropped during cooldown");
            return vec![Event::NavigationRejected {
                requested: section,
                at_ms: now_ms,
            }];
        }

        let from = self.current;
        self.current = section;
        self.transition_until = Some(now_ms + self.config.cooldown_ms);
        info!(%from, to = %section, "section changed");

        let mut events = vec![Event::SectionEntered {
            from,
            to: section,
            at_ms: now_ms,
        }];

        if section == Section::Home && from != Section::Home {
            store.add_visited_section(from.as_str());
            let due_ms = now_ms + self.config.return_notice_delay_ms;
            self.shake_until = Some(due_ms);
            self.pending.push(PendingNotice { due_ms, from });
            events.push(Event::ReturnedHome { from, at_ms: now_ms });
        }
        events
    }

    /// Hand due return-home notices to the notifier, oldest first.
    pub fn tick(
        &mut self,
        now_ms: u64,
        notifier: &mut ContextualNotifier,
        store: &mut ProgressStore,
    ) -> Vec<Event> {
        if self.transition_until.is_some_and(|until| now_ms >= until) {
            self.transition_until = None;
        }
        if self.shake_until.is_some_and(|until| now_ms >= until) {
            self.shake_until = None;
        }

        let mut events = Vec::new();
        let (due, waiting): (Vec<PendingNotice>, Vec<PendingNotice>) =
            std::mem::take(&mut self.pending)
                .into_iter()
                .partition(|p| p.due_ms <= now_ms);
        self.pending = waiting;
        for notice in due {
            let kind = notice.from.as_str();
            let message = self
                .catalog
                .notification_style(kind)
                .map(|s| s.message.clone())
                .unwrap_or_default();
            events.extend(notifier.trigger(
                Notification::new(kind, message),
                notice.due_ms,
                store,
            ));
        }
        events
    }

    /// Drop pending notices and timers (unmount).
    pub fn cancel(&mut self) {
        self.pending.clear();
        self.transition_until = None;
        self.shake_until = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accepted(events: &[Event]) -> bool {
        matches!(events.first(), Some(Event::SectionEntered { .. }))
    }

    #[test]
    fn second_request_within_cooldown_is_dropped() {
        let mut store = ProgressStore::new();
        let mut nav = NavigationController::default();
        assert!(accepted(&nav.navigate_to(Section::About, 1_000, &mut store)));
        let rejected = nav.navigate_to(Section::Projects, 1_100, &mut store);
        assert!(matches!(
            rejected.as_slice(),
            [Event::NavigationRejected { requested: Section::Projects, .. }]
        ));
        assert_eq!(nav.current(), Section::About);

        assert!(nav.is_transitioning(1_299));
        assert!(!nav.is_transitioning(1_300));
        assert!(accepted(&nav.navigate_to(Section::Projects, 1_300, &mut store)));
        assert_eq!(nav.current(), Section::Projects);
    }

    #[test]
    fn return_home_records_visit_and_schedules_notice() {
        let mut store = ProgressStore::new();
        let mut notifier = ContextualNotifier::default();
        let mut nav = NavigationController::default();

        nav.navigate_to(Section::Technologies, 0, &mut store);
        let events = nav.navigate_to(Section::Home, 1_000, &mut store);
        assert!(events.contains(&Event::ReturnedHome {
            from: Section::Technologies,
            at_ms: 1_000
        }));
        assert_eq!(store.state().visited_sections, ["technologies"]);
        assert!(nav.screen_shake(1_200));

        assert!(nav.tick(1_499, &mut notifier, &mut store).is_empty());
        assert!(notifier.current().is_none());
        let events = nav.tick(1_500, &mut notifier, &mut store);
        assert!(events.contains(&Event::NotificationTriggered {
            kind: "technologies".into(),
            at_ms: 1_500
        }));
        assert_eq!(notifier.current().unwrap().kind, "technologies");
        assert_eq!(notifier.current().unwrap().message, "Is that enough?");
        assert!(!nav.screen_shake(1_500));
    }

    #[test]
    fn home_to_home_has_no_side_effects() {
        let mut store = ProgressStore::new();
        let mut nav = NavigationController::default();
        let events = nav.navigate_to(Section::Home, 0, &mut store);
        assert_eq!(events.len(), 1);
        assert!(store.state().visited_sections.is_empty());
        assert_eq!(nav.pending_notices(), 0);
    }

    #[test]
    fn cancel_drops_pending_notice() {
        let mut store = ProgressStore::new();
        let mut notifier = ContextualNotifier::default();
        let mut nav = NavigationController::default();
        nav.navigate_to(Section::About, 0, &mut store);
        nav.navigate_to(Section::Home, 400, &mut store);
        nav.cancel();
        assert!(nav.tick(5_000, &mut notifier, &mut store).is_empty());
        assert!(notifier.current().is_none());
    }

    #[test]
    fn section_parses_case_insensitively() {
        assert_eq!("About".parse::<Section>(), Ok(Section::About));
        assert!("contact".parse::<Section>().is_err());
    }
}
