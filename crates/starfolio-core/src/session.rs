//! Session orchestrator.
//!
//! Owns one instance of every component and the progress store, and is the
//! only place the clock is read. Each [`Session::handle`] or
//! [`Session::tick`] reads the clock once, fires every deadline due up to
//! that instant in deadline order, applies the input, then evaluates the
//! derived unlock rules and turns fresh unlocks into toasts.
//!
//! ## Page hand-off
//!
//! ```text
//! intro complete (t) ── home mounted, first_contact
//!        └─ t + overlay_linger_ms   intro overlay removed
//!               └─ + home_reveal_ms  HomeReady
//! ```
//!
//! With `has_seen_intro` set, the intro is skipped: home mounts at boot and
//! is ready `home_reveal_ms` later.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::achievement::AchievementId;
use crate::catalog::Catalog;
use crate::clock::Clock;
use crate::devtools::DevToolsMonitor;
use crate::dwell::DwellTimer;
use crate::events::Event;
use crate::intro::{IntroSequencer, IntroState};
use crate::navigation::{NavigationController, Section};
use crate::notification::{Chime, ContextualNotifier, SilentChime, TerminalBell, ToastQueue};
use crate::pointer::{PointerFeed, PointerPosition};
use crate::progress::{rules, EyesMood, ProgressStore};
use crate::render::FrameView;
use crate::secret::SecretSequenceDetector;
use crate::storage::Config;

/// A user or environment input.
///
/// Serialized with a `type` tag so timed scripts can be written as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Input {
    /// Global key press as a legacy key code.
    Key { code: u32 },
    Navigate { section: Section },
    HoverTechnology { name: String },
    OpenProject { id: String },
    ClickExternalLink { name: String },
    /// Raw pointer position plus viewport size.
    Pointer {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// One reading of the devtools heuristic.
    DevTools { open: bool },
    ShowPanel { show: bool },
}

impl Input {
    /// Inputs that are accepted before the home page has mounted.
    fn is_ambient(&self) -> bool {
        matches!(self, Input::Pointer { .. })
    }
}

pub struct Session {
    clock: Arc<dyn Clock>,
    config: Config,
    catalog: Catalog,
    progress: ProgressStore,
    intro_state: IntroState,
    intro: IntroSequencer,
    notifier: ContextualNotifier,
    toasts: ToastQueue,
    navigation: NavigationController,
    secret: SecretSequenceDetector,
    dwell: DwellTimer,
    devtools: DevToolsMonitor,
    pointer: PointerFeed,
    booted: bool,
    bypassed_intro: bool,
    home_mounted_at: Option<u64>,
    overlay_until: Option<u64>,
    ready_at: Option<u64>,
    home_ready: bool,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("progress", &self.progress)
            .field("intro_state", &self.intro_state)
            .field("intro", &self.intro)
            .field("navigation", &self.navigation)
            .field("home_mounted_at", &self.home_mounted_at)
            .field("home_ready", &self.home_ready)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(config: Config, clock: Arc<dyn Clock>) -> Self {
        let chime: Box<dyn Chime> = if config.toasts.chime_enabled {
            Box::new(TerminalBell)
        } else {
            Box::new(SilentChime)
        };
        let catalog = Catalog::default();
        Self {
            clock,
            navigation: NavigationController::new(config.navigation.clone())
                .with_catalog(catalog.clone()),
            catalog,
            progress: ProgressStore::new(),
            intro_state: IntroState::default(),
            intro: IntroSequencer::new(config.intro.clone()),
            notifier: ContextualNotifier::new(config.notifications.clone()),
            toasts: ToastQueue::new(config.toasts.clone(), chime),
            secret: SecretSequenceDetector::default(),
            dwell: DwellTimer::about(config.dwell.clone()),
            devtools: DevToolsMonitor::new(config.devtools.clone()),
            pointer: PointerFeed::new(config.pointer.clone()),
            config,
            booted: false,
            bypassed_intro: false,
            home_mounted_at: None,
            overlay_until: None,
            ready_at: None,
            home_ready: false,
        }
    }

    /// Start from previously persisted progress.
    pub fn with_progress(mut self, progress: ProgressStore) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_intro_state(mut self, state: IntroState) -> Self {
        self.intro_state = state;
        self
    }

    pub fn with_chime(mut self, chime: Box<dyn Chime>) -> Self {
        self.toasts.set_chime(chime);
        self
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.navigation = std::mem::take(&mut self.navigation).with_catalog(catalog.clone());
        self.catalog = catalog;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn progress(&self) -> &ProgressStore {
        &self.progress
    }

    pub fn intro_state(&self) -> IntroState {
        self.intro_state
    }

    pub fn intro(&self) -> &IntroSequencer {
        &self.intro
    }

    pub fn notifier(&self) -> &ContextualNotifier {
        &self.notifier
    }

    pub fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }

    pub fn navigation(&self) -> &NavigationController {
        &self.navigation
    }

    pub fn devtools(&self) -> &DevToolsMonitor {
        &self.devtools
    }

    pub fn dwell(&self) -> &DwellTimer {
        &self.dwell
    }

    pub fn pointer(&self) -> PointerPosition {
        self.pointer.position()
    }

    pub fn is_home_mounted(&self) -> bool {
        self.home_mounted_at.is_some()
    }

    pub fn is_home_ready(&self) -> bool {
        self.home_ready
    }

    /// Whether the intro overlay is still drawn, on top of home or alone.
    pub fn overlay_visible(&self) -> bool {
        if self.bypassed_intro || !self.booted {
            return false;
        }
        self.home_mounted_at.is_none() || self.overlay_until.is_some()
    }

    /// Read-only snapshot for ambient renderers.
    pub fn frame(&self) -> FrameView {
        let now = self.clock.now_ms();
        FrameView {
            frame_ms: now,
            pointer: self.pointer.position(),
            mood: self.progress.eyes_mood(),
            devtools_open: self.devtools.is_open(),
            screen_shake: self.navigation.screen_shake(now) || self.secret.screen_shake(now),
        }
    }

    /// Earliest pending deadline across all components.
    pub fn next_deadline(&self) -> Option<u64> {
        [
            self.intro.next_deadline(),
            self.overlay_until,
            self.ready_at,
            self.navigation.next_deadline(),
            self.secret.next_deadline(),
            self.notifier.next_deadline(),
            self.toasts.next_deadline(),
            self.dwell.next_deadline(),
            self.devtools.next_deadline(),
            self.pointer.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Mount the app: start the intro, or skip it if already seen.
    /// A second call is ignored.
    pub fn boot(&mut self) -> Vec<Event> {
        if self.booted {
            debug!("session already booted");
            return Vec::new();
        }
        let now = self.clock.now_ms();
        self.booted = true;

        let mut events = Vec::new();
        if self.intro_state.has_seen_intro {
            info!("intro already seen, skipping");
            self.bypassed_intro = true;
            self.mount_home(now, &mut events);
            self.ready_at = Some(now + self.config.intro.home_reveal_ms);
            self.advance_handoff(now, &mut events);
        } else {
            events.extend(self.intro.start(now));
        }
        self.settle(now, &mut events);
        events
    }

    /// Fire everything due up to the current instant.
    pub fn tick(&mut self) -> Vec<Event> {
        let now = self.clock.now_ms();
        let mut events = Vec::new();
        self.advance_to(now, &mut events);
        events
    }

    /// Catch up on due deadlines, then apply `input` at the current instant.
    pub fn handle(&mut self, input: Input) -> Vec<Event> {
        let now = self.clock.now_ms();
        let mut events = Vec::new();
        self.advance_to(now, &mut events);

        if !self.is_home_mounted() && !input.is_ambient() {
            debug!(?input, "input ignored before home mounted");
            return events;
        }

        match input {
            Input::Key { code } => {
                events.extend(self.secret.on_key(code, now, &mut self.progress));
            }
            Input::Navigate { section } => self.navigate(section, now, &mut events),
            Input::HoverTechnology { name } => {
                if self.navigation.current() == Section::Technologies {
                    self.progress.add_hovered_technology(&name);
                } else {
                    debug!(%name, "technology hover outside technologies section");
                }
            }
            Input::OpenProject { id } => {
                if self.navigation.current() == Section::Projects {
                    self.progress.add_visited_project(&id);
                } else {
                    debug!(%id, "project opened outside projects section");
                }
            }
            Input::ClickExternalLink { name } => {
                if self.catalog.is_tracked_link(&name) {
                    self.progress.add_clicked_external_link(&name);
                } else {
                    debug!(%name, "untracked external link");
                }
            }
            Input::Pointer {
                x,
                y,
                width,
                height,
            } => self.pointer.on_move(x, y, width, height, now),
            Input::DevTools { open } => {
                events.extend(self.devtools.report(open, now, &mut self.progress));
            }
            Input::ShowPanel { show } => self.progress.set_show_achievement_panel(show),
        }

        self.settle(now, &mut events);
        events
    }

    /// Unmount everything: flush the dwell timer, drop every pending
    /// deadline and return the transient notification and mood to rest.
    /// Nothing fires afterwards until the next boot.
    pub fn shutdown(&mut self) -> Vec<Event> {
        let now = self.clock.now_ms();
        let mut events = Vec::new();
        self.advance_to(now, &mut events);

        events.extend(self.dwell.unmount(now, &mut self.progress));
        self.intro.cancel();
        self.navigation.cancel();
        self.notifier.cancel(&mut self.progress);
        self.devtools.cancel();
        self.toasts.clear();
        self.secret.cancel();
        self.overlay_until = None;
        self.ready_at = None;
        if self.progress.set_eyes_mood(EyesMood::Cold) {
            events.push(Event::MoodChanged {
                mood: EyesMood::Cold,
                at_ms: now,
            });
        }
        info!(unlocked = self.progress.unlocked_count(), "session shut down");
        events
    }

    // ── Internals ────────────────────────────────────────────────────

    fn navigate(&mut self, section: Section, now: u64, events: &mut Vec<Event>) {
        let from = self.navigation.current();
        let out = self.navigation.navigate_to(section, now, &mut self.progress);
        let accepted = matches!(out.first(), Some(Event::SectionEntered { .. }));
        events.extend(out);
        if !accepted {
            return;
        }
        if from == self.dwell.section() && section != from {
            events.extend(self.dwell.unmount(now, &mut self.progress));
        }
        if section == self.dwell.section() {
            self.dwell.mount(now, &self.progress);
        }
    }

    /// Step through every deadline up to `now` in order.
    fn advance_to(&mut self, now: u64, events: &mut Vec<Event>) {
        let mut last = None;
        while let Some(due) = self.next_deadline().filter(|&d| d <= now) {
            if last == Some(due) {
                break;
            }
            last = Some(due);
            self.step(due, events);
        }
    }

    fn step(&mut self, at: u64, events: &mut Vec<Event>) {
        let intro_events = self.intro.tick(at);
        let completed = intro_events.iter().find_map(|e| match e {
            Event::IntroCompleted { at_ms } => Some(*at_ms),
            _ => None,
        });
        events.extend(intro_events);
        if let Some(done) = completed {
            self.intro_state.intro_complete = true;
            self.intro_state.has_seen_intro = true;
            self.mount_home(done, events);
            self.overlay_until = Some(done + self.config.intro.overlay_linger_ms);
        }
        self.advance_handoff(at, events);

        events.extend(self.navigation.tick(at, &mut self.notifier, &mut self.progress));
        self.secret.tick(at);
        events.extend(self.notifier.tick(at, &mut self.progress));
        events.extend(self.toasts.tick(at));
        events.extend(self.dwell.tick(at, &mut self.progress));
        events.extend(self.devtools.tick(at, &mut self.progress));
        events.extend(self.pointer.tick(at));

        self.settle(at, events);
    }

    fn advance_handoff(&mut self, at: u64, events: &mut Vec<Event>) {
        if let Some(until) = self.overlay_until.filter(|&u| u <= at) {
            self.overlay_until = None;
            debug!(at_ms = until, "intro overlay removed");
            self.ready_at = Some(until + self.config.intro.home_reveal_ms);
        }
        if let Some(ready) = self.ready_at.filter(|&r| r <= at) {
            self.ready_at = None;
            self.home_ready = true;
            info!(bypassed_intro = self.bypassed_intro, "home ready");
            events.push(Event::HomeReady {
                bypassed_intro: self.bypassed_intro,
                at_ms: ready,
            });
        }
    }

    fn mount_home(&mut self, at: u64, events: &mut Vec<Event>) {
        if self.home_mounted_at.is_some() {
            return;
        }
        self.home_mounted_at = Some(at);
        debug!(at_ms = at, "home mounted");
        events.extend(self.progress.unlock_achievement(AchievementId::FirstContact, at));

        // Restored state may carry a notification whose cycle died with the
        // previous session; give it a fresh one.
        if self.notifier.current().is_none() {
            if let Some(stale) = self.progress.current_notification().cloned() {
                info!(kind = %stale.kind, "replaying restored notification");
                events.extend(self.notifier.trigger(stale, at, &mut self.progress));
            } else if !self.devtools.is_open() && self.progress.set_eyes_mood(EyesMood::Cold) {
                events.push(Event::MoodChanged {
                    mood: EyesMood::Cold,
                    at_ms: at,
                });
            }
        }
    }

    /// Evaluate derived rules and announce unlocks not yet toasted.
    fn settle(&mut self, at: u64, events: &mut Vec<Event>) {
        for id in rules::satisfied_but_locked(self.progress.state(), &self.catalog) {
            events.extend(self.progress.unlock_achievement(id, at));
        }

        let announced: Vec<AchievementId> = events
            .iter()
            .filter_map(|e| match e {
                Event::ToastShown { achievement, .. } => Some(*achievement),
                _ => None,
            })
            .collect();
        let fresh: Vec<(AchievementId, u64)> = events
            .iter()
            .filter_map(|e| match e {
                Event::AchievementUnlocked { id, at_ms } if !announced.contains(id) => {
                    Some((*id, *at_ms))
                }
                _ => None,
            })
            .collect();
        for (id, at_ms) in fresh {
            if let Some(achievement) = self.progress.state().achievement(id).cloned() {
                events.push(self.toasts.push(achievement, at_ms));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn session() -> (Session, ManualClock) {
        let clock = ManualClock::new(0);
        let mut cfg = Config::default();
        cfg.toasts.chime_enabled = false;
        let session = Session::new(cfg, Arc::new(clock.clone()));
        (session, clock)
    }

    fn booted_home() -> (Session, ManualClock) {
        let (session, clock) = session();
        let mut session = session.with_intro_state(IntroState {
            has_seen_intro: true,
            intro_complete: true,
        });
        session.boot();
        (session, clock)
    }

    #[test]
    fn intro_hands_off_to_home() {
        let (mut s, clock) = session();
        s.boot();
        assert!(s.overlay_visible());
        assert!(!s.is_home_mounted());

        clock.set(5_950);
        let events = s.tick();
        assert!(events.contains(&Event::IntroCompleted { at_ms: 5_950 }));
        assert!(events.contains(&Event::AchievementUnlocked {
            id: AchievementId::FirstContact,
            at_ms: 5_950
        }));
        assert!(s.is_home_mounted());
        assert!(s.overlay_visible());
        assert!(s.intro_state().has_seen_intro);

        clock.set(6_549);
        s.tick();
        assert!(!s.is_home_ready());
        clock.set(6_550);
        let events = s.tick();
        assert!(events.contains(&Event::HomeReady {
            bypassed_intro: false,
            at_ms: 6_550
        }));
        assert!(!s.overlay_visible());
    }

    #[test]
    fn seen_intro_is_bypassed() {
        let (mut s, clock) = booted_home();
        assert!(s.is_home_mounted());
        assert!(!s.is_home_ready());
        clock.set(100);
        assert_eq!(
            s.tick(),
            vec![Event::HomeReady {
                bypassed_intro: true,
                at_ms: 100
            }]
        );
        assert!(s.boot().is_empty());
    }

    #[test]
    fn inputs_before_home_are_ignored() {
        let (mut s, clock) = session();
        s.boot();
        clock.set(100);
        s.tick();
        assert!(s
            .handle(Input::Navigate {
                section: Section::About
            })
            .is_empty());
        assert_eq!(s.navigation().current(), Section::Home);
        assert!(s.handle(Input::DevTools { open: true }).is_empty());
        assert!(!s.devtools().is_open());
        assert!(!s.progress().is_achievement_unlocked(AchievementId::CodeHunter));
    }

    #[test]
    fn secret_sequence_shakes_the_screen() {
        let (mut s, clock) = booted_home();
        clock.set(1_000);
        for code in crate::secret::SECRET_SEQUENCE {
            s.handle(Input::Key { code });
        }
        assert!(s.progress().is_achievement_unlocked(AchievementId::KingMode));
        assert!(s.frame().screen_shake);
        clock.set(1_499);
        s.tick();
        assert!(s.frame().screen_shake);
        clock.set(1_500);
        s.tick();
        assert!(!s.frame().screen_shake);
    }

    #[test]
    fn unlocks_become_toasts_once() {
        let (mut s, clock) = booted_home();
        assert_eq!(s.toasts().toasts().len(), 1);
        clock.set(200);
        let events = s.handle(Input::DevTools { open: true });
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::ToastShown { achievement: AchievementId::CodeHunter, .. })));
        clock.set(300);
        let again = s.handle(Input::DevTools { open: true });
        assert!(!again.iter().any(|e| matches!(e, Event::ToastShown { .. })));
        assert_eq!(s.toasts().toasts().len(), 2);
    }

    #[test]
    fn return_home_notifies_with_section_mood() {
        let (mut s, clock) = booted_home();
        clock.set(1_000);
        s.handle(Input::Navigate {
            section: Section::Projects,
        });
        clock.set(2_000);
        s.handle(Input::Navigate {
            section: Section::Home,
        });
        assert!(s.frame().screen_shake);

        clock.set(2_500);
        s.tick();
        assert_eq!(s.progress().eyes_mood(), EyesMood::Alert);
        assert_eq!(
            s.progress().current_notification().map(|n| n.kind.as_str()),
            Some("projects")
        );

        clock.set(3_100);
        s.tick();
        assert_eq!(s.progress().eyes_mood(), EyesMood::Happy);

        clock.set(20_000);
        s.tick();
        assert_eq!(s.progress().eyes_mood(), EyesMood::Cold);
        assert!(s.progress().current_notification().is_none());
        assert!(s
            .progress()
            .state()
            .visited_sections
            .contains(&"projects".to_string()));
    }

    #[test]
    fn dwell_runs_only_while_on_about() {
        let (mut s, clock) = booted_home();
        clock.set(1_000);
        s.handle(Input::Navigate {
            section: Section::About,
        });
        assert!(s.dwell().is_mounted());
        clock.set(11_500);
        s.tick();
        assert_eq!(s.progress().about_time_spent(), 10_000);
        s.handle(Input::Navigate {
            section: Section::Home,
        });
        assert!(!s.dwell().is_mounted());
        assert_eq!(s.progress().about_time_spent(), 10_500);
    }

    #[test]
    fn hovers_count_only_inside_their_section() {
        let (mut s, clock) = booted_home();
        s.handle(Input::HoverTechnology {
            name: "React".into(),
        });
        assert!(s.progress().state().hovered_technologies.is_empty());

        clock.set(1_000);
        s.handle(Input::Navigate {
            section: Section::Technologies,
        });
        let names: Vec<String> = s.catalog().technology_names().map(String::from).collect();
        let mut last = Vec::new();
        for name in names {
            last = s.handle(Input::HoverTechnology { name });
        }
        assert!(last.contains(&Event::AchievementUnlocked {
            id: AchievementId::FullDiagnosis,
            at_ms: 1_000
        }));
    }

    #[test]
    fn shutdown_flushes_dwell_and_cancels() {
        let (mut s, clock) = booted_home();
        clock.set(1_000);
        s.handle(Input::Navigate {
            section: Section::About,
        });
        clock.set(1_700);
        let events = s.shutdown();
        assert!(events.contains(&Event::DwellCommitted {
            section: Section::About,
            total_ms: 700,
            at_ms: 1_700
        }));
        assert!(s.next_deadline().is_none());
    }
}
