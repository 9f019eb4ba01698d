//! # Starfolio Core Library
//!
//! State and sequencing core for the Starfolio portfolio front-end. The
//! presentation layer (markup, canvas renderers) is a thin shell over this
//! crate; everything with ordering rules, timers or idempotence lives here.
//!
//! ## Architecture
//!
//! - **Clock**: every timed component is driven by `tick(now_ms)`; nothing
//!   owns a thread or a real timer. [`Session`] reads its [`Clock`] once per
//!   input or tick and hands that instant to each component.
//! - **Progress Store**: achievements and exploration progress, with
//!   idempotent unlocks and set-inserts.
//! - **Notifications**: a single-slot contextual notification and an
//!   independently timed toast list for unlocks.
//! - **Sequencers**: the intro reveal, section navigation with cooldown,
//!   the secret key sequence, the dwell timer and the devtools signal.
//! - **Storage**: TOML configuration and per-store JSON persistence with a
//!   configurable [`PersistPolicy`].
//!
//! ## Key Components
//!
//! - [`Session`]: orchestrator that wires all components together
//! - [`ProgressStore`]: achievement and progress state
//! - [`IntroSequencer`]: the one-shot title reveal
//! - [`NavigationController`]: section transitions
//! - [`Config`]: application configuration

pub mod achievement;
pub mod catalog;
pub mod clock;
pub mod devtools;
pub mod dwell;
pub mod error;
pub mod events;
pub mod intro;
pub mod navigation;
pub mod notification;
pub mod pointer;
pub mod progress;
pub mod render;
pub mod secret;
pub mod session;
pub mod storage;

pub use achievement::{Achievement, AchievementId};
pub use catalog::Catalog;
pub use clock::{Clock, ManualClock, SystemClock};
pub use devtools::DevToolsMonitor;
pub use dwell::DwellTimer;
pub use error::{ChimeError, ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use intro::{IntroPhase, IntroSequencer, IntroState};
pub use navigation::{NavigationController, Section};
pub use notification::{Chime, ContextualNotifier, Notification, ToastQueue};
pub use pointer::{PointerFeed, PointerPosition};
pub use progress::{EyesMood, ProgressState, ProgressStore};
pub use render::{FrameView, Renderer};
pub use secret::SecretSequenceDetector;
pub use session::{Input, Session};
pub use storage::{Config, PersistPolicy, SessionStorage};
