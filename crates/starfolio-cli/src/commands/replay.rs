//! Scripted replay against a manual clock.
//!
//! ```json
//! {
//!   "seen_intro": false,
//!   "until_ms": 12000,
//!   "steps": [
//!     { "at_ms": 7000, "input": { "type": "navigate", "section": "about" } },
//!     { "at_ms": 7100, "input": { "type": "dev_tools", "open": true } }
//!   ]
//! }
//! ```

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use starfolio_core::notification::SilentChime;
use starfolio_core::{Config, Input, IntroState, ManualClock, Session};
use tracing::info;

use super::print_events;

#[derive(Debug, Deserialize)]
struct Script {
    #[serde(default)]
    seen_intro: bool,
    /// Keep ticking until this instant after the last step.
    #[serde(default)]
    until_ms: Option<u64>,
    #[serde(default)]
    steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
struct Step {
    at_ms: u64,
    input: Input,
}

pub fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read script {}: {e}", path.display()))?;
    let mut script: Script = serde_json::from_str(&content)
        .map_err(|e| format!("invalid script {}: {e}", path.display()))?;
    script.steps.sort_by_key(|s| s.at_ms);

    let config = Config::load()?;
    let clock = ManualClock::new(0);
    let mut session = Session::new(config, Arc::new(clock.clone()))
        .with_chime(Box::new(SilentChime))
        .with_intro_state(IntroState {
            has_seen_intro: script.seen_intro,
            intro_complete: script.seen_intro,
        });
    info!(steps = script.steps.len(), "replaying script");

    print_events(&session.boot())?;
    for step in script.steps {
        clock.set(step.at_ms);
        print_events(&session.handle(step.input))?;
    }
    if let Some(until) = script.until_ms {
        if until > session.now_ms() {
            clock.set(until);
        }
    }
    print_events(&session.tick())?;
    print_events(&session.shutdown())?;

    eprintln!("achievements: {}", session.progress().summary());
    Ok(())
}
