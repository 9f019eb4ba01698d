pub mod config;
pub mod live;
pub mod progress;
pub mod replay;
mod render;

use std::io::Write;

use starfolio_core::storage::{INTRO_KEY, PROGRESS_KEY};
use starfolio_core::{Config, Event, IntroState, ProgressStore, SessionStorage};

/// Progress as last persisted under the configured policy.
fn load_progress(storage: &SessionStorage, config: &Config) -> ProgressStore {
    ProgressStore::from_state(storage.load(PROGRESS_KEY, &config.persistence.progress))
}

fn save_progress(
    storage: &SessionStorage,
    config: &Config,
    store: &ProgressStore,
) -> Result<(), Box<dyn std::error::Error>> {
    storage.save(PROGRESS_KEY, store.state(), &config.persistence.progress)?;
    Ok(())
}

fn load_intro(storage: &SessionStorage, config: &Config) -> IntroState {
    storage.load(INTRO_KEY, &config.persistence.intro)
}

fn save_intro(
    storage: &SessionStorage,
    config: &Config,
    state: IntroState,
) -> Result<(), Box<dyn std::error::Error>> {
    storage.save(INTRO_KEY, &state, &config.persistence.intro)?;
    Ok(())
}

/// One JSON object per line on stdout.
fn print_events(events: &[Event]) -> Result<(), Box<dyn std::error::Error>> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for event in events {
        serde_json::to_writer(&mut out, event)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}
