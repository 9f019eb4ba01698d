use clap::Subcommand;
use starfolio_core::storage::PROGRESS_KEY;
use starfolio_core::{Clock, Config, SessionStorage, SystemClock};

use super::{load_progress, save_progress};

#[derive(Subcommand)]
pub enum ProgressAction {
    /// Print achievements and exploration progress
    Show {
        /// Print the raw progress state as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete the saved progress so the next session starts fresh
    Reset,
    /// Unlock an achievement by id (e.g. "code_hunter")
    Unlock {
        id: String,
        /// Fail on unknown ids instead of ignoring them
        #[arg(long)]
        strict: bool,
    },
}

pub fn run(action: ProgressAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let storage = SessionStorage::open_default()?;
    let mut store = load_progress(&storage, &config);

    match action {
        ProgressAction::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(store.state())?);
                return Ok(());
            }
            println!("Achievements: {}", store.summary());
            for a in store.achievements() {
                let mark = if a.unlocked { "x" } else { " " };
                let when = a
                    .unlocked_at_utc()
                    .map(|t| format!(" ({})", t.format("%Y-%m-%d %H:%M")))
                    .unwrap_or_default();
                println!("[{mark}] {} {} - {}{when}", a.icon, a.name, a.description);
            }
            let state = store.state();
            println!("Sections visited: {}", state.visited_sections.len());
            println!("Technologies hovered: {}", state.hovered_technologies.len());
            println!("Projects opened: {}", state.visited_projects.len());
            println!("Links followed: {}", state.clicked_external_links.len());
            println!("Time on about: {}s", state.about_time_spent / 1_000);
        }
        ProgressAction::Reset => {
            storage.remove(PROGRESS_KEY)?;
            println!("progress reset");
        }
        ProgressAction::Unlock { id, strict } => {
            let now = SystemClock.now_ms();
            let event = if strict {
                store.try_unlock_named(&id, now)?
            } else {
                store.unlock_named(&id, now)
            };
            match event {
                Some(_) => {
                    save_progress(&storage, &config, &store)?;
                    println!("unlocked: {id} ({})", store.summary());
                }
                None => println!("nothing to unlock: {id}"),
            }
        }
    }
    Ok(())
}
