//! Live session on the system clock.
//!
//! Ticks every frame on a tokio interval and reads one command per stdin
//! line:
//!
//! ```text
//! key 38 | key ArrowUp      go about            hover React
//! project api-showcase      link github         devtools
//! pointer 640 360 1280 720  panel on|off        quit
//! ```
//!
//! Progress and intro state are saved on exit under the configured
//! persistence policies.

use std::sync::Arc;
use std::time::Duration;

use starfolio_core::secret::key_code;
use starfolio_core::{Config, Input, Renderer, Section, Session, SessionStorage, SystemClock};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use super::render::TextRenderer;
use super::{load_intro, load_progress, print_events, save_intro, save_progress};

const FRAME_MS: u64 = 16;

#[derive(Debug, PartialEq)]
enum LiveCommand {
    Input(Input),
    Quit,
}

pub fn run(for_ms: Option<u64>) -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_live(for_ms))
}

async fn run_live(for_ms: Option<u64>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let storage = SessionStorage::open_default()?;
    let mut session = Session::new(config.clone(), Arc::new(SystemClock))
        .with_progress(load_progress(&storage, &config))
        .with_intro_state(load_intro(&storage, &config));
    let mut renderer = TextRenderer::new(std::io::stderr());
    info!(?for_ms, "live session started");

    print_events(&session.boot())?;

    let mut frames = tokio::time::interval(Duration::from_millis(FRAME_MS));
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let deadline = for_ms.map(|ms| tokio::time::Instant::now() + Duration::from_millis(ms));
    let stop = async move {
        match deadline {
            Some(at) => tokio::time::sleep_until(at).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::pin!(stop);

    loop {
        tokio::select! {
            _ = frames.tick() => {
                print_events(&session.tick())?;
                renderer.render(&session.frame());
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(line) => match parse_command(&line) {
                        Ok(Some(LiveCommand::Quit)) => break,
                        Ok(Some(LiveCommand::Input(input))) => {
                            print_events(&session.handle(input))?;
                        }
                        Ok(None) => {}
                        Err(msg) => eprintln!("{msg}"),
                    },
                    None => {
                        debug!("stdin closed");
                        stdin_open = false;
                        if for_ms.is_none() {
                            break;
                        }
                    }
                }
            }
            _ = &mut stop => break,
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    print_events(&session.shutdown())?;
    save_progress(&storage, &config, session.progress())?;
    save_intro(&storage, &config, session.intro_state())?;
    eprintln!("achievements: {}", session.progress().summary());
    Ok(())
}

fn parse_command(line: &str) -> Result<Option<LiveCommand>, String> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = parts.collect();
    let joined = rest.join(" ");
    let required = |what: &str| {
        if joined.is_empty() {
            Err(format!("usage: {verb} <{what}>"))
        } else {
            Ok(joined.clone())
        }
    };

    let input = match verb {
        "quit" | "exit" => return Ok(Some(LiveCommand::Quit)),
        "key" => {
            let arg = rest.first().ok_or("usage: key <code|name>")?;
            let code = arg
                .parse::<u32>()
                .ok()
                .or_else(|| key_code(arg))
                .ok_or_else(|| format!("unknown key: {arg}"))?;
            Input::Key { code }
        }
        "go" => {
            let section = required("section")?
                .parse::<Section>()
                .map_err(|e| e.to_string())?;
            Input::Navigate { section }
        }
        "hover" => Input::HoverTechnology {
            name: required("technology")?,
        },
        "project" => Input::OpenProject {
            id: required("project id")?,
        },
        "link" => Input::ClickExternalLink {
            name: required("link")?,
        },
        "devtools" => Input::DevTools {
            open: rest.first() != Some(&"closed"),
        },
        "pointer" => {
            let nums: Vec<f64> = rest
                .iter()
                .map(|s| s.parse::<f64>())
                .collect::<Result<_, _>>()
                .map_err(|e| format!("pointer: {e}"))?;
            let &[x, y, width, height] = nums.as_slice() else {
                return Err("usage: pointer <x> <y> <width> <height>".into());
            };
            Input::Pointer {
                x,
                y,
                width,
                height,
            }
        }
        "panel" => {
            let show = match rest.first() {
                Some(&"on") => true,
                Some(&"off") => false,
                _ => return Err("usage: panel on|off".into()),
            };
            Input::ShowPanel { show }
        }
        other => return Err(format!("unknown command: {other}")),
    };
    Ok(Some(LiveCommand::Input(input)))
}
