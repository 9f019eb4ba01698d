//! Text renderer for the live session.
//!
//! Prints one status line whenever something a renderer would draw
//! differently has changed.

use std::io::Write;

use starfolio_core::{EyesMood, FrameView, Renderer};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Shown {
    mood: EyesMood,
    devtools_open: bool,
    screen_shake: bool,
    gaze: (i32, i32),
}

pub struct TextRenderer<W: Write> {
    out: W,
    last: Option<Shown>,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, last: None }
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, frame: &FrameView) {
        let (gx, gy) = frame.gaze();
        // Gaze is compared in tenths.
        let shown = Shown {
            mood: frame.mood,
            devtools_open: frame.devtools_open,
            screen_shake: frame.screen_shake,
            gaze: ((gx * 10.0).round() as i32, (gy * 10.0).round() as i32),
        };
        if self.last == Some(shown) {
            return;
        }
        self.last = Some(shown);

        let mut line = format!(
            "[{}] eyes {} gaze ({:+.1}, {:+.1})",
            frame.frame_ms, frame.mood, gx, gy
        );
        if frame.devtools_open {
            line.push_str(" devtools");
        }
        if frame.screen_shake {
            line.push_str(" shake");
        }
        if let Err(e) = writeln!(self.out, "{line}") {
            debug!(error = %e, "frame line not written");
        }
    }
}
