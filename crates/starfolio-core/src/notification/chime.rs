use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::error::ChimeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Triangle,
}

/// One note of the unlock chime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChimeTone {
    pub waveform: Waveform,
    pub frequency_hz: f32,
    /// Offset from the start of the chime, seconds.
    pub start_s: f32,
    pub stop_s: f32,
    /// Starting gain; ramps linearly to 0.01 at `stop_s`.
    pub gain: f32,
}

const fn tone(waveform: Waveform, frequency_hz: f32, start_s: f32, stop_s: f32, gain: f32) -> ChimeTone {
    ChimeTone {
        waveform,
        frequency_hz,
        start_s,
        stop_s,
        gain,
    }
}

/// Rising C-major arpeggio with a triangle harmony and a C7 shimmer.
pub const LEVEL_UP: &[ChimeTone] = &[
    tone(Waveform::Sine, 523.25, 0.0, 0.5, 0.3),
    tone(Waveform::Sine, 659.25, 0.1, 0.5, 0.3),
    tone(Waveform::Sine, 783.99, 0.2, 0.5, 0.3),
    tone(Waveform::Sine, 1046.50, 0.3, 0.5, 0.3),
    tone(Waveform::Triangle, 1046.50, 0.0, 0.4, 0.15),
    tone(Waveform::Triangle, 1318.51, 0.15, 0.4, 0.15),
    tone(Waveform::Triangle, 1567.98, 0.3, 0.4, 0.15),
    tone(Waveform::Sine, 2093.0, 0.2, 0.6, 0.1),
];

/// Audio cue played when a toast appears.
///
/// Implementations may fail; callers log and move on.
pub trait Chime: Send {
    fn play(&self, tones: &[ChimeTone]) -> Result<(), ChimeError>;
}

/// No audio backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentChime;

impl Chime for SilentChime {
    fn play(&self, _tones: &[ChimeTone]) -> Result<(), ChimeError> {
        Ok(())
    }
}

/// Rings the terminal bell on stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalBell;

impl Chime for TerminalBell {
    fn play(&self, tones: &[ChimeTone]) -> Result<(), ChimeError> {
        if tones.is_empty() {
            return Err(ChimeError::Unavailable("empty chime".into()));
        }
        let mut err = std::io::stderr().lock();
        err.write_all(b"\x07")?;
        err.flush()?;
        Ok(())
    }
}
