//! Playback configuration.

use serde::{Deserialize, Serialize};

/// Timing constants for keyframe playback.
///
/// The host clock is expected to tick at `1000 / frame_rate` milliseconds;
/// the frame counter wraps modulo `max_frames`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Config {
    pub frame_rate: f32,
    pub max_frames: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frame_rate: 30.0,
            max_frames: 120,
        }
    }
}
