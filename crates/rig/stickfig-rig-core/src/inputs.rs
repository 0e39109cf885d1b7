//! Input contracts for the engine.
//!
//! The host (an editor shell or playback harness) batches playback commands
//! and pointer events and passes them into `Engine::update()` each tick.
//! Pointer positions arrive already translated into skeleton space.

use serde::{Deserialize, Serialize};

use crate::math::Vec2;
use crate::skeleton::BoneId;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Inputs {
    /// Playback commands applied before pointer events and stepping.
    #[serde(default)]
    pub commands: Vec<PlaybackCommand>,
    /// Pointer events applied in order after commands.
    #[serde(default)]
    pub pointer: Vec<PointerEvent>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum PlaybackCommand {
    /// Enter animation mode on every bone and begin sampling.
    Play,
    /// Leave animation mode on every bone and rewind to frame 0.
    /// Unconditional and idempotent; stopping twice is safe.
    Stop,
    /// Jump the frame counter (wrapped modulo `max_frames`).
    Seek { frame: u32 },
    /// Capture the bone's current static local pose as a keyframe at the
    /// current frame (upsert).
    StoreKeyframe { bone: BoneId },
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { pos: Vec2 },
    Move { pos: Vec2 },
    Up,
}
