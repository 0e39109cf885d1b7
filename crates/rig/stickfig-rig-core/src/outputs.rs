//! Output contracts from the engine.
//!
//! Outputs carry the discrete semantic events of one update; the pose state
//! itself lives on the skeleton, which the host renders via the `render`
//! module.

use serde::{Deserialize, Serialize};

use crate::skeleton::BoneId;

/// Discrete semantic signals emitted during stepping.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[non_exhaustive]
pub enum CoreEvent {
    PlaybackStarted,
    PlaybackStopped,
    FrameAdvanced { old: u32, new: u32 },
    KeyframeStored { bone: BoneId, frame: u32 },
    BoneSelected { bone: BoneId },
    SelectionCleared,
    /// Catch-all for forward-compatible payloads.
    Custom {
        kind: String,
        data: serde_json::Value,
    },
}

/// Outputs returned by `Engine::update()`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub events: Vec<CoreEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.events.clear();
    }

    #[inline]
    pub fn push_event(&mut self, event: CoreEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
