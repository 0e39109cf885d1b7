//! Per-bone keyframe storage.
//!
//! Keyframes are created or overwritten only by explicit insertion and never
//! deleted; the list stays sorted ascending and frame-unique after every
//! insertion.

use serde::{Deserialize, Serialize};

/// A stored sample of a bone's local pose at a specific integer frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub frame: u32,
    pub rotation: f32,
    pub x: f32,
    pub y: f32,
}

/// Ordered, frame-unique keyframe list.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyframeTrack {
    keys: Vec<Keyframe>,
}

impl KeyframeTrack {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[inline]
    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    /// Upsert by frame: an existing keyframe at `frame` is overwritten in
    /// place, otherwise a new one is appended. The list is re-sorted
    /// ascending after every insertion. Idempotent for identical calls.
    pub fn insert(&mut self, frame: u32, rotation: f32, x: f32, y: f32) {
        if let Some(k) = self.keys.iter_mut().find(|k| k.frame == frame) {
            k.rotation = rotation;
            k.x = x;
            k.y = y;
        } else {
            self.keys.push(Keyframe {
                frame,
                rotation,
                x,
                y,
            });
        }
        self.keys.sort_by_key(|k| k.frame);
        debug_assert!(self.keys.windows(2).all(|w| w[0].frame < w[1].frame));
    }

    /// Exact-match lookup.
    pub fn get_at(&self, frame: u32) -> Option<&Keyframe> {
        self.keys.iter().find(|k| k.frame == frame)
    }

    /// Most recent keyframe at or before `frame`.
    pub fn active_before(&self, frame: u32) -> Option<&Keyframe> {
        self.keys.iter().take_while(|k| k.frame <= frame).last()
    }
}
