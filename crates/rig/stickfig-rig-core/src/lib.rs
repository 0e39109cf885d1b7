//! stickfig rig core (renderer-agnostic)
//!
//! A 2D articulated-skeleton animation kernel: rigid "stick" bones in a
//! rooted tree with forward transform propagation, a FABRIK-style IK solver
//! for drag-driven posing, a keyframe store with interpolated playback, and
//! a parser/writer for the textual skeleton description language.
//!
//! Rendering, pointer-to-canvas translation and the playback clock are
//! external collaborators: the kernel hands the renderer exact geometry
//! (`render`), consumes already-translated pointer events and playback
//! commands (`inputs`), and quantizes whatever cadence the host clock
//! delivers (`engine`).

pub mod config;
pub mod engine;
pub mod error;
pub mod ik;
pub mod inputs;
pub mod keyframes;
pub mod math;
pub mod outputs;
pub mod render;
pub mod sampling;
pub mod script;
pub mod skeleton;

// Re-exports for consumers (hosts and adapters)
pub use config::Config;
pub use engine::Engine;
pub use error::ScriptError;
pub use inputs::{Inputs, PlaybackCommand, PointerEvent};
pub use keyframes::{Keyframe, KeyframeTrack};
pub use math::Vec2;
pub use outputs::{CoreEvent, Outputs};
pub use render::{RenderShape, SelectorDot, SelectorKind, SELECTOR_RADIUS};
pub use sampling::sample_track;
pub use skeleton::{Bone, BoneId, LocalPose, Shape, Skeleton};
