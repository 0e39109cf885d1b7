//! Engine: skeleton ownership, playback stepping, pointer-driven posing.
//!
//! All skeleton mutation happens synchronously inside `update()`: commands
//! first, then pointer events, then frame advancement. Single-threaded by
//! construction; `&mut` access to the engine is the mutual-exclusion
//! discipline, no locking primitives are needed.

use std::f32::consts::PI;

use crate::config::Config;
use crate::ik;
use crate::inputs::{Inputs, PlaybackCommand, PointerEvent};
use crate::math::Vec2;
use crate::outputs::{CoreEvent, Outputs};
use crate::render::{grab_point, SELECTOR_RADIUS};
use crate::sampling::sample_track;
use crate::skeleton::{BoneId, Skeleton};

/// Extra slop around a grab point when hit-testing pointer-down events.
const PICK_SLOP: f32 = 4.0;

/// An in-flight drag gesture.
///
/// IK drags keep the chain-point vector captured at pointer-down and refine
/// it in place on every move; that vector is the solver's only state and
/// dies with the gesture.
#[derive(Clone, Debug)]
enum Drag {
    /// Root bones follow the pointer directly.
    Translate { bone: BoneId },
    /// Non-IK bones rotate toward the pointer.
    Rotate { bone: BoneId },
    /// IK effectors run one solve per pointer update.
    Solve { bone: BoneId, points: Vec<Vec2> },
}

impl Drag {
    fn bone(&self) -> BoneId {
        match self {
            Drag::Translate { bone } | Drag::Rotate { bone } | Drag::Solve { bone, .. } => *bone,
        }
    }
}

/// Owns a skeleton plus the playback and interaction state around it.
#[derive(Debug, Default)]
pub struct Engine {
    skeleton: Skeleton,
    cfg: Config,
    frame: u32,
    playing: bool,
    frame_accum: f32,
    selected: Option<BoneId>,
    drag: Option<Drag>,
    outputs: Outputs,
}

impl Engine {
    pub fn new(skeleton: Skeleton, cfg: Config) -> Self {
        Self {
            skeleton,
            cfg,
            frame: 0,
            playing: false,
            frame_accum: 0.0,
            selected: None,
            drag: None,
            outputs: Outputs::default(),
        }
    }

    #[inline]
    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    #[inline]
    pub fn skeleton_mut(&mut self) -> &mut Skeleton {
        &mut self.skeleton
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    #[inline]
    pub fn frame(&self) -> u32 {
        self.frame
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Bone selected by the last pointer-down hit, if any.
    #[inline]
    pub fn selected(&self) -> Option<BoneId> {
        self.selected
    }

    /// Step by `dt` seconds with the given inputs, producing this update's
    /// events. While playing, whole frames are advanced as `dt * frame_rate`
    /// accumulates, wrapping modulo `max_frames`; a host ticking at
    /// `1000 / frame_rate` ms advances exactly one frame per call.
    pub fn update(&mut self, dt: f32, inputs: Inputs) -> &Outputs {
        self.outputs.clear();

        for cmd in inputs.commands {
            self.apply_command(cmd);
        }
        for ev in inputs.pointer {
            self.apply_pointer(ev);
        }

        if self.playing {
            self.frame_accum += dt * self.cfg.frame_rate;
            while self.frame_accum >= 1.0 {
                self.frame_accum -= 1.0;
                self.advance_frame();
            }
        }

        &self.outputs
    }

    fn apply_command(&mut self, cmd: PlaybackCommand) {
        match cmd {
            PlaybackCommand::Play => {
                if !self.playing {
                    self.playing = true;
                    self.frame_accum = 0.0;
                    self.set_animating_all(true);
                    self.sample_all();
                    self.outputs.push_event(CoreEvent::PlaybackStarted);
                }
            }
            PlaybackCommand::Stop => {
                // Unconditional and idempotent: stopping twice is safe.
                self.playing = false;
                self.frame = 0;
                self.frame_accum = 0.0;
                self.set_animating_all(false);
                self.outputs.push_event(CoreEvent::PlaybackStopped);
            }
            PlaybackCommand::Seek { frame } => {
                self.frame = frame % self.cfg.max_frames.max(1);
                if self.playing {
                    self.sample_all();
                }
            }
            PlaybackCommand::StoreKeyframe { bone } => {
                if self.skeleton.get(bone).is_none() {
                    log::warn!("store keyframe: unknown bone {bone:?}");
                    return;
                }
                let frame = self.frame;
                let b = self.skeleton.bone_mut(bone);
                let pose = b.pose;
                b.keyframes.insert(frame, pose.rotation, pose.x, pose.y);
                self.outputs
                    .push_event(CoreEvent::KeyframeStored { bone, frame });
            }
        }
    }

    fn apply_pointer(&mut self, ev: PointerEvent) {
        match ev {
            PointerEvent::Down { pos } => self.pointer_down(pos),
            PointerEvent::Move { pos } => self.pointer_move(pos),
            PointerEvent::Up => {
                self.drag = None;
            }
        }
    }

    fn pointer_down(&mut self, pos: Vec2) {
        let hit = self.pick(pos);
        match hit {
            Some(bone) => {
                self.selected = Some(bone);
                self.drag = Some(if self.skeleton.bone(bone).is_root() {
                    Drag::Translate { bone }
                } else if self.skeleton.bone(bone).ik_depth > 0 {
                    match ik::chain_points(&self.skeleton, bone) {
                        Some(points) => Drag::Solve { bone, points },
                        None => Drag::Rotate { bone },
                    }
                } else {
                    Drag::Rotate { bone }
                });
                self.outputs.push_event(CoreEvent::BoneSelected { bone });
            }
            None => {
                self.selected = None;
                self.drag = None;
                self.outputs.push_event(CoreEvent::SelectionCleared);
            }
        }
    }

    /// First bone whose grab point lies within picking distance of `pos`.
    fn pick(&self, pos: Vec2) -> Option<BoneId> {
        for &root in self.skeleton.roots() {
            for id in self.skeleton.descendants_of(root) {
                let grab = grab_point(&self.skeleton, id);
                if grab.distance(pos) < SELECTOR_RADIUS + PICK_SLOP {
                    return Some(id);
                }
            }
        }
        None
    }

    fn pointer_move(&mut self, pos: Vec2) {
        let Some(drag) = &self.drag else {
            return;
        };
        // Mutual exclusion between live playback and manual posing: while
        // the bone or any ancestor is in animation mode, pose edits are
        // suppressed.
        if self.skeleton.is_animating(drag.bone()) {
            return;
        }
        match &mut self.drag {
            Some(Drag::Translate { bone }) => {
                let b = self.skeleton.bone_mut(*bone);
                b.pose.x = pos.x;
                b.pose.y = pos.y;
            }
            Some(Drag::Rotate { bone }) => {
                let origin = self.skeleton.global_position(*bone);
                let toward = origin.sub(pos).angle() + PI;
                let parent_rot = match self.skeleton.bone(*bone).parent() {
                    Some(p) => self.skeleton.global_rotation(p),
                    None => 0.0,
                };
                self.skeleton.bone_mut(*bone).pose.rotation = toward - parent_rot;
            }
            Some(Drag::Solve { bone, points }) => {
                ik::solve_chain(points, pos);
                ik::apply_chain(&mut self.skeleton, *bone, points);
            }
            None => {}
        }
    }

    fn advance_frame(&mut self) {
        let old = self.frame;
        self.frame = (self.frame + 1) % self.cfg.max_frames.max(1);
        self.sample_all();
        self.outputs.push_event(CoreEvent::FrameAdvanced {
            old,
            new: self.frame,
        });
    }

    fn set_animating_all(&mut self, animating: bool) {
        for id in self.skeleton.ids() {
            self.skeleton.bone_mut(id).animating = animating;
        }
    }

    fn sample_all(&mut self) {
        let frame = self.frame as f32;
        for id in self.skeleton.ids() {
            let bone = self.skeleton.bone_mut(id);
            let fallback = bone.pose;
            bone.sampled = sample_track(&bone.keyframes, fallback, frame);
        }
    }
}
