//! Bone arena and the hierarchical transform model.
//!
//! Bones form rooted trees stored in an arena: records addressed by stable
//! [`BoneId`] indices, the parent relation as an optional index, children as
//! insertion-ordered index lists. Global pose is derived on every query by
//! walking the parent chain; nothing is cached, so ancestor mutations are
//! always reflected immediately.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::keyframes::KeyframeTrack;
use crate::math::Vec2;

/// Stable index of a bone within its skeleton's arena.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct BoneId(pub u32);

/// How the external renderer draws a bone.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    #[default]
    Line,
    Circle,
}

/// A bone's local transform: offset from the parent's tip (absolute for
/// roots) and rotation relative to the parent's global rotation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalPose {
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
}

impl LocalPose {
    #[inline]
    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// A node in a skeleton tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Bone {
    /// Display label. Not guaranteed unique.
    pub name: String,
    /// Static local pose, authored by hand or by the IK solver.
    pub pose: LocalPose,
    /// Distance from the bone origin to its tip along its rotated x axis.
    pub length: f32,
    pub width: f32,
    pub color: [f32; 3],
    pub shape: Shape,
    /// 0 = not an IK end-effector; > 0 = dragging this bone solves a chain
    /// of this many ancestors.
    pub ik_depth: u32,
    /// >= 2 marks this bone as the head of a chain rendered as one smooth
    /// curve instead of straight segments. Rendering hint only.
    pub bendy_depth: u32,
    /// Driven by keyframe playback rather than the static pose.
    pub animating: bool,
    /// Interpolated pose used while `animating` is set.
    pub sampled: LocalPose,
    pub keyframes: KeyframeTrack,
    parent: Option<BoneId>,
    children: Vec<BoneId>,
    detached: bool,
}

impl Bone {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            pose: LocalPose::default(),
            length: 30.0,
            width: 12.0,
            color: [0.0, 0.0, 0.0],
            shape: Shape::Line,
            ik_depth: 0,
            bendy_depth: 0,
            animating: false,
            sampled: LocalPose::default(),
            keyframes: KeyframeTrack::new(),
            parent: None,
            children: Vec::new(),
            detached: false,
        }
    }

    #[inline]
    pub fn parent(&self) -> Option<BoneId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[BoneId] {
        &self.children
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// The pose the transform model composes with: the sampled pose while
    /// the bone is animating, its static pose otherwise. Purely per-node;
    /// ancestors may be in a different mode.
    #[inline]
    pub fn effective_pose(&self) -> LocalPose {
        if self.animating {
            self.sampled
        } else {
            self.pose
        }
    }
}

/// Arena of bones forming one or more rooted trees.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Skeleton {
    bones: Vec<Bone>,
    roots: Vec<BoneId>,
}

impl Skeleton {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn roots(&self) -> &[BoneId] {
        &self.roots
    }

    #[inline]
    pub fn bone(&self, id: BoneId) -> &Bone {
        &self.bones[id.0 as usize]
    }

    #[inline]
    pub fn bone_mut(&mut self, id: BoneId) -> &mut Bone {
        &mut self.bones[id.0 as usize]
    }

    /// Non-panicking lookup; `None` for out-of-range or detached ids.
    pub fn get(&self, id: BoneId) -> Option<&Bone> {
        self.bones.get(id.0 as usize).filter(|b| !b.detached)
    }

    /// All attached bones, in arena order.
    pub fn iter(&self) -> impl Iterator<Item = (BoneId, &Bone)> {
        self.bones
            .iter()
            .enumerate()
            .filter(|(_, b)| !b.detached)
            .map(|(i, b)| (BoneId(i as u32), b))
    }

    /// Ids of all attached bones, in arena order.
    pub fn ids(&self) -> Vec<BoneId> {
        self.iter().map(|(id, _)| id).collect()
    }

    fn alloc(&mut self, bone: Bone) -> BoneId {
        let id = BoneId(self.bones.len() as u32);
        self.bones.push(bone);
        id
    }

    /// Create a new root bone.
    pub fn add_root(&mut self, name: &str) -> BoneId {
        let id = self.alloc(Bone::new(name));
        self.roots.push(id);
        id
    }

    /// Create a new bone parented to `parent` and append it to the parent's
    /// children. No validation on numeric ranges.
    pub fn add_child(
        &mut self,
        parent: BoneId,
        length: f32,
        rotation: f32,
        width: f32,
        color: [f32; 3],
    ) -> BoneId {
        debug_assert!(!self.bone(parent).detached, "parent bone is detached");
        let mut bone = Bone::new("stick");
        bone.length = length;
        bone.pose.rotation = rotation;
        bone.width = width;
        bone.color = color;
        bone.parent = Some(parent);
        let id = self.alloc(bone);
        self.bone_mut(parent).children.push(id);
        id
    }

    /// Unlink a subtree from the tree. Slots are tombstoned, never reused;
    /// an orphaned bone has no meaning and is skipped by traversals.
    pub fn detach(&mut self, id: BoneId) {
        let subtree = self.descendants_of(id);
        if let Some(parent) = self.bones[id.0 as usize].parent.take() {
            self.bones[parent.0 as usize].children.retain(|&c| c != id);
        } else {
            self.roots.retain(|&r| r != id);
        }
        for d in subtree {
            self.bones[d.0 as usize].detached = true;
        }
    }

    /// Root of the tree containing `id`.
    pub fn root_of(&self, id: BoneId) -> BoneId {
        let mut cur = id;
        while let Some(parent) = self.bone(cur).parent {
            cur = parent;
        }
        cur
    }

    /// Local offset resolved through the bone's animation mode.
    #[inline]
    pub fn local_offset(&self, id: BoneId) -> Vec2 {
        self.bone(id).effective_pose().offset()
    }

    /// Local rotation resolved through the bone's animation mode.
    #[inline]
    pub fn local_rotation(&self, id: BoneId) -> f32 {
        self.bone(id).effective_pose().rotation
    }

    /// Rotation in world space: the local rotation composed with every
    /// ancestor's. O(depth) recursive parent walk.
    pub fn global_rotation(&self, id: BoneId) -> f32 {
        let mut rot = self.local_rotation(id);
        if let Some(parent) = self.bone(id).parent {
            rot += self.global_rotation(parent);
        }
        rot
    }

    /// Bone origin in world space: the local offset from the parent's tip,
    /// or the offset itself for roots. O(depth).
    pub fn global_position(&self, id: BoneId) -> Vec2 {
        let local = self.local_offset(id);
        match self.bone(id).parent {
            Some(parent) => {
                let reach = Vec2::from_angle(self.global_rotation(parent))
                    .scale(self.bone(parent).length);
                self.global_position(parent).add(reach).add(local)
            }
            None => local,
        }
    }

    /// The far end of the bone along its own rotated length axis.
    pub fn tip(&self, id: BoneId) -> Vec2 {
        self.global_position(id)
            .add(Vec2::from_angle(self.global_rotation(id)).scale(self.bone(id).length))
    }

    /// True when the bone or any of its ancestors is in animation mode.
    /// Gates direct manipulation during playback.
    pub fn is_animating(&self, id: BoneId) -> bool {
        let mut cur = Some(id);
        while let Some(b) = cur {
            let bone = self.bone(b);
            if bone.animating {
                return true;
            }
            cur = bone.parent;
        }
        false
    }

    /// Pre-order traversal: self first, then each child's full subtree.
    /// Defensively de-duplicated; the tree invariant should already prevent
    /// a bone from being reachable twice.
    pub fn descendants_of(&self, id: BoneId) -> Vec<BoneId> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        self.collect_preorder(id, &mut out, &mut seen);
        out
    }

    fn collect_preorder(&self, id: BoneId, out: &mut Vec<BoneId>, seen: &mut HashSet<BoneId>) {
        if !seen.insert(id) {
            return;
        }
        out.push(id);
        for &child in &self.bone(id).children {
            self.collect_preorder(child, out, seen);
        }
    }

    /// First bone in `id`'s subtree (self included, depth-first in child
    /// order) whose `bendy_depth >= 2`, or `None`. Decides whether the bone
    /// participates in a smoothed curve segment.
    pub fn closest_bendy_descendant(&self, id: BoneId) -> Option<BoneId> {
        if self.bone(id).bendy_depth >= 2 {
            return Some(id);
        }
        for &child in &self.bone(id).children {
            if let Some(found) = self.closest_bendy_descendant(child) {
                return Some(found);
            }
        }
        None
    }

    /// First attached bone with this name, in arena order.
    pub fn find_by_name(&self, name: &str) -> Option<BoneId> {
        self.iter()
            .find(|(_, b)| b.name == name)
            .map(|(id, _)| id)
    }
}
