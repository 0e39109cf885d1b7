//! FABRIK-style inverse kinematics over a bone chain.
//!
//! Free functions with no persistent solver state: [`solve_chain`] is
//! exactly one forward+backward reaching pass, not an iterate-to-convergence
//! loop. Convergence across a drag gesture emerges from re-invoking the
//! solve once per pointer update on the same point vector.

use crate::math::Vec2;
use crate::skeleton::{BoneId, Skeleton};

/// Targets closer than this to the moving endpoint trigger the
/// rigid-translation fallback in [`reach`].
pub const DEGENERATE_EPS: f32 = 1e-6;

/// Walk `bone -> parent -> ...` collecting exactly `max_depth` bones
/// (fewer when the chain runs out of ancestors). `None` when
/// `max_depth == 0`.
pub fn ancestor_chain(skeleton: &Skeleton, bone: BoneId, max_depth: u32) -> Option<Vec<BoneId>> {
    if max_depth == 0 {
        return None;
    }
    let mut chain = Vec::with_capacity(max_depth as usize);
    let mut cur = Some(bone);
    while let Some(id) = cur {
        if chain.len() >= max_depth as usize {
            break;
        }
        chain.push(id);
        cur = skeleton.bone(id).parent();
    }
    Some(chain)
}

/// Tip points of the effector and its `ik_depth` ancestors: index 0 is the
/// effector's tip, the last entry the anchor. `None` when the bone is not
/// an IK end-effector.
pub fn chain_points(skeleton: &Skeleton, bone: BoneId) -> Option<Vec<Vec2>> {
    let depth = skeleton.bone(bone).ik_depth;
    if depth == 0 {
        return None;
    }
    let mut points = Vec::with_capacity(depth as usize + 1);
    let mut cur = Some(bone);
    while let Some(id) = cur {
        if points.len() > depth as usize {
            break;
        }
        points.push(skeleton.tip(id));
        cur = skeleton.bone(id).parent();
    }
    Some(points)
}

/// One reach step: move `head` onto `target` and slide `tail` along the ray
/// from `target` through the old tail, scaled to the original `head`-`tail`
/// distance. Keeps the segment's rigid length invariant exactly (up to
/// floating error).
///
/// When `target` coincides with `tail` the ray direction is undefined; the
/// segment is translated rigidly instead (`tail' = target + (tail - head)`),
/// which also keeps the length exact and the pass continuous.
pub fn reach(head: Vec2, tail: Vec2, target: Vec2) -> (Vec2, Vec2) {
    let current_len = tail.sub(head).length();
    let stretched = tail.sub(target);
    let stretched_len = stretched.length();

    if stretched_len <= DEGENERATE_EPS {
        log::debug!("ik reach: target coincides with tail, translating segment rigidly");
        return (target, target.add(tail.sub(head)));
    }

    let scale = current_len / stretched_len;
    (target, target.add(stretched.scale(scale)))
}

/// One FABRIK iteration over `points` (ordered effector tip first, anchor
/// last): a forward pass toward `target` with the last point forced to the
/// propagated value, then a backward pass from the anchor position captured
/// before the forward pass, with the first point forced.
///
/// Every inter-point distance is preserved; the first point ends up as close
/// to `target` as a single iteration allows.
pub fn solve_chain(points: &mut [Vec2], target: Vec2) {
    if points.len() < 2 {
        return;
    }
    let anchor = points[points.len() - 1];

    // Forward
    let mut tgt = target;
    for i in 0..points.len() - 1 {
        let (head, tail) = reach(points[i], points[i + 1], tgt);
        points[i] = head;
        tgt = tail;
    }
    let last = points.len() - 1;
    points[last] = tgt;

    // Backward
    let mut tgt = anchor;
    for i in (1..points.len()).rev() {
        let (head, tail) = reach(points[i], points[i - 1], tgt);
        points[i] = head;
        tgt = tail;
    }
    points[0] = tgt;
}

/// Write a solved point chain back onto the bone chain as local rotations.
///
/// Walks `ik_depth` bones up from the effector; each bone's new local
/// rotation is the world angle of `points[i] - points[i+1]` minus the
/// parent's global rotation at that moment. Ancestors are written after
/// their descendants, so each descendant is assigned against its parent's
/// not-yet-updated rotation; repeated solves over a gesture converge the
/// residual away. No-op when `ik_depth == 0`.
pub fn apply_chain(skeleton: &mut Skeleton, bone: BoneId, points: &[Vec2]) {
    let depth = skeleton.bone(bone).ik_depth as usize;
    if depth == 0 {
        return;
    }
    let mut cur = Some(bone);
    let mut i = 0;
    while let Some(id) = cur {
        if i >= depth || i + 1 >= points.len() {
            break;
        }
        let world = points[i].sub(points[i + 1]).angle();
        let parent = skeleton.bone(id).parent();
        let parent_rot = parent.map(|p| skeleton.global_rotation(p)).unwrap_or(0.0);
        skeleton.bone_mut(id).pose.rotation = world - parent_rot;
        cur = parent;
        i += 1;
    }
}
