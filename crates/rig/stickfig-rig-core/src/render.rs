//! Render geometry extraction.
//!
//! The kernel never draws. These functions turn a skeleton into the exact
//! geometry an external renderer strokes and fills: straight segments,
//! circles, the joint point lists of bendy chains, and the grab-point
//! overlay. Curve smoothing itself belongs to the renderer.

use serde::{Deserialize, Serialize};

use crate::ik;
use crate::math::Vec2;
use crate::skeleton::{BoneId, Shape, Skeleton};

/// Radius of the grab-point overlay dots; pointer hit-testing allows a
/// little extra slop on top.
pub const SELECTOR_RADIUS: f32 = 5.0;

/// One drawable produced from a bone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RenderShape {
    Segment {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: [f32; 3],
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: [f32; 3],
    },
    /// Joint points of a bendy chain, ordered anchor to effector tip; the
    /// renderer draws one smooth curve through them.
    Curve {
        points: Vec<Vec2>,
        width: f32,
        color: [f32; 3],
    },
}

/// Kind of grab point, for overlay styling.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum SelectorKind {
    Root,
    IkHandle,
    Joint,
}

/// One grab-point overlay dot.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectorDot {
    pub bone: BoneId,
    pub pos: Vec2,
    pub kind: SelectorKind,
}

/// Drawables for every bone of every tree, in pre-order.
pub fn shapes(skeleton: &Skeleton) -> Vec<RenderShape> {
    let mut out = Vec::new();
    for &root in skeleton.roots() {
        for id in skeleton.descendants_of(root) {
            shape_for(skeleton, id, &mut out);
        }
    }
    out
}

fn shape_for(skeleton: &Skeleton, id: BoneId, out: &mut Vec<RenderShape>) {
    let bone = skeleton.bone(id);
    match bone.shape {
        Shape::Line => {
            if bone.bendy_depth >= 2 {
                out.push(RenderShape::Curve {
                    points: bendy_points(skeleton, id),
                    width: bone.width,
                    color: bone.color,
                });
            } else if !covered_by_bendy(skeleton, id) {
                out.push(RenderShape::Segment {
                    from: skeleton.global_position(id),
                    to: skeleton.tip(id),
                    width: bone.width,
                    color: bone.color,
                });
            }
        }
        Shape::Circle => {
            let center = skeleton
                .global_position(id)
                .add(Vec2::from_angle(skeleton.global_rotation(id)).scale(bone.length / 2.0));
            out.push(RenderShape::Circle {
                center,
                radius: bone.length / 2.0,
                color: bone.color,
            });
        }
    }
}

/// Whether this bone's straight segment is covered by the curve of its
/// closest bendy descendant's chain. The chain is taken anchor-first with
/// the anchor-most element dropped for chains longer than two, matching the
/// curve's own point list.
fn covered_by_bendy(skeleton: &Skeleton, id: BoneId) -> bool {
    let Some(head) = skeleton.closest_bendy_descendant(id) else {
        return false;
    };
    let depth = skeleton.bone(head).bendy_depth;
    let Some(mut chain) = ik::ancestor_chain(skeleton, head, depth) else {
        return false;
    };
    chain.reverse();
    let skip = usize::from(chain.len() > 2);
    chain[skip..].contains(&id)
}

/// Joint points of the bendy chain headed by `head`, anchor to effector tip.
fn bendy_points(skeleton: &Skeleton, head: BoneId) -> Vec<Vec2> {
    let depth = skeleton.bone(head).bendy_depth;
    let mut chain = ik::ancestor_chain(skeleton, head, depth).unwrap_or_default();
    chain.reverse();

    let mut points = Vec::with_capacity(chain.len() + 1);
    if chain.len() == 2 {
        points.push(skeleton.global_position(chain[0]));
    }
    for &id in chain.iter().skip(1) {
        points.push(skeleton.global_position(id));
    }
    if let Some(&last) = chain.last() {
        points.push(skeleton.tip(last));
    }
    points
}

/// Grab-point overlay for the tree rooted at `root`: roots get an anchor dot
/// at their origin, every other bone a dot at its tip.
pub fn selectors(skeleton: &Skeleton, root: BoneId) -> Vec<SelectorDot> {
    skeleton
        .descendants_of(root)
        .into_iter()
        .map(|id| {
            let bone = skeleton.bone(id);
            let (pos, kind) = if bone.is_root() {
                (skeleton.global_position(id), SelectorKind::Root)
            } else if bone.ik_depth > 0 {
                (skeleton.tip(id), SelectorKind::IkHandle)
            } else {
                (skeleton.tip(id), SelectorKind::Joint)
            };
            SelectorDot { bone: id, pos, kind }
        })
        .collect()
}

/// The point a bone is grabbed by: origin for roots, tip otherwise.
pub fn grab_point(skeleton: &Skeleton, id: BoneId) -> Vec2 {
    if skeleton.bone(id).is_root() {
        skeleton.global_position(id)
    } else {
        skeleton.tip(id)
    }
}
