//! Scalar and 2D vector math shared by the transform model, the IK solver
//! and keyframe interpolation.

use serde::{Deserialize, Serialize};

use std::f32::consts::TAU;

/// Linear interpolation of scalars.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    (1.0 - t) * a + b * t
}

/// Signed shortest angular distance from `a0` to `a1`.
///
/// The delta is normalized so that interpolation never takes the long way
/// around the circle.
#[inline]
pub fn shortest_angle_dist(a0: f32, a1: f32) -> f32 {
    let da = (a1 - a0) % TAU;
    (2.0 * da) % TAU - da
}

/// Angular interpolation along the shortest arc.
#[inline]
pub fn angle_lerp(a0: f32, a1: f32, t: f32) -> f32 {
    a0 + shortest_angle_dist(a0, a1) * t
}

/// 2D vector. Value type with no identity; operations return new instances.
/// NaN inputs propagate unguarded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `angle` radians.
    #[inline]
    pub fn from_angle(angle: f32) -> Vec2 {
        Vec2::new(angle.cos(), angle.sin())
    }

    #[inline]
    pub fn add(self, b: Vec2) -> Vec2 {
        Vec2::new(self.x + b.x, self.y + b.y)
    }

    #[inline]
    pub fn sub(self, b: Vec2) -> Vec2 {
        Vec2::new(self.x - b.x, self.y - b.y)
    }

    #[inline]
    pub fn scale(self, s: f32) -> Vec2 {
        Vec2::new(self.x * s, self.y * s)
    }

    #[inline]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    #[inline]
    pub fn normalized(self) -> Vec2 {
        let len = self.length();
        Vec2::new(self.x / len, self.y / len)
    }

    #[inline]
    pub fn distance(self, b: Vec2) -> f32 {
        self.sub(b).length()
    }

    /// World angle of this vector, in radians.
    #[inline]
    pub fn angle(self) -> f32 {
        self.y.atan2(self.x)
    }

    #[inline]
    pub fn lerp(self, b: Vec2, t: f32) -> Vec2 {
        Vec2::new(lerp(self.x, b.x, t), lerp(self.y, b.y, t))
    }
}
