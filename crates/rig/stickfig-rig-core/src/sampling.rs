//! Keyframe interpolation.
//!
//! Position interpolates linearly, rotation along the shortest angular path.
//! Sampling scans adjacent keyframe pairs in ascending order; keyframe
//! counts are expected to stay small, so the linear scan is fine.

use crate::keyframes::KeyframeTrack;
use crate::math::{angle_lerp, lerp};
use crate::skeleton::LocalPose;

/// Sample a track at an arbitrary frame.
///
/// The first bracketing pair `ck.frame <= frame < nk.frame` wins. With no
/// keyframes at all the bone's static pose (`fallback`) is returned. With
/// keyframes but no bracketing pair the LAST keyframe's values are returned
/// verbatim, including for frames before the first keyframe where clamping
/// to the first sample might be expected. Long-standing quirk, preserved;
/// see the keyframe test suite.
pub fn sample_track(track: &KeyframeTrack, fallback: LocalPose, frame: f32) -> LocalPose {
    for pair in track.keys().windows(2) {
        let (ck, nk) = (&pair[0], &pair[1]);
        if frame >= ck.frame as f32 && frame < nk.frame as f32 {
            let t = (frame - ck.frame as f32) / (nk.frame as f32 - ck.frame as f32);
            return LocalPose {
                x: lerp(ck.x, nk.x, t),
                y: lerp(ck.y, nk.y, t),
                rotation: angle_lerp(ck.rotation, nk.rotation, t),
            };
        }
    }

    match track.keys().last() {
        Some(last) => LocalPose {
            x: last.x,
            y: last.y,
            rotation: last.rotation,
        },
        None => fallback,
    }
}
