//! Node rotation clips

use glam::Quat;
use serde::Serialize;
use std::f32::consts::FRAC_PI_2;

/// Name of the turntable clip attached to animated labels
pub const ROTATE_CLIP_NAME: &str = "rotate";

/// Default length of one full turn, in seconds
pub const DEFAULT_ROTATION_SECS: f32 = 10.0;

/// A rotation animation for a single node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimationClip {
    pub name: String,
    /// Total duration in seconds
    pub duration: f32,
    pub interpolation: Interpolation,
    /// Sorted by time
    pub keyframes: Vec<Keyframe>,
}

/// A rotation at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Keyframe {
    /// Seconds from clip start
    pub time: f32,
    /// Unit quaternion, xyzw
    pub rotation: [f32; 4],
}

/// How to blend between keyframes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Interpolation {
    Step,
    #[default]
    Linear,
}

impl Interpolation {
    /// glTF sampler interpolation name
    pub fn as_gltf(&self) -> &'static str {
        match self {
            Interpolation::Step => "STEP",
            Interpolation::Linear => "LINEAR",
        }
    }
}

impl AnimationClip {
    /// One full turn about +Y over `duration` seconds.
    ///
    /// A key is written every quarter turn; a slerp between identity and a
    /// full turn would otherwise collapse to no motion.
    pub fn turntable(duration: f32) -> Self {
        let keyframes = (0..=4)
            .map(|i| Keyframe {
                time: duration * i as f32 / 4.0,
                rotation: Quat::from_rotation_y(FRAC_PI_2 * i as f32).to_array(),
            })
            .collect();

        Self {
            name: ROTATE_CLIP_NAME.to_string(),
            duration,
            interpolation: Interpolation::Linear,
            keyframes,
        }
    }

    /// Rotation at time `t`, clamped to the clip range
    pub fn sample(&self, t: f32) -> Quat {
        let Some(first) = self.keyframes.first() else {
            return Quat::IDENTITY;
        };
        if t <= first.time {
            return Quat::from_array(first.rotation);
        }

        for pair in self.keyframes.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if t <= b.time {
                let qa = Quat::from_array(a.rotation);
                let qb = Quat::from_array(b.rotation);
                return match self.interpolation {
                    Interpolation::Step => qa,
                    Interpolation::Linear => {
                        let span = b.time - a.time;
                        let f = if span > 0.0 { (t - a.time) / span } else { 1.0 };
                        qa.slerp(qb, f)
                    }
                };
            }
        }

        self.keyframes
            .last()
            .map_or(Quat::IDENTITY, |k| Quat::from_array(k.rotation))
    }
}
