//! Interpolation modes, capability sets, and the per-kind blend functions.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::math::lerp;
use crate::value::{Value, ValueKind};

/// Active interpolation mode of a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InterpolationMode {
    /// Step function: hold the previous key's value.
    #[default]
    None,
    /// Per-component linear blend; quaternions use a shortest-arc blend.
    Linear,
    /// Catmull-Rom spline over the full key sequence.
    Spline,
}

impl InterpolationMode {
    /// Capability flag corresponding to this mode.
    #[inline]
    pub fn as_flag(&self) -> TrackInterpolation {
        match self {
            InterpolationMode::None => TrackInterpolation::NONE,
            InterpolationMode::Linear => TrackInterpolation::LINEAR,
            InterpolationMode::Spline => TrackInterpolation::SPLINE,
        }
    }

    /// Decode a persisted mode tag.
    #[inline]
    pub fn from_u32(v: u32) -> Option<Self> {
        match v {
            0 => Some(InterpolationMode::None),
            1 => Some(InterpolationMode::Linear),
            2 => Some(InterpolationMode::Spline),
            _ => None,
        }
    }

    /// Mode tag written by the codec.
    #[inline]
    pub fn as_u32(&self) -> u32 {
        match self {
            InterpolationMode::None => 0,
            InterpolationMode::Linear => 1,
            InterpolationMode::Spline => 2,
        }
    }
}

bitflags! {
    /// Capability set describing which interpolation modes a track (or a
    /// controller registration) supports. Registrations and tracks are
    /// joined at play time by exact equality of these sets.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct TrackInterpolation: u8 {
        const NONE   = 0b001;
        const LINEAR = 0b010;
        const SPLINE = 0b100;
    }
}

impl TrackInterpolation {
    /// Default capability set for a value kind: texture references can only
    /// step, every numeric kind supports all three modes.
    #[inline]
    pub fn default_for(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Texture => TrackInterpolation::NONE,
            _ => TrackInterpolation::all(),
        }
    }
}

#[inline]
fn lerp4(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    [
        lerp(a[0], b[0], t),
        lerp(a[1], b[1], t),
        lerp(a[2], b[2], t),
        lerp(a[3], b[3], t),
    ]
}

#[inline]
fn dot4(a: [f32; 4], b: [f32; 4]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3]
}

/// Normalize a quaternion, returning it untouched when its length is zero.
#[inline]
pub(crate) fn normalize_quat(mut q: [f32; 4]) -> [f32; 4] {
    let len2 = dot4(q, q);
    if len2 > 0.0 {
        let inv = len2.sqrt().recip();
        q[0] *= inv;
        q[1] *= inv;
        q[2] *= inv;
        q[3] *= inv;
    }
    q
}

/// Quaternion blend with shortest-arc correction: when the dot product is
/// negative the second quaternion is negated before the component blend, and
/// the result is renormalized.
#[inline]
pub fn nlerp_quat(a: [f32; 4], mut b: [f32; 4], t: f32) -> [f32; 4] {
    if dot4(a, b) < 0.0 {
        b = [-b[0], -b[1], -b[2], -b[3]];
    }
    normalize_quat(lerp4(a, b, t))
}

/// Linear blend between two values of the same kind. Quaternions take the
/// shortest arc; textures (and mismatched kinds) hold the left value.
pub fn linear_value(a: &Value, b: &Value, t: f32) -> Value {
    match (a, b) {
        (Value::Single(va), Value::Single(vb)) => Value::Single(lerp(*va, *vb, t)),
        (Value::Vec2(va), Value::Vec2(vb)) => {
            Value::Vec2([lerp(va[0], vb[0], t), lerp(va[1], vb[1], t)])
        }
        (Value::Vec3(va), Value::Vec3(vb)) => Value::Vec3([
            lerp(va[0], vb[0], t),
            lerp(va[1], vb[1], t),
            lerp(va[2], vb[2], t),
        ]),
        (Value::Vec4(va), Value::Vec4(vb)) => Value::Vec4(lerp4(*va, *vb, t)),
        (Value::Quat(qa), Value::Quat(qb)) => Value::Quat(nlerp_quat(*qa, *qb, t)),
        (Value::Rect(ra), Value::Rect(rb)) => Value::Rect(lerp4(*ra, *rb, t)),
        (Value::Color(ca), Value::Color(cb)) => Value::Color(lerp4(*ca, *cb, t)),
        _ => a.clone(),
    }
}
