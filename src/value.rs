//! Keyframe value kinds.
//!
//! The set of kinds is closed: every track fixes one of these at construction
//! and every keyframe on it must match. Numeric kinds expose a flat component
//! view used by the spline evaluator and the binary codec; texture references
//! are step-only and have no components.

use serde::{Deserialize, Serialize};

/// Reference to a texture plus the UV region and array slice to display.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextureRef {
    /// Name of the texture resource; resolution is the renderer's concern.
    pub texture: String,
    /// Texture coordinates as (x, y, width, height) in UV space.
    pub coordinates: [f32; 4],
    /// Index into the texture array.
    pub array_index: u16,
}

impl TextureRef {
    /// Create a new texture reference.
    #[inline]
    pub fn new(texture: impl Into<String>, coordinates: [f32; 4], array_index: u16) -> Self {
        Self {
            texture: texture.into(),
            coordinates,
            array_index,
        }
    }
}

/// Kind tag for [`Value`], used by track registrations and codecs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Single,
    Vec2,
    Vec3,
    Vec4,
    Quat,
    Rect,
    Color,
    Texture,
}

impl ValueKind {
    /// Get the name of this kind.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Single => "Single",
            ValueKind::Vec2 => "Vec2",
            ValueKind::Vec3 => "Vec3",
            ValueKind::Vec4 => "Vec4",
            ValueKind::Quat => "Quat",
            ValueKind::Rect => "Rect",
            ValueKind::Color => "Color",
            ValueKind::Texture => "Texture",
        }
    }

    /// Number of float components for numeric kinds, `None` for textures.
    #[inline]
    pub fn component_count(&self) -> Option<usize> {
        match self {
            ValueKind::Single => Some(1),
            ValueKind::Vec2 => Some(2),
            ValueKind::Vec3 => Some(3),
            ValueKind::Vec4 | ValueKind::Quat | ValueKind::Rect | ValueKind::Color => Some(4),
            ValueKind::Texture => None,
        }
    }
}

/// A single animated value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Scalar float
    Single(f32),
    /// 2D vector
    Vec2([f32; 2]),
    /// 3D vector
    Vec3([f32; 3]),
    /// 4D vector
    Vec4([f32; 4]),
    /// Quaternion (x, y, z, w)
    Quat([f32; 4]),
    /// Rectangle (x, y, width, height)
    Rect([f32; 4]),
    /// RGBA color
    Color([f32; 4]),
    /// Texture reference with UV region and array index; step-only
    Texture(TextureRef),
}

impl Value {
    /// Return the kind of this value.
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Single(_) => ValueKind::Single,
            Value::Vec2(_) => ValueKind::Vec2,
            Value::Vec3(_) => ValueKind::Vec3,
            Value::Vec4(_) => ValueKind::Vec4,
            Value::Quat(_) => ValueKind::Quat,
            Value::Rect(_) => ValueKind::Rect,
            Value::Color(_) => ValueKind::Color,
            Value::Texture(_) => ValueKind::Texture,
        }
    }

    /// Flat component view for numeric kinds, padded to four floats.
    /// Returns `None` for texture references.
    pub fn components(&self) -> Option<[f32; 4]> {
        match self {
            Value::Single(v) => Some([*v, 0.0, 0.0, 0.0]),
            Value::Vec2(v) => Some([v[0], v[1], 0.0, 0.0]),
            Value::Vec3(v) => Some([v[0], v[1], v[2], 0.0]),
            Value::Vec4(v) | Value::Quat(v) | Value::Rect(v) | Value::Color(v) => Some(*v),
            Value::Texture(_) => None,
        }
    }

    /// Rebuild a value of the given numeric kind from flat components.
    /// Returns `None` for [`ValueKind::Texture`].
    pub fn from_components(kind: ValueKind, c: [f32; 4]) -> Option<Self> {
        match kind {
            ValueKind::Single => Some(Value::Single(c[0])),
            ValueKind::Vec2 => Some(Value::Vec2([c[0], c[1]])),
            ValueKind::Vec3 => Some(Value::Vec3([c[0], c[1], c[2]])),
            ValueKind::Vec4 => Some(Value::Vec4(c)),
            ValueKind::Quat => Some(Value::Quat(c)),
            ValueKind::Rect => Some(Value::Rect(c)),
            ValueKind::Color => Some(Value::Color(c)),
            ValueKind::Texture => None,
        }
    }

    /// Convenience constructors
    #[inline]
    pub fn single(v: f32) -> Self {
        Value::Single(v)
    }

    #[inline]
    pub fn vec2(x: f32, y: f32) -> Self {
        Value::Vec2([x, y])
    }

    #[inline]
    pub fn vec3(x: f32, y: f32, z: f32) -> Self {
        Value::Vec3([x, y, z])
    }

    #[inline]
    pub fn vec4(x: f32, y: f32, z: f32, w: f32) -> Self {
        Value::Vec4([x, y, z, w])
    }

    #[inline]
    pub fn quat(x: f32, y: f32, z: f32, w: f32) -> Self {
        Value::Quat([x, y, z, w])
    }

    #[inline]
    pub fn rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Value::Rect([x, y, width, height])
    }

    #[inline]
    pub fn color(r: f32, g: f32, b: f32, a: f32) -> Self {
        Value::Color([r, g, b, a])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        let values = [
            Value::single(1.0),
            Value::vec2(1.0, 2.0),
            Value::vec3(1.0, 2.0, 3.0),
            Value::vec4(1.0, 2.0, 3.0, 4.0),
            Value::quat(0.0, 0.0, 0.0, 1.0),
            Value::rect(0.0, 0.0, 64.0, 64.0),
            Value::color(1.0, 0.5, 0.25, 1.0),
        ];
        for v in values {
            let kind = v.kind();
            let c = v.components().unwrap();
            assert_eq!(Value::from_components(kind, c).unwrap(), v);
        }
    }

    #[test]
    fn test_texture_has_no_components() {
        let v = Value::Texture(TextureRef::new("frame0", [0.0, 0.0, 1.0, 1.0], 0));
        assert_eq!(v.kind(), ValueKind::Texture);
        assert!(v.components().is_none());
        assert!(Value::from_components(ValueKind::Texture, [0.0; 4]).is_none());
        assert!(ValueKind::Texture.component_count().is_none());
    }

    #[test]
    fn test_component_padding() {
        assert_eq!(
            Value::vec2(3.0, 4.0).components().unwrap(),
            [3.0, 4.0, 0.0, 0.0]
        );
        assert_eq!(ValueKind::Vec2.component_count(), Some(2));
    }
}
