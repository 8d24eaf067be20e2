//! Track registrations: the static dispatch schema joining a controller's
//! animated properties to tracks by `(name, kind)`.

use serde::{Deserialize, Serialize};

use crate::error::AnimationError;
use crate::interpolation::TrackInterpolation;
use crate::track::Track;
use crate::value::ValueKind;

/// Static metadata for one logical property a controller animates.
///
/// Registrations are created once per concrete controller type and never
/// removed; at play time each one is joined against the bound animation's
/// tracks by `(name, kind)`, and the capability sets must match exactly.
/// Compared by value for duplicate detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRegistration {
    name: String,
    kind: ValueKind,
    supported: TrackInterpolation,
}

impl TrackRegistration {
    /// Create a registration with the default capability set for `kind`.
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Result<Self, AnimationError> {
        Self::with_support(name, kind, TrackInterpolation::default_for(kind))
    }

    /// Create a registration with an explicit capability set.
    pub fn with_support(
        name: impl Into<String>,
        kind: ValueKind,
        supported: TrackInterpolation,
    ) -> Result<Self, AnimationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(AnimationError::argument("name", "must not be empty"));
        }
        Ok(Self {
            name,
            kind,
            supported,
        })
    }

    /// Track name this registration binds to.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value kind this registration dispatches.
    #[inline]
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Declared interpolation capability set.
    #[inline]
    pub fn supported_interpolation(&self) -> TrackInterpolation {
        self.supported
    }

    /// Whether a track has this registration's name and kind.
    #[inline]
    pub fn matches(&self, track: &Track) -> bool {
        self.kind == track.kind() && self.name == track.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_equality() {
        let a = TrackRegistration::new("position", ValueKind::Vec3).unwrap();
        let b = TrackRegistration::new("position", ValueKind::Vec3).unwrap();
        let c = TrackRegistration::new("position", ValueKind::Vec2).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(TrackRegistration::new("", ValueKind::Single).is_err());
    }

    #[test]
    fn test_matches_by_name_and_kind() {
        let reg = TrackRegistration::new("color", ValueKind::Color).unwrap();
        let track = Track::new("color", ValueKind::Color).unwrap();
        let other = Track::new("color", ValueKind::Vec4).unwrap();
        assert!(reg.matches(&track));
        assert!(!reg.matches(&other));
    }
}
