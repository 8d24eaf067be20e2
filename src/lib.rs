//! Animation Timeline
//!
//! A keyframed animation engine for animating arbitrary object properties.
//! Typed tracks interpolate values over a fixed-length timeline (step,
//! linear, or Catmull-Rom spline), a controller drives playback with
//! looping and variable speed, and animations persist to a chunked binary
//! format.

pub mod animation;
pub mod controller;
pub mod error;
pub mod interpolation;
pub mod io;
pub mod keyframe;
pub mod math;
pub mod registration;
pub(crate) mod spline;
pub mod track;
pub mod value;

// Re-export common types for convenience
pub use animation::{Animation, AnimationBuilder};
pub use controller::{AnimationBinding, AnimationController, PlaybackState};
pub use error::AnimationError;
pub use interpolation::{InterpolationMode, TrackInterpolation};
pub use keyframe::KeyFrame;
pub use registration::TrackRegistration;
pub use track::Track;
pub use value::{TextureRef, Value, ValueKind};

/// Animation timeline result type
pub type Result<T> = core::result::Result<T, AnimationError>;
