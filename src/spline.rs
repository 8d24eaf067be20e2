//! Catmull-Rom control data for spline-mode tracks.
//!
//! The cache is derived state: a track rebuilds it lazily the first time a
//! spline sample is requested and throws it away on every structural key
//! mutation (and on mode changes), so stale control points can never be read.

use crate::interpolation::normalize_quat;
use crate::keyframe::KeyFrame;
use crate::value::ValueKind;

/// Precomputed control points and tangents for one track's key sequence.
///
/// Segments are parameterized by key index: segment `i` spans keys `i` and
/// `i + 1` (wrapping to key 0 when built cyclic), evaluated as a cubic
/// Hermite with Catmull-Rom tangents over the unit fraction `u`.
#[derive(Debug, Clone)]
pub(crate) struct SplineCache {
    kind: ValueKind,
    cyclic: bool,
    points: Vec<[f32; 4]>,
    tangents: Vec<[f32; 4]>,
}

#[inline]
fn sub4(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2], a[3] - b[3]]
}

#[inline]
fn scale4(a: [f32; 4], s: f32) -> [f32; 4] {
    [a[0] * s, a[1] * s, a[2] * s, a[3] * s]
}

impl SplineCache {
    /// Build control data from an ordered key sequence. Returns `None` for
    /// kinds with no numeric components (texture references).
    ///
    /// Quaternion sequences are sign-adjusted so consecutive control points
    /// take the shortest arc before tangents are computed.
    pub(crate) fn build(keys: &[KeyFrame], kind: ValueKind, cyclic: bool) -> Option<Self> {
        kind.component_count()?;

        let mut points: Vec<[f32; 4]> = Vec::with_capacity(keys.len());
        for key in keys {
            let mut c = key.value().components()?;
            if kind == ValueKind::Quat {
                if let Some(prev) = points.last() {
                    let dot = prev[0] * c[0] + prev[1] * c[1] + prev[2] * c[2] + prev[3] * c[3];
                    if dot < 0.0 {
                        c = [-c[0], -c[1], -c[2], -c[3]];
                    }
                }
            }
            points.push(c);
        }

        let n = points.len();
        let mut tangents = Vec::with_capacity(n);
        for i in 0..n {
            let (before, after) = if cyclic {
                (points[(i + n - 1) % n], points[(i + 1) % n])
            } else {
                // Clamped ends: one-sided differences at the boundaries.
                let before = points[i.saturating_sub(1)];
                let after = points[(i + 1).min(n - 1)];
                (before, after)
            };
            tangents.push(scale4(sub4(after, before), 0.5));
        }

        Some(Self {
            kind,
            cyclic,
            points,
            tangents,
        })
    }

    /// Whether this cache was built for the given looped-ness.
    #[inline]
    pub(crate) fn is_cyclic(&self) -> bool {
        self.cyclic
    }

    /// Evaluate the segment starting at key index `i` at unit fraction `u`.
    pub(crate) fn eval(&self, i: usize, u: f32) -> [f32; 4] {
        let n = self.points.len();
        debug_assert!(i < n);
        let j = if self.cyclic {
            (i + 1) % n
        } else {
            (i + 1).min(n - 1)
        };

        let p0 = self.points[i];
        let p1 = self.points[j];
        let m0 = self.tangents[i];
        let m1 = self.tangents[j];

        // Cubic Hermite basis.
        let u2 = u * u;
        let u3 = u2 * u;
        let h00 = 2.0 * u3 - 3.0 * u2 + 1.0;
        let h10 = u3 - 2.0 * u2 + u;
        let h01 = -2.0 * u3 + 3.0 * u2;
        let h11 = u3 - u2;

        let mut out = [0.0f32; 4];
        for c in 0..4 {
            out[c] = h00 * p0[c] + h10 * m0[c] + h01 * p1[c] + h11 * m1[c];
        }

        if self.kind == ValueKind::Quat {
            out = normalize_quat(out);
        }
        out
    }
}
