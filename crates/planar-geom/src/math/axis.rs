// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

/// Cached `(sin θ, cos θ)` pair for a rotation angle `θ`.
///
/// Rotation is stored by callers as an angle but consumed through this pair so
/// per-shape transforms avoid transcendental calls. Two update paths exist:
///
/// - exact: [`Axis::from_angle`] / [`Axis::recompute`] evaluate `sin_cos`.
/// - incremental: [`Axis::advance_incremental`] composes the cached pair with a
///   small rotation `dr` using
///   `p = 1 − dr²/2`, `m = 1 − dr⁴/8`,
///   `sin' = (p·sin + dr·cos)·m`, `cos' = (p·cos − dr·sin)·m`.
///
/// The incremental form must stay exactly as written; reference trajectories
/// depend on it term for term.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Axis {
    sin: f64,
    cos: f64,
}

impl Default for Axis {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Axis {
    /// Axis of the zero rotation.
    pub const IDENTITY: Self = Self { sin: 0.0, cos: 1.0 };

    /// Exact axis for `angle` radians.
    pub fn from_angle(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self { sin, cos }
    }

    /// Cached sine.
    pub const fn sin(self) -> f64 {
        self.sin
    }

    /// Cached cosine.
    pub const fn cos(self) -> f64 {
        self.cos
    }

    /// Replaces the cached pair with the exact values for `angle`.
    pub fn recompute(&mut self, angle: f64) {
        *self = Self::from_angle(angle);
    }

    /// Advances the axis by `dr`, where `angle` is the rotation *after* the
    /// step.
    ///
    /// Uses the exact path when `dr² > tolerance_sq`, the incremental path
    /// otherwise.
    pub fn advance(&mut self, angle: f64, dr: f64, tolerance_sq: f64) {
        if dr * dr > tolerance_sq {
            self.recompute(angle);
        } else {
            self.advance_incremental(dr);
        }
    }

    /// Second-order incremental update by a small rotation `dr`.
    pub fn advance_incremental(&mut self, dr: f64) {
        let d2 = dr * dr;
        let p = 1.0 - 0.5 * d2;
        let m = 1.0 - d2 * d2 / 8.0;
        let sin = (p * self.sin + dr * self.cos) * m;
        let cos = (p * self.cos - dr * self.sin) * m;
        self.sin = sin;
        self.cos = cos;
    }
}
