// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use thiserror::Error;

use crate::math::Vec2;

/// Errors raised while constructing geometry values.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum GeomError {
    /// A component of `min` exceeds its counterpart in `max`.
    #[error("invalid AABB: min {min:?} > max {max:?}")]
    InvalidBounds {
        /// Requested minimum corner.
        min: [f64; 2],
        /// Requested maximum corner.
        max: [f64; 2],
    },
    /// A bounding box was requested for zero points.
    #[error("cannot bound an empty point set")]
    EmptyPointSet,
}

/// Axis-aligned bounding box in world coordinates.
///
/// Invariants:
/// - `min` components are less than or equal to `max` components.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    min: Vec2,
    max: Vec2,
}

impl Default for Aabb {
    fn default() -> Self {
        Self {
            min: Vec2::ZERO,
            max: Vec2::ZERO,
        }
    }
}

impl Aabb {
    /// Constructs an AABB from its minimum and maximum corners.
    ///
    /// # Errors
    /// Returns [`GeomError::InvalidBounds`] if any component of `min` is
    /// greater than its counterpart in `max`.
    pub fn new(min: Vec2, max: Vec2) -> Result<Self, GeomError> {
        if min.x() > max.x() || min.y() > max.y() {
            return Err(GeomError::InvalidBounds {
                min: min.to_array(),
                max: max.to_array(),
            });
        }
        Ok(Self { min, max })
    }

    /// Returns the minimum corner.
    pub const fn min(&self) -> Vec2 {
        self.min
    }

    /// Returns the maximum corner.
    pub const fn max(&self) -> Vec2 {
        self.max
    }

    /// Builds an AABB centered at `center` with half-extents `hx, hy`.
    ///
    /// Negative extents are taken by magnitude.
    pub fn from_center_half_extents(center: Vec2, hx: f64, hy: f64) -> Self {
        let he = Vec2::new(hx.abs(), hy.abs());
        Self {
            min: center - he,
            max: center + he,
        }
    }

    /// Builds the minimal AABB that contains all `points`.
    ///
    /// # Errors
    /// Returns [`GeomError::EmptyPointSet`] if `points` is empty.
    pub fn from_points(points: &[Vec2]) -> Result<Self, GeomError> {
        let (first, rest) = points.split_first().ok_or(GeomError::EmptyPointSet)?;
        let mut out = Self {
            min: *first,
            max: *first,
        };
        for p in rest {
            out.expand_to(*p);
        }
        Ok(out)
    }

    /// Grows the box in place so it contains `point`.
    pub fn expand_to(&mut self, point: Vec2) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Returns `true` if this AABB overlaps another (inclusive on faces).
    pub fn overlaps(&self, other: &Self) -> bool {
        // Inclusive to treat touching faces as overlap for broad-phase pairing.
        !(self.max.x() < other.min.x()
            || self.min.x() > other.max.x()
            || self.max.y() < other.min.y()
            || self.min.y() > other.max.y())
    }

    /// Returns `true` if `point` lies inside or on the boundary.
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x() >= self.min.x()
            && point.x() <= self.max.x()
            && point.y() >= self.min.y()
            && point.y() <= self.max.y()
    }

    /// Returns the union of two AABBs.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Inflates the box by a uniform margin `m` in all directions.
    pub fn inflate(&self, m: f64) -> Self {
        let delta = Vec2::new(m, m);
        Self {
            min: self.min - delta,
            max: self.max + delta,
        }
    }

    /// Extent along X.
    pub fn width(&self) -> f64 {
        self.max.x() - self.min.x()
    }

    /// Extent along Y.
    pub fn height(&self) -> f64 {
        self.max.y() - self.min.y()
    }

    /// Squared length of the box diagonal.
    pub fn diagonal_squared(&self) -> f64 {
        let w = self.width();
        let h = self.height();
        w * w + h * h
    }
}
