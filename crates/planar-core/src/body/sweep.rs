// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Swept pose used by continuous collision detection.
//!
//! The swept pose is a secondary copy of position, rotation and axis that an
//! external CCD routine advances to candidate times within a step. Shape
//! geometry can be evaluated at the swept pose without disturbing the
//! committed pose; the sweep is then either discarded (by the next
//! [`Body::begin_sweep`]) or adopted with [`Body::commit_sweep`]
//! (`Space::commit_sweep` for attached bodies).

use core::f64::consts::TAU;

use planar_geom::{Axis, Vec2};

use super::Body;
use crate::config::SimConfig;
use crate::error::BodyError;
use crate::ident::ShapeId;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SweptPose {
    pos: Vec2,
    rot: f64,
    axis: Axis,
    time: f64,
    angvel: f64,
    open: bool,
}

impl Default for SweptPose {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            rot: 0.0,
            axis: Axis::IDENTITY,
            time: 0.0,
            angvel: 0.0,
            open: false,
        }
    }
}

impl Body {
    /// Starts a sweep over a step of length `dt` from the committed pose.
    ///
    /// The swept angular velocity is reduced modulo `2π/dt` so one sweep
    /// never covers more than a full turn.
    pub fn begin_sweep(&mut self, dt: f64) {
        self.validate_axis();
        let angvel = if dt > 0.0 {
            self.angvel % (TAU / dt)
        } else {
            self.angvel
        };
        self.sweep = SweptPose {
            pos: self.pos,
            rot: self.rot,
            axis: self.axis,
            time: 0.0,
            angvel,
            open: true,
        };
    }

    /// Advances the swept pose from the last swept time to `dt`.
    ///
    /// Calling twice with the same `dt` is a no-op the second time.
    pub fn sweep_integrate(&mut self, dt: f64, config: &SimConfig) {
        let sweep = &mut self.sweep;
        let delta = dt - sweep.time;
        if delta == 0.0 {
            return;
        }
        sweep.time = dt;
        sweep.pos += self.vel.scale(delta);
        if sweep.angvel != 0.0 {
            let dr = sweep.angvel * delta;
            sweep.rot += dr;
            sweep
                .axis
                .advance(sweep.rot, dr, config.small_angle_tolerance_sq);
        }
    }

    /// Adopts the swept pose of a detached body as the committed pose and
    /// closes the sweep.
    ///
    /// Fails without moving the body if it is attached (use
    /// [`crate::Space::commit_sweep`]), static, or has no sweep open.
    pub fn commit_sweep(&mut self) -> Result<(), BodyError> {
        self.ensure_detached()?;
        self.adopt_sweep()
    }

    pub(crate) fn adopt_sweep(&mut self) -> Result<(), BodyError> {
        if self.is_static() {
            return Err(BodyError::StaticImmutable(self.id));
        }
        if !self.sweep.open {
            return Err(BodyError::NoSweep(self.id));
        }
        self.sweep.open = false;
        self.pos = self.sweep.pos;
        self.rot = self.sweep.rot;
        self.axis = self.sweep.axis;
        self.dirty.axis = false;
        self.invalidate_pos();
        Ok(())
    }

    /// Whether a sweep was begun and not yet committed.
    pub const fn is_sweeping(&self) -> bool {
        self.sweep.open
    }

    /// Writes `shape`'s world-frame geometry for the swept pose.
    ///
    /// The shape's committed world caches stay marked stale, so the next
    /// committed read recomputes them from the committed pose.
    pub fn sweep_validate(&mut self, shape: ShapeId) -> Result<(), BodyError> {
        let idx = self.shape_index(shape)?;
        let (pos, axis) = (self.sweep.pos, self.sweep.axis);
        self.shapes[idx].sweep_validate(pos, axis);
        Ok(())
    }

    /// Swept position.
    pub const fn swept_position(&self) -> Vec2 {
        self.sweep.pos
    }

    /// Swept rotation.
    pub const fn swept_rotation(&self) -> f64 {
        self.sweep.rot
    }

    /// Swept axis.
    pub const fn swept_axis(&self) -> Axis {
        self.sweep.axis
    }

    /// Time within the step the swept pose has reached.
    pub const fn sweep_time(&self) -> f64 {
        self.sweep.time
    }

    /// Bounded angular velocity used by the sweep.
    pub const fn sweep_angular_velocity(&self) -> f64 {
        self.sweep.angvel
    }
}
