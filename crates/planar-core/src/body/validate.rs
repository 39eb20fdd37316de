// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Pull-based recomputation of the derived quantities.
//!
//! Each `validate_*` is idempotent: it recomputes only when its dirty flag is
//! set and clears the flag in the same call. Readers go through the
//! validating accessors and never see a stale value.

use planar_geom::{Aabb, Axis, Vec2};
use tracing::trace;

use super::{Body, BodyType, GravityMassMode, MassMode};
use crate::error::BodyError;
use crate::ident::ShapeId;
use crate::shape::Shape;

impl Body {
    fn resolves_finite_mass(&self) -> bool {
        self.body_type == BodyType::Dynamic && !self.nomove
    }

    fn resolves_finite_inertia(&self) -> bool {
        self.body_type == BodyType::Dynamic && !self.norotate
    }

    /// Recomputes mass and inverse mass if stale.
    pub fn validate_mass(&mut self) {
        if !self.dirty.mass {
            return;
        }
        self.dirty.mass = false;
        if self.mass_mode == MassMode::Default {
            self.cmass = self
                .shapes
                .iter_mut()
                .map(|s| s.area() * s.material().density())
                .sum();
        }
        if self.resolves_finite_mass() {
            self.mass = self.cmass;
            self.inv_mass = if self.mass > 0.0 { 1.0 / self.mass } else { 0.0 };
        } else {
            self.mass = f64::INFINITY;
            self.inv_mass = 0.0;
        }
        trace!(body = ?self.id, mass = self.mass, "validated mass");
    }

    /// Recomputes inertia and inverse inertia if stale.
    pub fn validate_inertia(&mut self) {
        if !self.dirty.inertia {
            return;
        }
        self.dirty.inertia = false;
        if self.inertia_mode == MassMode::Default {
            self.cinertia = self
                .shapes
                .iter_mut()
                .map(|s| s.inertia_coefficient() * s.area() * s.material().density())
                .sum();
        }
        if self.resolves_finite_inertia() {
            self.inertia = self.cinertia;
            self.inv_inertia = if self.inertia > 0.0 {
                1.0 / self.inertia
            } else {
                0.0
            };
        } else {
            self.inertia = f64::INFINITY;
            self.inv_inertia = 0.0;
        }
        trace!(body = ?self.id, inertia = self.inertia, "validated inertia");
    }

    /// Recomputes the gravity mass if it is derived under the active mode.
    pub fn validate_gravity_mass(&mut self) {
        if !self.dirty.gravity_mass {
            return;
        }
        self.dirty.gravity_mass = false;
        self.validate_mass();
        match self.gravity_mass_mode {
            GravityMassMode::Default => self.gravity_mass = self.cmass,
            GravityMassMode::Scaled => self.gravity_mass = self.cmass * self.gravity_mass_scale,
            GravityMassMode::Fixed => {}
        }
    }

    /// Recomputes the gravity-mass scale if it is derived under the active
    /// mode.
    pub fn validate_gravity_mass_scale(&mut self) {
        if !self.dirty.gravity_mass_scale {
            return;
        }
        self.dirty.gravity_mass_scale = false;
        match self.gravity_mass_mode {
            GravityMassMode::Default => self.gravity_mass_scale = 1.0,
            GravityMassMode::Fixed => {
                self.validate_mass();
                self.gravity_mass_scale = if self.cmass > 0.0 {
                    self.gravity_mass / self.cmass
                } else if self.gravity_mass == 0.0 {
                    1.0
                } else {
                    f64::INFINITY
                };
            }
            GravityMassMode::Scaled => {}
        }
    }

    /// Recomputes the cached axis exactly if stale.
    pub fn validate_axis(&mut self) {
        if self.dirty.axis {
            self.dirty.axis = false;
            self.axis.recompute(self.rot);
        }
    }

    /// Recomputes the area-density weighted local centre of mass if stale.
    pub fn validate_local_com(&mut self) -> Result<(), BodyError> {
        if self.shapes.is_empty() {
            return Err(BodyError::NoShapes(self.id));
        }
        if !self.dirty.local_com {
            return Ok(());
        }
        self.dirty.local_com = false;
        let mut weighted = Vec2::ZERO;
        let mut total = 0.0;
        for s in &mut self.shapes {
            let w = s.area() * s.material().density();
            weighted += s.local_centroid().scale(w);
            total += w;
        }
        self.local_com = if total > 0.0 {
            weighted.scale(1.0 / total)
        } else {
            // Zero-area shapes only: fall back to the plain centroid mean.
            let sum = self
                .shapes
                .iter_mut()
                .fold(Vec2::ZERO, |acc, s| acc + s.local_centroid());
            #[allow(clippy::cast_precision_loss)]
            let n = self.shapes.len() as f64;
            sum.scale(1.0 / n)
        };
        trace!(body = ?self.id, com = ?self.local_com, "validated local COM");
        Ok(())
    }

    /// Recomputes the world centre of mass if it or its inputs are stale.
    pub fn validate_world_com(&mut self) -> Result<(), BodyError> {
        if self.dirty.local_com || self.dirty.axis {
            self.dirty.world_com = true;
        }
        self.validate_local_com()?;
        if !self.dirty.world_com {
            return Ok(());
        }
        self.dirty.world_com = false;
        self.validate_axis();
        self.world_com = self.pos + self.local_com.rotate(self.axis);
        Ok(())
    }

    /// Recomputes the bounding box from every shape's world bounds if stale.
    pub fn validate_aabb(&mut self) -> Result<(), BodyError> {
        if self.shapes.is_empty() {
            return Err(BodyError::NoShapes(self.id));
        }
        if !self.dirty.aabb {
            return Ok(());
        }
        self.dirty.aabb = false;
        self.validate_axis();
        let (pos, axis) = (self.pos, self.axis);
        let mut merged: Option<Aabb> = None;
        for s in &mut self.shapes {
            let bb = s.validate_aabb(pos, axis);
            merged = Some(merged.map_or(bb, |m| m.union(&bb)));
        }
        if let Some(bb) = merged {
            self.aabb = bb;
        }
        Ok(())
    }

    /// Recomputes the sweep radius bound if stale.
    pub fn validate_sweep_radius(&mut self) {
        if !self.dirty.sweep_radius {
            return;
        }
        self.dirty.sweep_radius = false;
        self.sweep_radius = self
            .shapes
            .iter()
            .map(Shape::radius_about_origin)
            .fold(0.0, f64::max);
    }

    /// Validated committed-pose bounds of one owned shape.
    pub(crate) fn shape_bounds(&mut self, id: ShapeId) -> Result<Aabb, BodyError> {
        let idx = self.shape_index(id)?;
        self.validate_axis();
        let (pos, axis) = (self.pos, self.axis);
        Ok(self.shapes[idx].validate_aabb(pos, axis))
    }

    /// Owned shape with its world data and bounds valid for the committed
    /// pose. Geometry left behind by [`Body::sweep_validate`] is replaced.
    pub fn shape_world(&mut self, id: ShapeId) -> Result<&Shape, BodyError> {
        let idx = self.shape_index(id)?;
        self.validate_axis();
        let (pos, axis) = (self.pos, self.axis);
        let shape = &mut self.shapes[idx];
        shape.validate_world(pos, axis);
        shape.validate_aabb(pos, axis);
        Ok(shape)
    }

    /// Calls `visit` with the validated committed-pose bounds of every shape.
    pub(crate) fn each_shape_bounds(&mut self, mut visit: impl FnMut(ShapeId, Aabb)) {
        self.validate_axis();
        let (pos, axis) = (self.pos, self.axis);
        for s in &mut self.shapes {
            let bb = s.validate_aabb(pos, axis);
            visit(s.id(), bb);
        }
    }

    // ── validating readers ──────────────────────────────────────────────

    /// Mass (`+∞` for static, kinematic or movement-locked bodies).
    pub fn mass(&mut self) -> f64 {
        self.validate_mass();
        self.mass
    }

    /// Inverse mass (`0` when the mass is infinite).
    pub fn inv_mass(&mut self) -> f64 {
        self.validate_mass();
        self.inv_mass
    }

    /// Moment of inertia (`+∞` for static, kinematic or rotation-locked
    /// bodies).
    pub fn inertia(&mut self) -> f64 {
        self.validate_inertia();
        self.inertia
    }

    /// Inverse moment of inertia.
    pub fn inv_inertia(&mut self) -> f64 {
        self.validate_inertia();
        self.inv_inertia
    }

    /// Gravitational mass.
    pub fn gravity_mass(&mut self) -> f64 {
        self.validate_gravity_mass();
        self.gravity_mass
    }

    /// Gravitational mass divided by mass.
    pub fn gravity_mass_scale(&mut self) -> f64 {
        self.validate_gravity_mass_scale();
        self.gravity_mass_scale
    }

    /// Cached `(sin, cos)` of the rotation.
    pub fn axis(&mut self) -> Axis {
        self.validate_axis();
        self.axis
    }

    /// Centre of mass in body-local coordinates.
    pub fn local_com(&mut self) -> Result<Vec2, BodyError> {
        self.validate_local_com()?;
        Ok(self.local_com)
    }

    /// Centre of mass in world coordinates.
    pub fn world_com(&mut self) -> Result<Vec2, BodyError> {
        self.validate_world_com()?;
        Ok(self.world_com)
    }

    /// World-space bounding box of every owned shape.
    pub fn aabb(&mut self) -> Result<Aabb, BodyError> {
        self.validate_aabb()?;
        Ok(self.aabb)
    }

    /// Farthest extent of any shape from the body origin.
    pub fn sweep_radius(&mut self) -> f64 {
        self.validate_sweep_radius();
        self.sweep_radius
    }

    /// Maps a body-local point to world coordinates.
    pub fn local_to_world(&mut self, local: Vec2) -> Vec2 {
        self.validate_axis();
        self.pos + local.rotate(self.axis)
    }

    /// Maps a world point to body-local coordinates.
    pub fn world_to_local(&mut self, world: Vec2) -> Vec2 {
        self.validate_axis();
        (world - self.pos).inverse_rotate(self.axis)
    }
}
