// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-body integration, impulses and the sleep heuristic.

use planar_geom::Vec2;

use super::{Body, BodyType};
use crate::config::SimConfig;
use crate::error::BodyError;

impl Body {
    /// Advances velocity by accumulated force, torque and gravity over `dt`.
    ///
    /// Only dynamic bodies respond; static and kinematic bodies are left
    /// untouched.
    pub fn integrate_velocity(&mut self, dt: f64, gravity: Vec2) {
        if !self.is_dynamic() {
            return;
        }
        let inv_mass = self.inv_mass();
        let inv_inertia = self.inv_inertia();
        let gravity_mass = self.gravity_mass();
        let accel = (self.force + gravity.scale(gravity_mass)).scale(inv_mass);
        self.vel += accel.scale(dt);
        self.angvel += self.torque * inv_inertia * dt;
    }

    /// Advances the committed pose by `(velocity + kinematic velocity)·dt`.
    ///
    /// Records the previous pose for the sleep heuristic. The axis follows the
    /// rotation step through [`planar_geom::Axis::advance`] with the
    /// configured small-angle tolerance.
    pub fn integrate_position(&mut self, dt: f64, config: &SimConfig) {
        if self.body_type == BodyType::Static {
            return;
        }
        self.pre_pos = self.pos;
        self.pre_rot = self.rot;

        let vel = self.vel + self.kinvel;
        if vel != Vec2::ZERO {
            self.pos += vel.scale(dt);
        }
        let w = self.angvel + self.kinangvel;
        if w != 0.0 {
            self.validate_axis();
            let dr = w * dt;
            self.rot += dr;
            self.axis
                .advance(self.rot, dr, config.small_angle_tolerance_sq);
        }
        if vel != Vec2::ZERO || w != 0.0 {
            self.invalidate_pos();
        }
    }

    /// Applies a linear impulse at a world point (`None` means the centre of
    /// mass, which imparts no spin).
    pub fn apply_impulse(&mut self, impulse: Vec2, point: Option<Vec2>) -> Result<(), BodyError> {
        if !self.is_dynamic() {
            return Err(BodyError::NotDynamic(self.id));
        }
        if !impulse.is_finite() {
            return Err(BodyError::NonFinite("impulse"));
        }
        let inv_mass = self.inv_mass();
        self.vel += impulse.scale(inv_mass);
        if let Some(p) = point {
            let r = p - self.world_com()?;
            let inv_inertia = self.inv_inertia();
            self.angvel += r.cross(impulse) * inv_inertia;
        }
        Ok(())
    }

    /// Applies an angular impulse.
    pub fn apply_angular_impulse(&mut self, impulse: f64) -> Result<(), BodyError> {
        if !self.is_dynamic() {
            return Err(BodyError::NotDynamic(self.id));
        }
        if !impulse.is_finite() {
            return Err(BodyError::NonFinite("angular impulse"));
        }
        let inv_inertia = self.inv_inertia();
        self.angvel += impulse * inv_inertia;
        Ok(())
    }

    /// Linear plus rotational kinetic energy. Zero for bodies with infinite
    /// mass and inertia.
    pub fn kinetic_energy(&mut self) -> f64 {
        let mut e = 0.0;
        if self.inv_mass() > 0.0 {
            e += 0.5 * self.mass * self.vel.length_squared();
        }
        if self.inv_inertia() > 0.0 {
            e += 0.5 * self.inertia * self.angvel * self.angvel;
        }
        e
    }

    /// Whether the body moved too much during the last step to count as
    /// resting.
    ///
    /// Angular motion is converted to an equivalent linear displacement using
    /// the squared diagonal of the body's bounding box, so both thresholds
    /// share units. A body with no shapes has no extent and only the linear
    /// checks apply.
    pub fn is_moving(&mut self, dt: f64, config: &SimConfig) -> bool {
        let lin_sq = config.linear_sleep_threshold * config.linear_sleep_threshold;
        let ang_sq = config.angular_sleep_threshold * config.angular_sleep_threshold;

        if self.vel.length_squared() > lin_sq {
            return true;
        }
        if (self.pos - self.pre_pos).length_squared() > 0.25 * lin_sq * dt * dt {
            return true;
        }
        let diag = match self.aabb() {
            Ok(bb) => bb.diagonal_squared(),
            Err(_) => 0.0,
        };
        if 4.0 * self.angvel * self.angvel * diag > ang_sq {
            return true;
        }
        let dr = self.rot - self.pre_rot;
        4.0 * dr * dr * diag > ang_sq * dt * dt
    }

    /// Sleep heuristic, evaluated once per step at `stamp`.
    ///
    /// A moving body resets its wake stamp: dynamic bodies by
    /// [`Body::is_moving`], kinematic bodies while any of their velocities is
    /// non-zero. The body is at rest once `waket + sleep_delay < stamp`.
    /// Static bodies report their island's current state; detached bodies
    /// are never at rest.
    pub fn at_rest(&mut self, dt: f64, stamp: u64, config: &SimConfig) -> bool {
        let moving = match self.body_type {
            BodyType::Dynamic => self.is_moving(dt, config),
            BodyType::Kinematic => self.has_kinematic_motion(),
            BodyType::Static => return self.is_sleeping(),
        };
        let Some(component) = self.component.as_mut() else {
            return false;
        };
        if moving {
            component.waket = stamp;
        }
        component.waket.saturating_add(config.sleep_delay) < stamp
    }

    fn has_kinematic_motion(&self) -> bool {
        self.vel != Vec2::ZERO
            || self.angvel != 0.0
            || self.kinvel != Vec2::ZERO
            || self.kinangvel != 0.0
    }
}
