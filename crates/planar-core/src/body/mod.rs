// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The rigid-body record.
//!
//! A [`Body`] holds raw state (pose, velocities, forces, modes) and a set of
//! derived quantities cached behind dirty flags:
//!
//! | derived            | depends on                                      |
//! |--------------------|-------------------------------------------------|
//! | mass, inv mass     | shapes (area·density), type, mass mode, lock    |
//! | inertia            | shapes (coef·area·density), type, mode, lock    |
//! | gravity mass/scale | mass, gravity-mass mode                         |
//! | local COM          | shapes                                          |
//! | world COM          | local COM, position, axis                       |
//! | axis               | rotation                                        |
//! | AABB               | shapes, position, axis                          |
//! | sweep radius       | shapes                                          |
//!
//! Invalidation is centralised in the `invalidate_*` entry points below; each
//! `validate_*` recomputes iff its flag is set and clears it.

mod motion;
mod sweep;
mod validate;

use planar_geom::{Aabb, Axis, Vec2};
use tracing::trace;

use crate::error::BodyError;
use crate::ident::{ArbiterKey, BodyId, BodyKey, ConstraintKey, ShapeId};
use crate::shape::Shape;

use sweep::SweptPose;

/// How a body responds to forces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BodyType {
    /// Never moves; infinite mass and inertia.
    Static,
    /// Fully simulated.
    #[default]
    Dynamic,
    /// Moved by its velocity only; infinite mass and inertia.
    Kinematic,
}

/// Source of a body's mass or inertia.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MassMode {
    /// Summed from the owned shapes.
    #[default]
    Default,
    /// User-assigned value.
    Fixed,
}

/// Source of a body's gravitational mass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GravityMassMode {
    /// Equal to the (validated) mass.
    #[default]
    Default,
    /// Independent user value; the scale is derived from it.
    Fixed,
    /// Mass multiplied by a stored scale factor.
    Scaled,
}

/// Sleep-island membership of a body inside a space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Component {
    pub(crate) waket: u64,
    pub(crate) sleeping: bool,
}

impl Component {
    /// Stamp at which the island was last seen moving.
    pub const fn waket(&self) -> u64 {
        self.waket
    }

    /// Whether the island is asleep.
    pub const fn is_sleeping(&self) -> bool {
        self.sleeping
    }
}

/// Dirty flags for every derived quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Dirty {
    mass: bool,
    inertia: bool,
    gravity_mass: bool,
    gravity_mass_scale: bool,
    local_com: bool,
    world_com: bool,
    axis: bool,
    aabb: bool,
    sweep_radius: bool,
}

impl Dirty {
    const ALL: Self = Self {
        mass: true,
        inertia: true,
        gravity_mass: true,
        gravity_mass_scale: true,
        local_com: true,
        world_com: true,
        axis: true,
        aabb: true,
        sweep_radius: true,
    };
}

/// A rigid body.
#[derive(Debug)]
pub struct Body {
    id: BodyId,
    body_type: BodyType,

    pos: Vec2,
    rot: f64,
    axis: Axis,
    pre_pos: Vec2,
    pre_rot: f64,

    vel: Vec2,
    angvel: f64,
    kinvel: Vec2,
    kinangvel: f64,
    svel: Vec2,
    force: Vec2,
    torque: f64,

    mass_mode: MassMode,
    cmass: f64,
    mass: f64,
    inv_mass: f64,
    nomove: bool,

    inertia_mode: MassMode,
    cinertia: f64,
    inertia: f64,
    inv_inertia: f64,
    norotate: bool,

    gravity_mass_mode: GravityMassMode,
    gravity_mass: f64,
    gravity_mass_scale: f64,

    local_com: Vec2,
    world_com: Vec2,
    aabb: Aabb,
    sweep_radius: f64,
    dirty: Dirty,

    shapes: Vec<Shape>,
    constraints: Vec<ConstraintKey>,
    arbiters: Vec<ArbiterKey>,
    component: Option<Component>,
    space: Option<BodyKey>,

    sweep: SweptPose,
    bullet: bool,
    disable_ccd: bool,
}

impl Default for Body {
    fn default() -> Self {
        Self::new(BodyType::Dynamic)
    }
}

impl Body {
    /// New body of the given type at the origin with no shapes.
    pub fn new(body_type: BodyType) -> Self {
        Self::fresh(BodyId::next(), body_type)
    }

    /// New dynamic body.
    pub fn dynamic() -> Self {
        Self::new(BodyType::Dynamic)
    }

    /// New static body.
    pub fn static_body() -> Self {
        Self::new(BodyType::Static)
    }

    /// New kinematic body.
    pub fn kinematic() -> Self {
        Self::new(BodyType::Kinematic)
    }

    fn fresh(id: BodyId, body_type: BodyType) -> Self {
        Self {
            id,
            body_type,
            pos: Vec2::ZERO,
            rot: 0.0,
            axis: Axis::IDENTITY,
            pre_pos: Vec2::ZERO,
            pre_rot: 0.0,
            vel: Vec2::ZERO,
            angvel: 0.0,
            kinvel: Vec2::ZERO,
            kinangvel: 0.0,
            svel: Vec2::ZERO,
            force: Vec2::ZERO,
            torque: 0.0,
            mass_mode: MassMode::Default,
            cmass: 0.0,
            mass: 0.0,
            inv_mass: 0.0,
            nomove: false,
            inertia_mode: MassMode::Default,
            cinertia: 0.0,
            inertia: 0.0,
            inv_inertia: 0.0,
            norotate: false,
            gravity_mass_mode: GravityMassMode::Default,
            gravity_mass: 0.0,
            gravity_mass_scale: 1.0,
            local_com: Vec2::ZERO,
            world_com: Vec2::ZERO,
            aabb: Aabb::default(),
            sweep_radius: 0.0,
            dirty: Dirty::ALL,
            shapes: Vec::new(),
            constraints: Vec::new(),
            arbiters: Vec::new(),
            component: None,
            space: None,
            sweep: SweptPose::default(),
            bullet: false,
            disable_ccd: false,
        }
    }

    /// Unique id.
    pub const fn id(&self) -> BodyId {
        self.id
    }

    /// Body type.
    pub const fn body_type(&self) -> BodyType {
        self.body_type
    }

    /// `true` for dynamic bodies.
    pub fn is_dynamic(&self) -> bool {
        self.body_type == BodyType::Dynamic
    }

    /// `true` for static bodies.
    pub fn is_static(&self) -> bool {
        self.body_type == BodyType::Static
    }

    /// `true` for kinematic bodies.
    pub fn is_kinematic(&self) -> bool {
        self.body_type == BodyType::Kinematic
    }

    /// Key of this body inside its space, if attached.
    pub const fn space(&self) -> Option<BodyKey> {
        self.space
    }

    /// Whether the body is attached to a space.
    pub const fn is_attached(&self) -> bool {
        self.space.is_some()
    }

    /// Sleep-island membership, present while attached.
    pub const fn component(&self) -> Option<&Component> {
        self.component.as_ref()
    }

    /// Whether the body's island is asleep.
    pub fn is_sleeping(&self) -> bool {
        self.component.is_some_and(|c| c.sleeping)
    }

    fn ensure_detached(&self) -> Result<(), BodyError> {
        if self.is_attached() {
            return Err(BodyError::Attached(self.id));
        }
        Ok(())
    }

    // ── pose ────────────────────────────────────────────────────────────

    /// Position of the body origin.
    pub const fn position(&self) -> Vec2 {
        self.pos
    }

    /// Rotation in radians.
    pub const fn rotation(&self) -> f64 {
        self.rot
    }

    /// Position at the start of the last integration step.
    pub const fn previous_position(&self) -> Vec2 {
        self.pre_pos
    }

    /// Rotation at the start of the last integration step.
    pub const fn previous_rotation(&self) -> f64 {
        self.pre_rot
    }

    /// Moves a detached body.
    ///
    /// Attached bodies are moved through [`crate::Space::set_position`].
    pub fn set_position(&mut self, pos: Vec2) -> Result<(), BodyError> {
        self.ensure_detached()?;
        self.place(pos)
    }

    /// Rotates a detached body.
    ///
    /// Attached bodies are rotated through [`crate::Space::set_rotation`].
    pub fn set_rotation(&mut self, rot: f64) -> Result<(), BodyError> {
        self.ensure_detached()?;
        self.orient(rot)
    }

    pub(crate) fn place(&mut self, pos: Vec2) -> Result<(), BodyError> {
        if !pos.is_finite() {
            return Err(BodyError::NonFinite("position"));
        }
        self.pos = pos;
        self.invalidate_pos();
        Ok(())
    }

    pub(crate) fn orient(&mut self, rot: f64) -> Result<(), BodyError> {
        if !rot.is_finite() {
            return Err(BodyError::NonFinite("rotation"));
        }
        self.rot = rot;
        self.invalidate_rot();
        Ok(())
    }

    /// Changes the type of a detached body.
    ///
    /// Attached bodies change type through [`crate::Space::set_body_type`].
    pub fn set_type(&mut self, body_type: BodyType) -> Result<(), BodyError> {
        self.ensure_detached()?;
        self.retype(body_type);
        Ok(())
    }

    pub(crate) fn retype(&mut self, body_type: BodyType) {
        if self.body_type == body_type {
            return;
        }
        self.body_type = body_type;
        if body_type == BodyType::Static {
            self.vel = Vec2::ZERO;
            self.angvel = 0.0;
            self.force = Vec2::ZERO;
            self.torque = 0.0;
        }
        self.invalidate_mass();
        self.invalidate_inertia();
    }

    /// Zeroes linear and angular velocity (sleeping bodies hold still).
    pub(crate) fn halt(&mut self) {
        self.vel = Vec2::ZERO;
        self.angvel = 0.0;
    }

    // ── velocities and forces ───────────────────────────────────────────

    /// Linear velocity.
    pub const fn velocity(&self) -> Vec2 {
        self.vel
    }

    /// Sets the linear velocity; rejected for static bodies.
    pub fn set_velocity(&mut self, vel: Vec2) -> Result<(), BodyError> {
        if self.is_static() {
            return Err(BodyError::StaticVelocity(self.id));
        }
        if !vel.is_finite() {
            return Err(BodyError::NonFinite("velocity"));
        }
        self.vel = vel;
        Ok(())
    }

    /// Angular velocity in radians per unit time.
    pub const fn angular_velocity(&self) -> f64 {
        self.angvel
    }

    /// Sets the angular velocity; rejected for static bodies.
    pub fn set_angular_velocity(&mut self, angvel: f64) -> Result<(), BodyError> {
        if self.is_static() {
            return Err(BodyError::StaticVelocity(self.id));
        }
        if !angvel.is_finite() {
            return Err(BodyError::NonFinite("angular velocity"));
        }
        self.angvel = angvel;
        Ok(())
    }

    /// Kinematic velocity, added on top of the velocity and never affected by
    /// forces.
    pub const fn kinematic_velocity(&self) -> Vec2 {
        self.kinvel
    }

    /// Sets the kinematic velocity.
    pub fn set_kinematic_velocity(&mut self, kinvel: Vec2) -> Result<(), BodyError> {
        if !kinvel.is_finite() {
            return Err(BodyError::NonFinite("kinematic velocity"));
        }
        self.kinvel = kinvel;
        Ok(())
    }

    /// Kinematic angular velocity.
    pub const fn kinematic_angular_velocity(&self) -> f64 {
        self.kinangvel
    }

    /// Sets the kinematic angular velocity.
    pub fn set_kinematic_angular_velocity(&mut self, w: f64) -> Result<(), BodyError> {
        if !w.is_finite() {
            return Err(BodyError::NonFinite("kinematic angular velocity"));
        }
        self.kinangvel = w;
        Ok(())
    }

    /// Surface velocity, consumed by friction only and never integrated.
    pub const fn surface_velocity(&self) -> Vec2 {
        self.svel
    }

    /// Sets the surface velocity.
    pub fn set_surface_velocity(&mut self, svel: Vec2) -> Result<(), BodyError> {
        if !svel.is_finite() {
            return Err(BodyError::NonFinite("surface velocity"));
        }
        self.svel = svel;
        Ok(())
    }

    /// Accumulated force.
    pub const fn force(&self) -> Vec2 {
        self.force
    }

    /// Replaces the accumulated force; dynamic bodies only.
    pub fn set_force(&mut self, force: Vec2) -> Result<(), BodyError> {
        if !self.is_dynamic() {
            return Err(BodyError::NotDynamic(self.id));
        }
        if !force.is_finite() {
            return Err(BodyError::NonFinite("force"));
        }
        self.force = force;
        Ok(())
    }

    /// Adds to the accumulated force; dynamic bodies only.
    pub fn add_force(&mut self, force: Vec2) -> Result<(), BodyError> {
        let total = self.force + force;
        self.set_force(total)
    }

    /// Accumulated torque.
    pub const fn torque(&self) -> f64 {
        self.torque
    }

    /// Replaces the accumulated torque. Any body type accepts it; only
    /// dynamic bodies integrate it.
    pub fn set_torque(&mut self, torque: f64) -> Result<(), BodyError> {
        if !torque.is_finite() {
            return Err(BodyError::NonFinite("torque"));
        }
        self.torque = torque;
        Ok(())
    }

    // ── mass configuration ──────────────────────────────────────────────

    /// Active mass mode.
    pub const fn mass_mode(&self) -> MassMode {
        self.mass_mode
    }

    /// Switches mass mode; `Fixed` keeps the last assigned or computed value.
    pub fn set_mass_mode(&mut self, mode: MassMode) {
        self.mass_mode = mode;
        self.invalidate_mass();
    }

    /// Assigns a fixed mass (finite, `> 0`) and switches to [`MassMode::Fixed`].
    pub fn set_mass(&mut self, mass: f64) -> Result<(), BodyError> {
        if !mass.is_finite() || mass <= 0.0 {
            return Err(BodyError::InvalidMass(mass));
        }
        self.cmass = mass;
        self.mass_mode = MassMode::Fixed;
        self.invalidate_mass();
        Ok(())
    }

    /// Active inertia mode.
    pub const fn inertia_mode(&self) -> MassMode {
        self.inertia_mode
    }

    /// Switches inertia mode.
    pub fn set_inertia_mode(&mut self, mode: MassMode) {
        self.inertia_mode = mode;
        self.invalidate_inertia();
    }

    /// Assigns a fixed inertia (finite, `> 0`) and switches to
    /// [`MassMode::Fixed`].
    pub fn set_inertia(&mut self, inertia: f64) -> Result<(), BodyError> {
        if !inertia.is_finite() || inertia <= 0.0 {
            return Err(BodyError::InvalidInertia(inertia));
        }
        self.cinertia = inertia;
        self.inertia_mode = MassMode::Fixed;
        self.invalidate_inertia();
        Ok(())
    }

    /// Active gravity-mass mode.
    pub const fn gravity_mass_mode(&self) -> GravityMassMode {
        self.gravity_mass_mode
    }

    /// Switches gravity-mass mode.
    pub fn set_gravity_mass_mode(&mut self, mode: GravityMassMode) {
        self.gravity_mass_mode = mode;
        self.dirty.gravity_mass = true;
        self.dirty.gravity_mass_scale = true;
    }

    /// Assigns an independent gravity mass and switches to
    /// [`GravityMassMode::Fixed`].
    pub fn set_gravity_mass(&mut self, gravity_mass: f64) -> Result<(), BodyError> {
        if !gravity_mass.is_finite() {
            return Err(BodyError::InvalidGravityMass(gravity_mass));
        }
        self.gravity_mass_mode = GravityMassMode::Fixed;
        self.gravity_mass = gravity_mass;
        self.dirty.gravity_mass = false;
        self.dirty.gravity_mass_scale = true;
        Ok(())
    }

    /// Assigns a gravity-mass scale and switches to
    /// [`GravityMassMode::Scaled`].
    pub fn set_gravity_mass_scale(&mut self, scale: f64) -> Result<(), BodyError> {
        if !scale.is_finite() {
            return Err(BodyError::InvalidGravityMass(scale));
        }
        self.gravity_mass_mode = GravityMassMode::Scaled;
        self.gravity_mass_scale = scale;
        self.dirty.gravity_mass_scale = false;
        self.dirty.gravity_mass = true;
        Ok(())
    }

    /// Whether translation is allowed (`false` forces infinite mass).
    pub const fn allow_movement(&self) -> bool {
        !self.nomove
    }

    /// Locks or unlocks translation.
    pub fn set_allow_movement(&mut self, allow: bool) {
        if self.nomove == allow {
            self.nomove = !allow;
            self.invalidate_mass();
        }
    }

    /// Whether rotation is allowed (`false` forces infinite inertia).
    pub const fn allow_rotation(&self) -> bool {
        !self.norotate
    }

    /// Locks or unlocks rotation.
    pub fn set_allow_rotation(&mut self, allow: bool) {
        if self.norotate == allow {
            self.norotate = !allow;
            self.invalidate_inertia();
        }
    }

    // ── invalidation ────────────────────────────────────────────────────

    /// Marks mass stale, along with whichever gravity quantity is derived
    /// from it under the active gravity-mass mode.
    pub fn invalidate_mass(&mut self) {
        self.dirty.mass = true;
        self.invalidate_gravity_mass();
    }

    /// Marks the non-authoritative gravity quantities stale.
    pub fn invalidate_gravity_mass(&mut self) {
        if self.gravity_mass_mode != GravityMassMode::Fixed {
            self.dirty.gravity_mass = true;
        }
        if self.gravity_mass_mode != GravityMassMode::Scaled {
            self.dirty.gravity_mass_scale = true;
        }
    }

    /// Marks inertia stale.
    pub fn invalidate_inertia(&mut self) {
        self.dirty.inertia = true;
    }

    /// Marks the local (and therefore world) centre of mass stale.
    pub fn invalidate_local_com(&mut self) {
        self.dirty.local_com = true;
        self.dirty.world_com = true;
    }

    /// Marks the world centre of mass stale.
    pub fn invalidate_world_com(&mut self) {
        self.dirty.world_com = true;
    }

    /// Marks the bounding box stale.
    pub fn invalidate_aabb(&mut self) {
        self.dirty.aabb = true;
    }

    /// Marks the cached axis stale.
    pub fn invalidate_axis(&mut self) {
        self.dirty.axis = true;
    }

    /// Everything that depends on the shape set or on per-shape material and
    /// geometry.
    fn invalidate_shapes(&mut self) {
        self.invalidate_mass();
        self.invalidate_inertia();
        self.invalidate_local_com();
        self.invalidate_aabb();
        self.dirty.sweep_radius = true;
    }

    /// Everything that depends on the position.
    fn invalidate_pos(&mut self) {
        self.invalidate_world_com();
        self.invalidate_aabb();
        for s in &mut self.shapes {
            s.invalidate_world();
        }
    }

    /// Everything that depends on the rotation.
    fn invalidate_rot(&mut self) {
        self.invalidate_axis();
        self.invalidate_pos();
    }

    // ── membership ──────────────────────────────────────────────────────

    /// Owned shapes in insertion order.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Owned shape by id.
    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    fn shape_index(&self, id: ShapeId) -> Result<usize, BodyError> {
        self.shapes
            .iter()
            .position(|s| s.id() == id)
            .ok_or(BodyError::UnknownShape {
                body: self.id,
                shape: id,
            })
    }

    /// Attaches `shape` to a detached body.
    ///
    /// Attached bodies gain shapes through [`crate::Space::add_shape`].
    pub fn add_shape(&mut self, shape: Shape) -> Result<ShapeId, BodyError> {
        self.ensure_detached()?;
        Ok(self.attach_shape(shape))
    }

    /// Detaches and returns a shape from a detached body.
    ///
    /// Attached bodies lose shapes through [`crate::Space::remove_shape`].
    pub fn remove_shape(&mut self, id: ShapeId) -> Result<Shape, BodyError> {
        self.ensure_detached()?;
        self.detach_shape(id)
    }

    pub(crate) fn attach_shape(&mut self, mut shape: Shape) -> ShapeId {
        let id = shape.id();
        shape.added_to_body(self.id);
        self.shapes.push(shape);
        self.invalidate_shapes();
        trace!(body = ?self.id, shape = ?id, "shape attached");
        id
    }

    pub(crate) fn detach_shape(&mut self, id: ShapeId) -> Result<Shape, BodyError> {
        let idx = self.shape_index(id)?;
        let mut shape = self.shapes.remove(idx);
        shape.removed_from_body();
        self.invalidate_shapes();
        trace!(body = ?self.id, shape = ?id, "shape detached");
        Ok(shape)
    }

    /// Edits an owned shape of a detached body and invalidates every
    /// shape-dependent quantity.
    ///
    /// Attached bodies edit shapes through [`crate::Space::modify_shape`].
    pub fn modify_shape<R>(
        &mut self,
        id: ShapeId,
        edit: impl FnOnce(&mut Shape) -> R,
    ) -> Result<R, BodyError> {
        self.ensure_detached()?;
        self.edit_shape(id, edit)
    }

    pub(crate) fn edit_shape<R>(
        &mut self,
        id: ShapeId,
        edit: impl FnOnce(&mut Shape) -> R,
    ) -> Result<R, BodyError> {
        let idx = self.shape_index(id)?;
        let out = edit(&mut self.shapes[idx]);
        self.shapes[idx].invalidate_world();
        self.invalidate_shapes();
        Ok(out)
    }

    /// Keys of the constraints referencing this body.
    pub fn constraints(&self) -> &[ConstraintKey] {
        &self.constraints
    }

    /// Keys of the arbiters this body participates in.
    pub fn arbiters(&self) -> &[ArbiterKey] {
        &self.arbiters
    }

    pub(crate) fn link_constraint(&mut self, key: ConstraintKey) {
        if !self.constraints.contains(&key) {
            self.constraints.push(key);
        }
    }

    pub(crate) fn unlink_constraint(&mut self, key: ConstraintKey) {
        self.constraints.retain(|k| *k != key);
    }

    pub(crate) fn link_arbiter(&mut self, key: ArbiterKey) {
        if !self.arbiters.contains(&key) {
            self.arbiters.push(key);
        }
    }

    pub(crate) fn unlink_arbiter(&mut self, key: ArbiterKey) {
        self.arbiters.retain(|k| *k != key);
    }

    pub(crate) fn attach(&mut self, key: BodyKey, stamp: u64) {
        self.space = Some(key);
        self.component = Some(Component {
            waket: stamp,
            sleeping: false,
        });
    }

    pub(crate) fn detach(&mut self) {
        self.space = None;
        self.component = None;
        self.arbiters.clear();
    }

    pub(crate) fn component_mut(&mut self) -> Option<&mut Component> {
        self.component.as_mut()
    }

    /// Detaches every shape and resets every raw and derived field to its
    /// construction-time value. Identity and type are kept.
    ///
    /// Fails before touching any state if the body is attached to a space or
    /// still referenced by constraints.
    pub fn clear(&mut self) -> Result<Vec<Shape>, BodyError> {
        self.ensure_detached()?;
        if !self.constraints.is_empty() {
            return Err(BodyError::Constrained(self.id, self.constraints.len()));
        }
        let mut shapes = std::mem::take(&mut self.shapes);
        for s in &mut shapes {
            s.removed_from_body();
        }
        *self = Self::fresh(self.id, self.body_type);
        trace!(body = ?self.id, released = shapes.len(), "body cleared");
        Ok(shapes)
    }

    // ── CCD flags ───────────────────────────────────────────────────────

    /// Whether dynamic-versus-dynamic CCD was requested.
    pub const fn is_bullet(&self) -> bool {
        self.bullet
    }

    /// Requests or cancels dynamic-versus-dynamic CCD.
    pub fn set_bullet(&mut self, bullet: bool) {
        self.bullet = bullet;
    }

    /// Whether CCD is disabled for this body.
    pub const fn is_ccd_disabled(&self) -> bool {
        self.disable_ccd
    }

    /// Disables or enables CCD for this body.
    pub fn set_disable_ccd(&mut self, disable: bool) {
        self.disable_ccd = disable;
    }

    /// Whether the external CCD pass should sweep this body.
    pub fn is_ccd_candidate(&self) -> bool {
        self.is_dynamic() && !self.disable_ccd
    }
}
