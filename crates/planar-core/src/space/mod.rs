// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Simulation context owning bodies, constraints and arbiters.
//!
//! The space supplies what a body cannot know on its own: the step stamp, the
//! midstep guard, broad-phase registration and sleep-island bookkeeping.
//! Solver, narrow phase and the step loop stay outside; they drive bodies
//! through [`Space::body_mut`] and report interactions as [`Arbiter`]s.

mod traversal;

use core::fmt;

use planar_geom::Vec2;
use slotmap::SlotMap;
use tracing::{debug, instrument, warn};

use crate::body::{Body, BodyType};
use crate::broad::{BroadPhase, NullBroadPhase};
use crate::config::{ConfigError, SimConfig};
use crate::error::{BodyError, SpaceError};
use crate::ident::{ArbiterKey, BodyKey, ConstraintKey, ShapeId};
use crate::interaction::{Arbiter, Constraint};
use crate::shape::Shape;

use traversal::TraversalScratch;

/// Owner of every attached body and of the records linking them.
pub struct Space<B = NullBroadPhase> {
    config: SimConfig,
    bodies: SlotMap<BodyKey, Body>,
    constraints: SlotMap<ConstraintKey, Box<dyn Constraint>>,
    arbiters: SlotMap<ArbiterKey, Arbiter>,
    broadphase: B,
    stamp: u64,
    midstep: bool,
    scratch: TraversalScratch,
}

impl<B: fmt::Debug> fmt::Debug for Space<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Space")
            .field("config", &self.config)
            .field("bodies", &self.bodies.len())
            .field("constraints", &self.constraints.len())
            .field("arbiters", &self.arbiters.len())
            .field("broadphase", &self.broadphase)
            .field("stamp", &self.stamp)
            .field("midstep", &self.midstep)
            .finish_non_exhaustive()
    }
}

impl Default for Space {
    fn default() -> Self {
        Self::build(SimConfig::default(), NullBroadPhase)
    }
}

impl Space {
    /// Empty space without a broad phase.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        Self::with_broadphase(config, NullBroadPhase)
    }
}

fn reject<T>(err: impl Into<SpaceError>) -> Result<T, SpaceError> {
    let err = err.into();
    warn!(%err, "space operation rejected");
    Err(err)
}

impl<B: BroadPhase> Space<B> {
    /// Empty space registering shape proxies with `broadphase`.
    pub fn with_broadphase(config: SimConfig, broadphase: B) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, broadphase))
    }

    fn build(config: SimConfig, broadphase: B) -> Self {
        Self {
            config,
            bodies: SlotMap::with_key(),
            constraints: SlotMap::with_key(),
            arbiters: SlotMap::with_key(),
            broadphase,
            stamp: 0,
            midstep: false,
            scratch: TraversalScratch::default(),
        }
    }

    /// Active configuration.
    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Current step stamp.
    pub const fn stamp(&self) -> u64 {
        self.stamp
    }

    /// Advances the step stamp and returns the new value.
    pub fn advance_stamp(&mut self) -> u64 {
        self.stamp += 1;
        self.stamp
    }

    /// Whether the solver is iterating.
    pub const fn is_midstep(&self) -> bool {
        self.midstep
    }

    /// Raises the midstep guard; structural mutation is rejected until
    /// [`Space::end_solve`].
    pub fn begin_solve(&mut self) {
        self.midstep = true;
    }

    /// Lowers the midstep guard.
    pub fn end_solve(&mut self) {
        self.midstep = false;
    }

    /// Broad phase receiving shape proxies.
    pub const fn broadphase(&self) -> &B {
        &self.broadphase
    }

    // ── bodies ──────────────────────────────────────────────────────────

    /// Attached body.
    pub fn body(&self, key: BodyKey) -> Result<&Body, SpaceError> {
        self.bodies.get(key).ok_or(SpaceError::StaleBody(key))
    }

    /// Attached body, mutably. Structural body mutators reject attached
    /// bodies; use the matching `Space` method instead.
    pub fn body_mut(&mut self, key: BodyKey) -> Result<&mut Body, SpaceError> {
        self.bodies.get_mut(key).ok_or(SpaceError::StaleBody(key))
    }

    /// Every attached body.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyKey, &Body)> {
        self.bodies.iter()
    }

    /// Every attached body, mutably.
    pub fn bodies_mut(&mut self) -> impl Iterator<Item = (BodyKey, &mut Body)> {
        self.bodies.iter_mut()
    }

    /// Number of attached bodies.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn structural(&mut self, key: BodyKey) -> Result<&mut Body, SpaceError> {
        let midstep = self.midstep;
        let Some(body) = self.bodies.get_mut(key) else {
            return reject(SpaceError::StaleBody(key));
        };
        if midstep {
            let id = body.id();
            return reject(BodyError::Midstep(id));
        }
        Ok(body)
    }

    /// Takes ownership of `body`, registers its shapes with the broad phase
    /// and gives it an awake sleep component stamped now.
    pub fn add_body(&mut self, body: Body) -> Result<BodyKey, SpaceError> {
        if self.midstep {
            return reject(BodyError::Midstep(body.id()));
        }
        let stamp = self.stamp;
        let key = self.bodies.insert(body);
        let Some(body) = self.bodies.get_mut(key) else {
            return Err(SpaceError::StaleBody(key));
        };
        body.attach(key, stamp);
        let bp = &mut self.broadphase;
        body.each_shape_bounds(|id, bb| bp.insert(id, bb));
        debug!(?key, id = ?body.id(), shapes = body.shapes().len(), "body added");
        Ok(key)
    }

    /// Detaches and returns a body. Refused while constraints reference it;
    /// arbiters involving it are discarded.
    pub fn remove_body(&mut self, key: BodyKey) -> Result<Body, SpaceError> {
        let body = self.structural(key)?;
        if !body.constraints().is_empty() {
            return reject(SpaceError::BodyConstrained(key));
        }
        let arbiters: Vec<ArbiterKey> = body.arbiters().to_vec();
        for a in arbiters {
            self.discard_arbiter(a);
        }
        let Some(mut body) = self.bodies.remove(key) else {
            return Err(SpaceError::StaleBody(key));
        };
        for s in body.shapes() {
            self.broadphase.remove(s.id());
        }
        body.detach();
        debug!(?key, id = ?body.id(), "body removed");
        Ok(body)
    }

    /// Attaches `shape` to an attached body: registers its proxy, restamps
    /// the body's wake time and wakes its island.
    pub fn add_shape(&mut self, key: BodyKey, shape: Shape) -> Result<ShapeId, SpaceError> {
        let body = self.structural(key)?;
        if body.is_static() {
            let id = body.id();
            return reject(BodyError::StaticShapes(id));
        }
        let id = body.attach_shape(shape);
        let bb = body.shape_bounds(id)?;
        self.broadphase.insert(id, bb);
        self.touch(key)?;
        Ok(id)
    }

    /// Detaches a shape from an attached body and drops its proxy.
    pub fn remove_shape(&mut self, key: BodyKey, shape: ShapeId) -> Result<Shape, SpaceError> {
        let body = self.structural(key)?;
        if body.is_static() {
            let id = body.id();
            return reject(BodyError::StaticShapes(id));
        }
        let removed = body.detach_shape(shape)?;
        self.broadphase.remove(shape);
        self.touch(key)?;
        Ok(removed)
    }

    /// Moves an attached, non-static body.
    pub fn set_position(&mut self, key: BodyKey, pos: Vec2) -> Result<(), SpaceError> {
        let body = self.structural(key)?;
        if body.is_static() {
            let id = body.id();
            return reject(BodyError::StaticImmutable(id));
        }
        body.place(pos)?;
        self.refresh_body(key)?;
        self.touch(key)
    }

    /// Rotates an attached, non-static body.
    pub fn set_rotation(&mut self, key: BodyKey, rot: f64) -> Result<(), SpaceError> {
        let body = self.structural(key)?;
        if body.is_static() {
            let id = body.id();
            return reject(BodyError::StaticImmutable(id));
        }
        body.orient(rot)?;
        self.refresh_body(key)?;
        self.touch(key)
    }

    /// Edits an owned shape of an attached, non-static body, then refreshes
    /// its proxies and wakes it.
    pub fn modify_shape<R>(
        &mut self,
        key: BodyKey,
        shape: ShapeId,
        edit: impl FnOnce(&mut Shape) -> R,
    ) -> Result<R, SpaceError> {
        let body = self.structural(key)?;
        if body.is_static() {
            let id = body.id();
            return reject(BodyError::StaticShapes(id));
        }
        let out = match body.edit_shape(shape, edit) {
            Ok(out) => out,
            Err(err) => return reject(err),
        };
        self.refresh_body(key)?;
        self.touch(key)?;
        Ok(out)
    }

    /// Adopts the open sweep of an attached body as its committed pose,
    /// then refreshes its proxies and wakes it.
    pub fn commit_sweep(&mut self, key: BodyKey) -> Result<(), SpaceError> {
        let body = self.structural(key)?;
        if let Err(err) = body.adopt_sweep() {
            return reject(err);
        }
        self.refresh_body(key)?;
        self.touch(key)
    }

    /// Changes the type of an attached body and wakes it.
    pub fn set_body_type(&mut self, key: BodyKey, body_type: BodyType) -> Result<(), SpaceError> {
        let body = self.structural(key)?;
        body.retype(body_type);
        self.touch(key)
    }

    /// Re-registers every shape proxy of `key` at its committed pose.
    fn refresh_body(&mut self, key: BodyKey) -> Result<(), SpaceError> {
        let body = self.bodies.get_mut(key).ok_or(SpaceError::StaleBody(key))?;
        let bp = &mut self.broadphase;
        body.each_shape_bounds(|id, bb| bp.update(id, bb));
        Ok(())
    }

    /// Pushes every shape's committed-pose bounds to the broad phase. Call
    /// after the external loop integrates positions.
    pub fn refresh_broadphase(&mut self) {
        let bp = &mut self.broadphase;
        for (_, body) in &mut self.bodies {
            body.each_shape_bounds(|id, bb| bp.update(id, bb));
        }
    }

    // ── sleep ───────────────────────────────────────────────────────────

    /// Restamps `key`'s wake time and wakes it if asleep.
    fn touch(&mut self, key: BodyKey) -> Result<(), SpaceError> {
        let stamp = self.stamp;
        let body = self.body_mut(key)?;
        let sleeping = body.is_sleeping();
        if let Some(c) = body.component_mut() {
            c.waket = stamp;
        }
        if sleeping {
            self.wake(key);
        }
        Ok(())
    }

    /// Wakes `key`'s island: clears its sleeping flag, stamps its wake time
    /// and wakes its arbiters.
    pub fn really_wake(&mut self, key: BodyKey) -> Result<(), SpaceError> {
        if !self.bodies.contains_key(key) {
            return reject(SpaceError::StaleBody(key));
        }
        self.wake(key);
        Ok(())
    }

    fn wake(&mut self, key: BodyKey) {
        let stamp = self.stamp;
        let Some(body) = self.bodies.get_mut(key) else {
            return;
        };
        let was_sleeping = body.is_sleeping();
        if let Some(c) = body.component_mut() {
            c.sleeping = false;
            c.waket = stamp;
        }
        for a in body.arbiters() {
            if let Some(arb) = self.arbiters.get_mut(*a) {
                arb.set_sleeping(false);
            }
        }
        if was_sleeping {
            debug!(?key, stamp, "body woken");
        }
    }

    /// Runs the sleep heuristic once for the current stamp.
    ///
    /// Islands are grown over constraints and active arbiters; static bodies
    /// join no island. An island sleeps when every member is at rest: its
    /// members' velocities are zeroed and arbiters whose participants are
    /// all asleep (or static) are marked sleeping. A restless island wakes
    /// any sleeping member. Returns the number of sleeping bodies.
    #[instrument(skip(self))]
    pub fn update_sleep(&mut self, dt: f64) -> usize {
        let stamp = self.stamp;
        let config = self.config;
        self.scratch.restless.clear();
        for (key, body) in &mut self.bodies {
            let rests = body.is_static() || body.at_rest(dt, stamp, &config);
            if !rests {
                self.scratch.restless.insert(key);
            }
        }

        self.scratch.visited.clear();
        let mut order = std::mem::take(&mut self.scratch.order);
        let mut island = std::mem::take(&mut self.scratch.island);
        order.clear();
        order.extend(self.bodies.keys());
        for &root in &order {
            let grow = self
                .bodies
                .get(root)
                .is_some_and(|b| !b.is_static() && !self.scratch.visited.contains(&root));
            if !grow {
                continue;
            }
            self.collect_island(root, &mut island);
            let rests = island.iter().all(|k| !self.scratch.restless.contains(k));
            for &k in &island {
                if rests {
                    self.put_to_sleep(k);
                } else if self.bodies.get(k).is_some_and(Body::is_sleeping) {
                    self.wake(k);
                }
            }
        }
        self.scratch.order = order;
        self.scratch.island = island;

        let bodies = &self.bodies;
        let resting = |k| bodies.get(k).is_some_and(|b: &Body| b.is_static() || b.is_sleeping());
        for arb in self.arbiters.values_mut() {
            let (a, b) = arb.bodies();
            arb.set_sleeping(resting(a) && resting(b));
        }

        self.bodies.values().filter(|b| b.is_sleeping()).count()
    }

    fn put_to_sleep(&mut self, key: BodyKey) {
        let Some(body) = self.bodies.get_mut(key) else {
            return;
        };
        if body.is_sleeping() {
            return;
        }
        body.halt();
        if let Some(c) = body.component_mut() {
            c.sleeping = true;
        }
        debug!(?key, id = ?body.id(), "body asleep");
    }

    // ── constraints and arbiters ────────────────────────────────────────

    /// Registers a constraint with every body it visits and wakes them.
    pub fn add_constraint(&mut self, constraint: Box<dyn Constraint>) -> Result<ConstraintKey, SpaceError> {
        let mut linked = Vec::new();
        constraint.visit_bodies(&mut |k| linked.push(k));
        if let Some(&stale) = linked.iter().find(|k| !self.bodies.contains_key(**k)) {
            return reject(SpaceError::StaleBody(stale));
        }
        let key = self.constraints.insert(constraint);
        for k in linked {
            if let Some(body) = self.bodies.get_mut(k) {
                body.link_constraint(key);
            }
            self.touch(k)?;
        }
        debug!(?key, "constraint added");
        Ok(key)
    }

    /// Removes a constraint, unlinking and waking its bodies.
    pub fn remove_constraint(&mut self, key: ConstraintKey) -> Result<Box<dyn Constraint>, SpaceError> {
        let Some(constraint) = self.constraints.remove(key) else {
            return reject(SpaceError::StaleConstraint(key));
        };
        let mut linked = Vec::new();
        constraint.visit_bodies(&mut |k| linked.push(k));
        for k in linked {
            if let Some(body) = self.bodies.get_mut(k) {
                body.unlink_constraint(key);
                self.touch(k)?;
            }
        }
        debug!(?key, "constraint removed");
        Ok(constraint)
    }

    /// Registered constraint.
    pub fn constraint(&self, key: ConstraintKey) -> Result<&dyn Constraint, SpaceError> {
        self.constraints
            .get(key)
            .map(|c| &**c)
            .ok_or(SpaceError::StaleConstraint(key))
    }

    /// Records an interaction reported by the narrow phase.
    pub fn add_arbiter(&mut self, arbiter: Arbiter) -> Result<ArbiterKey, SpaceError> {
        let (a, b) = arbiter.bodies();
        for k in [a, b] {
            if !self.bodies.contains_key(k) {
                return reject(SpaceError::StaleBody(k));
            }
        }
        let key = self.arbiters.insert(arbiter);
        for k in [a, b] {
            if let Some(body) = self.bodies.get_mut(k) {
                body.link_arbiter(key);
            }
        }
        Ok(key)
    }

    /// Drops an interaction record.
    pub fn remove_arbiter(&mut self, key: ArbiterKey) -> Result<Arbiter, SpaceError> {
        match self.discard_arbiter(key) {
            Some(arb) => Ok(arb),
            None => reject(SpaceError::StaleArbiter(key)),
        }
    }

    fn discard_arbiter(&mut self, key: ArbiterKey) -> Option<Arbiter> {
        let arb = self.arbiters.remove(key)?;
        let (a, b) = arb.bodies();
        for k in [a, b] {
            if let Some(body) = self.bodies.get_mut(k) {
                body.unlink_arbiter(key);
            }
        }
        Some(arb)
    }

    /// Recorded interaction.
    pub fn arbiter(&self, key: ArbiterKey) -> Result<&Arbiter, SpaceError> {
        self.arbiters.get(key).ok_or(SpaceError::StaleArbiter(key))
    }

    /// Recorded interaction, mutably (the narrow phase toggles `active`).
    pub fn arbiter_mut(&mut self, key: ArbiterKey) -> Result<&mut Arbiter, SpaceError> {
        self.arbiters.get_mut(key).ok_or(SpaceError::StaleArbiter(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Component;
    use crate::broad::AllPairs;
    use crate::interaction::{InteractionKind, Link};

    fn square(space: &mut Space<AllPairs>, at: Vec2, body_type: BodyType) -> BodyKey {
        let mut body = Body::new(body_type);
        body.add_shape(Shape::rect(Vec2::ZERO, 1.0, 1.0).unwrap()).unwrap();
        body.set_position(at).unwrap();
        space.add_body(body).unwrap()
    }

    fn space() -> Space<AllPairs> {
        Space::with_broadphase(SimConfig::default(), AllPairs::new()).unwrap()
    }

    #[test]
    fn add_body_registers_proxies_and_component() {
        let mut space = space();
        let k = square(&mut space, Vec2::new(3.0, 0.0), BodyType::Dynamic);
        let body = space.body(k).unwrap();
        assert_eq!(body.space(), Some(k));
        assert_eq!(body.component().map(Component::waket), Some(0));
        let id = body.shapes()[0].id();
        let bb = space.broadphase().get(id).unwrap();
        assert!(bb.contains_point(Vec2::new(3.0, 0.0)));
    }

    #[test]
    fn attached_bodies_reject_direct_structural_mutation() {
        let mut space = space();
        let k = square(&mut space, Vec2::ZERO, BodyType::Dynamic);
        let body = space.body_mut(k).unwrap();
        let id = body.id();
        assert_eq!(body.set_position(Vec2::UNIT_X), Err(BodyError::Attached(id)));
        assert_eq!(body.clear().unwrap_err(), BodyError::Attached(id));
        assert_eq!(body.shapes().len(), 1);
    }

    #[test]
    fn midstep_guard_rejects_structural_mutation() {
        let mut space = space();
        let k = square(&mut space, Vec2::ZERO, BodyType::Dynamic);
        let id = space.body(k).unwrap().id();
        space.begin_solve();
        assert_eq!(
            space.set_position(k, Vec2::UNIT_X),
            Err(SpaceError::Body(BodyError::Midstep(id)))
        );
        let shape = Shape::circle(1.0, Vec2::ZERO).unwrap();
        assert!(space.add_shape(k, shape).is_err());
        space.end_solve();
        assert!(space.set_position(k, Vec2::UNIT_X).is_ok());
    }

    #[test]
    fn static_bodies_are_frozen_inside_a_space() {
        let mut space = space();
        let k = square(&mut space, Vec2::ZERO, BodyType::Static);
        let id = space.body(k).unwrap().id();
        assert_eq!(
            space.set_position(k, Vec2::UNIT_X),
            Err(SpaceError::Body(BodyError::StaticImmutable(id)))
        );
        let shape = Shape::circle(1.0, Vec2::ZERO).unwrap();
        assert_eq!(
            space.add_shape(k, shape),
            Err(SpaceError::Body(BodyError::StaticShapes(id)))
        );
    }

    #[test]
    fn set_position_refreshes_proxies() {
        let mut space = space();
        let k = square(&mut space, Vec2::ZERO, BodyType::Dynamic);
        let id = space.body(k).unwrap().shapes()[0].id();
        space.set_position(k, Vec2::new(10.0, 0.0)).unwrap();
        let bb = space.broadphase().get(id).unwrap();
        assert!(bb.contains_point(Vec2::new(10.0, 0.0)));
        assert!(!bb.contains_point(Vec2::ZERO));
    }

    #[test]
    fn adding_a_shape_wakes_a_sleeping_body() {
        let mut space = space();
        let k = square(&mut space, Vec2::ZERO, BodyType::Dynamic);
        let delay = space.config().sleep_delay;
        for _ in 0..=delay {
            space.advance_stamp();
            space.update_sleep(1.0 / 60.0);
        }
        assert!(space.body(k).unwrap().is_sleeping());
        space
            .add_shape(k, Shape::circle(0.5, Vec2::new(1.0, 0.0)).unwrap())
            .unwrap();
        let body = space.body(k).unwrap();
        assert!(!body.is_sleeping());
        assert_eq!(body.component().map(Component::waket), Some(space.stamp()));
        assert_eq!(space.broadphase().len(), 2);
    }

    #[test]
    fn kinematic_body_sleeps_after_the_delay_and_shape_edits_delay_it() {
        let mut space = space();
        let k = square(&mut space, Vec2::ZERO, BodyType::Kinematic);
        let delay = space.config().sleep_delay;
        for _ in 0..delay {
            space.advance_stamp();
            space.update_sleep(1.0 / 60.0);
            assert!(!space.body(k).unwrap().is_sleeping());
        }
        space.advance_stamp();
        assert_eq!(space.update_sleep(1.0 / 60.0), 1);

        space
            .add_shape(k, Shape::circle(0.5, Vec2::ZERO).unwrap())
            .unwrap();
        space.advance_stamp();
        space.update_sleep(1.0 / 60.0);
        assert!(!space.body(k).unwrap().is_sleeping());
    }

    #[test]
    fn commit_sweep_is_guarded_and_refreshes_proxies() {
        let mut space = space();
        let ground = square(&mut space, Vec2::new(5.0, 5.0), BodyType::Static);
        let ground_id = space.body(ground).unwrap().id();
        space.body_mut(ground).unwrap().begin_sweep(1.0 / 60.0);
        space.begin_solve();
        assert_eq!(
            space.body_mut(ground).unwrap().commit_sweep(),
            Err(BodyError::Attached(ground_id))
        );
        assert_eq!(
            space.commit_sweep(ground),
            Err(SpaceError::Body(BodyError::Midstep(ground_id)))
        );
        space.end_solve();
        assert_eq!(
            space.commit_sweep(ground),
            Err(SpaceError::Body(BodyError::StaticImmutable(ground_id)))
        );
        assert_eq!(space.body(ground).unwrap().position(), Vec2::new(5.0, 5.0));

        let k = square(&mut space, Vec2::ZERO, BodyType::Dynamic);
        let id = space.body(k).unwrap().id();
        assert_eq!(
            space.commit_sweep(k),
            Err(SpaceError::Body(BodyError::NoSweep(id)))
        );
        let cfg = *space.config();
        let body = space.body_mut(k).unwrap();
        body.set_velocity(Vec2::new(60.0, 0.0)).unwrap();
        body.begin_sweep(1.0 / 60.0);
        body.sweep_integrate(1.0 / 60.0, &cfg);
        let shape = body.shapes()[0].id();
        space.commit_sweep(k).unwrap();
        assert!((space.body(k).unwrap().position() - Vec2::new(1.0, 0.0)).length() < 1e-12);
        let bb = space.broadphase().get(shape).unwrap();
        assert!(bb.contains_point(Vec2::new(1.0, 0.0)));
        assert!(!bb.contains_point(Vec2::ZERO));
    }

    #[test]
    fn modify_shape_is_guarded_and_refreshes_proxies() {
        let mut space = space();
        let ground = square(&mut space, Vec2::ZERO, BodyType::Static);
        let ground_id = space.body(ground).unwrap().id();
        let ground_shape = space.body(ground).unwrap().shapes()[0].id();
        let shift = |s: &mut Shape| s.translate(Vec2::new(100.0, 0.0));
        space.begin_solve();
        assert_eq!(
            space.body_mut(ground).unwrap().modify_shape(ground_shape, shift),
            Err(BodyError::Attached(ground_id))
        );
        assert_eq!(
            space.modify_shape(ground, ground_shape, shift),
            Err(SpaceError::Body(BodyError::Midstep(ground_id)))
        );
        space.end_solve();
        assert_eq!(
            space.modify_shape(ground, ground_shape, shift),
            Err(SpaceError::Body(BodyError::StaticShapes(ground_id)))
        );

        let k = square(&mut space, Vec2::ZERO, BodyType::Dynamic);
        let shape = space.body(k).unwrap().shapes()[0].id();
        space.modify_shape(k, shape, shift).unwrap();
        let body_bb = space.body_mut(k).unwrap().aabb().unwrap();
        assert_eq!(space.broadphase().get(shape), Some(body_bb));
        assert!(body_bb.contains_point(Vec2::new(100.0, 0.0)));
    }

    #[test]
    fn constrained_body_cannot_leave() {
        let mut space = space();
        let a = square(&mut space, Vec2::ZERO, BodyType::Dynamic);
        let b = square(&mut space, Vec2::new(2.0, 0.0), BodyType::Dynamic);
        let c = space.add_constraint(Box::new(Link::pair(a, b))).unwrap();
        assert_eq!(space.remove_body(a).unwrap_err(), SpaceError::BodyConstrained(a));
        space.remove_constraint(c).unwrap();
        let body = space.remove_body(a).unwrap();
        assert!(!body.is_attached());
        assert!(body.component().is_none());
        assert_eq!(space.broadphase().len(), 1);
        assert!(matches!(space.body(a), Err(SpaceError::StaleBody(_))));
    }

    #[test]
    fn removing_a_body_discards_its_arbiters() {
        let mut space = space();
        let a = square(&mut space, Vec2::ZERO, BodyType::Dynamic);
        let b = square(&mut space, Vec2::new(1.0, 0.0), BodyType::Dynamic);
        let arb = space
            .add_arbiter(Arbiter::new(InteractionKind::Collision, a, b))
            .unwrap();
        space.remove_body(a).unwrap();
        assert!(space.arbiter(arb).is_err());
        assert!(space.body(b).unwrap().arbiters().is_empty());
    }

    #[test]
    fn stale_keys_are_reported() {
        let mut space = space();
        let a = square(&mut space, Vec2::ZERO, BodyType::Dynamic);
        space.remove_body(a).unwrap();
        assert_eq!(
            space.add_arbiter(Arbiter::new(InteractionKind::Sensor, a, a)),
            Err(SpaceError::StaleBody(a))
        );
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = SimConfig {
            linear_sleep_threshold: f64::NAN,
            ..SimConfig::default()
        };
        assert!(Space::new(cfg).is_err());
    }
}
