// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Breadth-first queries over the constraint and arbiter graph.
//!
//! Traversal scratch is owned by the space and reused across calls, so
//! steady-state queries do not allocate once the buffers have grown.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;
use slotmap::SlotMap;
use tracing::instrument;

use super::Space;
use crate::body::Body;
use crate::broad::BroadPhase;
use crate::error::SpaceError;
use crate::ident::{ArbiterKey, BodyKey, ConstraintKey};
use crate::interaction::{Arbiter, Constraint, InteractionFilter};

/// Reusable buffers for graph walks and island building.
#[derive(Debug, Default)]
pub(crate) struct TraversalScratch {
    pub(super) visited: FxHashSet<BodyKey>,
    emitted: FxHashSet<BodyKey>,
    frontier: VecDeque<(BodyKey, usize)>,
    pub(super) restless: FxHashSet<BodyKey>,
    pub(super) order: Vec<BodyKey>,
    pub(super) island: Vec<BodyKey>,
}

/// Calls `visit` for every body linked to `body` by an active constraint.
fn constraint_neighbours(
    body: &Body,
    constraints: &SlotMap<ConstraintKey, Box<dyn Constraint>>,
    visit: &mut dyn FnMut(BodyKey),
) {
    for key in body.constraints() {
        if let Some(c) = constraints.get(*key) {
            if c.active() {
                c.visit_bodies(visit);
            }
        }
    }
}

/// Calls `visit` with the other participant of every active arbiter.
fn arbiter_neighbours(
    self_key: BodyKey,
    body: &Body,
    arbiters: &SlotMap<ArbiterKey, Arbiter>,
    visit: &mut dyn FnMut(BodyKey),
) {
    for key in body.arbiters() {
        if let Some(arb) = arbiters.get(*key) {
            if arb.active {
                visit(arb.other(self_key));
            }
        }
    }
}

impl<B: BroadPhase> Space<B> {
    /// Appends every body reachable from `start` through constraints, up to
    /// `depth` hops (`None` for unbounded), to `out`.
    ///
    /// `start` itself is included. Bodies already present in `out` are not
    /// appended again.
    #[instrument(skip(self, out))]
    pub fn connected_bodies(
        &mut self,
        start: BodyKey,
        depth: Option<usize>,
        out: &mut Vec<BodyKey>,
    ) -> Result<(), SpaceError> {
        if !self.bodies.contains_key(start) {
            return Err(SpaceError::StaleBody(start));
        }
        let scratch = &mut self.scratch;
        scratch.visited.clear();
        scratch.emitted.clear();
        scratch.emitted.extend(out.iter().copied());
        scratch.frontier.clear();

        scratch.visited.insert(start);
        scratch.frontier.push_back((start, 0));
        while let Some((key, hops)) = scratch.frontier.pop_front() {
            if scratch.emitted.insert(key) {
                out.push(key);
            }
            if depth.is_some_and(|d| hops >= d) {
                continue;
            }
            let Some(body) = self.bodies.get(key) else {
                continue;
            };
            let (visited, frontier) = (&mut scratch.visited, &mut scratch.frontier);
            constraint_neighbours(body, &self.constraints, &mut |n| {
                if visited.insert(n) {
                    frontier.push_back((n, hops + 1));
                }
            });
        }
        Ok(())
    }

    /// Appends the other participant of each active, awake arbiter of
    /// `body` whose kind passes `filter` to `out`, without duplicates.
    pub fn interacting_bodies(
        &mut self,
        body: BodyKey,
        filter: impl Into<InteractionFilter>,
        out: &mut Vec<BodyKey>,
    ) -> Result<(), SpaceError> {
        let filter = filter.into();
        let b = self.bodies.get(body).ok_or(SpaceError::StaleBody(body))?;
        let emitted = &mut self.scratch.emitted;
        emitted.clear();
        emitted.extend(out.iter().copied());
        for key in b.arbiters() {
            let Some(arb) = self.arbiters.get(*key) else {
                continue;
            };
            if !arb.active || arb.is_sleeping() || !filter.accepts(arb.kind()) {
                continue;
            }
            let other = arb.other(body);
            if emitted.insert(other) {
                out.push(other);
            }
        }
        Ok(())
    }

    /// Collects the sleep island containing `root` into `island`.
    ///
    /// Islands grow over active constraints and active arbiters and stop at
    /// static bodies, which belong to no island.
    pub(super) fn collect_island(&mut self, root: BodyKey, island: &mut Vec<BodyKey>) {
        island.clear();
        let scratch = &mut self.scratch;
        scratch.frontier.clear();
        scratch.visited.insert(root);
        scratch.frontier.push_back((root, 0));
        while let Some((key, _)) = scratch.frontier.pop_front() {
            let Some(body) = self.bodies.get(key) else {
                continue;
            };
            island.push(key);
            let bodies = &self.bodies;
            let (visited, frontier) = (&mut scratch.visited, &mut scratch.frontier);
            let mut enqueue = |n: BodyKey| {
                let joins = bodies.get(n).is_some_and(|b| !b.is_static());
                if joins && visited.insert(n) {
                    frontier.push_back((n, 0));
                }
            };
            constraint_neighbours(body, &self.constraints, &mut enqueue);
            arbiter_neighbours(key, body, &self.arbiters, &mut enqueue);
        }
    }
}
