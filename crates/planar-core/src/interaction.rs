// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Records linking bodies: arbiters (interactions produced by the narrow
//! phase) and constraints (produced by the user or a joint library).

use crate::ident::BodyKey;

/// Kind of interaction an arbiter records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    /// Solid contact.
    Collision,
    /// Overlap reporting only.
    Sensor,
    /// Buoyancy and drag.
    Fluid,
}

/// Filter used by interaction queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InteractionFilter {
    /// Only the given kind.
    Only(InteractionKind),
    /// Every kind.
    #[default]
    Any,
}

impl InteractionFilter {
    /// Returns `true` if arbiters of `kind` pass this filter.
    pub fn accepts(self, kind: InteractionKind) -> bool {
        match self {
            Self::Only(k) => k == kind,
            Self::Any => true,
        }
    }
}

impl From<InteractionKind> for InteractionFilter {
    fn from(kind: InteractionKind) -> Self {
        Self::Only(kind)
    }
}

/// Persistent record of an interaction between two bodies.
///
/// Arbiters are created and refreshed by the external narrow phase; the space
/// only tracks membership and sleep state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arbiter {
    kind: InteractionKind,
    body1: BodyKey,
    body2: BodyKey,
    /// Whether the narrow phase reported the interaction this step.
    pub active: bool,
    sleeping: bool,
}

impl Arbiter {
    /// New active, awake arbiter between `body1` and `body2`.
    pub const fn new(kind: InteractionKind, body1: BodyKey, body2: BodyKey) -> Self {
        Self {
            kind,
            body1,
            body2,
            active: true,
            sleeping: false,
        }
    }

    /// Interaction kind.
    pub const fn kind(&self) -> InteractionKind {
        self.kind
    }

    /// Both participants.
    pub const fn bodies(&self) -> (BodyKey, BodyKey) {
        (self.body1, self.body2)
    }

    /// Whether both participants are asleep.
    pub const fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    pub(crate) fn set_sleeping(&mut self, sleeping: bool) {
        self.sleeping = sleeping;
    }

    /// The participant that is not `body`.
    pub fn other(&self, body: BodyKey) -> BodyKey {
        if self.body1 == body {
            self.body2
        } else {
            self.body1
        }
    }
}

/// Constraint collaborator contract.
///
/// Joint solvers live outside this crate; the space needs only to enumerate
/// the bodies a constraint touches.
pub trait Constraint {
    /// Calls `visit` once per body this constraint references.
    fn visit_bodies(&self, visit: &mut dyn FnMut(BodyKey));

    /// Whether the constraint currently participates in the simulation.
    fn active(&self) -> bool {
        true
    }
}

/// A constraint that simply ties a set of bodies together.
///
/// Useful as a grouping link and in tests; real joints implement
/// [`Constraint`] themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    bodies: Vec<BodyKey>,
}

impl Link {
    /// Links every body in `bodies`.
    pub fn new(bodies: impl IntoIterator<Item = BodyKey>) -> Self {
        Self {
            bodies: bodies.into_iter().collect(),
        }
    }

    /// Links exactly two bodies.
    pub fn pair(a: BodyKey, b: BodyKey) -> Self {
        Self { bodies: vec![a, b] }
    }
}

impl Constraint for Link {
    fn visit_bodies(&self, visit: &mut dyn FnMut(BodyKey)) {
        for b in &self.bodies {
            visit(*b);
        }
    }
}
