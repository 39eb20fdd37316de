// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error types.
//!
//! Every variant is a violated precondition. Callers are expected to satisfy
//! preconditions up front; an `Err` mid-step leaves earlier mutations of that
//! step in place.
use thiserror::Error;

use crate::ident::{ArbiterKey, BodyId, BodyKey, ConstraintKey, ShapeId};

/// Errors emitted by [`crate::Body`] operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BodyError {
    /// Centre of mass or bounding box requested for a body without shapes.
    #[error("body {0:?} has no shapes")]
    NoShapes(BodyId),
    /// A static body cannot be repositioned inside a space or by a sweep.
    #[error("static body {0:?} cannot be moved")]
    StaticImmutable(BodyId),
    /// The shape set of a static body inside a space is frozen.
    #[error("static body {0:?} cannot have its shapes changed once inside a space")]
    StaticShapes(BodyId),
    /// Structural mutation attempted while the solver is iterating.
    #[error("body {0:?} cannot be mutated in the middle of a step")]
    Midstep(BodyId),
    /// Linear force applied to a non-dynamic body.
    #[error("force can only be applied to dynamic bodies ({0:?})")]
    NotDynamic(BodyId),
    /// Velocity assigned to a static body.
    #[error("static body {0:?} cannot have its velocity set")]
    StaticVelocity(BodyId),
    /// The operation must go through the owning space.
    #[error("body {0:?} is attached to a space; mutate it through the space")]
    Attached(BodyId),
    /// `commit_sweep` called without an open sweep.
    #[error("body {0:?} has no sweep to commit")]
    NoSweep(BodyId),
    /// `clear` called on a body still referenced by constraints.
    #[error("body {0:?} is referenced by {1} constraint(s)")]
    Constrained(BodyId, usize),
    /// The shape is not owned by this body.
    #[error("shape {shape:?} is not owned by body {body:?}")]
    UnknownShape {
        /// Body that was asked.
        body: BodyId,
        /// Shape that was requested.
        shape: ShapeId,
    },
    /// Mass must be finite and strictly positive.
    #[error("mass must be finite and positive, got {0}")]
    InvalidMass(f64),
    /// Inertia must be finite and strictly positive.
    #[error("inertia must be finite and positive, got {0}")]
    InvalidInertia(f64),
    /// Gravity mass (or scale) must be finite.
    #[error("gravity mass must be finite, got {0}")]
    InvalidGravityMass(f64),
    /// A pose or velocity component was NaN or infinite.
    #[error("{0} must be finite")]
    NonFinite(&'static str),
}

/// Errors emitted while building or editing a [`crate::Shape`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ShapeError {
    /// Material density must be finite and strictly positive.
    #[error("density must be finite and positive, got {0}")]
    InvalidDensity(f64),
    /// Circle radius must be finite and strictly positive.
    #[error("radius must be finite and positive, got {0}")]
    InvalidRadius(f64),
    /// Polygons need at least one vertex.
    #[error("polygon has no vertices")]
    EmptyPolygon,
    /// A vertex or offset component was NaN or infinite.
    #[error("shape geometry must be finite")]
    NonFinite,
}

/// Errors emitted by [`crate::Space`] operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpaceError {
    /// The body key refers to a released slot.
    #[error("stale body key {0:?}")]
    StaleBody(BodyKey),
    /// The constraint key refers to a released slot.
    #[error("stale constraint key {0:?}")]
    StaleConstraint(ConstraintKey),
    /// The arbiter key refers to a released slot.
    #[error("stale arbiter key {0:?}")]
    StaleArbiter(ArbiterKey),
    /// A body still referenced by constraints cannot leave the space.
    #[error("body {0:?} is still referenced by constraints")]
    BodyConstrained(BodyKey),
    /// A body-level precondition failed.
    #[error(transparent)]
    Body(#[from] BodyError),
}
