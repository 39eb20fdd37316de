// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! planar-core: physical-state core of a 2-D rigid-body engine.
//!
//! A [`Body`] carries raw state plus derived quantities (mass, inertia,
//! gravity mass, centre of mass, bounding box) cached behind dirty flags and
//! recomputed on read. The [`Space`] owns attached bodies and supplies the
//! step stamp, the midstep guard, broad-phase registration and sleep-island
//! bookkeeping. Stepping, the solver and the narrow phase are external; they
//! drive bodies through public accessors.
//!
//! ```
//! use planar_core::{Body, Shape, Space, Vec2};
//!
//! let mut body = Body::dynamic();
//! body.add_shape(Shape::circle(1.0, Vec2::ZERO)?)?;
//! let mut space = Space::default();
//! let key = space.add_body(body)?;
//! let mass = space.body_mut(key)?.mass();
//! assert!((mass - core::f64::consts::PI).abs() < 1e-9);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
#![forbid(unsafe_code)]

mod body;
mod broad;
mod config;
mod error;
mod ident;
mod interaction;
mod shape;
mod space;

pub use body::{Body, BodyType, Component, GravityMassMode, MassMode};
pub use broad::{AllPairs, BroadPhase, NullBroadPhase};
pub use config::{ConfigError, SimConfig};
pub use error::{BodyError, ShapeError, SpaceError};
pub use ident::{ArbiterKey, BodyId, BodyKey, ConstraintKey, ShapeId};
pub use interaction::{Arbiter, Constraint, InteractionFilter, InteractionKind, Link};
pub use shape::{Geometry, Material, Shape};
pub use space::Space;

pub use planar_geom::{Aabb, Axis, Vec2};
