// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![doc = r"Planar geometry primitives for the rigid-body core.

This crate provides:
- Two-component vectors (`Vec2`).
- Cached rotation axes (`Axis`) with exact and small-angle incremental updates.
- Axis-aligned bounding boxes (`Aabb`).

Design notes:
- Every type is a plain `Copy` value; nothing is pooled, so a released value
  cannot be observed again.
- `f64` throughout; trajectories are compared against double-precision
  reference runs.
- Rustdoc is treated as part of the contract; public items are documented.
"]

/// Vector and rotation math.
pub mod math;
/// Foundational geometric types.
pub mod types;

pub use math::{Axis, Vec2, DEFAULT_SMALL_ANGLE_TOLERANCE_SQ};
pub use types::aabb::{Aabb, GeomError};
