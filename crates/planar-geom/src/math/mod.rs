// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Planar math helpers: two-component vectors and cached rotation axes.
//!
//! All operations are `f64`; no fused multiply-add is used explicitly so the
//! incremental axis update reproduces reference trajectories term for term.

mod axis;
mod vec2;

pub use axis::Axis;
pub use vec2::Vec2;

/// Global epsilon used by math routines when detecting degenerate values.
pub const EPSILON: f64 = 1e-12;

/// Squared angular step above which [`Axis::advance`] falls back to an exact
/// `sin`/`cos` evaluation instead of the incremental update.
pub const DEFAULT_SMALL_ANGLE_TOLERANCE_SQ: f64 = 1e-4;
