// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Identifier utilities.
//!
//! Bodies and shapes carry process-unique ids from birth so they can be named
//! before they join a [`crate::Space`]. Inside a space, bodies, constraints and
//! arbiters are addressed by generation-tagged arena keys; a key outliving its
//! slot is rejected instead of aliasing a newer occupant.
use std::sync::atomic::{AtomicU64, Ordering};

use slotmap::new_key_type;

static NEXT_BODY: AtomicU64 = AtomicU64::new(1);
static NEXT_SHAPE: AtomicU64 = AtomicU64::new(1);

/// Opaque unique identity of a [`crate::Body`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct BodyId(u64);

impl BodyId {
    pub(crate) fn next() -> Self {
        Self(NEXT_BODY.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Opaque unique identity of a [`crate::Shape`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ShapeId(u64);

impl ShapeId {
    pub(crate) fn next() -> Self {
        Self(NEXT_SHAPE.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

new_key_type! {
    /// Arena key of a body owned by a [`crate::Space`].
    pub struct BodyKey;
    /// Arena key of a constraint owned by a [`crate::Space`].
    pub struct ConstraintKey;
    /// Arena key of an arbiter owned by a [`crate::Space`].
    pub struct ArbiterKey;
}
