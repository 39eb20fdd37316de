// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Broad-phase port.
//!
//! The space registers, refreshes and drops one proxy per shape; pair finding
//! and spatial indexing belong to the implementation behind the trait.
//!
//! Determinism contract for implementations that report pairs:
//! - pair identity is canonicalised as `(min_id, max_id)`;
//! - the pair list is sorted ascending by that tuple;
//! - overlap is inclusive on faces.

use std::collections::BTreeMap;

use planar_geom::Aabb;

use crate::ident::ShapeId;

/// Proxy bookkeeping interface consumed by [`crate::Space`].
pub trait BroadPhase {
    /// Registers a new proxy for `shape`.
    fn insert(&mut self, shape: ShapeId, aabb: Aabb);
    /// Refreshes the bounds of an existing proxy.
    fn update(&mut self, shape: ShapeId, aabb: Aabb);
    /// Drops the proxy for `shape` if present.
    fn remove(&mut self, shape: ShapeId);
}

/// Broad phase that tracks nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBroadPhase;

impl BroadPhase for NullBroadPhase {
    fn insert(&mut self, _shape: ShapeId, _aabb: Aabb) {}
    fn update(&mut self, _shape: ShapeId, _aabb: Aabb) {}
    fn remove(&mut self, _shape: ShapeId) {}
}

/// `O(n²)` all-pairs reference broad phase.
///
/// Small enough to reason about in tests; production callers plug in a
/// sweep-and-prune or tree implementation with the same pair ordering.
#[derive(Debug, Default, Clone)]
pub struct AllPairs {
    items: BTreeMap<ShapeId, Aabb>,
}

impl AllPairs {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered proxies.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// `true` when no proxy is registered.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Bounds registered for `shape`.
    pub fn get(&self, shape: ShapeId) -> Option<Aabb> {
        self.items.get(&shape).copied()
    }

    /// Canonical, sorted list of overlapping proxy pairs.
    pub fn pairs(&self) -> Vec<(ShapeId, ShapeId)> {
        let items: Vec<(ShapeId, Aabb)> = self.items.iter().map(|(id, bb)| (*id, *bb)).collect();
        let mut out = Vec::new();
        for (i, (a, a_bb)) in items.iter().enumerate() {
            for (b, b_bb) in items.iter().skip(i + 1) {
                if a_bb.overlaps(b_bb) {
                    out.push((*a, *b)); // canonical: BTreeMap order gives a < b
                }
            }
        }
        out
    }
}

impl BroadPhase for AllPairs {
    fn insert(&mut self, shape: ShapeId, aabb: Aabb) {
        self.items.insert(shape, aabb);
    }

    fn update(&mut self, shape: ShapeId, aabb: Aabb) {
        if let Some(slot) = self.items.get_mut(&shape) {
            *slot = aabb;
        }
    }

    fn remove(&mut self, shape: ShapeId) {
        self.items.remove(&shape);
    }
}
