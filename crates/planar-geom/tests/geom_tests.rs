// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
//! Integration tests for planar-geom boxes and cached axes.

use planar_geom::{Aabb, Axis, GeomError, Vec2};
use proptest::prelude::*;

#[test]
fn union_covers_both_boxes() {
    let a = Aabb::from_center_half_extents(Vec2::ZERO, 1.0, 1.0);
    let b = Aabb::from_center_half_extents(Vec2::new(10.0, 0.0), 1.0, 2.0);
    let u = a.union(&b);
    assert_eq!(u.min().to_array(), [-1.0, -2.0]);
    assert_eq!(u.max().to_array(), [11.0, 2.0]);
}

#[test]
fn touching_faces_overlap() {
    let a = Aabb::from_center_half_extents(Vec2::ZERO, 1.0, 1.0);
    let b = Aabb::from_center_half_extents(Vec2::new(2.0, 0.0), 1.0, 1.0);
    let c = Aabb::from_center_half_extents(Vec2::new(2.5, 0.0), 1.0, 1.0);
    assert!(a.overlaps(&b));
    assert!(!a.overlaps(&c));
}

#[test]
fn inverted_bounds_are_rejected() {
    let err = Aabb::new(Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0));
    assert!(matches!(err, Err(GeomError::InvalidBounds { .. })));
}

#[test]
fn empty_point_set_is_rejected() {
    assert_eq!(Aabb::from_points(&[]), Err(GeomError::EmptyPointSet));
}

#[test]
fn diagonal_of_three_four_box_is_five() {
    let b = Aabb::new(Vec2::ZERO, Vec2::new(3.0, 4.0)).unwrap();
    assert!((b.diagonal_squared() - 25.0).abs() < 1e-12);
}

proptest! {
    #[test]
    fn from_points_contains_every_point(
        pts in prop::collection::vec((-1e3f64..1e3, -1e3f64..1e3), 1..32)
    ) {
        let points: Vec<Vec2> = pts.iter().map(|&(x, y)| Vec2::new(x, y)).collect();
        let bounds = Aabb::from_points(&points).unwrap();
        for p in &points {
            prop_assert!(bounds.contains_point(*p));
        }
    }

    #[test]
    fn small_steps_track_exact_axis(theta in -10.0f64..10.0, dr in -0.01f64..0.01) {
        let mut axis = Axis::from_angle(theta);
        axis.advance(theta + dr, dr, 1e-4);
        let exact = Axis::from_angle(theta + dr);
        prop_assert!((axis.sin() - exact.sin()).abs() < 1e-6);
        prop_assert!((axis.cos() - exact.cos()).abs() < 1e-6);
    }
}
