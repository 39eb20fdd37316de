// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
//! Property tests for the lazily validated mass properties.

use planar_core::{Axis, Body, Material, SimConfig, Shape, Vec2};
use proptest::prelude::*;

fn rect_strategy() -> impl Strategy<Value = (f64, f64, f64, f64, f64)> {
    (
        -50.0f64..50.0,
        -50.0f64..50.0,
        0.1f64..10.0,
        0.1f64..10.0,
        0.1f64..5.0,
    )
}

proptest! {
    #[test]
    fn mass_is_area_times_density(rects in prop::collection::vec(rect_strategy(), 1..8)) {
        let mut body = Body::dynamic();
        let mut expected = 0.0;
        for (cx, cy, w, h, rho) in rects {
            let shape = Shape::rect(Vec2::new(cx, cy), w, h)
                .unwrap()
                .with_material(Material::with_density(rho).unwrap());
            body.add_shape(shape).unwrap();
            expected += w * h * rho;
            // Re-validated after every attachment, never stale.
            prop_assert!((body.mass() - expected).abs() <= 1e-9 * expected.max(1.0));
        }
        prop_assert!((body.inv_mass() * body.mass() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn com_lies_inside_the_bounding_box(rects in prop::collection::vec(rect_strategy(), 1..8)) {
        let mut body = Body::dynamic();
        for (cx, cy, w, h, rho) in rects {
            let shape = Shape::rect(Vec2::new(cx, cy), w, h)
                .unwrap()
                .with_material(Material::with_density(rho).unwrap());
            body.add_shape(shape).unwrap();
        }
        let com = body.world_com().unwrap();
        let bb = body.aabb().unwrap().inflate(1e-9);
        prop_assert!(bb.contains_point(com));
    }

    #[test]
    fn parallel_axis_inertia_is_positive(w in 0.1f64..10.0, h in 0.1f64..10.0, off in -20.0f64..20.0) {
        let mut centred = Body::dynamic();
        centred.add_shape(Shape::rect(Vec2::ZERO, w, h).unwrap()).unwrap();
        let expected = w * h * (w * w + h * h) / 12.0;
        prop_assert!((centred.inertia() - expected).abs() <= 1e-9 * expected.max(1.0));

        // The coefficient is taken about each shape's own centroid, so an
        // offset shape contributes the same inertia.
        let mut shifted = Body::dynamic();
        shifted.add_shape(Shape::rect(Vec2::new(off, 0.0), w, h).unwrap()).unwrap();
        prop_assert!((shifted.inertia() - expected).abs() <= 1e-6 * expected.max(1.0));
    }

    #[test]
    fn incremental_axis_tracks_exact_below_tolerance(theta in -10.0f64..10.0, dr in -0.0099f64..0.0099) {
        let mut axis = Axis::from_angle(theta);
        let tol = SimConfig::default().small_angle_tolerance_sq;
        prop_assume!(dr * dr <= tol);
        axis.advance(theta + dr, dr, tol);
        let exact = Axis::from_angle(theta + dr);
        prop_assert!((axis.sin() - exact.sin()).abs() < 1e-6);
        prop_assert!((axis.cos() - exact.cos()).abs() < 1e-6);
    }

    #[test]
    fn sweep_integrate_is_idempotent(
        vx in -100.0f64..100.0,
        vy in -100.0f64..100.0,
        w in -50.0f64..50.0,
        t in 0.0f64..1.0,
    ) {
        let config = SimConfig::default();
        let mut body = Body::dynamic();
        body.add_shape(Shape::circle(1.0, Vec2::ZERO).unwrap()).unwrap();
        body.set_velocity(Vec2::new(vx, vy)).unwrap();
        body.set_angular_velocity(w).unwrap();
        body.begin_sweep(1.0 / 60.0);
        body.sweep_integrate(t / 60.0, &config);
        let first = (body.swept_position(), body.swept_rotation(), body.swept_axis());
        body.sweep_integrate(t / 60.0, &config);
        prop_assert_eq!(first, (body.swept_position(), body.swept_rotation(), body.swept_axis()));
    }
}
