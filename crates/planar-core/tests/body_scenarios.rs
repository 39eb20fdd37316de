// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
//! End-to-end scenarios driving bodies through a space the way an external
//! step loop does.

use core::f64::consts::PI;

use planar_core::{
    Arbiter, Body, BodyError, BodyKey, BodyType, InteractionKind, Link, Shape, SimConfig, Space,
    SpaceError, Vec2,
};

const DT: f64 = 1.0 / 60.0;

/// One step of a minimal external loop: stamp, integrate, sleep.
fn step(space: &mut Space, gravity: Vec2) -> usize {
    space.advance_stamp();
    let config = *space.config();
    for (_, body) in space.bodies_mut() {
        if body.is_sleeping() {
            continue;
        }
        body.integrate_velocity(DT, gravity);
        body.integrate_position(DT, &config);
    }
    space.refresh_broadphase();
    space.update_sleep(DT)
}

fn disc(body_type: BodyType) -> Body {
    let mut body = Body::new(body_type);
    body.add_shape(Shape::circle(1.0, Vec2::ZERO).unwrap()).unwrap();
    body
}

#[test]
fn unit_disc_has_mass_pi() {
    let mut space = Space::default();
    let key = space.add_body(disc(BodyType::Dynamic)).unwrap();
    let mass = space.body_mut(key).unwrap().mass();
    assert!((mass - PI).abs() < 1e-6);
}

#[test]
fn removing_one_of_two_polygons_halves_the_mass() {
    let mut space = Space::default();
    let key = space.add_body(Body::dynamic()).unwrap();
    let a = space
        .add_shape(key, Shape::rect(Vec2::ZERO, 2.0, 2.0).unwrap())
        .unwrap();
    space
        .add_shape(key, Shape::rect(Vec2::new(0.0, 4.0), 4.0, 1.0).unwrap())
        .unwrap();
    assert!((space.body_mut(key).unwrap().mass() - 8.0).abs() < 1e-9);
    space.remove_shape(key, a).unwrap();
    let body = space.body_mut(key).unwrap();
    assert!((body.mass() - 4.0).abs() < 1e-9);
    assert!((body.local_com().unwrap() - Vec2::new(0.0, 4.0)).length() < 1e-9);
}

#[test]
fn kinematic_mass_is_always_infinite() {
    let mut space = Space::default();
    let key = space.add_body(disc(BodyType::Kinematic)).unwrap();
    for _ in 0..3 {
        space
            .add_shape(key, Shape::rect(Vec2::ZERO, 1.0, 1.0).unwrap())
            .unwrap();
        let body = space.body_mut(key).unwrap();
        assert_eq!(body.mass(), f64::INFINITY);
        assert_eq!(body.inv_mass(), 0.0);
    }
}

#[test]
fn slow_body_falls_asleep_after_delay() {
    let mut space = Space::default();
    let key = space.add_body(disc(BodyType::Dynamic)).unwrap();
    space
        .body_mut(key)
        .unwrap()
        .set_velocity(Vec2::new(0.05, 0.0))
        .unwrap();
    let delay = space.config().sleep_delay;
    for _ in 0..delay {
        step(&mut space, Vec2::ZERO);
        assert!(!space.body(key).unwrap().is_sleeping());
    }
    assert_eq!(step(&mut space, Vec2::ZERO), 1);
    let body = space.body(key).unwrap();
    assert!(body.is_sleeping());
    assert_eq!(body.velocity(), Vec2::ZERO);
}

#[test]
fn fast_body_never_sleeps() {
    let mut space = Space::default();
    let key = space.add_body(disc(BodyType::Dynamic)).unwrap();
    let delay = space.config().sleep_delay;
    for _ in 0..delay * 2 {
        space
            .body_mut(key)
            .unwrap()
            .set_velocity(Vec2::new(1.0, 0.0))
            .unwrap();
        step(&mut space, Vec2::ZERO);
    }
    assert!(!space.body(key).unwrap().is_sleeping());
}

#[test]
fn moving_neighbour_keeps_constrained_island_awake() {
    let mut space = Space::default();
    let still = space.add_body(disc(BodyType::Dynamic)).unwrap();
    let busy = space.add_body(disc(BodyType::Dynamic)).unwrap();
    space
        .add_constraint(Box::new(Link::pair(still, busy)))
        .unwrap();
    let delay = space.config().sleep_delay;
    for _ in 0..=delay {
        space
            .body_mut(busy)
            .unwrap()
            .set_angular_velocity(2.0)
            .unwrap();
        step(&mut space, Vec2::ZERO);
    }
    assert!(!space.body(still).unwrap().is_sleeping());
}

#[test]
fn static_contact_does_not_join_islands() {
    let mut space = Space::default();
    let ground = space.add_body(disc(BodyType::Static)).unwrap();
    let resting = space.add_body(disc(BodyType::Dynamic)).unwrap();
    let mut other = disc(BodyType::Dynamic);
    other.set_position(Vec2::new(5.0, 0.0)).unwrap();
    let busy = space.add_body(other).unwrap();
    let a = space
        .add_arbiter(Arbiter::new(InteractionKind::Collision, ground, resting))
        .unwrap();
    space
        .add_arbiter(Arbiter::new(InteractionKind::Collision, ground, busy))
        .unwrap();
    let delay = space.config().sleep_delay;
    for _ in 0..=delay {
        space
            .body_mut(busy)
            .unwrap()
            .set_velocity(Vec2::new(1.0, 0.0))
            .unwrap();
        step(&mut space, Vec2::ZERO);
    }
    assert!(space.body(resting).unwrap().is_sleeping());
    assert!(!space.body(busy).unwrap().is_sleeping());
    assert!(space.arbiter(a).unwrap().is_sleeping());

    let mut out: Vec<BodyKey> = Vec::new();
    space
        .interacting_bodies(ground, InteractionKind::Collision, &mut out)
        .unwrap();
    assert_eq!(out, vec![busy]);
}

#[test]
fn waking_restores_arbiters() {
    let mut space = Space::default();
    let a = space.add_body(disc(BodyType::Dynamic)).unwrap();
    let b = space.add_body(disc(BodyType::Dynamic)).unwrap();
    let arb = space
        .add_arbiter(Arbiter::new(InteractionKind::Collision, a, b))
        .unwrap();
    let delay = space.config().sleep_delay;
    for _ in 0..=delay {
        step(&mut space, Vec2::ZERO);
    }
    assert!(space.arbiter(arb).unwrap().is_sleeping());
    space.really_wake(a).unwrap();
    assert!(!space.arbiter(arb).unwrap().is_sleeping());
    assert_eq!(
        space.body(a).unwrap().component().map(|c| c.waket()),
        Some(space.stamp())
    );
}

#[test]
fn clear_on_attached_body_fails_before_mutation() {
    let mut space = Space::default();
    let key = space.add_body(disc(BodyType::Dynamic)).unwrap();
    let body = space.body_mut(key).unwrap();
    body.set_mass(3.0).unwrap();
    let id = body.id();
    assert_eq!(body.clear().unwrap_err(), BodyError::Attached(id));
    assert_eq!(body.shapes().len(), 1);
    assert_eq!(body.mass(), 3.0);
}

#[test]
fn cleared_body_can_be_reused() {
    let mut space = Space::default();
    let key = space.add_body(disc(BodyType::Dynamic)).unwrap();
    let mut body = space.remove_body(key).unwrap();
    let shapes = body.clear().unwrap();
    assert_eq!(shapes.len(), 1);
    assert_eq!(body.local_com(), Err(BodyError::NoShapes(body.id())));
    body.add_shape(Shape::rect(Vec2::ZERO, 1.0, 1.0).unwrap())
        .unwrap();
    assert!((body.mass() - 1.0).abs() < 1e-12);
}

#[test]
fn gravity_pulls_until_the_space_removes_the_body() {
    let mut space = Space::new(SimConfig::default()).unwrap();
    let key = space.add_body(disc(BodyType::Dynamic)).unwrap();
    for _ in 0..10 {
        step(&mut space, Vec2::new(0.0, -9.81));
    }
    let body = space.body(key).unwrap();
    assert!(body.position().y() < 0.0);
    assert!(body.previous_position().y() > body.position().y());
    let removed = space.remove_body(key).unwrap();
    assert!(!removed.is_attached());
    assert!(matches!(space.body(key), Err(SpaceError::StaleBody(_))));
}

#[test]
fn ccd_sweep_round_trip() {
    let config = SimConfig::default();
    let mut body = disc(BodyType::Dynamic);
    body.set_bullet(true);
    body.set_velocity(Vec2::new(30.0, 0.0)).unwrap();
    assert!(body.is_ccd_candidate());
    let shape = body.shapes()[0].id();

    body.begin_sweep(DT);
    body.sweep_integrate(DT * 0.5, &config);
    body.sweep_integrate(DT * 0.5, &config);
    body.sweep_validate(shape).unwrap();
    let swept = body.shape(shape).unwrap().world_centroid();
    assert!((swept - Vec2::new(0.25, 0.0)).length() < 1e-12);
    assert_eq!(body.position(), Vec2::ZERO);
    let committed = body.shape_world(shape).unwrap().world_centroid();
    assert!(committed.length() < 1e-12);

    body.sweep_integrate(DT, &config);
    body.commit_sweep().unwrap();
    assert!(!body.is_sweeping());
    assert!((body.position() - Vec2::new(0.5, 0.0)).length() < 1e-12);
    assert!((body.world_com().unwrap() - Vec2::new(0.5, 0.0)).length() < 1e-12);

    body.set_disable_ccd(true);
    assert!(!body.is_ccd_candidate());
}
