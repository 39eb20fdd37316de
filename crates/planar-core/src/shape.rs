// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shapes attached to bodies.
//!
//! A shape is a tagged union over circle and polygon geometry plus a material.
//! Local quantities (area, inertia coefficient, centroid) and world quantities
//! (world centroid, global vertices, edge normals and projections, bounding
//! box) are cached behind their own dirty flags, mirroring the body caches.
//!
//! All local coordinates are relative to the owning body's origin.

use core::f64::consts::PI;

use planar_geom::{Aabb, Axis, Vec2};
use tracing::trace;

use crate::error::ShapeError;
use crate::ident::{BodyId, ShapeId};

/// Surface and bulk properties of a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    density: f64,
    /// Coefficient of restitution.
    pub elasticity: f64,
    /// Kinetic friction coefficient.
    pub dynamic_friction: f64,
    /// Static friction coefficient.
    pub static_friction: f64,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            density: 1.0,
            elasticity: 0.0,
            dynamic_friction: 1.0,
            static_friction: 2.0,
        }
    }
}

impl Material {
    /// Default material with the given density.
    pub fn with_density(density: f64) -> Result<Self, ShapeError> {
        let mut m = Self::default();
        m.set_density(density)?;
        Ok(m)
    }

    /// Mass per unit area.
    pub const fn density(&self) -> f64 {
        self.density
    }

    /// Sets the density; must be finite and strictly positive.
    pub fn set_density(&mut self, density: f64) -> Result<(), ShapeError> {
        if !density.is_finite() || density <= 0.0 {
            return Err(ShapeError::InvalidDensity(density));
        }
        self.density = density;
        Ok(())
    }
}

/// Shape geometry in body-local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Disc of `radius` centred at `offset`.
    Circle {
        /// Radius, strictly positive.
        radius: f64,
        /// Centre relative to the body origin.
        offset: Vec2,
    },
    /// Convex polygon; one or two vertices describe a degenerate point or
    /// segment.
    Polygon {
        /// Vertices relative to the body origin, in order.
        verts: Vec<Vec2>,
    },
}

impl Geometry {
    fn check(&self) -> Result<(), ShapeError> {
        match self {
            Self::Circle { radius, offset } => {
                if !radius.is_finite() || *radius <= 0.0 {
                    return Err(ShapeError::InvalidRadius(*radius));
                }
                if !offset.is_finite() {
                    return Err(ShapeError::NonFinite);
                }
            }
            Self::Polygon { verts } => {
                if verts.is_empty() {
                    return Err(ShapeError::EmptyPolygon);
                }
                if !verts.iter().all(|v| v.is_finite()) {
                    return Err(ShapeError::NonFinite);
                }
            }
        }
        Ok(())
    }
}

/// World-frame data derived from the local geometry and a body pose.
#[derive(Debug, Clone, Default)]
struct WorldData {
    centroid: Vec2,
    verts: Vec<Vec2>,
    normals: Vec<Vec2>,
    projections: Vec<f64>,
}

/// A shape: geometry, material, owner back-reference and cached quantities.
///
/// Not `Clone`: a shape's id names exactly one value, owned by at most one
/// body.
#[derive(Debug)]
pub struct Shape {
    id: ShapeId,
    body: Option<BodyId>,
    material: Material,
    geometry: Geometry,

    area: f64,
    inertia: f64,
    area_inertia_dirty: bool,
    local_centroid: Vec2,
    local_centroid_dirty: bool,

    world: WorldData,
    world_dirty: bool,
    aabb: Aabb,
    aabb_dirty: bool,
}

impl Shape {
    /// Builds a shape from geometry and material.
    pub fn new(geometry: Geometry, material: Material) -> Result<Self, ShapeError> {
        geometry.check()?;
        let n = match &geometry {
            Geometry::Circle { .. } => 0,
            Geometry::Polygon { verts } => verts.len(),
        };
        Ok(Self {
            id: ShapeId::next(),
            body: None,
            material,
            geometry,
            area: 0.0,
            inertia: 0.0,
            area_inertia_dirty: true,
            local_centroid: Vec2::ZERO,
            local_centroid_dirty: true,
            world: WorldData {
                centroid: Vec2::ZERO,
                verts: Vec::with_capacity(n),
                normals: Vec::with_capacity(n),
                projections: Vec::with_capacity(n),
            },
            world_dirty: true,
            aabb: Aabb::default(),
            aabb_dirty: true,
        })
    }

    /// Circle of `radius` centred at `offset` with the default material.
    pub fn circle(radius: f64, offset: Vec2) -> Result<Self, ShapeError> {
        Self::new(Geometry::Circle { radius, offset }, Material::default())
    }

    /// Polygon with the given local vertices and the default material.
    pub fn polygon(verts: Vec<Vec2>) -> Result<Self, ShapeError> {
        Self::new(Geometry::Polygon { verts }, Material::default())
    }

    /// Axis-aligned `width × height` box centred at `center`.
    pub fn rect(center: Vec2, width: f64, height: f64) -> Result<Self, ShapeError> {
        let hx = 0.5 * width;
        let hy = 0.5 * height;
        Self::polygon(vec![
            center + Vec2::new(-hx, -hy),
            center + Vec2::new(hx, -hy),
            center + Vec2::new(hx, hy),
            center + Vec2::new(-hx, hy),
        ])
    }

    /// Replaces the material, builder style.
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Unique id.
    pub const fn id(&self) -> ShapeId {
        self.id
    }

    /// Owning body, if any.
    pub const fn body(&self) -> Option<BodyId> {
        self.body
    }

    /// Material.
    pub const fn material(&self) -> &Material {
        &self.material
    }

    /// Local geometry.
    pub const fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Replaces the material. Density changes affect the owner's mass
    /// properties; edit owned shapes through [`crate::Body::modify_shape`].
    pub fn set_material(&mut self, material: Material) {
        self.material = material;
    }

    /// Replaces the geometry and invalidates every cache.
    pub fn set_geometry(&mut self, geometry: Geometry) -> Result<(), ShapeError> {
        geometry.check()?;
        self.geometry = geometry;
        self.invalidate_local();
        Ok(())
    }

    /// Moves the geometry by `delta` in local coordinates.
    pub fn translate(&mut self, delta: Vec2) {
        match &mut self.geometry {
            Geometry::Circle { offset, .. } => *offset += delta,
            Geometry::Polygon { verts } => {
                for v in verts.iter_mut() {
                    *v += delta;
                }
            }
        }
        self.invalidate_local();
    }

    pub(crate) fn added_to_body(&mut self, body: BodyId) {
        self.body = Some(body);
        self.invalidate_world();
    }

    pub(crate) fn removed_from_body(&mut self) {
        self.body = None;
        self.invalidate_world();
    }

    fn invalidate_local(&mut self) {
        self.area_inertia_dirty = true;
        self.local_centroid_dirty = true;
        self.invalidate_world();
    }

    /// Marks world-frame data and the bounding box stale.
    pub fn invalidate_world(&mut self) {
        self.world_dirty = true;
        self.aabb_dirty = true;
    }

    /// Area of the shape.
    pub fn area(&mut self) -> f64 {
        self.validate_area_inertia();
        self.area
    }

    /// Polar moment of inertia per unit mass about the shape's own centroid.
    pub fn inertia_coefficient(&mut self) -> f64 {
        self.validate_area_inertia();
        self.inertia
    }

    /// Centroid in body-local coordinates.
    pub fn local_centroid(&mut self) -> Vec2 {
        self.validate_local_centroid();
        self.local_centroid
    }

    /// Last computed world centroid (committed or swept). Read through
    /// [`crate::Body::shape_world`] for committed-pose data.
    pub fn world_centroid(&self) -> Vec2 {
        self.world.centroid
    }

    /// Last computed global polygon vertices (empty for circles).
    pub fn world_vertices(&self) -> &[Vec2] {
        &self.world.verts
    }

    /// Last computed outward edge normals (empty for circles).
    pub fn edge_normals(&self) -> &[Vec2] {
        &self.world.normals
    }

    /// Last computed edge projections `normal · vertex` (empty for circles).
    pub fn edge_projections(&self) -> &[f64] {
        &self.world.projections
    }

    /// Farthest extent of the shape from the body origin.
    pub fn radius_about_origin(&self) -> f64 {
        match &self.geometry {
            Geometry::Circle { radius, offset } => offset.length() + radius,
            Geometry::Polygon { verts } => {
                verts.iter().map(|v| v.length()).fold(0.0, f64::max)
            }
        }
    }

    fn validate_area_inertia(&mut self) {
        if !self.area_inertia_dirty {
            return;
        }
        self.area_inertia_dirty = false;
        let centroid = self.local_centroid();
        let (area, inertia) = match &self.geometry {
            Geometry::Circle { radius, .. } => {
                let r2 = radius * radius;
                (PI * r2, 0.5 * r2)
            }
            Geometry::Polygon { verts } => polygon_area_inertia(verts, centroid),
        };
        self.area = area;
        self.inertia = inertia;
        trace!(shape = ?self.id, area, inertia, "validated area/inertia");
    }

    fn validate_local_centroid(&mut self) {
        if !self.local_centroid_dirty {
            return;
        }
        self.local_centroid_dirty = false;
        self.local_centroid = match &self.geometry {
            Geometry::Circle { offset, .. } => *offset,
            Geometry::Polygon { verts } => polygon_centroid(verts),
        };
    }

    /// Recomputes world-frame data for the pose `(pos, axis)` if stale.
    pub(crate) fn validate_world(&mut self, pos: Vec2, axis: Axis) {
        if !self.world_dirty {
            return;
        }
        self.world_dirty = false;
        self.write_world(pos, axis);
    }

    /// Recomputes the bounding box for the pose `(pos, axis)` if stale.
    pub(crate) fn validate_aabb(&mut self, pos: Vec2, axis: Axis) -> Aabb {
        if self.aabb_dirty {
            self.validate_world(pos, axis);
            self.aabb_dirty = false;
            self.aabb = self.bounds_from_world();
        }
        self.aabb
    }

    /// Bounding box as last validated.
    pub fn aabb(&self) -> Aabb {
        self.aabb
    }

    /// Writes world-frame data for a hypothetical pose without touching the
    /// committed caches' validity: the data is left marked stale so the next
    /// committed read recomputes it.
    pub(crate) fn sweep_validate(&mut self, pos: Vec2, axis: Axis) {
        self.write_world(pos, axis);
        self.invalidate_world();
    }

    fn bounds_from_world(&self) -> Aabb {
        match &self.geometry {
            Geometry::Circle { radius, .. } => {
                Aabb::from_center_half_extents(self.world.centroid, *radius, *radius)
            }
            Geometry::Polygon { .. } => Aabb::from_points(&self.world.verts)
                .unwrap_or_else(|_| Aabb::from_center_half_extents(self.world.centroid, 0.0, 0.0)),
        }
    }

    fn write_world(&mut self, pos: Vec2, axis: Axis) {
        let local = self.local_centroid();
        self.world.centroid = pos + local.rotate(axis);
        let Geometry::Polygon { verts } = &self.geometry else {
            return;
        };
        let world = &mut self.world;
        world.verts.clear();
        world.normals.clear();
        world.projections.clear();
        world.verts.extend(verts.iter().map(|v| pos + v.rotate(axis)));
        if verts.len() < 3 {
            return;
        }
        let ccw = signed_cross_sum(verts) >= 0.0;
        let n = world.verts.len();
        for i in 0..n {
            let a = world.verts[i];
            let b = world.verts[(i + 1) % n];
            let edge = (b - a).normalize();
            let normal = if ccw { -edge.perp() } else { edge.perp() };
            world.normals.push(normal);
            world.projections.push(normal.dot(a));
        }
    }
}

fn signed_cross_sum(verts: &[Vec2]) -> f64 {
    let n = verts.len();
    (0..n).map(|i| verts[i].cross(verts[(i + 1) % n])).sum()
}

/// Shoelace-weighted centroid; degenerate inputs fall back to the vertex mean.
fn polygon_centroid(verts: &[Vec2]) -> Vec2 {
    let mean = || {
        let sum = verts.iter().fold(Vec2::ZERO, |acc, v| acc + *v);
        #[allow(clippy::cast_precision_loss)]
        let n = verts.len() as f64;
        sum.scale(1.0 / n)
    };
    if verts.len() < 3 {
        return mean();
    }
    let n = verts.len();
    let mut acc = Vec2::ZERO;
    let mut cross_sum = 0.0;
    for i in 0..n {
        let v = verts[i];
        let u = verts[(i + 1) % n];
        let a = v.cross(u);
        acc += (v + u).scale(a);
        cross_sum += a;
    }
    if cross_sum == 0.0 {
        return mean();
    }
    acc.scale(1.0 / (3.0 * cross_sum))
}

/// Returns `(area, inertia per unit mass about centroid)`.
fn polygon_area_inertia(verts: &[Vec2], centroid: Vec2) -> (f64, f64) {
    if verts.len() < 3 {
        return (0.0, 0.0);
    }
    let n = verts.len();
    let mut s1 = 0.0;
    let mut s2 = 0.0;
    for i in 0..n {
        let v = verts[i] - centroid;
        let u = verts[(i + 1) % n] - centroid;
        let a = v.cross(u);
        s1 += a * (v.dot(v) + v.dot(u) + u.dot(u));
        s2 += a;
    }
    if s2 == 0.0 {
        return (0.0, 0.0);
    }
    (0.5 * s2.abs(), s1 / (6.0 * s2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_circle_area_is_pi() {
        let mut s = Shape::circle(1.0, Vec2::ZERO).unwrap();
        assert!((s.area() - PI).abs() < 1e-12);
        assert!((s.inertia_coefficient() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn square_properties() {
        let mut s = Shape::rect(Vec2::new(3.0, 1.0), 2.0, 2.0).unwrap();
        assert!((s.area() - 4.0).abs() < 1e-12);
        assert!((s.local_centroid() - Vec2::new(3.0, 1.0)).length() < 1e-12);
        assert!((s.inertia_coefficient() - 8.0 / 12.0).abs() < 1e-12);
    }

    #[test]
    fn clockwise_winding_gives_same_area() {
        let mut s = Shape::polygon(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 2.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(2.0, 0.0),
        ])
        .unwrap();
        assert!((s.area() - 4.0).abs() < 1e-12);
        assert!((s.local_centroid() - Vec2::new(1.0, 1.0)).length() < 1e-12);
        assert!(s.inertia_coefficient() > 0.0);
    }

    #[test]
    fn degenerate_polygons_use_point_and_midpoint() {
        let mut point = Shape::polygon(vec![Vec2::new(2.0, -1.0)]).unwrap();
        assert_eq!(point.local_centroid(), Vec2::new(2.0, -1.0));
        assert_eq!(point.area(), 0.0);
        let mut seg = Shape::polygon(vec![Vec2::new(0.0, 0.0), Vec2::new(4.0, 2.0)]).unwrap();
        assert_eq!(seg.local_centroid(), Vec2::new(2.0, 1.0));
    }

    #[test]
    fn outward_normals_and_projections() {
        let mut s = Shape::rect(Vec2::ZERO, 2.0, 2.0).unwrap();
        s.validate_world(Vec2::ZERO, Axis::IDENTITY);
        for (n, p) in s.edge_normals().iter().zip(s.edge_projections()) {
            assert!((n.length() - 1.0).abs() < 1e-12);
            assert!((p - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn circle_aabb_tracks_pose() {
        let mut s = Shape::circle(0.5, Vec2::new(1.0, 0.0)).unwrap();
        let axis = Axis::from_angle(core::f64::consts::FRAC_PI_2);
        let bb = s.validate_aabb(Vec2::new(10.0, 0.0), axis);
        assert!((bb.min() - Vec2::new(9.5, 0.5)).length() < 1e-12);
        assert!((bb.max() - Vec2::new(10.5, 1.5)).length() < 1e-12);
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        assert_eq!(Shape::circle(0.0, Vec2::ZERO).unwrap_err(), ShapeError::InvalidRadius(0.0));
        assert_eq!(Shape::polygon(Vec::new()).unwrap_err(), ShapeError::EmptyPolygon);
        assert!(Material::with_density(-2.0).is_err());
    }
}
