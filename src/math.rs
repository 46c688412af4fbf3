//! Math type aliases and culling helpers.
//!
//! Provides f32 types used by the pools and the visibility tests. Frustum
//! planes follow the outward-facing convention: a point strictly beyond any
//! plane of a convex shape is outside the shape.

pub use nalgebra;

/// 2D vector (f32).
pub type Vec2 = nalgebra::Vector2<f32>;

/// 3D vector (f32).
pub type Vec3 = nalgebra::Vector3<f32>;

/// 4x4 matrix (f32).
pub type Mat4 = nalgebra::Matrix4<f32>;

/// A plane in the form `normal · p = d`, with `normal` facing outward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub d: f32,
}

impl Plane {
    pub fn new(normal: Vec3, d: f32) -> Self {
        Self { normal, d }
    }

    /// Signed distance from the plane to `point`. Positive values are on
    /// the outside (the side the normal points to).
    pub fn distance_to(&self, point: Vec3) -> f32 {
        self.normal.dot(&point) - self.d
    }
}

/// Spherical bounding volume of a pooled primitive.
///
/// May not work for non-local space transformations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereBounds {
    pub position: Vec3,
    pub radius: f32,
}

impl SphereBounds {
    pub fn new(position: Vec3, radius: f32) -> Self {
        Self { position, radius }
    }
}

impl Default for SphereBounds {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            radius: 1.0,
        }
    }
}

/// Bounding volume of a pooled primitive, tested against camera frustums.
pub trait Bounds {
    /// Center point used by distance culling.
    fn center(&self) -> Vec3;

    /// True when the volume is at least partially inside the convex shape
    /// described by `planes`. An empty plane set contains everything.
    fn partially_inside_convex_shape(&self, planes: &[Plane]) -> bool;
}

impl Bounds for SphereBounds {
    fn center(&self) -> Vec3 {
        self.position
    }

    fn partially_inside_convex_shape(&self, planes: &[Plane]) -> bool {
        for p in planes {
            if p.distance_to(self.position) >= self.radius {
                return false;
            }
        }
        true
    }
}

/// Build a 4x4 transform from a 2D translation, rotation, and scale.
///
/// The result is a Z-axis rotation with non-uniform XY scale, suitable for
/// packing into per-instance buffers.
pub fn mat4_from_2d(translation: Vec2, rotation: f32, scale: Vec2) -> Mat4 {
    let (s, c) = rotation.sin_cos();
    #[rustfmt::skip]
    let result = Mat4::new(
        c * scale.x, -s * scale.y, 0.0, translation.x,
        s * scale.x,  c * scale.y, 0.0, translation.y,
        0.0,          0.0,         1.0, 0.0,
        0.0,          0.0,         0.0, 1.0,
    );
    result
}
