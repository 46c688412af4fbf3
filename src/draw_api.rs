//! Producer-facing draw helpers.
//!
//! Each helper builds the primitive's transform and bounding sphere and
//! submits it through the container. A positive `duration` keeps the
//! primitive alive for that many seconds; `0.0` draws it for exactly one
//! frame.

use crate::container::GeometryContainer2D;
use crate::instance::InstanceKind;
use crate::math::{mat4_from_2d, SphereBounds, Vec2, Vec3};

impl GeometryContainer2D {
    /// Draw a line segment from `a` to `b`.
    pub fn draw_line(&self, a: Vec2, b: Vec2, color: [f32; 4], duration: f64) {
        self.add_segment(InstanceKind::Line, a, b, color, duration);
    }

    /// Draw a dashed line segment from `a` to `b`.
    pub fn draw_dashed_line(&self, a: Vec2, b: Vec2, color: [f32; 4], duration: f64) {
        self.add_segment(InstanceKind::DashedLine, a, b, color, duration);
    }

    /// Draw a rectangle centered at `center`, rotated by `rotation` radians.
    pub fn draw_rect(
        &self,
        center: Vec2,
        size: Vec2,
        rotation: f32,
        color: [f32; 4],
        duration: f64,
    ) {
        let transform = mat4_from_2d(center, rotation, size);
        let bounds = SphereBounds::new(Vec3::new(center.x, center.y, 0.0), size.norm() * 0.5);
        self.add_instance(InstanceKind::Rect, duration, transform, color, bounds);
    }

    /// Draw a circle.
    pub fn draw_circle(&self, center: Vec2, radius: f32, color: [f32; 4], duration: f64) {
        let transform = mat4_from_2d(center, 0.0, Vec2::new(radius, radius));
        let bounds = SphereBounds::new(Vec3::new(center.x, center.y, 0.0), radius);
        self.add_instance(InstanceKind::Circle, duration, transform, color, bounds);
    }

    /// Draw an arc of `radius` starting at `rotation` radians.
    pub fn draw_arc(
        &self,
        center: Vec2,
        radius: f32,
        rotation: f32,
        color: [f32; 4],
        duration: f64,
    ) {
        let transform = mat4_from_2d(center, rotation, Vec2::new(radius, radius));
        let bounds = SphereBounds::new(Vec3::new(center.x, center.y, 0.0), radius);
        self.add_instance(InstanceKind::Arc, duration, transform, color, bounds);
    }

    fn add_segment(&self, kind: InstanceKind, a: Vec2, b: Vec2, color: [f32; 4], duration: f64) {
        let mid = (a + b) * 0.5;
        let dir = b - a;
        let length = dir.norm();
        let angle = dir.y.atan2(dir.x);
        let transform = mat4_from_2d(mid, angle, Vec2::new(length, 1.0));
        let bounds = SphereBounds::new(Vec3::new(mid.x, mid.y, 0.0), length * 0.5);
        self.add_instance(kind, duration, transform, color, bounds);
    }
}
