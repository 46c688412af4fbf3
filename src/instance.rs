//! Pooled primitive instances and their lifecycle state machine.
//!
//! A [`DelayedRenderer`] goes through three states:
//!
//! - **Fresh** — default-constructed inside an arena; already expired, so
//!   a recycle scan may claim it immediately.
//! - **Active** — a producer wrote into it via [`activate`](DelayedRenderer::activate);
//!   it stays alive while its countdown is positive, plus one extra frame
//!   after reaching zero (the second chance).
//! - **Expired** — countdown at or below zero and the second chance
//!   consumed; the slot is recyclable.

use crate::math::{Bounds, Mat4, Plane, SphereBounds, Vec3};
use crate::pool::PoolItem;

/// Visual kind of a pooled 2D primitive. Used as an index into the
/// per-kind pool table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum InstanceKind {
    Line,
    DashedLine,
    /// Used to draw Polyline, PolylineColors.
    PolylineColors,
    Arc,
    /// Used to draw Multiline, MultilineColors.
    MultilineColors,
    Rect,
    Circle,
    Texture,
    TextureRect,
    TextureRectRegion,
    StyleBox,
    Primitive,
    /// Used to draw Polygon, ColoredPolygon.
    ColoredPolygon,
    /// Used to draw String, MultilineString, StringOutline, MultilineStringOutline.
    MultilineStringOutline,
    Mesh,
    MultiMesh,
}

impl InstanceKind {
    /// Number of kinds; sizes the per-kind pool table.
    pub const COUNT: usize = 16;

    /// Every kind, in table order.
    pub const ALL: [InstanceKind; Self::COUNT] = [
        InstanceKind::Line,
        InstanceKind::DashedLine,
        InstanceKind::PolylineColors,
        InstanceKind::Arc,
        InstanceKind::MultilineColors,
        InstanceKind::Rect,
        InstanceKind::Circle,
        InstanceKind::Texture,
        InstanceKind::TextureRect,
        InstanceKind::TextureRectRegion,
        InstanceKind::StyleBox,
        InstanceKind::Primitive,
        InstanceKind::ColoredPolygon,
        InstanceKind::MultilineStringOutline,
        InstanceKind::Mesh,
        InstanceKind::MultiMesh,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Distance-culling input for one visibility pass: reject primitives
/// farther than `max_distance` from any camera position.
#[derive(Debug, Clone, Default)]
pub struct DistanceCullingData {
    /// Values `<= 0` disable the distance test.
    pub max_distance: f32,
    pub camera_positions: Vec<Vec3>,
}

impl DistanceCullingData {
    pub fn new(max_distance: f32, camera_positions: Vec<Vec3>) -> Self {
        Self {
            max_distance,
            camera_positions,
        }
    }
}

/// Lifecycle state shared by every pooled primitive.
#[derive(Debug, Clone)]
pub struct DelayedRenderer<B: Bounds> {
    /// Remaining lifetime in seconds.
    pub expiration_time: f64,
    /// Second-chance flag: set once the primitive has been packed into a
    /// frame's buffers after its countdown ran out.
    pub is_used_once: bool,
    /// Result of the last visibility pass.
    pub is_visible: bool,
    pub bounds: B,
    pub color: [f32; 4],
}

impl<B: Bounds + Default> Default for DelayedRenderer<B> {
    fn default() -> Self {
        Self {
            expiration_time: 0.0,
            is_used_once: true,
            is_visible: false,
            bounds: B::default(),
            color: [0.0; 4],
        }
    }
}

impl<B: Bounds> DelayedRenderer<B> {
    /// Reset the lifecycle state when a producer claims this slot.
    ///
    /// Grants the second chance: even with `expiration_time = 0` the
    /// primitive survives until it has been drawn once.
    pub fn activate(&mut self, expiration_time: f64) {
        self.expiration_time = expiration_time;
        self.is_used_once = false;
        self.is_visible = true;
    }

    /// True once the countdown has run out and the second chance has been
    /// consumed. Fresh (default-constructed) state is expired.
    pub fn is_expired(&self) -> bool {
        if self.expiration_time > 0.0 {
            return false;
        }
        self.is_used_once
    }

    /// Consume the second chance. Called when the primitive is packed into
    /// a frame's instance buffers.
    #[inline]
    pub fn mark_used_once(&mut self) {
        self.is_used_once = true;
    }

    /// Evaluate visibility against distance culling and camera frustums.
    ///
    /// The distance test runs first and rejects the primitive as soon as
    /// any camera is farther away than `max_distance`. Otherwise the
    /// primitive is visible when its bounds intersect at least one
    /// frustum; with no frustums supplied it is visible unconditionally.
    ///
    /// Expired primitives are forced invisible unless
    /// `skip_expiration_check` is set (the instant arenas are always fresh
    /// within a frame and skip the check).
    pub fn update_visibility(
        &mut self,
        frustums: &[Vec<Plane>],
        distance_data: &DistanceCullingData,
        skip_expiration_check: bool,
    ) -> bool {
        if skip_expiration_check || !self.is_expired() {
            self.is_visible = false;

            if distance_data.max_distance > 0.0 && !distance_data.camera_positions.is_empty() {
                for pos in &distance_data.camera_positions {
                    if (pos - self.bounds.center()).norm() > distance_data.max_distance {
                        return self.is_visible;
                    }
                }
            }

            if !frustums.is_empty() {
                for frustum in frustums {
                    if self.bounds.partially_inside_convex_shape(frustum) {
                        self.is_visible = true;
                        return self.is_visible;
                    }
                }
                return false;
            }

            self.is_visible = true;
            return self.is_visible;
        }

        self.is_visible = false;
        false
    }

    /// Advance the countdown. Expired primitives are frozen, not driven
    /// further negative.
    pub fn update_expiration(&mut self, delta: f64) {
        if !self.is_expired() {
            self.expiration_time -= delta;
        }
    }
}

/// Per-instance data packed for a renderer: the first three rows of the
/// 4x4 transform (translation in the fourth column) followed by the RGBA
/// color — 16 floats per instance.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceData {
    pub transform: [[f32; 4]; 3],
    pub color: [f32; 4],
}

/// One drawable 2D primitive held in a pool arena.
#[derive(Debug, Clone)]
pub struct RenderInstance2D {
    pub renderer: DelayedRenderer<SphereBounds>,
    pub transform: Mat4,
    pub kind: InstanceKind,
}

impl Default for RenderInstance2D {
    fn default() -> Self {
        Self {
            renderer: DelayedRenderer::default(),
            transform: Mat4::identity(),
            kind: InstanceKind::Line,
        }
    }
}

impl RenderInstance2D {
    /// Write a producer's primitive into this slot.
    pub fn update(
        &mut self,
        expiration_time: f64,
        kind: InstanceKind,
        transform: Mat4,
        color: [f32; 4],
        bounds: SphereBounds,
    ) {
        self.renderer.activate(expiration_time);
        self.kind = kind;
        self.transform = transform;
        self.renderer.color = color;
        self.renderer.bounds = bounds;
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        self.renderer.is_expired()
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.renderer.is_visible
    }

    /// Pack this instance for the renderer.
    pub fn instance_data(&self) -> InstanceData {
        let m = &self.transform;
        InstanceData {
            transform: [
                [m[(0, 0)], m[(0, 1)], m[(0, 2)], m[(0, 3)]],
                [m[(1, 0)], m[(1, 1)], m[(1, 2)], m[(1, 3)]],
                [m[(2, 0)], m[(2, 1)], m[(2, 2)], m[(2, 3)]],
            ],
            color: self.renderer.color,
        }
    }
}

impl PoolItem for RenderInstance2D {
    fn is_expired(&self) -> bool {
        self.renderer.is_expired()
    }
}
