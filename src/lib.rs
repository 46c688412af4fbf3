//! Pooled 2D debug-draw primitives with expiration, culling and adaptive
//! shrinking.
//!
//! Debug overlays emit large numbers of short-lived primitives every
//! frame. This crate keeps them in reusable per-kind arenas instead of
//! allocating per primitive:
//!
//! - **Instant** primitives live for exactly one frame; their arena is a
//!   linear cursor rewound at frame end.
//! - **Delayed** primitives carry a countdown lifetime; expired slots are
//!   recycled before the arena grows, and a just-expired primitive is
//!   still drawn one extra frame (the "second chance") so zero-duration
//!   requests are never dropped.
//! - A sustained-underuse heuristic shrinks both arenas, bounding memory
//!   after bursts without reallocation thrashing.
//!
//! # Architecture
//!
//! - [`ObjectsPool`] — two-arena slab of one item type
//! - [`GeometryPool2D`] — one pool per [`InstanceKind`], plus the
//!   per-frame culling/expiration/packing passes
//! - [`GeometryContainer2D`] — the lock and the frame orchestration;
//!   thread-safe producer and renderer entry points
//!
//! # Usage
//!
//! ```
//! use debug_draw_2d::{CameraSources, Config2D, GeometryContainer2D, Vec2};
//!
//! let container = GeometryContainer2D::new();
//! let config = Config2D::default();
//!
//! // From any thread, during the frame:
//! container.draw_line(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), [1.0, 0.0, 0.0, 1.0], 0.0);
//! container.draw_circle(Vec2::new(5.0, 5.0), 2.0, [0.0, 1.0, 0.0, 1.0], 1.5);
//!
//! // Once per render frame, after all producers:
//! container.update_geometry(1.0 / 60.0, &config, &CameraSources::default());
//!
//! // At render time, read the packed per-kind buffers:
//! container.with_render_data(|buffers| {
//!     assert_eq!(buffers.total_instances(), 2);
//! });
//! let stats = container.get_render_stats();
//! assert_eq!(stats.instances, 2);
//! ```

mod config;
mod container;
mod draw_api;
mod geometry_pool;
mod instance;
mod math;
mod pool;
mod stats;

pub use config::Config2D;
pub use container::{CameraSources, CameraView, GeometryContainer2D};
pub use geometry_pool::{GeometryPool2D, InstanceBuffers};
pub use instance::{
    DelayedRenderer, DistanceCullingData, InstanceData, InstanceKind, RenderInstance2D,
};
pub use math::{mat4_from_2d, Bounds, Mat4, Plane, SphereBounds, Vec2, Vec3};
pub use pool::{ObjectsPool, PoolItem};
pub use stats::RenderStats2D;
