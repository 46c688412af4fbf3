//! Runtime configuration consumed by the geometry container.
//!
//! The container does not own a configuration; the owning subsystem passes
//! one to [`update_geometry`](crate::GeometryContainer2D::update_geometry)
//! every frame.

/// Debug-draw configuration values relevant to the geometry pools.
#[derive(Debug, Clone, PartialEq)]
pub struct Config2D {
    /// Master switch. While false the pools decay gracefully: counters and
    /// visible-object tallies reset each frame, but no visibility or
    /// expiration work runs.
    pub debug_enabled: bool,

    /// While true, `update_geometry` returns without touching the pools.
    /// All primitives stay exactly as they were.
    pub freeze_render: bool,

    /// Test primitives against camera frustums. Without it only distance
    /// culling (if configured) applies.
    pub use_frustum_culling: bool,

    /// Maximum distance from any camera at which primitives remain
    /// visible. Values `<= 0` disable distance culling.
    pub cull_by_distance: f32,

    /// Prefer the scene viewport camera even when custom or editor
    /// viewports are supplied.
    pub force_use_camera_from_scene: bool,
}

impl Default for Config2D {
    fn default() -> Self {
        Self {
            debug_enabled: true,
            freeze_render: false,
            use_frustum_culling: false,
            cull_by_distance: -1.0,
            force_use_camera_from_scene: false,
        }
    }
}
