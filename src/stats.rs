//! Render statistics snapshot.

/// Aggregated pool statistics for one frame.
///
/// Returned by value from
/// [`get_render_stats`](crate::GeometryContainer2D::get_render_stats); safe
/// to read and keep outside the container's lock.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenderStats2D {
    /// Instances used last frame, instant and delayed combined.
    pub instances: usize,

    /// Instances that passed the last visibility scan.
    pub visible_instances: usize,

    /// Time spent packing instance buffers, in microseconds.
    pub time_filling_buffers_usec: u64,

    /// Time spent culling instant arenas, in microseconds.
    pub time_culling_instant_usec: u64,

    /// Time spent culling delayed arenas, in microseconds.
    pub time_culling_delayed_usec: u64,
}
