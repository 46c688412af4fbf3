//! Kind-indexed pool table for 2D debug-draw primitives.
//!
//! [`GeometryPool2D`] owns one [`ObjectsPool`] per [`InstanceKind`] and
//! runs the per-frame passes over all of them: visibility culling,
//! instance-buffer filling, visible-object scanning, expiration, and the
//! counter reset that drives the shrink heuristic.

use std::time::Instant;

use crate::instance::{DistanceCullingData, InstanceData, InstanceKind, RenderInstance2D};
use crate::math::{Mat4, Plane, SphereBounds};
use crate::pool::ObjectsPool;
use crate::stats::RenderStats2D;

/// Per-kind instance buffers written by
/// [`GeometryPool2D::fill_instance_data`]. Cleared, not dropped, between
/// frames so the allocations persist.
#[derive(Debug, Default)]
pub struct InstanceBuffers {
    pub(crate) buffers: [Vec<InstanceData>; InstanceKind::COUNT],
}

impl InstanceBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Packed instances of one kind for the current frame.
    pub fn kind(&self, kind: InstanceKind) -> &[InstanceData] {
        &self.buffers[kind.index()]
    }

    pub fn clear(&mut self) {
        for buffer in &mut self.buffers {
            buffer.clear();
        }
    }

    pub fn total_instances(&self) -> usize {
        self.buffers.iter().map(Vec::len).sum()
    }
}

/// All primitive pools of one debug-draw overlay, plus frame timing
/// accumulators for diagnostics.
#[derive(Debug)]
pub struct GeometryPool2D {
    instances: [ObjectsPool<RenderInstance2D>; InstanceKind::COUNT],

    time_filling_buffers_usec: u64,
    time_culling_instant_usec: u64,
    time_culling_delayed_usec: u64,
}

impl Default for GeometryPool2D {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryPool2D {
    pub fn new() -> Self {
        Self {
            instances: std::array::from_fn(|_| ObjectsPool::new()),
            time_filling_buffers_usec: 0,
            time_culling_instant_usec: 0,
            time_culling_delayed_usec: 0,
        }
    }

    /// Claim a slot in the right arena and write the primitive into it.
    /// Positive expiration times select the delayed arena.
    pub fn add_or_update_instance(
        &mut self,
        kind: InstanceKind,
        expiration_time: f64,
        transform: Mat4,
        color: [f32; 4],
        bounds: SphereBounds,
    ) {
        let inst = self.instances[kind.index()].get(expiration_time > 0.0);
        inst.update(expiration_time, kind, transform, color, bounds);
    }

    /// The pool backing one primitive kind.
    pub fn pool_for(&self, kind: InstanceKind) -> &ObjectsPool<RenderInstance2D> {
        &self.instances[kind.index()]
    }

    /// Per-frame counter reset and shrink pass over every arena.
    pub fn reset_counter(&mut self, delta: f64) {
        for (i, pool) in self.instances.iter_mut().enumerate() {
            pool.reset_counter(delta, i);
        }
    }

    pub fn reset_visible_objects(&mut self) {
        for pool in self.instances.iter_mut() {
            pool.reset_visible_counter();
        }
    }

    /// Evaluate visibility for every used instant slot (expiration check
    /// skipped; instant slots are always fresh within a frame) and every
    /// delayed slot. Records elapsed time per allocation class.
    pub fn update_visibility(
        &mut self,
        frustums: &[Vec<Plane>],
        distance_data: &DistanceCullingData,
    ) {
        let mut instant_usec = 0u64;
        let mut delayed_usec = 0u64;

        for pool in self.instances.iter_mut() {
            let used = pool.used_instant;

            let started = Instant::now();
            for inst in &mut pool.instant[..used] {
                inst.renderer.update_visibility(frustums, distance_data, true);
            }
            instant_usec += started.elapsed().as_micros() as u64;

            let started = Instant::now();
            for inst in &mut pool.delayed {
                inst.renderer.update_visibility(frustums, distance_data, false);
            }
            delayed_usec += started.elapsed().as_micros() as u64;
        }

        self.time_culling_instant_usec = instant_usec;
        self.time_culling_delayed_usec = delayed_usec;
    }

    /// Advance the countdown of every delayed slot. Instant slots have no
    /// individual lifetime.
    pub fn update_expiration(&mut self, delta: f64) {
        for pool in self.instances.iter_mut() {
            for inst in &mut pool.delayed {
                inst.renderer.update_expiration(delta);
            }
        }
    }

    /// Recount visible objects per arena from the last visibility pass.
    pub fn scan_visible_instances(&mut self) {
        self.reset_visible_objects();

        for pool in self.instances.iter_mut() {
            let used = pool.used_instant;
            for inst in &pool.instant[..used] {
                if inst.is_visible() {
                    pool.visible_objects += 1;
                }
            }
            for inst in &pool.delayed {
                if inst.is_visible() && !inst.is_expired() {
                    pool.visible_objects += 1;
                }
            }
        }
    }

    /// Pack every visible primitive into per-kind instance buffers.
    ///
    /// This is also where a primitive's second chance is consumed and
    /// where the delayed-used statistics counter is recomputed: every
    /// enumerated slot is marked used-once, visible or not.
    pub fn fill_instance_data(&mut self, out: &mut InstanceBuffers) {
        let started = Instant::now();

        for (i, pool) in self.instances.iter_mut().enumerate() {
            let buffer = &mut out.buffers[i];
            buffer.clear();

            let used = pool.used_instant;
            for inst in &mut pool.instant[..used] {
                inst.renderer.mark_used_once();
                if inst.is_visible() {
                    buffer.push(inst.instance_data());
                }
            }
            pool.prev_used_instant = pool.used_instant;

            pool.used_delayed = 0;
            for inst in &mut pool.delayed {
                if !inst.is_expired() {
                    pool.used_delayed += 1;
                    inst.renderer.mark_used_once();
                    if inst.is_visible() {
                        buffer.push(inst.instance_data());
                    }
                }
            }
        }

        self.time_filling_buffers_usec = started.elapsed().as_micros() as u64;
    }

    /// Visit every currently-used instant slot and every non-expired
    /// delayed slot, across all kinds. The callback must not retain the
    /// reference past its invocation.
    pub fn for_each_instance(&self, mut func: impl FnMut(&RenderInstance2D)) {
        for pool in &self.instances {
            for inst in &pool.instant[..pool.used_instant] {
                func(inst);
            }
            for inst in pool.delayed.iter().filter(|o| !o.is_expired()) {
                func(inst);
            }
        }
    }

    /// Immutable statistics snapshot across all arenas.
    pub fn get_stats(&self) -> RenderStats2D {
        let mut instances = 0;
        let mut visible_instances = 0;
        for pool in &self.instances {
            instances += pool.prev_used_instant + pool.used_delayed;
            visible_instances += pool.visible_objects;
        }

        RenderStats2D {
            instances,
            visible_instances,
            time_filling_buffers_usec: self.time_filling_buffers_usec,
            time_culling_instant_usec: self.time_culling_instant_usec,
            time_culling_delayed_usec: self.time_culling_delayed_usec,
        }
    }

    /// Drop every pooled element and zero all counters and timers.
    pub fn clear_pool(&mut self) {
        for pool in self.instances.iter_mut() {
            pool.clear_pools();
        }
        self.time_filling_buffers_usec = 0;
        self.time_culling_instant_usec = 0;
        self.time_culling_delayed_usec = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;

    fn add_instances(pool: &mut GeometryPool2D, kind: InstanceKind, count: usize, exp: f64) {
        for _ in 0..count {
            pool.add_or_update_instance(
                kind,
                exp,
                Mat4::identity(),
                [1.0; 4],
                SphereBounds::default(),
            );
        }
    }

    #[test]
    fn test_frame_stats() {
        let mut pool = GeometryPool2D::new();
        let mut buffers = InstanceBuffers::new();

        add_instances(&mut pool, InstanceKind::Line, 3, 0.0);
        add_instances(&mut pool, InstanceKind::Rect, 2, 10.0);

        pool.update_visibility(&[], &DistanceCullingData::default());
        pool.fill_instance_data(&mut buffers);
        pool.scan_visible_instances();

        assert_eq!(buffers.kind(InstanceKind::Line).len(), 3);
        assert_eq!(buffers.kind(InstanceKind::Rect).len(), 2);
        assert_eq!(buffers.total_instances(), 5);

        let stats = pool.get_stats();
        assert_eq!(stats.instances, 5);
        assert_eq!(stats.visible_instances, 5);
    }

    #[test]
    fn test_clear_pool_zeroes_stats() {
        let mut pool = GeometryPool2D::new();
        let mut buffers = InstanceBuffers::new();

        add_instances(&mut pool, InstanceKind::Circle, 10, 0.0);
        add_instances(&mut pool, InstanceKind::Circle, 10, 60.0);
        pool.update_visibility(&[], &DistanceCullingData::default());
        pool.fill_instance_data(&mut buffers);
        pool.scan_visible_instances();
        assert_ne!(pool.get_stats().instances, 0);

        pool.clear_pool();
        let stats = pool.get_stats();
        assert_eq!(stats.instances, 0);
        assert_eq!(stats.visible_instances, 0);
        assert_eq!(stats.time_filling_buffers_usec, 0);
    }

    #[test]
    fn test_second_chance_drawn_once_then_recycled() {
        let mut pool = GeometryPool2D::new();
        let mut buffers = InstanceBuffers::new();

        // Zero duration still goes through one full frame...
        add_instances(&mut pool, InstanceKind::Line, 1, 0.0);
        assert_eq!(pool.pool_for(InstanceKind::Line).used_instant(), 1);

        pool.update_visibility(&[], &DistanceCullingData::default());
        pool.fill_instance_data(&mut buffers);
        assert_eq!(buffers.kind(InstanceKind::Line).len(), 1);
        pool.scan_visible_instances();
        pool.update_expiration(0.016);
        pool.reset_counter(0.016);

        // ...and is gone (not packed, not counted) the next frame.
        pool.update_visibility(&[], &DistanceCullingData::default());
        pool.fill_instance_data(&mut buffers);
        assert_eq!(buffers.kind(InstanceKind::Line).len(), 0);
        pool.scan_visible_instances();
        assert_eq!(pool.get_stats().visible_instances, 0);
    }

    #[test]
    fn test_delayed_second_chance_via_pool() {
        let mut pool = GeometryPool2D::new();
        let mut buffers = InstanceBuffers::new();

        add_instances(&mut pool, InstanceKind::Arc, 1, 5.0);

        // Three seconds pass, the primitive survives.
        for _ in 0..3 {
            pool.update_visibility(&[], &DistanceCullingData::default());
            pool.fill_instance_data(&mut buffers);
            pool.scan_visible_instances();
            pool.update_expiration(1.0);
            pool.reset_counter(1.0);
        }
        assert_eq!(pool.pool_for(InstanceKind::Arc).used_delayed(), 1);

        // Countdown runs out and the primitive expires.
        for _ in 0..3 {
            pool.update_visibility(&[], &DistanceCullingData::default());
            pool.fill_instance_data(&mut buffers);
            pool.scan_visible_instances();
            pool.update_expiration(1.0);
            pool.reset_counter(1.0);
        }
        assert_eq!(pool.pool_for(InstanceKind::Arc).used_delayed(), 0);

        add_instances(&mut pool, InstanceKind::Arc, 1, 5.0);
        assert_eq!(pool.pool_for(InstanceKind::Arc).delayed_len(), 1);
    }

    #[test]
    fn test_fill_packs_only_visible_but_marks_all() {
        let mut pool = GeometryPool2D::new();
        let mut buffers = InstanceBuffers::new();

        add_instances(&mut pool, InstanceKind::Line, 2, 0.0);

        // A distant camera culls everything.
        let culling = DistanceCullingData::new(1.0, vec![Vec3::new(1000.0, 0.0, 0.0)]);
        pool.update_visibility(&[], &culling);
        pool.fill_instance_data(&mut buffers);

        assert_eq!(buffers.kind(InstanceKind::Line).len(), 0);
        // Still counted as used for the statistics.
        assert_eq!(pool.get_stats().instances, 2);
    }

    #[test]
    fn test_for_each_instance_skips_expired_delayed() {
        let mut pool = GeometryPool2D::new();
        let mut buffers = InstanceBuffers::new();

        add_instances(&mut pool, InstanceKind::Rect, 1, 10.0);
        add_instances(&mut pool, InstanceKind::Rect, 1, 0.5);

        let mut seen = 0;
        pool.for_each_instance(|_| seen += 1);
        assert_eq!(seen, 2);

        // Two one-second frames expire the short-lived primitive.
        for _ in 0..2 {
            pool.update_visibility(&[], &DistanceCullingData::default());
            pool.fill_instance_data(&mut buffers);
            pool.scan_visible_instances();
            pool.update_expiration(1.0);
            pool.reset_counter(1.0);
        }

        let mut seen = 0;
        pool.for_each_instance(|_| seen += 1);
        assert_eq!(seen, 1);
    }
}
