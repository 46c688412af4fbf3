//! Frame orchestration for one debug-draw overlay.
//!
//! [`GeometryContainer2D`] owns a [`GeometryPool2D`] and the instance
//! buffers behind a single mutex. Producers may submit primitives from any
//! thread; the owning subsystem calls
//! [`update_geometry`](GeometryContainer2D::update_geometry) once per
//! render frame. Every public method locks once and does all of its work
//! inside the critical section, so nested locking never occurs.
//!
//! Producer calls for frame N are expected to finish before that frame's
//! `update_geometry`; the lock serializes access but does not enforce that
//! ordering.

use parking_lot::Mutex;

use crate::config::Config2D;
use crate::geometry_pool::{GeometryPool2D, InstanceBuffers};
use crate::instance::{DistanceCullingData, InstanceKind, RenderInstance2D};
use crate::math::{Mat4, Plane, SphereBounds, Vec3};
use crate::stats::RenderStats2D;

/// One camera usable for culling: its world position and, optionally, its
/// frustum planes. Only full 6-plane frustums are usable for culling.
#[derive(Debug, Clone)]
pub struct CameraView {
    pub position: Vec3,
    pub frustum: Vec<Plane>,
}

/// Camera sources collected by the owning subsystem for one frame.
///
/// Selection order mirrors the engine: the scene viewport camera when
/// forced by config or when it is the only source, else the custom
/// viewport camera, else all editor viewport cameras.
#[derive(Debug, Clone, Default)]
pub struct CameraSources {
    pub scene: Option<CameraView>,
    pub custom: Option<CameraView>,
    pub editor: Vec<CameraView>,
}

impl CameraSources {
    fn active(&self, config: &Config2D) -> Vec<&CameraView> {
        if (config.force_use_camera_from_scene
            || (self.editor.is_empty() && self.custom.is_none()))
            && self.scene.is_some()
        {
            self.scene.iter().collect()
        } else if let Some(custom) = &self.custom {
            vec![custom]
        } else {
            self.editor.iter().collect()
        }
    }
}

struct ContainerState {
    pool: GeometryPool2D,
    buffers: InstanceBuffers,
}

/// Owns the 2D geometry pool and drives its per-frame update cycle.
pub struct GeometryContainer2D {
    state: Mutex<ContainerState>,
}

impl Default for GeometryContainer2D {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryContainer2D {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ContainerState {
                pool: GeometryPool2D::new(),
                buffers: InstanceBuffers::new(),
            }),
        }
    }

    /// Submit one primitive. Positive durations go to the delayed arena of
    /// the kind's pool, everything else to the instant arena.
    pub fn add_instance(
        &self,
        kind: InstanceKind,
        duration: f64,
        transform: Mat4,
        color: [f32; 4],
        bounds: SphereBounds,
    ) {
        let mut state = self.state.lock();
        state
            .pool
            .add_or_update_instance(kind, duration, transform, color, bounds);
    }

    /// Run one frame of pool maintenance. Call exactly once per render
    /// frame, after all producer calls for the frame.
    ///
    /// The pass order is load-bearing: visibility is evaluated and scanned
    /// against the still-alive set *before* expiration advances it, and
    /// the shrink heuristic inside the counter reset sees this frame's
    /// usage before the cursors rewind.
    pub fn update_geometry(&self, delta: f64, config: &Config2D, cameras: &CameraSources) {
        let mut state = self.state.lock();

        // Don't touch anything while frozen.
        if config.freeze_render {
            return;
        }

        // While disabled the pools decay gracefully: counters and visible
        // tallies reset, but nothing is culled and nothing expires.
        if !config.debug_enabled {
            state.buffers.clear();
            state.pool.reset_counter(delta);
            state.pool.reset_visible_objects();
            return;
        }

        let selected = cameras.active(config);

        let mut frustums: Vec<Vec<Plane>> = Vec::new();
        let mut camera_positions = Vec::with_capacity(selected.len());
        for camera in &selected {
            camera_positions.push(camera.position);
            if config.use_frustum_culling && camera.frustum.len() == 6 {
                frustums.push(camera.frustum.clone());
            }
        }

        let distance_data =
            DistanceCullingData::new(config.cull_by_distance, camera_positions);

        let ContainerState { pool, buffers } = &mut *state;
        pool.update_visibility(&frustums, &distance_data);
        pool.fill_instance_data(buffers);
        pool.scan_visible_instances();
        pool.update_expiration(delta);
        pool.reset_counter(delta);
    }

    /// Statistics snapshot of the last frame; the returned value is safe
    /// to keep outside the lock.
    pub fn get_render_stats(&self) -> RenderStats2D {
        self.state.lock().pool.get_stats()
    }

    /// Visit every currently-used instant slot and every non-expired
    /// delayed slot. The callback runs under the container's lock and must
    /// not call back into the container.
    pub fn for_each_instance(&self, func: impl FnMut(&RenderInstance2D)) {
        self.state.lock().pool.for_each_instance(func);
    }

    /// Read the packed instance buffers of the last frame under the lock.
    pub fn with_render_data<R>(&self, func: impl FnOnce(&InstanceBuffers) -> R) -> R {
        func(&self.state.lock().buffers)
    }

    /// Drop all pooled objects. Invoked on scene change or an explicit
    /// user clear command.
    pub fn clear_objects(&self) {
        self.state.lock().pool.clear_pool();
    }
}
