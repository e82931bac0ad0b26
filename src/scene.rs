//! Scene lifecycle for the scan-reveal hero visualization.
//!
//! Three one-directional states per scene instance: placeholder geometry is
//! drawn from the first frame, scanning starts when the fetched mesh is
//! installed, and completion turns on the ambient layer (camera auto-rotation,
//! pathway cycle, marker pulses). A failed fetch or parse never transitions
//! the scene — the placeholder stays up and the page remains intact.
//!
//! `advance_frame` is the render loop's whole per-frame body; `stop()` exists
//! so tests (and nothing else) can halt the loop.

use serde::Serialize;

use crate::camera::OrbitCamera;
use crate::loader::MeshResult;
use crate::mesh::MeshBuffers;
use crate::pathway::{marker_pulse, ANCHORS, CYCLE_SECS, PATHWAYS};
use crate::point_cloud::{PointCloud, SceneGeometry, LOADED_DECIMATION_STEP};
use crate::scan::{ScanState, GLOW_BAND, SWEEP_MARGIN};

/// Hero scene state. Mutated only by the render loop.
pub struct BrainScene {
    geometry: SceneGeometry,
    scan: Option<ScanState>,
    camera: OrbitCamera,
    time: f32,
    cycle_clock: f32,
    running: bool,
    geometry_dirty: bool,
}

impl BrainScene {
    pub fn new() -> Self {
        let geometry = SceneGeometry::placeholder();
        let mut camera = OrbitCamera::new();
        camera.frame_bounds(&geometry.cloud().bounds);

        Self {
            geometry,
            scan: None,
            camera,
            time: 0.0,
            cycle_clock: 0.0,
            running: true,
            geometry_dirty: true,
        }
    }

    pub fn geometry(&self) -> &SceneGeometry {
        &self.geometry
    }

    pub fn cloud(&self) -> &PointCloud {
        self.geometry.cloud()
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    /// True once, after geometry changed, so the renderer re-uploads buffers.
    pub fn take_geometry_dirty(&mut self) -> bool {
        std::mem::take(&mut self.geometry_dirty)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Halt the loop. Production never calls this; tests do.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Whether the sweep has finished and the ambient layer is active.
    pub fn is_complete(&self) -> bool {
        self.scan.map(|s| s.is_complete()).unwrap_or(false)
    }

    pub fn is_scanning(&self) -> bool {
        self.scan.map(|s| !s.is_complete()).unwrap_or(false)
    }

    /// Install the fetched mesh: decimate, swap geometry, begin the sweep.
    pub fn install_mesh(&mut self, mesh: MeshBuffers) {
        let cloud = PointCloud::from_mesh(&mesh, LOADED_DECIMATION_STEP);
        log::info!(
            "mesh installed: {} corners decimated to {} points",
            mesh.triple_count(),
            cloud.point_count()
        );

        self.camera.frame_bounds(&cloud.bounds);
        self.scan = Some(ScanState::for_bounds(&cloud.bounds));
        self.geometry = SceneGeometry::Loaded(cloud);
        self.geometry_dirty = true;
    }

    /// Feed the loader's one-shot result into the scene.
    ///
    /// Errors are soft: logged for debugging and otherwise ignored, leaving
    /// the placeholder on screen indefinitely.
    pub fn apply_load_result(&mut self, result: MeshResult) {
        match result {
            Ok(mesh) => self.install_mesh(mesh),
            Err(e) => log::debug!("mesh load failed, keeping placeholder: {}", e),
        }
    }

    /// Advance one frame. The loop's only mutation point.
    pub fn advance_frame(&mut self, dt: f32) {
        if !self.running {
            return;
        }

        self.time += dt;

        if let Some(scan) = self.scan.as_mut() {
            if !scan.is_complete() {
                if scan.advance() {
                    log::info!("scan reveal complete");
                    self.camera.start_auto_rotate();
                }
            } else {
                self.cycle_clock = (self.cycle_clock + dt) % CYCLE_SECS;
            }
        }

        self.camera.update(dt);
    }

    /// The shader's sweep threshold for this frame.
    ///
    /// With no active scan (placeholder, or before the mesh arrives) the
    /// coordinate sits far above the bounds so every point is visible and
    /// the glow band stays off screen.
    pub fn scan_coordinate(&self) -> f32 {
        match self.scan {
            Some(scan) => scan.current,
            None => self.geometry.cloud().bounds.max[1] + SWEEP_MARGIN * 4.0,
        }
    }

    pub fn glow_band(&self) -> f32 {
        if self.is_scanning() {
            GLOW_BAND
        } else {
            0.0
        }
    }

    /// Per-pathway line opacities for this frame; all zero until complete.
    pub fn pathway_opacities(&self) -> Vec<f32> {
        if !self.is_complete() {
            return vec![0.0; PATHWAYS.len()];
        }
        PATHWAYS
            .iter()
            .map(|p| p.opacity_at(self.cycle_clock))
            .collect()
    }

    /// Per-anchor marker pulse values; all zero until complete.
    pub fn marker_pulses(&self) -> Vec<f32> {
        if !self.is_complete() {
            return vec![0.0; ANCHORS.len()];
        }
        (0..ANCHORS.len())
            .map(|i| marker_pulse(self.time, i))
            .collect()
    }

    pub fn debug_state(&self) -> SceneDebug {
        SceneDebug {
            phase: if self.is_complete() {
                "complete"
            } else if self.is_scanning() {
                "scanning"
            } else {
                "placeholder"
            },
            point_count: self.cloud().point_count(),
            loaded: self.geometry.is_loaded(),
            time: self.time,
            scan_coordinate: self.scan_coordinate(),
        }
    }
}

impl Default for BrainScene {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot serialized to JSON for the page's debug console.
#[derive(Debug, Serialize)]
pub struct SceneDebug {
    pub phase: &'static str,
    pub point_count: usize,
    pub loaded: bool,
    pub time: f32,
    pub scan_coordinate: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::LoadError;
    use crate::mesh::parse_obj;

    fn small_mesh() -> MeshBuffers {
        parse_obj(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 0 0 1\nf 1 2 3\nf 1 3 4\nf 2 3 4\n",
        )
        .unwrap()
    }

    #[test]
    fn test_new_scene_shows_placeholder() {
        let scene = BrainScene::new();
        assert!(!scene.geometry().is_loaded());
        assert!(!scene.is_scanning());
        assert!(!scene.is_complete());
        assert!(scene.cloud().point_count() > 0);
    }

    #[test]
    fn test_placeholder_scan_coordinate_is_above_bounds() {
        let scene = BrainScene::new();
        assert!(scene.scan_coordinate() > scene.cloud().bounds.max[1]);
        assert_eq!(scene.glow_band(), 0.0);
    }

    #[test]
    fn test_install_mesh_starts_scanning() {
        let mut scene = BrainScene::new();
        scene.install_mesh(small_mesh());

        assert!(scene.geometry().is_loaded());
        assert!(scene.is_scanning());
        assert!(scene.scan_coordinate() < scene.cloud().bounds.min[1]);
        assert!(scene.take_geometry_dirty());
        assert!(!scene.take_geometry_dirty());
    }

    #[test]
    fn test_scan_runs_to_completion_and_starts_ambient_layer() {
        let mut scene = BrainScene::new();
        scene.install_mesh(small_mesh());

        assert!(!scene.camera().is_auto_rotating());
        assert!(scene.pathway_opacities().iter().all(|&o| o == 0.0));

        for _ in 0..100_000 {
            scene.advance_frame(1.0 / 60.0);
            if scene.is_complete() {
                break;
            }
        }

        assert!(scene.is_complete());
        assert!(scene.camera().is_auto_rotating());

        // Run into the cycle until at least one pathway lights up.
        let mut saw_visible_pathway = false;
        for _ in 0..600 {
            scene.advance_frame(1.0 / 60.0);
            if scene.pathway_opacities().iter().any(|&o| o > 0.0) {
                saw_visible_pathway = true;
                break;
            }
        }
        assert!(saw_visible_pathway);
        assert!(scene.marker_pulses().iter().any(|&p| p > 0.0));
    }

    #[test]
    fn test_load_failure_keeps_placeholder_forever() {
        let mut scene = BrainScene::new();
        scene.apply_load_result(Err(LoadError::HttpStatus(404)));

        for _ in 0..1000 {
            scene.advance_frame(1.0 / 60.0);
        }

        assert!(!scene.geometry().is_loaded());
        assert!(!scene.is_scanning());
        assert!(!scene.is_complete());
        assert!(!scene.camera().is_auto_rotating());
    }

    #[test]
    fn test_stop_halts_the_loop() {
        let mut scene = BrainScene::new();
        scene.install_mesh(small_mesh());
        scene.stop();

        let before = scene.scan_coordinate();
        for _ in 0..100 {
            scene.advance_frame(1.0 / 60.0);
        }

        assert!(!scene.is_running());
        assert_eq!(scene.scan_coordinate(), before);
        assert_eq!(scene.time(), 0.0);
    }

    #[test]
    fn test_debug_state_tracks_phase() {
        let mut scene = BrainScene::new();
        assert_eq!(scene.debug_state().phase, "placeholder");

        scene.install_mesh(small_mesh());
        assert_eq!(scene.debug_state().phase, "scanning");

        while !scene.is_complete() {
            scene.advance_frame(1.0 / 60.0);
        }
        assert_eq!(scene.debug_state().phase, "complete");
        assert!(scene.debug_state().loaded);
    }
}
