//! Point-cloud geometry: decimation, the procedural placeholder shape, and
//! the placeholder-vs-loaded tagged union the renderer draws from.
//!
//! The scene never renders triangles; meshes are reduced to their corner
//! positions and subsampled to bound the particle count. The placeholder is
//! decimated more aggressively than a loaded mesh since it only has to fill
//! the canvas until the real asset arrives.

use crate::mesh::{BoundingBox, MeshBuffers};

/// Keep every Nth position triple for a loaded mesh.
pub const LOADED_DECIMATION_STEP: usize = 2;

/// Keep every Nth position triple for the procedural placeholder.
pub const PLACEHOLDER_DECIMATION_STEP: usize = 5;

/// A decimated set of render points with precomputed bounds.
#[derive(Debug, Clone)]
pub struct PointCloud {
    pub positions: Vec<f32>,
    pub bounds: BoundingBox,
}

impl PointCloud {
    /// Build a point cloud from flat positions, keeping every `step`-th triple.
    pub fn from_positions(positions: &[f32], step: usize) -> Self {
        let positions = decimate(positions, step);
        let bounds = BoundingBox::from_positions(&positions);
        Self { positions, bounds }
    }

    /// Build a point cloud from parsed mesh buffers.
    pub fn from_mesh(mesh: &MeshBuffers, step: usize) -> Self {
        Self::from_positions(&mesh.positions, step)
    }

    /// Number of render points.
    pub fn point_count(&self) -> usize {
        self.positions.len() / 3
    }
}

/// Subsample a flat triple buffer, keeping every `step`-th triple.
///
/// Index 0 is always kept; a buffer of `m` triples yields `ceil(m / step)`.
pub fn decimate(positions: &[f32], step: usize) -> Vec<f32> {
    let step = step.max(1);
    let mut out = Vec::with_capacity(positions.len() / step + 3);

    for (i, triple) in positions.chunks_exact(3).enumerate() {
        if i % step == 0 {
            out.extend_from_slice(triple);
        }
    }

    out
}

/// The geometry currently on screen.
///
/// The swap from placeholder to loaded geometry happens in one assignment so
/// the render loop never observes a half-installed mesh.
#[derive(Debug, Clone)]
pub enum SceneGeometry {
    Placeholder(PointCloud),
    Loaded(PointCloud),
}

impl SceneGeometry {
    /// The procedural shape shown until the real mesh arrives.
    pub fn placeholder() -> Self {
        let sphere = sphere_positions(16, 24, 1.2);
        Self::Placeholder(PointCloud::from_positions(
            &sphere,
            PLACEHOLDER_DECIMATION_STEP,
        ))
    }

    pub fn cloud(&self) -> &PointCloud {
        match self {
            Self::Placeholder(cloud) | Self::Loaded(cloud) => cloud,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

/// Generate positions on a low-poly UV sphere centered at the origin.
fn sphere_positions(lat_segments: usize, lon_segments: usize, radius: f32) -> Vec<f32> {
    let mut positions = Vec::with_capacity((lat_segments + 1) * (lon_segments + 1) * 3);

    for lat in 0..=lat_segments {
        let theta = std::f32::consts::PI * (lat as f32) / (lat_segments as f32);
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();

        for lon in 0..=lon_segments {
            let phi = 2.0 * std::f32::consts::PI * (lon as f32) / (lon_segments as f32);

            positions.push(phi.cos() * sin_theta * radius);
            positions.push(cos_theta * radius);
            positions.push(phi.sin() * sin_theta * radius);
        }
    }

    positions
}
