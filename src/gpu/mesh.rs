//! GPU vertex types and static line geometry.
//!
//! The cloud and the connector lines share one position-only vertex layout;
//! color and opacity come from uniforms, not vertex attributes, so the point
//! buffer can be the parsed position buffer uploaded as-is.

use bytemuck::{Pod, Zeroable};

use crate::pathway::{Pathway, ANCHORS, CURVE_SEGMENTS, PATHWAYS};

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
}

impl Vertex {
    pub const fn new(position: [f32; 3]) -> Self {
        Self { position }
    }

    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            }],
        }
    }
}

/// Half-length of a marker cross arm.
const MARKER_ARM: f32 = 0.06;

/// A contiguous vertex range within the shared line buffer.
#[derive(Debug, Clone, Copy)]
pub struct LineRange {
    pub start: u32,
    pub count: u32,
}

/// All line geometry for the ambient layer, packed into one buffer.
///
/// Pathway curves come first (one range per pathway), then one small cross
/// per anchor marker. Everything is line-list topology: two vertices per
/// segment.
pub struct LineGeometry {
    pub vertices: Vec<Vertex>,
    pub pathway_ranges: Vec<LineRange>,
    pub marker_ranges: Vec<LineRange>,
}

impl LineGeometry {
    pub fn build() -> Self {
        let mut vertices = Vec::new();
        let mut pathway_ranges = Vec::with_capacity(PATHWAYS.len());
        let mut marker_ranges = Vec::with_capacity(ANCHORS.len());

        for pathway in PATHWAYS {
            pathway_ranges.push(append_polyline(&mut vertices, pathway));
        }

        for anchor in ANCHORS {
            marker_ranges.push(append_marker_cross(&mut vertices, anchor.position));
        }

        Self {
            vertices,
            pathway_ranges,
            marker_ranges,
        }
    }
}

/// Expand a pathway polyline into line-list segments.
fn append_polyline(vertices: &mut Vec<Vertex>, pathway: &Pathway) -> LineRange {
    let start = vertices.len() as u32;
    let points = pathway.polyline(CURVE_SEGMENTS);

    for pair in points.windows(2) {
        vertices.push(Vertex::new(pair[0]));
        vertices.push(Vertex::new(pair[1]));
    }

    LineRange {
        start,
        count: vertices.len() as u32 - start,
    }
}

/// Three axis-aligned segments crossing at the anchor position.
fn append_marker_cross(vertices: &mut Vec<Vertex>, center: [f32; 3]) -> LineRange {
    let start = vertices.len() as u32;
    let [x, y, z] = center;

    vertices.push(Vertex::new([x - MARKER_ARM, y, z]));
    vertices.push(Vertex::new([x + MARKER_ARM, y, z]));
    vertices.push(Vertex::new([x, y - MARKER_ARM, z]));
    vertices.push(Vertex::new([x, y + MARKER_ARM, z]));
    vertices.push(Vertex::new([x, y, z - MARKER_ARM]));
    vertices.push(Vertex::new([x, y, z + MARKER_ARM]));

    LineRange { start, count: 6 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_geometry_has_range_per_pathway_and_anchor() {
        let geometry = LineGeometry::build();
        assert_eq!(geometry.pathway_ranges.len(), PATHWAYS.len());
        assert_eq!(geometry.marker_ranges.len(), ANCHORS.len());
    }

    #[test]
    fn test_ranges_tile_the_buffer() {
        let geometry = LineGeometry::build();

        let mut cursor = 0u32;
        for range in geometry
            .pathway_ranges
            .iter()
            .chain(geometry.marker_ranges.iter())
        {
            assert_eq!(range.start, cursor);
            assert!(range.count > 0);
            assert_eq!(range.count % 2, 0, "line list needs vertex pairs");
            cursor += range.count;
        }
        assert_eq!(cursor as usize, geometry.vertices.len());
    }

    #[test]
    fn test_pathway_segments_match_curve_resolution() {
        let geometry = LineGeometry::build();
        // CURVE_SEGMENTS segments -> 2 vertices each in line-list form.
        assert_eq!(
            geometry.pathway_ranges[0].count as usize,
            CURVE_SEGMENTS * 2
        );
    }
}
