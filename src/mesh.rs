//! OBJ mesh parsing into flat GPU-ready buffers.
//!
//! The parser is line-based and face-driven: `v` and `vn` lines accumulate
//! into lookup tables, and each `f` line emits one position/normal triple per
//! triangle corner. Faces with more than three vertices are fan-triangulated.
//! Indices are 1-based; negative indices count back from the most recently
//! seen vertex. A face corner without a normal reference emits a zero vector
//! so the output buffers always stay the same length.

use thiserror::Error;

/// Failure modes for OBJ parsing.
#[derive(Debug, Error)]
pub enum ObjError {
    #[error("line {line}: expected {expected} numeric components, found {found}")]
    MissingComponents {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: invalid number '{token}'")]
    BadNumber { line: usize, token: String },
    #[error("line {line}: invalid index '{token}'")]
    BadIndex { line: usize, token: String },
    #[error("line {line}: index {index} out of range (have {count})")]
    IndexOutOfRange {
        line: usize,
        index: i64,
        count: usize,
    },
    #[error("no face geometry found")]
    NoGeometry,
}

/// Flat mesh buffers produced by a successful parse.
///
/// Positions and normals are unindexed: three corners per triangle, three
/// floats per corner. The two buffers are always the same length.
#[derive(Debug, Clone, Default)]
pub struct MeshBuffers {
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
}

impl MeshBuffers {
    /// Number of position triples (equals the number of triangle corners).
    pub fn triple_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.triple_count() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Axis-aligned bounds of the position buffer.
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::from_positions(&self.positions)
    }
}

/// Axis-aligned bounding box over a flat position buffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundingBox {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl BoundingBox {
    /// Compute bounds from a flat buffer of position triples.
    pub fn from_positions(positions: &[f32]) -> Self {
        if positions.len() < 3 {
            return Self::default();
        }

        let mut min = [f32::MAX; 3];
        let mut max = [f32::MIN; 3];

        for triple in positions.chunks_exact(3) {
            for i in 0..3 {
                min[i] = min[i].min(triple[i]);
                max[i] = max[i].max(triple[i]);
            }
        }

        Self { min, max }
    }

    /// Get the center of the bounding box.
    pub fn center(&self) -> [f32; 3] {
        [
            (self.min[0] + self.max[0]) / 2.0,
            (self.min[1] + self.max[1]) / 2.0,
            (self.min[2] + self.max[2]) / 2.0,
        ]
    }

    /// Get the dimensions of the bounding box.
    pub fn size(&self) -> [f32; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }
}

/// One corner reference from an `f` line: vertex index plus optional normal.
#[derive(Clone, Copy)]
struct CornerRef {
    vertex: usize,
    normal: Option<usize>,
}

/// Parse OBJ source text into flat position/normal buffers.
///
/// Lines that are blank, comments (`#`), or unrecognized keywords (`vt`,
/// `o`, `g`, `s`, `usemtl`, `mtllib`, ...) are skipped.
pub fn parse_obj(source: &str) -> Result<MeshBuffers, ObjError> {
    let mut vertices: Vec<[f32; 3]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut out = MeshBuffers::default();

    for (line_no, raw_line) in source.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("v") => {
                vertices.push(parse_triple(line_no + 1, tokens)?);
            }
            Some("vn") => {
                normals.push(parse_triple(line_no + 1, tokens)?);
            }
            Some("f") => {
                let corners = parse_face(line_no + 1, tokens, vertices.len(), normals.len())?;
                emit_fan(&corners, &vertices, &normals, &mut out);
            }
            _ => {} // unknown keyword: skip
        }
    }

    if out.is_empty() {
        return Err(ObjError::NoGeometry);
    }

    Ok(out)
}

fn parse_triple<'a>(
    line: usize,
    tokens: impl Iterator<Item = &'a str>,
) -> Result<[f32; 3], ObjError> {
    let mut triple = [0.0f32; 3];
    let mut found = 0;

    for (i, token) in tokens.take(3).enumerate() {
        triple[i] = token.parse::<f32>().map_err(|_| ObjError::BadNumber {
            line,
            token: token.to_string(),
        })?;
        found = i + 1;
    }

    if found < 3 {
        return Err(ObjError::MissingComponents {
            line,
            expected: 3,
            found,
        });
    }

    Ok(triple)
}

fn parse_face<'a>(
    line: usize,
    tokens: impl Iterator<Item = &'a str>,
    vertex_count: usize,
    normal_count: usize,
) -> Result<Vec<CornerRef>, ObjError> {
    let mut corners = Vec::new();

    for token in tokens {
        // v, v/vt, v//vn, or v/vt/vn
        let mut fields = token.split('/');

        let vertex_field = fields.next().unwrap_or("");
        let vertex = resolve_index(line, vertex_field, vertex_count)?;

        let _texcoord_field = fields.next();
        let normal = match fields.next() {
            Some(f) if !f.is_empty() => Some(resolve_index(line, f, normal_count)?),
            _ => None,
        };

        corners.push(CornerRef { vertex, normal });
    }

    if corners.len() < 3 {
        return Err(ObjError::MissingComponents {
            line,
            expected: 3,
            found: corners.len(),
        });
    }

    Ok(corners)
}

/// Resolve a 1-based OBJ index against the current table length.
/// Negative values index from the end (`-1` is the last element seen).
fn resolve_index(line: usize, token: &str, count: usize) -> Result<usize, ObjError> {
    let index: i64 = token.parse().map_err(|_| ObjError::BadIndex {
        line,
        token: token.to_string(),
    })?;

    let resolved = if index > 0 {
        (index - 1) as usize
    } else if index < 0 {
        let back = count as i64 + index;
        if back < 0 {
            return Err(ObjError::IndexOutOfRange { line, index, count });
        }
        back as usize
    } else {
        return Err(ObjError::BadIndex {
            line,
            token: token.to_string(),
        });
    };

    if resolved >= count {
        return Err(ObjError::IndexOutOfRange { line, index, count });
    }

    Ok(resolved)
}

/// Fan-triangulate a face and append one triple per triangle corner.
fn emit_fan(
    corners: &[CornerRef],
    vertices: &[[f32; 3]],
    normals: &[[f32; 3]],
    out: &mut MeshBuffers,
) {
    for i in 1..corners.len() - 1 {
        for corner in [corners[0], corners[i], corners[i + 1]] {
            out.positions.extend_from_slice(&vertices[corner.vertex]);
            match corner.normal {
                Some(n) => out.normals.extend_from_slice(&normals[n]),
                None => out.normals.extend_from_slice(&[0.0, 0.0, 0.0]),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRI: &str = "\
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
";

    #[test]
    fn test_triangle_counts_match() {
        let mesh = parse_obj(TRI).unwrap();
        assert_eq!(mesh.positions.len(), 9);
        assert_eq!(mesh.normals.len(), 9);
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn test_triangle_only_mesh_counts() {
        // 2 triangular faces: 3 triples per face in both buffers.
        let src = "\
v 0 0 0
v 1 0 0
v 0 1 0
v 1 1 0
f 1 2 3
f 2 4 3
";
        let mesh = parse_obj(src).unwrap();
        assert_eq!(mesh.triple_count(), 6);
        assert_eq!(mesh.normals.len() / 3, 6);
    }

    #[test]
    fn test_missing_normals_emit_zero_vectors() {
        let mesh = parse_obj(TRI).unwrap();
        assert!(mesh.normals.iter().all(|&n| n == 0.0));
    }

    #[test]
    fn test_provided_normals_are_used() {
        let src = "\
v 0 0 0
v 1 0 0
v 0 1 0
vn 0 0 1
f 1//1 2//1 3//1
";
        let mesh = parse_obj(src).unwrap();
        assert_eq!(&mesh.normals[0..3], &[0.0, 0.0, 1.0]);
        assert_eq!(mesh.normals.len(), mesh.positions.len());
    }

    #[test]
    fn test_negative_indices_resolve_from_end() {
        let src = "\
v 0 0 0
v 1 0 0
v 0 1 0
f -3 -2 -1
";
        let mesh = parse_obj(src).unwrap();
        // -1 is the last vertex seen (0, 1, 0), emitted as the third corner.
        assert_eq!(&mesh.positions[6..9], &[0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_quad_fan_triangulates() {
        let src = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
";
        let mesh = parse_obj(src).unwrap();
        // k=4 vertices -> (k-2)=2 triangles -> 6 corners.
        assert_eq!(mesh.triple_count(), 6);
        // Second triangle is (v1, v3, v4).
        assert_eq!(&mesh.positions[9..12], &[0.0, 0.0, 0.0]);
        assert_eq!(&mesh.positions[12..15], &[1.0, 1.0, 0.0]);
        assert_eq!(&mesh.positions[15..18], &[0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_polygon_fan_triangle_count() {
        // A hexagonal face fan-triangulates into k-2 = 4 triangles.
        let src = "\
v 0 0 0
v 1 0 0
v 2 1 0
v 1 2 0
v 0 2 0
v -1 1 0
f 1 2 3 4 5 6
";
        let mesh = parse_obj(src).unwrap();
        assert_eq!(mesh.triangle_count(), 4);
    }

    #[test]
    fn test_comments_and_unknown_keywords_skipped() {
        let src = "\
# exported mesh
o brain
s off
usemtl none

v 0 0 0
v 1 0 0
v 0 1 0
vt 0.5 0.5
f 1/1 2/1 3/1
";
        let mesh = parse_obj(src).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn test_bad_number_is_typed_error() {
        let src = "v 0 zero 0\n";
        assert!(matches!(
            parse_obj(src),
            Err(ObjError::BadNumber { line: 1, .. })
        ));
    }

    #[test]
    fn test_out_of_range_index_is_typed_error() {
        let src = "\
v 0 0 0
f 1 2 3
";
        assert!(matches!(
            parse_obj(src),
            Err(ObjError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_zero_index_rejected() {
        let src = "\
v 0 0 0
v 1 0 0
v 0 1 0
f 0 1 2
";
        assert!(matches!(parse_obj(src), Err(ObjError::BadIndex { .. })));
    }

    #[test]
    fn test_empty_input_reports_no_geometry() {
        assert!(matches!(parse_obj(""), Err(ObjError::NoGeometry)));
        assert!(matches!(
            parse_obj("v 0 0 0\nv 1 0 0\n"),
            Err(ObjError::NoGeometry)
        ));
    }

    #[test]
    fn test_bounding_box_from_positions() {
        let positions = [-1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 2.0, 0.0];
        let bounds = BoundingBox::from_positions(&positions);
        assert_eq!(bounds.min, [-1.0, 0.0, 0.0]);
        assert_eq!(bounds.max, [1.0, 2.0, 0.0]);
        assert_eq!(bounds.center(), [0.0, 1.0, 0.0]);
        assert_eq!(bounds.size(), [2.0, 2.0, 0.0]);
    }
}
