//! Triangle-ribbon tessellation for variable-width strokes.
//!
//! Each segment between two stroke points becomes a quad: the endpoints are
//! offset perpendicular to the segment direction by their half-widths.
//! Consecutive segments reuse the previous segment's trailing edge as their
//! leading edge, so the ribbon is seam-free without explicit joint geometry.
//! Sharp direction changes can facet; at touch sampling rates this is not
//! visible and round/bevel joints are deliberately not computed.

use bytemuck::{Pod, Zeroable};

use crate::geom::{self, Point};
use crate::sampler::StrokePoint;

/// GPU vertex for stroke geometry. Position only; the stroke color is a
/// uniform (solid fill, no texturing).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct RibbonVertex {
    pub pos: [f32; 2],
}

/// Vertices and indices produced for one segment or dot. Indices are local
/// to `vertices`; the canvas rebases them when appending to its buffers.
///
/// `u32` indices: strokes are unbounded in point count and a long signature
/// overflows `u16` after ~16k segments.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SegmentMesh {
    pub vertices: Vec<RibbonVertex>,
    pub indices: Vec<u32>,
}

/// Number of ring vertices in a single-point dot fan.
const DOT_SEGMENTS: u32 = 16;

/// Incremental ribbon tessellator for one stroke at a time.
#[derive(Clone, Debug, Default)]
pub struct RibbonMeshBuilder {
    // Trailing edge (left, right) of the last emitted segment; reused as the
    // next segment's leading edge so boundaries are shared exactly.
    last_edge: Option<(Point, Point)>,
    last_dir: Option<Point>,
}

impl RibbonMeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the cached edge/direction; call between strokes.
    pub fn reset(&mut self) {
        self.last_edge = None;
        self.last_dir = None;
    }

    /// Mesh the quad covering the segment `a → b`.
    ///
    /// Returns `None` for a zero-length segment with no prior direction to
    /// fall back on; never emits NaN vertices.
    pub fn segment_mesh(&mut self, a: StrokePoint, b: StrokePoint) -> Option<SegmentMesh> {
        let dir = match geom::normalized(geom::sub(b.position, a.position)) {
            Some(d) => d,
            // Degenerate segment: keep the previous direction if we have one.
            None => self.last_dir?,
        };
        let n = geom::perp(dir);

        let (l0, r0) = match self.last_edge {
            Some(edge) => edge,
            None => (offset(a.position, n, a.half_width), offset(a.position, n, -a.half_width)),
        };
        let l1 = offset(b.position, n, b.half_width);
        let r1 = offset(b.position, n, -b.half_width);

        self.last_dir = Some(dir);
        self.last_edge = Some((l1, r1));

        Some(SegmentMesh {
            vertices: vec![
                RibbonVertex { pos: l0 },
                RibbonVertex { pos: r0 },
                RibbonVertex { pos: l1 },
                RibbonVertex { pos: r1 },
            ],
            // Strip winding over the quad: (l0, r0, l1), (l1, r0, r1).
            indices: vec![0, 1, 2, 2, 1, 3],
        })
    }

    /// Mesh a dot for a single-point stroke: a regular polygon fan of radius
    /// `half_width` centered at the point.
    pub fn dot_mesh(&mut self, p: StrokePoint) -> SegmentMesh {
        let mut vertices = Vec::with_capacity(DOT_SEGMENTS as usize + 1);
        let mut indices = Vec::with_capacity(DOT_SEGMENTS as usize * 3);
        vertices.push(RibbonVertex { pos: p.position });
        for i in 0..DOT_SEGMENTS {
            let theta = (i as f32) / (DOT_SEGMENTS as f32) * std::f32::consts::TAU;
            vertices.push(RibbonVertex {
                pos: [
                    p.position[0] + p.half_width * theta.cos(),
                    p.position[1] + p.half_width * theta.sin(),
                ],
            });
        }
        for i in 0..DOT_SEGMENTS {
            indices.extend_from_slice(&[0, 1 + i, 1 + (i + 1) % DOT_SEGMENTS]);
        }
        SegmentMesh { vertices, indices }
    }
}

#[inline]
fn offset(p: Point, n: Point, d: f32) -> Point {
    [p[0] + n[0] * d, p[1] + n[1] * d]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sp(x: f32, y: f32, half_width: f32) -> StrokePoint {
        StrokePoint {
            position: [x, y],
            half_width,
        }
    }

    fn assert_pos(v: RibbonVertex, expected: [f32; 2]) {
        assert!(
            (v.pos[0] - expected[0]).abs() < 1e-5 && (v.pos[1] - expected[1]).abs() < 1e-5,
            "vertex {:?} != {:?}",
            v.pos,
            expected
        );
    }

    #[test]
    fn straight_segment_matches_analytic_offsets() {
        let mut builder = RibbonMeshBuilder::new();
        let mesh = builder.segment_mesh(sp(0.0, 0.0, 2.0), sp(10.0, 0.0, 1.0)).unwrap();

        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices.len(), 6);
        // Direction (1,0), perpendicular (0,1).
        assert_pos(mesh.vertices[0], [0.0, 2.0]);
        assert_pos(mesh.vertices[1], [0.0, -2.0]);
        assert_pos(mesh.vertices[2], [10.0, 1.0]);
        assert_pos(mesh.vertices[3], [10.0, -1.0]);
        assert_eq!(mesh.indices, vec![0, 1, 2, 2, 1, 3]);
    }

    #[test]
    fn consecutive_segments_share_boundary_vertices() {
        let mut builder = RibbonMeshBuilder::new();
        let first = builder.segment_mesh(sp(0.0, 0.0, 2.0), sp(10.0, 0.0, 1.5)).unwrap();
        // Turn upward; the leading edge must be the cached trailing edge of
        // the first segment, not recomputed with the new perpendicular.
        let second = builder.segment_mesh(sp(10.0, 0.0, 1.5), sp(10.0, 10.0, 1.0)).unwrap();
        assert_eq!(second.vertices[0], first.vertices[2]);
        assert_eq!(second.vertices[1], first.vertices[3]);
    }

    #[test]
    fn degenerate_first_segment_is_skipped() {
        let mut builder = RibbonMeshBuilder::new();
        assert_eq!(builder.segment_mesh(sp(5.0, 5.0, 2.0), sp(5.0, 5.0, 2.0)), None);
    }

    #[test]
    fn degenerate_mid_segment_reuses_previous_direction() {
        let mut builder = RibbonMeshBuilder::new();
        builder.segment_mesh(sp(0.0, 0.0, 2.0), sp(10.0, 0.0, 2.0)).unwrap();
        let mesh = builder.segment_mesh(sp(10.0, 0.0, 2.0), sp(10.0, 0.0, 1.0)).unwrap();
        for v in &mesh.vertices {
            assert!(v.pos[0].is_finite() && v.pos[1].is_finite());
        }
        // Offsets along the previous perpendicular (0,1).
        assert_pos(mesh.vertices[2], [10.0, 1.0]);
        assert_pos(mesh.vertices[3], [10.0, -1.0]);
    }

    #[test]
    fn reset_forgets_cached_edge() {
        let mut builder = RibbonMeshBuilder::new();
        builder.segment_mesh(sp(0.0, 0.0, 2.0), sp(10.0, 0.0, 2.0)).unwrap();
        builder.reset();
        assert_eq!(builder.segment_mesh(sp(0.0, 0.0, 1.0), sp(0.0, 0.0, 1.0)), None);
        let mesh = builder.segment_mesh(sp(0.0, 10.0, 1.0), sp(0.0, 20.0, 1.0)).unwrap();
        // Leading edge computed fresh, not from the pre-reset stroke.
        assert_pos(mesh.vertices[0], [-1.0, 10.0]);
        assert_pos(mesh.vertices[1], [1.0, 10.0]);
    }

    #[test]
    fn dot_mesh_is_a_fan_of_the_requested_radius() {
        let mut builder = RibbonMeshBuilder::new();
        let mesh = builder.dot_mesh(sp(3.0, 4.0, 2.5));
        assert_eq!(mesh.vertices.len(), 17);
        assert_eq!(mesh.indices.len(), 48);
        for v in &mesh.vertices[1..] {
            let dx = v.pos[0] - 3.0;
            let dy = v.pos[1] - 4.0;
            assert!(((dx * dx + dy * dy).sqrt() - 2.5).abs() < 1e-5);
        }
    }
}
