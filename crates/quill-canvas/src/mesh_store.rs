//! CPU-side accumulation of committed stroke geometry.
//!
//! The store is the source of truth for everything drawn since the last
//! erase. Appends are amortized O(1) (Vec doubling) and an upload cursor
//! tracks which tail of the data still needs to reach the GPU, so a frame
//! uploads only what the current gesture added.

use stroke_core::{RibbonVertex, SegmentMesh};

#[derive(Clone, Debug, Default)]
pub struct MeshStore {
    vertices: Vec<RibbonVertex>,
    indices: Vec<u32>,
    uploaded_vertices: usize,
    uploaded_indices: usize,
}

impl MeshStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a segment/dot mesh, rebasing its local indices onto the
    /// store's vertex range.
    pub fn append(&mut self, mesh: &SegmentMesh) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&mesh.vertices);
        self.indices.extend(mesh.indices.iter().map(|i| base + i));
    }

    /// Drop all committed geometry and reset upload bookkeeping.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.uploaded_vertices = 0;
        self.uploaded_indices = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[RibbonVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Vertices appended since the last `mark_uploaded`, with the offset (in
    /// vertices) they start at.
    pub fn dirty_vertices(&self) -> (usize, &[RibbonVertex]) {
        (self.uploaded_vertices, &self.vertices[self.uploaded_vertices..])
    }

    pub fn dirty_indices(&self) -> (usize, &[u32]) {
        (self.uploaded_indices, &self.indices[self.uploaded_indices..])
    }

    pub fn mark_uploaded(&mut self) {
        self.uploaded_vertices = self.vertices.len();
        self.uploaded_indices = self.indices.len();
    }

    /// Force the next upload to resend everything; called after the GPU
    /// buffers were reallocated.
    pub fn invalidate_upload(&mut self) {
        self.uploaded_vertices = 0;
        self.uploaded_indices = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stroke_core::RibbonVertex;

    fn quad(x: f32) -> SegmentMesh {
        SegmentMesh {
            vertices: (0..4)
                .map(|i| RibbonVertex {
                    pos: [x, i as f32],
                })
                .collect(),
            indices: vec![0, 1, 2, 2, 1, 3],
        }
    }

    #[test]
    fn append_rebases_indices() {
        let mut store = MeshStore::new();
        store.append(&quad(0.0));
        store.append(&quad(1.0));
        assert_eq!(store.vertex_count(), 8);
        assert_eq!(store.indices()[6..], [4, 5, 6, 6, 5, 7]);
    }

    #[test]
    fn dirty_ranges_track_uploads() {
        let mut store = MeshStore::new();
        store.append(&quad(0.0));
        store.mark_uploaded();
        store.append(&quad(1.0));

        let (voff, verts) = store.dirty_vertices();
        assert_eq!((voff, verts.len()), (4, 4));
        let (ioff, idx) = store.dirty_indices();
        assert_eq!((ioff, idx.len()), (6, 6));

        store.mark_uploaded();
        assert!(store.dirty_vertices().1.is_empty());

        store.invalidate_upload();
        assert_eq!(store.dirty_vertices().1.len(), 8);
    }

    #[test]
    fn clear_empties_everything() {
        let mut store = MeshStore::new();
        store.append(&quad(0.0));
        store.mark_uploaded();
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.index_count(), 0);
        assert!(store.dirty_vertices().1.is_empty());
    }
}
