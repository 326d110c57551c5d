//! `MeshData`: vertex attributes plus an optional index buffer.

use crate::errors::MeshError;
use std::borrow::Cow;

pub mod attributes;

pub use attributes::{Color, TexCoord, VertexAttributes};

/// How the index buffer (or the implicit sequential order) forms primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexMode {
    /// Every three indices form one triangle.
    #[default]
    Triangles,
    TriangleStrip,
    TriangleFan,
    Lines,
    Points,
}

/// A mesh as consumed and produced by the deduplicator and the normal generators.
///
/// When `indices` is `None` the mesh is unindexed: vertex `i` is referenced once,
/// in order, so a triangle list is plain triangle soup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub attributes: VertexAttributes,
    pub indices: Option<Vec<usize>>,
    pub index_mode: IndexMode,
}

impl MeshData {
    pub fn new(attributes: VertexAttributes) -> Self {
        MeshData {
            attributes,
            indices: None,
            index_mode: IndexMode::Triangles,
        }
    }

    pub fn with_indices(mut self, indices: Vec<usize>) -> Self {
        self.indices = Some(indices);
        self
    }

    pub const fn with_index_mode(mut self, index_mode: IndexMode) -> Self {
        self.index_mode = index_mode;
        self
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.attributes.vertex_count()
    }

    /// Number of index entries, counting the implicit sequence of an unindexed mesh.
    pub fn index_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len(),
            None => self.vertex_count(),
        }
    }

    /// `true` when the mesh carries an explicit, non-empty index buffer.
    pub fn is_indexed(&self) -> bool {
        self.indices.as_ref().is_some_and(|i| !i.is_empty())
    }

    /// The index buffer, or the sequence `0..vertex_count` for an unindexed mesh.
    pub fn indices_or_sequential(&self) -> Cow<'_, [usize]> {
        match &self.indices {
            Some(indices) if !indices.is_empty() => Cow::Borrowed(indices.as_slice()),
            _ => Cow::Owned((0..self.vertex_count()).collect()),
        }
    }

    /// Iterate the triangles of a triangle-list mesh. Trailing indices that do not
    /// complete a triangle are ignored. Yields nothing for other index modes.
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        let indices = self.indices_or_sequential();
        let count = if self.index_mode == IndexMode::Triangles {
            indices.len() / 3
        } else {
            0
        };
        (0..count).map(move |t| [indices[t * 3], indices[t * 3 + 1], indices[t * 3 + 2]])
    }

    /// Structural check run by every algorithm before it touches the buffers:
    /// attribute lengths first, then index range.
    pub fn validate(&self) -> Result<(), MeshError> {
        self.attributes.validate_lengths()?;
        let vertex_count = self.vertex_count();
        if let Some(indices) = &self.indices {
            if let Some(&index) = indices.iter().find(|&&i| i >= vertex_count) {
                return Err(MeshError::IndexOutOfRange {
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }
}
