//! Old-index → new-index translation produced by vertex deduplication.

use crate::errors::MeshError;

/// **VertMap: where each original vertex ended up**
///
/// Entry `i` is the post-deduplication index of original vertex `i`. Every
/// value lies in `0..new_count()` and every new index is hit at least once.
/// Successive passes are folded in with [`VertMap::apply_remapping`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertMap {
    lookup: Vec<usize>,
    new_count: usize,
}

impl VertMap {
    /// Identity map over `vertex_count` vertices.
    pub fn new(vertex_count: usize) -> Self {
        VertMap {
            lookup: (0..vertex_count).collect(),
            new_count: vertex_count,
        }
    }

    /// Compose one more pass onto this map: an index currently mapping to `v`
    /// will map to `remap[v]`. `new_count` is the vertex count after that pass.
    pub fn apply_remapping(&mut self, remap: &[usize], new_count: usize) {
        debug_assert_eq!(remap.len(), self.new_count);
        for entry in &mut self.lookup {
            *entry = remap[*entry];
        }
        self.new_count = new_count;
    }

    /// New index of original vertex `old`, or `None` if `old` was never a vertex.
    pub fn new_index(&self, old: usize) -> Option<usize> {
        self.lookup.get(old).copied()
    }

    /// Lowest original index that now lives at `new`.
    pub fn first_old_index(&self, new: usize) -> Option<usize> {
        self.lookup.iter().position(|&n| n == new)
    }

    /// Every original index that collapsed into `new`, in ascending order.
    pub fn old_indices(&self, new: usize) -> impl Iterator<Item = usize> + '_ {
        self.lookup
            .iter()
            .enumerate()
            .filter(move |&(_, &n)| n == new)
            .map(|(old, _)| old)
    }

    /// Translate an index buffer that refers to the original topology.
    ///
    /// ## Errors
    /// [`MeshError::IndexOutOfRange`] for the first index past [`Self::old_count`].
    pub fn remap_indices(&self, indices: &[usize]) -> Result<Vec<usize>, MeshError> {
        indices
            .iter()
            .map(|&i| {
                self.new_index(i).ok_or(MeshError::IndexOutOfRange {
                    index: i,
                    vertex_count: self.old_count(),
                })
            })
            .collect()
    }

    pub fn old_count(&self) -> usize {
        self.lookup.len()
    }

    pub const fn new_count(&self) -> usize {
        self.new_count
    }

    pub fn is_identity(&self) -> bool {
        self.lookup.iter().enumerate().all(|(i, &n)| i == n)
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.lookup
    }
}
