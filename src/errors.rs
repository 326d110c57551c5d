//! Mesh errors

/// All the possible failures reported by the mesh tools.
///
/// Only precondition violations are reported, checked up front by
/// [`crate::mesh::MeshData::validate`]. Non-manifold topology is the caller's
/// responsibility.
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    /// (AttributeLengthMismatch) An attribute array does not have one entry per vertex
    #[error(
        "(AttributeLengthMismatch) {attribute} has {actual} entries but the mesh has {expected} vertices"
    )]
    AttributeLengthMismatch {
        attribute: String,
        expected: usize,
        actual: usize,
    },
    /// (GroupLengthMismatch) The per-vertex group assignment does not cover every vertex
    #[error(
        "(GroupLengthMismatch) group assignment has {actual} entries but the mesh has {expected} vertices"
    )]
    GroupLengthMismatch { expected: usize, actual: usize },
    /// (IndexOutOfRange) An index buffer entry references a missing vertex
    #[error("(IndexOutOfRange) index {index} is out of range (vertex count = {vertex_count})")]
    IndexOutOfRange { index: usize, vertex_count: usize },
    /// Malformed input handed to an importer
    #[error("Input is malformed: {0}")]
    MalformedInput(String),
    /// Error bubbled up from reading or writing a mesh file
    #[error("std::io::Error: {0}")]
    Io(#[from] std::io::Error),
}
