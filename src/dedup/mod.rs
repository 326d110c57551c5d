//! **Vertex deduplication**
//!
//! Collapses vertices that share a position and agree on every attribute
//! gated by their group's [`MatchConditions`], producing compacted attribute
//! arrays, a rewritten index buffer and the [`VertMap`] from old to new indices.

use crate::errors::MeshError;
use crate::float_types::{Real, tolerance};
use crate::math::normalize_or_zero;
use crate::mesh::{MeshData, VertexAttributes};
use hashbrown::HashMap;
use log::{debug, info};
use nalgebra::Vector3;
use std::time::Instant;

pub mod conditions;
pub mod group;
pub mod key;
pub mod vert_map;

pub use conditions::{MatchCondition, MatchConditions};
pub use group::{GroupId, VertGroupData};
pub use key::VertexKey;
pub use vert_map::VertMap;

use key::{PositionKey, position_key};

/// Output of [`minimize_verts`].
#[derive(Debug, Clone, PartialEq)]
pub struct Deduplicated {
    /// Compacted attributes with an index buffer that is always present: the
    /// input indices remapped, or a synthesized sequence for unindexed input.
    pub mesh: MeshData,
    /// Original vertex index → index in `mesh`.
    pub vert_map: VertMap,
    /// Number of passes run until no further reduction happened.
    pub passes: usize,
}

/// Result of one scan over a snapshot.
struct Pass {
    /// Snapshot index of each surviving vertex, in first-seen order.
    kept: Vec<usize>,
    /// Snapshot index → surviving index.
    remap: Vec<usize>,
}

/// One scan: bucket vertices by position, then compare full keys within a bucket.
/// Average O(N); a bucket of K co-located vertices costs O(K²).
fn find_duplicates(
    attributes: &VertexAttributes,
    groups: &[GroupId],
    group_data: &VertGroupData,
) -> Pass {
    let vertex_count = attributes.vertex_count();
    let mut buckets: HashMap<PositionKey, Vec<VertexKey<'_>>> =
        HashMap::with_capacity(vertex_count);
    let mut kept = Vec::with_capacity(vertex_count);
    let mut remap = Vec::with_capacity(vertex_count);

    for (vertex, &group) in groups.iter().enumerate() {
        let key = VertexKey::new(
            attributes,
            vertex,
            group_data.group_conditions(group),
            group,
        );
        let bucket = buckets.entry(position_key(attributes, vertex)).or_default();
        match bucket.iter().find(|&candidate| *candidate == key) {
            Some(original) => remap.push(remap[original.vertex()]),
            None => {
                remap.push(kept.len());
                kept.push(vertex);
                bucket.push(key);
            },
        }
    }

    Pass { kept, remap }
}

/// Sum the normals of every merged vertex into its survivor, then normalize
/// every survivor. Near-zero sums become the zero vector.
fn merge_normals(normals: &[Vector3<Real>], pass: &Pass) -> Vec<Vector3<Real>> {
    let mut merged = vec![Vector3::zeros(); pass.kept.len()];
    for (old, &new) in pass.remap.iter().enumerate() {
        merged[new] += normals[old];
    }
    let eps = tolerance();
    merged.iter().map(|n| normalize_or_zero(n, eps)).collect()
}

/// **Collapse duplicate vertex data in `mesh`**
///
/// Vertices are duplicates when they occupy the same position and match the
/// conditions of their group (see [`VertGroupData`]). Passes repeat over fresh
/// snapshots until one removes nothing; the per-pass remaps are composed into
/// the returned [`VertMap`].
///
/// Normals of merged vertices are summed, and every retained normal is
/// re-normalized after each pass; a zero sum stays zero. Colors and texture
/// coordinates are taken from the first-seen vertex.
///
/// ## Errors
/// [`MeshError::AttributeLengthMismatch`] when an attribute array is not one
/// entry per position, [`MeshError::IndexOutOfRange`] when an index points past
/// the vertex arrays, [`MeshError::GroupLengthMismatch`] when the group
/// assignment does not cover every vertex.
pub fn minimize_verts(
    mesh: &MeshData,
    group_data: &VertGroupData,
) -> Result<Deduplicated, MeshError> {
    let start = Instant::now();
    mesh.validate()?;

    let old_count = mesh.vertex_count();
    let mut groups = group_data.resolve(old_count)?;
    let mut attributes = mesh.attributes.clone();
    let mut vert_map = VertMap::new(old_count);
    let mut passes = 0;

    loop {
        passes += 1;
        let vertex_count = attributes.vertex_count();
        let pass = find_duplicates(&attributes, &groups, group_data);
        let new_count = pass.kept.len();

        let mut next = attributes.gather(&pass.kept);
        if let Some(normals) = &attributes.normals {
            next.normals = Some(merge_normals(normals, &pass));
        }
        groups = pass.kept.iter().map(|&v| groups[v]).collect();
        vert_map.apply_remapping(&pass.remap, new_count);
        attributes = next;

        debug!("vertex reduction pass {passes}: {vertex_count} -> {new_count}");
        if new_count == vertex_count {
            break;
        }
    }

    let indices = vert_map.remap_indices(&mesh.indices_or_sequential())?;

    info!(
        "Vertex reduction complete: old vertex count: {} new vertex count: {} ({} passes, in {:?})",
        old_count,
        attributes.vertex_count(),
        passes,
        start.elapsed()
    );

    Ok(Deduplicated {
        mesh: MeshData {
            attributes,
            indices: Some(indices),
            index_mode: mesh.index_mode,
        },
        vert_map,
        passes,
    })
}

/// [`minimize_verts`] with a single group covering every vertex.
pub fn minimize_verts_with(
    mesh: &MeshData,
    conditions: MatchConditions,
) -> Result<Deduplicated, MeshError> {
    minimize_verts(mesh, &VertGroupData::with_conditions(conditions))
}

impl MeshData {
    /// Deduplicate this mesh in place and return the old → new vertex map.
    /// On error the mesh is left untouched.
    pub fn minimize_verts(&mut self, group_data: &VertGroupData) -> Result<VertMap, MeshError> {
        let Deduplicated { mesh, vert_map, .. } = minimize_verts(self, group_data)?;
        *self = mesh;
        Ok(vert_map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{Color, TexCoord};
    use nalgebra::Point3;

    #[test]
    fn merges_exact_duplicates_in_first_seen_order() {
        let mesh = MeshData::new(VertexAttributes::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
        ]));
        let out = minimize_verts_with(&mesh, MatchConditions::empty()).expect("valid mesh");

        assert_eq!(out.mesh.vertex_count(), 3);
        assert_eq!(out.vert_map.as_slice(), &[0, 1, 0, 2, 1]);
        assert_eq!(out.mesh.indices.as_deref(), Some(&[0, 1, 0, 2, 1][..]));
        assert_eq!(out.passes, 2);
    }

    #[test]
    fn merged_normals_are_averaged() {
        let mesh = MeshData::new(
            VertexAttributes::new(vec![Point3::origin(), Point3::origin()])
                .with_normals(vec![Vector3::x(), Vector3::y()]),
        );
        let out = minimize_verts_with(&mesh, MatchConditions::empty()).expect("valid mesh");
        let normals = out.mesh.attributes.normals.expect("normals kept");
        assert_eq!(normals.len(), 1);
        let expected = Vector3::new(1.0, 1.0, 0.0).normalize();
        assert!((normals[0] - expected).norm() < 1e-6);
    }

    #[test]
    fn lone_normals_come_back_unit_length() {
        let mesh = MeshData::new(
            VertexAttributes::new(vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)])
                .with_normals(vec![Vector3::new(2.0, 0.0, 0.0), Vector3::new(0.0, 3.0, 0.0)]),
        );
        let out = minimize_verts_with(&mesh, MatchConditions::empty()).expect("valid mesh");
        let normals = out.mesh.attributes.normals.expect("normals kept");
        assert_eq!(normals, vec![Vector3::x(), Vector3::y()]);
    }

    #[test]
    fn opposite_normals_cancel_to_zero() {
        let mesh = MeshData::new(
            VertexAttributes::new(vec![Point3::origin(), Point3::origin()])
                .with_normals(vec![Vector3::z(), -Vector3::z()]),
        );
        let out = minimize_verts_with(&mesh, MatchConditions::empty()).expect("valid mesh");
        let normals = out.mesh.attributes.normals.expect("normals kept");
        assert_eq!(normals[0], Vector3::zeros());
    }

    #[test]
    fn existing_indices_are_remapped() {
        let mesh = MeshData::new(
            VertexAttributes::new(vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ])
            .with_colors(vec![Color::new(1.0, 1.0, 1.0, 1.0); 4]),
        )
        .with_indices(vec![0, 1, 3, 3, 2, 0]);
        let out = minimize_verts_with(&mesh, MatchConditions::COLOR).expect("valid mesh");
        assert_eq!(out.mesh.indices.as_deref(), Some(&[0, 1, 2, 2, 1, 0][..]));
        assert_eq!(out.mesh.attributes.colors.map(|c| c.len()), Some(3));
    }

    #[test]
    fn length_mismatch_fails_fast() {
        let mesh = MeshData::new(
            VertexAttributes::new(vec![Point3::origin(); 3])
                .with_texcoords(0, vec![TexCoord::zeros(); 2]),
        );
        assert!(matches!(
            minimize_verts_with(&mesh, MatchConditions::UVS),
            Err(MeshError::AttributeLengthMismatch { .. })
        ));
    }

    #[test]
    fn empty_mesh_is_a_fixed_point() {
        let out = minimize_verts_with(&MeshData::default(), MatchConditions::empty())
            .expect("empty mesh");
        assert_eq!(out.mesh.vertex_count(), 0);
        assert_eq!(out.passes, 1);
        assert_eq!(out.mesh.indices.as_deref(), Some(&[][..]));
    }

    #[test]
    fn in_place_variant_replaces_buffers() {
        let mut mesh = MeshData::new(VertexAttributes::new(vec![Point3::origin(); 4]));
        let map = mesh
            .minimize_verts(&VertGroupData::new())
            .expect("valid mesh");
        assert_eq!(mesh.vertex_count(), 1);
        assert_eq!(map.as_slice(), &[0, 0, 0, 0]);
        assert!(mesh.is_indexed());
    }
}
