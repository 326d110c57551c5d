//! Crease-angle normal generation for indexed triangle lists.

use crate::errors::MeshError;
use crate::float_types::{Real, tolerance};
use crate::math::{face_normal, normalize_or_zero, smallest_angle_between};
use crate::mesh::{IndexMode, MeshData, VertexAttributes};
use log::{debug, info};
use nalgebra::Vector3;

/// One directed edge `i0 → i1` of a triangle.
///
/// `new_i0`/`new_i1` hold the index of a duplicated vertex once the endpoint
/// has been split off; the triangle then references the duplicate.
#[derive(Debug, Clone, Copy)]
struct Edge {
    i0: usize,
    i1: usize,
    new_i0: Option<usize>,
    new_i1: Option<usize>,
}

impl Edge {
    const fn new(i0: usize, i1: usize) -> Self {
        Edge {
            i0,
            i1,
            new_i0: None,
            new_i1: None,
        }
    }

    /// Two edges connect when they run over the same vertices in opposite directions.
    #[inline]
    const fn is_connected_to(&self, other: &Edge) -> bool {
        self.i0 == other.i1 && self.i1 == other.i0
    }
}

#[derive(Debug, Clone)]
struct Triangle {
    edges: [Edge; 3],
    normal: Vector3<Real>,
}

impl Triangle {
    fn new([i0, i1, i2]: [usize; 3], attributes: &VertexAttributes) -> Self {
        let p = &attributes.positions;
        Triangle {
            edges: [Edge::new(i0, i1), Edge::new(i1, i2), Edge::new(i2, i0)],
            normal: face_normal(&p[i0], &p[i1], &p[i2]),
        }
    }

    /// Vertex used at corner `k`, preferring a duplicate.
    #[inline]
    fn corner(&self, k: usize) -> usize {
        let e = &self.edges[k];
        e.new_i0.unwrap_or(e.i0)
    }
}

/// Edge `slot` of triangle `tri`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EdgeRef {
    tri: usize,
    slot: usize,
}

/// A maximal set of triangles joined by edges within the crease angle.
#[derive(Debug, Default)]
struct Split {
    triangles: Vec<usize>,
    border: Vec<EdgeRef>,
}

/// Working state of one [`NormalGenerator::generate`] call.
///
/// Lives only for the duration of the call, so a generator can be shared
/// between threads.
struct SplitContext {
    crease_angle: Real,
    tolerance: Real,
    source_vertex_count: usize,
    dest: VertexAttributes,
    triangles: Vec<Triangle>,
    remaining: Vec<usize>,
    splits: Vec<Split>,
}

impl SplitContext {
    fn new(generator: &NormalGenerator, mesh: &MeshData) -> Self {
        let mut dest = mesh.attributes.clone();
        dest.normals = None;
        let triangles: Vec<Triangle> = mesh
            .triangles()
            .map(|t| Triangle::new(t, &mesh.attributes))
            .collect();
        SplitContext {
            crease_angle: generator.crease_angle,
            tolerance: generator.tolerance,
            source_vertex_count: mesh.vertex_count(),
            dest,
            remaining: (0..triangles.len()).collect(),
            triangles,
            splits: Vec::new(),
        }
    }

    #[inline]
    fn edge(&self, r: EdgeRef) -> Edge {
        self.triangles[r.tri].edges[r.slot]
    }

    #[inline]
    fn edge_mut(&mut self, tri: usize, slot: usize) -> &mut Edge {
        &mut self.triangles[tri].edges[slot]
    }

    /// Whether the transition between two triangles is smooth.
    fn check_angle(&self, a: usize, b: usize) -> bool {
        smallest_angle_between(&self.triangles[a].normal, &self.triangles[b].normal)
            <= self.crease_angle + self.tolerance
    }

    fn duplicate(&mut self, vertex: usize) -> usize {
        self.dest.duplicate_vertex(vertex)
    }

    /// Grow one split from the first remaining triangle until nothing else attaches.
    fn create_mesh_split(&mut self) {
        let first = self.remaining.remove(0);
        let mut split = Split {
            triangles: vec![first],
            border: (0..3).map(|slot| EdgeRef { tri: first, slot }).collect(),
        };
        while self.insert_triangle(&mut split) {}
        self.splits.push(split);
    }

    /// Find the first remaining triangle sharing an edge with the split's border
    /// within the crease angle, and absorb it.
    fn insert_triangle(&mut self, split: &mut Split) -> bool {
        let mut found = None;
        'search: for (pos, &tri) in self.remaining.iter().enumerate() {
            for (border_pos, &border_ref) in split.border.iter().enumerate() {
                let border_edge = self.edge(border_ref);
                for slot in 0..3 {
                    if border_edge.is_connected_to(&self.triangles[tri].edges[slot])
                        && self.check_angle(tri, border_ref.tri)
                    {
                        found = Some((pos, border_pos, slot));
                        break 'search;
                    }
                }
            }
        }

        let Some((pos, border_pos, slot)) = found else {
            return false;
        };

        let tri = self.remaining.remove(pos);
        split.triangles.push(tri);
        let border_edge = self.edge(split.border[border_pos]);
        split.border.splice(
            border_pos..=border_pos,
            [
                EdgeRef {
                    tri,
                    slot: (slot + 1) % 3,
                },
                EdgeRef {
                    tri,
                    slot: (slot + 2) % 3,
                },
            ],
        );

        // Reuse duplicates already assigned on the other side of the shared edge.
        if let Some(n0) = border_edge.new_i0 {
            self.edge_mut(tri, slot).new_i1 = Some(n0);
            self.edge_mut(tri, (slot + 1) % 3).new_i0 = Some(n0);
        }
        if let Some(n1) = border_edge.new_i1 {
            self.edge_mut(tri, slot).new_i0 = Some(n1);
            self.edge_mut(tri, (slot + 2) % 3).new_i1 = Some(n1);
        }

        for k in slot + 1..slot + 3 {
            self.connect_edge(split, tri, k % 3);
        }
        true
    }

    /// Close edge `slot` of a freshly absorbed triangle against the border, if
    /// it meets one. A crease across that join duplicates both endpoints.
    fn connect_edge(&mut self, split: &mut Split, tri: usize, slot: usize) {
        let edge = self.triangles[tri].edges[slot];
        let Some(border_pos) = split
            .border
            .iter()
            .position(|&r| self.edge(r).is_connected_to(&edge))
        else {
            return;
        };

        let border_ref = split.border.remove(border_pos);
        let border_edge = self.edge(border_ref);
        split.border.retain(|&r| r != EdgeRef { tri, slot });

        if !self.check_angle(tri, border_ref.tri) {
            let n0 = self.duplicate(edge.i0);
            self.edge_mut(tri, slot).new_i0 = Some(n0);
            self.edge_mut(tri, (slot + 2) % 3).new_i1 = Some(n0);
            let n1 = self.duplicate(edge.i1);
            self.edge_mut(tri, slot).new_i1 = Some(n1);
            self.edge_mut(tri, (slot + 1) % 3).new_i0 = Some(n1);
        } else {
            if let Some(n0) = border_edge.new_i0 {
                self.edge_mut(tri, slot).new_i1 = Some(n0);
                self.edge_mut(tri, (slot + 1) % 3).new_i0 = Some(n0);
            }
            if let Some(n1) = border_edge.new_i1 {
                self.edge_mut(tri, slot).new_i0 = Some(n1);
                self.edge_mut(tri, (slot + 2) % 3).new_i1 = Some(n1);
            }
        }
    }

    /// Give every split after the first its own copy of each vertex it shares
    /// with an earlier split.
    fn duplicate_crease_vertices(&mut self) {
        let Some(first) = self.splits.first() else {
            return;
        };
        let mut border_indices = vec![false; self.source_vertex_count];
        for &r in &first.border {
            let e = self.edge(r);
            border_indices[e.i0] = true;
            border_indices[e.i1] = true;
        }
        if self.splits.len() < 2 {
            return;
        }

        let mut replacement: Vec<Option<usize>> = vec![None; self.source_vertex_count];
        let mut touched = Vec::new();
        for s in 1..self.splits.len() {
            for &v in &touched {
                replacement[v] = None;
            }
            touched.clear();

            let border = self.splits[s].border.clone();
            for r in border {
                let e = self.edge(r);
                for (vertex, assigned) in [(e.i0, e.new_i0), (e.i1, e.new_i1)] {
                    if assigned.is_some() || replacement[vertex].is_some() {
                        continue;
                    }
                    replacement[vertex] = if border_indices[vertex] {
                        Some(self.duplicate(vertex))
                    } else {
                        Some(vertex)
                    };
                    touched.push(vertex);
                }
            }

            for &vertex in &touched {
                let Some(r) = replacement[vertex] else {
                    continue;
                };
                if border_indices[vertex] {
                    for &tri in &self.splits[s].triangles {
                        replace_index(&mut self.triangles[tri], vertex, r);
                    }
                } else {
                    border_indices[vertex] = true;
                }
            }
        }
    }

    /// Accumulate face normals per (possibly duplicated) vertex and rebuild the
    /// index buffer in the original triangle order.
    fn compute_normals_and_indices(&self) -> (Vec<Vector3<Real>>, Vec<usize>) {
        let mut normals = vec![Vector3::zeros(); self.dest.vertex_count()];
        let mut indices = Vec::with_capacity(self.triangles.len() * 3);
        for tri in &self.triangles {
            for k in 0..3 {
                let v = tri.corner(k);
                normals[v] += tri.normal;
                indices.push(v);
            }
        }
        for n in &mut normals {
            *n = normalize_or_zero(n, self.tolerance);
        }
        (normals, indices)
    }
}

/// Point every not-yet-duplicated use of `index` in `tri` at `replacement`.
fn replace_index(tri: &mut Triangle, index: usize, replacement: usize) {
    for edge in &mut tri.edges {
        if edge.new_i0.is_none() && edge.i0 == index {
            edge.new_i0 = Some(replacement);
        }
        if edge.new_i1.is_none() && edge.i1 == index {
            edge.new_i1 = Some(replacement);
        }
    }
}

/// Output of [`NormalGenerator::generate`].
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothedMesh {
    /// The input mesh with normals set, vertices duplicated along creases and
    /// the index buffer rewritten (one triangle per input triangle, same order).
    pub mesh: MeshData,
    /// Number of smoothing splits found (one per triangle in faceted mode).
    pub split_count: usize,
    /// Vertices appended to the attribute arrays.
    pub duplicated_vertices: usize,
}

/// **Crease-angle normal generator**
///
/// Triangles joined by an edge whose face normals differ by at most the crease
/// angle are grown into one split; normals are averaged only inside a split and
/// vertices shared by several splits are duplicated, position, color and
/// texture coordinates included.
///
/// Triangles are absorbed in input order, so the result is deterministic but the
/// number of splits is not minimal in general.
///
/// The mesh must be edge-manifold (at most two triangles per edge) and connected
/// through edges rather than lone vertices; otherwise the result is undefined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalGenerator {
    crease_angle: Real,
    tolerance: Real,
}

impl NormalGenerator {
    /// Generator smoothing across edges up to `crease_angle` radians.
    pub fn new(crease_angle: Real) -> Self {
        NormalGenerator {
            crease_angle,
            tolerance: tolerance(),
        }
    }

    /// Override the epsilon used for angle comparisons and the faceted cut-off.
    pub const fn with_tolerance(mut self, tolerance: Real) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub const fn crease_angle(&self) -> Real {
        self.crease_angle
    }

    pub const fn tolerance(&self) -> Real {
        self.tolerance
    }

    /// Compute normals for `mesh`.
    ///
    /// Returns `Ok(None)` for meshes that are not triangle lists (strips and fans
    /// are not supported). Fails when attribute arrays have mismatched lengths or
    /// an index points past them.
    pub fn generate(&self, mesh: &MeshData) -> Result<Option<SmoothedMesh>, MeshError> {
        if mesh.index_mode != IndexMode::Triangles {
            info!(
                "Skipping normal generation: invalid triangle mode {:?}",
                mesh.index_mode
            );
            return Ok(None);
        }
        mesh.validate()?;

        // Unindexed soup shares no edges, so there is nothing to split.
        if self.crease_angle < self.tolerance || !mesh.is_indexed() {
            return Ok(Some(self.faceted(mesh)));
        }

        let mut ctx = SplitContext::new(self, mesh);
        while !ctx.remaining.is_empty() {
            ctx.create_mesh_split();
        }
        ctx.duplicate_crease_vertices();

        let (normals, indices) = ctx.compute_normals_and_indices();
        let duplicated_vertices = ctx.dest.vertex_count() - ctx.source_vertex_count;
        let split_count = ctx.splits.len();
        debug!(
            "Generated normals: {} triangles, {} splits, {} duplicated vertices",
            ctx.triangles.len(),
            split_count,
            duplicated_vertices
        );

        let mut attributes = ctx.dest;
        attributes.normals = Some(normals);
        Ok(Some(SmoothedMesh {
            mesh: MeshData {
                attributes,
                indices: Some(indices),
                index_mode: IndexMode::Triangles,
            },
            split_count,
            duplicated_vertices,
        }))
    }

    /// Flat shading: every triangle gets private copies of its corners (the first
    /// triangle to use a vertex keeps the original) carrying the face normal.
    fn faceted(&self, mesh: &MeshData) -> SmoothedMesh {
        let source_vertex_count = mesh.vertex_count();
        let mut attributes = mesh.attributes.clone();
        attributes.normals = None;
        let mut normals = vec![Vector3::zeros(); source_vertex_count];
        let mut claimed = vec![false; source_vertex_count];
        let mut indices = Vec::with_capacity(mesh.index_count());
        let mut triangle_count = 0;

        for tri in mesh.triangles() {
            triangle_count += 1;
            let p = &mesh.attributes.positions;
            let normal = face_normal(&p[tri[0]], &p[tri[1]], &p[tri[2]]);
            for v in tri {
                let target = if claimed[v] {
                    normals.push(normal);
                    attributes.duplicate_vertex(v)
                } else {
                    claimed[v] = true;
                    normals[v] = normal;
                    v
                };
                indices.push(target);
            }
        }

        let duplicated_vertices = attributes.vertex_count() - source_vertex_count;
        attributes.normals = Some(normals);
        SmoothedMesh {
            mesh: MeshData {
                attributes,
                indices: Some(indices),
                index_mode: IndexMode::Triangles,
            },
            split_count: triangle_count,
            duplicated_vertices,
        }
    }
}
