use crate::errors::MeshError;
use crate::float_types::Real;
use crate::math::face_normal;
use crate::mesh::{IndexMode, MeshData, VertexAttributes};
use nalgebra::{Point3, Vector3};
use std::io::Cursor;

/// Facets of a triangle-list mesh, each with a normal recomputed from its
/// corner positions.
fn facets(mesh: &MeshData) -> Result<Vec<([Point3<Real>; 3], Vector3<Real>)>, MeshError> {
    if mesh.index_mode != IndexMode::Triangles {
        return Err(MeshError::MalformedInput(format!(
            "STL export needs a triangle list, got {:?}",
            mesh.index_mode
        )));
    }
    mesh.validate()?;
    let p = &mesh.attributes.positions;
    Ok(mesh
        .triangles()
        .map(|[a, b, c]| ([p[a], p[b], p[c]], face_normal(&p[a], &p[b], &p[c])))
        .collect())
}

impl MeshData {
    /// Read an ASCII or binary STL file as unindexed triangle soup.
    ///
    /// Every corner gets a position and the facet normal stored in the file.
    /// Run [`crate::dedup::minimize_verts`] afterwards to weld shared corners.
    ///
    /// ```rust
    /// # use meshprep::mesh::MeshData;
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// # use meshprep::mesh::VertexAttributes;
    /// # use nalgebra::Point3;
    /// let triangle = MeshData::new(VertexAttributes::new(vec![
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(0.0, 1.0, 0.0),
    /// ]));
    /// let bytes = triangle.to_stl_binary()?;
    /// let mesh = MeshData::from_stl(&bytes)?;
    /// assert_eq!(mesh.vertex_count(), 3);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_stl(stl_data: &[u8]) -> Result<MeshData, MeshError> {
        let mut cursor = Cursor::new(stl_data);
        let stl_reader = stl_io::create_stl_reader(&mut cursor)?;

        let mut positions = Vec::new();
        let mut normals = Vec::new();
        for tri_result in stl_reader {
            let tri = tri_result?;
            let normal = Vector3::new(
                tri.normal[0] as Real,
                tri.normal[1] as Real,
                tri.normal[2] as Real,
            );
            for v in &tri.vertices {
                positions.push(Point3::new(v[0] as Real, v[1] as Real, v[2] as Real));
                normals.push(normal);
            }
        }

        Ok(MeshData::new(
            VertexAttributes::new(positions).with_normals(normals),
        ))
    }

    /// Convert this mesh to an **ASCII STL** string with the given `name`.
    pub fn to_stl_ascii(&self, name: &str) -> Result<String, MeshError> {
        let mut out = String::new();
        out.push_str(&format!("solid {name}\n"));
        for (corners, n) in facets(self)? {
            out.push_str(&format!(
                "  facet normal {:.6} {:.6} {:.6}\n",
                n.x, n.y, n.z
            ));
            out.push_str("    outer loop\n");
            for p in &corners {
                out.push_str(&format!(
                    "      vertex {:.6} {:.6} {:.6}\n",
                    p.x, p.y, p.z
                ));
            }
            out.push_str("    endloop\n");
            out.push_str("  endfacet\n");
        }
        out.push_str(&format!("endsolid {name}\n"));
        Ok(out)
    }

    /// Convert this mesh to a **binary STL** byte vector.
    ///
    /// Fails with [`MeshError::MalformedInput`] for strips, fans, lines and points.
    pub fn to_stl_binary(&self) -> Result<Vec<u8>, MeshError> {
        use stl_io::{Normal, Triangle, Vertex, write_stl};

        #[allow(clippy::unnecessary_cast)]
        let triangles: Vec<Triangle> = facets(self)?
            .into_iter()
            .map(|(corners, n)| Triangle {
                normal: Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: corners.map(|p| Vertex::new([p.x as f32, p.y as f32, p.z as f32])),
            })
            .collect();

        let mut cursor = Cursor::new(Vec::new());
        write_stl(&mut cursor, triangles.iter())?;
        Ok(cursor.into_inner())
    }
}
