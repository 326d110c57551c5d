//! **Normal generation**
//!
//! [`NormalGenerator`] works on indexed triangle lists and splits the mesh
//! along creases, duplicating vertices so each smoothing split carries its own
//! normal. [`SoupNormalGenerator`] works on raw triangle soup and returns one
//! normal per corner without touching the geometry.

use crate::errors::MeshError;
use crate::float_types::Real;
use crate::mesh::MeshData;

pub mod crease;
pub mod soup;

pub use crease::{NormalGenerator, SmoothedMesh};
pub use soup::SoupNormalGenerator;

impl MeshData {
    /// Replace this mesh with the output of [`NormalGenerator::generate`].
    ///
    /// Returns `Ok(false)` and leaves the mesh untouched when it is not a
    /// triangle list.
    pub fn generate_normals(&mut self, crease_angle: Real) -> Result<bool, MeshError> {
        match NormalGenerator::new(crease_angle).generate(self)? {
            Some(smoothed) => {
                *self = smoothed.mesh;
                Ok(true)
            },
            None => Ok(false),
        }
    }
}
