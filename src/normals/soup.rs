//! Normals for unindexed triangle soup.

use crate::errors::MeshError;
use crate::float_types::{Real, tolerance};
use crate::math::{face_normal, normalize_or_zero, smallest_angle_between};
use nalgebra::{Point3, Vector3};

/// **Soup normal generator**
///
/// Every three consecutive positions form one triangle. An optional identity
/// array (one entry per corner) marks corners that are the same logical vertex:
/// equal identities mean coincident vertices.
///
/// - Without identities, or with a crease angle below tolerance, every corner
///   gets its face normal (faceted).
/// - Otherwise a corner's normal is the normalized sum of its face normal and
///   the face normals of all later, not yet assigned corners with the same
///   identity whose face lies within the crease angle of its own. The same
///   normal is written to all of those corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoupNormalGenerator {
    crease_angle: Real,
    tolerance: Real,
}

impl SoupNormalGenerator {
    pub fn new(crease_angle: Real) -> Self {
        SoupNormalGenerator {
            crease_angle,
            tolerance: tolerance(),
        }
    }

    pub const fn with_tolerance(mut self, tolerance: Real) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// One normal per corner of `positions`. Trailing positions that do not
    /// complete a triangle get no normal.
    ///
    /// ## Errors
    /// [`MeshError::AttributeLengthMismatch`] when `identities` is shorter than
    /// the number of triangle corners.
    pub fn generate(
        &self,
        positions: &[Point3<Real>],
        identities: Option<&[usize]>,
    ) -> Result<Vec<Vector3<Real>>, MeshError> {
        let face_normals: Vec<Vector3<Real>> = positions
            .chunks_exact(3)
            .map(|t| face_normal(&t[0], &t[1], &t[2]))
            .collect();
        let corners = face_normals.len() * 3;

        let identities = match identities {
            Some(ids) if ids.len() < corners => {
                return Err(MeshError::AttributeLengthMismatch {
                    attribute: "identities".to_string(),
                    expected: corners,
                    actual: ids.len(),
                });
            },
            Some(ids) if self.crease_angle >= self.tolerance => ids,
            _ => return Ok(faceted(&face_normals)),
        };

        let mut normals = vec![Vector3::zeros(); corners];
        let mut assigned = vec![false; corners];
        let mut members = Vec::new();

        for corner in 0..corners {
            if assigned[corner] {
                continue;
            }
            let own = face_normals[corner / 3];
            let mut sum = own;
            members.clear();
            members.push(corner);

            for other in corner + 1..corners {
                if identities[other] != identities[corner] || assigned[other] {
                    continue;
                }
                let candidate = face_normals[other / 3];
                if smallest_angle_between(&own, &candidate) <= self.crease_angle + self.tolerance {
                    members.push(other);
                    sum += candidate;
                }
            }

            let normal = normalize_or_zero(&sum, self.tolerance);
            for &m in &members {
                normals[m] = normal;
                assigned[m] = true;
            }
        }

        Ok(normals)
    }

    /// [`Self::generate`] over flat `xyz` coordinates, returning flat `xyz` normals.
    pub fn generate_flat(
        &self,
        coords: &[Real],
        identities: Option<&[usize]>,
    ) -> Result<Vec<Real>, MeshError> {
        let positions: Vec<Point3<Real>> = coords
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect();
        let normals = self.generate(&positions, identities)?;
        Ok(normals.iter().flat_map(|n| [n.x, n.y, n.z]).collect())
    }
}

fn faceted(face_normals: &[Vector3<Real>]) -> Vec<Vector3<Real>> {
    face_normals.iter().flat_map(|&n| [n, n, n]).collect()
}
