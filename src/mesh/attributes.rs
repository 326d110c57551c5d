//! Parallel per-vertex attribute arrays.

use crate::errors::MeshError;
use crate::float_types::Real;
use nalgebra::{Point3, Vector2, Vector3, Vector4};

/// RGBA vertex color.
pub type Color = Vector4<Real>;

/// A 2D texture coordinate.
pub type TexCoord = Vector2<Real>;

/// **VertexAttributes: one entry per vertex in every present array**
///
/// Positions are mandatory. Normals, colors and each texture-coordinate
/// channel are optional, but when present they must have exactly
/// `positions.len()` entries. A `None` texture channel is an unused unit
/// sitting below a used one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexAttributes {
    pub positions: Vec<Point3<Real>>,
    pub normals: Option<Vec<Vector3<Real>>>,
    pub colors: Option<Vec<Color>>,
    pub texcoords: Vec<Option<Vec<TexCoord>>>,
}

impl VertexAttributes {
    pub const fn new(positions: Vec<Point3<Real>>) -> Self {
        VertexAttributes {
            positions,
            normals: None,
            colors: None,
            texcoords: Vec::new(),
        }
    }

    pub fn with_normals(mut self, normals: Vec<Vector3<Real>>) -> Self {
        self.normals = Some(normals);
        self
    }

    pub fn with_colors(mut self, colors: Vec<Color>) -> Self {
        self.colors = Some(colors);
        self
    }

    /// Set texture channel `channel`, growing the channel list as needed.
    pub fn with_texcoords(mut self, channel: usize, coords: Vec<TexCoord>) -> Self {
        self.set_texcoords(channel, Some(coords));
        self
    }

    pub fn set_texcoords(&mut self, channel: usize, coords: Option<Vec<TexCoord>>) {
        if self.texcoords.len() <= channel {
            self.texcoords.resize(channel + 1, None);
        }
        self.texcoords[channel] = coords;
    }

    pub fn texcoords(&self, channel: usize) -> Option<&[TexCoord]> {
        self.texcoords.get(channel).and_then(|c| c.as_deref())
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Highest texture channel carrying data, if any.
    pub fn max_texcoord_channel(&self) -> Option<usize> {
        self.texcoords.iter().rposition(Option::is_some)
    }

    /// Check that every present attribute has one entry per position.
    pub fn validate_lengths(&self) -> Result<(), MeshError> {
        let expected = self.positions.len();
        let check = |attribute: String, actual: usize| {
            if actual == expected {
                Ok(())
            } else {
                Err(MeshError::AttributeLengthMismatch {
                    attribute,
                    expected,
                    actual,
                })
            }
        };

        if let Some(normals) = &self.normals {
            check("normals".to_string(), normals.len())?;
        }
        if let Some(colors) = &self.colors {
            check("colors".to_string(), colors.len())?;
        }
        for (channel, coords) in self.texcoords.iter().enumerate() {
            if let Some(coords) = coords {
                check(format!("texcoords[{channel}]"), coords.len())?;
            }
        }
        Ok(())
    }

    /// Build a new attribute set holding, in order, the vertices named by `sources`.
    /// Absent attributes stay absent.
    pub fn gather(&self, sources: &[usize]) -> VertexAttributes {
        VertexAttributes {
            positions: sources.iter().map(|&i| self.positions[i]).collect(),
            normals: self
                .normals
                .as_ref()
                .map(|n| sources.iter().map(|&i| n[i]).collect()),
            colors: self
                .colors
                .as_ref()
                .map(|c| sources.iter().map(|&i| c[i]).collect()),
            texcoords: self
                .texcoords
                .iter()
                .map(|channel| {
                    channel
                        .as_ref()
                        .map(|t| sources.iter().map(|&i| t[i]).collect())
                })
                .collect(),
        }
    }

    /// Append a copy of vertex `index` (position, color and every texture channel).
    /// Normals are not copied; callers that duplicate vertices recompute them.
    /// Returns the index of the new vertex.
    pub fn duplicate_vertex(&mut self, index: usize) -> usize {
        self.positions.push(self.positions[index]);
        if let Some(colors) = &mut self.colors {
            colors.push(colors[index]);
        }
        for coords in self.texcoords.iter_mut().flatten() {
            coords.push(coords[index]);
        }
        self.positions.len() - 1
    }
}
