//! Comparison key over one vertex's attributes.

use super::conditions::{MatchCondition, MatchConditions};
use super::group::GroupId;
use crate::float_types::Real;
use crate::mesh::VertexAttributes;
use std::hash::{Hash, Hasher};

/// Bit pattern of `value` with `-0.0` folded onto `0.0`, so that bit equality
/// agrees with float equality for zeros.
#[inline]
#[allow(clippy::unnecessary_cast)]
pub(crate) fn canonical_bits(value: Real) -> u64 {
    if value == 0.0 { 0 } else { value.to_bits() as u64 }
}

/// Hashable position, used to bucket candidate duplicates.
pub(crate) type PositionKey = [u64; 3];

#[inline]
pub(crate) fn position_key(attributes: &VertexAttributes, vertex: usize) -> PositionKey {
    let p = &attributes.positions[vertex];
    [canonical_bits(p.x), canonical_bits(p.y), canonical_bits(p.z)]
}

#[inline]
fn components_eq(a: &[Real], b: &[Real]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|(&x, &y)| canonical_bits(x) == canonical_bits(y))
}

#[inline]
fn hash_components<H: Hasher>(values: &[Real], state: &mut H) {
    for &v in values {
        canonical_bits(v).hash(state);
    }
}

/// **VertexKey: a condition-gated view of one vertex**
///
/// Two keys are equal iff the positions are equal and, for every active
/// condition, the gated attribute is equal as well. Attributes whose condition
/// is not active never influence equality or the hash. Keys built with
/// different condition sets are never equal.
///
/// Floats compare by bit pattern (after folding `-0.0` onto `0.0`), so a NaN
/// equals an identical NaN and hashing stays consistent with equality.
#[derive(Debug, Clone, Copy)]
pub struct VertexKey<'a> {
    attributes: &'a VertexAttributes,
    vertex: usize,
    conditions: MatchConditions,
    group: GroupId,
}

impl<'a> VertexKey<'a> {
    pub const fn new(
        attributes: &'a VertexAttributes,
        vertex: usize,
        conditions: MatchConditions,
        group: GroupId,
    ) -> Self {
        VertexKey {
            attributes,
            vertex,
            conditions,
            group,
        }
    }

    /// Index of the vertex this key looks at.
    pub const fn vertex(&self) -> usize {
        self.vertex
    }

    pub const fn conditions(&self) -> MatchConditions {
        self.conditions
    }

    pub const fn group(&self) -> GroupId {
        self.group
    }

    fn positions_eq(&self, other: &Self) -> bool {
        components_eq(
            self.attributes.positions[self.vertex].coords.as_slice(),
            other.attributes.positions[other.vertex].coords.as_slice(),
        )
    }

    fn normals_eq(&self, other: &Self) -> bool {
        match (&self.attributes.normals, &other.attributes.normals) {
            (Some(a), Some(b)) => {
                components_eq(a[self.vertex].as_slice(), b[other.vertex].as_slice())
            },
            (None, None) => true,
            _ => false,
        }
    }

    fn colors_eq(&self, other: &Self) -> bool {
        match (&self.attributes.colors, &other.attributes.colors) {
            (Some(a), Some(b)) => {
                components_eq(a[self.vertex].as_slice(), b[other.vertex].as_slice())
            },
            (None, None) => true,
            _ => false,
        }
    }

    fn texcoords_eq(&self, other: &Self) -> bool {
        let (a, b) = (&self.attributes.texcoords, &other.attributes.texcoords);
        let channels = a.len().max(b.len());
        (0..channels).all(|channel| {
            match (
                a.get(channel).and_then(Option::as_ref),
                b.get(channel).and_then(Option::as_ref),
            ) {
                (Some(ta), Some(tb)) => {
                    components_eq(ta[self.vertex].as_slice(), tb[other.vertex].as_slice())
                },
                (None, None) => true,
                _ => false,
            }
        })
    }
}

impl PartialEq for VertexKey<'_> {
    fn eq(&self, other: &Self) -> bool {
        if self.conditions != other.conditions || !self.positions_eq(other) {
            return false;
        }
        let c = self.conditions;
        (!c.includes(MatchCondition::Group) || self.group == other.group)
            && (!c.includes(MatchCondition::Normal) || self.normals_eq(other))
            && (!c.includes(MatchCondition::Color) || self.colors_eq(other))
            && (!c.includes(MatchCondition::UVs) || self.texcoords_eq(other))
    }
}

impl Eq for VertexKey<'_> {}

impl Hash for VertexKey<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let c = self.conditions;
        c.bits().hash(state);
        hash_components(
            self.attributes.positions[self.vertex].coords.as_slice(),
            state,
        );
        if c.includes(MatchCondition::Group) {
            self.group.hash(state);
        }
        if c.includes(MatchCondition::Normal) {
            if let Some(normals) = &self.attributes.normals {
                hash_components(normals[self.vertex].as_slice(), state);
            }
        }
        if c.includes(MatchCondition::Color) {
            if let Some(colors) = &self.attributes.colors {
                hash_components(colors[self.vertex].as_slice(), state);
            }
        }
        if c.includes(MatchCondition::UVs) {
            for coords in self.attributes.texcoords.iter().flatten() {
                hash_components(coords[self.vertex].as_slice(), state);
            }
        }
    }
}
