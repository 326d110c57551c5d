//! Per-vertex smoothing groups and the match conditions each group uses.

use super::conditions::MatchConditions;
use crate::errors::MeshError;
use hashbrown::HashMap;

/// Identifier of a vertex group.
pub type GroupId = i64;

/// **VertGroupData: vertex → group assignment plus per-group conditions**
///
/// Without an explicit assignment every vertex belongs to [`Self::DEFAULT_GROUP`].
/// A group without its own conditions uses those of the default group.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VertGroupData {
    vert_groups: Option<Vec<GroupId>>,
    group_conditions: HashMap<GroupId, MatchConditions>,
}

impl VertGroupData {
    pub const DEFAULT_GROUP: GroupId = 0;

    /// One default group covering all vertices, matching on position only.
    pub fn new() -> Self {
        Self::default()
    }

    /// One default group covering all vertices, using `conditions`.
    pub fn with_conditions(conditions: MatchConditions) -> Self {
        let mut data = Self::default();
        data.set_group_conditions(Self::DEFAULT_GROUP, conditions);
        data
    }

    pub fn set_group_conditions(&mut self, group: GroupId, conditions: MatchConditions) {
        self.group_conditions.insert(group, conditions);
    }

    /// Assign vertex `i` to group `vert_groups[i]`.
    pub fn set_vert_groups(&mut self, vert_groups: Vec<GroupId>) {
        self.vert_groups = Some(vert_groups);
    }

    pub fn vert_groups(&self) -> Option<&[GroupId]> {
        self.vert_groups.as_deref()
    }

    /// Group of vertex `vertex`; [`Self::DEFAULT_GROUP`] when no assignment exists.
    pub fn group_for_vertex(&self, vertex: usize) -> GroupId {
        self.vert_groups
            .as_ref()
            .and_then(|groups| groups.get(vertex).copied())
            .unwrap_or(Self::DEFAULT_GROUP)
    }

    /// Conditions for `group`, falling back to the default group's conditions.
    pub fn group_conditions(&self, group: GroupId) -> MatchConditions {
        self.group_conditions
            .get(&group)
            .or_else(|| self.group_conditions.get(&Self::DEFAULT_GROUP))
            .copied()
            .unwrap_or_default()
    }

    /// Resolve the group of every vertex of a mesh with `vertex_count` vertices.
    ///
    /// Fails when an explicit assignment does not have exactly one entry per vertex.
    pub fn resolve(&self, vertex_count: usize) -> Result<Vec<GroupId>, MeshError> {
        match &self.vert_groups {
            Some(groups) if groups.len() != vertex_count => Err(MeshError::GroupLengthMismatch {
                expected: vertex_count,
                actual: groups.len(),
            }),
            Some(groups) => Ok(groups.clone()),
            None => Ok(vec![Self::DEFAULT_GROUP; vertex_count]),
        }
    }
}
