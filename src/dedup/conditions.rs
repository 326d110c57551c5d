//! Conditions deciding when two co-located vertices count as the same vertex.

use bitflags::bitflags;

/// One attribute that must also match for two vertices at the same position to merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchCondition {
    /// Vertices must have identical normals.
    Normal,
    /// Vertices must have identical texture coords on all channels.
    UVs,
    /// Vertices must have identical vertex coloring.
    Color,
    /// Vertices must be in the same group.
    Group,
}

impl MatchCondition {
    pub const ALL: [MatchCondition; 4] = [
        MatchCondition::Normal,
        MatchCondition::UVs,
        MatchCondition::Color,
        MatchCondition::Group,
    ];
}

bitflags! {
    /// A set of [`MatchCondition`]s. Position equality is always required and is
    /// not part of the set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MatchConditions: u8 {
        const NORMAL = 1 << 0;
        const UVS = 1 << 1;
        const COLOR = 1 << 2;
        const GROUP = 1 << 3;
    }
}

impl MatchConditions {
    /// Whether `condition` is part of this set.
    #[inline]
    pub const fn includes(self, condition: MatchCondition) -> bool {
        self.contains(Self::flag(condition))
    }

    /// Return a copy of this set with `condition` added.
    #[inline]
    pub const fn with(self, condition: MatchCondition) -> Self {
        self.union(Self::flag(condition))
    }

    #[inline]
    const fn flag(condition: MatchCondition) -> Self {
        match condition {
            MatchCondition::Normal => Self::NORMAL,
            MatchCondition::UVs => Self::UVS,
            MatchCondition::Color => Self::COLOR,
            MatchCondition::Group => Self::GROUP,
        }
    }

    /// Iterate the conditions in this set in declaration order.
    pub fn conditions(self) -> impl Iterator<Item = MatchCondition> {
        MatchCondition::ALL
            .into_iter()
            .filter(move |&c| self.includes(c))
    }
}

impl From<MatchCondition> for MatchConditions {
    fn from(condition: MatchCondition) -> Self {
        MatchConditions::flag(condition)
    }
}

impl FromIterator<MatchCondition> for MatchConditions {
    fn from_iter<I: IntoIterator<Item = MatchCondition>>(iter: I) -> Self {
        iter.into_iter()
            .fold(MatchConditions::empty(), MatchConditions::with)
    }
}
