use std::fmt;
use std::ops::BitOr;

use serde::{Serialize, Deserialize};

use crate::InteractionKind;

/// Bit mask selecting the relation types an annotation works with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationMask(u8);

impl RelationMask {
    pub const NONE: RelationMask = RelationMask(0);
    pub const PAIRING: RelationMask = RelationMask(1);
    pub const STACKING: RelationMask = RelationMask(1 << 1);
    pub const ADJACENCY: RelationMask = RelationMask(1 << 2);
    pub const ALL: RelationMask = RelationMask(0b111);

    pub fn of(kind: InteractionKind) -> Self {
        match kind {
            InteractionKind::Pair => Self::PAIRING,
            InteractionKind::Stack => Self::STACKING,
            InteractionKind::Link => Self::ADJACENCY,
        }
    }

    pub fn contains(&self, other: RelationMask) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn accepts(&self, kind: InteractionKind) -> bool {
        self.contains(Self::of(kind))
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn bits(&self) -> u8 {
        self.0
    }
}

impl Default for RelationMask {
    fn default() -> Self {
        Self::ALL
    }
}

impl BitOr for RelationMask {
    type Output = RelationMask;
    fn bitor(self, rhs: Self) -> Self::Output {
        RelationMask(self.0 | rhs.0)
    }
}

impl fmt::Display for RelationMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = [
            (Self::PAIRING, "pairing"),
            (Self::STACKING, "stacking"),
            (Self::ADJACENCY, "adjacency"),
        ].iter()
            .filter(|(m, _)| self.contains(*m))
            .map(|(_, n)| *n)
            .collect();
        if names.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", names.join("|"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_composition() {
        let m = RelationMask::PAIRING | RelationMask::ADJACENCY;
        assert!(m.accepts(InteractionKind::Pair));
        assert!(m.accepts(InteractionKind::Link));
        assert!(!m.accepts(InteractionKind::Stack));
        assert!(RelationMask::ALL.contains(m));
        assert!(!m.contains(RelationMask::ALL));
        assert!(RelationMask::NONE.is_empty());
        assert_eq!(m.to_string(), "pairing|adjacency");
        assert_eq!(RelationMask::NONE.to_string(), "none");
    }
}
