use std::fmt;
use colored::*;
use serde::{Serialize, Deserialize};

use mf_structure::ResId;

use crate::Linker;
use crate::StemId;
use crate::StructureRef;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopKind {
    Hairpin,
    Internal,
    Multibranch,
    /// Reaches a free chain end.
    Open,
}

/// An ordered sequence of linkers, each continuing across a base pair
/// from where the previous one ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Loop {
    linkers: Vec<Linker>,
    closed: bool,
}

impl Loop {
    pub fn new(linkers: Vec<Linker>, closed: bool) -> Self {
        Self { linkers, closed }
    }

    pub fn linkers(&self) -> &[Linker] {
        &self.linkers
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn kind(&self) -> LoopKind {
        if !self.closed {
            return LoopKind::Open;
        }
        match self.linkers.len() {
            0 | 1 => LoopKind::Hairpin,
            2 => LoopKind::Internal,
            _ => LoopKind::Multibranch,
        }
    }

    pub fn is_adjacent(&self, other: StructureRef<'_>) -> bool {
        self.linkers.iter().any(|l| l.is_adjacent(other))
    }

    /// Stems the loop touches, in walk order without repetition.
    pub fn stems(&self) -> Vec<StemId> {
        let mut stems = Vec::new();
        for conn in self.linkers.iter().flat_map(|l| [l.front(), l.back()]).flatten() {
            if !stems.contains(&conn.stem) {
                stems.push(conn.stem);
            }
        }
        stems
    }

    /// Residues in walk order.
    pub fn residues(&self) -> Vec<ResId> {
        self.linkers.iter().flat_map(|l| l.residues().iter().copied()).collect()
    }

    pub fn unpaired_count(&self) -> usize {
        self.linkers.iter().map(|l| l.unpaired().len()).sum()
    }
}

impl fmt::Display for Loop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.kind() {
            LoopKind::Hairpin => "Hairpin".cyan(),
            LoopKind::Internal => "Internal".cyan(),
            LoopKind::Multibranch => "Multibr.".cyan().bold(),
            LoopKind::Open => "Open".cyan().bold(),
        };
        write!(f, "{:<8} {}", name, self.linkers.iter()
            .map(|l| format!("[{l}]"))
            .collect::<Vec<_>>()
            .join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConnectionPoint;
    use crate::Direction;
    use crate::StemConnection;
    use slotmap::SlotMap;

    fn r(n: i32) -> ResId {
        ResId::new('A', n)
    }

    #[test]
    fn test_loop_kinds() {
        let mut map: SlotMap<StemId, ()> = SlotMap::with_key();
        let (a, b) = (map.insert(()), map.insert(()));
        let c = |stem, point| Some(StemConnection { stem, point, direction: Direction::Forward });

        let hairpin = Loop::new(vec![
            Linker::new((3..=8).map(r).collect(),
                c(a, ConnectionPoint::Strand1Back), c(a, ConnectionPoint::Strand2Back)),
        ], true);
        assert_eq!(hairpin.kind(), LoopKind::Hairpin);
        assert_eq!(hairpin.stems(), vec![a]);
        assert_eq!(hairpin.unpaired_count(), 4);

        let internal = Loop::new(vec![
            Linker::new(vec![r(3), r(4), r(5)], c(a, ConnectionPoint::Strand1Back), c(b, ConnectionPoint::Strand1Front)),
            Linker::new(vec![r(12), r(13), r(14)], c(b, ConnectionPoint::Strand2Front), c(a, ConnectionPoint::Strand2Back)),
        ], true);
        assert_eq!(internal.kind(), LoopKind::Internal);
        assert_eq!(internal.stems(), vec![a, b]);
        assert!(internal.is_adjacent(StructureRef::Stem(b)));
        assert_eq!(internal.residues().len(), 6);

        let open = Loop::new(vec![Linker::new(vec![r(1), r(2)], None, c(a, ConnectionPoint::Strand1Front))], false);
        assert_eq!(open.kind(), LoopKind::Open);
    }
}
