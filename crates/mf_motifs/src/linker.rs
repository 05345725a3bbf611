use std::fmt;

use mf_structure::ResId;

use crate::StemConnection;
use crate::StemId;

/// Either end of an adjacency test.
#[derive(Clone, Copy, Debug)]
pub enum StructureRef<'a> {
    Stem(StemId),
    Linker(&'a Linker),
}

/// A run of backbone-contiguous residues between two stem connection
/// points, or between a stem and a free chain end.
///
/// The boundary residues belong to the stems at either end; a linker made
/// of its two boundary residues only is empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Linker {
    residues: Vec<ResId>,
    front: Option<StemConnection>,
    back: Option<StemConnection>,
}

impl Linker {
    pub fn new(residues: Vec<ResId>, front: Option<StemConnection>, back: Option<StemConnection>) -> Self {
        Self { residues, front, back }
    }

    pub fn residues(&self) -> &[ResId] {
        &self.residues
    }

    pub fn front(&self) -> Option<StemConnection> {
        self.front
    }

    pub fn back(&self) -> Option<StemConnection> {
        self.back
    }

    pub fn front_residue(&self) -> Option<ResId> {
        self.residues.first().copied()
    }

    pub fn back_residue(&self) -> Option<ResId> {
        self.residues.last().copied()
    }

    /// Residues strictly between the boundary residues.
    pub fn unpaired(&self) -> &[ResId] {
        match self.residues.len() {
            0..=2 => &[],
            n => &self.residues[1..n - 1],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.residues.len() <= 2
    }

    /// Both ends attach to a stem.
    pub fn is_closed(&self) -> bool {
        self.front.is_some() && self.back.is_some()
    }

    /// Reverse the residues; the connections swap in lockstep.
    pub fn reverse(&mut self) {
        self.residues.reverse();
        std::mem::swap(&mut self.front, &mut self.back);
    }

    /// Reverse if necessary such that residues run 5' to 3'.
    pub fn order(&mut self) {
        if let (Some(f), Some(b)) = (self.front_residue(), self.back_residue()) {
            if f > b {
                self.reverse();
            }
        }
    }

    pub fn is_adjacent(&self, other: StructureRef<'_>) -> bool {
        match other {
            StructureRef::Stem(id) => [self.front, self.back].iter()
                .flatten()
                .any(|c| c.stem == id),
            StructureRef::Linker(l) => self.connects(l),
        }
    }

    /// Two linkers connect if they share a boundary residue or attach to the
    /// same connection point of the same stem.
    pub fn connects(&self, other: &Linker) -> bool {
        let ends = |l: &Linker| [l.front_residue(), l.back_residue()];
        let shared_residue = ends(self).iter().flatten()
            .any(|r| ends(other).iter().flatten().any(|o| o == r));
        let shared_point = [self.front, self.back].iter().flatten()
            .any(|c| [other.front, other.back].iter().flatten()
                .any(|o| o.stem == c.stem && o.point == c.point));
        shared_residue || shared_point
    }
}

impl fmt::Display for Linker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.front_residue(), self.back_residue()) {
            (Some(a), Some(b)) => write!(f, "{}..{} ({} unpaired)", a, b, self.unpaired().len()),
            _ => write!(f, "empty linker"),
        }
    }
}
