use std::fmt;
use std::cmp::Ordering;

use serde::{Serialize, Deserialize};
use slotmap::new_key_type;

use mf_structure::BaseInteraction;
use mf_structure::ResId;

use crate::MotifError;

new_key_type! {
    /// Stable handle of a stem within one `SecondaryStructure`.
    pub struct StemId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Parallel,
    Antiparallel,
    /// Fewer than two pairs.
    Undefined,
}

/// The four residues where a stem attaches to the rest of the structure.
///
/// Front and back refer to the first and last pair in stem order, strand 1
/// is made of the `f_res_id` ends, strand 2 of the `r_res_id` ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConnectionPoint {
    Strand1Front,
    Strand1Back,
    Strand2Front,
    Strand2Back,
}

/// Lookup order of `Stem::connection`.
pub const CONNECTION_POINTS: [ConnectionPoint; 4] = [
    ConnectionPoint::Strand1Front,
    ConnectionPoint::Strand1Back,
    ConnectionPoint::Strand2Front,
    ConnectionPoint::Strand2Back,
];

impl fmt::Display for ConnectionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Strand1Front => "s1-front",
            Self::Strand1Back => "s1-back",
            Self::Strand2Front => "s2-front",
            Self::Strand2Back => "s2-back",
        };
        write!(f, "{s}")
    }
}

/// Backbone direction when leaving a stem: `Forward` is towards 3'.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
}

/// One attachment point of one stem, with the direction that leads away from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StemConnection {
    pub stem: StemId,
    pub point: ConnectionPoint,
    pub direction: Direction,
}

/// A maximal run of stacked, contiguous base pairs.
///
/// Every pair is stored with `f_res_id < r_res_id` and the `f_res_id` ends
/// are strictly increasing along the stem.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stem {
    pairs: Vec<BaseInteraction>,
}

fn step_orientation(a: &BaseInteraction, b: &BaseInteraction) -> Orientation {
    match (b.f_res_id.cmp(&a.f_res_id), b.r_res_id.cmp(&a.r_res_id)) {
        (Ordering::Greater, Ordering::Less) | (Ordering::Less, Ordering::Greater) => Orientation::Antiparallel,
        (Ordering::Greater, Ordering::Greater) | (Ordering::Less, Ordering::Less) => Orientation::Parallel,
        _ => Orientation::Undefined,
    }
}

impl Stem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pairs(&self) -> &[BaseInteraction] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn front(&self) -> Option<&BaseInteraction> {
        self.pairs.first()
    }

    pub fn back(&self) -> Option<&BaseInteraction> {
        self.pairs.last()
    }

    /// Fixed by the first two pairs.
    pub fn orientation(&self) -> Orientation {
        match self.pairs.as_slice() {
            [a, b, ..] => step_orientation(a, b),
            _ => Orientation::Undefined,
        }
    }

    /// Would `pair` (already ordered) extend this stem at its back?
    pub fn continues(&self, pair: &BaseInteraction) -> bool {
        let Some(last) = self.pairs.last() else {
            return true;
        };
        if !pair.is_pair() || pair.f_res_id <= last.f_res_id {
            return false;
        }
        if !last.f_res_id.is_contiguous(&pair.f_res_id) || !last.r_res_id.is_contiguous(&pair.r_res_id) {
            return false;
        }
        match (self.orientation(), step_orientation(last, pair)) {
            (_, Orientation::Undefined) => false,
            (Orientation::Undefined, _) => true,
            (current, step) => current == step,
        }
    }

    /// Append `pair` if it continues the stem. A rejected pair leaves the
    /// stem untouched.
    pub fn push_back(&mut self, pair: BaseInteraction) -> bool {
        let pair = pair.ordered();
        if !pair.is_pair() || !self.continues(&pair) {
            return false;
        }
        self.pairs.push(pair);
        true
    }

    pub fn contains(&self, res_id: &ResId) -> bool {
        self.pairs.iter().any(|p| p.f_res_id == *res_id || p.r_res_id == *res_id)
    }

    /// Residue paired with `res_id` inside this stem.
    pub fn partner(&self, res_id: &ResId) -> Option<ResId> {
        self.pairs.iter().find_map(|p| {
            if p.f_res_id == *res_id {
                Some(p.r_res_id)
            } else if p.r_res_id == *res_id {
                Some(p.f_res_id)
            } else {
                None
            }
        })
    }

    /// All residues, strand 1 in stem order followed by strand 2 in stem order.
    pub fn residues(&self) -> Vec<ResId> {
        self.pairs.iter().map(|p| p.f_res_id)
            .chain(self.pairs.iter().map(|p| p.r_res_id))
            .collect()
    }

    pub fn residue(&self, point: ConnectionPoint) -> Result<ResId, MotifError> {
        let (Some(front), Some(back)) = (self.pairs.first(), self.pairs.last()) else {
            return Err(MotifError::NoSuchElement(format!("{point} of an empty stem")));
        };
        Ok(match point {
            ConnectionPoint::Strand1Front => front.f_res_id,
            ConnectionPoint::Strand1Back => back.f_res_id,
            ConnectionPoint::Strand2Front => front.r_res_id,
            ConnectionPoint::Strand2Back => back.r_res_id,
        })
    }

    /// The first point in `CONNECTION_POINTS` order located at `res_id`.
    pub fn connection(&self, res_id: &ResId) -> Result<ConnectionPoint, MotifError> {
        for point in CONNECTION_POINTS {
            if self.residue(point)? == *res_id {
                return Ok(point);
            }
        }
        Err(MotifError::NoSuchElement(format!("{res_id} is not a connection point of the stem")))
    }

    /// Direction that leads away from the stem at `point`.
    pub fn direction(&self, point: ConnectionPoint) -> Direction {
        let parallel = self.orientation() == Orientation::Parallel;
        match point {
            ConnectionPoint::Strand1Front => Direction::Backward,
            ConnectionPoint::Strand1Back => Direction::Forward,
            ConnectionPoint::Strand2Front if parallel => Direction::Backward,
            ConnectionPoint::Strand2Front => Direction::Forward,
            ConnectionPoint::Strand2Back if parallel => Direction::Forward,
            ConnectionPoint::Strand2Back => Direction::Backward,
        }
    }

    /// Lowest and highest residue of the stem.
    pub fn span(&self) -> Option<(ResId, ResId)> {
        let front = self.pairs.first()?;
        let hi = self.pairs.iter().map(|p| p.r_res_id).max()?;
        Some((front.f_res_id, hi))
    }

    /// Lowest and highest residue of each strand.
    pub fn strands(&self) -> Option<((ResId, ResId), (ResId, ResId))> {
        let (front, back) = (self.pairs.first()?, self.pairs.last()?);
        let s2 = if front.r_res_id <= back.r_res_id {
            (front.r_res_id, back.r_res_id)
        } else {
            (back.r_res_id, front.r_res_id)
        };
        Some(((front.f_res_id, back.f_res_id), s2))
    }

    /// True if the spans of both stems interleave. Nested or disjoint
    /// stems do not form a pseudoknot; the relation is symmetric.
    pub fn pseudoknots(&self, other: &Stem) -> bool {
        let (Some((a_lo, a_hi)), Some((b_lo, b_hi))) = (self.span(), other.span()) else {
            return false;
        };
        (a_lo < b_lo && b_lo < a_hi && a_hi < b_hi) || (b_lo < a_lo && a_lo < b_hi && b_hi < a_hi)
    }
}

impl fmt::Display for Stem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.pairs.first(), self.pairs.last()) {
            (Some(front), Some(back)) => write!(f, "{}-{} / {}-{} ({} bp, {:?})",
                front.f_res_id, back.f_res_id, front.r_res_id, back.r_res_id,
                self.len(), self.orientation()),
            _ => write!(f, "empty stem"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mf_structure::PairAnnotation;

    fn bp(i: i32, j: i32) -> BaseInteraction {
        BaseInteraction::pair(i as usize, ResId::new('A', i), j as usize, ResId::new('A', j),
            PairAnnotation::watson_crick())
    }

    fn r(n: i32) -> ResId {
        ResId::new('A', n)
    }

    #[test]
    fn test_push_back_antiparallel() {
        let mut stem = Stem::new();
        assert!(stem.push_back(bp(1, 10)));
        assert_eq!(stem.orientation(), Orientation::Undefined);
        assert!(stem.push_back(bp(9, 2)));
        assert_eq!(stem.orientation(), Orientation::Antiparallel);
        assert!(stem.push_back(bp(3, 8)));
        assert_eq!(stem.len(), 3);
        // stored ordered
        assert_eq!(stem.pairs()[1].f_res_id, r(2));
    }

    #[test]
    fn test_push_back_rejects() {
        let mut stem = Stem::new();
        stem.push_back(bp(1, 10));
        stem.push_back(bp(2, 9));
        let before = stem.clone();
        // gap on strand 1
        assert!(!stem.push_back(bp(4, 8)));
        // not strictly increasing
        assert!(!stem.push_back(bp(2, 9)));
        // parallel step in an antiparallel stem
        assert!(!stem.push_back(bp(3, 10)));
        assert_eq!(stem, before);
    }

    #[test]
    fn test_parallel_stem() {
        let mut stem = Stem::new();
        assert!(stem.push_back(bp(1, 11)));
        assert!(stem.push_back(bp(2, 12)));
        assert_eq!(stem.orientation(), Orientation::Parallel);
        assert_eq!(stem.direction(ConnectionPoint::Strand2Front), Direction::Backward);
        assert_eq!(stem.direction(ConnectionPoint::Strand2Back), Direction::Forward);
    }

    #[test]
    fn test_connection_points() {
        let mut stem = Stem::new();
        for (i, j) in [(1, 10), (2, 9), (3, 8)] {
            stem.push_back(bp(i, j));
        }
        assert_eq!(stem.residue(ConnectionPoint::Strand1Front).unwrap(), r(1));
        assert_eq!(stem.residue(ConnectionPoint::Strand1Back).unwrap(), r(3));
        assert_eq!(stem.residue(ConnectionPoint::Strand2Front).unwrap(), r(10));
        assert_eq!(stem.residue(ConnectionPoint::Strand2Back).unwrap(), r(8));
        assert_eq!(stem.connection(&r(8)).unwrap(), ConnectionPoint::Strand2Back);
        assert!(matches!(stem.connection(&r(2)), Err(MotifError::NoSuchElement(_))));
        assert_eq!(stem.direction(ConnectionPoint::Strand1Front), Direction::Backward);
        assert_eq!(stem.direction(ConnectionPoint::Strand1Back), Direction::Forward);
        assert_eq!(stem.direction(ConnectionPoint::Strand2Front), Direction::Forward);
        assert_eq!(stem.direction(ConnectionPoint::Strand2Back), Direction::Backward);
        assert_eq!(stem.strands(), Some(((r(1), r(3)), (r(8), r(10)))));
        assert_eq!(stem.partner(&r(9)), Some(r(2)));
    }

    #[test]
    fn test_empty_stem_residue() {
        let stem = Stem::new();
        assert!(matches!(stem.residue(ConnectionPoint::Strand1Front), Err(MotifError::NoSuchElement(_))));
        assert!(stem.span().is_none());
    }

    #[test]
    fn test_single_pair_connection_order() {
        let mut stem = Stem::new();
        stem.push_back(bp(4, 7));
        // front and back coincide, the front is reported first
        assert_eq!(stem.connection(&r(4)).unwrap(), ConnectionPoint::Strand1Front);
        assert_eq!(stem.connection(&r(7)).unwrap(), ConnectionPoint::Strand2Front);
    }

    #[test]
    fn test_pseudoknots() {
        let stem = |pairs: &[(i32, i32)]| {
            let mut s = Stem::new();
            for &(i, j) in pairs {
                assert!(s.push_back(bp(i, j)));
            }
            s
        };
        let a = stem(&[(1, 10), (2, 9)]);
        let b = stem(&[(3, 12), (4, 11)]);
        let nested = stem(&[(4, 8), (5, 7)]);
        let disjoint = stem(&[(20, 30), (21, 29)]);
        assert!(a.pseudoknots(&b));
        assert!(b.pseudoknots(&a));
        assert!(!a.pseudoknots(&nested));
        assert!(!nested.pseudoknots(&a));
        assert!(!a.pseudoknots(&disjoint));
        assert!(!a.pseudoknots(&Stem::new()));
    }

    #[test]
    fn test_pseudoknots_symmetric_random() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(42);
        let mut random_stem = || {
            let len = rng.random_range(1..5);
            let i = rng.random_range(1..60);
            let j = i + 2 * len + rng.random_range(0..30);
            let mut s = Stem::new();
            for t in 0..len {
                assert!(s.push_back(bp(i + t, j - t)));
            }
            (s, i, j)
        };
        for _ in 0..200 {
            let (a, ai, aj) = random_stem();
            let (b, bi, bj) = random_stem();
            let crossing = (ai < bi && bi < aj && aj < bj) || (bi < ai && ai < bj && bj < aj);
            assert_eq!(a.pseudoknots(&b), b.pseudoknots(&a));
            assert_eq!(a.pseudoknots(&b), crossing);
        }
    }
}
