use std::fmt;
use std::cmp::Ordering;
use colored::*;
use serde::{Serialize, Deserialize};

use mf_structure::BaseInteraction;
use mf_structure::InteractionKind;
use mf_structure::Label;
use mf_structure::RelationMask;
use mf_structure::ResId;
use mf_structure::ResidueGraph;
use mf_isomorphism::are_isomorphic;

use crate::Anomaly;
use crate::MotifError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CycleKind {
    /// One backbone segment closed by a pair.
    Loop,
    /// Two dinucleotide segments: one step of a stem.
    Helix,
    InternalLoop,
    Multibranch,
    /// Closed by stacking, or without any non-backbone step.
    Composite,
}

impl fmt::Display for CycleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Loop => "loop",
            Self::Helix => "helix",
            Self::InternalLoop => "internal-loop",
            Self::Multibranch => "multibranch",
            Self::Composite => "composite",
        };
        write!(f, "{s}")
    }
}

/// A closed walk over residues of a graph view, carrying every relation
/// between consecutive residues of the walk.
///
/// The walk wraps from the last residue back to the first. The cycle owns
/// its masked sub-graph view, which keeps the labels of the graph it was
/// taken from.
#[derive(Debug, Clone)]
pub struct Cycle {
    labels: Vec<Label>,
    residues: Vec<ResId>,
    interactions: Vec<BaseInteraction>,
    graph: ResidueGraph,
    diagnostics: Vec<Anomaly>,
}

impl Cycle {
    /// Walk `selection` in graph-native order.
    pub fn new(graph: &ResidueGraph, selection: &[Label], mask: RelationMask) -> Result<Self, MotifError> {
        let view = graph.annotate(mask).subgraph(selection)?;
        let labels: Vec<Label> = view.labels().collect();
        Self::from_view(view, labels)
    }

    /// Walk the labels in the given order; repeated labels are visited once.
    pub fn from_walk(graph: &ResidueGraph, walk: &[Label], mask: RelationMask) -> Result<Self, MotifError> {
        let view = graph.annotate(mask).subgraph(walk)?;
        let mut labels: Vec<Label> = Vec::with_capacity(walk.len());
        for &l in walk {
            if !labels.contains(&l) {
                labels.push(l);
            }
        }
        Self::from_view(view, labels)
    }

    fn from_view(view: ResidueGraph, labels: Vec<Label>) -> Result<Self, MotifError> {
        let residues = labels.iter()
            .map(|&l| view.res_id(l))
            .collect::<Result<Vec<_>, _>>()?;

        let n = labels.len();
        // two residues share a single step
        let steps = if n > 2 { n } else { n.saturating_sub(1) };
        let mut interactions = Vec::new();
        let mut diagnostics = Vec::new();
        for i in 0..steps {
            let k = (i + 1) % n;
            let found = view.interactions_between(labels[i], labels[k]);
            if found.is_empty() {
                Anomaly::MissingInteraction { from: residues[i], to: residues[k] }.report(&mut diagnostics);
            }
            interactions.extend_from_slice(found);
        }
        interactions.sort();
        interactions.dedup();
        Ok(Self { labels, residues, interactions, graph: view, diagnostics })
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn residues(&self) -> &[ResId] {
        &self.residues
    }

    /// Sorted and without duplicates.
    pub fn interactions(&self) -> &[BaseInteraction] {
        &self.interactions
    }

    pub fn graph(&self) -> &ResidueGraph {
        &self.graph
    }

    pub fn diagnostics(&self) -> &[Anomaly] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn contains(&self, label: Label) -> bool {
        self.graph.contains(label)
    }

    pub fn count(&self, kind: InteractionKind) -> usize {
        self.interactions.iter().filter(|bi| bi.kind == kind).count()
    }

    /// Distinct relation kinds present in the cycle.
    pub fn kinds(&self) -> Vec<InteractionKind> {
        let mut kinds: Vec<InteractionKind> = self.interactions.iter().map(|bi| bi.kind).collect();
        kinds.sort();
        kinds.dedup();
        kinds
    }

    /// True if both cycles carry a common interaction. Only meaningful for
    /// cycles taken from label-compatible graphs.
    pub fn share_interactions(&self, other: &Cycle) -> bool {
        let (a, b) = (&self.interactions, &other.interactions);
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            match a[i].cmp(&b[j]) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal if a[i] == b[j] => return true,
                Ordering::Equal => {
                    i += 1;
                    j += 1;
                }
            }
        }
        false
    }

    fn is_backbone_step(&self, i: usize) -> bool {
        let (a, b) = (self.labels[i], self.labels[(i + 1) % self.labels.len()]);
        self.graph.has_link(a, b) || self.graph.has_link(b, a)
    }

    /// Lengths of the backbone segments in walk order, starting with the
    /// first segment that begins inside the walk.
    pub fn profile(&self) -> Vec<usize> {
        let n = self.labels.len();
        if n < 2 {
            return vec![n];
        }
        let Some(cut) = (0..n).find(|&i| !self.is_backbone_step(i)) else {
            return vec![n];
        };
        let mut segments: Vec<(usize, usize)> = Vec::new();
        let (mut start, mut len) = ((cut + 1) % n, 0);
        for k in 1..=n {
            let i = (cut + k) % n;
            len += 1;
            if !self.is_backbone_step(i) {
                segments.push((start, len));
                start = (i + 1) % n;
                len = 0;
            }
        }
        segments.sort_unstable();
        segments.into_iter().map(|(_, len)| len).collect()
    }

    pub fn kind(&self) -> CycleKind {
        let n = self.labels.len();
        let closed_by_pairs = (0..n)
            .filter(|&i| !self.is_backbone_step(i))
            .all(|i| self.graph.has_interaction(self.labels[i], self.labels[(i + 1) % n], InteractionKind::Pair));
        let profile = self.profile();
        if n < 2 || !closed_by_pairs || !(0..n).any(|i| !self.is_backbone_step(i)) {
            return CycleKind::Composite;
        }
        match profile.as_slice() {
            [_] => CycleKind::Loop,
            [2, 2] => CycleKind::Helix,
            [_, _] => CycleKind::InternalLoop,
            _ => CycleKind::Multibranch,
        }
    }

    /// Same relation structure and residue types.
    pub fn is_isomorphic(&self, other: &Cycle) -> bool {
        are_isomorphic(&self.graph, &other.graph)
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let profile = self.profile().iter().map(|l| l.to_string()).collect::<Vec<_>>().join("_");
        match (self.residues.first(), self.residues.last()) {
            (Some(a), Some(b)) => write!(f, "{:<13} {:<9} {}..{} ({} residues)",
                self.kind().to_string().cyan(), profile, a, b, self.len()),
            _ => write!(f, "{:<13} empty", self.kind().to_string().cyan()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mf_structure::Base;
    use mf_structure::PairAnnotation;
    use mf_structure::ResidueGraphBuilder;

    fn r(n: i32) -> ResId {
        ResId::new('A', n)
    }

    /// Residues 1..=len, linked, with the given pairs and stacks.
    fn graph(len: i32, pairs: &[(i32, i32)], stacks: &[(i32, i32)]) -> ResidueGraph {
        let mut b = ResidueGraphBuilder::new();
        for i in 1..=len {
            b.add_residue(r(i), Base::N).unwrap();
        }
        b.link_contiguous().unwrap();
        for &(i, j) in pairs {
            b.add_pair(r(i), r(j), PairAnnotation::watson_crick()).unwrap();
        }
        for &(i, j) in stacks {
            b.add_stack(r(i), r(j)).unwrap();
        }
        b.build()
    }

    fn labels(g: &ResidueGraph, ids: &[i32]) -> Vec<Label> {
        ids.iter().map(|&i| g.label_of(&r(i)).unwrap()).collect()
    }

    #[test]
    fn test_loop_cycle() {
        let g = graph(6, &[(1, 6)], &[]);
        let c = Cycle::new(&g, &labels(&g, &[1, 2, 3, 4, 5, 6]), RelationMask::ALL).unwrap();
        assert_eq!(c.len(), 6);
        assert_eq!(c.count(InteractionKind::Link), 5);
        assert_eq!(c.count(InteractionKind::Pair), 1);
        assert_eq!(c.profile(), vec![6]);
        assert_eq!(c.kind(), CycleKind::Loop);
        assert!(c.diagnostics().is_empty());
    }

    #[test]
    fn test_helix_step() {
        let g = graph(10, &[(1, 10), (2, 9)], &[]);
        let c = Cycle::new(&g, &labels(&g, &[1, 2, 9, 10]), RelationMask::ALL).unwrap();
        assert_eq!(c.profile(), vec![2, 2]);
        assert_eq!(c.kind(), CycleKind::Helix);
        assert_eq!(c.kinds(), vec![InteractionKind::Pair, InteractionKind::Link]);
    }

    #[test]
    fn test_parallel_helix_step_walk() {
        // parallel pairs (1,5) (2,6)
        let g = graph(6, &[(1, 5), (2, 6)], &[]);
        let native = Cycle::new(&g, &labels(&g, &[1, 2, 6, 5]), RelationMask::ALL).unwrap();
        assert_eq!(native.kind(), CycleKind::Composite);
        assert_eq!(native.diagnostics().len(), 2);

        let c = Cycle::from_walk(&g, &labels(&g, &[1, 2, 6, 5]), RelationMask::ALL).unwrap();
        assert_eq!(c.residues(), &[r(1), r(2), r(6), r(5)]);
        assert!(c.diagnostics().is_empty());
        assert_eq!(c.profile(), vec![2, 2]);
        assert_eq!(c.kind(), CycleKind::Helix);
        assert_eq!(c.count(InteractionKind::Pair), 2);
    }

    #[test]
    fn test_walk_repeats_visited_once() {
        let g = graph(4, &[(1, 4)], &[]);
        let c = Cycle::from_walk(&g, &labels(&g, &[2, 3, 4, 1, 2]), RelationMask::ALL).unwrap();
        assert_eq!(c.residues(), &[r(2), r(3), r(4), r(1)]);
        assert_eq!(c.kind(), CycleKind::Loop);
        assert!(c.diagnostics().is_empty());
    }

    #[test]
    fn test_internal_loop_profile() {
        let g = graph(12, &[(2, 11), (4, 8)], &[]);
        let c = Cycle::new(&g, &labels(&g, &[2, 3, 4, 8, 9, 10, 11]), RelationMask::ALL).unwrap();
        assert_eq!(c.profile(), vec![3, 4]);
        assert_eq!(c.kind(), CycleKind::InternalLoop);
    }

    #[test]
    fn test_stack_closed_cycle_is_composite() {
        let g = graph(4, &[], &[(1, 4)]);
        let c = Cycle::new(&g, &labels(&g, &[1, 2, 3, 4]), RelationMask::ALL).unwrap();
        assert_eq!(c.kind(), CycleKind::Composite);
    }

    #[test]
    fn test_missing_interaction_reported() {
        let g = graph(6, &[(1, 6)], &[]);
        // 3 -> 5 is not linked
        let c = Cycle::new(&g, &labels(&g, &[1, 2, 3, 5, 6]), RelationMask::ALL).unwrap();
        assert_eq!(c.diagnostics(), &[Anomaly::MissingInteraction { from: r(3), to: r(5) }]);
    }

    #[test]
    fn test_mask_restricts_relations() {
        let g = graph(4, &[(1, 4)], &[(2, 3)]);
        let all = Cycle::new(&g, &labels(&g, &[1, 2, 3, 4]), RelationMask::ALL).unwrap();
        assert_eq!(all.count(InteractionKind::Stack), 1);
        let mask = RelationMask::PAIRING | RelationMask::ADJACENCY;
        let no_stacks = Cycle::new(&g, &labels(&g, &[1, 2, 3, 4]), mask).unwrap();
        assert_eq!(no_stacks.count(InteractionKind::Stack), 0);
        assert_eq!(no_stacks.graph().mask(), mask);
    }

    #[test]
    fn test_share_interactions() {
        let g = graph(10, &[(1, 10), (2, 9), (3, 8)], &[]);
        let a = Cycle::new(&g, &labels(&g, &[1, 2, 9, 10]), RelationMask::ALL).unwrap();
        let b = Cycle::new(&g, &labels(&g, &[2, 3, 8, 9]), RelationMask::ALL).unwrap();
        let c = Cycle::new(&g, &labels(&g, &[3, 4, 5, 6, 7, 8]), RelationMask::ALL).unwrap();
        // pair 2-9
        assert!(a.share_interactions(&b));
        assert!(b.share_interactions(&c));
        assert!(!a.share_interactions(&c));
    }

    #[test]
    fn test_isomorphic_cycles() {
        let g = graph(10, &[(1, 10), (2, 9), (3, 8)], &[]);
        let a = Cycle::new(&g, &labels(&g, &[1, 2, 9, 10]), RelationMask::ALL).unwrap();
        let b = Cycle::new(&g, &labels(&g, &[2, 3, 8, 9]), RelationMask::ALL).unwrap();
        let c = Cycle::new(&g, &labels(&g, &[3, 4, 5, 6, 7, 8]), RelationMask::ALL).unwrap();
        assert!(a.is_isomorphic(&b));
        assert!(!a.is_isomorphic(&c));
    }

    #[test]
    fn test_unknown_label() {
        let g = graph(4, &[(1, 4)], &[]);
        assert!(matches!(Cycle::new(&g, &[0, 1, 99], RelationMask::ALL), Err(MotifError::Structure(_))));
    }
}
