use ahash::AHashMap;
use ahash::AHashSet;
use log::warn;
use colored::*;
use nohash_hasher::IntMap;
use serde::{Serialize, Deserialize};

use crate::Base;
use crate::BaseInteraction;
use crate::InteractionKind;
use crate::Label;
use crate::PairAnnotation;
use crate::RelationMask;
use crate::ResId;
use crate::StructureError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Residue {
    pub label: Label,
    pub res_id: ResId,
    pub base: Base,
}

/// An immutable snapshot of residues and the typed relations between them.
///
/// Residues are iterated in graph-native order, i.e. sorted by `ResId`.
/// Labels are handed out by the builder and stay valid for every view
/// derived from this graph through `annotate` and `subgraph`.
#[derive(Debug, Clone)]
pub struct ResidueGraph {
    residues: Vec<Residue>,
    index: IntMap<Label, usize>,
    by_res_id: AHashMap<ResId, Label>,
    /// Keyed by the unordered label pair; records keep their stored orientation.
    edges: AHashMap<(Label, Label), Vec<BaseInteraction>>,
    adjacency: IntMap<Label, Vec<Label>>,
    mask: RelationMask,
}

fn key(a: Label, b: Label) -> (Label, Label) {
    if a <= b { (a, b) } else { (b, a) }
}

impl ResidueGraph {
    fn from_parts(
        mut residues: Vec<Residue>,
        interactions: impl IntoIterator<Item = BaseInteraction>,
        mask: RelationMask,
    ) -> Self {
        residues.sort_by_key(|r| r.res_id);
        let index = residues.iter().enumerate().map(|(i, r)| (r.label, i)).collect();
        let by_res_id = residues.iter().map(|r| (r.res_id, r.label)).collect();

        let mut edges: AHashMap<(Label, Label), Vec<BaseInteraction>> = AHashMap::new();
        let mut adjacency: IntMap<Label, Vec<Label>> = IntMap::default();
        for bi in interactions {
            let list = edges.entry(key(bi.first, bi.second)).or_default();
            if list.is_empty() {
                adjacency.entry(bi.first).or_default().push(bi.second);
                adjacency.entry(bi.second).or_default().push(bi.first);
            }
            list.push(bi);
        }
        for list in edges.values_mut() {
            list.sort();
        }
        for neighbors in adjacency.values_mut() {
            neighbors.sort_unstable();
        }
        Self { residues, index, by_res_id, edges, adjacency, mask }
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// The relation types this view carries.
    pub fn mask(&self) -> RelationMask {
        self.mask
    }

    /// Residues in graph-native order.
    pub fn residues(&self) -> impl Iterator<Item = &Residue> {
        self.residues.iter()
    }

    /// Labels in graph-native order.
    pub fn labels(&self) -> impl Iterator<Item = Label> + '_ {
        self.residues.iter().map(|r| r.label)
    }

    pub fn contains(&self, label: Label) -> bool {
        self.index.contains_key(&label)
    }

    pub fn residue(&self, label: Label) -> Result<&Residue, StructureError> {
        self.index.get(&label)
            .map(|&i| &self.residues[i])
            .ok_or(StructureError::UnknownLabel(label))
    }

    pub fn res_id(&self, label: Label) -> Result<ResId, StructureError> {
        self.residue(label).map(|r| r.res_id)
    }

    pub fn base(&self, label: Label) -> Result<Base, StructureError> {
        self.residue(label).map(|r| r.base)
    }

    pub fn label_of(&self, res_id: &ResId) -> Option<Label> {
        self.by_res_id.get(res_id).copied()
    }

    /// Position of a label in graph-native order.
    pub fn position(&self, label: Label) -> Option<usize> {
        self.index.get(&label).copied()
    }

    /// All relations between two residues, in their stored orientation.
    pub fn interactions_between(&self, a: Label, b: Label) -> &[BaseInteraction] {
        self.edges.get(&key(a, b)).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn has_interaction(&self, a: Label, b: Label, kind: InteractionKind) -> bool {
        self.interactions_between(a, b).iter().any(|bi| bi.kind == kind)
    }

    /// True if `a` is the 5' backbone neighbor of `b`.
    pub fn has_link(&self, a: Label, b: Label) -> bool {
        self.interactions_between(a, b).iter()
            .any(|bi| bi.is_link() && bi.first == a && bi.second == b)
    }

    pub fn neighbors(&self, label: Label, mask: RelationMask) -> Vec<Label> {
        self.adjacency.get(&label)
            .map(|all| all.iter()
                .copied()
                .filter(|&n| self.interactions_between(label, n).iter().any(|bi| mask.accepts(bi.kind)))
                .collect())
            .unwrap_or_default()
    }

    /// Number of neighbors joined to `label` by at least one relation of `kind`.
    pub fn degree(&self, label: Label, kind: InteractionKind) -> usize {
        self.neighbors(label, RelationMask::of(kind)).len()
    }

    /// Every relation accepted by `mask`, sorted by the interaction order.
    pub fn interactions(&self, mask: RelationMask) -> Vec<BaseInteraction> {
        let mut all: Vec<BaseInteraction> = self.edges.values()
            .flatten()
            .filter(|bi| mask.accepts(bi.kind))
            .copied()
            .collect();
        all.sort();
        all
    }

    /// A new view that carries only the relation types in `mask`.
    pub fn annotate(&self, mask: RelationMask) -> ResidueGraph {
        let kept = self.interactions(mask);
        Self::from_parts(self.residues.clone(), kept, mask)
    }

    /// The induced sub-graph over `labels`; labels are kept as they are.
    pub fn subgraph(&self, labels: &[Label]) -> Result<ResidueGraph, StructureError> {
        let mut residues = Vec::with_capacity(labels.len());
        let mut selection = AHashSet::with_capacity(labels.len());
        for &l in labels {
            if selection.insert(l) {
                residues.push(*self.residue(l)?);
            }
        }
        let kept: Vec<BaseInteraction> = self.edges.values()
            .flatten()
            .filter(|bi| selection.contains(&bi.first) && selection.contains(&bi.second))
            .copied()
            .collect();
        Ok(Self::from_parts(residues, kept, self.mask))
    }
}

/// Collects residues and relations into a `ResidueGraph`.
#[derive(Debug, Default)]
pub struct ResidueGraphBuilder {
    residues: Vec<Residue>,
    by_res_id: AHashMap<ResId, Label>,
    interactions: Vec<BaseInteraction>,
}

impl ResidueGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_residue(&mut self, res_id: ResId, base: Base) -> Result<Label, StructureError> {
        if self.by_res_id.contains_key(&res_id) {
            return Err(StructureError::DuplicateResidue(res_id));
        }
        let label = self.residues.len();
        self.residues.push(Residue { label, res_id, base });
        self.by_res_id.insert(res_id, label);
        Ok(label)
    }

    /// Adds a relation from `from` to `to`. Links must be given 5' -> 3'.
    pub fn add_interaction(&mut self,
        kind: InteractionKind,
        from: ResId,
        to: ResId,
        pairing: Option<PairAnnotation>,
    ) -> Result<(), StructureError> {
        if from == to {
            return Err(StructureError::SelfInteraction(from));
        }
        let first = *self.by_res_id.get(&from).ok_or(StructureError::UnknownResidue(from))?;
        let second = *self.by_res_id.get(&to).ok_or(StructureError::UnknownResidue(to))?;

        let mut bi = BaseInteraction::new(kind, first, from, second, to);
        if kind == InteractionKind::Pair {
            bi.pairing = pairing;
        }
        let duplicate = self.interactions.iter().any(|other| {
            other.kind == kind && (*other == bi || (kind != InteractionKind::Link && *other == bi.reversed()))
        });
        if duplicate {
            warn!("{} duplicate {} between {} and {} ignored", "WARNING:".red(), kind, from, to);
            return Ok(());
        }
        self.interactions.push(bi);
        Ok(())
    }

    pub fn add_pair(&mut self, from: ResId, to: ResId, pairing: PairAnnotation) -> Result<(), StructureError> {
        self.add_interaction(InteractionKind::Pair, from, to, Some(pairing))
    }

    pub fn add_stack(&mut self, from: ResId, to: ResId) -> Result<(), StructureError> {
        self.add_interaction(InteractionKind::Stack, from, to, None)
    }

    pub fn add_link(&mut self, from: ResId, to: ResId) -> Result<(), StructureError> {
        self.add_interaction(InteractionKind::Link, from, to, None)
    }

    /// Adds 5' -> 3' links between every pair of contiguous residues of a chain.
    pub fn link_contiguous(&mut self) -> Result<(), StructureError> {
        let mut ids: Vec<ResId> = self.residues.iter().map(|r| r.res_id).collect();
        ids.sort();
        for w in ids.windows(2) {
            if w[0].is_contiguous(&w[1]) {
                self.add_link(w[0], w[1])?;
            }
        }
        Ok(())
    }

    pub fn build(self) -> ResidueGraph {
        ResidueGraph::from_parts(self.residues, self.interactions, RelationMask::ALL)
    }
}
