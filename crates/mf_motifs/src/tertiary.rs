//! Interactions no cycle explains, grouped into connected components.

use std::fmt;
use ahash::AHashSet;
use log::debug;

use mf_structure::BaseInteraction;
use mf_structure::InteractionKind;
use mf_structure::Label;
use mf_structure::RelationMask;
use mf_structure::ResId;
use mf_structure::ResidueGraph;

use crate::Cycle;
use crate::MotifError;
use crate::UnionFind;

/// One connected component of residual pairing and stacking.
#[derive(Debug, Clone)]
pub struct TertiaryStructure {
    labels: Vec<Label>,
    residues: Vec<ResId>,
    interactions: Vec<BaseInteraction>,
    cycles: Vec<usize>,
    graph: ResidueGraph,
}

impl TertiaryStructure {
    /// Labels in graph-native order.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn residues(&self) -> &[ResId] {
        &self.residues
    }

    /// The residual interactions forming this component.
    pub fn interactions(&self) -> &[BaseInteraction] {
        &self.interactions
    }

    /// Indices of the cycles sharing at least one residue with the component.
    pub fn cycles(&self) -> &[usize] {
        &self.cycles
    }

    /// Induced sub-graph over the component's residues.
    pub fn graph(&self) -> &ResidueGraph {
        &self.graph
    }
}

impl fmt::Display for TertiaryStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} residues, {} interaction(s): {}", self.residues.len(), self.interactions.len(),
            self.interactions.iter().map(|bi| bi.to_string()).collect::<Vec<_>>().join(", "))
    }
}

/// Two tertiary structures touching the same cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TertiaryConnection {
    pub first: usize,
    pub second: usize,
    pub cycle: usize,
}

#[derive(Debug, Clone, Default)]
pub struct TertiaryAggregate {
    pub structures: Vec<TertiaryStructure>,
    pub connections: Vec<TertiaryConnection>,
}

impl TertiaryAggregate {
    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }
}

/// Group the pairing and stacking of `graph` that no cycle carries.
///
/// Interactions are matched by label pair and kind, so `cycles` must come
/// from views of `graph`.
pub fn aggregate(graph: &ResidueGraph, cycles: &[Cycle]) -> Result<TertiaryAggregate, MotifError> {
    let explained: AHashSet<((Label, Label), InteractionKind)> = cycles.iter()
        .flat_map(|c| c.interactions())
        .map(|bi| (bi.label_key(), bi.kind))
        .collect();
    let residual: Vec<BaseInteraction> = graph.interactions(RelationMask::PAIRING | RelationMask::STACKING)
        .into_iter()
        .filter(|bi| !explained.contains(&(bi.label_key(), bi.kind)))
        .collect();
    debug!("{} residual interaction(s) outside of {} cycle(s)", residual.len(), cycles.len());

    let labels: Vec<Label> = graph.labels().collect();
    let mut uf = UnionFind::new(labels.len());
    let mut touched = Vec::with_capacity(2 * residual.len());
    for bi in &residual {
        if let (Some(a), Some(b)) = (graph.position(bi.first), graph.position(bi.second)) {
            uf.union(a, b);
            touched.extend([a, b]);
        }
    }

    let mut structures = Vec::new();
    for group in uf.groups(&touched) {
        let members: Vec<Label> = group.iter().map(|&p| labels[p]).collect();
        let set: AHashSet<Label> = members.iter().copied().collect();
        let interactions: Vec<BaseInteraction> = residual.iter()
            .filter(|bi| set.contains(&bi.first))
            .copied()
            .collect();
        let cycle_ids = cycles.iter()
            .enumerate()
            .filter(|(_, c)| c.labels().iter().any(|l| set.contains(l)))
            .map(|(i, _)| i)
            .collect();
        let residues = members.iter()
            .map(|&l| graph.res_id(l))
            .collect::<Result<Vec<_>, _>>()?;
        structures.push(TertiaryStructure {
            graph: graph.subgraph(&members)?,
            labels: members,
            residues,
            interactions,
            cycles: cycle_ids,
        });
    }

    let mut connections = Vec::new();
    for cycle in 0..cycles.len() {
        let touching: Vec<usize> = structures.iter()
            .enumerate()
            .filter(|(_, ts)| ts.cycles.contains(&cycle))
            .map(|(i, _)| i)
            .collect();
        for (k, &first) in touching.iter().enumerate() {
            for &second in &touching[k + 1..] {
                connections.push(TertiaryConnection { first, second, cycle });
            }
        }
    }
    Ok(TertiaryAggregate { structures, connections })
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

    fn label(g: &ResidueGraph, n: i32) -> Label {
        g.label_of(&r(n)).unwrap()
    }

    /// Two hairpins (1..6 and 11..16) with a kissing pair 3-13 and a stack 4-14.
    fn kissing() -> ResidueGraph {
        let mut b = ResidueGraphBuilder::new();
        for i in 1..=16 {
            b.add_residue(r(i), Base::N).unwrap();
        }
        b.link_contiguous().unwrap();
        b.add_pair(r(1), r(6), PairAnnotation::watson_crick()).unwrap();
        b.add_pair(r(11), r(16), PairAnnotation::watson_crick()).unwrap();
        b.add_pair(r(3), r(13), PairAnnotation::watson_crick()).unwrap();
        b.add_stack(r(4), r(14)).unwrap();
        b.build()
    }

    fn hairpin_cycles(g: &ResidueGraph) -> Vec<Cycle> {
        [(1..=6), (11..=16)].into_iter()
            .map(|range| {
                let sel: Vec<Label> = range.map(|i| label(g, i)).collect();
                Cycle::new(g, &sel, RelationMask::ALL).unwrap()
            })
            .collect()
    }

    #[test]
    fn test_residual_component() {
        let g = kissing();
        let cycles = hairpin_cycles(&g);
        let agg = aggregate(&g, &cycles).unwrap();
        assert_eq!(agg.structures.len(), 2);
        let residues: Vec<&[ResId]> = agg.structures.iter().map(|ts| ts.residues()).collect();
        assert_eq!(residues, vec![&[r(3), r(13)][..], &[r(4), r(14)][..]]);
        assert_eq!(agg.structures[0].cycles(), &[0, 1]);
        // both structures touch both hairpins
        assert_eq!(agg.connections, vec![
            TertiaryConnection { first: 0, second: 1, cycle: 0 },
            TertiaryConnection { first: 0, second: 1, cycle: 1 },
        ]);
        assert_eq!(agg.structures[1].graph().len(), 2);
    }

    #[test]
    fn test_components_merge() {
        let g = kissing();
        let mut b = ResidueGraphBuilder::new();
        for res in g.residues() {
            b.add_residue(res.res_id, res.base).unwrap();
        }
        b.link_contiguous().unwrap();
        for bi in g.interactions(RelationMask::PAIRING | RelationMask::STACKING) {
            b.add_interaction(bi.kind, bi.f_res_id, bi.r_res_id, bi.pairing).unwrap();
        }
        b.add_stack(r(3), r(4)).unwrap();
        let g = b.build();
        let agg = aggregate(&g, &hairpin_cycles(&g)).unwrap();
        // 3-4 is carried by the first hairpin cycle and does not join the components
        assert_eq!(agg.structures.len(), 2);

        let agg = aggregate(&g, &[]).unwrap();
        // without cycles, everything but the backbone is residual
        assert_eq!(agg.structures.len(), 3);
        assert_eq!(agg.structures[1].residues(), &[r(3), r(4), r(13), r(14)]);
        assert!(agg.connections.is_empty());
    }

    #[test]
    fn test_fully_explained() {
        let mut b = ResidueGraphBuilder::new();
        for i in 1..=4 {
            b.add_residue(r(i), Base::N).unwrap();
        }
        b.link_contiguous().unwrap();
        b.add_pair(r(1), r(4), PairAnnotation::watson_crick()).unwrap();
        let g = b.build();
        let all: Vec<Label> = g.labels().collect();
        let cycle = Cycle::new(&g, &all, RelationMask::ALL).unwrap();
        assert!(aggregate(&g, &[cycle]).unwrap().is_empty());
    }
}
