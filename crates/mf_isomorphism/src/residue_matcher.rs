use log::debug;

use mf_structure::Base;
use mf_structure::InteractionKind;
use mf_structure::Label;
use mf_structure::ResidueGraph;

use crate::search;
use crate::IsomorphismError;
use crate::IsomorphismStrategy;
use crate::SearchStats;

const KINDS: [InteractionKind; 3] = [InteractionKind::Pair, InteractionKind::Stack, InteractionKind::Link];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatcherConfig {
    /// Stop after the first valid mapping.
    pub stop_at_first: bool,
    /// Upper bound on `isomorphism_check` calls; the search winds down once spent.
    pub step_limit: Option<usize>,
    /// Let `N` residues match any residue type.
    pub wildcard_bases: bool,
    /// Stop after this many mappings.
    pub max_matches: Option<usize>,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            stop_at_first: false,
            step_limit: None,
            wildcard_bases: true,
            max_matches: None,
        }
    }
}

/// One mapping from pattern labels to target labels, in pattern native order.
pub type LabelMapping = Vec<(Label, Label)>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchReport {
    pub mappings: Vec<LabelMapping>,
    pub stats: SearchStats,
    pub budget_exhausted: bool,
}

impl MatchReport {
    pub fn is_match(&self) -> bool {
        !self.mappings.is_empty()
    }
}

/// Relation signature between two residues of one graph: pairing, stacking,
/// and the backbone link in each direction.
fn signature(graph: &ResidueGraph, a: Label, b: Label) -> u8 {
    let mut sig = 0;
    for bi in graph.interactions_between(a, b) {
        sig |= match bi.kind {
            InteractionKind::Pair => 1,
            InteractionKind::Stack => 2,
            InteractionKind::Link if bi.first == a => 4,
            InteractionKind::Link => 8,
        };
    }
    sig
}

/// Matches residue graphs by residue type and relation structure.
///
/// Two residues are candidates if their types agree and, for every relation
/// kind, the pattern degree does not exceed the target degree (equal degrees
/// are required when both graphs have the same size). A mapping is accepted
/// if pairing, stacking and directed backbone adjacency agree between every
/// two mapped residues in both graphs.
pub struct ResidueGraphMatcher<'a> {
    pattern: &'a ResidueGraph,
    target: &'a ResidueGraph,
    p_labels: Vec<Label>,
    t_labels: Vec<Label>,
    p_degrees: Vec<[usize; 3]>,
    t_degrees: Vec<[usize; 3]>,
    config: MatcherConfig,
    steps: usize,
    report: MatchReport,
}

fn degrees(graph: &ResidueGraph, labels: &[Label]) -> Vec<[usize; 3]> {
    labels.iter()
        .map(|&l| KINDS.map(|k| graph.degree(l, k)))
        .collect()
}

impl<'a> ResidueGraphMatcher<'a> {
    pub fn new(pattern: &'a ResidueGraph, target: &'a ResidueGraph, config: MatcherConfig) -> Self {
        let p_labels: Vec<Label> = pattern.labels().collect();
        let t_labels: Vec<Label> = target.labels().collect();
        let p_degrees = degrees(pattern, &p_labels);
        let t_degrees = degrees(target, &t_labels);
        Self {
            pattern,
            target,
            p_labels,
            t_labels,
            p_degrees,
            t_degrees,
            config,
            steps: 0,
            report: MatchReport::default(),
        }
    }

    fn bases_match(&self, p: Base, t: Base) -> bool {
        p == t || (self.config.wildcard_bases && (p == Base::N || t == Base::N))
    }

    fn pair_preserved(&self, mapping: &[usize], i: usize, k: usize) -> bool {
        signature(self.pattern, self.p_labels[i], self.p_labels[k])
            == signature(self.target, self.t_labels[mapping[i]], self.t_labels[mapping[k]])
    }

    /// Checks every relation of a complete or partial mapping, not just the last entry.
    pub fn is_isomorphism(&self, mapping: &[usize]) -> bool {
        (0..mapping.len()).all(|k| (0..k).all(|i| self.pair_preserved(mapping, i, k)))
    }

    /// Runs the search and hands back every recorded mapping.
    pub fn run(mut self) -> Result<MatchReport, IsomorphismError> {
        let stats = search(self.p_labels.len(), self.t_labels.len(), &mut self)?;
        self.report.stats = stats;
        debug!("{} mapping(s) after visiting {} partial assignments",
            self.report.mappings.len(), stats.nodes_visited);
        Ok(self.report)
    }
}

impl IsomorphismStrategy for ResidueGraphMatcher<'_> {
    fn potential_check(&self, i: usize, j: usize) -> bool {
        let same_size = self.p_labels.len() == self.t_labels.len();
        let (Ok(p), Ok(t)) = (self.pattern.base(self.p_labels[i]), self.target.base(self.t_labels[j])) else {
            return false;
        };
        self.bases_match(p, t) && self.p_degrees[i].iter()
            .zip(self.t_degrees[j].iter())
            .all(|(dp, dt)| if same_size { dp == dt } else { dp <= dt })
    }

    fn isomorphism_check(&mut self, mapping: &[usize]) -> bool {
        if let Some(limit) = self.config.step_limit {
            if self.steps >= limit {
                self.report.budget_exhausted = true;
                return false;
            }
        }
        self.steps += 1;
        let k = mapping.len() - 1;
        (0..k).all(|i| self.pair_preserved(mapping, i, k))
    }

    fn process_match(&mut self, mapping: &[usize]) -> bool {
        let labels = mapping.iter()
            .enumerate()
            .map(|(i, &j)| (self.p_labels[i], self.t_labels[j]))
            .collect();
        self.report.mappings.push(labels);
        if self.config.stop_at_first {
            return false;
        }
        match self.config.max_matches {
            Some(max) => self.report.mappings.len() < max,
            None => true,
        }
    }
}

/// Searches `pattern` in `target` with a `ResidueGraphMatcher`.
pub fn find_matches(
    pattern: &ResidueGraph,
    target: &ResidueGraph,
    config: MatcherConfig,
) -> Result<MatchReport, IsomorphismError> {
    ResidueGraphMatcher::new(pattern, target, config).run()
}

/// True if both graphs have the same size and at least one mapping exists.
pub fn are_isomorphic(a: &ResidueGraph, b: &ResidueGraph) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let config = MatcherConfig { stop_at_first: true, ..MatcherConfig::default() };
    find_matches(a, b, config).map(|r| r.is_match()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mf_structure::PairAnnotation;
    use mf_structure::ResId;
    use mf_structure::ResidueGraphBuilder;

    fn r(c: char, n: i32) -> ResId {
        ResId::new(c, n)
    }

    /// A hairpin on chain `c` starting at `start`: 4 residues, first and last paired.
    fn tetraloop(c: char, start: i32, seq: &str) -> ResidueGraph {
        let mut b = ResidueGraphBuilder::new();
        for (i, ch) in seq.chars().enumerate() {
            b.add_residue(r(c, start + i as i32), Base::from_lossy(ch)).unwrap();
        }
        b.link_contiguous().unwrap();
        let last = start + seq.len() as i32 - 1;
        b.add_pair(r(c, start), r(c, last), PairAnnotation::watson_crick()).unwrap();
        b.build()
    }

    #[test]
    fn test_identity_mapping_accepted() {
        let g = tetraloop('A', 1, "GAAC");
        let matcher = ResidueGraphMatcher::new(&g, &g, MatcherConfig::default());
        assert!(matcher.is_isomorphism(&[0, 1, 2, 3]));
        assert!(!matcher.is_isomorphism(&[1, 0, 2, 3]));
    }

    #[test]
    fn test_isomorphic_copies_on_other_chain() {
        let a = tetraloop('A', 1, "GAAC");
        let b = tetraloop('B', 20, "GAAC");
        assert!(are_isomorphic(&a, &b));
        let report = find_matches(&a, &b, MatcherConfig::default()).unwrap();
        // directed backbone links leave a single mapping
        assert_eq!(report.mappings.len(), 1);
        assert_eq!(report.mappings[0], vec![(0, 0), (1, 1), (2, 2), (3, 3)]);
    }

    #[test]
    fn test_residue_types_must_agree() {
        let a = tetraloop('A', 1, "GAAC");
        let b = tetraloop('A', 1, "GUAC");
        assert!(!are_isomorphic(&a, &b));
        let c = tetraloop('A', 1, "GNAC");
        assert!(are_isomorphic(&a, &c));
        let config = MatcherConfig { wildcard_bases: false, ..MatcherConfig::default() };
        assert!(!find_matches(&a, &c, config).unwrap().is_match());
    }

    #[test]
    fn test_motif_found_in_larger_graph() {
        let motif = tetraloop('A', 1, "GAAC");
        // GAAC hairpin embedded in a longer chain
        let mut b = ResidueGraphBuilder::new();
        for (i, ch) in "UUGAACUU".chars().enumerate() {
            b.add_residue(r('A', 10 + i as i32), Base::from_lossy(ch)).unwrap();
        }
        b.link_contiguous().unwrap();
        b.add_pair(r('A', 12), r('A', 15), PairAnnotation::watson_crick()).unwrap();
        let target = b.build();

        let report = find_matches(&motif, &target, MatcherConfig::default()).unwrap();
        assert_eq!(report.mappings.len(), 1);
        let mapped: Vec<ResId> = report.mappings[0].iter()
            .map(|&(_, t)| target.res_id(t).unwrap())
            .collect();
        assert_eq!(mapped, vec![r('A', 12), r('A', 13), r('A', 14), r('A', 15)]);
    }

    #[test]
    fn test_pattern_larger_than_target() {
        let small = tetraloop('A', 1, "GAAC");
        let large = tetraloop('A', 1, "GAAAAC");
        assert_eq!(find_matches(&large, &small, MatcherConfig::default()).unwrap_err(),
            IsomorphismError::PatternTooLarge { alpha: 6, beta: 4 });
    }

    fn strand(len: i32) -> ResidueGraph {
        let mut b = ResidueGraphBuilder::new();
        for i in 1..=len {
            b.add_residue(r('A', i), Base::N).unwrap();
        }
        b.link_contiguous().unwrap();
        b.build()
    }

    #[test]
    fn test_max_matches() {
        let (dinucleotide, target) = (strand(2), strand(6));
        // every backbone step of the target
        let all = find_matches(&dinucleotide, &target, MatcherConfig::default()).unwrap();
        assert_eq!(all.mappings.len(), 5);

        let config = MatcherConfig { max_matches: Some(2), ..MatcherConfig::default() };
        let capped = find_matches(&dinucleotide, &target, config).unwrap();
        assert_eq!(capped.mappings, all.mappings[..2].to_vec());
        assert!(!capped.budget_exhausted);
    }

    #[test]
    fn test_step_limit() {
        let a = tetraloop('A', 1, "NNNNNNNN");
        let config = MatcherConfig { step_limit: Some(3), ..MatcherConfig::default() };
        let report = find_matches(&a, &a, config).unwrap();
        assert!(report.budget_exhausted);
        assert!(!report.is_match());
    }
}
