//! Stems, pseudoknot layers, linkers and loops of one residue graph.
//!
//! Stems are stored in a `SlotMap`, everything else refers to them by
//! `StemId`. Linkers and loops are derived from the nested (layer 0) stems
//! only; stems of higher layers sit inside linkers.

use ahash::AHashMap;
use log::{debug, info};
use slotmap::{SlotMap, SecondaryMap};

use mf_structure::BaseInteraction;
use mf_structure::DotBracketVec;
use mf_structure::RelationMask;
use mf_structure::ResId;
use mf_structure::ResidueGraph;

use crate::AnnotationConfig;
use crate::Anomaly;
use crate::CONNECTION_POINTS;
use crate::Direction;
use crate::Linker;
use crate::Loop;
use crate::MotifError;
use crate::Stem;
use crate::StemConnection;
use crate::StemId;

#[derive(Debug, Clone)]
pub struct SecondaryStructure {
    stems: SlotMap<StemId, Stem>,
    order: Vec<StemId>,
    layers: SecondaryMap<StemId, usize>,
    pseudoknots: Vec<(StemId, StemId)>,
    linkers: Vec<Linker>,
    loops: Vec<Loop>,
    dot_bracket: DotBracketVec,
    diagnostics: Vec<Anomaly>,
}

fn is_stem_pair(graph: &ResidueGraph, bi: &BaseInteraction, config: &AnnotationConfig) -> bool {
    if !bi.is_pair() {
        return false;
    }
    if !config.canonical_stems_only {
        return true;
    }
    let faces = bi.pairing.is_some_and(|p| p.is_cis_wc());
    let bases = match (graph.base(bi.first), graph.base(bi.second)) {
        (Ok(a), Ok(b)) => a.is_complementary(b),
        _ => false,
    };
    faces && bases
}

/// Offer every pair, in `(f_res_id, r_res_id)` order, to the stems found
/// so far; a pair nobody accepts opens a new stem.
fn find_stems(graph: &ResidueGraph, config: &AnnotationConfig) -> Vec<Stem> {
    let mut pairs: Vec<BaseInteraction> = graph.interactions(RelationMask::PAIRING)
        .iter()
        .filter(|bi| is_stem_pair(graph, bi, config))
        .map(|bi| bi.ordered())
        .collect();
    pairs.sort();

    let mut stems: Vec<Stem> = Vec::new();
    for pair in pairs {
        if !stems.iter_mut().any(|s| s.push_back(pair)) {
            let mut stem = Stem::new();
            stem.push_back(pair);
            stems.push(stem);
        }
    }
    let found = stems.len();
    stems.retain(|s| s.len() >= config.min_stem_size.max(1));
    debug!("{} stem(s) found, {} below minimum size", found, found - stems.len());
    stems
}

/// Connection points of the nested stems, keyed by residue.
#[derive(Default)]
struct Endpoints {
    /// Points reached when walking 5' to 3' into a strand.
    arrivals: AHashMap<ResId, StemConnection>,
    /// Points a 5' to 3' walk leaves a strand from.
    exits: AHashMap<ResId, StemConnection>,
    /// Lowest residue of a strand to its highest residue.
    strand_end: AHashMap<ResId, ResId>,
}

impl Endpoints {
    fn new(stems: &SlotMap<StemId, Stem>, ids: &[StemId]) -> Self {
        let mut endpoints = Self::default();
        for &id in ids {
            let stem = &stems[id];
            for point in CONNECTION_POINTS {
                let Ok(res) = stem.residue(point) else { continue };
                let direction = stem.direction(point);
                let conn = StemConnection { stem: id, point, direction };
                let map = match direction {
                    Direction::Backward => &mut endpoints.arrivals,
                    Direction::Forward => &mut endpoints.exits,
                };
                map.entry(res).or_insert(conn);
            }
            if let Some((s1, s2)) = stem.strands() {
                endpoints.strand_end.entry(s1.0).or_insert(s1.1);
                endpoints.strand_end.entry(s2.0).or_insert(s2.1);
            }
        }
        endpoints
    }

    /// Residue where a loop continues after crossing a pair to `partner`.
    fn exit_after(&self, partner: ResId) -> ResId {
        self.strand_end.get(&partner).copied().unwrap_or(partner)
    }
}

/// Walk the chains 5' to 3' and cut them at every nested strand.
fn find_linkers(graph: &ResidueGraph, endpoints: &Endpoints, diagnostics: &mut Vec<Anomaly>) -> Vec<Linker> {
    let residues: Vec<_> = graph.residues().collect();
    let mut linkers = Vec::new();
    let mut run: Vec<ResId> = Vec::new();
    let mut front: Option<StemConnection> = None;
    let mut skip_to: Option<ResId> = None;

    for (i, res) in residues.iter().enumerate() {
        if i > 0 && !graph.has_link(residues[i - 1].label, res.label) {
            if skip_to.take().is_some() {
                Anomaly::BackboneGap { before: residues[i - 1].res_id, after: res.res_id }
                    .report(diagnostics);
            } else if !run.is_empty() {
                linkers.push(Linker::new(std::mem::take(&mut run), front.take(), None));
            }
            run.clear();
            front = None;
        }
        if let Some(end) = skip_to {
            if res.res_id == end {
                skip_to = None;
                run.push(end);
                front = endpoints.exits.get(&end).copied();
            }
            continue;
        }
        run.push(res.res_id);
        if let Some(&conn) = endpoints.arrivals.get(&res.res_id) {
            linkers.push(Linker::new(std::mem::take(&mut run), front.take(), Some(conn)));
            match endpoints.strand_end.get(&res.res_id) {
                Some(&end) if end != res.res_id => skip_to = Some(end),
                _ => {
                    run.push(res.res_id);
                    front = endpoints.exits.get(&res.res_id).copied();
                }
            }
        }
    }
    if skip_to.is_none() && !run.is_empty() {
        linkers.push(Linker::new(run, front, None));
    }
    linkers
}

/// Chain linkers into loops by crossing the closing pair at each linker's
/// back. Loops reaching a free end are collected first.
fn find_loops(
    stems: &SlotMap<StemId, Stem>,
    linkers: &[Linker],
    endpoints: &Endpoints,
    diagnostics: &mut Vec<Anomaly>,
) -> Vec<Loop> {
    let by_front: AHashMap<ResId, usize> = linkers.iter()
        .enumerate()
        .filter(|(_, l)| l.front().is_some())
        .filter_map(|(i, l)| l.front_residue().map(|r| (r, i)))
        .collect();

    let mut visited = vec![false; linkers.len()];
    let mut loops = Vec::new();
    let free_starts = (0..linkers.len()).filter(|&i| linkers[i].front().is_none());
    for start in free_starts.chain(0..linkers.len()) {
        if visited[start] {
            continue;
        }
        let mut members = Vec::new();
        let mut current = start;
        let closed = loop {
            if visited[current] {
                break current == start;
            }
            visited[current] = true;
            let linker = &linkers[current];
            members.push(linker.clone());
            let (Some(conn), Some(at)) = (linker.back(), linker.back_residue()) else {
                break false;
            };
            let next = stems.get(conn.stem)
                .and_then(|s| s.partner(&at))
                .and_then(|p| by_front.get(&endpoints.exit_after(p)).copied());
            match next {
                Some(n) => current = n,
                None => {
                    Anomaly::UnresolvedLoop { at }.report(diagnostics);
                    break false;
                }
            }
        };
        loops.push(Loop::new(members, closed));
    }
    loops
}

impl SecondaryStructure {
    pub fn new(graph: &ResidueGraph, config: &AnnotationConfig) -> Self {
        let mut stems: SlotMap<StemId, Stem> = SlotMap::with_key();
        let order: Vec<StemId> = find_stems(graph, config)
            .into_iter()
            .map(|s| stems.insert(s))
            .collect();

        // Largest stems claim the lowest layer.
        let mut by_size = order.clone();
        by_size.sort_by(|a, b| stems[*b].len().cmp(&stems[*a].len())
            .then_with(|| stems[*a].front().cmp(&stems[*b].front())));
        let mut members: Vec<Vec<StemId>> = Vec::new();
        let mut layers = SecondaryMap::new();
        for id in by_size {
            let mut layer = 0;
            while layer < members.len() && members[layer].iter().any(|o| stems[*o].pseudoknots(&stems[id])) {
                layer += 1;
            }
            if layer == members.len() {
                members.push(Vec::new());
            }
            members[layer].push(id);
            layers.insert(id, layer);
        }

        let mut pseudoknots = Vec::new();
        for (i, &a) in order.iter().enumerate() {
            for &b in &order[i + 1..] {
                if stems[a].pseudoknots(&stems[b]) {
                    pseudoknots.push((a, b));
                }
            }
        }

        let mut diagnostics = Vec::new();
        let nested: Vec<StemId> = order.iter().copied().filter(|id| layers.get(*id) == Some(&0)).collect();
        let endpoints = Endpoints::new(&stems, &nested);
        let linkers = find_linkers(graph, &endpoints, &mut diagnostics);
        let loops = find_loops(&stems, &linkers, &endpoints, &mut diagnostics);

        let mut result = Self {
            stems,
            order,
            layers,
            pseudoknots,
            linkers,
            loops,
            dot_bracket: DotBracketVec(Vec::new()),
            diagnostics,
        };
        result.dot_bracket = result.render(graph);
        info!("{} stem(s), {} pseudoknot(s), {} loop(s): {}", result.order.len(),
            result.pseudoknots.len(), result.loops.len(), result.dot_bracket);
        result
    }

    fn render(&self, graph: &ResidueGraph) -> DotBracketVec {
        let residues: Vec<_> = graph.residues().collect();
        let mut pairs = Vec::new();
        for (id, stem) in self.stems() {
            let layer = self.layer(id).unwrap_or(0);
            for p in stem.pairs() {
                if let (Some(i), Some(j)) = (graph.position(p.first), graph.position(p.second)) {
                    pairs.push((i.min(j), i.max(j), layer));
                }
            }
        }
        let breaks: Vec<usize> = (1..residues.len())
            .filter(|&i| residues[i].res_id.chain != residues[i - 1].res_id.chain)
            .collect();
        DotBracketVec::from_pairs(residues.len(), &pairs, &breaks)
    }

    /// Stems in order of their first pair.
    pub fn stems(&self) -> impl Iterator<Item = (StemId, &Stem)> {
        self.order.iter().map(|&id| (id, &self.stems[id]))
    }

    pub fn stem_ids(&self) -> &[StemId] {
        &self.order
    }

    pub fn stem(&self, id: StemId) -> Result<&Stem, MotifError> {
        self.stems.get(id).ok_or(MotifError::UnknownStem)
    }

    /// Position of `id` in `stem_ids`.
    pub fn stem_index(&self, id: StemId) -> Option<usize> {
        self.order.iter().position(|&s| s == id)
    }

    pub fn stem_of(&self, res_id: &ResId) -> Option<StemId> {
        self.stems().find(|(_, s)| s.contains(res_id)).map(|(id, _)| id)
    }

    /// Pseudoknot layer; 0 is the nested structure.
    pub fn layer(&self, id: StemId) -> Option<usize> {
        self.layers.get(id).copied()
    }

    pub fn layer_count(&self) -> usize {
        self.layers.values().max().map_or(0, |&l| l + 1)
    }

    /// Every interleaving stem pair `(a, b)` with `a` before `b`.
    pub fn pseudoknots(&self) -> &[(StemId, StemId)] {
        &self.pseudoknots
    }

    pub fn linkers(&self) -> &[Linker] {
        &self.linkers
    }

    pub fn loops(&self) -> &[Loop] {
        &self.loops
    }

    /// Residues of a loop in walk order. Crossing a parallel stem also
    /// visits the strand residues from the partner up to the next linker.
    pub fn loop_walk(&self, lp: &Loop) -> Vec<ResId> {
        let linkers = lp.linkers();
        let mut walk = Vec::new();
        for (i, linker) in linkers.iter().enumerate() {
            walk.extend_from_slice(linker.residues());
            if !lp.is_closed() && i + 1 == linkers.len() {
                break;
            }
            let next = &linkers[(i + 1) % linkers.len()];
            let (Some(conn), Some(at), Some(front)) = (linker.back(), linker.back_residue(), next.front_residue()) else {
                continue;
            };
            let Some(stem) = self.stems.get(conn.stem) else { continue };
            let Some(partner) = stem.partner(&at) else { continue };
            let on_first = stem.pairs().iter().any(|p| p.f_res_id == partner);
            walk.extend(stem.pairs().iter()
                .map(|p| if on_first { p.f_res_id } else { p.r_res_id })
                .filter(|r| partner <= *r && *r < front));
        }
        walk
    }

    pub fn dot_bracket(&self) -> &DotBracketVec {
        &self.dot_bracket
    }

    pub fn diagnostics(&self) -> &[Anomaly] {
        &self.diagnostics
    }
}
