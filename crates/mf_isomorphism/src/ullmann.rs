//! Ullmann's backtracking subgraph isomorphism search.
//!
//! Pattern nodes are assigned in order `0, 1, .., alpha - 1`; at each depth
//! the candidate target nodes are tried in increasing order. The search is
//! therefore depth-first and leftmost-first, which makes the order of
//! reported matches (and any early stop) reproducible.
//!
//! The recursion depth equals `alpha`, the size of the pattern. For RNA
//! motifs this is tens to low hundreds of residues; patterns spanning very
//! large multi-chain assemblies would need an explicit worklist instead.

use log::trace;

use crate::IsomorphismError;
use crate::IsomorphismStrategy;

/// Bookkeeping of one search run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Partial assignments offered to `isomorphism_check`.
    pub nodes_visited: usize,
    /// Complete mappings passed to `process_match`.
    pub matches: usize,
    /// True if `process_match` requested the search to stop.
    pub stopped: bool,
}

/// Boolean alpha x beta candidate matrix.
struct Candidates {
    beta: usize,
    cells: Vec<bool>,
}

impl Candidates {
    fn new<S: IsomorphismStrategy + ?Sized>(alpha: usize, beta: usize, strategy: &S) -> Self {
        let mut cells = vec![false; alpha * beta];
        for i in 0..alpha {
            for j in 0..beta {
                cells[i * beta + j] = strategy.potential_check(i, j);
            }
        }
        Self { beta, cells }
    }

    fn get(&self, i: usize, j: usize) -> bool {
        self.cells[i * self.beta + j]
    }

    fn row_is_empty(&self, i: usize) -> bool {
        !self.cells[i * self.beta..(i + 1) * self.beta].iter().any(|&c| c)
    }
}

struct Search<'s, S: IsomorphismStrategy + ?Sized> {
    alpha: usize,
    beta: usize,
    candidates: Candidates,
    mapping: Vec<usize>,
    used: Vec<bool>,
    strategy: &'s mut S,
    stats: SearchStats,
}

impl<S: IsomorphismStrategy + ?Sized> Search<'_, S> {
    /// Returns false once the strategy asked to stop.
    fn assign(&mut self, depth: usize) -> bool {
        if depth == self.alpha {
            self.stats.matches += 1;
            let proceed = self.strategy.process_match(&self.mapping);
            self.stats.stopped = !proceed;
            return proceed;
        }
        for j in 0..self.beta {
            if self.used[j] || !self.candidates.get(depth, j) {
                continue;
            }
            self.mapping.push(j);
            self.used[j] = true;
            self.stats.nodes_visited += 1;

            let proceed = if self.strategy.isomorphism_check(&self.mapping) {
                trace!("assign {} -> {}", depth, j);
                self.assign(depth + 1)
            } else {
                true
            };

            self.mapping.pop();
            self.used[j] = false;
            if !proceed {
                return false;
            }
        }
        true
    }
}

/// Runs the search of a graph with `alpha` nodes in a graph with `beta` nodes.
///
/// Finding no mapping is a regular outcome (`stats.matches == 0`). Everything
/// the caller wants to keep must be recorded in `process_match`.
pub fn search<S: IsomorphismStrategy + ?Sized>(
    alpha: usize,
    beta: usize,
    strategy: &mut S,
) -> Result<SearchStats, IsomorphismError> {
    if alpha > beta {
        return Err(IsomorphismError::PatternTooLarge { alpha, beta });
    }
    let candidates = Candidates::new(alpha, beta, strategy);
    if (0..alpha).any(|i| candidates.row_is_empty(i)) {
        trace!("pattern node without candidates, nothing to search");
        return Ok(SearchStats::default());
    }

    let mut search = Search {
        alpha,
        beta,
        candidates,
        mapping: Vec::with_capacity(alpha),
        used: vec![false; beta],
        strategy,
        stats: SearchStats::default(),
    };
    search.assign(0);
    Ok(search.stats)
}
