/// Caller-supplied predicates driving the subgraph search.
///
/// Node `i` always refers to the smaller graph (the pattern, `0..alpha`),
/// node `j` to the larger one (the target, `0..beta`). A mapping is a slice
/// where `mapping[i]` is the target node assigned to pattern node `i`.
pub trait IsomorphismStrategy {
    /// May pattern node `i` be mapped onto target node `j`?
    /// Returning false removes `j` from the candidates of `i`.
    fn potential_check(&self, i: usize, j: usize) -> bool;

    /// Does the mapping preserve every relation among its assigned nodes?
    ///
    /// The search calls this with each extended prefix, so the last entry
    /// is the only new assignment; the full mapping is checked last.
    fn isomorphism_check(&mut self, mapping: &[usize]) -> bool;

    /// Called on every complete, structurally valid mapping.
    /// Return `true` to keep enumerating, `false` to stop the search.
    fn process_match(&mut self, mapping: &[usize]) -> bool;
}

/// A strategy assembled from three closures.
pub struct FnStrategy<P, I, M>
where
    P: Fn(usize, usize) -> bool,
    I: FnMut(&[usize]) -> bool,
    M: FnMut(&[usize]) -> bool,
{
    pub potential: P,
    pub isomorphism: I,
    pub on_match: M,
}

impl<P, I, M> IsomorphismStrategy for FnStrategy<P, I, M>
where
    P: Fn(usize, usize) -> bool,
    I: FnMut(&[usize]) -> bool,
    M: FnMut(&[usize]) -> bool,
{
    fn potential_check(&self, i: usize, j: usize) -> bool {
        (self.potential)(i, j)
    }

    fn isomorphism_check(&mut self, mapping: &[usize]) -> bool {
        (self.isomorphism)(mapping)
    }

    fn process_match(&mut self, mapping: &[usize]) -> bool {
        (self.on_match)(mapping)
    }
}
