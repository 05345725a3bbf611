use nohash_hasher::IntMap;

/// Disjoint sets over `0..n` with union by rank and path compression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl UnionFind {
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    /// Merge the sets of `x` and `y`. False if they were already joined.
    pub fn union(&mut self, x: usize, y: usize) -> bool {
        let (rx, ry) = (self.find(x), self.find(y));
        if rx == ry {
            return false;
        }
        match self.rank[rx].cmp(&self.rank[ry]) {
            std::cmp::Ordering::Less => self.parent[rx] = ry,
            std::cmp::Ordering::Greater => self.parent[ry] = rx,
            std::cmp::Ordering::Equal => {
                self.parent[ry] = rx;
                self.rank[rx] += 1;
            }
        }
        true
    }

    pub fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    /// Components restricted to `members`, each sorted, ordered by their
    /// smallest element.
    pub fn groups(&mut self, members: &[usize]) -> Vec<Vec<usize>> {
        let mut groups: IntMap<usize, Vec<usize>> = IntMap::default();
        for &m in members {
            let root = self.find(m);
            let group = groups.entry(root).or_default();
            if !group.contains(&m) {
                group.push(m);
            }
        }
        let mut result: Vec<Vec<usize>> = groups.into_values().collect();
        for g in &mut result {
            g.sort_unstable();
        }
        result.sort_unstable();
        result
    }
}
