// src/navigation/search.rs
// Breadth-first route extraction and incrementally maintained hop counts.

// Dependencies
use crate::geometry::Cell;
use indexmap::{IndexMap, IndexSet};
use std::collections::{HashMap, VecDeque};

/// Undirected adjacency in insertion order
pub type Adjacency = IndexMap<Cell, IndexSet<Cell>>;

/// Fewest-edge route from `origin` to `end`, both ends included.
///
/// Each node keeps the parent it was first discovered from, so ties resolve
/// by neighbour insertion order. Returns `None` if either end is missing or
/// `end` is unreachable.
pub fn bfs(adjacency: &Adjacency, origin: Cell, end: Cell) -> Option<Vec<Cell>> {
    if !adjacency.contains_key(&origin) || !adjacency.contains_key(&end) {
        return None;
    }

    let mut parents: HashMap<Cell, Cell> = HashMap::new();
    let mut discovered: IndexSet<Cell> = IndexSet::new();
    let mut queue = VecDeque::new();
    discovered.insert(origin);
    queue.push_back(origin);

    while let Some(parent) = queue.pop_front() {
        if parent == end {
            break;
        }
        for &child in adjacency.get(&parent).into_iter().flatten() {
            if discovered.insert(child) {
                parents.insert(child, parent);
                queue.push_back(child);
            }
        }
    }

    if !discovered.contains(&end) {
        return None;
    }

    let mut path = vec![end];
    let mut current = end;
    while current != origin {
        current = *parents.get(&current)?;
        path.push(current);
    }
    path.reverse();
    Some(path)
}

/// Distance-from-origin labels (in edges) kept equal to BFS depth as the
/// graph grows.
///
/// Edge insertions can only shorten distances, so each insertion relaxes
/// outward from the endpoint that improved.
#[derive(Debug, Clone)]
pub struct HopIndex {
    hops: HashMap<Cell, usize>,
}

impl HopIndex {
    pub fn new(origin: Cell) -> Self {
        let mut hops = HashMap::new();
        hops.insert(origin, 0);
        HopIndex { hops }
    }

    /// Edges between the origin and `cell`
    pub fn get(&self, cell: Cell) -> Option<usize> {
        self.hops.get(&cell).copied()
    }

    /// Labels a freshly inserted leaf whose only neighbour is `via`
    pub fn attach(&mut self, cell: Cell, via: Cell) {
        if let Some(depth) = self.get(via) {
            self.hops.insert(cell, depth + 1);
        }
    }

    /// Restores the labels after the edge `a`–`b` was added to `adjacency`
    pub fn relax(&mut self, adjacency: &Adjacency, a: Cell, b: Cell) {
        let seed = match (self.get(a), self.get(b)) {
            (Some(ha), Some(hb)) if ha + 1 < hb => Some((b, ha + 1)),
            (Some(ha), None) => Some((b, ha + 1)),
            (Some(ha), Some(hb)) if hb + 1 < ha => Some((a, hb + 1)),
            (None, Some(hb)) => Some((a, hb + 1)),
            _ => None,
        };
        let Some((start, depth)) = seed else {
            return;
        };

        self.hops.insert(start, depth);
        let mut queue = VecDeque::from([start]);
        while let Some(cell) = queue.pop_front() {
            let next = match self.get(cell) {
                Some(depth) => depth + 1,
                None => continue,
            };
            for &neighbour in adjacency.get(&cell).into_iter().flatten() {
                if self.get(neighbour).is_none_or(|current| next < current) {
                    self.hops.insert(neighbour, next);
                    queue.push_back(neighbour);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(adjacency: &mut Adjacency, a: Cell, b: Cell) {
        adjacency.entry(a).or_default().insert(b);
        adjacency.entry(b).or_default().insert(a);
    }

    fn chain(len: i64) -> Adjacency {
        let mut adjacency = Adjacency::new();
        adjacency.insert(Cell::ORIGIN, IndexSet::new());
        for i in 1..len {
            link(&mut adjacency, Cell::new(i - 1, 0), Cell::new(i, 0));
        }
        adjacency
    }

    #[test]
    fn bfs_follows_chain() {
        let adjacency = chain(4);
        let path = bfs(&adjacency, Cell::ORIGIN, Cell::new(3, 0)).unwrap();
        assert_eq!(path, vec![Cell::new(0, 0), Cell::new(1, 0), Cell::new(2, 0), Cell::new(3, 0)]);
        assert_eq!(bfs(&adjacency, Cell::ORIGIN, Cell::ORIGIN).unwrap(), vec![Cell::ORIGIN]);
    }

    #[test]
    fn bfs_prefers_fewest_edges() {
        let mut adjacency = chain(5);
        link(&mut adjacency, Cell::ORIGIN, Cell::new(4, 0));
        let path = bfs(&adjacency, Cell::ORIGIN, Cell::new(3, 0)).unwrap();
        assert_eq!(path, vec![Cell::new(0, 0), Cell::new(4, 0), Cell::new(3, 0)]);
    }

    #[test]
    fn bfs_reports_unknown_or_unreachable_end() {
        let mut adjacency = chain(3);
        assert!(bfs(&adjacency, Cell::ORIGIN, Cell::new(9, 9)).is_none());
        adjacency.insert(Cell::new(9, 9), IndexSet::new());
        assert!(bfs(&adjacency, Cell::ORIGIN, Cell::new(9, 9)).is_none());
    }

    #[test]
    fn relax_propagates_shortcut() {
        let mut adjacency = chain(6);
        let mut hops = HopIndex::new(Cell::ORIGIN);
        for i in 1..6 {
            hops.attach(Cell::new(i, 0), Cell::new(i - 1, 0));
        }
        assert_eq!(hops.get(Cell::new(5, 0)), Some(5));

        link(&mut adjacency, Cell::ORIGIN, Cell::new(4, 0));
        hops.relax(&adjacency, Cell::ORIGIN, Cell::new(4, 0));
        assert_eq!(hops.get(Cell::new(4, 0)), Some(1));
        assert_eq!(hops.get(Cell::new(5, 0)), Some(2));
        assert_eq!(hops.get(Cell::new(3, 0)), Some(2));
        assert_eq!(hops.get(Cell::new(2, 0)), Some(2));

        for (&cell, _) in &adjacency {
            let depth = bfs(&adjacency, Cell::ORIGIN, cell).unwrap().len() - 1;
            assert_eq!(hops.get(cell), Some(depth));
        }
    }
}
