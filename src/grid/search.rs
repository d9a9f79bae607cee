//! Hop distances over the reachable cells of a grid.

use std::collections::{HashSet, VecDeque};

use petgraph::algo::dijkstra;

use super::cell::Cell;
use super::state::GridState;

impl GridState {
    /// Length of the shortest 4-connected path from `origin` to `target`.
    ///
    /// Returns `None` when either endpoint is blocked or no path exists;
    /// callers treat that as "no shaping applies", never as a retryable
    /// failure.
    pub fn distance(&self, origin: Cell, target: Cell) -> Option<usize> {
        if !self.contains(origin) || !self.contains(target) {
            return None;
        }
        if origin == target {
            return Some(0);
        }

        dijkstra(self.graph(), origin, Some(target), |_| 1usize)
            .get(&target)
            .copied()
    }

    /// Breadth-first layering of the cells around `origin`.
    ///
    /// Entry `i` holds the cells exactly `i` hops away, for `i` in
    /// `0..=max_depth`; entry 0 is `origin` itself. A blocked origin yields
    /// only empty layers.
    pub fn bfs_layers(&self, origin: Cell, max_depth: usize) -> Vec<Vec<Cell>> {
        let mut layers = vec![Vec::new(); max_depth + 1];
        if !self.contains(origin) {
            return layers;
        }

        layers[0].push(origin);
        let mut visited = HashSet::from([origin]);
        let mut queue = VecDeque::from([(origin, 0usize)]);

        while let Some((cell, depth)) = queue.pop_front() {
            if depth == max_depth {
                continue;
            }
            for next in self.graph().neighbors(cell) {
                if visited.insert(next) {
                    layers[depth + 1].push(next);
                    queue.push_back((next, depth + 1));
                }
            }
        }

        layers
    }
}

#[cfg(test)]
mod tests {
    use crate::grid::Layout;

    use super::*;

    fn maze() -> GridState {
        GridState::new(
            Layout::from_ascii(
                "
                %%%%%%%
                %     %
                % %%% %
                %   % %
                %%% % %
                %     %
                %%%%%%%
                ",
            )
            .unwrap(),
        )
    }

    #[test]
    fn distance_to_self_is_zero() {
        let grid = maze();
        for &cell in grid.cells() {
            assert_eq!(grid.distance(cell, cell), Some(0));
        }
    }

    #[test]
    fn distance_is_symmetric() {
        let grid = maze();
        for &a in grid.cells() {
            for &b in grid.cells() {
                assert_eq!(grid.distance(a, b), grid.distance(b, a));
            }
        }
    }

    #[test]
    fn distance_routes_around_walls() {
        let grid = maze();
        assert_eq!(grid.distance(Cell::new(1, 3), Cell::new(3, 3)), Some(2));
        // Row 2 is walled off between x = 0 and x = 2, so the path detours through x = 3.
        assert_eq!(grid.distance(Cell::new(1, 1), Cell::new(1, 3)), Some(6));
        assert_eq!(grid.distance(Cell::new(1, 5), Cell::new(5, 1)), Some(8));
    }

    #[test]
    fn distance_with_obstacle_endpoint_is_none() {
        let grid = maze();
        assert_eq!(grid.distance(Cell::new(0, 0), Cell::new(1, 1)), None);
        assert_eq!(grid.distance(Cell::new(1, 1), Cell::new(2, 4)), None);
    }

    #[test]
    fn distance_without_path_is_none() {
        let grid = GridState::new(Layout::new(3, 1, [Cell::new(1, 0)]));
        assert_eq!(grid.distance(Cell::new(0, 0), Cell::new(2, 0)), None);
    }

    #[test]
    fn layers_bucket_by_exact_hops() {
        let grid = GridState::new(Layout::open(5, 5));
        let origin = Cell::new(2, 2);
        let layers = grid.bfs_layers(origin, 2);

        assert_eq!(layers.len(), 3);
        assert_eq!(layers[0], vec![origin]);
        assert_eq!(layers[1].len(), 4);
        assert_eq!(layers[2].len(), 8);
        for (depth, layer) in layers.iter().enumerate() {
            for &cell in layer {
                assert_eq!(grid.distance(origin, cell), Some(depth));
            }
        }
    }

    #[test]
    fn layers_from_blocked_origin_are_empty() {
        let grid = GridState::new(Layout::new(3, 3, [Cell::new(1, 1)]));
        let layers = grid.bfs_layers(Cell::new(1, 1), 3);
        assert_eq!(layers.len(), 4);
        assert!(layers.iter().all(Vec::is_empty));
    }
}
