//! Maze solving: depth-first search over open walls.
//!
//! Mirrors the generator's explicit-stack style. The scan order is fixed
//! (north, south, east, west); a spanning tree has exactly one
//! entrance-to-exit path, so any deterministic order finds it.

use crate::maze::{Direction, Maze, Position};

/// The unique entrance-to-exit path of a generated maze, in walk order.
///
/// Only moves through walls the grid records as open. Panics when the
/// stack underflows before the exit is reached; a generated maze always
/// has a solution, so getting here means the generator broke its
/// spanning-tree guarantee.
pub fn solve(maze: &Maze) -> Vec<Position> {
    let mut stack = vec![maze.start()];
    let mut visited = vec![false; maze.cell_count()];
    visited[maze.index(maze.start())] = true;

    'walk: while let Some(&current) = stack.last() {
        if current == maze.finish() {
            return stack;
        }

        for direction in Direction::ALL {
            if !maze.at(current).is_open(direction) {
                continue;
            }
            if let Some(next) = maze.neighbor(current, direction) {
                if !visited[maze.index(next)] {
                    visited[maze.index(next)] = true;
                    stack.push(next);
                    continue 'walk;
                }
            }
        }

        stack.pop();
    }

    panic!("maze has no solution");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::generate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::VecDeque;

    fn generated(height: usize, width: usize, seed: u64, opposite: bool) -> Maze {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut maze = Maze::new(height, width, &mut rng, opposite).unwrap();
        generate(&mut maze, &mut rng);
        maze
    }

    /// Shortest-path length between entrance and exit via BFS over open
    /// walls. In a spanning tree this equals the length of the only path.
    fn bfs_path_len(maze: &Maze) -> usize {
        let mut dist = vec![usize::MAX; maze.cell_count()];
        let mut queue = VecDeque::from([maze.start()]);
        dist[maze.index(maze.start())] = 1;
        while let Some(p) = queue.pop_front() {
            if p == maze.finish() {
                return dist[maze.index(p)];
            }
            for direction in Direction::ALL {
                if maze.at(p).is_open(direction) {
                    if let Some(np) = maze.neighbor(p, direction) {
                        if dist[maze.index(np)] == usize::MAX {
                            dist[maze.index(np)] = dist[maze.index(p)] + 1;
                            queue.push_back(np);
                        }
                    }
                }
            }
        }
        panic!("finish unreachable");
    }

    #[test]
    fn path_runs_from_entrance_to_exit_through_open_walls() {
        for seed in [1u64, 42, 999] {
            let maze = generated(12, 9, seed, false);
            let path = solve(&maze);

            assert_eq!(path[0], maze.start());
            assert_eq!(*path.last().unwrap(), maze.finish());

            for pair in path.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                let direction = Direction::ALL
                    .into_iter()
                    .find(|&d| maze.neighbor(a, d) == Some(b))
                    .expect("path steps one cell at a time");
                assert!(maze.at(a).is_open(direction), "walked a closed wall");
            }
        }
    }

    #[test]
    fn path_is_the_unique_shortest_path() {
        for seed in [5u64, 123, 4096] {
            let maze = generated(16, 16, seed, true);
            let path = solve(&maze);
            assert_eq!(path.len(), bfs_path_len(&maze));
        }
    }

    #[test]
    fn path_visits_no_cell_twice() {
        let maze = generated(20, 20, 314, false);
        let path = solve(&maze);
        let mut seen = std::collections::HashSet::new();
        for p in &path {
            assert!(seen.insert(*p), "revisited {p:?}");
        }
    }

    #[test]
    fn solve_is_deterministic() {
        let a = solve(&generated(10, 14, 2024, false));
        let b = solve(&generated(10, 14, 2024, false));
        assert_eq!(a, b);
    }

    #[test]
    fn example_three_by_three_path_length() {
        let maze = generated(3, 3, 42, true);
        let path = solve(&maze);
        assert!(
            (5..=9).contains(&path.len()),
            "path length {} outside 5..=9",
            path.len()
        );
    }

    #[test]
    fn minimum_grid_solves() {
        let maze = generated(2, 2, 8, true);
        let path = solve(&maze);
        assert_eq!(path[0], maze.start());
        assert_eq!(*path.last().unwrap(), maze.finish());
    }
}
