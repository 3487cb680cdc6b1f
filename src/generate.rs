//! Maze generation: randomized iterative backtracking.
//!
//! A non-recursive depth-first carve over an explicit stack, so maze size
//! never depends on call-stack depth. Every random draw comes from the
//! caller's RNG, which makes the whole maze reproducible from
//! (height, width, seed, placement mode).

use rand::Rng;

use crate::maze::Direction::{East, North, South, West};
use crate::maze::{Direction, Maze};

/// All 24 orderings of the four directions. Drawing one row uniformly per
/// step is equivalent to shuffling the directions each time, without the
/// per-step shuffle.
const DIRECTION_PERMUTATIONS: [[Direction; 4]; 24] = [
    [North, South, East, West],
    [North, South, West, East],
    [North, East, South, West],
    [North, East, West, South],
    [North, West, South, East],
    [North, West, East, South],
    [South, North, East, West],
    [South, North, West, East],
    [South, East, North, West],
    [South, East, West, North],
    [South, West, North, East],
    [South, West, East, North],
    [East, North, South, West],
    [East, North, West, South],
    [East, South, North, West],
    [East, South, West, North],
    [East, West, North, South],
    [East, West, South, North],
    [West, North, South, East],
    [West, North, East, South],
    [West, South, North, East],
    [West, South, East, North],
    [West, East, North, South],
    [West, East, South, North],
];

/// Carve a spanning tree into `maze`, starting from the entrance.
///
/// The top-of-stack cell scans its directions in a freshly drawn random
/// order; the first one leading to an in-bounds unvisited neighbor is
/// carved, the neighbor pushed, and the scan restarts there. A cell with no
/// unvisited neighbor is popped. The stack empties exactly when every cell
/// has been visited once.
///
/// Afterwards the entrance's north wall and the exit's south wall are
/// opened so the rasterizer leaves visible gaps at the true boundary.
pub fn generate<R: Rng>(maze: &mut Maze, rng: &mut R) {
    let mut stack = vec![maze.start()];
    let mut visited = vec![false; maze.cell_count()];
    visited[maze.index(maze.start())] = true;

    'carve: while let Some(&current) = stack.last() {
        let order = DIRECTION_PERMUTATIONS[rng.random_range(0..DIRECTION_PERMUTATIONS.len())];
        for direction in order {
            if let Some(next) = maze.neighbor(current, direction) {
                if !visited[maze.index(next)] {
                    maze.carve(current, direction);
                    visited[maze.index(next)] = true;
                    stack.push(next);
                    continue 'carve;
                }
            }
        }

        // Dead end, backtrack.
        stack.pop();
    }

    let (start, finish) = (maze.start(), maze.finish());
    maze.at_mut(start).open(North);
    maze.at_mut(finish).open(South);
}

/// The seed actually used for a request: non-zero seeds pass through,
/// zero asks for a time-derived one.
pub fn resolve_seed(seed: u64) -> u64 {
    if seed != 0 {
        return seed;
    }

    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now().to_bits()
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos() as u64)
            .unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::{Cell, Position};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn generated(height: usize, width: usize, seed: u64, opposite: bool) -> Maze {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut maze = Maze::new(height, width, &mut rng, opposite).unwrap();
        generate(&mut maze, &mut rng);
        maze
    }

    /// Open wall-pairs between adjacent cells, excluding the two boundary
    /// gaps at entrance and exit.
    fn carved_pairs(maze: &Maze) -> usize {
        let total_openings: usize = maze.cells().iter().map(Cell::open_count).sum();
        // Interior openings are double counted, boundary gaps once each.
        (total_openings - 2) / 2
    }

    fn reachable_from_start(maze: &Maze) -> usize {
        let mut seen = vec![false; maze.cell_count()];
        let mut stack = vec![maze.start()];
        seen[maze.index(maze.start())] = true;
        let mut count = 0;
        while let Some(p) = stack.pop() {
            count += 1;
            for direction in Direction::ALL {
                if maze.at(p).is_open(direction) {
                    if let Some(np) = maze.neighbor(p, direction) {
                        if !seen[maze.index(np)] {
                            seen[maze.index(np)] = true;
                            stack.push(np);
                        }
                    }
                }
            }
        }
        count
    }

    #[test]
    fn carves_a_spanning_tree() {
        for (h, w, seed) in [(2, 2, 1), (5, 9, 42), (20, 20, 12345), (31, 7, 99)] {
            let maze = generated(h, w, seed, false);
            assert_eq!(carved_pairs(&maze), h * w - 1, "{h}x{w} seed {seed}");
            assert_eq!(reachable_from_start(&maze), h * w, "{h}x{w} seed {seed}");
        }
    }

    #[test]
    fn boundary_gaps_are_open() {
        let maze = generated(8, 8, 3, true);
        assert!(maze.at(maze.start()).is_open(Direction::North));
        assert!(maze.at(maze.finish()).is_open(Direction::South));
    }

    #[test]
    fn same_seed_reproduces_the_maze() {
        let a = generated(15, 12, 777, false);
        let b = generated(15, 12, 777, false);
        assert_eq!(a.start(), b.start());
        assert_eq!(a.finish(), b.finish());
        assert_eq!(a.cells(), b.cells());
    }

    #[test]
    fn different_seeds_differ() {
        let a = generated(10, 10, 1, true);
        let b = generated(10, 10, 2, true);
        assert_ne!(a.cells(), b.cells());
    }

    #[test]
    fn example_three_by_three_opposite() {
        let maze = generated(3, 3, 42, true);
        assert_eq!(maze.start(), Position::new(0, 0));
        assert_eq!(maze.finish(), Position::new(2, 2));
        assert_eq!(carved_pairs(&maze), 8);
    }

    #[test]
    fn resolve_seed_passes_nonzero_through() {
        assert_eq!(resolve_seed(42), 42);
        assert_eq!(resolve_seed(u64::MAX), u64::MAX);
    }

    #[test]
    fn seed_zero_varies_between_invocations() {
        let mut patterns = HashSet::new();
        for _ in 0..100 {
            let maze = generated(10, 10, resolve_seed(0), false);
            patterns.insert(maze.cells().to_vec());
        }
        assert!(
            patterns.len() >= 90,
            "only {} distinct carve patterns",
            patterns.len()
        );
    }
}
