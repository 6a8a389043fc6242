use std::collections::HashSet;

use maze_dash_core::{CellIndex, MazeDimensions, WallId};
use maze_dash_system_maze_generation::{generate, Maze};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

struct DisjointSet {
    parents: Vec<usize>,
}

impl DisjointSet {
    fn new(len: usize) -> Self {
        Self {
            parents: (0..len).collect(),
        }
    }

    fn find(&mut self, mut node: usize) -> usize {
        while self.parents[node] != node {
            self.parents[node] = self.parents[self.parents[node]];
            node = self.parents[node];
        }
        node
    }

    fn union(&mut self, a: usize, b: usize) -> bool {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return false;
        }
        self.parents[root_a] = root_b;
        true
    }
}

fn seeded_maze(rows: u32, columns: u32, start: u32, seed: u64) -> Maze {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate(rows, columns, start, &mut rng).expect("valid configuration")
}

fn assert_spanning_tree(maze: &Maze) {
    let dimensions = maze.dimensions();
    let cell_count = dimensions.cell_count() as usize;
    assert_eq!(maze.halls().len(), cell_count - 1);
    assert_eq!(maze.visited_count(), cell_count);

    let distinct: HashSet<WallId> = maze.halls().iter().copied().collect();
    assert_eq!(distinct.len(), maze.halls().len(), "halls must be distinct");

    let mut sets = DisjointSet::new(cell_count);
    let mut joined = 0;
    for hall in maze.halls() {
        let (a, b) = dimensions
            .separated_cells(*hall)
            .expect("every hall separates two grid cells");
        assert!(
            sets.union(a.get() as usize, b.get() as usize),
            "hall {} closes a cycle",
            hall.get()
        );
        joined += 1;
    }
    assert_eq!(joined, cell_count - 1);
}

fn assert_partition(maze: &Maze) {
    let halls: HashSet<WallId> = maze.halls().iter().copied().collect();
    let walls: HashSet<WallId> = maze.walls().iter().copied().collect();
    assert!(halls.is_disjoint(&walls));

    let all: HashSet<WallId> = (0..maze.dimensions().wall_id_count())
        .map(WallId::from_raw)
        .collect();
    let union: HashSet<WallId> = halls.union(&walls).copied().collect();
    assert_eq!(union, all);
}

#[test]
fn smallest_maze_has_three_halls() {
    let maze = seeded_maze(2, 2, 0, 1);
    assert_eq!(maze.halls().len(), 3);
    assert_spanning_tree(&maze);
    assert_partition(&maze);
    assert_eq!(maze.walls().len(), 5);
}

#[test]
fn every_start_cell_spans_the_grid() {
    let dimensions = MazeDimensions::new(5, 7).expect("valid dimensions");
    for start in 0..dimensions.cell_count() {
        let maze = seeded_maze(5, 7, start, u64::from(start));
        assert_eq!(maze.start(), CellIndex::new(start));
        assert_spanning_tree(&maze);
    }
}

#[test]
fn walls_are_cached_after_first_access() {
    let maze = seeded_maze(6, 6, 0, 5);
    let first = maze.walls().as_ptr();
    let second = maze.walls().as_ptr();
    assert_eq!(first, second);
    assert!(maze.walls().iter().all(|wall| maze.is_closed(*wall)));
    assert!(maze.halls().iter().all(|hall| !maze.is_closed(*hall)));
}

#[test]
fn large_grid_generates_without_recursion() {
    let maze = seeded_maze(300, 300, 45_150, 17);
    assert_eq!(maze.halls().len(), 300 * 300 - 1);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn halls_form_a_spanning_tree(
        rows in 2u32..16,
        columns in 2u32..16,
        start_seed in any::<u32>(),
        seed in any::<u64>(),
    ) {
        let start = start_seed % (rows * columns);
        let maze = seeded_maze(rows, columns, start, seed);
        assert_spanning_tree(&maze);
        assert_partition(&maze);
    }
}
