#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomised spanning-tree maze generation.
//!
//! The generator performs an iterative depth-first walk over the grid graph.
//! Instead of drawing a random neighbour at every step, each cell is assigned
//! its complete direction-try order before the walk starts (see
//! [`permutations`]). The walk consumes those orders front to back and opens a
//! hall whenever a direction leads to an unvisited cell, so the halls always
//! form a spanning tree over every cell of the grid.

pub mod permutations;

use std::sync::OnceLock;

use log::debug;
use maze_dash_core::{CellIndex, ConfigError, Direction, MazeDimensions, WallId};
use rand::Rng;

pub use permutations::{
    select_four_way, select_three_way, select_two_way, DirectionOrder, SHUFFLED_DIRECTIONS,
};

/// Generates a maze over a `rows` x `columns` grid, starting the walk at cell
/// `start`.
///
/// Dimensions and start cell are validated before any generation state is
/// allocated. The random source is injected so seeded generators reproduce
/// identical mazes.
pub fn generate<R>(rows: u32, columns: u32, start: u32, rng: &mut R) -> Result<Maze, ConfigError>
where
    R: Rng + ?Sized,
{
    Ok(MazeGenerator::new(rows, columns, start)?.generate(rng))
}

/// Validated generation parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MazeGenerator {
    dimensions: MazeDimensions,
    start: CellIndex,
}

impl MazeGenerator {
    /// Validates the grid extents and start cell.
    pub fn new(rows: u32, columns: u32, start: u32) -> Result<Self, ConfigError> {
        let dimensions = MazeDimensions::new(rows, columns)?;
        let start = dimensions.validate_start(start)?;
        Ok(Self { dimensions, start })
    }

    /// Grid the generator walks.
    #[must_use]
    pub const fn dimensions(&self) -> MazeDimensions {
        self.dimensions
    }

    /// Cell the walk starts from.
    #[must_use]
    pub const fn start(&self) -> CellIndex {
        self.start
    }

    /// Runs the walk to completion and returns the resulting maze.
    pub fn generate<R>(&self, rng: &mut R) -> Maze
    where
        R: Rng + ?Sized,
    {
        let dimensions = self.dimensions;
        let cell_count = slot(CellIndex::new(dimensions.cell_count()));
        let mut orders = direction_orders(dimensions, rng);
        let mut visited = vec![false; cell_count];
        let mut halls = Vec::with_capacity(cell_count - 1);
        let mut stack = Vec::with_capacity(cell_count);

        visited[slot(self.start)] = true;
        stack.push(self.start);

        while let Some(&cell) = stack.last() {
            let order = &mut orders[slot(cell)];
            let direction = order.next();
            if order.is_exhausted() {
                // The cell is on top, so this removes it even when the
                // direction just taken opens a new hall.
                let _ = stack.pop();
            }

            let Some(direction) = direction else {
                continue;
            };
            let (Some(next), Some(wall)) = (
                dimensions.neighbor(cell, direction),
                dimensions.canonical_wall(cell, direction),
            ) else {
                continue;
            };
            if visited[slot(next)] {
                continue;
            }

            debug_assert!(
                dimensions.contains_wall(wall),
                "wall {} outside range {}",
                wall.get(),
                dimensions.wall_id_count()
            );
            visited[slot(next)] = true;
            stack.push(next);
            halls.push(wall);
        }

        debug!(
            "generated {}x{} maze from cell {} with {} halls",
            dimensions.rows(),
            dimensions.columns(),
            self.start.get(),
            halls.len()
        );

        Maze::new(dimensions, self.start, visited, halls)
    }
}

/// Assigns every cell its direction-try order, restricted to the directions
/// that stay on the grid.
fn direction_orders<R>(dimensions: MazeDimensions, rng: &mut R) -> Vec<DirectionOrder>
where
    R: Rng + ?Sized,
{
    let last_row = dimensions.rows() - 1;
    let last_column = dimensions.columns() - 1;
    let mut orders = Vec::with_capacity(slot(CellIndex::new(dimensions.cell_count())));

    for row in 0..dimensions.rows() {
        for column in 0..dimensions.columns() {
            let top = row == 0;
            let bottom = row == last_row;
            let left = column == 0;
            let right = column == last_column;

            let order = match (top, bottom, left, right) {
                (true, _, true, _) => select_two_way(rng, Direction::Right, Direction::Down),
                (true, _, _, true) => select_two_way(rng, Direction::Down, Direction::Left),
                (_, true, true, _) => select_two_way(rng, Direction::Up, Direction::Right),
                (_, true, _, true) => select_two_way(rng, Direction::Up, Direction::Left),
                (true, ..) => select_three_way(rng, Direction::Up),
                (_, true, ..) => select_three_way(rng, Direction::Down),
                (_, _, true, _) => select_three_way(rng, Direction::Left),
                (_, _, _, true) => select_three_way(rng, Direction::Right),
                _ => select_four_way(rng),
            };
            orders.push(order);
        }
    }

    orders
}

fn slot(cell: CellIndex) -> usize {
    cell.get() as usize
}

/// Immutable perfect maze produced by [`MazeGenerator::generate`].
#[derive(Debug)]
pub struct Maze {
    dimensions: MazeDimensions,
    start: CellIndex,
    visited: Vec<bool>,
    halls: Vec<WallId>,
    closed: Vec<bool>,
    walls: OnceLock<Vec<WallId>>,
}

impl Maze {
    fn new(
        dimensions: MazeDimensions,
        start: CellIndex,
        visited: Vec<bool>,
        halls: Vec<WallId>,
    ) -> Self {
        let mut closed = vec![true; dimensions.wall_id_count() as usize];
        for hall in &halls {
            closed[hall.get() as usize] = false;
        }

        Self {
            dimensions,
            start,
            visited,
            halls,
            closed,
            walls: OnceLock::new(),
        }
    }

    /// Grid the maze was generated over.
    #[must_use]
    pub const fn dimensions(&self) -> MazeDimensions {
        self.dimensions
    }

    /// Cell the generation walk started from.
    #[must_use]
    pub const fn start(&self) -> CellIndex {
        self.start
    }

    /// Open passages in the order the walk created them.
    #[must_use]
    pub fn halls(&self) -> &[WallId] {
        &self.halls
    }

    /// Closed edges in ascending identifier order.
    ///
    /// Computed on first access as the complement of [`Maze::halls`] over the
    /// canonical identifier range and cached afterwards.
    #[must_use]
    pub fn walls(&self) -> &[WallId] {
        self.walls.get_or_init(|| {
            (0..self.dimensions.wall_id_count())
                .map(WallId::from_raw)
                .filter(|wall| self.is_closed(*wall))
                .collect()
        })
    }

    /// Reports whether the edge is closed. Identifiers outside the canonical
    /// range name no passage and are reported closed.
    #[must_use]
    pub fn is_closed(&self, wall: WallId) -> bool {
        self.closed.get(wall.get() as usize).copied().unwrap_or(true)
    }

    /// Reports whether a passage leads from `cell` in `direction`.
    #[must_use]
    pub fn is_open(&self, cell: CellIndex, direction: Direction) -> bool {
        self.dimensions
            .canonical_wall(cell, direction)
            .is_some_and(|wall| !self.is_closed(wall))
    }

    /// Directions in which passages lead out of `cell`.
    pub fn passages(&self, cell: CellIndex) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL
            .into_iter()
            .filter(move |direction| self.is_open(cell, *direction))
    }

    /// Number of cells the walk reached.
    #[must_use]
    pub fn visited_count(&self) -> usize {
        self.visited.iter().filter(|visited| **visited).count()
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::mock::StepRng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn rejects_invalid_configuration() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(
            generate(1, 4, 0, &mut rng).map(|_| ()),
            Err(ConfigError::TooFewRows { rows: 1 })
        );
        assert_eq!(
            generate(4, 1, 0, &mut rng).map(|_| ()),
            Err(ConfigError::TooFewColumns { columns: 1 })
        );
        assert_eq!(
            generate(2, 3, 6, &mut rng).map(|_| ()),
            Err(ConfigError::StartOutOfRange {
                start: 6,
                cell_count: 6
            })
        );
    }

    #[test]
    fn corner_and_border_orders_stay_on_the_grid() {
        let dimensions = MazeDimensions::new(4, 5).expect("valid dimensions");
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let orders = direction_orders(dimensions, &mut rng);

        for (index, order) in orders.into_iter().enumerate() {
            let cell = CellIndex::new(index as u32);
            let directions: Vec<Direction> = order.collect();
            let expected = Direction::ALL
                .into_iter()
                .filter(|direction| dimensions.neighbor(cell, *direction).is_some())
                .count();
            assert_eq!(directions.len(), expected, "cell {index}");
            assert!(directions
                .iter()
                .all(|direction| dimensions.neighbor(cell, *direction).is_some()));
        }
    }

    #[test]
    fn zeroed_source_produces_known_halls() {
        let mut rng = StepRng::new(0, 0);
        let maze = generate(2, 2, 0, &mut rng).expect("valid configuration");

        let halls: Vec<u32> = maze.halls().iter().map(WallId::get).collect();
        assert_eq!(halls, vec![2, 7, 6]);
        let walls: Vec<u32> = maze.walls().iter().map(WallId::get).collect();
        assert_eq!(walls, vec![0, 1, 3, 4, 5]);
    }

    #[test]
    fn passages_follow_open_halls() {
        let mut rng = StepRng::new(0, 0);
        let maze = generate(2, 2, 0, &mut rng).expect("valid configuration");

        let from_origin: Vec<Direction> = maze.passages(CellIndex::new(0)).collect();
        assert_eq!(from_origin, vec![Direction::Right]);
        assert!(maze.is_open(CellIndex::new(1), Direction::Down));
        assert!(maze.is_open(CellIndex::new(3), Direction::Left));
        assert!(!maze.is_open(CellIndex::new(2), Direction::Up));
        assert_eq!(maze.visited_count(), 4);
    }
}
