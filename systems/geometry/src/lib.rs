#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns closed maze edges into static world geometry.
//!
//! Every wall identifier decodes to a cell and a side. Top edges become
//! horizontal stripes and left edges become vertical stripes anchored at the
//! cell's upper-left corner. Stripes extend one line width past the cell so
//! neighbouring stripes meet without gaps at the corners.

use log::debug;
use maze_dash_core::{
    CellIndex, Command, ConfigError, MazeDimensions, Point, Rect, WallId, WallSide,
};
use maze_dash_system_maze_generation::Maze;

/// Converts maze edges into rectangles for a given cell size and line width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallGeometry {
    cell_length: f32,
    line_width: f32,
}

impl WallGeometry {
    /// Validates the geometry parameters.
    pub fn new(cell_length: f32, line_width: f32) -> Result<Self, ConfigError> {
        if !cell_length.is_finite() || cell_length <= 0.0 {
            return Err(ConfigError::InvalidCellLength { cell_length });
        }
        if !line_width.is_finite() || line_width <= 0.0 {
            return Err(ConfigError::InvalidLineWidth { line_width });
        }

        Ok(Self {
            cell_length,
            line_width,
        })
    }

    /// Edge length of a maze cell in world units.
    #[must_use]
    pub const fn cell_length(&self) -> f32 {
        self.cell_length
    }

    /// Thickness of a wall stripe in world units.
    #[must_use]
    pub const fn line_width(&self) -> f32 {
        self.line_width
    }

    /// Upper-left corner of a cell, on the outer edge of its wall stripes.
    #[must_use]
    pub fn cell_origin(&self, dimensions: MazeDimensions, cell: CellIndex) -> Point {
        let (row, column) = dimensions.row_column(cell);
        Point::new(
            column as f32 * self.cell_length,
            row as f32 * self.cell_length,
        )
    }

    /// Area of a cell left free between its own left and top stripes and
    /// the stripes of its right and lower neighbours.
    #[must_use]
    pub fn cell_interior(&self, dimensions: MazeDimensions, cell: CellIndex) -> Rect {
        let origin = self.cell_origin(dimensions, cell);
        let free = self.cell_length - self.line_width;
        Rect::new(
            origin.x + self.line_width,
            origin.y + self.line_width,
            free,
            free,
        )
    }

    /// Total width and height covered by the maze and its boundary.
    #[must_use]
    pub fn play_field(&self, dimensions: MazeDimensions) -> (f32, f32) {
        (
            dimensions.columns() as f32 * self.cell_length + self.line_width,
            dimensions.rows() as f32 * self.cell_length + self.line_width,
        )
    }

    /// Stripe covering the edge named by `wall`.
    #[must_use]
    pub fn rect_for(&self, dimensions: MazeDimensions, wall: WallId) -> Rect {
        let origin = self.cell_origin(dimensions, wall.cell());
        let span = self.cell_length + self.line_width;
        match wall.side() {
            WallSide::Top => Rect::new(origin.x, origin.y, span, self.line_width),
            WallSide::Left => Rect::new(origin.x, origin.y, self.line_width, span),
        }
    }

    /// One stripe per closed edge, in [`Maze::walls`] order.
    #[must_use]
    pub fn wall_rects(&self, maze: &Maze) -> Vec<Rect> {
        let dimensions = maze.dimensions();
        maze.walls()
            .iter()
            .map(|wall| self.rect_for(dimensions, *wall))
            .collect()
    }

    /// Stripes along the bottom and right outer edges, which have no wall
    /// identifier of their own.
    #[must_use]
    pub fn boundary_rects(&self, dimensions: MazeDimensions) -> [Rect; 2] {
        let width = dimensions.columns() as f32 * self.cell_length;
        let height = dimensions.rows() as f32 * self.cell_length;
        [
            Rect::new(0.0, height, width + self.line_width, self.line_width),
            Rect::new(width, 0.0, self.line_width, height + self.line_width),
        ]
    }

    /// Emits one registration command per wall stripe followed by the
    /// boundary stripes.
    pub fn handle(&self, maze: &Maze, out: &mut Vec<Command>) {
        let before = out.len();
        out.extend(
            self.wall_rects(maze)
                .into_iter()
                .chain(self.boundary_rects(maze.dimensions()))
                .map(|rect| Command::AddStaticRect { rect }),
        );
        debug!("emitted {} static wall rects", out.len() - before);
    }
}
