#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Dash engine.
//!
//! This crate defines the data model that connects the maze generator, the
//! authoritative world, pure systems and adapters. Grid cells are addressed by
//! row-major [`CellIndex`] values and every edge of the grid graph is named by
//! exactly one canonical [`WallId`]. Adapters and systems submit [`Command`]
//! values describing desired mutations, the world executes them through its
//! `apply` entry point and broadcasts [`Event`] values in response.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Maze Dash.";

/// Smallest number of rows or columns a maze may be generated with.
pub const MIN_MAZE_EXTENT: u32 = 2;

/// Errors raised when construction-time configuration is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The maze needs at least two rows.
    #[error("rows must be 2 or greater (rows: {rows})")]
    TooFewRows {
        /// Rejected row count.
        rows: u32,
    },
    /// The maze needs at least two columns.
    #[error("columns must be 2 or greater (columns: {columns})")]
    TooFewColumns {
        /// Rejected column count.
        columns: u32,
    },
    /// The requested dimensions overflow the wall identifier range.
    #[error("maze of {rows}x{columns} cells exceeds the addressable wall range")]
    DimensionsTooLarge {
        /// Requested row count.
        rows: u32,
        /// Requested column count.
        columns: u32,
    },
    /// The start cell lies outside the grid.
    #[error("start cell {start} is outside the grid of {cell_count} cells")]
    StartOutOfRange {
        /// Rejected start cell.
        start: u32,
        /// Number of cells in the grid.
        cell_count: u32,
    },
    /// Spatial chunks must have a finite, positive edge length.
    #[error("chunk size must be finite and positive (received {chunk_size})")]
    InvalidChunkSize {
        /// Rejected chunk size.
        chunk_size: f32,
    },
    /// The pre-allocated chunk grid would exceed the bucket budget.
    #[error("chunk extent of {rows}x{columns} exceeds the bucket budget of {budget}")]
    ExtentTooLarge {
        /// Requested chunk rows.
        rows: u32,
        /// Requested chunk columns.
        columns: u32,
        /// Largest number of buckets that may be pre-allocated.
        budget: u64,
    },
    /// Maze cells must have a finite, positive edge length.
    #[error("cell length must be finite and positive (received {cell_length})")]
    InvalidCellLength {
        /// Rejected cell length.
        cell_length: f32,
    },
    /// Wall stripes must have a finite, positive thickness.
    #[error("line width must be finite and positive (received {line_width})")]
    InvalidLineWidth {
        /// Rejected line width.
        line_width: f32,
    },
    /// Player speed must be finite and non-negative.
    #[error("speed must be finite and non-negative (received {speed})")]
    InvalidSpeed {
        /// Rejected speed.
        speed: f32,
    },
}

/// Cardinal directions a passage can be opened in.
///
/// Each direction carries the 3-bit code used by packed direction orders; the
/// code `0` is reserved for "no direction".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing column indices.
    Right,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
}

impl Direction {
    /// All directions in ascending code order.
    pub const ALL: [Direction; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    /// Packed 3-bit code of the direction, in the range `1..=4`.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Up => 1,
            Self::Right => 2,
            Self::Down => 3,
            Self::Left => 4,
        }
    }

    /// Decodes a packed direction code. Returns `None` for `0` and any value
    /// outside `1..=4`.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Up),
            2 => Some(Self::Right),
            3 => Some(Self::Down),
            4 => Some(Self::Left),
            _ => None,
        }
    }

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Right => Self::Left,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
        }
    }
}

/// Row-major index of a single maze cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellIndex(u32);

impl CellIndex {
    /// Creates a new cell index wrapper.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the cell.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Which of a cell's own edges a [`WallId`] names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallSide {
    /// The vertical edge on the cell's left.
    Left,
    /// The horizontal edge above the cell.
    Top,
}

impl WallSide {
    const fn bit(self) -> u32 {
        match self {
            Self::Left => 0,
            Self::Top => 1,
        }
    }
}

/// Canonical identifier of one edge of the grid graph.
///
/// Encoded as `(cell << 1) | side` where the side bit selects the cell's own
/// left (`0`) or top (`1`) edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WallId(u32);

impl WallId {
    /// Names the given edge of the provided cell.
    #[must_use]
    pub const fn new(cell: CellIndex, side: WallSide) -> Self {
        Self((cell.get() << 1) | side.bit())
    }

    /// Wraps an already encoded identifier.
    #[must_use]
    pub const fn from_raw(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the encoded identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Cell whose own edge this identifier names.
    #[must_use]
    pub const fn cell(&self) -> CellIndex {
        CellIndex::new(self.0 >> 1)
    }

    /// Edge of [`WallId::cell`] this identifier names.
    #[must_use]
    pub const fn side(&self) -> WallSide {
        if self.0 & 1 == 1 {
            WallSide::Top
        } else {
            WallSide::Left
        }
    }
}

/// Validated row and column counts of a maze grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MazeDimensions {
    rows: u32,
    columns: u32,
}

impl MazeDimensions {
    /// Validates the provided extents.
    ///
    /// Both extents must be at least [`MIN_MAZE_EXTENT`] and the grid must be
    /// small enough for every wall identifier to fit in a `u32`.
    pub fn new(rows: u32, columns: u32) -> Result<Self, ConfigError> {
        if rows < MIN_MAZE_EXTENT {
            return Err(ConfigError::TooFewRows { rows });
        }
        if columns < MIN_MAZE_EXTENT {
            return Err(ConfigError::TooFewColumns { columns });
        }
        if rows
            .checked_mul(columns)
            .and_then(|cells| cells.checked_mul(2))
            .is_none()
        {
            return Err(ConfigError::DimensionsTooLarge { rows, columns });
        }

        Ok(Self { rows, columns })
    }

    /// Number of cell rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of cell columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Total number of cells in the grid.
    #[must_use]
    pub const fn cell_count(&self) -> u32 {
        self.rows * self.columns
    }

    /// Size of the canonical wall identifier range `[0, 2 * cells)`.
    #[must_use]
    pub const fn wall_id_count(&self) -> u32 {
        self.cell_count() * 2
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellIndex) -> bool {
        cell.get() < self.cell_count()
    }

    /// Reports whether the identifier lies inside the canonical wall range.
    #[must_use]
    pub const fn contains_wall(&self, wall: WallId) -> bool {
        wall.get() < self.wall_id_count()
    }

    /// Checks that `start` names a cell of the grid.
    pub fn validate_start(&self, start: u32) -> Result<CellIndex, ConfigError> {
        let cell = CellIndex::new(start);
        if self.contains(cell) {
            Ok(cell)
        } else {
            Err(ConfigError::StartOutOfRange {
                start,
                cell_count: self.cell_count(),
            })
        }
    }

    /// Splits a cell index into its `(row, column)` pair.
    #[must_use]
    pub const fn row_column(&self, cell: CellIndex) -> (u32, u32) {
        let column = cell.get() % self.columns;
        ((cell.get() - column) / self.columns, column)
    }

    /// Adjacent cell in the provided direction, or `None` when it would leave
    /// the grid.
    #[must_use]
    pub const fn neighbor(&self, cell: CellIndex, direction: Direction) -> Option<CellIndex> {
        if !self.contains(cell) {
            return None;
        }

        let (row, column) = self.row_column(cell);
        let index = cell.get();
        match direction {
            Direction::Up if row > 0 => Some(CellIndex::new(index - self.columns)),
            Direction::Right if column + 1 < self.columns => Some(CellIndex::new(index + 1)),
            Direction::Down if row + 1 < self.rows => Some(CellIndex::new(index + self.columns)),
            Direction::Left if column > 0 => Some(CellIndex::new(index - 1)),
            _ => None,
        }
    }

    /// Canonical identifier of the edge crossed when leaving `cell` in
    /// `direction`.
    ///
    /// Up and Left name the cell's own top and left edges, Right and Down name
    /// the neighbour's left and top edges. Returns `None` for edges on the
    /// outer boundary.
    #[must_use]
    pub const fn canonical_wall(&self, cell: CellIndex, direction: Direction) -> Option<WallId> {
        let Some(neighbor) = self.neighbor(cell, direction) else {
            return None;
        };

        Some(match direction {
            Direction::Up => WallId::new(cell, WallSide::Top),
            Direction::Right => WallId::new(neighbor, WallSide::Left),
            Direction::Down => WallId::new(neighbor, WallSide::Top),
            Direction::Left => WallId::new(cell, WallSide::Left),
        })
    }

    /// The two cells separated by an interior edge, ordered `(before, after)`
    /// in row-major order. Returns `None` for boundary edges and identifiers
    /// outside the canonical range.
    #[must_use]
    pub const fn separated_cells(&self, wall: WallId) -> Option<(CellIndex, CellIndex)> {
        if !self.contains_wall(wall) {
            return None;
        }

        let cell = wall.cell();
        let towards = match wall.side() {
            WallSide::Left => Direction::Left,
            WallSide::Top => Direction::Up,
        };
        match self.neighbor(cell, towards) {
            Some(neighbor) => Some((neighbor, cell)),
            None => None,
        }
    }
}

/// Point in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate, growing downwards.
    pub y: f32,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Signed per-axis velocity measured in world units per second.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    /// Horizontal component.
    pub dx: f32,
    /// Vertical component.
    pub dy: f32,
}

impl Velocity {
    /// Velocity that leaves positions unchanged.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Creates a new velocity.
    #[must_use]
    pub const fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }
}

/// Axis-aligned rectangle expressed in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl Rect {
    /// Creates a rectangle from its upper-left corner and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Left edge.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Top edge.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Horizontal extent.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Vertical extent.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Horizontal center.
    #[must_use]
    pub fn mid_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Vertical center.
    #[must_use]
    pub fn mid_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.mid_x(), self.mid_y())
    }

    /// Reports whether the two rectangles share interior area. Rectangles
    /// that merely touch along an edge do not intersect.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Reports whether the point lies inside the half-open rectangle.
    #[must_use]
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }
}

/// Identifier assigned to static geometry by the spatial index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RectId(u32);

impl RectId {
    /// Creates a new rectangle identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Immutable rectangle registered with the spatial index.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StaticRect {
    id: RectId,
    bounds: Rect,
}

impl StaticRect {
    /// Pairs the bounds with the identifier allocated for them.
    #[must_use]
    pub const fn new(id: RectId, bounds: Rect) -> Self {
        Self { id, bounds }
    }

    /// Identifier allocated on insertion.
    #[must_use]
    pub const fn id(&self) -> RectId {
        self.id
    }

    /// Geometry of the rectangle.
    #[must_use]
    pub const fn bounds(&self) -> &Rect {
        &self.bounds
    }

    /// Horizontal center of the rectangle.
    #[must_use]
    pub fn mid_x(&self) -> f32 {
        self.bounds.mid_x()
    }

    /// Vertical center of the rectangle.
    #[must_use]
    pub fn mid_y(&self) -> f32 {
        self.bounds.mid_y()
    }
}

/// Location of a spatial chunk expressed as signed row and column indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    row: i32,
    column: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[must_use]
    pub const fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    /// Chunk containing the provided point for the given chunk edge length.
    ///
    /// Coordinates are floored so points left of or above the origin land in
    /// negative chunks.
    #[must_use]
    pub fn containing(x: f32, y: f32, chunk_size: f32) -> Self {
        Self {
            row: (y / chunk_size).floor() as i32,
            column: (x / chunk_size).floor() as i32,
        }
    }

    /// Zero-based row, negative above the origin.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Zero-based column, negative left of the origin.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Maximum of the per-axis distances between two chunks.
    #[must_use]
    pub fn chebyshev_distance(self, other: ChunkCoord) -> u32 {
        self.row
            .abs_diff(other.row)
            .max(self.column.abs_diff(other.column))
    }

    /// The 3x3 block of chunks centered on this one, row by row.
    pub fn neighborhood(self) -> impl Iterator<Item = ChunkCoord> {
        (-1..=1).flat_map(move |row_offset| {
            (-1..=1).map(move |column_offset| {
                ChunkCoord::new(
                    self.row.saturating_add(row_offset),
                    self.column.saturating_add(column_offset),
                )
            })
        })
    }
}

/// Moving rectangle integrated once per tick, such as the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Entity {
    position: Point,
    width: f32,
    height: f32,
    velocity: Velocity,
}

impl Entity {
    /// Creates a resting entity whose upper-left corner sits at `position`.
    #[must_use]
    pub const fn new(position: Point, width: f32, height: f32) -> Self {
        Self {
            position,
            width,
            height,
            velocity: Velocity::ZERO,
        }
    }

    /// Upper-left corner of the entity.
    #[must_use]
    pub const fn position(&self) -> Point {
        self.position
    }

    /// Current velocity.
    #[must_use]
    pub const fn velocity(&self) -> Velocity {
        self.velocity
    }

    /// Replaces the velocity applied by subsequent integration steps.
    pub fn set_velocity(&mut self, velocity: Velocity) {
        self.velocity = velocity;
    }

    /// Bounding rectangle of the entity.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.width, self.height)
    }

    /// Center of the entity's bounds.
    #[must_use]
    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Advances the position by `velocity * dt` and returns the new position.
    pub fn integrate(&mut self, dt: Duration) -> Point {
        let seconds = dt.as_secs_f32();
        self.position.x += self.velocity.dx * seconds;
        self.position.y += self.velocity.dy * seconds;
        self.position
    }
}

/// Keyboard keys the game reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Key {
    /// Moves the player up.
    ArrowUp,
    /// Moves the player right.
    ArrowRight,
    /// Moves the player down.
    ArrowDown,
    /// Moves the player left.
    ArrowLeft,
}

impl Key {
    /// Parses a key from its DOM-style name, such as `"ArrowUp"`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ArrowUp" => Some(Self::ArrowUp),
            "ArrowRight" => Some(Self::ArrowRight),
            "ArrowDown" => Some(Self::ArrowDown),
            "ArrowLeft" => Some(Self::ArrowLeft),
            _ => None,
        }
    }

    /// Direction the key steers toward.
    #[must_use]
    pub const fn direction(self) -> Direction {
        match self {
            Self::ArrowUp => Direction::Up,
            Self::ArrowRight => Direction::Right,
            Self::ArrowDown => Direction::Down,
            Self::ArrowLeft => Direction::Left,
        }
    }
}

/// Raw key transition reported by an input adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyEvent {
    /// The key went down.
    Pressed(Key),
    /// The key went up.
    Released(Key),
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Registers immutable geometry with the spatial index.
    AddStaticRect {
        /// Bounds of the geometry to register.
        rect: Rect,
    },
    /// Replaces the player's velocity.
    SetPlayerVelocity {
        /// Velocity applied from the next tick onward.
        velocity: Velocity,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that static geometry was registered.
    StaticRectAdded {
        /// Identifier allocated to the geometry.
        id: RectId,
        /// Chunk containing the geometry's center.
        chunk: ChunkCoord,
    },
    /// Confirms that the player's velocity changed.
    PlayerVelocityChanged {
        /// Velocity now applied to the player.
        velocity: Velocity,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Reports that the player's position changed during a tick.
    PlayerMoved {
        /// Position before integration.
        from: Point,
        /// Position after integration.
        to: Point,
    },
}
