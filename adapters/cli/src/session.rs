//! Wires generation, geometry, world, movement and overlay into one loop.

use std::time::Duration;

use anyhow::{Context, Result};
use glam::Vec2;
use log::info;
use maze_dash_core::{Command, Event, Point, RectId};
use maze_dash_rendering::{Color, FrameInput, Scene, SceneRect};
use maze_dash_system_geometry::WallGeometry;
use maze_dash_system_maze_generation::{generate, Maze};
use maze_dash_system_movement::Movement;
use maze_dash_system_overlay::Overlay;
use maze_dash_world::{self as world, query, World, WorldConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::GameConfig;

pub(crate) const WALL_COLOR: Color = Color::from_rgb_u8(220, 220, 220);
pub(crate) const PLAYER_COLOR: Color = Color::from_rgb_u8(240, 80, 60);
pub(crate) const HIGHLIGHT_COLOR: Color = Color::from_rgb_u8(80, 200, 120);

/// Running game: the generated maze plus the systems that act on the world.
#[derive(Debug)]
pub(crate) struct Session {
    maze: Maze,
    geometry: WallGeometry,
    world: World,
    movement: Movement,
    overlay: Overlay,
    commands: Vec<Command>,
    events: Vec<Event>,
}

impl Session {
    /// Generates the maze and registers its walls with a fresh world.
    pub(crate) fn new(config: &GameConfig) -> Result<Self> {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let maze = generate(config.rows, config.columns, config.start, &mut rng)
            .context("invalid maze configuration")?;
        let geometry = WallGeometry::new(config.cell_length, config.line_width)
            .context("invalid wall geometry")?;
        let movement = Movement::new(config.movement()).context("invalid movement tuning")?;

        let dimensions = maze.dimensions();
        let (width, height) = geometry.play_field(dimensions);
        let interior = geometry.cell_interior(dimensions, maze.start());
        let side = interior.width() / 2.0;
        let spawn = Point::new(
            interior.mid_x() - side / 2.0,
            interior.mid_y() - side / 2.0,
        );
        let world_config =
            WorldConfig::covering(config.chunk_size, width, height).with_player(spawn, side, side);
        let world = World::new(world_config).context("invalid world configuration")?;

        let mut session = Self {
            maze,
            geometry,
            world,
            movement,
            overlay: Overlay::new(),
            commands: Vec::new(),
            events: Vec::new(),
        };
        session.geometry.handle(&session.maze, &mut session.commands);
        session.flush();
        info!(
            "{}x{} maze ready with {} static rects",
            dimensions.rows(),
            dimensions.columns(),
            query::static_rect_count(&session.world)
        );
        Ok(session)
    }

    /// Runs one tick: input reduction, integration, then overlay refresh.
    pub(crate) fn step(&mut self, dt: Duration, input: &FrameInput) {
        self.movement.handle(&input.key_events, &mut self.commands);
        self.commands.push(Command::Tick { dt });
        self.flush();
    }

    fn flush(&mut self) {
        self.events.clear();
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
        self.overlay.handle(&self.events, &self.world);
    }

    /// Scene mirroring every registered wall and the current player.
    pub(crate) fn scene(&self) -> Result<Scene> {
        let (width, height) = self.geometry.play_field(self.maze.dimensions());
        let index = query::spatial_index(&self.world);
        let walls = (0..index.len() as u32)
            .filter_map(|id| index.get(RectId::new(id)))
            .map(|rect| SceneRect::from_rect(*rect.bounds(), WALL_COLOR))
            .collect();
        let player = SceneRect::from_rect(query::player(&self.world).bounds(), PLAYER_COLOR);

        let mut scene = Scene::new(width, height, walls, player).context("invalid scene extents")?;
        self.update_scene(&mut scene);
        Ok(scene)
    }

    /// Moves the player and replaces the overlay highlights.
    pub(crate) fn update_scene(&self, scene: &mut Scene) {
        let player = query::player(&self.world);
        scene.player = SceneRect::from_rect(player.bounds(), PLAYER_COLOR);

        let index = query::spatial_index(&self.world);
        scene.highlights = self
            .overlay
            .last_view()
            .map(|view| {
                view.overlapping
                    .iter()
                    .filter_map(|id| index.get(*id))
                    .map(|rect| SceneRect::from_rect(*rect.bounds(), HIGHLIGHT_COLOR))
                    .collect()
            })
            .unwrap_or_default();
    }

    /// Figures reported once the loop stops.
    pub(crate) fn summary(&self) -> Summary {
        let view = self.overlay.last_view();
        let position = query::player(&self.world).position();
        Summary {
            ticks: query::tick_index(&self.world),
            halls: self.maze.halls().len(),
            static_rects: query::static_rect_count(&self.world),
            player: Vec2::new(position.x, position.y),
            candidates: view.map_or(0, |view| view.candidates.len()),
            overlapping: view.map_or(0, |view| view.overlapping.len()),
        }
    }
}

/// End-of-run report printed below the final frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Summary {
    pub(crate) ticks: u64,
    pub(crate) halls: usize,
    pub(crate) static_rects: usize,
    pub(crate) player: Vec2,
    pub(crate) candidates: usize,
    pub(crate) overlapping: usize,
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "ticks: {}", self.ticks)?;
        writeln!(f, "halls: {}", self.halls)?;
        writeln!(f, "static rects: {}", self.static_rects)?;
        writeln!(f, "player: ({:.1}, {:.1})", self.player.x, self.player.y)?;
        write!(
            f,
            "nearby: {} candidates, {} overlapping",
            self.candidates, self.overlapping
        )
    }
}
