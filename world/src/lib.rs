#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Maze Dash.
//!
//! The world owns the broad-phase [`SpatialIndex`] populated with static
//! geometry during setup and the player entity integrated once per tick.
//! Mutations arrive exclusively as [`Command`] values through [`apply`];
//! everything else reads state through the [`query`] module.

mod spatial;

use log::debug;
use maze_dash_core::{Command, ConfigError, Entity, Event, Point, WELCOME_BANNER};

pub use spatial::{NearbyObjects, SpatialIndex, MAX_PREALLOCATED_BUCKETS};

const DEFAULT_CHUNK_SIZE: f32 = 50.0;
const DEFAULT_EXTENT: u32 = 20;
const DEFAULT_PLAYER_SIZE: f32 = 10.0;

/// Construction-time configuration of the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldConfig {
    /// Edge length of a spatial chunk in world units.
    pub chunk_size: f32,
    /// Number of chunk rows pre-allocated from the origin.
    pub extent_rows: u32,
    /// Number of chunk columns pre-allocated from the origin.
    pub extent_columns: u32,
    /// Upper-left corner the player spawns at.
    pub spawn: Point,
    /// Width of the player's bounds.
    pub player_width: f32,
    /// Height of the player's bounds.
    pub player_height: f32,
}

impl WorldConfig {
    /// Configuration whose pre-allocated extent covers a play field of the
    /// given size, measured in world units.
    #[must_use]
    pub fn covering(chunk_size: f32, width: f32, height: f32) -> Self {
        Self {
            chunk_size,
            extent_rows: chunks_spanning(height, chunk_size),
            extent_columns: chunks_spanning(width, chunk_size),
            ..Self::default()
        }
    }

    /// Replaces the player's spawn point and size.
    #[must_use]
    pub fn with_player(mut self, spawn: Point, width: f32, height: f32) -> Self {
        self.spawn = spawn;
        self.player_width = width;
        self.player_height = height;
        self
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            extent_rows: DEFAULT_EXTENT,
            extent_columns: DEFAULT_EXTENT,
            spawn: Point::new(0.0, 0.0),
            player_width: DEFAULT_PLAYER_SIZE,
            player_height: DEFAULT_PLAYER_SIZE,
        }
    }
}

fn chunks_spanning(length: f32, chunk_size: f32) -> u32 {
    if !length.is_finite() || !chunk_size.is_finite() || length <= 0.0 || chunk_size <= 0.0 {
        return 0;
    }
    (length / chunk_size).ceil() as u32
}

/// Represents the authoritative Maze Dash world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    index: SpatialIndex,
    player: Entity,
    tick_index: u64,
}

impl World {
    /// Creates a world with an empty spatial index and a resting player.
    pub fn new(config: WorldConfig) -> Result<Self, ConfigError> {
        let index =
            SpatialIndex::with_extent(config.chunk_size, config.extent_rows, config.extent_columns)?;
        debug!(
            "world created with {} buckets of size {}",
            index.bucket_count(),
            config.chunk_size
        );

        Ok(Self {
            banner: WELCOME_BANNER,
            index,
            player: Entity::new(config.spawn, config.player_width, config.player_height),
            tick_index: 0,
        })
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::AddStaticRect { rect } => {
            let entry = world.index.add_static_rect(rect);
            out_events.push(Event::StaticRectAdded {
                id: entry.id(),
                chunk: world.index.chunk_of(entry.mid_x(), entry.mid_y()),
            });
        }
        Command::SetPlayerVelocity { velocity } => {
            if world.player.velocity() != velocity {
                world.player.set_velocity(velocity);
                out_events.push(Event::PlayerVelocityChanged { velocity });
            }
        }
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });

            let from = world.player.position();
            let to = world.player.integrate(dt);
            if from != to {
                out_events.push(Event::PlayerMoved { from, to });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use maze_dash_core::Entity;

    use super::{NearbyObjects, SpatialIndex, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the player entity.
    #[must_use]
    pub fn player(world: &World) -> &Entity {
        &world.player
    }

    /// Static geometry registered near the provided point.
    #[must_use]
    pub fn nearby_objects(world: &World, x: f32, y: f32) -> NearbyObjects<'_> {
        world.index.nearby_objects(x, y)
    }

    /// Static geometry registered near the player's center.
    #[must_use]
    pub fn nearby_player_objects(world: &World) -> NearbyObjects<'_> {
        let center = world.player.center();
        world.index.nearby_objects(center.x, center.y)
    }

    /// Provides read-only access to the spatial index.
    #[must_use]
    pub fn spatial_index(world: &World) -> &SpatialIndex {
        &world.index
    }

    /// Number of static rectangles registered with the world.
    #[must_use]
    pub fn static_rect_count(world: &World) -> usize {
        world.index.len()
    }

    /// Edge length of a spatial chunk.
    #[must_use]
    pub fn chunk_size(world: &World) -> f32 {
        world.index.chunk_size()
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covering_rounds_extents_up() {
        let config = WorldConfig::covering(30.0, 100.0, 60.0);
        assert_eq!(config.extent_columns, 4);
        assert_eq!(config.extent_rows, 2);
    }

    #[test]
    fn invalid_chunk_size_is_rejected() {
        let config = WorldConfig {
            chunk_size: -3.0,
            ..WorldConfig::default()
        };
        assert!(matches!(
            World::new(config),
            Err(ConfigError::InvalidChunkSize { .. })
        ));
    }

    #[test]
    fn tiny_chunks_over_a_large_field_are_rejected() {
        let config = WorldConfig::covering(0.05, 995.0, 995.0);
        assert!(matches!(
            World::new(config),
            Err(ConfigError::ExtentTooLarge {
                budget: MAX_PREALLOCATED_BUCKETS,
                ..
            })
        ));
    }

    #[test]
    fn new_world_starts_at_tick_zero() {
        let world = World::new(WorldConfig::default()).expect("valid config");
        assert_eq!(query::tick_index(&world), 0);
        assert_eq!(query::static_rect_count(&world), 0);
        assert_eq!(query::welcome_banner(&world), WELCOME_BANNER);
    }
}
