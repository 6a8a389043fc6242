#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Movement system that reduces raw key events to a player velocity.
//!
//! The system tracks which arrow keys are held and emits a
//! [`Command::SetPlayerVelocity`] whenever the reduced velocity changes.
//! Opposing keys on one axis resolve toward up and left. How the two axes
//! combine is a configurable [`AxisPriority`] policy.

use log::trace;
use maze_dash_core::{Command, ConfigError, Direction, Key, KeyEvent, Velocity};

const DEFAULT_SPEED: f32 = 300.0;

/// Axis evaluated first when keys on both axes are held.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AxisPriority {
    /// Vertical keys win over horizontal keys.
    #[default]
    VerticalFirst,
    /// Horizontal keys win over vertical keys.
    HorizontalFirst,
}

/// Tuning applied when reducing held keys to a velocity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovementConfig {
    /// Player speed in world units per second.
    pub speed: f32,
    /// Axis that wins when `diagonal` is disabled.
    pub priority: AxisPriority,
    /// Lets both axes contribute at once instead of only the prioritised one.
    pub diagonal: bool,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            priority: AxisPriority::VerticalFirst,
            diagonal: false,
        }
    }
}

/// Pure system that reacts to key events and emits velocity commands.
#[derive(Debug)]
pub struct Movement {
    config: MovementConfig,
    held: HeldKeys,
    velocity: Velocity,
}

impl Movement {
    /// Creates a movement system with no keys held.
    pub fn new(config: MovementConfig) -> Result<Self, ConfigError> {
        if !config.speed.is_finite() || config.speed < 0.0 {
            return Err(ConfigError::InvalidSpeed {
                speed: config.speed,
            });
        }

        Ok(Self {
            config,
            held: HeldKeys::default(),
            velocity: Velocity::ZERO,
        })
    }

    /// Consumes key events and emits a velocity command when the reduced
    /// velocity differs from the last one emitted.
    pub fn handle(&mut self, key_events: &[KeyEvent], out: &mut Vec<Command>) {
        for event in key_events {
            match *event {
                KeyEvent::Pressed(key) => self.held.set(key, true),
                KeyEvent::Released(key) => self.held.set(key, false),
            }
        }

        let velocity = self.reduce();
        if velocity != self.velocity {
            trace!("player velocity {:?} -> {:?}", self.velocity, velocity);
            self.velocity = velocity;
            out.push(Command::SetPlayerVelocity { velocity });
        }
    }

    /// Velocity most recently emitted.
    #[must_use]
    pub const fn velocity(&self) -> Velocity {
        self.velocity
    }

    /// Reports whether the key is currently held.
    #[must_use]
    pub fn is_held(&self, key: Key) -> bool {
        self.held.get(key)
    }

    fn reduce(&self) -> Velocity {
        let vertical = self.held.axis(Direction::Up, Direction::Down);
        let horizontal = self.held.axis(Direction::Left, Direction::Right);
        let speed = self.config.speed;

        let (dx, dy) = if self.config.diagonal {
            (horizontal, vertical)
        } else {
            match self.config.priority {
                AxisPriority::VerticalFirst if vertical != 0.0 => (0.0, vertical),
                AxisPriority::VerticalFirst => (horizontal, 0.0),
                AxisPriority::HorizontalFirst if horizontal != 0.0 => (horizontal, 0.0),
                AxisPriority::HorizontalFirst => (0.0, vertical),
            }
        };

        Velocity::new(dx * speed, dy * speed)
    }
}

impl Default for Movement {
    fn default() -> Self {
        Self {
            config: MovementConfig::default(),
            held: HeldKeys::default(),
            velocity: Velocity::ZERO,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct HeldKeys {
    by_direction: [bool; 4],
}

impl HeldKeys {
    fn slot(direction: Direction) -> usize {
        usize::from(direction.code() - 1)
    }

    fn set(&mut self, key: Key, held: bool) {
        self.by_direction[Self::slot(key.direction())] = held;
    }

    fn get(&self, key: Key) -> bool {
        self.is_held(key.direction())
    }

    fn is_held(&self, direction: Direction) -> bool {
        self.by_direction[Self::slot(direction)]
    }

    /// Signed unit step along one axis; `negative` wins when both are held.
    fn axis(&self, negative: Direction, positive: Direction) -> f32 {
        if self.is_held(negative) {
            -1.0
        } else if self.is_held(positive) {
            1.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_speed_is_rejected() {
        let config = MovementConfig {
            speed: -1.0,
            ..MovementConfig::default()
        };
        assert!(matches!(
            Movement::new(config),
            Err(ConfigError::InvalidSpeed { .. })
        ));
    }

    #[test]
    fn opposing_keys_resolve_toward_up_and_left() {
        let mut held = HeldKeys::default();
        held.set(Key::ArrowDown, true);
        held.set(Key::ArrowUp, true);
        held.set(Key::ArrowRight, true);
        held.set(Key::ArrowLeft, true);
        assert_eq!(held.axis(Direction::Up, Direction::Down), -1.0);
        assert_eq!(held.axis(Direction::Left, Direction::Right), -1.0);

        held.set(Key::ArrowUp, false);
        assert_eq!(held.axis(Direction::Up, Direction::Down), 1.0);
    }
}
