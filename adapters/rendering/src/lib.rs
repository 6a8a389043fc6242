#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Maze Dash adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use maze_dash_core::{KeyEvent, Rect};
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self::new(
            red as f32 / 255.0,
            green as f32 / 255.0,
            blue as f32 / 255.0,
            1.0,
        )
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Key transitions observed since the previous frame, in arrival order.
    pub key_events: Vec<KeyEvent>,
}

/// Filled rectangle expressed in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneRect {
    /// Upper-left corner.
    pub origin: Vec2,
    /// Width and height.
    pub size: Vec2,
    /// Fill color.
    pub color: Color,
}

impl SceneRect {
    /// Creates a new scene rectangle.
    #[must_use]
    pub const fn new(origin: Vec2, size: Vec2, color: Color) -> Self {
        Self {
            origin,
            size,
            color,
        }
    }

    /// Mirrors world geometry into a drawable rectangle.
    #[must_use]
    pub fn from_rect(rect: Rect, color: Color) -> Self {
        Self::new(
            Vec2::new(rect.x(), rect.y()),
            Vec2::new(rect.width(), rect.height()),
            color,
        )
    }

    /// Lower-right corner.
    #[must_use]
    pub fn end(&self) -> Vec2 {
        self.origin + self.size
    }

    /// Reports whether the point lies inside the half-open rectangle.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        let end = self.end();
        point.x >= self.origin.x && point.x < end.x && point.y >= self.origin.y && point.y < end.y
    }
}

/// Scene description combining static walls, the player and debug
/// highlights.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Width of the drawable area in world units.
    pub width: f32,
    /// Height of the drawable area in world units.
    pub height: f32,
    /// Static wall stripes.
    pub walls: Vec<SceneRect>,
    /// Player rectangle.
    pub player: SceneRect,
    /// Geometry emphasised by the debug overlay, drawn above the walls.
    pub highlights: Vec<SceneRect>,
}

impl Scene {
    /// Creates a scene without highlights.
    pub fn new(
        width: f32,
        height: f32,
        walls: Vec<SceneRect>,
        player: SceneRect,
    ) -> Result<Self, RenderingError> {
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return Err(RenderingError::InvalidSceneSize { width, height });
        }

        Ok(Self {
            width,
            height,
            walls,
            player,
            highlights: Vec::new(),
        })
    }

    /// Width and height as a vector.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Topmost rectangle covering the point, if any. The player draws above
    /// highlights, which draw above walls.
    #[must_use]
    pub fn topmost_at(&self, point: Vec2) -> Option<&SceneRect> {
        std::iter::once(&self.player)
            .chain(self.highlights.iter().rev())
            .chain(self.walls.iter().rev())
            .find(|rect| rect.contains(point))
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title shown by the backend.
    pub title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Fixed simulated time between two frames.
    pub frame_interval: Duration,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    pub fn new<T>(
        title: T,
        clear_color: Color,
        frame_interval: Duration,
        scene: Scene,
    ) -> Result<Self, RenderingError>
    where
        T: Into<String>,
    {
        if frame_interval.is_zero() {
            return Err(RenderingError::ZeroFrameInterval);
        }

        Ok(Self {
            title: title.into(),
            clear_color,
            frame_interval,
            scene,
        })
    }
}

/// Rendering backend capable of presenting Maze Dash scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the fixed frame interval,
    /// per-frame input captured by the adapter, and may mutate the scene before
    /// it is rendered, allowing adapters to animate world snapshots
    /// deterministically.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene);
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Scene extents must be positive and finite.
    InvalidSceneSize {
        /// Provided width.
        width: f32,
        /// Provided height.
        height: f32,
    },
    /// Frames must advance simulated time.
    ZeroFrameInterval,
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSceneSize { width, height } => {
                write!(
                    f,
                    "scene size must be positive (received {width} x {height})"
                )
            }
            Self::ZeroFrameInterval => write!(f, "frame interval must be non-zero"),
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> SceneRect {
        SceneRect::new(
            Vec2::new(5.0, 5.0),
            Vec2::splat(10.0),
            Color::from_rgb_u8(255, 0, 0),
        )
    }

    #[test]
    fn byte_channels_scale_to_unit_range() {
        assert_eq!(
            Color::from_rgb_u8(255, 0, 255),
            Color::new(1.0, 0.0, 1.0, 1.0)
        );
    }

    #[test]
    fn scene_creation_rejects_empty_extents_without_panicking() {
        let error = Scene::new(0.0, 10.0, Vec::new(), player())
            .expect_err("zero width must be rejected");

        assert!(matches!(
            error,
            RenderingError::InvalidSceneSize { width, .. } if width == 0.0
        ));
    }

    #[test]
    fn presentation_rejects_zero_frame_interval() {
        let scene = Scene::new(100.0, 100.0, Vec::new(), player()).expect("valid scene");
        let error = Presentation::new("maze", Color::from_rgb_u8(0, 0, 0), Duration::ZERO, scene)
            .expect_err("zero interval must be rejected");

        assert_eq!(error, RenderingError::ZeroFrameInterval);
        assert_eq!(error.to_string(), "frame interval must be non-zero");
    }

    #[test]
    fn scene_rect_mirrors_world_geometry() {
        let wall = SceneRect::from_rect(
            Rect::new(20.0, 40.0, 22.0, 2.0),
            Color::from_rgb_u8(255, 255, 255),
        );

        assert_eq!(wall.origin, Vec2::new(20.0, 40.0));
        assert_eq!(wall.end(), Vec2::new(42.0, 42.0));
        assert!(wall.contains(Vec2::new(20.0, 41.9)));
        assert!(!wall.contains(Vec2::new(42.0, 41.0)));
    }

    #[test]
    fn topmost_prefers_player_then_highlights_then_walls() {
        let wall_color = Color::from_rgb_u8(255, 255, 255);
        let highlight_color = Color::from_rgb_u8(0, 255, 0);
        let wall = SceneRect::new(Vec2::ZERO, Vec2::new(40.0, 2.0), wall_color);
        let mut scene = Scene::new(40.0, 40.0, vec![wall], player()).expect("valid scene");
        scene.highlights.push(SceneRect { color: highlight_color, ..wall });

        assert_eq!(
            scene.topmost_at(Vec2::new(1.0, 1.0)).map(|rect| rect.color),
            Some(highlight_color)
        );
        assert_eq!(scene.topmost_at(Vec2::new(6.0, 6.0)), Some(&player()));
        assert!(scene.topmost_at(Vec2::new(30.0, 30.0)).is_none());
        assert_eq!(scene.size(), Vec2::splat(40.0));
    }
}
