//! Headless backend that rasterises scenes into characters.

use std::io::Write;

use anyhow::{Context, Result};
use glam::Vec2;
use maze_dash_rendering::{FrameInput, Presentation, RenderingBackend, Scene};

use crate::session::{HIGHLIGHT_COLOR, PLAYER_COLOR};

const PLAYER_GLYPH: char = '@';
const HIGHLIGHT_GLYPH: char = '+';
const WALL_GLYPH: char = '#';
const EMPTY_GLYPH: char = ' ';
/// Upper bound on characters per line and on lines per frame.
const MAX_TEXT_EXTENT: f32 = 512.0;

/// Runs a fixed number of frames and writes the final one as text.
#[derive(Debug)]
pub(crate) struct TextBackend<W> {
    out: W,
    frames: u32,
    resolution: f32,
    script: Vec<FrameInput>,
}

impl<W: Write> TextBackend<W> {
    /// Backend sampling the scene every `resolution` world units.
    pub(crate) fn new(out: W, frames: u32, resolution: f32) -> Self {
        Self {
            out,
            frames,
            resolution,
            script: Vec::new(),
        }
    }

    /// Input delivered on the first frames, one entry per frame. Later
    /// frames receive no input.
    pub(crate) fn with_script(mut self, script: Vec<FrameInput>) -> Self {
        self.script = script;
        self
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn run<F>(mut self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(std::time::Duration, FrameInput, &mut Scene),
    {
        let Presentation {
            title,
            frame_interval,
            mut scene,
            ..
        } = presentation;

        let mut script = self.script.into_iter();
        for _ in 0..self.frames {
            let input = script.next().unwrap_or_default();
            update_scene(frame_interval, input, &mut scene);
        }

        writeln!(self.out, "{title}").context("failed to write frame title")?;
        for line in rasterize(&scene, self.resolution) {
            writeln!(self.out, "{line}").context("failed to write frame")?;
        }
        self.out.flush().context("failed to flush frame output")
    }
}

/// Samples the center of every character cell, topmost rectangle first.
///
/// The resolution is coarsened when needed so neither axis exceeds
/// [`MAX_TEXT_EXTENT`] characters.
pub(crate) fn rasterize(scene: &Scene, resolution: f32) -> Vec<String> {
    let floor = scene.width.max(scene.height) / MAX_TEXT_EXTENT;
    let resolution = if resolution.is_finite() {
        resolution.max(floor)
    } else {
        floor
    };
    let columns = (scene.width / resolution).ceil() as usize;
    let rows = (scene.height / resolution).ceil() as usize;

    (0..rows)
        .map(|row| {
            (0..columns)
                .map(|column| {
                    let sample = Vec2::new(column as f32 + 0.5, row as f32 + 0.5) * resolution;
                    glyph_at(scene, sample)
                })
                .collect::<String>()
                .trim_end()
                .to_owned()
        })
        .collect()
}

fn glyph_at(scene: &Scene, sample: Vec2) -> char {
    match scene.topmost_at(sample) {
        Some(rect) if rect.color == PLAYER_COLOR => PLAYER_GLYPH,
        Some(rect) if rect.color == HIGHLIGHT_COLOR => HIGHLIGHT_GLYPH,
        Some(_) => WALL_GLYPH,
        None => EMPTY_GLYPH,
    }
}

/// One frame that presses every held key, so they stay down for the run.
pub(crate) fn hold_script(keys: &[maze_dash_core::Key]) -> Vec<FrameInput> {
    let key_events: Vec<_> = keys
        .iter()
        .copied()
        .map(maze_dash_core::KeyEvent::Pressed)
        .collect();
    vec![FrameInput { key_events }]
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use maze_dash_core::{Key, KeyEvent};
    use maze_dash_rendering::{Color, SceneRect};

    use super::*;
    use crate::session::WALL_COLOR;

    fn scene() -> Scene {
        let walls = vec![
            SceneRect::new(Vec2::ZERO, Vec2::new(40.0, 10.0), WALL_COLOR),
            SceneRect::new(Vec2::ZERO, Vec2::new(10.0, 40.0), WALL_COLOR),
        ];
        let player = SceneRect::new(Vec2::new(20.0, 20.0), Vec2::splat(10.0), PLAYER_COLOR);
        Scene::new(40.0, 40.0, walls, player).expect("valid scene")
    }

    #[test]
    fn rasterize_draws_walls_and_player() {
        assert_eq!(rasterize(&scene(), 10.0), vec!["####", "#", "# @", "#"]);
    }

    #[test]
    fn fine_resolutions_are_coarsened_to_the_text_budget() {
        for resolution in [0.001, 0.0, -3.0, f32::NAN] {
            let lines = rasterize(&scene(), resolution);
            assert_eq!(lines.len(), MAX_TEXT_EXTENT as usize, "{resolution}");
            assert!(lines
                .iter()
                .all(|line| line.chars().count() <= MAX_TEXT_EXTENT as usize));
        }
    }

    #[test]
    fn highlights_replace_wall_glyphs() {
        let mut scene = scene();
        scene.highlights.push(SceneRect::new(
            Vec2::ZERO,
            Vec2::new(10.0, 10.0),
            HIGHLIGHT_COLOR,
        ));
        assert_eq!(rasterize(&scene, 10.0)[0], "+###");
    }

    #[test]
    fn backend_feeds_script_then_prints_final_frame() {
        let presentation = Presentation::new(
            "test",
            Color::from_rgb_u8(0, 0, 0),
            Duration::from_millis(10),
            scene(),
        )
        .expect("valid presentation");
        let mut output = Vec::new();
        let mut seen = Vec::new();

        TextBackend::new(&mut output, 3, 10.0)
            .with_script(hold_script(&[Key::ArrowUp]))
            .run(presentation, |dt, input, scene| {
                assert_eq!(dt, Duration::from_millis(10));
                seen.push(input.key_events);
                scene.player.origin.x = 10.0;
            })
            .expect("writing to memory succeeds");

        assert_eq!(
            seen,
            vec![vec![KeyEvent::Pressed(Key::ArrowUp)], Vec::new(), Vec::new()]
        );
        let text = String::from_utf8(output).expect("utf8 output");
        assert_eq!(text, "test\n####\n#\n#@\n#\n");
    }
}
