//! Layered game configuration: defaults, an optional TOML file, then flags.

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use maze_dash_core::Key;
use maze_dash_system_movement::{AxisPriority, MovementConfig};
use serde::Deserialize;

/// Every tunable the CLI exposes, after all layers were merged.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    pub(crate) rows: u32,
    pub(crate) columns: u32,
    pub(crate) start: u32,
    pub(crate) seed: u64,
    pub(crate) chunk_size: f32,
    pub(crate) cell_length: f32,
    pub(crate) line_width: f32,
    pub(crate) speed: f32,
    pub(crate) tick_millis: u64,
    pub(crate) ticks: u32,
    pub(crate) diagonal: bool,
    pub(crate) horizontal_first: bool,
    pub(crate) hold: Vec<Key>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: 30,
            columns: 30,
            start: 0,
            seed: 0,
            chunk_size: 33.0,
            cell_length: 33.0,
            line_width: 5.0,
            speed: 300.0,
            tick_millis: 33,
            ticks: 30,
            diagonal: false,
            horizontal_first: false,
            hold: Vec::new(),
        }
    }
}

impl GameConfig {
    /// Reads and parses a configuration file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to load config file at {}", path.display()))
    }

    /// Parses TOML contents; omitted keys keep their defaults.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse config toml contents")
    }

    /// Simulated time between two ticks.
    pub(crate) fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_millis)
    }

    /// Movement tuning derived from the speed and arbitration flags.
    pub(crate) fn movement(&self) -> MovementConfig {
        MovementConfig {
            speed: self.speed,
            priority: if self.horizontal_first {
                AxisPriority::HorizontalFirst
            } else {
                AxisPriority::VerticalFirst
            },
            diagonal: self.diagonal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_keeps_defaults() {
        let config = GameConfig::parse("").expect("empty toml is valid");
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.tick_interval(), Duration::from_millis(33));
    }

    #[test]
    fn file_values_override_defaults() {
        let config = GameConfig::parse(
            r#"
            rows = 4
            columns = 6
            seed = 17
            horizontal_first = true
            hold = ["ArrowDown", "ArrowRight"]
            "#,
        )
        .expect("valid toml");

        assert_eq!((config.rows, config.columns, config.seed), (4, 6, 17));
        assert_eq!(config.hold, vec![Key::ArrowDown, Key::ArrowRight]);
        assert_eq!(config.movement().priority, AxisPriority::HorizontalFirst);
        assert_eq!(config.line_width, 5.0);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let error = GameConfig::parse("colums = 4").expect_err("typo must be rejected");
        assert!(format!("{error:#}").contains("colums"));
    }

    #[test]
    fn missing_file_reports_its_path() {
        let error = GameConfig::load(Path::new("/nonexistent/maze-dash.toml"))
            .expect_err("missing file must fail");
        assert!(error.to_string().contains("/nonexistent/maze-dash.toml"));
    }
}
