//! Application configuration
//!
//! Optional RON config file plus command-line overrides. Gameplay tuning
//! (speed, player box, crossfade) is compiled in and not configurable here.

use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::RuntimeOptions;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Parse error: {0}")]
    ParseError(#[from] ron::error::SpannedError),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Parser, Debug, Default)]
#[command(about = "Night walk through a small town, with a scripted cinematic", version)]
pub struct Cli {
    /// RON config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Level file to load instead of the built-in town
    #[arg(long)]
    pub level: Option<PathBuf>,

    /// Shot table to use instead of the built-in sequence
    #[arg(long)]
    pub shots: Option<PathBuf>,

    /// Start the cinematic on the first frame
    #[arg(long)]
    pub cinematic: bool,

    /// Start with collision disabled
    #[arg(long)]
    pub no_collision: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window_title: String,
    pub window_width: i32,
    pub window_height: i32,
    pub level: Option<PathBuf>,
    pub shots: Option<PathBuf>,
    pub collision_enabled: bool,
    pub follow_distance: Option<f32>,
    pub start_cinematic: bool,
    /// Draw obstacle boxes and street-light reach as wireframes
    pub show_obstacles: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_title: format!("nightwalk v{}", crate::VERSION),
            window_width: 1280,
            window_height: 720,
            level: None,
            shots: None,
            collision_enabled: true,
            follow_distance: None,
            start_cinematic: false,
            show_obstacles: false,
        }
    }
}

impl AppConfig {
    pub fn from_ron_str(s: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = ron::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron_str(&contents)
    }

    /// File config (if any) with command-line flags applied on top
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(level) = &cli.level {
            config.level = Some(level.clone());
        }
        if let Some(shots) = &cli.shots {
            config.shots = Some(shots.clone());
        }
        if cli.cinematic {
            config.start_cinematic = true;
        }
        if cli.no_collision {
            config.collision_enabled = false;
        }
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.window_width <= 0 || self.window_height <= 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be positive, got {}x{}",
                self.window_width, self.window_height
            )));
        }
        if let Some(distance) = self.follow_distance {
            if !(distance.is_finite() && distance > 0.0) {
                return Err(ConfigError::Invalid(format!("follow_distance must be positive, got {}", distance)));
            }
        }
        Ok(())
    }

    pub fn runtime_options(&self) -> RuntimeOptions {
        RuntimeOptions {
            collision_enabled: self.collision_enabled,
            follow_distance: self.follow_distance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = AppConfig::from_ron_str("(collision_enabled: false)").unwrap();
        assert!(!config.collision_enabled);
        assert_eq!(config.window_width, 1280);
        assert!(config.level.is_none());
    }

    #[test]
    fn test_cli_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nightwalk.ron");
        std::fs::write(&path, r#"(level: Some("file.ron"), follow_distance: Some(80.0))"#).unwrap();

        let cli = Cli {
            config: Some(path),
            level: Some(PathBuf::from("cli.ron")),
            no_collision: true,
            ..Cli::default()
        };
        let config = AppConfig::resolve(&cli).unwrap();
        assert_eq!(config.level, Some(PathBuf::from("cli.ron")));
        assert!(!config.collision_enabled);
        assert_eq!(config.runtime_options().follow_distance, Some(80.0));
    }

    #[test]
    fn test_cli_flags_parse() {
        let cli = Cli::parse_from(["nightwalk", "--cinematic", "--shots", "alt.ron"]);
        let config = AppConfig::resolve(&cli).unwrap();
        assert!(config.start_cinematic);
        assert_eq!(config.shots, Some(PathBuf::from("alt.ron")));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            AppConfig::from_ron_str("(window_width: 0)"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            AppConfig::from_ron_str("(follow_distance: Some(-1.0))"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            AppConfig::load("/nonexistent/nightwalk.ron"),
            Err(ConfigError::IoError { .. })
        ));
    }
}
