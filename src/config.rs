//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Largest accepted chart width or height, in grid cells
pub const MAX_CHART_SIDE: usize = 1024;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub chart: ChartConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Donut chart geometry and colors
#[derive(Debug, Clone, Deserialize)]
pub struct ChartConfig {
    /// Surface width in grid columns
    #[serde(default = "default_width")]
    pub width: usize,

    /// Surface height in grid rows
    #[serde(default = "default_height")]
    pub height: usize,

    /// Outer radius as a share of half the shorter side
    #[serde(default = "default_radius_ratio")]
    pub radius_ratio: f64,

    /// Inner radius as a share of the outer radius
    #[serde(default = "default_inner_ratio")]
    pub inner_ratio: f64,

    #[serde(default = "default_corner_radius")]
    pub corner_radius: f64,

    #[serde(default = "default_used_color")]
    pub used_color: String,

    #[serde(default = "default_remaining_color")]
    pub remaining_color: String,
}

fn default_width() -> usize {
    48
}

fn default_height() -> usize {
    24
}

fn default_radius_ratio() -> f64 {
    0.8
}

fn default_inner_ratio() -> f64 {
    0.65
}

fn default_corner_radius() -> f64 {
    4.0
}

fn default_used_color() -> String {
    "#ff3947".to_string()
}

fn default_remaining_color() -> String {
    "#40E0D0".to_string()
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            radius_ratio: default_radius_ratio(),
            inner_ratio: default_inner_ratio(),
            corner_radius: default_corner_radius(),
            used_color: default_used_color(),
            remaining_color: default_remaining_color(),
        }
    }
}

/// Caption alternation timing
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_alternate_interval")]
    pub alternate_interval_ms: u64,

    #[serde(default = "default_fade")]
    pub fade_ms: u64,
}

fn default_alternate_interval() -> u64 {
    6000
}

fn default_fade() -> u64 {
    300
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            alternate_interval_ms: default_alternate_interval(),
            fade_ms: default_fade(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::read(path)?;
        config.validate(path)?;
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::read(path)?;
        config.apply_env_overrides();
        config.validate(path)?;
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("lifeweeks").join("config.toml")),
            Some(PathBuf::from("./lifeweeks.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        let config = Self::from_env();
        match config.validate(Path::new("<environment>")) {
            Ok(()) => config,
            Err(e) => {
                tracing::warn!("Ignoring environment overrides: {}", e);
                Config::default()
            }
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(width) = std::env::var("LIFEWEEKS_CHART_WIDTH") {
            if let Ok(w) = width.parse() {
                self.chart.width = w;
            }
        }
        if let Ok(height) = std::env::var("LIFEWEEKS_CHART_HEIGHT") {
            if let Ok(h) = height.parse() {
                self.chart.height = h;
            }
        }

        if let Ok(interval) = std::env::var("LIFEWEEKS_ALTERNATE_INTERVAL_MS") {
            if let Ok(ms) = interval.parse() {
                self.display.alternate_interval_ms = ms;
            }
        }
        if let Ok(fade) = std::env::var("LIFEWEEKS_FADE_MS") {
            if let Ok(ms) = fade.parse() {
                self.display.fade_ms = ms;
            }
        }

        if let Ok(level) = std::env::var("LIFEWEEKS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("LIFEWEEKS_LOG_FORMAT") {
            self.logging.format = format;
        }
        if let Ok(file) = std::env::var("LIFEWEEKS_LOG_FILE") {
            self.logging.file = Some(file).filter(|f| !f.is_empty());
        }
    }

    fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        let invalid = |error: &str| ConfigError::Invalid {
            path: path.to_path_buf(),
            error: error.to_string(),
        };

        if self.chart.width > MAX_CHART_SIDE || self.chart.height > MAX_CHART_SIDE {
            return Err(invalid(&format!(
                "chart.width and chart.height must be at most {}",
                MAX_CHART_SIDE
            )));
        }
        if !(0.0..=1.0).contains(&self.chart.radius_ratio) {
            return Err(invalid("chart.radius_ratio must be between 0 and 1"));
        }
        if !(0.0..1.0).contains(&self.chart.inner_ratio) {
            return Err(invalid("chart.inner_ratio must be at least 0 and below 1"));
        }
        if self.display.alternate_interval_ms == 0 {
            return Err(invalid("display.alternate_interval_ms must be positive"));
        }
        if self.display.fade_ms >= self.display.alternate_interval_ms {
            return Err(invalid("display.fade_ms must be shorter than the interval"));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid config file {path:?}: {error}")]
    Invalid { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r##"# Lifeweeks Configuration
#
# Environment variables override these settings:
# - LIFEWEEKS_CHART_WIDTH
# - LIFEWEEKS_CHART_HEIGHT
# - LIFEWEEKS_ALTERNATE_INTERVAL_MS
# - LIFEWEEKS_FADE_MS
# - LIFEWEEKS_LOG_LEVEL
# - LIFEWEEKS_LOG_FORMAT
# - LIFEWEEKS_LOG_FILE

[chart]
# Drawing surface size in terminal cells (at most 1024 each)
width = 48
height = 24

# Outer radius as a share of half the shorter side
radius_ratio = 0.8

# Hole size as a share of the outer radius
inner_ratio = 0.65

corner_radius = 4.0

used_color = "#ff3947"
remaining_color = "#40E0D0"

[display]
# How often the centre caption switches between "lived" and "left" (ms)
alternate_interval_ms = 6000

# Fade-out before each switch (ms)
fade_ms = 300

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path
# file = "/tmp/lifeweeks.log"
"##
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.chart.radius_ratio, 0.8);
        assert_eq!(config.chart.inner_ratio, 0.65);
        assert_eq!(config.chart.corner_radius, 4.0);
        assert_eq!(config.chart.used_color, "#ff3947");
        assert_eq!(config.chart.remaining_color, "#40E0D0");
        assert_eq!(config.display.alternate_interval_ms, 6000);
        assert_eq!(config.display.fade_ms, 300);
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_generated_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.chart.width, 48);
        assert_eq!(config.chart.height, 24);
        assert_eq!(config.display.alternate_interval_ms, 6000);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[chart]\nwidth = 30\n\n[display]\nfade_ms = 100").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.chart.width, 30);
        assert_eq!(config.chart.height, 24);
        assert_eq!(config.display.fade_ms, 100);
        assert_eq!(config.display.alternate_interval_ms, 6000);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(&dir.path().join("nope.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_load_rejects_bad_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[chart]\ninner_ratio = 1.5").unwrap();
        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::Invalid { .. })
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[display]\nalternate_interval_ms = 200\nfade_ms = 300").unwrap();
        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_load_rejects_oversized_chart() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[chart]\nwidth = 100000\nheight = 100000").unwrap();
        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::Invalid { .. })
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[chart]\nwidth = {}\nheight = 1", MAX_CHART_SIDE).unwrap();
        assert!(Config::load(file.path()).is_ok());
    }

    // The only test that touches LIFEWEEKS_* variables
    #[test]
    fn test_env_overrides_are_validated() {
        let file = tempfile::NamedTempFile::new().unwrap();

        std::env::set_var("LIFEWEEKS_FADE_MS", "150");
        std::env::set_var("LIFEWEEKS_LOG_FILE", "/tmp/lifeweeks-test.log");
        let config = Config::load_with_env(file.path()).unwrap();
        assert_eq!(config.display.fade_ms, 150);
        assert_eq!(config.logging.file.as_deref(), Some("/tmp/lifeweeks-test.log"));

        std::env::set_var("LIFEWEEKS_ALTERNATE_INTERVAL_MS", "0");
        let result = Config::load_with_env(file.path());

        std::env::remove_var("LIFEWEEKS_FADE_MS");
        std::env::remove_var("LIFEWEEKS_LOG_FILE");
        std::env::remove_var("LIFEWEEKS_ALTERNATE_INTERVAL_MS");

        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[chart\nwidth = ").unwrap();
        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
