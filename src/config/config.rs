use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub frames: FrameConfig,
    pub input: InputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Size of newly opened frames, title bar included
    pub width: u16,
    pub height: u16,

    /// Position of the first frame
    pub origin_x: i32,
    pub origin_y: i32,

    /// Offset of each new frame from the active one
    pub cascade_x: i32,
    pub cascade_y: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Two clicks on the same cell within this window form a double click
    pub double_click_ms: u64,

    /// Longest time the event loop waits for input
    pub tick_ms: u64,

    /// Treat Tab like Ctrl+Enter, for terminals that cannot report the latter
    pub tab_as_ctrl_enter: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when RUST_LOG is not set
    pub level: String,

    /// Also write a log file under the data directory
    pub to_file: bool,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            width: 56,
            height: 14,
            origin_x: 1,
            origin_y: 1,
            cascade_x: 4,
            cascade_y: 2,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            double_click_ms: 500,
            tick_ms: 250,
            tab_as_ctrl_enter: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "debug".to_string(),
            to_file: true,
        }
    }
}

impl Config {
    /// Load config from the default location, writing defaults if missing
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let default_config = Self::default();
            default_config.save_to(path)?;
            return Ok(default_config);
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("tablr").join("config.toml"))
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        r#"# Tablr Configuration File
# Location: ~/.config/tablr/config.toml (Linux)
#           ~/Library/Application Support/tablr/config.toml (macOS)
#           %APPDATA%\tablr\config.toml (Windows)

[frames]
# Size of new windows in terminal cells, title bar included
width = 56
height = 14

# Where the first window opens
origin_x = 1
origin_y = 1

# Each new window opens this far right/down from the active one
cascade_x = 4
cascade_y = 2

[input]
# Two clicks on the same cell within this many milliseconds are a double click
double_click_ms = 500

# Longest wait for input before the loop wakes up
tick_ms = 250

# Many terminals send Ctrl+Enter as plain Enter; Tab switches design/rows instead
tab_as_ctrl_enter = true

[logging]
# Used when RUST_LOG is not set, e.g. "info" or "tablr=debug,history=trace"
level = "debug"

# Write logs to ~/.local/share/tablr/logs as well
to_file = true
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.input.double_click_ms, 500);
        assert!(config.frames.width > 3);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_commented_default_matches_default() {
        let parsed: Config = toml::from_str(&Config::create_default_with_comments()).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let parsed: Config = toml::from_str("[input]\ndouble_click_ms = 300\n").unwrap();
        assert_eq!(parsed.input.double_click_ms, 300);
        assert_eq!(parsed.input.tick_ms, InputConfig::default().tick_ms);
        assert_eq!(parsed.frames, FrameConfig::default());
    }

    #[test]
    fn test_load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());

        let mut changed = config.clone();
        changed.frames.cascade_x = 9;
        changed.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().frames.cascade_x, 9);
    }
}
