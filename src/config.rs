//! Configuration for the event console
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/evlog/config.toml)
//! 3. Built-in defaults (lowest priority)

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether to run the TUI (false = headless, events go to stdout logs)
    pub enable_tui: bool,

    /// Theme name: "dark" or "light"
    pub theme: String,

    /// Panel behavior
    pub panel: PanelConfig,

    /// Demo producer behavior
    pub demo: DemoConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Knobs for the collapsible event panel
#[derive(Debug, Clone)]
pub struct PanelConfig {
    /// Expanded panel height as a percentage of the terminal height
    pub height_percent: u16,

    /// Duration of one expand/collapse animation
    pub animation_ms: u64,

    /// Idle delay before the panel hides itself after a demo burst
    pub collapse_after_ms: u64,
}

/// Knobs for the scripted demo client
#[derive(Debug, Clone)]
pub struct DemoConfig {
    /// Whether the demo producer runs at all
    pub enabled: bool,

    /// Pause between demo bursts
    pub pause_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default level filter when RUST_LOG is unset
    pub level: String,

    /// Also write JSON logs to a daily-rotated file
    pub file_enabled: bool,

    /// Directory for rotated log files
    pub file_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enable_tui: true,
            theme: "dark".to_string(),
            panel: PanelConfig {
                height_percent: 40,
                animation_ms: 500,
                collapse_after_ms: 10_000,
            },
            demo: DemoConfig {
                enabled: true,
                pause_ms: 6_000,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_enabled: false,
                file_dir: PathBuf::from("./logs"),
            },
        }
    }
}

impl Config {
    /// Load configuration with env > file > defaults precedence
    pub fn from_env() -> Self {
        let mut config = Self::load_file().unwrap_or_default();

        if let Ok(v) = std::env::var("EVLOG_TUI") {
            config.enable_tui = v != "0" && !v.eq_ignore_ascii_case("false");
        }
        if let Ok(v) = std::env::var("EVLOG_THEME") {
            config.theme = v;
        }
        if let Ok(v) = std::env::var("EVLOG_PANEL_PERCENT") {
            if let Ok(parsed) = v.parse() {
                config.panel.height_percent = parsed;
            }
        }
        if let Ok(v) = std::env::var("EVLOG_COLLAPSE_AFTER_MS") {
            if let Ok(parsed) = v.parse() {
                config.panel.collapse_after_ms = parsed;
            }
        }
        if let Ok(v) = std::env::var("EVLOG_DEMO") {
            config.demo.enabled = v != "0" && !v.eq_ignore_ascii_case("false");
        }
        if let Ok(v) = std::env::var("EVLOG_LOG_LEVEL") {
            config.logging.level = v;
        }

        config.sanitize();
        config
    }

    /// Clamp values that would produce a broken layout
    fn sanitize(&mut self) {
        self.panel.height_percent = self.panel.height_percent.clamp(10, 90);
        if self.panel.animation_ms == 0 {
            self.panel.animation_ms = 1;
        }
    }

    /// Animation duration as a Duration
    pub fn animation(&self) -> Duration {
        Duration::from_millis(self.panel.animation_ms)
    }

    /// Auto-collapse delay as a Duration
    pub fn collapse_after(&self) -> Duration {
        Duration::from_millis(self.panel.collapse_after_ms)
    }

    /// Path of the config file, when a config directory exists
    pub fn config_path() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join("evlog").join("config.toml"))
    }

    fn load_file() -> Option<Self> {
        let path = Self::config_path()?;
        let raw = std::fs::read_to_string(&path).ok()?;
        match toml::from_str::<FileConfig>(&raw) {
            Ok(file) => Some(file.into_config()),
            Err(e) => {
                eprintln!("Warning: ignoring malformed config {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Write a commented template on first run so users can discover options
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };
        if path.exists() {
            return;
        }
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Render the configuration as a commented TOML document
    pub fn to_toml(&self) -> String {
        format!(
            r#"# evlog configuration
# Environment variables (EVLOG_*) override values in this file.

# Run the terminal UI (false = headless, logs to stdout)
enable_tui = {enable_tui}

# Color theme: "dark" or "light"
theme = {theme:?}

[panel]
# Expanded height as a percentage of the terminal height (10-90)
height_percent = {height_percent}
# Expand/collapse animation duration in milliseconds
animation_ms = {animation_ms}
# Idle delay before the panel hides itself, in milliseconds
collapse_after_ms = {collapse_after_ms}

[demo]
# Run the scripted demo client
enabled = {demo_enabled}
# Pause between demo bursts in milliseconds
pause_ms = {pause_ms}

[logging]
# Default level when RUST_LOG is unset: trace, debug, info, warn, error
level = {level:?}
# Also write JSON logs to a daily-rotated file under file_dir
file_enabled = {file_enabled}
file_dir = {file_dir:?}
"#,
            enable_tui = self.enable_tui,
            theme = self.theme,
            height_percent = self.panel.height_percent,
            animation_ms = self.panel.animation_ms,
            collapse_after_ms = self.panel.collapse_after_ms,
            demo_enabled = self.demo.enabled,
            pause_ms = self.demo.pause_ms,
            level = self.logging.level,
            file_enabled = self.logging.file_enabled,
            file_dir = self.logging.file_dir.display().to_string(),
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure; every field optional so partial files work
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    enable_tui: Option<bool>,
    theme: Option<String>,
    panel: Option<FilePanel>,
    demo: Option<FileDemo>,
    logging: Option<FileLogging>,
}

#[derive(Debug, Default, Deserialize)]
struct FilePanel {
    height_percent: Option<u16>,
    animation_ms: Option<u64>,
    collapse_after_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct FileDemo {
    enabled: Option<bool>,
    pause_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct FileLogging {
    level: Option<String>,
    file_enabled: Option<bool>,
    file_dir: Option<PathBuf>,
}

impl FileConfig {
    fn into_config(self) -> Config {
        let mut config = Config::default();

        if let Some(v) = self.enable_tui {
            config.enable_tui = v;
        }
        if let Some(v) = self.theme {
            config.theme = v;
        }
        if let Some(panel) = self.panel {
            if let Some(v) = panel.height_percent {
                config.panel.height_percent = v;
            }
            if let Some(v) = panel.animation_ms {
                config.panel.animation_ms = v;
            }
            if let Some(v) = panel.collapse_after_ms {
                config.panel.collapse_after_ms = v;
            }
        }
        if let Some(demo) = self.demo {
            if let Some(v) = demo.enabled {
                config.demo.enabled = v;
            }
            if let Some(v) = demo.pause_ms {
                config.demo.pause_ms = v;
            }
        }
        if let Some(logging) = self.logging {
            if let Some(v) = logging.level {
                config.logging.level = v;
            }
            if let Some(v) = logging.file_enabled {
                config.logging.file_enabled = v;
            }
            if let Some(v) = logging.file_dir {
                config.logging.file_dir = v;
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_round_trips_through_the_file_layer() {
        let template = Config::default().to_toml();
        let file: FileConfig = toml::from_str(&template).unwrap();
        let config = file.into_config();

        assert_eq!(config.panel.height_percent, 40);
        assert_eq!(config.panel.animation_ms, 500);
        assert_eq!(config.panel.collapse_after_ms, 10_000);
        assert!(config.enable_tui);
        assert!(config.demo.enabled);
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let file: FileConfig = toml::from_str("[panel]\nheight_percent = 60\n").unwrap();
        let config = file.into_config();

        assert_eq!(config.panel.height_percent, 60);
        assert_eq!(config.panel.animation_ms, 500);
        assert_eq!(config.theme, "dark");
    }

    #[test]
    fn sanitize_clamps_out_of_range_height() {
        let mut config = Config::default();
        config.panel.height_percent = 99;
        config.sanitize();
        assert_eq!(config.panel.height_percent, 90);

        config.panel.height_percent = 1;
        config.sanitize();
        assert_eq!(config.panel.height_percent, 10);
    }
}
