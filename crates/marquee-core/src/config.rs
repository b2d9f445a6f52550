use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub carousel: CarouselConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level (overridden by RUST_LOG)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarouselConfig {
    /// Scroll speed in terminal cells per second
    #[serde(default = "default_velocity")]
    pub velocity: f64,
    /// Width of each certificate card in cells
    #[serde(default = "default_card_width")]
    pub card_width: u16,
    /// Blank cells after each card
    #[serde(default = "default_card_gap")]
    pub card_gap: u16,
    /// Pause while the mouse pointer is over the strip
    #[serde(default = "default_true")]
    pub pause_on_hover: bool,
    /// Start with the strip paused
    #[serde(default)]
    pub start_paused: bool,
    /// Card labels, in order
    #[serde(default = "default_items")]
    pub items: Vec<String>,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            velocity: default_velocity(),
            card_width: default_card_width(),
            card_gap: default_card_gap(),
            pause_on_hover: default_true(),
            start_paused: false,
            items: default_items(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Frame rate while the strip is moving
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
    /// Tick rate in milliseconds while paused
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Show the status bar
    #[serde(default = "default_true")]
    pub show_status_bar: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            animation_fps: default_animation_fps(),
            tick_rate_ms: default_tick_rate(),
            show_status_bar: default_true(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_true() -> bool {
    true
}

fn default_velocity() -> f64 {
    12.0
}

fn default_card_width() -> u16 {
    18
}

fn default_card_gap() -> u16 {
    2
}

fn default_items() -> Vec<String> {
    (1..=10).map(|i| format!("Certificate {i}")).collect()
}

fn default_animation_fps() -> u32 {
    60
}

fn default_tick_rate() -> u64 {
    100
}

impl AppConfig {
    /// Load configuration from the default path or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, falling back to defaults if it does not exist
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Reject values the carousel cannot animate
    pub fn validate(&self) -> crate::Result<()> {
        let carousel = &self.carousel;
        if !(carousel.velocity.is_finite() && carousel.velocity > 0.0) {
            return Err(crate::Error::Config(format!(
                "carousel.velocity must be positive, got {}",
                carousel.velocity
            )));
        }
        if carousel.card_width == 0 {
            return Err(crate::Error::Config(
                "carousel.card_width must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/marquee/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("marquee")
            .join("config.toml")
    }

    /// Frame interval while animating
    pub fn animation_tick_ms(&self) -> u64 {
        if self.ui.animation_fps == 0 {
            16 // ~60fps fallback
        } else {
            (1000 / u64::from(self.ui.animation_fps)).max(1)
        }
    }
}
