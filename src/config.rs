use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::constants::*;
use crate::error::ConfigError;
use crate::registry::{StepRegistry, StepSpec};
use crate::spring::SpringConfig;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub window: WindowConfig,
    pub spring: SpringConfig,
    pub scroll: ScrollConfig,
    /// Custom deck; the built-in portfolio is used when empty.
    pub steps: Vec<StepSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    pub width: i32,
    pub height: i32,
    pub fps: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: RENDER_WIDTH,
            height: RENDER_HEIGHT,
            fps: FPS,
            title: WINDOW_TITLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrollConfig {
    /// Viewport fraction, from the top, where a step becomes active.
    pub trigger_offset: f32,
    pub wheel_step: f32,
    pub autoplay_speed: f32,
    pub hold_duration: f32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            trigger_offset: TRIGGER_OFFSET,
            wheel_step: WHEEL_STEP,
            autoplay_speed: AUTOPLAY_SPEED,
            hold_duration: HOLD_DURATION,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Config::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Config, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &'static str, reason: &str| {
            Err(ConfigError::Invalid { field, reason: reason.to_string() })
        };

        if self.window.width <= 0 || self.window.height <= 0 {
            return invalid("window", "width and height must be positive");
        }
        if self.window.fps == 0 {
            return invalid("window.fps", "must be at least 1");
        }
        if !(self.spring.stiffness > 0.0) {
            return invalid("spring.stiffness", "must be positive");
        }
        if !(self.spring.mass > 0.0) {
            return invalid("spring.mass", "must be positive");
        }
        if !(self.spring.damping > 0.0) {
            return invalid("spring.damping", "must be positive");
        }
        if !(self.spring.rest_delta > 0.0) || !(self.spring.rest_speed > 0.0) {
            return invalid("spring", "rest thresholds must be positive");
        }
        if !(0.0..=1.0).contains(&self.scroll.trigger_offset) {
            return invalid("scroll.trigger_offset", "must be between 0 and 1");
        }
        if !(self.scroll.wheel_step > 0.0) || !(self.scroll.autoplay_speed > 0.0) {
            return invalid("scroll", "wheel_step and autoplay_speed must be positive");
        }
        if !(self.scroll.hold_duration >= 0.0) {
            return invalid("scroll.hold_duration", "must not be negative");
        }
        Ok(())
    }

    pub fn registry(&self) -> Result<StepRegistry, ConfigError> {
        if self.steps.is_empty() {
            return Ok(StepRegistry::builtin());
        }
        Ok(StepRegistry::from_specs(self.steps.clone())?)
    }
}
