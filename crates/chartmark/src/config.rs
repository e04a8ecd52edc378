//! Configuration management.
//!
//! Loads configuration from TOML files: indicator parameters and default
//! per-indicator visibility. Every field is optional, so partial files parse
//! against the defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use chartmark_indicators::{IndicatorId, IndicatorParams};

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub indicators: IndicatorParams,
    pub display: DisplayConfig,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from default locations.
    ///
    /// Searches `./config.toml`, then `~/.config/chartmark/config.toml`.
    /// Returns defaults if no file is found.
    pub fn load_default() -> Self {
        if let Ok(config) = Self::load("config.toml") {
            return config;
        }

        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("chartmark").join("config.toml");
            if let Ok(config) = Self::load(&config_path) {
                return config;
            }
        }

        Self::default()
    }

    /// Save configuration to a file path.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the default config file path.
    pub fn default_path() -> PathBuf {
        PathBuf::from("config.toml")
    }
}

/// Per-indicator visibility overrides. Unset fields fall back to the
/// built-in defaults (RSI and MACD visible, everything else hidden).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub sma: Option<bool>,
    pub ema: Option<bool>,
    pub bollinger: Option<bool>,
    pub rsi: Option<bool>,
    pub macd: Option<bool>,
    pub stochastic: Option<bool>,
    pub atr: Option<bool>,
    pub adx: Option<bool>,
    pub ichimoku: Option<bool>,
    pub sar: Option<bool>,
}

impl DisplayConfig {
    /// Effective visibility of an indicator group.
    pub fn visible(&self, id: IndicatorId) -> bool {
        let override_value = match id {
            IndicatorId::Sma => self.sma,
            IndicatorId::Ema => self.ema,
            IndicatorId::Bollinger => self.bollinger,
            IndicatorId::Rsi => self.rsi,
            IndicatorId::Macd => self.macd,
            IndicatorId::Stochastic => self.stochastic,
            IndicatorId::Atr => self.atr,
            IndicatorId::Adx => self.adx,
            IndicatorId::Ichimoku => self.ichimoku,
            IndicatorId::Sar => self.sar,
        };
        override_value.unwrap_or_else(|| id.default_visible())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.indicators.rsi_period, 14);
        assert_eq!(config.indicators.macd.slow, 26);
        assert!(config.display.visible(IndicatorId::Rsi));
        assert!(!config.display.visible(IndicatorId::Sar));
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
[indicators]
rsi_period = 7
sma_period = 50

[indicators.stochastic]
k_period = 10

[display]
rsi = false
sar = true
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.indicators.rsi_period, 7);
        assert_eq!(config.indicators.sma_period, 50);
        assert_eq!(config.indicators.stochastic.k_period, 10);
        assert_eq!(config.indicators.stochastic.d_period, 3);
        assert!(!config.display.visible(IndicatorId::Rsi));
        assert!(config.display.visible(IndicatorId::Sar));
        // Untouched groups keep their defaults.
        assert!(config.display.visible(IndicatorId::Macd));
    }

    #[test]
    fn test_empty_toml_is_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.indicators.sma_period, 20);
        assert!(!config.display.visible(IndicatorId::Atr));
    }
}
