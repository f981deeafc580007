use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    pub routing: RoutingConfig,
    pub scroll: ScrollConfig,
    pub sections: SectionsConfig,
    pub logging: LoggingConfig,
}

/// Routing configuration
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct RoutingConfig {
    /// Mount prefix of the site, e.g. "" or "/clinic"
    pub base_path: String,
    /// Query parameter carrying the preselected treatment category
    pub category_param: String,
}

/// Scroll behavior configuration
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ScrollConfig {
    /// Height of the fixed header (in pixels), added to the scroll offset
    /// before matching sections
    pub header_offset: f64,
    /// Delay before scrolling to a section named by the URL hash
    pub hash_scroll_delay_ms: u64,
    /// Delay before scrolling a freshly mounted content page to the top
    pub scroll_top_delay_ms: u64,
}

/// Home page sections, in document order
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SectionsConfig {
    pub order: Vec<String>,
}

/// Logging configuration
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// tracing-subscriber filter directive, overridden by RUST_LOG
    pub filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            routing: RoutingConfig::default(),
            scroll: ScrollConfig::default(),
            sections: SectionsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        RoutingConfig {
            base_path: String::new(),
            category_param: "category".to_string(),
        }
    }
}

impl Default for ScrollConfig {
    fn default() -> Self {
        ScrollConfig {
            header_offset: 80.0,
            hash_scroll_delay_ms: 100,
            scroll_top_delay_ms: 100,
        }
    }
}

impl Default for SectionsConfig {
    fn default() -> Self {
        SectionsConfig {
            order: ["home", "about", "treatments", "team", "testimonials", "faq", "contact"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: "clinic_nav=info".to_string(),
        }
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "clinic-nav")
            .map(|proj_dirs| proj_dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from file, or return defaults if file doesn't exist
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Config::default();
        };
        if !path.exists() {
            return Config::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{}, using default configuration", e);
                Config::default()
            }
        }
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source: std::io::Error| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents).map_err(write_err)
    }

    /// Create a default config file if it doesn't exist
    pub fn create_default() -> Result<(), ConfigError> {
        let path = Self::config_path().ok_or(ConfigError::NoConfigDir)?;
        if !path.exists() {
            Config::default().save_to(&path)?;
        }
        Ok(())
    }
}
