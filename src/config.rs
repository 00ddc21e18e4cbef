//! Engine configuration module.
//!
//! Handles loading and validating `folio.toml` from the site root. Every
//! option has a stock default matching the shipped portfolio; a config file
//! is only needed to rename sections or tune layout constants.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [sections]
//! # Fragment names, fetched and inserted in this order
//! names = [
//!   "home", "about", "illustration", "illustration-detail", "moreworks",
//!   "notebook-main", "notebook-mind", "notebook-swim", "notebook-knit",
//!   "notebook-story", "palette",
//! ]
//! landing = "home"              # Shown for an empty hash
//! notebook_index = "notebook-main"
//! illustration = "illustration" # The gallery section
//! subcategory_prefix = "notebook-"
//!
//! [layout]
//! default_row_height = 8.0      # grid-auto-rows fallback, in px
//! gap_property = "--illust-gap" # custom property consulted for the gap
//!
//! [scroll]
//! margin = 20.0                 # breathing room above scroll targets, in px
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want. Unknown
//! keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Engine configuration loaded from `folio.toml`.
///
/// All fields have defaults. User config files need only specify the
/// values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Section naming and fetch order.
    pub sections: SectionsConfig,
    /// Masonry layout constants.
    pub layout: LayoutConfig,
    /// Programmatic scrolling behavior.
    pub scroll: ScrollConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SectionsConfig {
    /// Fragment names in declared load/insertion order.
    pub names: Vec<String>,
    /// Section shown when no hash is present (flex display).
    pub landing: String,
    /// Notebook index section (flex display).
    pub notebook_index: String,
    /// The gallery section driving masonry layout and the detail panel.
    pub illustration: String,
    /// Element-id prefix for notebook sub-categories.
    pub subcategory_prefix: String,
}

impl Default for SectionsConfig {
    fn default() -> Self {
        Self {
            names: [
                "home",
                "about",
                "illustration",
                "illustration-detail",
                "moreworks",
                "notebook-main",
                "notebook-mind",
                "notebook-swim",
                "notebook-knit",
                "notebook-story",
                "palette",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            landing: "home".to_string(),
            notebook_index: "notebook-main".to_string(),
            illustration: "illustration".to_string(),
            subcategory_prefix: "notebook-".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Row height used when the grid's `grid-auto-rows` is unset or
    /// non-numeric.
    pub default_row_height: f64,
    /// Custom property consulted for the gap when `row-gap`/`gap` are
    /// absent; looked up on the gallery's ancestor section.
    pub gap_property: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            default_row_height: 8.0,
            gap_property: "--illust-gap".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrollConfig {
    /// Fixed visual margin above scroll targets, in px.
    pub margin: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self { margin: 20.0 }
    }
}

impl EngineConfig {
    /// Validate config values are coherent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sections.names.is_empty() {
            return Err(ConfigError::Validation(
                "sections.names must not be empty".to_string(),
            ));
        }
        for key in [
            &self.sections.landing,
            &self.sections.notebook_index,
            &self.sections.illustration,
        ] {
            if !self.sections.names.iter().any(|n| n == key) {
                return Err(ConfigError::Validation(format!(
                    "section '{key}' is not in sections.names"
                )));
            }
        }
        if self.layout.default_row_height <= 0.0 {
            return Err(ConfigError::Validation(
                "layout.default_row_height must be positive".to_string(),
            ));
        }
        if self.scroll.margin < 0.0 {
            return Err(ConfigError::Validation(
                "scroll.margin must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Display mode for a section: flex for the landing and notebook-index
    /// sections, block for everything else.
    pub fn display_mode(&self, section_id: &str) -> crate::dom::DisplayMode {
        if section_id == self.sections.landing || section_id == self.sections.notebook_index {
            crate::dom::DisplayMode::Flex
        } else {
            crate::dom::DisplayMode::Block
        }
    }
}

/// Load config from `folio.toml` in `site_dir`, falling back to defaults
/// when the file doesn't exist.
pub fn load_config(site_dir: &Path) -> Result<EngineConfig, ConfigError> {
    let path = site_dir.join("folio.toml");
    if !path.exists() {
        return Ok(EngineConfig::default());
    }
    let content = fs::read_to_string(&path)?;
    let config: EngineConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::DisplayMode;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sections.names.len(), 11);
    }

    #[test]
    fn defaults_used_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.sections.landing, "home");
        assert_eq!(config.layout.default_row_height, 8.0);
    }

    #[test]
    fn partial_file_overrides_only_named_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("folio.toml"), "[scroll]\nmargin = 32.0\n").unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.scroll.margin, 32.0);
        assert_eq!(config.sections.landing, "home");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("folio.toml"), "[scroll]\nmagrin = 32.0\n").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn landing_must_be_a_known_section() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("folio.toml"),
            "[sections]\nlanding = \"missing\"\n",
        )
        .unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn empty_section_list_is_rejected() {
        let config = EngineConfig {
            sections: SectionsConfig {
                names: vec![],
                ..SectionsConfig::default()
            },
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn display_mode_flex_for_landing_and_notebook_index() {
        let config = EngineConfig::default();
        assert_eq!(config.display_mode("home"), DisplayMode::Flex);
        assert_eq!(config.display_mode("notebook-main"), DisplayMode::Flex);
        assert_eq!(config.display_mode("about"), DisplayMode::Block);
        assert_eq!(config.display_mode("illustration"), DisplayMode::Block);
    }
}
