//! Configuration of the sprite subsystem.
//!
//! Everything has a sensible default, so an empty JSON object is a valid configuration.

use alloc::string::{String, ToString};

use serde::Deserialize;

use crate::shared_constants::{MAX_SORT_LAYERS, MAX_SPRITE_ITEMS, OAM_SLOTS};

/// Things that may be wrong with a configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    Json(String),
    /// The item pool must hold at least one sprite and no more than `MAX_SPRITE_ITEMS`.
    InvalidMaxItems(usize),
    /// At least one sort layer is required, and no more than `MAX_SORT_LAYERS` are supported.
    InvalidMaxSortLayers(usize),
    /// At least one OAM slot has to stay available for dynamic assignment.
    InvalidReservedHandlesCount(usize),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use ConfigError::*;
        match self {
            Json(err) => write!(f, "ConfigError: Can't parse configuration: {}", err),
            InvalidMaxItems(count) => write!(
                f,
                "ConfigError: Invalid max items: {} (must be in 1..={})",
                count, MAX_SPRITE_ITEMS
            ),
            InvalidMaxSortLayers(count) => write!(
                f,
                "ConfigError: Invalid max sort layers: {} (must be in 1..={})",
                count, MAX_SORT_LAYERS
            ),
            InvalidReservedHandlesCount(count) => write!(
                f,
                "ConfigError: Invalid reserved handles count: {} (must be below {})",
                count, OAM_SLOTS
            ),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(error: serde_json::Error) -> Self {
        return ConfigError::Json(error.to_string());
    }
}

/// Sizing of the sprite subsystem's pools.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpritesConfig {
    /// Maximum number of sprites alive at the same time.
    pub max_items: usize,
    /// Maximum number of distinct (bg priority, z order) pairs in use at the same time.
    pub max_sort_layers: usize,
    /// OAM slots at the start of the table which are left to other subsystems.
    pub reserved_handles_count: usize,
}

impl Default for SpritesConfig {
    fn default() -> Self {
        return SpritesConfig {
            max_items: MAX_SPRITE_ITEMS,
            max_sort_layers: 16,
            reserved_handles_count: 0,
        };
    }
}

impl SpritesConfig {
    /// Parse and validate a configuration from JSON.
    pub fn from_json(json: &str) -> Result<SpritesConfig, ConfigError> {
        let config: SpritesConfig = serde_json::from_str(json)?;
        config.validate()?;
        return Ok(config);
    }

    /// Check that every limit is within what the subsystem supports.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_items == 0 || self.max_items > MAX_SPRITE_ITEMS {
            return Err(ConfigError::InvalidMaxItems(self.max_items));
        }
        if self.max_sort_layers == 0 || self.max_sort_layers > MAX_SORT_LAYERS {
            return Err(ConfigError::InvalidMaxSortLayers(self.max_sort_layers));
        }
        if self.reserved_handles_count >= OAM_SLOTS {
            return Err(ConfigError::InvalidReservedHandlesCount(
                self.reserved_handles_count,
            ));
        }
        return Ok(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = SpritesConfig::from_json("{}").unwrap();
        assert_eq!(config, SpritesConfig::default());
    }

    #[test]
    fn partial_object_overrides_only_given_fields() {
        let config = SpritesConfig::from_json(r#"{"max_sort_layers": 4}"#).unwrap();
        assert_eq!(config.max_sort_layers, 4);
        assert_eq!(config.max_items, MAX_SPRITE_ITEMS);
        assert_eq!(config.reserved_handles_count, 0);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert_eq!(
            SpritesConfig::from_json(r#"{"max_items": 0}"#),
            Err(ConfigError::InvalidMaxItems(0))
        );
        assert_eq!(
            SpritesConfig::from_json(r#"{"max_sort_layers": 33}"#),
            Err(ConfigError::InvalidMaxSortLayers(33))
        );
        assert_eq!(
            SpritesConfig::from_json(r#"{"reserved_handles_count": 128}"#),
            Err(ConfigError::InvalidReservedHandlesCount(128))
        );
    }

    #[test]
    fn malformed_json_is_reported() {
        match SpritesConfig::from_json("{max_items") {
            Err(ConfigError::Json(_)) => {}
            other => panic!("Expected a JSON error, got {:?}", other),
        }
    }
}
