//! Tunables for the background field and page-level settings
//!
//! Every field defaults to the values the page was designed with, so an
//! empty JSON object (or no config at all) reproduces the stock look.

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use super::surface::Rgba;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Particle field parameters
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Lower bound on node count
    pub min_nodes: usize,
    /// Upper bound on node count
    pub max_nodes: usize,
    /// Surface area (px²) per node before clamping
    pub area_per_node: f32,
    /// Velocity components are sampled from `(rand - 0.5) * speed`
    pub speed: f32,
    /// Base radius is `size_min + rand * size_range`
    pub size_min: f32,
    pub size_range: f32,
    /// Multiplier applied to the millisecond clock for the breathing radius
    pub time_scale: f64,
    /// Link distance is `sqrt(area / nodes) * link_factor`, clamped
    pub link_factor: f32,
    pub link_min: f32,
    pub link_max: f32,
    /// Edge alpha at zero distance
    pub edge_alpha: f32,
    pub node_color: [u8; 3],
    pub node_alpha: f32,
    pub edge_color: [u8; 3],
    pub edge_width: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            min_nodes: 90,
            max_nodes: 240,
            area_per_node: 9500.0,
            speed: 0.55,
            size_min: 2.0,
            size_range: 1.8,
            time_scale: 0.003,
            link_factor: 1.15,
            link_min: 95.0,
            link_max: 165.0,
            edge_alpha: 0.18,
            node_color: [0, 96, 138],
            node_alpha: 0.38,
            edge_color: [0, 96, 138],
            edge_width: 1.0,
        }
    }
}

impl FieldConfig {
    pub fn node_rgba(&self) -> Rgba {
        let [r, g, b] = self.node_color;
        Rgba::new(r, g, b, self.node_alpha)
    }

    pub fn edge_rgba(&self, alpha: f32) -> Rgba {
        let [r, g, b] = self.edge_color;
        Rgba::new(r, g, b, alpha)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_nodes > self.max_nodes {
            return Err(ConfigError::Invalid(format!(
                "min_nodes ({}) exceeds max_nodes ({})",
                self.min_nodes, self.max_nodes
            )));
        }
        if self.area_per_node <= 0.0 {
            return Err(ConfigError::Invalid("area_per_node must be positive".into()));
        }
        if self.link_min > self.link_max {
            return Err(ConfigError::Invalid(format!(
                "link_min ({}) exceeds link_max ({})",
                self.link_min, self.link_max
            )));
        }
        if !(0.0..=1.0).contains(&self.edge_alpha) || !(0.0..=1.0).contains(&self.node_alpha) {
            return Err(ConfigError::Invalid("alpha values must be within [0, 1]".into()));
        }
        Ok(())
    }
}

/// Top-level page configuration
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub field: FieldConfig,
    /// Show the diagnostics overlay on start
    pub diagnostics: bool,
}

impl PageConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: PageConfig = serde_json::from_str(json)?;
        config.field.validate()?;
        debug!(
            min_nodes = config.field.min_nodes,
            max_nodes = config.field.max_nodes,
            "Page config loaded"
        );
        Ok(config)
    }

    /// Load from a JSON file on disk
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config = PageConfig::from_json("{}").unwrap();
        assert_eq!(config.field.min_nodes, 90);
        assert_eq!(config.field.max_nodes, 240);
        assert_eq!(config.field.area_per_node, 9500.0);
        assert!(!config.diagnostics);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = PageConfig::from_json(r#"{"field": {"max_nodes": 120}, "diagnostics": true}"#)
            .unwrap();
        assert_eq!(config.field.max_nodes, 120);
        assert_eq!(config.field.min_nodes, 90);
        assert_eq!(config.field.link_max, 165.0);
        assert!(config.diagnostics);
    }

    #[test]
    fn rejects_inverted_node_bounds() {
        let err = PageConfig::from_json(r#"{"field": {"min_nodes": 300}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = PageConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
