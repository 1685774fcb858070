//! Constraint configuration and YAML map persistence.
//!
//! Maps can be described in YAML for authoring and tooling:
//!
//! ```yaml
//! main:
//!   - { x: 0.0, y: 0.0 }
//!   - { x: 0.0, y: 10.0 }
//!   - { x: 10.0, y: 10.0 }
//!   - { x: 10.0, y: 0.0 }
//! obstacles:
//!   - vertices:
//!       - { x: 4.0, y: 4.0 }
//!       - { x: 4.0, y: 6.0 }
//!       - { x: 6.0, y: 6.0 }
//!       - { x: 6.0, y: 4.0 }
//!     enabled: true
//! constraints:
//!   constrain_start_to_main: true
//! ```
//!
//! Descriptors are parsed first and validated when built into a
//! [`WalkableMap`], so a malformed file fails with a [`ConfigError`]
//! instead of producing a half-usable map.

use serde::{Deserialize, Serialize};

use crate::core::Point2D;
use crate::map::WalkableMap;
use crate::polygon::{Polygon, PolygonError};

fn default_true() -> bool {
    true
}

/// Per-endpoint constraint flags for path queries.
///
/// All flags default to `true`: endpoints are kept inside the main polygon
/// and outside enabled obstacles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintConfig {
    /// Project a start point lying outside the main polygon onto its
    /// boundary. Default: true
    #[serde(default = "default_true")]
    pub constrain_start_to_main: bool,

    /// Project an end point lying outside the main polygon onto its
    /// boundary. Default: true
    #[serde(default = "default_true")]
    pub constrain_end_to_main: bool,

    /// Project a start point lying inside an enabled obstacle onto that
    /// obstacle's boundary. Default: true
    #[serde(default = "default_true")]
    pub constrain_start_from_obstacles: bool,

    /// Project an end point lying inside an enabled obstacle onto that
    /// obstacle's boundary. Default: true
    #[serde(default = "default_true")]
    pub constrain_end_from_obstacles: bool,
}

impl Default for ConstraintConfig {
    fn default() -> Self {
        Self {
            constrain_start_to_main: true,
            constrain_end_to_main: true,
            constrain_start_from_obstacles: true,
            constrain_end_from_obstacles: true,
        }
    }
}

impl ConstraintConfig {
    /// Create a configuration with default values (all constraints on).
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset with every constraint disabled: endpoints are used verbatim
    /// even when they violate the map.
    pub fn unconstrained() -> Self {
        Self {
            constrain_start_to_main: false,
            constrain_end_to_main: false,
            constrain_start_from_obstacles: false,
            constrain_end_from_obstacles: false,
        }
    }

    /// Builder-style setter for the start-to-main flag.
    pub fn with_start_to_main(mut self, value: bool) -> Self {
        self.constrain_start_to_main = value;
        self
    }

    /// Builder-style setter for the end-to-main flag.
    pub fn with_end_to_main(mut self, value: bool) -> Self {
        self.constrain_end_to_main = value;
        self
    }

    /// Builder-style setter for the start-from-obstacles flag.
    pub fn with_start_from_obstacles(mut self, value: bool) -> Self {
        self.constrain_start_from_obstacles = value;
        self
    }

    /// Builder-style setter for the end-from-obstacles flag.
    pub fn with_end_from_obstacles(mut self, value: bool) -> Self {
        self.constrain_end_from_obstacles = value;
        self
    }
}

/// Serializable form of one obstacle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObstacleDescriptor {
    /// Obstacle outline vertices.
    pub vertices: Vec<Point2D>,
    /// Whether the obstacle starts enabled. Default: true
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Serializable form of a walkable map.
///
/// Carries vertex positions only; programmatic vertex tags are not
/// persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapDescriptor {
    /// Main walkable polygon vertices.
    pub main: Vec<Point2D>,
    /// Obstacle outlines.
    #[serde(default)]
    pub obstacles: Vec<ObstacleDescriptor>,
    /// Endpoint constraint flags.
    #[serde(default)]
    pub constraints: ConstraintConfig,
}

/// Errors loading, saving, or validating a map descriptor.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// File I/O error.
    IoError(String),
    /// YAML parsing or serialization error.
    ParseError(String),
    /// Descriptor geometry failed validation.
    InvalidPolygon(PolygonError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(msg) => write!(f, "IO error: {}", msg),
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidPolygon(err) => write!(f, "Invalid polygon: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPolygon(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PolygonError> for ConfigError {
    fn from(err: PolygonError) -> Self {
        ConfigError::InvalidPolygon(err)
    }
}

impl MapDescriptor {
    /// Capture a map's current geometry and flags.
    pub fn from_map(map: &WalkableMap) -> Self {
        Self {
            main: map.main().vertices().iter().map(|v| v.point).collect(),
            obstacles: map
                .obstacles()
                .iter()
                .map(|obstacle| ObstacleDescriptor {
                    vertices: obstacle.polygon.vertices().iter().map(|v| v.point).collect(),
                    enabled: obstacle.enabled,
                })
                .collect(),
            constraints: *map.constraints(),
        }
    }

    /// Parse a descriptor from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Load a descriptor from a YAML file.
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_yaml(&contents)
    }

    /// Serialize to a YAML string.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save to a YAML file.
    pub fn to_yaml_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), ConfigError> {
        let yaml = self.to_yaml()?;
        std::fs::write(path, yaml).map_err(|e| ConfigError::IoError(e.to_string()))
    }

    /// Validate the descriptor and build a [`WalkableMap`] from it.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidPolygon`] when the main polygon or any
    /// obstacle has fewer than 3 vertices.
    pub fn build(&self) -> Result<WalkableMap, ConfigError> {
        let main = Polygon::from_points(self.main.iter().copied())?;
        let mut map = WalkableMap::new(main).with_constraints(self.constraints);

        for descriptor in &self.obstacles {
            let polygon = Polygon::from_points(descriptor.vertices.iter().copied())?;
            let index = map.add_obstacle(polygon);
            map.set_obstacle_enabled(index, descriptor.enabled);
        }

        Ok(map)
    }
}

impl WalkableMap {
    /// Build a map from a YAML descriptor string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        MapDescriptor::from_yaml(yaml)?.build()
    }

    /// Load a map from a YAML descriptor file.
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        MapDescriptor::from_yaml_file(path)?.build()
    }

    /// Serialize the map's current geometry and flags to YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        MapDescriptor::from_map(self).to_yaml()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraints_default_all_on() {
        let config = ConstraintConfig::default();
        assert!(config.constrain_start_to_main);
        assert!(config.constrain_end_to_main);
        assert!(config.constrain_start_from_obstacles);
        assert!(config.constrain_end_from_obstacles);
    }

    #[test]
    fn test_constraints_builder() {
        let config = ConstraintConfig::new()
            .with_start_to_main(false)
            .with_end_from_obstacles(false);
        assert!(!config.constrain_start_to_main);
        assert!(config.constrain_end_to_main);
        assert!(config.constrain_start_from_obstacles);
        assert!(!config.constrain_end_from_obstacles);
    }

    #[test]
    fn test_constraints_missing_fields_default_true() {
        let config: ConstraintConfig =
            serde_yaml::from_str("constrain_start_to_main: false").unwrap();
        assert!(!config.constrain_start_to_main);
        assert!(config.constrain_end_to_main);
    }

    #[test]
    fn test_descriptor_yaml_round_trip() {
        let descriptor = MapDescriptor {
            main: vec![
                Point2D::new(0.0, 0.0),
                Point2D::new(0.0, 10.0),
                Point2D::new(10.0, 10.0),
                Point2D::new(10.0, 0.0),
            ],
            obstacles: vec![ObstacleDescriptor {
                vertices: vec![
                    Point2D::new(4.0, 4.0),
                    Point2D::new(4.0, 6.0),
                    Point2D::new(6.0, 6.0),
                    Point2D::new(6.0, 4.0),
                ],
                enabled: false,
            }],
            constraints: ConstraintConfig::default().with_end_to_main(false),
        };

        let yaml = descriptor.to_yaml().unwrap();
        let parsed = MapDescriptor::from_yaml(&yaml).unwrap();
        assert_eq!(parsed, descriptor);
    }

    #[test]
    fn test_descriptor_builds_map() {
        let yaml = r#"
main:
  - { x: 0.0, y: 0.0 }
  - { x: 0.0, y: 10.0 }
  - { x: 10.0, y: 10.0 }
  - { x: 10.0, y: 0.0 }
obstacles:
  - vertices:
      - { x: 4.0, y: 4.0 }
      - { x: 4.0, y: 6.0 }
      - { x: 6.0, y: 6.0 }
      - { x: 6.0, y: 4.0 }
"#;
        let map = WalkableMap::from_yaml(yaml).unwrap();
        assert_eq!(map.main().vertex_count(), 4);
        assert_eq!(map.obstacles().len(), 1);
        assert!(map.obstacles()[0].enabled);
    }

    #[test]
    fn test_descriptor_rejects_degenerate_polygon() {
        let yaml = r#"
main:
  - { x: 0.0, y: 0.0 }
  - { x: 1.0, y: 0.0 }
"#;
        let err = WalkableMap::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPolygon(_)));
    }

    #[test]
    fn test_invalid_yaml_is_a_parse_error() {
        let err = MapDescriptor::from_yaml(": not yaml : [").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_map_round_trip_preserves_geometry() {
        let descriptor = MapDescriptor {
            main: vec![
                Point2D::new(0.0, 0.0),
                Point2D::new(0.0, 5.0),
                Point2D::new(5.0, 5.0),
                Point2D::new(5.0, 0.0),
            ],
            obstacles: Vec::new(),
            constraints: ConstraintConfig::unconstrained(),
        };

        let map = descriptor.build().unwrap();
        assert_eq!(MapDescriptor::from_map(&map), descriptor);
    }
}
