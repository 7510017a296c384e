//! Tunable engine settings.

use crate::artboard::{DEFAULT_ARTBOARD_GAP, DEFAULT_GRID_COLUMNS};
use crate::elements::DUPLICATE_OFFSET;
use crate::error::{DesignerError, DesignerResult};
use crate::history::MAX_HISTORY;
use crate::navigation::DEFAULT_FIT_PADDING;
use crate::snap::{ANGLE_SNAP_INCREMENT, GRID_SIZE};
use serde::{Deserialize, Serialize};

/// Settings a session uses in place of the module defaults.
///
/// Every field is optional in JSON; missing ones take their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignerConfig {
    /// Maximum entries kept on each history stack.
    pub history_capacity: usize,
    /// Offset applied to duplicated elements, on both axes.
    pub duplicate_offset: f64,
    pub grid_size: f64,
    /// Gap between artboards placed or arranged automatically.
    pub artboard_gap: f64,
    /// Column count for grid arrangement of artboards.
    pub grid_columns: usize,
    /// Padding used by zoom-to-fit.
    pub fit_padding: f64,
    pub rotation_snap_degrees: f64,
}

impl Default for DesignerConfig {
    fn default() -> Self {
        Self {
            history_capacity: MAX_HISTORY,
            duplicate_offset: DUPLICATE_OFFSET,
            grid_size: GRID_SIZE,
            artboard_gap: DEFAULT_ARTBOARD_GAP,
            grid_columns: DEFAULT_GRID_COLUMNS,
            fit_padding: DEFAULT_FIT_PADDING,
            rotation_snap_degrees: ANGLE_SNAP_INCREMENT,
        }
    }
}

impl DesignerConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> DesignerResult<Self> {
        let config: DesignerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the engine cannot work with.
    pub fn validate(&self) -> DesignerResult<()> {
        if self.history_capacity == 0 {
            return Err(DesignerError::InvalidConfig("historyCapacity must be at least 1".into()));
        }
        if self.grid_size <= 0.0 {
            return Err(DesignerError::InvalidConfig("gridSize must be positive".into()));
        }
        if self.grid_columns == 0 {
            return Err(DesignerError::InvalidConfig("gridColumns must be at least 1".into()));
        }
        if self.fit_padding < 0.0 || self.artboard_gap < 0.0 {
            return Err(DesignerError::InvalidConfig(
                "fitPadding and artboardGap must not be negative".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DesignerConfig::default();
        assert_eq!(config.history_capacity, 50);
        assert!((config.duplicate_offset - 20.0).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config = DesignerConfig::from_json(r#"{ "historyCapacity": 10, "gridSize": 8 }"#).unwrap();
        assert_eq!(config.history_capacity, 10);
        assert!((config.grid_size - 8.0).abs() < f64::EPSILON);
        assert_eq!(config.grid_columns, DEFAULT_GRID_COLUMNS);
    }

    #[test]
    fn test_invalid() {
        assert!(matches!(
            DesignerConfig::from_json(r#"{ "historyCapacity": 0 }"#),
            Err(DesignerError::InvalidConfig(_))
        ));
        assert!(matches!(
            DesignerConfig::from_json(r#"{ "gridColumns": 0 }"#),
            Err(DesignerError::InvalidConfig(_))
        ));
        assert!(matches!(
            DesignerConfig::from_json("[]"),
            Err(DesignerError::Serialization(_))
        ));
    }
}
