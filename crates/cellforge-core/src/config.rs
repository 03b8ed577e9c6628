use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

/// Game-session configuration.
///
/// Defaults carry the shipped balance constants; `seed` drives resource-node
/// placement and the pre-run life seeding, so two sessions built from the
/// same config are identical.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub rows: usize,
    pub columns: usize,
    /// Wall-clock interval between automatic ticks, in milliseconds.
    pub period_ms: u64,
    pub starting_resources: u64,
    /// Price to stage a non-neutral order on one cell.
    pub cost_per_cell: u64,
    /// Bonus when a cell is born on a resource node.
    pub node_resource_generation: i64,
    /// Reward when a living cell dies.
    pub cell_death_resource_generation: i64,
    /// Per-tick cost of every cell that is alive next tick.
    pub cell_upkeep_cost: i64,
    /// Length of the rolling resources-per-second window, in seconds.
    pub seconds_to_average: u64,
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: 40,
            columns: 40,
            period_ms: 333,
            starting_resources: 3000,
            cost_per_cell: 1000,
            node_resource_generation: 50,
            cell_death_resource_generation: 5,
            cell_upkeep_cost: 1,
            seconds_to_average: 5,
            seed: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameConfigError {
    ZeroGridDimension,
    TooManyCells { max: usize, actual: usize },
    ZeroPeriod,
    ZeroAveragingWindow,
}

impl fmt::Display for GameConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameConfigError::ZeroGridDimension => {
                write!(f, "rows and columns must both be positive")
            }
            GameConfigError::TooManyCells { max, actual } => {
                write!(f, "grid cell count ({actual}) exceeds supported maximum ({max})")
            }
            GameConfigError::ZeroPeriod => write!(f, "period_ms must be positive"),
            GameConfigError::ZeroAveragingWindow => {
                write!(f, "seconds_to_average must be positive")
            }
        }
    }
}

impl Error for GameConfigError {}

impl GameConfig {
    pub const MAX_CELLS: usize = 1_000_000;

    pub fn validate(&self) -> Result<(), GameConfigError> {
        if self.rows == 0 || self.columns == 0 {
            return Err(GameConfigError::ZeroGridDimension);
        }
        let cells = self
            .rows
            .checked_mul(self.columns)
            .ok_or(GameConfigError::TooManyCells {
                max: Self::MAX_CELLS,
                actual: usize::MAX,
            })?;
        if cells > Self::MAX_CELLS {
            return Err(GameConfigError::TooManyCells {
                max: Self::MAX_CELLS,
                actual: cells,
            });
        }
        if self.period_ms == 0 {
            return Err(GameConfigError::ZeroPeriod);
        }
        if self.seconds_to_average == 0 {
            return Err(GameConfigError::ZeroAveragingWindow);
        }
        Ok(())
    }

    /// Capacity of the per-tick delta history: `ceil(seconds * 1000 / period)`.
    pub fn averaging_window(&self) -> usize {
        let span_ms = self.seconds_to_average * 1000;
        (span_ms.div_ceil(self.period_ms)) as usize
    }

    /// Maximum number of resource nodes placed at grid creation.
    pub fn node_quota(&self) -> usize {
        self.rows * self.columns / 100
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn default_window_holds_sixteen_ticks() {
        // ceil(5000 / 333) = 16
        assert_eq!(GameConfig::default().averaging_window(), 16);
    }

    #[test]
    fn exact_division_window_has_no_extra_slot() {
        let config = GameConfig {
            period_ms: 250,
            seconds_to_average: 5,
            ..GameConfig::default()
        };
        assert_eq!(config.averaging_window(), 20);
    }

    #[test]
    fn default_node_quota_is_one_percent() {
        assert_eq!(GameConfig::default().node_quota(), 16);
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let config = GameConfig {
            rows: 0,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(GameConfigError::ZeroGridDimension));
    }

    #[test]
    fn oversized_grid_is_rejected() {
        let config = GameConfig {
            rows: 2000,
            columns: 2000,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GameConfigError::TooManyCells { .. })
        ));
    }

    #[test]
    fn zero_period_is_rejected() {
        let config = GameConfig {
            period_ms: 0,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(GameConfigError::ZeroPeriod));
    }
}
