pub mod metrics;
mod tick;

pub use metrics::*;

use crate::cell::{Cell, PendingOrder};
use crate::config::{GameConfig, GameConfigError};
use crate::economy::Ledger;
use crate::grid::Grid;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use std::time::Duration;
use std::{error::Error, fmt};

/// One running game: the grid, the ledger, the session RNG, and the tick
/// counters, owned together so every operation sees a consistent whole.
///
/// All mutation goes through `&mut self`, which serializes user operations
/// against tick execution; nothing can observe a partially updated grid or
/// ledger.
#[derive(Debug)]
pub struct Session {
    pub(crate) grid: Grid,
    pub(crate) ledger: Ledger,
    pub(crate) config: GameConfig,
    pub(crate) rng: ChaCha12Rng,
    pub(crate) tick_index: usize,
    pub(crate) births_last_tick: usize,
    pub(crate) deaths_last_tick: usize,
    pub(crate) total_births: usize,
    pub(crate) total_deaths: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionInitError {
    Config(GameConfigError),
    GridDimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
}

impl fmt::Display for SessionInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionInitError::Config(e) => write!(f, "{}", e),
            SessionInitError::GridDimensionMismatch { expected, actual } => write!(
                f,
                "grid is {}x{} but config expects {}x{}",
                actual.0, actual.1, expected.0, expected.1
            ),
        }
    }
}

impl From<GameConfigError> for SessionInitError {
    fn from(err: GameConfigError) -> Self {
        SessionInitError::Config(err)
    }
}

impl Error for SessionInitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SessionInitError::Config(e) => Some(e),
            _ => None,
        }
    }
}

/// Result of one toggle request. Blocked requests mutate nothing; the
/// variant is how a front end tells the player that nothing happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Staged { order: PendingOrder },
    InsufficientResources,
    OutOfBounds,
}

impl Session {
    pub fn new(config: GameConfig) -> Self {
        Self::try_new(config).unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_new(config: GameConfig) -> Result<Self, SessionInitError> {
        config.validate()?;
        let mut rng = ChaCha12Rng::seed_from_u64(config.seed);
        let grid = Grid::generate(config.rows, config.columns, &mut rng);
        Ok(Self::assemble(grid, config, rng))
    }

    /// Build a session around an explicit grid, e.g. a hand-laid pattern.
    pub fn with_grid(grid: Grid, config: GameConfig) -> Result<Self, SessionInitError> {
        config.validate()?;
        if grid.rows() != config.rows || grid.columns() != config.columns {
            return Err(SessionInitError::GridDimensionMismatch {
                expected: (config.rows, config.columns),
                actual: (grid.rows(), grid.columns()),
            });
        }
        let rng = ChaCha12Rng::seed_from_u64(config.seed);
        Ok(Self::assemble(grid, config, rng))
    }

    fn assemble(grid: Grid, config: GameConfig, rng: ChaCha12Rng) -> Self {
        let ledger = Ledger::new(
            config.starting_resources,
            config.averaging_window(),
            config.period_ms,
        );
        Self {
            grid,
            ledger,
            config,
            rng,
            tick_index: 0,
            births_last_tick: 0,
            deaths_last_tick: 0,
            total_births: 0,
            total_deaths: 0,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.grid.cell(row, col)
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn resources(&self) -> u64 {
        self.ledger.resources()
    }

    pub fn avg_per_second(&self) -> i64 {
        self.ledger.avg_per_second()
    }

    pub fn alive_count(&self) -> usize {
        self.grid.alive_count()
    }

    pub fn tick_index(&self) -> usize {
        self.tick_index
    }

    pub fn total_births(&self) -> usize {
        self.total_births
    }

    pub fn total_deaths(&self) -> usize {
        self.total_deaths
    }

    /// The configured tick interval as a [`Duration`].
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.config.period_ms)
    }

    /// Advance one cell's staged order a single step through the cycle
    /// `None → MarkAlive → MarkDead → None`.
    ///
    /// Entering `MarkAlive` is the only gated transition: it requires the
    /// balance to cover `cost_per_cell`. Leaving `None` charges that cost,
    /// returning to `None` refunds it, and moving between the two non-neutral
    /// orders settles nothing. Staging charges on entry into the cycle, so an
    /// already-alive cell staged `MarkAlive` pays the same as a new build.
    pub fn toggle_cell(&mut self, row: usize, col: usize) -> ToggleOutcome {
        let cost = self.config.cost_per_cell;
        let Some(cell) = self.grid.cell_mut(row, col) else {
            return ToggleOutcome::OutOfBounds;
        };
        let current = cell.pending;
        let next = current.advance();
        if next == PendingOrder::MarkAlive && self.ledger.resources() < cost {
            return ToggleOutcome::InsufficientResources;
        }
        match (current.is_none(), next.is_none()) {
            // Entering the cycle reserves the staging cost.
            (true, false) => {
                if !self.ledger.charge(cost) {
                    return ToggleOutcome::InsufficientResources;
                }
            }
            // Wrapping back to None releases the reservation.
            (false, true) => self.ledger.refund(cost),
            _ => {}
        }
        cell.pending = next;
        ToggleOutcome::Staged { order: next }
    }

    /// Bake every staged order into the grid and clear all markers. Costs
    /// were settled at staging time, so nothing is charged or refunded here;
    /// in particular, canceling an order by committing it does not refund.
    pub fn submit(&mut self) -> usize {
        self.grid.apply_staged_orders()
    }

    /// Kill every cell. Staged orders, resource nodes, and the ledger are
    /// all left untouched.
    pub fn clear(&mut self) {
        self.grid.clear_alive();
    }

    /// Seed an initial population for a headless run: each cell is set alive
    /// with probability `fill` from the session RNG. Meant to run before the
    /// first tick; staged orders and the ledger are untouched.
    pub fn seed_random_life(&mut self, fill: f64) {
        let fill = fill.clamp(0.0, 1.0);
        self.grid.randomize_alive(&mut self.rng, fill);
    }
}
