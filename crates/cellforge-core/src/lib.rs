//! Turn-based cellular-automaton game engine with an attached resource
//! economy.
//!
//! A [`session::Session`] owns a fixed-size [`grid::Grid`] of cells and an
//! [`economy::Ledger`]. Players stage build/kill orders cell by cell
//! ([`session::Session::toggle_cell`]), commit them in one shot
//! ([`session::Session::submit`]), and a fixed-period tick
//! ([`session::Session::tick`], paced by [`cadence::TickCadence`]) evolves
//! the grid under the Game of Life rule while cell births, deaths, and
//! resource nodes move the ledger.

pub mod cadence;
pub mod cell;
pub mod config;
pub mod economy;
pub mod grid;
pub mod session;

pub use cadence::TickCadence;
pub use cell::{Cell, PendingOrder};
pub use config::{GameConfig, GameConfigError};
pub use economy::Ledger;
pub use grid::{Grid, GridInitError};
pub use session::{
    ExperimentError, RunSummary, Session, SessionInitError, TickReport, ToggleOutcome,
};
