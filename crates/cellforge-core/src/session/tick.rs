use super::metrics::TickReport;
use super::Session;

impl Session {
    /// Advance the simulation by one tick.
    ///
    /// The entire next generation is computed from the current generation
    /// into a fresh buffer before any cell is mutated, so the rule never
    /// reads a half-updated grid. Staged orders are invisible to the tick;
    /// they only take effect through [`Session::submit`].
    ///
    /// The per-tick resource delta is assembled cell by cell: a death pays
    /// `cell_death_resource_generation`, every cell alive next tick costs
    /// `cell_upkeep_cost`, and a birth on a resource node additionally pays
    /// `node_resource_generation`. The ledger then folds the delta into the
    /// history window, the rolling average, and the zero-clamped balance.
    pub fn tick(&mut self) -> TickReport {
        self.tick_index += 1;
        self.births_last_tick = 0;
        self.deaths_last_tick = 0;

        let rows = self.grid.rows();
        let columns = self.grid.columns();
        let mut next_cells = self.grid.cells().to_vec();
        let mut delta: i64 = 0;

        for row in 0..rows {
            for col in 0..columns {
                let next_alive = self.grid.next_state(row, col);
                let index = row * columns + col;
                let cell = self.grid.cells()[index];
                if cell.alive && !next_alive {
                    delta += self.config.cell_death_resource_generation;
                    self.deaths_last_tick += 1;
                }
                if next_alive {
                    delta -= self.config.cell_upkeep_cost;
                    if !cell.alive {
                        self.births_last_tick += 1;
                        if cell.resource_node {
                            delta += self.config.node_resource_generation;
                        }
                    }
                }
                next_cells[index].alive = next_alive;
            }
        }

        self.grid.replace_cells(next_cells);
        self.total_births += self.births_last_tick;
        self.total_deaths += self.deaths_last_tick;
        self.ledger.record_tick(delta);

        TickReport {
            tick: self.tick_index,
            delta,
            resources: self.ledger.resources(),
            avg_per_second: self.ledger.avg_per_second(),
            births: self.births_last_tick,
            deaths: self.deaths_last_tick,
            alive_count: self.grid.alive_count(),
        }
    }
}
