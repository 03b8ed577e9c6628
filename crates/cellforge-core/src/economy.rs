use std::collections::VecDeque;

/// Session resource ledger.
///
/// Holds the current balance, a bounded FIFO of per-tick deltas, and the
/// rolling resources-per-second average derived from that history. The
/// balance is unsigned; a tick delta that would drive it negative clamps to
/// zero instead.
#[derive(Clone, Debug)]
pub struct Ledger {
    resources: u64,
    history: VecDeque<i64>,
    window: usize,
    avg_per_second: i64,
    period_ms: u64,
}

impl Ledger {
    pub fn new(starting_resources: u64, window: usize, period_ms: u64) -> Self {
        debug_assert!(window > 0 && period_ms > 0);
        Self {
            resources: starting_resources,
            history: VecDeque::with_capacity(window),
            window,
            avg_per_second: 0,
            period_ms,
        }
    }

    pub fn resources(&self) -> u64 {
        self.resources
    }

    pub fn avg_per_second(&self) -> i64 {
        self.avg_per_second
    }

    pub fn history(&self) -> impl Iterator<Item = &i64> {
        self.history.iter()
    }

    /// Deduct a staging charge. Returns false (and deducts nothing) if the
    /// balance cannot cover it.
    pub(crate) fn charge(&mut self, amount: u64) -> bool {
        if self.resources < amount {
            return false;
        }
        self.resources -= amount;
        true
    }

    /// Return a previously charged staging cost to the balance.
    pub(crate) fn refund(&mut self, amount: u64) {
        self.resources = self.resources.saturating_add(amount);
    }

    /// Fold one tick's net delta into the ledger: evict the oldest history
    /// entry once the window is full, append the new delta, recompute the
    /// rolling average, and apply the delta to the balance with a floor of
    /// zero.
    pub(crate) fn record_tick(&mut self, delta: i64) {
        if self.history.len() >= self.window {
            self.history.pop_front();
        }
        self.history.push_back(delta);

        let sum: i64 = self.history.iter().sum();
        let mean = sum as f64 / self.history.len() as f64;
        self.avg_per_second = (mean * (1000.0 / self.period_ms as f64)).round() as i64;

        self.resources = self.resources.saturating_add_signed(delta);
    }
}
