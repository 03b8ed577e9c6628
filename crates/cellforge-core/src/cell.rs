/// A staged player order for one cell, not yet applied to the simulation.
///
/// Orders cycle forward one step per toggle: `None → MarkAlive → MarkDead →
/// None`. The cycle never skips and never runs backwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PendingOrder {
    #[default]
    None,
    MarkAlive,
    MarkDead,
}

impl PendingOrder {
    /// The next order in the staging cycle.
    pub fn advance(self) -> Self {
        match self {
            PendingOrder::None => PendingOrder::MarkAlive,
            PendingOrder::MarkAlive => PendingOrder::MarkDead,
            PendingOrder::MarkDead => PendingOrder::None,
        }
    }

    pub fn is_none(self) -> bool {
        self == PendingOrder::None
    }
}

/// One grid position.
///
/// `alive` is owned by the tick engine and the submit/clear operations;
/// `pending` is owned by order staging; `resource_node` is assigned once at
/// grid creation and never changes afterwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    pub alive: bool,
    pub pending: PendingOrder,
    pub resource_node: bool,
}
