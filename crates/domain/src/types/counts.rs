//! Live entity-count snapshot

use serde::{Deserialize, Serialize};

/// Network size snapshot read from a single-row live query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCounts {
    pub total_pdv_units: u64,
    pub pos_terminal_count: u64,
    pub totem_terminal_count: u64,
    pub list_pos_terminal_count: u64,
}

impl EntityCounts {
    /// POS, totem and list terminals added together.
    pub fn terminal_total(&self) -> u64 {
        self.pos_terminal_count
            .saturating_add(self.totem_terminal_count)
            .saturating_add(self.list_pos_terminal_count)
    }

    /// Whether the PDV total covers every terminal.
    ///
    /// The source does not enforce this, so callers log rather than fail.
    pub fn is_consistent(&self) -> bool {
        self.total_pdv_units >= self.terminal_total()
    }
}
