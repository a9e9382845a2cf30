//! RestoreOutcome - リストア 1 回分の集計
//!
//! 実行中に単調増加し、永続化はしません。

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RestoreOutcome {
    /// Statements that did not fail critically (succeeded or ignorable error).
    pub executed_count: usize,
    pub ignored_error_count: usize,
    pub critical_error_count: usize,
}

impl RestoreOutcome {
    pub(crate) fn record_success(&mut self) {
        self.executed_count += 1;
    }

    pub(crate) fn record_ignored(&mut self) {
        self.executed_count += 1;
        self.ignored_error_count += 1;
    }

    pub(crate) fn record_critical(&mut self) {
        self.critical_error_count += 1;
    }

    pub fn is_clean(&self) -> bool {
        self.critical_error_count == 0
    }
}
