use crate::aggregate::BudgetTree;
use crate::schema::BudgetColumns;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Period-over-period change. `NotApplicable` is the sentinel for a
/// zero prior total, so presentation never sees a NaN or infinity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PercentChange {
    Change(f64),
    NotApplicable,
}

impl PercentChange {
    /// Display rounding to 2 fractional digits. The stored value keeps
    /// full precision.
    pub fn rounded(&self) -> Option<f64> {
        match self {
            PercentChange::Change(pct) => Some((pct * 100.0).round() / 100.0),
            PercentChange::NotApplicable => None,
        }
    }
}

impl fmt::Display for PercentChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PercentChange::Change(pct) => write!(f, "{:.2}%", pct),
            PercentChange::NotApplicable => write!(f, "N/A"),
        }
    }
}

/// Top-line figures for the summary cards: prior and current period
/// grand totals and the change between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSummary {
    pub prior_total: f64,
    pub current_total: f64,
    pub percent_change: PercentChange,
}

/// Reduces the tree's grand totals to the designated prior/current
/// periods. By the rollup invariant this equals summing the included
/// line items directly.
pub fn summarize(tree: &BudgetTree, columns: &BudgetColumns) -> BudgetSummary {
    let prior_total = tree
        .grand_totals
        .get(&columns.prior_period)
        .copied()
        .unwrap_or(0.0);
    let current_total = tree
        .grand_totals
        .get(&columns.current_period)
        .copied()
        .unwrap_or(0.0);

    let percent_change = if prior_total == 0.0 {
        PercentChange::NotApplicable
    } else {
        PercentChange::Change((current_total - prior_total) / prior_total * 100.0)
    };

    BudgetSummary {
        prior_total,
        current_total,
        percent_change,
    }
}
