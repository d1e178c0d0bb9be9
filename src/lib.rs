//! # Budget Transparency Core
//!
//! The data pipeline behind a municipal budget transparency portal:
//! parse a budget line-item export and a chart-of-accounts lookup,
//! join them on account number, and roll the line items up into a
//! category → department → line-item tree with per-fiscal-period
//! totals. Presentation (charts, tables) consumes the tree and the
//! top-line summary; it is not this crate's concern.
//!
//! ## Core Concepts
//!
//! - **Directory**: the account-number → (category, department) lookup
//!   built from the chart of accounts
//! - **Fiscal period**: one named amount column (e.g. prior-year
//!   actuals, current budget, next-year request)
//! - **Rollup**: totals summed bottom-up from line items through
//!   departments and categories to the grand totals
//! - **Strict join**: budget records with no directory entry are
//!   excluded and counted, never guessed into a bucket
//!
//! ## Example
//!
//! ```rust
//! use budget_transparency::{build_portal_view, PortalSchema};
//!
//! let directory_csv = "Account Number,Category,Department\n\
//!                      100,Public Safety,Police\n";
//! let budget_csv = "Account Number,Description,FY21 ACTUALS,FY22 ACTUALS,\
//!                   FY23 ACTUALS,FY24 BUDGET,FY25 DEPT REQ.\n\
//!                   100,Radios,900,950,975,1000,1200\n";
//!
//! let view = build_portal_view(budget_csv, directory_csv, &PortalSchema::default());
//! assert_eq!(view.tree.categories[0].name, "Public Safety");
//! assert_eq!(view.summary.current_total, 1200.0);
//! ```

pub mod aggregate;
pub mod directory;
pub mod error;
#[cfg(feature = "fetch")]
pub mod fetch;
pub mod schema;
pub mod summary;
pub mod table;

pub use aggregate::{aggregate, BudgetTree, CategoryNode, DepartmentNode, LineItem, PeriodTotals};
pub use directory::{AccountDirectory, DirectoryEntry};
pub use error::{BudgetPortalError, Result};
#[cfg(feature = "fetch")]
pub use fetch::{fetch_source, load_portal_sources};
pub use schema::{BudgetColumns, DirectoryColumns, FiscalPeriod, PortalSchema};
pub use summary::{summarize, BudgetSummary, PercentChange};
pub use table::{clean_field, parse_table, FieldValue, ParsedTable, RawRecord};

use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Row-level counters surfaced for diagnostics. None of these are
/// errors; they record what the pipeline skipped and why.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Budget rows dropped for field-count mismatch with the header.
    pub budget_rows_skipped: usize,
    /// Directory rows dropped for field-count mismatch with the header.
    pub directory_rows_skipped: usize,
    /// Directory rows dropped for a missing identifier, category, or
    /// department.
    pub directory_entries_skipped: usize,
    /// Budget records excluded because no directory entry matched.
    pub unmatched_records: usize,
}

/// Everything the presentation layer needs: the rollup tree, the
/// top-line summary, and the skip counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortalView {
    pub tree: BudgetTree,
    pub summary: BudgetSummary,
    pub diagnostics: Diagnostics,
}

impl PortalView {
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

pub struct BudgetPortal;

impl BudgetPortal {
    /// Runs the full pipeline on already-loaded source text: parse both
    /// sources, build the directory, aggregate, summarize.
    ///
    /// Parsing and aggregation recover locally from malformed rows and
    /// unmatched accounts (see [`Diagnostics`]), so this stage cannot
    /// fail; only loading the source text can, upstream.
    pub fn process(budget_text: &str, directory_text: &str, schema: &PortalSchema) -> PortalView {
        let directory_table = table::parse_table(directory_text);
        let budget_table = table::parse_table(budget_text);

        info!(
            "Parsed {} directory rows and {} budget rows",
            directory_table.records.len(),
            budget_table.records.len()
        );

        let directory = AccountDirectory::build(&directory_table.records, &schema.directory);
        debug!(
            "Directory holds {} accounts ({} rows skipped)",
            directory.len(),
            directory.skipped
        );

        let tree = aggregate::aggregate(&budget_table.records, &directory, &schema.budget);
        let summary = summary::summarize(&tree, &schema.budget);

        info!(
            "Aggregated {} categories, grand total {} = {:.2}, change {}",
            tree.categories.len(),
            schema.budget.current_period,
            summary.current_total,
            summary.percent_change
        );

        let diagnostics = Diagnostics {
            budget_rows_skipped: budget_table.skipped_rows,
            directory_rows_skipped: directory_table.skipped_rows,
            directory_entries_skipped: directory.skipped,
            unmatched_records: tree.unmatched_records,
        };

        PortalView {
            tree,
            summary,
            diagnostics,
        }
    }
}

pub fn build_portal_view(
    budget_text: &str,
    directory_text: &str,
    schema: &PortalSchema,
) -> PortalView {
    BudgetPortal::process(budget_text, directory_text, schema)
}

/// Fetches both sources and runs the pipeline. The only fatal failure
/// in the whole system: if either fetch fails, no partial view is
/// produced.
#[cfg(feature = "fetch")]
pub async fn load_and_build_portal_view(
    budget_url: &str,
    directory_url: &str,
    schema: &PortalSchema,
) -> Result<PortalView> {
    let (budget_text, directory_text) =
        fetch::load_portal_sources(budget_url, directory_url).await?;
    Ok(BudgetPortal::process(&budget_text, &directory_text, schema))
}
