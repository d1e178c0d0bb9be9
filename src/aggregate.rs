use crate::directory::AccountDirectory;
use crate::schema::BudgetColumns;
use crate::table::RawRecord;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Per-period totals, keyed by the schema's logical period keys.
pub type PeriodTotals = BTreeMap<String, f64>;

/// One budget line item. Amounts are keyed by logical period key;
/// display order comes from the schema's period list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub amounts: PeriodTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentNode {
    pub name: String,
    pub totals: PeriodTotals,
    pub line_items: Vec<LineItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryNode {
    pub name: String,
    pub totals: PeriodTotals,
    /// Departments in first-seen order, unique by name within the
    /// category.
    pub departments: Vec<DepartmentNode>,
}

/// The category → department → line-item rollup handed to the
/// presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetTree {
    /// Categories in first-seen order, unique by name.
    pub categories: Vec<CategoryNode>,
    pub grand_totals: PeriodTotals,
    /// Budget records excluded because their account identifier has no
    /// directory entry.
    pub unmatched_records: usize,
}

impl BudgetTree {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn category(&self, name: &str) -> Option<&CategoryNode> {
        self.categories.iter().find(|c| c.name == name)
    }
}

impl CategoryNode {
    pub fn department(&self, name: &str) -> Option<&DepartmentNode> {
        self.departments.iter().find(|d| d.name == name)
    }
}

fn add_amounts(totals: &mut PeriodTotals, amounts: &PeriodTotals) {
    for (period, amount) in amounts {
        *totals.entry(period.clone()).or_insert(0.0) += amount;
    }
}

/// Joins budget records against the account directory and rolls them
/// up into a [`BudgetTree`].
///
/// Records whose account identifier has no directory entry are
/// excluded and counted; this crate implements the strict policy only,
/// no "Uncategorized" fallback bucket. Category and department
/// ordering is first-seen insertion order (presentation may re-sort).
/// Each period amount defaults to zero when the column is missing or
/// non-numeric, and every retained amount is added into exactly one
/// department, one category, and the grand totals. Accumulation does
/// no rounding; rounding is a display concern.
pub fn aggregate(
    records: &[RawRecord],
    directory: &AccountDirectory,
    columns: &BudgetColumns,
) -> BudgetTree {
    let mut categories: Vec<CategoryNode> = Vec::new();
    let mut grand_totals = PeriodTotals::new();
    let mut unmatched_records = 0;

    // Index maps reproduce the first-seen ordering of repeated linear
    // scans without their quadratic cost.
    let mut category_index: HashMap<String, usize> = HashMap::new();
    let mut department_index: HashMap<(usize, String), usize> = HashMap::new();

    for record in records {
        // A blank identifier (subtotal/header rows in spreadsheet
        // exports) can never join the directory.
        let account = match record.get(&columns.account).map(|v| v.to_string()) {
            Some(account) if !account.is_empty() => account,
            _ => {
                unmatched_records += 1;
                continue;
            }
        };

        let entry = match directory.get(&account) {
            Some(entry) => entry,
            None => {
                debug!("No directory entry for account {}, excluding record", account);
                unmatched_records += 1;
                continue;
            }
        };

        let cat_idx = match category_index.get(&entry.category) {
            Some(&idx) => idx,
            None => {
                categories.push(CategoryNode {
                    name: entry.category.clone(),
                    totals: PeriodTotals::new(),
                    departments: Vec::new(),
                });
                let idx = categories.len() - 1;
                category_index.insert(entry.category.clone(), idx);
                idx
            }
        };

        let dept_key = (cat_idx, entry.department.clone());
        let dept_idx = match department_index.get(&dept_key) {
            Some(&idx) => idx,
            None => {
                categories[cat_idx].departments.push(DepartmentNode {
                    name: entry.department.clone(),
                    totals: PeriodTotals::new(),
                    line_items: Vec::new(),
                });
                let idx = categories[cat_idx].departments.len() - 1;
                department_index.insert(dept_key, idx);
                idx
            }
        };

        let description = record
            .get(&columns.description)
            .map(|v| v.to_string())
            .unwrap_or_default();

        let amounts: PeriodTotals = columns
            .periods
            .iter()
            .map(|period| {
                let amount = record
                    .get(&period.column)
                    .map(|v| v.amount_or_zero())
                    .unwrap_or(0.0);
                (period.key.clone(), amount)
            })
            .collect();

        add_amounts(&mut grand_totals, &amounts);
        add_amounts(&mut categories[cat_idx].totals, &amounts);

        let department = &mut categories[cat_idx].departments[dept_idx];
        add_amounts(&mut department.totals, &amounts);
        department.line_items.push(LineItem {
            description,
            amounts,
        });
    }

    BudgetTree {
        categories,
        grand_totals,
        unmatched_records,
    }
}
