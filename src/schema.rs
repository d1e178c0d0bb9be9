use serde::{Deserialize, Serialize};

/// Column names consumed from the chart-of-accounts source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryColumns {
    pub account: String,
    pub category: String,
    pub department: String,
}

impl Default for DirectoryColumns {
    fn default() -> Self {
        Self {
            account: "Account Number".to_string(),
            category: "Category".to_string(),
            department: "Department".to_string(),
        }
    }
}

/// One fiscal-period column: a short logical key (stable across file
/// revisions, used as the map key in totals) and the literal column
/// header it is read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalPeriod {
    pub key: String,
    pub column: String,
}

impl FiscalPeriod {
    pub fn new(key: &str, column: &str) -> Self {
        Self {
            key: key.to_string(),
            column: column.to_string(),
        }
    }
}

/// Column names consumed from the budget line-item source, plus which
/// logical periods the summary treats as "prior" and "current".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetColumns {
    pub account: String,
    pub description: String,
    /// Fiscal periods in display order.
    pub periods: Vec<FiscalPeriod>,
    /// Logical key of the period the summary compares against.
    pub prior_period: String,
    /// Logical key of the period the summary reports.
    pub current_period: String,
}

impl Default for BudgetColumns {
    fn default() -> Self {
        Self {
            account: "Account Number".to_string(),
            description: "Description".to_string(),
            periods: vec![
                FiscalPeriod::new("fy21", "FY21 ACTUALS"),
                FiscalPeriod::new("fy22", "FY22 ACTUALS"),
                FiscalPeriod::new("fy23", "FY23 ACTUALS"),
                FiscalPeriod::new("fy24", "FY24 BUDGET"),
                FiscalPeriod::new("fy25", "FY25 DEPT REQ."),
            ],
            prior_period: "fy24".to_string(),
            current_period: "fy25".to_string(),
        }
    }
}

/// Full column mapping for one portal deployment. The defaults
/// reproduce the headers of the town's general-fund export; deployments
/// with different spreadsheet layouts override this via configuration
/// instead of editing code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortalSchema {
    pub directory: DirectoryColumns,
    pub budget: BudgetColumns,
}

impl PortalSchema {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schema_matches_source_headers() {
        let schema = PortalSchema::default();
        assert_eq!(schema.directory.account, "Account Number");
        assert_eq!(schema.directory.category, "Category");
        assert_eq!(schema.directory.department, "Department");
        assert_eq!(schema.budget.description, "Description");
        assert_eq!(schema.budget.periods.len(), 5);
        assert_eq!(schema.budget.periods[4].column, "FY25 DEPT REQ.");
        assert_eq!(schema.budget.prior_period, "fy24");
        assert_eq!(schema.budget.current_period, "fy25");
    }

    #[test]
    fn test_schema_round_trips_through_json() {
        let schema = PortalSchema::default();
        let json = schema.to_json().unwrap();
        let back = PortalSchema::from_json(&json).unwrap();
        assert_eq!(schema, back);
    }
}
