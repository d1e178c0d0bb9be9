use crate::schema::DirectoryColumns;
use crate::table::RawRecord;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where an account rolls up: its category and the department that
/// owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub category: String,
    pub department: String,
}

/// Lookup from account identifier to [`DirectoryEntry`], built once
/// from the chart-of-accounts rows and read-only afterwards.
///
/// Policy for malformed rows: a row whose account identifier is
/// missing or blank, or whose category or department is not non-empty
/// text, is dropped and counted in [`AccountDirectory::skipped`]. No
/// placeholder buckets are invented for them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountDirectory {
    entries: BTreeMap<String, DirectoryEntry>,
    /// Directory rows excluded for missing identifier, category, or
    /// department.
    pub skipped: usize,
}

impl AccountDirectory {
    pub fn build(records: &[RawRecord], columns: &DirectoryColumns) -> Self {
        let mut entries = BTreeMap::new();
        let mut skipped = 0;

        for record in records {
            let account = record
                .get(&columns.account)
                .map(|v| v.to_string())
                .filter(|s| !s.is_empty());
            let category = record
                .get(&columns.category)
                .and_then(|v| v.as_text())
                .filter(|s| !s.is_empty());
            let department = record
                .get(&columns.department)
                .and_then(|v| v.as_text())
                .filter(|s| !s.is_empty());

            match (account, category, department) {
                (Some(account), Some(category), Some(department)) => {
                    // Last write wins on duplicate account numbers.
                    entries.insert(
                        account,
                        DirectoryEntry {
                            category: category.to_string(),
                            department: department.to_string(),
                        },
                    );
                }
                (account, _, _) => {
                    debug!(
                        "Dropping directory row for account {:?}: missing identifier, category, or department",
                        account
                    );
                    skipped += 1;
                }
            }
        }

        Self { entries, skipped }
    }

    pub fn get(&self, account: &str) -> Option<&DirectoryEntry> {
        self.entries.get(account)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::parse_table;

    fn build_from_csv(csv: &str) -> AccountDirectory {
        let table = parse_table(csv);
        AccountDirectory::build(&table.records, &DirectoryColumns::default())
    }

    #[test]
    fn test_build_directory() {
        let directory = build_from_csv(
            "Account Number,Category,Department\n\
             100,Public Safety,Police\n\
             200,Public Works,Highway\n",
        );

        assert_eq!(directory.len(), 2);
        assert_eq!(directory.skipped, 0);

        let entry = directory.get("100").unwrap();
        assert_eq!(entry.category, "Public Safety");
        assert_eq!(entry.department, "Police");
    }

    #[test]
    fn test_missing_category_or_department_is_dropped() {
        let directory = build_from_csv(
            "Account Number,Category,Department\n\
             100,Public Safety,Police\n\
             101,,Police\n\
             102,Public Safety,\n",
        );

        assert_eq!(directory.len(), 1);
        assert_eq!(directory.skipped, 2);
        assert!(directory.get("101").is_none());
        assert!(directory.get("102").is_none());
    }

    #[test]
    fn test_blank_account_identifier_is_dropped() {
        let directory = build_from_csv(
            "Account Number,Category,Department\n\
             ,Public Safety,Police\n\
             100,Public Safety,Police\n",
        );

        assert_eq!(directory.len(), 1);
        assert_eq!(directory.skipped, 1);
        // A blank cell must not be keyed as some fabricated identifier.
        assert!(directory.get("0").is_none());
        assert!(directory.get("").is_none());
    }

    #[test]
    fn test_duplicate_account_last_write_wins() {
        let directory = build_from_csv(
            "Account Number,Category,Department\n\
             100,Public Safety,Police\n\
             100,General Government,Town Clerk\n",
        );

        assert_eq!(directory.len(), 1);
        let entry = directory.get("100").unwrap();
        assert_eq!(entry.category, "General Government");
        assert_eq!(entry.department, "Town Clerk");
    }

    #[test]
    fn test_numeric_account_keys_match_budget_side() {
        // Account numbers parse as numbers; both sources format them
        // the same way, so the join key is consistent.
        let directory = build_from_csv(
            "Account Number,Category,Department\n\
             00100,Public Safety,Police\n",
        );
        assert!(directory.get("100").is_some());
    }
}
