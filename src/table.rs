use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single parsed field: numeric if the cleaned value is entirely a
/// decimal number, otherwise the trimmed text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Number(_) => None,
            FieldValue::Text(s) => Some(s),
        }
    }

    /// Amount semantics used by the aggregation pass: non-numeric
    /// values, including blank cells, count as zero.
    pub fn amount_or_zero(&self) -> f64 {
        self.as_number().unwrap_or(0.0)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One data row, keyed by the header names of its source table.
pub type RawRecord = BTreeMap<String, FieldValue>;

/// Result of parsing one delimited text source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedTable {
    /// Header names in file order.
    pub headers: Vec<String>,
    pub records: Vec<RawRecord>,
    /// Data rows dropped because their field count disagreed with the
    /// header's.
    pub skipped_rows: usize,
}

/// Cleans one raw field into a [`FieldValue`].
///
/// Surrounding whitespace is trimmed and currency formatting (`$` and
/// `,`) is stripped. If the entire cleaned string parses as a decimal
/// number the field is numeric; anything else, including a blank cell,
/// stays text. Blank cells must remain visibly blank so identifier
/// checks can reject them; amount columns default them to zero through
/// [`FieldValue::amount_or_zero`] instead.
pub fn clean_field(raw: &str) -> FieldValue {
    let trimmed = raw.trim();
    let cleaned: String = trimmed.chars().filter(|c| *c != '$' && *c != ',').collect();

    match cleaned.parse::<f64>() {
        Ok(n) => FieldValue::Number(n),
        Err(_) => FieldValue::Text(trimmed.to_string()),
    }
}

/// Parses delimited text into header names and records.
///
/// The first line is the header row and fixes field order and arity.
/// Fields are split on literal commas with no quoting or escaping: a
/// comma inside a value is indistinguishable from a separator. This is
/// a documented limitation of the source files, not something to paper
/// over here.
///
/// A data row whose field count differs from the header's is dropped
/// and counted in [`ParsedTable::skipped_rows`]. Blank lines are
/// ignored. Parsing never fails; an empty input yields an empty table.
pub fn parse_table(raw: &str) -> ParsedTable {
    let mut lines = raw.lines().filter(|line| !line.trim().is_empty());

    let headers: Vec<String> = match lines.next() {
        Some(header_line) => header_line
            .split(',')
            .map(|h| h.trim().to_string())
            .collect(),
        None => {
            return ParsedTable {
                headers: Vec::new(),
                records: Vec::new(),
                skipped_rows: 0,
            }
        }
    };

    let mut records = Vec::new();
    let mut skipped_rows = 0;

    for line in lines {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != headers.len() {
            debug!(
                "Dropping row with {} fields (header has {}): {:?}",
                fields.len(),
                headers.len(),
                line
            );
            skipped_rows += 1;
            continue;
        }

        let record: RawRecord = headers
            .iter()
            .cloned()
            .zip(fields.into_iter().map(clean_field))
            .collect();
        records.push(record);
    }

    ParsedTable {
        headers,
        records,
        skipped_rows,
    }
}
