//! Calculation history.
//!
//! Every successful evaluation is recorded as `expression = result`. The
//! standard and advanced calculators keep separate, append-only logs; the
//! conversions page has none.

use std::fmt;

use crate::errors::*;

const SEPARATOR: &str = " = ";

/// Calculator page the user works with
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalcMode {
    Standard,
    Advanced,
    Conversions,
}

impl Default for CalcMode {
    fn default() -> CalcMode {
        CalcMode::Standard
    }
}

impl std::str::FromStr for CalcMode {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(CalcMode::Standard),
            "advanced" => Ok(CalcMode::Advanced),
            "conversions" => Ok(CalcMode::Conversions),
            _ => Err(CalcError::InvalidInput(s.to_string())),
        }
    }
}

/// One recorded calculation. Never changes after it is created
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryEntry {
    expression: String,
    result: String,
}

impl HistoryEntry {
    pub fn new(expression: &str, result: &str) -> Self {
        HistoryEntry {
            expression: expression.trim().to_string(),
            result: result.trim().to_string(),
        }
    }

    /// The left-hand side, the text that goes back into the display on replay
    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn result(&self) -> &str {
        &self.result
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}{}", self.expression, SEPARATOR, self.result)
    }
}

/// Ordered log of calculations
#[derive(Clone, Debug, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// Removes all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// All entries, oldest first
    pub fn all(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, idx: usize) -> Option<&HistoryEntry> {
        self.entries.get(idx)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the expression of an entry to put back into the display
    pub fn replay(&self, idx: usize) -> Option<&str> {
        self.get(idx).map(HistoryEntry::expression)
    }
}

/// Histories of all calculator pages
#[derive(Clone, Debug, Default)]
pub struct HistoryBook {
    standard: History,
    advanced: History,
}

impl HistoryBook {
    pub fn new() -> Self {
        Default::default()
    }

    /// History of a page, `None` for the pages without history
    pub fn get(&self, mode: CalcMode) -> Option<&History> {
        match mode {
            CalcMode::Standard => Some(&self.standard),
            CalcMode::Advanced => Some(&self.advanced),
            CalcMode::Conversions => None,
        }
    }

    pub fn get_mut(&mut self, mode: CalcMode) -> Option<&mut History> {
        match mode {
            CalcMode::Standard => Some(&mut self.standard),
            CalcMode::Advanced => Some(&mut self.advanced),
            CalcMode::Conversions => None,
        }
    }
}
