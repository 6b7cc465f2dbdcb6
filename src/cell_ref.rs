//! Spreadsheet cell addresses ("B7" and friends).

use std::fmt;
use std::str::FromStr;

/// A zero-based cell position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddress {
    /// Zero-based column (A = 0)
    pub column: u32,
    /// Zero-based row (1 = 0)
    pub row: u32,
}

impl CellAddress {
    /// Create an address from zero-based coordinates.
    pub fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Parse a cell reference like "AB12" (letters then digits).
    ///
    /// Column letters use base-26 arithmetic (A=1 … Z=26, AA=27) and both
    /// coordinates are then shifted to zero-based. `$` markers are ignored.
    pub fn parse(cell_ref: &str) -> Option<Self> {
        let cell_ref = cell_ref.trim();
        let mut column: u32 = 0;
        let mut row: u32 = 0;
        let mut saw_column = false;
        let mut saw_row = false;

        for ch in cell_ref.chars() {
            match ch {
                '$' => continue,
                'A'..='Z' | 'a'..='z' if !saw_row => {
                    let digit = ch.to_ascii_uppercase() as u32 - 'A' as u32 + 1;
                    column = column.checked_mul(26)?.checked_add(digit)?;
                    saw_column = true;
                }
                '0'..='9' if saw_column => {
                    row = row.checked_mul(10)?.checked_add(ch as u32 - '0' as u32)?;
                    saw_row = true;
                }
                _ => return None,
            }
        }

        if !saw_column || !saw_row || row == 0 {
            return None;
        }

        Some(Self {
            column: column - 1,
            row: row - 1,
        })
    }

    /// Column letters for this address ("A", "AB", ...).
    pub fn column_name(&self) -> String {
        let mut n = self.column + 1;
        let mut letters = Vec::new();
        while n > 0 {
            let rem = (n - 1) % 26;
            letters.push((b'A' + rem as u8) as char);
            n = (n - 1) / 26;
        }
        letters.iter().rev().collect()
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column_name(), self.row + 1)
    }
}

impl FromStr for CellAddress {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid cell reference: {s}"))
    }
}
