//! A1-style cell and range references.
//!
//! Rows and columns are zero-based internally; `B4` is `row: 3, col: 1`.

use crate::error::{Result, SheetError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Largest row index a worksheet can address.
pub const MAX_ROW: u32 = 1_048_575;

/// Largest column index a worksheet can address (`XFD`).
pub const MAX_COL: u32 = 16_383;

/// A single cell position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellRef {
    /// Zero-based row index.
    pub row: u32,
    /// Zero-based column index.
    pub col: u32,
}

impl CellRef {
    /// Create a cell reference, rejecting positions outside the grid.
    pub fn new(row: u32, col: u32) -> Result<Self> {
        if row > MAX_ROW || col > MAX_COL {
            return Err(SheetError::InvalidAddress(format!(
                "row {} col {} is outside the worksheet",
                row, col
            )));
        }
        Ok(Self { row, col })
    }

    /// Parse an A1 reference such as `F2` or `AA10`.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let split = s
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| SheetError::InvalidAddress(s.to_string()))?;
        let (letters, digits) = s.split_at(split);
        if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(SheetError::InvalidAddress(s.to_string()));
        }
        let row: u32 = digits
            .parse()
            .map_err(|_| SheetError::InvalidAddress(s.to_string()))?;
        if row == 0 {
            return Err(SheetError::InvalidAddress(s.to_string()));
        }
        let col = column_index(letters).ok_or_else(|| SheetError::InvalidAddress(s.to_string()))?;
        Self::new(row - 1, col)
    }

    /// Move by a signed number of rows and columns.
    pub fn offset(self, rows: i64, cols: i64) -> Result<Self> {
        let row = i64::from(self.row) + rows;
        let col = i64::from(self.col) + cols;
        if row < 0 || col < 0 {
            return Err(SheetError::InvalidAddress(format!(
                "offset ({}, {}) from {} leaves the worksheet",
                rows, cols, self
            )));
        }
        Self::new(row as u32, col as u32)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_name(self.col), self.row + 1)
    }
}

impl FromStr for CellRef {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A rectangular block of cells, inclusive on both corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RangeRef {
    /// Top-left cell.
    pub start: CellRef,
    /// Bottom-right cell.
    pub end: CellRef,
}

impl RangeRef {
    /// Create a range from two corners in any order.
    pub fn new(a: CellRef, b: CellRef) -> Self {
        Self {
            start: CellRef {
                row: a.row.min(b.row),
                col: a.col.min(b.col),
            },
            end: CellRef {
                row: a.row.max(b.row),
                col: a.col.max(b.col),
            },
        }
    }

    /// A one-cell range.
    pub const fn single(cell: CellRef) -> Self {
        Self {
            start: cell,
            end: cell,
        }
    }

    /// Parse `B4:D14` or a single cell such as `F2`.
    pub fn parse(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some((a, b)) => Ok(Self::new(CellRef::parse(a)?, CellRef::parse(b)?)),
            None => Ok(Self::single(CellRef::parse(s)?)),
        }
    }

    /// Number of rows covered.
    pub const fn row_count(&self) -> usize {
        (self.end.row - self.start.row + 1) as usize
    }

    /// Number of columns covered.
    pub const fn column_count(&self) -> usize {
        (self.end.col - self.start.col + 1) as usize
    }

    /// Whether the range is a single cell.
    pub fn is_single_cell(&self) -> bool {
        self.start == self.end
    }

    /// Whether `cell` lies inside the range.
    pub const fn contains(&self, cell: CellRef) -> bool {
        cell.row >= self.start.row
            && cell.row <= self.end.row
            && cell.col >= self.start.col
            && cell.col <= self.end.col
    }

    /// Whether the two ranges share at least one cell.
    pub const fn intersects(&self, other: &Self) -> bool {
        self.start.row <= other.end.row
            && other.start.row <= self.end.row
            && self.start.col <= other.end.col
            && other.start.col <= self.end.col
    }

    /// Column `index` of the range (zero-based, relative to the range).
    pub fn column(&self, index: usize) -> Result<Self> {
        if index >= self.column_count() {
            return Err(SheetError::InvalidAddress(format!(
                "column {} is outside {}",
                index, self
            )));
        }
        let col = self.start.col + index as u32;
        Ok(Self {
            start: CellRef {
                row: self.start.row,
                col,
            },
            end: CellRef {
                row: self.end.row,
                col,
            },
        })
    }

    /// Rightmost column of the range.
    pub const fn last_column(&self) -> Self {
        Self {
            start: CellRef {
                row: self.start.row,
                col: self.end.col,
            },
            end: self.end,
        }
    }

    /// Row `index` of the range (zero-based, relative to the range).
    pub fn row(&self, index: usize) -> Result<Self> {
        if index >= self.row_count() {
            return Err(SheetError::InvalidAddress(format!(
                "row {} is outside {}",
                index, self
            )));
        }
        let row = self.start.row + index as u32;
        Ok(Self {
            start: CellRef {
                row,
                col: self.start.col,
            },
            end: CellRef { row, col: self.end.col },
        })
    }

    /// Everything below the first row, or `None` for a one-row range.
    pub const fn data_body(&self) -> Option<Self> {
        if self.start.row == self.end.row {
            return None;
        }
        Some(Self {
            start: CellRef {
                row: self.start.row + 1,
                col: self.start.col,
            },
            end: self.end,
        })
    }

    /// Smallest range covering both `self` and `other`.
    pub fn bounding_rect(&self, other: &Self) -> Self {
        Self::new(
            CellRef {
                row: self.start.row.min(other.start.row),
                col: self.start.col.min(other.start.col),
            },
            CellRef {
                row: self.end.row.max(other.end.row),
                col: self.end.col.max(other.end.col),
            },
        )
    }

    /// A same-sized range moved by `rows` and `cols`.
    pub fn offset(&self, rows: i64, cols: i64) -> Result<Self> {
        Ok(Self {
            start: self.start.offset(rows, cols)?,
            end: self.end.offset(rows, cols)?,
        })
    }

    /// Extend the bottom edge by `rows`.
    pub fn grow_rows(&self, rows: u32) -> Result<Self> {
        Ok(Self {
            start: self.start,
            end: CellRef::new(self.end.row + rows, self.end.col)?,
        })
    }

    /// Column indices covered, i.e. the range's entire columns.
    pub const fn columns(&self) -> RangeInclusive<u32> {
        self.start.col..=self.end.col
    }

    /// Every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellRef> + '_ {
        (self.start.row..=self.end.row)
            .flat_map(move |row| self.columns().map(move |col| CellRef { row, col }))
    }
}

impl fmt::Display for RangeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single_cell() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}:{}", self.start, self.end)
        }
    }
}

impl FromStr for RangeRef {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

macro_rules! a1_serde {
    ($ty:ty, $expecting:literal) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(|_| {
                    serde::de::Error::invalid_value(serde::de::Unexpected::Str(&raw), &$expecting)
                })
            }
        }
    };
}

a1_serde!(CellRef, "an A1 cell reference");
a1_serde!(RangeRef, "an A1 range reference");

/// Column letters for a zero-based index (`0` -> `A`, `26` -> `AA`).
pub fn column_name(mut col: u32) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (col % 26) as u8);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Zero-based index for column letters, case-insensitive.
pub fn column_index(letters: &str) -> Option<u32> {
    if letters.is_empty() || letters.len() > 3 {
        return None;
    }
    let mut index: u32 = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        index = index * 26 + (ch.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
    }
    let index = index - 1;
    (index <= MAX_COL).then_some(index)
}
