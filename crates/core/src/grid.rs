//! A single 8x8 binary frame of the device light pattern.

use core::{fmt::Display, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

/// Number of rows and columns of the device matrix.
pub const GRID_SIZE: usize = 8;
/// Total number of cells in a single grid.
pub const GRID_CELLS: usize = GRID_SIZE * GRID_SIZE;
/// Rows separator used in the textual grid representation.
pub const ROW_SEPARATOR: char = ',';

/// An immutable-shape 8x8 matrix of on/off cells.
///
/// Each row is packed into a single byte, the most significant bit is the leftmost
/// column. The textual form is produced by the [`Display`] implementation and parsed
/// by [`FromStr`]:
///
/// ```text
/// 00000000,00011000,00100100,01000010,01000010,00100100,00011000,00000000
/// ```
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, Hash)]
pub struct Grid {
    rows: [u8; GRID_SIZE],
}

impl Grid {
    /// Creates a grid with all cells turned off.
    pub const fn empty() -> Self {
        Self {
            rows: [0; GRID_SIZE],
        }
    }

    /// Creates a grid from the packed row bytes.
    pub const fn from_bits(rows: [u8; GRID_SIZE]) -> Self {
        Self { rows }
    }

    /// Builds a grid from a numeric matrix, each value must be either `0` or `1`.
    pub fn from_matrix<R>(matrix: &[R]) -> Result<Self>
    where
        R: AsRef<[u8]>,
    {
        if matrix.len() != GRID_SIZE {
            return Err(Error::Format(format!(
                "expected {GRID_SIZE} rows, got {}",
                matrix.len()
            )));
        }

        let mut grid = Self::empty();
        for (row, values) in matrix.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != GRID_SIZE {
                return Err(Error::Format(format!(
                    "row {row} has {} cells instead of {GRID_SIZE}",
                    values.len()
                )));
            }

            for (col, value) in values.iter().enumerate() {
                match value {
                    0 => {}
                    1 => grid.set_cell(row, col, true),
                    other => {
                        return Err(Error::Format(format!(
                            "unexpected cell value {other} at ({row}, {col})"
                        )))
                    }
                }
            }
        }
        Ok(grid)
    }

    /// Builds a grid from the row-major 8x8 grayscale values.
    ///
    /// A cell is turned on if its value is strictly greater than the threshold.
    pub fn from_grayscale(pixels: &[u8], threshold: u8) -> Result<Self> {
        if pixels.len() != GRID_CELLS {
            return Err(Error::Format(format!(
                "expected {GRID_CELLS} grayscale values, got {}",
                pixels.len()
            )));
        }

        let mut grid = Self::empty();
        for (index, value) in pixels.iter().enumerate() {
            if *value > threshold {
                grid.set_cell(index / GRID_SIZE, index % GRID_SIZE, true);
            }
        }
        Ok(grid)
    }

    /// Returns the cell state or `None` if the coordinates are out of the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<bool> {
        if row < GRID_SIZE && col < GRID_SIZE {
            Some(self.rows[row] & Self::mask(col) != 0)
        } else {
            None
        }
    }

    /// Returns a new grid with the `(row, col)` cell flipped.
    ///
    /// Coordinates outside of the grid leave it unchanged, callers should check bounds
    /// beforehand or use [`Self::try_toggle`].
    #[must_use]
    pub fn toggle(self, row: usize, col: usize) -> Self {
        self.try_toggle(row, col).unwrap_or(self)
    }

    /// Returns a new grid with the `(row, col)` cell flipped or an error if the
    /// coordinates are out of the grid.
    pub fn try_toggle(self, row: usize, col: usize) -> Result<Self> {
        Error::check_index(row, GRID_SIZE)?;
        Error::check_index(col, GRID_SIZE)?;

        let mut grid = self;
        grid.rows[row] ^= Self::mask(col);
        Ok(grid)
    }

    /// Returns the number of turned on cells.
    pub fn count_on(&self) -> usize {
        self.rows.iter().map(|row| row.count_ones() as usize).sum()
    }

    /// Returns true if all cells are turned off.
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| *row == 0)
    }

    /// Returns an iterator over the grid rows with the cell states.
    pub fn rows(&self) -> impl Iterator<Item = [bool; GRID_SIZE]> + '_ {
        self.rows
            .iter()
            .map(|row| core::array::from_fn(|col| row & Self::mask(col) != 0))
    }

    fn set_cell(&mut self, row: usize, col: usize, on: bool) {
        if on {
            self.rows[row] |= Self::mask(col);
        } else {
            self.rows[row] &= !Self::mask(col);
        }
    }

    const fn mask(col: usize) -> u8 {
        0x80 >> col
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (index, row) in self.rows.iter().enumerate() {
            if index > 0 {
                write!(f, "{ROW_SEPARATOR}")?;
            }
            write!(f, "{row:08b}")?;
        }
        Ok(())
    }
}

impl FromStr for Grid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut grid = Self::empty();
        let mut rows_count = 0;
        for (row, line) in s.split(ROW_SEPARATOR).enumerate() {
            if row >= GRID_SIZE {
                return Err(Error::Format(format!(
                    "too many rows in the grid string '{s}'"
                )));
            }
            if line.len() != GRID_SIZE {
                return Err(Error::Format(format!(
                    "row {row} '{line}' must have exactly {GRID_SIZE} characters"
                )));
            }

            for (col, ch) in line.chars().enumerate() {
                match ch {
                    '0' => {}
                    '1' => grid.set_cell(row, col, true),
                    other => {
                        return Err(Error::Format(format!(
                            "unexpected character '{other}' in row {row}"
                        )))
                    }
                }
            }
            rows_count += 1;
        }

        if rows_count != GRID_SIZE {
            return Err(Error::Format(format!(
                "expected {GRID_SIZE} rows, got {rows_count}"
            )));
        }
        Ok(grid)
    }
}

impl Serialize for Grid {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Grid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
