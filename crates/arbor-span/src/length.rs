//! Byte and row/column lengths.
//!
//! Both `Point` and `Length` are relative quantities: adding a point whose
//! row is non-zero moves to a new line, so the column of the left operand is
//! discarded.

use std::cmp::Ordering;
use std::ops::{Add, AddAssign, Sub};

use text_size::TextSize;

/// A row/column extent.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Point {
    pub row: u32,
    pub column: u32,
}

impl Point {
    pub const ZERO: Self = Self { row: 0, column: 0 };

    #[inline]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }
}

impl Add for Point {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        if rhs.row > 0 {
            Self::new(self.row + rhs.row, rhs.column)
        } else {
            Self::new(self.row, self.column + rhs.column)
        }
    }
}

impl Sub for Point {
    type Output = Self;

    /// Clamps at zero instead of underflowing.
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        match self.row.cmp(&rhs.row) {
            Ordering::Greater => Self::new(self.row - rhs.row, self.column),
            Ordering::Equal => Self::new(0, self.column.saturating_sub(rhs.column)),
            Ordering::Less => Self::ZERO,
        }
    }
}

/// A span measured both in bytes and as a row/column extent.
///
/// The two measurements always describe the same text.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Length {
    pub bytes: TextSize,
    pub extent: Point,
}

impl Length {
    pub const ZERO: Self = Self { bytes: TextSize::new(0), extent: Point::ZERO };

    #[inline]
    pub const fn new(bytes: TextSize, extent: Point) -> Self {
        Self { bytes, extent }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.bytes == TextSize::new(0)
    }
}

impl Add for Length {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self { bytes: self.bytes + rhs.bytes, extent: self.extent + rhs.extent }
    }
}

impl AddAssign for Length {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Length {
    type Output = Self;

    /// Clamps at zero instead of underflowing.
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self {
            bytes: self.bytes.checked_sub(rhs.bytes).unwrap_or_default(),
            extent: self.extent - rhs.extent,
        }
    }
}

impl std::iter::Sum for Length {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}
