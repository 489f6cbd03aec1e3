use text_size::TextSize;

use crate::{Length, Point};

/// A single contiguous text replacement.
///
/// The byte and point fields describe the same edit; they are not checked
/// against each other.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct InputEdit {
    pub start_byte: TextSize,
    pub bytes_removed: TextSize,
    pub bytes_added: TextSize,
    pub start_point: Point,
    pub extent_removed: Point,
    pub extent_added: Point,
}

impl InputEdit {
    /// Builds an edit replacing `removed` with `added` at `start`.
    pub fn new(start: Length, removed: Length, added: Length) -> Self {
        Self {
            start_byte: start.bytes,
            bytes_removed: removed.bytes,
            bytes_added: added.bytes,
            start_point: start.extent,
            extent_removed: removed.extent,
            extent_added: added.extent,
        }
    }

    pub fn start(&self) -> Length {
        Length::new(self.start_byte, self.start_point)
    }

    pub fn removed(&self) -> Length {
        Length::new(self.bytes_removed, self.extent_removed)
    }

    pub fn added(&self) -> Length {
        Length::new(self.bytes_added, self.extent_added)
    }

    pub fn old_end_byte(&self) -> TextSize {
        self.start_byte + self.bytes_removed
    }

    pub fn new_end_byte(&self) -> TextSize {
        self.start_byte + self.bytes_added
    }

    pub fn old_end_point(&self) -> Point {
        self.start_point + self.extent_removed
    }

    pub fn new_end_point(&self) -> Point {
        self.start_point + self.extent_added
    }

    /// Returns `true` if the edit neither removes nor adds any text.
    pub fn is_noop(&self) -> bool {
        self.bytes_removed == TextSize::new(0) && self.bytes_added == TextSize::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_positions() {
        let start = Length::new(4.into(), Point::new(1, 2));
        let removed = Length::new(3.into(), Point::new(0, 3));
        let added = Length::new(5.into(), Point::new(1, 1));
        let edit = InputEdit::new(start, removed, added);

        assert_eq!((edit.start(), edit.removed(), edit.added()), (start, removed, added));

        assert_eq!(edit.old_end_byte(), TextSize::new(7));
        assert_eq!(edit.new_end_byte(), TextSize::new(9));
        assert_eq!(edit.old_end_point(), Point::new(1, 5));
        assert_eq!(edit.new_end_point(), Point::new(2, 1));
        assert!(!edit.is_noop());
    }

    #[test]
    fn empty_replacement_is_noop() {
        let edit = InputEdit { start_byte: 12.into(), ..InputEdit::default() };
        assert!(edit.is_noop());
    }
}
