/// Grammar symbol identifier.
///
/// The value is opaque to the tree; names and metadata come from the
/// language descriptor.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Symbol(pub u16);

impl Symbol {
    /// End of input.
    pub const END: Self = Self(0);
    /// Reserved for error leaves.
    pub const ERROR: Self = Self(u16::MAX);

    pub const fn is_error(self) -> bool {
        self.0 == Self::ERROR.0
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u16> for Symbol {
    fn from(id: u16) -> Self {
        Self(id)
    }
}
