//! Position arithmetic and edit descriptors shared by the tree core.

mod edit;
mod length;
mod symbol;

pub use edit::InputEdit;
pub use length::{Length, Point};
pub use symbol::Symbol;
pub use text_size::TextSize;
