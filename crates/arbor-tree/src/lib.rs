//! Incremental concrete syntax tree.
//!
//! Nodes are reference counted inside a [`TreePool`] and share structure
//! between successive versions of a document. After a text edit,
//! [`TreePool::edit`] rewrites node lengths in place and flags the nodes the
//! parser has to look at again.

mod debug;
mod edit;
mod language;
mod pool;
mod tree;

pub use arbor_span::{InputEdit, Length, Point, Symbol, TextSize};
pub use debug::Sexp;
pub use edit::EditError;
pub use language::{Language, SymbolMetadata};
pub use pool::{PoolConfig, TreeId, TreePool};
pub use tree::Tree;
