use std::fmt::{self, Write as _};

use crate::{Language, TreeId, TreePool};

/// S-expression view of the visible structure of a tree.
///
/// Hidden nodes are spliced into their parent; the root is always shown.
pub struct Sexp<'a> {
    pool: &'a TreePool,
    tree: TreeId,
    language: &'a Language,
}

impl TreePool {
    pub fn display_sexp<'a>(&'a self, tree: TreeId, language: &'a Language) -> Sexp<'a> {
        Sexp { pool: self, tree, language }
    }

    pub fn sexp(&self, tree: TreeId, language: &Language) -> String {
        self.display_sexp(tree, language).to_string()
    }
}

impl Sexp<'_> {
    fn write(&self, f: &mut fmt::Formatter<'_>, id: TreeId, is_root: bool) -> fmt::Result {
        let tree = &self.pool[id];
        let visible = is_root || tree.visible;

        if visible {
            if !is_root {
                f.write_char(' ')?;
            }
            match (tree.lookahead_char, self.language.symbol_name(tree.symbol)) {
                (Some(c), _) if tree.is_error() && tree.is_leaf() => write!(f, "(UNEXPECTED {c:?}")?,
                (_, Some(name)) => write!(f, "({name}")?,
                (_, None) => write!(f, "(#{}", tree.symbol.0)?,
            }
        }

        for &child in tree.children() {
            self.write(f, child, false)?;
        }

        if visible {
            f.write_char(')')?;
        }
        Ok(())
    }
}

impl fmt::Display for Sexp<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f, self.tree, true)
    }
}
