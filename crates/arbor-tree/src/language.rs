use arbor_span::Symbol;

/// Per-symbol properties consulted when building nodes.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct SymbolMetadata {
    pub visible: bool,
    pub named: bool,
}

impl SymbolMetadata {
    pub const HIDDEN: Self = Self { visible: false, named: false };
    pub const ANONYMOUS: Self = Self { visible: true, named: false };
    pub const NAMED: Self = Self { visible: true, named: true };
}

#[derive(Clone, Debug)]
struct SymbolInfo {
    name: Box<str>,
    metadata: SymbolMetadata,
}

/// Symbol table supplied by the grammar.
///
/// Symbols are numbered in the order they are added, starting at
/// `Symbol::END`. Unknown symbols report hidden metadata and no name.
#[derive(Clone, Debug, Default)]
pub struct Language {
    symbols: Vec<SymbolInfo>,
}

impl Language {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a symbol and returns its id.
    pub fn add_symbol(&mut self, name: impl Into<Box<str>>, metadata: SymbolMetadata) -> Symbol {
        let id = u16::try_from(self.symbols.len())
            .ok()
            .filter(|&id| id != Symbol::ERROR.0)
            .unwrap_or_else(|| panic!("language symbol table is full"));
        self.symbols.push(SymbolInfo { name: name.into(), metadata });
        Symbol(id)
    }

    /// Builder form of [`Language::add_symbol`].
    pub fn with_symbol(mut self, name: impl Into<Box<str>>, metadata: SymbolMetadata) -> Self {
        self.add_symbol(name, metadata);
        self
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn symbol_metadata(&self, symbol: Symbol) -> SymbolMetadata {
        if symbol.is_error() {
            return SymbolMetadata::NAMED;
        }
        self.symbols.get(symbol.index()).map_or(SymbolMetadata::HIDDEN, |info| info.metadata)
    }

    pub fn symbol_name(&self, symbol: Symbol) -> Option<&str> {
        if symbol.is_error() {
            return Some("ERROR");
        }
        self.symbols.get(symbol.index()).map(|info| &*info.name)
    }
}
