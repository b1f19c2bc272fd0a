//! Symbol table over a loaded index.
//!
//! Built once per run, read-only afterwards. Every declaration is registered
//! under its full symbol and under its canonical (version-agnostic) form so
//! that protocol root types can be referenced without hardcoding a package
//! version.

use std::cell::RefCell;
use std::collections::HashMap;
use std::collections::VecDeque;

use tracing::debug;

use crate::error::SymbolError;
use crate::index::{Index, Signature, SymbolInformation, Type};
use crate::symbol::{is_local_symbol, parse_symbol};

/// Number of lookups retained in the debugging trail reported on a failed
/// lookup.
const VISITED_TRAIL_LEN: usize = 16;

/// Lookup maps over every declaration in an index.
pub struct SymbolTable {
    infos: HashMap<String, SymbolInformation>,
    canonical: HashMap<String, String>,
    empty: SymbolInformation,
    recently_visited: RefCell<VecDeque<String>>,
}

impl SymbolTable {
    /// Builds the table from a decoded index.
    ///
    /// Registers every symbol declared in any document plus all external
    /// (library) symbols. Local symbols are excluded. Fails fast on the first
    /// symbol string that does not match the symbol grammar.
    pub fn load(index: &Index) -> Result<Self, SymbolError> {
        let mut table = Self {
            infos: HashMap::new(),
            canonical: HashMap::new(),
            empty: SymbolInformation::empty(),
            recently_visited: RefCell::new(VecDeque::new()),
        };
        for document in &index.documents {
            for info in &document.symbols {
                table.register(info)?;
            }
        }
        for info in &index.external_symbols {
            table.register(info)?;
        }
        debug!(symbols = table.infos.len(), "loaded symbol table");
        Ok(table)
    }

    fn register(&mut self, info: &SymbolInformation) -> Result<(), SymbolError> {
        if is_local_symbol(&info.symbol) {
            return Ok(());
        }
        let canonical = parse_symbol(&info.symbol)?.canonical();
        self.canonical.insert(canonical, info.symbol.clone());
        self.infos.insert(info.symbol.clone(), info.clone());
        Ok(())
    }

    /// Whether a symbol is registered.
    #[must_use]
    pub fn has(&self, symbol: &str) -> bool {
        self.infos.contains_key(symbol)
    }

    /// Exact lookup of a symbol's declaration.
    ///
    /// The empty symbol resolves to a sentinel empty declaration, used for
    /// "no properties" dead ends. An unknown symbol is an error carrying the
    /// trail of recently visited symbols to ease debugging of dangling
    /// references.
    pub fn info(&self, symbol: &str) -> Result<&SymbolInformation, SymbolError> {
        if symbol.is_empty() {
            return Ok(&self.empty);
        }
        {
            let mut visited = self.recently_visited.borrow_mut();
            if visited.len() == VISITED_TRAIL_LEN {
                visited.pop_front();
            }
            visited.push_back(symbol.to_string());
        }
        self.infos.get(symbol).ok_or_else(|| SymbolError::UnknownSymbol {
            symbol: symbol.to_string(),
            recently_visited: self.recently_visited.borrow().iter().cloned().collect(),
        })
    }

    /// Resolves a version-agnostic symbol to the concrete indexed symbol.
    ///
    /// Returns the input unchanged when it cannot be resolved; callers must
    /// tolerate a subsequent [`SymbolTable::info`] failure.
    #[must_use]
    pub fn canonical_symbol(&self, simplified: &str) -> String {
        match self.canonical.get(simplified) {
            Some(symbol) => symbol.clone(),
            None => simplified.to_string(),
        }
    }

    /// Member declarations of a type alias whose lower bound is a structural
    /// type, e.g. `type Requests = { 'method/name': [Params, Result] }`.
    pub fn structural_type(&self, symbol: &str) -> Result<Vec<&SymbolInformation>, SymbolError> {
        let info = self.info(symbol)?;
        let Some(Signature::Type(type_signature)) = &info.signature else {
            return Err(SymbolError::NotStructuralAlias {
                symbol: symbol.to_string(),
            });
        };
        let Type::Structural(structural) = &type_signature.lower_bound else {
            return Err(SymbolError::NotStructuralAlias {
                symbol: symbol.to_string(),
            });
        };
        structural
            .declarations
            .symlinks
            .iter()
            .map(|member| self.info(member))
            .collect()
    }
}
