//! Symbol table for type names.
//!
//! Built in two phases: a [`SymbolTableBuilder`] seeded with the primitives
//! collects every top-level definition, then [`SymbolTableBuilder::finish`]
//! freezes it into a read-only [`SymbolTable`] used for resolution. Lookups
//! can only happen after registration is complete, so forward references
//! resolve regardless of declaration order.

use std::collections::HashMap;

use crate::ast::Primitive;

/// What a type name is bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolKind {
    Primitive(Primitive),
    Product,
    Sum,
    SumString,
}

/// Registration phase.
#[derive(Debug, Clone)]
pub struct SymbolTableBuilder {
    symbols: HashMap<String, SymbolKind>,
}

impl SymbolTableBuilder {
    /// A builder holding only the primitive types.
    pub fn seeded() -> Self {
        let symbols = Primitive::ALL
            .into_iter()
            .map(|p| (p.name().to_string(), SymbolKind::Primitive(p)))
            .collect();
        Self { symbols }
    }

    /// Bind `name` to `kind`. Fails with the existing binding if the name is
    /// taken; the existing binding is kept.
    pub fn register(&mut self, name: &str, kind: SymbolKind) -> Result<(), SymbolKind> {
        match self.symbols.get(name) {
            Some(existing) => Err(*existing),
            None => {
                self.symbols.insert(name.to_string(), kind);
                Ok(())
            }
        }
    }

    pub fn finish(self) -> SymbolTable {
        SymbolTable {
            symbols: self.symbols,
        }
    }
}

impl Default for SymbolTableBuilder {
    fn default() -> Self {
        Self::seeded()
    }
}

/// Resolution phase: a frozen set of bindings.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    symbols: HashMap<String, SymbolKind>,
}

impl SymbolTable {
    pub fn get(&self, name: &str) -> Option<SymbolKind> {
        self.symbols.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
