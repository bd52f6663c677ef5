use super::symbol::Symbol;
use serde::{Deserialize, Serialize};

/// Whether an occurrence declares its symbol or merely mentions it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolRole {
    Definition,
    Reference,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolOccurrence {
    pub symbol: Symbol,
    pub role: SymbolRole,
}

impl SymbolOccurrence {
    pub fn definition(symbol: Symbol) -> Self {
        Self {
            symbol,
            role: SymbolRole::Definition,
        }
    }

    pub fn reference(symbol: Symbol) -> Self {
        Self {
            symbol,
            role: SymbolRole::Reference,
        }
    }

    /// True for definitions of globally unique symbols, the only occurrences
    /// worth recording in a symbol index.
    pub fn is_global_definition(&self) -> bool {
        self.role == SymbolRole::Definition && self.symbol.is_global()
    }
}
