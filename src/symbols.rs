//! Maps from names to symbols.

use crate::symbol::{Owned, Staticity, Symbol};
use fnv::FnvHashMap;

/// Interning table resolving names to symbols.
///
/// The table distinguishes the current module, whose symbols are
/// addressed by bare name, from foreign modules, whose symbols are
/// addressed by their full path. Interning guarantees that resolving
/// the same (path, name) twice yields the same symbol.
pub struct Symbols {
    path: Vec<String>,
    local: FnvHashMap<String, Symbol>,
    foreign: FnvHashMap<Vec<String>, FnvHashMap<String, Symbol>>,
}

impl Symbols {
    /// Create a table for the module at the given path.
    pub fn new(path: Vec<String>) -> Self {
        Self {
            path,
            local: Default::default(),
            foreign: Default::default(),
        }
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Resolve a possibly qualified name.
    ///
    /// An empty path refers to the current module.
    pub fn get(&self, path: &[String], name: &str) -> Option<Symbol> {
        if path.is_empty() || path == self.path {
            self.local.get(name).cloned()
        } else {
            self.foreign.get(path)?.get(name).cloned()
        }
    }

    /// Introduce a name in the current module.
    ///
    /// Redeclaration replaces the previous symbol and warns; terms that
    /// captured the old symbol keep referring to it.
    pub fn insert(&mut self, name: String, stat: Staticity) -> Symbol {
        let data = Owned {
            path: self.path.clone(),
            name: name.clone(),
            stat,
        };
        let sym = Symbol::new(data);
        if self.local.insert(name, sym.clone()).is_some() {
            warn!("redeclaration of {}", sym);
        }
        sym
    }

    /// Register a symbol of a loaded foreign signature.
    pub fn insert_foreign(&mut self, sym: Symbol) {
        self.foreign
            .entry(sym.path().to_vec())
            .or_default()
            .insert(sym.name().to_string(), sym);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_stable() {
        let mut syms = Symbols::new(vec!["m".to_string()]);
        let s1 = syms.insert("a".to_string(), Staticity::Static);
        let s2 = syms.get(&[], "a").expect("declared");
        assert_eq!(s1, s2);
        let s3 = syms.get(&["m".to_string()], "a").expect("self-qualified");
        assert_eq!(s1, s3);
    }

    #[test]
    fn redeclaration_replaces() {
        let mut syms = Symbols::new(vec!["m".to_string()]);
        let s1 = syms.insert("a".to_string(), Staticity::Static);
        let s2 = syms.insert("a".to_string(), Staticity::Definable);
        assert_ne!(s1, s2);
        assert_eq!(syms.get(&[], "a"), Some(s2));
    }
}
