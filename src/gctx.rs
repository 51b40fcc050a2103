//! Maps from symbols to their associated types and rewrite rules.

use crate::error::SignatureError as Error;
use crate::rule::Rule;
use crate::signature::Signature;
use crate::symbol::Symbol;
use crate::term::RTerm;
use fnv::FnvHashMap;

/// Global context: the kernel's view of every known symbol.
///
/// This is the merged content of the current module and all loaded
/// signatures. All kernel entry points take a reference to it.
#[derive(Default)]
pub struct GCtx {
    types: FnvHashMap<Symbol, RTerm>,
    rules: FnvHashMap<Symbol, Vec<Rule>>,
}

impl GCtx {
    pub fn new() -> Self {
        Default::default()
    }

    /// Return the type of a symbol.
    pub fn get_type(&self, sym: &Symbol) -> Option<&RTerm> {
        self.types.get(sym)
    }

    /// Return the rewrite rules attached to a symbol, oldest first.
    pub fn get_rules(&self, sym: &Symbol) -> &[Rule] {
        self.rules.get(sym).map(|r| r.as_slice()).unwrap_or(&[])
    }

    /// Introduce a symbol with its type.
    pub fn intro(&mut self, sym: Symbol, typ: RTerm) {
        self.types.insert(sym.clone(), typ);
        if sym.is_definable() {
            self.rules.entry(sym).or_default();
        }
    }

    /// Attach a rewrite rule to a definable symbol.
    pub fn add_rule(&mut self, sym: &Symbol, rule: Rule) -> Result<(), Error> {
        if !sym.is_definable() {
            return Err(Error::NonRewritable);
        }
        self.rules.get_mut(sym).ok_or(Error::NonRewritable)?.push(rule);
        Ok(())
    }

    /// Merge the content of a loaded signature.
    pub fn import(&mut self, sig: &Signature) {
        for entry in sig.entries() {
            self.intro(entry.sym.clone(), entry.typ.clone());
            for rule in &entry.rules {
                self.rules
                    .entry(entry.sym.clone())
                    .or_default()
                    .push(rule.clone());
            }
        }
    }
}
