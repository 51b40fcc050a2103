//! Per-module symbol table with persistence.

use crate::error::{LoadError, SignatureError as Error};
use crate::lterm::{LRule, LTerm};
use crate::rule::Rule;
use crate::symbol::{Staticity, Symbol};
use crate::symbols::Symbols;
use crate::term::{RTerm, Term};
use core::fmt::{self, Display};
use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};

/// One signature entry: a symbol, its type, and its rewrite rules.
#[derive(Clone, Debug)]
pub struct Entry {
    pub sym: Symbol,
    pub typ: RTerm,
    pub rules: Vec<Rule>,
}

/// Ordered symbol table of one module.
///
/// Entries live in a vector with stable indices; the map only resolves
/// names to indices. Redeclaring a name replaces its entry and warns.
pub struct Signature {
    path: Vec<String>,
    entries: Vec<Entry>,
    names: FnvHashMap<String, usize>,
}

impl Signature {
    /// Create an empty signature for the module at the given path.
    pub fn new(path: Vec<String>) -> Self {
        Self {
            path,
            entries: Vec::new(),
            names: Default::default(),
        }
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    /// Introduce a symbol with its type.
    pub fn intro(&mut self, sym: Symbol, typ: RTerm) {
        let entry = Entry {
            sym,
            typ,
            rules: Vec::new(),
        };
        let name = entry.sym.name().to_string();
        match self.names.get(&name) {
            Some(i) => {
                warn!("redeclaration of {}", entry.sym);
                self.entries[*i] = entry;
            }
            None => {
                self.names.insert(name, self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    /// Find the entry of a name.
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(*self.names.get(name)?)
    }

    /// Attach a rewrite rule to a definable symbol of this module.
    pub fn add_rule(&mut self, sym: &Symbol, rule: Rule) -> Result<(), Error> {
        if !sym.is_definable() {
            return Err(Error::NonRewritable);
        }
        let i = self.names.get(sym.name());
        let entry = i.and_then(|i| self.entries.get_mut(*i));
        let entry = entry.ok_or_else(|| Error::NotFound(sym.name().to_string()))?;
        entry.rules.push(rule);
        Ok(())
    }
}

/// Storage form of a signature.
#[derive(Serialize, Deserialize)]
struct LSig {
    path: Vec<String>,
    entries: Vec<LEntry>,
}

#[derive(Serialize, Deserialize)]
struct LEntry {
    name: String,
    stat: Staticity,
    typ: LTerm,
    rules: Vec<LRule>,
}

impl Signature {
    /// Serialize the signature to a writer.
    pub fn write(&self, w: impl std::io::Write) -> Result<(), LoadError> {
        let entries = self.entries.iter().map(|e| {
            Ok(LEntry {
                name: e.sym.name().to_string(),
                stat: e.sym.staticity(),
                typ: LTerm::encode(&e.typ, &mut Vec::new())?,
                rules: e.rules.iter().map(LRule::encode).collect::<Result<_, _>>()?,
            })
        });
        let entries = entries.collect::<Result<_, Error>>()?;
        let lsig = LSig {
            path: self.path.clone(),
            entries,
        };
        Ok(serde_json::to_writer(w, &lsig)?)
    }

    /// Deserialize a signature from a reader.
    ///
    /// The signature's own symbols are interned as foreign symbols of
    /// its module, so that terms referring to them resolve to the same
    /// symbol everywhere. Symbols of other modules must already be
    /// known to `syms` (their signatures loaded first).
    pub fn read(r: impl std::io::Read, syms: &mut Symbols) -> Result<Self, LoadError> {
        let lsig: LSig = serde_json::from_reader(r)?;
        let mut sig = Signature::new(lsig.path.clone());
        // first introduce all symbols, then decode the terms, so that
        // types and rules may refer to any symbol of this module
        let symbols: Vec<Symbol> = lsig
            .entries
            .iter()
            .map(|e| {
                let data = crate::symbol::Owned {
                    path: lsig.path.clone(),
                    name: e.name.clone(),
                    stat: e.stat,
                };
                let sym = Symbol::new(data);
                syms.insert_foreign(sym.clone());
                sym
            })
            .collect();
        for (le, sym) in lsig.entries.iter().zip(symbols) {
            let typ = le.typ.decode(syms, &mut Vec::new())?;
            let rules = le.rules.iter().map(|r| r.decode(syms));
            let rules = rules.collect::<Result<_, _>>()?;
            sig.intro(sym.clone(), typ.into());
            if let Some(i) = sig.names.get(sym.name()) {
                sig.entries[*i].rules = rules;
            }
        }
        Ok(sig)
    }
}

// Symbols of the signature's own module are printed by bare name,
// foreign ones with their full path.
fn pp(tm: &Term, path: &[String], f: &mut fmt::Formatter) -> fmt::Result {
    match tm {
        Term::Symb(s) if s.path() == path => write!(f, "{}", s.name()),
        Term::Prod(ty, b) => {
            write!(f, "(Π {} : ", b.name())?;
            pp(ty, path, f)?;
            write!(f, ". ")?;
            pp(b.body(), path, f)?;
            write!(f, ")")
        }
        Term::Abst(ty, b) => {
            write!(f, "(λ {} : ", b.name())?;
            pp(ty, path, f)?;
            write!(f, ". ")?;
            pp(b.body(), path, f)?;
            write!(f, ")")
        }
        Term::Appl(..) => {
            let (head, args) = tm.get_appl();
            write!(f, "(")?;
            pp(&head, path, f)?;
            for arg in args {
                write!(f, " ")?;
                pp(&arg, path, f)?;
            }
            write!(f, ")")
        }
        _ => tm.fmt(f),
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for entry in &self.entries {
            if entry.sym.is_definable() {
                write!(f, "def ")?;
            }
            write!(f, "{} : ", entry.sym.name())?;
            pp(&entry.typ, &self.path, f)?;
            writeln!(f, ".")?;
            for rule in &entry.rules {
                writeln!(f, "{}", rule)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Var;

    fn sig_with_nat() -> (Symbols, Signature) {
        let path = vec!["nat".to_string()];
        let mut syms = Symbols::new(path.clone());
        let mut sig = Signature::new(path);
        let nat = syms.insert("Nat".to_string(), Staticity::Static);
        sig.intro(nat.clone(), Term::Type.into());
        let x = Var::new("x");
        let arrow = Term::prod(Term::Symb(nat.clone()), x, Term::Symb(nat));
        let succ = syms.insert("s".to_string(), Staticity::Static);
        sig.intro(succ, arrow.into());
        (syms, sig)
    }

    #[test]
    fn round_trip_preserves_identity() {
        let (_, sig) = sig_with_nat();
        let mut buf = Vec::new();
        sig.write(&mut buf).expect("serializable");

        let mut syms2 = Symbols::new(vec!["main".to_string()]);
        let sig2 = Signature::read(buf.as_slice(), &mut syms2).expect("readable");
        assert_eq!(sig2.path(), sig.path());

        let nat = syms2.get(&["nat".to_string()], "Nat").expect("interned");
        let s = sig2.get("s").expect("present");
        // the domain of `s` must be the interned `Nat` symbol itself
        match &*s.typ {
            Term::Prod(dom, _) => assert_eq!(**dom, Term::Symb(nat)),
            tm => panic!("unexpected shape: {}", tm),
        }
    }

    #[test]
    fn redeclaration_warns_and_replaces() {
        let (mut syms, mut sig) = sig_with_nat();
        let again = syms.insert("Nat".to_string(), Staticity::Definable);
        sig.intro(again.clone(), Term::Type.into());
        assert_eq!(sig.entries().count(), 2);
        assert_eq!(sig.get("Nat").expect("present").sym, again);
    }
}
