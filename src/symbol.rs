//! Symbols with fast, pointer-based equality.

use core::fmt::{self, Display};
use core::hash::{Hash, Hasher};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Whether a symbol may carry rewrite rules.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Staticity {
    /// Never carries rewrite rules; only β-reducible within its arguments.
    Static,
    /// May carry rewrite rules.
    Definable,
}

/// Owned symbol data, allocated once per declaration.
#[derive(Clone, Debug)]
pub struct Owned {
    pub path: Vec<String>,
    pub name: String,
    pub stat: Staticity,
}

/// Reference to a declared symbol.
///
/// Two symbols are equal iff they point to the same owned data, so that
/// equality and hashing never have to look at the name. The interning
/// table (`Symbols`) guarantees that one (path, name) pair resolves to
/// one `Owned` allocation, including across signature reloads.
#[derive(Clone, Debug)]
pub struct Symbol(Rc<Owned>);

impl Symbol {
    pub fn new(data: Owned) -> Self {
        Self(Rc::new(data))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn path(&self) -> &[String] {
        &self.0.path
    }

    pub fn staticity(&self) -> Staticity {
        self.0.stat
    }

    pub fn is_static(&self) -> bool {
        self.0.stat == Staticity::Static
    }

    pub fn is_definable(&self) -> bool {
        self.0.stat == Staticity::Definable
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::ptr::hash(&*self.0, state)
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.path.iter().try_for_each(|p| write!(f, "{}.", p))?;
        self.0.name.fmt(f)
    }
}
