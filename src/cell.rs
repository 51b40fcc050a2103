//! Mutable cells inside terms: metavariables and pattern variables.
//!
//! These cells are the only mutation in the term model. Assignment is
//! monotone: a cell goes from unassigned to assigned exactly once and
//! is never reassigned.

use crate::term::{MBind, Term};
use core::cell::RefCell;
use core::fmt::{self, Display};
use core::hash::{Hash, Hasher};
use core::sync::atomic::{AtomicUsize, Ordering};
use std::rc::Rc;

static KEYS: AtomicUsize = AtomicUsize::new(0);

fn fresh_key() -> usize {
    KEYS.fetch_add(1, Ordering::Relaxed)
}

/// Unification metavariable.
///
/// A placeholder for an unknown closed term, parameterised by the
/// variables in scope at its creation. Once assigned, the solution is a
/// binder of the same arity as the environment the metavariable is
/// applied to.
#[derive(Clone, Debug)]
pub struct Meta(Rc<MetaCell>);

#[derive(Debug)]
struct MetaCell {
    key: usize,
    arity: usize,
    value: RefCell<Option<MBind<Term>>>,
}

impl Meta {
    /// Create a fresh, unassigned metavariable of the given arity.
    pub fn new(arity: usize) -> Self {
        let key = fresh_key();
        let value = RefCell::new(None);
        Self(Rc::new(MetaCell { key, arity, value }))
    }

    pub fn arity(&self) -> usize {
        self.0.arity
    }

    pub fn is_assigned(&self) -> bool {
        self.0.value.borrow().is_some()
    }

    /// The solution, if the metavariable has been assigned.
    pub fn value(&self) -> Option<MBind<Term>> {
        self.0.value.borrow().clone()
    }

    /// Assign the solution.
    ///
    /// Panics when the metavariable is already assigned or the solution
    /// binds a different number of variables than the arity.
    pub fn assign(&self, sol: MBind<Term>) {
        assert_eq!(sol.arity(), self.0.arity);
        let mut value = self.0.value.borrow_mut();
        assert!(value.is_none(), "metavariable ?{} assigned twice", self.0.key);
        *value = Some(sol);
    }
}

impl PartialEq for Meta {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Meta {}

impl Hash for Meta {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.key.hash(state)
    }
}

impl Display for Meta {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.key.fmt(f)
    }
}

/// Pattern variable.
///
/// A placeholder inside an instantiated rule left-hand side, bound by
/// matching. Pattern variables live for one match attempt and must not
/// appear in signatures.
#[derive(Clone, Debug)]
pub struct PatVar(Rc<PatCell>);

#[derive(Debug)]
struct PatCell {
    key: usize,
    value: RefCell<Option<Term>>,
}

impl PatVar {
    /// Create a fresh, unresolved pattern variable.
    pub fn new() -> Self {
        let key = fresh_key();
        let value = RefCell::new(None);
        Self(Rc::new(PatCell { key, value }))
    }

    pub fn value(&self) -> Option<Term> {
        self.0.value.borrow().clone()
    }

    /// Store the term this pattern variable was matched against.
    ///
    /// Panics when the pattern variable is already resolved.
    pub fn assign(&self, tm: Term) {
        let mut value = self.0.value.borrow_mut();
        assert!(value.is_none(), "pattern variable μ{} resolved twice", self.0.key);
        *value = Some(tm);
    }

    /// Dereference: the matched term, or the variable itself if unresolved.
    pub fn resolved(&self) -> Term {
        self.value().unwrap_or_else(|| Term::PatV(self.clone()))
    }
}

impl Default for PatVar {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for PatVar {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for PatVar {}

impl Display for PatVar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "μ{}", self.0.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_is_monotone() {
        let m = Meta::new(0);
        assert!(m.value().is_none());
        m.assign(MBind::new(Vec::new(), Term::Type));
        assert!(m.is_assigned());
        let sol = m.value().expect("assigned");
        assert_eq!(*sol.body(), Term::Type);
    }

    #[test]
    #[should_panic(expected = "assigned twice")]
    fn reassignment_panics() {
        let m = Meta::new(0);
        m.assign(MBind::new(Vec::new(), Term::Type));
        m.assign(MBind::new(Vec::new(), Term::Kind));
    }

    #[test]
    fn unresolved_dereferences_to_itself() {
        let p = PatVar::new();
        assert_eq!(p.resolved(), Term::PatV(p.clone()));
    }
}
