//! Rewrite rules.

use crate::symbol::Symbol;
use crate::term::{MBind, Term, Var};
use core::fmt::{self, Display};

/// Rewrite rule attached to a definable symbol.
///
/// Both sides are closed binders over the same pattern-variable slots.
/// The left-hand side produces the argument patterns the rule matches
/// (as many as `arity`), the right-hand side the replacement term.
#[derive(Clone, Debug)]
pub struct Rule {
    /// number of explicit arguments the pattern matches
    pub arity: usize,
    /// left-hand side (patterns to match with)
    pub lhs: MBind<Vec<Term>>,
    /// right-hand side (term to replace with)
    pub rhs: MBind<Term>,
}

impl Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[")?;
        let mut names = self.lhs.vars().iter();
        if let Some(v) = names.next() {
            write!(f, "{}", v)?;
        }
        names.try_for_each(|v| write!(f, ", {}", v))?;
        write!(f, "]")?;
        for pat in self.lhs.body() {
            write!(f, " {}", pat)?;
        }
        write!(f, " ⟶ {}", self.rhs.body())
    }
}

/// A scoped rewrite rule awaiting the rule checker.
///
/// The sides are still plain terms over the context variables; the
/// checker types them under constraints and only then closes them into
/// a `Rule`.
#[derive(Clone, Debug)]
pub struct Scoped {
    /// rule context: variables with their (possibly metavariable) types
    pub ctx: Vec<(Var, Term)>,
    /// the definable symbol heading the left-hand side
    pub symbol: Symbol,
    /// argument patterns of the left-hand side
    pub args: Vec<Term>,
    /// right-hand side
    pub rhs: Term,
}

impl Scoped {
    /// The left-hand side as a term: the head applied to its patterns.
    pub fn lhs(&self) -> Term {
        Term::Symb(self.symbol.clone()).apply(self.args.iter().cloned())
    }

    /// Close both sides over the context variables.
    pub fn close(&self) -> Rule {
        let vars: Vec<Var> = self.ctx.iter().map(|(v, _)| v.clone()).collect();
        Rule {
            arity: self.args.len(),
            lhs: MBind::new(vars.clone(), self.args.clone()),
            rhs: MBind::new(vars, self.rhs.clone()),
        }
    }
}

impl Display for Scoped {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ⟶ {}", self.lhs(), self.rhs)
    }
}
