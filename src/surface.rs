//! Surface structures, the input to scoping.
//!
//! These are the name-based counterparts of the kernel structures,
//! produced by a parser frontend or built programmatically. Scoping
//! (see the [`scope`](crate::scope) module) resolves their names
//! against a symbol table and a stack of bound variables.

use core::fmt::{self, Display};

/// Surface term.
#[derive(Clone, Debug)]
pub enum Term {
    Type,
    /// possibly qualified reference to a bound variable or a symbol
    Symb(Vec<String>, String),
    Appl(Box<Term>, Vec<Term>),
    /// `Π (x : A). B`; without a name, a plain arrow
    Prod(Option<String>, Box<Term>, Box<Term>),
    /// `λ (x : A). t`
    Abst(String, Box<Term>, Box<Term>),
}

impl Term {
    /// Unqualified name.
    pub fn symb(name: impl Into<String>) -> Self {
        Self::Symb(Vec::new(), name.into())
    }

    /// Wildcard; meaningful only inside a rule's left-hand side.
    pub fn wildcard() -> Self {
        Self::symb("_")
    }

    /// Apply some arguments to the term.
    pub fn appl(self, args: Vec<Term>) -> Self {
        Self::Appl(Box::new(self), args)
    }

    /// Dependent product.
    pub fn prod(x: impl Into<String>, dom: Term, cod: Term) -> Self {
        Self::Prod(Some(x.into()), Box::new(dom), Box::new(cod))
    }

    /// Non-dependent function space.
    pub fn arrow(dom: Term, cod: Term) -> Self {
        Self::Prod(None, Box::new(dom), Box::new(cod))
    }

    /// Abstraction.
    pub fn abst(x: impl Into<String>, dom: Term, body: Term) -> Self {
        Self::Abst(x.into(), Box::new(dom), Box::new(body))
    }
}

/// Surface rewrite rule: a context of optionally typed names, a
/// left-hand side, and a right-hand side.
#[derive(Clone, Debug)]
pub struct Rule {
    pub ctx: Vec<(String, Option<Term>)>,
    pub lhs: Term,
    pub rhs: Term,
}

impl Rule {
    /// Rule with untyped context names, the common case.
    pub fn new(ctx: Vec<&str>, lhs: Term, rhs: Term) -> Self {
        let ctx = ctx.into_iter().map(|x| (x.to_string(), None)).collect();
        Self { ctx, lhs, rhs }
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Type => write!(f, "Type"),
            Self::Symb(path, name) => {
                path.iter().try_for_each(|p| write!(f, "{}.", p))?;
                name.fmt(f)
            }
            Self::Appl(head, args) => crate::term::application(head, args, f),
            Self::Prod(Some(x), dom, cod) => write!(f, "(Π {} : {}. {})", x, dom, cod),
            Self::Prod(None, dom, cod) => write!(f, "({} → {})", dom, cod),
            Self::Abst(x, dom, body) => write!(f, "(λ {} : {}. {})", x, dom, body),
        }
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[")?;
        for (i, (x, ty)) in self.ctx.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", x)?;
            if let Some(ty) = ty {
                write!(f, " : {}", ty)?;
            }
        }
        write!(f, "] {} ⟶ {}", self.lhs, self.rhs)
    }
}
