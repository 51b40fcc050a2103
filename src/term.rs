//! Terms of the lambda-Pi calculus modulo rewriting.

use crate::cell::{Meta, PatVar};
use crate::symbol::Symbol;
use core::fmt::{self, Display};
use std::rc::Rc;

/// Bound-variable identity.
///
/// A variable is created once, by the binder that owns it, and is equal
/// only to clones of itself. The contained string is a display hint and
/// plays no role in comparison.
#[derive(Clone, Debug)]
pub struct Var(Rc<String>);

impl Var {
    /// Create a variable distinct from all previously created ones.
    pub fn new(hint: impl Into<String>) -> Self {
        Self(Rc::new(hint.into()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Var {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Var {}

impl Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Pointer to a shared term.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RTerm(Rc<Term>);

impl RTerm {
    pub fn new(tm: Term) -> Self {
        Self(Rc::new(tm))
    }

    /// Compare the memory addresses of two term pointers.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl core::ops::Deref for RTerm {
    type Target = Term;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Term> for RTerm {
    fn from(tm: Term) -> Self {
        Self::new(tm)
    }
}

impl Display for RTerm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        (**self).fmt(f)
    }
}

/// Term for the lambda-Pi calculus modulo rewriting.
///
/// The boolean on `Appl` marks applications whose head is known to be
/// rigid (a static symbol or another rigid application); reduction
/// never has to look inside such nodes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Term {
    Kind,
    Type,
    Var(Var),
    Symb(Symbol),
    Prod(RTerm, Bind),
    Abst(RTerm, Bind),
    Appl(bool, RTerm, RTerm),
    Meta(Meta, Vec<Term>),
    PatV(PatVar),
}

/// Body of a product or abstraction, closed under one bound variable.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Bind {
    var: Var,
    body: RTerm,
}

impl Bind {
    /// Close `body` under `var`.
    ///
    /// The variable must stem from `Var::new`; reusing a variable that is
    /// already bound elsewhere voids the capture-avoidance guarantee.
    pub fn new(var: Var, body: Term) -> Self {
        let body = RTerm::new(body);
        Self { var, body }
    }

    /// Display hint of the bound variable.
    pub fn name(&self) -> &str {
        self.var.name()
    }

    /// The bound variable. Traversals that keep track of binders themselves
    /// (serialization, occurs checks) may pair this with `body`;
    /// everything else should `open` instead.
    pub fn var(&self) -> &Var {
        &self.var
    }

    /// The raw body, containing free occurrences of `self.var()`.
    pub fn body(&self) -> &RTerm {
        &self.body
    }

    /// Instantiate the binder with a term.
    pub fn subst(&self, arg: &Term) -> Term {
        let var = self.var.clone();
        self.body
            .replace(&move |v| if *v == var { Some(arg.clone()) } else { None })
    }

    /// Re-open the binder as a fresh variable and its body.
    pub fn open(&self) -> (Var, Term) {
        let var = Var::new(self.var.name());
        (var.clone(), self.subst(&Term::Var(var)))
    }

    /// Open the binder with a supplied variable.
    ///
    /// Opening two binders with one variable is how α-equivalence and
    /// dependent codomains are handled.
    pub fn open_with(&self, var: &Var) -> Term {
        self.subst(&Term::Var(var.clone()))
    }
}

/// A payload closed under several bound variables.
///
/// Rewrite rules close their sides over the rule's pattern variables,
/// and metavariable solutions close over the variables of the
/// environment the metavariable was created in.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MBind<T> {
    vars: Vec<Var>,
    body: T,
}

/// Structures that support simultaneous variable replacement.
pub trait Replace {
    fn replace(&self, f: &dyn Fn(&Var) -> Option<Term>) -> Self;
}

impl<T: Replace> MBind<T> {
    pub fn new(vars: Vec<Var>, body: T) -> Self {
        Self { vars, body }
    }

    /// Number of bound variables.
    pub fn arity(&self) -> usize {
        self.vars.len()
    }

    pub fn vars(&self) -> &[Var] {
        &self.vars
    }

    /// The raw body; see `Bind::body`.
    pub fn body(&self) -> &T {
        &self.body
    }

    /// Instantiate the binder with one term per bound variable.
    pub fn subst(&self, args: &[Term]) -> T {
        assert_eq!(args.len(), self.vars.len());
        let vars = self.vars.clone();
        self.body.replace(&move |v| {
            let i = vars.iter().position(|w| w == v)?;
            Some(args[i].clone())
        })
    }
}

impl Replace for Term {
    fn replace(&self, f: &dyn Fn(&Var) -> Option<Term>) -> Self {
        match self {
            Self::Var(v) => f(v).unwrap_or_else(|| self.clone()),
            Self::Kind | Self::Type | Self::Symb(_) | Self::PatV(_) => self.clone(),
            Self::Prod(ty, b) => Self::Prod(ty.replace(f).into(), b.replace(f)),
            Self::Abst(ty, b) => Self::Abst(ty.replace(f).into(), b.replace(f)),
            Self::Appl(rigid, hd, arg) => {
                Self::Appl(*rigid, hd.replace(f).into(), arg.replace(f).into())
            }
            Self::Meta(m, env) => {
                let env = env.iter().map(|t| t.replace(f)).collect();
                Self::Meta(m.clone(), env)
            }
        }
    }
}

impl Replace for Vec<Term> {
    fn replace(&self, f: &dyn Fn(&Var) -> Option<Term>) -> Self {
        self.iter().map(|t| t.replace(f)).collect()
    }
}

impl RTerm {
    fn replace(&self, f: &dyn Fn(&Var) -> Option<Term>) -> Term {
        (**self).replace(f)
    }
}

impl Bind {
    // Bound variables are globally distinct, so descending below a binder
    // needs no shifting and cannot capture.
    fn replace(&self, f: &dyn Fn(&Var) -> Option<Term>) -> Self {
        let var = self.var.clone();
        let body = self.body.replace(f).into();
        Self { var, body }
    }
}

impl Term {
    /// Collapse assigned metavariables and pattern variables at the head.
    ///
    /// This is the only approved way to observe the head of a term;
    /// every structural match starts here. Unassigned cells and all
    /// other shapes are returned unchanged.
    pub fn unfold(&self) -> Term {
        let mut tm = self.clone();
        loop {
            tm = match &tm {
                Self::Meta(m, env) => match m.value() {
                    Some(sol) => sol.subst(env),
                    None => return tm,
                },
                Self::PatV(p) => match p.value() {
                    Some(t) => t,
                    None => return tm,
                },
                _ => return tm,
            }
        }
    }

    /// True if applying an argument to this term yields a rigid application.
    fn is_rigid(&self) -> bool {
        match self {
            Self::Symb(s) => s.is_static(),
            Self::Appl(rigid, _, _) => *rigid,
            _ => false,
        }
    }

    /// Apply one argument to the term.
    pub fn appl(self, arg: Term) -> Self {
        let rigid = self.is_rigid();
        Self::Appl(rigid, RTerm::new(self), RTerm::new(arg))
    }

    /// Apply some terms to the term, leftmost first.
    pub fn apply(self, args: impl IntoIterator<Item = Term>) -> Self {
        args.into_iter().fold(self, Self::appl)
    }

    /// Decompose iterated applications into a head and its arguments.
    pub fn get_appl(&self) -> (Term, Vec<Term>) {
        let mut args = Vec::new();
        let mut head = self.clone();
        while let Self::Appl(_, hd, arg) = head {
            args.push((*arg).clone());
            head = (*hd).clone();
        }
        args.reverse();
        (head, args)
    }

    /// Construct a product from its parts.
    pub fn prod(dom: Term, var: Var, body: Term) -> Self {
        Self::Prod(dom.into(), Bind::new(var, body))
    }

    /// Construct an abstraction from its parts.
    pub fn abst(dom: Term, var: Var, body: Term) -> Self {
        Self::Abst(dom.into(), Bind::new(var, body))
    }
}

pub(crate) fn application<H, T>(head: &H, tail: &[T], f: &mut fmt::Formatter) -> fmt::Result
where
    H: Display,
    T: Display,
{
    let parens = !tail.is_empty();
    if parens {
        write!(f, "(")?;
    };
    write!(f, "{}", head)?;
    for t in tail {
        write!(f, " {}", t)?;
    }
    if parens {
        write!(f, ")")?;
    };
    Ok(())
}

impl Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Kind => write!(f, "Kind"),
            Self::Type => write!(f, "Type"),
            Self::Var(v) => v.fmt(f),
            Self::Symb(s) => s.fmt(f),
            Self::Prod(ty, b) => write!(f, "(Π {} : {}. {})", b.name(), ty, b.body()),
            Self::Abst(ty, b) => write!(f, "(λ {} : {}. {})", b.name(), ty, b.body()),
            Self::Appl(..) => {
                let (head, args) = self.get_appl();
                application(&head, &args, f)
            }
            Self::Meta(m, env) => {
                write!(f, "?{}[", m)?;
                let mut env = env.iter();
                if let Some(t) = env.next() {
                    write!(f, "{}", t)?;
                }
                env.try_for_each(|t| write!(f, ", {}", t))?;
                write!(f, "]")
            }
            Self::PatV(p) => p.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variables_compare_by_identity() {
        let x1 = Var::new("x");
        let x2 = Var::new("x");
        assert_eq!(x1, x1.clone());
        assert_ne!(x1, x2);
    }

    #[test]
    fn open_is_fresh() {
        let x = Var::new("x");
        let id = Bind::new(x.clone(), Term::Var(x.clone()));
        let (y, body) = id.open();
        assert_ne!(y, x);
        assert_eq!(body, Term::Var(y));
    }

    #[test]
    fn subst_avoids_capture() {
        // (λ x. λ y. x)[y0/x] must keep y0 free under the inner binder
        let x = Var::new("x");
        let y = Var::new("y");
        let y0 = Var::new("y");
        let inner = Bind::new(y, Term::Var(x.clone()));
        let outer = Bind::new(x, Term::Abst(Term::Type.into(), inner));
        match outer.subst(&Term::Var(y0.clone())) {
            Term::Abst(_, b) => assert_eq!(**b.body(), Term::Var(y0)),
            tm => panic!("unexpected shape: {}", tm),
        }
    }
}
