//! Type inference and checking.

use super::convertible::{self, Constraint};
use super::unify;
use crate::cell::Meta;
use crate::error::TypingError as Error;
use crate::term::{Bind, Var};
use crate::{GCtx, Term};
use core::fmt;

/// Typing context mapping bound variables to their types.
#[derive(Clone, Default)]
pub struct Ctx(Vec<(Var, Term)>);

impl Ctx {
    pub fn new() -> Self {
        Default::default()
    }

    fn get(&self, x: &Var) -> Option<Term> {
        let entry = self.0.iter().rev().find(|(v, _)| v == x);
        entry.map(|(_, ty)| ty.clone())
    }

    /// The variables in scope, outermost first.
    ///
    /// This is the ambient environment for fresh metavariables.
    pub fn vars(&self) -> Vec<Term> {
        self.0.iter().map(|(v, _)| Term::Var(v.clone())).collect()
    }

    fn bind<A, F>(&mut self, var: Var, ty: Term, f: F) -> Result<A, Error>
    where
        F: FnOnce(&mut Ctx) -> Result<A, Error>,
    {
        self.0.push((var, ty));
        let y = f(self)?;
        self.0.pop();
        Ok(y)
    }
}

impl From<Vec<(Var, Term)>> for Ctx {
    fn from(v: Vec<(Var, Term)>) -> Self {
        Self(v)
    }
}

impl fmt::Display for Ctx {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[")?;
        for (i, (v, ty)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} : {}", v, ty)?;
        }
        write!(f, "]")
    }
}

/// Typing environment: the global context and, in constraint mode, the
/// conversion constraints deferred so far.
///
/// Constraint mode is a field rather than process-wide state, so
/// several typers may be nested or live side by side.
pub struct Typer<'g> {
    gc: &'g GCtx,
    constraints: Option<Vec<Constraint>>,
}

impl<'g> Typer<'g> {
    /// Strict mode: irreducible disequalities are errors.
    pub fn new(gc: &'g GCtx) -> Self {
        let constraints = None;
        Self { gc, constraints }
    }

    /// Constraint mode: irreducible disequalities are collected.
    ///
    /// This is only used while typing the sides of a rewrite rule.
    pub fn constraining(gc: &'g GCtx) -> Self {
        let constraints = Some(Vec::new());
        Self { gc, constraints }
    }

    /// The constraints deferred since entering constraint mode.
    pub fn take_constraints(&mut self) -> Vec<Constraint> {
        self.constraints.take().unwrap_or_default()
    }

    fn convertible(&mut self, tm1: &Term, tm2: &Term) -> bool {
        convertible::eq_modulo(tm1, tm2, self.gc, &mut self.constraints)
    }

    /// Infer the type of a term; the result is in weak head normal form.
    pub fn infer(&mut self, ctx: &mut Ctx, tm: &Term) -> Result<Term, Error> {
        debug!("infer type of {} when {}", tm, ctx);
        let ty = self.infer_head(ctx, tm)?;
        Ok(ty.whnf(self.gc))
    }

    fn infer_head(&mut self, ctx: &mut Ctx, tm: &Term) -> Result<Term, Error> {
        match tm.unfold() {
            Term::Kind => Err(Error::KindNotTypable),
            Term::Type => Ok(Term::Kind),
            Term::Var(x) => ctx.get(&x).ok_or(Error::UnboundVariable),
            Term::Symb(s) => {
                let ty = self.gc.get_type(&s).ok_or(Error::TypeNotFound)?;
                Ok((**ty).clone())
            }
            Term::Prod(ty, b) => {
                let (x, cod) = b.open();
                let sort = ctx.bind(x, (*ty).clone(), |ctx| self.infer(ctx, &cod))?;
                match sort {
                    Term::Type | Term::Kind => Ok(sort),
                    _ => Err(Error::SortExpected),
                }
            }
            Term::Abst(ty, b) => {
                let (x, body) = b.open();
                let cod = ctx.bind(x.clone(), (*ty).clone(), |ctx| self.infer(ctx, &body))?;
                Ok(Term::Prod(ty, Bind::new(x, cod)))
            }
            Term::Appl(_, hd, arg) => {
                let hd_ty = self.infer(ctx, &hd)?;
                let (dom, cod) = self.force_prod(ctx, hd_ty)?;
                self.check(ctx, &arg, &dom)?;
                Ok(cod.subst(&arg))
            }
            Term::Meta(..) | Term::PatV(_) => Err(Error::CannotInfer),
        }
    }

    /// Check a term against a type.
    pub fn check(&mut self, ctx: &mut Ctx, tm: &Term, ty_exp: &Term) -> Result<(), Error> {
        debug!("check {} : {} when {}", tm, ty_exp, ctx);
        let ty_exp = ty_exp.whnf(self.gc);
        match tm.unfold() {
            Term::Kind => Err(Error::KindNotTypable),
            Term::Type => match ty_exp.unfold() {
                Term::Kind => Ok(()),
                _ => Err(Error::Unconvertible),
            },
            Term::Prod(ty, b) => match ty_exp.unfold() {
                sort @ (Term::Type | Term::Kind) => {
                    self.check_sorted(ctx, &ty)?;
                    let (x, cod) = b.open();
                    ctx.bind(x, (*ty).clone(), |ctx| self.check(ctx, &cod, &sort))
                }
                _ => Err(Error::SortExpected),
            },
            Term::Abst(ty, b) => match ty_exp.unfold() {
                Term::Prod(dom, cod) => {
                    if !self.convertible(&ty, &dom) {
                        return Err(Error::Unconvertible);
                    }
                    self.check_sorted(ctx, &ty)?;
                    let (x, body) = b.open();
                    let cod = cod.open_with(&x);
                    ctx.bind(x, (*ty).clone(), |ctx| self.check(ctx, &body, &cod))
                }
                _ => Err(Error::ProductExpected),
            },
            Term::Var(_) | Term::Symb(_) | Term::Appl(..) => {
                let ty_inf = self.infer(ctx, &tm)?;
                debug!("checking convertibility: {} ~ {}", ty_inf, ty_exp);
                if self.convertible(&ty_inf, &ty_exp) {
                    Ok(())
                } else {
                    Err(Error::Unconvertible)
                }
            }
            Term::Meta(..) | Term::PatV(_) => Err(Error::CannotInfer),
        }
    }

    /// Require a binder domain to be a type: its type must be a sort.
    fn check_sorted(&mut self, ctx: &mut Ctx, ty: &Term) -> Result<(), Error> {
        match self.infer(ctx, ty)? {
            Term::Type | Term::Kind => Ok(()),
            _ => Err(Error::SortExpected),
        }
    }

    /// Decide whether a declared type inhabits `Type` or `Kind`.
    ///
    /// Both are tried; a type inhabiting neither is a declaration error.
    pub fn sort_of(&mut self, ctx: &mut Ctx, ty: &Term) -> Result<Term, Error> {
        if self.check(ctx, ty, &Term::Type).is_ok() {
            return Ok(Term::Type);
        }
        if self.check(ctx, ty, &Term::Kind).is_ok() {
            return Ok(Term::Kind);
        }
        Err(Error::SortExpected)
    }

    /// View a type as a product, forcing a metavariable type if needed.
    ///
    /// A metavariable is instantiated to `Π (x : ?A). ?B` with both
    /// fresh metavariables over the ambient environment.
    fn force_prod(&mut self, ctx: &Ctx, ty: Term) -> Result<(Term, Bind), Error> {
        match ty.unfold() {
            Term::Prod(dom, b) => Ok(((*dom).clone(), b)),
            Term::Meta(m, env) => {
                let vars = ctx.vars();
                let dom = Term::Meta(Meta::new(vars.len()), vars.clone());
                let x = Var::new("x");
                let mut cod_env = vars;
                cod_env.push(Term::Var(x.clone()));
                let cod = Term::Meta(Meta::new(cod_env.len()), cod_env);
                let b = Bind::new(x, cod);
                let prod = Term::Prod(dom.clone().into(), b.clone());
                unify::instantiate(&m, &env, &prod).map_err(Error::from)?;
                Ok((dom, b))
            }
            _ => Err(Error::ProductExpected),
        }
    }
}
