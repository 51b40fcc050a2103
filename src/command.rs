//! Commands and their execution.

use crate::error::{Error, TypingError};
use crate::kernel::{self, check_rule, Ctx, Typer};
use crate::rule::Rule;
use crate::scope;
use crate::signature::Signature;
use crate::surface;
use crate::symbol::{Staticity, Symbol};
use crate::symbols::Symbols;
use crate::term::{MBind, Term};
use crate::GCtx;
use core::fmt::{self, Display};

/// Command that acts on the state of a checking session.
#[derive(Clone, Debug)]
pub enum Command {
    /// introduce a new name
    Intro(String, Intro),
    /// add rewrite rules
    Rules(Vec<surface::Rule>),
    /// ask the kernel a question
    Query(Query),
}

/// The way we introduce a new name.
#[derive(Clone, Debug)]
pub enum Intro {
    /// static symbol
    Declaration(surface::Term),
    /// definable symbol, optionally with a defining body
    Definition(Option<surface::Term>, Option<surface::Term>),
    /// opaque definition: the body is checked, then discarded
    Theorem(surface::Term, surface::Term),
}

/// Question to the kernel.
#[derive(Clone, Debug)]
pub enum Query {
    Infer(surface::Term),
    Eval(surface::Term),
    Check(surface::Term, surface::Term),
    Convertible(surface::Term, surface::Term),
}

/// Answer of a successfully executed command.
#[derive(Clone, Debug)]
pub enum Outcome {
    Introduced(Symbol),
    RulesAdded(usize),
    Inferred(Term),
    Evaluated(Term),
    Checked,
    Convertible(bool),
}

/// State of a checking session for one module.
///
/// The session keeps the interning table, the signature of the module
/// being checked, and the kernel's merged view of every known symbol.
pub struct Session {
    pub syms: Symbols,
    pub sig: Signature,
    pub gc: GCtx,
}

impl Session {
    pub fn new(path: Vec<String>) -> Self {
        Self {
            syms: Symbols::new(path.clone()),
            sig: Signature::new(path),
            gc: GCtx::new(),
        }
    }

    /// Make the symbols of a loaded signature available.
    pub fn import(&mut self, sig: &Signature) {
        for entry in sig.entries() {
            self.syms.insert_foreign(entry.sym.clone());
        }
        self.gc.import(sig);
    }

    /// Execute one command.
    ///
    /// Commands either return an outcome or abort with an error; an
    /// error leaves the signature untouched.
    pub fn handle(&mut self, cmd: Command) -> Result<Outcome, Error> {
        match cmd {
            Command::Intro(name, it) => match it {
                Intro::Declaration(ty) => self.new_symbol(Staticity::Static, &name, ty),
                Intro::Definition(Some(ty), None) => {
                    self.new_symbol(Staticity::Definable, &name, ty)
                }
                Intro::Definition(oty, Some(tm)) => self.define(&name, oty, tm),
                Intro::Definition(None, None) => {
                    Err(TypingError::TypeAndTermEmpty.into())
                }
                Intro::Theorem(ty, tm) => self.theorem(&name, ty, tm),
            },
            Command::Rules(rules) => self.add_rules(rules).map(Outcome::RulesAdded),
            Command::Query(q) => self.query(q),
        }
    }

    fn scope(&self, tm: &surface::Term) -> Result<Term, Error> {
        Ok(scope::scope_term(tm, &self.syms)?)
    }

    fn intro(&mut self, name: &str, stat: Staticity, typ: Term) -> Symbol {
        let sym = self.syms.insert(name.to_string(), stat);
        self.sig.intro(sym.clone(), typ.clone().into());
        self.gc.intro(sym.clone(), typ.into());
        sym
    }

    /// Declare a new symbol with the given type.
    pub fn new_symbol(
        &mut self,
        stat: Staticity,
        name: &str,
        ty: surface::Term,
    ) -> Result<Outcome, Error> {
        let ty = self.scope(&ty)?;
        let mut typer = Typer::new(&self.gc);
        let sort = typer.sort_of(&mut Ctx::new(), &ty)?;
        debug!("introducing {} : {} in {}", name, ty, sort);
        Ok(Outcome::Introduced(self.intro(name, stat, ty)))
    }

    /// Define a definable symbol with a body.
    ///
    /// This is sugar for declaring the symbol and attaching a rewrite
    /// rule of arity zero. Without a declared type, the type is
    /// inferred from the body.
    pub fn define(
        &mut self,
        name: &str,
        oty: Option<surface::Term>,
        body: surface::Term,
    ) -> Result<Outcome, Error> {
        let body = self.scope(&body)?;
        let typ = {
            let mut typer = Typer::new(&self.gc);
            match oty {
                Some(ty) => {
                    let ty = self.scope(&ty)?;
                    typer.sort_of(&mut Ctx::new(), &ty)?;
                    typer.check(&mut Ctx::new(), &body, &ty)?;
                    ty
                }
                None => typer.infer(&mut Ctx::new(), &body)?,
            }
        };
        if let Term::Kind = typ.unfold() {
            return Err(TypingError::UnexpectedKind.into());
        }
        let sym = self.intro(name, Staticity::Definable, typ);
        let rule = Rule {
            arity: 0,
            lhs: MBind::new(Vec::new(), Vec::new()),
            rhs: MBind::new(Vec::new(), body),
        };
        self.sig.add_rule(&sym, rule.clone())?;
        self.gc.add_rule(&sym, rule)?;
        Ok(Outcome::Introduced(sym))
    }

    /// Opaque definition: the body is checked against the statement,
    /// then discarded; the symbol stays static.
    pub fn theorem(
        &mut self,
        name: &str,
        ty: surface::Term,
        body: surface::Term,
    ) -> Result<Outcome, Error> {
        let ty = self.scope(&ty)?;
        let body = self.scope(&body)?;
        let mut typer = Typer::new(&self.gc);
        typer.sort_of(&mut Ctx::new(), &ty)?;
        typer.check(&mut Ctx::new(), &body, &ty)?;
        Ok(Outcome::Introduced(self.intro(name, Staticity::Static, ty)))
    }

    /// Check rewrite rules and attach them to their head symbols.
    ///
    /// No rule is attached before every given rule has passed the
    /// checker.
    pub fn add_rules(&mut self, rules: Vec<surface::Rule>) -> Result<usize, Error> {
        let mut checked = Vec::new();
        for rule in &rules {
            let scoped = scope::scope_rule(rule, &self.syms)?;
            let rule = check_rule(&scoped, &self.gc)?;
            checked.push((scoped.symbol, rule));
        }
        let len = checked.len();
        for (sym, rule) in checked {
            debug!("adding rule to {}: {}", sym, rule);
            if sym.path() == self.syms.path() {
                self.sig.add_rule(&sym, rule.clone())?;
            }
            self.gc.add_rule(&sym, rule)?;
        }
        Ok(len)
    }

    fn query(&self, q: Query) -> Result<Outcome, Error> {
        match q {
            Query::Infer(tm) => self.infer(tm).map(Outcome::Inferred),
            Query::Eval(tm) => self.evaluate(tm).map(Outcome::Evaluated),
            Query::Check(tm, ty) => self.check(tm, ty).map(|()| Outcome::Checked),
            Query::Convertible(tm1, tm2) => {
                self.check_convertible(tm1, tm2).map(Outcome::Convertible)
            }
        }
    }

    /// Infer the type of a term.
    pub fn infer(&self, tm: surface::Term) -> Result<Term, Error> {
        let tm = self.scope(&tm)?;
        let mut typer = Typer::new(&self.gc);
        Ok(typer.infer(&mut Ctx::new(), &tm)?)
    }

    /// Evaluate a term to strong normal form.
    pub fn evaluate(&self, tm: surface::Term) -> Result<Term, Error> {
        let tm = self.scope(&tm)?;
        Ok(tm.snf(&self.gc))
    }

    /// Check a term against a type.
    pub fn check(&self, tm: surface::Term, ty: surface::Term) -> Result<(), Error> {
        let tm = self.scope(&tm)?;
        let ty = self.scope(&ty)?;
        let mut typer = Typer::new(&self.gc);
        Ok(typer.check(&mut Ctx::new(), &tm, &ty)?)
    }

    /// Are the two terms convertible?
    pub fn check_convertible(
        &self,
        tm1: surface::Term,
        tm2: surface::Term,
    ) -> Result<bool, Error> {
        let tm1 = self.scope(&tm1)?;
        let tm2 = self.scope(&tm2)?;
        Ok(kernel::convertible(&tm1, &tm2, &self.gc))
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Introduced(sym) => write!(f, "{} introduced", sym),
            Self::RulesAdded(n) => write!(f, "{} rules added", n),
            Self::Inferred(ty) => ty.fmt(f),
            Self::Evaluated(tm) => tm.fmt(f),
            Self::Checked => write!(f, "checked"),
            Self::Convertible(yes) => yes.fmt(f),
        }
    }
}
