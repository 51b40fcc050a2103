//! Long-lived storage terms without sharing.
//!
//! Terms inside signatures survive the session that created them, so
//! they are stored in a sharing-free form with de Bruijn indices for
//! bound variables and (path, name) references for symbols. The
//! round-trip through this form preserves symbol identity: decoding
//! resolves references through the interning table, so the same
//! (path, name) yields the same symbol across loads.

use crate::error::{LoadError, ScopeError, SignatureError};
use crate::symbols::Symbols;
use crate::term::{Bind, MBind, Term, Var};
use serde::{Deserialize, Serialize};

/// Storage form of a term.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum LTerm {
    Kind,
    Type,
    /// de Bruijn index into the enclosing binders
    Var(usize),
    Symb(Vec<String>, String),
    Prod(String, Box<LTerm>, Box<LTerm>),
    Abst(String, Box<LTerm>, Box<LTerm>),
    Appl(bool, Box<LTerm>, Box<LTerm>),
}

/// Storage form of a rewrite rule.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LRule {
    /// display hints of the pattern-variable slots
    pub ctx: Vec<String>,
    pub lhs: Vec<LTerm>,
    pub rhs: LTerm,
}

impl LTerm {
    /// Encode a term, resolving bound variables against `bnd`.
    ///
    /// Metavariables and pattern variables must not appear in stored
    /// terms; assigned cells are collapsed first, unassigned ones are
    /// an error.
    pub fn encode(tm: &Term, bnd: &mut Vec<Var>) -> Result<Self, SignatureError> {
        match tm.unfold() {
            Term::Kind => Ok(Self::Kind),
            Term::Type => Ok(Self::Type),
            Term::Var(v) => {
                let idx = bnd.iter().rev().position(|w| *w == v);
                idx.map(Self::Var).ok_or(SignatureError::FreeVariable)
            }
            Term::Symb(s) => Ok(Self::Symb(s.path().to_vec(), s.name().to_string())),
            Term::Prod(ty, b) => Ok(Self::Prod(
                b.name().to_string(),
                Box::new(Self::encode(&ty, bnd)?),
                Box::new(Self::encode_under(&b, bnd)?),
            )),
            Term::Abst(ty, b) => Ok(Self::Abst(
                b.name().to_string(),
                Box::new(Self::encode(&ty, bnd)?),
                Box::new(Self::encode_under(&b, bnd)?),
            )),
            Term::Appl(rigid, hd, arg) => Ok(Self::Appl(
                rigid,
                Box::new(Self::encode(&hd, bnd)?),
                Box::new(Self::encode(&arg, bnd)?),
            )),
            Term::Meta(..) | Term::PatV(_) => Err(SignatureError::UnresolvedCell),
        }
    }

    fn encode_under(b: &Bind, bnd: &mut Vec<Var>) -> Result<Self, SignatureError> {
        bnd.push(b.var().clone());
        let body = Self::encode(b.body(), bnd);
        bnd.pop();
        body
    }

    /// Decode a term, resolving symbol references against `syms`.
    pub fn decode(&self, syms: &Symbols, bnd: &mut Vec<Var>) -> Result<Term, LoadError> {
        match self {
            Self::Kind => Ok(Term::Kind),
            Self::Type => Ok(Term::Type),
            Self::Var(idx) => {
                let v = bnd.iter().rev().nth(*idx);
                let v = v.ok_or(SignatureError::FreeVariable)?;
                Ok(Term::Var(v.clone()))
            }
            Self::Symb(path, name) => {
                let sym = syms.get(path, name);
                let sym = sym.ok_or_else(|| ScopeError::UndeclaredSymbol(name.clone()))?;
                Ok(Term::Symb(sym))
            }
            Self::Prod(x, ty, body) => {
                let ty = ty.decode(syms, bnd)?;
                let var = Var::new(x.clone());
                bnd.push(var.clone());
                let body = body.decode(syms, bnd);
                bnd.pop();
                Ok(Term::Prod(ty.into(), Bind::new(var, body?)))
            }
            Self::Abst(x, ty, body) => {
                let ty = ty.decode(syms, bnd)?;
                let var = Var::new(x.clone());
                bnd.push(var.clone());
                let body = body.decode(syms, bnd);
                bnd.pop();
                Ok(Term::Abst(ty.into(), Bind::new(var, body?)))
            }
            Self::Appl(rigid, hd, arg) => Ok(Term::Appl(
                *rigid,
                hd.decode(syms, bnd)?.into(),
                arg.decode(syms, bnd)?.into(),
            )),
        }
    }
}

impl LRule {
    pub fn encode(rule: &crate::rule::Rule) -> Result<Self, SignatureError> {
        let ctx = rule.lhs.vars().iter().map(|v| v.name().to_string()).collect();
        let mut bnd = rule.lhs.vars().to_vec();
        let lhs = rule.lhs.body().iter();
        let lhs = lhs.map(|pat| LTerm::encode(pat, &mut bnd));
        let lhs = lhs.collect::<Result<_, _>>()?;
        let mut bnd = rule.rhs.vars().to_vec();
        let rhs = LTerm::encode(rule.rhs.body(), &mut bnd)?;
        Ok(Self { ctx, lhs, rhs })
    }

    pub fn decode(&self, syms: &Symbols) -> Result<crate::rule::Rule, LoadError> {
        let vars: Vec<Var> = self.ctx.iter().map(|x| Var::new(x.clone())).collect();
        let mut bnd = vars.clone();
        let lhs = self.lhs.iter().map(|pat| pat.decode(syms, &mut bnd));
        let lhs = lhs.collect::<Result<Vec<_>, _>>()?;
        let rhs = self.rhs.decode(syms, &mut bnd)?;
        Ok(crate::rule::Rule {
            arity: lhs.len(),
            lhs: MBind::new(vars.clone(), lhs),
            rhs: MBind::new(vars, rhs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::Staticity;

    #[test]
    fn binder_round_trip() {
        // Π a : Type. a → a
        let a = Var::new("a");
        let x = Var::new("x");
        let inner = Term::prod(Term::Var(a.clone()), x, Term::Var(a.clone()));
        let tm = Term::prod(Term::Type, a, inner);

        let syms = Symbols::new(Vec::new());
        let l = LTerm::encode(&tm, &mut Vec::new()).expect("closed term");
        assert_eq!(
            l,
            LTerm::Prod(
                "a".to_string(),
                Box::new(LTerm::Type),
                Box::new(LTerm::Prod(
                    "x".to_string(),
                    Box::new(LTerm::Var(0)),
                    Box::new(LTerm::Var(1)),
                )),
            )
        );
        let back = l.decode(&syms, &mut Vec::new()).expect("decodes");
        let l2 = LTerm::encode(&back, &mut Vec::new()).expect("closed term");
        assert_eq!(l, l2);
    }

    #[test]
    fn symbols_resolve_through_interning() {
        let mut syms = Symbols::new(vec!["m".to_string()]);
        let sym = syms.insert("a".to_string(), Staticity::Static);
        let l = LTerm::encode(&Term::Symb(sym.clone()), &mut Vec::new()).unwrap();
        match l.decode(&syms, &mut Vec::new()).expect("resolves") {
            Term::Symb(s) => assert_eq!(s, sym),
            tm => panic!("unexpected shape: {}", tm),
        }
    }
}
