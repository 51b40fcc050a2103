//! Scoping of surface structures, distinguishing variables from symbols.

use crate::cell::Meta;
use crate::error::ScopeError as Error;
use crate::rule;
use crate::surface;
use crate::symbols::Symbols;
use crate::term::{Bind, Term, Var};

/// Names bound by enclosing binders, innermost last.
type Bound = Vec<(String, Var)>;

/// Scope a closed surface term.
pub fn scope_term(tm: &surface::Term, syms: &Symbols) -> Result<Term, Error> {
    scopen(tm, syms, &mut Vec::new(), &mut None)
}

/// Scope an open surface term against the given bound names.
///
/// When `wild` is present, each `_` creates a fresh variable and
/// records it there; otherwise `_` is an error.
fn scopen(
    tm: &surface::Term,
    syms: &Symbols,
    bnd: &mut Bound,
    wild: &mut Option<&mut Vec<Var>>,
) -> Result<Term, Error> {
    match tm {
        surface::Term::Type => Ok(Term::Type),
        surface::Term::Symb(path, name) => {
            if path.is_empty() {
                if name == "_" {
                    return match wild {
                        Some(vars) => {
                            let v = Var::new("_");
                            vars.push(v.clone());
                            Ok(Term::Var(v))
                        }
                        None => Err(Error::Underscore),
                    };
                }
                if let Some((_, v)) = bnd.iter().rev().find(|(n, _)| n == name) {
                    return Ok(Term::Var(v.clone()));
                }
            }
            let sym = syms.get(path, name);
            let sym = sym.ok_or_else(|| Error::UndeclaredSymbol(name.clone()))?;
            Ok(Term::Symb(sym))
        }
        surface::Term::Appl(head, args) => {
            let head = scopen(head, syms, bnd, wild)?;
            let args: Vec<Term> = args
                .iter()
                .map(|arg| scopen(arg, syms, bnd, wild))
                .collect::<Result<_, _>>()?;
            Ok(head.apply(args))
        }
        surface::Term::Prod(x, dom, cod) => {
            let dom = scopen(dom, syms, bnd, wild)?;
            let name = x.clone().unwrap_or_else(|| "$".to_string());
            let var = Var::new(name.clone());
            bnd.push((name, var.clone()));
            let cod = scopen(cod, syms, bnd, wild);
            bnd.pop();
            Ok(Term::Prod(dom.into(), Bind::new(var, cod?)))
        }
        surface::Term::Abst(x, dom, body) => {
            let dom = scopen(dom, syms, bnd, wild)?;
            let var = Var::new(x.clone());
            bnd.push((x.clone(), var.clone()));
            let body = scopen(body, syms, bnd, wild);
            bnd.pop();
            Ok(Term::Abst(dom.into(), Bind::new(var, body?)))
        }
    }
}

/// Scope a surface rewrite rule.
///
/// The left-hand side must be a definable symbol applied to argument
/// patterns; the wildcards it contains become additional binder
/// variables of the rule. Context variables without a type annotation
/// receive a fresh metavariable type over the variables scoped before
/// them.
pub fn scope_rule(rule: &surface::Rule, syms: &Symbols) -> Result<rule::Scoped, Error> {
    let mut bnd = Vec::new();
    let mut ctx: Vec<(Var, Option<Term>)> = Vec::new();
    for (name, oty) in &rule.ctx {
        let ty = oty.as_ref();
        let ty = ty.map(|ty| scopen(ty, syms, &mut bnd, &mut None)).transpose()?;
        let var = Var::new(name.clone());
        bnd.push((name.clone(), var.clone()));
        ctx.push((var, ty));
    }

    let mut wilds = Vec::new();
    let lhs = scopen(&rule.lhs, syms, &mut bnd, &mut Some(&mut wilds))?;
    let rhs = scopen(&rule.rhs, syms, &mut bnd, &mut None)?;

    let (head, args) = lhs.get_appl();
    let symbol = match head {
        Term::Symb(s) if s.is_definable() => s,
        _ => return Err(Error::NoTopPattern),
    };

    let ctx = ctx.into_iter().chain(wilds.into_iter().map(|v| (v, None)));
    let mut full: Vec<(Var, Term)> = Vec::new();
    for (var, oty) in ctx {
        let ty = oty.unwrap_or_else(|| {
            let env: Vec<Term> = full.iter().map(|(v, _)| Term::Var(v.clone())).collect();
            Term::Meta(Meta::new(env.len()), env)
        });
        full.push((var, ty));
    }

    Ok(rule::Scoped {
        ctx: full,
        symbol,
        args,
        rhs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::Staticity;

    fn symbols() -> Symbols {
        let mut syms = Symbols::new(vec!["m".to_string()]);
        syms.insert("a".to_string(), Staticity::Static);
        syms.insert("f".to_string(), Staticity::Definable);
        syms
    }

    #[test]
    fn bound_names_shadow_symbols() {
        let syms = symbols();
        let tm = surface::Term::abst("a", surface::Term::Type, surface::Term::symb("a"));
        match scope_term(&tm, &syms).expect("scopes") {
            Term::Abst(_, b) => assert_eq!(b.open_with(b.var()), Term::Var(b.var().clone())),
            tm => panic!("unexpected shape: {}", tm),
        }
    }

    #[test]
    fn underscore_needs_a_pattern() {
        let syms = symbols();
        let tm = surface::Term::wildcard();
        assert_eq!(scope_term(&tm, &syms), Err(Error::Underscore));
    }

    #[test]
    fn rule_head_must_be_definable() {
        let syms = symbols();
        let rule = surface::Rule::new(
            vec!["x"],
            surface::Term::symb("a").appl(vec![surface::Term::symb("x")]),
            surface::Term::symb("x"),
        );
        match scope_rule(&rule, &syms) {
            Err(Error::NoTopPattern) => (),
            r => panic!("unexpected result: {:?}", r.map(|s| s.to_string())),
        }
    }

    #[test]
    fn wildcards_extend_the_context() {
        let syms = symbols();
        let rule = surface::Rule::new(
            vec!["x"],
            surface::Term::symb("f")
                .appl(vec![surface::Term::wildcard(), surface::Term::symb("x")]),
            surface::Term::symb("x"),
        );
        let scoped = scope_rule(&rule, &syms).expect("scopes");
        assert_eq!(scoped.ctx.len(), 2);
        assert_eq!(scoped.args.len(), 2);
    }
}
