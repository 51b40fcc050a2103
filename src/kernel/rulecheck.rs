//! Well-typedness checking for rewrite rules.

use super::convertible::{self, eq, Constraint};
use super::typing::{Ctx, Typer};
use crate::error::RuleError as Error;
use crate::rule::{Rule, Scoped};
use crate::term::{Replace, Var};
use crate::{GCtx, Term};

/// Check a scoped rule and close it for attachment.
///
/// Both sides are typed in constraint mode. The rule is accepted when
/// every constraint of the right-hand side is entailed by those of the
/// left, and the types of the two sides agree under the substitution
/// solved from the left-hand constraints.
pub fn check_rule(rule: &Scoped, gc: &GCtx) -> Result<Rule, Error> {
    debug!("check rule: {}", rule);
    let mut ctx = Ctx::from(rule.ctx.clone());
    let lhs = rule.lhs();

    let mut typer = Typer::constraining(gc);
    let ty_lhs = typer.infer(&mut ctx, &lhs)?;
    let cns_lhs = typer.take_constraints();

    let mut typer = Typer::constraining(gc);
    let ty_rhs = typer.infer(&mut ctx, &rule.rhs)?;
    let cns_rhs = typer.take_constraints();

    let subst = solve(&cns_lhs);

    for (cn1, cn2) in &cns_rhs {
        if !entailed(cn1, cn2, &cns_lhs, &subst, gc) {
            return Err(Error::UnentailedConstraint);
        }
    }

    let ty_lhs = apply(&subst, &ty_lhs);
    let ty_rhs = apply(&subst, &ty_rhs);
    debug!("rule sides must agree: {} ~ {}", ty_lhs, ty_rhs);
    if !convertible::convertible(&ty_lhs, &ty_rhs, gc) {
        return Err(Error::Mismatch);
    }
    Ok(rule.close())
}

/// Solve the left-hand constraints into a variable substitution.
///
/// Pairs whose sides share a static head decompose into their
/// arguments; a bare variable on either side is assigned the other
/// side. Equal definable heads are non-injective, so such pairs are
/// dropped with a warning.
fn solve(cns: &[Constraint]) -> Vec<(Var, Term)> {
    let mut subst = Vec::new();
    let mut work: Vec<Constraint> = cns.to_vec();
    while let Some((cn1, cn2)) = work.pop() {
        let (hd1, args1) = cn1.unfold().get_appl();
        let (hd2, args2) = cn2.unfold().get_appl();
        match (hd1.unfold(), hd2.unfold()) {
            (Term::Var(x), _) if args1.is_empty() => subst.push((x, cn2)),
            (_, Term::Var(x)) if args2.is_empty() => subst.push((x, cn1)),
            (Term::Symb(s1), Term::Symb(s2)) if s1 == s2 => {
                if s1.is_static() && args1.len() == args2.len() {
                    work.extend(args1.into_iter().zip(args2));
                } else if s1.is_definable() {
                    warn!("dropping constraint with non-injective head {}", s1);
                }
            }
            _ => (),
        }
    }
    subst
}

fn apply(subst: &[(Var, Term)], tm: &Term) -> Term {
    tm.replace(&|v| {
        let entry = subst.iter().find(|(x, _)| x == v);
        entry.map(|(_, tm)| tm.clone())
    })
}

/// Is the constraint `cn1 ~ cn2` entailed by the left-hand constraints?
///
/// It is when it matches one of them up to `eq` in either orientation,
/// or when conversion closes it after applying the solved substitution.
fn entailed(
    cn1: &Term,
    cn2: &Term,
    cns_lhs: &[Constraint],
    subst: &[(Var, Term)],
    gc: &GCtx,
) -> bool {
    let matches_lhs = cns_lhs.iter().any(|(l1, l2)| {
        (eq(cn1, l1, false) && eq(cn2, l2, false))
            || (eq(cn1, l2, false) && eq(cn2, l1, false))
    });
    matches_lhs || convertible::convertible(&apply(subst, cn1), &apply(subst, cn2), gc)
}
