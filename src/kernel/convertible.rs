//! Equality and conversion.

use super::{unify, whnf_stk};
use crate::term::Var;
use crate::{GCtx, Spine, Term};

/// A pair of terms whose equality was deferred.
pub type Constraint = (Term, Term);

/// Structural equality modulo α and assigned cells.
///
/// Binders are compared by opening both with one fresh variable. An
/// unassigned metavariable on either side is instantiated to the other
/// side (monotonically; there is no backtracking). A pattern variable
/// on the left unifies by storing its counterpart, but only in rewrite
/// mode; a pattern variable on the right must not occur.
pub fn eq(tm1: &Term, tm2: &Term, rewrite: bool) -> bool {
    let tm1 = tm1.unfold();
    let tm2 = tm2.unfold();
    match (&tm1, &tm2) {
        (Term::Kind, Term::Kind) | (Term::Type, Term::Type) => true,
        (Term::Var(v1), Term::Var(v2)) => v1 == v2,
        (Term::Symb(s1), Term::Symb(s2)) => s1 == s2,
        (Term::Prod(ty1, b1), Term::Prod(ty2, b2))
        | (Term::Abst(ty1, b1), Term::Abst(ty2, b2)) => {
            eq(ty1, ty2, rewrite) && {
                let x = Var::new(b1.name());
                eq(&b1.open_with(&x), &b2.open_with(&x), rewrite)
            }
        }
        // rigid flags play no role in equality
        (Term::Appl(_, hd1, arg1), Term::Appl(_, hd2, arg2)) => {
            eq(hd1, hd2, rewrite) && eq(arg1, arg2, rewrite)
        }
        // a pattern variable unifies before any metavariable on the
        // other side gets instantiated: pattern variables never cross
        // into metavariable assignments
        (Term::PatV(p), _) if rewrite => {
            p.assign(tm2.clone());
            true
        }
        (Term::Meta(m1, env1), Term::Meta(m2, env2)) if m1 == m2 => {
            env1.len() == env2.len()
                && env1.iter().zip(env2).all(|(e1, e2)| eq(e1, e2, rewrite))
        }
        (Term::Meta(m, env), _) => unify::instantiate(m, env, &tm2).is_ok(),
        (_, Term::Meta(m, env)) => unify::instantiate(m, env, &tm1).is_ok(),
        (_, Term::PatV(_)) => {
            debug_assert!(false, "pattern variable on the right of an equality");
            false
        }
        _ => false,
    }
}

/// Conversion: equality modulo β-reduction and rewriting.
///
/// Works on a worklist of pairs. Each step reduces both sides to weak
/// head form, synchronises their spines right-to-left, and either
/// closes the pair, spawns sub-problems, or (with `deferred` present)
/// records the pair as a constraint instead of failing.
pub fn eq_modulo(
    tm1: &Term,
    tm2: &Term,
    gc: &GCtx,
    deferred: &mut Option<Vec<Constraint>>,
) -> bool {
    let mut cns = Vec::from([(tm1.clone(), tm2.clone())]);
    while let Some((cn1, cn2)) = cns.pop() {
        trace!("convertible: {} ~? {}", cn1, cn2);
        if cn1 == cn2 || eq(&cn1, &cn2, false) {
            continue;
        }
        if !step(cn1, cn2, &mut cns, gc, deferred) {
            return false;
        }
    }
    true
}

/// Return true if the two terms are convertible.
pub fn convertible(tm1: &Term, tm2: &Term, gc: &GCtx) -> bool {
    eq_modulo(tm1, tm2, gc, &mut None)
}

fn step(
    cn1: Term,
    cn2: Term,
    cns: &mut Vec<Constraint>,
    gc: &GCtx,
    deferred: &mut Option<Vec<Constraint>>,
) -> bool {
    let (hd1, mut stk1) = whnf_stk(cn1, Spine::new(), gc);
    let (hd2, mut stk2) = whnf_stk(cn2, Spine::new(), gc);

    // Synchronise the spines right-to-left: the rightmost arguments
    // pair up, and the excess prefix of the longer spine moves back
    // onto its head.
    let paired = stk1.len().min(stk2.len());
    let hd1 = hd1.apply(stk1.split_front(stk1.len() - paired));
    let hd2 = hd2.apply(stk2.split_front(stk2.len() - paired));
    let pairs: Vec<_> = stk1.iter().cloned().zip(stk2.iter().cloned()).collect();

    if eq(&hd1, &hd2, false) {
        cns.extend(pairs);
        return true;
    }
    match (hd1.unfold(), hd2.unfold()) {
        (Term::Prod(ty1, b1), Term::Prod(ty2, b2))
        | (Term::Abst(ty1, b1), Term::Abst(ty2, b2)) => {
            cns.push(((*ty1).clone(), (*ty2).clone()));
            let x = Var::new(b1.name());
            cns.push((b1.open_with(&x), b2.open_with(&x)));
            cns.extend(pairs);
            true
        }
        (Term::Appl(_, hd1, arg1), Term::Appl(_, hd2, arg2)) => {
            cns.push(((*hd1).clone(), (*hd2).clone()));
            cns.push(((*arg1).clone(), (*arg2).clone()));
            cns.extend(pairs);
            true
        }
        (hd1, hd2) => match deferred {
            Some(list) => {
                let cn1 = hd1.apply(stk1);
                let cn2 = hd2.apply(stk2);
                debug!("deferring constraint: {} ~ {}", cn1, cn2);
                list.push((cn1, cn2));
                true
            }
            None => false,
        },
    }
}
