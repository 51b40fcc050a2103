//! Matching of rewrite rules against an argument stack.

use super::convertible::eq;
use crate::cell::PatVar;
use crate::rule::Rule;
use crate::{GCtx, Spine, Symbol, Term};

/// Match the rules of `sym` against the argument stack.
///
/// Returns every successful candidate in rule insertion order, each
/// paired with the stack remaining after the matched arguments are
/// consumed. Callers take the first candidate; more than one indicates
/// overlapping rules.
///
/// Before any rule is tried, the arguments that the largest fitting
/// rule can inspect are reduced to WHNF, so that rules whose left-hand
/// side requires a deeper shape can fire.
pub fn match_rules(sym: &Symbol, stk: &Spine, gc: &GCtx) -> Vec<(Term, Spine)> {
    let rules = gc.get_rules(sym);
    let fitting = rules.iter().filter(|r| r.arity <= stk.len());
    let widest = match fitting.map(|r| r.arity).max() {
        Some(m) => m,
        None => return Vec::new(),
    };

    let mut stk = stk.clone();
    for i in 0..widest {
        if let Some(arg) = stk.get_mut(i) {
            *arg = arg.whnf(gc);
        }
    }

    let mut cands = Vec::new();
    for rule in rules.iter().filter(|r| r.arity <= stk.len()) {
        if let Some(rhs) = match_rule(rule, &stk) {
            let mut rest = stk.clone();
            rest.pop_many(rule.arity);
            cands.push((rhs, rest));
        }
    }
    cands
}

/// Try to match one rule, returning its instantiated right-hand side.
fn match_rule(rule: &Rule, stk: &Spine) -> Option<Term> {
    let pvars: Vec<PatVar> = (0..rule.lhs.arity()).map(|_| PatVar::new()).collect();
    let slots: Vec<Term> = pvars.iter().map(|p| Term::PatV(p.clone())).collect();
    let pats = rule.lhs.subst(&slots);
    for (pat, arg) in pats.iter().zip(stk.iter()) {
        if !eq(pat, arg, true) {
            return None;
        }
    }
    // pattern variables without a left-hand occurrence stay unresolved
    // and dereference to themselves in the result
    let vals: Vec<Term> = pvars.iter().map(|p| p.resolved()).collect();
    Some(rule.rhs.subst(&vals))
}
