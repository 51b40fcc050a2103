//! Reduction to weak head normal form (WHNF), including rewriting.

use super::matching;
use crate::{GCtx, Spine, Term};

/// Run the abstract machine from `(tm, stk)` until no transition fires.
///
/// The machine uncovers non-rigid applications onto the argument stack,
/// β-reduces abstractions against the stack, and rewrites definable
/// heads by their first matching rule. Static heads, rigid
/// applications, sorts, variables, and unassigned cells halt it; the
/// stack then holds the spine of the head.
pub fn whnf_stk(tm: Term, stk: Spine, gc: &GCtx) -> (Term, Spine) {
    let mut tm = tm;
    let mut stk = stk;
    loop {
        tm = tm.unfold();
        trace!("whnf: {}", tm);
        match &tm {
            Term::Appl(false, hd, arg) => {
                stk.push((**arg).clone());
                tm = (**hd).clone();
            }
            Term::Abst(_, b) => match stk.pop() {
                Some(arg) => tm = b.subst(&arg),
                None => break,
            },
            Term::Symb(s) if s.is_definable() => {
                let mut cands = matching::match_rules(s, &stk, gc);
                if cands.is_empty() {
                    break;
                }
                if cands.len() > 1 {
                    warn!("overlapping rewrite rules for {}", s);
                }
                let (rhs, rest) = cands.remove(0);
                trace!("rewrite: {} ... ⟶ {}", s, rhs);
                tm = rhs;
                stk = rest;
            }
            _ => break,
        }
    }
    (tm, stk)
}

impl Term {
    /// Return the weak head normal form of the term.
    ///
    /// Because rule matching reduces the arguments a rule may inspect,
    /// this is slightly stronger than classical WHNF.
    pub fn whnf(&self, gc: &GCtx) -> Self {
        let (head, stk) = whnf_stk(self.clone(), Spine::new(), gc);
        head.apply(stk)
    }

    /// Return the strong normal form of the term.
    ///
    /// Weak head normalisation followed by normalisation of the spine,
    /// the binder bodies, and the domains.
    pub fn snf(&self, gc: &GCtx) -> Self {
        let (head, stk) = whnf_stk(self.clone(), Spine::new(), gc);
        let head = match head {
            Term::Prod(ty, b) => {
                let (x, body) = b.open();
                Term::prod(ty.snf(gc), x, body.snf(gc))
            }
            Term::Abst(ty, b) => {
                let (x, body) = b.open();
                Term::abst(ty.snf(gc), x, body.snf(gc))
            }
            // a rigid application: normalise its arguments
            Term::Appl(..) => {
                let (hd, args) = head.get_appl();
                hd.apply(args.iter().map(|arg| arg.snf(gc)))
            }
            Term::Meta(m, env) => {
                let env = env.iter().map(|tm| tm.snf(gc)).collect();
                Term::Meta(m, env)
            }
            head => head,
        };
        head.apply(stk.into_iter().map(|arg| arg.snf(gc)))
    }
}
