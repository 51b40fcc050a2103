//! Metavariable instantiation.

use crate::cell::Meta;
use crate::error::UnifyError as Error;
use crate::term::{MBind, Term, Var};

/// Instantiate `?m[env]` to `tm`.
///
/// The environment must consist of pairwise distinct variables (the
/// Miller pattern restriction) and `m` must not occur in `tm`. The
/// solution abstracts the environment variables over `tm`; once
/// assigned, the cell is never reassigned.
pub fn instantiate(m: &Meta, env: &[Term], tm: &Term) -> Result<(), Error> {
    if occurs(m, tm) {
        return Err(Error::Occurs);
    }
    let vars = pattern_env(env).ok_or(Error::NonPattern)?;
    trace!("?{}[..] := {}", m, tm);
    m.assign(MBind::new(vars, tm.clone()));
    Ok(())
}

/// The environment as variables, if it satisfies the pattern restriction.
fn pattern_env(env: &[Term]) -> Option<Vec<Var>> {
    let mut vars = Vec::with_capacity(env.len());
    for tm in env {
        match tm.unfold() {
            Term::Var(v) if !vars.contains(&v) => vars.push(v),
            _ => return None,
        }
    }
    Some(vars)
}

/// Does the metavariable occur in the term?
///
/// Solutions are occurs-checked before assignment, so following
/// assigned cells cannot cycle.
pub fn occurs(m: &Meta, tm: &Term) -> bool {
    match tm.unfold() {
        Term::Meta(m2, env) => *m == m2 || env.iter().any(|e| occurs(m, e)),
        Term::Prod(ty, b) | Term::Abst(ty, b) => occurs(m, &ty) || occurs(m, b.body()),
        Term::Appl(_, hd, arg) => occurs(m, &hd) || occurs(m, &arg),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occurs_check_fails() {
        let m = Meta::new(0);
        let tm = Term::Meta(m.clone(), Vec::new()).appl(Term::Type);
        assert_eq!(instantiate(&m, &[], &tm), Err(Error::Occurs));
        assert!(!m.is_assigned());
    }

    #[test]
    fn non_pattern_environment_fails() {
        let m = Meta::new(2);
        let x = Var::new("x");
        let dup = [Term::Var(x.clone()), Term::Var(x)];
        assert_eq!(instantiate(&m, &dup, &Term::Type), Err(Error::NonPattern));
    }

    #[test]
    fn solution_abstracts_environment() {
        let m = Meta::new(1);
        let x = Var::new("x");
        instantiate(&m, &[Term::Var(x.clone())], &Term::Var(x)).expect("pattern");
        // ?m[Type] unfolds to Type
        let applied = Term::Meta(m, Vec::from([Term::Type]));
        assert_eq!(applied.unfold(), Term::Type);
    }
}
