//! Universal invariants of the kernel.

use reverki::kernel::{convertible, unify, whnf_stk};
use reverki::kernel::convertible::eq;
use reverki::surface;
use reverki::{Bind, Error, Meta, Session, Spine, Staticity, Term, Var};

fn log_init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn plus_session() -> Result<Session, Error> {
    let mut s = Session::new(vec!["nat".to_string()]);
    s.new_symbol(Staticity::Static, "Nat", surface::Term::Type)?;
    s.new_symbol(Staticity::Static, "z", surface::Term::symb("Nat"))?;
    let nat2nat = surface::Term::arrow(surface::Term::symb("Nat"), surface::Term::symb("Nat"));
    s.new_symbol(Staticity::Static, "s", nat2nat)?;
    let nat = surface::Term::symb("Nat");
    let ty = surface::Term::arrow(nat.clone(), surface::Term::arrow(nat.clone(), nat));
    s.new_symbol(Staticity::Definable, "plus", ty)?;
    s.add_rules(vec![
        surface::Rule::new(
            vec!["y"],
            surface::Term::symb("plus")
                .appl(vec![surface::Term::symb("z"), surface::Term::symb("y")]),
            surface::Term::symb("y"),
        ),
        surface::Rule::new(
            vec!["x", "y"],
            surface::Term::symb("plus").appl(vec![
                surface::Term::symb("s").appl(vec![surface::Term::symb("x")]),
                surface::Term::symb("y"),
            ]),
            surface::Term::symb("s").appl(vec![surface::Term::symb("plus")
                .appl(vec![surface::Term::symb("x"), surface::Term::symb("y")])]),
        ),
    ])?;
    Ok(s)
}

/// Kernel term for a symbol of the session.
fn sym(s: &Session, name: &str) -> Term {
    Term::Symb(s.syms.get(&[], name).expect("declared"))
}

fn num(s: &Session, n: usize) -> Term {
    let mut tm = sym(s, "z");
    for _ in 0..n {
        tm = sym(s, "s").appl(tm);
    }
    tm
}

#[test]
fn alpha_equivalence() {
    log_init();
    let x = Var::new("x");
    let y = Var::new("y");
    let tx = Term::abst(Term::Type, x.clone(), Term::Var(x));
    let ty = Term::abst(Term::Type, y.clone(), Term::Var(y));
    assert!(eq(&tx, &ty, false));

    // λ x. λ y. x  is not  λ x. λ y. y
    let (x, y) = (Var::new("x"), Var::new("y"));
    let kx = Term::abst(
        Term::Type,
        x.clone(),
        Term::abst(Term::Type, y, Term::Var(x)),
    );
    let (x, y) = (Var::new("x"), Var::new("y"));
    let ky = Term::abst(
        Term::Type,
        x,
        Term::abst(Term::Type, y.clone(), Term::Var(y)),
    );
    assert!(!eq(&kx, &ky, false));
}

#[test]
fn whnf_is_idempotent() -> Result<(), Error> {
    log_init();
    let s = plus_session()?;
    for tm in [
        num(&s, 2),
        sym(&s, "plus").apply([num(&s, 2), num(&s, 1)]),
        sym(&s, "plus").apply([num(&s, 0), num(&s, 0)]),
        Term::abst(sym(&s, "Nat"), Var::new("n"), num(&s, 0))
            .appl(num(&s, 1)),
    ] {
        let once = tm.whnf(&s.gc);
        assert!(eq(&once.whnf(&s.gc), &once, false), "not stable: {}", once);
    }
    Ok(())
}

#[test]
fn substitution_commutes_with_reduction() -> Result<(), Error> {
    log_init();
    let s = plus_session()?;
    let x = Var::new("x");
    // t = plus x (s z),  u = plus z (s z)
    let t = sym(&s, "plus").apply([Term::Var(x.clone()), num(&s, 1)]);
    let u = sym(&s, "plus").apply([num(&s, 0), num(&s, 1)]);
    let b = Bind::new(x.clone(), t.clone());

    let lhs = b.subst(&u).whnf(&s.gc);
    let rhs = Bind::new(x, t.whnf(&s.gc)).subst(&u.whnf(&s.gc));
    assert!(convertible(&lhs, &rhs, &s.gc));
    Ok(())
}

#[test]
fn check_implies_infer() -> Result<(), Error> {
    log_init();
    let s = plus_session()?;
    let two = surface::Term::symb("plus").appl(vec![
        surface::Term::symb("s").appl(vec![surface::Term::symb("z")]),
        surface::Term::symb("s").appl(vec![surface::Term::symb("z")]),
    ]);
    s.check(two.clone(), surface::Term::symb("Nat"))?;
    let inferred = s.infer(two)?;
    assert!(convertible(&sym(&s, "Nat"), &inferred, &s.gc));
    Ok(())
}

#[test]
fn rules_preserve_typing() -> Result<(), Error> {
    log_init();
    let s = plus_session()?;
    let tm = sym(&s, "plus").apply([num(&s, 2), num(&s, 1)]);
    let before = {
        let mut typer = reverki::kernel::Typer::new(&s.gc);
        typer.infer(&mut reverki::kernel::Ctx::new(), &tm)?
    };
    let reduced = tm.whnf(&s.gc);
    let after = {
        let mut typer = reverki::kernel::Typer::new(&s.gc);
        typer.infer(&mut reverki::kernel::Ctx::new(), &reduced)?
    };
    assert!(convertible(&before, &after, &s.gc));
    Ok(())
}

#[test]
fn metavariable_assignment_is_monotone() {
    log_init();
    let m = Meta::new(0);
    let tm = Term::Meta(m.clone(), Vec::new());
    // unassigned: unfold is the identity
    assert_eq!(tm.unfold(), tm);

    unify::instantiate(&m, &[], &Term::Type).expect("assignable");
    assert_eq!(tm.unfold(), Term::Type);
    // further unfolds keep exposing the assignment
    assert_eq!(tm.unfold().unfold(), Term::Type);
    assert!(m.is_assigned());
}

#[test]
fn whnf_exposes_the_spine() -> Result<(), Error> {
    log_init();
    let s = plus_session()?;
    // plus applied to one argument only: no rule fires
    let tm = sym(&s, "plus").appl(num(&s, 1));
    let (head, stk) = whnf_stk(tm, Spine::new(), &s.gc);
    assert_eq!(head, sym(&s, "plus"));
    let args: Vec<Term> = stk.into_iter().collect();
    assert_eq!(args.len(), 1);
    assert!(eq(&args[0], &num(&s, 1), false));
    Ok(())
}
