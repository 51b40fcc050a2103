//! The kernel exercised end to end on small developments.

use reverki::error::{RuleError, TypingError};
use reverki::surface::{Rule, Term};
use reverki::{Error, Loader, Session, Signature, Staticity, Symbols};

fn log_init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn nat_session() -> Result<Session, Error> {
    let mut s = Session::new(vec!["nat".to_string()]);
    s.new_symbol(Staticity::Static, "Nat", Term::Type)?;
    s.new_symbol(Staticity::Static, "z", Term::symb("Nat"))?;
    let nat2nat = Term::arrow(Term::symb("Nat"), Term::symb("Nat"));
    s.new_symbol(Staticity::Static, "s", nat2nat)?;
    Ok(s)
}

/// The numeral `s (s (... z))`.
fn num(n: usize) -> Term {
    let mut tm = Term::symb("z");
    for _ in 0..n {
        tm = Term::symb("s").appl(vec![tm]);
    }
    tm
}

fn plus(lhs: Term, rhs: Term) -> Term {
    Term::symb("plus").appl(vec![lhs, rhs])
}

fn plus_session() -> Result<Session, Error> {
    let mut s = nat_session()?;
    let nat = Term::symb("Nat");
    let ty = Term::arrow(nat.clone(), Term::arrow(nat.clone(), nat));
    s.new_symbol(Staticity::Definable, "plus", ty)?;
    s.add_rules(vec![
        Rule::new(
            vec!["y"],
            plus(Term::symb("z"), Term::symb("y")),
            Term::symb("y"),
        ),
        Rule::new(
            vec!["x", "y"],
            plus(
                Term::symb("s").appl(vec![Term::symb("x")]),
                Term::symb("y"),
            ),
            Term::symb("s").appl(vec![plus(Term::symb("x"), Term::symb("y"))]),
        ),
    ])?;
    Ok(s)
}

#[test]
fn infer_successor() -> Result<(), Error> {
    log_init();
    let s = nat_session()?;
    let ty = s.infer(num(2))?;
    assert_eq!(ty.to_string(), "nat.Nat");
    Ok(())
}

#[test]
fn addition_computes() -> Result<(), Error> {
    log_init();
    let s = plus_session()?;
    let sum = s.evaluate(plus(num(2), num(1)))?;
    assert_eq!(sum, s.evaluate(num(3))?);
    assert!(s.check_convertible(plus(num(1), num(0)), num(1))?);
    Ok(())
}

#[test]
fn polymorphic_identity() -> Result<(), Error> {
    log_init();
    let mut s = nat_session()?;
    let a2a = Term::arrow(Term::symb("A"), Term::symb("A"));
    s.new_symbol(
        Staticity::Definable,
        "id",
        Term::prod("A", Term::Type, a2a),
    )?;
    s.add_rules(vec![Rule::new(
        vec!["A", "x"],
        Term::symb("id").appl(vec![Term::symb("A"), Term::symb("x")]),
        Term::symb("x"),
    )])?;

    let id_z = Term::symb("id").appl(vec![Term::symb("Nat"), Term::symb("z")]);
    s.check(id_z.clone(), Term::symb("Nat"))?;

    let nat2nat = Term::arrow(Term::symb("Nat"), Term::symb("Nat"));
    match s.check(id_z, nat2nat) {
        Err(Error::Typing(TypingError::Unconvertible)) => Ok(()),
        r => panic!("expected a checking failure, got {:?}", r),
    }
}

#[test]
fn self_application_rule_rejected() -> Result<(), Error> {
    log_init();
    let mut s = nat_session()?;
    let nat2nat = Term::arrow(Term::symb("Nat"), Term::symb("Nat"));
    s.new_symbol(Staticity::Definable, "f", nat2nat)?;
    let lhs = Term::symb("f").appl(vec![Term::symb("x")]);
    let rhs = Term::symb("x").appl(vec![Term::symb("x")]);
    match s.add_rules(vec![Rule::new(vec!["x"], lhs, rhs)]) {
        Err(Error::Rule(RuleError::Typing(_))) => Ok(()),
        r => panic!("expected the rule checker to reject, got {:?}", r.err()),
    }
}

#[test]
fn dependent_equality() -> Result<(), Error> {
    log_init();
    let mut s = nat_session()?;
    let a = Term::symb("A");
    let eq_ty = Term::prod(
        "A",
        Term::Type,
        Term::arrow(a.clone(), Term::arrow(a.clone(), Term::Type)),
    );
    s.new_symbol(Staticity::Static, "eq", eq_ty)?;
    let refl_ty = Term::prod(
        "A",
        Term::Type,
        Term::prod(
            "x",
            a.clone(),
            Term::symb("eq").appl(vec![a, Term::symb("x"), Term::symb("x")]),
        ),
    );
    s.new_symbol(Staticity::Static, "refl", refl_ty)?;

    let refl_z = Term::symb("refl").appl(vec![Term::symb("Nat"), Term::symb("z")]);
    let eq_z_z = Term::symb("eq").appl(vec![Term::symb("Nat"), num(0), num(0)]);
    s.check(refl_z.clone(), eq_z_z)?;

    let eq_z_sz = Term::symb("eq").appl(vec![Term::symb("Nat"), num(0), num(1)]);
    match s.check(refl_z, eq_z_sz) {
        Err(Error::Typing(TypingError::Unconvertible)) => Ok(()),
        r => panic!("expected a checking failure, got {:?}", r),
    }
}

#[test]
fn convertibility_modulo_rules() -> Result<(), Error> {
    log_init();
    let s = plus_session()?;
    assert!(s.check_convertible(plus(num(1), num(1)), num(2))?);
    assert!(!s.check_convertible(plus(num(0), num(0)), num(1))?);
    Ok(())
}

#[test]
fn definitions_unfold() -> Result<(), Error> {
    log_init();
    let mut s = plus_session()?;
    s.define("three", None, plus(num(1), num(2)))?;
    assert_eq!(s.infer(Term::symb("three"))?.to_string(), "nat.Nat");
    assert!(s.check_convertible(Term::symb("three"), num(3))?);

    // opaque definitions do not unfold
    s.theorem("also_three", Term::symb("Nat"), plus(num(0), num(3)))?;
    assert_eq!(s.evaluate(Term::symb("also_three"))?.to_string(), "nat.also_three");
    Ok(())
}

#[test]
fn signature_round_trip() -> Result<(), Error> {
    log_init();
    let s = plus_session()?;
    let mut buf = Vec::new();
    s.sig.write(&mut buf).map_err(Error::Load)?;

    let mut s2 = Session::new(vec!["main".to_string()]);
    let sig = Signature::read(buf.as_slice(), &mut s2.syms).map_err(Error::Load)?;
    s2.import(&sig);

    let qual = |name: &str| Term::Symb(vec!["nat".to_string()], name.to_string());
    let one = qual("s").appl(vec![qual("z")]);
    let sum = qual("plus").appl(vec![one.clone(), one.clone()]);
    let two = qual("s").appl(vec![qual("s").appl(vec![qual("z")])]);
    assert!(s2.check_convertible(sum, two)?);
    Ok(())
}

#[test]
fn loader_caches_signatures() -> Result<(), Error> {
    log_init();
    let s = plus_session()?;
    let dir = std::env::temp_dir().join(format!("reverki-test-{}", std::process::id()));
    let mut loader = Loader::new(&dir);
    loader.store(&s.sig).map_err(Error::Load)?;

    let mut syms = Symbols::new(vec!["main".to_string()]);
    let sig1 = loader.load(&["nat".to_string()], &mut syms).map_err(Error::Load)?;
    let sig2 = loader.load(&["nat".to_string()], &mut syms).map_err(Error::Load)?;
    assert!(std::rc::Rc::ptr_eq(&sig1, &sig2));
    assert_eq!(sig1.path(), ["nat".to_string()]);

    std::fs::remove_dir_all(&dir).ok();
    Ok(())
}
