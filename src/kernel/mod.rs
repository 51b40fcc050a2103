//! The kernel: reduction, matching, conversion, unification, typing.
//!
//! These components are tightly interleaved: typing calls conversion,
//! conversion calls reduction, reduction calls matching, and matching
//! and conversion both call back into equality. They carry the semantic
//! correctness of the system.

pub mod convertible;
pub mod matching;
pub mod reduce;
pub mod rulecheck;
pub mod typing;
pub mod unify;

pub use convertible::{convertible, Constraint};
pub use reduce::whnf_stk;
pub use rulecheck::check_rule;
pub use typing::{Ctx, Typer};
