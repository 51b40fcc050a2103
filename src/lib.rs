#![forbid(unsafe_code)]

//! Type checking for the lambda-Pi calculus modulo rewriting,
//! with unification metavariables.
//!
//! # Usage
//!
//! Users communicate with Reverki using *commands*.
//! A command either
//! introduces a new name (by declaration, definition, or theorem),
//! adds rewrite rules, or queries the kernel.
//! The state of a checking session consists of
//! a [`Symbols`] table resolving names to symbols,
//! the [`Signature`] of the module being checked, and
//! a global context [`GCtx`] recording the types and rewrite rules of
//! every known symbol.
//!
//! The following example declares a few symbols and infers a type.
//!
//! ~~~
//! use reverki::surface::Term;
//! use reverki::{Error, Session, Staticity};
//!
//! let mut s = Session::new(vec!["nat".to_string()]);
//! s.new_symbol(Staticity::Static, "Nat", Term::Type)?;
//! s.new_symbol(Staticity::Static, "z", Term::symb("Nat"))?;
//! s.new_symbol(
//!     Staticity::Static,
//!     "s",
//!     Term::arrow(Term::symb("Nat"), Term::symb("Nat")),
//! )?;
//!
//! let two = Term::symb("s").appl(vec![Term::symb("s").appl(vec![Term::symb("z")])]);
//! let ty = s.infer(two)?;
//! assert_eq!(ty.to_string(), "nat.Nat");
//! # Ok::<_, Error>(())
//! ~~~
//!
//! # Organisation
//!
//! The [`surface`] module contains reference-free input structures and
//! the [`scope`] module lowers them to kernel terms, resolving names.
//! The [`kernel`] module holds the trusted core: reduction, matching,
//! conversion, unification, typing, and the rule checker. Signatures
//! are persisted through the sharing-free storage terms of [`lterm`].

#[macro_use]
extern crate log;

mod cell;
mod command;
pub mod error;
mod gctx;
pub mod kernel;
mod loader;
pub mod lterm;
pub mod rule;
pub mod scope;
mod signature;
mod spine;
pub mod surface;
mod symbol;
mod symbols;
mod term;

pub use cell::{Meta, PatVar};
pub use command::{Command, Intro, Outcome, Query, Session};
pub use error::Error;
pub use gctx::GCtx;
pub use loader::Loader;
pub use rule::Rule;
pub use signature::{Entry, Signature};
pub use spine::Spine;
pub use symbol::{Staticity, Symbol};
pub use symbols::Symbols;
pub use term::{Bind, MBind, RTerm, Replace, Term, Var};
