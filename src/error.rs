//! Common error type.

/// Common error type.
///
/// Every error is fatal to the top-level command that triggered it;
/// there is no local recovery. Rule overlap, symbol redeclaration, and
/// non-injective definable heads during rule checking are warnings, not
/// errors.
#[derive(Debug)]
pub enum Error {
    Scope(ScopeError),
    Signature(SignatureError),
    Typing(TypingError),
    Rule(RuleError),
    Load(LoadError),
}

/// Errors during the lowering of surface structures.
#[derive(Debug, Eq, PartialEq)]
pub enum ScopeError {
    UndeclaredSymbol(String),
    /// `_` outside of a rewrite pattern
    Underscore,
    /// the left-hand side of a rule is not headed by a definable symbol
    NoTopPattern,
}

/// Errors of the signature and the symbol interning layer.
#[derive(Debug)]
pub enum SignatureError {
    NotFound(String),
    /// rule attached to a symbol that cannot carry rules
    NonRewritable,
    /// a metavariable or pattern variable survived into a stored term
    UnresolvedCell,
    /// a stored term refers to a variable bound outside of it
    FreeVariable,
}

/// Errors of type inference and checking.
#[derive(Debug, Eq, PartialEq)]
pub enum TypingError {
    KindNotTypable,
    UnboundVariable,
    TypeNotFound,
    ProductExpected,
    SortExpected,
    UnexpectedKind,
    Unconvertible,
    /// no inference rule applies
    CannotInfer,
    /// definition without both type and body
    TypeAndTermEmpty,
    Unify(UnifyError),
}

/// Errors of metavariable instantiation.
#[derive(Debug, Eq, PartialEq)]
pub enum UnifyError {
    /// the metavariable occurs in the candidate solution
    Occurs,
    /// the environment is not a list of distinct variables
    NonPattern,
}

/// Errors of the rewrite-rule checker.
#[derive(Debug)]
pub enum RuleError {
    /// a constraint of the right-hand side is not entailed by the left
    UnentailedConstraint,
    /// the types of the two sides do not match under the constraints
    Mismatch,
    Typing(TypingError),
}

/// Errors of signature persistence and module loading.
#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Signature(SignatureError),
    Scope(ScopeError),
}

impl From<ScopeError> for Error {
    fn from(err: ScopeError) -> Self {
        Self::Scope(err)
    }
}

impl From<SignatureError> for Error {
    fn from(err: SignatureError) -> Self {
        Self::Signature(err)
    }
}

impl From<TypingError> for Error {
    fn from(err: TypingError) -> Self {
        Self::Typing(err)
    }
}

impl From<RuleError> for Error {
    fn from(err: RuleError) -> Self {
        Self::Rule(err)
    }
}

impl From<LoadError> for Error {
    fn from(err: LoadError) -> Self {
        Self::Load(err)
    }
}

impl From<UnifyError> for TypingError {
    fn from(err: UnifyError) -> Self {
        Self::Unify(err)
    }
}

impl From<TypingError> for RuleError {
    fn from(err: TypingError) -> Self {
        Self::Typing(err)
    }
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<SignatureError> for LoadError {
    fn from(err: SignatureError) -> Self {
        Self::Signature(err)
    }
}

impl From<ScopeError> for LoadError {
    fn from(err: ScopeError) -> Self {
        Self::Scope(err)
    }
}
