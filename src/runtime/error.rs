use thiserror::Error;

use crate::runtime::value::Cell;

/// Errors raised by loading or evaluating code.
///
/// Every variant has a stable Rebol-style id (see [`RenError::id`]) that user
/// code can inspect on a trapped ERROR! value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenError {
    #[error("`{word}` is not bound to a context")]
    NotBound { word: String },
    #[error("`{word}` has no value")]
    NoValue { word: String },
    #[error("`{word}` holds the ~{label}~ isotope, use GET/ANY to read it")]
    BadIsotope { word: String, label: String },
    #[error("{action} does not allow {got} for its {param} argument")]
    ExpectArg {
        action: String,
        param: String,
        got: String,
    },
    #[error("{action} is missing its {param} argument")]
    NeedNonEnd { action: String, param: String },
    #[error("{action} has no refinement /{refinement}")]
    BadRefine { action: String, refinement: String },
    #[error("bad parameter: {0}")]
    BadParameter(String),
    #[error("{0}")]
    User(String),
    #[error("no CATCH for THROW of {label}")]
    NoCatch { label: String },
    #[error("frame has already been invoked and its storage is inert")]
    FrameConsumed,
    #[error("frame storage was stolen by an enclosing call")]
    FrameStolen,
    #[error("context handle refers to recycled storage")]
    StaleContext,
    #[error("cannot use {verb} on {type_name} value")]
    CannotUse { verb: String, type_name: String },
    #[error("attempt to divide by zero")]
    ZeroDivide,
    #[error("math or number overflow")]
    Overflow,
    #[error("action calls nested deeper than {depth} levels")]
    StackOverflow { depth: usize },
    #[error("syntax error on line {line}: {message}")]
    Scan { line: usize, message: String },
    #[error("{action} is enfix but has no left argument")]
    NoLeftArg { action: String },
    #[error("macro body must produce a BLOCK!, got {got}")]
    MacroNotBlock { got: String },
    #[error("cannot resolve path {path}")]
    BadPath { path: String },
    #[error("series is CONST and cannot be modified")]
    ConstSeries,
    #[error("isotopes cannot be put in arrays")]
    IsotopeInArray,
    #[error("{0}")]
    InvalidArg(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl RenError {
    pub fn id(&self) -> &'static str {
        match self {
            RenError::NotBound { .. } => "not-bound",
            RenError::NoValue { .. } => "no-value",
            RenError::BadIsotope { .. } => "bad-isotope",
            RenError::ExpectArg { .. } => "expect-arg",
            RenError::NeedNonEnd { .. } => "need-non-end",
            RenError::BadRefine { .. } => "bad-refine",
            RenError::BadParameter(_) => "bad-parameter",
            RenError::User(_) => "user",
            RenError::NoCatch { .. } => "no-catch",
            RenError::FrameConsumed => "frame-consumed",
            RenError::FrameStolen => "frame-stolen",
            RenError::StaleContext => "stale-context",
            RenError::CannotUse { .. } => "cannot-use",
            RenError::ZeroDivide => "zero-divide",
            RenError::Overflow => "overflow",
            RenError::StackOverflow { .. } => "stack-overflow",
            RenError::Scan { .. } => "scan",
            RenError::NoLeftArg { .. } => "no-left-arg",
            RenError::MacroNotBlock { .. } => "macro-not-block",
            RenError::BadPath { .. } => "bad-path",
            RenError::ConstSeries => "const-series",
            RenError::IsotopeInArray => "isotope-in-array",
            RenError::InvalidArg(_) => "invalid-arg",
            RenError::Config(_) => "config",
        }
    }
}

/// A non-local exit travelling up the dispatch chain.
#[derive(Debug, Clone)]
pub enum Signal {
    Fail(RenError),
    /// Labeled throw. RETURN, RESUME and QUIT use their own action cell as
    /// the label; plain THROW uses BLANK unless given /NAME.
    Throw { label: Cell, value: Cell },
}

impl From<RenError> for Signal {
    fn from(error: RenError) -> Self {
        Signal::Fail(error)
    }
}

pub type Eval<T> = Result<T, Signal>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_stable() {
        assert_eq!(RenError::ZeroDivide.id(), "zero-divide");
        assert_eq!(
            RenError::NotBound {
                word: "x".to_string()
            }
            .id(),
            "not-bound"
        );
        assert_eq!(RenError::FrameConsumed.id(), "frame-consumed");
    }

    #[test]
    fn messages_name_the_culprit() {
        let err = RenError::ExpectArg {
            action: "add".to_string(),
            param: "value1".to_string(),
            got: "text!".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "add does not allow text! for its value1 argument"
        );
    }

    #[test]
    fn errors_convert_into_fail_signals() {
        let signal: Signal = RenError::Overflow.into();
        assert!(matches!(signal, Signal::Fail(RenError::Overflow)));
    }
}
