use std::fmt::Display;

use thiserror::Error;

use crate::Position;

/// Broad grouping of errors, used by the driver to choose an exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexical,
    Syntax,
    Semantic,
}

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Option<Position>,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Option<Position>) -> Self {
        Error {
            internal_error: error_impl,
            position: position.filter(|position| !position.is_null()),
        }
    }

    /// Attaches `position` unless the error already carries one.
    pub fn or_position(mut self, position: Position) -> Self {
        if self.position.is_none() && !position.is_null() {
            self.position = Some(position);
        }
        self
    }

    pub fn get_position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    pub fn internal(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn message(&self) -> String {
        self.internal_error.to_string()
    }

    pub fn kind(&self) -> ErrorKind {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorKind::Lexical,
            ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::UnexpectedTokenDetailed { .. }
            | ErrorImpl::NumberParseError { .. } => ErrorKind::Syntax,
            _ => ErrorKind::Semantic,
        }
    }

    pub fn is_semantic(&self) -> bool {
        self.kind() == ErrorKind::Semantic
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::UndeclaredIdentifier { .. } => "UndeclaredIdentifier",
            ErrorImpl::DuplicateIdentifier { .. } => "DuplicateIdentifier",
            ErrorImpl::OperatorTypeMismatch { .. } => "OperatorTypeMismatch",
            ErrorImpl::InconvertibleType { .. } => "InconvertibleType",
            ErrorImpl::UnresolvedType => "UnresolvedType",
            ErrorImpl::ArgumentCountMismatch { .. } => "ArgumentCountMismatch",
            ErrorImpl::ArgumentTypeMismatch { .. } => "ArgumentTypeMismatch",
            ErrorImpl::NotAFunction { .. } => "NotAFunction",
            ErrorImpl::NotAVariable { .. } => "NotAVariable",
            ErrorImpl::BranchTypeMismatch { .. } => "BranchTypeMismatch",
            ErrorImpl::ReturnOutsideFunction => "ReturnOutsideFunction",
            ErrorImpl::NestedFunctionNotSupported { .. } => "NestedFunctionNotSupported",
            ErrorImpl::TryMissingHandler => "TryMissingHandler",
            ErrorImpl::CatchTypeMismatch { .. } => "CatchTypeMismatch",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::UndeclaredIdentifier { identifier } => ErrorTip::Suggestion(format!(
                "Declare `{}` before using it",
                identifier
            )),
            ErrorImpl::DuplicateIdentifier { identifier } => ErrorTip::Suggestion(format!(
                "Rename one of the `{}` declarations",
                identifier
            )),
            ErrorImpl::InconvertibleType { from, to, .. } => ErrorTip::Suggestion(format!(
                "Only int -> float/bool/string, float -> string and bool -> string widen implicitly ({} -> {} does not)",
                from, to
            )),
            ErrorImpl::ArgumentCountMismatch { expected, received, .. } => {
                ErrorTip::Suggestion(format!(
                    "Expected {} arguments, received {}",
                    expected, received
                ))
            }
            ErrorImpl::BranchTypeMismatch { .. } => ErrorTip::Suggestion(String::from(
                "Both branches of `?:` must have exactly the same type",
            )),
            ErrorImpl::TryMissingHandler => {
                ErrorTip::Suggestion(String::from("Add a `catch` or a `finally` block"))
            }
            ErrorImpl::CatchTypeMismatch { .. } => ErrorTip::Suggestion(String::from(
                "Catch the exception as `Exception`",
            )),
            _ => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.position {
            Some(position) => write!(f, "{} ({})", self.internal_error, position),
            None => write!(f, "{}", self.internal_error),
        }
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

fn context_suffix(context: &Option<String>) -> String {
    match context {
        Some(context) => format!(" ({})", context),
        None => String::new(),
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Lexing and parsing
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },

    // Semantic analysis
    #[error("identifier {identifier} is not declared and is not a valid data type")]
    UndeclaredIdentifier { identifier: String },
    #[error("identifier {identifier} is already declared")]
    DuplicateIdentifier { identifier: String },
    #[error("operator {operator} is not applicable to ({operands})")]
    OperatorTypeMismatch { operator: String, operands: String },
    #[error("type {from}{} is not convertible to {to}", context_suffix(.context))]
    InconvertibleType {
        from: String,
        to: String,
        context: Option<String>,
    },
    #[error("type of the expression is not resolved")]
    UnresolvedType,
    #[error("argument count of {function} does not match (expected {expected}, received {received})")]
    ArgumentCountMismatch {
        function: String,
        expected: usize,
        received: usize,
    },
    #[error("actual argument types ({actual}) of function {function} do not match the formal ones ({formal}) and are not convertible")]
    ArgumentTypeMismatch {
        function: String,
        actual: String,
        formal: String,
    },
    #[error("identifier {identifier} is not a function")]
    NotAFunction { identifier: String },
    #[error("{identifier} is not a variable and cannot be assigned")]
    NotAVariable { identifier: String },
    #[error("branches of the conditional expression must have the same type ({true_type} vs {false_type})")]
    BranchTypeMismatch {
        true_type: String,
        false_type: String,
    },
    #[error("return is only allowed inside a function")]
    ReturnOutsideFunction,
    #[error("declaring a function ({function}) inside another function is not supported")]
    NestedFunctionNotSupported { function: String },
    #[error("try must have at least one of the catch or finally blocks")]
    TryMissingHandler,
    #[error("catch parameter must be of type Exception, not {received}")]
    CatchTypeMismatch { received: String },
}
