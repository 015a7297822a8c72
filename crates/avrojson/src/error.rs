use std::{borrow::Cow, io};

use thiserror::Error;

/// Errors raised while decoding a datum.
///
/// Every error is fatal to the decode call that produced it: the decoder does
/// not retry or recover, and a datum that failed half way must be discarded.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DecodeError {
    /// The physical token (or the requested read) does not match what the
    /// grammar expects at this point.
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        /// What the grammar or the read operation required.
        expected: Cow<'static, str>,
        /// What was actually there.
        found: String,
    },
    /// A union tag names none of the union's alternatives.
    #[error("unknown union branch {0:?}")]
    UnknownUnionBranch(String),
    /// Fields left over in a record's reorder frame when the record closed.
    #[error("unknown fields: {}", .0.join(", "))]
    UnknownField(Vec<String>),
    /// A field is absent from the input and its declaration has no default.
    #[error("missing required field {0:?}")]
    MissingRequiredField(String),
    /// A fixed value's length differs from the declared size.
    #[error("incorrect length for fixed binary: expected {expected} but received {actual} bytes")]
    FixedLengthMismatch {
        /// Declared size.
        expected: usize,
        /// Size that was requested or decoded.
        actual: usize,
    },
    /// The input ended while the grammar still expected a datum.
    #[error("unexpected end of input")]
    PrematureEndOfInput,
    /// A string does not name any symbol of the enum.
    #[error("unknown enum symbol {0:?}")]
    UnknownEnumSymbol(String),
    /// A numeric lexeme does not fit the requested type.
    #[error("number {text} out of range for {expected}")]
    NumberOutOfRange {
        /// The lexeme as it appeared in the input.
        text: String,
        /// The requested type.
        expected: &'static str,
    },
    /// The input is not well-formed JSON.
    #[error("{source} at {line}:{column}")]
    Syntax {
        /// What the tokenizer rejected.
        source: SyntaxError,
        /// 1-based line of the offending character.
        line: usize,
        /// 1-based column of the offending character.
        column: usize,
    },
    /// Reading the underlying input failed.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    /// The schema could not be resolved while decoding.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
}

impl DecodeError {
    pub(crate) fn mismatch(expected: impl Into<Cow<'static, str>>, found: impl ToString) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.to_string(),
        }
    }
}

/// Lexical errors reported by the tokenizer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("invalid character '{0}'")]
    InvalidCharacter(char),
    #[error("invalid unicode escape sequence at character: '{0}'")]
    InvalidUnicodeEscapeChar(char),
    #[error("invalid unicode escape sequence \\u{0:X}")]
    InvalidUnicodeEscapeSequence(u32),
    #[error("{0}")]
    SyntaxError(&'static str),
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
}

/// Errors raised while parsing or resolving a schema.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SchemaError {
    #[error("schema is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("unknown type {0:?}")]
    UnknownType(String),
    #[error("{context} is missing attribute {attribute:?}")]
    MissingAttribute {
        attribute: &'static str,
        context: Cow<'static, str>,
    },
    #[error("attribute {attribute:?} of {context} is invalid")]
    InvalidAttribute {
        attribute: &'static str,
        context: Cow<'static, str>,
    },
    #[error("name {0:?} is defined more than once")]
    DuplicateName(String),
    #[error("invalid union: {0}")]
    InvalidUnion(Cow<'static, str>),
}
