//! Tokens flowing between the tokenizer, the token sources and the decoder.
//!
//! A [`Token`] is one structural delimiter, field name or scalar literal. A
//! [`TokenSequence`] is a captured, balanced subtree of tokens terminated by
//! [`Token::EndOfSequence`]; it is immutable and may back any number of
//! independent replays.
//!
//! ```
//! use avrojson::{Container, ScalarKind, Token};
//!
//! let tok = Token::scalar(ScalarKind::Int, "42");
//! assert!(tok.is_numeric());
//! assert_eq!(tok.to_string(), "int 42");
//! assert_eq!(Token::Start(Container::Object).to_string(), "'{'");
//! ```
use std::{fmt, ops::Deref, sync::Arc};

/// The two kinds of JSON container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Container {
    Object,
    Array,
}

/// The lexical kind of a scalar token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    String,
    /// A number without fraction or exponent.
    Int,
    /// A number with a fraction and/or an exponent.
    Float,
    Bool,
    Null,
}

/// A single token of the input stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `{` or `[`.
    Start(Container),
    /// `}` or `]`.
    End(Container),
    /// An object key.
    FieldName(String),
    /// A literal value. `text` holds the decoded string content for strings
    /// and the literal lexeme for everything else.
    Scalar { kind: ScalarKind, text: String },
    /// No more tokens. Distinct from a `null` scalar.
    EndOfSequence,
}

impl Token {
    /// Convenience constructor for scalar tokens.
    #[must_use]
    pub fn scalar(kind: ScalarKind, text: impl Into<String>) -> Self {
        Self::Scalar {
            kind,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn null() -> Self {
        Self::scalar(ScalarKind::Null, "null")
    }

    #[must_use]
    pub fn is_end_of_sequence(&self) -> bool {
        matches!(self, Self::EndOfSequence)
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(
            self,
            Self::Scalar {
                kind: ScalarKind::Null,
                ..
            }
        )
    }

    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Scalar {
                kind: ScalarKind::Int | ScalarKind::Float,
                ..
            }
        )
    }

    /// Returns the field name if this token is one.
    #[must_use]
    pub fn as_field_name(&self) -> Option<&str> {
        match self {
            Self::FieldName(name) => Some(name),
            _ => None,
        }
    }

    /// Returns the scalar text if this token is a scalar of `kind`.
    #[must_use]
    pub fn scalar_text(&self, kind: ScalarKind) -> Option<&str> {
        match self {
            Self::Scalar { kind: k, text } if *k == kind => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Start(Container::Object) => f.write_str("'{'"),
            Token::Start(Container::Array) => f.write_str("'['"),
            Token::End(Container::Object) => f.write_str("'}'"),
            Token::End(Container::Array) => f.write_str("']'"),
            Token::FieldName(name) => write!(f, "field name {name:?}"),
            Token::Scalar {
                kind: ScalarKind::String,
                text,
            } => write!(f, "string {text:?}"),
            Token::Scalar {
                kind: ScalarKind::Int,
                text,
            } => write!(f, "int {text}"),
            Token::Scalar {
                kind: ScalarKind::Float,
                text,
            } => write!(f, "float {text}"),
            Token::Scalar {
                kind: ScalarKind::Bool,
                text,
            } => write!(f, "boolean {text}"),
            Token::Scalar {
                kind: ScalarKind::Null,
                ..
            } => f.write_str("null"),
            Token::EndOfSequence => f.write_str("end of input"),
        }
    }
}

/// An immutable, balanced run of tokens ending in [`Token::EndOfSequence`].
///
/// Cloning is cheap; clones share the same backing storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSequence(Arc<[Token]>);

impl TokenSequence {
    /// Wraps `tokens`, appending the terminating sentinel if it is missing.
    #[must_use]
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().is_some_and(Token::is_end_of_sequence) {
            tokens.push(Token::EndOfSequence);
        }
        Self(tokens.into())
    }

    /// The tokens excluding the sentinel.
    #[must_use]
    pub fn body(&self) -> &[Token] {
        &self.0[..self.0.len() - 1]
    }
}

impl Deref for TokenSequence {
    type Target = [Token];

    fn deref(&self) -> &[Token] {
        &self.0
    }
}
