//! An order-tolerant decoder for Avro's JSON encoding.
//!
//! Avro's JSON encoding is strict: record fields in declaration order, every
//! field present, every union value wrapped as `{"<branch>": value}`. JSON
//! produced by other tools rarely is. [`Decoder`] accepts it anyway:
//!
//! - fields may come in any order; out-of-order fields are buffered and
//!   replayed when the schema asks for them,
//! - absent fields take their declared default, nested records and arrays
//!   included,
//! - values of `["null", T]` unions may be written bare, as `null` or as a
//!   tagged wrapper.
//!
//! ```
//! use avrojson::{DatumReader, Decoder, Schema};
//!
//! let schema = Schema::parse_str(
//!     r#"{"type": "record", "name": "User", "fields": [
//!         {"name": "id", "type": "long"},
//!         {"name": "email", "type": ["null", "string"], "default": null},
//!         {"name": "roles", "type": {"type": "array", "items": "string"}, "default": []}
//!     ]}"#,
//! )?;
//! let mut decoder = Decoder::from_str(&schema, r#"{"email": "a@b.c", "id": 7}"#)?;
//! let user = DatumReader::new(&schema).read(&mut decoder)?;
//! assert_eq!(user.to_string(), r#"{"id":7,"email":"a@b.c","roles":[]}"#);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
#![allow(missing_docs)]

mod datum;
mod decoder;
mod defaults;
mod error;
mod frame;
mod grammar;
mod handler;
mod lexer;
mod options;
mod reader;
mod schema;
mod source;
mod token;

#[cfg(test)]
mod tests;

pub use datum::Datum;
pub use decoder::Decoder;
pub use error::{DecodeError, SchemaError, SyntaxError};
pub use grammar::{Action, ActionHandler, Automaton, Symbol, Terminal};
pub use lexer::Tokenizer;
pub use options::{DecoderOptions, DefaultLookup, UnknownFieldPolicy};
pub use reader::{DatumIter, DatumReader};
pub use schema::{EnumType, Field, FixedType, Name, RecordType, Schema, Type, UnionType};
pub use source::{LiveSource, ReplaySource, TokenSource};
pub use token::{Container, ScalarKind, Token, TokenSequence};
