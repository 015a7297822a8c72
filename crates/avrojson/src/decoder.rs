//! The schema-driven pull decoder.
//!
//! A [`Decoder`] walks the schema's grammar one typed read at a time. The
//! caller asks for the value it expects next (`read_long`, `read_index`,
//! `read_array_start`, ...), exactly as it would against Avro's binary
//! decoder; the decoder finds that value in the input whatever order the
//! input's fields come in, and substitutes declared defaults for fields that
//! are absent.
//!
//! ```
//! use avrojson::{Decoder, Schema};
//!
//! let schema = Schema::parse_str(
//!     r#"{"type": "record", "name": "R", "fields": [
//!         {"name": "l", "type": "long"},
//!         {"name": "s", "type": "string", "default": "none"}
//!     ]}"#,
//! )?;
//! let mut decoder = Decoder::from_str(&schema, r#"{"l": 100}"#)?;
//! assert_eq!(decoder.read_long()?, 100);
//! assert_eq!(decoder.read_string()?, "none");
//! decoder.drain()?;
//! assert!(!decoder.has_more()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
use std::io::BufRead;

use log::debug;

use crate::{
    error::DecodeError,
    grammar::{Action, Automaton, Symbol, Terminal},
    handler::Cursor,
    lexer::Tokenizer,
    options::DecoderOptions,
    schema::{Schema, Type, UnionType},
    source::{LiveSource, is_end},
    token::{Container, ScalarKind, Token},
};

/// Pull decoder for one schema over one input.
pub struct Decoder<'a> {
    automaton: Automaton<'a>,
    cursor: Cursor<'a>,
    schema: &'a Schema,
    /// A read has been issued for the current datum.
    started: bool,
}

impl<'a> Decoder<'a> {
    /// Decodes the tokens produced by `tokens` with default options.
    ///
    /// # Errors
    ///
    /// Fails if the first token cannot be read.
    pub fn new(schema: &'a Schema, tokens: Tokenizer<'a>) -> Result<Self, DecodeError> {
        Self::with_options(schema, tokens, DecoderOptions::default())
    }

    /// # Errors
    ///
    /// Fails if the first token cannot be read.
    pub fn with_options(
        schema: &'a Schema,
        tokens: Tokenizer<'a>,
        options: DecoderOptions,
    ) -> Result<Self, DecodeError> {
        Ok(Self {
            automaton: Automaton::new(schema),
            cursor: Cursor::new(schema, LiveSource::new(tokens)?, options),
            schema,
            started: false,
        })
    }

    /// # Errors
    ///
    /// Fails if the first token is malformed.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(schema: &'a Schema, text: &str) -> Result<Self, DecodeError> {
        Self::new(schema, Tokenizer::from_str(text))
    }

    /// # Errors
    ///
    /// Fails if the first token cannot be read.
    pub fn from_reader(schema: &'a Schema, reader: impl BufRead + 'a) -> Result<Self, DecodeError> {
        Self::new(schema, Tokenizer::from_reader(reader))
    }

    /// Re-targets the decoder at new input, discarding all state.
    ///
    /// # Errors
    ///
    /// Fails if the first token cannot be read.
    pub fn reset(&mut self, tokens: Tokenizer<'a>) -> Result<(), DecodeError> {
        self.automaton.reset();
        self.cursor.reset(LiveSource::new(tokens)?);
        self.started = false;
        Ok(())
    }

    #[must_use]
    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    #[must_use]
    pub fn options(&self) -> DecoderOptions {
        self.cursor.options()
    }

    fn advance(&mut self, terminal: Terminal) -> Result<(), DecodeError> {
        self.automaton.process_trailing_actions(&mut self.cursor)?;
        if self.cursor.current().is_end_of_sequence() && self.automaton.depth() == 1 {
            return Err(DecodeError::PrematureEndOfInput);
        }
        self.started = true;
        self.automaton.advance(terminal, &mut self.cursor)
    }

    /// # Errors
    ///
    /// [`DecodeError::TypeMismatch`] if the schema or the input has something
    /// else here.
    pub fn read_null(&mut self) -> Result<(), DecodeError> {
        self.advance(Terminal::Null)?;
        self.cursor.take_scalar(ScalarKind::Null, "null").map(drop)
    }

    /// # Errors
    ///
    /// [`DecodeError::TypeMismatch`] if the schema or the input has something
    /// else here.
    pub fn read_boolean(&mut self) -> Result<bool, DecodeError> {
        self.advance(Terminal::Boolean)?;
        Ok(self.cursor.take_scalar(ScalarKind::Bool, "boolean")? == "true")
    }

    /// Reads an `int`. Float lexemes are truncated toward zero.
    ///
    /// # Errors
    ///
    /// [`DecodeError::NumberOutOfRange`] if the value does not fit.
    pub fn read_int(&mut self) -> Result<i32, DecodeError> {
        self.advance(Terminal::Int)?;
        let (kind, text) = self.cursor.take_number("int")?;
        let wide = parse_integer(kind, &text, "int")?;
        i32::try_from(wide).map_err(|_| DecodeError::NumberOutOfRange { text, expected: "int" })
    }

    /// Reads a `long`. Float lexemes are truncated toward zero.
    ///
    /// # Errors
    ///
    /// [`DecodeError::NumberOutOfRange`] if the value does not fit.
    pub fn read_long(&mut self) -> Result<i64, DecodeError> {
        self.advance(Terminal::Long)?;
        let (kind, text) = self.cursor.take_number("long")?;
        parse_integer(kind, &text, "long")
    }

    /// # Errors
    ///
    /// [`DecodeError::TypeMismatch`] if the input is not a number.
    pub fn read_float(&mut self) -> Result<f32, DecodeError> {
        self.advance(Terminal::Float)?;
        let (_, text) = self.cursor.take_number("float")?;
        text.parse()
            .map_err(|_| DecodeError::NumberOutOfRange { text, expected: "float" })
    }

    /// # Errors
    ///
    /// [`DecodeError::TypeMismatch`] if the input is not a number.
    pub fn read_double(&mut self) -> Result<f64, DecodeError> {
        self.advance(Terminal::Double)?;
        let (_, text) = self.cursor.take_number("double")?;
        text.parse()
            .map_err(|_| DecodeError::NumberOutOfRange { text, expected: "double" })
    }

    /// Reads a `string`, or the key of the next map entry.
    ///
    /// # Errors
    ///
    /// [`DecodeError::TypeMismatch`] if the schema or the input has something
    /// else here.
    pub fn read_string(&mut self) -> Result<String, DecodeError> {
        self.advance(Terminal::String)?;
        if matches!(
            self.automaton.top(),
            Some(Symbol::Terminal(Terminal::MapKeyMarker))
        ) {
            self.automaton
                .advance(Terminal::MapKeyMarker, &mut self.cursor)?;
            return self.cursor.take_map_key();
        }
        self.cursor.take_scalar(ScalarKind::String, "string")
    }

    /// Reads `bytes`, encoded as a string of code points up to U+00FF.
    ///
    /// # Errors
    ///
    /// [`DecodeError::TypeMismatch`] if the string has wider characters.
    pub fn read_bytes(&mut self) -> Result<Vec<u8>, DecodeError> {
        self.advance(Terminal::Bytes)?;
        let text = self.cursor.take_scalar(ScalarKind::String, "bytes")?;
        latin1(&text)
    }

    /// Reads a `fixed` of `len` bytes.
    ///
    /// # Errors
    ///
    /// [`DecodeError::FixedLengthMismatch`] if `len` differs from the declared
    /// size or the input holds a different number of bytes.
    pub fn read_fixed(&mut self, len: usize) -> Result<Vec<u8>, DecodeError> {
        self.advance(Terminal::Fixed)?;
        let size = match self.automaton.pop() {
            Some(Symbol::FixedSize(size)) => size,
            other => return Err(unexpected_symbol("fixed size", other)),
        };
        if size != len {
            return Err(DecodeError::FixedLengthMismatch {
                expected: size,
                actual: len,
            });
        }
        let text = self.cursor.take_scalar(ScalarKind::String, "fixed")?;
        let bytes = latin1(&text)?;
        if bytes.len() != len {
            return Err(DecodeError::FixedLengthMismatch {
                expected: len,
                actual: bytes.len(),
            });
        }
        Ok(bytes)
    }

    /// Reads an enum symbol, returning its ordinal.
    ///
    /// # Errors
    ///
    /// [`DecodeError::UnknownEnumSymbol`] if the symbol is not declared.
    pub fn read_enum(&mut self) -> Result<usize, DecodeError> {
        self.advance(Terminal::Enum)?;
        let labels = match self.automaton.pop() {
            Some(Symbol::EnumLabels(labels)) => labels,
            other => return Err(unexpected_symbol("enum symbols", other)),
        };
        let symbol = self.cursor.take_scalar(ScalarKind::String, "enum")?;
        labels
            .index_of(&symbol)
            .ok_or(DecodeError::UnknownEnumSymbol(symbol))
    }

    /// Opens an array; returns 1 if an element follows, 0 if it is empty.
    ///
    /// # Errors
    ///
    /// [`DecodeError::TypeMismatch`] if the input is not an array.
    pub fn read_array_start(&mut self) -> Result<u64, DecodeError> {
        self.advance(Terminal::ArrayStart)?;
        self.cursor
            .expect(&Token::Start(Container::Array), "array start")?;
        self.array_next_inner()
    }

    /// Call after each element; returns 1 if another element follows.
    ///
    /// # Errors
    ///
    /// [`DecodeError::TypeMismatch`] if no array element was just read.
    pub fn array_next(&mut self) -> Result<u64, DecodeError> {
        self.advance(Terminal::ItemEnd)?;
        self.array_next_inner()
    }

    fn array_next_inner(&mut self) -> Result<u64, DecodeError> {
        if is_end(self.cursor.current(), Container::Array) {
            self.automaton
                .advance(Terminal::ArrayEnd, &mut self.cursor)?;
            self.cursor.bump()?;
            Ok(0)
        } else {
            Ok(1)
        }
    }

    /// Opens a map; returns 1 if an entry follows, 0 if it is empty.
    ///
    /// # Errors
    ///
    /// [`DecodeError::TypeMismatch`] if the input is not an object.
    pub fn read_map_start(&mut self) -> Result<u64, DecodeError> {
        self.advance(Terminal::MapStart)?;
        self.cursor
            .expect(&Token::Start(Container::Object), "map start")?;
        self.map_next_inner()
    }

    /// Call after each entry; returns 1 if another entry follows.
    ///
    /// # Errors
    ///
    /// [`DecodeError::TypeMismatch`] if no map entry was just read.
    pub fn map_next(&mut self) -> Result<u64, DecodeError> {
        self.advance(Terminal::ItemEnd)?;
        self.map_next_inner()
    }

    fn map_next_inner(&mut self) -> Result<u64, DecodeError> {
        if is_end(self.cursor.current(), Container::Object) {
            self.cursor.bump()?;
            self.advance(Terminal::MapEnd)?;
            Ok(0)
        } else {
            Ok(1)
        }
    }

    /// Selects a union alternative, returning its index. The alternative's
    /// value is read next.
    ///
    /// A general union's value must be tagged as `{"<label>": value}`, or be
    /// a bare `null`. A two-way nullable union also takes its other
    /// alternative bare. An object given for a nullable record is a tag
    /// wrapper only when its first key names an alternative and no field of
    /// the record. An object given for a nullable map is always the map
    /// itself, so `{"null": null}` and `{"map": {..}}` decode as one-entry
    /// maps there.
    ///
    /// # Errors
    ///
    /// [`DecodeError::UnknownUnionBranch`] if a tag names no alternative;
    /// [`DecodeError::TypeMismatch`] if a general union's value is not
    /// tagged.
    pub fn read_index(&mut self) -> Result<usize, DecodeError> {
        self.advance(Terminal::Union)?;
        let union = match self.automaton.pop() {
            Some(Symbol::Alternative(union)) => union,
            other => return Err(unexpected_symbol("union alternatives", other)),
        };

        let index = if self.cursor.current().is_null() {
            union
                .null_index()
                .ok_or_else(|| DecodeError::UnknownUnionBranch("null".into()))?
        } else if let Some(branch) = self.bare_branch(union)? {
            debug!("untagged value for {}", union.variants()[branch].label());
            branch
        } else {
            let index = self.read_union_tag(union)?;
            self.automaton.push(Symbol::Action(Action::UnionEnd));
            index
        };

        self.automaton.push(Symbol::Type(&union.variants()[index]));
        Ok(index)
    }

    /// For a two-way nullable union, the non-null alternative if the current
    /// value is that alternative written bare rather than a tag wrapper.
    fn bare_branch(&mut self, union: &'a UnionType) -> Result<Option<usize>, DecodeError> {
        let Some(branch) = union.nullable_branch() else {
            return Ok(None);
        };
        if self.cursor.current() != &Token::Start(Container::Object) {
            return Ok(Some(branch));
        }
        let schema: &'a Schema = self.schema;
        let tagged = match schema.resolve(&union.variants()[branch])? {
            Type::Map(_) => false,
            Type::Record(record) => self
                .cursor
                .peek()?
                .as_field_name()
                .is_some_and(|key| union.find_branch(key).is_some() && record.field(key).is_none()),
            _ => true,
        };
        Ok((!tagged).then_some(branch))
    }

    fn read_union_tag(&mut self, union: &UnionType) -> Result<usize, DecodeError> {
        self.cursor
            .expect(&Token::Start(Container::Object), "union tag")?;
        let label = self
            .cursor
            .current()
            .as_field_name()
            .map(str::to_owned)
            .ok_or_else(|| DecodeError::mismatch("union tag", self.cursor.current()))?;
        self.cursor.bump()?;
        let index = union
            .find_branch(&label)
            .ok_or(DecodeError::UnknownUnionBranch(label))?;
        debug!("tagged value for {}", union.variants()[index].label());
        Ok(index)
    }
}

/// Skips consume exactly what the matching read would and fail the same way.
#[allow(clippy::missing_errors_doc, missing_docs)]
impl Decoder<'_> {
    pub fn skip_null(&mut self) -> Result<(), DecodeError> {
        self.read_null()
    }

    pub fn skip_boolean(&mut self) -> Result<(), DecodeError> {
        self.read_boolean().map(drop)
    }

    pub fn skip_int(&mut self) -> Result<(), DecodeError> {
        self.read_int().map(drop)
    }

    pub fn skip_long(&mut self) -> Result<(), DecodeError> {
        self.read_long().map(drop)
    }

    pub fn skip_float(&mut self) -> Result<(), DecodeError> {
        self.read_float().map(drop)
    }

    pub fn skip_double(&mut self) -> Result<(), DecodeError> {
        self.read_double().map(drop)
    }

    pub fn skip_string(&mut self) -> Result<(), DecodeError> {
        self.read_string().map(drop)
    }

    pub fn skip_bytes(&mut self) -> Result<(), DecodeError> {
        self.read_bytes().map(drop)
    }

    pub fn skip_fixed(&mut self, len: usize) -> Result<(), DecodeError> {
        self.read_fixed(len).map(drop)
    }

    pub fn skip_enum(&mut self) -> Result<(), DecodeError> {
        self.read_enum().map(drop)
    }
}

impl Decoder<'_> {
    /// Skips a whole array without decoding its elements. Always returns 0.
    ///
    /// # Errors
    ///
    /// [`DecodeError::TypeMismatch`] if the input is not an array.
    pub fn skip_array(&mut self) -> Result<u64, DecodeError> {
        self.advance(Terminal::ArrayStart)?;
        if !matches!(self.cursor.current(), Token::Start(Container::Array)) {
            return Err(DecodeError::mismatch("array start", self.cursor.current()));
        }
        self.cursor.skip_value()?;
        self.advance(Terminal::ArrayEnd)?;
        Ok(0)
    }

    /// Skips a whole map without decoding its entries. Always returns 0.
    ///
    /// # Errors
    ///
    /// [`DecodeError::TypeMismatch`] if the input is not an object.
    pub fn skip_map(&mut self) -> Result<u64, DecodeError> {
        self.advance(Terminal::MapStart)?;
        if !matches!(self.cursor.current(), Token::Start(Container::Object)) {
            return Err(DecodeError::mismatch("map start", self.cursor.current()));
        }
        self.cursor.skip_value()?;
        self.advance(Terminal::MapEnd)?;
        Ok(0)
    }

    /// Completes the current datum after its last read: runs the pending
    /// field and record ends, so unknown fields of a top-level record are
    /// reported here rather than by the next read.
    ///
    /// A datum that needs no reads at all, such as an empty record, is
    /// consumed whole by calling `drain` in place of its reads.
    ///
    /// # Errors
    ///
    /// [`DecodeError::UnknownField`] and any error of the pending actions.
    pub fn drain(&mut self) -> Result<(), DecodeError> {
        if !self.started {
            if self.cursor.current().is_end_of_sequence() {
                return Ok(());
            }
            self.automaton.begin_datum();
        }
        self.automaton.process_implicit_actions(&mut self.cursor)?;
        self.started = self.automaton.depth() > 1;
        Ok(())
    }

    /// Whether another datum follows. Completes a datum that has been read
    /// from, as [`drain`](Self::drain) does, but never consumes one that has
    /// not.
    ///
    /// # Errors
    ///
    /// See [`drain`](Self::drain).
    pub fn has_more(&mut self) -> Result<bool, DecodeError> {
        if self.started {
            self.drain()?;
        }
        Ok(self.automaton.depth() > 1 || !self.cursor.current().is_end_of_sequence())
    }
}

impl core::fmt::Debug for Decoder<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Decoder")
            .field("depth", &self.automaton.depth())
            .field("current", self.cursor.current())
            .finish_non_exhaustive()
    }
}

fn unexpected_symbol(expected: &'static str, found: Option<Symbol<'_>>) -> DecodeError {
    match found {
        Some(symbol) => DecodeError::mismatch(expected, symbol),
        None => DecodeError::PrematureEndOfInput,
    }
}

/// Parses an integer lexeme, truncating float lexemes toward zero.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn parse_integer(kind: ScalarKind, text: &str, expected: &'static str) -> Result<i64, DecodeError> {
    let out_of_range = || DecodeError::NumberOutOfRange {
        text: text.to_owned(),
        expected,
    };
    if kind == ScalarKind::Int {
        return text.parse().map_err(|_| out_of_range());
    }
    let value: f64 = text.parse().map_err(|_| out_of_range())?;
    let truncated = value.trunc();
    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    if truncated.is_finite() && truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
        Ok(truncated as i64)
    } else {
        Err(out_of_range())
    }
}

fn latin1(text: &str) -> Result<Vec<u8>, DecodeError> {
    text.chars()
        .map(|c| u8::try_from(c).map_err(|_| DecodeError::mismatch("ISO-8859-1 string", format!("{c:?}"))))
        .collect()
}
