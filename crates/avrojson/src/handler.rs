//! The decoder's side of the grammar actions.
//!
//! [`Cursor`] owns the active token source and the stack of reorder frames.
//! Field lookup, record boundaries and union wrappers are resolved here;
//! every source swap goes through [`Cursor::replay`] and [`Cursor::resume`].
use log::trace;

use crate::{
    defaults,
    error::DecodeError,
    frame::ReorderFrame,
    grammar::{Action, ActionHandler},
    options::{DefaultLookup, DecoderOptions, UnknownFieldPolicy},
    schema::{Field, Schema},
    source::{LiveSource, ReplaySource, TokenSource, is_end},
    token::{Container, ScalarKind, Token, TokenSequence},
};

pub(crate) struct Cursor<'a> {
    active: Box<dyn TokenSource + 'a>,
    frames: Vec<ReorderFrame<'a>>,
    schema: &'a Schema,
    options: DecoderOptions,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(schema: &'a Schema, live: LiveSource<'a>, options: DecoderOptions) -> Self {
        Self {
            active: Box::new(live),
            frames: Vec::new(),
            schema,
            options,
        }
    }

    pub(crate) fn reset(&mut self, live: LiveSource<'a>) {
        self.active = Box::new(live);
        self.frames.clear();
    }

    pub(crate) fn options(&self) -> DecoderOptions {
        self.options
    }

    pub(crate) fn current(&self) -> &Token {
        self.active.current()
    }

    pub(crate) fn peek(&mut self) -> Result<&Token, DecodeError> {
        self.active.peek()
    }

    pub(crate) fn bump(&mut self) -> Result<(), DecodeError> {
        self.active.advance().map(drop)
    }

    pub(crate) fn skip_value(&mut self) -> Result<(), DecodeError> {
        self.active.skip_subtree()
    }

    /// Requires the current token to open (or close) `container` and moves
    /// past it.
    pub(crate) fn expect(&mut self, expected: &Token, what: &'static str) -> Result<(), DecodeError> {
        if self.current() != expected {
            return Err(DecodeError::mismatch(what, self.current()));
        }
        self.bump()
    }

    /// Consumes a scalar of `kind`, returning its text.
    pub(crate) fn take_scalar(&mut self, kind: ScalarKind, what: &'static str) -> Result<String, DecodeError> {
        let text = self
            .current()
            .scalar_text(kind)
            .map(str::to_owned)
            .ok_or_else(|| DecodeError::mismatch(what, self.current()))?;
        self.bump()?;
        Ok(text)
    }

    /// Consumes an integer or float lexeme.
    pub(crate) fn take_number(&mut self, what: &'static str) -> Result<(ScalarKind, String), DecodeError> {
        let number = match self.current() {
            Token::Scalar {
                kind: kind @ (ScalarKind::Int | ScalarKind::Float),
                text,
            } => (*kind, text.clone()),
            other => return Err(DecodeError::mismatch(what, other)),
        };
        self.bump()?;
        Ok(number)
    }

    /// Consumes a field name standing for a map key.
    pub(crate) fn take_map_key(&mut self) -> Result<String, DecodeError> {
        let key = match self.current() {
            Token::FieldName(name) => name.clone(),
            other => return Err(DecodeError::mismatch("map key", other)),
        };
        self.bump()?;
        Ok(key)
    }

    fn frame(&mut self) -> Result<&mut ReorderFrame<'a>, DecodeError> {
        self.frames
            .last_mut()
            .ok_or_else(|| DecodeError::mismatch("record", "field outside of a record"))
    }

    /// Makes a replay of `tokens` the active source, parking the current one
    /// in the innermost frame.
    fn replay(&mut self, tokens: TokenSequence) -> Result<(), DecodeError> {
        let previous = core::mem::replace(&mut self.active, Box::new(ReplaySource::new(tokens)));
        trace!("switching to replay, depth {}", self.frames.len());
        self.frame()?.suspend(previous);
        Ok(())
    }

    fn resume(&mut self) -> Result<(), DecodeError> {
        if let Some(previous) = self.frame()?.resume() {
            trace!("resuming parked source, depth {}", self.frames.len());
            self.active = previous;
        }
        Ok(())
    }

    fn adjust_field(&mut self, field: &'a Field) -> Result<(), DecodeError> {
        if let Some(saved) = self.frame()?.take(&field.name) {
            trace!("replaying buffered field {:?}", field.name);
            return self.replay(saved);
        }

        while let Token::FieldName(name) = self.current() {
            let name = name.clone();
            self.bump()?;
            if name == field.name {
                return Ok(());
            }
            trace!("buffering field {name:?} while looking for {:?}", field.name);
            let value = self.active.capture_subtree()?;
            self.frame()?.save(name, value);
        }

        let declared = match self.options.default_lookup {
            DefaultLookup::Scoped => Some(field),
            DefaultLookup::SchemaWide => self.schema.find_field(&field.name),
        };
        let Some((ty, default)) = declared.and_then(|f| f.default.as_ref().map(|d| (&f.ty, d))) else {
            return Err(DecodeError::MissingRequiredField(field.name.clone()));
        };
        trace!("injecting default for field {:?}: {default}", field.name);
        let tokens = defaults::materialize(self.schema, ty, default)?;
        self.replay(tokens)
    }

    fn start_record(&mut self) -> Result<(), DecodeError> {
        self.expect(&Token::Start(Container::Object), "record start")?;
        self.frames.push(ReorderFrame::default());
        trace!("entered record, depth {}", self.frames.len());
        Ok(())
    }

    fn end_record(&mut self) -> Result<(), DecodeError> {
        while let Token::FieldName(name) = self.current() {
            let name = name.clone();
            self.bump()?;
            let value = self.active.capture_subtree()?;
            self.frame()?.save(name, value);
        }
        if !is_end(self.current(), Container::Object) {
            return Err(DecodeError::mismatch("record end", self.current()));
        }
        self.bump()?;

        let frame = self
            .frames
            .pop()
            .ok_or_else(|| DecodeError::mismatch("record", "record end"))?;
        trace!("left record, depth {}", self.frames.len());
        let leftover = frame.leftover();
        if leftover.is_empty() || self.options.unknown_fields == UnknownFieldPolicy::Ignore {
            Ok(())
        } else {
            Err(DecodeError::UnknownField(leftover))
        }
    }
}

impl<'a> ActionHandler<'a> for Cursor<'a> {
    fn do_action(&mut self, action: Action<'a>) -> Result<(), DecodeError> {
        match action {
            Action::RecordStart => self.start_record(),
            Action::FieldAdjust(field) => self.adjust_field(field),
            Action::FieldEnd => self.resume(),
            Action::RecordEnd => self.end_record(),
            Action::UnionEnd => self.expect(&Token::End(Container::Object), "union end"),
        }
    }
}
