use log::trace;

use super::{Action, ActionHandler, Symbol, Terminal};
use crate::{
    error::{DecodeError, SchemaError},
    schema::{Schema, Type},
};

/// Stack machine over the grammar of one schema.
#[derive(Debug, Clone)]
pub struct Automaton<'a> {
    schema: &'a Schema,
    stack: Vec<Symbol<'a>>,
}

impl<'a> Automaton<'a> {
    #[must_use]
    pub fn new(schema: &'a Schema) -> Self {
        Self {
            schema,
            stack: vec![Symbol::Root(schema.root())],
        }
    }

    /// Back to the state before the first datum.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.stack.push(Symbol::Root(self.schema.root()));
    }

    /// Number of symbols on the stack; 1 between datums.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub fn top(&self) -> Option<&Symbol<'a>> {
        self.stack.last()
    }

    pub fn pop(&mut self) -> Option<Symbol<'a>> {
        self.stack.pop()
    }

    pub fn push(&mut self, symbol: Symbol<'a>) {
        self.stack.push(symbol);
    }

    /// Walks the grammar until `input` is matched, running every action and
    /// expanding every nonterminal on the way.
    ///
    /// # Errors
    ///
    /// [`DecodeError::TypeMismatch`] when a different terminal is reached;
    /// errors raised by `handler` are propagated.
    pub fn advance(
        &mut self,
        input: Terminal,
        handler: &mut impl ActionHandler<'a>,
    ) -> Result<(), DecodeError> {
        loop {
            let Some(top) = self.stack.pop() else {
                return Err(DecodeError::PrematureEndOfInput);
            };
            match top {
                Symbol::Terminal(t) if t == input => return Ok(()),
                Symbol::Terminal(t) => return Err(DecodeError::mismatch(t.to_string(), input)),
                Symbol::Action(action) => handler.do_action(action)?,
                Symbol::Repeater { end, .. } if end == input => return Ok(()),
                Symbol::Root(_) | Symbol::Type(_) | Symbol::Repeater { .. } => self.expand(top)?,
                Symbol::Alternative(_) | Symbol::FixedSize(_) | Symbol::EnumLabels(_) => {
                    return Err(DecodeError::mismatch(top.to_string(), input));
                }
            }
        }
    }

    /// Opens the next datum when only the root is left, so that
    /// [`process_implicit_actions`](Self::process_implicit_actions) can walk
    /// a datum that needs no reads, such as an empty record.
    pub fn begin_datum(&mut self) {
        if let [Symbol::Root(ty)] = self.stack.as_slice() {
            let ty = *ty;
            self.stack.push(Symbol::Type(ty));
        }
    }

    /// Runs the trailing actions sitting on top of the stack.
    ///
    /// # Errors
    ///
    /// Propagates errors raised by `handler`.
    pub fn process_trailing_actions(
        &mut self,
        handler: &mut impl ActionHandler<'a>,
    ) -> Result<(), DecodeError> {
        while let Some(&Symbol::Action(action)) = self.stack.last() {
            if !action.is_trailing() {
                break;
            }
            self.stack.pop();
            handler.do_action(action)?;
        }
        Ok(())
    }

    /// Runs actions and expands nonterminals until a terminal is on top or
    /// only the root remains. Completes a datum whose last read has already
    /// happened.
    ///
    /// # Errors
    ///
    /// Propagates errors raised by `handler`.
    pub fn process_implicit_actions(
        &mut self,
        handler: &mut impl ActionHandler<'a>,
    ) -> Result<(), DecodeError> {
        while self.stack.len() > 1 {
            let Some(&top) = self.stack.last() else {
                break;
            };
            match top {
                Symbol::Action(action) => {
                    self.stack.pop();
                    handler.do_action(action)?;
                }
                Symbol::Terminal(_)
                | Symbol::Alternative(_)
                | Symbol::FixedSize(_)
                | Symbol::EnumLabels(_)
                | Symbol::Repeater { .. } => break,
                Symbol::Root(_) | Symbol::Type(_) => {
                    self.stack.pop();
                    self.expand(top)?;
                }
            }
        }
        Ok(())
    }

    /// Pushes the production of a nonterminal, last symbol first.
    fn expand(&mut self, symbol: Symbol<'a>) -> Result<(), DecodeError> {
        match symbol {
            Symbol::Root(ty) => {
                self.stack.push(symbol);
                self.stack.push(Symbol::Type(ty));
            }
            Symbol::Type(ty) => self.expand_type(ty)?,
            Symbol::Repeater { item, map, .. } => {
                self.stack.push(symbol);
                self.stack.push(Symbol::Terminal(Terminal::ItemEnd));
                self.stack.push(Symbol::Type(item));
                if map {
                    self.stack.push(Symbol::Terminal(Terminal::MapKeyMarker));
                    self.stack.push(Symbol::Terminal(Terminal::String));
                }
            }
            other => self.stack.push(other),
        }
        Ok(())
    }

    fn expand_type(&mut self, ty: &'a Type) -> Result<(), DecodeError> {
        let schema: &'a Schema = self.schema;
        let terminal = match schema.resolve(ty)? {
            Type::Null => Terminal::Null,
            Type::Boolean => Terminal::Boolean,
            Type::Int => Terminal::Int,
            Type::Long => Terminal::Long,
            Type::Float => Terminal::Float,
            Type::Double => Terminal::Double,
            Type::Bytes => Terminal::Bytes,
            Type::String => Terminal::String,
            Type::Record(record) => {
                trace!("expanding record {}", record.name.fullname());
                self.stack.push(Symbol::Action(Action::RecordEnd));
                for field in record.fields.iter().rev() {
                    self.stack.push(Symbol::Action(Action::FieldEnd));
                    self.stack.push(Symbol::Type(&field.ty));
                    self.stack.push(Symbol::Action(Action::FieldAdjust(field)));
                }
                self.stack.push(Symbol::Action(Action::RecordStart));
                return Ok(());
            }
            Type::Enum(enumeration) => {
                self.stack.push(Symbol::EnumLabels(enumeration));
                Terminal::Enum
            }
            Type::Fixed(fixed) => {
                self.stack.push(Symbol::FixedSize(fixed.size));
                Terminal::Fixed
            }
            Type::Array(items) => {
                self.stack.push(Symbol::Repeater {
                    end: Terminal::ArrayEnd,
                    item: items,
                    map: false,
                });
                Terminal::ArrayStart
            }
            Type::Map(values) => {
                self.stack.push(Symbol::Repeater {
                    end: Terminal::MapEnd,
                    item: values,
                    map: true,
                });
                Terminal::MapStart
            }
            Type::Union(union) => {
                self.stack.push(Symbol::Alternative(union));
                Terminal::Union
            }
            Type::Ref(name) => return Err(SchemaError::UnknownType(name.clone()).into()),
        };
        self.stack.push(Symbol::Terminal(terminal));
        Ok(())
    }
}
