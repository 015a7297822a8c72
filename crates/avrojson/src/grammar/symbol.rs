use core::fmt;

use crate::schema::{EnumType, Field, Type, UnionType};

/// A grammar terminal, matched against the decoder's read requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terminal {
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    String,
    Bytes,
    Fixed,
    Enum,
    ArrayStart,
    ArrayEnd,
    MapStart,
    MapEnd,
    ItemEnd,
    Union,
    /// Follows [`Terminal::String`] when the string is a map key.
    MapKeyMarker,
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Terminal::Null => "null",
            Terminal::Boolean => "boolean",
            Terminal::Int => "int",
            Terminal::Long => "long",
            Terminal::Float => "float",
            Terminal::Double => "double",
            Terminal::String => "string",
            Terminal::Bytes => "bytes",
            Terminal::Fixed => "fixed",
            Terminal::Enum => "enum",
            Terminal::ArrayStart => "array start",
            Terminal::ArrayEnd => "array end",
            Terminal::MapStart => "map start",
            Terminal::MapEnd => "map end",
            Terminal::ItemEnd => "item end",
            Terminal::Union => "union",
            Terminal::MapKeyMarker => "map key",
        })
    }
}

/// An implicit action, run by the [`ActionHandler`](super::ActionHandler)
/// when the automaton reaches it.
#[derive(Debug, Clone, Copy)]
pub enum Action<'a> {
    RecordStart,
    RecordEnd,
    /// Position the input on the value of this field.
    FieldAdjust(&'a Field),
    FieldEnd,
    /// Consume the closing brace of a tagged union wrapper.
    UnionEnd,
}

impl Action<'_> {
    /// Trailing actions run eagerly before the next read; the others run
    /// only when the automaton advances through them.
    #[must_use]
    pub fn is_trailing(&self) -> bool {
        matches!(self, Action::RecordEnd | Action::FieldEnd | Action::UnionEnd)
    }
}

/// One entry of the automaton stack.
#[derive(Debug, Clone, Copy)]
pub enum Symbol<'a> {
    Terminal(Terminal),
    /// Bottom of the stack; re-pushes itself so several datums can be read.
    Root(&'a Type),
    /// Nonterminal standing for the production of a schema type.
    Type(&'a Type),
    /// Array or map body, repeated until `end` is requested.
    Repeater {
        end: Terminal,
        item: &'a Type,
        map: bool,
    },
    /// Data symbols, popped by the decoder right after their terminal.
    Alternative(&'a UnionType),
    FixedSize(usize),
    EnumLabels(&'a EnumType),
    Action(Action<'a>),
}

impl fmt::Display for Symbol<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Terminal(t) => t.fmt(f),
            Symbol::Root(ty) | Symbol::Type(ty) => f.write_str(ty.label()),
            Symbol::Repeater { map: false, .. } => f.write_str("array items"),
            Symbol::Repeater { map: true, .. } => f.write_str("map entries"),
            Symbol::Alternative(_) => f.write_str("union alternative"),
            Symbol::FixedSize(n) => write!(f, "fixed({n})"),
            Symbol::EnumLabels(e) => f.write_str(e.name.fullname()),
            Symbol::Action(a) => write!(f, "{a:?}"),
        }
    }
}
