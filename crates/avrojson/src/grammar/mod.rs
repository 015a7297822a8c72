//! The grammar of a schema's read sequence and the automaton walking it.
//!
//! Productions are generated lazily: a [`Symbol::Type`] is only expanded when
//! the automaton reaches it, which keeps recursive schemas finite.
mod automaton;
mod symbol;

pub use automaton::Automaton;
pub use symbol::{Action, Symbol, Terminal};

use crate::error::DecodeError;

/// Resolves implicit actions on behalf of the automaton.
pub trait ActionHandler<'a> {
    /// Runs `action`.
    ///
    /// # Errors
    ///
    /// Any error aborts the read that triggered the action.
    fn do_action(&mut self, action: Action<'a>) -> Result<(), DecodeError>;
}
