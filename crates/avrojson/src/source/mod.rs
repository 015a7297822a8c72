//! Token sources: the cursor abstraction the decoder reads from.
//!
//! A [`TokenSource`] has a current token and can move past it. The decoder
//! holds exactly one active source at a time; it is either the
//! [`LiveSource`] over the physical input, or a [`ReplaySource`] over a
//! captured field or a materialized default.
mod live;
mod replay;

pub use live::LiveSource;
pub use replay::ReplaySource;

use crate::{
    error::DecodeError,
    token::{Container, Token, TokenSequence},
};

/// Cursor over a stream of tokens.
pub trait TokenSource {
    /// The token under the cursor. [`Token::EndOfSequence`] once exhausted.
    fn current(&self) -> &Token;

    /// The token after the current one, without moving.
    ///
    /// # Errors
    ///
    /// Propagates tokenizer failures.
    fn peek(&mut self) -> Result<&Token, DecodeError>;

    /// Moves to the next token and returns it.
    ///
    /// # Errors
    ///
    /// Propagates tokenizer failures.
    fn advance(&mut self) -> Result<&Token, DecodeError>;

    /// Consumes the balanced subtree starting at the current token and
    /// returns it as a terminated sequence.
    ///
    /// # Errors
    ///
    /// [`DecodeError::PrematureEndOfInput`] if the subtree is cut short.
    fn capture_subtree(&mut self) -> Result<TokenSequence, DecodeError> {
        let mut tokens = Vec::new();
        walk_subtree(self, |tok| tokens.push(tok.clone()))?;
        Ok(TokenSequence::new(tokens))
    }

    /// Consumes the balanced subtree starting at the current token.
    ///
    /// # Errors
    ///
    /// [`DecodeError::PrematureEndOfInput`] if the subtree is cut short.
    fn skip_subtree(&mut self) -> Result<(), DecodeError> {
        walk_subtree(self, |_| ())
    }
}

fn walk_subtree<S: TokenSource + ?Sized>(
    source: &mut S,
    mut visit: impl FnMut(&Token),
) -> Result<(), DecodeError> {
    let mut depth = 0usize;
    loop {
        let tok = source.current();
        match tok {
            Token::EndOfSequence => return Err(DecodeError::PrematureEndOfInput),
            Token::Start(_) => depth += 1,
            Token::End(_) => depth = depth.saturating_sub(1),
            Token::FieldName(_) | Token::Scalar { .. } => {}
        }
        visit(tok);
        let done = depth == 0;
        source.advance()?;
        if done {
            return Ok(());
        }
    }
}

/// `true` if `tok` closes a container of kind `container`.
pub(crate) fn is_end(tok: &Token, container: Container) -> bool {
    matches!(tok, Token::End(c) if *c == container)
}
