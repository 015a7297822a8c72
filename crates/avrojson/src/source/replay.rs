use super::TokenSource;
use crate::{
    error::DecodeError,
    token::{Token, TokenSequence},
};

/// Replays a captured [`TokenSequence`]. Never performs I/O.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    tokens: TokenSequence,
    pos: usize,
}

impl ReplaySource {
    #[must_use]
    pub fn new(tokens: TokenSequence) -> Self {
        Self { tokens, pos: 0 }
    }

    fn last(&self) -> usize {
        self.tokens.len() - 1
    }
}

impl TokenSource for ReplaySource {
    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek(&mut self) -> Result<&Token, DecodeError> {
        Ok(&self.tokens[(self.pos + 1).min(self.last())])
    }

    fn advance(&mut self) -> Result<&Token, DecodeError> {
        self.pos = (self.pos + 1).min(self.last());
        Ok(&self.tokens[self.pos])
    }
}
