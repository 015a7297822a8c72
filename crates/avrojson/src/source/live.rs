use super::TokenSource;
use crate::{error::DecodeError, lexer::Tokenizer, token::Token};

/// The physical input, read through the tokenizer one token at a time.
#[derive(Debug)]
pub struct LiveSource<'a> {
    lexer: Tokenizer<'a>,
    current: Token,
    lookahead: Option<Token>,
}

impl<'a> LiveSource<'a> {
    /// Wraps `lexer`, reading its first token.
    ///
    /// # Errors
    ///
    /// Propagates a failure of the first read.
    pub fn new(mut lexer: Tokenizer<'a>) -> Result<Self, DecodeError> {
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            lookahead: None,
        })
    }
}

impl TokenSource for LiveSource<'_> {
    fn current(&self) -> &Token {
        &self.current
    }

    fn peek(&mut self) -> Result<&Token, DecodeError> {
        if self.current.is_end_of_sequence() {
            return Ok(&self.current);
        }
        let next = match self.lookahead.take() {
            Some(tok) => tok,
            None => self.lexer.next_token()?,
        };
        Ok(self.lookahead.insert(next))
    }

    fn advance(&mut self) -> Result<&Token, DecodeError> {
        if !self.current.is_end_of_sequence() {
            self.current = match self.lookahead.take() {
                Some(tok) => tok,
                None => self.lexer.next_token()?,
            };
        }
        Ok(&self.current)
    }
}
