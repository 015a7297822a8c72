//! A pull tokenizer for RFC 8259 JSON.
//!
//! The tokenizer turns characters into [`Token`]s one at a time, validating
//! structure as it goes. Several whitespace-separated root values may follow
//! each other; [`Token::EndOfSequence`] is produced only when the input ends
//! between root values.
//!
//! ```
//! use avrojson::{Container, Token, Tokenizer};
//!
//! let mut tokens = Tokenizer::from_str(r#"{"a": 1} []"#);
//! assert_eq!(tokens.next_token().unwrap(), Token::Start(Container::Object));
//! assert_eq!(tokens.next_token().unwrap(), Token::FieldName("a".into()));
//! ```
mod buffer;
mod escape_buffer;
mod literal_buffer;

use std::io::BufRead;

use buffer::Buffer;
use escape_buffer::{UnicodeEscapeBuffer, decode_utf16_pair};
use literal_buffer::{ExpectedLiteralBuffer, Step};

use crate::{
    error::{DecodeError, SyntaxError},
    token::{Container, ScalarKind, Token},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PeekedChar {
    Char(char),
    /// The input is exhausted.
    EndOfInput,
}

use PeekedChar::{Char, EndOfInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Start,
    BeforeFirstPropertyName,
    BeforePropertyName,
    AfterPropertyName,
    BeforePropertyValue,
    BeforeFirstArrayValue,
    BeforeArrayValue,
    AfterPropertyValue,
    AfterArrayValue,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberState {
    Start,
    Sign,
    Zero,
    DecimalInteger,
    DecimalPoint,
    DecimalFraction,
    DecimalExponent,
    DecimalExponentSign,
    DecimalExponentInteger,
}

/// Pull tokenizer over a string or a blocking reader.
pub struct Tokenizer<'a> {
    source: Buffer<'a>,
    parse_state: ParseState,
    stack: Vec<Container>,
    buffer: String,
    escape: UnicodeEscapeBuffer,
    line: usize,
    column: usize,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    /// Tokenizes an in-memory document.
    #[allow(clippy::should_implement_trait)]
    #[must_use]
    pub fn from_str(text: &str) -> Self {
        Self::with_buffer(Buffer::from_str(text))
    }

    /// Tokenizes a reader, pulling one line at a time as tokens are requested.
    pub fn from_reader(reader: impl BufRead + 'a) -> Self {
        Self::with_buffer(Buffer::from_reader(reader))
    }

    fn with_buffer(source: Buffer<'a>) -> Self {
        Self {
            source,
            parse_state: ParseState::Start,
            stack: Vec::new(),
            buffer: String::new(),
            escape: UnicodeEscapeBuffer::new(),
            line: 1,
            column: 1,
            finished: false,
        }
    }

    /// 1-based line and column of the next unread character.
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        (self.line, self.column)
    }

    /// Produces the next token.
    ///
    /// # Errors
    ///
    /// Malformed input yields [`DecodeError::Syntax`]; a failing reader
    /// yields [`DecodeError::Io`]. After an error the tokenizer keeps failing.
    pub fn next_token(&mut self) -> Result<Token, DecodeError> {
        use ParseState::{
            AfterArrayValue, AfterPropertyName, AfterPropertyValue, BeforeArrayValue,
            BeforeFirstArrayValue, BeforeFirstPropertyName, BeforePropertyName,
            BeforePropertyValue, Error, Start,
        };

        loop {
            if self.parse_state == Error {
                return Err(self.syntax(SyntaxError::SyntaxError("input was already rejected")));
            }
            self.skip_whitespace()?;
            let next = self.peek_char()?;
            match (self.parse_state, next) {
                (Start, EndOfInput) => return Ok(Token::EndOfSequence),
                (BeforeFirstArrayValue, Char(']')) => return Ok(self.close(Container::Array)),
                (Start | BeforePropertyValue | BeforeFirstArrayValue | BeforeArrayValue, Char(c)) => {
                    return self.lex_value(c);
                }
                (BeforeFirstPropertyName, Char('}')) => return Ok(self.close(Container::Object)),
                (BeforeFirstPropertyName | BeforePropertyName, Char('"')) => {
                    let name = self.lex_string()?;
                    self.parse_state = AfterPropertyName;
                    return Ok(Token::FieldName(name));
                }
                (AfterPropertyName, Char(':')) => {
                    self.advance_char();
                    self.parse_state = BeforePropertyValue;
                }
                (AfterPropertyValue, Char(',')) => {
                    self.advance_char();
                    self.parse_state = BeforePropertyName;
                }
                (AfterPropertyValue, Char('}')) => return Ok(self.close(Container::Object)),
                (AfterArrayValue, Char(',')) => {
                    self.advance_char();
                    self.parse_state = BeforeArrayValue;
                }
                (AfterArrayValue, Char(']')) => return Ok(self.close(Container::Array)),
                (_, c) => return Err(self.invalid_char(c)),
            }
        }
    }

    fn lex_value(&mut self, first: char) -> Result<Token, DecodeError> {
        let token = match first {
            '{' | '[' => {
                self.advance_char();
                let (container, state) = if first == '{' {
                    (Container::Object, ParseState::BeforeFirstPropertyName)
                } else {
                    (Container::Array, ParseState::BeforeFirstArrayValue)
                };
                self.stack.push(container);
                self.parse_state = state;
                return Ok(Token::Start(container));
            }
            '"' => Token::scalar(ScalarKind::String, self.lex_string()?),
            'n' | 't' | 'f' => self.lex_literal(first)?,
            '-' | '0'..='9' => self.lex_number()?,
            c => return Err(self.invalid_char(Char(c))),
        };
        self.after_value();
        Ok(token)
    }

    fn lex_literal(&mut self, first: char) -> Result<Token, DecodeError> {
        self.advance_char();
        let mut expected = ExpectedLiteralBuffer::new(first);
        loop {
            match self.peek_char()? {
                Char(c) => match expected.step(c) {
                    Step::NeedMore => self.advance_char(),
                    Step::Done(tok) => {
                        self.advance_char();
                        return Ok(tok);
                    }
                    Step::Reject => return Err(self.invalid_char(Char(c))),
                },
                c @ EndOfInput => return Err(self.invalid_char(c)),
            }
        }
    }

    fn lex_number(&mut self) -> Result<Token, DecodeError> {
        use NumberState::{
            DecimalExponent, DecimalExponentInteger, DecimalExponentSign, DecimalFraction,
            DecimalInteger, DecimalPoint, Sign, Start, Zero,
        };

        self.buffer.clear();
        let mut state = Start;
        loop {
            let next = self.peek_char()?;
            state = match (state, next) {
                (Start, Char('-')) => Sign,
                (Start | Sign, Char('0')) => Zero,
                (Start | Sign, Char('1'..='9')) => DecimalInteger,
                (Zero, Char('0'..='9')) => {
                    return Err(self.syntax(SyntaxError::SyntaxError("leading zeros are not allowed")));
                }
                (Zero | DecimalInteger, Char('.')) => DecimalPoint,
                (Zero | DecimalInteger | DecimalFraction, Char('e' | 'E')) => DecimalExponent,
                (DecimalInteger, Char('0'..='9')) => DecimalInteger,
                (DecimalPoint | DecimalFraction, Char('0'..='9')) => DecimalFraction,
                (DecimalExponent, Char('+' | '-')) => DecimalExponentSign,
                (
                    DecimalExponent | DecimalExponentSign | DecimalExponentInteger,
                    Char('0'..='9'),
                ) => DecimalExponentInteger,
                (Zero | DecimalInteger | DecimalFraction | DecimalExponentInteger, _) => break,
                (_, c) => return Err(self.invalid_char(c)),
            };
            if let Char(c) = next {
                self.advance_char();
                self.buffer.push(c);
            }
            if matches!(state, DecimalInteger | DecimalFraction | DecimalExponentInteger) {
                let copied = self
                    .source
                    .copy_while(&mut self.buffer, |d| d.is_ascii_digit());
                self.column += copied;
            }
        }

        let kind = if self.buffer.contains(['.', 'e', 'E']) {
            ScalarKind::Float
        } else {
            ScalarKind::Int
        };
        Ok(Token::scalar(kind, core::mem::take(&mut self.buffer)))
    }

    fn lex_string(&mut self) -> Result<String, DecodeError> {
        // opening quote
        self.advance_char();
        self.buffer.clear();
        loop {
            let copied = self
                .source
                .copy_while(&mut self.buffer, |c| c != '"' && c != '\\' && c >= ' ');
            self.column += copied;

            match self.peek_char()? {
                Char('"') => {
                    self.advance_char();
                    return Ok(core::mem::take(&mut self.buffer));
                }
                Char('\\') => {
                    self.advance_char();
                    let c = self.lex_escape()?;
                    self.buffer.push(c);
                }
                Char(c) if c < ' ' => return Err(self.invalid_char(Char(c))),
                Char(c) => {
                    self.advance_char();
                    self.buffer.push(c);
                }
                c @ EndOfInput => return Err(self.invalid_char(c)),
            }
        }
    }

    fn lex_escape(&mut self) -> Result<char, DecodeError> {
        let c = match self.peek_char()? {
            Char(c) => c,
            c @ EndOfInput => return Err(self.invalid_char(c)),
        };
        self.advance_char();
        Ok(match c {
            '"' => '"',
            '\\' => '\\',
            '/' => '/',
            'b' => '\u{08}',
            'f' => '\u{0C}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'u' => {
                let high = self.lex_code_unit()?;
                let low = if (0xD800..=0xDBFF).contains(&high) {
                    self.expect_char('\\')?;
                    self.expect_char('u')?;
                    Some(self.lex_code_unit()?)
                } else {
                    None
                };
                decode_utf16_pair(high, low).map_err(|err| self.syntax(err))?
            }
            other => return Err(self.syntax(SyntaxError::InvalidCharacter(other))),
        })
    }

    fn lex_code_unit(&mut self) -> Result<u16, DecodeError> {
        self.escape.reset();
        loop {
            let c = match self.peek_char()? {
                Char(c) => c,
                c @ EndOfInput => return Err(self.invalid_char(c)),
            };
            match self.escape.feed(c) {
                Ok(unit) => {
                    self.advance_char();
                    if let Some(unit) = unit {
                        return Ok(unit);
                    }
                }
                Err(err) => return Err(self.syntax(err)),
            }
        }
    }

    fn expect_char(&mut self, expected: char) -> Result<(), DecodeError> {
        match self.peek_char()? {
            Char(c) if c == expected => {
                self.advance_char();
                Ok(())
            }
            c => Err(self.invalid_char(c)),
        }
    }

    fn close(&mut self, container: Container) -> Token {
        self.advance_char();
        self.stack.pop();
        self.after_value();
        Token::End(container)
    }

    fn after_value(&mut self) {
        self.parse_state = match self.stack.last() {
            Some(Container::Object) => ParseState::AfterPropertyValue,
            Some(Container::Array) => ParseState::AfterArrayValue,
            None => ParseState::Start,
        };
    }

    fn skip_whitespace(&mut self) -> Result<(), DecodeError> {
        while let Char(' ' | '\t' | '\n' | '\r') = self.peek_char()? {
            self.advance_char();
        }
        Ok(())
    }

    #[inline]
    fn peek_char(&mut self) -> Result<PeekedChar, DecodeError> {
        Ok(match self.source.peek()? {
            Some(c) => Char(c),
            None => EndOfInput,
        })
    }

    #[inline]
    fn advance_char(&mut self) {
        if let Some(ch) = self.source.next() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn invalid_char(&mut self, c: PeekedChar) -> DecodeError {
        match c {
            Char(c) => self.syntax(SyntaxError::InvalidCharacter(c)),
            EndOfInput => self.syntax(SyntaxError::UnexpectedEndOfInput),
        }
    }

    fn syntax(&mut self, source: SyntaxError) -> DecodeError {
        self.parse_state = ParseState::Error;
        DecodeError::Syntax {
            source,
            line: self.line,
            column: self.column,
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<Token, DecodeError>;

    /// Yields tokens up to, but excluding, [`Token::EndOfSequence`]; stops
    /// after the first error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_token() {
            Ok(Token::EndOfSequence) => {
                self.finished = true;
                None
            }
            Ok(token) => Some(Ok(token)),
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

impl core::fmt::Debug for Tokenizer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tokenizer")
            .field("parse_state", &self.parse_state)
            .field("stack", &self.stack)
            .field("line", &self.line)
            .field("column", &self.column)
            .finish_non_exhaustive()
    }
}
