use crate::token::{ScalarKind, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedLiteralValue {
    Null,
    True,
    False,
}

/// What happened after feeding one more character into the literal matcher?
pub enum Step {
    /// Character matched, but the literal is not finished yet.
    NeedMore,
    /// Character matched *and* it was the last byte of the literal.
    Done(Token),
    /// Character did **not** match the expected byte.
    Reject,
}

/// `None` while no literal is in flight, otherwise the bytes still expected.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ExpectedLiteralBuffer(Option<(&'static [u8], ExpectedLiteralValue)>);

impl ExpectedLiteralBuffer {
    pub fn none() -> Self {
        ExpectedLiteralBuffer(None)
    }

    /// Start matching after the *first* character (`n`, `t`, or `f`).
    pub fn new(first: char) -> Self {
        match first {
            'n' => ExpectedLiteralBuffer(Some((b"ull", ExpectedLiteralValue::Null))),
            't' => ExpectedLiteralBuffer(Some((b"rue", ExpectedLiteralValue::True))),
            'f' => ExpectedLiteralBuffer(Some((b"alse", ExpectedLiteralValue::False))),
            _ => ExpectedLiteralBuffer::none(),
        }
    }

    pub fn step(&mut self, c: char) -> Step {
        let Some((bytes, kind)) = self.0.take() else {
            return Step::Reject;
        };

        match bytes.split_first() {
            Some((&expected, rest)) if expected as char == c => {
                if rest.is_empty() {
                    Step::Done(match kind {
                        ExpectedLiteralValue::Null => Token::null(),
                        ExpectedLiteralValue::True => Token::scalar(ScalarKind::Bool, "true"),
                        ExpectedLiteralValue::False => Token::scalar(ScalarKind::Bool, "false"),
                    })
                } else {
                    self.0 = Some((rest, kind));
                    Step::NeedMore
                }
            }
            _ => {
                self.0 = Some((bytes, kind));
                Step::Reject
            }
        }
    }
}
