//! Buffering of four-digit `\uXXXX` escapes.
//!
//! [`UnicodeEscapeBuffer`] accumulates ASCII hex digits and yields the UTF-16
//! code unit once four have been seen. Combining surrogate pairs into a
//! `char` is left to the tokenizer, which knows whether a second escape
//! follows.
use crate::error::SyntaxError;

#[derive(Debug)]
pub(crate) struct UnicodeEscapeBuffer {
    value: u16,
    len: u8,
}

impl UnicodeEscapeBuffer {
    pub fn new() -> Self {
        Self { value: 0, len: 0 }
    }

    pub fn reset(&mut self) {
        self.value = 0;
        self.len = 0;
    }

    /// Feeds one hex digit; returns the code unit after the fourth.
    pub fn feed(&mut self, c: char) -> Result<Option<u16>, SyntaxError> {
        let Some(digit) = c.to_digit(16) else {
            return Err(SyntaxError::InvalidUnicodeEscapeChar(c));
        };
        #[allow(clippy::cast_possible_truncation)]
        {
            self.value = (self.value << 4) | digit as u16;
        }
        self.len += 1;

        if self.len == 4 {
            let unit = self.value;
            self.reset();
            Ok(Some(unit))
        } else {
            Ok(None)
        }
    }
}

/// Combines a UTF-16 code unit (and, for a high surrogate, its low partner)
/// into a `char`.
pub(crate) fn decode_utf16_pair(high: u16, low: Option<u16>) -> Result<char, SyntaxError> {
    let code = match (high, low) {
        (0xD800..=0xDBFF, Some(low @ 0xDC00..=0xDFFF)) => {
            0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(low) - 0xDC00)
        }
        (0xD800..=0xDFFF, _) => return Err(SyntaxError::InvalidUnicodeEscapeSequence(high.into())),
        (unit, _) => u32::from(unit),
    };
    char::from_u32(code).ok_or(SyntaxError::InvalidUnicodeEscapeSequence(code))
}
