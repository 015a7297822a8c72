use std::{
    collections::VecDeque,
    io::{self, BufRead},
};

/// Character source behind the tokenizer.
///
/// Holds the not-yet-lexed characters of the input. When it runs dry and a
/// reader is attached, it blocks on the reader for the next line; lines are
/// always complete UTF-8, so no code point is ever split across refills.
pub(crate) struct Buffer<'a> {
    chars: VecDeque<char>,
    reader: Option<Box<dyn BufRead + 'a>>,
    scratch: String,
}

impl<'a> Buffer<'a> {
    pub(crate) fn from_str(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            reader: None,
            scratch: String::new(),
        }
    }

    pub(crate) fn from_reader(reader: impl BufRead + 'a) -> Self {
        Self {
            chars: VecDeque::new(),
            reader: Some(Box::new(reader)),
            scratch: String::new(),
        }
    }

    pub(crate) fn push(&mut self, text: &str) {
        self.chars.extend(text.chars());
    }

    /// Returns the next character without consuming it, or `None` once the
    /// input is exhausted.
    pub(crate) fn peek(&mut self) -> io::Result<Option<char>> {
        while self.chars.is_empty() {
            let Some(reader) = self.reader.as_mut() else {
                return Ok(None);
            };
            self.scratch.clear();
            if reader.read_line(&mut self.scratch)? == 0 {
                self.reader = None;
                return Ok(None);
            }
            let line = core::mem::take(&mut self.scratch);
            self.push(&line);
            self.scratch = line;
        }
        Ok(self.chars.front().copied())
    }

    /// Consumes the character returned by the last [`peek`](Self::peek).
    pub(crate) fn next(&mut self) -> Option<char> {
        self.chars.pop_front()
    }

    /// Moves already-buffered characters matching `pred` into `dst`, returning
    /// how many were copied. Never touches the reader.
    pub(crate) fn copy_while(&mut self, dst: &mut String, pred: impl Fn(char) -> bool) -> usize {
        let mut copied = 0;
        while let Some(&c) = self.chars.front() {
            if !pred(c) {
                break;
            }
            dst.push(c);
            self.chars.pop_front();
            copied += 1;
        }
        copied
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::Buffer;

    #[test]
    fn refills_from_reader_line_by_line() {
        let mut buf = Buffer::from_reader(Cursor::new("ab\ncd"));
        let mut out = String::new();
        while let Some(c) = buf.peek().unwrap() {
            buf.next();
            out.push(c);
        }
        assert_eq!(out, "ab\ncd");
        assert_eq!(buf.peek().unwrap(), None);
    }

    #[test]
    fn copy_while_stops_at_predicate() {
        let mut buf = Buffer::from_str("123.5");
        let mut dst = String::new();
        assert_eq!(buf.copy_while(&mut dst, |c| c.is_ascii_digit()), 3);
        assert_eq!(dst, "123");
        assert_eq!(buf.peek().unwrap(), Some('.'));
    }
}
