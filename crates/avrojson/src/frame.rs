use std::collections::HashMap;

use crate::{source::TokenSource, token::TokenSequence};

/// Per-record state for out-of-order fields.
///
/// Fields met while searching for another one are parked here until the
/// grammar asks for them. While one of them (or a default) is being
/// replayed, `continuation` holds the source to return to when the field
/// ends.
#[derive(Default)]
pub(crate) struct ReorderFrame<'a> {
    saved: HashMap<String, TokenSequence>,
    continuation: Option<Box<dyn TokenSource + 'a>>,
}

impl<'a> ReorderFrame<'a> {
    /// Parks `value` under `name`, replacing an earlier value of the same name.
    pub(crate) fn save(&mut self, name: String, value: TokenSequence) {
        self.saved.insert(name, value);
    }

    pub(crate) fn take(&mut self, name: &str) -> Option<TokenSequence> {
        self.saved.remove(name)
    }

    pub(crate) fn suspend(&mut self, source: Box<dyn TokenSource + 'a>) {
        debug_assert!(self.continuation.is_none(), "frame already suspended");
        self.continuation = Some(source);
    }

    pub(crate) fn resume(&mut self) -> Option<Box<dyn TokenSource + 'a>> {
        self.continuation.take()
    }

    /// Names of the fields nobody asked for, sorted.
    pub(crate) fn leftover(&self) -> Vec<String> {
        let mut names: Vec<String> = self.saved.keys().cloned().collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        source::ReplaySource,
        token::{ScalarKind, Token},
    };

    fn seq(text: &str) -> TokenSequence {
        TokenSequence::new(vec![Token::scalar(ScalarKind::String, text)])
    }

    #[test]
    fn take_removes_and_leftover_is_sorted() {
        let mut frame = ReorderFrame::default();
        frame.save("zeta".into(), seq("z"));
        frame.save("alpha".into(), seq("a"));
        frame.save("mid".into(), seq("m"));
        assert_eq!(frame.take("mid"), Some(seq("m")));
        assert_eq!(frame.take("mid"), None);
        assert_eq!(frame.leftover(), ["alpha", "zeta"]);
    }

    #[test]
    fn later_duplicate_wins() {
        let mut frame = ReorderFrame::default();
        frame.save("a".into(), seq("first"));
        frame.save("a".into(), seq("second"));
        assert_eq!(frame.take("a"), Some(seq("second")));
    }

    #[test]
    fn suspend_then_resume() {
        let mut frame = ReorderFrame::default();
        assert!(frame.resume().is_none());
        frame.suspend(Box::new(ReplaySource::new(seq("x"))));
        let source = frame.resume().unwrap();
        assert_eq!(source.current(), &Token::scalar(ScalarKind::String, "x"));
        assert!(frame.resume().is_none());
    }
}
