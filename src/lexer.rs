//! The lexer.
//!
//! The lexer drains the tape produced by the structural scanner and
//! assembles logical tokens from it: contiguous words, quoted strings, and
//! the newlines that end a record entry. It understands the contour rules
//! of the zone file grammar -- parentheses turn newlines into white space,
//! semicolons start comments, backslashes start escapes that may even hide
//! a quote or a newline -- and it keeps the line counter that diagnostics
//! are based on.
//!
//! Tokens borrow their bytes straight from the input window, escape
//! sequences and all. Decoding escapes is left to the consumers, which
//! need to see them anyway (an escaped dot in a domain name is not a label
//! separator). When the tape runs dry in the middle of a token, the window
//! is rewound to the token start and refilled, so a token is always handed
//! out in one piece. A token longer than the entire window is an error.

use crate::error::{Diagnostic, Error};
use crate::scanner::{Code, Tape, Target};
use crate::source::{Source, Window};

//------------ Token ---------------------------------------------------------

/// A logical token.
#[derive(Debug)]
pub(crate) enum Token<'a> {
    /// A run of unquoted word bytes, escapes intact.
    Contiguous(&'a [u8]),

    /// The interior of a quoted string, escapes intact.
    Quoted(&'a [u8]),

    /// A newline at group level zero, ending the current entry.
    Delimiter,

    /// The end of the input.
    Eof,
}

/// A token returned together with its surroundings.
#[derive(Debug)]
pub(crate) struct Lexed<'a> {
    /// The token itself.
    pub token: Token<'a>,

    /// Whether white space came between this token and the previous one.
    ///
    /// A record line whose first token has this set has no owner field.
    pub has_space: bool,
}

/// A data-carrying token, as returned by [`Lexer::field`].
#[derive(Debug)]
pub(crate) struct Field<'a> {
    /// The raw bytes, escapes intact.
    pub bytes: &'a [u8],

    /// Whether the token was a quoted string.
    pub quoted: bool,
}

//------------ Raw -----------------------------------------------------------

/// The window span of a token, before borrowing the bytes.
///
/// Keeping spans instead of slices lets the scan loop hand a token through
/// the one-token pushback slot without fighting the borrow checker.
#[derive(Clone, Copy, Debug)]
struct Raw {
    kind: RawKind,
    start: usize,
    end: usize,
    has_space: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum RawKind {
    Contiguous,
    Quoted,
    Delimiter,
    Eof,
}

//------------ Lexer ---------------------------------------------------------

/// The tokenizer for one input frame.
pub(crate) struct Lexer<'i> {
    /// The logical name of the input, for diagnostics.
    name: Box<str>,

    /// Where the bytes come from.
    source: Source<'i>,

    /// The input window.
    window: Window,

    /// The structural index of the current window.
    tape: Tape,

    /// The scanner implementation filling the tape.
    target: Target,

    /// Whether the source is exhausted.
    eof: bool,

    /// Offset of the first window byte not consumed yet.
    pos: usize,

    /// The current 1-based line number.
    line: usize,

    /// Window offset of the first byte of the current line.
    ///
    /// Goes negative when the line start has been compacted away.
    line_start: isize,

    /// The parenthesis nesting depth.
    group: usize,

    /// Whether we are inside a comment.
    comment: bool,

    /// Whether white space was skipped since the last token.
    has_space: bool,

    /// Whether the last returned token ended its line.
    start_of_line: bool,

    /// A token read ahead and pushed back.
    pending: Option<Raw>,
}

impl<'i> Lexer<'i> {
    /// Creates a lexer over the given source.
    pub fn new(
        name: impl Into<Box<str>>,
        source: Source<'i>,
        target: Target,
    ) -> Self {
        Lexer {
            name: name.into(),
            source,
            window: Window::new(),
            tape: Tape::new(),
            target,
            eof: false,
            pos: 0,
            line: 1,
            line_start: 0,
            group: 0,
            comment: false,
            has_space: false,
            start_of_line: false,
            pending: None,
        }
    }

    /// Returns the logical name of the input.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the current line number.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Creates a syntax error at the current position.
    pub fn syntax(&self, message: &'static str) -> Error {
        Error::Syntax(Diagnostic::new(self.name.clone(), self.line, message))
    }

    /// Creates a semantic error at the current position.
    pub fn semantic(&self, message: String) -> Error {
        Error::Semantic(Diagnostic::new(self.name.clone(), self.line, message))
    }

    /// Returns the next token.
    pub fn next(&mut self) -> Result<Lexed<'_>, Error> {
        let raw = self.raw_next()?;
        Ok(Lexed {
            has_space: raw.has_space,
            token: self.materialize(raw),
        })
    }

    /// Returns the next token, which must carry data.
    ///
    /// Running into the end of the entry instead is a semantic error; the
    /// delimiter is left for the caller.
    pub fn field(&mut self) -> Result<Field<'_>, Error> {
        let raw = self.raw_next()?;
        match raw.kind {
            RawKind::Delimiter | RawKind::Eof => {
                self.pending = Some(raw);
                Err(self.semantic("missing field".into()))
            }
            RawKind::Contiguous | RawKind::Quoted => Ok(Field {
                bytes: &self.window.valid()[raw.start..raw.end],
                quoted: raw.kind == RawKind::Quoted,
            }),
        }
    }

    /// Returns whether the next token ends the entry, without consuming it.
    pub fn at_end_of_entry(&mut self) -> Result<bool, Error> {
        let raw = self.raw_next()?;
        let end = matches!(raw.kind, RawKind::Delimiter | RawKind::Eof);
        self.pending = Some(raw);
        Ok(end)
    }

    /// Requires the entry to end here, consuming the delimiter.
    pub fn expect_end_of_entry(&mut self) -> Result<(), Error> {
        let raw = self.raw_next()?;
        match raw.kind {
            RawKind::Delimiter | RawKind::Eof => Ok(()),
            _ => {
                self.pending = Some(raw);
                Err(self.semantic("trailing data at end of entry".into()))
            }
        }
    }

    /// Skips the `\#` marker introducing generic record data.
    ///
    /// Returns whether the marker was present; if not, nothing is
    /// consumed.
    pub fn skip_unknown_marker(&mut self) -> Result<bool, Error> {
        let raw = self.raw_next()?;
        if raw.kind == RawKind::Contiguous
            && &self.window.valid()[raw.start..raw.end] == br"\#"
        {
            return Ok(true);
        }
        self.pending = Some(raw);
        Ok(false)
    }

    /// Skips to the start of the next entry.
    ///
    /// Used to resume parsing behind a record that was dropped because of
    /// a recoverable error. Consumes tokens up to and including the next
    /// delimiter at group level zero; does nothing when the error was
    /// detected at the end of an entry.
    pub fn resync(&mut self) -> Result<(), Error> {
        while !self.start_of_line {
            self.raw_next()?;
        }
        Ok(())
    }

    /// Returns the next token as a window span.
    fn raw_next(&mut self) -> Result<Raw, Error> {
        let raw = match self.pending.take() {
            Some(raw) => raw,
            None => loop {
                if let Some(raw) = self.step()? {
                    break raw;
                }
            },
        };
        self.start_of_line =
            matches!(raw.kind, RawKind::Delimiter | RawKind::Eof);
        Ok(raw)
    }

    /// Borrows the bytes of a span.
    fn materialize(&self, raw: Raw) -> Token<'_> {
        match raw.kind {
            RawKind::Contiguous => {
                Token::Contiguous(&self.window.valid()[raw.start..raw.end])
            }
            RawKind::Quoted => {
                Token::Quoted(&self.window.valid()[raw.start..raw.end])
            }
            RawKind::Delimiter => Token::Delimiter,
            RawKind::Eof => Token::Eof,
        }
    }

    /// Processes one tape entry.
    ///
    /// Returns a token span when one is complete. `None` means progress
    /// was made -- entries skipped or the window refilled -- and the
    /// caller should come around again.
    fn step(&mut self) -> Result<Option<Raw>, Error> {
        let Some(index) = self.tape.peek() else {
            if self.eof {
                // The sentinel entry is never consumed, so an empty tape
                // at end of input cannot happen; be defensive anyway.
                return Ok(Some(self.end_of_input()?));
            }
            // No structural bytes left: whatever remains of the window
            // belongs to the run we just consumed. Drop it and refill.
            let keep = self.window.len();
            self.refill(keep)?;
            return Ok(None);
        };
        let offset = index.offset as usize;
        if offset < self.pos {
            // Left over from a span an escape sequence jumped across.
            self.tape.advance();
            return Ok(None);
        }

        if self.comment {
            match index.code {
                Code::Newline => self.comment = false,
                Code::Sentinel => {}
                _ => {
                    self.tape.advance();
                    self.pos = offset + 1;
                    return Ok(None);
                }
            }
        }

        match index.code {
            Code::Blank => {
                self.tape.advance();
                self.pos = offset + 1;
                self.has_space = true;
                Ok(None)
            }
            Code::OpenGroup => {
                self.tape.advance();
                self.pos = offset + 1;
                self.group += 1;
                self.has_space = true;
                Ok(None)
            }
            Code::CloseGroup => {
                if self.group == 0 {
                    return Err(
                        self.syntax("closing parenthesis without group")
                    );
                }
                self.tape.advance();
                self.pos = offset + 1;
                self.group -= 1;
                self.has_space = true;
                Ok(None)
            }
            Code::Comment => {
                self.tape.advance();
                self.pos = offset + 1;
                self.comment = true;
                Ok(None)
            }
            Code::Newline => {
                self.tape.advance();
                self.pos = offset + 1;
                self.line += 1;
                self.line_start = (offset + 1) as isize;
                if self.group == 0 {
                    self.has_space = false;
                    Ok(Some(Raw {
                        kind: RawKind::Delimiter,
                        start: offset,
                        end: offset + 1,
                        has_space: false,
                    }))
                } else {
                    self.has_space = true;
                    Ok(None)
                }
            }
            Code::Sentinel => Ok(Some(self.end_of_input()?)),
            Code::Quote => self.quoted(offset),
            Code::Contiguous | Code::Escape => self.contiguous(offset),
        }
    }

    /// Produces the end-of-input token, checking for open contours.
    fn end_of_input(&mut self) -> Result<Raw, Error> {
        if self.group > 0 {
            return Err(
                self.syntax("unbalanced parenthesis at end of input")
            );
        }
        Ok(Raw {
            kind: RawKind::Eof,
            start: self.window.len(),
            end: self.window.len(),
            has_space: false,
        })
    }

    /// Scans a contiguous token starting at `start`.
    fn contiguous(&mut self, start: usize) -> Result<Option<Raw>, Error> {
        let has_space = core::mem::take(&mut self.has_space);
        let mut pos = start;
        let end = loop {
            let Some(index) = self.tape.peek() else {
                if self.eof {
                    self.pos = self.window.len();
                    break self.window.len();
                }
                self.has_space = has_space;
                self.rewind(start)?;
                return Ok(None);
            };
            let offset = index.offset as usize;
            if offset < pos {
                self.tape.advance();
                continue;
            }
            match index.code {
                Code::Contiguous => {
                    // The start entry itself, or a nominal run start right
                    // behind an escaped blank. Both just continue the
                    // token.
                    self.tape.advance();
                }
                Code::Blank => {
                    // The blank ends this token and separates the next.
                    self.tape.advance();
                    self.pos = offset + 1;
                    self.has_space = true;
                    break offset;
                }
                Code::Escape => {
                    self.tape.advance();
                    match self.escape_len(offset) {
                        Ok(len) => {
                            pos = offset + len;
                            if pos >= self.window.len() {
                                if self.eof {
                                    self.pos = pos;
                                    break pos;
                                }
                                self.has_space = has_space;
                                self.rewind(start)?;
                                return Ok(None);
                            }
                            // An escaped blank does not end the token, but
                            // the blank run behind it may go unindexed.
                            if matches!(
                                self.window.valid()[pos],
                                b' ' | b'\t' | b'\r'
                            ) {
                                self.pos = pos;
                                self.has_space = true;
                                break pos;
                            }
                        }
                        Err(EscapeLen::NeedMore) => {
                            self.has_space = has_space;
                            self.rewind(start)?;
                            return Ok(None);
                        }
                        Err(EscapeLen::Bad) => {
                            return Err(
                                self.syntax("invalid escape sequence")
                            );
                        }
                    }
                }
                Code::Newline
                | Code::Quote
                | Code::OpenGroup
                | Code::CloseGroup
                | Code::Comment
                | Code::Sentinel => {
                    // Token ends here; the entry is processed next round.
                    self.pos = offset;
                    break offset;
                }
            }
        };
        Ok(Some(Raw {
            kind: RawKind::Contiguous,
            start,
            end,
            has_space,
        }))
    }

    /// Scans a quoted token whose opening quote sits at `open`.
    fn quoted(&mut self, open: usize) -> Result<Option<Raw>, Error> {
        self.tape.advance();
        let start = open + 1;
        let mut pos = start;
        let close = loop {
            let Some(index) = self.tape.peek() else {
                if self.eof {
                    return Err(self.syntax("unterminated quoted string"));
                }
                self.rewind(open)?;
                return Ok(None);
            };
            let offset = index.offset as usize;
            if offset < pos {
                self.tape.advance();
                continue;
            }
            match index.code {
                Code::Quote => {
                    self.tape.advance();
                    self.pos = offset + 1;
                    break offset;
                }
                Code::Escape => {
                    self.tape.advance();
                    match self.escape_len(offset) {
                        Ok(len) => pos = offset + len,
                        Err(EscapeLen::NeedMore) => {
                            self.rewind(open)?;
                            return Ok(None);
                        }
                        Err(EscapeLen::Bad) => {
                            return Err(
                                self.syntax("invalid escape sequence")
                            );
                        }
                    }
                }
                Code::Sentinel => {
                    return Err(self.syntax("unterminated quoted string"));
                }
                _ => {
                    // Anything else is string content; newlines are
                    // counted once the token is complete.
                    self.tape.advance();
                }
            }
        };

        let content = &self.window.valid()[start..close];
        let newlines = content.iter().filter(|&&b| b == b'\n').count();
        if newlines > 0 {
            self.line += newlines;
            let last = content.iter().rposition(|&b| b == b'\n').unwrap();
            self.line_start = (start + last + 1) as isize;
        }
        Ok(Some(Raw {
            kind: RawKind::Quoted,
            start,
            end: close,
            has_space: core::mem::take(&mut self.has_space),
        }))
    }

    /// Returns the length of the escape sequence at `offset`.
    fn escape_len(&self, offset: usize) -> Result<usize, EscapeLen> {
        let data = self.window.valid();
        let more = |cond| if cond { EscapeLen::NeedMore } else { EscapeLen::Bad };
        let Some(&first) = data.get(offset + 1) else {
            return Err(more(!self.eof));
        };
        if !first.is_ascii_digit() {
            return Ok(2);
        }
        if offset + 3 >= data.len() && !self.eof {
            return Err(EscapeLen::NeedMore);
        }
        let (Some(&second), Some(&third)) =
            (data.get(offset + 2), data.get(offset + 3))
        else {
            return Err(EscapeLen::Bad);
        };
        if !second.is_ascii_digit() || !third.is_ascii_digit() {
            return Err(EscapeLen::Bad);
        }
        let value = u32::from(first - b'0') * 100
            + u32::from(second - b'0') * 10
            + u32::from(third - b'0');
        if value > 255 {
            return Err(EscapeLen::Bad);
        }
        Ok(4)
    }

    /// Rewinds to `keep_from` and refills the window.
    fn rewind(&mut self, keep_from: usize) -> Result<(), Error> {
        if keep_from == 0 && self.window.is_full() {
            return Err(self.syntax("token exceeds the input window"));
        }
        self.refill(keep_from)
    }

    /// Refills the window, keeping everything from `keep_from` on.
    fn refill(&mut self, keep_from: usize) -> Result<(), Error> {
        let (shift, eof) = self
            .window
            .refill(&mut self.source, keep_from)
            .map_err(|err| self.map_io(err))?;
        self.eof = eof;
        self.pos = 0;
        self.line_start -= shift as isize;
        self.tape.clear();
        self.target.index(self.window.valid(), self.eof, &mut self.tape);
        Ok(())
    }

    /// Maps a refill error into the parser taxonomy.
    fn map_io(&self, err: std::io::Error) -> Error {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            Error::Read(Diagnostic::new(
                self.name.clone(),
                self.line,
                "unexpected end of input",
            ))
        } else {
            Error::Io(err)
        }
    }
}

//------------ EscapeLen -----------------------------------------------------

/// Why the length of an escape sequence could not be determined.
enum EscapeLen {
    /// The escape may be complete after a refill.
    NeedMore,

    /// The escape is malformed.
    Bad,
}

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::scanner;

    fn lexer(input: &[u8]) -> Lexer<'_> {
        Lexer::new("<test>", Source::Bytes(input), scanner::select())
    }

    /// Collects `(text, quoted, has_space)` per token and line ends.
    fn tokens(input: &[u8]) -> Vec<(Vec<u8>, bool, bool)> {
        let mut lex = lexer(input);
        let mut res = Vec::new();
        loop {
            let item = lex.next().unwrap();
            match item.token {
                Token::Contiguous(s) => {
                    res.push((s.to_vec(), false, item.has_space))
                }
                Token::Quoted(s) => {
                    res.push((s.to_vec(), true, item.has_space))
                }
                Token::Delimiter => {
                    res.push((b"\n".to_vec(), false, false))
                }
                Token::Eof => break,
            }
        }
        res
    }

    #[test]
    fn simple_tokens() {
        assert_eq!(
            tokens(b"foo  bar\nbaz"),
            vec![
                (b"foo".to_vec(), false, false),
                (b"bar".to_vec(), false, true),
                (b"\n".to_vec(), false, false),
                (b"baz".to_vec(), false, false),
            ]
        );
    }

    #[test]
    fn quoted_tokens() {
        assert_eq!(
            tokens(b"\"with space\" \"esc\\\"aped\""),
            vec![
                (b"with space".to_vec(), true, false),
                (b"esc\\\"aped".to_vec(), true, true),
            ]
        );
    }

    #[test]
    fn comments_and_groups() {
        // Newlines within a group are white space; comments run to the
        // end of the line even inside a group.
        assert_eq!(
            tokens(b"a ( b ; comment )\n c ) d\ne"),
            vec![
                (b"a".to_vec(), false, false),
                (b"b".to_vec(), false, true),
                (b"c".to_vec(), false, true),
                (b"d".to_vec(), false, true),
                (b"\n".to_vec(), false, false),
                (b"e".to_vec(), false, false),
            ]
        );
    }

    #[test]
    fn escaped_blank_continues_token() {
        assert_eq!(
            tokens(b"a\\ b c"),
            vec![
                (b"a\\ b".to_vec(), false, false),
                (b"c".to_vec(), false, true),
            ]
        );
    }

    #[test]
    fn escaped_semicolon_is_data() {
        assert_eq!(
            tokens(b"a\\;b ;c\nd"),
            vec![
                (b"a\\;b".to_vec(), false, false),
                (b"\n".to_vec(), false, false),
                (b"d".to_vec(), false, false),
            ]
        );
    }

    #[test]
    fn line_numbers() {
        let mut lex = lexer(b"one\n( two\nthree )\n\"a\nb\" four");
        assert_eq!(lex.line(), 1);
        lex.next().unwrap(); // one
        lex.next().unwrap(); // delimiter
        assert_eq!(lex.line(), 2);
        lex.next().unwrap(); // two
        lex.next().unwrap(); // three, behind a masked newline
        assert_eq!(lex.line(), 3);
        lex.next().unwrap(); // delimiter
        lex.next().unwrap(); // the quoted token spanning a line
        assert_eq!(lex.line(), 5);
    }

    #[test]
    fn unterminated_quote() {
        let mut lex = lexer(b"\"never closed");
        assert!(matches!(lex.next(), Err(Error::Syntax(_))));
    }

    #[test]
    fn unbalanced_groups() {
        let mut lex = lexer(b")");
        assert!(matches!(lex.next(), Err(Error::Syntax(_))));

        let mut lex = lexer(b"( a b");
        loop {
            match lex.next() {
                Ok(Lexed { token: Token::Eof, .. }) => {
                    panic!("expected syntax error")
                }
                Ok(_) => {}
                Err(Error::Syntax(_)) => break,
                Err(err) => panic!("unexpected error: {}", err),
            }
        }
    }

    #[test]
    fn eof_is_idempotent() {
        let mut lex = lexer(b"x");
        assert!(matches!(lex.next().unwrap().token, Token::Contiguous(_)));
        assert!(matches!(lex.next().unwrap().token, Token::Eof));
        assert!(matches!(lex.next().unwrap().token, Token::Eof));
    }

    #[test]
    fn pushback() {
        let mut lex = lexer(b"\\# 2 abcd");
        assert!(lex.skip_unknown_marker().unwrap());
        assert!(!lex.at_end_of_entry().unwrap());
        let field = lex.field().unwrap();
        assert_eq!(field.bytes, b"2");
        let mut lex = lexer(b"plain");
        assert!(!lex.skip_unknown_marker().unwrap());
        let field = lex.field().unwrap();
        assert_eq!(field.bytes, b"plain");
    }
}
