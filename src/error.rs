//! Parser errors.
//!
//! A parse either runs to completion or stops at the first fatal error,
//! reported as an [`Error`]. The variants mirror the classic return-code
//! taxonomy of zone parsers; [`Error::code`] produces the numeric form for
//! callers that prefer it. Recoverable problems -- records that are
//! well-formed but invalid -- never surface here. They are logged and the
//! offending record is skipped.

use core::fmt;
use std::io;

//------------ Diagnostic ----------------------------------------------------

/// The position and description of a problem in the input.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    /// The logical name of the file the problem was found in.
    file: Box<str>,

    /// The 1-based line number.
    line: usize,

    /// A human-readable description.
    message: Box<str>,
}

impl Diagnostic {
    pub(crate) fn new(
        file: impl Into<Box<str>>,
        line: usize,
        message: impl Into<Box<str>>,
    ) -> Self {
        Diagnostic {
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    /// Returns the logical name of the file.
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Returns the line number the problem was detected on.
    ///
    /// For problems inside a grouped (parenthesized) or quoted section the
    /// line reported is the line the offending token ends on.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the description of the problem.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}: {}", self.file, self.line, self.message)
    }
}

//------------ Error ---------------------------------------------------------

/// A fatal parser error.
#[derive(Debug)]
pub enum Error {
    /// The input is malformed at the lexical level.
    ///
    /// Syntax errors desynchronize the lexer and are always fatal.
    Syntax(Diagnostic),

    /// The tokens are well-formed but do not make a valid entry.
    ///
    /// Only semantic errors raised at directive time are fatal; semantic
    /// errors in record data are logged and the record is skipped.
    Semantic(Diagnostic),

    /// The caller-supplied options failed validation.
    BadParameter(&'static str),

    /// A required buffer could not be provided.
    OutOfMemory(&'static str),

    /// The underlying stream failed.
    Io(io::Error),

    /// A directive or record type is recognized but not supported.
    NotImplemented(Diagnostic),

    /// The input ended where more data was expected.
    Read(Diagnostic),

    /// The sink rejected a record with the given code.
    Aborted(i32),
}

impl Error {
    /// Returns the numeric code for this error.
    ///
    /// Codes are negative; a successful parse is `0` by convention. Sink
    /// rejections return the sink's own code verbatim.
    pub fn code(&self) -> i32 {
        match *self {
            Error::Syntax(_) => -1,
            Error::Semantic(_) => -2,
            Error::OutOfMemory(_) => -3,
            Error::BadParameter(_) => -4,
            Error::Io(_) => -5,
            Error::NotImplemented(_) => -6,
            Error::Read(_) => -7,
            Error::Aborted(code) => code,
        }
    }

    /// Returns the position information carried by the error, if any.
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match *self {
            Error::Syntax(ref d)
            | Error::Semantic(ref d)
            | Error::NotImplemented(ref d)
            | Error::Read(ref d) => Some(d),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Syntax(ref d) => write!(f, "syntax error: {}", d),
            Error::Semantic(ref d) => write!(f, "semantic error: {}", d),
            Error::BadParameter(msg) => {
                write!(f, "bad parameter: {}", msg)
            }
            Error::OutOfMemory(msg) => write!(f, "out of memory: {}", msg),
            Error::Io(ref err) => write!(f, "i/o error: {}", err),
            Error::NotImplemented(ref d) => {
                write!(f, "not implemented: {}", d)
            }
            Error::Read(ref d) => write!(f, "read error: {}", d),
            Error::Aborted(code) => {
                write!(f, "parse aborted by sink with code {}", code)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::Io(ref err) => Some(err),
            _ => None,
        }
    }
}

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn codes() {
        let diag = Diagnostic::new("<string>", 1, "oops");
        assert_eq!(Error::Syntax(diag.clone()).code(), -1);
        assert_eq!(Error::Semantic(diag.clone()).code(), -2);
        assert_eq!(Error::OutOfMemory("x").code(), -3);
        assert_eq!(Error::BadParameter("x").code(), -4);
        assert_eq!(Error::NotImplemented(diag).code(), -6);
        assert_eq!(Error::Aborted(-42).code(), -42);
    }

    #[test]
    fn display() {
        let err =
            Error::Syntax(Diagnostic::new("db.example", 12, "bad escape"));
        assert_eq!(
            format!("{}", err),
            "syntax error: db.example:12: bad escape"
        );
    }
}
