//! The parser.
//!
//! This module ties the pieces together: it owns the stack of input
//! frames, runs the owner/TTL/class/type state machine over the token
//! stream, lets the [`rdata`][crate::rdata] module assemble record data,
//! and delivers each finished record to the caller's [`Sink`].
//!
//! The entry points are [`parse_file`] and [`parse_string`]. A parse is
//! strictly synchronous: records reach the sink in input order, records
//! from an `$INCLUDE` at the point of the directive, and everything the
//! parse allocated is released when the call returns -- also on the error
//! path, where `?`-propagation doubles as the non-local exit that lets a
//! field encoder abort the whole parse.

use crate::cache::Cache;
use crate::error::{Diagnostic, Error};
use crate::iana::{Class, Rtype};
use crate::lexer::{Lexer, Token};
use crate::log::Categories;
use crate::name::Name;
use crate::options::{Checked, Options};
use crate::rdata::{self, field, Ctx};
use crate::scanner::{self, Target};
use crate::source::Source;
use crate::symbol;
use std::fs;
use std::mem;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// The file name reported for in-memory input.
const NOT_A_FILE: &str = "<string>";

//------------ Record --------------------------------------------------------

/// A parsed resource record, as handed to the sink.
#[derive(Clone, Copy, Debug)]
pub struct Record<'a> {
    /// The owner name in wire format.
    pub owner: &'a Name,

    /// The record type.
    pub rtype: Rtype,

    /// The class.
    pub class: Class,

    /// The time to live in seconds.
    pub ttl: u32,

    /// The record data in wire format.
    ///
    /// At most 65535 octets. The slice stays valid until the parser
    /// starts assembling a record into the same cache block again, which
    /// the sink controls through its return value.
    pub rdata: &'a [u8],
}

//------------ Sink ----------------------------------------------------------

/// A consumer of parsed records.
///
/// The trait is implemented for closures, so a simple sink is just a
/// `FnMut(&Record) -> Result<usize, i32>`.
pub trait Sink {
    /// Accepts a record.
    ///
    /// On success, returns the index of the cache block the parser should
    /// assemble the *next* record into; the index must be below the cache
    /// size. Returning the index of the block just delivered is fine and
    /// simply reuses it.
    ///
    /// An error aborts the parse; the code, conventionally negative,
    /// becomes the final result via [`Error::Aborted`].
    fn accept(&mut self, record: &Record<'_>) -> Result<usize, i32>;
}

impl<F> Sink for F
where
    F: FnMut(&Record<'_>) -> Result<usize, i32>,
{
    fn accept(&mut self, record: &Record<'_>) -> Result<usize, i32> {
        (self)(record)
    }
}

//------------ Entry Points --------------------------------------------------

/// Parses the zone file at `path`, delivering records to `sink`.
///
/// Runs to the end of the input or the first fatal error. Records that
/// fail validation on their own are logged, skipped, and do not stop the
/// parse.
pub fn parse_file<S: Sink>(
    options: &Options,
    cache: &mut Cache,
    path: impl AsRef<Path>,
    sink: &mut S,
) -> Result<(), Error> {
    let checked = options.check()?;
    check_cache(cache)?;
    let target = scanner::select();
    if checked.categories.contains(Categories::INFO) {
        debug!(scanner = target.name(), "selected zone scanner");
    }
    let file = File::open(path.as_ref(), &checked, target)?;
    Parser {
        options: checked,
        cache,
        rdata: 0,
        sink,
        target,
        file,
    }
    .run()
}

/// Parses zone file text from memory, delivering records to `sink`.
///
/// The input is borrowed for the duration of the call and never written
/// to; diagnostics report the file name `<string>`.
pub fn parse_string<S: Sink>(
    options: &Options,
    cache: &mut Cache,
    input: &[u8],
    sink: &mut S,
) -> Result<(), Error> {
    let checked = options.check()?;
    check_cache(cache)?;
    let target = scanner::select();
    if checked.categories.contains(Categories::INFO) {
        debug!(scanner = target.name(), "selected zone scanner");
    }
    let file = File::from_bytes(input, &checked, target);
    Parser {
        options: checked,
        cache,
        rdata: 0,
        sink,
        target,
        file,
    }
    .run()
}

/// Checks that the cache can hold at least one record.
fn check_cache(cache: &Cache) -> Result<(), Error> {
    if cache.size() == 0 {
        Err(Error::OutOfMemory(
            "the record data cache needs at least one block",
        ))
    } else {
        Ok(())
    }
}

//------------ File ----------------------------------------------------------

/// One frame of the include stack.
///
/// The bottom frame lives inside the parser itself; `$INCLUDE` pushes
/// boxed frames linked through `includer`.
struct File<'i> {
    /// The resolved path, for include cycle detection.
    ///
    /// `None` for in-memory input.
    path: Option<PathBuf>,

    /// The tokenizer over this frame's input.
    lex: Lexer<'i>,

    /// The owner of the last record, seeded with the origin.
    owner: Name,

    /// The type of the last record.
    last_type: Rtype,

    /// The class of the last record, seeded with the default class.
    last_class: Class,

    /// The TTL of the last record or `$TTL`, seeded with the default.
    last_ttl: u32,

    /// The current origin.
    origin: Name,

    /// The frame this one was included from.
    includer: Option<Box<File<'i>>>,
}

impl<'i> File<'i> {
    /// Opens the file at `path` as a new frame.
    fn open(
        path: &Path,
        options: &Checked,
        target: Target,
    ) -> Result<File<'static>, Error> {
        let resolved = fs::canonicalize(path)?;
        let handle = fs::File::open(&resolved)?;
        Ok(File {
            path: Some(resolved),
            lex: Lexer::new(
                path.display().to_string(),
                Source::File(handle),
                target,
            ),
            owner: options.origin,
            last_type: Rtype::from_int(0),
            last_class: options.default_class,
            last_ttl: options.default_ttl,
            origin: options.origin,
            includer: None,
        })
    }

    /// Creates the frame for in-memory input.
    fn from_bytes(
        input: &'i [u8],
        options: &Checked,
        target: Target,
    ) -> File<'i> {
        File {
            path: None,
            lex: Lexer::new(NOT_A_FILE, Source::Bytes(input), target),
            owner: options.origin,
            last_type: Rtype::from_int(0),
            last_class: options.default_class,
            last_ttl: options.default_ttl,
            origin: options.origin,
            includer: None,
        }
    }
}

//------------ Parser --------------------------------------------------------

/// The how and where of an entry's first token.
enum First {
    /// An empty line.
    Empty,

    /// The end of the current frame's input.
    Eof,

    /// A `$` directive.
    Directive(Dir),

    /// A record entry. If the owner field was present it has been stored;
    /// otherwise the first token was already part of the TTL/class/type
    /// group and is passed along pre-parsed.
    Record(Option<Ctr>),
}

/// The directives.
enum Dir {
    Origin,
    Ttl,
    Include,
    Generate,
}

/// A token of the TTL/class/type group.
enum Ctr {
    Type(Rtype),
    Class(Class),
    Ttl(u32),
    Bad,
}

/// Parses a token of the TTL/class/type group.
///
/// The three cannot collide: types and classes have disjoint mnemonics
/// and TTL values start with a digit.
fn parse_ctr(s: &[u8]) -> Ctr {
    if let Some(rtype) = Rtype::from_bytes(s) {
        Ctr::Type(rtype)
    } else if let Some(class) = Class::from_bytes(s) {
        Ctr::Class(class)
    } else if let Some(ttl) = field::parse_ttl(s) {
        Ctr::Ttl(ttl)
    } else {
        Ctr::Bad
    }
}

/// The parser context for one parse invocation.
struct Parser<'a, 'i, S> {
    /// The validated options.
    options: Checked,

    /// The caller's record data cache.
    cache: &'a mut Cache,

    /// The index of the block record data is assembled into.
    rdata: usize,

    /// The caller's sink.
    sink: &'a mut S,

    /// The selected scanner implementation.
    target: Target,

    /// The top of the file stack.
    file: File<'i>,
}

impl<'a, 'i, S: Sink> Parser<'a, 'i, S> {
    /// Runs the parse to completion or the first fatal error.
    fn run(&mut self) -> Result<(), Error> {
        while self.entry()? {}
        Ok(())
    }

    /// Processes a single entry.
    ///
    /// Returns whether there is more input to process. Recoverable
    /// semantic errors are consumed here: the record is skipped and the
    /// parse continues at the next entry.
    fn entry(&mut self) -> Result<bool, Error> {
        let first = match self.classify() {
            Ok(first) => first,
            Err(Error::Semantic(diag)) => {
                self.skip(&diag)?;
                return Ok(true);
            }
            Err(err) => return Err(err),
        };
        match first {
            First::Empty => Ok(true),
            First::Eof => self.pop(),
            First::Directive(dir) => {
                // Directive errors, including semantic ones such as a
                // malformed origin, are fatal.
                self.directive(dir)?;
                Ok(true)
            }
            First::Record(first_ctr) => match self.record(first_ctr) {
                Ok(()) => Ok(true),
                Err(Error::Semantic(diag)) => {
                    self.skip(&diag)?;
                    Ok(true)
                }
                Err(err) => Err(err),
            },
        }
    }

    /// Reads the first token of an entry and decides what it starts.
    fn classify(&mut self) -> Result<First, Error> {
        enum Raw {
            Empty,
            Eof,
            Dir(Option<Dir>),
            Ctr(Ctr),
            At,
            Owner(Result<Name, crate::name::NameError>),
        }

        let raw = {
            let lexed = self.file.lex.next()?;
            match lexed.token {
                Token::Delimiter => Raw::Empty,
                Token::Eof => Raw::Eof,
                Token::Contiguous(s)
                    if !lexed.has_space && s.starts_with(b"$") =>
                {
                    Raw::Dir(if s.eq_ignore_ascii_case(b"$ORIGIN") {
                        Some(Dir::Origin)
                    } else if s.eq_ignore_ascii_case(b"$TTL") {
                        Some(Dir::Ttl)
                    } else if s.eq_ignore_ascii_case(b"$INCLUDE") {
                        Some(Dir::Include)
                    } else if s.eq_ignore_ascii_case(b"$GENERATE") {
                        Some(Dir::Generate)
                    } else {
                        None
                    })
                }
                Token::Contiguous(s) => {
                    if lexed.has_space {
                        Raw::Ctr(parse_ctr(s))
                    } else if s == b"@" {
                        Raw::At
                    } else {
                        Raw::Owner(Name::from_text(
                            s,
                            Some(&self.file.origin),
                        ))
                    }
                }
                Token::Quoted(s) => {
                    if lexed.has_space {
                        Raw::Ctr(Ctr::Bad)
                    } else {
                        Raw::Owner(Name::from_text(
                            s,
                            Some(&self.file.origin),
                        ))
                    }
                }
            }
        };

        match raw {
            Raw::Empty => Ok(First::Empty),
            Raw::Eof => Ok(First::Eof),
            Raw::Dir(Some(dir)) => Ok(First::Directive(dir)),
            Raw::Dir(None) => {
                Err(self.file.lex.syntax("unknown directive"))
            }
            Raw::Ctr(ctr) => Ok(First::Record(Some(ctr))),
            Raw::At => {
                self.file.owner = self.file.origin;
                Ok(First::Record(None))
            }
            Raw::Owner(Ok(owner)) => {
                self.file.owner = owner;
                Ok(First::Record(None))
            }
            Raw::Owner(Err(err)) => Err(self
                .file
                .lex
                .semantic(format!("invalid owner name: {}", err))),
        }
    }

    /// Parses a record entry and delivers it to the sink.
    fn record(&mut self, mut first: Option<Ctr>) -> Result<(), Error> {
        // The TTL/class/type group: TTL and class in either order, each
        // at most once, terminated by the mandatory type.
        let mut ttl = None;
        let mut class = None;
        let rtype = loop {
            let ctr = match first.take() {
                Some(ctr) => ctr,
                None => {
                    let lexed = self.file.lex.next()?;
                    match lexed.token {
                        Token::Contiguous(s) => parse_ctr(s),
                        _ => Ctr::Bad,
                    }
                }
            };
            match ctr {
                Ctr::Type(rtype) => break rtype,
                Ctr::Class(value) => {
                    if class.replace(value).is_some() {
                        return Err(self
                            .file
                            .lex
                            .semantic("duplicate class field".into()));
                    }
                }
                Ctr::Ttl(value) => {
                    if value > i32::MAX as u32 {
                        return Err(self
                            .file
                            .lex
                            .semantic("TTL exceeds maximum value".into()));
                    }
                    if ttl.replace(value).is_some() {
                        return Err(self
                            .file
                            .lex
                            .semantic("duplicate TTL field".into()));
                    }
                }
                Ctr::Bad => {
                    return Err(self.file.lex.semantic(
                        "expected a TTL, class, or record type".into(),
                    ));
                }
            }
        };

        if let Some(value) = ttl {
            self.file.last_ttl = value;
        }
        if let Some(value) = class {
            self.file.last_class = value;
        }
        self.file.last_type = rtype;

        // Assemble the record data into the current cache block.
        let block = self.cache.block_mut(self.rdata);
        block.clear();
        let mut ctx = Ctx {
            lex: &mut self.file.lex,
            origin: self.file.origin,
            rdata: block,
        };
        rdata::parse(&mut ctx, rtype)?;
        ctx.lex.expect_end_of_entry()?;

        // Deliver. The sink's return value picks the next block.
        let record = Record {
            owner: &self.file.owner,
            rtype,
            class: self.file.last_class,
            ttl: self.file.last_ttl,
            rdata: self.cache.block(self.rdata),
        };
        match self.sink.accept(&record) {
            Ok(next) if next < self.cache.size() => {
                self.rdata = next;
                Ok(())
            }
            Ok(_) => Err(Error::BadParameter(
                "sink returned an out-of-range block index",
            )),
            Err(code) => Err(Error::Aborted(code)),
        }
    }

    /// Handles a directive.
    fn directive(&mut self, dir: Dir) -> Result<(), Error> {
        match dir {
            Dir::Origin => {
                let parsed = {
                    let f = self.file.lex.field()?;
                    Name::from_text(f.bytes, Some(&self.file.origin))
                };
                let origin = parsed.map_err(|err| {
                    self.file
                        .lex
                        .semantic(format!("invalid origin: {}", err))
                })?;
                self.file.lex.expect_end_of_entry()?;
                self.file.origin = origin;
                Ok(())
            }
            Dir::Ttl => {
                let parsed = {
                    let f = self.file.lex.field()?;
                    field::parse_ttl(f.bytes)
                };
                let value = parsed
                    .filter(|&v| v <= i32::MAX as u32)
                    .ok_or_else(|| {
                        self.file.lex.semantic("invalid TTL".into())
                    })?;
                self.file.lex.expect_end_of_entry()?;
                self.file.last_ttl = value;
                Ok(())
            }
            Dir::Include => self.include(),
            Dir::Generate => Err(Error::NotImplemented(Diagnostic::new(
                self.file.lex.name(),
                self.file.lex.line(),
                "$GENERATE is not supported",
            ))),
        }
    }

    /// Handles an `$INCLUDE` directive.
    fn include(&mut self) -> Result<(), Error> {
        let path = {
            let f = self.file.lex.field()?;
            symbol::unescape(f.bytes)
        };
        let path = path
            .map_err(|_| self.file.lex.syntax("invalid escape sequence"))?;
        let path = String::from_utf8(path).map_err(|_| {
            self.file
                .lex
                .semantic("include path is not valid UTF-8".into())
        })?;
        let origin = if self.file.lex.at_end_of_entry()? {
            None
        } else {
            let parsed = {
                let f = self.file.lex.field()?;
                Name::from_text(f.bytes, Some(&self.file.origin))
            };
            Some(parsed.map_err(|err| {
                self.file.lex.semantic(format!("invalid origin: {}", err))
            })?)
        };
        self.file.lex.expect_end_of_entry()?;

        let mut new = File::open(Path::new(&path), &self.options, self.target)?;

        // A file including itself, directly or transitively, would never
        // terminate. Compare resolved paths along the stack.
        let mut frame = Some(&self.file);
        while let Some(file) = frame {
            if file.path.as_deref() == new.path.as_deref() {
                return Err(self
                    .file
                    .lex
                    .semantic(format!("cyclic $INCLUDE of {}", path)));
            }
            frame = file.includer.as_deref();
        }

        // The included frame starts with the requested origin and
        // inherits the running defaults; the includer's own state is
        // untouched and restored verbatim when the frame pops.
        new.origin = origin.unwrap_or(self.file.origin);
        new.owner = new.origin;
        new.last_class = self.file.last_class;
        new.last_ttl = self.file.last_ttl;
        new.last_type = self.file.last_type;

        if self.options.categories.contains(Categories::INFO) {
            debug!(path = %path, "entering included file");
        }
        let old = mem::replace(&mut self.file, new);
        self.file.includer = Some(Box::new(old));
        Ok(())
    }

    /// Pops a finished frame, or ends the parse on the bottom frame.
    fn pop(&mut self) -> Result<bool, Error> {
        match self.file.includer.take() {
            Some(parent) => {
                if self.options.categories.contains(Categories::INFO) {
                    debug!(
                        path = self.file.lex.name(),
                        "leaving included file"
                    );
                }
                self.file = *parent;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Logs a recoverable error and resynchronizes at the next entry.
    fn skip(&mut self, diag: &Diagnostic) -> Result<(), Error> {
        if self.options.categories.contains(Categories::WARNING) {
            warn!(
                file = diag.file(),
                line = diag.line(),
                "{}; record skipped",
                diag.message()
            );
        }
        self.file.lex.resync()
    }
}

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    /// A sink collecting owner, type, class, TTL, and rdata per record.
    type Collected = Vec<(Vec<u8>, u16, u16, u32, Vec<u8>)>;

    fn collect(
        origin: &str,
        ttl: u32,
        input: &[u8],
    ) -> Result<Collected, Error> {
        let mut options = Options::new(origin);
        options.default_ttl = ttl;
        let mut cache = Cache::new(1);
        let mut records = Collected::new();
        let mut sink = |record: &Record<'_>| {
            records.push((
                record.owner.as_slice().to_vec(),
                record.rtype.to_int(),
                record.class.to_int(),
                record.ttl,
                record.rdata.to_vec(),
            ));
            Ok(0)
        };
        parse_string(&options, &mut cache, input, &mut sink)?;
        Ok(records)
    }

    #[test]
    fn single_record() {
        let records = collect(
            "example.com.",
            3600,
            b"example.com. 3600 IN A 192.0.2.1\n",
        )
        .unwrap();
        assert_eq!(
            records,
            vec![(
                b"\x07example\x03com\x00".to_vec(),
                1,
                1,
                3600,
                b"\xc0\x00\x02\x01".to_vec(),
            )]
        );
    }

    #[test]
    fn soa_with_group_and_inherited_defaults() {
        let records = collect(
            "example.",
            60,
            b"@ IN SOA ns. hostmaster. (\n  1 2 3 4 5 )\nwww A 192.0.2.2\n",
        )
        .unwrap();
        assert_eq!(records.len(), 2);

        let (owner, rtype, class, ttl, rdata) = &records[0];
        assert_eq!(owner, b"\x07example\x00");
        assert_eq!(*rtype, 6);
        assert_eq!(*class, 1);
        assert_eq!(*ttl, 60);
        assert_eq!(
            rdata.as_slice(),
            b"\x02ns\x00\x0ahostmaster\x00\
              \x00\x00\x00\x01\x00\x00\x00\x02\x00\x00\x00\x03\
              \x00\x00\x00\x04\x00\x00\x00\x05"
        );

        let (owner, rtype, _, ttl, rdata) = &records[1];
        assert_eq!(owner, b"\x03www\x07example\x00");
        assert_eq!(*rtype, 1);
        assert_eq!(*ttl, 60);
        assert_eq!(rdata.as_slice(), b"\xc0\x00\x02\x02");
    }

    #[test]
    fn ttl_class_reordered() {
        let records =
            collect("x.", 60, b"a IN 300 A 192.0.2.1\nb 300 IN A 192.0.2.1\n")
                .unwrap();
        assert_eq!(records[0].3, 300);
        assert_eq!(records[1].3, 300);
    }

    #[test]
    fn owner_and_defaults_inherited() {
        let records = collect(
            "x.",
            60,
            b"a 300 CH A 192.0.2.1\n  A 192.0.2.2\nb A 192.0.2.3\n",
        )
        .unwrap();
        // Indented record: same owner, inherited TTL and class.
        assert_eq!(records[1].0, records[0].0);
        assert_eq!(records[1].2, 3);
        assert_eq!(records[1].3, 300);
        // New owner, still inheriting TTL and class.
        assert_eq!(records[2].0, b"\x01b\x01x\x00");
        assert_eq!(records[2].2, 3);
        assert_eq!(records[2].3, 300);
    }

    #[test]
    fn generic_rdata() {
        let records = collect(
            "x.",
            60,
            b"a TYPE65535 \\# 4 AABBCCDD\nb A \\# 4 C0000201\n",
        )
        .unwrap();
        assert_eq!(records[0].1, 65535);
        assert_eq!(records[0].4, b"\xaa\xbb\xcc\xdd");
        assert_eq!(records[1].1, 1);
        assert_eq!(records[1].4, b"\xc0\x00\x02\x01");
    }

    #[test]
    fn skips_bad_records() {
        // The malformed A record is skipped; its neighbors survive.
        let records = collect(
            "x.",
            60,
            b"a A 192.0.2.1\nb A not-an-address\nc A 192.0.2.3\n",
        )
        .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].0, b"\x01a\x01x\x00");
        assert_eq!(records[1].0, b"\x01c\x01x\x00");
    }

    #[test]
    fn unterminated_quote_is_fatal() {
        let err = collect("x.", 60, b"a TXT \"open\n").unwrap_err();
        assert!(matches!(err, Error::Syntax(_)));
        assert_eq!(err.code(), -1);
    }

    #[test]
    fn sink_abort() {
        let options = Options::new("x.");
        let mut cache = Cache::new(1);
        let mut count = 0;
        let mut sink = |_: &Record<'_>| {
            count += 1;
            if count == 3 {
                Err(-1)
            } else {
                Ok(0)
            }
        };
        let err = parse_string(
            &options,
            &mut cache,
            b"a A 192.0.2.1\nb A 192.0.2.2\nc A 192.0.2.3\nd A 192.0.2.4\n",
            &mut sink,
        )
        .unwrap_err();
        assert_eq!(err.code(), -1);
        assert!(matches!(err, Error::Aborted(-1)));
        assert_eq!(count, 3);
    }

    #[test]
    fn generate_is_reserved() {
        let err =
            collect("x.", 60, b"$GENERATE 1-10 host-$ A 192.0.2.1\n")
                .unwrap_err();
        assert!(matches!(err, Error::NotImplemented(_)));
        assert_eq!(err.code(), -6);
    }

    #[test]
    fn dollar_ttl_and_origin() {
        let records = collect(
            "example.",
            60,
            b"$TTL 1h30m\n$ORIGIN sub.example.\nwww A 192.0.2.1\n",
        )
        .unwrap();
        assert_eq!(records[0].0, b"\x03www\x03sub\x07example\x00");
        assert_eq!(records[0].3, 5400);
    }

    #[test]
    fn empty_cache_fails() {
        let options = Options::new("x.");
        let mut cache = Cache::new(0);
        let mut sink = |_: &Record<'_>| Ok(0);
        let err =
            parse_string(&options, &mut cache, b"", &mut sink).unwrap_err();
        assert_eq!(err.code(), -3);
    }

    #[test]
    fn out_of_range_sink_index() {
        let options = Options::new("x.");
        let mut cache = Cache::new(1);
        let mut sink = |_: &Record<'_>| Ok(7);
        let err = parse_string(
            &options,
            &mut cache,
            b"a A 192.0.2.1\n",
            &mut sink,
        )
        .unwrap_err();
        assert!(matches!(err, Error::BadParameter(_)));
    }
}
