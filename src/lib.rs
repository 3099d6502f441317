//! A fast, streaming DNS zone file parser.
//!
//! This crate parses the textual master file format of [RFC 1035] into
//! resource records in wire format. It is built for bulk work: a
//! vectorized scanner locates the structural characters of the grammar, a
//! lexer assembles tokens in place over a sliding input window, and each
//! finished record is handed to a caller-supplied [`Sink`] as an
//! `(owner, type, class, ttl, rdata)` tuple without the parser ever
//! building a tree or holding on to the zone.
//!
//! # Usage
//!
//! Fill in [`Options`], provide a [`Cache`] of reusable record data
//! buffers, and hand [`parse_file`] or [`parse_string`] a sink. The sink
//! can be a closure:
//!
//! ```
//! use zonescan::{parse_string, Cache, Options, Record};
//!
//! let options = Options::new("example.com.");
//! let mut cache = Cache::new(1);
//! let mut count = 0;
//! let mut sink = |record: &Record<'_>| {
//!     count += 1;
//!     Ok(0) // keep using block 0 for the next record
//! };
//! parse_string(
//!     &options,
//!     &mut cache,
//!     b"www 3600 IN A 192.0.2.1\n",
//!     &mut sink,
//! ).unwrap();
//! assert_eq!(count, 1);
//! ```
//!
//! # Supported input
//!
//! The zone file grammar of RFC 1035, section 5, with the generic record
//! data extension of [RFC 3597] and the `$ORIGIN`, `$TTL`, and `$INCLUDE`
//! directives. `$GENERATE` is recognized but rejected. Records whose data
//! does not validate are reported through [`tracing`], skipped, and do
//! not stop the parse; lexical errors, I/O problems, and sink rejections
//! do.
//!
//! # Scanner selection
//!
//! Scanning uses the best SIMD implementation the CPU supports, chosen
//! once per parse. The `ZONE_TARGET` environment variable (`haswell`,
//! `westmere`, or `fallback`) overrides the choice; unknown or
//! unsupported values silently fall back. All implementations produce
//! identical results.
//!
//! [RFC 1035]: https://tools.ietf.org/html/rfc1035
//! [RFC 3597]: https://tools.ietf.org/html/rfc3597

pub mod cache;
pub mod error;
pub mod iana;
pub mod log;
pub mod name;
pub mod options;
pub mod parser;
pub mod utils;

mod lexer;
mod rdata;
mod scanner;
mod source;
mod symbol;

pub use self::cache::Cache;
pub use self::error::{Diagnostic, Error};
pub use self::iana::{Class, Rtype};
pub use self::log::Categories;
pub use self::name::Name;
pub use self::options::Options;
pub use self::parser::{parse_file, parse_string, Record, Sink};
