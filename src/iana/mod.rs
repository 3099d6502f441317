//! The identifiers of the DNS parameter registries.
//!
//! Record types and classes appear in zone files by mnemonic and on the
//! wire as 16 bit integers. The types in this module wrap the integer and
//! know about the assigned mnemonics, including the generic `TYPE<n>` and
//! `CLASS<n>` notation of [RFC 3597].
//!
//! [RFC 3597]: https://tools.ietf.org/html/rfc3597

#[macro_use]
mod macros;

pub mod class;
pub mod rtype;

pub use self::class::Class;
pub use self::rtype::Rtype;

use core::fmt;

//------------ FromStrError --------------------------------------------------

/// A value could not be parsed from its textual representation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FromStrError(pub(crate) &'static str);

impl fmt::Display for FromStrError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl std::error::Error for FromStrError {}
