//! Diagnostics categories.
//!
//! The parser reports problems it can recover from -- and a few noteworthy
//! events such as the selected scanner implementation -- through the
//! [`tracing`] facade. Which categories of messages are emitted is
//! controlled by [`Categories`] in the parser options; installing a
//! subscriber and filtering its output is entirely the caller's business.

use core::fmt;
use core::ops;

//------------ Categories ----------------------------------------------------

/// A set of diagnostic categories.
///
/// Categories can be combined with the `|` operator:
///
/// ```
/// use zonescan::Categories;
///
/// let only_bad = Categories::ERROR | Categories::WARNING;
/// assert!(only_bad.contains(Categories::WARNING));
/// assert!(!only_bad.contains(Categories::INFO));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Categories(u32);

impl Categories {
    /// No messages at all.
    pub const NONE: Categories = Categories(0);

    /// Messages about problems that stop the parse.
    pub const ERROR: Categories = Categories(0x01);

    /// Messages about records that were skipped.
    pub const WARNING: Categories = Categories(0x02);

    /// Informational messages.
    pub const INFO: Categories = Categories(0x04);

    /// All categories.
    pub const ALL: Categories = Categories(u32::MAX);

    /// Returns whether all of `other` is enabled in `self`.
    pub const fn contains(self, other: Categories) -> bool {
        self.0 & other.0 == other.0
    }
}

impl Default for Categories {
    fn default() -> Self {
        Categories::ALL
    }
}

impl ops::BitOr for Categories {
    type Output = Categories;

    fn bitor(self, rhs: Self) -> Self::Output {
        Categories(self.0 | rhs.0)
    }
}

impl ops::BitOrAssign for Categories {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0
    }
}

impl fmt::Display for Categories {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for (bit, name) in [
            (Categories::ERROR, "error"),
            (Categories::WARNING, "warning"),
            (Categories::INFO, "info"),
        ] {
            if self.contains(bit) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        if first {
            f.write_str("none")?;
        }
        Ok(())
    }
}

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn contains() {
        assert!(Categories::ALL.contains(Categories::WARNING));
        assert!(!Categories::NONE.contains(Categories::ERROR));
        let set = Categories::ERROR | Categories::INFO;
        assert!(set.contains(Categories::ERROR));
        assert!(!set.contains(Categories::WARNING));
    }
}
