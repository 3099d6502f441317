//! Parser options.

use crate::error::Error;
use crate::iana::Class;
use crate::log::Categories;
use crate::name::Name;

//------------ Options -------------------------------------------------------

/// The options of a parse.
///
/// The origin, default TTL, and default class are required by the zone
/// file format itself: the first record of a zone may already rely on all
/// three. The options are validated when a parse starts; invalid values
/// fail the parse with [`Error::BadParameter`].
#[derive(Clone, Debug)]
pub struct Options {
    /// The initial origin for relative names.
    ///
    /// Must be an absolute name, i.e., end in a dot.
    pub origin: String,

    /// The TTL of records when none was given or inherited yet.
    ///
    /// Must be in the range 1 to 2³¹ − 1.
    pub default_ttl: u32,

    /// The class of records when none was given or inherited yet.
    ///
    /// Must be one of the four classes of RFC 1035.
    pub default_class: Class,

    /// Which categories of diagnostics to emit.
    pub log_categories: Categories,
}

impl Options {
    /// Creates options with the given origin and conventional defaults:
    /// a TTL of 3600, class IN, and all diagnostics enabled.
    pub fn new(origin: impl Into<String>) -> Self {
        Options {
            origin: origin.into(),
            default_ttl: 3600,
            default_class: Class::In,
            log_categories: Categories::default(),
        }
    }

    /// Validates the options.
    pub(crate) fn check(&self) -> Result<Checked, Error> {
        let origin = Name::from_text(self.origin.as_bytes(), None)
            .map_err(|_| {
                Error::BadParameter("origin is not an absolute name")
            })?;
        if self.default_ttl == 0 || self.default_ttl > i32::MAX as u32 {
            return Err(Error::BadParameter(
                "default TTL not in the range 1..=2147483647",
            ));
        }
        if !(1..=4).contains(&self.default_class.to_int()) {
            return Err(Error::BadParameter(
                "default class must be IN, CS, CH, or HS",
            ));
        }
        Ok(Checked {
            origin,
            default_ttl: self.default_ttl,
            default_class: self.default_class,
            categories: self.log_categories,
        })
    }
}

//------------ Checked -------------------------------------------------------

/// The validated form of the options.
#[derive(Clone, Debug)]
pub(crate) struct Checked {
    pub origin: Name,
    pub default_ttl: u32,
    pub default_class: Class,
    pub categories: Categories,
}

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn validation() {
        assert!(Options::new("example.com.").check().is_ok());
        assert!(Options::new("example.com").check().is_err());
        assert!(Options::new("").check().is_err());

        let mut options = Options::new("example.com.");
        options.default_ttl = 0;
        assert!(options.check().is_err());
        options.default_ttl = u32::MAX;
        assert!(options.check().is_err());
        options.default_ttl = 1;
        assert!(options.check().is_ok());

        options.default_class = Class::from_int(254);
        assert!(options.check().is_err());
        options.default_class = Class::Hs;
        assert!(options.check().is_ok());
    }
}
