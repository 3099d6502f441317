//! DNS CLASSes.

//------------ Class ---------------------------------------------------------

int_enum! {
    /// DNS CLASSes.
    ///
    /// The domain name space is partitioned into separate classes for
    /// different network types. In practice, only the IN class is really
    /// relevant; CS, CH, and HS survive mostly in examples and in the odd
    /// name server that abuses CH for metadata.
    ///
    /// Classes are represented by a 16 bit value. The enum wraps this
    /// value and, like record types, unknown classes can be written as
    /// `CLASS<n>` per RFC 3597.
    =>
    Class, u16;

    /// Internet (IN).
    (In => 1, b"IN")

    /// CSNET (CS).
    ///
    /// Long obsolete, listed in RFC 1035 for completeness.
    (Cs => 2, b"CS")

    /// Chaosnet (CH).
    ///
    /// A network protocol developed at MIT in the 1970s.
    (Ch => 3, b"CH")

    /// Hesiod (HS).
    ///
    /// A system information protocol part of MIT's Project Athena.
    (Hs => 4, b"HS")
}

int_enum_str_with_prefix!(Class, "CLASS", b"CLASS", u16, "unknown class");

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::Class;
    use std::str::FromStr;

    #[test]
    fn from_bytes() {
        assert_eq!(Class::from_bytes(b"IN"), Some(Class::In));
        assert_eq!(Class::from_bytes(b"in"), Some(Class::In));
        assert_eq!(Class::from_bytes(b"CLASS3"), Some(Class::Ch));
        assert_eq!(Class::from_bytes(b"CLASS254"), Some(Class::Int(254)));
        assert_eq!(Class::from_bytes(b"CLASS"), None);
        assert_eq!(Class::from_bytes(b"CLASS03"), None);
        assert_eq!(Class::from_bytes(b"XX"), None);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Class::In), "IN");
        assert_eq!(format!("{}", Class::from_int(254)), "CLASS254");
        assert_eq!(Class::from_str("HS").unwrap(), Class::Hs);
    }
}
