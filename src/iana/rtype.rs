//! Resource record types.

//------------ Rtype ---------------------------------------------------------

int_enum! {
    /// Resource record types.
    ///
    /// Each resource record has a 16 bit type identifying the kind of data
    /// it carries. The enum wraps this value and knows the mnemonics of
    /// the types the parser can assemble record data for. Any other type
    /// can be given through the `TYPE<n>` notation of RFC 3597 and carries
    /// its data in the generic `\# <len> <hex>` form.
    ///
    /// See the [DNS resource record types IANA registry] for an overview
    /// of assigned values.
    ///
    /// [DNS resource record types IANA registry]: https://www.iana.org/assignments/dns-parameters/dns-parameters.xhtml#dns-parameters-4
    =>
    Rtype, u16;

    /// A host address (RFC 1035).
    (A => 1, b"A")

    /// An authoritative name server (RFC 1035).
    (Ns => 2, b"NS")

    /// A mail destination (RFC 1035, obsolete).
    (Md => 3, b"MD")

    /// A mail forwarder (RFC 1035, obsolete).
    (Mf => 4, b"MF")

    /// The canonical name for an alias (RFC 1035).
    (Cname => 5, b"CNAME")

    /// The start of a zone of authority (RFC 1035).
    (Soa => 6, b"SOA")

    /// A mailbox domain name (RFC 1035, experimental).
    (Mb => 7, b"MB")

    /// A mail group member (RFC 1035, experimental).
    (Mg => 8, b"MG")

    /// A mail rename domain name (RFC 1035, experimental).
    (Mr => 9, b"MR")

    /// A null resource record (RFC 1035, experimental).
    ///
    /// NULL records have no presentation format; their data can only be
    /// given in the generic form.
    (Null => 10, b"NULL")

    /// A well known service description (RFC 1035).
    (Wks => 11, b"WKS")

    /// A domain name pointer (RFC 1035).
    (Ptr => 12, b"PTR")

    /// Host information (RFC 1035).
    (Hinfo => 13, b"HINFO")

    /// Mailbox or mail list information (RFC 1035, experimental).
    (Minfo => 14, b"MINFO")

    /// Mail exchange (RFC 1035).
    (Mx => 15, b"MX")

    /// Text strings (RFC 1035).
    (Txt => 16, b"TXT")

    /// Responsible person (RFC 1183).
    (Rp => 17, b"RP")

    /// AFS data base location (RFC 1183).
    (Afsdb => 18, b"AFSDB")

    /// X.25 PSDN address (RFC 1183).
    (X25 => 19, b"X25")

    /// ISDN address (RFC 1183).
    (Isdn => 20, b"ISDN")

    /// Route through (RFC 1183).
    (Rt => 21, b"RT")

    /// A security key (RFC 2535, obsoleted by DNSKEY).
    (Key => 25, b"KEY")

    /// An IPv6 host address (RFC 3596).
    (Aaaa => 28, b"AAAA")

    /// Server selection (RFC 2782).
    (Srv => 33, b"SRV")

    /// Naming authority pointer (RFC 3403).
    (Naptr => 35, b"NAPTR")

    /// Key exchanger (RFC 2230).
    (Kx => 36, b"KX")

    /// Delegation name (RFC 6672).
    (Dname => 39, b"DNAME")

    /// Delegation signer (RFC 4034).
    (Ds => 43, b"DS")

    /// An SSH key fingerprint (RFC 4255).
    (Sshfp => 44, b"SSHFP")

    /// A DNSSEC signature (RFC 4034).
    (Rrsig => 46, b"RRSIG")

    /// Next secure name (RFC 4034).
    (Nsec => 47, b"NSEC")

    /// A DNSSEC zone key (RFC 4034).
    (Dnskey => 48, b"DNSKEY")

    /// DHCP information (RFC 4701).
    (Dhcid => 49, b"DHCID")

    /// Hashed next secure name (RFC 5155).
    (Nsec3 => 50, b"NSEC3")

    /// NSEC3 parameters (RFC 5155).
    (Nsec3param => 51, b"NSEC3PARAM")

    /// A TLSA certificate association (RFC 6698).
    (Tlsa => 52, b"TLSA")

    /// An S/MIME certificate association (RFC 8162).
    (Smimea => 53, b"SMIMEA")

    /// A child copy of a DS record (RFC 7344).
    (Cds => 59, b"CDS")

    /// A child copy of a DNSKEY record (RFC 7344).
    (Cdnskey => 60, b"CDNSKEY")

    /// An OpenPGP public key (RFC 7929).
    (Openpgpkey => 61, b"OPENPGPKEY")

    /// A message digest over zone data (RFC 8976).
    (Zonemd => 63, b"ZONEMD")

    /// General purpose service binding (RFC 9460).
    (Svcb => 64, b"SVCB")

    /// Service binding for HTTPS (RFC 9460).
    (Https => 65, b"HTTPS")

    /// Sender policy framework (RFC 7208, discouraged in favor of TXT).
    (Spf => 99, b"SPF")

    /// An EUI-48 address (RFC 7043).
    (Eui48 => 108, b"EUI48")

    /// An EUI-64 address (RFC 7043).
    (Eui64 => 109, b"EUI64")

    /// A uniform resource identifier (RFC 7553).
    (Uri => 256, b"URI")

    /// Certification authority authorization (RFC 8659).
    (Caa => 257, b"CAA")
}

int_enum_str_with_prefix!(Rtype, "TYPE", b"TYPE", u16, "unknown record type");

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::Rtype;

    #[test]
    fn from_bytes() {
        assert_eq!(Rtype::from_bytes(b"A"), Some(Rtype::A));
        assert_eq!(Rtype::from_bytes(b"aaaa"), Some(Rtype::Aaaa));
        assert_eq!(Rtype::from_bytes(b"TYPE1"), Some(Rtype::A));
        assert_eq!(Rtype::from_bytes(b"TYPE65535"), Some(Rtype::Int(65535)));
        assert_eq!(Rtype::from_bytes(b"TYPE65536"), None);
        assert_eq!(Rtype::from_bytes(b"IN"), None);
        assert_eq!(Rtype::from_bytes(b"1"), None);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Rtype::Nsec3param), "NSEC3PARAM");
        assert_eq!(format!("{}", Rtype::from_int(4711)), "TYPE4711");
    }
}
