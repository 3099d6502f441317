//! Assembling record data.
//!
//! Every record type the parser knows has a small function here that
//! consumes the fields of its presentation format in order and appends
//! their wire format to the current record data block. [`parse`] picks
//! the function by type code -- or switches to the generic `\# <len>
//! <hex>` form of RFC 3597, which is accepted for every type.

pub(crate) mod field;

use crate::error::Error;
use crate::iana::Rtype;
use crate::lexer::Lexer;
use crate::name::Name;
use crate::utils::base16;

//------------ Ctx -----------------------------------------------------------

/// Everything a field encoder needs.
pub(crate) struct Ctx<'p, 'i> {
    /// The lexer of the current file frame.
    pub lex: &'p mut Lexer<'i>,

    /// The origin for relative names, copied out of the frame.
    pub origin: Name,

    /// The record data block being assembled.
    pub rdata: &'p mut Vec<u8>,
}

//------------ parse ---------------------------------------------------------

/// Assembles the record data for a record of the given type.
///
/// Expects the lexer to stand behind the type field; leaves the entry's
/// final delimiter unconsumed.
pub(crate) fn parse(ctx: &mut Ctx, rtype: Rtype) -> Result<(), Error> {
    if ctx.lex.skip_unknown_marker()? {
        return generic(ctx);
    }
    match rtype.to_int() {
        1 => field::ip4(ctx),
        // NS, MD, MF, CNAME, MB, MG, MR, PTR, and DNAME are all a single
        // domain name.
        2..=5 | 7..=9 | 12 | 39 => field::name(ctx),
        6 => soa(ctx),
        10 => Err(ctx.lex.semantic(
            "NULL record data requires the generic \\# form".into(),
        )),
        11 => wks(ctx),
        13 => hinfo(ctx),
        // MINFO and RP are a pair of domain names.
        14 | 17 => {
            field::name(ctx)?;
            field::name(ctx)
        }
        // MX, AFSDB, RT, and KX are a 16 bit preference and a name.
        15 | 18 | 21 | 36 => {
            field::uint16(ctx, "preference")?;
            field::name(ctx)
        }
        // TXT and SPF are one or more character strings.
        16 | 99 => field::strings(ctx),
        19 => field::charstr(ctx, "PSDN address"),
        20 => isdn(ctx),
        // KEY, DNSKEY, and CDNSKEY share their format.
        25 | 48 | 60 => dnskey(ctx),
        28 => field::ip6(ctx),
        33 => srv(ctx),
        35 => naptr(ctx),
        // DS and CDS share their format.
        43 | 59 => ds(ctx),
        44 => sshfp(ctx),
        46 => rrsig(ctx),
        47 => nsec(ctx),
        49 => field::base64_remainder(ctx, "DHCID data"),
        50 => nsec3(ctx),
        51 => nsec3param(ctx),
        // TLSA and SMIMEA share their format.
        52 | 53 => tlsa(ctx),
        61 => field::base64_remainder(ctx, "OpenPGP key"),
        63 => zonemd(ctx),
        // SVCB and HTTPS share their format.
        64 | 65 => svcb(ctx),
        108 => field::eui(ctx, 6),
        109 => field::eui(ctx, 8),
        256 => uri(ctx),
        257 => caa(ctx),
        _ => Err(Error::NotImplemented(
            crate::error::Diagnostic::new(
                ctx.lex.name(),
                ctx.lex.line(),
                format!("record data format for {} is not supported", rtype),
            ),
        )),
    }
}

/// Parses the generic record data form of RFC 3597.
///
/// The `\#` marker has already been consumed.
fn generic(ctx: &mut Ctx) -> Result<(), Error> {
    let length = {
        let value = {
            let f = ctx.lex.field()?;
            crate::utils::num::dec_u16(f.bytes)
        };
        value.ok_or_else(|| {
            ctx.lex.semantic("invalid record data length".into())
        })?
    };

    let mut decoder = base16::Decoder::new();
    while !ctx.lex.at_end_of_entry()? {
        let pushed = {
            let f = ctx.lex.field()?;
            f.bytes
                .iter()
                .try_for_each(|&ch| decoder.push(ctx.rdata, ch))
        };
        pushed.map_err(|err| {
            ctx.lex.semantic(format!("invalid record data: {}", err))
        })?;
        if ctx.rdata.len() > usize::from(length) {
            return Err(ctx.lex.semantic(format!(
                "record data exceeds declared length {}",
                length
            )));
        }
    }
    if decoder.finalize().is_err() || ctx.rdata.len() != usize::from(length)
    {
        return Err(ctx.lex.semantic(format!(
            "record data does not match declared length {}",
            length
        )));
    }
    Ok(())
}

//------------ Per-Type Formats ----------------------------------------------

fn soa(ctx: &mut Ctx) -> Result<(), Error> {
    field::name(ctx)?; // primary name server
    field::name(ctx)?; // responsible mailbox
    field::uint32(ctx, "serial number")?;
    field::ttl(ctx, "refresh interval")?;
    field::ttl(ctx, "retry interval")?;
    field::ttl(ctx, "expire interval")?;
    field::ttl(ctx, "minimum TTL")
}

fn wks(ctx: &mut Ctx) -> Result<(), Error> {
    field::ip4(ctx)?;
    field::wks_remainder(ctx)
}

fn hinfo(ctx: &mut Ctx) -> Result<(), Error> {
    field::charstr(ctx, "CPU")?;
    field::charstr(ctx, "OS")
}

fn isdn(ctx: &mut Ctx) -> Result<(), Error> {
    field::charstr(ctx, "ISDN address")?;
    if !ctx.lex.at_end_of_entry()? {
        field::charstr(ctx, "subaddress")?;
    }
    Ok(())
}

fn dnskey(ctx: &mut Ctx) -> Result<(), Error> {
    field::uint16(ctx, "flags")?;
    field::uint8(ctx, "protocol")?;
    field::uint8(ctx, "algorithm")?;
    field::base64_remainder(ctx, "public key")
}

fn srv(ctx: &mut Ctx) -> Result<(), Error> {
    field::uint16(ctx, "priority")?;
    field::uint16(ctx, "weight")?;
    field::uint16(ctx, "port")?;
    field::name(ctx)
}

fn naptr(ctx: &mut Ctx) -> Result<(), Error> {
    field::uint16(ctx, "order")?;
    field::uint16(ctx, "preference")?;
    field::charstr(ctx, "flags")?;
    field::charstr(ctx, "services")?;
    field::charstr(ctx, "regexp")?;
    field::name(ctx)
}

fn ds(ctx: &mut Ctx) -> Result<(), Error> {
    field::uint16(ctx, "key tag")?;
    field::uint8(ctx, "algorithm")?;
    field::uint8(ctx, "digest type")?;
    field::base16_remainder(ctx, "digest")
}

fn sshfp(ctx: &mut Ctx) -> Result<(), Error> {
    field::uint8(ctx, "algorithm")?;
    field::uint8(ctx, "fingerprint type")?;
    field::base16_remainder(ctx, "fingerprint")
}

fn rrsig(ctx: &mut Ctx) -> Result<(), Error> {
    field::rtype(ctx)?; // type covered
    field::uint8(ctx, "algorithm")?;
    field::uint8(ctx, "labels")?;
    field::ttl(ctx, "original TTL")?;
    field::time(ctx, "expiration time")?;
    field::time(ctx, "inception time")?;
    field::uint16(ctx, "key tag")?;
    field::name(ctx)?; // signer's name
    field::base64_remainder(ctx, "signature")
}

fn nsec(ctx: &mut Ctx) -> Result<(), Error> {
    field::name(ctx)?; // next owner
    field::type_bitmap(ctx)
}

fn nsec3(ctx: &mut Ctx) -> Result<(), Error> {
    field::uint8(ctx, "hash algorithm")?;
    field::uint8(ctx, "flags")?;
    field::uint16(ctx, "iterations")?;
    field::salt(ctx)?;
    field::base32_field(ctx, "next hashed owner")?;
    field::type_bitmap(ctx)
}

fn nsec3param(ctx: &mut Ctx) -> Result<(), Error> {
    field::uint8(ctx, "hash algorithm")?;
    field::uint8(ctx, "flags")?;
    field::uint16(ctx, "iterations")?;
    field::salt(ctx)
}

fn tlsa(ctx: &mut Ctx) -> Result<(), Error> {
    field::uint8(ctx, "certificate usage")?;
    field::uint8(ctx, "selector")?;
    field::uint8(ctx, "matching type")?;
    field::base16_remainder(ctx, "certificate data")
}

fn zonemd(ctx: &mut Ctx) -> Result<(), Error> {
    field::uint32(ctx, "serial number")?;
    field::uint8(ctx, "scheme")?;
    field::uint8(ctx, "hash algorithm")?;
    field::base16_remainder(ctx, "digest")
}

fn svcb(ctx: &mut Ctx) -> Result<(), Error> {
    field::uint16(ctx, "priority")?;
    field::name(ctx)?; // target
    field::svc_params(ctx)
}

fn uri(ctx: &mut Ctx) -> Result<(), Error> {
    field::uint16(ctx, "priority")?;
    field::uint16(ctx, "weight")?;
    field::text(ctx, "target", false)
}

fn caa(ctx: &mut Ctx) -> Result<(), Error> {
    field::uint8(ctx, "flags")?;
    field::charstr(ctx, "tag")?;
    field::text(ctx, "value", true)
}
