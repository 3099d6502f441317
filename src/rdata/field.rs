//! The field encoders.
//!
//! Every record data type is a sequence of fields, and every field is one
//! of the shapes implemented here: a domain name, a character string, an
//! address, an integer of some width, binary data in one of the base-x
//! encodings, or one of the special shapes like type bitmaps and service
//! parameters. Each encoder consumes the tokens of its field and appends
//! the wire format octets to the record data block, failing with a
//! recoverable semantic error when the text does not fit the field.

use super::Ctx;
use crate::cache::MAX_RDATA;
use crate::error::Error;
use crate::iana::Rtype;
use crate::name::Name;
use crate::symbol::{self, Symbols};
use crate::utils::{base16, base32, base64, num, DecodeError};
use std::net::Ipv6Addr;
use std::str::{self, FromStr};

//------------ Appending -----------------------------------------------------

/// Appends octets to the record data, enforcing the length limit.
pub(super) fn put(ctx: &mut Ctx, bytes: &[u8]) -> Result<(), Error> {
    if ctx.rdata.len() + bytes.len() > MAX_RDATA {
        return Err(overflow(ctx));
    }
    ctx.rdata.extend_from_slice(bytes);
    Ok(())
}

/// Checks the length limit after data was appended directly.
fn check_len(ctx: &Ctx) -> Result<(), Error> {
    if ctx.rdata.len() > MAX_RDATA {
        return Err(overflow(ctx));
    }
    Ok(())
}

fn overflow(ctx: &Ctx) -> Error {
    ctx.lex.semantic("record data exceeds 65535 octets".into())
}

//------------ Domain Names --------------------------------------------------

/// Appends a domain name field.
///
/// `@` stands for the origin and relative names are completed with it.
pub(super) fn name(ctx: &mut Ctx) -> Result<(), Error> {
    let parsed = {
        let f = ctx.lex.field()?;
        if !f.quoted && f.bytes == b"@" {
            Ok(ctx.origin)
        } else {
            Name::from_text(f.bytes, Some(&ctx.origin))
        }
    };
    let name = parsed.map_err(|err| {
        ctx.lex.semantic(format!("invalid domain name: {}", err))
    })?;
    put(ctx, name.as_slice())
}

//------------ Integers ------------------------------------------------------

/// Consumes a token and parses it with `parse`.
fn take<T>(
    ctx: &mut Ctx,
    what: &'static str,
    parse: impl FnOnce(&[u8]) -> Option<T>,
) -> Result<T, Error> {
    let value = {
        let f = ctx.lex.field()?;
        parse(f.bytes)
    };
    value.ok_or_else(|| ctx.lex.semantic(format!("invalid {}", what)))
}

/// Appends an 8 bit integer field.
pub(super) fn uint8(ctx: &mut Ctx, what: &'static str) -> Result<(), Error> {
    let value = take(ctx, what, num::dec_u8)?;
    put(ctx, &[value])
}

/// Appends a 16 bit integer field.
pub(super) fn uint16(ctx: &mut Ctx, what: &'static str) -> Result<(), Error> {
    let value = take(ctx, what, num::dec_u16)?;
    put(ctx, &value.to_be_bytes())
}

/// Appends a 32 bit integer field.
pub(super) fn uint32(ctx: &mut Ctx, what: &'static str) -> Result<(), Error> {
    let value = take(ctx, what, num::dec_u32)?;
    put(ctx, &value.to_be_bytes())
}

/// Appends a record type field, e.g. the type covered by an RRSIG.
pub(super) fn rtype(ctx: &mut Ctx) -> Result<(), Error> {
    let value = take(ctx, "record type", Rtype::from_bytes)?;
    put(ctx, &value.to_int().to_be_bytes())
}

//------------ Time Values ---------------------------------------------------

/// Parses a TTL value: seconds, or a sequence of `<n><unit>` items.
pub(crate) fn parse_ttl(s: &[u8]) -> Option<u32> {
    if s.is_empty() {
        return None;
    }
    let mut total: u32 = 0;
    let mut value: Option<u32> = None;
    for &ch in s {
        if ch.is_ascii_digit() {
            value = Some(
                value
                    .unwrap_or(0)
                    .checked_mul(10)?
                    .checked_add(u32::from(ch - b'0'))?,
            );
        } else {
            let unit: u32 = match ch.to_ascii_lowercase() {
                b's' => 1,
                b'm' => 60,
                b'h' => 3600,
                b'd' => 86400,
                b'w' => 604800,
                _ => return None,
            };
            // A unit without a preceding number is malformed.
            total = total.checked_add(value.take()?.checked_mul(unit)?)?;
        }
    }
    if let Some(value) = value {
        // A trailing number without a unit counts as seconds.
        total = total.checked_add(value)?;
    }
    Some(total)
}

/// Appends a TTL field.
pub(super) fn ttl(ctx: &mut Ctx, what: &'static str) -> Result<(), Error> {
    let value = take(ctx, what, |s| {
        parse_ttl(s).filter(|&v| v <= i32::MAX as u32)
    })?;
    put(ctx, &value.to_be_bytes())
}

/// Days since the Unix epoch for a proleptic Gregorian date.
fn days_from_civil(y: i64, m: u32, d: u32) -> i64 {
    let y = y - i64::from(m <= 2);
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let doy =
        i64::from((153 * (if m > 2 { m - 3 } else { m + 9 }) + 2) / 5 + d - 1);
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146097 + doe - 719468
}

/// Parses a signature time: `YYYYMMDDHHmmSS` or seconds since the epoch.
fn parse_time(s: &[u8]) -> Option<u32> {
    if s.len() != 14 || !s.iter().all(u8::is_ascii_digit) {
        return num::dec_u32(s);
    }
    let number = |r: core::ops::Range<usize>| {
        s[r].iter()
            .fold(0u32, |acc, &ch| acc * 10 + u32::from(ch - b'0'))
    };
    let (year, month, day) = (number(0..4), number(4..6), number(6..8));
    let (hour, minute, second) = (number(8..10), number(10..12), number(12..14));
    if !(1..=12).contains(&month)
        || !(1..=31).contains(&day)
        || hour > 23
        || minute > 59
        || second > 59
    {
        return None;
    }
    let days = days_from_civil(i64::from(year), month, day);
    if days < 0 {
        return None;
    }
    // Seconds wrap around the 32 bit space, as timestamps use serial
    // number arithmetic.
    let seconds = days as u64 * 86400
        + u64::from(hour) * 3600
        + u64::from(minute) * 60
        + u64::from(second);
    Some(seconds as u32)
}

/// Appends a signature timestamp field.
pub(super) fn time(ctx: &mut Ctx, what: &'static str) -> Result<(), Error> {
    let value = take(ctx, what, parse_time)?;
    put(ctx, &value.to_be_bytes())
}

//------------ Addresses -----------------------------------------------------

/// Parses a strict dotted quad.
fn parse_ip4(s: &[u8]) -> Option<[u8; 4]> {
    let mut octets = [0u8; 4];
    let mut parts = s.split(|&ch| ch == b'.');
    for octet in &mut octets {
        *octet = num::dec_u8(parts.next()?)?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(octets)
}

/// Appends an IPv4 address field.
pub(super) fn ip4(ctx: &mut Ctx) -> Result<(), Error> {
    let addr = take(ctx, "IPv4 address", parse_ip4)?;
    put(ctx, &addr)
}

/// The longest textual IPv6 address, without the terminator.
const INET6_ADDRSTRLEN: usize = 45;

/// Parses an IPv6 address through the platform parser.
fn parse_ip6(s: &[u8]) -> Option<[u8; 16]> {
    if s.len() > INET6_ADDRSTRLEN {
        return None;
    }
    let s = str::from_utf8(s).ok()?;
    Ipv6Addr::from_str(s).ok().map(|addr| addr.octets())
}

/// Appends an IPv6 address field.
pub(super) fn ip6(ctx: &mut Ctx) -> Result<(), Error> {
    let addr = take(ctx, "IPv6 address", parse_ip6)?;
    put(ctx, &addr)
}

//------------ Character Strings ---------------------------------------------

/// Decodes a token into a length-limited buffer.
fn decode_charstr(
    bytes: &[u8],
    what: &'static str,
) -> Result<([u8; 255], usize), String> {
    let mut buf = [0u8; 255];
    let mut len = 0;
    for sym in Symbols::new(bytes) {
        let sym = sym.map_err(|_| "illegal escape sequence".to_string())?;
        if len == 255 {
            return Err(format!("{} exceeds 255 octets", what));
        }
        buf[len] = sym.octet();
        len += 1;
    }
    Ok((buf, len))
}

/// Appends a character string field: one length octet plus the content.
pub(super) fn charstr(
    ctx: &mut Ctx,
    what: &'static str,
) -> Result<(), Error> {
    let decoded = {
        let f = ctx.lex.field()?;
        decode_charstr(f.bytes, what)
    };
    let (buf, len) = decoded.map_err(|msg| ctx.lex.semantic(msg))?;
    put(ctx, &[len as u8])?;
    put(ctx, &buf[..len])
}

/// Appends one or more character strings, up to the end of the entry.
pub(super) fn strings(ctx: &mut Ctx) -> Result<(), Error> {
    charstr(ctx, "text string")?;
    while !ctx.lex.at_end_of_entry()? {
        charstr(ctx, "text string")?;
    }
    Ok(())
}

/// Appends a token as raw text without a length octet.
///
/// Used for fields that cover the rest of the record data, such as the
/// value of a CAA record or the target of a URI record.
pub(super) fn text(
    ctx: &mut Ctx,
    what: &'static str,
    allow_empty: bool,
) -> Result<(), Error> {
    let decoded = {
        let f = ctx.lex.field()?;
        symbol::unescape(f.bytes)
    };
    let bytes = decoded
        .map_err(|_| ctx.lex.semantic("illegal escape sequence".into()))?;
    if bytes.is_empty() && !allow_empty {
        return Err(ctx.lex.semantic(format!("empty {}", what)));
    }
    put(ctx, &bytes)
}

//------------ Binary Data ---------------------------------------------------

/// Maps a decode error into a semantic error.
fn bad_data(ctx: &Ctx, what: &'static str, err: DecodeError) -> Error {
    ctx.lex.semantic(format!("invalid {}: {}", what, err))
}

/// Appends base 64 data covering the rest of the entry.
pub(super) fn base64_remainder(
    ctx: &mut Ctx,
    what: &'static str,
) -> Result<(), Error> {
    let mut decoder = base64::Decoder::new();
    let mut seen = false;
    while !ctx.lex.at_end_of_entry()? {
        let pushed = {
            let f = ctx.lex.field()?;
            f.bytes
                .iter()
                .try_for_each(|&ch| decoder.push(ctx.rdata, ch))
        };
        pushed.map_err(|err| bad_data(ctx, what, err))?;
        check_len(ctx)?;
        seen = true;
    }
    if !seen {
        return Err(ctx.lex.semantic(format!("missing {}", what)));
    }
    decoder
        .finalize(ctx.rdata)
        .map_err(|err| bad_data(ctx, what, err))?;
    check_len(ctx)
}

/// Appends base 16 data covering the rest of the entry.
pub(super) fn base16_remainder(
    ctx: &mut Ctx,
    what: &'static str,
) -> Result<(), Error> {
    let mut decoder = base16::Decoder::new();
    let mut seen = false;
    while !ctx.lex.at_end_of_entry()? {
        let pushed = {
            let f = ctx.lex.field()?;
            f.bytes
                .iter()
                .try_for_each(|&ch| decoder.push(ctx.rdata, ch))
        };
        pushed.map_err(|err| bad_data(ctx, what, err))?;
        check_len(ctx)?;
        seen = true;
    }
    if !seen {
        return Err(ctx.lex.semantic(format!("missing {}", what)));
    }
    decoder.finalize().map_err(|err| bad_data(ctx, what, err))
}

/// Appends an NSEC3 salt field: `-` or hex with a length octet.
pub(super) fn salt(ctx: &mut Ctx) -> Result<(), Error> {
    let decoded: Result<Vec<u8>, String> = {
        let f = ctx.lex.field()?;
        if !f.quoted && f.bytes == b"-" {
            Ok(Vec::new())
        } else {
            str::from_utf8(f.bytes)
                .map_err(|_| "invalid salt".to_string())
                .and_then(|s| {
                    base16::decode(s)
                        .map_err(|err| format!("invalid salt: {}", err))
                })
        }
    };
    let bytes = decoded.map_err(|msg| ctx.lex.semantic(msg))?;
    if bytes.len() > 255 {
        return Err(ctx.lex.semantic("salt exceeds 255 octets".into()));
    }
    put(ctx, &[bytes.len() as u8])?;
    put(ctx, &bytes)
}

/// Appends an NSEC3 next hashed owner field: unpadded base32hex with a
/// length octet.
pub(super) fn base32_field(
    ctx: &mut Ctx,
    what: &'static str,
) -> Result<(), Error> {
    let decoded: Result<Vec<u8>, String> = {
        let f = ctx.lex.field()?;
        str::from_utf8(f.bytes)
            .map_err(|_| format!("invalid {}", what))
            .and_then(|s| {
                base32::decode_hex(s)
                    .map_err(|err| format!("invalid {}: {}", what, err))
            })
    };
    let bytes = decoded.map_err(|msg| ctx.lex.semantic(msg))?;
    if bytes.is_empty() || bytes.len() > 255 {
        return Err(ctx.lex.semantic(format!("invalid {}", what)));
    }
    put(ctx, &[bytes.len() as u8])?;
    put(ctx, &bytes)
}

/// Appends an EUI-48 or EUI-64 address: hex octets separated by dashes.
pub(super) fn eui(ctx: &mut Ctx, octets: usize) -> Result<(), Error> {
    let decoded: Result<Vec<u8>, ()> = {
        let f = ctx.lex.field()?;
        let mut out = Vec::with_capacity(octets);
        let mut parts = f.bytes.split(|&ch| ch == b'-');
        let mut ok = true;
        for _ in 0..octets {
            match parts.next() {
                Some(&[hi, lo]) => {
                    let mut pair = Vec::with_capacity(1);
                    let mut decoder = base16::Decoder::new();
                    if decoder.push(&mut pair, hi).is_err()
                        || decoder.push(&mut pair, lo).is_err()
                    {
                        ok = false;
                        break;
                    }
                    out.push(pair[0]);
                }
                _ => {
                    ok = false;
                    break;
                }
            }
        }
        if ok && parts.next().is_none() {
            Ok(out)
        } else {
            Err(())
        }
    };
    let bytes = decoded
        .map_err(|_| ctx.lex.semantic("invalid EUI address".into()))?;
    put(ctx, &bytes)
}

//------------ Type Bitmaps --------------------------------------------------

/// Appends an NSEC-style type bitmap from the rest of the entry.
pub(super) fn type_bitmap(ctx: &mut Ctx) -> Result<(), Error> {
    let mut bits = vec![0u8; 8192];
    while !ctx.lex.at_end_of_entry()? {
        let rtype = {
            let f = ctx.lex.field()?;
            Rtype::from_bytes(f.bytes)
        };
        let rtype = rtype.ok_or_else(|| {
            ctx.lex.semantic("invalid record type in bitmap".into())
        })?;
        let value = rtype.to_int() as usize;
        bits[value / 8] |= 0x80 >> (value % 8);
    }

    // One block per 256 types that has any bits set, each trimmed to its
    // last non-zero octet.
    for window in 0..256usize {
        let block = &bits[window * 32..(window + 1) * 32];
        let len = match block.iter().rposition(|&b| b != 0) {
            Some(pos) => pos + 1,
            None => continue,
        };
        put(ctx, &[window as u8, len as u8])?;
        put(ctx, &block[..len])?;
    }
    Ok(())
}

//------------ Well Known Services -------------------------------------------

/// Services with well known ports, for WKS records.
const SERVICES: &[(&[u8], u16)] = &[
    (b"ftp-data", 20),
    (b"ftp", 21),
    (b"ssh", 22),
    (b"telnet", 23),
    (b"smtp", 25),
    (b"time", 37),
    (b"whois", 43),
    (b"domain", 53),
    (b"tftp", 69),
    (b"finger", 79),
    (b"http", 80),
    (b"www", 80),
    (b"kerberos", 88),
    (b"pop2", 109),
    (b"pop3", 110),
    (b"nntp", 119),
    (b"ntp", 123),
    (b"imap", 143),
    (b"snmp", 161),
    (b"ldap", 389),
    (b"https", 443),
    (b"submission", 587),
];

fn service_port(s: &[u8]) -> Option<u16> {
    if let Some(port) = num::dec_u16(s) {
        return Some(port);
    }
    SERVICES
        .iter()
        .find(|(name, _)| s.eq_ignore_ascii_case(name))
        .map(|&(_, port)| port)
}

fn protocol_number(s: &[u8]) -> Option<u8> {
    if let Some(proto) = num::dec_u8(s) {
        return Some(proto);
    }
    if s.eq_ignore_ascii_case(b"tcp") {
        Some(6)
    } else if s.eq_ignore_ascii_case(b"udp") {
        Some(17)
    } else if s.eq_ignore_ascii_case(b"icmp") {
        Some(1)
    } else {
        None
    }
}

/// Appends the protocol and port bitmap of a WKS record.
pub(super) fn wks_remainder(ctx: &mut Ctx) -> Result<(), Error> {
    let proto = take(ctx, "protocol", protocol_number)?;
    put(ctx, &[proto])?;

    let mut bits = vec![0u8; 8192];
    let mut max = None;
    while !ctx.lex.at_end_of_entry()? {
        let port = take(ctx, "service", service_port)?;
        bits[usize::from(port) / 8] |= 0x80 >> (port % 8);
        max = Some(max.map_or(port, |m: u16| m.max(port)));
    }
    if let Some(max) = max {
        put(ctx, &bits[..usize::from(max) / 8 + 1])?;
    }
    Ok(())
}

//------------ Service Parameters --------------------------------------------

/// The parameter value still expected after a `key=` token.
enum SvcParam {
    Done(u16, Vec<u8>),
    NeedValue(u16),
}

/// Splits a parameter value at unescaped commas.
fn comma_items(value: &[u8]) -> Result<Vec<Vec<u8>>, String> {
    let mut items = vec![Vec::new()];
    for sym in Symbols::new(value) {
        let sym = sym.map_err(|_| "illegal escape sequence".to_string())?;
        match sym {
            symbol::Sym::Char(b',') => items.push(Vec::new()),
            sym => items.last_mut().unwrap().push(sym.octet()),
        }
    }
    Ok(items)
}

/// Returns the key number for a service parameter name.
fn svc_key(name: &[u8]) -> Option<u16> {
    const KEYS: &[(&[u8], u16)] = &[
        (b"mandatory", 0),
        (b"alpn", 1),
        (b"no-default-alpn", 2),
        (b"port", 3),
        (b"ipv4hint", 4),
        (b"ech", 5),
        (b"ipv6hint", 6),
        (b"dohpath", 7),
    ];
    if let Some(&(_, key)) =
        KEYS.iter().find(|(n, _)| name.eq_ignore_ascii_case(n))
    {
        return Some(key);
    }
    if name.len() > 3 && name[..3].eq_ignore_ascii_case(b"key") {
        return num::dec_u16(&name[3..]);
    }
    None
}

/// Encodes the value of a service parameter.
fn svc_value(key: u16, value: &[u8]) -> Result<Vec<u8>, String> {
    match key {
        0 => {
            // mandatory: a comma list of keys, emitted in ascending order.
            let mut keys = Vec::new();
            for item in comma_items(value)? {
                let key = svc_key(&item)
                    .ok_or_else(|| "invalid mandatory key".to_string())?;
                keys.push(key);
            }
            if keys.is_empty() {
                return Err("empty mandatory list".into());
            }
            keys.sort_unstable();
            Ok(keys.iter().flat_map(|k| k.to_be_bytes()).collect())
        }
        1 => {
            // alpn: a comma list of protocol identifiers.
            let mut out = Vec::new();
            for item in comma_items(value)? {
                if item.is_empty() || item.len() > 255 {
                    return Err("invalid alpn identifier".into());
                }
                out.push(item.len() as u8);
                out.extend_from_slice(&item);
            }
            Ok(out)
        }
        3 => num::dec_u16(value)
            .map(|port| port.to_be_bytes().to_vec())
            .ok_or_else(|| "invalid port value".to_string()),
        4 => {
            let mut out = Vec::new();
            for item in comma_items(value)? {
                let addr = parse_ip4(&item)
                    .ok_or_else(|| "invalid ipv4hint".to_string())?;
                out.extend_from_slice(&addr);
            }
            Ok(out)
        }
        5 => str::from_utf8(value)
            .ok()
            .and_then(|s| base64::decode(s).ok())
            .ok_or_else(|| "invalid ech value".to_string()),
        6 => {
            let mut out = Vec::new();
            for item in comma_items(value)? {
                let addr = parse_ip6(&item)
                    .ok_or_else(|| "invalid ipv6hint".to_string())?;
                out.extend_from_slice(&addr);
            }
            Ok(out)
        }
        _ => symbol::unescape(value)
            .map_err(|_| "illegal escape sequence".to_string()),
    }
}

/// The keys whose parameters must carry a value.
fn svc_key_needs_value(key: u16) -> bool {
    matches!(key, 0 | 1 | 3 | 4 | 5 | 6 | 7)
}

/// Appends the service parameters of an SVCB or HTTPS record.
pub(super) fn svc_params(ctx: &mut Ctx) -> Result<(), Error> {
    let mut params: Vec<(u16, Vec<u8>)> = Vec::new();
    while !ctx.lex.at_end_of_entry()? {
        let parsed: Result<SvcParam, String> = {
            let f = ctx.lex.field()?;
            match f.bytes.iter().position(|&ch| ch == b'=') {
                None => match svc_key(f.bytes) {
                    Some(key) if !svc_key_needs_value(key) => {
                        Ok(SvcParam::Done(key, Vec::new()))
                    }
                    Some(_) => Err("missing parameter value".into()),
                    None => Err("unknown service parameter".into()),
                },
                Some(eq) => {
                    let key = svc_key(&f.bytes[..eq])
                        .ok_or_else(|| {
                            "unknown service parameter".to_string()
                        });
                    match key {
                        Err(err) => Err(err),
                        Ok(key) if eq + 1 == f.bytes.len() => {
                            // The value follows as its own, likely
                            // quoted, token.
                            Ok(SvcParam::NeedValue(key))
                        }
                        Ok(key) => svc_value(key, &f.bytes[eq + 1..])
                            .map(|value| SvcParam::Done(key, value)),
                    }
                }
            }
        };
        let param = match parsed {
            Ok(SvcParam::Done(key, value)) => (key, value),
            Ok(SvcParam::NeedValue(key)) => {
                let value = {
                    let f = ctx.lex.field()?;
                    svc_value(key, f.bytes)
                };
                (key, value.map_err(|msg| ctx.lex.semantic(msg))?)
            }
            Err(msg) => return Err(ctx.lex.semantic(msg)),
        };
        params.push(param);
    }

    // The wire format wants parameters in ascending key order, once each.
    params.sort_by_key(|&(key, _)| key);
    if params.windows(2).any(|w| w[0].0 == w[1].0) {
        return Err(ctx.lex.semantic("duplicate service parameter".into()));
    }
    for (key, value) in params {
        if value.len() > MAX_RDATA {
            return Err(overflow(ctx));
        }
        put(ctx, &key.to_be_bytes())?;
        put(ctx, &(value.len() as u16).to_be_bytes())?;
        put(ctx, &value)?;
    }
    Ok(())
}

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ttl_values() {
        assert_eq!(parse_ttl(b"3600"), Some(3600));
        assert_eq!(parse_ttl(b"0"), Some(0));
        assert_eq!(parse_ttl(b"1h"), Some(3600));
        assert_eq!(parse_ttl(b"1h30m"), Some(5400));
        assert_eq!(parse_ttl(b"1w2d"), Some(777600));
        assert_eq!(parse_ttl(b"2H"), Some(7200));
        assert_eq!(parse_ttl(b"1h30"), Some(3630));
        assert_eq!(parse_ttl(b""), None);
        assert_eq!(parse_ttl(b"h"), None);
        assert_eq!(parse_ttl(b"1x"), None);
        assert_eq!(parse_ttl(b"4294967296"), None);
    }

    #[test]
    fn time_values() {
        // 1 Jan 1970 and the example from RFC 4034.
        assert_eq!(parse_time(b"19700101000000"), Some(0));
        assert_eq!(parse_time(b"20030322173103"), Some(1048354263));
        assert_eq!(parse_time(b"1048354263"), Some(1048354263));
        assert_eq!(parse_time(b"20031300000000"), None);
        assert_eq!(parse_time(b"2003032217310"), None);
    }

    #[test]
    fn ip4_values() {
        assert_eq!(parse_ip4(b"192.0.2.1"), Some([192, 0, 2, 1]));
        assert_eq!(parse_ip4(b"0.0.0.0"), Some([0, 0, 0, 0]));
        assert_eq!(parse_ip4(b"192.0.2"), None);
        assert_eq!(parse_ip4(b"192.0.2.1.5"), None);
        assert_eq!(parse_ip4(b"192.0.02.1"), None);
        assert_eq!(parse_ip4(b"192.0.2.256"), None);
    }

    #[test]
    fn svc_keys() {
        assert_eq!(svc_key(b"alpn"), Some(1));
        assert_eq!(svc_key(b"ALPN"), Some(1));
        assert_eq!(svc_key(b"key7"), Some(7));
        assert_eq!(svc_key(b"key65535"), Some(65535));
        assert_eq!(svc_key(b"key"), None);
        assert_eq!(svc_key(b"nonsense"), None);
    }

    #[test]
    fn svc_values() {
        assert_eq!(svc_value(3, b"853").unwrap(), b"\x03\x55");
        assert_eq!(
            svc_value(1, b"h2,h3").unwrap(),
            b"\x02h2\x02h3"
        );
        assert_eq!(
            svc_value(4, b"192.0.2.1,192.0.2.2").unwrap(),
            b"\xc0\x00\x02\x01\xc0\x00\x02\x02"
        );
        assert_eq!(
            svc_value(0, b"port,alpn").unwrap(),
            b"\x00\x01\x00\x03"
        );
        assert!(svc_value(3, b"port").is_err());
    }
}
