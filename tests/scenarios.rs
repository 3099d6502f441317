//! End-to-end scenarios against the public interface.

use std::fs;
use std::path::PathBuf;

use zonescan::{parse_file, parse_string, Cache, Error, Options, Record};

/// The records delivered by one parse, flattened to owned tuples.
type Collected = Vec<(Vec<u8>, u16, u16, u32, Vec<u8>)>;

fn collect(options: &Options, input: &[u8]) -> Result<Collected, Error> {
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
    parse_string(options, &mut cache, input, &mut sink)?;
    Ok(records)
}

/// A scratch directory for tests that need real files.
fn scratch(name: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("zonescan-test-{}-{}", std::process::id(), name));
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn basic_record() {
    let mut options = Options::new("example.com.");
    options.default_ttl = 3600;
    let records =
        collect(&options, b"example.com. 3600 IN A 192.0.2.1\n").unwrap();
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
fn owner_and_record_bounds() {
    // Every delivered record obeys the wire format bounds.
    let mut options = Options::new("example.com.");
    options.default_ttl = 300;
    let input = b"\
        @ SOA ns hostmaster 1 7200 600 3600000 60\n\
        www A 192.0.2.1\n\
        txt TXT \"one\" two three\n\
        very.deeply.nested.name.with.many.labels AAAA 2001:db8::1\n";
    let mut cache = Cache::new(1);
    let mut count = 0;
    let mut sink = |record: &Record<'_>| {
        assert!(record.owner.len() <= 255);
        let mut labels = record.owner.as_slice();
        while let Some((&len, tail)) = labels.split_first() {
            assert!(len <= 63);
            if len == 0 {
                assert!(tail.is_empty());
                break;
            }
            labels = &tail[len as usize..];
        }
        assert!(record.rdata.len() <= 65535);
        count += 1;
        Ok(0)
    };
    parse_string(&options, &mut cache, input, &mut sink).unwrap();
    assert_eq!(count, 4);
}

#[test]
fn include_interleaves_and_restores_state() {
    let dir = scratch("include");
    let sub = dir.join("sub.zone");
    fs::write(&sub, "a A 192.0.2.3\n").unwrap();
    let main = dir.join("main.zone");
    fs::write(
        &main,
        format!(
            "outer 300 A 192.0.2.1\n\
             $INCLUDE {} inner.test.\n \
             A 192.0.2.9\n",
            sub.display()
        ),
    )
    .unwrap();

    let mut options = Options::new("example.com.");
    options.default_ttl = 60;
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
    parse_file(&options, &mut cache, &main, &mut sink).unwrap();

    assert_eq!(records.len(), 3);
    // The included record interleaves at the directive, relative to the
    // origin given on the directive, inheriting the running TTL.
    assert_eq!(records[1].0, b"\x01a\x05inner\x04test\x00".to_vec());
    assert_eq!(records[1].3, 300);
    // After the include, the outer frame's owner and origin are intact.
    assert_eq!(records[2].0, b"\x05outer\x07example\x03com\x00".to_vec());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn include_cycles_are_rejected() {
    let dir = scratch("cycle");
    let one = dir.join("one.zone");
    let two = dir.join("two.zone");
    fs::write(&one, format!("$INCLUDE {}\n", two.display())).unwrap();
    fs::write(&two, format!("$INCLUDE {}\n", one.display())).unwrap();

    let options = Options::new("example.com.");
    let mut cache = Cache::new(1);
    let mut sink = |_: &Record<'_>| Ok(0);
    let err = parse_file(&options, &mut cache, &one, &mut sink).unwrap_err();
    assert!(matches!(err, Error::Semantic(_)));
    assert_eq!(err.code(), -2);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn cache_ring_gives_look_behind() {
    // With two blocks and an alternating sink, each record arrives
    // intact even though the parser keeps assembling into the ring.
    let mut options = Options::new("x.");
    options.default_ttl = 60;
    let mut cache = Cache::new(2);
    let mut next = 1;
    let mut seen = Vec::new();
    let mut sink = |record: &Record<'_>| {
        seen.push(record.rdata.to_vec());
        next = 1 - next;
        Ok(1 - next)
    };
    parse_string(
        &options,
        &mut cache,
        b"a A 192.0.2.1\nb A 192.0.2.2\nc A 192.0.2.3\n",
        &mut sink,
    )
    .unwrap();
    assert_eq!(
        seen,
        vec![
            b"\xc0\x00\x02\x01".to_vec(),
            b"\xc0\x00\x02\x02".to_vec(),
            b"\xc0\x00\x02\x03".to_vec(),
        ]
    );
}

#[test]
fn maximum_generic_rdata() {
    let mut options = Options::new("x.");
    options.default_ttl = 60;
    let mut input = Vec::new();
    input.extend_from_slice(b"big TYPE999 \\# 65535 ");
    input.extend(std::iter::repeat(b'A').take(2 * 65535));
    input.push(b'\n');
    let records = collect(&options, &input).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].4.len(), 65535);
    assert!(records[0].4.iter().all(|&b| b == 0xAA));

    // One octet more does not fit into a record.
    let mut input = Vec::new();
    input.extend_from_slice(b"big TYPE999 \\# 65536 ");
    input.extend(std::iter::repeat(b'A').take(2 * 65536));
    input.push(b'\n');
    let records = collect(&options, &input).unwrap();
    assert!(records.is_empty());
}

#[test]
fn defaults_follow_previous_record() {
    let mut options = Options::new("zone.test.");
    options.default_ttl = 42;
    let records = collect(
        &options,
        b"a 100 CH A 192.0.2.1\n\
          \tA 192.0.2.2\n\
          b MX 5 mail\n",
    )
    .unwrap();
    // The indented record inherits owner, TTL, and class verbatim.
    assert_eq!(records[1].0, records[0].0);
    assert_eq!(records[1].2, records[0].2);
    assert_eq!(records[1].3, records[0].3);
    // A new owner keeps inheriting TTL and class.
    assert_eq!(records[2].2, 3);
    assert_eq!(records[2].3, 100);
}

#[test]
fn input_larger_than_the_window() {
    // Enough records to slide the input window several times, with
    // refills landing in the middle of tokens.
    let mut options = Options::new("big.test.");
    options.default_ttl = 60;
    let mut input = Vec::new();
    let count = 40_000;
    for i in 0..count {
        input.extend_from_slice(
            format!("host-{:05} 300 IN A 192.0.2.1\n", i).as_bytes(),
        );
    }
    assert!(input.len() > 512 * 1024);

    let mut cache = Cache::new(1);
    let mut seen = 0u32;
    let mut sink = |record: &Record<'_>| {
        assert_eq!(record.rdata, b"\xc0\x00\x02\x01");
        seen += 1;
        Ok(0)
    };
    parse_string(&options, &mut cache, &input, &mut sink).unwrap();
    assert_eq!(seen, count);
}

/// All scanner implementations must deliver the same records and codes.
///
/// This is the only test that manipulates `ZONE_TARGET`, keeping the
/// environment mutation inside a single test.
#[test]
fn scanner_variants_agree() {
    let zone: &[u8] = b"\
        $TTL 1h\n\
        @ IN SOA ns.example.com. host.example.com. (\n\
            2023120401 ; serial\n\
            7200 3600 1209600 300 )\n\
        www A 192.0.2.1\n\
        txt TXT \"spanning ( weird ; bytes\" plain\n\
        aaaa AAAA 2001:db8::42\n\
        gen TYPE4711 \\# 2 BEEF\n";
    let mut options = Options::new("example.com.");
    options.default_ttl = 60;

    let mut results = Vec::new();
    for target in ["fallback", "westmere", "haswell", "bogus"] {
        std::env::set_var("ZONE_TARGET", target);
        results.push(collect(&options, zone).unwrap());
    }
    std::env::remove_var("ZONE_TARGET");

    assert!(!results[0].is_empty());
    for other in &results[1..] {
        assert_eq!(&results[0], other);
    }
}
