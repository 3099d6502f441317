//! Zone fixture tests driven by YAML descriptions.
//!
//! Each fixture gives the parser options, a zone file, and the records it
//! must produce, with record data as hex.

use std::str::FromStr;

use serde::Deserialize;
use zonescan::utils::base16;
use zonescan::{parse_string, Cache, Name, Options, Record};

#[derive(Deserialize)]
struct TestCase {
    origin: String,
    ttl: u32,
    zonefile: String,
    records: Vec<RecordCase>,
}

#[derive(Deserialize)]
struct RecordCase {
    owner: String,
    rtype: u16,
    #[serde(default = "default_class")]
    class: u16,
    ttl: u32,
    rdata: String,
}

fn default_class() -> u16 {
    1
}

impl TestCase {
    fn run(yaml: &str) {
        let case: TestCase = serde_yaml::from_str(yaml).unwrap();
        let mut options = Options::new(case.origin.as_str());
        options.default_ttl = case.ttl;
        let mut cache = Cache::new(2);

        let mut expected = case.records.iter();
        let mut sink = |record: &Record<'_>| {
            let want = expected.next().expect("more records than expected");
            let owner = Name::from_str(&want.owner).unwrap();
            assert_eq!(record.owner, &owner, "owner of {}", want.owner);
            assert_eq!(record.rtype.to_int(), want.rtype);
            assert_eq!(record.class.to_int(), want.class);
            assert_eq!(record.ttl, want.ttl);
            assert_eq!(
                record.rdata,
                base16::decode(&want.rdata).unwrap(),
                "rdata of {}",
                want.owner
            );
            Ok(0)
        };
        parse_string(
            &options,
            &mut cache,
            case.zonefile.as_bytes(),
            &mut sink,
        )
        .unwrap();
        assert!(expected.next().is_none(), "fewer records than expected");
    }
}

#[test]
fn basic() {
    TestCase::run(include_str!("../test-data/zones/basic.yaml"));
}

#[test]
fn escapes() {
    TestCase::run(include_str!("../test-data/zones/escape.yaml"));
}

#[test]
fn assorted_types() {
    TestCase::run(include_str!("../test-data/zones/records.yaml"));
}
