use alloc::string::String;
use alloc::vec::Vec;

use quickcheck::{quickcheck, Arbitrary, Gen};

use crate::{escape, parse, serialize, unescape, Map, Value, XmlConfig};

/// Documents that parse to trees inside the round-trippable subset: no
/// synthetic-key collisions, no arrays of arrays.
#[test]
fn parse_serialize_parse_is_identity_on_parsed_trees() {
    let config = XmlConfig::default();
    let documents = [
        "<a><b>1</b><b>2</b><b>true</b></a>",
        "<addr street=\"abc\" number=\"12\"><name>Joe</name></addr>",
        "<r><x/><y>null</y><z>-23.45</z></r>",
        "<outer><inner><leaf>v</leaf></inner><inner><leaf>w</leaf></inner></outer>",
    ];
    for xml in documents {
        let first = parse(xml, &config).unwrap();
        let emitted = serialize(&Value::Object(first.clone()), None, &config);
        let second = parse(&emitted, &config).unwrap();
        assert_eq!(first, second, "document {xml} did not round-trip");
    }
}

#[test]
fn indentation_is_ignorable_noise() {
    let config = XmlConfig::default();
    let indented = XmlConfig {
        indent_factor: 4,
        ..XmlConfig::default()
    };
    let first = parse("<a><b>1</b><c>x</c></a>", &config).unwrap();
    let emitted = serialize(&Value::Object(first.clone()), None, &indented);
    let second = parse(&emitted, &config).unwrap();
    assert_eq!(first, second);
}

fn arbitrary_scalar(g: &mut Gen) -> Value {
    match *g.choose(&[0u8, 1, 2, 3]).unwrap() {
        0 => Value::Null,
        1 => Value::Boolean(bool::arbitrary(g)),
        2 => Value::Integer(i64::arbitrary(g)),
        _ => {
            let len = usize::arbitrary(g) % 6;
            Value::String((0..len).map(|_| *g.choose(&['x', 'y', 'z', ' ']).unwrap()).collect())
        }
    }
}

fn arbitrary_value(g: &mut Gen, depth: usize) -> Value {
    if depth == 0 {
        return arbitrary_scalar(g);
    }
    match *g.choose(&[0u8, 1, 2]).unwrap() {
        0 => arbitrary_scalar(g),
        1 => {
            // Arrays of scalars: arrays of arrays are outside the subset.
            let len = 1 + usize::arbitrary(g) % 3;
            Value::Array((0..len).map(|_| arbitrary_scalar(g)).collect())
        }
        _ => {
            let mut map = Map::default();
            for key in ["alpha", "beta", "gamma"] {
                if bool::arbitrary(g) {
                    map.insert(String::from(key), arbitrary_value(g, depth - 1));
                }
            }
            Value::Object(map)
        }
    }
}

#[derive(Clone, Debug)]
struct Doc(Map);

impl Arbitrary for Doc {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut map = Map::default();
        map.insert(String::from("root"), arbitrary_value(g, 3));
        Doc(map)
    }
}

quickcheck! {
    fn escape_round_trips_every_string(s: String) -> bool {
        unescape(&escape(&s)) == s
    }

    fn projection_reaches_a_fixed_point(doc: Doc) -> bool {
        let config = XmlConfig::default();
        let once = parse(&serialize(&Value::Object(doc.0), None, &config), &config).unwrap();
        let twice = parse(&serialize(&Value::Object(once.clone()), None, &config), &config).unwrap();
        once == twice
    }

    fn unescape_never_panics(s: String) -> bool {
        let _ = unescape(&s);
        true
    }
}

#[test]
fn escape_round_trips_the_awkward_cases() {
    let cases: Vec<String> = [
        "",
        "&amp;",
        "&#x41;",
        "a\u{0}b\u{1F}c\u{7F}d\u{9F}e",
        "already & raw < text >",
        "mixed \u{2028} unicode 😀",
    ]
    .iter()
    .map(|s| String::from(*s))
    .collect();
    for s in cases {
        assert_eq!(unescape(&escape(&s)), s);
    }
}
