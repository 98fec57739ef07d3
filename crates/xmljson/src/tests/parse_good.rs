use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec;

use crate::{parse, Value, XmlConfig, XsiTypeConverter, XsiTypeMap};

/// Parses with defaults and renders the result as compact JSON.
fn json(xml: &str) -> String {
    json_with(xml, &XmlConfig::default())
}

fn json_with(xml: &str, config: &XmlConfig) -> String {
    Value::Object(parse(xml, config).unwrap()).to_string()
}

#[test]
fn repeated_children_promote_to_arrays() {
    assert_eq!(
        json("<a><b>1</b><b>2</b><b>true</b></a>"),
        r#"{"a":{"b":[1,2,true]}}"#
    );
}

#[test]
fn empty_input_yields_empty_object() {
    assert_eq!(json(""), "{}");
}

#[test]
fn input_without_markup_yields_empty_object() {
    assert_eq!(json("{ \"this is\": \"not xml\"}"), "{}");
}

#[test]
fn declaration_comment_and_doctype_are_ignored() {
    let xml = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
               <!DOCTYPE root [<!ENTITY e \"v\">]>\n\
               <root><!-- a -- comment -->ok</root>";
    assert_eq!(json(xml), r#"{"root":"ok"}"#);
}

#[test]
fn empty_element_projects_to_empty_string() {
    assert_eq!(json("<a/>"), r#"{"a":""}"#);
    assert_eq!(json("<a></a>"), r#"{"a":""}"#);
    assert_eq!(json("<a>   </a>"), r#"{"a":""}"#);
}

#[test]
fn attributes_become_coerced_members() {
    assert_eq!(
        json(r#"<addr street="abc" number="12">home</addr>"#),
        r#"{"addr":{"street":"abc","number":12,"content":"home"}}"#
    );
}

#[test]
fn attribute_without_value_defaults_to_its_name() {
    assert_eq!(json("<input checked/>"), r#"{"input":{"checked":"checked"}}"#);
}

#[test]
fn unquoted_attribute_values_are_accepted() {
    assert_eq!(json("<a b=c></a>"), r#"{"a":{"b":"c"}}"#);
}

#[test]
fn repeated_attributes_promote_to_arrays() {
    assert_eq!(json(r#"<a x="1" x="2"/>"#), r#"{"a":{"x":[1,2]}}"#);
}

#[test]
fn mixed_text_accumulates_under_the_content_key() {
    assert_eq!(
        json("<a>x<b>1</b>y</a>"),
        r#"{"a":{"content":["x","y"],"b":1}}"#
    );
}

#[test]
fn comment_split_text_becomes_an_array() {
    assert_eq!(json("<a>one<!-- --></a>"), r#"{"a":"one"}"#);
    assert_eq!(json("<a>one<!-- -->two</a>"), r#"{"a":["one","two"]}"#);
}

#[test]
fn content_named_child_collides_with_text() {
    // A child literally named like the synthetic key shares it: the usual
    // promotion applies and the element collapses to the accumulated pair.
    assert_eq!(json("<a><content>c</content>x</a>"), r#"{"a":["c","x"]}"#);
}

#[test]
fn surrounding_whitespace_is_trimmed() {
    assert_eq!(json("<a>  padded  </a>"), r#"{"a":"padded"}"#);
}

#[test]
fn entities_resolve_in_text_and_attributes() {
    assert_eq!(
        json(r#"<a q="5 &gt; 4">&lt;b&gt; &amp; &quot;c&apos;</a>"#),
        r#"{"a":{"q":"5 > 4","content":"<b> & \"c'"}}"#
    );
}

#[test]
fn numeric_references_reach_the_supplementary_planes() {
    assert_eq!(json("<root>A &#8364;33</root>"), r#"{"root":"A €33"}"#);
    assert_eq!(json("<e>&#x1F600;</e>"), r#"{"e":"😀"}"#);
}

#[test]
fn named_entities_fold_case_in_markup() {
    assert_eq!(json("<a>x &AMP; y</a>"), r#"{"a":"x & y"}"#);
}

#[test]
fn unknown_entities_are_preserved_literally() {
    assert_eq!(json("<a>&copy; 2020</a>"), r#"{"a":"&copy; 2020"}"#);
}

#[test]
fn cdata_is_verbatim_and_never_coerced() {
    assert_eq!(json("<a><![CDATA[1]]></a>"), r#"{"a":"1"}"#);
    assert_eq!(json("<a><![CDATA[1 < 2 & 3]]></a>"), r#"{"a":"1 < 2 & 3"}"#);
}

#[test]
fn empty_cdata_still_counts_as_a_segment() {
    assert_eq!(json("<a>x<![CDATA[]]></a>"), r#"{"a":["x",""]}"#);
}

#[test]
fn standalone_cdata_joins_the_root_object() {
    assert_eq!(
        json("<tag1></tag1><![CDATA[x<y]]><tag2></tag2>"),
        r#"{"tag1":"","content":"x<y","tag2":""}"#
    );
}

#[test]
fn multiple_standalone_cdata_promote_to_an_array() {
    assert_eq!(
        json("<![CDATA[one]]><![CDATA[two]]>"),
        r#"{"content":["one","two"]}"#
    );
}

#[test]
fn top_level_text_is_discarded() {
    assert_eq!(json("noise <a>1</a> more noise"), r#"{"a":1}"#);
}

#[test]
fn multiple_roots_share_the_result_map() {
    assert_eq!(json("<a>1</a><a>2</a><b/>"), r#"{"a":[1,2],"b":""}"#);
}

#[test]
fn coercion_picks_the_smallest_exact_form() {
    assert_eq!(
        json("<n><i>7</i><big>92233720368547758080</big><d>-23.45</d><s>01</s></n>"),
        r#"{"n":{"i":7,"big":92233720368547758080,"d":-23.45,"s":"01"}}"#
    );
}

#[test]
fn keep_strings_disables_coercion() {
    let config = XmlConfig {
        keep_strings: true,
        ..XmlConfig::default()
    };
    assert_eq!(
        json_with(r#"<a n="1"><b>true</b></a>"#, &config),
        r#"{"a":{"n":"1","b":"true"}}"#
    );
}

#[test]
fn cdata_tag_name_is_configurable() {
    let config = XmlConfig {
        cdata_tag_name: String::from("text"),
        ..XmlConfig::default()
    };
    assert_eq!(
        json_with("<a>x<b>1</b></a>", &config),
        r#"{"a":{"text":"x","b":1}}"#
    );
}

#[test]
fn nil_attribute_is_ordinary_by_default() {
    assert_eq!(
        json(r#"<r><id xsi:nil="true"/></r>"#),
        r#"{"r":{"id":{"xsi:nil":true}}}"#
    );
}

#[test]
fn nil_attribute_converts_to_null_when_enabled() {
    let config = XmlConfig {
        convert_nil_to_null: true,
        ..XmlConfig::default()
    };
    assert_eq!(json_with(r#"<r><id xsi:nil="true"/></r>"#, &config), r#"{"r":{"id":null}}"#);
    // Case-insensitive match, and attributes after the nil marker are moot.
    assert_eq!(
        json_with(r#"<r><id xsi:nil="TRUE" a="1">text</id></r>"#, &config),
        r#"{"r":{"id":null}}"#
    );
    // A non-true nil stays an ordinary attribute.
    assert_eq!(
        json_with(r#"<r><id xsi:nil="false"/></r>"#, &config),
        r#"{"r":{"id":{"xsi:nil":false}}}"#
    );
}

fn as_string(value: &str) -> Value {
    Value::String(value.into())
}

fn as_integer(value: &str) -> Value {
    value.parse().map(Value::Integer).unwrap_or(Value::Null)
}

#[test]
fn xsi_type_converters_replace_coercion() {
    let config = XmlConfig {
        xsi_type_map: [
            (String::from("string"), as_string as XsiTypeConverter),
            (String::from("integer"), as_integer as XsiTypeConverter),
        ]
        .into_iter()
        .collect(),
        ..XmlConfig::default()
    };
    assert_eq!(
        json_with(
            r#"<root><id1 xsi:type="string">1234</id1><id2 xsi:type="integer">1234</id2></root>"#,
            &config,
        ),
        r#"{"root":{"id1":"1234","id2":1234}}"#
    );
}

#[test]
fn unrecognized_xsi_type_stays_an_attribute() {
    let config = XmlConfig {
        xsi_type_map: [(String::from("string"), as_string as XsiTypeConverter)]
            .into_iter()
            .collect(),
        ..XmlConfig::default()
    };
    assert_eq!(
        json_with(r#"<root><id xsi:type="float">1.5</id></root>"#, &config),
        r#"{"root":{"id":{"xsi:type":"float","content":1.5}}}"#
    );
}

#[test]
fn xsi_type_map_is_copied_at_construction() {
    let mut converters: BTreeMap<String, XsiTypeConverter> = BTreeMap::new();
    converters.insert(String::from("string"), as_string as XsiTypeConverter);
    let config = XmlConfig {
        xsi_type_map: XsiTypeMap::from(&converters),
        ..XmlConfig::default()
    };
    // Emptying the source map leaves the configuration's copy intact.
    converters.clear();
    assert_eq!(
        json_with(r#"<root><id xsi:type="string">12</id></root>"#, &config),
        r#"{"root":{"id":"12"}}"#
    );
}

#[test]
fn xsi_type_is_inert_with_an_empty_map() {
    assert_eq!(
        json(r#"<root><id xsi:type="string">1234</id></root>"#),
        r#"{"root":{"id":{"xsi:type":"string","content":1234}}}"#
    );
}

#[test]
fn force_list_wraps_single_occurrences() {
    let mut config = XmlConfig::default();
    config.force_list.insert(String::from("b"));
    assert_eq!(json_with("<a><b>1</b></a>", &config), r#"{"a":{"b":[1]}}"#);
    assert_eq!(
        json_with("<a><b>1</b><b>2</b></a>", &config),
        r#"{"a":{"b":[1,2]}}"#
    );
    assert_eq!(json_with("<a><b/></a>", &config), r#"{"a":{"b":[""]}}"#);
}

#[test]
fn nesting_within_the_bound_parses() {
    let xml = "<Test>\n  <employee>\n    <name>sonoo</name>\n    <salary>56000</salary>\n    <married>true</married>\n  </employee>\n</Test>\n";
    let config = XmlConfig {
        max_nesting_depth: Some(3),
        ..XmlConfig::default()
    };
    assert_eq!(
        json_with(xml, &config),
        r#"{"Test":{"employee":{"name":"sonoo","salary":56000,"married":true}}}"#
    );
}

#[test]
fn unbounded_nesting_when_disabled() {
    let mut xml = String::new();
    for _ in 0..600 {
        xml.push_str("<d>");
    }
    xml.push_str("leaf");
    for _ in 0..600 {
        xml.push_str("</d>");
    }
    let config = XmlConfig {
        max_nesting_depth: None,
        ..XmlConfig::default()
    };
    assert!(parse(&xml, &config).is_ok());
}

#[test]
fn crlf_input_parses_like_lf() {
    assert_eq!(
        json("<a>\r\n<b>1</b>\r\n</a>"),
        json("<a>\n<b>1</b>\n</a>")
    );
}

#[test]
fn result_map_preserves_insertion_order() {
    let doc = parse("<z/><m/><a/>", &XmlConfig::default()).unwrap();
    let keys: vec::Vec<&str> = doc.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["z", "m", "a"]);
}
