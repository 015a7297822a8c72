use rstest::rstest;

use super::utils::{decode, decode_all_with, decode_with};
use crate::{DecoderOptions, DefaultLookup, UnknownFieldPolicy};

const LONG_AND_ARRAY: &str = r#"{"type": "record", "name": "R", "fields": [
    {"name": "l", "type": "long"},
    {"name": "a", "type": {"type": "array", "items": "int"}}
]}"#;

#[test]
fn fields_out_of_order_across_datums() {
    let datums = decode_all_with(
        LONG_AND_ARRAY,
        r#"{"a":[1,2],"l":100}{"l": 200, "a":[1,2]}"#,
        DecoderOptions::default(),
    )
    .unwrap();
    assert_eq!(datums, [r#"{"l":100,"a":[1,2]}"#, r#"{"l":200,"a":[1,2]}"#]);
}

#[rstest]
#[case::in_order(r#"{"x": {"p": 1, "q": "s"}, "y": 5}"#)]
#[case::outer_swapped(r#"{"y": 5, "x": {"p": 1, "q": "s"}}"#)]
#[case::inner_swapped(r#"{"x": {"q": "s", "p": 1}, "y": 5}"#)]
#[case::both_swapped(r#"{"y": 5, "x": {"q": "s", "p": 1}}"#)]
fn nested_records_in_any_order(#[case] input: &str) {
    let schema = r#"{"type": "record", "name": "Outer", "fields": [
        {"name": "x", "type": {"type": "record", "name": "Inner", "fields": [
            {"name": "p", "type": "int"},
            {"name": "q", "type": "string"}
        ]}},
        {"name": "y", "type": "long"}
    ]}"#;
    assert_eq!(decode(schema, input).unwrap(), r#"{"x":{"p":1,"q":"s"},"y":5}"#);
}

#[test]
fn buffered_record_is_reordered_again_on_replay() {
    // `x` is buffered while `y` is looked for, and its own fields are out of
    // order inside the buffered tokens.
    let schema = r#"{"type": "record", "name": "Outer", "fields": [
        {"name": "y", "type": "long"},
        {"name": "x", "type": {"type": "record", "name": "Inner", "fields": [
            {"name": "p", "type": "int"},
            {"name": "q", "type": "string"},
            {"name": "r", "type": {"type": "array", "items": "boolean"}}
        ]}}
    ]}"#;
    let input = r#"{"x": {"r": [true], "q": "s", "p": 1}, "y": 5}"#;
    assert_eq!(
        decode(schema, input).unwrap(),
        r#"{"y":5,"x":{"p":1,"q":"s","r":[true]}}"#
    );
}

#[test]
fn records_inside_arrays_are_reordered_independently() {
    let schema = r#"{"type": "record", "name": "R", "fields": [
        {"name": "items", "type": {"type": "array", "items": {
            "type": "record", "name": "Pair", "fields": [
                {"name": "a", "type": "int"},
                {"name": "b", "type": "int"}
            ]}}}
    ]}"#;
    assert_eq!(
        decode(schema, r#"{"items": [{"b": 2, "a": 1}, {"a": 3, "b": 4}, {"b": 6, "a": 5}]}"#).unwrap(),
        r#"{"items":[{"a":1,"b":2},{"a":3,"b":4},{"a":5,"b":6}]}"#
    );
}

#[test]
fn absent_field_takes_declared_default() {
    let schema = r#"{"type": "record", "name": "R", "fields": [
        {"name": "a", "type": "long", "default": 7}
    ]}"#;
    assert_eq!(decode(schema, "{}").unwrap(), r#"{"a":7}"#);
    assert_eq!(decode(schema, r#"{"a": 8}"#).unwrap(), r#"{"a":8}"#);
}

#[rstest]
#[case::absent("{}", "null")]
#[case::bare_null(r#"{"a": null}"#, "null")]
#[case::tagged_null(r#"{"a": {"null": null}}"#, "null")]
#[case::tagged_long(r#"{"a": {"long": 42}}"#, "42")]
#[case::bare_long(r#"{"a": 42}"#, "42")]
fn nullable_union_forms(#[case] input: &str, #[case] expected: &str) {
    let schema = r#"{"type": "record", "name": "R", "fields": [
        {"name": "a", "type": ["null", "long"], "default": null}
    ]}"#;
    assert_eq!(decode(schema, input).unwrap(), format!(r#"{{"a":{expected}}}"#));
}

#[rstest]
#[case::int_from_integer("int", "1", "1")]
#[case::int_from_float("int", "1.0", "1")]
#[case::long_from_integer("long", "1", "1")]
#[case::long_from_float("long", "1.0", "1")]
#[case::long_truncates("long", "-2.75", "-2")]
#[case::long_exponent("long", "2e3", "2000")]
#[case::long_beyond_f64_precision("long", "9007199254740993", "9007199254740993")]
#[case::float_from_integer("float", "1", "1.0")]
#[case::float_from_float("float", "1.0", "1.0")]
#[case::double_from_integer("double", "1", "1.0")]
#[case::double_from_float("double", "1.0", "1.0")]
#[case::double_negative_exponent("double", "-2.5E-1", "-0.25")]
#[case::double_overflow_renders_null("double", "1e400", "null")]
fn numbers_accept_integer_and_float_lexemes(
    #[case] ty: &str,
    #[case] lexeme: &str,
    #[case] expected: &str,
) {
    let schema = format!(r#"{{"type": "record", "name": "N", "fields": [{{"name": "n", "type": "{ty}"}}]}}"#);
    assert_eq!(
        decode(&schema, &format!(r#"{{"n": {lexeme}}}"#)).unwrap(),
        format!(r#"{{"n":{expected}}}"#)
    );
}

#[test]
fn nested_record_defaults_fill_missing_fields() {
    let schema = r#"{"type": "record", "name": "R", "fields": [
        {"name": "S", "type": {"type": "record", "name": "S", "fields": [
            {"name": "a", "type": ["null", "long"], "default": null},
            {"name": "b", "type": "long"}
        ]}}
    ]}"#;
    assert_eq!(decode(schema, r#"{"S": {"b": 1}}"#).unwrap(), r#"{"S":{"a":null,"b":1}}"#);
}

#[test]
fn nullable_array_defaults_to_null() {
    let schema = r#"{"type": "record", "name": "R", "fields": [
        {"name": "A", "type": ["null", {"type": "array", "items": "long"}], "default": null}
    ]}"#;
    assert_eq!(decode(schema, "{}").unwrap(), r#"{"A":null}"#);
    assert_eq!(decode(schema, r#"{"A": [1, 2]}"#).unwrap(), r#"{"A":[1,2]}"#);
    assert_eq!(decode(schema, r#"{"A": {"array": [3]}}"#).unwrap(), r#"{"A":[3]}"#);
}

#[test]
fn nullable_record_defaults_to_null() {
    let schema = r#"{"type": "record", "name": "R", "namespace": "com.example", "fields": [
        {"name": "S", "type": ["null", {"type": "record", "name": "S", "fields": [
            {"name": "A", "type": "long"}
        ]}], "default": null}
    ]}"#;
    assert_eq!(decode(schema, "{}").unwrap(), r#"{"S":null}"#);
}

#[rstest]
#[case::bare(r#"{"S": {"A": 1}}"#)]
#[case::tagged_full_name(r#"{"S": {"com.example.S": {"A": 1}}}"#)]
#[case::tagged_short_name(r#"{"S": {"S": {"A": 1}}}"#)]
fn nullable_record_bare_or_tagged(#[case] input: &str) {
    let schema = r#"{"type": "record", "name": "R", "namespace": "com.example", "fields": [
        {"name": "S", "type": ["null", {"type": "record", "name": "S", "fields": [
            {"name": "A", "type": "long"}
        ]}], "default": null}
    ]}"#;
    assert_eq!(decode(schema, input).unwrap(), r#"{"S":{"A":1}}"#);
}

#[test]
fn record_field_named_like_its_branch_is_read_bare() {
    // `{"S": ...}` could be a tag wrapper, but `S` is also a field of the
    // record, so the object is the record itself.
    let schema = r#"{"type": "record", "name": "R", "fields": [
        {"name": "v", "type": ["null", {"type": "record", "name": "S", "fields": [
            {"name": "S", "type": "long"}
        ]}]}
    ]}"#;
    assert_eq!(decode(schema, r#"{"v": {"S": 3}}"#).unwrap(), r#"{"v":{"S":3}}"#);
}

#[test]
fn nullable_map_is_read_bare_even_when_keyed_like_a_branch() {
    let schema = r#"{"type": "record", "name": "R", "fields": [
        {"name": "m", "type": ["null", {"type": "map", "values": ["null", "long"]}]}
    ]}"#;
    assert_eq!(decode(schema, r#"{"m": {"long": 1}}"#).unwrap(), r#"{"m":{"long":1}}"#);
    assert_eq!(decode(schema, r#"{"m": null}"#).unwrap(), r#"{"m":null}"#);
    assert_eq!(decode(schema, r#"{"m": {"null": null}}"#).unwrap(), r#"{"m":{"null":null}}"#);
    assert_eq!(decode(schema, r#"{"m": {"map": null}}"#).unwrap(), r#"{"m":{"map":null}}"#);
}

#[test]
fn complex_nesting_with_absent_nullable_arrays() {
    let schema = r#"{"type": "record", "name": "wrapper", "fields": [
        {"name": "data", "type": {"type": "array", "items": {
            "type": "record", "name": "r1", "fields": [
                {"name": "r1", "type": {"type": "array", "items": {
                    "type": "record", "name": "sr2", "fields": [
                        {"name": "sr2", "type": "string"}
                    ]}}},
                {"name": "r2", "type": {"type": "array", "items": {
                    "type": "record", "name": "r2", "fields": [
                        {"name": "notfound1", "type": ["null", {"type": "array", "items": "string"}], "default": null},
                        {"name": "notfound2", "type": ["null", {"type": "array", "items": "string"}], "default": null}
                    ]}}}
            ]}}}
    ]}"#;
    let input = r#"{"data": [{"r1": [], "r2": [{"notfound1": {"array": ["val1", "val2"]}}]}]}"#;
    insta::assert_snapshot!(
        decode(schema, input).unwrap(),
        @r#"{"data":[{"r1":[],"r2":[{"notfound1":["val1","val2"],"notfound2":null}]}]}"#
    );
}

#[rstest]
#[case::tagged_string(r#"{"u": {"string": "x"}}"#, r#""x""#)]
#[case::tagged_long(r#"{"u": {"long": 5}}"#, "5")]
#[case::bare_null(r#"{"u": null}"#, "null")]
#[case::tagged_null(r#"{"u": {"null": null}}"#, "null")]
fn general_union_requires_tags(#[case] input: &str, #[case] expected: &str) {
    let schema = r#"{"type": "record", "name": "R", "fields": [
        {"name": "u", "type": ["string", "long", "null"]}
    ]}"#;
    assert_eq!(decode(schema, input).unwrap(), format!(r#"{{"u":{expected}}}"#));
}

#[test]
fn array_of_nullable_ints_mixes_forms() {
    let schema = r#"{"type": "array", "items": ["null", "int"]}"#;
    assert_eq!(decode(schema, r#"[1, null, {"int": 2}, {"null": null}]"#).unwrap(), "[1,null,2,null]");
}

#[test]
fn recursive_schema() {
    let schema = r#"{"type": "record", "name": "Node", "fields": [
        {"name": "value", "type": "int"},
        {"name": "next", "type": ["null", "Node"], "default": null}
    ]}"#;
    assert_eq!(
        decode(schema, r#"{"value": 1, "next": {"next": {"value": 3}, "value": 2}}"#).unwrap(),
        r#"{"value":1,"next":{"value":2,"next":{"value":3,"next":null}}}"#
    );
    assert_eq!(
        decode(schema, r#"{"next": {"Node": {"value": 2}}, "value": 1}"#).unwrap(),
        r#"{"value":1,"next":{"value":2,"next":null}}"#
    );
}

#[test]
fn enums_maps_bytes_and_fixed() {
    let schema = r#"{"type": "record", "name": "R", "fields": [
        {"name": "c", "type": {"type": "enum", "name": "Color", "symbols": ["RED", "GREEN"]}},
        {"name": "m", "type": {"type": "map", "values": "long"}},
        {"name": "b", "type": "bytes"},
        {"name": "f", "type": {"type": "fixed", "name": "F", "size": 2}},
        {"name": "t", "type": "boolean"}
    ]}"#;
    let input = r#"{"t": true, "f": "ab", "b": "éA", "m": {"y": 2, "x": 1}, "c": "GREEN"}"#;
    assert_eq!(
        decode(schema, input).unwrap(),
        r#"{"c":"GREEN","m":{"y":2,"x":1},"b":"éA","f":"ab","t":true}"#
    );
}

#[test]
fn defaults_of_every_shape() {
    let schema = r#"{"type": "record", "name": "R", "fields": [
        {"name": "inner", "type": {"type": "record", "name": "Inner", "fields": [
            {"name": "a", "type": "int", "default": 1},
            {"name": "b", "type": ["null", "string"], "default": null}
        ]}, "default": {}},
        {"name": "list", "type": {"type": "array", "items": "Inner"}, "default": [{"a": 2}]},
        {"name": "m", "type": {"type": "map", "values": "double"}, "default": {"k": 1}},
        {"name": "c", "type": {"type": "enum", "name": "Color", "symbols": ["RED", "GREEN"]}, "default": "GREEN"},
        {"name": "f", "type": {"type": "fixed", "name": "F", "size": 1}, "default": "ÿ"},
        {"name": "u", "type": ["string", "long"], "default": "x"},
        {"name": "n", "type": ["long", "null"], "default": 3}
    ]}"#;
    insta::assert_snapshot!(
        decode(schema, "{}").unwrap(),
        @r#"{"inner":{"a":1,"b":null},"list":[{"a":2,"b":null}],"m":{"k":1.0},"c":"GREEN","f":"ÿ","u":"x","n":3}"#
    );
    assert_eq!(
        decode(schema, r#"{"n": null, "inner": {"b": "s"}}"#).unwrap(),
        r#"{"inner":{"a":1,"b":"s"},"list":[{"a":2,"b":null}],"m":{"k":1.0},"c":"GREEN","f":"ÿ","u":"x","n":null}"#
    );
}

#[test]
fn unknown_fields_can_be_ignored() {
    let schema = r#"{"type": "record", "name": "R", "fields": [
        {"name": "a", "type": "int"},
        {"name": "b", "type": "int"}
    ]}"#;
    let options = DecoderOptions {
        unknown_fields: UnknownFieldPolicy::Ignore,
        ..DecoderOptions::default()
    };
    assert_eq!(
        decode_with(schema, r#"{"a": 1, "zzz": {"deep": [1, {"x": null}]}, "b": 2, "tail": 0}"#, options).unwrap(),
        r#"{"a":1,"b":2}"#
    );
}

#[rstest]
#[case::scoped(DefaultLookup::Scoped, r#"{"inner":{"x":1},"other":{"x":2}}"#)]
#[case::schema_wide(DefaultLookup::SchemaWide, r#"{"inner":{"x":1},"other":{"x":1}}"#)]
fn default_lookup(#[case] lookup: DefaultLookup, #[case] expected: &str) {
    let schema = r#"{"type": "record", "name": "Outer", "fields": [
        {"name": "inner", "type": {"type": "record", "name": "Inner", "fields": [
            {"name": "x", "type": "int", "default": 1}
        ]}},
        {"name": "other", "type": {"type": "record", "name": "Other", "fields": [
            {"name": "x", "type": "int", "default": 2}
        ]}}
    ]}"#;
    let options = DecoderOptions {
        default_lookup: lookup,
        ..DecoderOptions::default()
    };
    assert_eq!(
        decode_with(schema, r#"{"other": {}, "inner": {}}"#, options).unwrap(),
        expected
    );
}

#[test]
fn whitespace_and_newline_delimited_datums() {
    let datums = decode_all_with(
        r#"["null", "string"]"#,
        "\"a\"\n null\r\n\t{\"string\": \"b\"}  ",
        DecoderOptions::default(),
    )
    .unwrap();
    assert_eq!(datums, [r#""a""#, "null", r#""b""#]);
}

#[test]
fn empty_input_has_no_datums() {
    let datums = decode_all_with(LONG_AND_ARRAY, "  \n", DecoderOptions::default()).unwrap();
    assert!(datums.is_empty());
}

const EMPTY: &str = r#"{"type": "record", "name": "E", "fields": []}"#;

#[test]
fn empty_records_are_consumed() {
    let datums = decode_all_with(EMPTY, "{} {}", DecoderOptions::default()).unwrap();
    assert_eq!(datums, ["{}", "{}"]);
}

#[rstest]
#[case::nested(
    r#"{"type": "record", "name": "R", "fields": [
        {"name": "e", "type": {"type": "record", "name": "E", "fields": []}}
    ]}"#,
    r#"{"e": {}}"#,
    r#"{"e":{}}"#
)]
#[case::nested_default(
    r#"{"type": "record", "name": "R", "fields": [
        {"name": "e", "type": {"type": "record", "name": "E", "fields": []}, "default": {}}
    ]}"#,
    "{}",
    r#"{"e":{}}"#
)]
#[case::array_of_empty(
    r#"{"type": "array", "items": {"type": "record", "name": "E", "fields": []}}"#,
    "[{}, {}]",
    "[{},{}]"
)]
#[case::empty_then_value(
    r#"{"type": "record", "name": "R", "fields": [
        {"name": "e", "type": {"type": "record", "name": "E", "fields": []}},
        {"name": "n", "type": "int"}
    ]}"#,
    r#"{"n": 3, "e": {}}"#,
    r#"{"e":{},"n":3}"#
)]
fn datums_needing_no_reads(#[case] schema: &str, #[case] input: &str, #[case] expected: &str) {
    assert_eq!(decode(schema, input).unwrap(), expected);
}
