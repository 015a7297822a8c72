#![no_main]

use arbitrary::Arbitrary;
use avrojson::{DatumReader, Decoder, DecoderOptions, DefaultLookup, Schema, Tokenizer, UnknownFieldPolicy};
use libfuzzer_sys::fuzz_target;

// Exercises reordering, defaults, nullable and general unions, and recursion.
const SCHEMAS: &[&str] = &[
    r#"{"type": "record", "name": "R", "fields": [
        {"name": "a", "type": "long", "default": 0},
        {"name": "b", "type": ["null", "string"], "default": null},
        {"name": "c", "type": {"type": "array", "items": ["null", "int"]}, "default": []},
        {"name": "d", "type": {"type": "map", "values": "double"}, "default": {}},
        {"name": "e", "type": ["string", "long", "null"], "default": "x"}
    ]}"#,
    r#"{"type": "record", "name": "Node", "fields": [
        {"name": "value", "type": "int", "default": 1},
        {"name": "next", "type": ["null", "Node"], "default": null},
        {"name": "kind", "type": {"type": "enum", "name": "K", "symbols": ["A", "B"]}, "default": "A"},
        {"name": "raw", "type": {"type": "fixed", "name": "F", "size": 2}, "default": "ab"}
    ]}"#,
    r#"["null", "bytes", {"type": "array", "items": "boolean"}, {"type": "map", "values": "float"}]"#,
];

#[derive(Debug, Arbitrary)]
struct Input {
    schema: u8,
    ignore_unknown: bool,
    schema_wide_defaults: bool,
    text: String,
}

fuzz_target!(|input: Input| {
    let text = SCHEMAS[usize::from(input.schema) % SCHEMAS.len()];
    let schema = Schema::parse_str(text).expect("fuzz schemas are valid");
    let options = DecoderOptions {
        unknown_fields: if input.ignore_unknown {
            UnknownFieldPolicy::Ignore
        } else {
            UnknownFieldPolicy::Reject
        },
        default_lookup: if input.schema_wide_defaults {
            DefaultLookup::SchemaWide
        } else {
            DefaultLookup::Scoped
        },
    };

    // Errors are expected; panics and hangs are not.
    let Ok(mut decoder) = Decoder::with_options(&schema, Tokenizer::from_str(&input.text), options) else {
        return;
    };
    for datum in DatumReader::new(&schema).iter(&mut decoder) {
        let Ok(datum) = datum else { break };
        let _ = datum.to_string();
    }
});
