//! Turning declared default values into replayable token sequences.
//!
//! The JSON default is walked depth first and flattened into the same tokens
//! the tokenizer would have produced for it, so the decoder cannot tell a
//! default from input. The field's type guides the walk only where the
//! encoding needs more than the bare JSON: a union default is a value of the
//! union's first alternative, and unless the union is a two-way nullable one
//! (whose values may appear bare) it is wrapped as `{"<label>": value}`.
use serde_json::Value;

use crate::{
    error::DecodeError,
    schema::{Schema, Type},
    token::{Container, ScalarKind, Token, TokenSequence},
};

/// Materializes `default`, declared for a field of type `ty`.
///
/// Every call builds a fresh sequence; the schema is never touched.
///
/// # Errors
///
/// Fails only if `ty` refers to an undefined name.
pub(crate) fn materialize(
    schema: &Schema,
    ty: &Type,
    default: &Value,
) -> Result<TokenSequence, DecodeError> {
    let mut tokens = Vec::new();
    emit(schema, Some(ty), default, &mut tokens)?;
    Ok(TokenSequence::new(tokens))
}

fn emit(
    schema: &Schema,
    ty: Option<&Type>,
    value: &Value,
    out: &mut Vec<Token>,
) -> Result<(), DecodeError> {
    let ty = ty.map(|ty| schema.resolve(ty)).transpose()?;
    match (ty, value) {
        (Some(Type::Union(union)), Value::Null) if union.null_index().is_some() => {
            out.push(Token::null());
        }
        (Some(Type::Union(union)), value) => match union.nullable_branch() {
            Some(branch) => emit(schema, union.variants().get(branch), value, out)?,
            None => {
                let first = union.variants().first();
                out.push(Token::Start(Container::Object));
                out.push(Token::FieldName(
                    first.map_or("null", Type::label).to_owned(),
                ));
                emit(schema, first, value, out)?;
                out.push(Token::End(Container::Object));
            }
        },
        (_, Value::Null) => out.push(Token::null()),
        (_, Value::Bool(b)) => out.push(Token::scalar(ScalarKind::Bool, b.to_string())),
        (_, Value::Number(n)) => {
            let kind = if n.is_i64() || n.is_u64() {
                ScalarKind::Int
            } else {
                ScalarKind::Float
            };
            out.push(Token::scalar(kind, n.to_string()));
        }
        (_, Value::String(s)) => out.push(Token::scalar(ScalarKind::String, s.clone())),
        (ty, Value::Array(items)) => {
            let item_ty = match ty {
                Some(Type::Array(items)) => Some(&**items),
                _ => None,
            };
            out.push(Token::Start(Container::Array));
            for item in items {
                emit(schema, item_ty, item, out)?;
            }
            out.push(Token::End(Container::Array));
        }
        (ty, Value::Object(entries)) => {
            out.push(Token::Start(Container::Object));
            for (key, entry) in entries {
                let entry_ty = match ty {
                    Some(Type::Record(record)) => record.field(key).map(|f| &f.ty),
                    Some(Type::Map(values)) => Some(&**values),
                    _ => None,
                };
                out.push(Token::FieldName(key.clone()));
                emit(schema, entry_ty, entry, out)?;
            }
            out.push(Token::End(Container::Object));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn render(schema: &str, default: &Value) -> Vec<String> {
        let schema = Schema::parse_str(schema).unwrap();
        materialize(&schema, schema.root(), default)
            .unwrap()
            .body()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn scalars_keep_integer_and_float_lexemes() {
        assert_eq!(render(r#""long""#, &json!(7)), ["int 7"]);
        assert_eq!(render(r#""double""#, &json!(1.5)), ["float 1.5"]);
        assert_eq!(render(r#""string""#, &json!("hi")), [r#"string "hi""#]);
        assert_eq!(render(r#""boolean""#, &json!(false)), ["boolean false"]);
    }

    #[test]
    fn nullable_union_defaults_are_bare() {
        assert_eq!(render(r#"["null", "long"]"#, &json!(null)), ["null"]);
        assert_eq!(render(r#"["long", "null"]"#, &json!(3)), ["int 3"]);
    }

    #[test]
    fn general_union_defaults_are_tagged_with_first_branch() {
        assert_eq!(
            render(r#"["string", "long", "null"]"#, &json!("x")),
            ["'{'", r#"field name "string""#, r#"string "x""#, "'}'"]
        );
    }

    #[test]
    fn nested_record_default_follows_field_types() {
        let schema = r#"{"type": "record", "name": "R", "fields": [
            {"name": "u", "type": ["int", "string"]},
            {"name": "xs", "type": {"type": "array", "items": "long"}}
        ]}"#;
        assert_eq!(
            render(schema, &json!({"u": 1, "xs": [2], "extra": {"k": null}})),
            [
                "'{'",
                r#"field name "u""#,
                "'{'",
                r#"field name "int""#,
                "int 1",
                "'}'",
                r#"field name "xs""#,
                "'['",
                "int 2",
                "']'",
                r#"field name "extra""#,
                "'{'",
                r#"field name "k""#,
                "null",
                "'}'",
                "'}'",
            ]
        );
    }

    #[test]
    fn each_call_is_fresh() {
        let schema = Schema::parse_str(r#""int""#).unwrap();
        let a = materialize(&schema, schema.root(), &json!(1)).unwrap();
        let b = materialize(&schema, schema.root(), &json!(1)).unwrap();
        assert_eq!(a, b);
        assert!(!core::ptr::eq(a.as_ptr(), b.as_ptr()));
    }
}
