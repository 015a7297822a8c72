use std::{
    borrow::Cow,
    collections::{HashMap, HashSet},
    sync::Arc,
};

use serde_json::{Map, Value};

use super::{EnumType, Field, FixedType, Name, RecordType, Schema, Type, UnionType};
use crate::error::SchemaError;

type Object = Map<String, Value>;

/// Walks a schema definition, registering named types as it goes.
#[derive(Default)]
pub(super) struct SchemaParser {
    names: HashMap<String, Type>,
    /// Names whose definition has started, including ones still being
    /// parsed, so recursive references resolve.
    declared: HashSet<String>,
}

impl SchemaParser {
    pub(super) fn parse_schema(mut self, json: &Value) -> Result<Schema, SchemaError> {
        let root = self.parse(json, None)?;
        Ok(Schema {
            root,
            names: self.names,
        })
    }

    fn parse(&mut self, json: &Value, namespace: Option<&str>) -> Result<Type, SchemaError> {
        match json {
            Value::String(name) => self.parse_reference(name, namespace),
            Value::Array(variants) => {
                let variants = variants
                    .iter()
                    .map(|v| self.parse(v, namespace))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Type::Union(UnionType::new(variants)?))
            }
            Value::Object(object) => self.parse_object(object, namespace),
            other => Err(SchemaError::UnknownType(other.to_string())),
        }
    }

    fn parse_reference(&self, name: &str, namespace: Option<&str>) -> Result<Type, SchemaError> {
        if let Some(primitive) = Type::primitive(name) {
            return Ok(primitive);
        }
        let qualified = Name::new(name, namespace);
        [qualified.fullname(), name]
            .into_iter()
            .find(|candidate| self.declared.contains(*candidate))
            .map(|fullname| Type::Ref(fullname.to_owned()))
            .ok_or_else(|| SchemaError::UnknownType(name.to_owned()))
    }

    fn parse_object(&mut self, object: &Object, namespace: Option<&str>) -> Result<Type, SchemaError> {
        let ty = object.get("type").ok_or(SchemaError::MissingAttribute {
            attribute: "type",
            context: Cow::Borrowed("schema object"),
        })?;
        match ty.as_str() {
            Some("record" | "error") => self.parse_record(object, namespace),
            Some("enum") => self.parse_enum(object, namespace),
            Some("fixed") => self.parse_fixed(object, namespace),
            Some("array") => {
                let items = required(object, "items", "array")?;
                Ok(Type::Array(Box::new(self.parse(items, namespace)?)))
            }
            Some("map") => {
                let values = required(object, "values", "map")?;
                Ok(Type::Map(Box::new(self.parse(values, namespace)?)))
            }
            // primitives with extra attributes, such as a logicalType
            _ => self.parse(ty, namespace),
        }
    }

    fn declare(&mut self, object: &Object, namespace: Option<&str>, kind: &'static str) -> Result<Name, SchemaError> {
        let name = required_str(object, "name", kind)?;
        let namespace = match object.get("namespace") {
            Some(Value::String(ns)) => Some(ns.as_str()),
            Some(Value::Null) | None => namespace,
            Some(_) => {
                return Err(SchemaError::InvalidAttribute {
                    attribute: "namespace",
                    context: Cow::Owned(format!("{kind} {name}")),
                });
            }
        };
        let name = Name::new(name, namespace);
        if Type::primitive(name.fullname()).is_some() || !self.declared.insert(name.fullname().to_owned()) {
            return Err(SchemaError::DuplicateName(name.fullname().to_owned()));
        }
        Ok(name)
    }

    fn parse_record(&mut self, object: &Object, namespace: Option<&str>) -> Result<Type, SchemaError> {
        let name = self.declare(object, namespace, "record")?;
        let context = || Cow::Owned(format!("record {}", name.fullname()));
        let Some(Value::Array(fields)) = object.get("fields") else {
            return Err(SchemaError::MissingAttribute {
                attribute: "fields",
                context: context(),
            });
        };

        let mut parsed: Vec<Field> = Vec::with_capacity(fields.len());
        for field in fields {
            let Value::Object(field) = field else {
                return Err(SchemaError::InvalidAttribute {
                    attribute: "fields",
                    context: context(),
                });
            };
            let field_name = required_str(field, "name", "field")?;
            if parsed.iter().any(|f| f.name == field_name) {
                return Err(SchemaError::DuplicateName(format!("{}.{field_name}", name.fullname())));
            }
            let ty = required(field, "type", "field")?;
            let ty = self.parse(ty, name.namespace())?;
            parsed.push(Field {
                name: field_name.to_owned(),
                ty,
                default: field.get("default").cloned(),
            });
        }

        let record = Type::Record(Arc::new(RecordType {
            name,
            fields: parsed,
        }));
        self.names.insert(record.label().to_owned(), record.clone());
        Ok(record)
    }

    fn parse_enum(&mut self, object: &Object, namespace: Option<&str>) -> Result<Type, SchemaError> {
        let name = self.declare(object, namespace, "enum")?;
        let invalid = || SchemaError::InvalidAttribute {
            attribute: "symbols",
            context: Cow::Owned(format!("enum {}", name.fullname())),
        };
        let symbols = match object.get("symbols") {
            Some(Value::Array(symbols)) => symbols
                .iter()
                .map(|s| s.as_str().map(str::to_owned).ok_or_else(invalid))
                .collect::<Result<Vec<_>, _>>()?,
            _ => return Err(invalid()),
        };
        let enumeration = Type::Enum(Arc::new(EnumType { name, symbols }));
        self.names
            .insert(enumeration.label().to_owned(), enumeration.clone());
        Ok(enumeration)
    }

    fn parse_fixed(&mut self, object: &Object, namespace: Option<&str>) -> Result<Type, SchemaError> {
        let name = self.declare(object, namespace, "fixed")?;
        let size = object
            .get("size")
            .and_then(Value::as_u64)
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| SchemaError::MissingAttribute {
                attribute: "size",
                context: Cow::Owned(format!("fixed {}", name.fullname())),
            })?;
        let fixed = Type::Fixed(Arc::new(FixedType { name, size }));
        self.names.insert(fixed.label().to_owned(), fixed.clone());
        Ok(fixed)
    }
}

fn required<'j>(object: &'j Object, attribute: &'static str, kind: &'static str) -> Result<&'j Value, SchemaError> {
    object.get(attribute).ok_or(SchemaError::MissingAttribute {
        attribute,
        context: Cow::Borrowed(kind),
    })
}

fn required_str<'j>(object: &'j Object, attribute: &'static str, kind: &'static str) -> Result<&'j str, SchemaError> {
    required(object, attribute, kind)?
        .as_str()
        .ok_or(SchemaError::InvalidAttribute {
            attribute,
            context: Cow::Borrowed(kind),
        })
}
