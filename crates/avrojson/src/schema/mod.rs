//! The schema model.
//!
//! A [`Schema`] is parsed once from its JSON definition and is immutable
//! afterwards; any number of decoders may borrow it. Named types (records,
//! enums and fixed) are registered under their full name, and references to
//! them, recursive ones included, are kept as [`Type::Ref`] and resolved on
//! demand with [`Schema::resolve`].
mod parse;

use std::{collections::HashMap, collections::HashSet, sync::Arc};

use crate::error::SchemaError;

/// A parsed schema: the root type plus every named type it declares.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    root: Type,
    names: HashMap<String, Type>,
}

/// One schema type.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Bytes,
    String,
    Record(Arc<RecordType>),
    Enum(Arc<EnumType>),
    Fixed(Arc<FixedType>),
    Array(Box<Type>),
    Map(Box<Type>),
    Union(UnionType),
    /// A reference to a named type, by full name.
    Ref(String),
}

/// A possibly namespaced type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    name: String,
    namespace: Option<String>,
    fullname: String,
}

impl Name {
    /// Builds a name; a dotted `name` carries its own namespace and overrides
    /// `namespace`.
    #[must_use]
    pub fn new(name: &str, namespace: Option<&str>) -> Self {
        let (name, namespace) = match name.rsplit_once('.') {
            Some((ns, short)) => (short, Some(ns)),
            None => (name, namespace.filter(|ns| !ns.is_empty())),
        };
        let fullname = match namespace {
            Some(ns) => format!("{ns}.{name}"),
            None => name.to_owned(),
        };
        Self {
            name: name.to_owned(),
            namespace: namespace.map(str::to_owned),
            fullname,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    #[must_use]
    pub fn fullname(&self) -> &str {
        &self.fullname
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordType {
    pub name: Name,
    /// Fields in declaration order, which is also the read order.
    pub fields: Vec<Field>,
}

impl RecordType {
    /// Looks a field up by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: Type,
    /// The declared default, as written in the schema.
    pub default: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumType {
    pub name: Name,
    pub symbols: Vec<String>,
}

impl EnumType {
    /// Ordinal of `symbol`.
    #[must_use]
    pub fn index_of(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FixedType {
    pub name: Name,
    pub size: usize,
}

/// An ordered set of alternatives. Unions never directly contain unions.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionType {
    variants: Vec<Type>,
}

impl UnionType {
    /// # Errors
    ///
    /// Rejects nested unions and alternatives sharing a label.
    pub fn new(variants: Vec<Type>) -> Result<Self, SchemaError> {
        let mut seen = HashSet::new();
        for variant in &variants {
            if matches!(variant, Type::Union(_)) {
                return Err(SchemaError::InvalidUnion("unions may not contain unions".into()));
            }
            if !seen.insert(variant.label()) {
                return Err(SchemaError::InvalidUnion(
                    format!("duplicate alternative {}", variant.label()).into(),
                ));
            }
        }
        Ok(Self { variants })
    }

    #[must_use]
    pub fn variants(&self) -> &[Type] {
        &self.variants
    }

    /// Finds the alternative whose label is `label`, falling back to matching
    /// the unqualified name of named alternatives.
    #[must_use]
    pub fn find_branch(&self, label: &str) -> Option<usize> {
        self.variants
            .iter()
            .position(|v| v.label() == label)
            .or_else(|| self.variants.iter().position(|v| v.short_label() == label))
    }

    /// For a two-way union with `null`, the index of the other alternative.
    #[must_use]
    pub fn nullable_branch(&self) -> Option<usize> {
        match self.variants.as_slice() {
            [Type::Null, other] if !matches!(other, Type::Null) => Some(1),
            [other, Type::Null] if !matches!(other, Type::Null) => Some(0),
            _ => None,
        }
    }

    /// Index of the `null` alternative, if any.
    #[must_use]
    pub fn null_index(&self) -> Option<usize> {
        self.variants.iter().position(|v| matches!(v, Type::Null))
    }
}

impl Type {
    /// The label identifying this type as a union alternative: the full
    /// name for named types, `array` / `map`, or the primitive name.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Type::Null => "null",
            Type::Boolean => "boolean",
            Type::Int => "int",
            Type::Long => "long",
            Type::Float => "float",
            Type::Double => "double",
            Type::Bytes => "bytes",
            Type::String => "string",
            Type::Record(r) => r.name.fullname(),
            Type::Enum(e) => e.name.fullname(),
            Type::Fixed(f) => f.name.fullname(),
            Type::Array(_) => "array",
            Type::Map(_) => "map",
            Type::Union(_) => "union",
            Type::Ref(name) => name,
        }
    }

    /// Like [`label`](Self::label), without the namespace.
    #[must_use]
    pub fn short_label(&self) -> &str {
        match self {
            Type::Record(_) | Type::Enum(_) | Type::Fixed(_) | Type::Ref(_) => {
                let label = self.label();
                label.rsplit_once('.').map_or(label, |(_, short)| short)
            }
            _ => self.label(),
        }
    }

    pub(crate) fn primitive(name: &str) -> Option<Self> {
        Some(match name {
            "null" => Type::Null,
            "boolean" => Type::Boolean,
            "int" => Type::Int,
            "long" => Type::Long,
            "float" => Type::Float,
            "double" => Type::Double,
            "bytes" => Type::Bytes,
            "string" => Type::String,
            _ => return None,
        })
    }
}

impl Schema {
    /// Parses a schema from its JSON text.
    ///
    /// ```
    /// use avrojson::{Schema, Type};
    ///
    /// let schema = Schema::parse_str(r#"{"type": "array", "items": "long"}"#).unwrap();
    /// assert_eq!(schema.root(), &Type::Array(Box::new(Type::Long)));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] for malformed JSON or an invalid definition.
    pub fn parse_str(text: &str) -> Result<Self, SchemaError> {
        let json: serde_json::Value = serde_json::from_str(text)?;
        Self::parse_value(&json)
    }

    /// Parses a schema from an already-parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] for an invalid definition.
    pub fn parse_value(json: &serde_json::Value) -> Result<Self, SchemaError> {
        parse::SchemaParser::default().parse_schema(json)
    }

    #[must_use]
    pub fn root(&self) -> &Type {
        &self.root
    }

    /// Looks a named type up by full name.
    #[must_use]
    pub fn named(&self, fullname: &str) -> Option<&Type> {
        self.names.get(fullname)
    }

    /// Follows a [`Type::Ref`] to its definition; other types are returned
    /// unchanged.
    ///
    /// # Errors
    ///
    /// [`SchemaError::UnknownType`] if the name is not defined.
    pub fn resolve<'s>(&'s self, ty: &'s Type) -> Result<&'s Type, SchemaError> {
        match ty {
            Type::Ref(name) => self
                .names
                .get(name)
                .ok_or_else(|| SchemaError::UnknownType(name.clone())),
            other => Ok(other),
        }
    }

    /// Finds the first field called `name` anywhere in the schema, searching
    /// the root record first, then depth first through record fields, array
    /// items, map values and union alternatives.
    #[must_use]
    pub fn find_field(&self, name: &str) -> Option<&Field> {
        let mut visited = HashSet::new();
        self.search_field(&self.root, name, &mut visited)
    }

    fn search_field<'s>(
        &'s self,
        ty: &'s Type,
        name: &str,
        visited: &mut HashSet<&'s str>,
    ) -> Option<&'s Field> {
        match self.resolve(ty).ok()? {
            Type::Record(record) => {
                if !visited.insert(record.name.fullname()) {
                    return None;
                }
                record.field(name).or_else(|| {
                    record
                        .fields
                        .iter()
                        .find_map(|f| self.search_field(&f.ty, name, visited))
                })
            }
            Type::Array(inner) | Type::Map(inner) => self.search_field(inner, name, visited),
            Type::Union(union) => union
                .variants()
                .iter()
                .find_map(|v| self.search_field(v, name, visited)),
            _ => None,
        }
    }
}
