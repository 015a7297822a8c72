//! Generic decoded values.
//!
//! [`Datum`] is what [`DatumReader`](crate::DatumReader) materializes from a
//! [`Decoder`](crate::Decoder). Its [`Display`](core::fmt::Display) renders
//! compact JSON, following Avro's generic representation: union values are
//! shown bare, enums as their symbol, and bytes and fixed values as
//! ISO-8859-1 strings. Infinite and NaN floats, which JSON cannot express,
//! are shown as `null`.
use core::fmt::{self, Write};

/// A decoded value of any schema type.
///
/// # Examples
///
/// ```
/// use avrojson::Datum;
///
/// let d = Datum::Record(vec![
///     ("id".into(), Datum::Long(7)),
///     ("tags".into(), Datum::Array(vec![Datum::String("a".into())])),
/// ]);
/// assert_eq!(d.to_string(), r#"{"id":7,"tags":["a"]}"#);
/// ```
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub enum Datum {
    Null,
    Boolean(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Bytes(Vec<u8>),
    String(String),
    Fixed(Vec<u8>),
    Enum { index: usize, symbol: String },
    Array(Vec<Datum>),
    /// Entries in input order.
    Map(Vec<(String, Datum)>),
    /// Fields in schema order.
    Record(Vec<(String, Datum)>),
    /// The selected alternative and its value.
    Union { index: usize, value: Box<Datum> },
}

impl Datum {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self.unwrap_union(), Self::Null)
    }

    /// Looks up a record field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Datum> {
        match self.unwrap_union() {
            Self::Record(fields) => fields.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Strips any union wrappers.
    #[must_use]
    pub fn unwrap_union(&self) -> &Datum {
        match self {
            Self::Union { value, .. } => value.unwrap_union(),
            other => other,
        }
    }
}

/// Escapes a string for inclusion in a JSON string literal.
pub(crate) fn write_escaped_string<W: Write>(src: &str, f: &mut W) -> fmt::Result {
    for c in src.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\u{2028}' | '\u{2029}' => write!(f, "\\u{:04X}", c as u32)?,
            c if c.is_control() && (c as u32) <= 0xFFFF => write!(f, "\\u{:04X}", c as u32)?,
            _ => f.write_char(c)?,
        }
    }
    Ok(())
}

fn write_latin1<W: Write>(bytes: &[u8], f: &mut W) -> fmt::Result {
    let text: String = bytes.iter().map(|&b| char::from(b)).collect();
    f.write_char('"')?;
    write_escaped_string(&text, f)?;
    f.write_char('"')
}

fn write_entries(entries: &[(String, Datum)], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_char('{')?;
    for (i, (key, value)) in entries.iter().enumerate() {
        if i > 0 {
            f.write_char(',')?;
        }
        f.write_char('"')?;
        write_escaped_string(key, f)?;
        write!(f, "\":{value}")?;
    }
    f.write_char('}')
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datum::Null => f.write_str("null"),
            Datum::Boolean(b) => write!(f, "{b}"),
            Datum::Int(n) => write!(f, "{n}"),
            Datum::Long(n) => write!(f, "{n}"),
            Datum::Float(n) if n.is_finite() => write!(f, "{n:?}"),
            Datum::Double(n) if n.is_finite() => write!(f, "{n:?}"),
            // JSON has no infinities or NaN
            Datum::Float(_) | Datum::Double(_) => f.write_str("null"),
            Datum::Bytes(bytes) | Datum::Fixed(bytes) => write_latin1(bytes, f),
            Datum::String(s) | Datum::Enum { symbol: s, .. } => {
                f.write_char('"')?;
                write_escaped_string(s, f)?;
                f.write_char('"')
            }
            Datum::Array(items) => {
                f.write_char('[')?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_char(',')?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_char(']')
            }
            Datum::Map(entries) | Datum::Record(entries) => write_entries(entries, f),
            Datum::Union { value, .. } => value.fmt(f),
        }
    }
}
