use crate::{
    datum::Datum,
    decoder::Decoder,
    error::DecodeError,
    schema::{Schema, Type},
};

/// Materializes whole datums by issuing the reads a schema calls for.
///
/// The schema must be the one the decoder was built with.
///
/// ```
/// use avrojson::{DatumReader, Decoder, Schema};
///
/// let schema = Schema::parse_str(r#"{"type": "map", "values": ["null", "int"]}"#)?;
/// let mut decoder = Decoder::from_str(&schema, r#"{"a": 1, "b": null} {}"#)?;
/// let datums = DatumReader::new(&schema).read_all(&mut decoder)?;
/// assert_eq!(datums.len(), 2);
/// assert_eq!(datums[0].to_string(), r#"{"a":1,"b":null}"#);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DatumReader<'s> {
    schema: &'s Schema,
}

impl<'s> DatumReader<'s> {
    #[must_use]
    pub fn new(schema: &'s Schema) -> Self {
        Self { schema }
    }

    /// Reads the next datum and completes it.
    ///
    /// # Errors
    ///
    /// [`DecodeError::PrematureEndOfInput`] if no datum is left, and any
    /// error of the underlying reads.
    pub fn read(&self, decoder: &mut Decoder<'_>) -> Result<Datum, DecodeError> {
        // a datum that needs no reads would otherwise be made up from nothing
        if !decoder.has_more()? {
            return Err(DecodeError::PrematureEndOfInput);
        }
        let datum = self.read_value(decoder, self.schema.root())?;
        decoder.drain()?;
        Ok(datum)
    }

    /// Reads datums until the input is exhausted.
    ///
    /// # Errors
    ///
    /// The first error encountered; earlier datums are discarded.
    pub fn read_all(&self, decoder: &mut Decoder<'_>) -> Result<Vec<Datum>, DecodeError> {
        self.iter(decoder).collect()
    }

    /// Iterates over the remaining datums, stopping after the first error.
    pub fn iter<'d, 'a>(&self, decoder: &'d mut Decoder<'a>) -> DatumIter<'_, 'd, 'a> {
        DatumIter {
            reader: *self,
            decoder,
            done: false,
        }
    }

    fn read_value(&self, decoder: &mut Decoder<'_>, ty: &Type) -> Result<Datum, DecodeError> {
        Ok(match self.schema.resolve(ty)? {
            Type::Null => {
                decoder.read_null()?;
                Datum::Null
            }
            Type::Boolean => Datum::Boolean(decoder.read_boolean()?),
            Type::Int => Datum::Int(decoder.read_int()?),
            Type::Long => Datum::Long(decoder.read_long()?),
            Type::Float => Datum::Float(decoder.read_float()?),
            Type::Double => Datum::Double(decoder.read_double()?),
            Type::Bytes => Datum::Bytes(decoder.read_bytes()?),
            Type::String => Datum::String(decoder.read_string()?),
            Type::Record(record) => {
                let mut fields = Vec::with_capacity(record.fields.len());
                for field in &record.fields {
                    fields.push((field.name.clone(), self.read_value(decoder, &field.ty)?));
                }
                Datum::Record(fields)
            }
            Type::Enum(enumeration) => {
                let index = decoder.read_enum()?;
                Datum::Enum {
                    index,
                    symbol: enumeration.symbols[index].clone(),
                }
            }
            Type::Fixed(fixed) => Datum::Fixed(decoder.read_fixed(fixed.size)?),
            Type::Array(items) => {
                let mut out = Vec::new();
                let mut more = decoder.read_array_start()?;
                while more > 0 {
                    out.push(self.read_value(decoder, items)?);
                    more = decoder.array_next()?;
                }
                Datum::Array(out)
            }
            Type::Map(values) => {
                let mut out = Vec::new();
                let mut more = decoder.read_map_start()?;
                while more > 0 {
                    let key = decoder.read_string()?;
                    out.push((key, self.read_value(decoder, values)?));
                    more = decoder.map_next()?;
                }
                Datum::Map(out)
            }
            Type::Union(union) => {
                let index = decoder.read_index()?;
                Datum::Union {
                    index,
                    value: Box::new(self.read_value(decoder, &union.variants()[index])?),
                }
            }
            Type::Ref(name) => return Err(crate::error::SchemaError::UnknownType(name.clone()).into()),
        })
    }
}

/// Iterator returned by [`DatumReader::iter`].
pub struct DatumIter<'r, 'd, 'a> {
    reader: DatumReader<'r>,
    decoder: &'d mut Decoder<'a>,
    done: bool,
}

impl Iterator for DatumIter<'_, '_, '_> {
    type Item = Result<Datum, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = match self.decoder.has_more() {
            Ok(false) => {
                self.done = true;
                return None;
            }
            Ok(true) => self.reader.read(self.decoder),
            Err(err) => Err(err),
        };
        self.done = item.is_err();
        Some(item)
    }
}
