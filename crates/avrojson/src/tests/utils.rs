use crate::{DatumReader, DecodeError, Decoder, DecoderOptions, Schema, Tokenizer};

pub fn schema(text: &str) -> Schema {
    Schema::parse_str(text).unwrap_or_else(|err| panic!("bad test schema: {err}\n{text}"))
}

/// Decodes every datum of `input`, rendering each one.
pub fn decode_all_with(
    schema_text: &str,
    input: &str,
    options: DecoderOptions,
) -> Result<Vec<String>, DecodeError> {
    let schema = schema(schema_text);
    let mut decoder = Decoder::with_options(&schema, Tokenizer::from_str(input), options)?;
    let datums = DatumReader::new(&schema).read_all(&mut decoder)?;
    Ok(datums.iter().map(ToString::to_string).collect())
}

/// Decodes the single datum of `input`.
pub fn decode(schema_text: &str, input: &str) -> Result<String, DecodeError> {
    decode_with(schema_text, input, DecoderOptions::default())
}

pub fn decode_with(
    schema_text: &str,
    input: &str,
    options: DecoderOptions,
) -> Result<String, DecodeError> {
    let schema = schema(schema_text);
    let mut decoder = Decoder::with_options(&schema, Tokenizer::from_str(input), options)?;
    let datum = DatumReader::new(&schema).read(&mut decoder)?;
    assert!(!decoder.has_more()?, "trailing input after {datum}");
    Ok(datum.to_string())
}

pub fn decode_err(schema_text: &str, input: &str) -> String {
    match decode(schema_text, input) {
        Ok(datum) => panic!("expected an error, decoded {datum}"),
        Err(err) => err.to_string(),
    }
}
