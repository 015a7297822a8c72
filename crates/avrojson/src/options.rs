/// Configuration options for the [`Decoder`](crate::Decoder).
///
/// # Examples
///
/// ```rust
/// use avrojson::{DecoderOptions, UnknownFieldPolicy};
///
/// let options = DecoderOptions {
///     unknown_fields: UnknownFieldPolicy::Ignore,
///     ..Default::default()
/// };
/// assert_eq!(options.unknown_fields, UnknownFieldPolicy::Ignore);
/// ```
///
/// # Default
///
/// Unknown fields are rejected and defaults are looked up in the enclosing
/// record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecoderOptions {
    /// What to do with input fields the record's schema does not declare.
    ///
    /// Such fields are buffered while the decoder searches for the fields it
    /// expects; when the record closes, whatever is left over is either an
    /// error or silently dropped.
    ///
    /// # Default
    ///
    /// [`UnknownFieldPolicy::Reject`]
    pub unknown_fields: UnknownFieldPolicy,

    /// Where the default for an absent field comes from.
    ///
    /// # Default
    ///
    /// [`DefaultLookup::Scoped`]
    pub default_lookup: DefaultLookup,
}

/// Handling of fields present in the input but not in the schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownFieldPolicy {
    /// Fail with [`DecodeError::UnknownField`](crate::DecodeError::UnknownField)
    /// when the record closes.
    #[default]
    Reject,
    /// Discard them.
    Ignore,
}

/// Source of default values for absent fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DefaultLookup {
    /// The declaration of the field in the record being decoded.
    #[default]
    Scoped,
    /// The first field of that name found anywhere in the schema, searching
    /// from the root record depth first. Two records with a same-named field
    /// then share one default.
    SchemaWide,
}
