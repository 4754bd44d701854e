use std::fmt;

use thiserror::Error;

/// A single vendor field failed to yield a value.
///
/// Field-level failures are never fatal to normalization; the field is
/// dropped and the rest of the record is still flattened.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldAccessError {
    #[error("vendor field could not be read: {0}")]
    Unreadable(String),
    #[error("vendor field holds a value outside the supported shapes")]
    Unsupported,
}

/// Classified value of one vendor result field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    /// Widened to a JSON double during normalization.
    Integer(i64),
    Float(f64),
    Text(String),
    /// Raw image bytes; encoded to base64 under the original key and a
    /// `<key>Base64` alias.
    Image(Vec<u8>),
    /// Error-like payload, flattened to `{code, description}`.
    ErrorInfo { code: String, description: String },
    List(Vec<FieldValue>),
    /// Nested vendor structure, normalized recursively.
    Nested(VendorFields),
    /// Vendor "extra metadata": kept nested under its key and additionally
    /// hoisted entry-by-entry to the top level.
    Extra(VendorFields),
    /// Anything the mapping does not recognize, already stringified.
    Opaque(String),
}

impl FieldValue {
    /// Captures an unrecognized vendor value through its textual form.
    pub fn opaque<T: fmt::Display>(value: T) -> Self {
        Self::Opaque(value.to_string())
    }

    pub fn error_info(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self::ErrorInfo {
            code: code.into(),
            description: description.into(),
        }
    }
}

/// One mapped field of a vendor record. `value` carries the access outcome
/// so a failed read can be recorded without aborting the record.
#[derive(Debug, Clone, PartialEq)]
pub struct VendorField {
    pub key: String,
    pub value: Result<FieldValue, FieldAccessError>,
}

/// Ordered field bag produced by a [`VendorRecord`] mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VendorFields(Vec<VendorField>);

impl VendorFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: FieldValue) {
        self.0.push(VendorField {
            key: key.into(),
            value: Ok(value),
        });
    }

    pub fn push_failed(&mut self, key: impl Into<String>, error: FieldAccessError) {
        self.0.push(VendorField {
            key: key.into(),
            value: Err(error),
        });
    }

    pub fn with(mut self, key: impl Into<String>, value: FieldValue) -> Self {
        self.push(key, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &VendorField> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<VendorField> for VendorFields {
    fn from_iter<I: IntoIterator<Item = VendorField>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Explicit field mapping for one vendor result or error type.
///
/// Implementations enumerate the fields they know about by name and park
/// anything forward-compatible in an [`FieldValue::Extra`] bag. This is the
/// entire introspection surface; no reflection is involved.
pub trait VendorRecord {
    fn fields(&self) -> VendorFields;
}
