use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::{json, Value};
use tracing::warn;

use crate::document::ResultDocument;
use crate::record::{FieldValue, VendorFields, VendorRecord};

const OPAQUE_PLACEHOLDER: &str = "<opaque>";

/// Flattens a vendor record into a [`ResultDocument`]. Never fails.
///
/// Numeric fields are widened to JSON doubles so the document schema is
/// stable regardless of the vendor's native numeric width. Unreadable fields
/// are dropped with a warning; unrecognized values surface as non-empty
/// strings.
pub fn normalize(record: &dyn VendorRecord) -> ResultDocument {
    document_from_fields(&record.fields())
}

/// Flattens a failure-like input: the error lands under `code`/`description`
/// and any remaining record fields are merged in without overriding them.
pub fn normalize_error(
    code: impl Into<String>,
    description: impl Into<String>,
    record: Option<&dyn VendorRecord>,
) -> ResultDocument {
    let mut doc = ResultDocument::new();
    doc.insert("code", Value::String(code.into()));
    doc.insert("description", Value::String(description.into()));

    if let Some(record) = record {
        let flattened = document_from_fields(&record.fields());
        for (key, value) in flattened.iter() {
            if !doc.contains_key(key) {
                doc.insert(key.clone(), value.clone());
            }
        }
    }
    doc
}

fn document_from_fields(fields: &VendorFields) -> ResultDocument {
    let mut doc = ResultDocument::new();
    for field in fields.iter() {
        match &field.value {
            Ok(value) => insert_field(&mut doc, &field.key, value),
            Err(error) => {
                warn!(key = %field.key, %error, "dropping unreadable vendor field");
            }
        }
    }
    doc
}

fn insert_field(doc: &mut ResultDocument, key: &str, value: &FieldValue) {
    match value {
        FieldValue::Image(bytes) => {
            let encoded = BASE64.encode(bytes);
            doc.insert(key, Value::String(encoded.clone()));
            doc.insert(format!("{key}Base64"), Value::String(encoded));
        }
        FieldValue::Extra(fields) => {
            let nested = document_from_fields(fields);
            for (hoisted_key, hoisted) in nested.iter() {
                doc.insert(hoisted_key.clone(), hoisted.clone());
            }
            doc.insert(key, nested.into_value());
        }
        other => {
            doc.insert(key, plain_value(other));
        }
    }
}

// Value form used inside lists and for non-aliased fields. Images inside
// lists have no alias slot, so they collapse to the base64 string alone.
fn plain_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => Value::Null,
        FieldValue::Bool(flag) => Value::Bool(*flag),
        FieldValue::Integer(number) => json!(*number as f64),
        FieldValue::Float(number) => json!(*number),
        FieldValue::Text(text) => Value::String(text.clone()),
        FieldValue::Image(bytes) => Value::String(BASE64.encode(bytes)),
        FieldValue::ErrorInfo { code, description } => {
            json!({ "code": code, "description": description })
        }
        FieldValue::List(items) => Value::Array(items.iter().map(plain_value).collect()),
        FieldValue::Nested(fields) | FieldValue::Extra(fields) => {
            document_from_fields(fields).into_value()
        }
        FieldValue::Opaque(text) => {
            if text.is_empty() {
                Value::String(OPAQUE_PLACEHOLDER.to_string())
            } else {
                Value::String(text.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldAccessError;

    struct Scripted(VendorFields);

    impl VendorRecord for Scripted {
        fn fields(&self) -> VendorFields {
            self.0.clone()
        }
    }

    #[test]
    fn integers_are_widened_to_doubles() {
        let record = Scripted(
            VendorFields::new()
                .with("count", FieldValue::Integer(5))
                .with("score", FieldValue::Float(0.25)),
        );
        let doc = normalize(&record);
        assert_eq!(doc.get("count"), Some(&json!(5.0)));
        assert!(doc.get("count").unwrap().is_f64());
        assert_eq!(doc.get("score"), Some(&json!(0.25)));
    }

    #[test]
    fn images_get_a_base64_alias() {
        let record = Scripted(VendorFields::new().with("photo", FieldValue::Image(vec![1, 2, 3])));
        let doc = normalize(&record);
        let encoded = BASE64.encode([1, 2, 3]);
        assert_eq!(doc.get("photo"), Some(&json!(encoded)));
        assert_eq!(doc.get("photoBase64"), Some(&json!(encoded)));
    }

    #[test]
    fn extra_metadata_is_hoisted_and_kept_nested() {
        let extra = VendorFields::new()
            .with("deviceModel", FieldValue::Text("X1".into()))
            .with("attempts", FieldValue::Integer(2));
        let record = Scripted(VendorFields::new().with("extra", FieldValue::Extra(extra)));

        let doc = normalize(&record);
        assert_eq!(doc.get("deviceModel"), Some(&json!("X1")));
        assert_eq!(doc.get("attempts"), Some(&json!(2.0)));
        assert_eq!(
            doc.get("extra"),
            Some(&json!({ "deviceModel": "X1", "attempts": 2.0 }))
        );
    }

    #[test]
    fn unreadable_fields_are_dropped_without_aborting() {
        let mut fields = VendorFields::new().with("kept", FieldValue::Bool(true));
        fields.push_failed("broken", FieldAccessError::Unsupported);
        fields.push("also_kept", FieldValue::Text("v".into()));

        let doc = normalize(&Scripted(fields));
        assert_eq!(doc.len(), 2);
        assert!(doc.get("broken").is_none());
        assert_eq!(doc.get("also_kept"), Some(&json!("v")));
    }

    #[test]
    fn opaque_values_are_never_empty() {
        let record = Scripted(
            VendorFields::new()
                .with("handle", FieldValue::opaque("VendorHandle(0x7f)"))
                .with("blank", FieldValue::Opaque(String::new())),
        );
        let doc = normalize(&record);
        assert_eq!(doc.get("handle"), Some(&json!("VendorHandle(0x7f)")));
        let blank = doc.get("blank").and_then(Value::as_str).unwrap();
        assert!(!blank.is_empty());
    }

    #[test]
    fn error_flattening_keeps_record_fields() {
        let record = Scripted(
            VendorFields::new()
                .with("retriable", FieldValue::Bool(false))
                .with("code", FieldValue::Text("should-not-win".into())),
        );
        let doc = normalize_error("LIVENESS_TIMEOUT", "no face detected", Some(&record));
        assert_eq!(doc.get("code"), Some(&json!("LIVENESS_TIMEOUT")));
        assert_eq!(doc.get("description"), Some(&json!("no face detected")));
        assert_eq!(doc.get("retriable"), Some(&json!(false)));
    }
}
