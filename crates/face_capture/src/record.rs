use capture_document::{FieldValue, VendorFields, VendorRecord};

/// Successful match/registration result from the vendor SDK, mapped field by
/// field. Unknown vendor additions travel in `extra` and are hoisted during
/// normalization.
#[derive(Debug, Clone, Default)]
pub struct FaceMatchResult {
    pub match_score: f64,
    pub liveness_score: Option<f64>,
    pub spoof_detected: bool,
    pub attempt_count: i64,
    pub photo: Option<Vec<u8>>,
    pub extra: VendorFields,
}

impl VendorRecord for FaceMatchResult {
    fn fields(&self) -> VendorFields {
        let mut fields = VendorFields::new();
        fields.push("matchScore", FieldValue::Float(self.match_score));
        if let Some(score) = self.liveness_score {
            fields.push("livenessScore", FieldValue::Float(score));
        }
        fields.push("spoofDetected", FieldValue::Bool(self.spoof_detected));
        fields.push("attemptCount", FieldValue::Integer(self.attempt_count));
        if let Some(photo) = &self.photo {
            fields.push("photo", FieldValue::Image(photo.clone()));
        }
        if !self.extra.is_empty() {
            fields.push("extra", FieldValue::Extra(self.extra.clone()));
        }
        fields
    }
}

/// Terminal failure reported by the vendor SDK.
#[derive(Debug, Clone)]
pub struct FaceFailure {
    pub code: String,
    pub description: String,
    pub retriable: bool,
}

impl FaceFailure {
    pub fn message(&self) -> String {
        format!("{}: {}", self.code, self.description)
    }
}

impl VendorRecord for FaceFailure {
    fn fields(&self) -> VendorFields {
        VendorFields::new()
            .with("code", FieldValue::Text(self.code.clone()))
            .with("description", FieldValue::Text(self.description.clone()))
            .with("retriable", FieldValue::Bool(self.retriable))
    }
}

/// Intermediate photo payload emitted before the terminal result.
pub(crate) struct PhotoArtifact {
    pub(crate) bytes: Vec<u8>,
}

impl VendorRecord for PhotoArtifact {
    fn fields(&self) -> VendorFields {
        VendorFields::new().with("image", FieldValue::Image(self.bytes.clone()))
    }
}
