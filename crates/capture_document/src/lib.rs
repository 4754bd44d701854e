#![forbid(unsafe_code)]
//! Normalization of vendor capture results into serializable documents.
//!
//! Vendor SDKs hand back arbitrarily-shaped result and error objects. This
//! crate flattens them into an ordered, wire-safe [`ResultDocument`] through
//! explicit per-vendor field mappings ([`VendorRecord`]) instead of runtime
//! reflection. Normalization never fails: unreadable fields are dropped,
//! unrecognized values are stringified.

mod document;
mod normalize;
mod record;

pub use document::ResultDocument;
pub use normalize::{normalize, normalize_error};
pub use record::{FieldAccessError, FieldValue, VendorField, VendorFields, VendorRecord};
