#![forbid(unsafe_code)]
//! Face-capture vendor adapter (register / authenticate / selfie flows).
//!
//! The reference instantiation of the capture-session orchestrator: it wraps
//! a face-recognition vendor SDK ([`FaceSdk`]) behind the shared
//! [`VendorAdapter`] contract. The vendor's concrete implementation is
//! injected; this crate owns only the callback-to-event mapping, credential
//! translation, and typed result records.
//!
//! [`VendorAdapter`]: capture_session::VendorAdapter

mod adapter;
mod credentials;
mod error;
mod record;
mod sdk;

pub use adapter::{FaceAdapterFactory, FaceCaptureAdapter};
pub use credentials::{FaceCredentials, FaceCredentialsBuilder};
pub use error::{FaceConfigError, FaceSdkError};
pub use record::{FaceFailure, FaceMatchResult};
pub use sdk::{FaceCallbacks, FaceFlow, FaceSdk};
