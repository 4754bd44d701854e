use thiserror::Error;

use crate::request::Modality;

/// Synchronous rejections from [`SessionRegistry::start`]. These occur before
/// any session exists, so no event stream is involved.
///
/// [`SessionRegistry::start`]: crate::SessionRegistry::start
#[derive(Debug, Error)]
pub enum StartError {
    #[error("a capture session is already in progress")]
    AlreadyInProgress,
    #[error("invalid capture request: {0}")]
    InvalidArguments(String),
    #[error("vendor SDK for {modality:?} is not available")]
    VendorUnavailable { modality: Modality },
}

/// Error classification carried by terminal `Failure` events. Everything
/// that goes wrong after a session exists is delivered through the event
/// channel under one of these codes, never as a propagated panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InitializationFailed,
    VendorReportedFailure,
    InternalMappingError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InitializationFailed => "InitializationFailed",
            Self::VendorReportedFailure => "VendorReportedFailure",
            Self::InternalMappingError => "InternalMappingError",
        }
    }
}

/// Failures surfaced by [`VendorAdapter::start`].
///
/// [`VendorAdapter::start`]: crate::VendorAdapter::start
#[derive(Debug, Error)]
pub enum AdapterStartError {
    #[error("vendor SDK is not linked or resolvable")]
    VendorUnavailable,
    #[error("vendor initialization failed: {0}")]
    InitializationFailed(String),
}

#[derive(Debug, Error)]
pub enum PresentError {
    #[error("a capture surface is already presented")]
    AlreadyPresented,
    #[error("presentation host rejected the capture surface: {0}")]
    HostRejected(String),
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to parse adapter settings: {0}")]
    Parse(#[from] toml::de::Error),
}
