use thiserror::Error;

/// Errors surfaced by a vendor [`FaceSdk`] implementation.
///
/// [`FaceSdk`]: crate::FaceSdk
#[derive(Debug, Error)]
pub enum FaceSdkError {
    /// The vendor library is not linked or resolvable in this build.
    #[error("face SDK is not linked")]
    NotLinked,
    #[error("face SDK initialization failed: {0}")]
    Initialization(String),
}

#[derive(Debug, Error)]
pub enum FaceConfigError {
    #[error("server URL must not be empty")]
    EmptyServerUrl,
    #[error("transaction id must not be empty")]
    EmptyTransactionId,
}
