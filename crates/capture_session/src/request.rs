use std::time::Duration;

use thiserror::Error;

use crate::errors::StartError;

/// Capture workflow families exposed to the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modality {
    FaceRegister,
    FaceAuthenticate,
    ActiveLiveness,
    HybridLiveness,
    Selfie,
    Ocr,
    Hologram,
    Nfc,
    Mrz,
    VideoCall,
}

#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("server URL must not be empty")]
    EmptyServerUrl,
    #[error("transaction id must not be empty")]
    EmptyTransactionId,
}

/// Vendor credentials shared by every modality. Immutable once built.
#[derive(Debug, Clone)]
pub struct Credentials {
    server_url: String,
    transaction_id: String,
    user_id: Option<String>,
    timeout: Option<Duration>,
}

impl Credentials {
    pub fn builder() -> CredentialsBuilder {
        CredentialsBuilder::default()
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Per-modality request timeout forwarded to the vendor SDK. This layer
    /// enforces no timeout itself; expiry surfaces as an ordinary vendor
    /// `Failure` event.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

#[derive(Debug, Clone, Default)]
pub struct CredentialsBuilder {
    server_url: Option<String>,
    transaction_id: Option<String>,
    user_id: Option<String>,
    timeout: Option<Duration>,
}

impl CredentialsBuilder {
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    pub fn transaction_id(mut self, id: impl Into<String>) -> Self {
        self.transaction_id = Some(id.into());
        self
    }

    pub fn user_id(mut self, id: impl Into<String>) -> Self {
        self.user_id = Some(id.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<Credentials, CredentialsError> {
        let server_url = self.server_url.unwrap_or_default();
        if server_url.trim().is_empty() {
            return Err(CredentialsError::EmptyServerUrl);
        }
        let transaction_id = self.transaction_id.unwrap_or_default();
        if transaction_id.trim().is_empty() {
            return Err(CredentialsError::EmptyTransactionId);
        }
        Ok(Credentials {
            server_url,
            transaction_id,
            user_id: self.user_id,
            timeout: self.timeout,
        })
    }
}

/// Behavior switches forwarded to the vendor flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BehaviorFlags {
    pub auto_take: bool,
    pub manual_capture: bool,
    /// Document flows only: front capture auto-triggers the back side.
    pub capture_both_sides: bool,
}

/// One capture run's full input. Immutable once a session starts.
#[derive(Debug, Clone)]
pub struct CaptureRequest {
    modality: Modality,
    credentials: Credentials,
    behavior: BehaviorFlags,
}

impl CaptureRequest {
    pub fn new(modality: Modality, credentials: Credentials) -> Self {
        Self {
            modality,
            credentials,
            behavior: BehaviorFlags::default(),
        }
    }

    pub fn behavior(mut self, flags: BehaviorFlags) -> Self {
        self.behavior = flags;
        self
    }

    pub fn modality(&self) -> Modality {
        self.modality
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn behavior_flags(&self) -> BehaviorFlags {
        self.behavior
    }

    pub(crate) fn validate(&self) -> Result<(), StartError> {
        if self.behavior.capture_both_sides
            && !matches!(self.modality, Modality::Ocr | Modality::Mrz)
        {
            return Err(StartError::InvalidArguments(format!(
                "capture_both_sides is a document-flow flag, not valid for {:?}",
                self.modality
            )));
        }
        Ok(())
    }
}
