use std::time::Duration;

use capture_session::{AdapterSettings, CaptureRequest, ThemeOverrides};

use crate::error::FaceConfigError;

/// Credentials and behavior switches handed to the vendor face flow.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceCredentials {
    pub server_url: String,
    pub transaction_id: String,
    pub user_id: Option<String>,
    pub timeout: Option<Duration>,
    pub auto_take: bool,
    pub manual_capture: bool,
    pub theme: ThemeOverrides,
}

impl FaceCredentials {
    pub fn builder() -> FaceCredentialsBuilder {
        FaceCredentialsBuilder::default()
    }

    /// Translates a generic capture request plus per-adapter settings into
    /// vendor credentials. The request was validated when built, so this
    /// cannot fail.
    pub fn from_request(request: &CaptureRequest, settings: &AdapterSettings) -> Self {
        let credentials = request.credentials();
        let behavior = request.behavior_flags();
        Self {
            server_url: credentials.server_url().to_string(),
            transaction_id: credentials.transaction_id().to_string(),
            user_id: credentials.user_id().map(str::to_string),
            timeout: credentials.timeout(),
            auto_take: behavior.auto_take,
            manual_capture: behavior.manual_capture,
            theme: settings.theme.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FaceCredentialsBuilder {
    server_url: Option<String>,
    transaction_id: Option<String>,
    user_id: Option<String>,
    timeout: Option<Duration>,
    auto_take: bool,
    manual_capture: bool,
    theme: ThemeOverrides,
}

impl FaceCredentialsBuilder {
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

    pub fn auto_take(mut self, enabled: bool) -> Self {
        self.auto_take = enabled;
        self
    }

    pub fn manual_capture(mut self, enabled: bool) -> Self {
        self.manual_capture = enabled;
        self
    }

    pub fn theme(mut self, theme: ThemeOverrides) -> Self {
        self.theme = theme;
        self
    }

    pub fn build(self) -> Result<FaceCredentials, FaceConfigError> {
        let server_url = self.server_url.unwrap_or_default();
        if server_url.trim().is_empty() {
            return Err(FaceConfigError::EmptyServerUrl);
        }
        let transaction_id = self.transaction_id.unwrap_or_default();
        if transaction_id.trim().is_empty() {
            return Err(FaceConfigError::EmptyTransactionId);
        }
        Ok(FaceCredentials {
            server_url,
            transaction_id,
            user_id: self.user_id,
            timeout: self.timeout,
            auto_take: self.auto_take,
            manual_capture: self.manual_capture,
            theme: self.theme,
        })
    }
}
