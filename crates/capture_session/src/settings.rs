use serde::Deserialize;

use crate::errors::SettingsError;

/// UI color overrides handed to a vendor flow. An explicit value on every
/// adapter; there is no process-wide theme state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ThemeOverrides {
    pub primary_color: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
}

/// Per-adapter configuration, passed by value at adapter construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AdapterSettings {
    pub theme: ThemeOverrides,
    /// When set, an adapter may ask its vendor flow handle to pause the
    /// camera after an intermediate photo. This never touches the
    /// presentation lifecycle; full dismissal stays tied to terminal events.
    pub dismiss_camera_on_photo: bool,
}

impl AdapterSettings {
    pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(text)?)
    }
}
