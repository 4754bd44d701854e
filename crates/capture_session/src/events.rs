use capture_document::ResultDocument;

use crate::errors::ErrorCode;

/// Kind tag for intermediate artifacts produced mid-capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Photo,
    Selfie,
    FrontSideImage,
    BackSideImage,
    HologramVideo,
    IntermediateFrame,
}

/// Normalized event stream shared by every modality.
///
/// `Success`, `Failure`, and `UserCancelled` are terminal: exactly one of
/// them ends a session. Everything else is forwarded to the host unchanged
/// and never affects the presented UI.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureEvent {
    /// Vendor progress in percent, clamped to 0..=100.
    Progress(u8),
    /// Intermediate artifact (photo, document side, recorded video).
    PartialArtifact {
        kind: ArtifactKind,
        payload: ResultDocument,
    },
    /// Non-terminal vendor state transition (video-call user/participant
    /// states and the like).
    StatusChanged(ResultDocument),
    Success(ResultDocument),
    Failure { code: ErrorCode, message: String },
    UserCancelled,
    /// Emitted by the registry once the presented UI is confirmed gone.
    Dismissed,
}

impl CaptureEvent {
    pub fn progress(percent: u8) -> Self {
        Self::Progress(percent.min(100))
    }

    pub fn failure(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Failure {
            code,
            message: message.into(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Success(_) | Self::Failure { .. } | Self::UserCancelled
        )
    }
}
