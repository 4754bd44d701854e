use serde_json::{json, Value};

use crate::events::{ArtifactKind, CaptureEvent};
use crate::request::Modality;

/// One named callback toward the host application.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayEvent {
    pub name: &'static str,
    pub payload: Value,
}

/// The host-channel boundary, consumed by the registry. Implementations own
/// the wire encoding; they receive already-serializable payloads only.
pub trait HostGateway: Send + Sync {
    fn deliver(&self, event: GatewayEvent);
}

/// Maps a capture event to the callback name the host historically expects
/// for the given modality.
pub fn gateway_event(modality: Modality, event: &CaptureEvent) -> GatewayEvent {
    match event {
        CaptureEvent::Progress(percent) => GatewayEvent {
            name: match modality {
                Modality::Hologram => "onHologramStarted",
                _ => "onProgress",
            },
            payload: json!(*percent as f64),
        },
        CaptureEvent::PartialArtifact { kind, payload } => GatewayEvent {
            name: match kind {
                ArtifactKind::Photo => "onPhotoTaken",
                ArtifactKind::Selfie => "onSelfieTaken",
                ArtifactKind::FrontSideImage | ArtifactKind::BackSideImage => "onDocumentScan",
                ArtifactKind::HologramVideo => "onHologramVideoRecorded",
                ArtifactKind::IntermediateFrame => "onIQAResult",
            },
            payload: payload.clone().into_value(),
        },
        CaptureEvent::StatusChanged(payload) => GatewayEvent {
            name: "onStatusChanged",
            payload: payload.clone().into_value(),
        },
        CaptureEvent::Success(document) => GatewayEvent {
            name: match modality {
                Modality::ActiveLiveness | Modality::HybridLiveness => "onActiveLivenessResult",
                Modality::Ocr | Modality::Mrz => "onDocumentScan",
                _ => "onResult",
            },
            payload: document.clone().into_value(),
        },
        CaptureEvent::Failure { code, message } => GatewayEvent {
            name: match modality {
                Modality::ActiveLiveness | Modality::HybridLiveness => "onActiveLivenessFailure",
                Modality::Hologram => "onHologramFailure",
                _ => "onFailure",
            },
            payload: json!({ "code": code.as_str(), "message": message }),
        },
        CaptureEvent::UserCancelled => GatewayEvent {
            name: "onCancelled",
            payload: Value::Null,
        },
        CaptureEvent::Dismissed => GatewayEvent {
            name: "onDismissed",
            payload: Value::Null,
        },
    }
}
