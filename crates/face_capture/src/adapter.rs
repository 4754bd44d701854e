use std::sync::{Arc, Mutex, PoisonError};

use capture_document::normalize;
use capture_session::{
    AdapterFactory, AdapterSettings, AdapterStartError, ArtifactKind, CaptureEvent, CaptureRequest,
    ErrorCode, EventSender, Modality, PresentationController, StartError, VendorAdapter,
};
use tracing::debug;

use crate::credentials::FaceCredentials;
use crate::error::FaceSdkError;
use crate::record::PhotoArtifact;
use crate::sdk::{FaceCallbacks, FaceFlow, FaceSdk};

type SharedFlow = Arc<Mutex<Option<Box<dyn FaceFlow>>>>;

/// Wraps a vendor face SDK behind the shared adapter contract.
///
/// One adapter instance serves one session. Vendor callbacks arrive on
/// vendor-managed threads and are forwarded through the [`EventSender`];
/// ordering and terminal arbitration happen downstream in the registry.
pub struct FaceCaptureAdapter {
    modality: Modality,
    sdk: Arc<dyn FaceSdk>,
    settings: AdapterSettings,
    events: EventSender,
    flow: SharedFlow,
}

impl FaceCaptureAdapter {
    pub fn new(
        modality: Modality,
        sdk: Arc<dyn FaceSdk>,
        settings: AdapterSettings,
        events: EventSender,
    ) -> Self {
        Self {
            modality,
            sdk,
            settings,
            events,
            flow: Arc::new(Mutex::new(None)),
        }
    }

    fn callbacks(&self) -> FaceCallbacks {
        let artifact_kind = if self.modality == Modality::Selfie {
            ArtifactKind::Selfie
        } else {
            ArtifactKind::Photo
        };
        let pause_on_photo = self.settings.dismiss_camera_on_photo;

        let progress_events = self.events.clone();
        let photo_events = self.events.clone();
        let result_events = self.events.clone();
        let failure_events = self.events.clone();
        let photo_flow = self.flow.clone();

        FaceCallbacks {
            on_progress: Box::new(move |percent| {
                progress_events.emit(CaptureEvent::progress(percent));
            }),
            on_photo_taken: Box::new(move |bytes| {
                let payload = normalize(&PhotoArtifact { bytes });
                photo_events.emit(CaptureEvent::PartialArtifact {
                    kind: artifact_kind,
                    payload,
                });
                // Policy flag only: the camera pauses, the surface stays up
                // until a terminal event dismisses it.
                if pause_on_photo {
                    if let Some(flow) = lock_flow(&photo_flow).as_ref() {
                        flow.pause_camera();
                    }
                }
            }),
            on_result: Box::new(move |result| {
                result_events.emit(CaptureEvent::Success(normalize(&result)));
            }),
            on_failure: Box::new(move |failure| {
                failure_events.emit(CaptureEvent::failure(
                    ErrorCode::VendorReportedFailure,
                    failure.message(),
                ));
            }),
        }
    }
}

impl VendorAdapter for FaceCaptureAdapter {
    fn start(
        &mut self,
        request: &CaptureRequest,
        presenter: &PresentationController,
    ) -> Result<(), AdapterStartError> {
        let credentials = FaceCredentials::from_request(request, &self.settings);
        debug!(
            modality = ?self.modality,
            transaction = %credentials.transaction_id,
            "launching face flow"
        );

        let flow = self
            .sdk
            .launch(&credentials, self.callbacks())
            .map_err(|error| match error {
                FaceSdkError::NotLinked => AdapterStartError::VendorUnavailable,
                FaceSdkError::Initialization(message) => {
                    AdapterStartError::InitializationFailed(message)
                }
            })?;

        presenter
            .present(flow.presentable())
            .map_err(|error| AdapterStartError::InitializationFailed(error.to_string()))?;
        *lock_flow(&self.flow) = Some(flow);
        Ok(())
    }

    fn cancel(&self) {
        if let Some(flow) = lock_flow(&self.flow).as_ref() {
            debug!(modality = ?self.modality, "forwarding cancel to face flow");
            flow.request_cancel();
        }
    }
}

fn lock_flow(flow: &SharedFlow) -> std::sync::MutexGuard<'_, Option<Box<dyn FaceFlow>>> {
    flow.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Serves the three face modalities from one injected SDK; everything else
/// reports the vendor as unavailable.
pub struct FaceAdapterFactory {
    sdk: Arc<dyn FaceSdk>,
}

impl FaceAdapterFactory {
    pub fn new(sdk: Arc<dyn FaceSdk>) -> Self {
        Self { sdk }
    }
}

impl AdapterFactory for FaceAdapterFactory {
    fn create(
        &self,
        modality: Modality,
        settings: AdapterSettings,
        events: EventSender,
    ) -> Result<Box<dyn VendorAdapter>, StartError> {
        match modality {
            Modality::FaceRegister | Modality::FaceAuthenticate | Modality::Selfie => {
                Ok(Box::new(FaceCaptureAdapter::new(
                    modality,
                    self.sdk.clone(),
                    settings,
                    events,
                )))
            }
            other => Err(StartError::VendorUnavailable { modality: other }),
        }
    }
}
