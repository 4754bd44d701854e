use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::adapter::{event_channel, AdapterFactory, VendorAdapter};
use crate::errors::{AdapterStartError, ErrorCode, StartError};
use crate::events::CaptureEvent;
use crate::gateway::{gateway_event, HostGateway};
use crate::presentation::{DismissOutcome, PresentationController, PresentationHost};
use crate::request::CaptureRequest;
use crate::session::{CaptureSession, SessionHandle, SessionState};
use crate::settings::AdapterSettings;

enum Control {
    Cancel,
}

struct ActiveSession {
    handle: SessionHandle,
    control: mpsc::UnboundedSender<Control>,
}

struct RegistryInner {
    factory: Arc<dyn AdapterFactory>,
    gateway: Arc<dyn HostGateway>,
    host: Arc<dyn PresentationHost>,
    settings: AdapterSettings,
    slot: Mutex<Option<ActiveSession>>,
}

/// The single-slot session guard.
///
/// At most one capture session is non-terminal at any instant: `start`
/// atomically test-and-sets the slot and fails fast with
/// [`StartError::AlreadyInProgress`] when occupied (the UI cannot host two
/// capture surfaces, so requests are rejected, never queued). Each admitted
/// session runs a driver task that is the sole writer of session state; it
/// arbitrates the terminal event, drives dismissal, and releases the slot
/// strictly after teardown completed.
pub struct SessionRegistry {
    inner: Arc<RegistryInner>,
}

impl SessionRegistry {
    pub fn new(
        factory: Arc<dyn AdapterFactory>,
        gateway: Arc<dyn HostGateway>,
        host: Arc<dyn PresentationHost>,
        settings: AdapterSettings,
    ) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                factory,
                gateway,
                host,
                settings,
                slot: Mutex::new(None),
            }),
        }
    }

    /// Admits one capture session. Never blocks on vendor I/O; vendor work
    /// is asynchronous and reaches the gateway via the event stream.
    ///
    /// Must be called within a tokio runtime (the session driver is
    /// spawned onto it).
    pub fn start(&self, request: CaptureRequest) -> Result<SessionHandle, StartError> {
        request.validate()?;

        let mut slot = lock_slot(&self.inner);
        if slot.is_some() {
            return Err(StartError::AlreadyInProgress);
        }

        let (events, event_rx) = event_channel();
        let mut adapter = self.inner.factory.create(
            request.modality(),
            self.inner.settings.clone(),
            events.clone(),
        )?;

        let mut session = CaptureSession::new(request.modality());
        session.set_state(SessionState::Starting);
        let presenter = Arc::new(PresentationController::new(self.inner.host.clone()));

        match adapter.start(&request, &presenter) {
            Ok(()) => session.set_state(SessionState::Presenting),
            Err(AdapterStartError::VendorUnavailable) => {
                // No session was observable yet; reject synchronously.
                return Err(StartError::VendorUnavailable {
                    modality: request.modality(),
                });
            }
            Err(AdapterStartError::InitializationFailed(message)) => {
                warn!(
                    session = %session.handle().id,
                    modality = ?request.modality(),
                    %message,
                    "vendor initialization failed; synthesizing terminal failure"
                );
                events.emit(CaptureEvent::failure(
                    ErrorCode::InitializationFailed,
                    message,
                ));
            }
        }

        let (control_tx, control_rx) = mpsc::unbounded_channel();
        let handle = session.handle();
        *slot = Some(ActiveSession {
            handle,
            control: control_tx,
        });
        debug!(session = %handle.id, modality = ?handle.modality, "session slot acquired");
        drop(slot);

        tokio::spawn(drive_session(
            self.inner.clone(),
            session,
            adapter,
            presenter,
            event_rx,
            control_rx,
        ));
        Ok(handle)
    }

    /// Requests cancellation of the running session, if any. Non-blocking
    /// and safe from any thread, in any state, including concurrently with
    /// an in-flight terminal vendor callback. Returns whether a session
    /// existed when the request was recorded.
    pub fn cancel(&self) -> bool {
        let slot = lock_slot(&self.inner);
        match slot.as_ref() {
            Some(active) => {
                debug!(session = %active.handle.id, "cancel requested");
                active.control.send(Control::Cancel).is_ok()
            }
            None => false,
        }
    }

    /// Pure read of slot occupancy.
    pub fn is_in_progress(&self) -> bool {
        lock_slot(&self.inner).is_some()
    }
}

/// Single-writer boundary for one session: every vendor event and cancel
/// request is serialized here before anything is forwarded outward.
async fn drive_session(
    inner: Arc<RegistryInner>,
    mut session: CaptureSession,
    adapter: Box<dyn VendorAdapter>,
    presenter: Arc<PresentationController>,
    mut events: mpsc::UnboundedReceiver<CaptureEvent>,
    mut control: mpsc::UnboundedReceiver<Control>,
) {
    if session.state() == SessionState::Presenting {
        session.set_state(SessionState::AwaitingVendorResult);
    }

    // The first terminal event processed here wins. `biased` drains vendor
    // events before cancel requests, so a vendor terminal that arrived first
    // turns a racing cancel into a silent no-op.
    let terminal = loop {
        tokio::select! {
            biased;

            event = events.recv() => match event {
                Some(event) if event.is_terminal() => break event,
                Some(event) => {
                    inner
                        .gateway
                        .deliver(gateway_event(session.modality(), &event));
                }
                None => {
                    break CaptureEvent::failure(
                        ErrorCode::VendorReportedFailure,
                        "vendor event stream ended without a terminal event",
                    );
                }
            },
            command = control.recv() => match command {
                Some(Control::Cancel) => {
                    debug!(session = %session.handle().id, "cancel promoted to terminal event");
                    adapter.cancel();
                    break CaptureEvent::UserCancelled;
                }
                // The control sender lives in the slot until teardown, so
                // closure here means no cancel is pending.
                None => continue,
            },
        }
    };

    session.set_state(SessionState::Completing);
    let terminal = match terminal {
        CaptureEvent::Success(document) if document.is_empty() => {
            warn!(
                session = %session.handle().id,
                "vendor result normalized to an empty document"
            );
            CaptureEvent::failure(
                ErrorCode::InternalMappingError,
                "vendor result normalized to an empty document",
            )
        }
        other => other,
    };

    session.set_state(SessionState::Dismissing);
    let outcome = presenter.dismiss();
    debug!(
        session = %session.handle().id,
        ?outcome,
        "presentation teardown finished"
    );
    session.set_state(SessionState::Terminated);

    // Ordering guarantee: the slot opens only after dismissal completed, so
    // a freshly admitted session can never race a still-tearing-down UI.
    release_slot(&inner, session.handle());

    inner
        .gateway
        .deliver(gateway_event(session.modality(), &terminal));
    if outcome == DismissOutcome::Performed {
        inner
            .gateway
            .deliver(gateway_event(session.modality(), &CaptureEvent::Dismissed));
    }
}

fn release_slot(inner: &RegistryInner, handle: SessionHandle) {
    lock_slot(inner).take();
    debug!(session = %handle.id, "session slot released");
}

fn lock_slot(inner: &RegistryInner) -> MutexGuard<'_, Option<ActiveSession>> {
    inner.slot.lock().unwrap_or_else(|poisoned| {
        warn!("session slot lock poisoned; continuing with inner value");
        PoisonError::into_inner(poisoned)
    })
}
