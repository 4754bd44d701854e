use tokio::sync::mpsc;

use crate::errors::{AdapterStartError, StartError};
use crate::events::CaptureEvent;
use crate::presentation::PresentationController;
use crate::request::{CaptureRequest, Modality};
use crate::settings::AdapterSettings;

/// Clonable handle a vendor adapter uses to report events from arbitrary
/// vendor callback threads. Sending never blocks and is safe from any
/// thread; events are serialized by the session driver on the other end.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<CaptureEvent>,
}

impl EventSender {
    /// Emits an event toward the session driver. Returns `false` when the
    /// session already terminated and the event was discarded.
    pub fn emit(&self, event: CaptureEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

/// Creates the channel pair connecting an adapter to a session driver.
pub fn event_channel() -> (EventSender, mpsc::UnboundedReceiver<CaptureEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSender { tx }, rx)
}

/// Uniform contract each vendor SDK is wrapped behind. One concrete adapter
/// type per modality, registered at compile time; no dynamic proxies.
pub trait VendorAdapter: Send {
    /// Launches the vendor flow and presents its UI through `presenter`.
    ///
    /// Must return promptly: vendor work is asynchronous and reported via
    /// the [`EventSender`] handed to the adapter at construction, never via
    /// a blocking return. An [`AdapterStartError::InitializationFailed`] is
    /// converted by the registry into a terminal `Failure` event.
    fn start(
        &mut self,
        request: &CaptureRequest,
        presenter: &PresentationController,
    ) -> Result<(), AdapterStartError>;

    /// Requests upstream teardown. Non-blocking, callable from any thread,
    /// in any state, including concurrently with an in-flight terminal
    /// vendor callback.
    fn cancel(&self);
}

/// Resolves a modality to its vendor adapter. Returns
/// [`StartError::VendorUnavailable`] for modalities whose SDK is not linked;
/// the registry then fails `start` synchronously without creating a session.
pub trait AdapterFactory: Send + Sync {
    fn create(
        &self,
        modality: Modality,
        settings: AdapterSettings,
        events: EventSender,
    ) -> Result<Box<dyn VendorAdapter>, StartError>;
}
