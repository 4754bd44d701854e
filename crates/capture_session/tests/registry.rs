use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use capture_document::ResultDocument;
use capture_session::{
    AdapterFactory, AdapterSettings, AdapterStartError, CaptureEvent, CaptureRequest, Credentials,
    EventSender, GatewayEvent, HostGateway, Modality, PresentError, PresentableUnit,
    PresentationController, PresentationHost, SessionRegistry, StartError, VendorAdapter,
};
use serde_json::json;

#[derive(Default)]
struct RecordingGateway {
    events: Mutex<Vec<GatewayEvent>>,
}

impl HostGateway for RecordingGateway {
    fn deliver(&self, event: GatewayEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl RecordingGateway {
    fn count(&self, name: &str) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.name == name)
            .count()
    }

    fn payload_of(&self, name: &str) -> Option<serde_json::Value> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.payload.clone())
    }

    fn total(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

#[derive(Default)]
struct CountingHost {
    dismissed: AtomicUsize,
}

impl PresentationHost for CountingHost {
    fn present(&self, _unit: PresentableUnit) -> Result<(), PresentError> {
        Ok(())
    }

    fn dismiss(&self) {
        self.dismissed.fetch_add(1, Ordering::SeqCst);
    }
}

struct ScriptedAdapter {
    events: EventSender,
    script: Vec<CaptureEvent>,
    start_error: Option<AdapterStartError>,
    cancelled: Arc<AtomicUsize>,
}

impl VendorAdapter for ScriptedAdapter {
    fn start(
        &mut self,
        _request: &CaptureRequest,
        presenter: &PresentationController,
    ) -> Result<(), AdapterStartError> {
        if let Some(error) = self.start_error.take() {
            return Err(error);
        }
        presenter
            .present(PresentableUnit::new(()))
            .map_err(|e| AdapterStartError::InitializationFailed(e.to_string()))?;
        for event in self.script.drain(..) {
            self.events.emit(event);
        }
        Ok(())
    }

    fn cancel(&self) {
        self.cancelled.fetch_add(1, Ordering::SeqCst);
    }
}

/// Serves one scripted adapter per `create`; NFC plays the unlinked SDK.
#[derive(Default)]
struct ScriptedFactory {
    script: Mutex<Vec<CaptureEvent>>,
    start_error: Mutex<Option<AdapterStartError>>,
    cancelled: Arc<AtomicUsize>,
}

impl ScriptedFactory {
    fn set_script(&self, events: Vec<CaptureEvent>) {
        *self.script.lock().unwrap() = events;
    }

    fn fail_start_with(&self, error: AdapterStartError) {
        *self.start_error.lock().unwrap() = Some(error);
    }
}

impl AdapterFactory for ScriptedFactory {
    fn create(
        &self,
        modality: Modality,
        _settings: AdapterSettings,
        events: EventSender,
    ) -> Result<Box<dyn VendorAdapter>, StartError> {
        if modality == Modality::Nfc {
            return Err(StartError::VendorUnavailable { modality });
        }
        Ok(Box::new(ScriptedAdapter {
            events,
            script: std::mem::take(&mut self.script.lock().unwrap()),
            start_error: self.start_error.lock().unwrap().take(),
            cancelled: self.cancelled.clone(),
        }))
    }
}

struct Fixture {
    registry: Arc<SessionRegistry>,
    factory: Arc<ScriptedFactory>,
    gateway: Arc<RecordingGateway>,
    host: Arc<CountingHost>,
}

fn fixture() -> Fixture {
    let factory = Arc::new(ScriptedFactory::default());
    let gateway = Arc::new(RecordingGateway::default());
    let host = Arc::new(CountingHost::default());
    let registry = Arc::new(SessionRegistry::new(
        factory.clone(),
        gateway.clone(),
        host.clone(),
        AdapterSettings::default(),
    ));
    Fixture {
        registry,
        factory,
        gateway,
        host,
    }
}

fn request(modality: Modality) -> CaptureRequest {
    let credentials = Credentials::builder()
        .server_url("https://capture.example")
        .transaction_id("txn-42")
        .user_id("user-7")
        .build()
        .unwrap();
    CaptureRequest::new(modality, credentials)
}

fn success_doc() -> ResultDocument {
    let mut doc = ResultDocument::new();
    doc.insert("status", json!("ok"));
    doc
}

async fn wait_for(gateway: &RecordingGateway, name: &str) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while gateway.count(name) == 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("timed out waiting for gateway event `{name}`"));
}

#[tokio::test]
async fn end_to_end_success_flow() {
    let fx = fixture();
    fx.factory.set_script(vec![
        CaptureEvent::progress(40),
        CaptureEvent::Success(success_doc()),
    ]);

    let handle = fx.registry.start(request(Modality::FaceRegister)).unwrap();
    assert_eq!(handle.modality, Modality::FaceRegister);
    wait_for(&fx.gateway, "onDismissed").await;

    assert_eq!(fx.gateway.count("onProgress"), 1);
    assert_eq!(fx.gateway.count("onResult"), 1);
    assert_eq!(fx.gateway.count("onDismissed"), 1);
    assert_eq!(fx.gateway.count("onFailure"), 0);
    assert_eq!(fx.gateway.count("onCancelled"), 0);
    assert_eq!(fx.gateway.payload_of("onResult"), Some(json!({"status": "ok"})));
    assert_eq!(fx.host.dismissed.load(Ordering::SeqCst), 1);
    assert!(!fx.registry.is_in_progress());
}

#[tokio::test]
async fn start_while_in_progress_fails_fast_and_leaves_session_alone() {
    let fx = fixture();
    // No scripted terminal: the session stays open until cancelled.
    let _handle = fx.registry.start(request(Modality::FaceAuthenticate)).unwrap();
    assert!(fx.registry.is_in_progress());

    let events_before = fx.gateway.total();
    assert!(matches!(
        fx.registry.start(request(Modality::Ocr)),
        Err(StartError::AlreadyInProgress)
    ));
    assert!(fx.registry.is_in_progress());
    assert_eq!(fx.gateway.total(), events_before);

    assert!(fx.registry.cancel());
    wait_for(&fx.gateway, "onCancelled").await;
    wait_for(&fx.gateway, "onDismissed").await;

    assert_eq!(fx.gateway.count("onCancelled"), 1);
    assert_eq!(fx.factory.cancelled.load(Ordering::SeqCst), 1);
    assert_eq!(fx.host.dismissed.load(Ordering::SeqCst), 1);
    assert!(!fx.registry.is_in_progress());
}

#[tokio::test]
async fn vendor_terminal_beats_racing_cancel() {
    let fx = fixture();
    fx.factory
        .set_script(vec![CaptureEvent::Success(success_doc())]);

    // On the current-thread runtime the driver has not polled yet, so the
    // vendor terminal and the cancel request are both queued; the driver
    // must prefer the already-recorded vendor terminal.
    let _handle = fx.registry.start(request(Modality::FaceRegister)).unwrap();
    assert!(fx.registry.cancel());

    wait_for(&fx.gateway, "onResult").await;
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert_eq!(fx.gateway.count("onResult"), 1);
    assert_eq!(fx.gateway.count("onCancelled"), 0);
    assert_eq!(fx.host.dismissed.load(Ordering::SeqCst), 1);
    assert!(!fx.registry.is_in_progress());
}

#[tokio::test]
async fn unlinked_sdk_rejects_synchronously() {
    let fx = fixture();
    let result = fx.registry.start(request(Modality::Nfc));
    assert!(matches!(
        result,
        Err(StartError::VendorUnavailable {
            modality: Modality::Nfc
        })
    ));
    assert!(!fx.registry.is_in_progress());
    assert_eq!(fx.gateway.total(), 0);
}

#[tokio::test]
async fn initialization_failure_becomes_a_terminal_event() {
    let fx = fixture();
    fx.factory
        .fail_start_with(AdapterStartError::InitializationFailed(
            "license expired".into(),
        ));

    let result = fx.registry.start(request(Modality::FaceRegister));
    assert!(result.is_ok());
    wait_for(&fx.gateway, "onFailure").await;

    let payload = fx.gateway.payload_of("onFailure").unwrap();
    assert_eq!(payload["code"], json!("InitializationFailed"));
    assert_eq!(payload["message"], json!("license expired"));

    // Nothing was ever presented, so there is nothing to dismiss.
    assert_eq!(fx.gateway.count("onDismissed"), 0);
    assert_eq!(fx.host.dismissed.load(Ordering::SeqCst), 0);
    assert!(!fx.registry.is_in_progress());
}

#[tokio::test]
async fn empty_success_document_is_rewritten_to_mapping_error() {
    let fx = fixture();
    fx.factory
        .set_script(vec![CaptureEvent::Success(ResultDocument::new())]);

    fx.registry.start(request(Modality::FaceRegister)).unwrap();
    wait_for(&fx.gateway, "onFailure").await;

    let payload = fx.gateway.payload_of("onFailure").unwrap();
    assert_eq!(payload["code"], json!("InternalMappingError"));
    assert_eq!(fx.gateway.count("onResult"), 0);
    assert_eq!(fx.host.dismissed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn slot_reopens_after_termination() {
    let fx = fixture();
    fx.factory
        .set_script(vec![CaptureEvent::Success(success_doc())]);
    fx.registry.start(request(Modality::FaceRegister)).unwrap();
    wait_for(&fx.gateway, "onDismissed").await;
    assert!(!fx.registry.is_in_progress());

    fx.factory
        .set_script(vec![CaptureEvent::Success(success_doc())]);
    fx.registry.start(request(Modality::Selfie)).unwrap();
    tokio::time::timeout(Duration::from_secs(2), async {
        while fx.gateway.count("onDismissed") < 2 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("second session never finished");

    assert_eq!(fx.gateway.count("onResult"), 2);
    assert_eq!(fx.host.dismissed.load(Ordering::SeqCst), 2);
    assert!(!fx.registry.is_in_progress());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_starts_admit_exactly_one_session() {
    let fx = fixture();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let registry = fx.registry.clone();
        handles.push(tokio::spawn(async move {
            registry.start(request(Modality::FaceRegister))
        }));
    }

    let mut admitted = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => admitted += 1,
            Err(StartError::AlreadyInProgress) => rejected += 1,
            Err(other) => panic!("unexpected start error: {other}"),
        }
    }
    assert_eq!(admitted, 1);
    assert_eq!(rejected, 7);
    assert!(fx.registry.is_in_progress());

    fx.registry.cancel();
    wait_for(&fx.gateway, "onCancelled").await;
    assert!(!fx.registry.is_in_progress());
}
