use std::time::Instant;

use tracing::debug;
use uuid::Uuid;

use crate::request::Modality;

/// Opaque identifier for a running capture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionHandle {
    pub id: Uuid,
    pub modality: Modality,
}

/// Lifecycle of one capture session. At most one session is outside
/// `Idle`/`Terminated` at any instant (the registry slot enforces it).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Starting,
    Presenting,
    AwaitingVendorResult,
    Completing,
    Dismissing,
    Terminated,
}

/// Session bookkeeping owned by the registry. All mutation happens on the
/// session driver task; vendor callbacks never touch this directly.
#[derive(Debug)]
pub(crate) struct CaptureSession {
    handle: SessionHandle,
    state: SessionState,
    started_at: Instant,
}

impl CaptureSession {
    pub(crate) fn new(modality: Modality) -> Self {
        Self {
            handle: SessionHandle {
                id: Uuid::new_v4(),
                modality,
            },
            state: SessionState::Idle,
            started_at: Instant::now(),
        }
    }

    pub(crate) fn handle(&self) -> SessionHandle {
        self.handle
    }

    pub(crate) fn modality(&self) -> Modality {
        self.handle.modality
    }

    pub(crate) fn state(&self) -> SessionState {
        self.state
    }

    pub(crate) fn set_state(&mut self, next: SessionState) {
        debug!(
            session = %self.handle.id,
            modality = ?self.handle.modality,
            from = ?self.state,
            to = ?next,
            elapsed_ms = self.started_at.elapsed().as_millis() as u64,
            "session state transition"
        );
        self.state = next;
    }
}
