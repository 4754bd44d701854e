use std::any::Any;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, warn};

use crate::errors::PresentError;

/// Type-erased handle to the vendor's presentable UI unit (fragment /
/// view-controller equivalent). Only the [`PresentationHost`] ever looks
/// inside.
pub struct PresentableUnit {
    inner: Box<dyn Any + Send>,
}

impl PresentableUnit {
    pub fn new<T: Any + Send>(unit: T) -> Self {
        Self {
            inner: Box::new(unit),
        }
    }

    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    pub fn downcast<T: Any>(self) -> Result<Box<T>, Self> {
        match self.inner.downcast::<T>() {
            Ok(unit) => Ok(unit),
            Err(inner) => Err(Self { inner }),
        }
    }
}

impl std::fmt::Debug for PresentableUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PresentableUnit")
    }
}

/// The injected UI boundary. Implementations own marshaling onto the
/// platform's UI thread; `dismiss` returns only after teardown completed
/// there. Neither the registry nor any adapter touches platform UI types.
pub trait PresentationHost: Send + Sync {
    fn present(&self, unit: PresentableUnit) -> Result<(), PresentError>;
    fn dismiss(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationState {
    NotPresented,
    Presented,
    Dismissing,
    Dismissed,
}

/// Outcome of a [`PresentationController::dismiss`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissOutcome {
    /// This caller performed the teardown.
    Performed,
    /// Another caller already dismissed (or is dismissing); no side effects.
    AlreadyDone,
    /// Nothing was ever presented.
    NeverPresented,
}

/// Exactly-once lifecycle of one presented capture surface.
///
/// `dismiss` may race between a terminal vendor callback and user
/// back-navigation; the state guard guarantees the host teardown runs once.
pub struct PresentationController {
    host: Arc<dyn PresentationHost>,
    state: Mutex<PresentationState>,
}

impl PresentationController {
    pub fn new(host: Arc<dyn PresentationHost>) -> Self {
        Self {
            host,
            state: Mutex::new(PresentationState::NotPresented),
        }
    }

    pub fn state(&self) -> PresentationState {
        *self.lock_state()
    }

    /// Hands `unit` to the host. Valid only from `NotPresented`.
    pub fn present(&self, unit: PresentableUnit) -> Result<(), PresentError> {
        let mut state = self.lock_state();
        if *state != PresentationState::NotPresented {
            return Err(PresentError::AlreadyPresented);
        }
        self.host.present(unit)?;
        *state = PresentationState::Presented;
        debug!("capture surface presented");
        Ok(())
    }

    /// Tears the presented surface down exactly once. The first caller wins;
    /// concurrent callers return [`DismissOutcome::AlreadyDone`] immediately.
    /// Returns only after the host confirmed teardown.
    pub fn dismiss(&self) -> DismissOutcome {
        {
            let mut state = self.lock_state();
            match *state {
                PresentationState::Presented => *state = PresentationState::Dismissing,
                PresentationState::Dismissing | PresentationState::Dismissed => {
                    return DismissOutcome::AlreadyDone;
                }
                PresentationState::NotPresented => return DismissOutcome::NeverPresented,
            }
        }

        // Teardown runs outside the lock; the Dismissing state already
        // excludes every other caller.
        self.host.dismiss();

        *self.lock_state() = PresentationState::Dismissed;
        debug!("capture surface dismissed");
        DismissOutcome::Performed
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, PresentationState> {
        self.state.lock().unwrap_or_else(|poisoned| {
            warn!("presentation state lock poisoned; continuing with inner value");
            PoisonError::into_inner(poisoned)
        })
    }
}
