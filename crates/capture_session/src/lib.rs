#![forbid(unsafe_code)]
//! Capture-session orchestration shared by every modality plugin.
//!
//! A capture workflow delegates to a vendor SDK that presents its own UI and
//! reports back through callbacks on vendor-managed threads. This crate owns
//! the hard parts that were previously duplicated per modality:
//! - [`SessionRegistry`]: the single-slot guard that admits at most one
//!   capture session and arbitrates terminal events exactly once.
//! - [`PresentationController`]: exactly-once dismissal of the presented UI,
//!   behind an injected [`PresentationHost`].
//! - [`VendorAdapter`]: the uniform start/cancel/events contract each vendor
//!   SDK is wrapped behind.
//!
//! Vendor adapters push [`CaptureEvent`]s through an [`EventSender`]; the
//! registry funnels them through a single-writer driver task before they
//! reach the [`HostGateway`].

mod adapter;
mod errors;
mod events;
mod gateway;
mod presentation;
mod registry;
mod request;
mod session;
mod settings;

pub use adapter::{event_channel, AdapterFactory, EventSender, VendorAdapter};
pub use errors::{AdapterStartError, ErrorCode, PresentError, SettingsError, StartError};
pub use events::{ArtifactKind, CaptureEvent};
pub use gateway::{gateway_event, GatewayEvent, HostGateway};
pub use presentation::{
    DismissOutcome, PresentableUnit, PresentationController, PresentationHost, PresentationState,
};
pub use registry::SessionRegistry;
pub use request::{
    BehaviorFlags, CaptureRequest, Credentials, CredentialsBuilder, CredentialsError, Modality,
};
pub use session::{SessionHandle, SessionState};
pub use settings::{AdapterSettings, ThemeOverrides};
