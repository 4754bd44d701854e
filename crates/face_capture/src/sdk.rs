use capture_session::PresentableUnit;

use crate::credentials::FaceCredentials;
use crate::error::FaceSdkError;
use crate::record::{FaceFailure, FaceMatchResult};

/// Fixed callback set handed to the vendor at launch. One concrete set per
/// adapter instance, wired at construction; the vendor invokes these from
/// its own threads.
pub struct FaceCallbacks {
    pub on_progress: Box<dyn Fn(u8) + Send + Sync>,
    pub on_photo_taken: Box<dyn Fn(Vec<u8>) + Send + Sync>,
    pub on_result: Box<dyn Fn(FaceMatchResult) + Send + Sync>,
    pub on_failure: Box<dyn Fn(FaceFailure) + Send + Sync>,
}

/// A launched vendor flow: yields the presentable UI unit and accepts
/// teardown requests. All methods are non-blocking.
pub trait FaceFlow: Send + Sync {
    fn presentable(&self) -> PresentableUnit;
    fn request_cancel(&self);
    /// Stops the camera preview without tearing the surface down; used by
    /// the photo-taken policy flag.
    fn pause_camera(&self);
}

/// The vendor SDK entry point. Implementations supply credentials on
/// demand, emit the named callbacks asynchronously, and yield a presentable
/// unit per launch.
pub trait FaceSdk: Send + Sync {
    fn launch(
        &self,
        credentials: &FaceCredentials,
        callbacks: FaceCallbacks,
    ) -> Result<Box<dyn FaceFlow>, FaceSdkError>;
}
