//! What the app needs from a camera device.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CameraError;

/// Which lens to prefer when requesting access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FacingMode {
    /// Rear camera, pointed away from the user (at the menu).
    #[default]
    Environment,
    User,
}

/// A live video capture stream.
///
/// Dropping a stream does not stop it; the owner must call `stop()`.
pub trait CameraStream: Send {
    fn id(&self) -> Uuid;

    /// Stop every underlying track. Calling twice is harmless.
    fn stop(&mut self);

    fn is_live(&self) -> bool;
}

/// A camera that can be asked for access.
#[async_trait]
pub trait CameraDevice: Send + Sync {
    /// Ask for a stream. Suspends until the user grants or denies permission.
    async fn request_access(
        &self,
        facing: FacingMode,
    ) -> Result<Box<dyn CameraStream>, CameraError>;
}
