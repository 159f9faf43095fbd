//! CameraSession — sole owner of the live camera stream.
//!
//! `activate()` fires a device request on a background task; the answer comes
//! back as a `CameraResolution` on the channel given to `new()` and is applied
//! with `resolve()`. Every `deactivate()` bumps the generation, so an answer
//! for an earlier activation is recognised as stale and its stream is stopped
//! on arrival instead of being kept.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::device::{CameraDevice, CameraStream, FacingMode};
use crate::error::CameraError;

/// Observable camera state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraStatus {
    Inactive,
    /// Waiting on the permission prompt.
    Requesting,
    Ready(Uuid),
    /// Access failed; the camera screen shows an unavailable state.
    Unavailable(CameraError),
}

/// Result of calling `activate()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// A device request was started.
    Requested,
    /// A request is already in flight.
    Pending,
    /// A stream is already live; nothing was requested.
    AlreadyActive(Uuid),
}

/// Device answer for one activation.
pub struct CameraResolution {
    generation: u64,
    result: Result<Box<dyn CameraStream>, CameraError>,
}

impl std::fmt::Debug for CameraResolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraResolution")
            .field("generation", &self.generation)
            .field("ok", &self.result.is_ok())
            .finish()
    }
}

/// What applying a resolution did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraUpdate {
    Ready(Uuid),
    Unavailable(CameraError),
    /// The activation was abandoned before the device answered.
    Stale,
}

pub struct CameraSession {
    device: Arc<dyn CameraDevice>,
    facing: FacingMode,
    tx: mpsc::UnboundedSender<CameraResolution>,
    stream: Option<Box<dyn CameraStream>>,
    status: CameraStatus,
    generation: u64,
}

impl CameraSession {
    pub fn new(
        device: Arc<dyn CameraDevice>,
        facing: FacingMode,
        tx: mpsc::UnboundedSender<CameraResolution>,
    ) -> Self {
        Self {
            device,
            facing,
            tx,
            stream: None,
            status: CameraStatus::Inactive,
            generation: 0,
        }
    }

    pub fn status(&self) -> &CameraStatus {
        &self.status
    }

    /// Id of the live stream, if any.
    pub fn stream_id(&self) -> Option<Uuid> {
        self.stream.as_ref().map(|s| s.id())
    }

    pub fn is_active(&self) -> bool {
        self.stream.is_some()
    }

    /// Request camera access. Must be called from within a tokio runtime.
    pub fn activate(&mut self) -> Activation {
        if let Some(id) = self.stream_id() {
            debug!(stream_id = %id, "Camera already active");
            return Activation::AlreadyActive(id);
        }
        if self.status == CameraStatus::Requesting {
            return Activation::Pending;
        }

        self.generation += 1;
        self.status = CameraStatus::Requesting;

        let generation = self.generation;
        let device = Arc::clone(&self.device);
        let facing = self.facing;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = device.request_access(facing).await;
            if let Err(mpsc::error::SendError(mut resolution)) =
                tx.send(CameraResolution { generation, result })
            {
                // Session is gone; nobody else can stop this stream.
                if let Ok(stream) = resolution.result.as_mut() {
                    stream.stop();
                }
            }
        });

        info!(generation, facing = ?self.facing, "Camera access requested");
        Activation::Requested
    }

    /// Apply a device answer. Stale answers are discarded and their stream stopped.
    pub fn resolve(&mut self, resolution: CameraResolution) -> CameraUpdate {
        let CameraResolution { generation, result } = resolution;

        if generation != self.generation || self.status != CameraStatus::Requesting {
            if let Ok(mut stream) = result {
                stream.stop();
                debug!(stream_id = %stream.id(), generation, "Stopped stream from stale activation");
            }
            debug!(
                generation,
                current = self.generation,
                "Discarding stale camera resolution"
            );
            return CameraUpdate::Stale;
        }

        match result {
            Ok(stream) => {
                let id = stream.id();
                self.stream = Some(stream);
                self.status = CameraStatus::Ready(id);
                info!(stream_id = %id, "Camera ready");
                CameraUpdate::Ready(id)
            }
            Err(e) => {
                warn!("Camera unavailable: {}", e);
                self.status = CameraStatus::Unavailable(e.clone());
                CameraUpdate::Unavailable(e)
            }
        }
    }

    /// Stop the stream and mark any pending activation stale.
    ///
    /// Returns whether a live stream was released. Calling again is a no-op.
    pub fn deactivate(&mut self) -> bool {
        if self.status == CameraStatus::Requesting {
            self.generation += 1;
        }
        self.status = CameraStatus::Inactive;

        match self.stream.take() {
            Some(mut stream) => {
                stream.stop();
                info!(stream_id = %stream.id(), "Camera released");
                true
            }
            None => false,
        }
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        self.deactivate();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::camera::{SimulatedCamera, SimulatedOutcome};

    fn session_with(
        camera: &SimulatedCamera,
    ) -> (CameraSession, mpsc::UnboundedReceiver<CameraResolution>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let device: Arc<dyn CameraDevice> = Arc::new(camera.clone());
        (CameraSession::new(device, FacingMode::Environment, tx), rx)
    }

    #[tokio::test]
    async fn activate_then_resolve_ready() {
        let camera = SimulatedCamera::granted();
        let (mut session, mut rx) = session_with(&camera);

        assert_eq!(session.activate(), Activation::Requested);
        assert_eq!(*session.status(), CameraStatus::Requesting);

        let id = match session.resolve(rx.recv().await.unwrap()) {
            CameraUpdate::Ready(id) => id,
            other => panic!("expected ready, got {other:?}"),
        };
        assert_eq!(*session.status(), CameraStatus::Ready(id));
        assert_eq!(session.stream_id(), Some(id));
        assert_eq!(camera.live_streams(), 1);
    }

    #[tokio::test]
    async fn activate_is_noop_while_pending_or_active() {
        let camera = SimulatedCamera::granted();
        let (mut session, mut rx) = session_with(&camera);

        assert_eq!(session.activate(), Activation::Requested);
        assert_eq!(session.activate(), Activation::Pending);

        let CameraUpdate::Ready(id) = session.resolve(rx.recv().await.unwrap()) else {
            panic!("expected ready");
        };
        assert_eq!(session.activate(), Activation::AlreadyActive(id));

        tokio::task::yield_now().await;
        assert_eq!(camera.requests(), 1);
        assert_eq!(camera.live_streams(), 1);
    }

    #[tokio::test]
    async fn deactivate_is_idempotent() {
        let camera = SimulatedCamera::granted();
        let (mut session, mut rx) = session_with(&camera);
        session.activate();
        session.resolve(rx.recv().await.unwrap());

        assert!(session.deactivate());
        let after_once = session.status().clone();
        assert!(!session.deactivate());

        assert_eq!(*session.status(), after_once);
        assert_eq!(*session.status(), CameraStatus::Inactive);
        assert!(session.stream_id().is_none());
        assert_eq!(camera.live_streams(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn late_resolution_after_deactivate_is_stopped() {
        let camera = SimulatedCamera::new(SimulatedOutcome::Granted, Duration::from_millis(500));
        let (mut session, mut rx) = session_with(&camera);

        session.activate();
        session.deactivate();

        let late = rx.recv().await.unwrap();
        assert_eq!(session.resolve(late), CameraUpdate::Stale);
        assert_eq!(*session.status(), CameraStatus::Inactive);
        assert!(!session.is_active());
        assert_eq!(camera.live_streams(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn reactivation_ignores_the_earlier_request() {
        let camera = SimulatedCamera::new(SimulatedOutcome::Granted, Duration::from_millis(100));
        let (mut session, mut rx) = session_with(&camera);

        session.activate();
        session.deactivate();
        session.activate();

        let first = rx.recv().await.unwrap();
        assert_eq!(session.resolve(first), CameraUpdate::Stale);
        let second = rx.recv().await.unwrap();
        assert!(matches!(session.resolve(second), CameraUpdate::Ready(_)));
        assert_eq!(camera.live_streams(), 1);
    }

    #[tokio::test]
    async fn denial_degrades_to_unavailable() {
        let camera = SimulatedCamera::new(SimulatedOutcome::Denied, Duration::ZERO);
        let (mut session, mut rx) = session_with(&camera);

        session.activate();
        let update = session.resolve(rx.recv().await.unwrap());
        assert_eq!(update, CameraUpdate::Unavailable(CameraError::PermissionDenied));
        assert_eq!(
            *session.status(),
            CameraStatus::Unavailable(CameraError::PermissionDenied)
        );

        // Retry is allowed after a failure
        assert_eq!(session.activate(), Activation::Requested);
    }

    #[tokio::test]
    async fn drop_releases_stream() {
        let camera = SimulatedCamera::granted();
        let (mut session, mut rx) = session_with(&camera);
        session.activate();
        session.resolve(rx.recv().await.unwrap());
        assert_eq!(camera.live_streams(), 1);

        drop(session);
        assert_eq!(camera.live_streams(), 0);
    }
}
