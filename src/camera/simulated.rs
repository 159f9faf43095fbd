//! Simulated camera device — stands in for platform media capture.
//!
//! Keeps counters of access requests and live streams so callers can check
//! that every acquired stream is eventually stopped.

use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use super::device::{CameraDevice, CameraStream, FacingMode};
use crate::error::CameraError;

/// How the simulated permission prompt resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulatedOutcome {
    Granted,
    Denied,
    Absent,
    Fault(String),
}

impl FromStr for SimulatedOutcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "granted" => Ok(Self::Granted),
            "denied" => Ok(Self::Denied),
            "absent" | "not-found" => Ok(Self::Absent),
            "fault" => Ok(Self::Fault("simulated device fault".to_string())),
            other => Err(format!("unknown camera outcome: {other}")),
        }
    }
}

/// Camera device that resolves after a fixed delay with a configured outcome.
#[derive(Clone)]
pub struct SimulatedCamera {
    outcome: SimulatedOutcome,
    latency: Duration,
    requests: Arc<AtomicUsize>,
    live: Arc<AtomicUsize>,
}

impl SimulatedCamera {
    pub fn new(outcome: SimulatedOutcome, latency: Duration) -> Self {
        Self {
            outcome,
            latency,
            requests: Arc::new(AtomicUsize::new(0)),
            live: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Grant access immediately.
    pub fn granted() -> Self {
        Self::new(SimulatedOutcome::Granted, Duration::ZERO)
    }

    /// Number of `request_access` calls so far.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Number of streams handed out and not yet stopped.
    pub fn live_streams(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CameraDevice for SimulatedCamera {
    async fn request_access(
        &self,
        facing: FacingMode,
    ) -> Result<Box<dyn CameraStream>, CameraError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        match &self.outcome {
            SimulatedOutcome::Granted => {
                self.live.fetch_add(1, Ordering::SeqCst);
                let stream = SimulatedStream {
                    id: Uuid::new_v4(),
                    live: Arc::clone(&self.live),
                    stopped: false,
                };
                tracing::debug!(stream_id = %stream.id, ?facing, "Simulated stream opened");
                Ok(Box::new(stream))
            }
            SimulatedOutcome::Denied => Err(CameraError::PermissionDenied),
            SimulatedOutcome::Absent => Err(CameraError::NotFound),
            SimulatedOutcome::Fault(reason) => Err(CameraError::Unknown(reason.clone())),
        }
    }
}

struct SimulatedStream {
    id: Uuid,
    live: Arc<AtomicUsize>,
    stopped: bool,
}

impl CameraStream for SimulatedStream {
    fn id(&self) -> Uuid {
        self.id
    }

    fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            self.live.fetch_sub(1, Ordering::SeqCst);
        }
    }

    fn is_live(&self) -> bool {
        !self.stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn granted_stream_counts_until_stopped() {
        let camera = SimulatedCamera::granted();
        let mut stream = camera.request_access(FacingMode::Environment).await.unwrap();
        assert_eq!(camera.requests(), 1);
        assert_eq!(camera.live_streams(), 1);
        assert!(stream.is_live());

        stream.stop();
        stream.stop();
        assert_eq!(camera.live_streams(), 0);
        assert!(!stream.is_live());
    }

    #[tokio::test]
    async fn failures_map_to_camera_errors() {
        let denied = SimulatedCamera::new(SimulatedOutcome::Denied, Duration::ZERO);
        assert_eq!(
            denied.request_access(FacingMode::Environment).await.err(),
            Some(CameraError::PermissionDenied)
        );

        let absent = SimulatedCamera::new(SimulatedOutcome::Absent, Duration::ZERO);
        assert_eq!(
            absent.request_access(FacingMode::User).await.err(),
            Some(CameraError::NotFound)
        );
        assert_eq!(absent.live_streams(), 0);
    }

    #[test]
    fn outcome_from_str() {
        assert_eq!("GRANTED".parse::<SimulatedOutcome>().unwrap(), SimulatedOutcome::Granted);
        assert_eq!("not-found".parse::<SimulatedOutcome>().unwrap(), SimulatedOutcome::Absent);
        assert!("maybe".parse::<SimulatedOutcome>().is_err());
    }
}
