//! SessionController — owns the session and orchestrates the components.
//!
//! All mutation happens through `&mut self`, one user action or completion
//! at a time. Device requests and scan timers run on background tasks and
//! report back over channels; `next_update()` applies those reports.
//!
//! Every way off the camera screen goes through `leave_camera()`, which
//! marks in-flight camera and scan work stale before releasing the stream.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::camera::{
    Activation, CameraDevice, CameraResolution, CameraSession, CameraStatus, CameraUpdate,
    FacingMode,
};
use crate::config::AppConfig;
use crate::error::{self, OnboardingError, StorageError};
use crate::onboarding::{OnboardingController, OnboardingFlow, StepOutcome};
use crate::profile::{Goal, UserProfile};
use crate::scan::{Classifier, ScanCompletion, ScanResult, ScanSimulator, ScanState};
use crate::store::PreferenceStore;

use super::model::{CameraView, ModalKind, ModalVisibility, Screen, Session, SessionUpdate};

/// Tunables for a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub onboarding: OnboardingFlow,
    pub scan_latency: Duration,
    pub facing: FacingMode,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            onboarding: OnboardingFlow::Guided,
            scan_latency: Duration::from_secs(3),
            facing: FacingMode::Environment,
        }
    }
}

impl From<&AppConfig> for SessionConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            onboarding: config.onboarding,
            scan_latency: config.scan_latency,
            facing: FacingMode::Environment,
        }
    }
}

/// External collaborators injected into the session.
pub struct SessionDeps {
    pub preferences: PreferenceStore,
    pub camera: Arc<dyn CameraDevice>,
    pub classifier: Arc<dyn Classifier>,
}

pub struct SessionController {
    session: Session,
    onboarding: OnboardingController,
    camera: CameraSession,
    scanner: ScanSimulator,
    preferences: PreferenceStore,
    camera_rx: mpsc::UnboundedReceiver<CameraResolution>,
    scan_rx: mpsc::UnboundedReceiver<ScanCompletion>,
}

impl SessionController {
    /// Start a session on the first onboarding step, seeded from saved preferences.
    pub async fn new(config: SessionConfig, deps: SessionDeps) -> Self {
        let profile = deps.preferences.load().await;
        let (camera_tx, camera_rx) = mpsc::unbounded_channel();
        let (scan_tx, scan_rx) = mpsc::unbounded_channel();

        let session = Session::new(profile);
        info!(
            session_id = %session.id,
            flow = ?config.onboarding,
            has_saved_filters = session.profile.has_filters(),
            "Session started"
        );

        Self {
            session,
            onboarding: OnboardingController::new(config.onboarding),
            camera: CameraSession::new(deps.camera, config.facing, camera_tx),
            scanner: ScanSimulator::new(deps.classifier, config.scan_latency, scan_tx),
            preferences: deps.preferences,
            camera_rx,
            scan_rx,
        }
    }

    // ── Read access ─────────────────────────────────────────────────

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn screen(&self) -> Screen {
        self.session.screen
    }

    pub fn profile(&self) -> &UserProfile {
        &self.session.profile
    }

    pub fn modals(&self) -> ModalVisibility {
        self.session.modals
    }

    pub fn onboarding(&self) -> &OnboardingController {
        &self.onboarding
    }

    pub fn camera_status(&self) -> &CameraStatus {
        self.camera.status()
    }

    pub fn scan_state(&self) -> &ScanState {
        self.scanner.state()
    }

    /// The visible scan result. Only the camera screen shows one.
    pub fn scan_result(&self) -> Option<&ScanResult> {
        if self.session.screen != Screen::Camera {
            return None;
        }
        self.scanner.result()
    }

    /// Presentation state of the camera screen, or `None` elsewhere.
    pub fn camera_view(&self) -> Option<CameraView> {
        if self.session.screen != Screen::Camera {
            return None;
        }
        let view = match (self.scanner.state(), self.camera.status()) {
            (ScanState::Scanning, _) => CameraView::Analyzing,
            (ScanState::Complete(_), _) => CameraView::Complete,
            (ScanState::Idle, CameraStatus::Unavailable(_)) => CameraView::Unavailable,
            (ScanState::Idle, CameraStatus::Ready(_)) => CameraView::PointAtMenu,
            (ScanState::Idle, CameraStatus::Requesting | CameraStatus::Inactive) => {
                CameraView::Starting
            }
        };
        Some(view)
    }

    // ── Onboarding ──────────────────────────────────────────────────

    /// The "Next" action on the current onboarding step.
    pub fn advance(&mut self) -> Result<StepOutcome, OnboardingError> {
        let outcome = self.onboarding.advance(&self.session.profile)?;
        self.apply_step(outcome);
        Ok(outcome)
    }

    pub fn select_goal(&mut self, goal: Goal) -> Result<StepOutcome, OnboardingError> {
        let outcome = self.onboarding.select_goal(&mut self.session.profile, goal)?;
        self.apply_step(outcome);
        Ok(outcome)
    }

    /// Select a goal by its catalog label.
    pub fn select_goal_named(&mut self, name: &str) -> Result<StepOutcome, OnboardingError> {
        let goal = name.parse::<Goal>()?;
        self.select_goal(goal)
    }

    /// Toggle a filter by its catalog label. Unknown labels are ignored.
    pub fn toggle_filter(&mut self, name: &str) -> bool {
        self.onboarding.toggle_filter(&mut self.session.profile, name)
    }

    pub fn submit_email(&mut self, value: &str) -> Result<StepOutcome, OnboardingError> {
        let outcome = self
            .onboarding
            .submit_email(&mut self.session.profile, value)?;
        self.apply_step(outcome);
        Ok(outcome)
    }

    /// Leave the camera and start the wizard again from step 1.
    pub fn restart_onboarding(&mut self) {
        self.onboarding.reset();
        self.transition_to(Screen::Onboarding(1));
    }

    fn apply_step(&mut self, outcome: StepOutcome) {
        match outcome {
            StepOutcome::Advanced(step) => self.transition_to(Screen::Onboarding(step)),
            StepOutcome::Completed => self.transition_to(Screen::Camera),
        }
    }

    // ── Screen transitions ──────────────────────────────────────────

    fn transition_to(&mut self, screen: Screen) {
        let from = self.session.screen;
        if from == screen {
            return;
        }
        if from == Screen::Camera {
            self.leave_camera();
        }
        self.session.screen = screen;
        info!(%from, to = %screen, "Screen changed");

        if screen == Screen::Camera {
            match self.camera.activate() {
                Activation::Requested => {}
                other => debug!(?other, "Camera activation skipped"),
            }
        }
    }

    /// Cancel any scan and drop its result, then release the camera. Both
    /// mark pending completions stale before anything is freed.
    fn leave_camera(&mut self) {
        self.scanner.reset();
        self.camera.deactivate();
    }

    // ── Scanning ────────────────────────────────────────────────────

    /// Start a scan with the current filters. Only possible on the camera screen.
    pub fn start_scan(&mut self) -> bool {
        if self.session.screen != Screen::Camera {
            warn!(screen = %self.session.screen, "Scan requested off the camera screen");
            return false;
        }
        self.scanner.start_scan(self.session.profile.active_filters())
    }

    pub fn cancel_scan(&mut self) -> bool {
        self.scanner.cancel_scan()
    }

    // ── Modals ──────────────────────────────────────────────────────

    pub fn open_modal(&mut self, kind: ModalKind) {
        if self.session.modals.set(kind, true) {
            debug!(%kind, "Modal opened");
        }
    }

    pub fn close_modal(&mut self, kind: ModalKind) {
        if self.session.modals.set(kind, false) {
            debug!(%kind, "Modal closed");
        }
    }

    /// Apply edited preferences, close settings, then persist.
    ///
    /// An invalid profile is rejected up front: the session keeps its current
    /// profile and the modal stays open. Once validated, the modal closes and
    /// the new profile takes effect even if saving fails.
    pub async fn save_and_close_settings(&mut self, profile: UserProfile) -> error::Result<()> {
        profile.validate()?;
        self.session.profile = profile;
        self.close_modal(ModalKind::Settings);
        self.save_preferences().await?;
        Ok(())
    }

    /// Persist the current profile.
    pub async fn save_preferences(&self) -> Result<(), StorageError> {
        self.preferences
            .save(&self.session.profile)
            .await
            .inspect_err(|e| warn!("Failed to save preferences: {}", e))
    }

    // ── Completions ─────────────────────────────────────────────────

    /// Wait for the next camera or scan completion and apply it.
    ///
    /// The camera and scanner hold the senders for as long as the controller
    /// lives, so the channels never close underneath this call.
    pub async fn next_update(&mut self) -> SessionUpdate {
        tokio::select! {
            Some(resolution) = self.camera_rx.recv() => self.apply_camera(resolution),
            Some(completion) = self.scan_rx.recv() => self.apply_scan(completion),
            else => std::future::pending().await,
        }
    }

    /// Apply every completion that has already arrived, without waiting.
    pub fn drain_updates(&mut self) -> Vec<SessionUpdate> {
        let mut updates = Vec::new();
        while let Ok(resolution) = self.camera_rx.try_recv() {
            updates.push(self.apply_camera(resolution));
        }
        while let Ok(completion) = self.scan_rx.try_recv() {
            updates.push(self.apply_scan(completion));
        }
        updates
    }

    fn apply_camera(&mut self, resolution: CameraResolution) -> SessionUpdate {
        match self.camera.resolve(resolution) {
            CameraUpdate::Ready(id) => SessionUpdate::CameraReady(id),
            CameraUpdate::Unavailable(e) => SessionUpdate::CameraUnavailable(e),
            CameraUpdate::Stale => SessionUpdate::Discarded,
        }
    }

    fn apply_scan(&mut self, completion: ScanCompletion) -> SessionUpdate {
        match self.scanner.complete(completion) {
            Some(result) => SessionUpdate::ScanComplete(result.clone()),
            None => SessionUpdate::Discarded,
        }
    }

    /// Release every device resource. The session stays readable.
    pub fn shutdown(&mut self) {
        self.leave_camera();
        self.release_queued_grants();
        info!(session_id = %self.session.id, "Session shut down");
    }

    /// Apply camera answers that arrived but were never picked up. After
    /// `leave_camera()` they are all stale, so any granted stream is stopped.
    fn release_queued_grants(&mut self) {
        while let Ok(resolution) = self.camera_rx.try_recv() {
            self.apply_camera(resolution);
        }
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.leave_camera();
        // Requests still in flight see a closed channel and stop their own stream
        self.camera_rx.close();
        self.release_queued_grants();
    }
}
