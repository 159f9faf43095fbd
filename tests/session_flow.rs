//! End-to-end session tests.
//!
//! Each test builds a `SessionController` over an in-memory (or failing)
//! store and a simulated camera, then drives it the way the UI would. Time
//! is paused, so the three-second scan latency elapses instantly.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;

use menulens::camera::{CameraStatus, SimulatedCamera, SimulatedOutcome};
use menulens::error::{CameraError, Error, OnboardingError, StorageError, ValidationError};
use menulens::onboarding::{OnboardingFlow, StepOutcome};
use menulens::profile::{Allergen, Filter, Goal, UserProfile};
use menulens::scan::{MockClassifier, ScanState};
use menulens::session::{
    CameraView, ModalKind, Screen, SessionConfig, SessionController, SessionDeps, SessionUpdate,
};
use menulens::store::{KeyValueStore, LibSqlStore, MemoryStore, PreferenceStore};

const KEY: &str = "menulens-preferences";
const SCAN_LATENCY: Duration = Duration::from_secs(3);

/// Longest a test waits for a completion it expects.
const TEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Store that is always offline.
struct OfflineStore;

#[async_trait]
impl KeyValueStore for OfflineStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("offline".into()))
    }
    async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("offline".into()))
    }
    async fn delete(&self, _key: &str) -> Result<bool, StorageError> {
        Err(StorageError::Unavailable("offline".into()))
    }
}

async fn build(
    kv: Arc<dyn KeyValueStore>,
    camera: &SimulatedCamera,
    flow: OnboardingFlow,
) -> SessionController {
    let deps = SessionDeps {
        preferences: PreferenceStore::new(kv, KEY),
        camera: Arc::new(camera.clone()),
        classifier: Arc::new(MockClassifier::default()),
    };
    let config = SessionConfig {
        onboarding: flow,
        scan_latency: SCAN_LATENCY,
        ..SessionConfig::default()
    };
    SessionController::new(config, deps).await
}

async fn fresh(camera: &SimulatedCamera) -> SessionController {
    build(Arc::new(MemoryStore::new()), camera, OnboardingFlow::Guided).await
}

/// Walk the guided wizard and wait for the camera to come up.
async fn onboard(session: &mut SessionController) {
    session.select_goal(Goal::SevereAllergySafety).unwrap();
    session.advance().unwrap();
    session.submit_email("user@example.com").unwrap();
    next(session).await;
}

async fn next(session: &mut SessionController) -> SessionUpdate {
    timeout(TEST_TIMEOUT, session.next_update())
        .await
        .expect("timed out waiting for a session update")
}

#[tokio::test(start_paused = true)]
async fn guided_onboarding_reaches_camera() {
    let camera = SimulatedCamera::granted();
    let mut session = fresh(&camera).await;

    assert_eq!(session.screen(), Screen::Onboarding(1));
    assert_eq!(session.profile(), &UserProfile::default());

    let outcome = session.select_goal_named("Severe Allergy Safety").unwrap();
    assert_eq!(outcome, StepOutcome::Advanced(2));
    assert_eq!(session.screen(), Screen::Onboarding(2));

    assert!(session.toggle_filter("Peanuts"));
    assert!(session.toggle_filter("Peanuts"));
    assert!(session.profile().allergens.is_empty());
    assert!(session.profile().dietary_restrictions.is_empty());

    session.advance().unwrap();
    assert_eq!(session.screen(), Screen::Onboarding(3));

    let outcome = session.submit_email("user@example.com").unwrap();
    assert_eq!(outcome, StepOutcome::Completed);
    assert_eq!(session.screen(), Screen::Camera);
    assert_eq!(*session.camera_status(), CameraStatus::Requesting);

    assert!(matches!(next(&mut session).await, SessionUpdate::CameraReady(_)));
    assert_eq!(camera.requests(), 1);
    assert_eq!(camera.live_streams(), 1);
    assert_eq!(session.camera_view(), Some(CameraView::PointAtMenu));
}

#[tokio::test(start_paused = true)]
async fn email_without_at_sign_is_rejected() {
    let camera = SimulatedCamera::granted();
    let mut session = fresh(&camera).await;
    session.select_goal(Goal::LifestyleDiet).unwrap();
    session.advance().unwrap();

    for bad in ["user.example.com", "", "user at example dot com"] {
        let err = session.submit_email(bad).unwrap_err();
        assert_eq!(err, OnboardingError::Validation(ValidationError::InvalidEmail));
        assert_eq!(err.to_string(), "Please enter a valid email address");
        assert_eq!(session.screen(), Screen::Onboarding(3));
    }
    assert_eq!(camera.requests(), 0);

    session.submit_email("a@b").unwrap();
    assert_eq!(session.screen(), Screen::Camera);
}

#[tokio::test(start_paused = true)]
async fn dairy_scan_flags_dairy_item() {
    let camera = SimulatedCamera::granted();
    let mut session = fresh(&camera).await;
    onboard(&mut session).await;
    session.toggle_filter("Dairy");

    let started = tokio::time::Instant::now();
    assert!(session.start_scan());
    assert!(!session.start_scan(), "second start while scanning is a no-op");

    let SessionUpdate::ScanComplete(result) = next(&mut session).await else {
        panic!("expected a scan result");
    };
    assert!(started.elapsed() >= SCAN_LATENCY);
    assert!(result
        .risky_items
        .contains(&"Caesar Salad (contains dairy)".to_string()));
    assert!(result.allergens_detected.contains(&Allergen::Dairy));
    assert_eq!(session.scan_result(), Some(&result));
    assert_eq!(session.camera_view(), Some(CameraView::Complete));
}

#[tokio::test(start_paused = true)]
async fn same_filters_give_same_classification() {
    let camera = SimulatedCamera::granted();
    let mut session = fresh(&camera).await;
    onboard(&mut session).await;
    session.toggle_filter("Vegan");
    session.toggle_filter("Tree Nuts");

    session.start_scan();
    let SessionUpdate::ScanComplete(first) = next(&mut session).await else {
        panic!("expected a scan result");
    };
    session.start_scan();
    let SessionUpdate::ScanComplete(second) = next(&mut session).await else {
        panic!("expected a scan result");
    };

    assert_ne!(first.id, second.id);
    assert_eq!(first.safe_items, second.safe_items);
    assert_eq!(first.risky_items, second.risky_items);
    assert_eq!(first.allergens_detected, second.allergens_detected);
    assert_eq!(first.allergens_detected, BTreeSet::from([Allergen::TreeNuts]));
}

#[tokio::test(start_paused = true)]
async fn leaving_camera_mid_scan_shows_no_result() {
    let camera = SimulatedCamera::granted();
    let mut session = fresh(&camera).await;
    onboard(&mut session).await;

    session.start_scan();
    tokio::time::sleep(Duration::from_secs(1)).await;
    session.restart_onboarding();

    assert_eq!(session.screen(), Screen::Onboarding(1));
    assert_eq!(*session.scan_state(), ScanState::Idle);
    assert_eq!(camera.live_streams(), 0);

    // Past the latency nothing may surface, even after coming back
    tokio::time::sleep(SCAN_LATENCY * 2).await;
    for update in session.drain_updates() {
        assert!(!matches!(update, SessionUpdate::ScanComplete(_)));
    }
    assert!(session.scan_result().is_none());

    onboard(&mut session).await;
    assert_eq!(session.screen(), Screen::Camera);
    assert!(session.scan_result().is_none());
    assert_eq!(camera.live_streams(), 1);
}

#[tokio::test(start_paused = true)]
async fn late_camera_grant_after_leaving_is_discarded() {
    let camera = SimulatedCamera::new(SimulatedOutcome::Granted, Duration::from_secs(2));
    let mut session = fresh(&camera).await;
    session.select_goal(Goal::FitnessMacros).unwrap();
    session.advance().unwrap();
    session.submit_email("user@example.com").unwrap();

    // Leave before the permission prompt resolves
    session.restart_onboarding();

    assert_eq!(next(&mut session).await, SessionUpdate::Discarded);
    assert_eq!(*session.camera_status(), CameraStatus::Inactive);
    assert_eq!(camera.live_streams(), 0, "no ghost stream");
}

#[tokio::test(start_paused = true)]
async fn shutdown_with_pending_grant_releases_stream() {
    let camera = SimulatedCamera::new(SimulatedOutcome::Granted, Duration::from_millis(100));
    let mut session = fresh(&camera).await;
    session.select_goal(Goal::SevereAllergySafety).unwrap();
    session.advance().unwrap();
    session.submit_email("user@example.com").unwrap();

    // The grant is delivered but never applied before teardown
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(camera.live_streams(), 1);

    session.shutdown();
    assert_eq!(camera.live_streams(), 0, "after shutdown");
    assert_eq!(*session.camera_status(), CameraStatus::Inactive);

    drop(session);
    assert_eq!(camera.live_streams(), 0, "after drop");
}

#[tokio::test(start_paused = true)]
async fn denied_camera_leaves_session_usable() {
    let camera = SimulatedCamera::new(SimulatedOutcome::Denied, Duration::ZERO);
    let mut session = fresh(&camera).await;
    session.select_goal(Goal::SevereAllergySafety).unwrap();
    session.advance().unwrap();
    session.submit_email("user@example.com").unwrap();

    assert_eq!(
        next(&mut session).await,
        SessionUpdate::CameraUnavailable(CameraError::PermissionDenied)
    );
    assert_eq!(session.camera_view(), Some(CameraView::Unavailable));

    // Modals and navigation still work
    session.open_modal(ModalKind::Settings);
    assert!(session.modals().settings);
    session.close_modal(ModalKind::Settings);
    session.restart_onboarding();
    assert_eq!(session.screen(), Screen::Onboarding(1));
}

#[tokio::test]
async fn saved_preferences_seed_the_next_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("menulens.db");
    let kv: Arc<dyn KeyValueStore> = Arc::new(LibSqlStore::new_local(&path).await.unwrap());
    let camera = SimulatedCamera::granted();

    let mut first = build(Arc::clone(&kv), &camera, OnboardingFlow::Guided).await;
    onboard(&mut first).await;
    first.open_modal(ModalKind::Settings);
    let mut edited = first.profile().clone();
    edited.toggle(Filter::Allergen(Allergen::Shellfish));
    first.save_and_close_settings(edited.clone()).await.unwrap();
    first.shutdown();
    assert_eq!(camera.live_streams(), 0);

    drop(first);
    drop(kv);

    let reopened: Arc<dyn KeyValueStore> = Arc::new(LibSqlStore::new_local(&path).await.unwrap());
    let second = build(reopened, &camera, OnboardingFlow::Guided).await;
    assert_eq!(second.profile(), &edited);
    assert_eq!(second.screen(), Screen::Onboarding(1));
}

#[tokio::test(start_paused = true)]
async fn save_failure_does_not_block_navigation() {
    let camera = SimulatedCamera::granted();
    let mut session = build(Arc::new(OfflineStore), &camera, OnboardingFlow::Guided).await;
    assert_eq!(session.profile(), &UserProfile::default());

    onboard(&mut session).await;
    session.open_modal(ModalKind::Settings);
    let mut edited = session.profile().clone();
    edited.toggle(Filter::Allergen(Allergen::Soy));

    let err = session.save_and_close_settings(edited.clone()).await.unwrap_err();
    assert!(matches!(err, Error::Storage(StorageError::Unavailable(_))));
    assert!(!session.modals().settings);
    assert_eq!(session.profile(), &edited);

    session.restart_onboarding();
    assert_eq!(session.screen(), Screen::Onboarding(1));
}

#[tokio::test(start_paused = true)]
async fn intro_flow_finishes_on_get_started() {
    let camera = SimulatedCamera::granted();
    let mut session = build(Arc::new(MemoryStore::new()), &camera, OnboardingFlow::Intro).await;

    assert_eq!(session.onboarding().primary_label(), "Next");
    session.advance().unwrap();
    session.advance().unwrap();
    assert_eq!(session.screen(), Screen::Onboarding(3));
    assert_eq!(session.onboarding().primary_label(), "Get Started");

    session.advance().unwrap();
    assert_eq!(session.screen(), Screen::Camera);
    assert!(matches!(next(&mut session).await, SessionUpdate::CameraReady(_)));
    assert_eq!(session.advance(), Err(OnboardingError::AlreadyComplete));
}
