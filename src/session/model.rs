//! Session aggregate — screen, overlay flags and the user's profile.

use serde::Serialize;
use uuid::Uuid;

use crate::error::CameraError;
use crate::profile::UserProfile;
use crate::scan::ScanResult;

/// The single current screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "screen", content = "step")]
pub enum Screen {
    /// 1-based onboarding step.
    Onboarding(usize),
    Camera,
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Onboarding(step) => write!(f, "onboarding({step})"),
            Self::Camera => write!(f, "camera"),
        }
    }
}

/// Overlay dialogs, independent of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalKind {
    Settings,
    TravelMode,
}

impl std::fmt::Display for ModalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Settings => write!(f, "settings"),
            Self::TravelMode => write!(f, "travel_mode"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ModalVisibility {
    pub settings: bool,
    pub travel_mode: bool,
}

impl ModalVisibility {
    pub fn is_open(&self, kind: ModalKind) -> bool {
        match kind {
            ModalKind::Settings => self.settings,
            ModalKind::TravelMode => self.travel_mode,
        }
    }

    /// Set a flag. Returns whether it changed.
    pub fn set(&mut self, kind: ModalKind, open: bool) -> bool {
        let flag = match kind {
            ModalKind::Settings => &mut self.settings,
            ModalKind::TravelMode => &mut self.travel_mode,
        };
        let changed = *flag != open;
        *flag = open;
        changed
    }
}

/// Everything the UI renders from, owned by `SessionController`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub screen: Screen,
    pub modals: ModalVisibility,
    pub profile: UserProfile,
}

impl Session {
    pub fn new(profile: UserProfile) -> Self {
        Self {
            id: Uuid::new_v4(),
            screen: Screen::Onboarding(1),
            modals: ModalVisibility::default(),
            profile,
        }
    }
}

/// An asynchronous completion, after the session applied it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    CameraReady(Uuid),
    CameraUnavailable(CameraError),
    ScanComplete(ScanResult),
    /// A completion arrived for an operation that is no longer relevant.
    Discarded,
}

/// What the camera screen should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraView {
    Unavailable,
    Starting,
    PointAtMenu,
    Analyzing,
    Complete,
}

impl CameraView {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Unavailable => "Camera unavailable",
            Self::Starting => "Starting camera...",
            Self::PointAtMenu => "Point camera at menu",
            Self::Analyzing => "Analyzing menu...",
            Self::Complete => "Analysis Complete!",
        }
    }
}
