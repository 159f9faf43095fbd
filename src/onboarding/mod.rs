//! Onboarding wizard — the ordered setup screens shown before first use.
//!
//! The guided flow collects a goal, dietary filters and an email; the intro
//! flow is three informational slides. Either ends by handing the session
//! over to the camera screen.

pub mod controller;
pub mod state;

pub use controller::OnboardingController;
pub use state::{OnboardingFlow, OnboardingState, StepKind, StepOutcome};
