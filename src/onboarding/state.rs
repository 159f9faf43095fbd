//! Which step of which wizard the user is on.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::OnboardingError;

/// One screen of an onboarding wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Pick a `Goal`; choosing one advances.
    Goal,
    /// Toggle dietary and allergen filters, then Next.
    Filters,
    /// Enter an email; a valid submission advances.
    Email,
    Welcome,
    ScanAnyMenu,
    InstantResults,
}

impl StepKind {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Goal => "What brings you to MenuLens?",
            Self::Filters => "Select your dietary filters",
            Self::Email => "Where should we send your results?",
            Self::Welcome => "Welcome to MenuLens",
            Self::ScanAnyMenu => "Scan Any Menu",
            Self::InstantResults => "Get Instant Results",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Goal => "Choose the goal that matters most when you eat out",
            Self::Filters => "We'll flag dishes that conflict with anything you select",
            Self::Email => "Enter your email to save your profile",
            Self::Welcome => "Your personal dietary assistant for safer dining out",
            Self::ScanAnyMenu => "Use your camera to scan restaurant menus instantly",
            Self::InstantResults => {
                "Receive detailed analysis of allergens and dietary restrictions"
            }
        }
    }
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Goal => "goal",
            Self::Filters => "filters",
            Self::Email => "email",
            Self::Welcome => "welcome",
            Self::ScanAnyMenu => "scan_any_menu",
            Self::InstantResults => "instant_results",
        };
        write!(f, "{s}")
    }
}

/// Which wizard to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingFlow {
    /// Goal → filters → email.
    #[default]
    Guided,
    /// Three informational slides.
    Intro,
}

const GUIDED_STEPS: &[StepKind] = &[StepKind::Goal, StepKind::Filters, StepKind::Email];
const INTRO_STEPS: &[StepKind] = &[
    StepKind::Welcome,
    StepKind::ScanAnyMenu,
    StepKind::InstantResults,
];

impl OnboardingFlow {
    pub fn steps(&self) -> &'static [StepKind] {
        match self {
            Self::Guided => GUIDED_STEPS,
            Self::Intro => INTRO_STEPS,
        }
    }
}

impl FromStr for OnboardingFlow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "guided" => Ok(Self::Guided),
            "intro" => Ok(Self::Intro),
            other => Err(format!("unknown onboarding flow: {other}")),
        }
    }
}

/// Result of moving forward one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Now on this 1-based step.
    Advanced(usize),
    /// The final step was passed; the wizard is done.
    Completed,
}

/// Position within a wizard of `total` steps.
///
/// `step` is 1-based and never exceeds `total`; leaving the last step sets
/// `complete` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingState {
    pub step: usize,
    pub total: usize,
    pub complete: bool,
}

impl OnboardingState {
    pub fn new(total: usize) -> Self {
        Self {
            step: 1,
            total: total.max(1),
            complete: false,
        }
    }

    pub fn is_last_step(&self) -> bool {
        self.step == self.total
    }

    /// Move forward. Errors if the wizard is already complete.
    pub fn advance(&mut self) -> Result<StepOutcome, OnboardingError> {
        if self.complete {
            return Err(OnboardingError::AlreadyComplete);
        }
        if self.is_last_step() {
            self.complete = true;
            return Ok(StepOutcome::Completed);
        }
        self.step += 1;
        Ok(StepOutcome::Advanced(self.step))
    }

    pub fn reset(&mut self) {
        self.step = 1;
        self.complete = false;
    }
}
