//! OnboardingController — validates input and steps through the wizard.
//!
//! The controller owns only its position; the profile it edits is passed in
//! by the session that owns it.

use crate::error::{OnboardingError, ValidationError};
use crate::profile::{Filter, Goal, UserProfile, is_valid_email};

use super::state::{OnboardingFlow, OnboardingState, StepKind, StepOutcome};

pub struct OnboardingController {
    flow: OnboardingFlow,
    state: OnboardingState,
}

impl OnboardingController {
    pub fn new(flow: OnboardingFlow) -> Self {
        Self {
            flow,
            state: OnboardingState::new(flow.steps().len()),
        }
    }

    pub fn flow(&self) -> OnboardingFlow {
        self.flow
    }

    /// Current 1-based step.
    pub fn step(&self) -> usize {
        self.state.step
    }

    pub fn total_steps(&self) -> usize {
        self.state.total
    }

    pub fn current(&self) -> StepKind {
        self.flow.steps()[self.state.step - 1]
    }

    pub fn is_complete(&self) -> bool {
        self.state.complete
    }

    /// Label of the primary button on the current step.
    pub fn primary_label(&self) -> &'static str {
        if self.state.is_last_step() {
            "Get Started"
        } else {
            "Next"
        }
    }

    /// Record the goal and move to the next step.
    pub fn select_goal(
        &mut self,
        profile: &mut UserProfile,
        goal: Goal,
    ) -> Result<StepOutcome, OnboardingError> {
        self.expect_step(StepKind::Goal, "select a goal")?;
        profile.goal = Some(goal);
        tracing::debug!(%goal, "Goal selected");
        self.step_forward()
    }

    /// Flip a catalog filter by its label. Unknown labels are ignored.
    ///
    /// Returns whether anything changed.
    pub fn toggle_filter(&self, profile: &mut UserProfile, name: &str) -> bool {
        match Filter::parse(name) {
            Some(filter) => {
                let on = profile.toggle(filter);
                tracing::debug!(%filter, on, "Filter toggled");
                true
            }
            None => {
                tracing::debug!(name, "Ignoring toggle of unknown filter");
                false
            }
        }
    }

    /// Validate and store the email, then advance. Invalid input leaves the
    /// step unchanged.
    pub fn submit_email(
        &mut self,
        profile: &mut UserProfile,
        value: &str,
    ) -> Result<StepOutcome, OnboardingError> {
        self.expect_step(StepKind::Email, "submit an email")?;
        let value = value.trim();
        if !is_valid_email(value) {
            return Err(ValidationError::InvalidEmail.into());
        }
        profile.email = Some(value.to_string());
        self.step_forward()
    }

    /// The "Next" action.
    ///
    /// Input steps only pass if the profile already holds what they collect,
    /// e.g. a goal or email restored from saved preferences.
    pub fn advance(&mut self, profile: &UserProfile) -> Result<StepOutcome, OnboardingError> {
        if self.state.complete {
            return Err(OnboardingError::AlreadyComplete);
        }
        match self.current() {
            StepKind::Goal if profile.goal.is_none() => {
                return Err(ValidationError::GoalRequired.into());
            }
            StepKind::Email if !profile.email.as_deref().is_some_and(is_valid_email) => {
                return Err(ValidationError::InvalidEmail.into());
            }
            _ => {}
        }
        self.step_forward()
    }

    /// Back to the first step.
    pub fn reset(&mut self) {
        self.state.reset();
    }

    fn step_forward(&mut self) -> Result<StepOutcome, OnboardingError> {
        let outcome = self.state.advance()?;
        match outcome {
            StepOutcome::Advanced(step) => {
                tracing::info!(step, kind = %self.current(), "Onboarding advanced")
            }
            StepOutcome::Completed => tracing::info!(flow = ?self.flow, "Onboarding complete"),
        }
        Ok(outcome)
    }

    fn expect_step(&self, kind: StepKind, action: &'static str) -> Result<(), OnboardingError> {
        if self.state.complete {
            return Err(OnboardingError::AlreadyComplete);
        }
        if self.current() != kind {
            return Err(OnboardingError::WrongStep {
                action,
                step: self.state.step,
            });
        }
        Ok(())
    }
}
