//! User profile collected during onboarding and edited from settings.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::catalog::{Allergen, DietaryRestriction, Filter, Goal};
use crate::error::ValidationError;

/// Preferences that drive scan classification.
///
/// Stored as JSON under the configured storage key. Sets are ordered so the
/// serialized form is stable across save/load cycles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub goal: Option<Goal>,
    #[serde(default)]
    pub dietary_restrictions: BTreeSet<DietaryRestriction>,
    #[serde(default)]
    pub allergens: BTreeSet<Allergen>,
    #[serde(default)]
    pub email: Option<String>,
}

impl UserProfile {
    /// Flip membership of `filter` in its catalog's set. Returns the new membership.
    pub fn toggle(&mut self, filter: Filter) -> bool {
        match filter {
            Filter::Diet(d) => toggle_in(&mut self.dietary_restrictions, d),
            Filter::Allergen(a) => toggle_in(&mut self.allergens, a),
        }
    }

    pub fn is_active(&self, filter: Filter) -> bool {
        match filter {
            Filter::Diet(d) => self.dietary_restrictions.contains(&d),
            Filter::Allergen(a) => self.allergens.contains(&a),
        }
    }

    /// Snapshot of the filters a scan should honour.
    pub fn active_filters(&self) -> ActiveFilters {
        ActiveFilters {
            dietary_restrictions: self.dietary_restrictions.clone(),
            allergens: self.allergens.clone(),
        }
    }

    pub fn has_filters(&self) -> bool {
        !self.dietary_restrictions.is_empty() || !self.allergens.is_empty()
    }

    /// Check invariants a stored profile must satisfy.
    ///
    /// Catalog membership is enforced by the types; only the email needs checking.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.email.as_deref() {
            Some(email) if !is_valid_email(email) => Err(ValidationError::InvalidEmail),
            _ => Ok(()),
        }
    }
}

fn toggle_in<T: Ord>(set: &mut BTreeSet<T>, value: T) -> bool {
    if set.remove(&value) {
        false
    } else {
        set.insert(value);
        true
    }
}

/// Minimal email rule: the address must contain `@`.
pub fn is_valid_email(value: &str) -> bool {
    value.contains('@')
}

/// The filter selection handed to a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveFilters {
    pub dietary_restrictions: BTreeSet<DietaryRestriction>,
    pub allergens: BTreeSet<Allergen>,
}

impl ActiveFilters {
    pub fn with_allergen(mut self, allergen: Allergen) -> Self {
        self.allergens.insert(allergen);
        self
    }

    pub fn with_diet(mut self, diet: DietaryRestriction) -> Self {
        self.dietary_restrictions.insert(diet);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.dietary_restrictions.is_empty() && self.allergens.is_empty()
    }
}
