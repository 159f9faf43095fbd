//! Fixed catalogs offered by the onboarding and settings screens.
//!
//! Every catalog serializes to its display name, so the stored preference
//! object reads the same as the UI labels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// What the user primarily wants out of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Goal {
    #[serde(rename = "Severe Allergy Safety")]
    SevereAllergySafety,
    #[serde(rename = "Lifestyle Diet")]
    LifestyleDiet,
    #[serde(rename = "Fitness/Macros")]
    FitnessMacros,
}

impl Goal {
    pub const ALL: [Goal; 3] = [
        Goal::SevereAllergySafety,
        Goal::LifestyleDiet,
        Goal::FitnessMacros,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::SevereAllergySafety => "Severe Allergy Safety",
            Self::LifestyleDiet => "Lifestyle Diet",
            Self::FitnessMacros => "Fitness/Macros",
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Goal {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Goal::ALL
            .into_iter()
            .find(|g| g.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ValidationError::UnknownGoal(s.to_string()))
    }
}

/// Lifestyle or religious dietary restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DietaryRestriction {
    Vegetarian,
    Vegan,
    #[serde(rename = "Gluten-Free")]
    GlutenFree,
    #[serde(rename = "Dairy-Free")]
    DairyFree,
    Keto,
    Halal,
    Kosher,
}

impl DietaryRestriction {
    pub const ALL: [DietaryRestriction; 7] = [
        DietaryRestriction::Vegetarian,
        DietaryRestriction::Vegan,
        DietaryRestriction::GlutenFree,
        DietaryRestriction::DairyFree,
        DietaryRestriction::Keto,
        DietaryRestriction::Halal,
        DietaryRestriction::Kosher,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Vegetarian => "Vegetarian",
            Self::Vegan => "Vegan",
            Self::GlutenFree => "Gluten-Free",
            Self::DairyFree => "Dairy-Free",
            Self::Keto => "Keto",
            Self::Halal => "Halal",
            Self::Kosher => "Kosher",
        }
    }
}

impl fmt::Display for DietaryRestriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DietaryRestriction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        DietaryRestriction::ALL
            .into_iter()
            .find(|d| d.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ValidationError::UnknownFilter(s.to_string()))
    }
}

/// Allergen the user must avoid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Allergen {
    Peanuts,
    #[serde(rename = "Tree Nuts")]
    TreeNuts,
    Dairy,
    Eggs,
    Fish,
    Shellfish,
    Soy,
    Gluten,
    Sesame,
}

impl Allergen {
    pub const ALL: [Allergen; 9] = [
        Allergen::Peanuts,
        Allergen::TreeNuts,
        Allergen::Dairy,
        Allergen::Eggs,
        Allergen::Fish,
        Allergen::Shellfish,
        Allergen::Soy,
        Allergen::Gluten,
        Allergen::Sesame,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Peanuts => "Peanuts",
            Self::TreeNuts => "Tree Nuts",
            Self::Dairy => "Dairy",
            Self::Eggs => "Eggs",
            Self::Fish => "Fish",
            Self::Shellfish => "Shellfish",
            Self::Soy => "Soy",
            Self::Gluten => "Gluten",
            Self::Sesame => "Sesame",
        }
    }
}

impl fmt::Display for Allergen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Allergen {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        // "Milk" is what food labels say; the catalog calls it Dairy.
        if needle.eq_ignore_ascii_case("milk") {
            return Ok(Allergen::Dairy);
        }
        Allergen::ALL
            .into_iter()
            .find(|a| a.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ValidationError::UnknownFilter(s.to_string()))
    }
}

/// A member of either filter catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Filter {
    Diet(DietaryRestriction),
    Allergen(Allergen),
}

impl Filter {
    /// Resolve a UI label to the catalog that contains it.
    ///
    /// Allergens are checked first; the two catalogs share no labels.
    pub fn parse(name: &str) -> Option<Filter> {
        if let Ok(allergen) = name.parse::<Allergen>() {
            return Some(Filter::Allergen(allergen));
        }
        name.parse::<DietaryRestriction>().ok().map(Filter::Diet)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Diet(d) => d.fmt(f),
            Self::Allergen(a) => a.fmt(f),
        }
    }
}
