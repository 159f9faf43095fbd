//! Menu classification.
//!
//! `MockClassifier` stands in for real menu recognition: it classifies a
//! fixed sample menu against the active filters. It makes no claim to
//! nutritional accuracy, only to being deterministic for a given filter set.

use std::collections::BTreeSet;

use crate::profile::{ActiveFilters, Allergen, DietaryRestriction};

use super::model::Classification;

/// Decides which menu items are safe for a set of filters.
pub trait Classifier: Send + Sync {
    fn classify(&self, filters: &ActiveFilters) -> Classification;
}

/// A dish on the sample menu.
#[derive(Debug, Clone, Copy)]
pub struct MenuItem {
    pub name: &'static str,
    pub contains: &'static [Allergen],
    pub unsuitable_for: &'static [DietaryRestriction],
}

impl MenuItem {
    fn conflicts_with(&self, filters: &ActiveFilters) -> bool {
        self.contains.iter().any(|a| filters.allergens.contains(a))
            || self
                .unsuitable_for
                .iter()
                .any(|d| filters.dietary_restrictions.contains(d))
    }
}

/// The dishes the simulated camera "sees".
pub const SAMPLE_MENU: &[MenuItem] = &[
    MenuItem {
        name: "Grilled Chicken Salad (no dressing)",
        contains: &[],
        unsuitable_for: &[DietaryRestriction::Vegetarian, DietaryRestriction::Vegan],
    },
    MenuItem {
        name: "Steamed Vegetables",
        contains: &[],
        unsuitable_for: &[],
    },
    MenuItem {
        name: "Fresh Fruit Plate",
        contains: &[],
        unsuitable_for: &[DietaryRestriction::Keto],
    },
    MenuItem {
        name: "Herb-Crusted Salmon",
        contains: &[Allergen::Fish, Allergen::Gluten],
        unsuitable_for: &[
            DietaryRestriction::Vegetarian,
            DietaryRestriction::Vegan,
            DietaryRestriction::GlutenFree,
        ],
    },
    MenuItem {
        name: "Caesar Salad (contains dairy)",
        contains: &[Allergen::Dairy, Allergen::Eggs, Allergen::Fish, Allergen::Gluten],
        unsuitable_for: &[
            DietaryRestriction::Vegetarian,
            DietaryRestriction::Vegan,
            DietaryRestriction::DairyFree,
            DietaryRestriction::GlutenFree,
        ],
    },
    MenuItem {
        name: "Cream of Mushroom Soup",
        contains: &[Allergen::Dairy, Allergen::Gluten],
        unsuitable_for: &[
            DietaryRestriction::Vegan,
            DietaryRestriction::DairyFree,
            DietaryRestriction::GlutenFree,
        ],
    },
    MenuItem {
        name: "Chocolate Mousse",
        contains: &[Allergen::Dairy, Allergen::Eggs, Allergen::TreeNuts],
        unsuitable_for: &[
            DietaryRestriction::Vegan,
            DietaryRestriction::DairyFree,
            DietaryRestriction::Keto,
        ],
    },
];

/// Classifies a fixed menu by tag matching.
pub struct MockClassifier {
    menu: Vec<MenuItem>,
}

impl MockClassifier {
    pub fn new(menu: Vec<MenuItem>) -> Self {
        Self { menu }
    }
}

impl Default for MockClassifier {
    fn default() -> Self {
        Self::new(SAMPLE_MENU.to_vec())
    }
}

impl Classifier for MockClassifier {
    fn classify(&self, filters: &ActiveFilters) -> Classification {
        let mut out = Classification::default();
        let mut on_menu = BTreeSet::new();

        for item in &self.menu {
            on_menu.extend(item.contains.iter().copied());
            if item.conflicts_with(filters) {
                out.risky_items.push(item.name.to_string());
            } else {
                out.safe_items.push(item.name.to_string());
            }
        }

        out.allergens_detected = on_menu.intersection(&filters.allergens).copied().collect();
        out
    }
}
