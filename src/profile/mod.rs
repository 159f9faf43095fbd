//! User preferences: goal, dietary filters and contact email.

pub mod catalog;
pub mod model;

pub use catalog::{Allergen, DietaryRestriction, Filter, Goal};
pub use model::{ActiveFilters, UserProfile, is_valid_email};
