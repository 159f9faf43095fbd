//! Core of MenuLens: onboarding, preferences, camera lifecycle and mock menu scanning.

pub mod camera;
pub mod config;
pub mod error;
pub mod onboarding;
pub mod profile;
pub mod scan;
pub mod session;
pub mod store;
