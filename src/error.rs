//! Error types for MenuLens.
//!
//! None of these are fatal to a session: validation errors keep the user on
//! the current step, camera errors degrade the camera screen, and storage
//! errors fall back to an unsaved-preferences state.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Camera error: {0}")]
    Camera(#[from] CameraError),

    #[error("Onboarding error: {0}")]
    Onboarding(#[from] OnboardingError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// User input rejected before a step may advance.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Unknown goal: {0}")]
    UnknownGoal(String),

    #[error("Unknown filter: {0}")]
    UnknownFilter(String),

    #[error("Please choose a goal to continue")]
    GoalRequired,
}

/// Onboarding wizard errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OnboardingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Cannot {action} on onboarding step {step}")]
    WrongStep { action: &'static str, step: usize },

    #[error("Onboarding is already complete")]
    AlreadyComplete,
}

/// Camera device errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CameraError {
    #[error("Camera permission denied")]
    PermissionDenied,

    #[error("No camera device found")]
    NotFound,

    #[error("Camera failed: {0}")]
    Unknown(String),
}

/// Preference storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for MenuLens.
pub type Result<T> = std::result::Result<T, Error>;
