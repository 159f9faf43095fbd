//! Configuration types.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::camera::SimulatedOutcome;
use crate::error::ConfigError;
use crate::onboarding::OnboardingFlow;

/// Default namespace key for the serialized preference object.
pub const DEFAULT_STORAGE_KEY: &str = "menulens-preferences";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path of the libSQL database file holding the key-value store.
    pub db_path: PathBuf,
    /// Key under which the `UserProfile` is stored.
    pub storage_key: String,
    /// Simulated latency of a menu scan.
    pub scan_latency: Duration,
    /// Which onboarding wizard to run.
    pub onboarding: OnboardingFlow,
    /// Behaviour of the simulated camera device.
    pub camera: SimulatedOutcome,
    /// Simulated permission-prompt latency.
    pub camera_latency: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("./data/menulens.db"),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            scan_latency: Duration::from_secs(3),
            onboarding: OnboardingFlow::Guided,
            camera: SimulatedOutcome::Granted,
            camera_latency: Duration::from_millis(250),
        }
    }
}

impl AppConfig {
    /// Build config from environment variables, falling back to defaults.
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let db_path = std::env::var("MENULENS_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let storage_key = std::env::var("MENULENS_STORAGE_KEY")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.storage_key);

        let scan_latency = env_parsed::<u64>("MENULENS_SCAN_LATENCY_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.scan_latency);

        let onboarding =
            env_parsed::<OnboardingFlow>("MENULENS_ONBOARDING").unwrap_or(defaults.onboarding);

        let camera = env_parsed::<SimulatedOutcome>("MENULENS_CAMERA").unwrap_or(defaults.camera);

        let camera_latency = env_parsed::<u64>("MENULENS_CAMERA_LATENCY_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.camera_latency);

        Self {
            db_path,
            storage_key,
            scan_latency,
            onboarding,
            camera,
            camera_latency,
        }
    }
}

/// Read and parse an environment variable. Missing → `None`; invalid → warn + `None`.
fn env_parsed<T>(key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = std::env::var(key).ok()?;
    match parse_value::<T>(key, &raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("{}", e);
            None
        }
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("{raw:?}: {e}"),
    })
}
