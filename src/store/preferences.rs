//! PreferenceStore — persists the `UserProfile` under a single namespace key.

use std::sync::Arc;

use crate::error::StorageError;
use crate::profile::UserProfile;
use crate::store::traits::KeyValueStore;

/// Load/save of the user's preferences.
///
/// `load()` never fails: a missing, unreadable or corrupt value yields an
/// empty profile. `save()` surfaces every failure to the caller.
#[derive(Clone)]
pub struct PreferenceStore {
    kv: Arc<dyn KeyValueStore>,
    key: String,
}

impl PreferenceStore {
    pub fn new(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Serialize and store `profile`, overwriting any prior value.
    pub async fn save(&self, profile: &UserProfile) -> Result<(), StorageError> {
        profile
            .validate()
            .map_err(|e| StorageError::Serialization(format!("refusing to save profile: {e}")))?;
        let json = serde_json::to_string(profile)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.kv.set(&self.key, &json).await?;
        tracing::info!(key = %self.key, "Preferences saved");
        Ok(())
    }

    /// Load the saved profile, or an empty one if nothing usable is stored.
    pub async fn load(&self) -> UserProfile {
        match self.try_load().await {
            Ok(Some(profile)) => profile,
            Ok(None) => UserProfile::default(),
            Err(e) => {
                tracing::warn!(key = %self.key, "Failed to load preferences: {}", e);
                UserProfile::default()
            }
        }
    }

    /// Load the saved profile, distinguishing "nothing stored" from storage failure.
    ///
    /// A value that fails to parse or validate counts as absent.
    pub async fn try_load(&self) -> Result<Option<UserProfile>, StorageError> {
        let Some(raw) = self.kv.get(&self.key).await? else {
            tracing::debug!(key = %self.key, "No saved preferences");
            return Ok(None);
        };

        let profile = match serde_json::from_str::<UserProfile>(&raw) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(key = %self.key, "Discarding corrupt preferences: {}", e);
                return Ok(None);
            }
        };

        if let Err(e) = profile.validate() {
            tracing::warn!(key = %self.key, "Discarding invalid preferences: {}", e);
            return Ok(None);
        }

        Ok(Some(profile))
    }

    /// Remove any saved preferences.
    pub async fn clear(&self) -> Result<bool, StorageError> {
        self.kv.delete(&self.key).await
    }
}
