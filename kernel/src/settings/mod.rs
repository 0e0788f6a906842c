// Policy Settings
//
// The annotation rule set a policy instance is configured with.
// Parsed fresh from the host-provided bytes on every call and never
// mutated afterwards.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize};

/// Required key/value pairs and forbidden keys.
///
/// Both collections are ordered so that every listing derived from them
/// is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default, deserialize_with = "null_as_default")]
    pub required_annotations: BTreeMap<String, String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub forbidden_annotations: BTreeSet<String>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error(
        "the following annotations are forbidden and required at the same time: {}",
        join_keys(.0)
    )]
    Conflict(BTreeSet<String>),
}

impl Settings {
    /// Parse settings from raw JSON.
    ///
    /// `null` is accepted and yields an empty rule set.
    pub fn from_slice(raw: &[u8]) -> Result<Self, serde_json::Error> {
        let settings: Option<Settings> = serde_json::from_slice(raw)?;
        Ok(settings.unwrap_or_default())
    }

    /// Parse settings from an already decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        let settings: Option<Settings> = serde_json::from_value(value)?;
        Ok(settings.unwrap_or_default())
    }

    /// Keys that are both required and forbidden.
    pub fn conflicts(&self) -> BTreeSet<String> {
        self.required_annotations
            .keys()
            .filter(|key| self.forbidden_annotations.contains(*key))
            .cloned()
            .collect()
    }

    /// Check the rule set for internal consistency.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let conflicts = self.conflicts();
        if conflicts.is_empty() {
            Ok(())
        } else {
            Err(SettingsError::Conflict(conflicts))
        }
    }
}

/// Render a key listing for user-facing messages.
pub fn join_keys<'a, I>(keys: I) -> String
where
    I: IntoIterator<Item = &'a String>,
{
    keys.into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
