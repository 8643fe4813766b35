//! Configuration snapshot and desired-state models.
//!
//! # Design
//! - `SettingRow` is the fixed shape of one introspection row.
//! - `ConfigurationSnapshot` is keyed by name; iteration order carries no meaning.
//! - `DesiredConfiguration` applies in name order so runs are reproducible.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{DataError, Result};

/// One row returned by the introspection procedure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingRow {
    /// Setting name.
    pub name: String,
    /// Current value; `None` when the instance reports it unset.
    pub value: Option<i64>,
    /// Human-readable description.
    pub description: String,
}

/// A single named setting as observed on the instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    /// Setting name, unique within a snapshot.
    pub name: String,
    /// Current value; `None` when unset.
    pub value: Option<i64>,
    /// Description, present only for snapshots read with descriptions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Point-in-time view of every setting the instance supports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigurationSnapshot {
    settings: HashMap<String, Setting>,
}

impl ConfigurationSnapshot {
    /// Build a snapshot from introspection rows, rejecting the whole set when
    /// any row is malformed.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::MalformedRow`] for an empty or duplicate name.
    pub fn from_rows(rows: Vec<SettingRow>, include_descriptions: bool) -> Result<Self> {
        let mut settings = HashMap::with_capacity(rows.len());
        for (index, row) in rows.into_iter().enumerate() {
            if row.name.is_empty() {
                return Err(DataError::MalformedRow {
                    row: index,
                    reason: "setting name is empty",
                    value: None,
                });
            }
            let description = include_descriptions.then_some(row.description);
            match settings.entry(row.name) {
                Entry::Occupied(existing) => {
                    return Err(DataError::MalformedRow {
                        row: index,
                        reason: "setting name is duplicated",
                        value: Some(existing.key().clone()),
                    });
                }
                Entry::Vacant(slot) => {
                    let name = slot.key().clone();
                    slot.insert(Setting {
                        name,
                        value: row.value,
                        description,
                    });
                }
            }
        }
        Ok(Self { settings })
    }

    /// Look up a setting by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Setting> {
        self.settings.get(name)
    }

    /// Whether the instance supports a setting with this name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.settings.contains_key(name)
    }

    /// Number of settings in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.settings.len()
    }

    /// Whether the snapshot holds no settings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// Iterate settings in no particular order.
    pub fn settings(&self) -> impl Iterator<Item = &Setting> {
        self.settings.values()
    }

    /// Settings ordered by name, for rendering.
    #[must_use]
    pub fn sorted(&self) -> Vec<&Setting> {
        let mut sorted: Vec<&Setting> = self.settings.values().collect();
        sorted.sort_by(|left, right| left.name.cmp(&right.name));
        sorted
    }

    /// Drop every description.
    #[must_use]
    pub fn without_descriptions(mut self) -> Self {
        for setting in self.settings.values_mut() {
            setting.description = None;
        }
        self
    }

    /// Consume the snapshot, returning its settings ordered by name.
    #[must_use]
    pub fn into_sorted(self) -> Vec<Setting> {
        let mut settings: Vec<Setting> = self.settings.into_values().collect();
        settings.sort_by(|left, right| left.name.cmp(&right.name));
        settings
    }
}

/// Caller-declared settings to apply; never empty, names unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DesiredConfiguration {
    entries: BTreeMap<String, i64>,
}

impl DesiredConfiguration {
    /// Build a desired configuration from `(name, value)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::InvalidDesired`] when no entries are given, a name
    /// is empty, or a name appears twice.
    pub fn new<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        let mut collected = BTreeMap::new();
        for (name, value) in entries {
            let name = name.into();
            if name.is_empty() {
                return Err(DataError::InvalidDesired {
                    reason: "setting name must not be empty",
                    name: None,
                });
            }
            if collected.contains_key(&name) {
                return Err(DataError::InvalidDesired {
                    reason: "setting declared more than once",
                    name: Some(name),
                });
            }
            collected.insert(name, value);
        }

        if collected.is_empty() {
            return Err(DataError::InvalidDesired {
                reason: "at least one setting is required",
                name: None,
            });
        }

        Ok(Self { entries: collected })
    }

    /// Number of declared settings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; construction rejects empty sets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Declared value for a name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<i64> {
        self.entries.get(name).copied()
    }

    /// Declared names in application order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// `(name, value)` pairs in application order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), *value))
    }
}
