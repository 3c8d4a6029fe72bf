//! License lookup
//!
//! Maps a license identifier (e.g. `CC-BY-4.0`) to the display title and
//! canonical URL that get baked into the deployed app's environment.

pub mod builtin;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::UnknownLicense;

/// Display metadata for a license
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    pub id: String,
    pub title: String,
    pub url: String,
}

/// Registry contract used by the parameter builder
pub trait LicenseRegistry: Send + Sync {
    fn resolve(&self, id: &str) -> Result<License, UnknownLicense>;
}

/// Title/URL pair as written in the `[licenses]` config table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseEntry {
    pub title: String,
    pub url: String,
}

/// In-memory license table: built-in entries plus configured extras.
///
/// Identifiers are matched case-insensitively. Extras shadow built-ins.
#[derive(Debug, Clone)]
pub struct LicenseTable {
    entries: BTreeMap<String, License>,
}

impl LicenseTable {
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn builtin() -> Self {
        let mut table = Self::empty();
        for (id, title, url) in builtin::LICENSES {
            table.insert(License {
                id: (*id).to_string(),
                title: (*title).to_string(),
                url: (*url).to_string(),
            });
        }
        table
    }

    /// Built-in table extended with entries from configuration
    pub fn with_extras(extras: &BTreeMap<String, LicenseEntry>) -> Self {
        let mut table = Self::builtin();
        for (id, entry) in extras {
            table.insert(License {
                id: id.clone(),
                title: entry.title.clone(),
                url: entry.url.clone(),
            });
        }
        table
    }

    pub fn insert(&mut self, license: License) {
        self.entries.insert(normalize(&license.id), license);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &License> {
        self.entries.values()
    }
}

impl Default for LicenseTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LicenseRegistry for LicenseTable {
    fn resolve(&self, id: &str) -> Result<License, UnknownLicense> {
        self.entries
            .get(&normalize(id))
            .cloned()
            .ok_or_else(|| UnknownLicense::new(id))
    }
}

fn normalize(id: &str) -> String {
    id.trim().to_ascii_lowercase()
}
