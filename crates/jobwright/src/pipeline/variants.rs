use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Named skill profile representing one target job family.
///
/// `excluded_skills` is carried for reporting only; neither the classifier
/// nor the scorer penalizes a posting for containing them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleVariant {
    pub role_family: String,
    #[serde(default)]
    pub allowed_skills: BTreeSet<String>,
    #[serde(default)]
    pub primary_focus: BTreeSet<String>,
    #[serde(default)]
    pub excluded_skills: BTreeSet<String>,
}

/// The loaded set of role variants, keyed by `role_family`.
///
/// Backed by a `BTreeMap` so iteration order is sorted by family name;
/// classification tie-breaks depend on that order being stable.
#[derive(Debug, Default, Clone)]
pub struct RoleVariantSet {
    variants: BTreeMap<String, RoleVariant>,
}

impl RoleVariantSet {
    /// Load every `<role_family>.json` file in the directory. Loaded once
    /// per run; the set is immutable afterwards.
    pub fn load_dir(dir: &Path) -> Result<Self, VariantError> {
        let mut set = Self::default();

        let entries = fs::read_dir(dir).map_err(|source| VariantError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        for entry in entries {
            let entry = entry.map_err(|source| VariantError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }

            let raw = fs::read_to_string(&path).map_err(|source| VariantError::Io {
                path: path.clone(),
                source,
            })?;
            let variant: RoleVariant =
                serde_json::from_str(&raw).map_err(|source| VariantError::Malformed {
                    path: path.clone(),
                    source,
                })?;
            set.insert(variant);
        }

        Ok(set)
    }

    pub fn insert(&mut self, variant: RoleVariant) {
        self.variants.insert(variant.role_family.clone(), variant);
    }

    pub fn get(&self, role_family: &str) -> Option<&RoleVariant> {
        self.variants.get(role_family)
    }

    /// Variants in sorted `role_family` order.
    pub fn iter(&self) -> impl Iterator<Item = &RoleVariant> {
        self.variants.values()
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

impl FromIterator<RoleVariant> for RoleVariantSet {
    fn from_iter<I: IntoIterator<Item = RoleVariant>>(iter: I) -> Self {
        let mut set = Self::default();
        for variant in iter {
            set.insert(variant);
        }
        set
    }
}

/// Failure to assemble the role variant set. These are configuration
/// errors: a corrupt variant file aborts the load rather than degrading.
#[derive(Debug, thiserror::Error)]
pub enum VariantError {
    #[error("failed to read role variants from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed role variant file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
