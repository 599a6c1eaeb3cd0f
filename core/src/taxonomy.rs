//! Role taxonomy: canonical role ids and the surface forms that name them.
//!
//! Keys are stored normalized (see [`normalize_role`]); synonyms are stored
//! lowercased. Lookups normalize their argument, so `"Forklift Drivers"`
//! and `"forklift_driver"` resolve to the same entry.

use crate::types::RoleName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Normalize a role key: lowercase, trim, drop one plural `s`,
/// collapse whitespace runs into `_`.
///
/// A trailing `ss` is not treated as a plural, which keeps the
/// function idempotent (`"glass"` stays `"glass"`).
pub fn normalize_role(role: &str) -> RoleName {
    let mut role = role.trim().to_lowercase();
    if role.ends_with('s') && !role.ends_with("ss") {
        role.pop();
    }
    role.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Split a composite `operation_role` key on its first underscore and
/// return the role suffix. Keys without an underscore have no suffix.
pub fn role_suffix(role_key: &str) -> Option<&str> {
    role_key
        .split_once('_')
        .map(|(_, suffix)| suffix)
        .filter(|suffix| !suffix.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Vec<String>>", into = "BTreeMap<String, Vec<String>>")]
pub struct RoleTaxonomy {
    entries: BTreeMap<RoleName, Vec<String>>,
}

impl RoleTaxonomy {
    pub fn new(raw: BTreeMap<String, Vec<String>>) -> Self {
        let mut entries: BTreeMap<RoleName, Vec<String>> = BTreeMap::new();
        for (role, synonyms) in raw {
            let slot = entries.entry(normalize_role(&role)).or_default();
            for synonym in synonyms {
                let synonym = synonym.trim().to_lowercase();
                if !synonym.is_empty() && !slot.contains(&synonym) {
                    slot.push(synonym);
                }
            }
        }
        Self { entries }
    }

    /// Synonyms for `role`, empty when the role is unknown.
    pub fn synonyms(&self, role: &str) -> &[String] {
        self.entries
            .get(&normalize_role(role))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, role: &str) -> bool {
        self.entries.contains_key(&normalize_role(role))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<BTreeMap<String, Vec<String>>> for RoleTaxonomy {
    fn from(raw: BTreeMap<String, Vec<String>>) -> Self {
        Self::new(raw)
    }
}

impl From<RoleTaxonomy> for BTreeMap<String, Vec<String>> {
    fn from(taxonomy: RoleTaxonomy) -> Self {
        taxonomy.entries
    }
}

impl Default for RoleTaxonomy {
    /// The warehouse synonym table shipped with the planner.
    fn default() -> Self {
        let table: &[(&str, &[&str])] = &[
            ("forklift_driver", &[
                "forklift", "forklift driver", "forklift operator", "lift driver",
                "level 1 forklift driver", "level 2 forklift driver", "level 3 forklift driver",
            ]),
            ("picker/packers", &[
                "picker", "packer", "picker/packer", "order picker", "warehouse picker",
                "general labor", "quality control",
            ]),
            ("bendi_driver", &["bendi", "bendi driver", "bendi operator", "reach truck"]),
            ("consolidation", &["consolidation", "consolidator", "inventory", "inventory control"]),
            ("lumper", &["lumper"]),
            ("receiver", &["receiver", "receiving", "inbound worker", "dock worker"]),
            ("general labor", &[
                "general labor", "general worker", "warehouse worker", "laborer", "picker", "packer",
            ]),
        ];
        Self::new(
            table
                .iter()
                .map(|(role, synonyms)| {
                    (role.to_string(), synonyms.iter().map(|s| s.to_string()).collect())
                })
                .collect(),
        )
    }
}
