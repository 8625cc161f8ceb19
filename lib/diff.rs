//! Structural diff between two documents.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::document::{ConfigDocument, ConfigValue};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// One difference at a dotted path.
///
/// Serializes as `{"old": .., "new": ..}`, `{"added": ..}` or `{"removed": ..}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DiffEntry {
    Changed { old: ConfigValue, new: ConfigValue },
    Added { added: ConfigValue },
    Removed { removed: ConfigValue },
}

/// Differences keyed by dotted path (`mcpServers.context7.command`).
pub type ConfigDiff = BTreeMap<String, DiffEntry>;

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Compare two documents.
///
/// Paths present on one side only produce a single `added`/`removed` entry,
/// even when the value is a whole sub-mapping. Paths on both sides recurse
/// when both values are mappings and otherwise produce `{old, new}` when the
/// values differ. Equal paths are omitted.
pub fn diff_documents(old: &ConfigDocument, new: &ConfigDocument) -> ConfigDiff {
    let mut diff = ConfigDiff::new();
    diff_mappings(old.as_map(), new.as_map(), "", &mut diff);
    diff
}

fn diff_mappings(
    old: &BTreeMap<String, ConfigValue>,
    new: &BTreeMap<String, ConfigValue>,
    prefix: &str,
    diff: &mut ConfigDiff,
) {
    let keys: BTreeSet<&String> = old.keys().chain(new.keys()).collect();

    for key in keys {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match (old.get(key), new.get(key)) {
            (None, Some(added)) => {
                diff.insert(path, DiffEntry::Added { added: added.clone() });
            }
            (Some(removed), None) => {
                diff.insert(path, DiffEntry::Removed { removed: removed.clone() });
            }
            (Some(ConfigValue::Mapping(a)), Some(ConfigValue::Mapping(b))) => {
                diff_mappings(a, b, &path, diff);
            }
            (Some(a), Some(b)) if a != b => {
                diff.insert(
                    path,
                    DiffEntry::Changed {
                        old: a.clone(),
                        new: b.clone(),
                    },
                );
            }
            _ => {}
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
