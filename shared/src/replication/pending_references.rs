use std::collections::{BTreeMap, HashMap, HashSet};

use crate::types::{FieldIndex, NetId};

/// Reference slots of one object still waiting for their target
///
/// Keyed by top-level field, then by the awaited net id; each path locates
/// one slot inside the field's value.
#[derive(Debug, Default)]
pub struct PendingReferences {
    fields: BTreeMap<FieldIndex, HashMap<NetId, HashSet<Vec<FieldIndex>>>>,
}

impl PendingReferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// A freshly received value supersedes whatever its field was waiting on
    pub fn replace_field(&mut self, field: FieldIndex, deferred: Vec<(NetId, Vec<FieldIndex>)>) {
        self.fields.remove(&field);
        if deferred.is_empty() {
            return;
        }
        let waiting = self.fields.entry(field).or_default();
        for (net_id, path) in deferred {
            waiting.entry(net_id).or_default().insert(path);
        }
    }

    /// Removes and returns every slot waiting on `net_id`, by ascending field
    pub fn take(&mut self, net_id: NetId) -> Vec<(FieldIndex, HashSet<Vec<FieldIndex>>)> {
        let mut output = Vec::new();
        for (field, waiting) in self.fields.iter_mut() {
            if let Some(paths) = waiting.remove(&net_id) {
                output.push((*field, paths));
            }
        }
        self.fields.retain(|_, waiting| !waiting.is_empty());
        output
    }

    pub fn is_waiting_on(&self, net_id: NetId) -> bool {
        self.fields
            .values()
            .any(|waiting| waiting.contains_key(&net_id))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of slots waiting
    pub fn len(&self) -> usize {
        self.fields
            .values()
            .flat_map(|waiting| waiting.values())
            .map(HashSet::len)
            .sum()
    }
}
