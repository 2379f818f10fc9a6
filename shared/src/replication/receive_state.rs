use std::collections::{HashMap, HashSet};

use log::debug;

use statecast_serde::Archive;

use crate::{
    field::{
        field_table::FieldTable,
        reference_collector::{FieldCollector, ObjectLookup},
    },
    replication::{
        error::ReplicationError, field_mask::FieldMask, pending_references::PendingReferences,
    },
    types::{FieldIndex, LocalKey, NetId},
};

/// Receiving side bookkeeping of one replicated object
#[derive(Debug, Default)]
pub struct ReceiveState {
    known: u32,
    pending: PendingReferences,
    references: HashMap<FieldIndex, HashSet<NetId>>,
}

impl ReceiveState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The field has been received at least once
    pub fn is_known(&self, field: FieldIndex) -> bool {
        field < 32 && self.known & (1 << field) != 0
    }

    pub fn pending(&self) -> &PendingReferences {
        &self.pending
    }

    /// Some field currently points at `net_id`, resolved or not
    pub fn references(&self, net_id: NetId) -> bool {
        self.references.values().any(|ids| ids.contains(&net_id))
    }

    /// Decodes one replication message and applies it to `object`
    ///
    /// Every field is decoded before any is applied, so a malformed message
    /// leaves `object` untouched. Notify handlers of changed fields then run
    /// in declaration order. Returns the fields that changed.
    pub fn read_delta<O>(
        &mut self,
        table: &FieldTable<O>,
        object: &mut O,
        archive: &mut dyn Archive,
        objects: &dyn ObjectLookup,
    ) -> Result<FieldMask, ReplicationError> {
        // table length is bounded by MAX_REPLICATED_FIELDS
        let mask = FieldMask::de(archive, table.len() as u8)?;

        let mut staged = Vec::new();
        for field_id in mask.iter() {
            let field = &table.fields()[usize::from(field_id)];
            let mut collector = FieldCollector::new(objects);
            let value = field.binding().read(archive, &mut collector)?;
            staged.push((field_id, value, collector.into_parts()));
        }

        let mut changed = FieldMask::new(mask.len());
        for (field_id, value, (referenced, deferred)) in staged {
            if value.apply(object, self.is_known(field_id)) {
                changed.set(field_id);
            }
            self.known |= 1 << field_id;
            self.pending.replace_field(field_id, deferred);
            if referenced.is_empty() {
                self.references.remove(&field_id);
            } else {
                self.references
                    .insert(field_id, referenced.into_iter().collect());
            }
        }

        for field_id in changed.iter() {
            if let Some(notify) = table.fields()[usize::from(field_id)].notify() {
                notify(object);
            }
        }

        debug!(
            "Applied {} fields of '{}', {} changed",
            mask.count(),
            table.class_name(),
            changed.count()
        );
        Ok(changed)
    }

    /// Patches every slot waiting on `net_id`, notifying each patched field
    /// once. Returns whether anything was patched.
    pub fn resolve_reference<O>(
        &mut self,
        table: &FieldTable<O>,
        object: &mut O,
        net_id: NetId,
        key: LocalKey,
    ) -> bool {
        let mut resolved = false;
        for (field_id, paths) in self.pending.take(net_id) {
            let Some(field) = table.field(field_id) else {
                continue;
            };
            let mut patched = false;
            for path in paths {
                patched |= field
                    .binding()
                    .resolve_reference(object, &path, net_id, key);
            }
            if patched {
                resolved = true;
                if let Some(notify) = field.notify() {
                    notify(object);
                }
            }
        }
        resolved
    }
}
