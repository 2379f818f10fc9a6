use log::debug;

use statecast_serde::{Archive, SerdeErr};

use crate::{
    field::{field_binding::FieldSnapshot, field_table::FieldTable},
    replication::{connection_context::ConnectionContext, field_mask::FieldMask},
};

/// What one connection has been sent of one object
///
/// Created on the first replication of the object to the connection, and
/// dropped with either of them.
pub struct ReplicationState<O> {
    snapshots: Vec<Box<dyn FieldSnapshot<O>>>,
    last_sent_at: Vec<Option<f64>>,
    initial_sent: bool,
}

impl<O> ReplicationState<O> {
    pub fn new(table: &FieldTable<O>) -> Self {
        Self {
            snapshots: table
                .fields()
                .iter()
                .map(|field| field.binding().snapshot())
                .collect(),
            last_sent_at: vec![None; table.len()],
            initial_sent: false,
        }
    }

    /// The next pass carries the initial state
    pub fn is_initial(&self, context: &ConnectionContext) -> bool {
        !self.initial_sent || context.is_initial_send
    }

    /// Fields the next pass would send, without recording anything
    pub fn dirty_mask(
        &self,
        table: &FieldTable<O>,
        object: &O,
        context: &ConnectionContext,
    ) -> FieldMask {
        let initial = self.is_initial(context);
        // table length is bounded by MAX_REPLICATED_FIELDS
        let mut mask = FieldMask::new(table.len() as u8);

        for (index, field) in table.fields().iter().enumerate() {
            let condition = field.condition();
            if !condition.allows(context.is_owner, initial) {
                continue;
            }

            let rate = f64::from(field.update_rate());
            if rate > 0.0 {
                if let Some(last_sent) = self.last_sent_at[index] {
                    if context.now - last_sent < rate {
                        continue;
                    }
                }
            }

            let forced = initial && condition.includes_initial();
            if !forced && self.snapshots[index].matches(object) {
                continue;
            }

            mask.set(field.field_id());
        }

        mask
    }

    /// Writes the mask and payload of every field that must go out
    ///
    /// Nothing is written for a clear mask. History is only recorded once
    /// the whole payload has been written.
    pub fn write_delta(
        &mut self,
        table: &FieldTable<O>,
        object: &O,
        context: &ConnectionContext,
        archive: &mut dyn Archive,
    ) -> Result<FieldMask, SerdeErr> {
        let mask = self.dirty_mask(table, object, context);
        if mask.is_clear() {
            self.initial_sent = true;
            return Ok(mask);
        }

        mask.ser(archive)?;
        for field_id in mask.iter() {
            table.fields()[usize::from(field_id)]
                .binding()
                .write(object, archive)?;
        }

        for field_id in mask.iter() {
            let index = usize::from(field_id);
            self.snapshots[index].record(object);
            self.last_sent_at[index] = Some(context.now);
        }
        self.initial_sent = true;

        debug!(
            "Wrote {} of {} fields of '{}'",
            mask.count(),
            table.len(),
            table.class_name()
        );
        Ok(mask)
    }
}
