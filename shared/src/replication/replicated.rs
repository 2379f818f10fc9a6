use std::{any::Any, collections::HashMap, sync::Arc};

use statecast_serde::{Archive, SerdeErr};

use crate::{
    class::class_id::ClassId,
    field::{field_table::FieldTable, reference_collector::ObjectLookup},
    replication::{
        connection_context::ConnectionContext, error::ReplicationError, field_mask::FieldMask,
        receive_state::ReceiveState, replicate::Replicate, replication_state::ReplicationState,
    },
    types::{ConnectionId, LocalKey, NetId},
};

/// Object-safe view of a `Replicated<O>`, for storing mixed classes together
pub trait Replica: Any + Send {
    fn class_id(&self) -> ClassId;

    fn class_name(&self) -> &'static str;

    fn net_id(&self) -> NetId;

    fn replicates(&self) -> bool;

    fn set_replicates(&mut self, replicates: bool);

    /// A snapshot exists for `connection`
    fn has_connection(&self, connection: ConnectionId) -> bool;

    /// Drops the snapshot kept for `connection`, returns whether one existed
    fn remove_connection(&mut self, connection: ConnectionId) -> bool;

    /// Fields the next update to `connection` would carry
    fn dirty_mask(&self, connection: ConnectionId, context: &ConnectionContext) -> FieldMask;

    fn write_update(
        &mut self,
        connection: ConnectionId,
        context: &ConnectionContext,
        archive: &mut dyn Archive,
    ) -> Result<FieldMask, SerdeErr>;

    fn read_update(
        &mut self,
        archive: &mut dyn Archive,
        objects: &dyn ObjectLookup,
    ) -> Result<FieldMask, ReplicationError>;

    fn resolve_reference(&mut self, net_id: NetId, key: LocalKey) -> bool;

    /// Some reference slot is still waiting for `net_id`
    fn waits_on(&self, net_id: NetId) -> bool;

    /// Some field points at `net_id`
    fn references(&self, net_id: NetId) -> bool;

    /// Number of declared fields
    fn field_count(&self) -> usize;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl dyn Replica {
    pub fn downcast_ref<O: Replicate>(&self) -> Option<&Replicated<O>> {
        self.as_any().downcast_ref()
    }

    pub fn downcast_mut<O: Replicate>(&mut self) -> Option<&mut Replicated<O>> {
        self.as_any_mut().downcast_mut()
    }
}

/// A live object of class `O` with its replication bookkeeping
pub struct Replicated<O: Replicate> {
    object: O,
    class_id: ClassId,
    net_id: NetId,
    replicates: bool,
    table: Arc<FieldTable<O>>,
    connections: HashMap<ConnectionId, ReplicationState<O>>,
    receive: ReceiveState,
}

impl<O: Replicate> Replicated<O> {
    pub fn new(object: O, class_id: ClassId, net_id: NetId, table: Arc<FieldTable<O>>) -> Self {
        Self {
            object,
            class_id,
            net_id,
            replicates: true,
            table,
            connections: HashMap::new(),
            receive: ReceiveState::new(),
        }
    }

    pub fn object(&self) -> &O {
        &self.object
    }

    pub fn object_mut(&mut self) -> &mut O {
        &mut self.object
    }

    pub fn into_object(self) -> O {
        self.object
    }

    pub fn table(&self) -> &FieldTable<O> {
        &self.table
    }

    pub fn receive_state(&self) -> &ReceiveState {
        &self.receive
    }
}

impl<O: Replicate> Replica for Replicated<O> {
    fn class_id(&self) -> ClassId {
        self.class_id
    }

    fn class_name(&self) -> &'static str {
        O::CLASS_NAME
    }

    fn net_id(&self) -> NetId {
        self.net_id
    }

    fn replicates(&self) -> bool {
        self.replicates
    }

    fn set_replicates(&mut self, replicates: bool) {
        self.replicates = replicates;
    }

    fn has_connection(&self, connection: ConnectionId) -> bool {
        self.connections.contains_key(&connection)
    }

    fn remove_connection(&mut self, connection: ConnectionId) -> bool {
        self.connections.remove(&connection).is_some()
    }

    fn dirty_mask(&self, connection: ConnectionId, context: &ConnectionContext) -> FieldMask {
        match self.connections.get(&connection) {
            Some(state) => state.dirty_mask(&self.table, &self.object, context),
            None => ReplicationState::new(&self.table).dirty_mask(&self.table, &self.object, context),
        }
    }

    fn write_update(
        &mut self,
        connection: ConnectionId,
        context: &ConnectionContext,
        archive: &mut dyn Archive,
    ) -> Result<FieldMask, SerdeErr> {
        let table = &self.table;
        let state = self
            .connections
            .entry(connection)
            .or_insert_with(|| ReplicationState::new(table));
        state.write_delta(table, &self.object, context, archive)
    }

    fn read_update(
        &mut self,
        archive: &mut dyn Archive,
        objects: &dyn ObjectLookup,
    ) -> Result<FieldMask, ReplicationError> {
        self.receive
            .read_delta(&self.table, &mut self.object, archive, objects)
    }

    fn resolve_reference(&mut self, net_id: NetId, key: LocalKey) -> bool {
        self.receive
            .resolve_reference(&self.table, &mut self.object, net_id, key)
    }

    fn waits_on(&self, net_id: NetId) -> bool {
        self.receive.pending().is_waiting_on(net_id)
    }

    fn references(&self, net_id: NetId) -> bool {
        self.receive.references(net_id)
    }

    fn field_count(&self) -> usize {
        self.table.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
