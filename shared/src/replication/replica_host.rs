use std::collections::BTreeMap;

use log::debug;

use statecast_serde::{Archive, Serde};

use crate::{
    replication::{
        connection_context::ConnectionContext,
        error::ReplicationError,
        field_mask::FieldMask,
        replicate::Replicate,
        replicated::{Replica, Replicated},
    },
    types::{ConnectionId, NetId},
};

/// Sending side: the authoritative objects and what each connection has seen
///
/// Wire layout written here:
/// - spawn: `[u32 class id][u32 net id][field mask][fields]`, the mask
///   always present
/// - update: `[field mask][fields]`, nothing when no field changed
/// - update batch: `[1 bit][u32 net id][update]` per changed object, then
///   a `0` bit
/// - despawn: `[u32 net id]`
#[derive(Default)]
pub struct ReplicaHost {
    objects: BTreeMap<NetId, Box<dyn Replica>>,
}

impl ReplicaHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn contains(&self, net_id: NetId) -> bool {
        self.objects.contains_key(&net_id)
    }

    pub fn net_ids(&self) -> impl Iterator<Item = NetId> + '_ {
        self.objects.keys().copied()
    }

    pub fn insert(&mut self, replica: Box<dyn Replica>) -> Result<NetId, ReplicationError> {
        let net_id = replica.net_id();
        if self.objects.contains_key(&net_id) {
            return Err(ReplicationError::DuplicateObject {
                net_id: net_id.to_u32(),
            });
        }
        self.objects.insert(net_id, replica);
        Ok(net_id)
    }

    pub fn replica(&self, net_id: NetId) -> Option<&dyn Replica> {
        self.objects.get(&net_id).map(|replica| replica.as_ref())
    }

    pub fn get<O: Replicate>(&self, net_id: NetId) -> Option<&Replicated<O>> {
        self.objects.get(&net_id)?.downcast_ref()
    }

    pub fn get_mut<O: Replicate>(&mut self, net_id: NetId) -> Option<&mut Replicated<O>> {
        self.objects.get_mut(&net_id)?.downcast_mut()
    }

    /// Drops the object along with every connection's snapshot of it
    pub fn remove(&mut self, net_id: NetId) -> Option<Box<dyn Replica>> {
        self.objects.remove(&net_id)
    }

    /// Drops every snapshot kept for a closed connection
    pub fn remove_connection(&mut self, connection: ConnectionId) {
        let mut dropped = 0;
        for replica in self.objects.values_mut() {
            if replica.remove_connection(connection) {
                dropped += 1;
            }
        }
        debug!(
            "Dropped {} snapshots of connection {}",
            dropped, connection
        );
    }

    fn replica_mut(&mut self, net_id: NetId) -> Result<&mut Box<dyn Replica>, ReplicationError> {
        self.objects
            .get_mut(&net_id)
            .ok_or(ReplicationError::UnknownObject {
                net_id: net_id.to_u32(),
            })
    }

    /// Writes the full state of an object to a connection
    ///
    /// Any earlier snapshot for the connection is discarded first, so every
    /// field eligible for the initial state is sent.
    pub fn write_spawn(
        &mut self,
        net_id: NetId,
        connection: ConnectionId,
        context: &ConnectionContext,
        archive: &mut dyn Archive,
    ) -> Result<FieldMask, ReplicationError> {
        let replica = self.replica_mut(net_id)?;
        replica.remove_connection(connection);

        replica.class_id().ser(archive)?;
        net_id.ser(archive)?;
        let mask = replica.write_update(connection, context, archive)?;
        if mask.is_clear() {
            // bounded by MAX_REPLICATED_FIELDS
            FieldMask::new(replica.field_count() as u8).ser(archive)?;
        }

        debug!(
            "Spawned '{}' {} on connection {}",
            replica.class_name(),
            net_id,
            connection
        );
        Ok(mask)
    }

    /// Writes the changed fields of one object, nothing if none changed
    pub fn write_update(
        &mut self,
        net_id: NetId,
        connection: ConnectionId,
        context: &ConnectionContext,
        archive: &mut dyn Archive,
    ) -> Result<FieldMask, ReplicationError> {
        let replica = self.replica_mut(net_id)?;
        Ok(replica.write_update(connection, context, archive)?)
    }

    /// Writes an update for every replicating object spawned on
    /// `connection` that has changes, returns the objects written
    pub fn write_updates(
        &mut self,
        connection: ConnectionId,
        context_for: impl Fn(NetId) -> ConnectionContext,
        archive: &mut dyn Archive,
    ) -> Result<Vec<NetId>, ReplicationError> {
        let mut written = Vec::new();
        for (net_id, replica) in self.objects.iter_mut() {
            if !replica.replicates() || !replica.has_connection(connection) {
                continue;
            }
            let context = context_for(*net_id);
            if replica.dirty_mask(connection, &context).is_clear() {
                continue;
            }

            archive.write_bool(true)?;
            net_id.ser(archive)?;
            replica.write_update(connection, &context, archive)?;
            written.push(*net_id);
        }
        archive.write_bool(false)?;
        Ok(written)
    }

    pub fn write_despawn(&self, net_id: NetId, archive: &mut dyn Archive) -> Result<(), ReplicationError> {
        if !self.objects.contains_key(&net_id) {
            return Err(ReplicationError::UnknownObject {
                net_id: net_id.to_u32(),
            });
        }
        net_id.ser(archive)?;
        Ok(())
    }
}
