use std::collections::HashMap;

use log::{debug, warn};

use statecast_serde::{Archive, Serde};

use crate::{
    class::{class_factory::ClassFactory, class_id::ClassId},
    replication::{
        error::ReplicationError,
        field_mask::FieldMask,
        replicate::Replicate,
        replicated::{Replica, Replicated},
    },
    types::{LocalKey, NetId},
};

/// Receiving side: objects materialized from a `ReplicaHost`'s messages
///
/// A failed read leaves the object it targeted untouched. The caller should
/// treat the error as a protocol violation by the sender.
pub struct RemoteReplicas {
    factory: ClassFactory,
    objects: HashMap<NetId, Box<dyn Replica>>,
    keys: HashMap<NetId, LocalKey>,
    next_key: u64,
}

impl RemoteReplicas {
    pub fn new(factory: ClassFactory) -> Self {
        Self {
            factory,
            objects: HashMap::new(),
            keys: HashMap::new(),
            next_key: 0,
        }
    }

    pub fn factory(&self) -> &ClassFactory {
        &self.factory
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

    /// Local key assigned when the object spawned
    pub fn key(&self, net_id: NetId) -> Option<LocalKey> {
        self.keys.get(&net_id).copied()
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

    /// Reads a spawn, constructs the object through the factory and applies
    /// its initial state
    pub fn read_spawn(&mut self, archive: &mut dyn Archive) -> Result<NetId, ReplicationError> {
        let class_id = ClassId::de(archive)?;
        let net_id = NetId::de(archive)?;
        if self.objects.contains_key(&net_id) {
            warn!("Received a second spawn for object {}", net_id);
            return Err(ReplicationError::DuplicateObject {
                net_id: net_id.to_u32(),
            });
        }

        let Ok(mut replica) = self.factory.construct(class_id, net_id) else {
            warn!(
                "Received spawn of object {} with unknown class id {}",
                net_id, class_id
            );
            return Err(ReplicationError::UnknownClassId {
                id: class_id.to_u32(),
            });
        };
        if let Err(err) = replica.read_update(archive, &self.keys) {
            warn!("Discarding spawn of object {}: {}", net_id, err);
            return Err(err);
        }

        let key = LocalKey::new(self.next_key);
        self.next_key += 1;
        self.keys.insert(net_id, key);
        self.objects.insert(net_id, replica);
        debug!(
            "Spawned '{}' {} as {:?}",
            self.factory.class_name(class_id).unwrap_or("?"),
            net_id,
            key
        );

        self.resolve_waiting(net_id, key);
        Ok(net_id)
    }

    fn resolve_waiting(&mut self, net_id: NetId, key: LocalKey) {
        for replica in self.objects.values_mut() {
            if replica.waits_on(net_id) {
                replica.resolve_reference(net_id, key);
            }
        }
    }

    /// Reads one object's update, returns the object and its changed fields
    pub fn read_update(
        &mut self,
        archive: &mut dyn Archive,
    ) -> Result<(NetId, FieldMask), ReplicationError> {
        let net_id = NetId::de(archive)?;
        let changed = self.apply_update(net_id, archive)?;
        Ok((net_id, changed))
    }

    /// Applies an update whose net id the caller framed itself
    pub fn apply_update(
        &mut self,
        net_id: NetId,
        archive: &mut dyn Archive,
    ) -> Result<FieldMask, ReplicationError> {
        let Some(replica) = self.objects.get_mut(&net_id) else {
            warn!("Received update for unknown object {}", net_id);
            return Err(ReplicationError::UnknownObject {
                net_id: net_id.to_u32(),
            });
        };
        replica.read_update(archive, &self.keys).map_err(|err| {
            warn!("Discarding update of object {}: {}", net_id, err);
            err
        })
    }

    /// Reads a batch written by `ReplicaHost::write_updates`
    ///
    /// Objects before a malformed entry keep their applied updates.
    pub fn read_updates(
        &mut self,
        archive: &mut dyn Archive,
    ) -> Result<Vec<(NetId, FieldMask)>, ReplicationError> {
        let mut output = Vec::new();
        while archive.read_bool()? {
            output.push(self.read_update(archive)?);
        }
        Ok(output)
    }

    pub fn read_despawn(
        &mut self,
        archive: &mut dyn Archive,
    ) -> Result<Box<dyn Replica>, ReplicationError> {
        let net_id = NetId::de(archive)?;
        self.despawn(net_id)
    }

    pub fn despawn(&mut self, net_id: NetId) -> Result<Box<dyn Replica>, ReplicationError> {
        let replica = self
            .objects
            .remove(&net_id)
            .ok_or(ReplicationError::UnknownObject {
                net_id: net_id.to_u32(),
            })?;
        self.keys.remove(&net_id);

        let dangling = self
            .objects
            .values()
            .filter(|other| other.references(net_id))
            .count();
        if dangling > 0 {
            warn!(
                "Despawned object {} is still referenced by {} objects",
                net_id, dangling
            );
        }
        Ok(replica)
    }
}
