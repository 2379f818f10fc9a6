use statecast_serde::{Archive, SerdeErr};

use crate::{
    field::{field_serializer::FieldSerializer, reference_collector::ReferenceCollector},
    types::{FieldIndex, LocalKey, NetId},
};

/// A field that points at another replicated object
///
/// Only the network id travels. On the receiving side `key()` stays `None`
/// until the target object has materialized.
#[derive(Clone, Copy, Debug, Default)]
pub struct ObjectRef {
    net_id: Option<NetId>,
    key: Option<LocalKey>,
}

impl ObjectRef {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(net_id: NetId) -> Self {
        Self {
            net_id: Some(net_id),
            key: None,
        }
    }

    pub fn net_id(&self) -> Option<NetId> {
        self.net_id
    }

    pub fn key(&self) -> Option<LocalKey> {
        self.key
    }

    pub fn is_none(&self) -> bool {
        self.net_id.is_none()
    }

    /// Points at an object but has not yet been matched to a local key
    pub fn is_waiting(&self) -> bool {
        self.net_id.is_some() && self.key.is_none()
    }

    pub fn set(&mut self, net_id: NetId) {
        self.net_id = Some(net_id);
        self.key = None;
    }

    pub fn clear(&mut self) {
        self.net_id = None;
        self.key = None;
    }
}

// the local key is receiver bookkeeping, not state
impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.net_id == other.net_id
    }
}

impl Eq for ObjectRef {}

/// Presence bit, then the target's network id as a raw `u32`
#[derive(Clone, Copy, Debug, Default)]
pub struct ReferenceSerializer;

impl FieldSerializer for ReferenceSerializer {
    type Value = ObjectRef;

    fn write(&self, archive: &mut dyn Archive, value: &ObjectRef) -> Result<(), SerdeErr> {
        match value.net_id {
            Some(net_id) => {
                archive.write_bool(true)?;
                archive.write_u32(net_id.to_u32())
            }
            None => archive.write_bool(false),
        }
    }

    fn read(
        &self,
        archive: &mut dyn Archive,
        collector: &mut dyn ReferenceCollector,
    ) -> Result<ObjectRef, SerdeErr> {
        if !archive.read_bool()? {
            return Ok(ObjectRef::none());
        }
        let net_id = NetId::new(archive.read_u32()?);
        let key = collector.collect(net_id, Vec::new());
        Ok(ObjectRef {
            net_id: Some(net_id),
            key,
        })
    }

    fn fields_are_equal(&self, a: &ObjectRef, b: &ObjectRef) -> bool {
        a == b
    }

    fn copy(&self, value: &ObjectRef) -> ObjectRef {
        *value
    }

    fn resolve_reference(
        &self,
        value: &mut ObjectRef,
        path: &[FieldIndex],
        net_id: NetId,
        key: LocalKey,
    ) -> bool {
        if !path.is_empty() || value.net_id != Some(net_id) {
            return false;
        }
        value.key = Some(key);
        true
    }
}
