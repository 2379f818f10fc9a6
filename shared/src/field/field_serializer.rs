use std::marker::PhantomData;

use statecast_serde::{Archive, Serde, SerdeErr};

use crate::{
    field::reference_collector::ReferenceCollector,
    types::{FieldIndex, LocalKey, NetId},
};

/// Encodes, decodes, compares and snapshots one kind of field value
///
/// One serializer instance is shared by every object of a class, so a
/// serializer holds no per-object state.
pub trait FieldSerializer: Clone + Send + Sync + 'static {
    type Value: Send + 'static;

    fn write(&self, archive: &mut dyn Archive, value: &Self::Value) -> Result<(), SerdeErr>;

    /// Decodes a value, reporting any object reference to `collector`
    fn read(
        &self,
        archive: &mut dyn Archive,
        collector: &mut dyn ReferenceCollector,
    ) -> Result<Self::Value, SerdeErr>;

    fn fields_are_equal(&self, a: &Self::Value, b: &Self::Value) -> bool;

    /// Deep copy, a snapshot must never alias live state
    fn copy(&self, value: &Self::Value) -> Self::Value;

    /// Whether applying `incoming` over `previous` should notify
    ///
    /// `previously_known` is false until the field has been received once.
    fn changed(&self, previous: &Self::Value, incoming: &Self::Value, previously_known: bool) -> bool {
        !previously_known || !self.fields_are_equal(previous, incoming)
    }

    /// Patches the reference at `path` once `net_id` materialized as `key`.
    /// Returns whether a slot was patched.
    fn resolve_reference(
        &self,
        _value: &mut Self::Value,
        _path: &[FieldIndex],
        _net_id: NetId,
        _key: LocalKey,
    ) -> bool {
        false
    }
}

/// Serializer for any plain `Serde` value
pub struct ValueSerializer<T> {
    phantom_t: PhantomData<fn() -> T>,
}

impl<T> ValueSerializer<T> {
    pub fn new() -> Self {
        Self {
            phantom_t: PhantomData,
        }
    }
}

impl<T> Default for ValueSerializer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for ValueSerializer<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T: Serde + Send + 'static> FieldSerializer for ValueSerializer<T> {
    type Value = T;

    fn write(&self, archive: &mut dyn Archive, value: &T) -> Result<(), SerdeErr> {
        value.ser(archive)
    }

    fn read(
        &self,
        archive: &mut dyn Archive,
        _collector: &mut dyn ReferenceCollector,
    ) -> Result<T, SerdeErr> {
        T::de(archive)
    }

    fn fields_are_equal(&self, a: &T, b: &T) -> bool {
        a.wire_eq(b)
    }

    fn copy(&self, value: &T) -> T {
        value.clone()
    }
}
