use std::marker::PhantomData;

use statecast_serde::{Archive, SerdeErr};

use crate::{
    field::{field_serializer::FieldSerializer, reference_collector::ReferenceCollector},
    types::{FieldIndex, LocalKey, NetId},
};

/// A struct-valued field encoded member by member
///
/// Members holding object references read them through a
/// `ScopedCollector` keyed by the member's sub-field index, and route
/// `resolve_field` for that index back to the member.
pub trait Composite: Clone + PartialEq + Default + Send + 'static {
    fn write_fields(&self, archive: &mut dyn Archive) -> Result<(), SerdeErr>;

    fn read_fields(
        archive: &mut dyn Archive,
        collector: &mut dyn ReferenceCollector,
    ) -> Result<Self, SerdeErr>;

    /// Override with `Serde::wire_eq` per member when members hold floats
    fn wire_eq(&self, other: &Self) -> bool {
        self == other
    }

    fn resolve_field(
        &mut self,
        _sub_field: FieldIndex,
        _path: &[FieldIndex],
        _net_id: NetId,
        _key: LocalKey,
    ) -> bool {
        false
    }
}

pub struct CompositeSerializer<T> {
    phantom_t: PhantomData<fn() -> T>,
}

impl<T> CompositeSerializer<T> {
    pub fn new() -> Self {
        Self {
            phantom_t: PhantomData,
        }
    }
}

impl<T> Default for CompositeSerializer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for CompositeSerializer<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T: Composite> FieldSerializer for CompositeSerializer<T> {
    type Value = T;

    fn write(&self, archive: &mut dyn Archive, value: &T) -> Result<(), SerdeErr> {
        value.write_fields(archive)
    }

    fn read(
        &self,
        archive: &mut dyn Archive,
        collector: &mut dyn ReferenceCollector,
    ) -> Result<T, SerdeErr> {
        T::read_fields(archive, collector)
    }

    fn fields_are_equal(&self, a: &T, b: &T) -> bool {
        a.wire_eq(b)
    }

    fn copy(&self, value: &T) -> T {
        value.clone()
    }

    fn resolve_reference(
        &self,
        value: &mut T,
        path: &[FieldIndex],
        net_id: NetId,
        key: LocalKey,
    ) -> bool {
        match path.split_first() {
            Some((sub_field, rest)) => value.resolve_field(*sub_field, rest, net_id, key),
            None => false,
        }
    }
}
