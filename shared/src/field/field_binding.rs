use statecast_serde::{Archive, SerdeErr};

use crate::{
    field::{field_serializer::FieldSerializer, reference_collector::ReferenceCollector},
    types::{FieldIndex, LocalKey, NetId},
};

/// Type-erased access to one field of `O` through its serializer
pub(crate) trait FieldBinding<O>: Send + Sync {
    fn write(&self, object: &O, archive: &mut dyn Archive) -> Result<(), SerdeErr>;

    /// Decodes the field without touching any object
    fn read(
        &self,
        archive: &mut dyn Archive,
        collector: &mut dyn ReferenceCollector,
    ) -> Result<Box<dyn StagedField<O>>, SerdeErr>;

    /// An empty history slot for one connection
    fn snapshot(&self) -> Box<dyn FieldSnapshot<O>>;

    fn resolve_reference(
        &self,
        object: &mut O,
        path: &[FieldIndex],
        net_id: NetId,
        key: LocalKey,
    ) -> bool;
}

/// Last value of a field sent to one connection
pub(crate) trait FieldSnapshot<O>: Send {
    fn matches(&self, object: &O) -> bool;
    fn record(&mut self, object: &O);
}

/// A decoded value waiting for the rest of its message
pub(crate) trait StagedField<O> {
    /// Moves the value into `object`, returns whether it changed
    fn apply(self: Box<Self>, object: &mut O, previously_known: bool) -> bool;
}

pub(crate) struct Binding<O, S: FieldSerializer> {
    serializer: S,
    get: fn(&O) -> &S::Value,
    get_mut: fn(&mut O) -> &mut S::Value,
}

impl<O, S: FieldSerializer> Binding<O, S> {
    pub fn new(serializer: S, get: fn(&O) -> &S::Value, get_mut: fn(&mut O) -> &mut S::Value) -> Self {
        Self {
            serializer,
            get,
            get_mut,
        }
    }
}

impl<O: 'static, S: FieldSerializer> FieldBinding<O> for Binding<O, S> {
    fn write(&self, object: &O, archive: &mut dyn Archive) -> Result<(), SerdeErr> {
        self.serializer.write(archive, (self.get)(object))
    }

    fn read(
        &self,
        archive: &mut dyn Archive,
        collector: &mut dyn ReferenceCollector,
    ) -> Result<Box<dyn StagedField<O>>, SerdeErr> {
        let value = self.serializer.read(archive, collector)?;
        Ok(Box::new(Staged {
            serializer: self.serializer.clone(),
            get_mut: self.get_mut,
            value,
        }))
    }

    fn snapshot(&self) -> Box<dyn FieldSnapshot<O>> {
        Box::new(Snapshot {
            serializer: self.serializer.clone(),
            get: self.get,
            last: None,
        })
    }

    fn resolve_reference(
        &self,
        object: &mut O,
        path: &[FieldIndex],
        net_id: NetId,
        key: LocalKey,
    ) -> bool {
        self.serializer
            .resolve_reference((self.get_mut)(object), path, net_id, key)
    }
}

struct Snapshot<O, S: FieldSerializer> {
    serializer: S,
    get: fn(&O) -> &S::Value,
    last: Option<S::Value>,
}

impl<O, S: FieldSerializer> FieldSnapshot<O> for Snapshot<O, S> {
    fn matches(&self, object: &O) -> bool {
        match &self.last {
            Some(last) => self.serializer.fields_are_equal(last, (self.get)(object)),
            None => false,
        }
    }

    fn record(&mut self, object: &O) {
        self.last = Some(self.serializer.copy((self.get)(object)));
    }
}

struct Staged<O, S: FieldSerializer> {
    serializer: S,
    get_mut: fn(&mut O) -> &mut S::Value,
    value: S::Value,
}

impl<O, S: FieldSerializer> StagedField<O> for Staged<O, S> {
    fn apply(self: Box<Self>, object: &mut O, previously_known: bool) -> bool {
        let Staged {
            serializer,
            get_mut,
            value,
        } = *self;
        let slot = get_mut(object);
        let changed = serializer.changed(slot, &value, previously_known);
        *slot = value;
        changed
    }
}
