use statecast_serde::{Archive, SerdeErr};

use crate::{
    field::{
        field_serializer::FieldSerializer,
        reference_collector::{ReferenceCollector, ScopedCollector},
    },
    types::{FieldIndex, LocalKey, NetId},
};

/// A sequence of items sharing one item serializer
///
/// Wire: a raw `u16` element count, then each element. Object references
/// inside elements are collected under the element index.
#[derive(Clone, Debug, Default)]
pub struct ListSerializer<S> {
    item: S,
}

impl<S: FieldSerializer> ListSerializer<S> {
    pub fn new(item: S) -> Self {
        Self { item }
    }

    pub fn item(&self) -> &S {
        &self.item
    }
}

impl<S: FieldSerializer> FieldSerializer for ListSerializer<S> {
    type Value = Vec<S::Value>;

    fn write(&self, archive: &mut dyn Archive, value: &Vec<S::Value>) -> Result<(), SerdeErr> {
        let count = u16::try_from(value.len()).map_err(|_| SerdeErr::LengthOverflow {
            length: value.len(),
            prefix: "u16",
        })?;
        archive.write_u16(count)?;
        for item in value {
            self.item.write(archive, item)?;
        }
        Ok(())
    }

    fn read(
        &self,
        archive: &mut dyn Archive,
        collector: &mut dyn ReferenceCollector,
    ) -> Result<Vec<S::Value>, SerdeErr> {
        let count = archive.read_u16()?;
        let mut output = Vec::new();
        for index in 0..count {
            let mut scoped = ScopedCollector::new(&mut *collector, index);
            output.push(self.item.read(archive, &mut scoped)?);
        }
        Ok(output)
    }

    fn fields_are_equal(&self, a: &Vec<S::Value>, b: &Vec<S::Value>) -> bool {
        a.len() == b.len()
            && a.iter()
                .zip(b.iter())
                .all(|(a, b)| self.item.fields_are_equal(a, b))
    }

    fn copy(&self, value: &Vec<S::Value>) -> Vec<S::Value> {
        value.iter().map(|item| self.item.copy(item)).collect()
    }

    fn changed(
        &self,
        previous: &Vec<S::Value>,
        incoming: &Vec<S::Value>,
        previously_known: bool,
    ) -> bool {
        // shrinking to empty always notifies, whatever the item equality says
        if incoming.is_empty() {
            return !previously_known || !previous.is_empty();
        }
        !previously_known || !self.fields_are_equal(previous, incoming)
    }

    fn resolve_reference(
        &self,
        value: &mut Vec<S::Value>,
        path: &[FieldIndex],
        net_id: NetId,
        key: LocalKey,
    ) -> bool {
        let Some((index, rest)) = path.split_first() else {
            return false;
        };
        let Some(item) = value.get_mut(usize::from(*index)) else {
            return false;
        };
        self.item.resolve_reference(item, rest, net_id, key)
    }
}
