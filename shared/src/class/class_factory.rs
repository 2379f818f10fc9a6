use std::{collections::HashMap, sync::Arc};

use log::info;

use crate::{
    class::{class_id::ClassId, class_lineage::ClassLineage, error::ClassIdentityError},
    field::field_table::FieldTable,
    replication::{
        replicate::Replicate,
        replicated::{Replica, Replicated},
    },
    types::{HostType, NetId},
};

type Constructor = Box<dyn Fn(NetId) -> Box<dyn Replica> + Send + Sync>;

struct FactoryEntry {
    class_name: &'static str,
    construct: Constructor,
}

/// Constructs replicated objects from incoming class ids, for one role
pub struct ClassFactory {
    role: HostType,
    entries: HashMap<ClassId, FactoryEntry>,
}

/// Whether `T` is the concrete class built on `role`
pub fn plays_role<T: ClassLineage>(role: HostType) -> bool {
    match role {
        HostType::Server => T::CLASS_NAME == T::SERVER_CLASS,
        HostType::Client => T::CLASS_NAME == T::CLIENT_CLASS,
    }
}

impl ClassFactory {
    pub fn new(role: HostType) -> Self {
        Self {
            role,
            entries: HashMap::new(),
        }
    }

    pub fn role(&self) -> HostType {
        self.role
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, class_id: ClassId) -> bool {
        self.entries.contains_key(&class_id)
    }

    /// Name of the class constructed for `class_id`
    pub fn class_name(&self, class_id: ClassId) -> Option<&'static str> {
        self.entries.get(&class_id).map(|entry| entry.class_name)
    }

    pub fn try_add_class<T: Replicate>(
        &mut self,
        class_id: ClassId,
        table: Arc<FieldTable<T>>,
    ) -> Result<(), ClassIdentityError> {
        if !plays_role::<T>(self.role) {
            return Err(ClassIdentityError::WrongRole {
                class: T::CLASS_NAME,
                role: self.role,
            });
        }
        if let Some(existing) = self.entries.get(&class_id) {
            return Err(ClassIdentityError::DuplicateFactoryEntry {
                id: class_id.to_u32(),
                first: existing.class_name,
                second: T::CLASS_NAME,
            });
        }

        let construct: Constructor = Box::new(move |net_id: NetId| -> Box<dyn Replica> {
            Box::new(Replicated::new(
                T::default(),
                class_id,
                net_id,
                table.clone(),
            ))
        });
        self.entries.insert(
            class_id,
            FactoryEntry {
                class_name: T::CLASS_NAME,
                construct,
            },
        );
        info!(
            "{:?} factory constructs '{}' for class id {}",
            self.role,
            T::CLASS_NAME,
            class_id
        );
        Ok(())
    }

    /// # Panics
    ///
    /// Panics if `T` does not play this factory's role or its id is taken.
    /// Consider using `try_add_class` for non-panicking error handling.
    pub fn add_class<T: Replicate>(&mut self, class_id: ClassId, table: Arc<FieldTable<T>>) {
        if let Err(err) = self.try_add_class(class_id, table) {
            panic!("{}", err);
        }
    }

    /// Builds a default object of the class registered for `class_id`
    pub fn construct(
        &self,
        class_id: ClassId,
        net_id: NetId,
    ) -> Result<Box<dyn Replica>, ClassIdentityError> {
        let entry = self
            .entries
            .get(&class_id)
            .ok_or(ClassIdentityError::UnknownClassId {
                id: class_id.to_u32(),
            })?;
        Ok((entry.construct)(net_id))
    }
}
