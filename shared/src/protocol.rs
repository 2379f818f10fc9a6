use std::{
    any::{Any, TypeId},
    collections::HashMap,
    sync::Arc,
};

use log::info;

use crate::{
    class::{
        class_factory::{plays_role, ClassFactory},
        class_id::ClassId,
        class_registry::ClassRegistry,
        error::ClassIdentityError,
    },
    field::field_table::FieldTable,
    replication::{replicate::Replicate, replicated::Replicated},
    types::{HostType, NetId},
};

pub mod error;
pub use error::ProtocolError;

// Protocol Plugin
pub trait ProtocolPlugin {
    fn build(&self, protocol: &mut Protocol);
}

type AddToFactory =
    Box<dyn Fn(&mut ClassFactory, ClassId) -> Result<(), ClassIdentityError> + Send + Sync>;

struct ClassKind {
    type_id: TypeId,
    name: &'static str,
    plays_role: fn(HostType) -> bool,
    table: Arc<dyn Any + Send + Sync>,
    add_to_factory: AddToFactory,
}

// Protocol
#[derive(Default)]
pub struct Protocol {
    classes: ClassRegistry,
    kinds: Vec<ClassKind>,
    kind_index: HashMap<TypeId, usize>,
    class_ids: HashMap<TypeId, ClassId>,
    locked: bool,
}

impl Protocol {
    pub fn builder() -> Self {
        Self::default()
    }

    pub fn add_plugin<P: ProtocolPlugin>(&mut self, plugin: P) -> &mut Self {
        self.check_lock();
        plugin.build(self);
        self
    }

    /// # Panics
    ///
    /// Panics if the protocol is locked or `T`'s field table is invalid.
    /// Consider using `try_add_class` for non-panicking error handling.
    pub fn add_class<T: Replicate>(&mut self) -> &mut Self {
        if let Err(err) = self.try_add_class::<T>() {
            panic!("{}", err);
        }
        self
    }

    /// Declares a class with no concrete type in this process: the remote
    /// variant of an added class, or a base two variants share
    pub fn declare_class(&mut self, name: &'static str, base: Option<&'static str>) -> &mut Self {
        self.check_lock();
        self.classes.declare(name, base);
        self
    }

    // Non-panicking builder methods

    pub fn try_add_plugin<P: ProtocolPlugin>(&mut self, plugin: P) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        plugin.build(self);
        Ok(self)
    }

    /// Builds `T`'s field table and records its lineage
    pub fn try_add_class<T: Replicate>(&mut self) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        let type_id = TypeId::of::<T>();
        if self.kind_index.contains_key(&type_id) {
            return Ok(self);
        }

        let table = Arc::new(T::field_table()?);
        self.classes.register::<T>();

        let factory_table = table.clone();
        let add_to_factory: AddToFactory = Box::new(move |factory: &mut ClassFactory, class_id: ClassId| {
            factory.try_add_class::<T>(class_id, factory_table.clone())
        });
        info!(
            "Added class '{}' with {} replicated fields",
            T::CLASS_NAME,
            table.len()
        );

        self.kind_index.insert(type_id, self.kinds.len());
        self.kinds.push(ClassKind {
            type_id,
            name: T::CLASS_NAME,
            plays_role: plays_role::<T>,
            table,
            add_to_factory,
        });
        Ok(self)
    }

    pub fn try_declare_class(
        &mut self,
        name: &'static str,
        base: Option<&'static str>,
    ) -> Result<&mut Self, ProtocolError> {
        self.try_check_lock()?;
        self.classes.declare(name, base);
        Ok(self)
    }

    /// Resolves every added class's id, failing on incompatible
    /// hierarchies and id collisions, then freezes the protocol
    pub fn try_lock(&mut self) -> Result<(), ProtocolError> {
        self.try_check_lock()?;
        let mut class_ids = HashMap::new();
        for kind in &self.kinds {
            let class_id = self.classes.class_id_of(kind.name)?;
            class_ids.insert(kind.type_id, class_id);
        }
        self.class_ids = class_ids;
        self.locked = true;
        info!("Protocol locked with {} classes", self.kinds.len());
        Ok(())
    }

    /// # Panics
    ///
    /// Panics if already locked or if class ids cannot be resolved.
    /// Consider using `try_lock` for non-panicking error handling.
    pub fn lock(&mut self) {
        if let Err(err) = self.try_lock() {
            panic!("{}", err);
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Checks if protocol is locked without panicking
    /// Returns Err if protocol is locked
    pub fn try_check_lock(&self) -> Result<(), ProtocolError> {
        if self.locked {
            Err(ProtocolError::AlreadyLocked)
        } else {
            Ok(())
        }
    }

    /// Checks if protocol is locked, panics if it is
    pub fn check_lock(&self) {
        if self.locked {
            panic!("Protocol already locked!");
        }
    }

    fn try_check_locked(&self) -> Result<(), ProtocolError> {
        if self.locked {
            Ok(())
        } else {
            Err(ProtocolError::NotLocked)
        }
    }

    // Locked protocol

    pub fn try_class_id<T: Replicate>(&self) -> Result<ClassId, ProtocolError> {
        self.try_check_locked()?;
        self.class_ids
            .get(&TypeId::of::<T>())
            .copied()
            .ok_or(ProtocolError::UnregisteredClass {
                class: T::CLASS_NAME,
            })
    }

    /// # Panics
    ///
    /// Panics if the protocol is not locked or `T` was never added.
    pub fn class_id<T: Replicate>(&self) -> ClassId {
        match self.try_class_id::<T>() {
            Ok(class_id) => class_id,
            Err(err) => panic!("{}", err),
        }
    }

    /// Shared field table of an added class
    pub fn try_field_table<T: Replicate>(&self) -> Result<Arc<FieldTable<T>>, ProtocolError> {
        let unregistered = ProtocolError::UnregisteredClass {
            class: T::CLASS_NAME,
        };
        let Some(index) = self.kind_index.get(&TypeId::of::<T>()) else {
            return Err(unregistered);
        };
        self.kinds[*index]
            .table
            .clone()
            .downcast::<FieldTable<T>>()
            .map_err(|_| unregistered)
    }

    /// Factory constructing every added class that plays `role`
    pub fn try_build_factory(&self, role: HostType) -> Result<ClassFactory, ProtocolError> {
        self.try_check_locked()?;
        let mut factory = ClassFactory::new(role);
        for kind in self.kinds.iter().filter(|kind| (kind.plays_role)(role)) {
            let class_id = self
                .class_ids
                .get(&kind.type_id)
                .copied()
                .ok_or(ProtocolError::UnregisteredClass { class: kind.name })?;
            (kind.add_to_factory)(&mut factory, class_id)?;
        }
        Ok(factory)
    }

    /// # Panics
    ///
    /// Panics if the protocol is not locked or two classes of `role` share
    /// an id. Consider using `try_build_factory` for non-panicking error
    /// handling.
    pub fn build_factory(&self, role: HostType) -> ClassFactory {
        match self.try_build_factory(role) {
            Ok(factory) => factory,
            Err(err) => panic!("{}", err),
        }
    }

    /// Wraps a live object for replication under `net_id`
    pub fn try_replicate<T: Replicate>(
        &self,
        object: T,
        net_id: NetId,
    ) -> Result<Replicated<T>, ProtocolError> {
        let class_id = self.try_class_id::<T>()?;
        let table = self.try_field_table::<T>()?;
        Ok(Replicated::new(object, class_id, net_id, table))
    }

    /// # Panics
    ///
    /// Panics if the protocol is not locked or `T` was never added.
    pub fn replicate<T: Replicate>(&self, object: T, net_id: NetId) -> Replicated<T> {
        match self.try_replicate(object, net_id) {
            Ok(replicated) => replicated,
            Err(err) => panic!("{}", err),
        }
    }

    pub fn build(&mut self) -> Self {
        std::mem::take(self)
    }
}
