use std::collections::HashMap;

use log::debug;

use crate::class::{class_id::ClassId, class_lineage::ClassLineage, error::ClassIdentityError};

struct Lineage {
    base: Option<&'static str>,
    server: &'static str,
    client: &'static str,
}

/// Maps replicable classes to their wire class ids
///
/// Ids are resolved on first request and cached for the registry's
/// lifetime. Two concrete classes that stand for the same logical object
/// resolve to the id of their common replicated ancestor.
#[derive(Default)]
pub struct ClassRegistry {
    lineages: HashMap<&'static str, Lineage>,
    ids: HashMap<&'static str, ClassId>,
    owners: HashMap<ClassId, &'static str>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: ClassLineage>(&mut self) {
        self.lineages.insert(
            T::CLASS_NAME,
            Lineage {
                base: T::BASE_CLASS,
                server: T::SERVER_CLASS,
                client: T::CLIENT_CLASS,
            },
        );
    }

    /// Records a class with no local concrete type, such as the remote
    /// counterpart of a registered class or a shared base
    pub fn declare(&mut self, name: &'static str, base: Option<&'static str>) {
        self.lineages.entry(name).or_insert(Lineage {
            base,
            server: name,
            client: name,
        });
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lineages.contains_key(name)
    }

    fn lineage(&self, name: &'static str) -> Result<&Lineage, ClassIdentityError> {
        self.lineages
            .get(name)
            .ok_or(ClassIdentityError::UnknownClass { name })
    }

    fn base_of(&self, name: &'static str) -> Result<Option<&'static str>, ClassIdentityError> {
        Ok(self.lineage(name)?.base)
    }

    /// Name of the class whose id `name` is sent under
    pub fn resolve_source(&self, name: &'static str) -> Result<&'static str, ClassIdentityError> {
        let lineage = self.lineage(name)?;
        let (server, client) = (lineage.server, lineage.client);
        if server == client {
            return Ok(server);
        }

        let server_base = self.base_of(server)?;
        if server_base == Some(client) {
            return Ok(client);
        }
        let client_base = self.base_of(client)?;
        if client_base == Some(server) {
            return Ok(server);
        }
        match (server_base, client_base) {
            (Some(server_base), Some(client_base)) if server_base == client_base => Ok(server_base),
            _ => Err(ClassIdentityError::IncompatibleReplicatedClassHierarchy {
                class: name,
                server,
                client,
            }),
        }
    }

    pub fn class_id_of(&mut self, name: &'static str) -> Result<ClassId, ClassIdentityError> {
        if let Some(id) = self.ids.get(name) {
            return Ok(*id);
        }

        let source = self.resolve_source(name)?;
        let id = ClassId::from_name(source);
        match self.owners.get(&id).copied() {
            Some(owner) if owner != source => {
                return Err(ClassIdentityError::ClassIdCollision {
                    id: id.to_u32(),
                    first: owner,
                    second: source,
                });
            }
            Some(_) => {}
            None => {
                self.owners.insert(id, source);
            }
        }

        debug!("Class '{}' resolved to '{}' with id {}", name, source, id);
        self.ids.insert(name, id);
        Ok(id)
    }

    /// Registers `T` if needed and returns its id
    pub fn class_id<T: ClassLineage>(&mut self) -> Result<ClassId, ClassIdentityError> {
        if !self.contains(T::CLASS_NAME) {
            self.register::<T>();
        }
        self.class_id_of(T::CLASS_NAME)
    }

    /// Id of `name` if it has already been resolved
    pub fn cached_id(&self, name: &str) -> Option<ClassId> {
        self.ids.get(name).copied()
    }
}
