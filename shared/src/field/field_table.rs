use std::collections::HashSet;

use log::info;

use crate::{
    constants::MAX_REPLICATED_FIELDS,
    field::{
        error::ConfigError,
        field_binding::{Binding, FieldBinding},
        field_decl::{FieldDecl, NotifyDecl},
        field_serializer::FieldSerializer,
    },
    replication::{replicate::Replicate, replicate_condition::ReplicateCondition},
    types::FieldIndex,
};

/// Metadata of one replicated field, shared by every object of its class
pub struct FieldSpec<O> {
    field_id: FieldIndex,
    name: &'static str,
    condition: ReplicateCondition,
    update_rate: f32,
    notify: Option<fn(&mut O)>,
    binding: Box<dyn FieldBinding<O>>,
}

impl<O> FieldSpec<O> {
    pub fn field_id(&self) -> FieldIndex {
        self.field_id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn condition(&self) -> ReplicateCondition {
        self.condition
    }

    pub fn update_rate(&self) -> f32 {
        self.update_rate
    }

    pub fn notify(&self) -> Option<fn(&mut O)> {
        self.notify
    }

    pub(crate) fn binding(&self) -> &dyn FieldBinding<O> {
        self.binding.as_ref()
    }
}

/// Ordered field specs of a class; a field's position is its mask bit
pub struct FieldTable<O> {
    class: &'static str,
    fields: Vec<FieldSpec<O>>,
}

impl<O> FieldTable<O> {
    pub fn class_name(&self) -> &'static str {
        self.class
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[FieldSpec<O>] {
        &self.fields
    }

    pub fn field(&self, field_id: FieldIndex) -> Option<&FieldSpec<O>> {
        self.fields.get(usize::from(field_id))
    }

    pub fn field_id(&self, name: &str) -> Option<FieldIndex> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.field_id)
    }
}

impl<O: Replicate> FieldTable<O> {
    pub fn builder() -> FieldTableBuilder<O> {
        FieldTableBuilder {
            pending: Vec::new(),
        }
    }
}

struct PendingField<O> {
    name: &'static str,
    condition: ReplicateCondition,
    update_rate: f32,
    notify: Option<NotifyDecl<O>>,
    binding: Box<dyn FieldBinding<O>>,
}

pub struct FieldTableBuilder<O> {
    pending: Vec<PendingField<O>>,
}

impl<O: Replicate> FieldTableBuilder<O> {
    pub fn add<S: FieldSerializer>(mut self, decl: FieldDecl<O, S>) -> Self {
        self.pending.push(PendingField {
            name: decl.name,
            condition: decl.condition,
            update_rate: decl.update_rate,
            notify: decl.notify,
            binding: Box::new(Binding::new(decl.serializer, decl.get, decl.get_mut)),
        });
        self
    }

    /// Validates the declarations and resolves named notify handlers
    pub fn build(self) -> Result<FieldTable<O>, ConfigError> {
        let class = O::CLASS_NAME;
        if self.pending.len() > MAX_REPLICATED_FIELDS {
            return Err(ConfigError::TooManyFields {
                class,
                count: self.pending.len(),
                max: MAX_REPLICATED_FIELDS,
            });
        }

        let mut names = HashSet::new();
        let mut fields = Vec::with_capacity(self.pending.len());
        for (index, pending) in self.pending.into_iter().enumerate() {
            if !names.insert(pending.name) {
                return Err(ConfigError::DuplicateFieldName {
                    class,
                    field: pending.name,
                });
            }

            let notify = match pending.notify {
                None => None,
                Some(NotifyDecl::Handler(handler)) => Some(handler),
                Some(NotifyDecl::Named(handler)) => match O::resolve_notify(handler) {
                    Some(resolved) => Some(resolved),
                    None => {
                        return Err(ConfigError::MissingNotifyHandler {
                            class,
                            field: pending.name,
                            handler,
                        });
                    }
                },
            };

            // bounded by MAX_REPLICATED_FIELDS above
            let field_id = index as FieldIndex;
            fields.push(FieldSpec {
                field_id,
                name: pending.name,
                condition: pending.condition,
                update_rate: pending.update_rate,
                notify,
                binding: pending.binding,
            });
        }

        info!("Built field table for '{}' with {} fields", class, fields.len());
        Ok(FieldTable { class, fields })
    }
}
