use statecast_serde::Serde;

use crate::{
    field::{field_serializer::FieldSerializer, field_serializer::ValueSerializer},
    replication::replicate_condition::ReplicateCondition,
};

pub(crate) enum NotifyDecl<O> {
    Handler(fn(&mut O)),
    Named(&'static str),
}

/// Declaration of one replicated field, collected into a `FieldTable`
///
/// Usually written through the `field!` macro.
pub struct FieldDecl<O, S: FieldSerializer> {
    pub(crate) name: &'static str,
    pub(crate) serializer: S,
    pub(crate) get: fn(&O) -> &S::Value,
    pub(crate) get_mut: fn(&mut O) -> &mut S::Value,
    pub(crate) condition: ReplicateCondition,
    pub(crate) update_rate: f32,
    pub(crate) notify: Option<NotifyDecl<O>>,
}

impl<O, S: FieldSerializer> FieldDecl<O, S> {
    pub fn new(
        name: &'static str,
        serializer: S,
        get: fn(&O) -> &S::Value,
        get_mut: fn(&mut O) -> &mut S::Value,
    ) -> Self {
        Self {
            name,
            serializer,
            get,
            get_mut,
            condition: ReplicateCondition::Always,
            update_rate: 0.0,
            notify: None,
        }
    }

    pub fn condition(mut self, condition: ReplicateCondition) -> Self {
        self.condition = condition;
        self
    }

    /// Minimum seconds between two sends of this field to one connection,
    /// `0.0` sends on every change
    pub fn update_rate(mut self, seconds: f32) -> Self {
        self.update_rate = seconds.max(0.0);
        self
    }

    /// Called on the receiving object after a message changed this field
    pub fn notify(mut self, handler: fn(&mut O)) -> Self {
        self.notify = Some(NotifyDecl::Handler(handler));
        self
    }

    /// Like `notify`, resolved through `Replicate::resolve_notify` when the
    /// table is built
    pub fn notify_named(mut self, handler: &'static str) -> Self {
        self.notify = Some(NotifyDecl::Named(handler));
        self
    }
}

impl<O, T: Serde + Send + 'static> FieldDecl<O, ValueSerializer<T>> {
    pub fn value(
        name: &'static str,
        get: fn(&O) -> &T,
        get_mut: fn(&mut O) -> &mut T,
    ) -> Self {
        Self::new(name, ValueSerializer::new(), get, get_mut)
    }
}

/// Declares a replicated field from a struct member
///
/// `field!(Owner, member)` uses the member's `Serde` impl,
/// `field!(Owner, member, serializer)` uses the given serializer.
#[macro_export]
macro_rules! field {
    ($owner:ty, $name:ident) => {
        $crate::FieldDecl::value(
            stringify!($name),
            |object: &$owner| &object.$name,
            |object: &mut $owner| &mut object.$name,
        )
    };
    ($owner:ty, $name:ident, $serializer:expr) => {
        $crate::FieldDecl::new(
            stringify!($name),
            $serializer,
            |object: &$owner| &object.$name,
            |object: &mut $owner| &mut object.$name,
        )
    };
}
