/// When a field is eligible to be sent to a connection
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ReplicateCondition {
    #[default]
    Always,
    /// Only with the first full state of the object
    InitialOnly,
    /// Only to the connection that owns the object
    OwnerOnly,
    /// To every connection except the owner
    SkipOwner,
    InitialOrOwner,
    InitialOwnerOnly,
}

impl ReplicateCondition {
    pub fn allows(self, is_owner: bool, is_initial: bool) -> bool {
        match self {
            ReplicateCondition::Always => true,
            ReplicateCondition::InitialOnly => is_initial,
            ReplicateCondition::OwnerOnly => is_owner,
            ReplicateCondition::SkipOwner => !is_owner,
            ReplicateCondition::InitialOrOwner => is_initial || is_owner,
            ReplicateCondition::InitialOwnerOnly => is_initial && is_owner,
        }
    }

    /// Fields under these conditions go out with the initial state even
    /// when unchanged
    pub fn includes_initial(self) -> bool {
        matches!(
            self,
            ReplicateCondition::InitialOnly
                | ReplicateCondition::InitialOrOwner
                | ReplicateCondition::InitialOwnerOnly
        )
    }
}
