use std::fmt;

use statecast_serde::{Archive, Serde, SerdeErr};

/// Position of a field in its class's field table, also its bit in the field mask
pub type FieldIndex = u16;

/// Which side of the wire a factory constructs for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostType {
    Server,
    Client,
}

/// Network id of a replicated object, shared by every peer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NetId(u32);

impl NetId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn to_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serde for NetId {
    fn ser(&self, archive: &mut dyn Archive) -> Result<(), SerdeErr> {
        archive.write_u32(self.0)
    }

    fn de(archive: &mut dyn Archive) -> Result<Self, SerdeErr> {
        Ok(Self(archive.read_u32()?))
    }
}

/// Receiver-local handle of a materialized object
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalKey(u64);

impl LocalKey {
    pub const fn new(key: u64) -> Self {
        Self(key)
    }

    pub fn to_u64(self) -> u64 {
        self.0
    }
}

/// Identifies one remote peer on the sending side
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn to_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
