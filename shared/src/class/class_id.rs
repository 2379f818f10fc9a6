use std::fmt;

use statecast_serde::{Archive, Serde, SerdeErr};

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Wire identifier of a replicated class
///
/// FNV-1a over the resolved class name. The hash is frozen, so ids only
/// change when class names do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(u32);

impl ClassId {
    pub fn from_name(name: &str) -> Self {
        let mut hash = FNV_OFFSET_BASIS;
        for byte in name.bytes() {
            hash ^= u32::from(byte);
            hash = hash.wrapping_mul(FNV_PRIME);
        }
        Self(hash)
    }

    pub fn from_u32(id: u32) -> Self {
        Self(id)
    }

    pub fn to_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

impl Serde for ClassId {
    fn ser(&self, archive: &mut dyn Archive) -> Result<(), SerdeErr> {
        archive.write_u32(self.0)
    }

    fn de(archive: &mut dyn Archive) -> Result<Self, SerdeErr> {
        Ok(Self(archive.read_u32()?))
    }
}
