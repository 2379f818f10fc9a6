use statecast_serde::{Archive, SerdeErr};

use crate::{
    constants::MAX_REPLICATED_FIELDS, replication::error::ReplicationError, types::FieldIndex,
};

/// Which fields a replication message carries, bit `n` for field `n`
///
/// Sized to the class's declared field count: up to 8 fields use one
/// bit-packed byte, up to 16 a raw `u16`, otherwise a raw `u32`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldMask {
    bits: u32,
    len: u8,
}

impl FieldMask {
    /// `len` is clamped to `MAX_REPLICATED_FIELDS`
    pub fn new(len: u8) -> Self {
        Self {
            bits: 0,
            len: clamp_len(len),
        }
    }

    pub fn len(&self) -> u8 {
        self.len
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    pub fn is_clear(&self) -> bool {
        self.bits == 0
    }

    pub fn get(&self, field: FieldIndex) -> bool {
        field < u16::from(self.len) && self.bits & (1 << field) != 0
    }

    pub fn set(&mut self, field: FieldIndex) {
        if field < u16::from(self.len) {
            self.bits |= 1 << field;
        }
    }

    pub fn clear(&mut self) {
        self.bits = 0;
    }

    pub fn count(&self) -> u32 {
        self.bits.count_ones()
    }

    /// Set fields in ascending order
    pub fn iter(&self) -> impl Iterator<Item = FieldIndex> + '_ {
        (0..u16::from(self.len)).filter(move |field| self.get(*field))
    }

    pub fn ser(&self, archive: &mut dyn Archive) -> Result<(), SerdeErr> {
        match self.len {
            0 => {}
            1..=8 => archive.write_unsigned_bits(self.bits, 8)?,
            // bounded by len
            9..=16 => archive.write_u16(self.bits as u16)?,
            _ => archive.write_u32(self.bits)?,
        }
        Ok(())
    }

    pub fn de(archive: &mut dyn Archive, len: u8) -> Result<Self, ReplicationError> {
        let len = clamp_len(len);
        let bits = match len {
            0 => 0,
            1..=8 => archive.read_unsigned_bits(8)?,
            9..=16 => u32::from(archive.read_u16()?),
            _ => archive.read_u32()?,
        };
        if bits.checked_shr(u32::from(len)).unwrap_or(0) != 0 {
            return Err(ReplicationError::InvalidFieldMask { bits, len });
        }
        Ok(Self { bits, len })
    }
}

fn clamp_len(len: u8) -> u8 {
    // MAX_REPLICATED_FIELDS fits in a u8
    len.min(MAX_REPLICATED_FIELDS as u8)
}
