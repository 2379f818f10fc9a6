use crate::{archive::Archive, error::SerdeErr, serde::Serde};

/// An unsigned value packed into exactly `BITS` bits (1..=32)
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash)]
pub struct UnsignedBits<const BITS: u8> {
    value: u32,
}

/// A signed value packed as a sign bit plus `BITS` magnitude bits (1..=32)
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash)]
pub struct SignedBits<const BITS: u8> {
    value: i32,
}

const fn max_magnitude(bits: u8) -> u64 {
    1u64 << bits
}

impl<const BITS: u8> UnsignedBits<BITS> {
    const VALID_WIDTH: () = assert!(BITS > 0 && BITS <= 32, "bit width must be 1..=32");

    /// Total bits this value takes on the wire
    pub const BIT_LENGTH: u32 = BITS as u32;

    /// # Panics
    ///
    /// Panics if `value` does not fit in `BITS` bits.
    /// Consider using `try_new` for non-panicking error handling.
    pub fn new(value: u32) -> Self {
        match Self::try_new(value) {
            Ok(output) => output,
            Err(err) => panic!("{}", err),
        }
    }

    pub fn try_new(value: u32) -> Result<Self, SerdeErr> {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID_WIDTH;
        if value as u64 >= max_magnitude(BITS) {
            return Err(SerdeErr::ValueOutOfRange {
                value: value as i64,
                bits: BITS,
            });
        }
        Ok(Self { value })
    }

    pub fn get(&self) -> u32 {
        self.value
    }
}

impl<const BITS: u8> SignedBits<BITS> {
    const VALID_WIDTH: () = assert!(BITS > 0 && BITS <= 32, "bit width must be 1..=32");

    /// Total bits this value takes on the wire, sign bit included
    pub const BIT_LENGTH: u32 = BITS as u32 + 1;

    /// # Panics
    ///
    /// Panics if `|value|` does not fit in `BITS` bits.
    /// Consider using `try_new` for non-panicking error handling.
    pub fn new(value: i32) -> Self {
        match Self::try_new(value) {
            Ok(output) => output,
            Err(err) => panic!("{}", err),
        }
    }

    pub fn try_new(value: i32) -> Result<Self, SerdeErr> {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID_WIDTH;
        if value.unsigned_abs() as u64 >= max_magnitude(BITS) {
            return Err(SerdeErr::ValueOutOfRange {
                value: value as i64,
                bits: BITS,
            });
        }
        Ok(Self { value })
    }

    pub fn get(&self) -> i32 {
        self.value
    }
}

impl<const BITS: u8> Serde for UnsignedBits<BITS> {
    fn ser(&self, archive: &mut dyn Archive) -> Result<(), SerdeErr> {
        archive.write_unsigned_bits(self.value, BITS)
    }

    fn de(archive: &mut dyn Archive) -> Result<Self, SerdeErr> {
        let value = archive.read_unsigned_bits(BITS)?;
        Ok(Self { value })
    }
}

impl<const BITS: u8> Serde for SignedBits<BITS> {
    fn ser(&self, archive: &mut dyn Archive) -> Result<(), SerdeErr> {
        archive.write_signed_bits(self.value, BITS)
    }

    fn de(archive: &mut dyn Archive) -> Result<Self, SerdeErr> {
        let value = archive.read_signed_bits(BITS)?;
        Ok(Self { value })
    }
}

// Tests
