use crate::{
    error::SerdeErr,
    math::{Color32, Matrix4x4, Quaternion, Vector2, Vector3, Vector4},
};

/// Direction of a single archive pass
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArchiveMode {
    Load,
    Save,
}

/// Largest bit-width accepted by the bit-level primitives
pub const MAX_BIT_WIDTH: u8 = 32;

/// Bit-packed read/write stream
///
/// Implementors provide the bit packer and the byte-aligned raw path. Every
/// typed primitive is built on top of those two, so values are laid out the
/// same way no matter which byte stream sits underneath:
///
/// * sub-byte values, `bool`, `u8` and `i8` go through the bit packer,
///   most significant bit first
/// * 16/32/64-bit integers and floats are raw little-endian bytes, written
///   after padding any pending output bits (and read after dropping any
///   pending input bits)
/// * strings and byte arrays are an `i32` byte length followed by the raw
///   bytes
pub trait Archive {
    /// Direction of the current pass, `None` until opened
    fn mode(&self) -> Option<ArchiveMode>;

    /// Reads exactly `bits` bits (1..=32) as an unsigned value
    fn read_unsigned_bits(&mut self, bits: u8) -> Result<u32, SerdeErr>;

    /// Writes the low `bits` bits (1..=32) of `value`
    fn write_unsigned_bits(&mut self, value: u32, bits: u8) -> Result<(), SerdeErr>;

    /// Drops pending input bits, then fills `out` with raw bytes
    fn read_aligned(&mut self, out: &mut [u8]) -> Result<(), SerdeErr>;

    /// Pads pending output bits to a full byte, then writes raw bytes
    fn write_aligned(&mut self, bytes: &[u8]) -> Result<(), SerdeErr>;

    /// Drops pending input bits, then skips `count` raw bytes
    fn skip_bytes(&mut self, count: usize) -> Result<(), SerdeErr>;

    /// Pads the current output byte and resets read state
    fn flush(&mut self);

    /// Drops a partially written byte without emitting it
    fn discard(&mut self);

    /// True once pending input bits and the byte source are both exhausted
    fn is_eos(&self) -> bool;

    fn is_loading(&self) -> bool {
        self.mode() == Some(ArchiveMode::Load)
    }

    fn is_saving(&self) -> bool {
        self.mode() == Some(ArchiveMode::Save)
    }

    // Bits

    /// Reads one sign bit followed by `bits` magnitude bits
    ///
    /// A set sign bit means negative. A negative zero decodes as `0`.
    fn read_signed_bits(&mut self, bits: u8) -> Result<i32, SerdeErr> {
        check_bit_width(bits)?;
        let negative = self.read_bool()?;
        let magnitude = self.read_unsigned_bits(bits)?;
        if negative {
            Ok((magnitude as i32).wrapping_neg())
        } else {
            Ok(magnitude as i32)
        }
    }

    /// Writes one sign bit followed by `bits` magnitude bits
    ///
    /// Sign and magnitude, not two's complement. Only `|value| < 2^bits`
    /// round-trips; larger magnitudes lose their high bits.
    fn write_signed_bits(&mut self, value: i32, bits: u8) -> Result<(), SerdeErr> {
        check_bit_width(bits)?;
        self.write_bool(value < 0)?;
        self.write_unsigned_bits(value.unsigned_abs(), bits)
    }

    fn read_bool(&mut self) -> Result<bool, SerdeErr> {
        Ok(self.read_unsigned_bits(1)? == 1)
    }

    fn write_bool(&mut self, value: bool) -> Result<(), SerdeErr> {
        self.write_unsigned_bits(value as u32, 1)
    }

    /// Bit-packed, 8 bits
    fn read_byte(&mut self) -> Result<u8, SerdeErr> {
        Ok(self.read_unsigned_bits(8)? as u8)
    }

    /// Bit-packed, 8 bits
    fn write_byte(&mut self, value: u8) -> Result<(), SerdeErr> {
        self.write_unsigned_bits(value as u32, 8)
    }

    /// Bit-packed as a sign bit and 7 magnitude bits
    fn read_sbyte(&mut self) -> Result<i8, SerdeErr> {
        Ok(self.read_signed_bits(7)? as i8)
    }

    /// Bit-packed as a sign bit and 7 magnitude bits, `-128` does not survive
    fn write_sbyte(&mut self, value: i8) -> Result<(), SerdeErr> {
        self.write_signed_bits(value as i32, 7)
    }

    // Raw little-endian primitives

    fn read_u16(&mut self) -> Result<u16, SerdeErr> {
        let mut bytes = [0u8; 2];
        self.read_aligned(&mut bytes)?;
        Ok(u16::from_le_bytes(bytes))
    }

    fn write_u16(&mut self, value: u16) -> Result<(), SerdeErr> {
        self.write_aligned(&value.to_le_bytes())
    }

    fn read_i16(&mut self) -> Result<i16, SerdeErr> {
        let mut bytes = [0u8; 2];
        self.read_aligned(&mut bytes)?;
        Ok(i16::from_le_bytes(bytes))
    }

    fn write_i16(&mut self, value: i16) -> Result<(), SerdeErr> {
        self.write_aligned(&value.to_le_bytes())
    }

    fn read_u32(&mut self) -> Result<u32, SerdeErr> {
        let mut bytes = [0u8; 4];
        self.read_aligned(&mut bytes)?;
        Ok(u32::from_le_bytes(bytes))
    }

    fn write_u32(&mut self, value: u32) -> Result<(), SerdeErr> {
        self.write_aligned(&value.to_le_bytes())
    }

    fn read_i32(&mut self) -> Result<i32, SerdeErr> {
        let mut bytes = [0u8; 4];
        self.read_aligned(&mut bytes)?;
        Ok(i32::from_le_bytes(bytes))
    }

    fn write_i32(&mut self, value: i32) -> Result<(), SerdeErr> {
        self.write_aligned(&value.to_le_bytes())
    }

    fn read_u64(&mut self) -> Result<u64, SerdeErr> {
        let mut bytes = [0u8; 8];
        self.read_aligned(&mut bytes)?;
        Ok(u64::from_le_bytes(bytes))
    }

    fn write_u64(&mut self, value: u64) -> Result<(), SerdeErr> {
        self.write_aligned(&value.to_le_bytes())
    }

    fn read_i64(&mut self) -> Result<i64, SerdeErr> {
        let mut bytes = [0u8; 8];
        self.read_aligned(&mut bytes)?;
        Ok(i64::from_le_bytes(bytes))
    }

    fn write_i64(&mut self, value: i64) -> Result<(), SerdeErr> {
        self.write_aligned(&value.to_le_bytes())
    }

    fn read_f32(&mut self) -> Result<f32, SerdeErr> {
        let mut bytes = [0u8; 4];
        self.read_aligned(&mut bytes)?;
        Ok(f32::from_le_bytes(bytes))
    }

    fn write_f32(&mut self, value: f32) -> Result<(), SerdeErr> {
        self.write_aligned(&value.to_le_bytes())
    }

    fn read_f64(&mut self) -> Result<f64, SerdeErr> {
        let mut bytes = [0u8; 8];
        self.read_aligned(&mut bytes)?;
        Ok(f64::from_le_bytes(bytes))
    }

    fn write_f64(&mut self, value: f64) -> Result<(), SerdeErr> {
        self.write_aligned(&value.to_le_bytes())
    }

    // Length-prefixed blobs

    /// Reads an `i32` length and that many bytes into `buffer`
    ///
    /// The buffer is cleared first and its allocation reused when large
    /// enough.
    fn read_byte_array_into(&mut self, buffer: &mut Vec<u8>) -> Result<(), SerdeErr> {
        let length = self.read_i32()?;
        if length < 0 {
            return Err(SerdeErr::NegativeLength { length });
        }
        buffer.clear();

        // grow as bytes arrive, a corrupt prefix must not allocate up front
        let mut remaining = length as usize;
        let mut chunk = [0u8; 256];
        while remaining > 0 {
            let count = remaining.min(chunk.len());
            self.read_aligned(&mut chunk[..count])?;
            buffer.extend_from_slice(&chunk[..count]);
            remaining -= count;
        }
        Ok(())
    }

    fn read_byte_array(&mut self) -> Result<Vec<u8>, SerdeErr> {
        let mut buffer = Vec::new();
        self.read_byte_array_into(&mut buffer)?;
        Ok(buffer)
    }

    fn write_byte_array(&mut self, bytes: &[u8]) -> Result<(), SerdeErr> {
        let length = i32::try_from(bytes.len()).map_err(|_| SerdeErr::LengthOverflow {
            length: bytes.len(),
            prefix: "i32",
        })?;
        self.write_i32(length)?;
        if length > 0 {
            self.write_aligned(bytes)?;
        }
        Ok(())
    }

    fn read_string(&mut self) -> Result<String, SerdeErr> {
        let bytes = self.read_byte_array()?;
        let length = bytes.len();
        String::from_utf8(bytes).map_err(|_| SerdeErr::InvalidUtf8 { length })
    }

    fn write_string(&mut self, value: &str) -> Result<(), SerdeErr> {
        self.write_byte_array(value.as_bytes())
    }

    // Structured values

    fn read_vector2(&mut self) -> Result<Vector2, SerdeErr> {
        Ok(Vector2::new(self.read_f32()?, self.read_f32()?))
    }

    fn write_vector2(&mut self, value: &Vector2) -> Result<(), SerdeErr> {
        self.write_f32(value.x)?;
        self.write_f32(value.y)
    }

    fn read_vector3(&mut self) -> Result<Vector3, SerdeErr> {
        Ok(Vector3::new(
            self.read_f32()?,
            self.read_f32()?,
            self.read_f32()?,
        ))
    }

    fn write_vector3(&mut self, value: &Vector3) -> Result<(), SerdeErr> {
        self.write_f32(value.x)?;
        self.write_f32(value.y)?;
        self.write_f32(value.z)
    }

    fn read_vector4(&mut self) -> Result<Vector4, SerdeErr> {
        Ok(Vector4::new(
            self.read_f32()?,
            self.read_f32()?,
            self.read_f32()?,
            self.read_f32()?,
        ))
    }

    fn write_vector4(&mut self, value: &Vector4) -> Result<(), SerdeErr> {
        self.write_f32(value.x)?;
        self.write_f32(value.y)?;
        self.write_f32(value.z)?;
        self.write_f32(value.w)
    }

    fn read_quaternion(&mut self) -> Result<Quaternion, SerdeErr> {
        Ok(Quaternion::new(
            self.read_f32()?,
            self.read_f32()?,
            self.read_f32()?,
            self.read_f32()?,
        ))
    }

    fn write_quaternion(&mut self, value: &Quaternion) -> Result<(), SerdeErr> {
        self.write_f32(value.x)?;
        self.write_f32(value.y)?;
        self.write_f32(value.z)?;
        self.write_f32(value.w)
    }

    fn read_matrix4x4(&mut self) -> Result<Matrix4x4, SerdeErr> {
        let mut elements = [0.0f32; 16];
        for element in elements.iter_mut() {
            *element = self.read_f32()?;
        }
        Ok(Matrix4x4::from_elements(elements))
    }

    fn write_matrix4x4(&mut self, value: &Matrix4x4) -> Result<(), SerdeErr> {
        for element in value.elements.iter() {
            self.write_f32(*element)?;
        }
        Ok(())
    }

    /// Four bit-packed bytes in RGBA order
    fn read_color32(&mut self) -> Result<Color32, SerdeErr> {
        Ok(Color32::new(
            self.read_byte()?,
            self.read_byte()?,
            self.read_byte()?,
            self.read_byte()?,
        ))
    }

    fn write_color32(&mut self, value: &Color32) -> Result<(), SerdeErr> {
        self.write_byte(value.r)?;
        self.write_byte(value.g)?;
        self.write_byte(value.b)?;
        self.write_byte(value.a)
    }
}

pub(crate) fn check_bit_width(bits: u8) -> Result<(), SerdeErr> {
    if bits == 0 || bits > MAX_BIT_WIDTH {
        return Err(SerdeErr::InvalidBitWidth { bits });
    }
    Ok(())
}
