use crate::{
    archive::Archive,
    error::SerdeErr,
    math::{Color32, Matrix4x4, Quaternion, Vector2, Vector3, Vector4},
};

/// A value that can be written to and read back from an `Archive`
pub trait Serde: Sized + Clone + PartialEq {
    /// Writes the value into the archive
    fn ser(&self, archive: &mut dyn Archive) -> Result<(), SerdeErr>;

    /// Reads a value out of the archive
    fn de(archive: &mut dyn Archive) -> Result<Self, SerdeErr>;

    /// Whether two values encode identically
    ///
    /// Float kinds compare bit patterns, so an unchanged NaN equals itself.
    fn wire_eq(&self, other: &Self) -> bool {
        self == other
    }
}

macro_rules! impl_serde_for {
    ($($kind:ty => $read:ident, $write:ident;)*) => {
        $(
            impl Serde for $kind {
                fn ser(&self, archive: &mut dyn Archive) -> Result<(), SerdeErr> {
                    archive.$write(*self)
                }

                fn de(archive: &mut dyn Archive) -> Result<Self, SerdeErr> {
                    archive.$read()
                }
            }
        )*
    };
}

macro_rules! impl_serde_for_float {
    ($($kind:ty => $read:ident, $write:ident;)*) => {
        $(
            impl Serde for $kind {
                fn ser(&self, archive: &mut dyn Archive) -> Result<(), SerdeErr> {
                    archive.$write(*self)
                }

                fn de(archive: &mut dyn Archive) -> Result<Self, SerdeErr> {
                    archive.$read()
                }

                fn wire_eq(&self, other: &Self) -> bool {
                    self.to_bits() == other.to_bits()
                }
            }
        )*
    };
}

macro_rules! impl_serde_for_ref {
    ($($kind:ty => $read:ident, $write:ident;)*) => {
        $(
            impl Serde for $kind {
                fn ser(&self, archive: &mut dyn Archive) -> Result<(), SerdeErr> {
                    archive.$write(self)
                }

                fn de(archive: &mut dyn Archive) -> Result<Self, SerdeErr> {
                    archive.$read()
                }
            }
        )*
    };
}

/// Records of floats compare component bit patterns
macro_rules! impl_serde_for_float_record {
    ($($kind:ty => $read:ident, $write:ident, |$value:ident| $components:expr;)*) => {
        $(
            impl Serde for $kind {
                fn ser(&self, archive: &mut dyn Archive) -> Result<(), SerdeErr> {
                    archive.$write(self)
                }

                fn de(archive: &mut dyn Archive) -> Result<Self, SerdeErr> {
                    archive.$read()
                }

                fn wire_eq(&self, other: &Self) -> bool {
                    let components = |$value: &$kind| $components;
                    same_bits(&components(self), &components(other))
                }
            }
        )*
    };
}

fn same_bits(a: &[f32], b: &[f32]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(a, b)| a.to_bits() == b.to_bits())
}

impl_serde_for! {
    bool => read_bool, write_bool;
    u8 => read_byte, write_byte;
    i8 => read_sbyte, write_sbyte;
    u16 => read_u16, write_u16;
    i16 => read_i16, write_i16;
    u32 => read_u32, write_u32;
    i32 => read_i32, write_i32;
    u64 => read_u64, write_u64;
    i64 => read_i64, write_i64;
}

impl_serde_for_float! {
    f32 => read_f32, write_f32;
    f64 => read_f64, write_f64;
}

impl_serde_for_ref! {
    String => read_string, write_string;
    Vec<u8> => read_byte_array, write_byte_array;
    Color32 => read_color32, write_color32;
}

impl_serde_for_float_record! {
    Vector2 => read_vector2, write_vector2, |v| [v.x, v.y];
    Vector3 => read_vector3, write_vector3, |v| [v.x, v.y, v.z];
    Vector4 => read_vector4, write_vector4, |v| [v.x, v.y, v.z, v.w];
    Quaternion => read_quaternion, write_quaternion, |v| [v.x, v.y, v.z, v.w];
    Matrix4x4 => read_matrix4x4, write_matrix4x4, |v| v.elements;
}
