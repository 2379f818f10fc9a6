//! # Statecast Serde
//! Bit-packed archive and the value types replicated state is built from.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod archive;
mod bit_archive;
mod byte_stream;
mod error;
mod integer;
mod math;
mod serde;

pub use archive::{Archive, ArchiveMode, MAX_BIT_WIDTH};
pub use bit_archive::BitArchive;
pub use byte_stream::{ByteStream, MemoryStream};
pub use error::SerdeErr;
pub use integer::{SignedBits, UnsignedBits};
pub use math::{Color32, Matrix4x4, Quaternion, Vector2, Vector3, Vector4};
pub use serde::Serde;
