use log::trace;

use crate::{
    archive::{check_bit_width, Archive, ArchiveMode},
    byte_stream::{ByteStream, MemoryStream},
    error::SerdeErr,
};

/// The bit-packed `Archive` over a `ByteStream`
///
/// Partial bytes are held in one accumulator per direction. Neither ever
/// holds more than 8 pending bits: a full output byte is pushed to the
/// stream immediately, and an empty input accumulator pulls exactly one
/// more byte.
pub struct BitArchive<S: ByteStream = MemoryStream> {
    stream: S,
    mode: Option<ArchiveMode>,
    bit_accumulator_in: u8,
    bit_count_in: u8,
    bit_accumulator_out: u8,
    bit_count_out: u8,
}

impl BitArchive<MemoryStream> {
    /// An in-memory archive, opened for writing
    pub fn writer() -> Self {
        let mut archive = Self::new(MemoryStream::new());
        archive.open_write();
        archive
    }

    /// An in-memory archive over `bytes`, opened for reading
    pub fn reader(bytes: Vec<u8>) -> Self {
        let mut archive = Self::new(MemoryStream::from_bytes(bytes));
        archive.open_read();
        archive
    }

    /// Flushes pending bits and returns the written bytes
    pub fn to_bytes(mut self) -> Vec<u8> {
        self.flush();
        self.stream.to_bytes()
    }
}

impl<S: ByteStream> BitArchive<S> {
    /// Wraps `stream`, the archive must be opened before use
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            mode: None,
            bit_accumulator_in: 0,
            bit_count_in: 0,
            bit_accumulator_out: 0,
            bit_count_out: 0,
        }
    }

    /// Resets bit state and starts a read pass
    pub fn open_read(&mut self) {
        self.reset_bits();
        self.mode = Some(ArchiveMode::Load);
    }

    /// Resets bit state and starts a write pass
    pub fn open_write(&mut self) {
        self.reset_bits();
        self.mode = Some(ArchiveMode::Save);
    }

    pub fn stream(&self) -> &S {
        &self.stream
    }

    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    /// Returns the stream, any partially written byte is dropped
    pub fn into_stream(self) -> S {
        self.stream
    }

    /// Bits waiting in the output accumulator
    pub fn pending_output_bits(&self) -> u8 {
        self.bit_count_out
    }

    /// Bits waiting in the input accumulator
    pub fn pending_input_bits(&self) -> u8 {
        self.bit_count_in
    }

    fn reset_bits(&mut self) {
        self.bit_accumulator_in = 0;
        self.bit_count_in = 0;
        self.bit_accumulator_out = 0;
        self.bit_count_out = 0;
    }

    fn expect_mode(&self, expected: ArchiveMode) -> Result<(), SerdeErr> {
        if self.mode != Some(expected) {
            return Err(SerdeErr::WrongMode { expected });
        }
        Ok(())
    }

    fn push_bit(&mut self, bit: bool) {
        self.bit_accumulator_out = (self.bit_accumulator_out << 1) | bit as u8;
        self.bit_count_out += 1;

        if self.bit_count_out == 8 {
            self.stream.write_byte(self.bit_accumulator_out);
            self.bit_accumulator_out = 0;
            self.bit_count_out = 0;
        }
    }

    fn pull_bit(&mut self) -> Result<bool, SerdeErr> {
        if self.bit_count_in == 0 {
            self.bit_accumulator_in =
                self.stream
                    .read_byte()
                    .ok_or(SerdeErr::UnexpectedEndOfStream {
                        context: "packed bits",
                    })?;
            self.bit_count_in = 8;
        }

        self.bit_count_in -= 1;
        Ok((self.bit_accumulator_in >> self.bit_count_in) & 1 == 1)
    }

    fn pad_output(&mut self) {
        if self.bit_count_out > 0 {
            let byte = self.bit_accumulator_out << (8 - self.bit_count_out);
            trace!("padding {} pending output bits", self.bit_count_out);
            self.stream.write_byte(byte);
            self.bit_accumulator_out = 0;
            self.bit_count_out = 0;
        }
    }

    fn drop_input_bits(&mut self) {
        self.bit_accumulator_in = 0;
        self.bit_count_in = 0;
    }
}

impl<S: ByteStream> Archive for BitArchive<S> {
    fn mode(&self) -> Option<ArchiveMode> {
        self.mode
    }

    fn read_unsigned_bits(&mut self, bits: u8) -> Result<u32, SerdeErr> {
        self.expect_mode(ArchiveMode::Load)?;
        check_bit_width(bits)?;

        let mut value: u32 = 0;
        for _ in 0..bits {
            value = (value << 1) | self.pull_bit()? as u32;
        }
        Ok(value)
    }

    fn write_unsigned_bits(&mut self, value: u32, bits: u8) -> Result<(), SerdeErr> {
        self.expect_mode(ArchiveMode::Save)?;
        check_bit_width(bits)?;

        for index in (0..bits).rev() {
            self.push_bit((value >> index) & 1 == 1);
        }
        Ok(())
    }

    fn read_aligned(&mut self, out: &mut [u8]) -> Result<(), SerdeErr> {
        self.expect_mode(ArchiveMode::Load)?;
        self.drop_input_bits();

        for byte in out.iter_mut() {
            *byte = self
                .stream
                .read_byte()
                .ok_or(SerdeErr::UnexpectedEndOfStream {
                    context: "raw bytes",
                })?;
        }
        Ok(())
    }

    fn write_aligned(&mut self, bytes: &[u8]) -> Result<(), SerdeErr> {
        self.expect_mode(ArchiveMode::Save)?;
        self.pad_output();

        for byte in bytes {
            self.stream.write_byte(*byte);
        }
        Ok(())
    }

    fn skip_bytes(&mut self, count: usize) -> Result<(), SerdeErr> {
        self.expect_mode(ArchiveMode::Load)?;
        self.drop_input_bits();

        if self.stream.skip_bytes(count) < count {
            return Err(SerdeErr::UnexpectedEndOfStream {
                context: "skipped bytes",
            });
        }
        Ok(())
    }

    fn flush(&mut self) {
        self.pad_output();
        self.drop_input_bits();
    }

    fn discard(&mut self) {
        self.bit_accumulator_out = 0;
        self.bit_count_out = 0;
    }

    fn is_eos(&self) -> bool {
        self.bit_count_in == 0 && self.stream.is_exhausted()
    }
}
