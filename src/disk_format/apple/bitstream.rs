/// Writing bytes into a track bitstream at arbitrary bit offsets
///
/// Bits are stored most significant bit first.  A byte written at an
/// offset that isn't byte-aligned is split across two storage bytes.
/// Writes OR into the buffer, so the buffer must start out zeroed.
use crate::disk_format::apple::nibble::encode_4_and_4;

/// The number of bit cells a sync field takes up: a 0xFF byte
/// followed by two zero bits
pub const SYNC_BITS: usize = 10;

/// Write a byte into the buffer at a bit offset
/// Returns the bit offset following the byte
pub fn write_byte(buffer: &mut [u8], index: usize, value: u8) -> usize {
    let shift = index % 8;
    let byte_position = index / 8;

    buffer[byte_position] |= value >> shift;
    if shift != 0 {
        buffer[byte_position + 1] |= value << (8 - shift);
    }

    index + 8
}

/// Write a 10-bit sync field into the buffer at a bit offset
/// Returns the bit offset following the sync field
pub fn write_sync(buffer: &mut [u8], index: usize) -> usize {
    write_byte(buffer, index, 0xFF) + (SYNC_BITS - 8)
}

/// A cursor over a bitstream buffer
pub struct BitWriter<'a> {
    buffer: &'a mut [u8],
    index: usize,
}

impl<'a> BitWriter<'a> {
    /// Create a new BitWriter starting at bit zero of the buffer
    pub fn new(buffer: &'a mut [u8]) -> BitWriter<'a> {
        BitWriter { buffer, index: 0 }
    }

    /// The current bit offset, which is also the number of bits
    /// written so far
    pub fn index(&self) -> usize {
        self.index
    }

    /// Write a single byte
    pub fn write_byte(&mut self, value: u8) {
        self.index = write_byte(self.buffer, self.index, value);
    }

    /// Write a slice of bytes
    pub fn write_bytes(&mut self, values: &[u8]) {
        for value in values {
            self.write_byte(*value);
        }
    }

    /// Write a number of sync fields
    pub fn write_sync(&mut self, count: usize) {
        for _i in 0..count {
            self.index = write_sync(self.buffer, self.index);
        }
    }

    /// Write a byte in 4 and 4 encoding
    pub fn write_4_and_4(&mut self, value: u8) {
        self.write_bytes(&encode_4_and_4(value));
    }
}

#[cfg(test)]
mod tests {
    use super::{write_byte, write_sync, BitWriter};
    use pretty_assertions::assert_eq;

    /// Aligned bytes land in a single storage byte
    #[test]
    fn write_byte_aligned_works() {
        let mut buffer = [0_u8; 4];

        let index = write_byte(&mut buffer, 0, 0xD5);
        assert_eq!(index, 8);
        let index = write_byte(&mut buffer, index, 0xAA);
        assert_eq!(index, 16);

        assert_eq!(buffer, [0xD5, 0xAA, 0x00, 0x00]);
    }

    /// Unaligned bytes are split across two storage bytes
    #[test]
    fn write_byte_unaligned_works() {
        let mut buffer = [0_u8; 4];

        let index = write_byte(&mut buffer, 3, 0xFF);
        assert_eq!(index, 11);
        assert_eq!(buffer, [0x1F, 0xE0, 0x00, 0x00]);

        // Neighbouring bits are preserved
        let index = write_byte(&mut buffer, index, 0x81);
        assert_eq!(index, 19);
        assert_eq!(buffer, [0x1F, 0xF0, 0x20, 0x00]);
    }

    /// A sync field is a 0xFF byte followed by two zero bits
    #[test]
    fn write_sync_works() {
        let mut buffer = [0_u8; 5];

        let mut index = 0;
        for _i in 0..4 {
            index = write_sync(&mut buffer, index);
        }

        assert_eq!(index, 40);
        // 1111111100 repeated four times
        assert_eq!(buffer, [0xFF, 0x3F, 0xCF, 0xF3, 0xFC]);
    }

    #[test]
    fn bit_writer_works() {
        let mut buffer = [0_u8; 8];
        let mut writer = BitWriter::new(&mut buffer);

        writer.write_sync(1);
        writer.write_bytes(&[0xD5, 0xAA]);
        writer.write_4_and_4(0xFE);

        assert_eq!(writer.index(), 10 + 16 + 16);
        // 11111111 00110101 01101010 10111111 11111111 10
        assert_eq!(buffer, [0xFF, 0x35, 0x6A, 0xBF, 0xFF, 0x80, 0x00, 0x00]);
    }
}
