//! CRC-32 checksums for WOZ images
//!
//! This is the reflected CRC-32 (polynomial 0xEDB88320) used by zip
//! and PNG.  WOZ images use it for the whole-file checksum in the
//! header and for the track checksums in the WRIT chunk.

/// The reflected CRC-32 polynomial
const CRC32_POLY: u32 = 0xEDB8_8320;

/// Lookup table, one entry per byte value, built at compile time
const CRC32_TABLE: [u32; 256] = crc32_table();

/// Build the CRC-32 lookup table
const fn crc32_table() -> [u32; 256] {
    let mut table = [0_u32; 256];
    let mut i = 0;

    while i < 256 {
        let mut crc = i as u32;
        let mut bit = 0;
        while bit < 8 {
            if (crc & 1) != 0 {
                crc = (crc >> 1) ^ CRC32_POLY;
            } else {
                crc >>= 1;
            }
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }

    table
}

/// Compute the CRC-32 of a buffer
///
/// Pass zero as the seed for a new checksum, or the result of a
/// previous call to continue a checksum across several buffers.
pub fn crc32(seed: u32, buf: &[u8]) -> u32 {
    let mut crc = !seed;

    for byte in buf {
        crc = CRC32_TABLE[((crc ^ *byte as u32) & 0xFF) as usize] ^ (crc >> 8);
    }

    !crc
}
