//! Encoding bytes into nibbles, disk bytes the Disk II controller can
//! read back reliably
//!
//! Two references that explain the encoding:
//! Beneath Apple DOS and Beneath Apple ProDOS

/// The size of a 6 and 2 encoded sector: 342 data nibbles and a
/// checksum nibble
pub const ENCODED_SECTOR_SIZE: usize = 343;

/// The size of the auxiliary buffer holding the low two bits of each
/// byte
const AUXILIARY_SIZE: usize = 0x56;

/// Maps 6-bit values to disk bytes
/// Every value has the high bit set and no more than one pair of
/// consecutive zero bits
pub const NIBBLE_WRITE_TABLE_6_AND_2: [u8; 64] = [
    0x96, 0x97, 0x9A, 0x9B, 0x9D, 0x9E, 0x9F, 0xA6, //
    0xA7, 0xAB, 0xAC, 0xAD, 0xAE, 0xAF, 0xB2, 0xB3, //
    0xB4, 0xB5, 0xB6, 0xB7, 0xB9, 0xBA, 0xBB, 0xBC, //
    0xBD, 0xBE, 0xBF, 0xCB, 0xCD, 0xCE, 0xCF, 0xD3, //
    0xD6, 0xD7, 0xD9, 0xDA, 0xDB, 0xDC, 0xDD, 0xDE, //
    0xDF, 0xE5, 0xE6, 0xE7, 0xE9, 0xEA, 0xEB, 0xEC, //
    0xED, 0xEE, 0xEF, 0xF2, 0xF3, 0xF4, 0xF5, 0xF6, //
    0xF7, 0xF9, 0xFA, 0xFB, 0xFC, 0xFD, 0xFE, 0xFF, //
];

/// Swaps the two bits of a 2-bit value
const BIT_REVERSE: [u8; 4] = [0x00, 0x02, 0x01, 0x03];

/// Encode a byte in 4 and 4 format
/// The odd bits go in the first byte, the even bits in the second,
/// with the other bits forced on for clocking
pub fn encode_4_and_4(value: u8) -> [u8; 2] {
    [(value >> 1) | 0xAA, value | 0xAA]
}

/// Split a 256-byte sector into 6-bit values
///
/// The first 0x56 values hold the low two bits of three bytes each,
/// bit-reversed.  The next 256 values hold the high six bits of each
/// byte.  The last value is left for the checksum.
pub fn pack_6_and_2(src: &[u8; 256]) -> [u8; ENCODED_SECTOR_SIZE] {
    let mut dest = [0_u8; ENCODED_SECTOR_SIZE];

    for c in 0..84 {
        dest[c] = BIT_REVERSE[(src[c] & 0x03) as usize]
            | (BIT_REVERSE[(src[c + 86] & 0x03) as usize] << 2)
            | (BIT_REVERSE[(src[c + 172] & 0x03) as usize] << 4);
    }
    // The third band runs out at byte 255
    dest[84] = BIT_REVERSE[(src[84] & 0x03) as usize]
        | (BIT_REVERSE[(src[170] & 0x03) as usize] << 2);
    dest[85] = BIT_REVERSE[(src[85] & 0x03) as usize]
        | (BIT_REVERSE[(src[171] & 0x03) as usize] << 2);

    for (c, byte) in src.iter().enumerate() {
        dest[AUXILIARY_SIZE + c] = byte >> 2;
    }

    dest
}

/// Exclusive OR each value with the one before it
///
/// The last value becomes a copy of the one before it, so XORing the
/// values together from the start recovers the packed values and
/// leaves the checksum equal to the final value.
pub fn apply_running_xor(dest: &mut [u8; ENCODED_SECTOR_SIZE]) {
    dest[ENCODED_SECTOR_SIZE - 1] = dest[ENCODED_SECTOR_SIZE - 2];

    for location in (1..ENCODED_SECTOR_SIZE - 1).rev() {
        dest[location] ^= dest[location - 1];
    }
}

/// Encode a 256-byte sector into 343 6 and 2 disk bytes
pub fn encode_6_and_2(src: &[u8; 256]) -> [u8; ENCODED_SECTOR_SIZE] {
    let mut dest = pack_6_and_2(src);
    apply_running_xor(&mut dest);

    for byte in dest.iter_mut() {
        *byte = NIBBLE_WRITE_TABLE_6_AND_2[*byte as usize];
    }

    dest
}

#[cfg(test)]
mod tests {
    use super::{
        apply_running_xor, encode_4_and_4, encode_6_and_2, pack_6_and_2, ENCODED_SECTOR_SIZE,
        NIBBLE_WRITE_TABLE_6_AND_2,
    };
    use pretty_assertions::assert_eq;

    /// Build a sector with every byte value in it
    fn test_sector() -> [u8; 256] {
        let mut sector = [0_u8; 256];
        for (i, byte) in sector.iter_mut().enumerate() {
            *byte = ((i * 37 + 11) & 0xFF) as u8;
        }
        sector
    }

    /// Decode 343 disk bytes back into a sector
    /// Follows the read routine: accumulate the XOR, then put the low
    /// bits back together with the high bits.
    fn decode_6_and_2(data: &[u8; ENCODED_SECTOR_SIZE]) -> ([u8; 256], u8) {
        let mut buffer = [0_u8; 342];
        let mut checksum: u8 = 0;

        for (index, byte) in data[..342].iter().enumerate() {
            let value = NIBBLE_WRITE_TABLE_6_AND_2
                .iter()
                .position(|b| b == byte)
                .unwrap_or_else(|| panic!("Invalid disk byte: 0x{:X}", byte))
                as u8;
            checksum ^= value;
            buffer[index] = checksum;
        }

        let reverse_values = [0x00, 0x02, 0x01, 0x03];
        let mut sector = [0_u8; 256];
        for (i, byte) in sector.iter_mut().enumerate() {
            let low = buffer[i % 0x56];
            let shift_pairs = (i / 0x56) * 2;
            *byte =
                (buffer[0x56 + i] << 2) | reverse_values[((low >> shift_pairs) & 0x03) as usize];
        }

        let disk_checksum = NIBBLE_WRITE_TABLE_6_AND_2
            .iter()
            .position(|b| *b == data[342])
            .unwrap_or_else(|| panic!("Invalid checksum byte: 0x{:X}", data[342]))
            as u8;
        assert_eq!(checksum, disk_checksum);

        (sector, checksum)
    }

    #[test]
    fn encode_4_and_4_works() {
        assert_eq!(encode_4_and_4(0xFE), [0xFF, 0xFE]);
        assert_eq!(encode_4_and_4(0x17), [0xAB, 0xBF]);
        assert_eq!(encode_4_and_4(0x05), [0xAA, 0xAF]);
        assert_eq!(encode_4_and_4(0xEC), [0xFE, 0xEE]);
    }

    /// The write table only contains bytes a Disk II can read back
    #[test]
    fn write_table_bytes_are_valid() {
        for byte in NIBBLE_WRITE_TABLE_6_AND_2 {
            assert_eq!(byte & 0x80, 0x80);
            // No more than one pair of consecutive zero bits
            let zero_pairs = (0..6).filter(|b| (byte >> b) & 0x03 == 0).count();
            assert!(zero_pairs <= 1, "0x{:X} has too many zeros", byte);
        }
        let mut sorted = NIBBLE_WRITE_TABLE_6_AND_2.to_vec();
        sorted.dedup();
        assert_eq!(sorted.len(), 64);
    }

    /// The low bits of bytes 84 and 85 only get two groups
    #[test]
    fn pack_6_and_2_boundary_works() {
        let mut sector = [0_u8; 256];
        sector[84] = 0x01;
        sector[170] = 0x01;
        sector[85] = 0x02;
        sector[171] = 0x03;
        sector[255] = 0xFF;

        let packed = pack_6_and_2(&sector);

        assert_eq!(packed[84], 0x02 | (0x02 << 2));
        assert_eq!(packed[85], 0x01 | (0x03 << 2));
        // Byte 255 lands in the third group of value 83
        assert_eq!(packed[83], 0x03 << 4);
        assert_eq!(packed[0x56 + 255], 0x3F);
        assert_eq!(packed[342], 0x00);
        assert!(packed.iter().all(|v| *v < 64));
    }

    /// XORing forward from the start undoes the running XOR
    #[test]
    fn running_xor_is_recoverable() {
        let packed = pack_6_and_2(&test_sector());
        let mut encoded = packed;
        apply_running_xor(&mut encoded);

        let mut accumulator = 0;
        for i in 0..342 {
            accumulator ^= encoded[i];
            assert_eq!(accumulator, packed[i]);
        }
        assert_eq!(encoded[342], accumulator);
    }

    #[test]
    fn encode_6_and_2_zero_sector_works() {
        let encoded = encode_6_and_2(&[0_u8; 256]);

        assert!(encoded.iter().all(|b| *b == 0x96));
    }

    #[test]
    fn encode_6_and_2_decodes() {
        let sector = test_sector();
        let encoded = encode_6_and_2(&sector);

        let (decoded, _checksum) = decode_6_and_2(&encoded);

        assert_eq!(decoded.to_vec(), sector.to_vec());
        assert_eq!(encode_6_and_2(&sector).to_vec(), encoded.to_vec());
    }
}
