//! Serializer trait and functions to help serialize images to vectors
//! of bytes and other data types.
use crate::error::Error;
use std::result::Result;

/// Serializer is a trait that lets you build custom serializers for
/// structures.
pub trait Serializer<'a> {
    /// Serialize a structure to a vector of bytes
    fn as_vec(&'a self) -> Result<Vec<u8>, Error>;
}

/// Convert a 16-bit word to a little-endian pair of bytes
pub fn little_endian_word_to_bytes(word: u16) -> Vec<u8> {
    let bytes: Vec<u8> = vec![(word & 0xFF) as u8, ((word >> 8) & 0xFF) as u8];

    bytes
}

/// Convert a 32-bit double word to four little-endian bytes
pub fn little_endian_dword_to_bytes(dword: u32) -> Vec<u8> {
    let bytes: Vec<u8> = vec![
        (dword & 0xFF) as u8,
        ((dword >> 8) & 0xFF) as u8,
        ((dword >> 16) & 0xFF) as u8,
        ((dword >> 24) & 0xFF) as u8,
    ];

    bytes
}

/// Convert a 32-bit double word to four big-endian bytes
/// WOZ chunk identifiers are the only big-endian values in the format
pub fn big_endian_dword_to_bytes(dword: u32) -> Vec<u8> {
    let bytes: Vec<u8> = vec![
        ((dword >> 24) & 0xFF) as u8,
        ((dword >> 16) & 0xFF) as u8,
        ((dword >> 8) & 0xFF) as u8,
        (dword & 0xFF) as u8,
    ];

    bytes
}

/// Allocate a zero-filled buffer of a given length
///
/// Returns an Allocation error instead of aborting if the memory
/// isn't available.
pub fn zeroed_buffer(length: usize) -> Result<Vec<u8>, Error> {
    let mut buffer: Vec<u8> = Vec::new();
    buffer.try_reserve_exact(length)?;
    buffer.resize(length, 0);

    Ok(buffer)
}

/// Write a string into a fixed-width field, padded with spaces
///
/// The string is truncated on byte length, backing off to the nearest
/// character boundary so the field stays valid UTF-8.  The field is
/// never NUL terminated.
pub fn padded_utf8_to_bytes(s: &str, width: usize) -> Vec<u8> {
    let mut end = s.len().min(width);
    while !s.is_char_boundary(end) {
        end -= 1;
    }

    let mut bytes = s.as_bytes()[..end].to_vec();
    bytes.resize(width, 0x20);

    bytes
}
