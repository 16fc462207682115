//! Encode the sectors of a track into the bitstream a Disk II
//! controller would write
//!
//! A track starts with a leader of sync fields, followed by an
//! address field and data field for each of the sixteen sectors in
//! physical order:
//!
//! Address field:
//!   3 byte prologue (D5 AA 96)
//!   2 byte odd-even encoded volume
//!   2 byte odd-even encoded track
//!   2 byte odd-even encoded sector
//!   2 byte odd-even encoded checksum
//!   3 byte epilogue (DE AA EB)
//!   7 sync fields
//! Data field:
//!   3 byte prologue (D5 AA AD)
//!   342 bytes data, 6 and 2 encoded
//!   1 byte checksum
//!   3 byte epilogue (DE AA EB)
//!   16 sync fields, or a single FF after the last sector
use log::debug;

use crate::disk_format::apple::bitstream::{BitWriter, SYNC_BITS};
use crate::disk_format::apple::disk::{logical_sector, AddressingMode, Track, SECTORS_PER_TRACK};
use crate::disk_format::apple::nibble::encode_6_and_2;
use crate::error::Error;
use crate::serialize::zeroed_buffer;

/// The size of a WOZ storage block
pub const BITS_BLOCK_SIZE: usize = 512;
/// The number of storage blocks reserved for each track
pub const BITS_BLOCKS_PER_TRACK: usize = 13;
/// The size of the buffer holding a track bitstream
pub const BITS_TRACK_SIZE: usize = BITS_BLOCKS_PER_TRACK * BITS_BLOCK_SIZE;

/// The number of sync fields at the start of each track
pub const TRACK_LEADER_SYNC_COUNT: usize = 64;
/// The number of bits in the track leader
pub const TRACK_LEADER_SYNC_BITS: usize = TRACK_LEADER_SYNC_COUNT * SYNC_BITS;
/// The number of sync fields between an address field and its data
/// field
const ADDRESS_GAP_SYNC_COUNT: usize = 7;
/// The number of sync fields between a data field and the next
/// address field
const SECTOR_GAP_SYNC_COUNT: usize = 16;

/// Address field prologue
pub const ADDRESS_PROLOGUE: [u8; 3] = [0xD5, 0xAA, 0x96];
/// Data field prologue
pub const DATA_PROLOGUE: [u8; 3] = [0xD5, 0xAA, 0xAD];
/// Epilogue for both address and data fields
pub const EPILOGUE: [u8; 3] = [0xDE, 0xAA, 0xEB];

/// The encoded bits of a single track
///
/// Only the first bit_count bits are meaningful, the rest of the
/// buffer is zero padding out to the end of the last storage block.
pub struct Bitstream {
    /// The bitstream, BITS_TRACK_SIZE bytes
    pub data: Vec<u8>,
    /// The number of valid bits in the bitstream
    pub bit_count: usize,
}

impl Bitstream {
    /// Allocate an empty, zeroed bitstream
    pub fn new() -> Result<Bitstream, Error> {
        Ok(Bitstream {
            data: zeroed_buffer(BITS_TRACK_SIZE)?,
            bit_count: 0,
        })
    }

    /// The number of bytes that contain valid bits
    pub fn byte_count(&self) -> usize {
        (self.bit_count + 7) / 8
    }

    /// The bytes that contain valid bits
    pub fn valid_bytes(&self) -> &[u8] {
        &self.data[..self.byte_count()]
    }
}

/// Write an address field identifying a sector
fn write_address_field(writer: &mut BitWriter, volume: u8, track_number: u8, sector: u8) {
    writer.write_bytes(&ADDRESS_PROLOGUE);

    writer.write_4_and_4(volume);
    writer.write_4_and_4(track_number);
    writer.write_4_and_4(sector);
    writer.write_4_and_4(volume ^ track_number ^ sector);

    writer.write_bytes(&EPILOGUE);
}

/// Write a data field holding a 256-byte sector
fn write_data_field(writer: &mut BitWriter, sector: &[u8; 256]) {
    writer.write_bytes(&DATA_PROLOGUE);
    writer.write_bytes(&encode_6_and_2(sector));
    writer.write_bytes(&EPILOGUE);
}

/// Encode the sectors of a track into a bitstream
///
/// The sectors are written in physical order, each physical sector
/// holding the logical sector the addressing mode maps to it.
/// Returns the number of valid bits written.  This is the same for
/// every track, it only depends on the fixed track layout.
pub fn encode_track(
    dest: &mut Bitstream,
    track: &Track,
    track_number: u8,
    volume: u8,
    mode: AddressingMode,
) -> usize {
    dest.data.fill(0);

    let mut writer = BitWriter::new(&mut dest.data);

    writer.write_sync(TRACK_LEADER_SYNC_COUNT);

    for physical_sector in 0..SECTORS_PER_TRACK as u8 {
        write_address_field(&mut writer, volume, track_number, physical_sector);
        writer.write_sync(ADDRESS_GAP_SYNC_COUNT);

        let logical = logical_sector(physical_sector, mode);
        write_data_field(&mut writer, track.sectors[logical as usize]);

        if (physical_sector as usize) < SECTORS_PER_TRACK - 1 {
            writer.write_sync(SECTOR_GAP_SYNC_COUNT);
        } else {
            // A shorter closing mark so the end of the track doesn't
            // run into the leader
            writer.write_byte(0xFF);
        }
    }

    let bit_count = writer.index();
    dest.bit_count = bit_count;

    debug!(
        "Encoded track {}: {} bits, {} bytes",
        track_number,
        bit_count,
        dest.byte_count()
    );

    bit_count
}
