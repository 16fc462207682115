//! WOZ2 chunks
//!
//! Every chunk is a four character identifier, a little-endian 32-bit
//! length and the chunk data.  The identifiers are written
//! most-significant byte first so they read as text in a hex dump;
//! every other value in the format is little-endian.
//!
//! Reference: <https://applesaucefdc.com/woz/reference2/>
use std::fmt::{Display, Formatter};

use crate::config::Config;
use crate::disk_format::apple::bitstream::SYNC_BITS;
use crate::disk_format::apple::disk::TRACKS_PER_DISK;
use crate::disk_format::apple::track::{
    Bitstream, BITS_BLOCKS_PER_TRACK, BITS_TRACK_SIZE, TRACK_LEADER_SYNC_BITS,
};
use crate::disk_format::woz::crc::crc32;
use crate::error::Error;
use crate::serialize::{
    big_endian_dword_to_bytes, little_endian_dword_to_bytes, little_endian_word_to_bytes,
    padded_utf8_to_bytes, zeroed_buffer, Serializer,
};

/// 'INFO' chunk identifier
pub const INFO_ID: u32 = 0x494E464F;
/// 'TMAP' chunk identifier
pub const TMAP_ID: u32 = 0x544D4150;
/// 'TRKS' chunk identifier
pub const TRKS_ID: u32 = 0x54524B53;
/// 'WRIT' chunk identifier
pub const WRIT_ID: u32 = 0x57524954;

/// The size of the identifier and length preceding chunk data
pub const CHUNK_HEADER_SIZE: usize = 8;

/// The size of the INFO chunk data
pub const INFO_SIZE: usize = 60;
/// INFO chunk version, version 2 adds the boot sector format and
/// largest track fields
const INFO_VERSION: u8 = 2;
/// 5.25" disk
const DISK_TYPE_5_25: u8 = 1;
/// The width of the creator field
const CREATOR_SIZE: usize = 32;
/// 16-sector boot sector
const BOOT_SECTOR_FORMAT_16: u8 = 1;
/// Optimal bit timing in 125 nanosecond units, 32 is the standard 4
/// microseconds
const OPTIMAL_BIT_TIMING: u8 = 32;

/// The number of quarter-track entries in the TMAP chunk
pub const TMAP_SIZE: usize = 160;
/// TMAP value for a quarter track with no data
const UNUSED_TRACK: u8 = 0xFF;

/// The number of TRK entries in the TRKS chunk
pub const TRK_ENTRY_COUNT: usize = 160;
/// The size of a single TRK entry
pub const TRK_ENTRY_SIZE: usize = 8;
/// The size of the TRK table at the start of the TRKS chunk, the
/// track bitstreams follow it
pub const TRK_TABLE_SIZE: usize = TRK_ENTRY_COUNT * TRK_ENTRY_SIZE;

/// The size of a WRIT entry with a single write command
pub const WRIT_ENTRY_SIZE: usize = 20;

/// A WOZ chunk
pub struct Chunk {
    /// The chunk identifier, four ASCII characters packed big-endian
    pub id: u32,
    /// The chunk data
    pub data: Vec<u8>,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(id: u32, data: Vec<u8>) -> Chunk {
        Chunk { id, data }
    }

    /// The chunk identifier as a string
    pub fn name(&self) -> String {
        String::from_utf8_lossy(&big_endian_dword_to_bytes(self.id)).to_string()
    }

    /// The size of the chunk in the image, including the header
    pub fn total_size(&self) -> usize {
        CHUNK_HEADER_SIZE + self.data.len()
    }
}

/// Format a Chunk for display
impl Display for Chunk {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}: {} bytes", self.name(), self.data.len())
    }
}

impl<'a> Serializer<'a> for Chunk {
    fn as_vec(&'a self) -> Result<Vec<u8>, Error> {
        let length = u32::try_from(self.data.len())
            .map_err(|_e| Error::invalid(&format!("{} chunk is too large", self.name())))?;

        let mut bytes: Vec<u8> = Vec::new();
        bytes.try_reserve_exact(self.total_size())?;
        bytes.extend(big_endian_dword_to_bytes(self.id));
        bytes.extend(little_endian_dword_to_bytes(length));
        bytes.extend_from_slice(&self.data);

        Ok(bytes)
    }
}

/// Create the INFO chunk describing the disk
///
/// The creator and write protection come from the configuration.
pub fn create_info_chunk(config: &Config) -> Result<Chunk, Error> {
    let mut data: Vec<u8> = Vec::with_capacity(INFO_SIZE);

    data.push(INFO_VERSION);
    data.push(DISK_TYPE_5_25);
    data.push(config.write_protected()? as u8);
    // Synchronized, the tracks weren't imaged with cross-track sync
    data.push(0);
    // Cleaned, there are no fake bits
    data.push(1);
    data.extend(padded_utf8_to_bytes(&config.creator(), CREATOR_SIZE));
    // Disk sides
    data.push(1);
    data.push(BOOT_SECTOR_FORMAT_16);
    data.push(OPTIMAL_BIT_TIMING);
    // Compatible hardware, unknown
    data.extend(little_endian_word_to_bytes(0));
    // Required RAM, unknown
    data.extend(little_endian_word_to_bytes(0));
    data.extend(little_endian_word_to_bytes(BITS_BLOCKS_PER_TRACK as u16));

    data.resize(INFO_SIZE, 0);

    Ok(Chunk::new(INFO_ID, data))
}

/// Create the TMAP chunk mapping quarter-track positions to tracks
///
/// The data on a standard disk is visible from the track position and
/// a quarter track either side of it.  The position halfway between
/// two tracks is left unmapped.  The list stops a quarter track early
/// so there's no entry for a nonexistent track 35.
pub fn create_tmap_chunk() -> Chunk {
    let mut data: Vec<u8> = Vec::with_capacity(TMAP_SIZE);

    for quarter_track in 0..TMAP_SIZE {
        if quarter_track < (TRACKS_PER_DISK * 4) - 1 {
            let nominal_track = (quarter_track / 4) as u8;
            match quarter_track % 4 {
                0 | 1 => data.push(nominal_track),
                2 => data.push(UNUSED_TRACK),
                _ => data.push(nominal_track + 1),
            }
        } else {
            data.push(UNUSED_TRACK);
        }
    }

    Chunk::new(TMAP_ID, data)
}

/// Create the TRKS chunk holding the track bitstreams
///
/// The TRK entries hold block numbers counted from the start of the
/// file, so starting_block depends on everything written before the
/// bitstreams.  The chunks have to be written in order.
pub fn create_trks_chunk(tracks: &[Bitstream], starting_block: usize) -> Result<Chunk, Error> {
    if tracks.len() > TRK_ENTRY_COUNT {
        return Err(Error::invalid(&format!(
            "{} tracks don't fit in the TRK table",
            tracks.len()
        )));
    }

    let mut data = zeroed_buffer(TRK_TABLE_SIZE + tracks.len() * BITS_TRACK_SIZE)?;

    for (number, track) in tracks.iter().enumerate() {
        let block = starting_block + number * BITS_BLOCKS_PER_TRACK;
        let block = u16::try_from(block)
            .map_err(|_e| Error::invalid(&format!("track {} starts past block 65535", number)))?;
        let bit_count = u32::try_from(track.bit_count)
            .map_err(|_e| Error::invalid(&format!("track {} has too many bits", number)))?;

        let entry = number * TRK_ENTRY_SIZE;
        data[entry..entry + 2].copy_from_slice(&little_endian_word_to_bytes(block));
        data[entry + 2..entry + 4]
            .copy_from_slice(&little_endian_word_to_bytes(BITS_BLOCKS_PER_TRACK as u16));
        data[entry + 4..entry + 8].copy_from_slice(&little_endian_dword_to_bytes(bit_count));

        let offset = TRK_TABLE_SIZE + number * BITS_TRACK_SIZE;
        data[offset..offset + BITS_TRACK_SIZE].copy_from_slice(&track.data);
    }

    Ok(Chunk::new(TRKS_ID, data))
}

/// Create the WRIT chunk telling hardware how to write each track
///
/// Each track gets a single write command that skips the leader and
/// writes the rest of the bitstream.
pub fn create_writ_chunk(tracks: &[Bitstream]) -> Result<Chunk, Error> {
    let mut data: Vec<u8> = Vec::new();
    data.try_reserve_exact(tracks.len() * WRIT_ENTRY_SIZE)?;

    for (number, track) in tracks.iter().enumerate() {
        let quarter_track = u8::try_from(number * 4)
            .map_err(|_e| Error::invalid(&format!("track {} is out of range", number)))?;
        let write_bits = track
            .bit_count
            .checked_sub(TRACK_LEADER_SYNC_BITS)
            .and_then(|bits| u32::try_from(bits).ok())
            .ok_or_else(|| {
                Error::invalid(&format!("track {} is shorter than its leader", number))
            })?;

        // Track to write, always the whole-track position
        data.push(quarter_track);
        // Number of write commands
        data.push(1);
        // Flags
        data.push(0);
        // Reserved
        data.push(0);
        data.extend(little_endian_dword_to_bytes(crc32(0, track.valid_bytes())));
        // Don't rewrite the leader
        data.extend(little_endian_dword_to_bytes(TRACK_LEADER_SYNC_BITS as u32));
        data.extend(little_endian_dword_to_bytes(write_bits));
        // Leader nibble and its width in bits
        data.push(0xFF);
        data.push(SYNC_BITS as u8);
        // Leader count, Applesauce writes zero here
        data.push(0);
        // Padding
        data.push(0);
    }

    Ok(Chunk::new(WRIT_ID, data))
}

#[cfg(test)]
mod tests {
    use super::{
        create_info_chunk, create_tmap_chunk, create_trks_chunk, create_writ_chunk, Chunk,
        INFO_ID, INFO_SIZE, TMAP_SIZE, TRK_TABLE_SIZE, WRIT_ENTRY_SIZE,
    };
    use crate::config::{Config, Configuration};
    use crate::disk_format::apple::track::{Bitstream, BITS_TRACK_SIZE};
    use crate::disk_format::woz::crc::crc32;
    use crate::serialize::Serializer;
    use pretty_assertions::assert_eq;

    /// Build fake bitstreams with a fixed bit count
    fn test_tracks(count: usize, bit_count: usize) -> Vec<Bitstream> {
        (0..count)
            .map(|number| {
                let mut track = Bitstream::new().unwrap();
                track.data[0] = number as u8;
                track.data[BITS_TRACK_SIZE - 1] = 0xA5;
                track.bit_count = bit_count;
                track
            })
            .collect()
    }

    #[test]
    fn chunk_serializes() {
        let chunk = Chunk::new(INFO_ID, vec![1, 2, 3]);

        assert_eq!(chunk.name(), "INFO");
        assert_eq!(chunk.total_size(), 11);
        assert_eq!(chunk.to_string(), "INFO: 3 bytes");
        assert_eq!(
            chunk.as_vec().unwrap(),
            vec![b'I', b'N', b'F', b'O', 3, 0, 0, 0, 1, 2, 3]
        );
    }

    #[test]
    fn info_chunk_works() {
        let chunk = create_info_chunk(&Config::default()).unwrap();
        let data = &chunk.data;

        assert_eq!(chunk.name(), "INFO");
        assert_eq!(data.len(), INFO_SIZE);
        assert_eq!(&data[0..5], &[2, 1, 0, 0, 1]);
        assert_eq!(&data[5..14], "woz-rider".as_bytes());
        assert!(data[14..37].iter().all(|b| *b == 0x20));
        assert_eq!(&data[37..40], &[1, 1, 32]);
        assert_eq!(&data[40..44], &[0, 0, 0, 0]);
        assert_eq!(&data[44..46], &[13, 0]);
        assert!(data[46..].iter().all(|b| *b == 0));
    }

    /// The creator is truncated to 32 bytes and write protection is
    /// configurable
    #[test]
    fn info_chunk_configured_works() {
        let settings = config::Config::builder()
            .set_override("creator", "A creator name that is far too long to fit")
            .unwrap()
            .set_override("write_protected", true)
            .unwrap()
            .build()
            .unwrap();
        let config = Config::load(settings).unwrap();

        let chunk = create_info_chunk(&config).unwrap();

        assert_eq!(chunk.data.len(), INFO_SIZE);
        assert_eq!(chunk.data[2], 1);
        assert_eq!(
            &chunk.data[5..37],
            "A creator name that is far too l".as_bytes()
        );
        assert_eq!(chunk.data[37], 1);
    }

    #[test]
    fn tmap_chunk_works() {
        let chunk = create_tmap_chunk();
        let data = &chunk.data;

        assert_eq!(chunk.name(), "TMAP");
        assert_eq!(data.len(), TMAP_SIZE);
        assert_eq!(&data[0..8], &[0, 0, 0xFF, 1, 1, 1, 0xFF, 2]);

        for k in 0..35 {
            assert_eq!(data[4 * k], k as u8);
            assert_eq!(data[4 * k + 1], k as u8);
            assert_eq!(data[4 * k + 2], 0xFF);
            if 4 * k + 3 < 139 {
                assert_eq!(data[4 * k + 3], (k + 1) as u8);
            }
        }
        assert!(data[139..].iter().all(|b| *b == 0xFF));
    }

    #[test]
    fn trks_chunk_works() {
        let tracks = test_tracks(35, 50632);
        let chunk = create_trks_chunk(&tracks, 3).unwrap();
        let data = &chunk.data;

        assert_eq!(chunk.name(), "TRKS");
        assert_eq!(data.len(), TRK_TABLE_SIZE + 35 * BITS_TRACK_SIZE);

        for number in 0..35 {
            let entry = &data[number * 8..number * 8 + 8];
            let block = u16::from_le_bytes([entry[0], entry[1]]) as usize;
            assert_eq!(block, 3 + number * 13);
            assert_eq!(u16::from_le_bytes([entry[2], entry[3]]), 13);
            assert_eq!(
                u32::from_le_bytes([entry[4], entry[5], entry[6], entry[7]]),
                50632
            );

            let offset = TRK_TABLE_SIZE + number * BITS_TRACK_SIZE;
            assert_eq!(data[offset], number as u8);
            assert_eq!(data[offset + BITS_TRACK_SIZE - 1], 0xA5);
        }

        assert!(data[35 * 8..TRK_TABLE_SIZE].iter().all(|b| *b == 0));
    }

    #[test]
    fn trks_chunk_too_many_tracks_fails() {
        let tracks = test_tracks(161, 50632);

        assert!(create_trks_chunk(&tracks, 3).is_err());
    }

    #[test]
    fn writ_chunk_works() {
        let tracks = test_tracks(35, 50632);
        let chunk = create_writ_chunk(&tracks).unwrap();
        let data = &chunk.data;

        assert_eq!(chunk.name(), "WRIT");
        assert_eq!(data.len(), 35 * WRIT_ENTRY_SIZE);

        for number in 0..35 {
            let entry = &data[number * 20..number * 20 + 20];
            assert_eq!(&entry[0..4], &[(number * 4) as u8, 1, 0, 0]);

            let crc = u32::from_le_bytes([entry[4], entry[5], entry[6], entry[7]]);
            assert_eq!(crc, crc32(0, &tracks[number].data[..6329]));

            assert_eq!(
                u32::from_le_bytes([entry[8], entry[9], entry[10], entry[11]]),
                640
            );
            assert_eq!(
                u32::from_le_bytes([entry[12], entry[13], entry[14], entry[15]]),
                50632 - 640
            );
            assert_eq!(&entry[16..20], &[0xFF, 10, 0, 0]);
        }
    }

    /// A track shorter than the leader can't be written
    #[test]
    fn writ_chunk_short_track_fails() {
        let tracks = test_tracks(1, 320);

        assert!(create_writ_chunk(&tracks).is_err());
    }
}
