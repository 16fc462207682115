//! Build a WOZ2 flux image from an Apple ][ disk
//!
//! The structure of a WOZ2 image is:
//!
//! Header (12 bytes)
//!   'WOZ2' identifier
//!   FF, to catch transfers that strip the high bit
//!   0A 0D 0A, to catch transfers that rewrite line endings
//!   CRC-32 of everything after the header
//! INFO chunk (disk description)
//! TMAP chunk (quarter-track map)
//! TRKS chunk (TRK table, then the track bitstreams in 512-byte blocks)
//! WRIT chunk (instructions for writing the image back to a floppy)
//!
//! Reference: <https://applesaucefdc.com/woz/reference2/>
#![warn(missing_docs)]
#![warn(unsafe_code)]

/// WOZ2 chunks
pub mod chunk;

/// CRC-32 checksums
pub mod crc;

use std::fmt::{Display, Formatter};

use log::{debug, info};

use crate::config::Config;
use crate::disk_format::apple::disk::{parse_disk, AddressingMode, AppleDisk, TRACKS_PER_DISK};
use crate::disk_format::apple::track::{
    encode_track, Bitstream, BITS_BLOCK_SIZE, BITS_TRACK_SIZE,
};
use crate::disk_format::sanity_check::SanityCheck;
use crate::error::Error;
use crate::serialize::{big_endian_dword_to_bytes, little_endian_dword_to_bytes, Serializer};

use chunk::{
    create_info_chunk, create_tmap_chunk, create_trks_chunk, create_writ_chunk, Chunk,
    CHUNK_HEADER_SIZE, INFO_SIZE, TMAP_SIZE, TRK_TABLE_SIZE, WRIT_ENTRY_SIZE,
};
use crc::crc32;

/// 'WOZ2' file identifier
pub const WOZ2_ID: u32 = 0x574F5A32;

/// The size of the file header
pub const WOZ_HEADER_SIZE: usize = 12;

/// The bytes following the identifier in the header
const HEADER_MARKER: [u8; 4] = [0xFF, 0x0A, 0x0D, 0x0A];

/// The offset of the CRC in the header
const HEADER_CRC_OFFSET: usize = 8;

/// A WOZ2 image, the four chunks in the order they're written
pub struct WozImage {
    /// Disk description
    pub info: Chunk,
    /// Quarter-track map
    pub tmap: Chunk,
    /// Track bitstreams
    pub trks: Chunk,
    /// Write instructions
    pub writ: Chunk,
}

impl WozImage {
    /// Encode every track of a disk and build the chunks
    pub fn from_disk(config: &Config, disk: &AppleDisk) -> Result<WozImage, Error> {
        let volume = config.volume()?;

        let mut tracks: Vec<Bitstream> = Vec::with_capacity(disk.tracks.len());
        for (number, track) in disk.tracks.iter().enumerate() {
            let track_number = u8::try_from(number)
                .map_err(|_e| Error::invalid(&format!("track {} is out of range", number)))?;

            let mut bitstream = Bitstream::new()?;
            encode_track(&mut bitstream, track, track_number, volume, disk.mode);
            tracks.push(bitstream);
        }

        if let Some(track) = tracks.first() {
            info!(
                "Encoded {} tracks in {} order, {} bits per track",
                tracks.len(),
                disk.mode,
                track.bit_count
            );
        }

        let info = create_info_chunk(config)?;
        let tmap = create_tmap_chunk();

        // The bitstreams start on the first block after the TRK table
        let bits_offset = WOZ_HEADER_SIZE
            + info.total_size()
            + tmap.total_size()
            + CHUNK_HEADER_SIZE
            + TRK_TABLE_SIZE;
        if bits_offset % BITS_BLOCK_SIZE != 0 {
            return Err(Error::invalid(&format!(
                "track data at offset {} isn't block aligned",
                bits_offset
            )));
        }
        let starting_block = bits_offset / BITS_BLOCK_SIZE;
        debug!("Track data starts at block {}", starting_block);

        let trks = create_trks_chunk(&tracks, starting_block)?;
        let writ = create_writ_chunk(&tracks)?;

        Ok(WozImage {
            info,
            tmap,
            trks,
            writ,
        })
    }

    /// The chunks in file order
    ///
    /// The order matters: the TRK entries hold block numbers relative
    /// to the start of the file.
    pub fn chunks(&self) -> [&Chunk; 4] {
        [&self.info, &self.tmap, &self.trks, &self.writ]
    }

    /// The size of the serialized image
    pub fn size(&self) -> usize {
        WOZ_HEADER_SIZE + self.chunks().iter().map(|c| c.total_size()).sum::<usize>()
    }
}

/// Format a WozImage for display
impl Display for WozImage {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "WOZ2 image: {} bytes", self.size())?;
        for chunk in self.chunks() {
            write!(f, ", {}", chunk)?;
        }
        Ok(())
    }
}

impl SanityCheck for WozImage {
    fn check(&self) -> bool {
        let expected = [
            INFO_SIZE,
            TMAP_SIZE,
            TRK_TABLE_SIZE + TRACKS_PER_DISK * BITS_TRACK_SIZE,
            TRACKS_PER_DISK * WRIT_ENTRY_SIZE,
        ];

        for (chunk, size) in self.chunks().iter().zip(expected) {
            if chunk.data.len() != size {
                debug!(
                    "Suspicious {} chunk size: {}, expected {}",
                    chunk.name(),
                    chunk.data.len(),
                    size
                );
                return false;
            }
        }

        true
    }
}

impl<'a> Serializer<'a> for WozImage {
    fn as_vec(&'a self) -> Result<Vec<u8>, Error> {
        let mut woz: Vec<u8> = Vec::new();
        woz.try_reserve_exact(self.size())?;

        woz.extend(big_endian_dword_to_bytes(WOZ2_ID));
        woz.extend_from_slice(&HEADER_MARKER);
        // CRC placeholder, filled in once everything else is written
        woz.extend(little_endian_dword_to_bytes(0));

        for chunk in self.chunks() {
            woz.extend(chunk.as_vec()?);
        }

        let crc = crc32(0, &woz[WOZ_HEADER_SIZE..]);
        woz[HEADER_CRC_OFFSET..WOZ_HEADER_SIZE]
            .copy_from_slice(&little_endian_dword_to_bytes(crc));

        Ok(woz)
    }
}

/// Convert a DSK image into a WOZ2 image
///
/// The data must be a complete 143360 byte, 16-sector image.  The
/// whole WOZ image is built in memory and returned; nothing is
/// returned if any step fails.
///
/// # Examples
///
/// ```
/// use woz_rider::config::Config;
/// use woz_rider::disk_format::apple::disk::AddressingMode;
/// use woz_rider::disk_format::woz::convert;
///
/// let dsk = vec![0_u8; 143360];
/// let woz = convert(&Config::default(), &dsk, AddressingMode::DOS).unwrap();
///
/// assert_eq!(&woz[0..4], "WOZ2".as_bytes());
/// assert_eq!(woz.len(), 235204);
/// ```
pub fn convert(config: &Config, data: &[u8], mode: AddressingMode) -> Result<Vec<u8>, Error> {
    let disk = parse_disk(data, mode)?;
    info!("Converting disk: {}", disk);

    let image = WozImage::from_disk(config, &disk)?;
    if !image.check() {
        return Err(Error::invalid("WOZ chunks are the wrong size"));
    }
    info!("{}", image);

    image.as_vec()
}
