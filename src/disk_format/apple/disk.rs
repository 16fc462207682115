//! Disk-level functions and data structures for Apple disks.
use log::debug;

use std::fmt::{Display, Formatter, Result};

use nom::bytes::complete::take;
use nom::combinator::all_consuming;
use nom::multi::count;
use nom::IResult;

use crate::disk_format::sanity_check::SanityCheck;
use crate::error::Error;

/// The number of tracks on a 140K 5.25" disk
pub const TRACKS_PER_DISK: usize = 35;
/// The number of sectors on each track of a 16-sector disk
pub const SECTORS_PER_TRACK: usize = 16;
/// The number of bytes in each sector
pub const BYTES_PER_SECTOR: usize = 256;
/// The number of bytes in each track
pub const BYTES_PER_TRACK: usize = SECTORS_PER_TRACK * BYTES_PER_SECTOR;
/// The size of a 140K DSK image, 143360 bytes
pub const DSK_IMAGE_SIZE: usize = TRACKS_PER_DISK * BYTES_PER_TRACK;

/// The order the sectors are stored in the image file
///
/// The image file stores sectors by logical sector number, but the
/// logical to physical mapping depends on the operating system that
/// reads the disk.  The order of the image file isn't necessarily the
/// same as the format of the disk.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AddressingMode {
    /// Apple DOS 3.3 interleaved order, usually a dsk or do image
    DOS,
    /// Apple ProDOS native block order, usually a po image
    ProDOS,
}

/// Format an AddressingMode for display
impl Display for AddressingMode {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            AddressingMode::DOS => write!(f, "DOS 3.3"),
            AddressingMode::ProDOS => write!(f, "ProDOS"),
        }
    }
}

/// Map a physical sector on the track to the logical sector in the
/// image that belongs there
///
/// Physical sector 15 is always logical sector 15.  The rest are
/// spread across the track by a fixed skew.
pub fn logical_sector(physical_sector: u8, mode: AddressingMode) -> u8 {
    if physical_sector == 0x0F {
        return 0x0F;
    }

    let multiplier = match mode {
        AddressingMode::DOS => 7,
        AddressingMode::ProDOS => 8,
    };

    (physical_sector * multiplier) % 15
}

/// Try to guess the sector order from a filename
///
/// Images ending in po are in ProDOS order, everything else is
/// assumed to be DOS 3.3 order.
pub fn format_from_filename(filename: &str) -> AddressingMode {
    let filename_extension: Vec<_> = filename.split('.').collect();

    if filename_extension.len() < 2 {
        return AddressingMode::DOS;
    }

    match filename_extension[filename_extension.len() - 1]
        .to_lowercase()
        .as_str()
    {
        "po" => AddressingMode::ProDOS,
        &_ => AddressingMode::DOS,
    }
}

/// A single track on the disk
pub struct Track<'a> {
    /// The 256-byte sectors in logical order
    pub sectors: Vec<&'a [u8; BYTES_PER_SECTOR]>,
}

/// An Apple ][ 16-sector disk
pub struct AppleDisk<'a> {
    /// The sector order of the image data
    pub mode: AddressingMode,
    /// The tracks on the disk
    pub tracks: Vec<Track<'a>>,
}

/// Format an AppleDisk for display
impl Display for AppleDisk<'_> {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(
            f,
            "sector order: {}, tracks: {}, sectors per track: {}",
            self.mode,
            self.tracks.len(),
            self.tracks.first().map_or(0, |t| t.sectors.len())
        )
    }
}

impl SanityCheck for AppleDisk<'_> {
    fn check(&self) -> bool {
        if self.tracks.len() != TRACKS_PER_DISK {
            debug!("Suspicious number of tracks: {}", self.tracks.len());
            return false;
        }

        for (number, track) in self.tracks.iter().enumerate() {
            if track.sectors.len() != SECTORS_PER_TRACK {
                debug!(
                    "Suspicious number of sectors on track {}: {}",
                    number,
                    track.sectors.len()
                );
                return false;
            }
        }

        true
    }
}

/// Parse the tracks on an Apple ][ Disk
pub fn apple_tracks_parser(
    track_size: usize,
    number_of_tracks: usize,
) -> impl Fn(&[u8]) -> IResult<&[u8], Vec<&[u8]>> {
    move |i| count(take(track_size), number_of_tracks)(i)
}

/// Parse the tracks on a 140K Apple ][ Disk
pub fn apple_140_k_parser(i: &[u8]) -> IResult<&[u8], Vec<&[u8]>> {
    all_consuming(apple_tracks_parser(BYTES_PER_TRACK, TRACKS_PER_DISK))(i)
}

/// Parse the sectors on a single track
pub fn apple_track_parser(i: &[u8]) -> IResult<&[u8], Track<'_>> {
    let (i, sectors) = count(take(BYTES_PER_SECTOR), SECTORS_PER_TRACK)(i)?;

    // take always returns exactly BYTES_PER_SECTOR bytes
    let sectors = sectors
        .into_iter()
        .filter_map(|sector| <&[u8; BYTES_PER_SECTOR]>::try_from(sector).ok())
        .collect();

    Ok((i, Track { sectors }))
}

/// Split a DSK image into tracks and sectors
///
/// The data must be exactly 143360 bytes, the size of a 35 track,
/// 16-sector image.  Anything else fails with an InputSize error
/// before any parsing is done.
pub fn parse_disk(
    data: &[u8],
    mode: AddressingMode,
) -> std::result::Result<AppleDisk<'_>, Error> {
    if data.len() != DSK_IMAGE_SIZE {
        return Err(Error::input_size(DSK_IMAGE_SIZE, data.len()));
    }

    let (_i, track_data) = apple_140_k_parser(data)
        .map_err(|_e| Error::invalid("couldn't split image into tracks"))?;

    debug!("number of tracks: {}", track_data.len());

    let mut tracks = Vec::with_capacity(TRACKS_PER_DISK);
    for (number, track_bytes) in track_data.into_iter().enumerate() {
        let (_i, track) = apple_track_parser(track_bytes).map_err(|_e| {
            Error::invalid(&format!("couldn't split track {} into sectors", number))
        })?;
        tracks.push(track);
    }

    let disk = AppleDisk { mode, tracks };

    if !disk.check() {
        return Err(Error::invalid("disk doesn't have 35 tracks of 16 sectors"));
    }

    Ok(disk)
}
