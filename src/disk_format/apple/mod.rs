//! Encode an Apple ][ 8-bit disk image
//!
//! A DSK image is a flat dump of the 256-byte sectors on a 16-sector
//! 5.25" disk, 35 tracks of 16 sectors, 143360 bytes in total.  The
//! sectors are stored in logical order, so converting the image to a
//! flux image means placing them back in physical order and encoding
//! them the way the Disk II controller writes them.
//!
//! If a file has a dsk or do extension, it's in DOS 3.3 sector order
//! If the file has a po extension, it's in ProDOS sector order
#![warn(missing_docs)]
#![warn(unsafe_code)]

/// Disk-level functions and data structures for Apple disks.
pub mod disk;

/// Bit-level writer for track bitstreams
pub mod bitstream;

/// Nibble encoding routines
pub mod nibble;

/// Track encoder, lays out the sectors of a track as a bitstream
pub mod track;
