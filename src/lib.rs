#![warn(missing_docs)]
#![warn(unsafe_code)]
//! woz_rider is a library crate to convert Apple ][ sector disk
//! images into WOZ2 flux images.  The WOZ images can be written back
//! to real floppies with an Applesauce and are readable by most
//! emulators.
//!
//! The primary entry point is
//! [convert](crate::disk_format::woz::convert) in the
//! [woz](crate::disk_format::woz) module.
//!
//! The disk_format module contains the nibble encoder and the WOZ
//! container writer.
//!
use log::error;

pub mod config;
pub mod disk_format;
pub mod error;
pub mod file;
pub mod serialize;

/// Initialize the module.
/// This should be called before any conversion is performed.
/// Panics on failure or if there are any incompatibilities.
pub fn init() {
    // The whole WOZ image is assembled in memory and indexed with
    // usize offsets.  A single image is over 64K, so a 16-bit usize
    // can't address it.
    if usize::BITS < 32 {
        error!(
            "Architecture usize {} is too small for this library",
            usize::BITS
        );
        panic!(
            "Architecture usize {} is too small for this library",
            usize::BITS
        );
    }
}
