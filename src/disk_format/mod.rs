#![warn(missing_docs)]
#![warn(unsafe_code)]
//!
//! Disk format encoders and writers
//!

/// Sanity checking trait
pub mod sanity_check;

/// Apple disk images
pub mod apple;

/// WOZ2 flux images
pub mod woz;
