//! Functions for dealing with files
#![warn(missing_docs)]
#![warn(unsafe_code)]

use std::{fs, result::Result};

use log::info;

use crate::error::Error;

/// Open up a file and read in the data
///
/// # Arguments
///
/// * `filename` - A string reference to a filename to open and read
///
/// # Returns
///   Returns all the data as a u8 vector
///      Returns an Err result if there was an error reading the file.
///      The Err type is a woz_rider::error::Error
///      Returns an Ok result with a u8 vector if reading the file was
///      successful.
///
/// # Examples
///
/// ```
/// use woz_rider::file::{read_file, write_file};
///
/// let filename = "woz-rider-doctest-file-read_file.dsk";
/// write_file(filename, &[1, 2, 3, 4]).unwrap();
///
/// let data = read_file(filename);
/// assert!(data.is_ok());
/// assert_eq!(data.unwrap(), vec![1, 2, 3, 4]);
///
/// // Teardown code
/// std::fs::remove_file(filename).unwrap_or_else(|e| {
///         panic!("Error removing test file: {}", e);
/// });
/// ```
pub fn read_file(filename: &str) -> Result<Vec<u8>, Error> {
    let data = fs::read(filename)?;
    info!("Read {}: {} bytes", filename, data.len());

    Ok(data)
}

/// Write a finished image buffer out to a file, replacing any
/// existing file
pub fn write_file(filename: &str, data: &[u8]) -> Result<(), Error> {
    fs::write(filename, data)?;
    info!("Wrote {}: {} bytes", filename, data.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::read_file;
    use crate::error::ErrorKind;

    /// Reading a missing file returns an Io error instead of panicking
    #[test]
    fn read_missing_file_fails() {
        let result = read_file("testdata/this-file-does-not-exist.dsk");

        match result {
            Ok(_) => panic!("Should fail reading a missing file"),
            Err(e) => assert!(matches!(e.kind(), ErrorKind::Io(_))),
        }
    }
}
