//! Configuration for the woz-rider crate
#![warn(missing_docs)]
#![warn(unsafe_code)]

use crate::error::{self, Error};

/// The creator written to the INFO chunk when none is configured
pub const DEFAULT_CREATOR: &str = "woz-rider";

/// The volume number written to every address field when none is
/// configured
pub const DEFAULT_VOLUME: u8 = 254;

/// Configuration format
pub struct Config {
    /// Version of the configuration root
    pub version: String,

    /// The general settings
    pub settings: config::Config,
}

/// Trait that defines a set of methods that allow loading and
/// unloading configuration data
pub trait Configuration {
    /// Load the configuration data from the default configuration
    /// string
    fn load(settings: config::Config) -> std::result::Result<Config, error::Error>;
}

impl Configuration for Config {
    fn load(settings: config::Config) -> std::result::Result<Config, error::Error> {
        let config = Config {
            version: String::from("0.1.0"),
            settings,
        };

        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            version: String::from("0.1.0"),
            settings: config::Config::default(),
        }
    }
}

impl Config {
    /// The creator application name stored in the INFO chunk
    pub fn creator(&self) -> String {
        self.settings
            .get_string("creator")
            .unwrap_or_else(|_| DEFAULT_CREATOR.to_string())
    }

    /// The disk volume number stored in each sector address field
    ///
    /// Returns an error if the configured value doesn't fit in a byte
    pub fn volume(&self) -> std::result::Result<u8, Error> {
        match self.settings.get_int("volume") {
            Ok(volume) => u8::try_from(volume).map_err(|_| {
                Error::invalid(&format!("volume {} is out of range 0-255", volume))
            }),
            Err(config::ConfigError::NotFound(_)) => Ok(DEFAULT_VOLUME),
            Err(e) => Err(e.into()),
        }
    }

    /// Whether the INFO chunk should mark the disk as write protected
    ///
    /// Returns an error if the configured value isn't a boolean
    pub fn write_protected(&self) -> std::result::Result<bool, Error> {
        match self.settings.get_bool("write_protected") {
            Ok(write_protected) => Ok(write_protected),
            Err(config::ConfigError::NotFound(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
