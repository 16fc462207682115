/// Convert a DSK image to a WOZ2 image
/// Usage: cargo run --example dsk2woz -- --input FILENAME --output FILENAME
/// Set RUST_LOG=info or RUST_LOG=debug to see what the conversion does
///
use std::process::exit;

use clap::Parser;
use config::Config;
use env_logger;
use log::{error, info};

use woz_rider::config::{Config as WozConfig, Configuration};
use woz_rider::disk_format::apple::disk::{format_from_filename, AddressingMode};
use woz_rider::disk_format::woz::convert;
use woz_rider::file::{read_file, write_file};

/// Command line arguments to convert an image file
#[derive(Parser, Debug)]
#[clap(about, version, author)]
struct Args {
    /// DSK, DO or PO image to convert
    #[clap(short, long)]
    input: String,
    /// Filename to write the WOZ image to
    #[clap(short, long)]
    output: String,
    /// Treat the image as ProDOS sector order, whatever the extension
    #[clap(long, conflicts_with = "dos")]
    prodos: bool,
    /// Treat the image as DOS 3.3 sector order, whatever the extension
    #[clap(long)]
    dos: bool,
    /// Creator application stored in the INFO chunk
    #[clap(long)]
    creator: Option<String>,
    /// Volume number written to the sector address fields
    #[clap(long)]
    volume: Option<u8>,
    /// Mark the disk as write protected
    #[clap(long)]
    write_protected: bool,
    /// Configuration file to load
    #[clap(short, long, default_value = "config/woz-rider.toml")]
    config: String,
}

/// Convert an image file
fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logger
    if let Err(e) = env_logger::try_init() {
        panic!("couldn't initialize logger: {:?}", e);
    }

    woz_rider::init();

    let settings = match load_settings(&args) {
        Ok(settings) => {
            info!("merged in config");
            settings
        }
        Err(e) => {
            error!("error loading config: {}", e);
            exit(1);
        }
    };

    let config = match WozConfig::load(settings) {
        Ok(config) => {
            info!("config version {}", config.version);
            config
        }
        Err(e) => {
            error!("{}", e);
            exit(1);
        }
    };

    let mode = if args.prodos {
        AddressingMode::ProDOS
    } else if args.dos {
        AddressingMode::DOS
    } else {
        format_from_filename(&args.input)
    };
    info!("Using {} sector order", mode);

    let data = match read_file(&args.input) {
        Ok(data) => data,
        Err(e) => {
            error!("Couldn't read {}: {}", args.input, e);
            exit(1);
        }
    };

    let woz = match convert(&config, &data, mode) {
        Ok(woz) => woz,
        Err(e) => {
            error!("Couldn't convert {}: {}", args.input, e);
            exit(1);
        }
    };

    if let Err(e) = write_file(&args.output, &woz) {
        error!("Couldn't write {}: {}", args.output, e);
        exit(1);
    }

    println!("Wrote {}: {} bytes", args.output, woz.len());

    exit(0);
}

/// load settings from a config file, the environment and the command line
/// returns the config settings as a Config on success, or a ConfigError on failure
fn load_settings(args: &Args) -> Result<Config, config::ConfigError> {
    let mut builder = Config::builder()
        // Add in config file, it's fine if there isn't one
        .add_source(config::File::with_name(&args.config).required(false))
        // Add in settings from the environment (with a prefix of APP)
        // Eg.. `APP_VOLUME=1 ./target/debug/examples/dsk2woz` would set the `volume` key
        .add_source(config::Environment::with_prefix("APP"));

    // Command line flags win over everything else
    if let Some(creator) = &args.creator {
        builder = builder.set_override("creator", creator.as_str())?;
    }
    if let Some(volume) = args.volume {
        builder = builder.set_override("volume", volume as i64)?;
    }
    if args.write_protected {
        builder = builder.set_override("write_protected", true)?;
    }

    builder.build()
}
