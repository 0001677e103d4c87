//! Sht4x command-line utility
//!
//! Copyright 2019 Ryan Kurte

extern crate embedded_hal;
extern crate linux_embedded_hal;
use linux_embedded_hal::{Delay, I2cdev};

extern crate structopt;
use structopt::StructOpt;

extern crate humantime;
use humantime::Duration as HumanDuration;

#[macro_use]
extern crate log;
extern crate simplelog;
use simplelog::{LevelFilter, TermLogger};

extern crate sensor_sht4x;
use sensor_sht4x::{Mode, Sht4x};

#[derive(StructOpt)]
#[structopt(name = "sht4x-util")]
/// A Command Line Interface (CLI) for interacting with a local Sht4x environmental sensor over I2C
pub struct Options {
    /// Specify the i2c interface to use to connect to the sht4x device
    #[structopt(short = "d", long = "i2c", default_value = "/dev/i2c-1", env = "SHT4X_I2C")]
    i2c: String,

    /// Specify the sht4x device address
    #[structopt(
        short = "a",
        long = "address",
        default_value = "0x44",
        parse(try_from_str = "parse_address")
    )]
    address: u8,

    /// Measurement mode (high-precision, medium-precision, low-precision,
    /// high-heat-1s, high-heat-100ms, medium-heat-1s, medium-heat-100ms,
    /// low-heat-1s, low-heat-100ms)
    #[structopt(
        short = "m",
        long = "mode",
        default_value = "high-precision",
        parse(try_from_str = "parse_mode")
    )]
    mode: Mode,

    /// Enable verbose logging
    #[structopt(long = "log-level", default_value = "info")]
    level: LevelFilter,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(StructOpt)]
pub enum Command {
    /// Take a single measurement and print the result
    #[structopt(name = "read")]
    Read,

    /// Soft reset the sensor
    #[structopt(name = "reset")]
    Reset,

    /// Print the sensor serial number
    #[structopt(name = "serial")]
    Serial,

    /// Take measurements on a fixed period until interrupted
    #[structopt(name = "monitor")]
    Monitor {
        /// Specify period for taking measurements
        #[structopt(short = "p", long = "sample-period", default_value = "10s")]
        period: HumanDuration,

        /// Number of allowed I2C errors (per measurement attempt) prior to exiting
        #[structopt(long = "allowed-errors", default_value = "3")]
        allowed_errors: usize,
    },
}

/// Parse a (plain or 0x prefixed) hex device address
fn parse_address(s: &str) -> Result<u8, std::num::ParseIntError> {
    if s.starts_with("0x") {
        u8::from_str_radix(&s[2..], 16)
    } else {
        s.parse()
    }
}

/// Parse a measurement mode name
fn parse_mode(s: &str) -> Result<Mode, String> {
    let mode = match s {
        "high-precision" => Mode::NoHeatHighPrecision,
        "medium-precision" => Mode::NoHeatMediumPrecision,
        "low-precision" => Mode::NoHeatLowPrecision,
        "high-heat-1s" => Mode::HighHeat1s,
        "high-heat-100ms" => Mode::HighHeat100ms,
        "medium-heat-1s" => Mode::MediumHeat1s,
        "medium-heat-100ms" => Mode::MediumHeat100ms,
        "low-heat-1s" => Mode::LowHeat1s,
        "low-heat-100ms" => Mode::LowHeat100ms,
        _ => return Err(format!("unrecognised mode '{}'", s)),
    };

    Ok(mode)
}

fn main() {
    // Load options
    let opts = Options::from_args();

    // Setup logging
    TermLogger::init(opts.level, simplelog::Config::default()).unwrap();

    debug!("Connecting to I2C device");
    let i2c = match I2cdev::new(&opts.i2c) {
        Ok(v) => v,
        Err(e) => {
            error!("Error opening I2C device '{}': {:?}", &opts.i2c, e);
            std::process::exit(-1);
        }
    };

    debug!("Connecting to SHT4x");
    let mut sensor = match Sht4x::new_with_address(i2c, Delay {}, opts.address) {
        Ok(v) => v,
        Err(e) => {
            error!("Error connecting to SHT4x: {:?}", e);
            std::process::exit(-2);
        }
    };

    if let Err(e) = sensor.set_mode(opts.mode) {
        error!("Error setting measurement mode: {:?}", e);
        std::process::exit(-3);
    }

    match opts.command {
        Command::Read => match sensor.measure() {
            Ok(m) => info!("Temperature: {:.2} C, Humidity: {:.2} %", m.temp, m.rh),
            Err(e) => {
                error!("Error reading sensor data: {:?}", e);
                std::process::exit(-4);
            }
        },
        Command::Reset => {
            if let Err(e) = sensor.soft_reset() {
                error!("Error resetting sensor: {:?}", e);
                std::process::exit(-4);
            }
            info!("Sensor reset");
        }
        Command::Serial => match sensor.serial_number() {
            Ok(serial) => info!("Serial number: {:#010x}", serial),
            Err(e) => {
                error!("Error reading serial number: {:?}", e);
                std::process::exit(-4);
            }
        },
        Command::Monitor {
            period,
            allowed_errors,
        } => {
            debug!("Starting sensor polling");

            let mut errors = 0;
            loop {
                match sensor.measure() {
                    Ok(m) => {
                        errors = 0;
                        info!("Temperature: {:.2} C, Humidity: {:.2} %", m.temp, m.rh);
                    }
                    Err(e) => {
                        warn!("Error reading sensor data: {:?}", e);
                        errors += 1;
                    }
                }

                if errors > allowed_errors {
                    error!("Exceeded maximum allowed I2C errors");
                    std::process::exit(-5);
                }

                // Wait for enough time for another sensor reading
                std::thread::sleep(*period);
            }
        }
    }

    // Hand the bus handle back before exiting
    let _ = sensor.close();
}
