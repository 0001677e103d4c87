
//#![no_std]

use core::fmt::Debug;
use core::marker::PhantomData;

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::i2c;

pub mod base;
pub mod device;

use crate::base::{crc8, Base};
pub use crate::device::*;

/// Sht4x sensor object
/// This is generic over an I2C connector, a delay provider and associated error type
pub struct Sht4x<Conn, Delay, Err> {
    conn: Option<Conn>,
    delay: Delay,
    address: u8,
    mode: Mode,
    _err: PhantomData<Err>,
}

/// Sht4x error object
#[derive(Debug)]
pub enum Error<ConnErr> {
    /// Underlying bus error
    Conn(ConnErr),
    /// A word failed checksum validation
    /// `expected` is the locally computed CRC, `actual` the received byte
    Crc {
        field: Field,
        expected: u8,
        actual: u8,
    },
    /// A response frame had the wrong byte count
    Frame { expected: usize, actual: usize },
    /// No plausible device answered the probe
    NoDevice,
    /// Operation on a closed session
    Closed,
}

impl<ConnErr> From<ConnErr> for Error<ConnErr> {
    fn from(conn_err: ConnErr) -> Self {
        Error::Conn(conn_err)
    }
}

/// Frame word identity, reported with checksum failures
#[derive(PartialEq, Clone, Copy, Debug)]
pub enum Field {
    Temperature,
    Humidity,
    Serial,
}

/// Sht4x measurement object
/// Values are the sensor's linear conversions of the raw words; readings
/// slightly outside the physical range are possible at the measurement
/// boundaries and are not clamped here
#[derive(PartialEq, Clone, Debug)]
pub struct Measurement {
    /// Temperature in degrees celsius
    /// Range: -45 - 130 C
    pub temp: f32,
    /// Relative Humidity (%)
    /// Range: 0 - 100
    pub rh: f32,
}

impl<Conn, Delay, Err> Sht4x<Conn, Delay, Err>
where
    Conn: i2c::Read<Error = Err> + i2c::Write<Error = Err>,
    Delay: DelayMs<u16>,
    Err: Debug,
{
    /// Create a new Sht4x sensor instance on the default address
    pub fn new(conn: Conn, delay: Delay) -> Result<Self, Error<Err>> {
        Self::new_with_address(conn, delay, DEFAULT_ADDRESS)
    }

    /// Create a new Sht4x sensor instance on the provided address.
    /// The device is probed via its serial number; on failure the connector
    /// is dropped, releasing the bus.
    pub fn new_with_address(conn: Conn, delay: Delay, address: u8) -> Result<Self, Error<Err>> {
        // Create sensor object, defaulting to no-heat high repeatability
        let mut s = Sht4x {
            conn: Some(conn),
            delay,
            address,
            mode: Mode::NoHeatHighPrecision,
            _err: PhantomData,
        };

        // Check communication
        let serial = s.serial_number()?;
        if serial == 0x0000_0000 || serial == 0xFFFF_FFFF {
            return Err(Error::NoDevice);
        }

        // Return sensor
        Ok(s)
    }

    /// Measurement mode used by `measure`
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Select the measurement mode for subsequent `measure` calls.
    /// No command is issued until the next measurement.
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), Error<Err>> {
        if self.conn.is_none() {
            return Err(Error::Closed);
        }

        self.mode = mode;

        Ok(())
    }

    /// Soft reset the underlying device
    /// The sensor accepts no commands for SOFT_RESET_DELAY_MS afterwards;
    /// waiting that out is left to the caller
    pub fn soft_reset(&mut self) -> Result<(), Error<Err>> {
        let address = self.address;
        let conn = self.conn.as_mut().ok_or(Error::Closed)?;

        conn.write_command(address, Command::SoftReset as u8)
    }

    /// Read the 32-bit device serial number
    pub fn serial_number(&mut self) -> Result<u32, Error<Err>> {
        let address = self.address;
        let conn = self.conn.as_mut().ok_or(Error::Closed)?;

        conn.write_command(address, Command::ReadSerialNumber as u8)?;

        self.delay.delay_ms(SERIAL_DELAY_MS);

        let mut frame = [0u8; FRAME_SIZE];
        conn.read_frame(address, &mut frame)?;

        let high = Self::word(&frame[0..3], Field::Serial)?;
        let low = Self::word(&frame[3..6], Field::Serial)?;

        Ok((high as u32) << 16 | low as u32)
    }

    /// Trigger a measurement and read back the checked result.
    /// Blocks for the active mode's conversion time (never less than 10ms)
    /// between the command write and the frame read.
    pub fn measure(&mut self) -> Result<Measurement, Error<Err>> {
        let address = self.address;
        let mode = self.mode;
        let conn = self.conn.as_mut().ok_or(Error::Closed)?;

        // Trigger a conversion
        conn.write_command(address, mode as u8)?;

        // The sensor NAKs everything until the conversion completes
        self.delay.delay_ms(mode.delay_ms());

        let mut frame = [0u8; FRAME_SIZE];
        conn.read_frame(address, &mut frame)?;

        Self::decode(&frame)
    }

    /// Close the session, returning the bus connector.
    /// The connector is handed back exactly once; dropping it (or an
    /// unclosed session) releases the underlying handle. Any later call on
    /// this object, including a second close, fails with `Error::Closed`.
    pub fn close(&mut self) -> Result<Conn, Error<Err>> {
        self.conn.take().ok_or(Error::Closed)
    }

    /// Decode a measurement frame into physical units
    fn decode(frame: &[u8]) -> Result<Measurement, Error<Err>> {
        // Frames MUST be 6 bytes long (T MSB, T LSB, CRC, RH MSB, RH LSB, CRC)
        if frame.len() != FRAME_SIZE {
            return Err(Error::Frame {
                expected: FRAME_SIZE,
                actual: frame.len(),
            });
        }

        // Temperature is validated first, humidity second; a value is only
        // built once both checksums have passed
        let raw_temp = Self::word(&frame[0..3], Field::Temperature)?;
        let raw_rh = Self::word(&frame[3..6], Field::Humidity)?;

        Ok(Measurement {
            temp: -45.0 + 175.0 * (raw_temp as f32 / 65535.0),
            rh: 100.0 * (raw_rh as f32 / 65535.0),
        })
    }

    /// Validate one word + checksum group and return the word
    fn word(group: &[u8], field: Field) -> Result<u16, Error<Err>> {
        let crc = crc8(&group[0..2]);
        if crc != group[2] {
            return Err(Error::Crc {
                field,
                expected: crc,
                actual: group[2],
            });
        }

        Ok(u16::from_be_bytes([group[0], group[1]]))
    }
}
