//! Base communication implementation for interacting with Sht4x devices
//!
//! Copyright 2019 Ryan Kurte

use core::fmt::Debug;

use embedded_hal::blocking::i2c;
use log::trace;

use crate::device::*;
use crate::Error;

/// Base API for reading and writing to the device
/// This should not be required by consumers, but is exposed to support alternate use
pub trait Base<Err> {
    /// Write a single command byte to the device
    fn write_command(&mut self, address: u8, command: u8) -> Result<(), Error<Err>>;
    /// Read a response frame back from the device
    fn read_frame(&mut self, address: u8, frame: &mut [u8]) -> Result<(), Error<Err>>;
}

/// CRC-8 lookup table, one remainder per byte value.
/// Built once from the device polynomial and shared by every checksum.
static CRC_TABLE: [u8; 256] = crc_table(CRC_POLY);

const fn crc_table(poly: u8) -> [u8; 256] {
    let mut table = [0u8; 256];

    let mut value = 0;
    while value < 256 {
        let mut crc = value as u8;

        // For each bit
        let mut bit = 0;
        while bit < 8 {
            if crc & 0x80 != 0 {
                crc = (crc << 1) ^ poly;
            } else {
                crc = crc << 1;
            }
            bit += 1;
        }

        table[value] = crc;
        value += 1;
    }

    table
}

/// Helper for device CRC-8 calculation
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc = CRC_INIT;

    // For each byte, fold in the table remainder
    for v in data {
        crc = CRC_TABLE[(crc ^ v) as usize];
    }

    // Apply final xor
    crc ^ CRC_XOR
}

/// Base implementation for I2C devices
impl<Conn, Err> Base<Err> for Conn
where
    Conn: i2c::Read<Error = Err> + i2c::Write<Error = Err>,
    Err: Debug,
{
    fn write_command(&mut self, address: u8, command: u8) -> Result<(), Error<Err>> {
        trace!("Writing command: {:#04x}", command);

        self.write(address, &[command]).map_err(|e| Error::Conn(e))
    }

    fn read_frame(&mut self, address: u8, frame: &mut [u8]) -> Result<(), Error<Err>> {
        self.read(address, frame).map_err(|e| Error::Conn(e))?;

        trace!("Read frame: {:x?}", frame);

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_crc() {
        // Test vectors from datasheet
        let tests = &[
            ([0xbe, 0xef], 0x92),
            ([0x00, 0x00], 0x81),
            ([0x43, 0xDB], 0xCB),
        ];

        for t in tests {
            let v = crc8(&t.0);
            assert_eq!(v, t.1);
        }
    }

    #[test]
    fn test_crc_table() {
        // A single byte folds to exactly one table lookup
        for b in 0..=255u8 {
            assert_eq!(crc8(&[b]), CRC_TABLE[(CRC_INIT ^ b) as usize]);
        }

        // Byte value zero has no set bits to divide
        assert_eq!(CRC_TABLE[0], 0x00);

        // Rebuilding from the same polynomial is a no-op
        assert_eq!(crc_table(CRC_POLY), CRC_TABLE);
    }
}
