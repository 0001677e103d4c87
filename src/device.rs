//! Sht4x device definitions
//!
//! Copyright 2019 Ryan Kurte


/// Sht4x default I2C address
/// (-A parts; -B parts answer on 0x45 instead)
pub const DEFAULT_ADDRESS: u8 = 0x44;

pub const CRC_POLY: u8 = 0x31;
pub const CRC_INIT: u8 = 0xff;
pub const CRC_XOR: u8 = 0x00;

/// Measurement and serial responses are always this many bytes:
/// two big endian u16 words, each followed by its CRC-8
pub const FRAME_SIZE: usize = 6;

/// Conversion wait for the no-heater modes, covering the slowest
/// (high repeatability) conversion
pub const MEASURE_DELAY_MS: u16 = 10;

/// Conversion wait for the ~100ms heater pulse modes
pub const HEAT_100MS_DELAY_MS: u16 = 110;

/// Conversion wait for the ~1s heater pulse modes
pub const HEAT_1S_DELAY_MS: u16 = 1100;

/// Wait before the serial number response may be read back
pub const SERIAL_DELAY_MS: u16 = 1;

/// Time the sensor needs after a soft reset before it accepts further
/// commands. The driver does not block for this itself.
pub const SOFT_RESET_DELAY_MS: u16 = 1;

/// Sht4x control commands
/// Every command is a single byte written verbatim to the device
#[derive(PartialEq, Clone, Copy, Debug)]
pub enum Command {
    /// Soft reset the device
    /// The sensor is unresponsive for SOFT_RESET_DELAY_MS afterwards
    SoftReset = 0x94,

    /// Read the 32-bit device serial number
    /// The response reuses the measurement frame layout
    ReadSerialNumber = 0x89,
}

/// Sht4x single-shot measurement commands
/// Each selects a repeatability level and, optionally, a heater pulse.
/// The heater commands measure at high repeatability just before the
/// heater switches off.
#[derive(PartialEq, Clone, Copy, Debug)]
pub enum Mode {
    /// High repeatability measurement, no heater
    NoHeatHighPrecision = 0xFD,

    /// Medium repeatability measurement, no heater
    NoHeatMediumPrecision = 0xF6,

    /// Low repeatability measurement, no heater
    NoHeatLowPrecision = 0xE0,

    /// 200mW heater pulse for ~1s, then measure
    HighHeat1s = 0x39,

    /// 200mW heater pulse for ~100ms, then measure
    HighHeat100ms = 0x3A,

    /// 110mW heater pulse for ~1s, then measure
    MediumHeat1s = 0x32,

    /// 110mW heater pulse for ~100ms, then measure
    MediumHeat100ms = 0x33,

    /// 20mW heater pulse for ~1s, then measure
    LowHeat1s = 0x2F,

    /// 20mW heater pulse for ~100ms, then measure
    LowHeat100ms = 0x30,
}

impl Mode {
    /// Conversion wait for this mode, command write to frame read.
    /// The no-heater modes share the 10ms wait regardless of repeatability;
    /// the heater modes extend it to cover the heater pulse.
    pub fn delay_ms(&self) -> u16 {
        match self {
            Mode::NoHeatHighPrecision
            | Mode::NoHeatMediumPrecision
            | Mode::NoHeatLowPrecision => MEASURE_DELAY_MS,
            Mode::HighHeat100ms | Mode::MediumHeat100ms | Mode::LowHeat100ms => {
                HEAT_100MS_DELAY_MS
            }
            Mode::HighHeat1s | Mode::MediumHeat1s | Mode::LowHeat1s => HEAT_1S_DELAY_MS,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_mode_delays() {
        let tests = &[
            (Mode::NoHeatHighPrecision, 10),
            (Mode::NoHeatMediumPrecision, 10),
            (Mode::NoHeatLowPrecision, 10),
            (Mode::HighHeat100ms, 110),
            (Mode::MediumHeat100ms, 110),
            (Mode::LowHeat100ms, 110),
            (Mode::HighHeat1s, 1100),
            (Mode::MediumHeat1s, 1100),
            (Mode::LowHeat1s, 1100),
        ];

        for (mode, delay) in tests {
            assert_eq!(mode.delay_ms(), *delay);
        }
    }

    #[test]
    fn test_command_bytes() {
        assert_eq!(Command::SoftReset as u8, 0x94);
        assert_eq!(Command::ReadSerialNumber as u8, 0x89);

        let modes = &[
            (Mode::NoHeatHighPrecision, 0xFD),
            (Mode::NoHeatMediumPrecision, 0xF6),
            (Mode::NoHeatLowPrecision, 0xE0),
            (Mode::HighHeat1s, 0x39),
            (Mode::HighHeat100ms, 0x3A),
            (Mode::MediumHeat1s, 0x32),
            (Mode::MediumHeat100ms, 0x33),
            (Mode::LowHeat1s, 0x2F),
            (Mode::LowHeat100ms, 0x30),
        ];

        for (mode, value) in modes {
            assert_eq!(*mode as u8, *value);
        }
    }
}
