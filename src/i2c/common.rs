// Licensed under the Apache-2.0 license

//! Common types and constants for the Wire driver modules.
//!
//! This module provides shared definitions for error handling, bus configuration,
//! peripheral command codes, and slave events used across the driver implementation.

use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};
use fugit::HertzU32;

/// Capacity of the transmit and receive ring buffers.
pub const BUFFER_LENGTH: usize = 256;

/// Default master clock.
pub const TWI_CLOCK: HertzU32 = HertzU32::from_raw(100_000);

/// Byte clocked out by a slave when the master reads past the prepared response.
pub const SLAVE_FILLER: u8 = 0xFF;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum WireSpeed {
    Standard = 100_000,
    Fast = 400_000,
    FastPlus = 1_000_000,
}

impl WireSpeed {
    #[must_use]
    pub const fn hertz(self) -> HertzU32 {
        HertzU32::from_raw(self as u32)
    }
}

/// Direction flag carried in the address byte.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Direction {
    Write = 0,
    Read = 1,
}

/// Command codes written to the peripheral's command field.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum MasterCommand {
    /// Not issued by the driver; listed so `SercomWire` implementors can map every code.
    NoAction = 0,
    /// Not issued by the driver; a repeated start is a new `start_transmission`.
    RepeatStart = 1,
    /// Acknowledge and clock in the next byte.
    Read = 2,
    /// Issue a stop condition; in slave mode, execute the prepared ACK/NACK.
    Stop = 3,
}

/// Hardware conditions a slave reacts to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum SlaveEvent {
    AddressMatch,
    DataReady,
    StopDetected,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WireRole {
    Master,
    Slave { address: u8, general_call: bool },
}

/// Snapshot of the driver state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WireStatus {
    /// Role applied by the last `begin`, `None` before `begin` or after `end`
    pub role: Option<WireRole>,
    pub transmission_begun: bool,
    pub rx_buffer_count: usize,
    pub tx_buffer_count: usize,
    pub last_event: Option<SlaveEvent>,
}

/// Failures reported by a master transmission.
///
/// Discriminants are the status bytes Arduino sketches expect from `endTransmission`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Error {
    DataTooLong = 1,
    AddressNack = 2,
    DataNack = 3,
    Other = 4,
}

impl Error {
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Integer view of a transmission result: 0 on success, the error code otherwise.
#[must_use]
pub fn status_code(result: &Result<(), Error>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(e) => e.code(),
    }
}

impl embedded_hal::i2c::Error for Error {
    fn kind(&self) -> ErrorKind {
        match self {
            Error::AddressNack => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address),
            Error::DataNack => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data),
            Error::DataTooLong => ErrorKind::Overrun,
            Error::Other => ErrorKind::Other,
        }
    }
}

pub struct WireConfig {
    pub role: WireRole,
    pub speed: WireSpeed,
}

impl Default for WireConfig {
    fn default() -> Self {
        WireConfigBuilder::new().build()
    }
}

pub struct WireConfigBuilder {
    role: WireRole,
    speed: WireSpeed,
}

impl Default for WireConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl WireConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            role: WireRole::Master,
            speed: WireSpeed::Standard,
        }
    }
    #[must_use]
    pub fn role(mut self, role: WireRole) -> Self {
        self.role = role;
        self
    }
    #[must_use]
    pub fn slave(self, address: u8, general_call: bool) -> Self {
        self.role(WireRole::Slave {
            address,
            general_call,
        })
    }
    #[must_use]
    pub fn speed(mut self, speed: WireSpeed) -> Self {
        self.speed = speed;
        self
    }
    #[must_use]
    pub fn build(self) -> WireConfig {
        WireConfig {
            role: self.role,
            speed: self.speed,
        }
    }
}
