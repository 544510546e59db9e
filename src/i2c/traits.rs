// Licensed under the Apache-2.0 license

//! # Wire collaborator traits
//!
//! The driver in [`crate::i2c::wire`] owns no registers. It talks to the
//! hardware through the traits below, which keeps the protocol logic testable
//! on the host and lets each board supply its own SERCOM and pin routing.
//!
//! ```text
//! SercomWire   (SERCOM peripheral in I2C mode: init, start, byte I/O, status flags)
//! PinMux       (route the data/clock pins to the SERCOM function)
//! ReceiveHandler / RequestHandler   (application callbacks for slave mode)
//! ```

use crate::i2c::buffer::{ReceivedBytes, ResponseWriter};
use crate::i2c::common::{Direction, MasterCommand, BUFFER_LENGTH};
use fugit::HertzU32;

/// SERCOM peripheral operated in two-wire mode.
///
/// Implementations are synchronous and register-backed. Master operations
/// that wait on the bus (`start_transmission`, `send_data_master`,
/// `read_data`) busy-wait until the hardware reports completion; there is
/// no timeout at this layer.
pub trait SercomWire {
    /// Configure the peripheral as bus master at the given clock.
    fn init_master(&mut self, baud: HertzU32);

    /// Configure the peripheral as a slave answering `address`.
    fn init_slave(&mut self, address: u8, general_call: bool);

    fn enable(&mut self);

    fn disable(&mut self);

    /// Issue a start condition and send `address` with the direction bit.
    ///
    /// Returns `false` if the address was not acknowledged.
    fn start_transmission(&mut self, address: u8, direction: Direction) -> bool;

    /// Send one byte as master. Returns `false` on NACK.
    fn send_data_master(&mut self, byte: u8) -> bool;

    /// Load one byte for the master to clock out. Returns `false` if the
    /// master NACKed the previous byte.
    fn send_data_slave(&mut self, byte: u8) -> bool;

    /// Read the data register, waiting for a byte in master mode.
    fn read_data(&mut self) -> u8;

    fn prepare_ack_bit(&mut self);

    fn prepare_nack_bit(&mut self);

    fn prepare_command_bits(&mut self, command: MasterCommand);

    fn is_slave(&self) -> bool;

    fn is_master_read_operation(&self) -> bool;

    fn is_address_match(&self) -> bool;

    fn is_restart_detected(&self) -> bool;

    fn is_stop_detected(&self) -> bool;

    fn is_data_ready(&self) -> bool;
}

/// Pin function selection for the bus lines.
pub trait PinMux {
    /// Switch `pin` to its SERCOM peripheral function.
    fn route_to_sercom(&mut self, pin: u8);
}

/// Called when a master has finished writing to this slave.
///
/// `count` is the number of buffered bytes at the stop or repeated start.
/// Whatever the handler leaves unread is discarded when it returns.
pub trait ReceiveHandler {
    fn on_receive(&mut self, rx: &mut ReceivedBytes<'_, BUFFER_LENGTH>, count: usize);
}

/// Called when a master addresses this slave for reading.
///
/// The handler queues the response through `tx` before returning; anything
/// the master reads beyond it is padded with the filler byte.
pub trait RequestHandler {
    fn on_request(&mut self, tx: &mut ResponseWriter<'_, BUFFER_LENGTH>);
}

impl<F> ReceiveHandler for F
where
    F: FnMut(&mut ReceivedBytes<'_, BUFFER_LENGTH>, usize),
{
    fn on_receive(&mut self, rx: &mut ReceivedBytes<'_, BUFFER_LENGTH>, count: usize) {
        self(rx, count);
    }
}

impl<F> RequestHandler for F
where
    F: FnMut(&mut ResponseWriter<'_, BUFFER_LENGTH>),
{
    fn on_request(&mut self, tx: &mut ResponseWriter<'_, BUFFER_LENGTH>) {
        self(tx);
    }
}
