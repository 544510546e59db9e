// Licensed under the Apache-2.0 license

//! Two-wire ("Wire") bus support.
//!
//! Master and slave operation over a SERCOM peripheral, with the Arduino
//! `Wire` call surface on [`TwoWire`] and an embedded-hal front end in
//! [`I2cController`]. Register access stays behind the [`SercomWire`] trait.

pub mod buffer;
pub mod common;
pub mod i2c_controller;
pub mod registration;
pub mod traits;
pub mod wire;

pub use buffer::{ReceivedBytes, ResponseWriter, RingBuffer};
pub use common::{
    status_code, Direction, Error, MasterCommand, SlaveEvent, WireConfig, WireConfigBuilder,
    WireRole, WireSpeed, WireStatus, BUFFER_LENGTH, SLAVE_FILLER, TWI_CLOCK,
};
pub use i2c_controller::I2cController;
pub use registration::SharedWire;
pub use traits::{PinMux, ReceiveHandler, RequestHandler, SercomWire};
pub use wire::TwoWire;
