// Licensed under the Apache-2.0 license

//! # Interrupt registration for Wire buses
//!
//! The driver itself is an ordinary owned value. Interrupt vectors, however,
//! are free functions with no arguments, so each physical bus needs one place
//! the vector can find its driver. [`SharedWire`] is that place: a
//! `static`-friendly slot guarded by a critical section.
//!
//! ```rust,ignore
//! static WIRE: SharedWire<'static, BoardSercom, BoardPins> = SharedWire::new();
//!
//! fn main() {
//!     let mut wire = TwoWire::new(sercom, pins, PIN_WIRE_SDA, PIN_WIRE_SCL);
//!     wire.begin_slave(0x21, false);
//!     WIRE.install(wire);
//! }
//!
//! // Single-vector parts
//! fn sercom3_handler() {
//!     WIRE.service();
//! }
//!
//! // Parts with separate stop / address-match / data-ready vectors
//! fn sercom3_0_handler() { WIRE.stop_detected(); }
//! fn sercom3_1_handler() { WIRE.address_match(); }
//! fn sercom3_2_handler() { WIRE.data_ready(); }
//! ```
//!
//! Handlers run inside the critical section; calling back into the same
//! `SharedWire` from a handler panics on the re-borrow.

use crate::common::{Logger, NoOpLogger};
use crate::i2c::traits::{PinMux, SercomWire};
use crate::i2c::wire::TwoWire;
use core::cell::RefCell;
use critical_section::Mutex;

pub struct SharedWire<'a, S: SercomWire, P: PinMux, L: Logger = NoOpLogger> {
    inner: Mutex<RefCell<Option<TwoWire<'a, S, P, L>>>>,
}

impl<'a, S: SercomWire, P: PinMux, L: Logger> Default for SharedWire<'a, S, P, L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, S: SercomWire, P: PinMux, L: Logger> SharedWire<'a, S, P, L> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// Store `wire`, returning the driver it replaces.
    pub fn install(&self, wire: TwoWire<'a, S, P, L>) -> Option<TwoWire<'a, S, P, L>> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).replace(wire))
    }

    pub fn take(&self) -> Option<TwoWire<'a, S, P, L>> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).take())
    }

    #[must_use]
    pub fn is_installed(&self) -> bool {
        critical_section::with(|cs| self.inner.borrow_ref(cs).is_some())
    }

    /// Run `f` on the installed driver. Returns `None` if nothing is installed.
    pub fn with<R>(&self, f: impl FnOnce(&mut TwoWire<'a, S, P, L>) -> R) -> Option<R> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).as_mut().map(f))
    }

    /// Single-vector SERCOM interrupt.
    pub fn service(&self) {
        self.with(TwoWire::on_service);
    }

    pub fn stop_detected(&self) {
        self.with(TwoWire::on_stop_detected);
    }

    pub fn address_match(&self) {
        self.with(TwoWire::on_address_match);
    }

    pub fn data_ready(&self) {
        self.with(TwoWire::on_data_ready);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i2c::buffer::ResponseWriter;
    use crate::i2c::common::{SlaveEvent, BUFFER_LENGTH, SLAVE_FILLER};
    use crate::i2c::wire::mock::{MockPins, MockSercom};

    static WIRE: SharedWire<'static, MockSercom, MockPins> = SharedWire::new();

    fn slave_wire<'a>() -> TwoWire<'a, MockSercom, MockPins> {
        let mut wire = TwoWire::new(MockSercom::default(), MockPins::default(), 22, 23);
        wire.begin_slave(0x21, false);
        wire
    }

    #[test]
    fn test_vectors_are_noops_until_installed() {
        let shared: SharedWire<'_, MockSercom, MockPins> = SharedWire::new();
        assert!(!shared.is_installed());
        shared.service();
        shared.data_ready();
        assert_eq!(shared.with(|w| w.available()), None);
        assert!(shared.take().is_none());
    }

    #[test]
    fn test_static_slot_routes_vectors() {
        assert!(WIRE.install(slave_wire()).is_none());
        assert!(WIRE.is_installed());

        WIRE.with(|w| {
            w.sercom_mut().master_read = false;
            w.sercom_mut().incoming.push_back(0x5A);
        });
        WIRE.address_match();
        WIRE.data_ready();
        assert_eq!(WIRE.with(|w| w.available()), Some(1));

        WIRE.stop_detected();
        assert_eq!(
            WIRE.with(|w| (w.available(), w.last_event())),
            Some((0, Some(SlaveEvent::StopDetected)))
        );

        let wire = WIRE.take().unwrap();
        assert!(!WIRE.is_installed());
        assert_eq!(wire.sercom().incoming.len(), 0);
    }

    #[test]
    fn test_service_dispatches_request() {
        let mut handler = |tx: &mut ResponseWriter<'_, BUFFER_LENGTH>| {
            tx.write(0x42);
        };
        let shared = SharedWire::new();
        let mut wire = slave_wire();
        wire.on_request(Some(&mut handler));
        wire.sercom_mut().master_read = true;
        wire.sercom_mut().raise(true, false, false);
        shared.install(wire);

        shared.service();
        shared.with(|w| w.sercom_mut().raise(false, true, false));
        shared.service();
        shared.service();

        let sent = shared.with(|w| w.sercom().sent_slave.clone());
        assert_eq!(sent, Some(vec![0x42, SLAVE_FILLER]));
    }

    #[test]
    fn test_install_replaces_previous() {
        let shared = SharedWire::new();
        shared.install(slave_wire());
        let previous = shared.install(slave_wire());
        assert!(previous.is_some());
    }
}
