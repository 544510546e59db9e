// Licensed under the Apache-2.0 license

//! Arduino-style `Wire` bus driver.
//!
//! [`TwoWire`] multiplexes the two roles a SERCOM can take on the bus:
//!
//! * **Master**: blocking `begin_transmission` / `write` / `end_transmission`
//!   and `request_from` calls that poll the peripheral until each phase completes.
//! * **Slave**: interrupt-driven. The platform forwards hardware conditions to
//!   [`TwoWire::handle_slave_event`] (or one of the per-generation entry points)
//!   and the driver answers them, calling back into the registered
//!   [`ReceiveHandler`] / [`RequestHandler`].
//!
//! Both roles share one transmit and one receive ring buffer. No locking is
//! done here; the bus is configured for one role at a time, and master calls
//! must not run while slave events for the same instance are being serviced.

use crate::common::{Logger, NoOpLogger};
use crate::i2c::buffer::{queue_byte, queue_bytes, ReceivedBytes, ResponseWriter, RingBuffer};
use crate::i2c::common::{
    Direction, Error, MasterCommand, SlaveEvent, WireConfig, WireRole, WireStatus,
    BUFFER_LENGTH, SLAVE_FILLER,
};
use crate::i2c::traits::{PinMux, ReceiveHandler, RequestHandler, SercomWire};
use fugit::HertzU32;

pub struct TwoWire<'a, S: SercomWire, P: PinMux, L: Logger = NoOpLogger> {
    sercom: S,
    pins: P,
    pin_sda: u8,
    pin_scl: u8,
    logger: L,
    rx: RingBuffer<BUFFER_LENGTH>,
    tx: RingBuffer<BUFFER_LENGTH>,
    tx_address: u8,
    /// Outbound bytes are being accumulated; `write` is refused otherwise.
    transmission_begun: bool,
    role: Option<WireRole>,
    last_event: Option<SlaveEvent>,
    on_receive: Option<&'a mut (dyn ReceiveHandler + Send)>,
    on_request: Option<&'a mut (dyn RequestHandler + Send)>,
}

impl<'a, S: SercomWire, P: PinMux> TwoWire<'a, S, P, NoOpLogger> {
    pub fn new(sercom: S, pins: P, pin_sda: u8, pin_scl: u8) -> Self {
        Self::with_logger(sercom, pins, pin_sda, pin_scl, NoOpLogger)
    }
}

impl<'a, S: SercomWire, P: PinMux, L: Logger> TwoWire<'a, S, P, L> {
    pub fn with_logger(sercom: S, pins: P, pin_sda: u8, pin_scl: u8, logger: L) -> Self {
        Self {
            sercom,
            pins,
            pin_sda,
            pin_scl,
            logger,
            rx: RingBuffer::new(),
            tx: RingBuffer::new(),
            tx_address: 0,
            transmission_begun: false,
            role: None,
            last_event: None,
            on_receive: None,
            on_request: None,
        }
    }

    /// Join the bus as master at the default clock.
    pub fn begin(&mut self) {
        self.begin_with(&WireConfig::default());
    }

    /// Join the bus as a slave answering `address`.
    pub fn begin_slave(&mut self, address: u8, general_call: bool) {
        self.begin_with(&WireConfig {
            role: WireRole::Slave {
                address,
                general_call,
            },
            ..WireConfig::default()
        });
    }

    /// Configure the peripheral for `config.role`, enable it and route the bus pins.
    ///
    /// May be called again to switch roles.
    pub fn begin_with(&mut self, config: &WireConfig) {
        match config.role {
            WireRole::Master => {
                self.sercom.init_master(config.speed.hertz());
                self.logger.debug("wire: begin master");
            }
            WireRole::Slave {
                address,
                general_call,
            } => {
                self.sercom.init_slave(address, general_call);
                self.logger.debug("wire: begin slave");
            }
        }
        self.sercom.enable();

        self.pins.route_to_sercom(self.pin_sda);
        self.pins.route_to_sercom(self.pin_scl);

        self.role = Some(config.role);
    }

    /// Re-initialise the peripheral as master at `baud`.
    pub fn set_clock(&mut self, baud: HertzU32) {
        self.sercom.disable();
        self.sercom.init_master(baud);
        self.sercom.enable();
        self.role = Some(WireRole::Master);
        self.logger.debug("wire: clock changed");
    }

    pub fn end(&mut self) {
        self.sercom.disable();
        self.role = None;
        self.logger.debug("wire: end");
    }

    /// Read up to `quantity` bytes from `address` into the receive buffer.
    ///
    /// Returns the number of bytes read: 0 when `quantity` is 0 or the address is
    /// not acknowledged, otherwise `quantity` clamped to the buffer capacity.
    /// With `stop` false the bus is kept for a repeated start.
    pub fn request_from(&mut self, address: u8, quantity: usize, stop: bool) -> usize {
        if quantity == 0 {
            return 0;
        }
        let quantity = quantity.min(self.rx.capacity());

        self.rx.clear();

        if !self.sercom.start_transmission(address, Direction::Read) {
            self.logger.error("wire: address nack on read");
            return 0;
        }

        self.rx.store(self.sercom.read_data());

        let mut bytes_read = 1;
        while bytes_read < quantity {
            // ACK must be armed before the peripheral clocks out the next byte.
            self.sercom.prepare_ack_bit();
            self.sercom.prepare_command_bits(MasterCommand::Read);
            self.rx.store(self.sercom.read_data());
            bytes_read += 1;
        }
        self.sercom.prepare_nack_bit();

        if stop {
            self.sercom.prepare_command_bits(MasterCommand::Stop);
        }

        bytes_read
    }

    /// Start buffering a write to `address`, discarding any unsent bytes.
    pub fn begin_transmission(&mut self, address: u8) {
        self.tx_address = address;
        self.tx.clear();
        self.transmission_begun = true;
    }

    /// Send the buffered bytes to the address given to `begin_transmission`.
    ///
    /// # Errors
    ///
    /// * [`Error::AddressNack`] if the address phase is not acknowledged.
    /// * [`Error::DataNack`] on the first data byte the target rejects.
    ///
    /// A stop condition is forced on either error.
    pub fn end_transmission(&mut self, stop: bool) -> Result<(), Error> {
        // Cleared up front: the flag marks the buffering window, not the bus transfer.
        self.transmission_begun = false;

        if !self
            .sercom
            .start_transmission(self.tx_address, Direction::Write)
        {
            self.sercom.prepare_command_bits(MasterCommand::Stop);
            self.logger.error("wire: address nack on write");
            return Err(Error::AddressNack);
        }

        while let Some(byte) = self.tx.read() {
            if !self.sercom.send_data_master(byte) {
                self.sercom.prepare_command_bits(MasterCommand::Stop);
                self.logger.error("wire: data nack");
                return Err(Error::DataNack);
            }
        }

        if stop {
            self.sercom.prepare_command_bits(MasterCommand::Stop);
        }

        self.logger.debug("wire: transmission complete");
        Ok(())
    }

    /// Drop the buffered bytes and close the transmission without touching the bus.
    pub(crate) fn abort_transmission(&mut self) {
        self.tx.clear();
        self.transmission_begun = false;
    }

    /// Queue one byte for the current transmission.
    ///
    /// Returns 1 if queued, 0 if no transmission is open or the buffer is full.
    pub fn write(&mut self, byte: u8) -> usize {
        queue_byte(self.transmission_begun, &mut self.tx, byte)
    }

    /// Queue bytes until the first one refused. Returns how many were queued.
    pub fn write_bytes(&mut self, data: &[u8]) -> usize {
        queue_bytes(self.transmission_begun, &mut self.tx, data)
    }

    #[must_use]
    pub fn available(&self) -> usize {
        self.rx.available()
    }

    /// Next received byte, `None` once the receive buffer is drained.
    pub fn read(&mut self) -> Option<u8> {
        self.rx.read()
    }

    #[must_use]
    pub fn peek(&self) -> Option<u8> {
        self.rx.peek()
    }

    /// No-op. Bytes only go out through `end_transmission`.
    pub fn flush(&mut self) {}

    /// Register the slave receive handler; `None` removes it.
    pub fn on_receive(&mut self, handler: Option<&'a mut (dyn ReceiveHandler + Send)>) {
        self.on_receive = handler;
    }

    /// Register the slave request handler; `None` removes it.
    pub fn on_request(&mut self, handler: Option<&'a mut (dyn RequestHandler + Send)>) {
        self.on_request = handler;
    }

    /// React to one slave-mode hardware condition.
    ///
    /// Handlers run to completion before the condition is acknowledged to the
    /// peripheral. Must be called from the context the platform delivers SERCOM
    /// interrupts in; nothing here blocks.
    pub fn handle_slave_event(&mut self, event: SlaveEvent) {
        if !self.sercom.is_slave() {
            return;
        }
        self.last_event = Some(event);

        match event {
            SlaveEvent::StopDetected => {
                self.complete_receive();
                self.acknowledge_slave();
            }
            SlaveEvent::AddressMatch => {
                if self.sercom.is_master_read_operation() {
                    self.tx.clear();
                    self.transmission_begun = true;

                    if let Some(handler) = self.on_request.as_deref_mut() {
                        handler.on_request(&mut ResponseWriter::new(
                            &mut self.tx,
                            self.transmission_begun,
                        ));
                    }
                } else if self.sercom.is_restart_detected() {
                    // Repeated start ends the previous write without a stop.
                    self.complete_receive();
                }
                self.acknowledge_slave();
            }
            SlaveEvent::DataReady => {
                if self.sercom.is_master_read_operation() {
                    let byte = self.tx.read().unwrap_or(SLAVE_FILLER);
                    self.transmission_begun = self.sercom.send_data_slave(byte);
                } else {
                    if self.rx.is_full() {
                        self.sercom.prepare_nack_bit();
                    } else {
                        let byte = self.sercom.read_data();
                        self.rx.store(byte);
                        self.sercom.prepare_ack_bit();
                    }
                    self.sercom.prepare_command_bits(MasterCommand::Stop);
                }
            }
        }
    }

    /// Single-vector entry point: decode the pending condition from the status flags.
    pub fn on_service(&mut self) {
        if !self.sercom.is_slave() {
            return;
        }

        let event = if self.sercom.is_stop_detected() {
            SlaveEvent::StopDetected
        } else if self.sercom.is_address_match() {
            SlaveEvent::AddressMatch
        } else if self.sercom.is_data_ready() {
            SlaveEvent::DataReady
        } else {
            return;
        };

        self.handle_slave_event(event);
    }

    pub fn on_stop_detected(&mut self) {
        self.handle_slave_event(SlaveEvent::StopDetected);
    }

    pub fn on_address_match(&mut self) {
        self.handle_slave_event(SlaveEvent::AddressMatch);
    }

    pub fn on_data_ready(&mut self) {
        self.handle_slave_event(SlaveEvent::DataReady);
    }

    #[must_use]
    pub fn last_event(&self) -> Option<SlaveEvent> {
        self.last_event
    }

    #[must_use]
    pub fn status(&self) -> WireStatus {
        WireStatus {
            role: self.role,
            transmission_begun: self.transmission_begun,
            rx_buffer_count: self.rx.available(),
            tx_buffer_count: self.tx.available(),
            last_event: self.last_event,
        }
    }

    #[must_use]
    pub fn pins(&self) -> (u8, u8) {
        (self.pin_sda, self.pin_scl)
    }

    #[must_use]
    pub fn sercom(&self) -> &S {
        &self.sercom
    }

    pub fn sercom_mut(&mut self) -> &mut S {
        &mut self.sercom
    }

    #[must_use]
    pub fn logger(&self) -> &L {
        &self.logger
    }

    /// Tear down the driver and hand back its collaborators.
    pub fn release(self) -> (S, P, L) {
        (self.sercom, self.pins, self.logger)
    }

    fn complete_receive(&mut self) {
        let count = self.rx.available();
        if let Some(handler) = self.on_receive.as_deref_mut() {
            handler.on_receive(&mut ReceivedBytes::new(&mut self.rx), count);
        }
        self.rx.clear();
    }

    fn acknowledge_slave(&mut self) {
        self.sercom.prepare_ack_bit();
        self.sercom.prepare_command_bits(MasterCommand::Stop);
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use crate::common::Logger;
    use crate::i2c::common::{Direction, MasterCommand};
    use crate::i2c::traits::{PinMux, SercomWire};
    use fugit::HertzU32;
    use std::collections::VecDeque;
    use std::string::String;
    use std::vec::Vec;

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum Call {
        InitMaster(u32),
        InitSlave(u8, bool),
        Enable,
        Disable,
        Start(u8, Direction),
        SendMaster(u8),
        SendSlave(u8),
        Read,
        Ack,
        Nack,
        Command(MasterCommand),
    }

    /// Scripted SERCOM. Master reads pop `incoming`; slave flags are set per event.
    pub struct MockSercom {
        pub calls: Vec<Call>,
        pub ack_address: bool,
        /// Index of the first master data byte the target NACKs
        pub nack_data_at: Option<usize>,
        pub incoming: VecDeque<u8>,
        pub sent_master: Vec<u8>,
        pub sent_slave: Vec<u8>,
        pub slave_send_ack: bool,
        pub slave: bool,
        pub master_read: bool,
        pub address_match: bool,
        pub restart: bool,
        pub stop: bool,
        pub data_ready: bool,
    }

    impl Default for MockSercom {
        fn default() -> Self {
            Self {
                calls: Vec::new(),
                ack_address: true,
                nack_data_at: None,
                incoming: VecDeque::new(),
                sent_master: Vec::new(),
                sent_slave: Vec::new(),
                slave_send_ack: true,
                slave: false,
                master_read: false,
                address_match: false,
                restart: false,
                stop: false,
                data_ready: false,
            }
        }
    }

    impl MockSercom {
        pub fn with_incoming(bytes: &[u8]) -> Self {
            Self {
                incoming: bytes.iter().copied().collect(),
                ..Self::default()
            }
        }

        pub fn slave() -> Self {
            Self {
                slave: true,
                ..Self::default()
            }
        }

        /// Raise exactly the given condition flags, clearing the rest.
        pub fn raise(&mut self, address_match: bool, data_ready: bool, stop: bool) {
            self.address_match = address_match;
            self.data_ready = data_ready;
            self.stop = stop;
        }

        pub fn commands(&self) -> Vec<MasterCommand> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Command(cmd) => Some(*cmd),
                    _ => None,
                })
                .collect()
        }
    }

    impl SercomWire for MockSercom {
        fn init_master(&mut self, baud: HertzU32) {
            self.calls.push(Call::InitMaster(baud.raw()));
        }

        fn init_slave(&mut self, address: u8, general_call: bool) {
            self.slave = true;
            self.calls.push(Call::InitSlave(address, general_call));
        }

        fn enable(&mut self) {
            self.calls.push(Call::Enable);
        }

        fn disable(&mut self) {
            self.calls.push(Call::Disable);
        }

        fn start_transmission(&mut self, address: u8, direction: Direction) -> bool {
            self.calls.push(Call::Start(address, direction));
            self.ack_address
        }

        fn send_data_master(&mut self, byte: u8) -> bool {
            self.calls.push(Call::SendMaster(byte));
            if self.nack_data_at == Some(self.sent_master.len()) {
                return false;
            }
            self.sent_master.push(byte);
            true
        }

        fn send_data_slave(&mut self, byte: u8) -> bool {
            self.calls.push(Call::SendSlave(byte));
            self.sent_slave.push(byte);
            self.slave_send_ack
        }

        fn read_data(&mut self) -> u8 {
            self.calls.push(Call::Read);
            self.incoming.pop_front().unwrap_or(0)
        }

        fn prepare_ack_bit(&mut self) {
            self.calls.push(Call::Ack);
        }

        fn prepare_nack_bit(&mut self) {
            self.calls.push(Call::Nack);
        }

        fn prepare_command_bits(&mut self, command: MasterCommand) {
            self.calls.push(Call::Command(command));
        }

        fn is_slave(&self) -> bool {
            self.slave
        }

        fn is_master_read_operation(&self) -> bool {
            self.master_read
        }

        fn is_address_match(&self) -> bool {
            self.address_match
        }

        fn is_restart_detected(&self) -> bool {
            self.restart
        }

        fn is_stop_detected(&self) -> bool {
            self.stop
        }

        fn is_data_ready(&self) -> bool {
            self.data_ready
        }
    }

    #[derive(Default)]
    pub struct MockPins {
        pub routed: Vec<u8>,
    }

    impl PinMux for MockPins {
        fn route_to_sercom(&mut self, pin: u8) {
            self.routed.push(pin);
        }
    }

    #[derive(Default)]
    pub struct RecordingLogger {
        pub debug: Vec<String>,
        pub error: Vec<String>,
    }

    impl Logger for RecordingLogger {
        fn debug(&mut self, msg: &str) {
            self.debug.push(msg.into());
        }

        fn error(&mut self, msg: &str) {
            self.error.push(msg.into());
        }
    }
}
