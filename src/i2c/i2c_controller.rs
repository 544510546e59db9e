// Licensed under the Apache-2.0 license

//! embedded-hal front end for the Wire driver.
//!
//! Wraps a master-mode [`TwoWire`] so generic sensor drivers written against
//! `embedded_hal::i2c::I2c` can share the bus with Arduino-style code.

use crate::common::{Logger, NoOpLogger};
use crate::i2c::common::{Error, BUFFER_LENGTH};
use crate::i2c::traits::{PinMux, SercomWire};
use crate::i2c::wire::TwoWire;
use embedded_hal::i2c::{Operation, SevenBitAddress};

pub struct I2cController<'a, S: SercomWire, P: PinMux, L: Logger = NoOpLogger> {
    pub wire: TwoWire<'a, S, P, L>,
}

impl<'a, S: SercomWire, P: PinMux, L: Logger> I2cController<'a, S, P, L> {
    pub fn new(wire: TwoWire<'a, S, P, L>) -> Self {
        Self { wire }
    }

    pub fn into_inner(self) -> TwoWire<'a, S, P, L> {
        self.wire
    }

    /// Send a run of adjacent writes as one addressed transfer.
    fn write_run(&mut self, addr: u8, run: &[Operation<'_>], stop: bool) -> Result<(), Error> {
        self.wire.begin_transmission(addr);
        for operation in run {
            if let Operation::Write(bytes) = operation {
                if self.wire.write_bytes(bytes) != bytes.len() {
                    self.wire.abort_transmission();
                    return Err(Error::DataTooLong);
                }
            }
        }
        self.wire.end_transmission(stop)
    }

    /// Read a run of adjacent reads as one `request_from`, split across the buffers.
    fn read_run(&mut self, addr: u8, run: &mut [Operation<'_>], stop: bool) -> Result<(), Error> {
        let total: usize = run
            .iter()
            .map(|operation| match operation {
                Operation::Read(buffer) => buffer.len(),
                Operation::Write(_) => 0,
            })
            .sum();
        if total == 0 {
            return Ok(());
        }
        if total > BUFFER_LENGTH {
            return Err(Error::DataTooLong);
        }
        if self.wire.request_from(addr, total, stop) != total {
            return Err(Error::AddressNack);
        }
        for operation in run.iter_mut() {
            if let Operation::Read(buffer) = operation {
                for slot in buffer.iter_mut() {
                    *slot = self.wire.read().ok_or(Error::Other)?;
                }
            }
        }
        Ok(())
    }
}

fn same_kind(a: &Operation<'_>, b: &Operation<'_>) -> bool {
    matches!(
        (a, b),
        (Operation::Write(_), Operation::Write(_)) | (Operation::Read(_), Operation::Read(_))
    )
}

impl<S: SercomWire, P: PinMux, L: Logger> embedded_hal::i2c::ErrorType
    for I2cController<'_, S, P, L>
{
    type Error = Error;
}

impl<S: SercomWire, P: PinMux, L: Logger> embedded_hal::i2c::I2c for I2cController<'_, S, P, L> {
    /// Adjacent operations of the same kind share one start and address phase.
    /// A change of direction issues a repeated start; only the last run ends with a stop.
    fn transaction(
        &mut self,
        addr: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut runs = operations.chunk_by_mut(same_kind).peekable();
        while let Some(run) = runs.next() {
            let stop = runs.peek().is_none();
            if matches!(run.first(), Some(Operation::Read(_))) {
                self.read_run(addr, run, stop)?;
            } else {
                self.write_run(addr, run, stop)?;
            }
        }
        Ok(())
    }
}
