// Licensed under the Apache-2.0 license

//! Logging hooks shared by the drivers in this crate.

use embedded_io::Write;

/// Sink for driver diagnostics.
pub trait Logger {
    fn debug(&mut self, msg: &str);
    fn error(&mut self, msg: &str);
}

/// Logger that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpLogger;

impl Logger for NoOpLogger {
    fn debug(&mut self, _msg: &str) {}
    fn error(&mut self, _msg: &str) {}
}

/// Line-oriented logger over any `embedded_io` writer, typically a UART.
///
/// Write errors are dropped; a broken log channel must not take the bus down with it.
pub struct WriterLogger<W: Write> {
    writer: W,
}

impl<W: Write> WriterLogger<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn line(&mut self, level: &str, msg: &str) {
        let _ = self.writer.write_all(level.as_bytes());
        let _ = self.writer.write_all(msg.as_bytes());
        let _ = self.writer.write_all(b"\r\n");
    }
}

impl<W: Write> Logger for WriterLogger<W> {
    fn debug(&mut self, msg: &str) {
        self.line("[DEBUG] ", msg);
    }

    fn error(&mut self, msg: &str) {
        self.line("[ERROR] ", msg);
    }
}
