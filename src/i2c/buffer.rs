// Licensed under the Apache-2.0 license

//! Fixed-capacity byte FIFO backing the Wire transmit and receive paths.

use heapless::Deque;

pub struct RingBuffer<const N: usize> {
    inner: Deque<u8, N>,
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RingBuffer<N> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: Deque::new(),
        }
    }

    /// Append a byte. Returns `false` and leaves the contents untouched when full.
    pub fn store(&mut self, byte: u8) -> bool {
        self.inner.push_back(byte).is_ok()
    }

    pub fn read(&mut self) -> Option<u8> {
        self.inner.pop_front()
    }

    #[must_use]
    pub fn peek(&self) -> Option<u8> {
        self.inner.front().copied()
    }

    #[must_use]
    pub fn available(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.inner.is_full()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }
}

/// Read access to the bytes received from a master, handed to receive handlers.
pub struct ReceivedBytes<'b, const N: usize> {
    rx: &'b mut RingBuffer<N>,
}

impl<'b, const N: usize> ReceivedBytes<'b, N> {
    pub(crate) fn new(rx: &'b mut RingBuffer<N>) -> Self {
        Self { rx }
    }

    #[must_use]
    pub fn available(&self) -> usize {
        self.rx.available()
    }

    pub fn read(&mut self) -> Option<u8> {
        self.rx.read()
    }

    #[must_use]
    pub fn peek(&self) -> Option<u8> {
        self.rx.peek()
    }
}

/// Write access to the response a master is about to read, handed to request handlers.
pub struct ResponseWriter<'b, const N: usize> {
    tx: &'b mut RingBuffer<N>,
    begun: bool,
}

impl<'b, const N: usize> ResponseWriter<'b, N> {
    pub(crate) fn new(tx: &'b mut RingBuffer<N>, begun: bool) -> Self {
        Self { tx, begun }
    }

    /// Queue one byte. Returns 1 if stored, 0 if dropped.
    pub fn write(&mut self, byte: u8) -> usize {
        queue_byte(self.begun, self.tx, byte)
    }

    /// Queue bytes until the first rejected one. Returns the count stored.
    pub fn write_bytes(&mut self, data: &[u8]) -> usize {
        queue_bytes(self.begun, self.tx, data)
    }
}

pub(crate) fn queue_byte<const N: usize>(
    begun: bool,
    tx: &mut RingBuffer<N>,
    byte: u8,
) -> usize {
    if !begun || tx.is_full() {
        return 0;
    }
    usize::from(tx.store(byte))
}

pub(crate) fn queue_bytes<const N: usize>(
    begun: bool,
    tx: &mut RingBuffer<N>,
    data: &[u8],
) -> usize {
    data.iter()
        .take_while(|&&byte| queue_byte(begun, tx, byte) == 1)
        .count()
}
