//! Producer/Consumer handles
//!
//! `RingBuffer::split` menghasilkan tepat satu handle per sisi, sehingga
//! kontrak SPSC dijaga compiler: `Producer` hanya bisa `put`, `Consumer`
//! hanya bisa `get`/`peek`. Keduanya `Send`, tidak ada yang `Clone`.

use super::error::BufferError;
use super::ring_buffer::{Drain, RingBuffer};

/// Sisi penulis dari ring buffer
#[derive(Debug)]
pub struct Producer<'a> {
    ring: &'a RingBuffer,
}

/// Sisi pembaca dari ring buffer
#[derive(Debug)]
pub struct Consumer<'a> {
    ring: &'a RingBuffer,
}

impl<'a> Producer<'a> {
    pub(super) fn new(ring: &'a RingBuffer) -> Self {
        Self { ring }
    }

    #[inline(always)]
    pub fn put(&mut self, byte: u8) -> Result<(), BufferError> {
        self.ring.put(byte)
    }

    #[inline(always)]
    pub fn put_evicting(&mut self, byte: u8) -> Result<Option<u8>, BufferError> {
        self.ring.put_evicting(byte)
    }

    /// Push byte satu per satu sampai `Full`; returns jumlah byte yang masuk.
    pub fn put_slice(&mut self, bytes: &[u8]) -> usize {
        bytes
            .iter()
            .take_while(|&&byte| self.ring.put(byte).is_ok())
            .count()
    }

    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }

    #[inline(always)]
    pub fn free_slots(&self) -> usize {
        self.ring.free_slots()
    }
}

impl<'a> Consumer<'a> {
    pub(super) fn new(ring: &'a RingBuffer) -> Self {
        Self { ring }
    }

    #[inline(always)]
    pub fn get(&mut self) -> Result<u8, BufferError> {
        self.ring.get()
    }

    #[inline(always)]
    pub fn peek(&self) -> Option<u8> {
        self.ring.peek()
    }

    pub fn drain(&mut self) -> Drain<'_> {
        self.ring.drain()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    #[inline(always)]
    pub fn count(&self) -> usize {
        self.ring.count()
    }
}
