//! Error taxonomy untuk ring buffer
//!
//! Konstruksi dan akses punya error type terpisah: kegagalan alokasi
//! hanya mungkin saat `RingBuffer::new`, sedangkan `Full`/`Empty` bisa
//! di-recover oleh caller.

use thiserror::Error;

/// Kegagalan saat membangun `RingBuffer`. Tidak ada objek parsial yang tersisa.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructionError {
    /// Storage tidak bisa diperoleh (capacity 0 atau allocator menolak)
    #[error("failed to allocate ring buffer storage for {capacity} slots")]
    AllocationFailed { capacity: usize },
}

/// Status non-fatal dari operasi put/get.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// Tidak ada slot kosong dan overwrite mode nonaktif. Byte tidak disimpan.
    #[error("ring buffer is full")]
    Full,

    /// Tidak ada byte untuk diambil.
    #[error("ring buffer is empty")]
    Empty,
}
