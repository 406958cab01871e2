//! Lingkar - Fixed-Capacity SPSC Byte Ring Buffer
//!
//! Arsitektur:
//! - Two-Cursor: empty/full dibedakan hanya dari write & read cursor
//! - Lock-Free: Atomic-only, tidak ada Mutex
//! - No-Allocation: Storage dialokasikan sekali saat konstruksi
//! - Overwrite Mode: Opsional, data paling lama dibuang saat penuh

pub mod core;
pub mod demo;

pub use crate::core::{BufferError, ConstructionError, RingBuffer, Snapshot};
