//! Core module: Lock-Free Byte Ring Buffer
//!
//! Prinsip desain:
//! - One Slot Sacrificed: kapasitas N menampung maksimal N - 1 byte
//! - Lock-Free: Hanya atomic operations, tidak ada Mutex/RwLock
//! - No-Allocation: Storage pre-allocated saat init, dilepas sekali saat drop

mod error;
mod ring_buffer;
mod split;

pub use error::{BufferError, ConstructionError};
pub use ring_buffer::{Drain, RingBuffer, Snapshot};
pub use split::{Consumer, Producer};
