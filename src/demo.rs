//! Demonstration driver: simulasi producer/consumer di atas `RingBuffer`
//!
//! Setiap input di-push byte per byte (byte yang ditolak dilaporkan),
//! lalu buffer dikuras sampai kosong. Fase terakhir mendemonstrasikan
//! peek-then-get pada sisa isi buffer.

use std::io::{self, Write};

use thiserror::Error;
use tracing::info;

use crate::core::{BufferError, ConstructionError, RingBuffer};

/// Demo configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    pub capacity: usize,
    pub overwrite: bool,
    pub inputs: Vec<String>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            capacity: 10,
            overwrite: false,
            inputs: vec![
                "HELLO".to_string(),
                "WORLD12345".to_string(),
                "BUFFEROVERFLOW".to_string(),
            ],
        }
    }
}

#[derive(Error, Debug)]
pub enum DemoError {
    #[error("failed to initialize buffer: {0}")]
    Construction(#[from] ConstructionError),

    #[error("failed to write demo output: {0}")]
    Io(#[from] io::Error),
}

/// Push semua byte dari `input`; returns byte yang dibuang karena `Full`.
pub fn simulate_input<W: Write>(
    ring: &RingBuffer,
    input: &str,
    out: &mut W,
) -> io::Result<Vec<u8>> {
    writeln!(out, "Simulating input: {}", input)?;

    let mut discarded = Vec::new();
    for &byte in input.as_bytes() {
        if let Err(BufferError::Full) = ring.put(byte) {
            writeln!(out, "Buffer Full! Discarding: {}", char::from(byte))?;
            discarded.push(byte);
        }
    }
    Ok(discarded)
}

/// Kuras buffer sampai `Empty`; returns byte yang diambil.
pub fn process_buffer<W: Write>(ring: &RingBuffer, out: &mut W) -> io::Result<Vec<u8>> {
    let drained: Vec<u8> = ring.drain().collect();
    writeln!(out, "Processing Buffer: {}", render(&drained))?;
    Ok(drained)
}

/// Peek lalu get satu per satu sampai peek tidak menemukan apa-apa.
pub fn peek_and_consume<W: Write>(ring: &RingBuffer, out: &mut W) -> io::Result<Vec<u8>> {
    let mut seen = Vec::new();
    while let Some(byte) = ring.peek() {
        seen.push(byte);
        // Konsumsi byte yang baru saja dilihat
        if ring.get().is_err() {
            break;
        }
    }
    writeln!(out, "Peeking Data: {}", render(&seen))?;
    Ok(seen)
}

/// Jalankan seluruh skenario demo, tulis transcript ke `out`.
pub fn run<W: Write>(config: &DemoConfig, out: &mut W) -> Result<(), DemoError> {
    let ring = RingBuffer::new(config.capacity, config.overwrite)?;
    info!(
        capacity = config.capacity,
        overwrite = config.overwrite,
        inputs = config.inputs.len(),
        "demo started"
    );

    writeln!(out, "Ring Buffer Demo Started")?;

    for input in &config.inputs {
        let discarded = simulate_input(&ring, input, out)?;
        ring.log_state();
        let drained = process_buffer(&ring, out)?;
        info!(
            input = %input,
            stored = drained.len(),
            discarded = discarded.len(),
            "input processed"
        );
    }

    peek_and_consume(&ring, out)?;

    ring.destroy();
    writeln!(out, "Ring Buffer Demo Completed")?;
    out.flush()?;
    Ok(())
}

fn render(bytes: &[u8]) -> String {
    bytes.iter().copied().map(char::from).collect()
}
