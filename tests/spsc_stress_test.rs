//! SPSC Stress Test - Producer & Consumer di thread terpisah
//!
//! Satu producer thread dan satu consumer thread memindahkan jutaan byte
//! lewat buffer kecil, supaya wrap-around dan kondisi full/empty terjadi
//! terus-menerus.
//!
//! Usage:
//!   cargo test --release --test spsc_stress_test -- --nocapture

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use lingkar::RingBuffer;

const TRANSFER_BYTES: u64 = 2_000_000;

/// Statistics collector
struct StressStats {
    sent: AtomicU64,
    received: AtomicU64,
    evicted: AtomicU64,
    full_retries: AtomicU64,
    empty_polls: AtomicU64,
}

impl StressStats {
    fn new() -> Self {
        Self {
            sent: AtomicU64::new(0),
            received: AtomicU64::new(0),
            evicted: AtomicU64::new(0),
            full_retries: AtomicU64::new(0),
            empty_polls: AtomicU64::new(0),
        }
    }

    fn print_report(&self, duration: Duration) {
        let sent = self.sent.load(Ordering::Relaxed);
        let received = self.received.load(Ordering::Relaxed);
        let evicted = self.evicted.load(Ordering::Relaxed);
        let full_retries = self.full_retries.load(Ordering::Relaxed);
        let empty_polls = self.empty_polls.load(Ordering::Relaxed);

        let rate = received as f64 / duration.as_secs_f64();

        println!("\n📊 SPSC STRESS RESULTS");
        println!("======================");
        println!("  Duration:      {:.2}ms", duration.as_secs_f64() * 1000.0);
        println!("  Sent:          {}", sent);
        println!("  Received:      {}", received);
        println!("  Evicted:       {}", evicted);
        println!("  Full retries:  {}", full_retries);
        println!("  Empty polls:   {}", empty_polls);
        println!("  Rate:          {:.2} M bytes/sec", rate / 1_000_000.0);
    }
}

#[inline]
fn pattern(i: u64) -> u8 {
    (i % 251) as u8
}

#[test]
fn test_lossless_transfer_with_backpressure() {
    println!("\n🧪 SPSC TRANSFER - {} bytes through 64 slots", TRANSFER_BYTES);

    let rb = Arc::new(RingBuffer::new(64, false).unwrap());
    let stats = Arc::new(StressStats::new());

    let start = Instant::now();

    let producer = {
        let rb = Arc::clone(&rb);
        let stats = Arc::clone(&stats);
        thread::spawn(move || {
            for i in 0..TRANSFER_BYTES {
                while rb.put(pattern(i)).is_err() {
                    stats.full_retries.fetch_add(1, Ordering::Relaxed);
                    std::hint::spin_loop();
                }
                stats.sent.fetch_add(1, Ordering::Relaxed);
            }
        })
    };

    let mut expected = 0u64;
    while expected < TRANSFER_BYTES {
        match rb.get() {
            Ok(byte) => {
                assert_eq!(byte, pattern(expected), "out of order at {}", expected);
                expected += 1;
            }
            Err(_) => {
                stats.empty_polls.fetch_add(1, Ordering::Relaxed);
                std::hint::spin_loop();
            }
        }
    }
    stats.received.store(expected, Ordering::Relaxed);

    producer.join().unwrap();
    stats.print_report(start.elapsed());

    assert!(rb.is_empty());
    assert_eq!(stats.sent.load(Ordering::Relaxed), TRANSFER_BYTES);
}

#[test]
fn test_overwrite_accounts_for_every_byte() {
    println!("\n🧪 SPSC OVERWRITE - producer never waits");

    let rb = Arc::new(RingBuffer::new(16, true).unwrap());
    let stats = Arc::new(StressStats::new());
    let done = Arc::new(AtomicBool::new(false));

    let start = Instant::now();

    let consumer = {
        let rb = Arc::clone(&rb);
        let stats = Arc::clone(&stats);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let mut received = 0u64;
            loop {
                match rb.get() {
                    Ok(_) => received += 1,
                    Err(_) if done.load(Ordering::Acquire) => break,
                    Err(_) => {
                        stats.empty_polls.fetch_add(1, Ordering::Relaxed);
                        std::hint::spin_loop();
                    }
                }
            }
            received
        })
    };

    for i in 0..TRANSFER_BYTES {
        if rb.put_evicting(pattern(i)).unwrap().is_some() {
            stats.evicted.fetch_add(1, Ordering::Relaxed);
        }
        stats.sent.fetch_add(1, Ordering::Relaxed);
    }
    done.store(true, Ordering::Release);

    let mut received = consumer.join().unwrap();
    // Sisa byte setelah consumer berhenti
    received += rb.drain().count() as u64;
    stats.received.store(received, Ordering::Relaxed);

    stats.print_report(start.elapsed());

    let evicted = stats.evicted.load(Ordering::Relaxed);
    assert_eq!(received + evicted, TRANSFER_BYTES);
    assert!(rb.count() <= rb.usable_capacity());
}

#[test]
fn test_split_handles_in_scoped_threads() {
    let mut rb = RingBuffer::with_capacity(8).unwrap();
    let (mut producer, mut consumer) = rb.split();
    let payload: Vec<u8> = (0..10_000u64).map(pattern).collect();

    let received = thread::scope(|s| {
        let payload = &payload;
        s.spawn(move || {
            let mut offset = 0;
            while offset < payload.len() {
                offset += producer.put_slice(&payload[offset..]);
            }
        });

        let mut received = Vec::with_capacity(payload.len());
        while received.len() < payload.len() {
            received.extend(consumer.drain());
        }
        received
    });

    assert_eq!(received, payload);
}
