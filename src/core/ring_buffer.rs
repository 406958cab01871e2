//! Lock-Free Single-Producer Single-Consumer (SPSC) Byte Ring Buffer
//!
//! Skema two-cursor klasik: satu slot selalu dikorbankan supaya kondisi
//! empty (`write == read`) dan full (`write + 1 == read`, modulo capacity)
//! bisa dibedakan tanpa counter atau flag tambahan.
//!
//! Cursor disimpan sebagai `AtomicUsize` dengan acquire/release ordering,
//! slot sebagai `AtomicU8`. Tidak ada `unsafe`, tidak ada alokasi setelah
//! konstruksi.

use std::fmt;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

use tracing::{debug, trace, warn};

use super::error::{BufferError, ConstructionError};
use super::split::{Consumer, Producer};

/// Padding untuk cache line isolation (64 bytes pada x86-64)
#[repr(C, align(64))]
struct CacheLinePadded<T> {
    value: T,
}

impl<T> CacheLinePadded<T> {
    const fn new(value: T) -> Self {
        Self { value }
    }
}

/// Fixed-capacity SPSC byte ring buffer.
///
/// Capacity `N` menampung maksimal `N - 1` byte. Dengan overwrite mode aktif,
/// `put` ke buffer penuh membuang byte paling lama alih-alih gagal.
///
/// Kontrak konkurensi: tepat satu producer (`put`) dan satu consumer
/// (`get`/`peek`) boleh berjalan bersamaan tanpa lock. Gunakan [`split`]
/// untuk memaksakan kontrak ini lewat type system.
///
/// Overwrite mode: producer juga memajukan read cursor, jadi kedua sisi
/// memakai CAS. Read cursor membawa lap counter sehingga CAS consumer yang
/// tertinggal satu lap penuh tetap gagal. `get` bersifat lock-free, bukan
/// wait-free: selama producer terus meng-evict slot yang sedang dibaca,
/// consumer mengulang dengan cursor baru. Setiap ulangan berarti producer
/// sudah menyelesaikan satu eviction.
///
/// [`split`]: RingBuffer::split
#[repr(C)]
pub struct RingBuffer {
    // Producer side - cache line aligned
    write: CacheLinePadded<AtomicUsize>,
    // Consumer side - cache line aligned, berisi `lap * capacity + index`
    read: CacheLinePadded<AtomicUsize>,
    // Pre-allocated storage - tidak ada alokasi setelah init
    storage: Box<[AtomicU8]>,
    capacity: usize,
    // Lap counter berputar di [0, max_lap) supaya tag tidak overflow
    max_lap: usize,
    overwrite: bool,
}

impl RingBuffer {
    /// Membuat ring buffer dengan `capacity` slot.
    ///
    /// Alokasi hanya terjadi sekali di sini. Capacity 0 ditolak karena
    /// empty dan full tidak bisa dibedakan; kegagalan allocator dilaporkan
    /// sebagai error, bukan abort.
    pub fn new(capacity: usize, overwrite: bool) -> Result<Self, ConstructionError> {
        if capacity == 0 {
            warn!(capacity, "rejecting zero-capacity ring buffer");
            return Err(ConstructionError::AllocationFailed { capacity });
        }

        let mut storage = Vec::new();
        if let Err(err) = storage.try_reserve_exact(capacity) {
            warn!(capacity, error = %err, "ring buffer storage allocation failed");
            return Err(ConstructionError::AllocationFailed { capacity });
        }
        storage.extend((0..capacity).map(|_| AtomicU8::new(0)));

        debug!(capacity, overwrite, "ring buffer created");

        Ok(Self {
            write: CacheLinePadded::new(AtomicUsize::new(0)),
            read: CacheLinePadded::new(AtomicUsize::new(0)),
            storage: storage.into_boxed_slice(),
            capacity,
            max_lap: usize::MAX / capacity,
            overwrite,
        })
    }

    /// Shortcut untuk buffer tanpa overwrite mode
    pub fn with_capacity(capacity: usize) -> Result<Self, ConstructionError> {
        Self::new(capacity, false)
    }

    #[inline(always)]
    fn next_index(&self, index: usize) -> usize {
        let next = index + 1;
        if next == self.capacity {
            0
        } else {
            next
        }
    }

    /// Index slot dari read tag
    #[inline(always)]
    fn tag_index(&self, tag: usize) -> usize {
        tag % self.capacity
    }

    /// Tag berikutnya: index maju satu, lap naik saat index kembali ke 0
    #[inline(always)]
    fn next_tag(&self, tag: usize) -> usize {
        let index = self.tag_index(tag);
        if index + 1 < self.capacity {
            return tag + 1;
        }
        let lap = tag / self.capacity + 1;
        if lap >= self.max_lap {
            0
        } else {
            lap * self.capacity
        }
    }

    /// Push satu byte ke buffer (Producer side)
    ///
    /// Returns `Err(BufferError::Full)` jika penuh dan overwrite nonaktif;
    /// state tidak berubah dan byte tidak disimpan.
    #[inline(always)]
    pub fn put(&self, byte: u8) -> Result<(), BufferError> {
        self.put_evicting(byte).map(|_| ())
    }

    /// Sama seperti [`put`](RingBuffer::put), tapi mengembalikan byte yang
    /// dibuang oleh overwrite mode (jika ada).
    ///
    /// Buffer dengan capacity 1 tidak pernah menyimpan data: byte langsung
    /// tertimpa dan hasilnya `Ok(None)`.
    #[inline(always)]
    pub fn put_evicting(&self, byte: u8) -> Result<Option<u8>, BufferError> {
        // Hanya producer yang menulis `write`
        let write = self.write.value.load(Ordering::Relaxed);
        let read_tag = self.read.value.load(Ordering::Acquire);
        let next = self.next_index(write);

        let mut evicted = None;
        if next == self.tag_index(read_tag) {
            if !self.overwrite {
                return Err(BufferError::Full);
            }
            evicted = self.evict_oldest(read_tag, write);
        }

        debug_assert!(write < self.capacity && next < self.capacity);
        self.storage[write].store(byte, Ordering::Relaxed);

        // Release: byte di atas visible sebelum consumer melihat cursor baru
        self.write.value.store(next, Ordering::Release);

        Ok(evicted)
    }

    /// Majukan read cursor satu slot atas nama producer (overwrite mode).
    ///
    /// Consumer juga memakai CAS di overwrite mode, jadi kalau CAS gagal
    /// berarti consumer sudah mengambil slot itu dan buffer tidak penuh lagi.
    fn evict_oldest(&self, read_tag: usize, write: usize) -> Option<u8> {
        let read = self.tag_index(read_tag);
        let oldest = self.storage[read].load(Ordering::Relaxed);
        let advanced = self.claim(read_tag);

        // read == write hanya terjadi pada capacity 1: tidak ada data yang dibuang
        if advanced && read != write {
            trace!(byte = oldest, read_cursor = read, "overwrite evicted oldest byte");
            Some(oldest)
        } else {
            None
        }
    }

    /// CAS read cursor dari `tag` ke tag berikutnya. Gagal jika sisi lain
    /// sudah memajukannya, termasuk setelah satu lap penuh.
    #[inline(always)]
    fn claim(&self, tag: usize) -> bool {
        self.read
            .value
            .compare_exchange(
                tag,
                self.next_tag(tag),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Pop satu byte dari buffer (Consumer side)
    ///
    /// Returns `Err(BufferError::Empty)` tanpa mengubah state jika kosong.
    /// Di overwrite mode, `get` mengulang selama producer meng-evict slot
    /// yang sedang dibaca (lock-free, tidak dibatasi jumlah ulangan).
    #[inline(always)]
    pub fn get(&self) -> Result<u8, BufferError> {
        loop {
            let read_tag = self.read.value.load(Ordering::Acquire);
            let write = self.write.value.load(Ordering::Acquire);
            let read = self.tag_index(read_tag);

            if read == write {
                return Err(BufferError::Empty);
            }

            let byte = self.storage[read].load(Ordering::Relaxed);

            if !self.overwrite {
                // Release: read di atas selesai sebelum producer boleh menimpa slot
                self.read
                    .value
                    .store(self.next_tag(read_tag), Ordering::Release);
                return Ok(byte);
            }

            if self.claim(read_tag) {
                return Ok(byte);
            }
            // Producer meng-evict slot ini duluan, ulangi dengan cursor terbaru
        }
    }

    /// Lihat byte paling lama tanpa mengambilnya.
    ///
    /// Di overwrite mode dengan producer yang aktif, byte yang dilihat bisa
    /// sudah di-evict saat `get` berikutnya.
    #[inline(always)]
    pub fn peek(&self) -> Option<u8> {
        let (read, write) = self.cursors();

        if read == write {
            None
        } else {
            Some(self.storage[read].load(Ordering::Relaxed))
        }
    }

    /// Iterator yang mengambil byte sampai buffer kosong
    pub fn drain(&self) -> Drain<'_> {
        Drain { ring: self }
    }

    /// Cek apakah buffer kosong
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        let (read, write) = self.cursors();
        read == write
    }

    /// Cek apakah buffer penuh
    #[inline(always)]
    pub fn is_full(&self) -> bool {
        let (read, write) = self.cursors();
        self.next_index(write) == read
    }

    /// Jumlah byte dalam buffer, tidak pernah melebihi `capacity - 1`
    #[inline(always)]
    pub fn count(&self) -> usize {
        let (read, write) = self.cursors();
        self.distance(read, write)
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.count()
    }

    /// Jumlah slot yang dialokasikan (termasuk slot yang dikorbankan)
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Jumlah byte maksimal yang bisa disimpan sekaligus
    #[inline(always)]
    pub const fn usable_capacity(&self) -> usize {
        self.capacity - 1
    }

    #[inline(always)]
    pub fn free_slots(&self) -> usize {
        self.usable_capacity() - self.count()
    }

    #[inline(always)]
    pub const fn overwrite_enabled(&self) -> bool {
        self.overwrite
    }

    /// Pecah buffer menjadi satu `Producer` dan satu `Consumer`.
    ///
    /// Selama kedua handle hidup, buffer tidak bisa diakses lewat jalur lain.
    pub fn split(&mut self) -> (Producer<'_>, Consumer<'_>) {
        let ring: &RingBuffer = self;
        (Producer::new(ring), Consumer::new(ring))
    }

    /// Snapshot cursor untuk debugging. Tidak mengubah state.
    pub fn snapshot(&self) -> Snapshot {
        let (read_cursor, write_cursor) = self.cursors();
        Snapshot {
            read_cursor,
            write_cursor,
            count: self.distance(read_cursor, write_cursor),
            capacity: self.capacity,
        }
    }

    /// Emit snapshot sebagai tracing event (level debug)
    pub fn log_state(&self) {
        let snapshot = self.snapshot();
        debug!(
            read_cursor = snapshot.read_cursor,
            write_cursor = snapshot.write_cursor,
            count = snapshot.count,
            capacity = snapshot.capacity,
            "ring buffer state"
        );
    }

    /// Lepas storage. Setara dengan drop; buffer tidak bisa dipakai lagi.
    pub fn destroy(self) {}

    #[inline(always)]
    fn cursors(&self) -> (usize, usize) {
        let read = self.tag_index(self.read.value.load(Ordering::Acquire));
        let write = self.write.value.load(Ordering::Acquire);
        (read, write)
    }

    #[inline(always)]
    fn distance(&self, read: usize, write: usize) -> usize {
        if write >= read {
            write - read
        } else {
            self.capacity - (read - write)
        }
    }
}

impl Drop for RingBuffer {
    fn drop(&mut self) {
        debug!(capacity = self.capacity, "ring buffer storage released");
    }
}

impl fmt::Debug for RingBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("RingBuffer")
            .field("capacity", &self.capacity)
            .field("overwrite", &self.overwrite)
            .field("read_cursor", &snapshot.read_cursor)
            .field("write_cursor", &snapshot.write_cursor)
            .field("count", &snapshot.count)
            .finish()
    }
}

/// Posisi cursor pada satu titik waktu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub read_cursor: usize,
    pub write_cursor: usize,
    pub count: usize,
    pub capacity: usize,
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "read: {}, write: {}, count: {}/{}",
            self.read_cursor,
            self.write_cursor,
            self.count,
            self.capacity.saturating_sub(1)
        )
    }
}

/// Iterator hasil [`RingBuffer::drain`]
pub struct Drain<'a> {
    ring: &'a RingBuffer,
}

impl Iterator for Drain<'_> {
    type Item = u8;

    #[inline]
    fn next(&mut self) -> Option<u8> {
        self.ring.get().ok()
    }
}
