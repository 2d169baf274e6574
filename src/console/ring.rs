//! Interrupt-fed receive ring.
//!
//! Characters arrive in interrupt context and are consumed by the
//! foreground loop:
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌────────────────┐
//! │  UART ISR   │────▶│   RxRing     │────▶│ Foreground loop│
//! │ (producer)  │     │ (lock-free)  │     │  (consumer)    │
//! └─────────────┘     └──────────────┘     └────────────────┘
//! ```
//!
//! Exactly one producer and one consumer may be active; under that
//! discipline the two cursors need no lock, only acquire/release pairing
//! around the slot access. Cursors are free-running and wrap modulo the
//! capacity on indexing, so empty is `head == tail` and full is
//! `head - tail == N`.
//!
//! Full-buffer policy: **drop-newest**. [`RxRing::put`] on a full ring
//! returns `false` and discards the incoming byte; bytes already queued
//! are never overwritten.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicUsize, Ordering};

/// Fixed-capacity SPSC byte queue.
pub struct RxRing<const N: usize> {
    /// Write cursor, advanced only by the producer.
    head: AtomicUsize,
    /// Read cursor, advanced only by the consumer.
    tail: AtomicUsize,
    buf: [UnsafeCell<u8>; N],
}

// SAFETY: a slot is written only by the single producer before it
// publishes `head` with Release, and read only by the single consumer
// after observing that `head` with Acquire (and vice versa for `tail`).
// With one producer and one consumer there is never a concurrent
// mutable access to the same slot.
unsafe impl<const N: usize> Sync for RxRing<N> {}

impl<const N: usize> RxRing<N> {
    /// Create an empty ring.
    pub const fn new() -> Self {
        Self {
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            buf: [const { UnsafeCell::new(0) }; N],
        }
    }

    /// Append one byte. Producer side — safe to call from interrupt
    /// context. Returns `false` when the ring is full (byte dropped).
    pub fn put(&self, byte: u8) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);
        if head.wrapping_sub(tail) == N {
            return false;
        }
        // SAFETY: the slot at `head` is outside the tail..head live
        // region, so the consumer will not touch it until `head` is
        // published below.
        unsafe {
            *self.buf[head % N].get() = byte;
        }
        self.head.store(head.wrapping_add(1), Ordering::Release);
        true
    }

    /// Remove and return the oldest byte. Consumer side — foreground
    /// loop only.
    pub fn get(&self) -> Option<u8> {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);
        if tail == head {
            return None;
        }
        // SAFETY: `tail < head` means the producer published this slot
        // and will not rewrite it until `tail` advances past it.
        let byte = unsafe { *self.buf[tail % N].get() };
        self.tail.store(tail.wrapping_add(1), Ordering::Release);
        Some(byte)
    }

    /// Number of queued bytes.
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        head.wrapping_sub(tail)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() == N
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for RxRing<N> {
    fn default() -> Self {
        Self::new()
    }
}
