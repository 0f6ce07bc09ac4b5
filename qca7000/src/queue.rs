//! A small MPSC-safe frame queue standing in for the host OS queue
//! primitive spec.md §1 treats as an external collaborator.
//!
//! Any task may push (`send()` runs wherever the caller runs); only the
//! service loop pops. A `critical_section::Mutex` around a `heapless`
//! ring buffer is the standard no_std way to get that safely without an
//! allocator or a real RTOS queue, as used throughout this corpus.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::spsc::Queue;

pub struct FrameQueue<T, const N: usize> {
    inner: Mutex<RefCell<Queue<T, N>>>,
}

impl<T, const N: usize> Default for FrameQueue<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> FrameQueue<T, N> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Queue::new())),
        }
    }

    /// Push `item`, returning it back if the queue is full.
    pub fn push(&self, item: T) -> Result<(), T> {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().enqueue(item))
    }

    pub fn pop(&self) -> Option<T> {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().dequeue())
    }

    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() == N
    }
}
