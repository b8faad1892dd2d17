//! The boot handoff: a single-slot, lock-free channel carrying the kernel
//! stack pointer for the next secondary CPU.
//!
//! There is no lock here on purpose: a secondary CPU consumes this value in
//! its entry stub, before it participates in the big-lock discipline at all.
//! Correctness rests entirely on the bring-up protocol: the coordinator
//! publishes, issues the wake signal, and then refuses to publish again until
//! the woken CPU has checked in as started. One writer, one reader at a time.

use core::sync::atomic::{AtomicUsize, Ordering};

use bare_metal::VirtAddr;

const EMPTY: usize = 0;

pub struct BootHandoff(AtomicUsize);

impl BootHandoff {
    pub const fn new() -> BootHandoff {
        BootHandoff(AtomicUsize::new(EMPTY))
    }

    /// Publish the stack top for the CPU about to be woken.
    ///
    /// The slot must be empty: the previous CPU has to consume its stack
    /// pointer before the coordinator may move on, otherwise that CPU's boot
    /// stack would be yanked out from under it.
    pub fn publish(&self, stack_top: VirtAddr) {
        debug_assert_ne!(stack_top.0, EMPTY, "stack top cannot be the empty marker");
        let prev = self.0.swap(stack_top.0, Ordering::Release);
        debug_assert_eq!(prev, EMPTY, "previous CPU never consumed its stack pointer");
    }

    /// Consume the published stack top, leaving the slot empty.
    ///
    /// Called exactly once per secondary CPU, right after the wake signal
    /// delivered it to the entry code. The acquire swap pairs with the
    /// release in [`BootHandoff::publish`].
    pub fn take(&self) -> VirtAddr {
        let raw = self.0.swap(EMPTY, Ordering::Acquire);
        debug_assert_ne!(raw, EMPTY, "no stack pointer published for this CPU");
        VirtAddr(raw)
    }

    pub fn is_empty(&self) -> bool {
        self.0.load(Ordering::Relaxed) == EMPTY
    }
}
