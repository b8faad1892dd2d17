//! The seam between the scheduling core and the hardware-facing rest of the
//! kernel.
//!
//! Everything the core consumes from the outside world (memory
//! management, trap dispatch, the interactive monitor, the actual wake and
//! halt instructions) is an operation on this trait. A real port implements
//! it with MMU loads, startup IPIs and `sti; hlt`; the test suite implements
//! it with host threads and sentinel panics.

use bare_metal::{HwCpuId, PhysAddr};

use crate::proc::ProcId;

pub trait Platform: Sync {
    /// Copy the fixed secondary-CPU entry routine into the well-known,
    /// otherwise-unused physical memory region and return its address.
    /// Secondary CPUs can execute it regardless of their address-space state.
    fn install_entry_code(&self) -> PhysAddr;

    /// Issue the hardware wake signal that makes `target` begin executing
    /// the entry routine at `entry`.
    fn start_cpu(&self, target: HwCpuId, entry: PhysAddr);

    /// Per-CPU initialization of CPU-local dispatch tables (interrupt
    /// controller, trap vectors). Runs on the CPU being initialized.
    fn init_cpu(&self, cpu: usize);

    /// Switch the calling CPU's address space to the kernel-only root.
    /// Total and idempotent; safe to call before the big lock is held, since
    /// the kernel root never changes.
    fn load_kernel_space(&self);

    /// Transfer control to `proc` in user mode. The caller has already done
    /// all scheduler bookkeeping and released the big kernel lock; this
    /// operation must not touch shared kernel state.
    fn resume(&self, proc: ProcId) -> !;

    /// Park the calling CPU in the low-power wait state with interrupts
    /// enabled. Returns once an interrupt has been delivered.
    fn wait_for_interrupt(&self);

    /// Force the calling CPU into an interrupts-disabled, known-good mode.
    fn disable_interrupts(&self);

    /// Run one iteration of the interactive diagnostic console. The core
    /// calls this in a dead loop on terminal paths.
    fn diagnostic_loop(&self);
}
