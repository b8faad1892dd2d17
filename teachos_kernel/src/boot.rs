//! Multiprocessor bring-up: the boot coordinator on the bootstrap CPU and
//! the kernel-side entry point for secondary CPUs.

use core::hint;

use spinlock::MutexGuard;

use crate::cpu::CpuStatus;
use crate::kernel::{Kernel, KernelState};
use crate::platform::Platform;

impl<P: Platform> Kernel<P> {
    /// Bring the system up on the bootstrap CPU.
    ///
    /// Called once, after single-CPU initialization is done: takes the big
    /// kernel lock, wakes every secondary CPU in turn, then enters the
    /// scheduler. Never returns.
    pub fn start(&self, cpu: usize) -> ! {
        let guard = self.lock();
        self.cpu(cpu).set_status(CpuStatus::Started);
        self.boot_secondaries(cpu, &guard);
        self.schedule(cpu, guard)
    }

    /// Wake each secondary CPU, one at a time, in ascending index order.
    /// Must be called with the big kernel lock held.
    ///
    /// Bring-up is strictly sequential: the handoff slot has no lock of its
    /// own, so the next CPU may not be woken until the current one has
    /// consumed its stack pointer and checked in as started. A CPU that
    /// never checks in hangs the loop forever; that is a fatal boot-time
    /// condition with no recovery here.
    pub fn boot_secondaries(&self, cpu: usize, _guard: &MutexGuard<KernelState>) {
        let entry = self.platform.install_entry_code();
        info!("[smp] entry code installed at {:p}", entry);
        for index in 0..self.cpu_count() {
            if index == cpu {
                // that's us, already running
                continue;
            }
            let target = self.cpu(index);
            self.handoff.publish(target.stack().top());
            self.platform.start_cpu(target.hw_id(), entry);
            while target.status() != CpuStatus::Started {
                hint::spin_loop();
            }
            info!("[smp] {} is up", target.hw_id());
        }
    }

    /// Kernel-side entry point of a secondary CPU, reached via the installed
    /// entry routine after the wake signal. Never returns.
    ///
    /// Consuming the handoff models the tail of the entry stub: the stack
    /// this CPU is executing on is the one the coordinator published for it.
    pub fn secondary_main(&self, cpu: usize) -> ! {
        let stack_top = self.handoff.take();
        debug_assert_eq!(stack_top, self.cpu(cpu).stack().top());
        self.platform.load_kernel_space();
        self.platform.init_cpu(cpu);
        info!("[smp] cpu {} starting", cpu);
        // The one write to shared state allowed without the lock: this is
        // the acknowledgment the boot coordinator is spinning on.
        self.cpu(cpu).set_status(CpuStatus::Started);
        let guard = self.lock();
        self.schedule(cpu, guard)
    }
}
