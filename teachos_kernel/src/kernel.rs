//! The kernel singleton: the big kernel lock and everything it guards.

use spin::Once;
use spinlock::{Mutex, MutexGuard};

use crate::cpu::{CpuDescriptor, CpuSetup, CpuTable, MAX_CPUS};
use crate::handoff::BootHandoff;
use crate::platform::Platform;
use crate::proc::{ProcId, ProcTable};

/// All shared kernel state that lives under the big kernel lock.
///
/// Whoever holds the `MutexGuard` for this struct holds the big kernel lock;
/// entry points that require the lock take the guard as a parameter, so the
/// precondition is checked by the compiler rather than by convention.
pub struct KernelState {
    /// The process table.
    pub procs: ProcTable,
    /// Which process each CPU is currently bound to, indexed by CPU index.
    bound: [Option<ProcId>; MAX_CPUS],
}

impl KernelState {
    /// The process bound to `cpu`, if any.
    pub fn bound(&self, cpu: usize) -> Option<ProcId> {
        self.bound[cpu]
    }

    pub(crate) fn bind(&mut self, cpu: usize, proc: Option<ProcId>) {
        self.bound[cpu] = proc;
    }
}

/// The scheduling and SMP-coordination core.
///
/// Created once at boot with the platform implementation and the CPU map;
/// lives for the kernel lifetime.
pub struct Kernel<P: Platform> {
    pub(crate) platform: P,
    pub(crate) state: Mutex<KernelState>,
    pub(crate) cpus: CpuTable,
    pub(crate) handoff: BootHandoff,
    pub(crate) panicstr: Once<&'static str>,
}

impl<P: Platform> Kernel<P> {
    pub fn new(platform: P, cpus: &[CpuSetup]) -> Kernel<P> {
        Kernel {
            platform,
            state: Mutex::new(KernelState {
                procs: ProcTable::new(),
                bound: [None; MAX_CPUS],
            }),
            cpus: CpuTable::new(cpus),
            handoff: BootHandoff::new(),
            panicstr: Once::new(),
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Acquire the big kernel lock, busy-waiting until it is free.
    pub fn lock(&self) -> MutexGuard<KernelState> {
        self.state.lock()
    }

    pub fn cpu(&self, index: usize) -> &CpuDescriptor {
        self.cpus.get(index)
    }

    pub fn cpu_count(&self) -> usize {
        self.cpus.count()
    }

    pub fn boot_handoff(&self) -> &BootHandoff {
        &self.handoff
    }
}
