//! Per-CPU descriptor table.
//!
//! There is one [`CpuDescriptor`] per physical CPU, created at boot and never
//! destroyed. The status field is the one piece of cross-CPU state that is
//! deliberately accessed without the big kernel lock: each CPU writes only
//! its own slot (with release ordering), and the boot coordinator polls it
//! (with acquire ordering) while waiting for a secondary CPU to check in.
//! Everything else about a CPU is immutable after construction.

use core::sync::atomic::{AtomicU8, Ordering};

use bare_metal::{HwCpuId, KernelStack, VirtAddr};

/// Maximum number of CPUs the descriptor table can hold.
pub const MAX_CPUS: usize = 8;

const_assert!(MAX_CPUS >= 1);
const_assert!(MAX_CPUS <= 256);

/// Boot/run state of a CPU, as seen by other CPUs.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
#[repr(u8)]
pub enum CpuStatus {
    /// Not yet woken, or still running its early entry code.
    Uninitialized = 0,
    /// Finished local initialization; participating in the lock discipline.
    Started = 1,
    /// Parked in the low-power wait state with nothing to run.
    Halted = 2,
}

/// Boot-time description of one CPU, handed to [`crate::Kernel::new`].
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct CpuSetup {
    pub hw_id: HwCpuId,
    pub stack: KernelStack,
}

/// One entry of the per-CPU descriptor table.
pub struct CpuDescriptor {
    hw_id: HwCpuId,
    stack: KernelStack,
    status: AtomicU8,
}

impl CpuDescriptor {
    fn new(setup: CpuSetup) -> CpuDescriptor {
        CpuDescriptor {
            hw_id: setup.hw_id,
            stack: setup.stack,
            status: AtomicU8::new(CpuStatus::Uninitialized as u8),
        }
    }

    fn unused() -> CpuDescriptor {
        CpuDescriptor::new(CpuSetup {
            hw_id: HwCpuId(0),
            stack: KernelStack::new(VirtAddr(0), 0),
        })
    }

    pub fn hw_id(&self) -> HwCpuId {
        self.hw_id
    }

    pub fn stack(&self) -> &KernelStack {
        &self.stack
    }

    pub fn status(&self) -> CpuStatus {
        match self.status.load(Ordering::Acquire) {
            1 => CpuStatus::Started,
            2 => CpuStatus::Halted,
            _ => CpuStatus::Uninitialized,
        }
    }

    /// Publish a new status. Release ordering pairs with the acquire load in
    /// [`CpuDescriptor::status`], so everything this CPU wrote beforehand is
    /// visible to whoever observes the new status.
    pub fn set_status(&self, status: CpuStatus) {
        self.status.store(status as u8, Ordering::Release);
    }
}

/// Fixed-size table of CPU descriptors, indexed by dense CPU index.
pub struct CpuTable {
    entries: [CpuDescriptor; MAX_CPUS],
    count: usize,
}

impl CpuTable {
    /// Build the table from the boot-time CPU configuration.
    ///
    /// # Panics
    ///
    /// Panics when the configuration is empty or exceeds [`MAX_CPUS`]; a
    /// kernel without a usable CPU map cannot boot.
    pub fn new(setups: &[CpuSetup]) -> CpuTable {
        assert!(!setups.is_empty(), "no CPUs configured");
        assert!(setups.len() <= MAX_CPUS, "too many CPUs configured");
        let mut entries = [(); MAX_CPUS].map(|_| CpuDescriptor::unused());
        for (entry, setup) in entries.iter_mut().zip(setups) {
            *entry = CpuDescriptor::new(*setup);
        }
        CpuTable {
            entries,
            count: setups.len(),
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// # Panics
    ///
    /// Panics when `index` does not name a configured CPU.
    pub fn get(&self, index: usize) -> &CpuDescriptor {
        assert!(index < self.count, "index out of range");
        &self.entries[index]
    }

    pub fn iter(&self) -> impl Iterator<Item = &CpuDescriptor> {
        self.entries[..self.count].iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn setup(i: u8) -> CpuSetup {
        CpuSetup {
            hw_id: HwCpuId(i),
            stack: KernelStack::new(VirtAddr(0x1000 * (i as usize + 1)), 0x400),
        }
    }

    #[test]
    fn table_holds_configured_cpus() {
        let table = CpuTable::new(&[setup(4), setup(7)]);
        assert_eq!(table.count(), 2);
        assert_eq!(table.get(0).hw_id(), HwCpuId(4));
        assert_eq!(table.get(1).hw_id(), HwCpuId(7));
        assert_eq!(table.get(1).stack().top(), VirtAddr(0x2400));
        assert_eq!(table.iter().count(), 2);
    }

    #[test]
    #[should_panic(expected = "index out of range")]
    fn unconfigured_index_rejected() {
        let table = CpuTable::new(&[setup(0)]);
        table.get(1);
    }

    #[test]
    fn status_lifecycle() {
        let table = CpuTable::new(&[setup(0)]);
        let cpu = table.get(0);
        assert_eq!(cpu.status(), CpuStatus::Uninitialized);
        cpu.set_status(CpuStatus::Started);
        assert_eq!(cpu.status(), CpuStatus::Started);
        cpu.set_status(CpuStatus::Halted);
        assert_eq!(cpu.status(), CpuStatus::Halted);
        cpu.set_status(CpuStatus::Started);
        assert_eq!(cpu.status(), CpuStatus::Started);
    }
}
