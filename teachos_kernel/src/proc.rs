//! The slice of the process model the scheduler cares about.
//!
//! Process slots live in a fixed arena with stable indices. A [`ProcId`]
//! carries the slot's generation at the time it was handed out, so a
//! reference that outlives its process goes stale instead of silently naming
//! whatever got allocated into the slot afterwards. All access goes through
//! the big kernel lock; nothing in here is atomic.

use core::fmt;

/// Number of process slots in the system.
pub const NPROC: usize = 64;

const_assert!(NPROC >= 2);

/// Scheduler-visible process states.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum ProcessStatus {
    /// Slot is unused.
    Free,
    /// Ready to run on any CPU.
    Runnable,
    /// Currently executing on exactly one CPU.
    Running,
    /// Being torn down; never scheduled again.
    Dying,
}

/// Generation-validated reference to a process slot.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct ProcId {
    index: usize,
    generation: u32,
}

impl ProcId {
    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for ProcId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "proc{}.{}", self.index, self.generation)
    }
}

#[derive(Copy, Clone)]
struct ProcSlot {
    generation: u32,
    status: ProcessStatus,
}

const FREE_SLOT: ProcSlot = ProcSlot {
    generation: 0,
    status: ProcessStatus::Free,
};

/// Fixed-size arena of process slots.
pub struct ProcTable {
    slots: [ProcSlot; NPROC],
}

impl ProcTable {
    pub const fn new() -> ProcTable {
        ProcTable {
            slots: [FREE_SLOT; NPROC],
        }
    }

    fn slot(&self, id: ProcId) -> Option<&ProcSlot> {
        let slot = &self.slots[id.index];
        if slot.generation == id.generation {
            Some(slot)
        } else {
            None
        }
    }

    /// Claim the first free slot and mark it runnable.
    ///
    /// Returns `None` when the table is full. Filling in the rest of the
    /// process (address space, registers) is the process-creation code's
    /// business, not ours.
    pub fn alloc(&mut self) -> Option<ProcId> {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.status == ProcessStatus::Free {
                slot.status = ProcessStatus::Runnable;
                return Some(ProcId {
                    index,
                    generation: slot.generation,
                });
            }
        }
        None
    }

    /// Release a slot. Bumps the generation so stale ids stop matching.
    pub fn free(&mut self, id: ProcId) -> bool {
        let slot = &mut self.slots[id.index];
        if slot.generation != id.generation || slot.status == ProcessStatus::Free {
            return false;
        }
        slot.status = ProcessStatus::Free;
        slot.generation = slot.generation.wrapping_add(1);
        true
    }

    /// Status of the process `id` refers to, or `None` if the id is stale.
    pub fn status(&self, id: ProcId) -> Option<ProcessStatus> {
        self.slot(id).map(|slot| slot.status)
    }

    pub fn set_status(&mut self, id: ProcId, status: ProcessStatus) -> bool {
        let slot = &mut self.slots[id.index];
        if slot.generation != id.generation {
            return false;
        }
        slot.status = status;
        true
    }

    /// Status of the slot at `index`, regardless of generation.
    pub fn status_at(&self, index: usize) -> ProcessStatus {
        self.slots[index].status
    }

    /// Current id of the slot at `index`.
    pub fn id_at(&self, index: usize) -> ProcId {
        ProcId {
            index,
            generation: self.slots[index].generation,
        }
    }

    /// Whether any process in the whole system is runnable or running.
    pub fn any_active(&self) -> bool {
        self.slots.iter().any(|slot| {
            slot.status == ProcessStatus::Runnable || slot.status == ProcessStatus::Running
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn alloc_returns_runnable_slots() {
        let mut procs = ProcTable::new();
        let a = procs.alloc().unwrap();
        let b = procs.alloc().unwrap();
        assert_ne!(a, b);
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(procs.status(a), Some(ProcessStatus::Runnable));
        assert_eq!(procs.status(b), Some(ProcessStatus::Runnable));
        assert!(procs.any_active());
    }

    #[test]
    fn table_exhaustion() {
        let mut procs = ProcTable::new();
        for _ in 0..NPROC {
            assert!(procs.alloc().is_some());
        }
        assert!(procs.alloc().is_none());
    }

    #[test]
    fn free_invalidates_stale_ids() {
        let mut procs = ProcTable::new();
        let a = procs.alloc().unwrap();
        assert!(procs.free(a));
        assert_eq!(procs.status(a), None);
        assert!(!procs.set_status(a, ProcessStatus::Running));
        assert!(!procs.free(a), "double free must be rejected");

        // slot gets recycled with a new generation
        let a2 = procs.alloc().unwrap();
        assert_eq!(a2.index(), a.index());
        assert_ne!(a2, a);
        assert_eq!(procs.status(a2), Some(ProcessStatus::Runnable));
        assert_eq!(procs.status(a), None);
    }

    #[test]
    fn any_active_ignores_free_and_dying() {
        let mut procs = ProcTable::new();
        assert!(!procs.any_active());
        let a = procs.alloc().unwrap();
        procs.set_status(a, ProcessStatus::Dying);
        assert!(!procs.any_active());
        procs.set_status(a, ProcessStatus::Running);
        assert!(procs.any_active());
    }
}
