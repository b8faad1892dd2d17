//! Round-robin scheduling and the idle/halt path.

use spinlock::MutexGuard;

use crate::cpu::CpuStatus;
use crate::kernel::{Kernel, KernelState};
use crate::platform::Platform;
use crate::proc::{ProcId, ProcTable, ProcessStatus, NPROC};

/// Pick the next process for a CPU whose last binding was `current`.
///
/// Scans the table in circular index order starting just after `current`
/// (slot 0 when unbound), for exactly one full circuit, and returns the
/// first runnable process. When nothing is runnable but `current` is still
/// running, `current` wins again: a single busy process keeps its CPU.
/// `None` means the CPU should halt.
///
/// This is the whole scheduling policy; every runnable process is visited at
/// most once per circuit, which is what makes repeated invocations fair.
pub fn select_next(procs: &ProcTable, current: Option<ProcId>) -> Option<ProcId> {
    // A stale id means the slot was recycled since; treat the CPU as unbound.
    let current = current.filter(|id| procs.status(*id).is_some());
    let start = current.map(|id| id.index()).unwrap_or(0);
    for offset in 1..=NPROC {
        let index = (start + offset) % NPROC;
        if procs.status_at(index) == ProcessStatus::Runnable {
            return Some(procs.id_at(index));
        }
    }
    current.filter(|id| procs.status(*id) == Some(ProcessStatus::Running))
}

impl<P: Platform> Kernel<P> {
    /// Choose a process to run on `cpu` and run it.
    ///
    /// Never returns: either control transfers to a resumed process, or the
    /// CPU halts until an interrupt puts it back here, or (with no work
    /// anywhere in the system) the diagnostic console takes over for good.
    /// Taking the guard by value is the "called with the lock held" contract.
    pub fn schedule<'a>(&'a self, cpu: usize, mut guard: MutexGuard<'a, KernelState>) -> ! {
        loop {
            let choice = select_next(&guard.procs, guard.bound(cpu));
            match choice {
                Some(id) => self.run(cpu, guard, id),
                None => guard = self.halt(cpu, guard),
            }
        }
    }

    /// Bind `id` to `cpu` and transfer control to it, releasing the big
    /// kernel lock on the way out.
    fn run<'a>(&'a self, cpu: usize, mut guard: MutexGuard<'a, KernelState>, id: ProcId) -> ! {
        debug_assert!(
            guard.procs.status(id) == Some(ProcessStatus::Runnable)
                || guard.bound(cpu) == Some(id),
            "process is running on another CPU"
        );
        if let Some(prev) = guard.bound(cpu) {
            if prev != id && guard.procs.status(prev) == Some(ProcessStatus::Running) {
                guard.procs.set_status(prev, ProcessStatus::Runnable);
            }
        }
        guard.procs.set_status(id, ProcessStatus::Running);
        guard.bind(cpu, Some(id));
        debug!("[sched] cpu {} resuming {}", cpu, id);
        // Leaving kernel mode: release the lock, then hand over the CPU.
        // The resume operation must not touch shared kernel state.
        drop(guard);
        self.platform.resume(id)
    }

    /// Nothing to run: park the CPU until an interrupt, or fall into the
    /// diagnostic console when the whole system is out of work.
    ///
    /// Returns with the lock re-acquired once an interrupt ended the wait.
    fn halt<'a>(&'a self, cpu: usize, mut guard: MutexGuard<'a, KernelState>) -> MutexGuard<'a, KernelState> {
        guard.bind(cpu, None);
        self.platform.load_kernel_space();
        // Interrupt handlers look at this status to tell a halted CPU from a
        // preempted one. The write must precede the lock release below.
        self.cpu(cpu).set_status(CpuStatus::Halted);
        if !guard.procs.any_active() {
            error!("[sched] no runnable processes in the system");
            loop {
                self.platform.diagnostic_loop();
            }
        }
        drop(guard);
        self.platform.wait_for_interrupt();
        // Back from the halt: rejoin the mutual exclusion domain before
        // touching shared state, then rescan.
        let guard = self.lock();
        self.cpu(cpu).set_status(CpuStatus::Started);
        guard
    }

    /// Timer-preemption entry point for the trap layer, called on a CPU that
    /// was running a process when the tick arrived: put the interrupted
    /// process back in the runnable pool and reschedule.
    pub fn yield_now(&self, cpu: usize) -> ! {
        let mut guard = self.lock();
        if let Some(id) = guard.bound(cpu) {
            if guard.procs.status(id) == Some(ProcessStatus::Running) {
                guard.procs.set_status(id, ProcessStatus::Runnable);
            }
        }
        self.schedule(cpu, guard)
    }

    /// Resume whatever is bound to `cpu` directly, bypassing selection.
    ///
    /// This is the diagnostic console's "continue" path and nothing else;
    /// normal control flow always goes through [`Kernel::schedule`].
    pub fn resume_bound(&self, cpu: usize, guard: MutexGuard<KernelState>) -> ! {
        match guard.bound(cpu) {
            Some(id) if guard.procs.status(id).is_some() => self.run(cpu, guard, id),
            _ => {
                drop(guard);
                self.panic(cpu, "nothing bound to this CPU to resume")
            }
        }
    }
}
