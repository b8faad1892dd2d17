//! Kernel panic and warning reporting.
//!
//! A panic is terminal: report once, then live in the diagnostic console.
//! The first-message latch keeps a panic raised while reporting an earlier
//! panic from corrupting the report; the second caller goes straight to the
//! dead loop without printing anything.

use core::panic::Location;

use crate::kernel::Kernel;
use crate::platform::Platform;

impl<P: Platform> Kernel<P> {
    /// Report an unresolvable fatal error and enter the diagnostic console
    /// forever.
    #[track_caller]
    pub fn panic(&self, cpu: usize, msg: &'static str) -> ! {
        let mut first = false;
        self.panicstr.call_once(|| {
            first = true;
            msg
        });
        if first {
            self.platform.disable_interrupts();
            let location = Location::caller();
            error!(
                "kernel panic on CPU {} at {}:{}: {}",
                cpu,
                location.file(),
                location.line(),
                msg
            );
        }
        loop {
            self.platform.diagnostic_loop();
        }
    }

    /// Like panic, but don't.
    #[track_caller]
    pub fn warn(&self, msg: &str) {
        let location = Location::caller();
        warn!(
            "kernel warning at {}:{}: {}",
            location.file(),
            location.line(),
            msg
        );
    }

    /// The latched first panic message, if any panic has happened.
    pub fn panic_message(&self) -> Option<&'static str> {
        self.panicstr.get().copied()
    }
}
