//! TeachOS scheduling and multiprocessor-coordination core.
//!
//! This crate decides, on every CPU, which process runs next, brings up the
//! secondary CPUs at boot, and defines the big-kernel-lock discipline that
//! makes the rest of the kernel safe on more than one CPU. Everything
//! hardware-facing (MMU, interrupt controller, trap frames, the interactive
//! monitor) sits behind the [`platform::Platform`] trait, which is also what
//! keeps the whole crate testable on the host.

#![cfg_attr(not(test), no_std)]

#[macro_use]
extern crate log;
#[macro_use]
extern crate static_assertions;

mod boot;
mod fault;
mod kernel;
mod sched;

pub mod cpu;
pub mod handoff;
pub mod logger;
pub mod platform;
pub mod proc;

pub use crate::kernel::{Kernel, KernelState};
pub use crate::platform::Platform;
pub use crate::sched::select_next;
