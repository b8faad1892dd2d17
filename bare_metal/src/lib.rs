//! Vocabulary types shared between the kernel core and the hardware-facing
//! collaborators that implement its platform seam.

#![cfg_attr(not(test), no_std)]

mod addr;
mod stack;

pub use self::addr::*;
pub use self::stack::*;

use core::fmt;

/// Identifier a CPU is known by to the hardware (e.g. its local APIC id).
///
/// Distinct from the kernel's dense CPU index: hardware ids need not be
/// contiguous or start at zero.
#[derive(Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Debug)]
pub struct HwCpuId(pub u8);

impl fmt::Display for HwCpuId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "cpu#{}", self.0)
    }
}
