//! Newtype wrappers that make it harder to accidentally confuse physical and
//! virtual addresses.

use core::fmt;
use core::ops;

/// A virtual address. Its validity depends on the current page mapping.
#[repr(C)]
#[derive(Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Debug)]
pub struct VirtAddr(pub usize);

/// A physical address. Whether it is accessible depends on the current page
/// mapping.
#[repr(C)]
#[derive(Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Debug)]
pub struct PhysAddr(pub usize);

macro_rules! impl_addr_arith {
    ($addr:tt) => {
        impl ops::Add<usize> for $addr {
            type Output = $addr;

            fn add(self, other: usize) -> Self::Output {
                $addr(self.0 + other)
            }
        }

        impl ops::AddAssign<usize> for $addr {
            fn add_assign(&mut self, other: usize) {
                self.0 += other;
            }
        }
    };
}

impl_addr_arith!(VirtAddr);
impl_addr_arith!(PhysAddr);

impl fmt::Pointer for PhysAddr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PHYS_0x{:016x}", self.0)
    }
}

impl fmt::Pointer for VirtAddr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "VIRT_0x{:016x}", self.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn addr_arith() {
        let mut v = VirtAddr(0x1000);
        assert_eq!(v + 0x10, VirtAddr(0x1010));
        v += 0x2000;
        assert_eq!(v, VirtAddr(0x3000));
        assert_eq!(PhysAddr(0x7000) + 0, PhysAddr(0x7000));
    }
}
