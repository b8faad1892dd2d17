use crate::addr::VirtAddr;

/// An exclusively-owned kernel-mode execution stack region.
///
/// Each CPU gets one of these at boot and keeps it forever. The region is
/// described rather than owned here; reserving the backing memory is the boot
/// loader's business.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct KernelStack {
    base: VirtAddr,
    size: usize,
}

impl KernelStack {
    pub const fn new(base: VirtAddr, size: usize) -> KernelStack {
        KernelStack { base, size }
    }

    pub fn base(&self) -> VirtAddr {
        self.base
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// The initial stack pointer: stacks grow downwards from here.
    pub fn top(&self) -> VirtAddr {
        self.base + self.size
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn stack_top() {
        let stack = KernelStack::new(VirtAddr(0x8000), 0x4000);
        assert_eq!(stack.top(), VirtAddr(0xC000));
        assert_eq!(stack.base(), VirtAddr(0x8000));
        assert_eq!(stack.size(), 0x4000);
    }
}
