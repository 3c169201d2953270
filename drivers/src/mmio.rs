/*++

Licensed under the Apache-2.0 license.

File Name:

    mmio.rs

Abstract:

    File contains the register interface used by the post-processor driver
    and its memory-mapped implementation.

--*/

/// Word access to the registers of one post-processor instance.
///
/// Offsets are byte offsets from the peripheral base. Accesses are never
/// cached; every call reaches the device.
pub trait TrngPpMmio {
    /// Read the 32-bit register at `offset`.
    fn read32(&self, offset: u32) -> u32;

    /// Write `val` to the 32-bit register at `offset`.
    fn write32(&mut self, offset: u32, val: u32);
}

/// A memory-mapped post-processor instance.
pub struct TrngPpReg {
    base: *mut u32,
}

impl TrngPpReg {
    /// Create a handle to the post-processor registers at `base`.
    ///
    /// # Safety
    ///
    /// `base` must be the address of the peripheral's register block and no
    /// other handles to the same peripheral may exist.
    pub const unsafe fn new(base: usize) -> Self {
        Self {
            base: base as *mut u32,
        }
    }
}

impl TrngPpMmio for TrngPpReg {
    fn read32(&self, offset: u32) -> u32 {
        // SAFETY: `new` guarantees `base` addresses the register block.
        unsafe { core::ptr::read_volatile(self.base.add((offset >> 2) as usize)) }
    }

    fn write32(&mut self, offset: u32, val: u32) {
        // SAFETY: `new` guarantees `base` addresses the register block.
        unsafe { core::ptr::write_volatile(self.base.add((offset >> 2) as usize), val) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volatile_access() {
        let mut block = [0u32; 32];
        let mut reg = unsafe { TrngPpReg::new(block.as_mut_ptr() as usize) };

        reg.write32(0x14, 0x8000);
        reg.write32(0x40, 0x1234_5678);
        assert_eq!(reg.read32(0x14), 0x8000);
        assert_eq!(reg.read32(0x40), 0x1234_5678);
        assert_eq!(reg.read32(0x10), 0);

        drop(reg);
        assert_eq!(block[5], 0x8000);
        assert_eq!(block[16], 0x1234_5678);
    }
}
