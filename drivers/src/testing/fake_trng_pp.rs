/*++

Licensed under the Apache-2.0 license.

File Name:

    fake_trng_pp.rs

Abstract:

    File contains a fake implementation of the post-processor register
    interface.

--*/
use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};

use crate::reg::trng_pp_regs::{CONTROL, INTACK, STATUS, TEST};
use crate::TrngPpMmio;

/// A register file that logs every write and lets the test decide what
/// reads return.
///
/// Reads return, in order of precedence, the next scripted value for the
/// offset, or the value stored with `set`. Bits registered with `pin` are
/// ORed into every read of their offset.
///
/// Writes are logged. CONTROL and TEST are read/write registers, so writes
/// to them are stored. A write to INTACK clears the written bits of STATUS.
/// Every other register is write-only and the write is only logged.
///
/// All inspection methods take `&self` so they can be used through
/// `TrngPp::regs`.
///
/// # Example
///
/// ```
/// use trng_pp_drivers::testing::FakeTrngPp;
/// use trng_pp_drivers::TrngPpMmio;
///
/// let mut fake = FakeTrngPp::new();
/// fake.script(0x10, &[0, 0x100]);
/// assert_eq!(fake.read32(0x10), 0);
/// assert_eq!(fake.read32(0x10), 0x100);
/// assert_eq!(fake.read32(0x10), 0);
/// fake.write32(0x14, 0x8000);
/// assert_eq!(fake.take_writes(), vec![(0x14, 0x8000)]);
/// ```
#[derive(Default)]
pub struct FakeTrngPp {
    regs: RefCell<BTreeMap<u32, u32>>,
    scripts: RefCell<BTreeMap<u32, VecDeque<u32>>>,
    pinned: RefCell<BTreeMap<u32, u32>>,
    self_clearing: RefCell<BTreeMap<u32, u32>>,
    reads: RefCell<BTreeMap<u32, usize>>,
    writes: RefCell<Vec<(u32, u32)>>,
}

impl FakeTrngPp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `val` as the value read from `offset`. Not logged.
    pub fn set(&self, offset: u32, val: u32) {
        self.regs.borrow_mut().insert(offset, val);
    }

    /// Value stored for `offset`, ignoring scripts and pinned bits.
    pub fn get(&self, offset: u32) -> u32 {
        self.regs.borrow().get(&offset).copied().unwrap_or(0)
    }

    /// Queue values returned by the next reads of `offset`, one per read.
    pub fn script(&self, offset: u32, vals: &[u32]) {
        self.scripts
            .borrow_mut()
            .entry(offset)
            .or_default()
            .extend(vals.iter().copied());
    }

    /// OR `bits` into every read of `offset`. Models status bits the
    /// hardware keeps asserted.
    pub fn pin(&self, offset: u32, bits: u32) {
        *self.pinned.borrow_mut().entry(offset).or_default() |= bits;
    }

    /// Drop `mask` from every value written to `offset` before it is stored.
    /// Models control bits the hardware clears as soon as it acts on them.
    pub fn self_clearing(&self, offset: u32, mask: u32) {
        *self.self_clearing.borrow_mut().entry(offset).or_default() |= mask;
    }

    /// Number of reads of `offset` so far.
    pub fn reads_of(&self, offset: u32) -> usize {
        self.reads.borrow().get(&offset).copied().unwrap_or(0)
    }

    /// Every `(offset, value)` written so far.
    pub fn writes(&self) -> Vec<(u32, u32)> {
        self.writes.borrow().clone()
    }

    /// Values written to `offset` so far, oldest first.
    pub fn writes_to(&self, offset: u32) -> Vec<u32> {
        self.writes
            .borrow()
            .iter()
            .filter(|(o, _)| *o == offset)
            .map(|(_, val)| *val)
            .collect()
    }

    /// Return the write log and start a new one.
    pub fn take_writes(&self) -> Vec<(u32, u32)> {
        std::mem::take(&mut *self.writes.borrow_mut())
    }
}

impl TrngPpMmio for FakeTrngPp {
    fn read32(&self, offset: u32) -> u32 {
        *self.reads.borrow_mut().entry(offset).or_default() += 1;

        let scripted = self
            .scripts
            .borrow_mut()
            .get_mut(&offset)
            .and_then(VecDeque::pop_front);
        let val = scripted.unwrap_or_else(|| self.get(offset));
        val | self.pinned.borrow().get(&offset).copied().unwrap_or(0)
    }

    fn write32(&mut self, offset: u32, val: u32) {
        self.writes.borrow_mut().push((offset, val));

        match offset {
            INTACK => {
                let status = self.get(STATUS) & !val;
                self.set(STATUS, status);
            }
            CONTROL | TEST => {
                let mask = self
                    .self_clearing
                    .borrow()
                    .get(&offset)
                    .copied()
                    .unwrap_or(0);
                self.set(offset, val & !mask);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reg::trng_pp_regs::{key, output, ps_ai};

    #[test]
    fn test_scripted_reads() {
        let fake = FakeTrngPp::new();
        fake.set(STATUS, 0x1);
        fake.script(STATUS, &[0x100, 0x400]);

        assert_eq!(fake.read32(STATUS), 0x100);
        assert_eq!(fake.read32(STATUS), 0x400);
        assert_eq!(fake.read32(STATUS), 0x1);
        assert_eq!(fake.reads_of(STATUS), 3);
        assert_eq!(fake.reads_of(CONTROL), 0);
    }

    #[test]
    fn test_pinned_bits() {
        let mut fake = FakeTrngPp::new();
        fake.pin(STATUS, 0x1);
        fake.set(STATUS, 0x100);

        fake.write32(INTACK, 0x101);

        assert_eq!(fake.get(STATUS), 0);
        assert_eq!(fake.read32(STATUS), 0x1);
    }

    #[test]
    fn test_write_semantics() {
        let mut fake = FakeTrngPp::new();
        fake.self_clearing(CONTROL, 0x8000);

        fake.write32(CONTROL, 0x8400);
        fake.write32(TEST, 0x80);
        fake.write32(ps_ai(0), 0x1234);
        fake.write32(key(7), 0x5678);
        fake.set(output(0), 0xaaaa);
        fake.write32(output(0), 0xbbbb);

        assert_eq!(fake.read32(CONTROL), 0x400);
        assert_eq!(fake.read32(TEST), 0x80);
        assert_eq!(fake.read32(ps_ai(0)), 0);
        assert_eq!(fake.read32(output(0)), 0xaaaa);
        assert_eq!(fake.writes_to(CONTROL), vec![0x8400]);
        assert_eq!(fake.take_writes().len(), 5);
        assert!(fake.writes().is_empty());
    }
}
