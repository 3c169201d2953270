/*++

Licensed under the Apache-2.0 license.

File Name:

    kat.rs

Abstract:

    File contains the known-answer test handshakes of the post-processor:
    test entry, key/input/NIST vector injection and result read-out.

--*/

use crate::config::{PS_AI_MAX_WORDS, PS_AI_MIN_WORDS};
use crate::events::{EventStatus, TestMode};
use crate::fsm::State;
use crate::reg::trng_pp_regs::{
    self, BLOCK_WORDS, CONTROL, KEY_WORDS, STATUS_REG, TEST,
};
use crate::variant::Variant;
use crate::{TrngPp, TrngPpError, TrngPpMmio, TrngPpResult};

/// Position of a NIST vector within a known-answer test run.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VectorType {
    /// First vector of a run; the output registers hold nothing stale.
    First,

    /// A later vector; results of the previous vector are still latched in
    /// the output registers and are drained before writing.
    Subsequent,
}

impl<R: TrngPpMmio, V: Variant> TrngPp<R, V> {
    /// Enter test mode.
    ///
    /// Captures the control register so it can be restored when the test
    /// finishes, then enables `tests` in the test register.
    pub fn kat_start(&mut self, tests: TestMode) -> TrngPpResult<()> {
        self.events = EventStatus::empty();
        self.fsm.check(State::KatStart)?;

        self.read_status();
        self.saved_control = Some(self.regs.read32(CONTROL));
        let test = self.regs.read32(TEST) | tests.bits();
        self.regs.write32(TEST, test);

        self.fsm.commit(State::KatStart)
    }

    /// Write the 256-bit key used by the AES core.
    ///
    /// Keys may be written at any time; the protocol state is not changed.
    pub fn key_write(&mut self, key: &[u32; KEY_WORDS]) {
        self.events = EventStatus::empty();
        for (i, &word) in key.iter().enumerate() {
            self.regs.write32(trng_pp_regs::key(i), word);
        }
    }

    /// Write the PS/AI of a NIST known-answer vector.
    ///
    /// # Arguments
    ///
    /// * `ps_ai` - One to twelve PS/AI words
    /// * `vector_type` - Whether an earlier vector's result must be drained
    pub fn nist_write(&mut self, ps_ai: &[u32], vector_type: VectorType) -> TrngPpResult<()> {
        self.events = EventStatus::empty();
        if !(PS_AI_MIN_WORDS..=PS_AI_MAX_WORDS).contains(&ps_ai.len()) {
            return Err(TrngPpError::DRIVER_TRNG_PP_PS_AI_WORD_COUNT);
        }
        self.fsm.check(State::KatProcessing)?;

        if vector_type == VectorType::Subsequent {
            for i in 0..BLOCK_WORDS {
                self.regs.read32(trng_pp_regs::output(i));
            }
        }

        self.write_ps_ai(ps_ai)?;

        self.fsm.commit(State::KatProcessing)
    }

    /// Write the block cipher input of the AES core known-answer test.
    pub fn input_write(&mut self, input: &[u32; BLOCK_WORDS]) -> TrngPpResult<()> {
        self.events = EventStatus::empty();
        self.fsm.check(State::KatProcessing)?;

        self.read_status();

        // The write of word 3 hands the block to the hardware.
        for (i, &word) in input.iter().enumerate() {
            self.regs.write32(trng_pp_regs::input(i), word);
        }

        self.fsm.commit(State::KatProcessing)
    }

    /// Read the result of a known-answer test and leave test mode.
    ///
    /// Works for both the AES core test and the NIST test of the complete
    /// post-processor, on every back-end.
    ///
    /// # Errors
    ///
    /// * Test result not ready if the status does not show test ready; the
    ///   context is unchanged.
    pub fn result_read(&mut self, output: &mut [u32; BLOCK_WORDS]) -> TrngPpResult<()> {
        self.events = EventStatus::empty();

        let status = self.read_status();
        if !status.is_set(STATUS_REG::TEST_READY) {
            return Err(TrngPpError::DRIVER_TRNG_PP_TEST_RESULT_NOT_READY);
        }
        self.fsm.check(State::RandomGenerating)?;

        for (i, word) in output.iter_mut().enumerate() {
            *word = self.regs.read32(trng_pp_regs::output(i));
        }

        self.leave_test_mode();

        self.fsm.commit(State::RandomGenerating)
    }
}
