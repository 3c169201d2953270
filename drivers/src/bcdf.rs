/*++

Licensed under the Apache-2.0 license.

File Name:

    bcdf.rs

Abstract:

    File contains the known-answer test handshakes specific to the
    block-cipher derivation function back-end: noise feeding and the
    two-pass generate test.

--*/

use crate::config::PS_AI_MAX_WORDS;
use crate::events::EventStatus;
use crate::fsm::State;
use crate::post_processor::ControlVal;
use crate::reg::trng_pp_regs::{
    self, BLOCK_WORDS, CONTROL, CONTROL_REG, INTACK, INTACK_REG, MAINSHIFTREG_H, MAINSHIFTREG_L,
    STATUS_REG,
};
use crate::variant::BcDf;
use crate::{cprintln, Progress, TrngPp, TrngPpError, TrngPpMmio, TrngPpResult};

/// Pack two raw noise words into the main shift register halves.
///
/// Each half takes the low 31 bits of its own word shifted up by one, with
/// the top bit of the other word in bit 0.
///
/// # Returns
///
/// * `(low, high)` - Values for MAINSHIFTREG_L and MAINSHIFTREG_H
pub const fn pack_noise(a: u32, b: u32) -> (u32, u32) {
    let low = ((a & 0x7fff_ffff) << 1) | ((b >> 31) & 1);
    let high = ((b & 0x7fff_ffff) << 1) | ((a >> 31) & 1);
    (low, high)
}

impl<R: TrngPpMmio> TrngPp<R, BcDf> {
    /// Write the PS/AI that reseeds the post-processor for a BC_DF test.
    ///
    /// The BC_DF back-end requires a complete PS/AI bank.
    pub fn bcdf_ps_ai_write(&mut self, ps_ai: &[u32]) -> TrngPpResult<()> {
        self.events = EventStatus::empty();
        if ps_ai.len() != PS_AI_MAX_WORDS {
            return Err(TrngPpError::DRIVER_TRNG_PP_BCDF_PS_AI_WORD_COUNT);
        }
        self.fsm.check(State::BcdfReseeded)?;

        self.write_ps_ai(ps_ai)?;
        self.index = 0;

        self.fsm.commit(State::BcdfReseeded)
    }

    /// Feed the next pair of words of `noise` to the main shift register.
    ///
    /// The same buffer must be passed on every call of a feeding run. The
    /// progress index wraps to zero once the buffer is used up.
    pub fn bcdf_noise_write(&mut self, noise: &[u32]) -> TrngPpResult<()> {
        self.events = EventStatus::empty();
        if noise.is_empty() || noise.len() % 2 != 0 || self.index >= noise.len() {
            return Err(TrngPpError::DRIVER_TRNG_PP_NOISE_BUFFER_INVALID);
        }
        self.fsm.check(State::BcdfNoiseFeeding)?;

        let (low, high) = pack_noise(noise[self.index], noise[self.index + 1]);
        self.regs.write32(MAINSHIFTREG_L, low);
        self.regs.write32(MAINSHIFTREG_H, high);

        self.index += 2;
        if self.index >= noise.len() {
            self.index = 0;
        }

        self.fsm.commit(State::BcdfNoiseFeeding)
    }

    /// Check whether the last noise block was processed.
    ///
    /// # Returns
    ///
    /// * `Processing` - Block processed, more noise to feed
    /// * `Complete` - Every noise block processed
    /// * `BusyRetryLater` - Block still being processed
    pub fn bcdf_status_get(&mut self) -> TrngPpResult<Progress> {
        self.events = EventStatus::empty();
        let status = self.read_status();

        if !status.is_set(STATUS_REG::TEST_READY) {
            self.fsm.commit(State::BcdfNoiseFeeding)?;
            return Ok(Progress::BusyRetryLater);
        }

        if self.index != 0 {
            self.fsm.commit(State::BcdfReseeded)?;
            Ok(Progress::Processing)
        } else {
            self.fsm.commit(State::BcdfReady)?;
            Ok(Progress::Complete)
        }
    }

    /// Request enough random blocks to cover `word_count` words.
    ///
    /// Blocks already latched in the output registers or buffered by the
    /// hardware count towards the request.
    pub fn bcdf_generate_start(&mut self, word_count: usize) -> TrngPpResult<Progress> {
        self.events = EventStatus::empty();
        if word_count == 0 {
            return Err(TrngPpError::DRIVER_TRNG_PP_GENERATE_WORD_COUNT);
        }

        let status = self.read_status();
        self.fsm.check(State::BcdfProcessing)?;

        let control = ControlVal::new(self.regs.read32(CONTROL));
        if control.read(CONTROL_REG::DATA_BLOCKS) != 0 {
            return Ok(Progress::BusyRetryLater);
        }

        let requested = word_count.div_ceil(BLOCK_WORDS);
        let available = (status.read(STATUS_REG::READY)
            + status.read(STATUS_REG::BLOCKS_AVAIL)) as usize;
        if available < requested {
            let shortfall = requested - available;
            if shortfall > self.config.max_request_blocks as usize {
                return Err(TrngPpError::DRIVER_TRNG_PP_REQUEST_BLOCK_COUNT);
            }
            self.regs.write32(
                CONTROL,
                (CONTROL_REG::REQUEST_DATA::SET + CONTROL_REG::DATA_BLOCKS.val(shortfall as u32))
                    .value,
            );
        }

        self.fsm.commit(State::BcdfProcessing)?;
        Ok(Progress::Complete)
    }

    /// Read the next block of a BC_DF generate test into `data`.
    ///
    /// The test runs the generate function twice. The output of the first
    /// pass is discarded and a reseed is requested, returning `Processing`;
    /// the caller then repeats the PS/AI, noise and generate steps. Once the
    /// second pass is read the test registers are restored and the state
    /// moves to `ReseedStart`, ready for the PS to be written again.
    ///
    /// # Returns
    ///
    /// * `BusyRetryLater` - No block ready, or more blocks to read
    /// * `Processing` - First pass done
    /// * `Complete` - Second pass done; `data` holds the result
    pub fn bcdf_result_read(&mut self, data: &mut [u32]) -> TrngPpResult<Progress> {
        self.events = EventStatus::empty();
        if self.index >= data.len() {
            return Err(TrngPpError::DRIVER_TRNG_PP_RESULT_BUFFER_INVALID);
        }
        self.fsm.check(State::BcdfProcessing)?;

        let status = self.read_status();
        if !status.is_set(STATUS_REG::READY) {
            self.fsm.commit(State::BcdfProcessing)?;
            return Ok(Progress::BusyRetryLater);
        }

        let next_index = self.index + BLOCK_WORDS;
        let pass_done = next_index >= data.len();
        if pass_done {
            self.fsm.check(if self.second_pass {
                State::RandomGenerating
            } else {
                State::KatStart
            })?;
        }

        // A trailing partial block only fills the words that fit.
        for i in 0..BLOCK_WORDS {
            let word = self.regs.read32(trng_pp_regs::output(i));
            if let Some(slot) = data.get_mut(self.index + i) {
                *slot = word;
            }
        }
        self.regs
            .write32(INTACK, INTACK_REG::READY_ACK::SET.value);

        if !pass_done {
            self.index = next_index;
            self.fsm.commit(State::BcdfProcessing)?;
            return Ok(Progress::BusyRetryLater);
        }

        self.index = 0;
        if self.second_pass {
            self.leave_test_mode();
            self.second_pass = false;
            self.fsm.commit(State::RandomGenerating)?;
            self.fsm.commit(State::ReseedStart)?;
            Ok(Progress::Complete)
        } else {
            self.fsm.commit(State::KatStart)?;
            self.second_pass = true;
            self.regs
                .write32(CONTROL, CONTROL_REG::ENABLE_RESEED::SET.value);
            cprintln!("[trng-pp] BC_DF first generate done, reseed requested");
            Ok(Progress::Processing)
        }
    }
}
