/*++

Licensed under the Apache-2.0 license.

File Name:

    post_processor.rs

Abstract:

    File contains the driver context of the SP 800-90 post-processor and the
    reseed and generate handshakes shared by all back-ends.

--*/

use core::marker::PhantomData;

use crate::config::{TrngPpConfig, PS_AI_MAX_WORDS, PS_AI_MIN_WORDS};
use crate::events::{EventStatus, TestMode};
use crate::fsm::{Fsm, State};
use crate::reg::trng_pp_regs::{
    self, BLOCKCNT, BLOCKCNT_REG, CONTROL, CONTROL_REG, STATUS, STATUS_REG, TEST,
};
use crate::variant::Variant;
use crate::{cprintln, wait, TrngPpError, TrngPpMmio, TrngPpResult};
use tock_registers::LocalRegisterCopy;

pub(crate) type StatusVal = LocalRegisterCopy<u32, STATUS_REG::Register>;
pub(crate) type ControlVal = LocalRegisterCopy<u32, CONTROL_REG::Register>;

/// Outcome of a polling operation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Progress {
    /// The step finished and its state transition was committed.
    Complete,

    /// The hardware has not reached the required point yet. Call again.
    BusyRetryLater,

    /// One step of a multi-step operation finished. Supply the next chunk of
    /// input before calling again.
    Processing,
}

/// Driver context for one post-processor instance.
///
/// The context owns the register interface of its peripheral. Operations
/// take `&mut self`, so access to one instance is serialized by the borrow
/// checker.
pub struct TrngPp<R: TrngPpMmio, V: Variant> {
    pub(crate) regs: R,
    pub(crate) fsm: Fsm,
    pub(crate) saved_control: Option<u32>,
    pub(crate) index: usize,
    pub(crate) second_pass: bool,
    pub(crate) events: EventStatus,
    pub(crate) config: TrngPpConfig,
    _variant: PhantomData<V>,
}

impl<R: TrngPpMmio, V: Variant> TrngPp<R, V> {
    /// Create a driver context resting in `RandomGenerating`.
    pub fn new(regs: R) -> Self {
        Self::with_config(regs, TrngPpConfig::default())
    }

    pub fn with_config(regs: R, config: TrngPpConfig) -> Self {
        Self {
            regs,
            fsm: Fsm::new(),
            saved_control: None,
            index: 0,
            second_pass: false,
            events: EventStatus::empty(),
            config,
            _variant: PhantomData,
        }
    }

    /// Current protocol state.
    pub fn state(&self) -> State {
        self.fsm.state()
    }

    /// Event bits observed by the most recent operation.
    pub fn events(&self) -> EventStatus {
        self.events
    }

    /// Word offset of the multi-step operation in progress.
    pub fn progress_index(&self) -> usize {
        self.index
    }

    /// Control register value captured when the running test was started.
    pub fn saved_control(&self) -> Option<u32> {
        self.saved_control
    }

    /// Returns true once the first pass of the BC_DF generate test is done.
    pub fn second_pass_pending(&self) -> bool {
        self.second_pass
    }

    pub fn config(&self) -> &TrngPpConfig {
        &self.config
    }

    pub fn regs(&self) -> &R {
        &self.regs
    }

    /// Release the register interface, discarding the protocol state.
    pub fn into_regs(self) -> R {
        self.regs
    }

    /// Start a reseed of the post-processor.
    ///
    /// Requests the reseed and waits for the back-end's readiness bit.
    ///
    /// # Errors
    ///
    /// * Illegal transition if a reseed cannot start from the current state.
    /// * Timeout if readiness never shows; the state stays `ReseedStart`.
    pub fn reseed_start(&mut self) -> TrngPpResult<()> {
        self.events = EventStatus::empty();
        self.fsm.commit(State::ReseedStart)?;

        self.read_status();
        self.regs
            .write32(CONTROL, CONTROL_REG::ENABLE_RESEED::SET.value);

        let regs = &self.regs;
        let events = &mut self.events;
        let result = wait::until(
            self.config.reseed_ready_polls,
            TrngPpError::DRIVER_TRNG_PP_RESEED_READY_TIMEOUT,
            || {
                let status = StatusVal::new(regs.read32(STATUS));
                *events |= EventStatus::from_status(status.get());
                V::reseed_ready(&status)
            },
        );
        if let Err(err) = result {
            cprintln!("[trng-pp] {} reseed readiness timed out", V::NAME);
            return Err(err);
        }

        self.fsm.commit(State::ReseedReady)
    }

    /// Write the PS/AI of a started reseed.
    ///
    /// # Arguments
    ///
    /// * `ps_ai` - One to twelve personalization string / additional input
    ///   words.
    pub fn reseed_write(&mut self, ps_ai: &[u32]) -> TrngPpResult<()> {
        self.events = EventStatus::empty();
        check_ps_ai_len(ps_ai)?;
        self.fsm.check(State::ReseedWriting)?;

        self.write_ps_ai(ps_ai)?;

        let regs = &self.regs;
        let result = wait::until(
            self.config.reseed_accept_polls,
            TrngPpError::DRIVER_TRNG_PP_RESEED_ACCEPT_TIMEOUT,
            || !ControlVal::new(regs.read32(CONTROL)).is_set(CONTROL_REG::ENABLE_RESEED),
        );
        if let Err(err) = result {
            cprintln!("[trng-pp] reseed request not accepted");
            return Err(err);
        }

        self.fsm.commit(State::ReseedWriting)
    }

    /// Check whether the reseed has finished.
    pub fn is_busy(&mut self) -> TrngPpResult<Progress> {
        self.events = EventStatus::empty();
        self.read_status();
        self.fsm.check(State::RandomGenerating)?;

        let control = ControlVal::new(self.regs.read32(CONTROL));
        if control.is_set(CONTROL_REG::ENABLE_RESEED) {
            return Ok(Progress::BusyRetryLater);
        }

        self.fsm.commit(State::RandomGenerating)?;
        Ok(Progress::Complete)
    }

    /// Check whether the back-end signals readiness.
    ///
    /// The generic back-end returns to `RandomGenerating` on test ready; the
    /// BC_DF back-end moves to `ReseedReady` on reseed-AI ready so the PS can
    /// be written again.
    pub fn is_ready(&mut self) -> TrngPpResult<Progress> {
        self.events = EventStatus::empty();
        let status = self.read_status();
        self.fsm.check(V::READY_STATE)?;

        if !V::reseed_ready(&status) {
            return Ok(Progress::BusyRetryLater);
        }

        self.fsm.commit(V::READY_STATE)?;
        Ok(Progress::Complete)
    }

    /// Write PS/AI outside of a reseed handshake.
    pub fn ps_ai_write(&mut self, ps_ai: &[u32]) -> TrngPpResult<()> {
        self.events = EventStatus::empty();
        check_ps_ai_len(ps_ai)?;
        self.fsm.check(State::RandomGenerating)?;

        self.write_ps_ai(ps_ai)?;

        self.fsm.commit(State::RandomGenerating)
    }

    /// Sample the status register without changing state.
    pub fn status_get(&mut self) -> EventStatus {
        self.read_status();
        self.events
    }

    /// Number of 128-bit blocks generated since the last reseed.
    ///
    /// Under SP 800-90 post-processing three blocks are produced per
    /// generate, so this counter runs three times as fast as the number of
    /// generate operations.
    pub fn block_count_get(&self) -> u32 {
        LocalRegisterCopy::<u32, BLOCKCNT_REG::Register>::new(self.regs.read32(BLOCKCNT))
            .read(BLOCKCNT_REG::BLOCK_COUNT)
    }

    /// Read the status register and replace the event snapshot.
    pub(crate) fn read_status(&mut self) -> StatusVal {
        let status = StatusVal::new(self.regs.read32(STATUS));
        self.events = EventStatus::from_status(status.get());
        status
    }

    /// Write PS/AI words, padding the bank so the hardware sees the final
    /// word written.
    pub(crate) fn write_ps_ai(&mut self, ps_ai: &[u32]) -> TrngPpResult<()> {
        let status = self.read_status();
        if !status.is_set(STATUS_REG::TEST_READY) && !status.is_set(STATUS_REG::RESEED_AI) {
            return Err(TrngPpError::DRIVER_TRNG_PP_PS_AI_NOT_READY);
        }

        for (i, &word) in ps_ai.iter().enumerate() {
            self.regs.write32(trng_pp_regs::ps_ai(i), word);
        }

        // Word 11 is the completion detection point.
        if ps_ai.len() < PS_AI_MAX_WORDS {
            self.regs
                .write32(trng_pp_regs::ps_ai(PS_AI_MAX_WORDS - 1), 0);
        }

        Ok(())
    }

    /// Clear every post-processor test and restore the control register
    /// captured at test entry.
    pub(crate) fn leave_test_mode(&mut self) {
        let test = self.regs.read32(TEST) & !TestMode::all().bits();
        self.regs.write32(TEST, test);

        if let Some(control) = self.saved_control.take() {
            self.regs.write32(CONTROL, control);
        }
    }
}

fn check_ps_ai_len(ps_ai: &[u32]) -> TrngPpResult<()> {
    if (PS_AI_MIN_WORDS..=PS_AI_MAX_WORDS).contains(&ps_ai.len()) {
        Ok(())
    } else {
        Err(TrngPpError::DRIVER_TRNG_PP_PS_AI_WORD_COUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reg::trng_pp_regs::ps_ai;
    use crate::testing::FakeTrngPp;
    use crate::{BcDf, Generic};
    use trng_pp_error::ErrorKind;

    const TEST_READY: u32 = 1 << 8;
    const RESEED_AI: u32 = 1 << 10;
    const ENABLE_RESEED: u32 = 1 << 15;

    fn generic() -> TrngPp<FakeTrngPp, Generic> {
        TrngPp::with_config(
            FakeTrngPp::new(),
            TrngPpConfig::new()
                .reseed_ready_polls(8)
                .reseed_accept_polls(8),
        )
    }

    #[test]
    fn test_reseed_start_waits_for_test_ready() {
        let mut pp = generic();
        pp.regs().script(STATUS, &[0, 0, 0, TEST_READY]);

        pp.reseed_start().unwrap();

        assert_eq!(pp.state(), State::ReseedReady);
        assert_eq!(pp.regs().writes_to(CONTROL), vec![ENABLE_RESEED]);
        assert!(pp.events().contains(EventStatus::TEST_READY));
    }

    #[test]
    fn test_reseed_start_bcdf_waits_for_reseed_ai() {
        let mut pp: TrngPp<_, BcDf> = TrngPp::new(FakeTrngPp::new());
        // TEST_READY alone does not satisfy the BC_DF back-end.
        pp.regs().script(STATUS, &[TEST_READY, TEST_READY, RESEED_AI]);

        pp.reseed_start().unwrap();

        assert_eq!(pp.state(), State::ReseedReady);
        assert_eq!(pp.regs().reads_of(STATUS), 3);
    }

    #[test]
    fn test_reseed_start_timeout() {
        let mut pp = generic();

        let err = pp.reseed_start().unwrap_err();

        assert_eq!(err, TrngPpError::DRIVER_TRNG_PP_RESEED_READY_TIMEOUT);
        assert_eq!(err.kind(), ErrorKind::HardwareTimeout);
        // The first transition stays committed.
        assert_eq!(pp.state(), State::ReseedStart);
        // One initial sample plus the bounded wait.
        assert_eq!(pp.regs().reads_of(STATUS), 9);
    }

    #[test]
    fn test_reseed_start_rejected_outside_random_generating() {
        let mut pp = generic();
        pp.regs().set(STATUS, TEST_READY);
        pp.reseed_start().unwrap();
        pp.regs().take_writes();

        let err = pp.reseed_start().unwrap_err();

        assert_eq!(err.kind(), ErrorKind::IllegalState);
        assert_eq!(pp.state(), State::ReseedReady);
        assert!(pp.regs().writes().is_empty());
    }

    #[test]
    fn test_reseed_write_pads_with_dummy_word() {
        let mut pp = generic();
        pp.regs().set(STATUS, TEST_READY);
        pp.reseed_start().unwrap();
        pp.regs().set(CONTROL, 0);
        pp.regs().take_writes();

        let words: Vec<u32> = (1..=11).collect();
        pp.reseed_write(&words).unwrap();

        assert_eq!(pp.state(), State::ReseedWriting);
        let writes = pp.regs().take_writes();
        let expected: Vec<(u32, u32)> = (0..11)
            .map(|i| (ps_ai(i), i as u32 + 1))
            .chain([(ps_ai(11), 0)])
            .collect();
        assert_eq!(writes, expected);
    }

    #[test]
    fn test_full_ps_ai_has_no_dummy_word() {
        let mut pp = generic();
        pp.regs().set(STATUS, TEST_READY);

        let words = [0xa5a5_a5a5u32; 12];
        pp.ps_ai_write(&words).unwrap();

        let writes = pp.regs().take_writes();
        assert_eq!(writes.len(), 12);
        assert_eq!(writes[11], (ps_ai(11), 0xa5a5_a5a5));
        assert_eq!(pp.state(), State::RandomGenerating);
    }

    #[test]
    fn test_every_partial_ps_ai_ends_with_zero() {
        for len in 1..PS_AI_MAX_WORDS {
            let mut pp = generic();
            pp.regs().set(STATUS, RESEED_AI);
            let words = vec![u32::MAX; len];

            pp.ps_ai_write(&words).unwrap();

            let writes = pp.regs().take_writes();
            assert_eq!(writes.len(), len + 1, "len {len}");
            assert_eq!(writes.last(), Some(&(ps_ai(11), 0)), "len {len}");
        }
    }

    #[test]
    fn test_ps_ai_word_count_checked_before_hardware() {
        let mut pp = generic();
        for words in [&[][..], &[0u32; 13][..]] {
            assert_eq!(
                pp.ps_ai_write(words),
                Err(TrngPpError::DRIVER_TRNG_PP_PS_AI_WORD_COUNT)
            );
            assert_eq!(
                pp.reseed_write(words),
                Err(TrngPpError::DRIVER_TRNG_PP_PS_AI_WORD_COUNT)
            );
        }
        assert_eq!(pp.regs().reads_of(STATUS), 0);
        assert!(pp.regs().writes().is_empty());
    }

    #[test]
    fn test_ps_ai_requires_ready_status() {
        let mut pp = generic();
        pp.regs().set(STATUS, 1 << 3);

        let err = pp.ps_ai_write(&[1, 2, 3]).unwrap_err();

        assert_eq!(err, TrngPpError::DRIVER_TRNG_PP_PS_AI_NOT_READY);
        assert!(pp.regs().writes().is_empty());
        // The event bits of the failed call are still reported.
        assert_eq!(pp.events(), EventStatus::NOISE_FAIL);
    }

    #[test]
    fn test_reseed_write_accept_timeout() {
        let mut pp = generic();
        pp.regs().set(STATUS, TEST_READY);
        pp.reseed_start().unwrap();

        // ENABLE_RESEED never clears.
        let err = pp.reseed_write(&[1]).unwrap_err();

        assert_eq!(err, TrngPpError::DRIVER_TRNG_PP_RESEED_ACCEPT_TIMEOUT);
        assert_eq!(pp.state(), State::ReseedReady);
    }

    #[test]
    fn test_is_busy() {
        let mut pp = generic();
        pp.regs().set(STATUS, TEST_READY);
        pp.reseed_start().unwrap();
        pp.regs().set(CONTROL, 0);
        pp.reseed_write(&[1, 2]).unwrap();

        pp.regs().set(CONTROL, ENABLE_RESEED);
        assert_eq!(pp.is_busy(), Ok(Progress::BusyRetryLater));
        assert_eq!(pp.state(), State::ReseedWriting);

        pp.regs().set(CONTROL, 0);
        assert_eq!(pp.is_busy(), Ok(Progress::Complete));
        assert_eq!(pp.state(), State::RandomGenerating);
    }

    #[test]
    fn test_is_ready_generic() {
        let mut pp = generic();
        assert_eq!(pp.is_ready(), Ok(Progress::BusyRetryLater));

        pp.regs().set(STATUS, TEST_READY);
        assert_eq!(pp.is_ready(), Ok(Progress::Complete));
        assert_eq!(pp.state(), State::RandomGenerating);
    }

    #[test]
    fn test_is_ready_bcdf_rejected_outside_reseed_start() {
        let mut pp: TrngPp<_, BcDf> = TrngPp::new(FakeTrngPp::new());
        pp.regs().set(STATUS, RESEED_AI);

        let err = pp.is_ready().unwrap_err();

        assert_eq!(err, TrngPpError::DRIVER_TRNG_PP_ILLEGAL_TRANSITION);
        assert_eq!(pp.state(), State::RandomGenerating);
        assert_eq!(pp.events(), EventStatus::RESEED_AI);
    }

    #[test]
    fn test_is_ready_bcdf_not_busy_outside_reseed_start() {
        let mut pp: TrngPp<_, BcDf> = TrngPp::new(FakeTrngPp::new());

        // Reseed-AI is not ready either; the state is checked first.
        assert_eq!(
            pp.is_ready(),
            Err(TrngPpError::DRIVER_TRNG_PP_ILLEGAL_TRANSITION)
        );
        assert_eq!(pp.state(), State::RandomGenerating);
        assert!(pp.regs().writes().is_empty());
    }

    #[test]
    fn test_reseed_write_requires_ready_status() {
        let mut pp = generic();
        pp.regs().script(STATUS, &[0, TEST_READY]);
        pp.reseed_start().unwrap();
        assert_eq!(pp.state(), State::ReseedReady);
        pp.regs().take_writes();

        // Neither test ready nor reseed-AI ready.
        let err = pp.reseed_write(&[1, 2, 3]).unwrap_err();

        assert_eq!(err, TrngPpError::DRIVER_TRNG_PP_PS_AI_NOT_READY);
        assert_eq!(err.kind(), ErrorKind::IllegalState);
        assert_eq!(pp.state(), State::ReseedReady);
        assert!(pp.regs().writes().is_empty());
    }

    #[test]
    fn test_block_count_get() {
        let pp = generic();
        pp.regs().set(BLOCKCNT, 0x0000_0123);
        assert_eq!(pp.block_count_get(), 0x12);
    }

    #[test]
    fn test_status_get_does_not_transition() {
        let mut pp = generic();
        pp.regs().set(STATUS, 0x0003_0101);
        assert_eq!(
            pp.status_get(),
            EventStatus::READY | EventStatus::TEST_READY
        );
        assert_eq!(pp.state(), State::RandomGenerating);
    }
}
