/*++

Licensed under the Apache-2.0 license.

File Name:

    bcdf_kat.rs

Abstract:

    File contains the NIST Known Answer Test (KAT) for the block-cipher
    derivation function post-processor.

--*/

use trng_pp_drivers::{BcDf, Progress, TestMode, TrngPp, TrngPpMmio, PS_AI_MAX_WORDS};
use trng_pp_error::{TrngPpError, TrngPpResult};

use crate::poll::poll;
use crate::KAT_POLL_BUDGET;

/// Words returned by each generate of the test.
pub const BCDF_OUTPUT_WORDS: usize = 16;

/// A BC_DF known-answer vector.
///
/// The test instantiates the DRBG from `noise` and `ps_ai[0]`, generates
/// once and discards the output, reseeds from `noise` and `ps_ai[1]`, and
/// generates again. The second output must equal `expected`.
#[derive(Debug)]
pub struct BcdfVector<'a> {
    pub ps_ai: [&'a [u32; PS_AI_MAX_WORDS]; 2],
    pub noise: &'a [u32],
    pub expected: &'a [u32; BCDF_OUTPUT_WORDS],
}

#[derive(Debug)]
pub struct BcdfKat<'a> {
    vector: BcdfVector<'a>,
    poll_budget: u32,
}

impl<'a> BcdfKat<'a> {
    pub fn new(vector: BcdfVector<'a>) -> Self {
        Self {
            vector,
            poll_budget: KAT_POLL_BUDGET,
        }
    }

    /// Limit the calls spent on each polling step.
    pub fn poll_budget(mut self, poll_budget: u32) -> Self {
        self.poll_budget = poll_budget;
        self
    }

    /// This function executes the Known Answer Test (aka KAT) for the BC_DF
    /// post-processor and then restores normal operation by writing
    /// `personalization` as the new personalization string.
    ///
    /// # Arguments
    ///
    /// * `pp` - BC_DF post-processor driver, resting in `RandomGenerating`
    /// * `personalization` - Personalization string for normal operation
    ///
    /// # Returns
    ///
    /// * `TrngPpResult` - Result denoting the KAT outcome.
    pub fn execute<R: TrngPpMmio>(
        &self,
        pp: &mut TrngPp<R, BcDf>,
        personalization: &[u32],
    ) -> TrngPpResult<()> {
        pp.kat_start(TestMode::SP_800_90 | TestMode::KNOWN_NOISE)?;

        let mut output = [0u32; BCDF_OUTPUT_WORDS];
        self.generate(pp, self.vector.ps_ai[0], &mut output, Progress::Processing)?;
        self.generate(pp, self.vector.ps_ai[1], &mut output, Progress::Complete)?;

        if output != *self.vector.expected {
            Err(TrngPpError::KAT_TRNG_PP_BCDF_FAILURE)?;
        }

        if poll(self.poll_budget, || pp.is_ready())? != Progress::Complete {
            Err(TrngPpError::KAT_TRNG_PP_BCDF_SEQUENCE)?;
        }
        pp.reseed_write(personalization)?;
        if poll(self.poll_budget, || pp.is_busy())? != Progress::Complete {
            Err(TrngPpError::KAT_TRNG_PP_BCDF_SEQUENCE)?;
        }

        Ok(())
    }

    /// One reseed, noise feed and generate pass. `last` is the progress the
    /// final result read must report.
    fn generate<R: TrngPpMmio>(
        &self,
        pp: &mut TrngPp<R, BcDf>,
        ps_ai: &[u32; PS_AI_MAX_WORDS],
        output: &mut [u32; BCDF_OUTPUT_WORDS],
        last: Progress,
    ) -> TrngPpResult<()> {
        pp.bcdf_ps_ai_write(ps_ai)?;

        loop {
            pp.bcdf_noise_write(self.vector.noise)?;
            match poll(self.poll_budget, || pp.bcdf_status_get())? {
                Progress::Processing => continue,
                _ => break,
            }
        }

        poll(self.poll_budget, || pp.bcdf_generate_start(BCDF_OUTPUT_WORDS))?;

        if poll(self.poll_budget, || pp.bcdf_result_read(&mut output[..]))? != last {
            Err(TrngPpError::KAT_TRNG_PP_BCDF_SEQUENCE)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trng_pp_drivers::reg::trng_pp_regs::{
        output, ps_ai, CONTROL, MAINSHIFTREG_L, STATUS, TEST,
    };
    use trng_pp_drivers::testing::FakeTrngPp;
    use trng_pp_drivers::State;

    const READY: u32 = 1 << 0;
    const TEST_READY: u32 = 1 << 8;
    const RESEED_AI: u32 = 1 << 10;

    const PS_AI_FIRST: [u32; 12] = [0x1111_1111; 12];
    const PS_AI_SECOND: [u32; 12] = [0x2222_2222; 12];
    const NOISE: [u32; 8] = [1, 2, 3, 4, 5, 6, 7, 8];
    const BLOCK: [u32; 4] = [0xb1, 0xb2, 0xb3, 0xb4];
    const EXPECTED: [u32; 16] = [
        0xb1, 0xb2, 0xb3, 0xb4, 0xb1, 0xb2, 0xb3, 0xb4, 0xb1, 0xb2, 0xb3, 0xb4, 0xb1, 0xb2,
        0xb3, 0xb4,
    ];

    fn vector(expected: &[u32; 16]) -> BcdfVector<'_> {
        BcdfVector {
            ps_ai: [&PS_AI_FIRST, &PS_AI_SECOND],
            noise: &NOISE,
            expected,
        }
    }

    /// A post-processor that finishes every step as soon as it is asked.
    fn pp() -> TrngPp<FakeTrngPp, BcDf> {
        let fake = FakeTrngPp::new();
        fake.set(CONTROL, 0x0000_0400);
        fake.self_clearing(CONTROL, 0xfff1_8000);
        fake.pin(STATUS, READY | TEST_READY | RESEED_AI);
        for (i, &word) in BLOCK.iter().enumerate() {
            fake.set(output(i), word);
        }
        TrngPp::new(fake)
    }

    #[test]
    fn test_kat_passes() {
        let mut pp = pp();

        assert_eq!(
            BcdfKat::new(vector(&EXPECTED)).execute(&mut pp, &[0x600d; 4]),
            Ok(())
        );

        assert_eq!(pp.state(), State::RandomGenerating);
        // Four noise blocks per pass.
        assert_eq!(pp.regs().writes_to(MAINSHIFTREG_L).len(), 8);
        assert_eq!(pp.regs().writes_to(ps_ai(11)), vec![0x1111_1111, 0x2222_2222, 0]);
        assert_eq!(pp.regs().writes_to(ps_ai(0)).last(), Some(&0x600d));
        assert_eq!(pp.regs().get(TEST), 0);
        assert_eq!(pp.regs().get(CONTROL), 0x0000_0400);
    }

    #[test]
    fn test_kat_detects_mismatch() {
        let mut pp = pp();
        let mut expected = EXPECTED;
        expected[15] ^= 1;

        assert_eq!(
            BcdfKat::new(vector(&expected)).execute(&mut pp, &[0x600d; 4]),
            Err(TrngPpError::KAT_TRNG_PP_BCDF_FAILURE)
        );
        assert_eq!(pp.state(), State::ReseedStart);
    }

    #[test]
    fn test_kat_poll_exhausted() {
        let fake = FakeTrngPp::new();
        fake.set(STATUS, RESEED_AI);
        let mut pp: TrngPp<_, BcDf> = TrngPp::new(fake);

        // The noise block is never processed.
        assert_eq!(
            BcdfKat::new(vector(&EXPECTED))
                .poll_budget(5)
                .execute(&mut pp, &[0x600d; 4]),
            Err(TrngPpError::KAT_TRNG_PP_POLL_EXHAUSTED)
        );
        assert_eq!(pp.state(), State::BcdfNoiseFeeding);
    }

    #[test]
    fn test_kat_rejected_outside_random_generating() {
        let fake = FakeTrngPp::new();
        fake.set(STATUS, RESEED_AI);
        let mut pp: TrngPp<_, BcDf> = TrngPp::new(fake);
        pp.reseed_start().unwrap();

        let err = BcdfKat::new(vector(&EXPECTED))
            .execute(&mut pp, &[0x600d; 4])
            .unwrap_err();

        assert_eq!(err, TrngPpError::DRIVER_TRNG_PP_ILLEGAL_TRANSITION);
        assert_eq!(pp.state(), State::ReseedReady);
    }
}
