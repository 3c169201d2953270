/*++

Licensed under the Apache-2.0 license.

File Name:

    aes_core_kat.rs

Abstract:

    File contains the Known Answer Test (KAT) for the AES-256 core of the
    post-processor.

--*/

use trng_pp_drivers::{
    EventStatus, TestMode, TrngPp, TrngPpMmio, Variant, BLOCK_WORDS, KEY_WORDS,
};
use trng_pp_error::{TrngPpError, TrngPpResult};

use crate::KAT_POLL_BUDGET;

// FIPS-197 Appendix C.3, AES-256
const KEY: [u32; KEY_WORDS] = [
    0x00010203, 0x04050607, 0x08090a0b, 0x0c0d0e0f, 0x10111213, 0x14151617, 0x18191a1b,
    0x1c1d1e1f,
];
const PLAINTEXT: [u32; BLOCK_WORDS] = [0x00112233, 0x44556677, 0x8899aabb, 0xccddeeff];
const CIPHERTEXT: [u32; BLOCK_WORDS] = [0x8ea2b7ca, 0x516745bf, 0xeafc4990, 0x4b496089];

#[derive(Debug)]
pub struct AesCoreKat {
    poll_budget: u32,
}

impl Default for AesCoreKat {
    fn default() -> Self {
        Self {
            poll_budget: KAT_POLL_BUDGET,
        }
    }
}

impl AesCoreKat {
    /// Limit the status polls spent waiting for the cipher result.
    pub fn with_poll_budget(poll_budget: u32) -> Self {
        Self { poll_budget }
    }

    /// This function executes the Known Answer Test (aka KAT) for the AES
    /// core.
    ///
    /// # Arguments
    ///
    /// * `pp` - Post-processor driver, resting in `RandomGenerating`
    ///
    /// # Returns
    ///
    /// * `TrngPpResult` - Result denoting the KAT outcome.
    pub fn execute<R: TrngPpMmio, V: Variant>(&self, pp: &mut TrngPp<R, V>) -> TrngPpResult<()> {
        pp.kat_start(TestMode::POST_PROC)?;
        pp.key_write(&KEY);
        pp.input_write(&PLAINTEXT)?;

        let mut polls = 0;
        while !pp.status_get().contains(EventStatus::TEST_READY) {
            polls += 1;
            if polls >= self.poll_budget {
                Err(TrngPpError::KAT_TRNG_PP_POLL_EXHAUSTED)?;
            }
        }

        let mut ciphertext = [0u32; BLOCK_WORDS];
        pp.result_read(&mut ciphertext)?;
        if ciphertext != CIPHERTEXT {
            Err(TrngPpError::KAT_TRNG_PP_AES_CORE_FAILURE)?;
        }

        Ok(())
    }
}
