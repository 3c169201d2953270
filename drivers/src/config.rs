/*++

Licensed under the Apache-2.0 license.

File Name:

    config.rs

Abstract:

    File contains the tunable limits of the post-processor driver.

--*/

use crate::reg::trng_pp_regs::PS_AI_WORDS;

/// Smallest PS/AI write accepted by the generic writer.
pub const PS_AI_MIN_WORDS: usize = 1;

/// Largest PS/AI write; also the only size the BC_DF back-end accepts.
pub const PS_AI_MAX_WORDS: usize = PS_AI_WORDS;

/// Largest block count the 12-bit request field of CONTROL can encode.
pub const REQUEST_DATA_MAX_BLOCKS: u32 = 0xfff;

/// Limits applied by a driver context.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TrngPpConfig {
    /// Status polls allowed while waiting for the reseed readiness bit.
    pub(crate) reseed_ready_polls: u32,

    /// Control polls allowed while waiting for a reseed request to be
    /// accepted after PS/AI was written.
    pub(crate) reseed_accept_polls: u32,

    /// Largest number of 128-bit blocks a single BC_DF generate request may
    /// ask the hardware for.
    pub(crate) max_request_blocks: u32,
}

impl TrngPpConfig {
    pub const fn new() -> Self {
        Self {
            reseed_ready_polls: 250000,
            reseed_accept_polls: 250000,
            max_request_blocks: REQUEST_DATA_MAX_BLOCKS,
        }
    }

    pub const fn reseed_ready_polls(mut self, polls: u32) -> Self {
        self.reseed_ready_polls = polls;
        self
    }

    pub const fn reseed_accept_polls(mut self, polls: u32) -> Self {
        self.reseed_accept_polls = polls;
        self
    }

    /// Values above the request field's width are clamped to it.
    pub const fn max_request_blocks(mut self, blocks: u32) -> Self {
        self.max_request_blocks = if blocks > REQUEST_DATA_MAX_BLOCKS {
            REQUEST_DATA_MAX_BLOCKS
        } else {
            blocks
        };
        self
    }
}

impl Default for TrngPpConfig {
    fn default() -> Self {
        Self::new()
    }
}
