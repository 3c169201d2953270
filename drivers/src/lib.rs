/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the SP 800-90 TRNG post-processor driver.

--*/

#![cfg_attr(not(any(test, feature = "std")), no_std)]

mod bcdf;
mod config;
mod events;
mod fsm;
mod kat;
mod mmio;
mod post_processor;
pub mod printer;
pub mod reg;
mod variant;
mod wait;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use bcdf::pack_noise;
pub use config::{TrngPpConfig, PS_AI_MAX_WORDS, PS_AI_MIN_WORDS, REQUEST_DATA_MAX_BLOCKS};
pub use events::{EventStatus, TestMode};
pub use fsm::{Fsm, State};
pub use kat::VectorType;
pub use mmio::{TrngPpMmio, TrngPpReg};
pub use post_processor::{Progress, TrngPp};
pub use reg::trng_pp_regs::{BLOCK_WORDS, KEY_WORDS};
pub use trng_pp_error::{ErrorKind, TrngPpError, TrngPpResult};
pub use variant::{BcDf, Generic, Variant};
