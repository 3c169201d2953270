/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the TRNG post-processor Known Answer Tests.

--*/

#![cfg_attr(not(test), no_std)]

mod aes_core_kat;
mod bcdf_kat;
mod poll;

pub use aes_core_kat::AesCoreKat;
pub use bcdf_kat::{BcdfKat, BcdfVector, BCDF_OUTPUT_WORDS};
pub use poll::KAT_POLL_BUDGET;
pub use trng_pp_error::{TrngPpError, TrngPpResult};
