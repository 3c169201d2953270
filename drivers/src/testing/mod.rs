/*++

Licensed under the Apache-2.0 license.

File Name:

    mod.rs

Abstract:

    File contains exports for code useful for testing the post-processor
    driver without hardware.

--*/
mod fake_trng_pp;

pub use fake_trng_pp::FakeTrngPp;
