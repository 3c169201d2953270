/*++

Licensed under the Apache-2.0 license.

File Name:

    mod.rs

Abstract:

    File contains register definitions for the TRNG post-processor

--*/

pub mod trng_pp_regs;
