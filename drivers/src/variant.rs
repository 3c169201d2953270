/*++

Licensed under the Apache-2.0 license.

File Name:

    variant.rs

Abstract:

    File contains the post-processing back-end variants. A driver context is
    bound to one back-end when it is constructed.

--*/

use crate::fsm::State;
use crate::reg::trng_pp_regs::STATUS_REG;
use tock_registers::LocalRegisterCopy;

/// Back-end specific parts of the reseed and generate handshakes.
pub trait Variant {
    /// Human readable back-end name.
    const NAME: &'static str;

    /// State committed by `is_ready` once the hardware signals readiness.
    const READY_STATE: State;

    /// Returns true if `status` shows the post-processor ready to accept the
    /// PS/AI of a reseed.
    fn reseed_ready(status: &LocalRegisterCopy<u32, STATUS_REG::Register>) -> bool;
}

/// Hash/derivation function back-end.
#[derive(Debug)]
pub enum Generic {}

impl Variant for Generic {
    const NAME: &'static str = "generic";
    const READY_STATE: State = State::RandomGenerating;

    fn reseed_ready(status: &LocalRegisterCopy<u32, STATUS_REG::Register>) -> bool {
        status.is_set(STATUS_REG::TEST_READY)
    }
}

/// Block-cipher derivation function back-end.
///
/// Adds noise feeding and the two-pass generate test on top of the common
/// operations.
#[derive(Debug)]
pub enum BcDf {}

impl Variant for BcDf {
    const NAME: &'static str = "BC_DF";
    const READY_STATE: State = State::ReseedReady;

    fn reseed_ready(status: &LocalRegisterCopy<u32, STATUS_REG::Register>) -> bool {
        status.is_set(STATUS_REG::RESEED_AI)
    }
}
