/*++

Licensed under the Apache-2.0 license.

File Name:

    poll.rs

Abstract:

    File contains the bounded polling loop used by the Known Answer Tests.

--*/

use trng_pp_drivers::Progress;
use trng_pp_error::{TrngPpError, TrngPpResult};

/// Default number of calls a KAT makes to a polling operation before
/// giving up.
pub const KAT_POLL_BUDGET: u32 = 100_000;

/// Call `step` until it reports something other than `BusyRetryLater`.
pub(crate) fn poll<F>(budget: u32, mut step: F) -> TrngPpResult<Progress>
where
    F: FnMut() -> TrngPpResult<Progress>,
{
    for _ in 0..budget {
        match step()? {
            Progress::BusyRetryLater => continue,
            progress => return Ok(progress),
        }
    }
    Err(TrngPpError::KAT_TRNG_PP_POLL_EXHAUSTED)
}
