/*++

Licensed under the Apache-2.0 license.

File Name:

    wait.rs

Abstract:

    File contains common functions to implement bounded wait routines.

--*/

use crate::{TrngPpError, TrngPpResult};

/// Poll `predicate` until it holds, at most `max_polls` times.
///
/// Returns `err` if the predicate never held.
pub fn until<F>(max_polls: u32, err: TrngPpError, mut predicate: F) -> TrngPpResult<()>
where
    F: FnMut() -> bool,
{
    for _ in 0..max_polls {
        if predicate() {
            return Ok(());
        }
    }
    Err(err)
}
