/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains API and macros used by the TRNG post-processor crates for
    error handling.

--*/
#![cfg_attr(not(any(test, feature = "std")), no_std)]
use core::convert::From;
use core::num::{NonZeroU32, TryFromIntError};

/// TRNG post-processor error type
/// Derives debug, copy, clone, eq, and partial eq
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TrngPpError(pub NonZeroU32);

/// Broad classification of an error code, encoded in its upper 16 bits.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ErrorKind {
    /// Word count or buffer size outside the required bounds. Detected before
    /// any register access.
    InvalidArgument,

    /// The FSM or the hardware status does not permit the operation.
    IllegalState,

    /// A bounded hardware handshake did not complete.
    HardwareTimeout,

    /// A known-answer test produced the wrong answer or never finished.
    KatFailure,

    /// Code outside of the known ranges.
    Unknown,
}

/// Macro to define error constants ensuring uniqueness
///
/// This macro takes a list of (name, value, doc) tuples and generates
/// constant definitions for each error code.
#[macro_export]
macro_rules! define_error_constants {
    ($(($name:ident, $value:expr, $doc:expr)),* $(,)?) => {
        $(
            #[doc = $doc]
            pub const $name: TrngPpError = TrngPpError::new_const($value);
        )*

        #[cfg(test)]
        /// Returns a vector of all defined error constants for testing uniqueness
        pub fn all_constants() -> Vec<(&'static str, u32)> {
            vec![
                $(
                    (stringify!($name), $value),
                )*
            ]
        }
    };
}

impl TrngPpError {
    /// Create an error; intended to only be used from const contexts, as we don't want
    /// runtime panics if val is zero. The preferred way to get a TrngPpError from a u32 is to
    /// use `TrngPpError::try_from()` from the `TryFrom` trait impl.
    const fn new_const(val: u32) -> Self {
        match NonZeroU32::new(val) {
            Some(val) => Self(val),
            None => panic!("TrngPpError cannot be 0"),
        }
    }

    /// Returns the kind encoded in the upper half of the error code.
    pub const fn kind(&self) -> ErrorKind {
        match self.0.get() >> 16 {
            0x0001 => ErrorKind::InvalidArgument,
            0x0002 => ErrorKind::IllegalState,
            0x0003 => ErrorKind::HardwareTimeout,
            0x0004 => ErrorKind::KatFailure,
            _ => ErrorKind::Unknown,
        }
    }

    define_error_constants![
        (
            DRIVER_TRNG_PP_PS_AI_WORD_COUNT,
            0x0001_0001,
            "Driver Error: PS/AI word count out of range"
        ),
        (
            DRIVER_TRNG_PP_BCDF_PS_AI_WORD_COUNT,
            0x0001_0002,
            "Driver Error: BC_DF requires a full PS/AI write"
        ),
        (
            DRIVER_TRNG_PP_NOISE_BUFFER_INVALID,
            0x0001_0003,
            "Driver Error: noise buffer empty, odd sized or shorter than the progress index"
        ),
        (
            DRIVER_TRNG_PP_RESULT_BUFFER_INVALID,
            0x0001_0004,
            "Driver Error: result buffer empty or shorter than the progress index"
        ),
        (
            DRIVER_TRNG_PP_GENERATE_WORD_COUNT,
            0x0001_0005,
            "Driver Error: generate request for zero words"
        ),
        (
            DRIVER_TRNG_PP_REQUEST_BLOCK_COUNT,
            0x0001_0006,
            "Driver Error: generate request exceeds the maximum block count"
        ),
        (
            DRIVER_TRNG_PP_ILLEGAL_TRANSITION,
            0x0002_0001,
            "Driver Error: state transition not permitted from the current state"
        ),
        (
            DRIVER_TRNG_PP_PS_AI_NOT_READY,
            0x0002_0002,
            "Driver Error: post-processor not ready to accept PS/AI"
        ),
        (
            DRIVER_TRNG_PP_TEST_RESULT_NOT_READY,
            0x0002_0003,
            "Driver Error: test result read before test ready"
        ),
        (
            DRIVER_TRNG_PP_RESEED_READY_TIMEOUT,
            0x0003_0001,
            "Driver Error: timed out waiting for reseed readiness"
        ),
        (
            DRIVER_TRNG_PP_RESEED_ACCEPT_TIMEOUT,
            0x0003_0002,
            "Driver Error: timed out waiting for the reseed request to be accepted"
        ),
        (
            KAT_TRNG_PP_AES_CORE_FAILURE,
            0x0004_0001,
            "KAT Error: AES-256 core known-answer test mismatch"
        ),
        (
            KAT_TRNG_PP_BCDF_FAILURE,
            0x0004_0002,
            "KAT Error: BC_DF NIST known-answer test mismatch"
        ),
        (
            KAT_TRNG_PP_BCDF_SEQUENCE,
            0x0004_0003,
            "KAT Error: BC_DF generate pass ended with an unexpected status"
        ),
        (
            KAT_TRNG_PP_POLL_EXHAUSTED,
            0x0004_0004,
            "KAT Error: hardware did not advance within the poll budget"
        ),
    ];
}

impl From<core::num::NonZeroU32> for crate::TrngPpError {
    fn from(val: core::num::NonZeroU32) -> Self {
        crate::TrngPpError(val)
    }
}

impl From<TrngPpError> for core::num::NonZeroU32 {
    fn from(val: TrngPpError) -> Self {
        val.0
    }
}

impl From<TrngPpError> for u32 {
    fn from(val: TrngPpError) -> Self {
        core::num::NonZeroU32::from(val).get()
    }
}

impl TryFrom<u32> for TrngPpError {
    type Error = TryFromIntError;
    fn try_from(val: u32) -> Result<Self, TryFromIntError> {
        match NonZeroU32::try_from(val) {
            Ok(val) => Ok(TrngPpError(val)),
            Err(err) => Err(err),
        }
    }
}

pub type TrngPpResult<T> = Result<T, TrngPpError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_try_from() {
        assert!(TrngPpError::try_from(0).is_err());
        assert_eq!(
            Ok(TrngPpError::DRIVER_TRNG_PP_ILLEGAL_TRANSITION),
            TrngPpError::try_from(0x0002_0001)
        );
    }

    #[test]
    fn test_kind() {
        assert_eq!(
            TrngPpError::DRIVER_TRNG_PP_PS_AI_WORD_COUNT.kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            TrngPpError::DRIVER_TRNG_PP_PS_AI_NOT_READY.kind(),
            ErrorKind::IllegalState
        );
        assert_eq!(
            TrngPpError::DRIVER_TRNG_PP_RESEED_ACCEPT_TIMEOUT.kind(),
            ErrorKind::HardwareTimeout
        );
        assert_eq!(
            TrngPpError::KAT_TRNG_PP_POLL_EXHAUSTED.kind(),
            ErrorKind::KatFailure
        );
        assert_eq!(
            TrngPpError::try_from(0x00ff_0001).unwrap().kind(),
            ErrorKind::Unknown
        );
    }

    #[test]
    fn test_error_constants_uniqueness() {
        let constants = TrngPpError::all_constants();
        let mut error_values = HashSet::new();
        let mut duplicates = Vec::new();

        for (name, value) in constants {
            if !error_values.insert(value) {
                duplicates.push((name, value));
            }
        }

        assert!(
            duplicates.is_empty(),
            "Found duplicate error codes: {:?}",
            duplicates
        );
    }
}
