/*++

Licensed under the Apache-2.0 license.

File Name:

    events.rs

Abstract:

    File contains the event status and test mode bit sets.

--*/

use bitflags::bitflags;

bitflags! {
    /// Asynchronous hardware events reported by the status register.
    ///
    /// Every post-processor operation refreshes a snapshot of these bits so
    /// that alarms raised while an unrelated handshake is in flight still
    /// reach the caller.
    pub struct EventStatus: u32 {
        const READY = 1 << 0;
        const SHUTDOWN_OFLO = 1 << 1;
        const STUCK_OUT = 1 << 2;
        const NOISE_FAIL = 1 << 3;
        const RUN_FAIL = 1 << 4;
        const LONG_RUN_FAIL = 1 << 5;
        const POKER_FAIL = 1 << 6;
        const MONOBIT_FAIL = 1 << 7;
        const TEST_READY = 1 << 8;
        const STUCK_NRBG = 1 << 9;
        const RESEED_AI = 1 << 10;
        const REPCNT_FAIL = 1 << 13;
        const APROP_FAIL = 1 << 14;
        const TEST_STUCK_OUT = 1 << 15;

        /// Events that indicate the noise source or DRBG is unhealthy.
        const ALARMS = Self::SHUTDOWN_OFLO.bits
            | Self::STUCK_OUT.bits
            | Self::NOISE_FAIL.bits
            | Self::RUN_FAIL.bits
            | Self::LONG_RUN_FAIL.bits
            | Self::POKER_FAIL.bits
            | Self::MONOBIT_FAIL.bits
            | Self::STUCK_NRBG.bits
            | Self::REPCNT_FAIL.bits
            | Self::APROP_FAIL.bits
            | Self::TEST_STUCK_OUT.bits;
    }
}

impl EventStatus {
    /// Extract the event bits from a raw status register value.
    pub fn from_status(status: u32) -> Self {
        Self::from_bits_truncate(status)
    }

    pub fn has_alarm(&self) -> bool {
        self.intersects(Self::ALARMS)
    }
}

impl Default for EventStatus {
    fn default() -> Self {
        Self::empty()
    }
}

bitflags! {
    /// Test mode bits of the TEST register owned by the post-processor.
    ///
    /// Only one of these tests is ever active; all of them are cleared
    /// together when a test finishes.
    pub struct TestMode: u32 {
        const KNOWN_NOISE = 1 << 5;
        const POST_PROC = 1 << 6;
        const SP_800_90 = 1 << 7;
    }
}
