/*++

Licensed under the Apache-2.0 license.

File Name:

    trng_pp_regs.rs

Abstract:

    File contains register offsets and field definitions for the SP 800-90
    post-processor of the TRNG.

--*/

use tock_registers::register_bitfields;

/// Output words 0..3 (read) / block cipher input words 0..3 (write)
pub const OUTPUT_0: u32 = 0x00;
pub const INPUT_0: u32 = 0x00;

/// Status (read) / interrupt acknowledge (write)
pub const STATUS: u32 = 0x10;
pub const INTACK: u32 = 0x10;

pub const CONTROL: u32 = 0x14;

/// Main shift register halves, writable in known-noise test mode
pub const MAINSHIFTREG_L: u32 = 0x30;
pub const MAINSHIFTREG_H: u32 = 0x34;

/// Personalization string / additional input words 0..11
pub const PS_AI_0: u32 = 0x40;

/// Key words 0..7, sharing the PS/AI address range
pub const KEY_0: u32 = 0x40;

pub const TEST: u32 = 0x70;
pub const BLOCKCNT: u32 = 0x74;

/// Number of words in the PS/AI register bank.
pub const PS_AI_WORDS: usize = 12;

/// Number of words in the key register bank.
pub const KEY_WORDS: usize = 8;

/// Number of words in the input and output register banks.
pub const BLOCK_WORDS: usize = 4;

/// Byte offset of PS/AI word `i`.
pub const fn ps_ai(i: usize) -> u32 {
    PS_AI_0 + (i as u32) * 4
}

/// Byte offset of key word `i`.
pub const fn key(i: usize) -> u32 {
    KEY_0 + (i as u32) * 4
}

/// Byte offset of input word `i`.
pub const fn input(i: usize) -> u32 {
    INPUT_0 + (i as u32) * 4
}

/// Byte offset of output word `i`.
pub const fn output(i: usize) -> u32 {
    OUTPUT_0 + (i as u32) * 4
}

register_bitfields! [
    u32,

    /// Status Register Fields
    pub STATUS_REG [
        READY OFFSET(0) NUMBITS(1) [],
        SHUTDOWN_OFLO OFFSET(1) NUMBITS(1) [],
        STUCK_OUT OFFSET(2) NUMBITS(1) [],
        NOISE_FAIL OFFSET(3) NUMBITS(1) [],
        RUN_FAIL OFFSET(4) NUMBITS(1) [],
        LONG_RUN_FAIL OFFSET(5) NUMBITS(1) [],
        POKER_FAIL OFFSET(6) NUMBITS(1) [],
        MONOBIT_FAIL OFFSET(7) NUMBITS(1) [],
        TEST_READY OFFSET(8) NUMBITS(1) [],
        STUCK_NRBG OFFSET(9) NUMBITS(1) [],
        RESEED_AI OFFSET(10) NUMBITS(1) [],
        REPCNT_FAIL OFFSET(13) NUMBITS(1) [],
        APROP_FAIL OFFSET(14) NUMBITS(1) [],
        TEST_STUCK_OUT OFFSET(15) NUMBITS(1) [],
        BLOCKS_AVAIL OFFSET(16) NUMBITS(8) [],
        NEED_CLOCK OFFSET(31) NUMBITS(1) [],
    ],

    /// Control Register Fields
    pub CONTROL_REG [
        ENABLE_RESEED OFFSET(15) NUMBITS(1) [],
        REQUEST_DATA OFFSET(16) NUMBITS(1) [],
        DATA_BLOCKS OFFSET(20) NUMBITS(12) [],
    ],

    /// Interrupt Acknowledge Register Fields
    pub INTACK_REG [
        READY_ACK OFFSET(0) NUMBITS(1) [],
    ],

    /// Block Count Register Fields
    pub BLOCKCNT_REG [
        BLOCK_COUNT OFFSET(4) NUMBITS(28) [],
    ],
];
