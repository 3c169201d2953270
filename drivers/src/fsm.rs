/*++

Licensed under the Apache-2.0 license.

File Name:

    fsm.rs

Abstract:

    File contains the post-processor protocol state machine. Every state
    change of a driver context is validated against the transition table
    below and committed in one place.

--*/

use crate::{TrngPpError, TrngPpResult};
use smlang::statemachine;

statemachine! {
    transitions: {
        // syntax: CurrentState Event = NextState

        // steady state, also reached when a reseed or KAT completes
        *RandomGenerating + ToRandomGenerating = RandomGenerating,
        ReseedStart + ToRandomGenerating = RandomGenerating,
        ReseedReady + ToRandomGenerating = RandomGenerating,
        ReseedWriting + ToRandomGenerating = RandomGenerating,
        KatStart + ToRandomGenerating = RandomGenerating,
        KatProcessing + ToRandomGenerating = RandomGenerating,
        BcdfProcessing + ToRandomGenerating = RandomGenerating,

        // reseed handshake
        RandomGenerating + ToReseedStart = ReseedStart,
        ReseedStart + ToReseedReady = ReseedReady,
        ReseedReady + ToReseedWriting = ReseedWriting,

        // test entry, and the restart of the BC_DF generate test
        RandomGenerating + ToKatStart = KatStart,
        BcdfProcessing + ToKatStart = KatStart,

        // the generic KAT may be (re)entered from anywhere
        RandomGenerating + ToKatProcessing = KatProcessing,
        ReseedStart + ToKatProcessing = KatProcessing,
        ReseedReady + ToKatProcessing = KatProcessing,
        ReseedWriting + ToKatProcessing = KatProcessing,
        KatStart + ToKatProcessing = KatProcessing,
        KatProcessing + ToKatProcessing = KatProcessing,
        BcdfReseeded + ToKatProcessing = KatProcessing,
        BcdfNoiseFeeding + ToKatProcessing = KatProcessing,
        BcdfReady + ToKatProcessing = KatProcessing,
        BcdfProcessing + ToKatProcessing = KatProcessing,

        // BC_DF noise feeding loop
        KatStart + ToBcdfReseeded = BcdfReseeded,
        BcdfReseeded + ToBcdfReseeded = BcdfReseeded,
        BcdfNoiseFeeding + ToBcdfReseeded = BcdfReseeded,
        BcdfReseeded + ToBcdfNoiseFeeding = BcdfNoiseFeeding,
        BcdfNoiseFeeding + ToBcdfNoiseFeeding = BcdfNoiseFeeding,
        BcdfNoiseFeeding + ToBcdfReady = BcdfReady,

        // BC_DF generate and read-out
        BcdfReady + ToBcdfProcessing = BcdfProcessing,
        BcdfProcessing + ToBcdfProcessing = BcdfProcessing,
    }
}

/// State machine extended variables. The table carries no guards or
/// actions, so there are none.
struct FsmContext;

impl StateMachineContext for FsmContext {}

/// Protocol state of a post-processor driver context.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum State {
    /// Resting state between operations.
    RandomGenerating,
    ReseedStart,
    ReseedReady,
    ReseedWriting,
    KatStart,
    KatProcessing,
    BcdfReseeded,
    BcdfNoiseFeeding,
    BcdfReady,
    BcdfProcessing,
}

impl State {
    fn machine_state(self) -> States {
        match self {
            State::RandomGenerating => States::RandomGenerating,
            State::ReseedStart => States::ReseedStart,
            State::ReseedReady => States::ReseedReady,
            State::ReseedWriting => States::ReseedWriting,
            State::KatStart => States::KatStart,
            State::KatProcessing => States::KatProcessing,
            State::BcdfReseeded => States::BcdfReseeded,
            State::BcdfNoiseFeeding => States::BcdfNoiseFeeding,
            State::BcdfReady => States::BcdfReady,
            State::BcdfProcessing => States::BcdfProcessing,
        }
    }

    fn from_machine_state(state: &States) -> Self {
        match state {
            States::RandomGenerating => State::RandomGenerating,
            States::ReseedStart => State::ReseedStart,
            States::ReseedReady => State::ReseedReady,
            States::ReseedWriting => State::ReseedWriting,
            States::KatStart => State::KatStart,
            States::KatProcessing => State::KatProcessing,
            States::BcdfReseeded => State::BcdfReseeded,
            States::BcdfNoiseFeeding => State::BcdfNoiseFeeding,
            States::BcdfReady => State::BcdfReady,
            States::BcdfProcessing => State::BcdfProcessing,
        }
    }

    fn entry_event(self) -> Events {
        match self {
            State::RandomGenerating => Events::ToRandomGenerating,
            State::ReseedStart => Events::ToReseedStart,
            State::ReseedReady => Events::ToReseedReady,
            State::ReseedWriting => Events::ToReseedWriting,
            State::KatStart => Events::ToKatStart,
            State::KatProcessing => Events::ToKatProcessing,
            State::BcdfReseeded => Events::ToBcdfReseeded,
            State::BcdfNoiseFeeding => Events::ToBcdfNoiseFeeding,
            State::BcdfReady => Events::ToBcdfReady,
            State::BcdfProcessing => Events::ToBcdfProcessing,
        }
    }
}

/// Validator and holder of the current protocol state.
#[derive(Debug)]
pub struct Fsm {
    state: State,
}

impl Default for Fsm {
    fn default() -> Self {
        Self::new()
    }
}

impl Fsm {
    /// Create a state machine resting in `RandomGenerating`.
    pub const fn new() -> Self {
        Self {
            state: State::RandomGenerating,
        }
    }

    /// Current state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Returns true if `next` is reachable from the current state.
    pub fn permits(&self, next: State) -> bool {
        self.step(next).is_ok()
    }

    /// Fail with an illegal-transition error unless `next` is reachable.
    ///
    /// Operations call this before touching the hardware so a rejected call
    /// leaves both the context and the registers untouched.
    pub fn check(&self, next: State) -> TrngPpResult<()> {
        self.step(next).map(|_| ())
    }

    /// Validate and commit the transition to `next`.
    pub fn commit(&mut self, next: State) -> TrngPpResult<()> {
        self.state = self.step(next)?;
        Ok(())
    }

    fn step(&self, next: State) -> TrngPpResult<State> {
        let mut machine = StateMachine::new_with_state(FsmContext, self.state.machine_state());
        machine
            .process_event(next.entry_event())
            .map(State::from_machine_state)
            .map_err(|_| TrngPpError::DRIVER_TRNG_PP_ILLEGAL_TRANSITION)
    }
}
