//! Function-pointer finite state machine engine.
//!
//! Classic embedded FSM pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  StateTable                                             │
//! │  ┌──────────┬───────────┬──────────┬───────────────────┐│
//! │  │ StateId  │ on_enter  │ on_exit  │ on_update         ││
//! │  ├──────────┼───────────┼──────────┼───────────────────┤│
//! │  │ Running  │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option<> ││
//! │  │ Alerting │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option<> ││
//! │  │ SelfTest │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option<> ││
//! │  └──────────┴───────────┴──────────┴───────────────────┘│
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine calls `on_update` for the **current** state.  If it
//! returns `Some(next_id)`, the engine runs `on_exit` for the current state,
//! then `on_enter` for the next, and updates the current pointer.  All
//! functions receive `&mut ControlContext`, which holds actuator commands,
//! the alert channels, config, and timing.

pub mod context;
pub mod states;

use context::ControlContext;
use log::info;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of all possible system states.
/// Must stay in sync with the state table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    /// Motor on, all alert channels off.
    Running = 0,
    /// Motor off, alert channel(s) active per the current mode.
    Alerting = 1,
    /// Bounded demonstration of every library utterance.
    SelfTest = 2,
}

impl StateId {
    /// Total number of states — used to size the table array.
    pub const COUNT: usize = 3;

    /// Convert a `u8` index back to `StateId`.  Panics on out-of-range in
    /// debug builds; returns `Alerting` in release (safe fallback).
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Running,
            1 => Self::Alerting,
            2 => Self::SelfTest,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Alerting
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
/// These run exactly once on each state transition.
pub type StateActionFn = fn(&mut ControlContext);

/// Signature for the per-tick update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateUpdateFn = fn(&mut ControlContext) -> Option<StateId>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
/// Stored in a fixed-size array — no heap, no `dyn`.
pub struct StateDescriptor {
    pub id: StateId,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
///
/// Owns the state table (array of [`StateDescriptor`]) and is driven with a
/// mutable [`ControlContext`] threaded through every handler call.
pub struct Fsm {
    /// Fixed-size table indexed by `StateId as usize`.
    table: [StateDescriptor; StateId::COUNT],
    /// Index of the currently active state.
    current: usize,
    /// Monotonically increasing tick counter (wraps at u64::MAX).
    tick_count: u64,
    /// Tick at which the current state was entered.
    state_entry_tick: u64,
}

impl Fsm {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor; StateId::COUNT], initial: StateId) -> Self {
        Self {
            table,
            current: initial as usize,
            tick_count: 0,
            state_entry_tick: 0,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first `tick()`.
    pub fn start(&mut self, ctx: &mut ControlContext) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance the FSM by one tick.
    ///
    /// 1. Call `on_update` for the current state.
    /// 2. If it returns `Some(next)`, execute the transition:
    ///    `on_exit(current)` → update pointer → `on_enter(next)`.
    pub fn tick(&mut self, ctx: &mut ControlContext) {
        self.tick_count += 1;
        ctx.ticks_in_state = self.tick_count - self.state_entry_tick;
        ctx.total_ticks = self.tick_count;

        let next = (self.table[self.current].on_update)(ctx);

        if let Some(next_id) = next {
            self.transition(next_id, ctx);
        }
    }

    /// Force an immediate transition (used by the command dispatcher and the
    /// link watchdog, whose transitions are event-driven rather than polled).
    pub fn force_transition(&mut self, next: StateId, ctx: &mut ControlContext) {
        if next as usize != self.current {
            self.transition(next, ctx);
        }
    }

    /// The current state's identity.
    pub fn current_state(&self) -> StateId {
        StateId::from_index(self.current)
    }

    /// How many ticks the FSM has been in the current state.
    pub fn ticks_in_current_state(&self) -> u64 {
        self.tick_count - self.state_entry_tick
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: StateId, ctx: &mut ControlContext) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        // Exit current state
        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        // Update pointer and timing
        self.current = next_idx;
        self.state_entry_tick = self.tick_count;
        ctx.ticks_in_state = 0;

        // Enter new state
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::context::ControlContext;
    use super::*;
    use crate::config::SystemConfig;

    fn make_ctx() -> ControlContext {
        ControlContext::new(SystemConfig::default())
    }

    fn make_fsm() -> Fsm {
        Fsm::new(states::build_state_table(), StateId::Running)
    }

    #[test]
    fn starts_in_running() {
        let fsm = make_fsm();
        assert_eq!(fsm.current_state(), StateId::Running);
    }

    #[test]
    fn start_runs_on_enter() {
        let mut fsm = make_fsm();
        let mut ctx = make_ctx();
        fsm.start(&mut ctx);
        assert_eq!(ctx.commands.motor_duty, ctx.motor_speed());
        assert_eq!(ctx.commands.led_rgb, context::COLOUR_RUNNING);
    }

    #[test]
    fn tick_increments_counter() {
        let mut fsm = make_fsm();
        let mut ctx = make_ctx();
        fsm.start(&mut ctx);
        fsm.tick(&mut ctx);
        assert_eq!(fsm.ticks_in_current_state(), 1);
        fsm.tick(&mut ctx);
        assert_eq!(fsm.ticks_in_current_state(), 2);
    }

    #[test]
    fn alerting_enter_stops_motor_and_arms_channels() {
        let mut fsm = make_fsm();
        let mut ctx = make_ctx();
        fsm.start(&mut ctx);
        fsm.force_transition(StateId::Alerting, &mut ctx);
        assert_eq!(ctx.commands.motor_duty, 0);
        assert!(ctx.alert.any_active());
    }

    #[test]
    fn running_enter_silences_tone_unconditionally() {
        let mut fsm = make_fsm();
        let mut ctx = make_ctx();
        fsm.start(&mut ctx);
        fsm.force_transition(StateId::Alerting, &mut ctx);
        fsm.tick(&mut ctx);
        assert!(ctx.commands.tone_hz.is_some());

        fsm.force_transition(StateId::Running, &mut ctx);
        assert_eq!(ctx.commands.tone_hz, None);
        assert!(!ctx.alert.any_active());
        assert_eq!(ctx.commands.motor_duty, ctx.motor_speed());
    }

    #[test]
    fn force_transition_to_current_state_is_a_noop() {
        let mut fsm = make_fsm();
        let mut ctx = make_ctx();
        fsm.start(&mut ctx);
        fsm.force_transition(StateId::Alerting, &mut ctx);
        let idx_before = ctx.alert.voice_next_index();
        // Re-entering Alerting must not re-trigger the channels.
        fsm.force_transition(StateId::Alerting, &mut ctx);
        assert_eq!(ctx.alert.voice_next_index(), idx_before);
    }

    #[test]
    fn selftest_runs_bounded_and_resumes() {
        let mut fsm = make_fsm();
        let mut ctx = make_ctx();
        fsm.start(&mut ctx);
        ctx.test_resume = StateId::Running;
        fsm.force_transition(StateId::SelfTest, &mut ctx);
        assert!(ctx.selftest.is_some());

        // The whole library is under 5 s; 200 ticks × 50 ms is plenty.
        for _ in 0..200 {
            fsm.tick(&mut ctx);
            if fsm.current_state() != StateId::SelfTest {
                break;
            }
        }
        assert_eq!(fsm.current_state(), StateId::Running);
        assert!(ctx.selftest.is_none());
    }

    #[test]
    fn selftest_resumes_alerting_when_retargeted() {
        let mut fsm = make_fsm();
        let mut ctx = make_ctx();
        fsm.start(&mut ctx);
        ctx.test_resume = StateId::Alerting;
        fsm.force_transition(StateId::SelfTest, &mut ctx);
        for _ in 0..200 {
            fsm.tick(&mut ctx);
            if fsm.current_state() != StateId::SelfTest {
                break;
            }
        }
        assert_eq!(fsm.current_state(), StateId::Alerting);
        assert!(ctx.alert.any_active());
    }

    #[test]
    fn state_id_from_index_roundtrip() {
        for i in 0..StateId::COUNT {
            let id = StateId::from_index(i);
            assert_eq!(id as usize, i);
        }
    }
}
