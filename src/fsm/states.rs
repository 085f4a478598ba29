//! Concrete state handler functions and table builder.
//!
//! Each state is defined by three plain `fn` pointers — no closures, no
//! dynamic dispatch, no heap.
//!
//! ```text
//!  RUNNING ──[ALERT_ON / watchdog]──▶ ALERTING
//!     ▲                                  │
//!     └───────────[ALERT_OFF]────────────┘
//!
//!  Running/Alerting ──['t']──▶ SELFTEST ──[library done]──▶ resume
//! ```
//!
//! RUNNING/ALERTING transitions are command-driven: the service forces them
//! when a command or watchdog fire arrives, so `running_update` has nothing
//! to poll.  SELFTEST is the one state that transitions from `on_update`,
//! when its bounded demonstration finishes.

use super::context::{
    COLOUR_ALERTING, COLOUR_ALERTING_DIM, COLOUR_RUNNING, COLOUR_SELFTEST, ControlContext,
    SelfTestRun,
};
use super::{StateDescriptor, StateId};
use log::info;

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0 — Running
        StateDescriptor {
            id: StateId::Running,
            name: "Running",
            on_enter: Some(running_enter),
            on_exit: None,
            on_update: running_update,
        },
        // Index 1 — Alerting
        StateDescriptor {
            id: StateId::Alerting,
            name: "Alerting",
            on_enter: Some(alerting_enter),
            on_exit: None,
            on_update: alerting_update,
        },
        // Index 2 — SelfTest
        StateDescriptor {
            id: StateId::SelfTest,
            name: "SelfTest",
            on_enter: Some(selftest_enter),
            on_exit: Some(selftest_exit),
            on_update: selftest_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  RUNNING state — motor on, alerts off
// ═══════════════════════════════════════════════════════════════════════════

fn running_enter(ctx: &mut ControlContext) {
    // Silence is unconditional: both channels cleared and the tone output
    // dropped even if neither channel believed itself active.
    ctx.alert.deactivate();
    ctx.commands.tone_hz = None;
    ctx.commands.motor_duty = ctx.motor_speed();
    ctx.commands.motor_forward = true;
    ctx.commands.led_rgb = COLOUR_RUNNING;
    info!("RUNNING: motor at {}, alerts off", ctx.motor_speed());
}

fn running_update(_ctx: &mut ControlContext) -> Option<StateId> {
    // All transitions out of Running are command/watchdog driven.
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  ALERTING state — motor off, alert channel(s) sounding
// ═══════════════════════════════════════════════════════════════════════════

fn alerting_enter(ctx: &mut ControlContext) {
    ctx.commands.motor_duty = 0;
    ctx.alert.activate();
    ctx.commands.led_rgb = COLOUR_ALERTING;
    info!("ALERTING: motor stopped, mode {:?}", ctx.alert.mode());
}

fn alerting_update(ctx: &mut ControlContext) -> Option<StateId> {
    ctx.commands.tone_hz = ctx.alert.tick(ctx.tick_ms);

    // Blink the red LED at 1 Hz while alerting.
    let phase_ms = (ctx.ticks_in_state * u64::from(ctx.tick_ms)) % 1000;
    ctx.commands.led_rgb = if phase_ms < 500 {
        COLOUR_ALERTING
    } else {
        COLOUR_ALERTING_DIM
    };

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  SELFTEST state — bounded walk through the whole utterance library
// ═══════════════════════════════════════════════════════════════════════════

fn selftest_enter(ctx: &mut ControlContext) {
    ctx.commands.motor_duty = 0;
    ctx.commands.tone_hz = None;
    ctx.commands.led_rgb = COLOUR_SELFTEST;
    ctx.selftest = Some(SelfTestRun::start());
    info!("SELFTEST: demonstrating all patterns, will resume {:?}", ctx.test_resume);
}

fn selftest_exit(ctx: &mut ControlContext) {
    ctx.selftest = None;
    ctx.commands.tone_hz = None;
}

fn selftest_update(ctx: &mut ControlContext) -> Option<StateId> {
    let tick_ms = ctx.tick_ms;
    let mut finished = false;
    let mut out = None;

    if let Some(run) = ctx.selftest.as_mut() {
        run.playback.tick(tick_ms);
        if run.playback.is_done() {
            if run.advance() {
                info!("SELFTEST: playing '{}'", run.playback.utterance_name());
            } else {
                finished = true;
            }
        }
        if !finished {
            out = run.playback.output();
        }
    } else {
        finished = true;
    }

    if finished {
        info!("SELFTEST: complete, resuming {:?}", ctx.test_resume);
        return Some(ctx.test_resume);
    }

    ctx.commands.tone_hz = out;
    None
}
