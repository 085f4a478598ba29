//! The application service — owns the FSM, the watchdog, and the tick loop.
//!
//! One `tick()` call corresponds to one control-loop iteration (50 ms by
//! default) and always runs the same four phases:
//!
//! 1. Drain the command port and dispatch every buffered byte.
//! 2. Advance the FSM (timed channels, blink phases, self-test progress).
//! 3. Check the link watchdog; a fire takes the ALERT_ON path.
//! 4. Diff the requested actuator commands against the last applied set and
//!    push only the changes through the actuator port.
//!
//! Phase 4 is what makes repeated ALERT_ON / ALERT_OFF idempotent at the pin
//! level: handlers may rewrite the same command values every tick without
//! causing a single redundant pin write.

use log::{info, warn};

use crate::alert::AlertMode;
use crate::command::Command;
use crate::config::SystemConfig;
use crate::fsm::context::{ActuatorCommands, ControlContext};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};
use crate::watchdog::LinkWatchdog;
use crate::alert::pattern::{Playback, SYSTEM_READY};

use super::events::AppEvent;
use super::ports::{ActuatorPort, CommandPort, EventSink};

/// Orchestrates the command dispatcher, FSM, watchdog and actuator output.
pub struct AppService {
    fsm: Fsm,
    ctx: ControlContext,
    watchdog: LinkWatchdog,
    /// Startup chime; owns the buzzer until it finishes (~0.5 s).
    startup: Option<Playback>,
    /// Milliseconds since `start()`, advanced by `tick_ms` each tick.
    now_ms: u64,
    /// Last command set pushed through the actuator port.
    applied: Option<ActuatorCommands>,
}

impl AppService {
    pub fn new(config: SystemConfig) -> Self {
        let watchdog = LinkWatchdog::new(config.watchdog_timeout_ms);
        Self {
            fsm: Fsm::new(build_state_table(), StateId::Running),
            ctx: ControlContext::new(config),
            watchdog,
            startup: None,
            now_ms: 0,
            applied: None,
        }
    }

    /// Enter the initial state, start the ready chime, and drive the first
    /// actuator outputs.  Call once before the tick loop.
    pub fn start<H, S>(&mut self, hw: &mut H, sink: &mut S)
    where
        H: ActuatorPort,
        S: EventSink,
    {
        self.fsm.start(&mut self.ctx);
        self.startup = Some(Playback::start(SYSTEM_READY));
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        self.apply_actuators(hw);
    }

    /// One control-loop iteration.  `transport` is drained completely; all
    /// timed behaviour advances by exactly one `tick_ms`.
    pub fn tick<T, H, S>(&mut self, transport: &mut T, hw: &mut H, sink: &mut S)
    where
        T: CommandPort,
        H: ActuatorPort,
        S: EventSink,
    {
        self.now_ms += u64::from(self.ctx.tick_ms);
        let state_before = self.fsm.current_state();

        // Phase 1: commands.
        while let Some(byte) = transport.poll_byte() {
            self.dispatch(byte, sink);
        }

        // Phase 2: timed behaviour.
        self.fsm.tick(&mut self.ctx);

        // The ready chime holds the buzzer until it completes.  It only ever
        // overlaps the first ~0.5 s after boot, before the watchdog can fire.
        if let Some(chime) = self.startup.as_mut() {
            chime.tick(self.ctx.tick_ms);
            if chime.is_done() {
                self.startup = None;
            } else {
                self.ctx.commands.tone_hz = chime.output();
            }
        }

        // Phase 3: link supervision.
        if self.watchdog.check(self.now_ms) {
            sink.emit(&AppEvent::WatchdogTimeout);
            self.enter_alert();
        }

        // Phase 4: outputs.
        let state_after = self.fsm.current_state();
        if state_after != state_before {
            sink.emit(&AppEvent::StateChanged {
                from: state_before,
                to: state_after,
            });
        }
        self.apply_actuators(hw);
    }

    /// Change the running motor speed (takes effect per RUNNING-state rules).
    pub fn set_motor_speed(&mut self, value: u16) -> crate::error::Result<()> {
        self.ctx.set_motor_speed(value)
    }

    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    pub fn alert_mode(&self) -> AlertMode {
        self.ctx.alert.mode()
    }

    // -----------------------------------------------------------------------
    // Command handling
    // -----------------------------------------------------------------------

    fn dispatch<S: EventSink>(&mut self, byte: u8, sink: &mut S) {
        // Any byte proves the link is alive, recognised or not.
        self.watchdog.on_signal(self.now_ms);

        let cmd = Command::decode(byte);
        sink.emit(&AppEvent::CommandReceived(cmd));

        match cmd {
            Command::AlertOn => self.enter_alert(),
            Command::AlertOff => self.leave_alert(),
            Command::SetMode(mode) => {
                self.ctx.alert.set_mode(mode);
                sink.emit(&AppEvent::ModeChanged(mode));
                info!("alert mode set to {mode:?}");
            }
            Command::SelfTest => self.begin_selftest(),
            Command::Unknown(b) => {
                warn!("unrecognised command byte 0x{b:02X}, ignored");
            }
        }
    }

    /// ALERT_ON path, shared by the '0' command and a watchdog fire.
    fn enter_alert(&mut self) {
        match self.fsm.current_state() {
            StateId::Running => self.fsm.force_transition(StateId::Alerting, &mut self.ctx),
            // Mid-test commands retarget where the test resumes to.
            StateId::SelfTest => self.ctx.test_resume = StateId::Alerting,
            StateId::Alerting => {}
        }
    }

    fn leave_alert(&mut self) {
        match self.fsm.current_state() {
            StateId::Alerting => self.fsm.force_transition(StateId::Running, &mut self.ctx),
            StateId::SelfTest => self.ctx.test_resume = StateId::Running,
            StateId::Running => {}
        }
    }

    fn begin_selftest(&mut self) {
        if self.fsm.current_state() == StateId::SelfTest {
            info!("self-test already running, ignoring request");
            return;
        }
        // Capture the interrupted state so the test hands control back where
        // it found it (unless a mid-test command retargets it).
        self.ctx.test_resume = self.fsm.current_state();
        self.fsm.force_transition(StateId::SelfTest, &mut self.ctx);
    }

    // -----------------------------------------------------------------------
    // Actuator output
    // -----------------------------------------------------------------------

    fn apply_actuators<H: ActuatorPort>(&mut self, hw: &mut H) {
        let want = self.ctx.commands;
        let prev = self.applied;

        let motor_changed =
            prev.is_none_or(|p| (p.motor_duty, p.motor_forward) != (want.motor_duty, want.motor_forward));
        if motor_changed {
            if want.motor_duty > 0 {
                hw.set_motor(want.motor_duty, want.motor_forward);
            } else {
                hw.stop_motor();
            }
        }

        if prev.is_none_or(|p| p.tone_hz != want.tone_hz) {
            match want.tone_hz {
                Some(hz) => hw.tone(hz),
                None => hw.silence(),
            }
        }

        if prev.is_none_or(|p| p.led_rgb != want.led_rgb) {
            let (r, g, b) = want.led_rgb;
            hw.set_led(r, g, b);
        }

        self.applied = Some(want);
    }
}
