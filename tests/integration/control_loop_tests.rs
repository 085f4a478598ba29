//! End-to-end control loop tests: scripted command bytes in, recorded
//! actuator calls out.  Uses the default config: 50 ms tick, 500 ms beep
//! interval, 3 s pattern interval, 4 s link watchdog.

use crate::mock_hw::{ActuatorCall, LogSink, MockHardware, ScriptedLink};
use wakemate::app::service::AppService;
use wakemate::config::SystemConfig;
use wakemate::fsm::StateId;

struct Rig {
    app: AppService,
    hw: MockHardware,
    link: ScriptedLink,
    sink: LogSink,
}

impl Rig {
    fn new() -> Self {
        let mut rig = Self {
            app: AppService::new(SystemConfig::default()),
            hw: MockHardware::new(),
            link: ScriptedLink::new(),
            sink: LogSink::new(),
        };
        rig.app.start(&mut rig.hw, &mut rig.sink);
        rig
    }

    fn tick(&mut self) {
        self.app
            .tick(&mut self.link, &mut self.hw, &mut self.sink);
    }

    fn run(&mut self, ticks: usize) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// Run until the FSM leaves `state` (bounded), returning ticks taken.
    fn run_until_leaves(&mut self, state: StateId, max_ticks: usize) -> usize {
        for i in 0..max_ticks {
            self.tick();
            if self.app.state() != state {
                return i + 1;
            }
        }
        panic!("still in {state:?} after {max_ticks} ticks");
    }
}

// The startup chime is 520 ms; 12 ticks clears it.
const CHIME_TICKS: usize = 12;

#[test]
fn boot_runs_motor_and_plays_ready_chime() {
    let mut rig = Rig::new();
    assert_eq!(rig.app.state(), StateId::Running);
    assert!(rig.hw.calls.contains(&ActuatorCall::SetMotor {
        duty: 200,
        forward: true
    }));

    rig.run(CHIME_TICKS);
    // The ascending ready chime reached the buzzer...
    assert!(rig.hw.calls.contains(&ActuatorCall::Tone { freq_hz: 523 }));
    assert!(rig.hw.calls.contains(&ActuatorCall::Tone { freq_hz: 784 }));
    // ...and is over now: silent, still running.
    assert_eq!(rig.hw.current_tone(), None);
    assert!(rig.hw.motor_on());
}

#[test]
fn alert_on_stops_motor_and_starts_alerting() {
    let mut rig = Rig::new();
    rig.run(CHIME_TICKS);

    rig.link.push(b'0');
    rig.tick();

    assert_eq!(rig.app.state(), StateId::Alerting);
    assert!(!rig.hw.motor_on());
    // Default mode is Both; the pattern channel owns the buzzer first and
    // the rotation starts at the first utterance's opening note.
    assert_eq!(rig.hw.current_tone(), Some(659));
}

#[test]
fn alert_off_restores_motor_and_silences() {
    let mut rig = Rig::new();
    rig.run(CHIME_TICKS);
    rig.link.push(b'0');
    rig.run(5);

    rig.link.push(b'1');
    rig.tick();

    assert_eq!(rig.app.state(), StateId::Running);
    assert!(rig.hw.motor_on());
    assert_eq!(rig.hw.current_tone(), None);

    // Nothing keeps beeping afterwards (60 ticks stays inside the
    // watchdog window armed by the '1').
    let tones_before = rig.hw.tone_count();
    rig.run(60);
    assert_eq!(rig.hw.tone_count(), tones_before);
}

#[test]
fn watchdog_fires_exactly_once_per_silence() {
    let mut rig = Rig::new();
    rig.run(2);
    rig.link.push(b'1'); // arm the watchdog, stay Running
    rig.tick();

    // 250 ticks = 12.5 s of silence, over three watchdog periods.
    rig.run(250);

    assert_eq!(rig.app.state(), StateId::Alerting);
    assert_eq!(rig.sink.count_containing("WatchdogTimeout"), 1);
    // Exactly one Running -> Alerting transition, one motor stop.
    assert_eq!(rig.sink.count_containing("StateChanged"), 1);
    assert_eq!(rig.hw.stop_motor_count(), 1);
}

#[test]
fn watchdog_rearms_after_link_recovers() {
    let mut rig = Rig::new();
    rig.link.push(b'1');
    rig.tick();
    rig.run(100); // first fire (> 4 s silent)
    assert_eq!(rig.sink.count_containing("WatchdogTimeout"), 1);

    rig.link.push(b'1'); // link back, resume running
    rig.tick();
    assert_eq!(rig.app.state(), StateId::Running);

    rig.run(100); // silent again — second episode, second fire
    assert_eq!(rig.sink.count_containing("WatchdogTimeout"), 2);
    assert_eq!(rig.app.state(), StateId::Alerting);
}

#[test]
fn unknown_bytes_feed_watchdog_but_change_nothing() {
    let mut rig = Rig::new();
    rig.run(CHIME_TICKS);

    // Garbage every 2 s for 15 s: link considered alive the whole time.
    for _ in 0..8 {
        rig.link.push(b'x');
        rig.run(40);
    }

    assert_eq!(rig.app.state(), StateId::Running);
    assert!(rig.hw.motor_on());
    assert_eq!(rig.sink.count_containing("WatchdogTimeout"), 0);
    assert!(rig.sink.count_containing("Unknown") >= 8);
}

#[test]
fn repeated_alert_on_is_idempotent_at_the_pins() {
    let mut rig = Rig::new();
    rig.run(CHIME_TICKS);
    rig.link.push(b'v'); // SequencedPattern only
    rig.link.push(b'0');
    rig.tick();
    assert_eq!(rig.app.state(), StateId::Alerting);

    // Pipeline keeps re-sending '0' every tick; nothing may toggle.
    for _ in 0..10 {
        rig.link.push(b'0');
        rig.tick();
    }

    assert_eq!(rig.hw.stop_motor_count(), 1);
    assert_eq!(rig.hw.set_motor_count(), 1, "only the boot-time motor start");
    assert_eq!(rig.app.state(), StateId::Alerting);
}

#[test]
fn alert_off_in_both_mode_kills_both_channels() {
    let mut rig = Rig::new();
    rig.run(CHIME_TICKS);
    rig.link.push(b'0');
    rig.run(5); // utterance mid-flight, beep armed behind it

    rig.link.push(b'1');
    rig.tick();
    assert_eq!(rig.hw.current_tone(), None);

    // Under the 3 s pattern interval and inside the watchdog window:
    // neither channel may make another sound.
    let tones_before = rig.hw.tone_count();
    rig.run(55);
    assert_eq!(rig.hw.tone_count(), tones_before);
}

#[test]
fn mode_switch_while_alerting_leaves_motor_alone() {
    let mut rig = Rig::new();
    rig.run(CHIME_TICKS);
    rig.link.push(b'0');
    rig.tick();
    let motor_calls = rig.hw.set_motor_count() + rig.hw.stop_motor_count();

    rig.link.push(b'b');
    rig.run(5);

    assert_eq!(rig.app.state(), StateId::Alerting);
    assert_eq!(
        rig.hw.set_motor_count() + rig.hw.stop_motor_count(),
        motor_calls,
        "mode switch touched the motor"
    );
    assert_eq!(rig.sink.count_containing("ModeChanged"), 1);
}

#[test]
fn mode_switch_while_alerting_keeps_the_alarm_sounding() {
    let mut rig = Rig::new();
    rig.run(CHIME_TICKS);
    rig.link.push(b'b'); // SimpleBeep
    rig.link.push(b'0');
    rig.tick();
    assert_eq!(rig.app.state(), StateId::Alerting);

    // Switch to SequencedPattern mid-episode: the beep shuts off at its
    // toggle boundary and the pattern channel must take over.
    rig.link.push(b'v');
    rig.run(12);
    let tones_before = rig.hw.tone_count();

    // 30 s of ALERTING, link kept alive. The buzzer must keep sounding.
    for _ in 0..12 {
        rig.link.push(b'v');
        rig.run(50);
    }
    assert_eq!(rig.app.state(), StateId::Alerting);
    assert!(
        rig.hw.tone_count() > tones_before,
        "ALERTING went silent after the mode switch"
    );
}

#[test]
fn watchdog_fire_while_alerting_duplicates_nothing() {
    let mut rig = Rig::new();
    rig.run(CHIME_TICKS);
    rig.link.push(b'b'); // SimpleBeep
    rig.link.push(b'1');
    rig.link.push(b'0');
    rig.tick();
    assert_eq!(rig.app.state(), StateId::Alerting);
    assert_eq!(rig.hw.stop_motor_count(), 1);

    // 2× the watchdog timeout with no further input: the fire lands in an
    // already-alerting system and must not re-actuate anything.
    rig.run(160);

    assert_eq!(rig.sink.count_containing("WatchdogTimeout"), 1);
    assert_eq!(rig.sink.count_containing("StateChanged"), 1, "only the '0'");
    assert_eq!(rig.hw.stop_motor_count(), 1, "motor deactivated exactly once");
    assert_eq!(rig.hw.set_motor_count(), 1, "only the boot-time motor start");
}

#[test]
fn selftest_demonstrates_library_then_resumes_running() {
    let mut rig = Rig::new();
    rig.run(CHIME_TICKS);
    rig.link.push(b't');
    rig.tick();
    assert_eq!(rig.app.state(), StateId::SelfTest);
    assert!(!rig.hw.motor_on(), "motor must stop during self-test");

    // The library is < 4 s total, so the test ends before the watchdog
    // (armed by the 't') can fire.
    rig.run_until_leaves(StateId::SelfTest, 100);
    assert_eq!(rig.app.state(), StateId::Running);
    assert!(rig.hw.motor_on());
    assert_eq!(rig.hw.current_tone(), None);
}

#[test]
fn alert_on_during_selftest_retargets_resume() {
    let mut rig = Rig::new();
    rig.run(CHIME_TICKS);
    rig.link.push(b't');
    rig.tick();
    rig.link.push(b'0'); // drowsiness detected mid-test
    rig.tick();
    assert_eq!(rig.app.state(), StateId::SelfTest, "test keeps running");

    rig.run_until_leaves(StateId::SelfTest, 100);
    assert_eq!(rig.app.state(), StateId::Alerting);
    assert!(!rig.hw.motor_on());
}

#[test]
fn motor_speed_change_applies_on_next_running_entry() {
    let mut rig = Rig::new();
    rig.run(CHIME_TICKS);

    assert!(rig.app.set_motor_speed(300).is_err(), "out of range");
    rig.app.set_motor_speed(120).unwrap();

    // Round-trip through an alert: the new speed shows on re-entry.
    rig.link.push(b'0');
    rig.tick();
    rig.link.push(b'1');
    rig.tick();
    assert!(rig.hw.calls.contains(&ActuatorCall::SetMotor {
        duty: 120,
        forward: true
    }));
}

#[test]
fn output_diffing_never_repeats_a_call() {
    let mut rig = Rig::new();
    rig.link.push(b'0');
    rig.run(200); // chime, alert channels, a watchdog no-op fire

    for pair in rig.hw.calls.windows(2) {
        assert_ne!(pair[0], pair[1], "adjacent duplicate actuator call");
    }
}
