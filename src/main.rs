//! WakeMate Actuator Firmware — Main Entry Point
//!
//! Hexagonal architecture with a fixed-rate control loop.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                  │
//! │                                                          │
//! │  SerialCommandAdapter  HardwareAdapter   LogEventSink    │
//! │  (CommandPort)         (ActuatorPort)    (EventSink)     │
//! │                                                          │
//! │  ─────────────── Port Trait Boundary ────────────────    │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │            AppService (pure logic)                 │  │
//! │  │  Command dispatch · FSM · Alert channels · Watchdog│  │
//! │  └────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```

#![deny(unused_must_use)]

use anyhow::Result;
use log::info;

use wakemate::adapters::hardware::HardwareAdapter;
use wakemate::adapters::log_sink::LogEventSink;
use wakemate::adapters::serial::SerialCommandAdapter;
use wakemate::app::service::AppService;
use wakemate::config::SystemConfig;
use wakemate::drivers::buzzer::BuzzerDriver;
use wakemate::drivers::motor::MotorDriver;
use wakemate::drivers::status_led::StatusLed;
use wakemate::drivers::hw_init;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  WakeMate actuator v{}            ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Initialise hardware peripherals ────────────────────
    // Peripheral init failure is critical — never enter the control
    // loop with half-configured actuators.  Log, then blink the red
    // LED at GPIO level forever.
    if let Err(e) = hw_init::init_peripherals() {
        log::error!("HAL init failed: {e} — halting");
        hw_init::diagnostic_blink();
    }

    // ── 3. Construct adapters ─────────────────────────────────
    let mut hw = HardwareAdapter::new(MotorDriver::new(), BuzzerDriver::new(), StatusLed::new());
    let mut serial = SerialCommandAdapter::new();
    let mut log_sink = LogEventSink::new();

    // ── 4. Construct app service ──────────────────────────────
    let config = SystemConfig::default();
    let tick_ms = config.control_loop_interval_ms;
    let mut app = AppService::new(config);
    app.start(&mut hw, &mut log_sink);

    info!("System ready. Entering control loop.");

    // ── 5. Control loop ───────────────────────────────────────
    loop {
        serial.pump();
        app.tick(&mut serial, &mut hw, &mut log_sink);

        // On ESP-IDF std sleep lowers to a FreeRTOS vTaskDelay, yielding
        // the CPU between control iterations.
        std::thread::sleep(std::time::Duration::from_millis(u64::from(tick_ms)));
    }
}
