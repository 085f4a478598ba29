//! WakeMate actuator firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod alert;
pub mod app;
pub mod command;
pub mod config;
pub mod error;
pub mod fsm;
pub mod watchdog;

pub mod pins;

// ESP-IDF-backed modules; the hardware paths inside are cfg-guarded so
// the crate compiles (with in-memory stubs) on the host.
pub mod adapters;
pub mod drivers;
