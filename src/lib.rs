#![cfg_attr(not(test), no_std)]
//! ESP Companion Radio Control
//!
//! This crate provides the mode and power control behind the `AT+ESP` and
//! `AT+ESPPOWER` commands on WisDuo LoRa modules that carry an ESP companion
//! radio (RAK11160). The host uses these two commands to:
//!
//! - Hand the module's UART over to the ESP (pass-through) or back to the
//!   local AT command processor
//! - Switch the ESP's power-enable line on or off
//!
//! # Architecture
//! - [`mode`]: UART routing mode
//!   - [`ModeController`] stores the mode and raises a [`PendingModeSwitch`]
//!   - The UART reconfiguration routine drains it with
//!     [`ModeController::take_pending`] at a safe point
//!
//! - [`power`]: ESP power-enable line
//!   - [`PowerController`] stores the state and drives the pin immediately
//!
//! - [`pin`]: The GPIO capability the power controller needs
//!   - [`PushPullPin`] adapts any `embedded-hal` output pin
//!
//! - [`command`]: Query/set handlers and their text responses
//!   - [`EspControl`] binds both controllers and is built once at startup
//!
//! # Boot State
//! - Mode: [`OperatingMode::LoraAtMode`]
//! - Power: [`PowerState::On`]
//! - No switch pending
//!
//! # Example
//! ```no_run
//! use embedded_hal::digital::OutputPin;
//! use esp_link::{EspControl, ModeController, PowerController, PushPullPin, Response};
//!
//! static MODE: ModeController = ModeController::new();
//!
//! fn handle_line<P: OutputPin>(pin: P, line: &str) -> Option<Response> {
//!     let mut power = PowerController::new(PushPullPin::new(pin));
//!     power.apply();
//!
//!     let mut control = EspControl::new(&MODE, power);
//!     control.execute(line)
//! }
//! ```

mod fmt;

pub mod command;
mod error;
pub mod mode;
pub mod pin;
pub mod power;

pub use command::{AtCommand, EspControl, Response, ATCMD_ESP, ATCMD_ESPPOWER};
pub use error::*;
pub use mode::{ModeController, OperatingMode, PendingModeSwitch};
pub use pin::{EnablePin, PushPullPin};
pub use power::{PowerController, PowerState};
