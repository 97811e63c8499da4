//! `AT+ESP` and `AT+ESPPOWER` handlers
//!
//! Both commands share the same shape:
//! - `CMD=?` queries the current value and echoes it as `CMD=<n>`
//! - `CMD=<n>` sets the value, answering `OK` or `AT_PARAM_ERROR`
//! - any other argument shape is a parameter error and never reaches the
//!   controllers
//!
//! The module's AT front-end normally hands the handlers already split
//! arguments via [`EspControl::handle`]. [`EspControl::execute`] does a
//! minimal split of one raw line for hosts without such a front-end.

use core::fmt;

use crate::{EnablePin, ModeController, ParameterError, PowerController};

/// Name of the UART routing command
pub const ATCMD_ESP: &str = "AT+ESP";
/// Name of the ESP power command
pub const ATCMD_ESPPOWER: &str = "AT+ESPPOWER";

/// Maximum number of `:` separated arguments [`EspControl::execute`] splits
const MAX_ARGS: usize = 4;

/// Commands handled by [`EspControl`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AtCommand {
    /// `AT+ESP`: UART routing mode
    Esp,
    /// `AT+ESPPOWER`: ESP power-enable line
    EspPower,
}

impl AtCommand {
    /// Command name as sent by the host
    pub const fn name(self) -> &'static str {
        match self {
            Self::Esp => ATCMD_ESP,
            Self::EspPower => ATCMD_ESPPOWER,
        }
    }

    /// Looks up a command by exact, case-sensitive name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            ATCMD_ESP => Some(Self::Esp),
            ATCMD_ESPPOWER => Some(Self::EspPower),
            _ => None,
        }
    }
}

/// Handler result, rendered by [`fmt::Display`] without line terminator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Response {
    /// Set accepted
    Ok,
    /// Wrong argument shape or value
    ParamError,
    /// Query answer
    Value {
        /// The queried command
        command: AtCommand,
        /// Integer encoding of the current state
        value: u8,
    },
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => f.write_str("OK"),
            Self::ParamError => f.write_str("AT_PARAM_ERROR"),
            Self::Value { command, value } => write!(f, "{}={}", command.name(), value),
        }
    }
}

/// Argument shape of a single command invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Request {
    Query,
    Set(u32),
}

impl Request {
    fn parse(args: &[&str]) -> Result<Self, ParameterError> {
        let [arg] = args else {
            return Err(ParameterError::Malformed);
        };

        if *arg == "?" {
            return Ok(Self::Query);
        }

        // `u32::from_str` would also take a leading '+'.
        if arg.is_empty() || !arg.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParameterError::Malformed);
        }

        arg.parse()
            .map(Self::Set)
            .map_err(|_| ParameterError::Malformed)
    }
}

/// Command-handling context for the ESP companion radio
///
/// Built once at startup. The mode controller is borrowed so the UART
/// reconfiguration routine can hold the same instance; the power controller
/// and its pin are owned.
#[derive(Debug)]
pub struct EspControl<'m, P> {
    mode: &'m ModeController,
    power: PowerController<P>,
}

impl<'m, P> EspControl<'m, P> {
    /// Binds the two controllers
    pub fn new(mode: &'m ModeController, power: PowerController<P>) -> Self {
        Self { mode, power }
    }

    /// The shared mode controller
    pub fn mode(&self) -> &'m ModeController {
        self.mode
    }

    /// The owned power controller
    pub fn power(&self) -> &PowerController<P> {
        &self.power
    }

    /// Releases the power controller
    pub fn release(self) -> PowerController<P> {
        self.power
    }
}

impl<'m, P: EnablePin> EspControl<'m, P> {
    /// Runs `command` with already split arguments
    pub fn handle(&mut self, command: AtCommand, args: &[&str]) -> Response {
        let request = match Request::parse(args) {
            Ok(request) => request,
            Err(_) => {
                trace!("{} rejected: bad argument shape", command);
                return Response::ParamError;
            }
        };

        match request {
            Request::Query => Response::Value {
                command,
                value: self.current(command),
            },
            Request::Set(value) => {
                let result = match command {
                    AtCommand::Esp => self.mode.set_mode(value),
                    AtCommand::EspPower => self.power.set_power(value),
                };
                match result {
                    Ok(()) => Response::Ok,
                    Err(err) => {
                        trace!("{} rejected: {}", command, err);
                        Response::ParamError
                    }
                }
            }
        }
    }

    /// Splits one `NAME[=arg[:arg...]]` line and runs it
    ///
    /// Returns `None` when the line names neither command, leaving it to
    /// whatever else the AT front-end dispatches to.
    pub fn execute(&mut self, line: &str) -> Option<Response> {
        let line = line.trim_end_matches(&['\r', '\n'][..]);
        let (name, rest) = match line.split_once('=') {
            Some((name, rest)) => (name, Some(rest)),
            None => (line, None),
        };
        let command = AtCommand::from_name(name)?;

        let mut args = [""; MAX_ARGS];
        let mut argc = 0;
        if let Some(rest) = rest {
            for arg in rest.split(':') {
                if argc == MAX_ARGS {
                    return Some(Response::ParamError);
                }
                args[argc] = arg;
                argc += 1;
            }
        }

        Some(self.handle(command, &args[..argc]))
    }

    fn current(&self, command: AtCommand) -> u8 {
        match command {
            AtCommand::Esp => self.mode.get_mode().into(),
            AtCommand::EspPower => self.power.get_power().into(),
        }
    }
}
