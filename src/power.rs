//! ESP power control
//!
//! Unlike the UART mode, power is applied immediately: every accepted
//! [`PowerController::set_power`] stores the state and then drives the
//! enable pin, even when the state did not change. The pin direction is
//! reasserted on each write rather than cached, so the line recovers if
//! something else reconfigured it.

use embedded_hal::digital::PinState;

use crate::{EnablePin, InvalidPowerState, ParameterError};

/// Commanded state of the ESP power-enable line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    /// Enable line low
    Off = 0,
    /// Enable line high
    On = 1,
}

impl PowerState {
    /// State after boot
    pub const BOOT: Self = Self::On;
}

impl TryFrom<u8> for PowerState {
    type Error = InvalidPowerState;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Off),
            1 => Ok(Self::On),
            invalid => Err(InvalidPowerState::InvalidValue(invalid)),
        }
    }
}

impl From<PowerState> for u8 {
    fn from(state: PowerState) -> Self {
        state as u8
    }
}

impl From<PowerState> for PinState {
    fn from(state: PowerState) -> Self {
        match state {
            PowerState::Off => PinState::Low,
            PowerState::On => PinState::High,
        }
    }
}

/// Owner of the ESP power state and its enable pin
#[derive(Debug)]
pub struct PowerController<P> {
    pin: P,
    state: PowerState,
}

impl<P> PowerController<P> {
    /// Creates a controller in [`PowerState::BOOT`]
    ///
    /// The pin is not touched; call [`apply`](Self::apply) to bring the line
    /// in line with the boot state.
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            state: PowerState::BOOT,
        }
    }

    /// Current commanded state
    pub fn get_power(&self) -> PowerState {
        self.state
    }

    /// Releases the enable pin
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: EnablePin> PowerController<P> {
    /// Stores a new power state and drives the enable pin to match
    ///
    /// Only the encodings of [`PowerState`] (0 and 1) are accepted. A
    /// rejected value never reaches the pin. Pin driver failures are logged
    /// and otherwise ignored.
    pub fn set_power(&mut self, requested: u32) -> Result<(), ParameterError> {
        let state = u8::try_from(requested)
            .ok()
            .and_then(|raw| PowerState::try_from(raw).ok())
            .ok_or(ParameterError::OutOfRange(requested))?;

        self.state = state;
        debug!("esp power set to {}", state);
        self.apply();
        Ok(())
    }

    /// Drives the enable pin to the current state
    pub fn apply(&mut self) {
        let direction = self.pin.set_output();
        let level = self.pin.set_level(self.state.into());

        if direction.is_err() || level.is_err() {
            warn!("failed to drive esp enable pin to {}", self.state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::digital::{ErrorKind, ErrorType};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Direction {
        Input,
        Output,
    }

    #[derive(Debug)]
    struct SimPin {
        direction: Direction,
        level: PinState,
        accesses: usize,
        fail: bool,
    }

    impl SimPin {
        fn new() -> Self {
            Self {
                direction: Direction::Input,
                level: PinState::Low,
                accesses: 0,
                fail: false,
            }
        }
    }

    #[derive(Debug)]
    struct Broken;

    impl embedded_hal::digital::Error for Broken {
        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    impl ErrorType for SimPin {
        type Error = Broken;
    }

    impl EnablePin for SimPin {
        fn set_output(&mut self) -> Result<(), Self::Error> {
            self.accesses += 1;
            if self.fail {
                return Err(Broken);
            }
            self.direction = Direction::Output;
            Ok(())
        }

        fn set_level(&mut self, level: PinState) -> Result<(), Self::Error> {
            self.accesses += 1;
            if self.fail {
                return Err(Broken);
            }
            self.level = level;
            Ok(())
        }
    }

    #[test]
    fn boots_on_without_touching_the_pin() {
        let power = PowerController::new(SimPin::new());
        assert_eq!(power.get_power(), PowerState::On);
        assert_eq!(power.release().accesses, 0);
    }

    #[test]
    fn apply_drives_boot_state() {
        let mut power = PowerController::new(SimPin::new());
        power.apply();

        let pin = power.release();
        assert_eq!(pin.direction, Direction::Output);
        assert_eq!(pin.level, PinState::High);
    }

    #[test]
    fn on_drives_high_off_drives_low() {
        let mut power = PowerController::new(SimPin::new());

        power.set_power(1).unwrap();
        assert_eq!(power.get_power(), PowerState::On);
        assert_eq!(power.pin.direction, Direction::Output);
        assert_eq!(power.pin.level, PinState::High);

        power.set_power(0).unwrap();
        assert_eq!(power.get_power(), PowerState::Off);
        assert_eq!(power.pin.level, PinState::Low);
    }

    #[test]
    fn repeated_set_rewrites_the_pin() {
        let mut power = PowerController::new(SimPin::new());

        power.set_power(1).unwrap();
        let after_first = power.pin.accesses;
        power.pin.direction = Direction::Input;

        power.set_power(1).unwrap();
        assert_eq!(power.get_power(), PowerState::On);
        assert_eq!(power.pin.direction, Direction::Output);
        assert_eq!(power.pin.level, PinState::High);
        assert_eq!(power.pin.accesses, after_first * 2);
    }

    #[test]
    fn rejected_value_never_reaches_the_pin() {
        let mut power = PowerController::new(SimPin::new());

        for bad in [2, 10, 256, u32::MAX] {
            assert_eq!(power.set_power(bad), Err(ParameterError::OutOfRange(bad)));
            assert_eq!(power.get_power(), PowerState::On);
        }
        assert_eq!(power.release().accesses, 0);
    }

    #[test]
    fn pin_failure_is_not_reported() {
        let mut pin = SimPin::new();
        pin.fail = true;
        let mut power = PowerController::new(pin);

        assert_eq!(power.set_power(0), Ok(()));
        assert_eq!(power.get_power(), PowerState::Off);
    }

    #[test]
    fn power_conversions() {
        assert_eq!(PowerState::try_from(0), Ok(PowerState::Off));
        assert_eq!(
            PowerState::try_from(5),
            Err(InvalidPowerState::InvalidValue(5))
        );
        assert_eq!(PinState::from(PowerState::On), PinState::High);
        assert_eq!(u8::from(PowerState::Off), 0);
    }
}
