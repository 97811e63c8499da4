//! Power-enable pin capability
//!
//! The power controller only needs two things from the GPIO driver: put the
//! line in output mode, and drive it to a level. [`EnablePin`] captures
//! exactly that, so the controller can run against a simulated pin in tests.
//!
//! HALs that hand out type-state output pins already guarantee the
//! direction; [`PushPullPin`] adapts any [`OutputPin`] to [`EnablePin`].

use embedded_hal::digital::{ErrorType, OutputPin, PinState};

/// A GPIO line whose direction and level can be set
pub trait EnablePin: ErrorType {
    /// Configures the line as a push-pull output
    fn set_output(&mut self) -> Result<(), Self::Error>;

    /// Drives the line to `level`
    fn set_level(&mut self, level: PinState) -> Result<(), Self::Error>;
}

/// [`EnablePin`] adapter for pins that are already outputs
#[derive(Debug)]
pub struct PushPullPin<P> {
    pin: P,
}

impl<P> PushPullPin<P> {
    /// Wraps an output pin
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Releases the underlying pin
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: ErrorType> ErrorType for PushPullPin<P> {
    type Error = P::Error;
}

impl<P: OutputPin> EnablePin for PushPullPin<P> {
    fn set_output(&mut self) -> Result<(), Self::Error> {
        // Direction is fixed by the pin's type.
        Ok(())
    }

    fn set_level(&mut self, level: PinState) -> Result<(), Self::Error> {
        self.pin.set_state(level)
    }
}
