//! UART routing mode
//!
//! The module's UART is owned either by the local AT command processor or by
//! the ESP companion radio. A mode change cannot be applied while a command
//! is still being processed, so [`ModeController::set_mode`] only records the
//! new mode and raises a [`PendingModeSwitch`]. The UART reconfiguration
//! routine, which runs at a quiescent point (main loop or interrupt), drains
//! the signal with [`ModeController::take_pending`] and does the rewiring.
//!
//! # Consumer contract
//! - Only the consumer clears the signal, and only via `take_pending`.
//! - The mode is stored before the signal is raised (release), and the
//!   consumer clears the signal before reading the mode (acquire). A consumer
//!   that sees the signal therefore sees the mode that raised it, or a newer
//!   one.
//! - If `set_mode` runs between the clear and the read, the consumer applies
//!   the newer mode and the signal is raised again. The next drain re-applies
//!   the same mode, which the routing layer must treat as a no-op.
//!
//! All methods take `&self`, so the controller can live in a `static` shared
//! with the consumer.

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use crate::{InvalidMode, ParameterError};

/// Logical owner of the UART session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperatingMode {
    /// UART owned by the local AT command processor
    LoraAtMode = 0,
    /// UART routed through to the ESP companion radio
    EspPassthrough = 1,
}

impl OperatingMode {
    /// Mode after boot
    pub const BOOT: Self = Self::LoraAtMode;

    // Only validated values are ever stored, so anything non-zero is 1.
    fn from_stored(raw: u8) -> Self {
        match raw {
            0 => Self::LoraAtMode,
            _ => Self::EspPassthrough,
        }
    }
}

impl TryFrom<u8> for OperatingMode {
    type Error = InvalidMode;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::LoraAtMode),
            1 => Ok(Self::EspPassthrough),
            invalid => Err(InvalidMode::InvalidValue(invalid)),
        }
    }
}

impl From<OperatingMode> for u8 {
    fn from(mode: OperatingMode) -> Self {
        mode as u8
    }
}

/// Single-slot "mode changed, not yet applied" signal
///
/// Raising an already raised signal leaves it raised; there is never more
/// than one pending switch.
#[derive(Debug)]
pub struct PendingModeSwitch {
    raised: AtomicBool,
}

impl PendingModeSwitch {
    /// Creates an unset signal
    pub const fn new() -> Self {
        Self {
            raised: AtomicBool::new(false),
        }
    }

    pub(crate) fn raise(&self) {
        self.raised.store(true, Ordering::Release);
    }

    /// Returns whether a switch is pending, without consuming it
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }

    /// Clears the signal, returning whether it was set
    pub fn take(&self) -> bool {
        self.raised.swap(false, Ordering::AcqRel)
    }
}

impl Default for PendingModeSwitch {
    fn default() -> Self {
        Self::new()
    }
}

/// Owner of the UART routing mode and its pending-switch signal
#[derive(Debug)]
pub struct ModeController {
    mode: AtomicU8,
    pending: PendingModeSwitch,
}

impl ModeController {
    /// Creates a controller in [`OperatingMode::BOOT`] with no switch pending
    pub const fn new() -> Self {
        Self {
            mode: AtomicU8::new(OperatingMode::BOOT as u8),
            pending: PendingModeSwitch::new(),
        }
    }

    /// Current mode
    pub fn get_mode(&self) -> OperatingMode {
        OperatingMode::from_stored(self.mode.load(Ordering::Acquire))
    }

    /// Records a new mode and raises the pending-switch signal
    ///
    /// Only the encodings of [`OperatingMode`] (0 and 1) are accepted. On
    /// rejection neither the mode nor the signal is touched.
    pub fn set_mode(&self, requested: u32) -> Result<(), ParameterError> {
        let mode = u8::try_from(requested)
            .ok()
            .and_then(|raw| OperatingMode::try_from(raw).ok())
            .ok_or(ParameterError::OutOfRange(requested))?;

        self.mode.store(mode as u8, Ordering::Release);
        self.pending.raise();
        debug!("uart mode set to {}, switch pending", mode);
        Ok(())
    }

    /// Whether a committed mode change is waiting to be applied
    pub fn is_pending(&self) -> bool {
        self.pending.is_raised()
    }

    /// Consumes the pending-switch signal
    ///
    /// Returns the mode to apply if a switch was pending. This is the only
    /// operation that clears the signal.
    pub fn take_pending(&self) -> Option<OperatingMode> {
        self.pending.take().then(|| self.get_mode())
    }
}

impl Default for ModeController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boots_in_lora_mode_with_nothing_pending() {
        let mode = ModeController::new();
        assert_eq!(mode.get_mode(), OperatingMode::LoraAtMode);
        assert!(!mode.is_pending());
        assert_eq!(mode.take_pending(), None);
    }

    #[test]
    fn accepted_mode_is_stored_and_signalled() {
        let mode = ModeController::new();

        mode.set_mode(1).unwrap();
        assert_eq!(mode.get_mode(), OperatingMode::EspPassthrough);
        assert!(mode.is_pending());

        mode.set_mode(0).unwrap();
        assert_eq!(mode.get_mode(), OperatingMode::LoraAtMode);
    }

    #[test]
    fn rejected_mode_changes_nothing() {
        let mode = ModeController::new();

        for bad in [2, 3, 255, 256, 257, u32::MAX] {
            assert_eq!(mode.set_mode(bad), Err(ParameterError::OutOfRange(bad)));
            assert_eq!(mode.get_mode(), OperatingMode::LoraAtMode);
            assert!(!mode.is_pending());
        }
    }

    #[test]
    fn signal_does_not_accumulate() {
        let mode = ModeController::new();

        mode.set_mode(1).unwrap();
        mode.set_mode(1).unwrap();
        mode.set_mode(0).unwrap();

        assert_eq!(mode.take_pending(), Some(OperatingMode::LoraAtMode));
        assert_eq!(mode.take_pending(), None);
        assert!(!mode.is_pending());
    }

    #[test]
    fn reading_does_not_consume() {
        let mode = ModeController::new();
        mode.set_mode(1).unwrap();

        for _ in 0..3 {
            assert_eq!(mode.get_mode(), OperatingMode::EspPassthrough);
            assert!(mode.is_pending());
        }
        assert_eq!(mode.take_pending(), Some(OperatingMode::EspPassthrough));
    }

    #[test]
    fn mode_conversions() {
        assert_eq!(OperatingMode::try_from(1), Ok(OperatingMode::EspPassthrough));
        assert_eq!(
            OperatingMode::try_from(2),
            Err(InvalidMode::InvalidValue(2))
        );
        assert_eq!(u8::from(OperatingMode::EspPassthrough), 1);
    }

    #[test]
    fn usable_from_a_static() {
        static MODE: ModeController = ModeController::new();

        MODE.set_mode(1).unwrap();
        assert_eq!(MODE.take_pending(), Some(OperatingMode::EspPassthrough));
    }
}
