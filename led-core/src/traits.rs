//! Hardware Abstraction Traits
//!
//! Der Controller kennt keinen GPIO-Treiber. Wie das Bit die Außenwelt
//! erreicht, entscheidet die [`LevelSink`]-Implementierung.

use embedded_hal::digital::{OutputPin, PinState};

/// Fehler-Typ für LED-Ausgänge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedError {
    InitFailed,
    WriteFailed,
}

/// Trait für den physikalischen LED-Ausgang
///
/// Bekommt den *physikalischen* Pegel: die Polarität wurde vom Controller
/// bereits angewendet.
///
/// # Implementierungen
/// - **Production:** [`PinSink`] (beliebiger `embedded-hal` OutputPin)
/// - **Erweiterungsboards:** [`CallbackSink`] (eigene Steuerfunktion)
/// - **Testing:** MockLevelSink (in-memory Mock)
pub trait LevelSink {
    /// Einmalige Konfiguration des Ausgangs vor dem ersten Schreiben
    fn init(&mut self) -> Result<(), LedError> {
        Ok(())
    }

    /// Setzt den physikalischen Pegel (`true` = High)
    fn set_level(&mut self, high: bool) -> Result<(), LedError>;
}

/// Sink für einen direkt angeschlossenen GPIO-Pin
pub struct PinSink<P> {
    pin: P,
}

impl<P: OutputPin> PinSink<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> LevelSink for PinSink<P> {
    fn set_level(&mut self, high: bool) -> Result<(), LedError> {
        self.pin
            .set_state(PinState::from(high))
            .map_err(|_| LedError::WriteFailed)
    }
}

/// Sink mit eigener Steuerfunktion
///
/// Für LEDs an GPIO-Expandern o.ä.: die Funktion bekommt die Pin-Nummer
/// und den physikalischen Pegel.
pub struct CallbackSink<F> {
    pin: u8,
    control: F,
}

impl<F: FnMut(u8, bool)> CallbackSink<F> {
    pub fn new(pin: u8, control: F) -> Self {
        Self { pin, control }
    }
}

impl<F: FnMut(u8, bool)> LevelSink for CallbackSink<F> {
    fn set_level(&mut self, high: bool) -> Result<(), LedError> {
        (self.control)(self.pin, high);
        Ok(())
    }
}

impl<T: LevelSink + ?Sized> LevelSink for &mut T {
    fn init(&mut self) -> Result<(), LedError> {
        (**self).init()
    }

    fn set_level(&mut self, high: bool) -> Result<(), LedError> {
        (**self).set_level(high)
    }
}

// ============================================================================
// Mock Implementation (nur für Tests)
// ============================================================================
