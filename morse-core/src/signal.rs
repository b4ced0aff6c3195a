//! Hardware Signal Driver
//!
//! Setzt einen logischen Ein/Aus-Zustand auf genau einem konfigurierbaren
//! Pin um, unter Beachtung der Polaritäts-Invertierung.

use core::fmt;

use crate::traits::OutputPins;
use crate::types::PinConfig;

/// Fehler-Typ für Pin-Konfiguration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SignalError {
    /// Pin existiert nicht oder kann kein Ausgang sein
    InvalidPin(u8),
}

impl fmt::Display for SignalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPin(pin) => write!(f, "GPIO {} cannot be used as output", pin),
        }
    }
}

/// Signal-Treiber über einem [`OutputPins`] Backend
///
/// Solange `configure` nie aufgerufen wurde, gilt [`PinConfig::FACTORY`];
/// der Pin wird vor dem ersten Schreiben trotzdem als Ausgang deklariert.
pub struct SignalDriver<P: OutputPins> {
    pins: P,
    config: PinConfig,
    output_ready: bool,
}

impl<P: OutputPins> SignalDriver<P> {
    pub fn new(pins: P) -> Self {
        Self {
            pins,
            config: PinConfig::FACTORY,
            output_ready: false,
        }
    }

    /// Aktuelle Pin-Konfiguration
    pub fn config(&self) -> PinConfig {
        self.config
    }

    /// (Re-)Konfiguriert Pin und Polarität
    ///
    /// Deklariert den Pin bei jedem Aufruf erneut als Ausgang, auch wenn
    /// sich nichts geändert hat. Ungültige Pins lassen die bisherige
    /// Konfiguration unverändert.
    pub fn configure(&mut self, pin: u8, inverted: bool) -> Result<(), SignalError> {
        if !self.pins.is_output_capable(pin) {
            return Err(SignalError::InvalidPin(pin));
        }

        self.config = PinConfig {
            pin_number: pin,
            inverted,
        };
        self.pins.configure_output(pin);
        self.output_ready = true;
        Ok(())
    }

    /// Schreibt `state XOR inverted` auf den konfigurierten Pin
    pub fn set(&mut self, logical_state: bool) {
        if !self.output_ready {
            self.pins.configure_output(self.config.pin_number);
            self.output_ready = true;
        }

        let level = self.config.level_for(logical_state);
        self.pins.write(self.config.pin_number, level);
    }

    /// Zugriff auf das Backend (z.B. für Assertions in Tests)
    pub fn pins(&self) -> &P {
        &self.pins
    }
}
