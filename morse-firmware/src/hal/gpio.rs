// GPIO-Ausgänge für den Signal-Treiber
//
// Der Pin wird erst zur Laufzeit per HTTP gewählt, daher werden die
// Pins über ihre Nummer aus dem Peripherie-Singleton geholt.

use esp_hal::gpio::{AnyPin, Level, Output, OutputConfig};
use morse_core::OutputPins;

use crate::config::{GPIO_COUNT, GPIO_RESERVED};

/// Alle per Nummer ansteuerbaren Ausgänge
///
/// Ein einmal konfigurierter Pin bleibt Ausgang mit seinem letzten Pegel,
/// auch wenn danach ein anderer Pin gewählt wird.
pub struct GpioBank {
    outputs: [Option<Output<'static>>; GPIO_COUNT],
}

impl GpioBank {
    pub fn new() -> Self {
        Self {
            outputs: [const { None }; GPIO_COUNT],
        }
    }
}

impl Default for GpioBank {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputPins for GpioBank {
    fn is_output_capable(&self, pin: u8) -> bool {
        (pin as usize) < GPIO_COUNT && !GPIO_RESERVED.contains(&pin)
    }

    fn configure_output(&mut self, pin: u8) {
        if !self.is_output_capable(pin) {
            return;
        }

        let slot = &mut self.outputs[pin as usize];
        // Bestehender Treiber behält seinen Pegel, nur die Konfiguration wird erneuert
        if let Some(output) = slot {
            output.apply_config(&OutputConfig::default());
            return;
        }

        // SAFETY: Reservierte Pins (Flash, USB, Konsole) sind oben ausgeschlossen,
        // und die GpioBank ist der einzige Nutzer aller übrigen Pins.
        let any = unsafe { AnyPin::steal(pin) };
        *slot = Some(Output::new(any, Level::Low, OutputConfig::default()));
    }

    fn write(&mut self, pin: u8, high: bool) {
        if let Some(output) = self.outputs.get_mut(pin as usize).and_then(Option::as_mut) {
            output.set_level(Level::from(high));
        }
    }
}
