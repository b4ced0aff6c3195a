// Query-Parameter der HTTP-Routen
// picoserve deserialisiert sie mit serde, morse-core wertet sie aus

use alloc::string::String;
use morse_core::handlers::{GpioParams, SerialParams};
use serde::Deserialize;

/// `GET /morse?text=...`
#[derive(Debug, Default, Deserialize)]
pub struct MorseQuery {
    #[serde(default)]
    pub text: Option<String>,
}

/// `GET /gpio?gpio=..&inv=..&state=..`
///
/// Alle Werte roh als Text, damit nicht-numerische Angaben wie fehlende
/// behandelt werden statt den Request abzulehnen.
#[derive(Debug, Default, Deserialize)]
pub struct GpioQuery {
    #[serde(default)]
    pub gpio: Option<String>,
    #[serde(default)]
    pub inv: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

impl GpioQuery {
    pub fn params(&self) -> GpioParams {
        GpioParams::parse(
            self.gpio.as_deref(),
            self.inv.as_deref(),
            self.state.as_deref(),
        )
    }
}

/// `GET /serial?start=..` | `?symbol=..` | `?end=..`
#[derive(Debug, Default, Deserialize)]
pub struct SerialQuery {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

impl SerialQuery {
    pub fn params(&self) -> SerialParams<'_> {
        SerialParams {
            start: self.start.as_deref(),
            symbol: self.symbol.as_deref(),
            end: self.end.as_deref(),
        }
    }
}

/// Formular des Konfigurations-Portals: `GET /save?ssid=..&password=..`
#[derive(Debug, Default, Deserialize)]
pub struct SaveQuery {
    #[serde(default)]
    pub ssid: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}
