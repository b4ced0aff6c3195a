//! Geräte-Identität aus der Hardware-Adresse

use alloc::string::String;
use core::fmt::{self, Write};

/// Gerätename für Access Point und Portal
///
/// Format: `<prefix>-CC:DD:EE:FF` aus den letzten vier Oktetten der MAC.
/// Wird nicht gespeichert, sondern bei jedem Boot neu abgeleitet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    name: String,
}

impl DeviceIdentity {
    pub fn from_mac(prefix: &str, mac: [u8; 6]) -> Self {
        let mut name = String::with_capacity(prefix.len() + 12);
        name.push_str(prefix);
        name.push('-');
        for (i, octet) in mac[2..].iter().enumerate() {
            if i > 0 {
                name.push(':');
            }
            // Schreiben in einen String schlägt nie fehl
            let _ = write!(name, "{:02X}", octet);
        }
        Self { name }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DeviceIdentity {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}", self.name.as_str())
    }
}
