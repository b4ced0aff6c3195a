//! Core Types für die Morse-Maschine
//!
//! Datenstrukturen ohne Hardware-Dependencies

use core::fmt;

/// Maximale SSID-Länge laut IEEE 802.11
pub const SSID_MAX_LEN: usize = 32;

/// Maximale PSK-Länge (WPA2 Passphrase oder 64 Hex-Zeichen)
pub const PSK_MAX_LEN: usize = 64;

/// Ein einzelnes Element einer Morse-Sequenz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MorseSymbol {
    Dot,
    Dash,
    /// Pause nach jedem Buchstaben
    LetterGap,
    /// Pause zwischen Wörtern (aus einem Leerzeichen)
    WordGap,
}

/// Aktive Pin-Konfiguration des Signal-Treibers
///
/// Wird von jedem `/gpio` Request überschrieben (last-write-wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    pub pin_number: u8,
    pub inverted: bool,
}

impl PinConfig {
    /// Werks-Pin (D4 / GPIO2), nicht invertiert
    pub const FACTORY: PinConfig = PinConfig {
        pin_number: 2,
        inverted: false,
    };

    /// Physikalischer Pegel für einen logischen Zustand
    pub fn level_for(&self, logical_state: bool) -> bool {
        logical_state ^ self.inverted
    }
}

impl Default for PinConfig {
    fn default() -> Self {
        Self::FACTORY
    }
}

/// Marker für den Session-Log (`/serial?symbol=...`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LogMark {
    Dot,
    Dash,
    Space,
    Word,
}

impl LogMark {
    /// Parst das Wire-Token des Browsers: `.`, `-`, `SPACE`, `WORD`
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "." => Some(Self::Dot),
            "-" => Some(Self::Dash),
            "SPACE" => Some(Self::Space),
            "WORD" => Some(Self::Word),
            _ => None,
        }
    }

    /// Das eine Zeichen, das im Log erscheint
    ///
    /// `Space` und `Word` sind im Trace nicht unterscheidbar.
    pub fn as_char(self) -> char {
        match self {
            Self::Dot => '.',
            Self::Dash => '-',
            Self::Space | Self::Word => ' ',
        }
    }
}

/// Fehler beim Erstellen von WLAN-Zugangsdaten
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CredentialsError {
    EmptySsid,
    SsidTooLong,
    PskTooLong,
}

impl fmt::Display for CredentialsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySsid => f.write_str("SSID is empty"),
            Self::SsidTooLong => write!(f, "SSID longer than {} bytes", SSID_MAX_LEN),
            Self::PskTooLong => write!(f, "PSK longer than {} bytes", PSK_MAX_LEN),
        }
    }
}

/// WLAN-Zugangsdaten (SSID + Pre-Shared Key)
///
/// Gespeichert werden sie vom Netzwerk-Stack der Plattform; der Core liest
/// sie nur und reicht sie beim Verbinden wieder weiter.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkCredentials {
    ssid: heapless::String<SSID_MAX_LEN>,
    psk: heapless::String<PSK_MAX_LEN>,
}

impl NetworkCredentials {
    /// Erstellt Zugangsdaten und prüft die Längen
    pub fn new(ssid: &str, psk: &str) -> Result<Self, CredentialsError> {
        if ssid.is_empty() {
            return Err(CredentialsError::EmptySsid);
        }
        let ssid = heapless::String::try_from(ssid).map_err(|_| CredentialsError::SsidTooLong)?;
        let psk = heapless::String::try_from(psk).map_err(|_| CredentialsError::PskTooLong)?;
        Ok(Self { ssid, psk })
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    pub fn psk(&self) -> &str {
        &self.psk
    }

    /// PSK für die Konsole: höchstens 8 Sternchen, nie der Klartext
    pub fn masked_psk(&self) -> MaskedPsk {
        MaskedPsk(self.psk.len().min(8))
    }
}

/// Maskierte Darstellung eines PSK (siehe [`NetworkCredentials::masked_psk`])
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskedPsk(usize);

impl fmt::Display for MaskedPsk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return f.write_str("(none)");
        }
        for _ in 0..self.0 {
            f.write_str("*")?;
        }
        Ok(())
    }
}

/// Verbindungsstatus der Station-Schnittstelle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkStatus {
    /// Kein Verbindungsversuch aktiv
    Idle,
    /// Verbindungsaufbau läuft (Assoziation oder DHCP)
    Connecting,
    /// Verbunden und IP-Adresse erhalten
    Connected,
    /// Verbindungsaufbau vom Treiber abgelehnt
    Failed,
}

impl LinkStatus {
    pub fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Failed => "failed",
        })
    }
}
