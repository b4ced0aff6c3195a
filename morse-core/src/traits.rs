//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für Hardware- und Plattform-Zugriff
//! ohne konkrete Implementierung.
//!
//! # Implementierungen
//! - **Production:** `morse-firmware` (esp-hal, esp-radio, embassy-time)
//! - **Testing:** Mocks in `morse-tests`

#![allow(async_fn_in_trait)]

use core::fmt;
use core::net::Ipv4Addr;

use crate::types::{LinkStatus, NetworkCredentials};

/// Fehler-Typ für WLAN-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WifiError {
    /// Konfiguration vom Treiber abgelehnt
    ConfigRejected,
    /// Start des Funkmoduls fehlgeschlagen
    StartFailed,
    /// Verbindungsaufbau konnte nicht angestoßen werden
    ConnectFailed,
    /// Access Point konnte nicht gestartet werden
    AccessPointFailed,
}

impl fmt::Display for WifiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ConfigRejected => "configuration rejected",
            Self::StartFailed => "radio start failed",
            Self::ConnectFailed => "connect request failed",
            Self::AccessPointFailed => "access point start failed",
        })
    }
}

/// Trait für die Ausgangs-Pins des Signal-Treibers
pub trait OutputPins {
    /// Kann dieser Pin als Ausgang betrieben werden?
    fn is_output_capable(&self, pin: u8) -> bool;

    /// Deklariert den Pin (erneut) als Ausgang
    ///
    /// Ein neuer Ausgang startet auf Low. Ist der Pin bereits Ausgang, bleibt
    /// sein Pegel unverändert.
    fn configure_output(&mut self, pin: u8);

    /// Schreibt den physikalischen Pegel (bereits invertiert)
    fn write(&mut self, pin: u8, high: bool);
}

/// Trait für den WLAN-Transport
///
/// Eine Abstraktion für alle Hardware-Familien, damit der
/// Zustandsautomat genau eine Implementierung hat.
pub trait WifiTransport {
    /// Vom Netzwerk-Stack gespeicherte Zugangsdaten (falls vorhanden)
    fn stored_credentials(&mut self) -> Option<NetworkCredentials>;

    /// Startet den Station-Modus und stößt die Verbindung an
    ///
    /// Wartet nicht auf den Verbindungsaufbau; der Fortschritt wird über
    /// [`connection_status`](Self::connection_status) abgefragt.
    async fn begin_station(&mut self, credentials: &NetworkCredentials) -> Result<(), WifiError>;

    /// Startet einen eigenständigen Access Point und liefert dessen IP
    async fn begin_access_point(&mut self, name: &str) -> Result<Ipv4Addr, WifiError>;

    fn connection_status(&mut self) -> LinkStatus;

    /// IPv4-Adresse der Station (nur wenn verbunden)
    fn station_address(&self) -> Option<Ipv4Addr>;

    /// Hardware-Adresse der WLAN-Schnittstelle
    fn mac_address(&self) -> [u8; 6];
}

/// Trait für das interaktive Konfigurations-Portal
///
/// Der Aufruf blockiert, bis Zugangsdaten eingegeben wurden oder
/// `timeout_ms` abgelaufen ist.
pub trait ConfigPortal {
    async fn run_portal(&mut self, ap_name: &str, timeout_ms: u64) -> Option<NetworkCredentials>;
}

/// Trait für Zeitmessung und Wartezeiten
pub trait Clock {
    /// Monoton steigende Zeit in Millisekunden
    fn now_ms(&self) -> u64;

    async fn sleep_ms(&mut self, ms: u64);
}

/// Trait für die Bediener-Konsole (serielle Schnittstelle)
///
/// Ausgabe über [`fmt::Write`], Eingabe wird nicht-blockierend gepollt.
pub trait OperatorConsole: fmt::Write {
    fn poll_input(&mut self) -> Option<u8>;
}

/// Trait für System-Steuerung
pub trait SystemControl {
    /// Löst einen vollständigen Neustart aus
    fn restart(&mut self);
}

// ============================================================================
// Blanket-Implementierungen für &mut T
// ============================================================================

impl<T: OutputPins + ?Sized> OutputPins for &mut T {
    fn is_output_capable(&self, pin: u8) -> bool {
        (**self).is_output_capable(pin)
    }

    fn configure_output(&mut self, pin: u8) {
        (**self).configure_output(pin)
    }

    fn write(&mut self, pin: u8, high: bool) {
        (**self).write(pin, high)
    }
}

impl<T: WifiTransport> WifiTransport for &mut T {
    fn stored_credentials(&mut self) -> Option<NetworkCredentials> {
        (**self).stored_credentials()
    }

    async fn begin_station(&mut self, credentials: &NetworkCredentials) -> Result<(), WifiError> {
        (**self).begin_station(credentials).await
    }

    async fn begin_access_point(&mut self, name: &str) -> Result<Ipv4Addr, WifiError> {
        (**self).begin_access_point(name).await
    }

    fn connection_status(&mut self) -> LinkStatus {
        (**self).connection_status()
    }

    fn station_address(&self) -> Option<Ipv4Addr> {
        (**self).station_address()
    }

    fn mac_address(&self) -> [u8; 6] {
        (**self).mac_address()
    }
}

impl<T: ConfigPortal> ConfigPortal for &mut T {
    async fn run_portal(&mut self, ap_name: &str, timeout_ms: u64) -> Option<NetworkCredentials> {
        (**self).run_portal(ap_name, timeout_ms).await
    }
}

impl<T: Clock> Clock for &mut T {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }

    async fn sleep_ms(&mut self, ms: u64) {
        (**self).sleep_ms(ms).await
    }
}

impl<T: OperatorConsole + ?Sized> OperatorConsole for &mut T {
    fn poll_input(&mut self) -> Option<u8> {
        (**self).poll_input()
    }
}

impl<T: SystemControl + ?Sized> SystemControl for &mut T {
    fn restart(&mut self) {
        (**self).restart()
    }
}
