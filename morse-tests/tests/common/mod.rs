//! Mock-Kollaborateure für die Integration Tests
//!
//! Jede Test-Datei bindet dieses Modul mit `mod common;` ein und nutzt nur
//! einen Teil davon.

#![allow(dead_code)]

use std::cell::Cell;
use std::collections::VecDeque;
use std::fmt;
use std::net::Ipv4Addr;
use std::rc::Rc;

use morse_core::handlers::AssetStore;
use morse_core::{
    Clock, ConfigPortal, LinkStatus, NetworkCredentials, OperatorConsole, OutputPins, SystemControl,
    WifiError, WifiTransport,
};

pub const TEST_MAC: [u8; 6] = [0x24, 0x0a, 0xc4, 0x12, 0xab, 0x0f];
pub const STATION_IP: Ipv4Addr = Ipv4Addr::new(192, 168, 1, 50);
pub const AP_IP: Ipv4Addr = Ipv4Addr::new(192, 168, 4, 1);

pub fn creds(ssid: &str, psk: &str) -> NetworkCredentials {
    NetworkCredentials::new(ssid, psk).unwrap()
}

// ============================================================================
// Mock Output Pins
// ============================================================================

/// Zeichnet Konfiguration und Schreibzugriffe auf
///
/// `levels` ist der Pegelverlauf am Pin, wie ihn eine angeschlossene Last
/// sieht: ein neu angelegter Ausgang startet auf Low.
#[derive(Default)]
pub struct MockPins {
    pub configured: Vec<u8>,
    pub writes: Vec<(u8, bool)>,
    pub levels: Vec<(u8, bool)>,
}

impl MockPins {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_write(&self) -> Option<(u8, bool)> {
        self.writes.last().copied()
    }
}

impl OutputPins for MockPins {
    fn is_output_capable(&self, pin: u8) -> bool {
        pin <= 30
    }

    fn configure_output(&mut self, pin: u8) {
        if !self.configured.contains(&pin) {
            self.levels.push((pin, false));
        }
        self.configured.push(pin);
    }

    fn write(&mut self, pin: u8, high: bool) {
        assert!(
            self.configured.contains(&pin),
            "GPIO {} written before configured as output",
            pin
        );
        self.writes.push((pin, high));
        self.levels.push((pin, high));
    }
}

// ============================================================================
// Fake Clock
// ============================================================================

/// Simulierte Zeit; `sleep_ms` springt sofort vorwärts
///
/// Die Zeit wird geteilt, damit die Konsole Eingaben zeitgesteuert liefern kann.
#[derive(Clone, Default)]
pub struct FakeClock {
    now: Rc<Cell<u64>>,
    pub sleeps: Vec<u64>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> Rc<Cell<u64>> {
        self.now.clone()
    }
}

impl Clock for FakeClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }

    async fn sleep_ms(&mut self, ms: u64) {
        self.now.set(self.now.get() + ms);
        self.sleeps.push(ms);
    }
}

// ============================================================================
// Scripted Console
// ============================================================================

/// Konsole mit aufgezeichneter Ausgabe und geplanten Eingaben
pub struct ScriptedConsole {
    pub output: String,
    input: VecDeque<(u64, u8)>,
    now: Rc<Cell<u64>>,
}

impl ScriptedConsole {
    pub fn new(clock: &FakeClock) -> Self {
        Self {
            output: String::new(),
            input: VecDeque::new(),
            now: clock.handle(),
        }
    }

    /// Eingabe wird ab `at_ms` (simulierte Zeit) lesbar
    pub fn type_at(&mut self, at_ms: u64, bytes: &[u8]) -> &mut Self {
        self.input.extend(bytes.iter().map(|&b| (at_ms, b)));
        self
    }

    pub fn pending_input(&self) -> usize {
        self.input.len()
    }
}

impl fmt::Write for ScriptedConsole {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.output.push_str(s);
        Ok(())
    }
}

impl OperatorConsole for ScriptedConsole {
    fn poll_input(&mut self) -> Option<u8> {
        match self.input.front() {
            Some(&(at, byte)) if at <= self.now.get() => {
                self.input.pop_front();
                Some(byte)
            }
            _ => None,
        }
    }
}

// ============================================================================
// Mock WiFi
// ============================================================================

/// Simuliertes Funkmodul
///
/// Nur `reachable` Zugangsdaten führen zu einer Verbindung, und zwar nach
/// `polls_until_connected` Status-Abfragen.
pub struct MockWifi {
    pub stored: Option<NetworkCredentials>,
    pub reachable: Option<NetworkCredentials>,
    pub polls_until_connected: u32,
    pub fail_access_point: bool,
    pub fail_station: bool,
    pub station_attempts: Vec<String>,
    pub access_points: Vec<String>,
    joining: Option<NetworkCredentials>,
    polls: u32,
}

impl MockWifi {
    pub fn new() -> Self {
        Self {
            stored: None,
            reachable: None,
            polls_until_connected: 0,
            fail_access_point: false,
            fail_station: false,
            station_attempts: Vec::new(),
            access_points: Vec::new(),
            joining: None,
            polls: 0,
        }
    }

    pub fn with_stored(mut self, credentials: NetworkCredentials) -> Self {
        self.stored = Some(credentials);
        self
    }

    pub fn with_reachable(mut self, credentials: NetworkCredentials) -> Self {
        self.reachable = Some(credentials);
        self
    }

    fn is_joined(&self) -> bool {
        self.joining.is_some()
            && self.joining == self.reachable
            && self.polls > self.polls_until_connected
    }
}

impl WifiTransport for MockWifi {
    fn stored_credentials(&mut self) -> Option<NetworkCredentials> {
        self.stored.clone()
    }

    async fn begin_station(&mut self, credentials: &NetworkCredentials) -> Result<(), WifiError> {
        self.station_attempts.push(credentials.ssid().to_string());
        if self.fail_station {
            return Err(WifiError::StartFailed);
        }
        self.joining = Some(credentials.clone());
        self.polls = 0;
        Ok(())
    }

    async fn begin_access_point(&mut self, name: &str) -> Result<Ipv4Addr, WifiError> {
        if self.fail_access_point {
            return Err(WifiError::AccessPointFailed);
        }
        self.access_points.push(name.to_string());
        Ok(AP_IP)
    }

    fn connection_status(&mut self) -> LinkStatus {
        if self.joining.is_none() {
            return LinkStatus::Idle;
        }
        if self.joining != self.reachable {
            return LinkStatus::Failed;
        }
        self.polls += 1;
        if self.is_joined() {
            LinkStatus::Connected
        } else {
            LinkStatus::Connecting
        }
    }

    fn station_address(&self) -> Option<Ipv4Addr> {
        self.is_joined().then_some(STATION_IP)
    }

    fn mac_address(&self) -> [u8; 6] {
        TEST_MAC
    }
}

// ============================================================================
// Mock Portal / System
// ============================================================================

#[derive(Default)]
pub struct MockPortal {
    pub result: Option<NetworkCredentials>,
    pub calls: Vec<(String, u64)>,
}

impl MockPortal {
    pub fn returning(result: Option<NetworkCredentials>) -> Self {
        Self {
            result,
            calls: Vec::new(),
        }
    }
}

impl ConfigPortal for MockPortal {
    async fn run_portal(&mut self, ap_name: &str, timeout_ms: u64) -> Option<NetworkCredentials> {
        self.calls.push((ap_name.to_string(), timeout_ms));
        self.result.clone()
    }
}

#[derive(Default)]
pub struct MockSystem {
    pub restarts: u32,
}

impl SystemControl for MockSystem {
    fn restart(&mut self) {
        self.restarts += 1;
    }
}

// ============================================================================
// Mock Assets
// ============================================================================

/// Asset-Quelle mit frei wählbarem Inhalt
#[derive(Default)]
pub struct MockAssets {
    pub files: Vec<(&'static str, &'static str)>,
}

impl MockAssets {
    pub fn with(mut self, name: &'static str, body: &'static str) -> Self {
        self.files.push((name, body));
        self
    }
}

impl AssetStore for MockAssets {
    fn load(&self, name: &str) -> Option<&'static str> {
        self.files.iter().find(|(n, _)| *n == name).map(|(_, body)| *body)
    }
}
