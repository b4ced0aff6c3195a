//! Connectivity State Machine
//!
//! Netzwerk-Bring-up beim Boot:
//!
//! ```text
//! BOOT → TRY_SAVED ─ok→ CONNECTED
//!           │ fail
//!           ▼
//! AWAIT_PORTAL_DECISION ─yes→ PORTAL_ACTIVE ─ok→ CONNECTED
//!           │ no                    │ fail
//!           ▼                       ▼
//!        AWAIT_AP_DECISION ◄────────┘
//!           │ yes → AP_MODE
//!           │ no  → RESTARTING
//! ```
//!
//! Jede Wartezeit ist begrenzt, damit das Gerät ohne Bediener trotzdem
//! einen deterministischen Endzustand erreicht. Zeit, Eingabe und Funk
//! kommen über Traits herein (testbar ohne Hardware).

use core::fmt::{self, Write};

use crate::identity::DeviceIdentity;
use crate::traits::{Clock, ConfigPortal, OperatorConsole, SystemControl, WifiTransport};
use crate::types::NetworkCredentials;

/// Zustände des Bring-up
///
/// Übergänge laufen innerhalb eines Boot-Zyklus nur vorwärts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectivityState {
    Boot,
    TrySaved,
    AwaitPortalDecision,
    PortalActive,
    AwaitApDecision,
    ApMode,
    Connected,
    Restarting,
}

impl ConnectivityState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::ApMode | Self::Connected | Self::Restarting)
    }

    /// Sind die HTTP-Handler in diesem Zustand erreichbar?
    pub fn serves_http(self) -> bool {
        matches!(self, Self::ApMode | Self::Connected)
    }
}

impl fmt::Display for ConnectivityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Boot => "BOOT",
            Self::TrySaved => "TRY_SAVED",
            Self::AwaitPortalDecision => "AWAIT_PORTAL_DECISION",
            Self::PortalActive => "PORTAL_ACTIVE",
            Self::AwaitApDecision => "AWAIT_AP_DECISION",
            Self::ApMode => "AP_MODE",
            Self::Connected => "CONNECTED",
            Self::Restarting => "RESTARTING",
        })
    }
}

/// Zeitkonstanten des Bring-up (alle in Millisekunden)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectivityConfig {
    /// Verbindungsversuch und Portal-Laufzeit
    pub connect_timeout_ms: u64,
    /// Wartezeit auf eine Bediener-Antwort
    pub prompt_timeout_ms: u64,
    /// Polling-Intervall beim Versuch mit gespeicherten Daten
    pub saved_poll_ms: u64,
    /// Polling-Intervall beim erneuten Versuch nach dem Portal
    pub retry_poll_ms: u64,
    pub input_poll_ms: u64,
    /// Pause vor dem Neustart, damit die Konsole noch ausgegeben wird
    pub restart_delay_ms: u64,
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 20_000,
            prompt_timeout_ms: 20_000,
            saved_poll_ms: 500,
            retry_poll_ms: 250,
            input_poll_ms: 10,
            restart_delay_ms: 200,
        }
    }
}

/// Alle Kollaborateure des Zustandsautomaten
pub struct ConnectivityParts<W, P, C, O, R> {
    pub wifi: W,
    pub portal: P,
    pub clock: C,
    pub console: O,
    pub system: R,
}

/// Schreibt eine Zeile auf die Bediener-Konsole
macro_rules! say {
    ($self:ident, $($arg:tt)*) => {
        let _ = writeln!($self.parts.console, $($arg)*);
    };
}

/// Der Zustandsautomat selbst
pub struct ConnectivityMachine<W, P, C, O, R> {
    parts: ConnectivityParts<W, P, C, O, R>,
    config: ConnectivityConfig,
    identity: DeviceIdentity,
    state: ConnectivityState,
    credentials: Option<NetworkCredentials>,
}

impl<W, P, C, O, R> ConnectivityMachine<W, P, C, O, R>
where
    W: WifiTransport,
    P: ConfigPortal,
    C: Clock,
    O: OperatorConsole,
    R: SystemControl,
{
    /// Erstellt den Automaten im Zustand `Boot`
    ///
    /// Der Gerätename wird hier einmalig aus der MAC abgeleitet.
    pub fn new(
        parts: ConnectivityParts<W, P, C, O, R>,
        product_prefix: &str,
        config: ConnectivityConfig,
    ) -> Self {
        let identity = DeviceIdentity::from_mac(product_prefix, parts.wifi.mac_address());
        Self {
            parts,
            config,
            identity,
            state: ConnectivityState::Boot,
            credentials: None,
        }
    }

    pub fn state(&self) -> ConnectivityState {
        self.state
    }

    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    /// Zugangsdaten, mit denen zuletzt verbunden wurde bzw. werden sollte
    pub fn credentials(&self) -> Option<&NetworkCredentials> {
        self.credentials.as_ref()
    }

    pub fn into_parts(self) -> ConnectivityParts<W, P, C, O, R> {
        self.parts
    }

    /// Läuft bis zu einem Endzustand und gibt diesen zurück
    pub async fn run(&mut self) -> ConnectivityState {
        while !self.state.is_terminal() {
            self.step().await;
        }
        self.state
    }

    /// Führt die Aktion des aktuellen Zustands aus und wechselt weiter
    ///
    /// In einem Endzustand passiert nichts mehr.
    pub async fn step(&mut self) -> ConnectivityState {
        let next = match self.state {
            ConnectivityState::Boot => {
                say!(self, "=== WiFi setup ===");
                say!(self, "Device name: {}", self.identity);
                self.credentials = self.parts.wifi.stored_credentials();
                ConnectivityState::TrySaved
            }
            ConnectivityState::TrySaved => {
                if self.try_saved().await {
                    ConnectivityState::Connected
                } else {
                    ConnectivityState::AwaitPortalDecision
                }
            }
            ConnectivityState::AwaitPortalDecision => {
                if self.ask_yes_no("Start configuration portal?", true).await {
                    ConnectivityState::PortalActive
                } else {
                    ConnectivityState::AwaitApDecision
                }
            }
            ConnectivityState::PortalActive => {
                if self.portal_and_reconnect().await {
                    ConnectivityState::Connected
                } else {
                    say!(self, "No connection after portal.");
                    ConnectivityState::AwaitApDecision
                }
            }
            ConnectivityState::AwaitApDecision => {
                if self.ask_yes_no("Start as access point?", false).await {
                    ConnectivityState::ApMode
                } else {
                    ConnectivityState::Restarting
                }
            }
            terminal => return terminal,
        };

        self.state = next;
        match next {
            ConnectivityState::ApMode => self.start_access_point().await,
            ConnectivityState::Restarting => self.restart().await,
            _ => {}
        }
        next
    }

    /// TRY_SAVED: Verbinden mit gespeicherten Zugangsdaten
    async fn try_saved(&mut self) -> bool {
        say!(self, "Trying saved credentials...");
        let Some(credentials) = self.credentials.clone() else {
            say!(self, "  (no saved SSID)");
            return false;
        };

        say!(self, "Saved credentials:");
        say!(self, "  SSID: {}", credentials.ssid());
        say!(self, "  PSK : {}", credentials.masked_psk());

        if let Err(e) = self.parts.wifi.begin_station(&credentials).await {
            say!(self, "Could not start station mode: {}", e);
            return false;
        }

        if self
            .wait_for_link(self.config.connect_timeout_ms, self.config.saved_poll_ms)
            .await
        {
            self.report_connected("Connected with saved WiFi");
            return true;
        }

        let status = self.parts.wifi.connection_status();
        say!(self, "Connecting with saved WiFi failed (status={})", status);
        false
    }

    /// PORTAL_ACTIVE: Portal ausführen, danach mit den aktuellen Daten verbinden
    async fn portal_and_reconnect(&mut self) -> bool {
        say!(self, "Starting configuration portal '{}'...", self.identity);
        let submitted = self
            .parts
            .portal
            .run_portal(self.identity.as_str(), self.config.connect_timeout_ms)
            .await;

        match submitted {
            Some(credentials) => {
                say!(self, "Portal returned credentials for '{}'", credentials.ssid());
                self.credentials = Some(credentials);
            }
            None => {
                say!(self, "Portal aborted or timed out.");
            }
        }

        let Some(credentials) = self.credentials.clone() else {
            say!(self, "  (no SSID to connect with)");
            return false;
        };

        say!(self, "Connecting to '{}'...", credentials.ssid());
        if let Err(e) = self.parts.wifi.begin_station(&credentials).await {
            say!(self, "Could not start station mode: {}", e);
            return false;
        }

        if self
            .wait_for_link(self.config.connect_timeout_ms, self.config.retry_poll_ms)
            .await
        {
            self.report_connected("Connected with new credentials");
            return true;
        }

        let status = self.parts.wifi.connection_status();
        say!(self, "Connecting with new credentials failed (status={})", status);
        false
    }

    /// Pollt den Link-Status bis verbunden oder Timeout, ein `.` pro Runde
    async fn wait_for_link(&mut self, timeout_ms: u64, poll_ms: u64) -> bool {
        let start = self.parts.clock.now_ms();
        let connected = loop {
            if self.parts.wifi.connection_status().is_connected() {
                break true;
            }
            if self.parts.clock.now_ms().saturating_sub(start) >= timeout_ms {
                break false;
            }
            self.parts.clock.sleep_ms(poll_ms).await;
            let _ = self.parts.console.write_char('.');
        };
        let _ = self.parts.console.write_char('\n');
        connected
    }

    fn report_connected(&mut self, headline: &str) {
        say!(self, "{}", headline);
        if let Some(credentials) = &self.credentials {
            say!(self, "  SSID: {}", credentials.ssid());
        }
        match self.parts.wifi.station_address() {
            Some(ip) => {
                say!(self, "  IP  : {}", ip);
            }
            None => {
                say!(self, "  IP  : (pending)");
            }
        }
    }

    /// Fragt den Bediener mit Timeout; Enter oder Timeout → Default
    async fn ask_yes_no(&mut self, question: &str, default_yes: bool) -> bool {
        let (hint, default_label) = if default_yes {
            ("Y/n", "Yes")
        } else {
            ("y/N", "No")
        };
        say!(
            self,
            "{} ({}) [Enter = {}]  (timeout {}s)",
            question,
            hint,
            default_label,
            self.config.prompt_timeout_ms / 1000
        );

        let start = self.parts.clock.now_ms();
        while self.parts.clock.now_ms().saturating_sub(start) < self.config.prompt_timeout_ms {
            while let Some(byte) = self.parts.console.poll_input() {
                let answer = match byte {
                    b'\r' | b'\n' => default_yes,
                    b'y' | b'Y' => true,
                    b'n' | b'N' => false,
                    _ => continue,
                };
                say!(self, "-> {}", if answer { "Yes" } else { "No" });
                return answer;
            }
            self.parts.clock.sleep_ms(self.config.input_poll_ms).await;
        }

        say!(self, "-> {} (timeout)", default_label);
        default_yes
    }

    /// AP_MODE: Fehler werden nur gemeldet, es gibt keinen weiteren Fallback
    async fn start_access_point(&mut self) {
        match self.parts.wifi.begin_access_point(self.identity.as_str()).await {
            Ok(ip) => {
                say!(self, "Access point active");
                say!(self, "  Name: {}", self.identity);
                say!(self, "  IP  : {}", ip);
                say!(self, "===========================");
            }
            Err(e) => {
                say!(self, "Could not start access point! ({})", e);
            }
        }
    }

    async fn restart(&mut self) {
        say!(self, "No access point wanted, restarting...");
        self.parts.clock.sleep_ms(self.config.restart_delay_ms).await;
        self.parts.system.restart();
    }
}
