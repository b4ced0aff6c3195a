// WLAN-Transport für den Verbindungs-Automaten
//
// Station: esp-radio Client-Modus + DHCP-Client auf dem STA-Stack
// Access Point: offener AP, Adresse statisch (siehe AP_ADDRESS)

use core::net::Ipv4Addr;

use defmt::{Debug2Format, info, warn};
use embassy_net::Stack;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Duration, with_timeout};
use esp_radio::wifi::{AccessPointConfig, AuthMethod, ClientConfig, ModeConfig, WifiController};
use morse_core::{LinkStatus, NetworkCredentials, WifiError, WifiTransport};

use crate::config::{AP_ADDRESS, FACTORY_PASSWORD, FACTORY_SSID, STATION_ASSOCIATE_MS};
use crate::hal::CredentialStore;

/// Gemeinsamer Zugriff auf den WiFi-Controller (Transport und Portal)
pub type WifiMutex = Mutex<NoopRawMutex, WifiController<'static>>;

/// Stoppt den Controller (falls aktiv), setzt den Modus und startet neu
pub async fn apply_mode(
    controller: &mut WifiController<'static>,
    mode: &ModeConfig,
) -> Result<(), WifiError> {
    if matches!(controller.is_started(), Ok(true)) {
        if let Err(e) = controller.stop_async().await {
            warn!("WiFi: Stop before reconfigure failed: {}", Debug2Format(&e));
        }
    }

    controller.set_config(mode).map_err(|e| {
        warn!("WiFi: Failed to set configuration: {}", Debug2Format(&e));
        WifiError::ConfigRejected
    })?;

    controller.start_async().await.map_err(|e| {
        warn!("WiFi: Failed to start: {}", Debug2Format(&e));
        WifiError::StartFailed
    })
}

/// Offener Access Point mit dem Gerätenamen als SSID
pub fn access_point_config(name: &str) -> AccessPointConfig {
    AccessPointConfig::default()
        .with_ssid(name.into())
        .with_auth_method(AuthMethod::None)
}

/// esp-radio Implementierung von [`WifiTransport`]
pub struct RadioTransport {
    controller: &'static WifiMutex,
    sta: Stack<'static>,
    store: CredentialStore,
    mac: [u8; 6],
    /// Zugangsdaten des laufenden Versuchs, werden nach Erfolg gespeichert
    pending: Option<NetworkCredentials>,
    connect_failed: bool,
}

impl RadioTransport {
    pub fn new(
        controller: &'static WifiMutex,
        sta: Stack<'static>,
        store: CredentialStore,
        mac: [u8; 6],
    ) -> Self {
        Self {
            controller,
            sta,
            store,
            mac,
            pending: None,
            connect_failed: false,
        }
    }

    fn factory_credentials() -> Option<NetworkCredentials> {
        let ssid = FACTORY_SSID?;
        match NetworkCredentials::new(ssid, FACTORY_PASSWORD.unwrap_or("")) {
            Ok(credentials) => Some(credentials),
            Err(e) => {
                warn!("WiFi: Invalid factory credentials: {}", e);
                None
            }
        }
    }

    fn persist_pending(&mut self) {
        if let Some(credentials) = self.pending.take() {
            if self.store.load_or_none().as_ref() != Some(&credentials) {
                if let Err(e) = self.store.save(&credentials) {
                    warn!("Store: Could not save credentials: {}", e);
                }
            }
        }
    }
}

impl WifiTransport for RadioTransport {
    fn stored_credentials(&mut self) -> Option<NetworkCredentials> {
        let stored = self.store.load_or_none().or_else(Self::factory_credentials);
        match &stored {
            Some(credentials) => info!("WiFi: Stored SSID '{}'", credentials.ssid()),
            None => info!("WiFi: No stored credentials"),
        }
        stored
    }

    async fn begin_station(&mut self, credentials: &NetworkCredentials) -> Result<(), WifiError> {
        info!("WiFi: Connecting to '{}'...", credentials.ssid());
        let mode = ModeConfig::Client(
            ClientConfig::default()
                .with_ssid(credentials.ssid().into())
                .with_password(credentials.psk().into()),
        );

        let mut controller = self.controller.lock().await;
        apply_mode(&mut controller, &mode).await?;

        self.pending = Some(credentials.clone());
        self.connect_failed = false;

        // Nur kurz auf die Assoziation warten, den Rest pollt der Automat
        match with_timeout(
            Duration::from_millis(STATION_ASSOCIATE_MS),
            controller.connect_async(),
        )
        .await
        {
            Ok(Ok(())) => info!("WiFi: Associated with '{}'", credentials.ssid()),
            Ok(Err(e)) => {
                warn!("WiFi: Connection failed: {}", Debug2Format(&e));
                self.connect_failed = true;
            }
            Err(_) => warn!("WiFi: Association still pending"),
        }
        Ok(())
    }

    async fn begin_access_point(&mut self, name: &str) -> Result<Ipv4Addr, WifiError> {
        info!("WiFi: Starting access point '{}'", name);
        let mode = ModeConfig::AccessPoint(access_point_config(name));

        let mut controller = self.controller.lock().await;
        apply_mode(&mut controller, &mode)
            .await
            .map_err(|_| WifiError::AccessPointFailed)?;

        info!("WiFi: Access point up at {}", Debug2Format(&AP_ADDRESS));
        Ok(AP_ADDRESS)
    }

    fn connection_status(&mut self) -> LinkStatus {
        let associated = match self.controller.try_lock() {
            Ok(controller) => matches!(controller.is_connected(), Ok(true)),
            Err(_) => return LinkStatus::Connecting,
        };

        if associated && self.sta.config_v4().is_some() {
            self.persist_pending();
            LinkStatus::Connected
        } else if associated {
            LinkStatus::Connecting
        } else if self.connect_failed {
            LinkStatus::Failed
        } else if self.pending.is_some() {
            LinkStatus::Connecting
        } else {
            LinkStatus::Idle
        }
    }

    fn station_address(&self) -> Option<Ipv4Addr> {
        self.sta.config_v4().map(|config| config.address.address())
    }

    fn mac_address(&self) -> [u8; 6] {
        self.mac
    }
}
