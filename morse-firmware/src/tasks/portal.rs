// Konfigurations-Portal - Zugangsdaten über den eigenen Access Point
//
// Ablauf:
// 1. Radio auf AP+STA, AP-Name = Gerätename (offen, 192.168.4.1)
// 2. picoserve auf dem AP-Stack: Formular auf "/", Absenden über "/save"
// 3. Gültige Eingabe → Some(Zugangsdaten); Timeout → None

use core::pin::pin;

use defmt::{info, warn};
use embassy_futures::select::{Either, select};
use embassy_net::Stack;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, with_timeout};
use esp_radio::wifi::{ClientConfig, ModeConfig};
use morse_core::handlers::{Reply, TEXT_HTML};
use morse_core::{ConfigPortal, NetworkCredentials};
use picoserve::extract::Query;
use picoserve::routing::get;

use crate::config::{HTTP_BUFFER_SIZE, HTTP_PORT, PORTAL_LINGER_MS, TCP_RX_BUFFER_SIZE, TCP_TX_BUFFER_SIZE};
use crate::hal::WifiMutex;
use crate::hal::radio::{access_point_config, apply_mode};
use crate::tasks::http::server_config;
use crate::web::protocol::SaveQuery;
use crate::web::{HttpReply, PORTAL_HTML};

/// Übergabe der Formular-Daten vom Handler an `run_portal`
pub type SubmitSignal = Signal<NoopRawMutex, NetworkCredentials>;

/// picoserve-Portal auf dem AP-Stack
pub struct WebPortal {
    controller: &'static WifiMutex,
    ap: Stack<'static>,
    submitted: &'static SubmitSignal,
}

impl WebPortal {
    pub fn new(controller: &'static WifiMutex, ap: Stack<'static>, submitted: &'static SubmitSignal) -> Self {
        Self {
            controller,
            ap,
            submitted,
        }
    }
}

/// `GET /save?ssid=..&password=..`
fn save_reply(submitted: &SubmitSignal, query: &SaveQuery) -> Reply {
    let ssid = query.ssid.as_deref().unwrap_or("").trim();
    if ssid.is_empty() {
        return Reply::bad_request("SSID missing");
    }

    match NetworkCredentials::new(ssid, query.password.as_deref().unwrap_or("")) {
        Ok(credentials) => {
            info!("Portal: Received credentials for '{}'", credentials.ssid());
            submitted.signal(credentials);
            Reply::ok("Saved. The device now connects to the network.")
        }
        Err(e) => {
            warn!("Portal: Rejected submission: {}", e);
            Reply::bad_request("SSID or password too long")
        }
    }
}

impl ConfigPortal for WebPortal {
    async fn run_portal(&mut self, ap_name: &str, timeout_ms: u64) -> Option<NetworkCredentials> {
        info!("Portal: Opening '{}' for {} ms", ap_name, timeout_ms);

        {
            let mode = ModeConfig::ApSta(ClientConfig::default(), access_point_config(ap_name));
            let mut controller = self.controller.lock().await;
            if let Err(e) = apply_mode(&mut controller, &mode).await {
                warn!("Portal: Could not open access point: {}", e);
                return None;
            }
        }

        self.submitted.reset();
        let submitted = self.submitted;

        let app = picoserve::Router::new()
            .route(
                "/",
                get(|| async {
                    HttpReply(Reply {
                        status: 200,
                        content_type: TEXT_HTML,
                        body: PORTAL_HTML.into(),
                    })
                }),
            )
            .route(
                "/save",
                get(move |Query(query): Query<SaveQuery>| async move {
                    HttpReply(save_reply(submitted, &query))
                }),
            );

        let config = server_config();
        let mut http_buffer = [0u8; HTTP_BUFFER_SIZE];
        let mut rx_buffer = [0u8; TCP_RX_BUFFER_SIZE];
        let mut tx_buffer = [0u8; TCP_TX_BUFFER_SIZE];

        let mut serve = pin!(async {
            let server = picoserve::Server::new(&app, &config, &mut http_buffer);
            let _ = server
                .listen_and_serve(0, self.ap, HTTP_PORT, &mut rx_buffer, &mut tx_buffer)
                .await;
        });

        let outcome = select(
            serve.as_mut(),
            with_timeout(Duration::from_millis(timeout_ms), submitted.wait()),
        )
        .await;

        match outcome {
            Either::Second(Ok(credentials)) => {
                // Antwort auf /save noch ausliefern lassen
                let _ = with_timeout(Duration::from_millis(PORTAL_LINGER_MS), serve).await;
                info!("Portal: Closed with new credentials");
                Some(credentials)
            }
            Either::Second(Err(_)) => {
                info!("Portal: Timed out");
                None
            }
            Either::First(()) => {
                warn!("Portal: Server stopped unexpectedly");
                None
            }
        }
    }
}
