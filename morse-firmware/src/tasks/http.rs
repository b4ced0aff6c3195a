// HTTP Server Task - Web-Oberfläche und Morse-API
use core::cell::RefCell;

use defmt::info;
use embassy_net::Stack;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_time::Duration;
use morse_core::handlers::{asset_reply, gpio_reply, morse_reply, serial_reply, version_reply};
use morse_core::{SessionLog, SignalDriver};
use picoserve::extract::Query;
use picoserve::routing::get;

use crate::config::*;
use crate::hal::{GpioBank, UartConsole};
use crate::web::protocol::{GpioQuery, MorseQuery, SerialQuery};
use crate::web::{EmbeddedAssets, HttpReply};

/// Zustand, den alle Requests teilen: Signal-Pin und Session-Log
pub struct Device {
    pub signal: SignalDriver<GpioBank>,
    pub log: SessionLog<UartConsole>,
}

/// Gerätezustand für alle Server-Instanzen
///
/// Die Handler laufen synchron auf einem Executor, jeder Request wird
/// unter dem Lock vollständig angewendet.
pub type SharedDevice = Mutex<NoopRawMutex, RefCell<Device>>;

/// Anzahl paralleler Server-Instanzen (je ein Socket)
///
/// Der Browser schickt Pin- und Log-Request gleichzeitig, ohne freien
/// Socket würde die zweite Verbindung mit RST abgewiesen.
pub const HTTP_TASKS: usize = 4;

/// Server-Konfiguration (auch vom Portal genutzt)
///
/// Ohne keep-alive: eine offen gehaltene Verbindung würde einen Socket
/// belegen, den Portal-Server gibt es nur einmal.
pub fn server_config() -> picoserve::Config<Duration> {
    picoserve::Config::new(picoserve::Timeouts {
        start_read_request: Some(Duration::from_secs(5)),
        read_request: Some(Duration::from_secs(1)),
        write: Some(Duration::from_secs(1)),
        persistent_start_read_request: Some(Duration::from_secs(1)),
    })
}

/// HTTP Server Task
///
/// Routen:
/// - `/`, `/style.css`, `/script.js`: eingebettete Web-Oberfläche
/// - `/morse?text=`: Text → Morse-Sequenz
/// - `/gpio?gpio=&inv=&state=`: Signal-Pin setzen
/// - `/serial?start=|symbol=|end=`: Session-Log auf der Konsole
/// - `/version`: Firmware-Version
///
/// **Task Pool:** wird [`HTTP_TASKS`]-mal gespawnt, `task_id` läuft von 0
/// bis `HTTP_TASKS - 1`.
#[embassy_executor::task(pool_size = HTTP_TASKS)]
pub async fn http_server_task(
    task_id: usize,
    stack: Stack<'static>,
    device: &'static SharedDevice,
) {
    info!("HTTP: Server task {} starting on port {}...", task_id, HTTP_PORT);

    let app = picoserve::Router::new()
        .route("/", get(|| async { HttpReply(asset_reply(&EmbeddedAssets, "/")) }))
        .route(
            "/style.css",
            get(|| async { HttpReply(asset_reply(&EmbeddedAssets, "/style.css")) }),
        )
        .route(
            "/script.js",
            get(|| async { HttpReply(asset_reply(&EmbeddedAssets, "/script.js")) }),
        )
        .route("/version", get(|| async { HttpReply(version_reply(MORSE_VERSION)) }))
        .route(
            "/morse",
            get(|Query(query): Query<MorseQuery>| async move {
                HttpReply(morse_reply(query.text.as_deref()))
            }),
        )
        .route(
            "/gpio",
            get(move |Query(query): Query<GpioQuery>| async move {
                let params = query.params();
                let reply = device.lock(|d| gpio_reply(&mut d.borrow_mut().signal, params));
                if reply.status != 200 {
                    info!("HTTP: /gpio rejected pin {}", params.pin);
                }
                HttpReply(reply)
            }),
        )
        .route(
            "/serial",
            get(move |Query(query): Query<SerialQuery>| async move {
                let params = query.params();
                HttpReply(device.lock(|d| serial_reply(&mut d.borrow_mut().log, params)))
            }),
        );

    let config = server_config();

    // HTTP-Buffer für Requests/Responses
    let mut http_buffer = [0u8; HTTP_BUFFER_SIZE];

    // TCP-Buffers für Socket
    let mut rx_buffer = [0u8; TCP_RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TCP_TX_BUFFER_SIZE];

    let server = picoserve::Server::new(&app, &config, &mut http_buffer);

    let _ = server
        .listen_and_serve(task_id, stack, HTTP_PORT, &mut rx_buffer, &mut tx_buffer)
        .await;

    info!("HTTP: Server task {} ended", task_id);
}
