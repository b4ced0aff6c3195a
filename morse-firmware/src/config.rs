// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen

use core::net::Ipv4Addr;

use morse_core::ConnectivityConfig;

// ============================================================================
// Build-Zeit Parameter (aus .env, siehe build.rs)
// ============================================================================

/// Parst eine Dezimalzahl zur Compile-Zeit, sonst `default`
const fn parse_secs(value: Option<&str>, default: u64) -> u64 {
    let Some(value) = value else {
        return default;
    };
    let bytes = value.as_bytes();
    if bytes.is_empty() {
        return default;
    }

    let mut result = 0u64;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if !b.is_ascii_digit() {
            return default;
        }
        result = result * 10 + (b - b'0') as u64;
        i += 1;
    }
    result
}

/// Verbindungs-Timeout in Sekunden (WIFI_TIMEOUT, Default 20)
pub const WIFI_TIMEOUT_SECS: u64 = parse_secs(option_env!("WIFI_TIMEOUT"), 20);

/// Versions-String für `GET /version`
pub const MORSE_VERSION: &str = match option_env!("MORSE_VERSION") {
    Some(version) => version,
    None => concat!("v", env!("CARGO_PKG_VERSION")),
};

/// Werks-Zugangsdaten, genutzt solange im Flash nichts gespeichert ist
pub const FACTORY_SSID: Option<&str> = option_env!("WIFI_SSID");
pub const FACTORY_PASSWORD: Option<&str> = option_env!("WIFI_PASSWORD");

// ============================================================================
// Verbindungs-Automat
// ============================================================================

/// Präfix des Gerätenamens (AP-Name und Portal)
pub const DEVICE_PREFIX: &str = "espMorseMachine";

/// Wartezeit auf eine Bediener-Antwort in Sekunden
pub const PROMPT_TIMEOUT_SECS: u64 = 20;

pub const CONNECTIVITY: ConnectivityConfig = ConnectivityConfig {
    connect_timeout_ms: WIFI_TIMEOUT_SECS * 1000,
    prompt_timeout_ms: PROMPT_TIMEOUT_SECS * 1000,
    saved_poll_ms: 500,
    retry_poll_ms: 250,
    input_poll_ms: 10,
    restart_delay_ms: 200,
};

// ============================================================================
// Konsole (UART0)
// ============================================================================

/// Baudrate der Bediener-Konsole
pub const CONSOLE_BAUDRATE: u32 = 115_200;

// ============================================================================
// GPIO Konfiguration
// ============================================================================

/// Anzahl der GPIOs auf dem ESP32-C6 (GPIO0..=GPIO30)
pub const GPIO_COUNT: usize = 31;

/// GPIOs, die nicht als Signal-Ausgang freigegeben werden
/// - 12/13: USB-Serial-JTAG (defmt-Ausgabe)
/// - 16/17: UART0 (Bediener-Konsole)
/// - 24..=30: SPI-Flash
pub const GPIO_RESERVED: [u8; 11] = [12, 13, 16, 17, 24, 25, 26, 27, 28, 29, 30];

// ============================================================================
// WiFi Konfiguration
// ============================================================================

/// Heap-Größe für WiFi (Bytes)
/// WiFi benötigt dynamischen Speicher für Pakete
pub const WIFI_HEAP_SIZE: usize = 65536; // 64 KB

/// Zusätzliche Heap-Größe (Bytes)
pub const EXTRA_HEAP_SIZE: usize = 36864; // 36 KB

/// So lange wartet `begin_station` auf die Assoziation, danach wird nur noch gepollt
pub const STATION_ASSOCIATE_MS: u64 = 1000;

/// Statische Adresse des eigenen Access Points
pub const AP_ADDRESS: Ipv4Addr = Ipv4Addr::new(192, 168, 4, 1);

/// Präfix-Länge des AP-Netzes (/24)
pub const AP_PREFIX_LEN: u8 = 24;

/// Maximale Anzahl DHCP-Leases im AP-Netz
pub const DHCP_MAX_LEASES: usize = 8;

/// DHCP Packet Buffer-Größe in Bytes (Standard MTU)
pub const DHCP_PACKET_BUFFER_SIZE: usize = 1500;

/// UDP Buffer-Größen für DHCP (TX, RX in Bytes)
pub const DHCP_UDP_BUFFER_SIZE: usize = 1024;

/// DHCP Restart Delay in Millisekunden
pub const DHCP_RESTART_DELAY_MS: u64 = 500;

// ============================================================================
// Credential Store
// ============================================================================

/// Flash-Offset des Zugangsdaten-Eintrags (NVS-Partition der Standard-Tabelle)
pub const CREDENTIALS_FLASH_OFFSET: u32 = 0x9000;

/// Kennung eines gültigen Eintrags ("MRSE")
pub const CREDENTIALS_MAGIC: u32 = 0x4D52_5345;

/// Größe des Eintrags: Magic (4) + Länge (2) + JSON
pub const CREDENTIALS_RECORD_SIZE: usize = 256;

// ============================================================================
// HTTP Server Konfiguration
// ============================================================================

/// HTTP Port für API, Web-Oberfläche und Portal
pub const HTTP_PORT: u16 = 80;

/// HTTP Buffer-Größe in Bytes
/// Für HTTP Request/Response Headers und Body
pub const HTTP_BUFFER_SIZE: usize = 2048;

/// TCP RX Buffer-Größe in Bytes
/// Für eingehende TCP-Daten vom Client
pub const TCP_RX_BUFFER_SIZE: usize = 1024;

/// TCP TX Buffer-Größe in Bytes
/// Für ausgehende TCP-Daten zum Client
pub const TCP_TX_BUFFER_SIZE: usize = 1024;

/// Nachlaufzeit des Portals nach dem Speichern, damit die Antwort noch rausgeht
pub const PORTAL_LINGER_MS: u64 = 1000;

