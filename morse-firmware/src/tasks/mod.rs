// Task-Modul: Embassy Tasks und das Konfigurations-Portal
//
// Der Verbindungs-Automat läuft direkt in main(); danach übernehmen die
// Tasks (Netzwerk-Runner, DHCP im AP-Netz, HTTP-Server).

pub mod http;
pub mod portal;
pub mod wifi;

// Re-export für einfachen Import
pub use http::{Device, HTTP_TASKS, SharedDevice, http_server_task};
pub use portal::{SubmitSignal, WebPortal};
pub use wifi::{dhcp_server_task, net_task};
