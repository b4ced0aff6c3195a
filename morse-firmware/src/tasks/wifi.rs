// WiFi Tasks - Netzwerk-Runner und DHCP-Server für den eigenen Access Point
//
// Verbindungsaufbau und Moduswechsel laufen nicht hier, sondern im
// Verbindungs-Automaten (RadioTransport / WebPortal).

use core::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use defmt::{Debug2Format, info, warn};
use edge_dhcp::io::{self, DEFAULT_SERVER_PORT};
use edge_dhcp::server::{Server, ServerOptions};
use edge_nal::UdpBind;
use edge_nal_embassy::{Udp, UdpBuffers};
use embassy_net::{Runner, Stack};
use embassy_time::{Duration, Timer};
use esp_radio::wifi::WifiDevice;

use crate::config::{
    AP_ADDRESS, DHCP_MAX_LEASES, DHCP_PACKET_BUFFER_SIZE, DHCP_RESTART_DELAY_MS,
    DHCP_UDP_BUFFER_SIZE,
};

/// Network Task
///
/// Prozessiert die Pakete eines Netzwerk-Stacks. Zwei Instanzen:
/// Station (DHCP-Client) und Access Point (statisch).
#[embassy_executor::task(pool_size = 2)]
pub async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) -> ! {
    runner.run().await
}

/// DHCP-Server Task
///
/// Vergibt Adressen im AP-Netz (Portal und AP-Modus). Läuft dauerhaft; ist
/// der Access Point aus, wartet der Socket einfach auf Anfragen.
#[embassy_executor::task]
pub async fn dhcp_server_task(stack: Stack<'static>) {
    info!("DHCP: Server task started on {}", Debug2Format(&AP_ADDRESS));

    // Buffers nur einmal initialisieren
    static UDP_BUFFERS: static_cell::StaticCell<
        UdpBuffers<1, DHCP_UDP_BUFFER_SIZE, DHCP_UDP_BUFFER_SIZE>,
    > = static_cell::StaticCell::new();
    let udp_buffers = UDP_BUFFERS.init_with(UdpBuffers::new);
    let udp_stack = Udp::new(stack, udp_buffers);

    let mut socket = match udp_stack
        .bind(SocketAddr::V4(SocketAddrV4::new(
            Ipv4Addr::UNSPECIFIED,
            DEFAULT_SERVER_PORT,
        )))
        .await
    {
        Ok(socket) => socket,
        Err(e) => {
            warn!("DHCP: Could not bind socket: {}", Debug2Format(&e));
            return;
        }
    };

    let mut packet_buffer = [0u8; DHCP_PACKET_BUFFER_SIZE];
    let mut gateways = [AP_ADDRESS];

    loop {
        let result = io::server::run(
            &mut Server::<_, DHCP_MAX_LEASES>::new_with_et(AP_ADDRESS),
            &ServerOptions::new(AP_ADDRESS, Some(&mut gateways)),
            &mut socket,
            &mut packet_buffer,
        )
        .await;

        if let Err(e) = result {
            warn!("DHCP: Server error: {}", Debug2Format(&e));
        }
        Timer::after(Duration::from_millis(DHCP_RESTART_DELAY_MS)).await;
    }
}
