// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types mit DMA-Buffern
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Heap Allocator (WiFi benötigt dynamischen Speicher)
extern crate alloc;

use core::cell::RefCell;
use core::fmt::Write;

// Embassy Async Runtime
use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, Ipv4Cidr, StackResources, StaticConfigV4};
use embassy_time::{Duration, Timer};

// ESP32-C6 HAL
use esp_hal::clock::CpuClock;
use esp_hal::rng::Rng;
use esp_hal::timer::timg::TimerGroup;
use esp_hal::uart::{Config as UartConfig, Uart};
use esp_storage::FlashStorage;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

// Projekt-Module und Konfiguration
use esp_morse_machine::config::{
    AP_ADDRESS, AP_PREFIX_LEN, CONNECTIVITY, CONSOLE_BAUDRATE, DEVICE_PREFIX, EXTRA_HEAP_SIZE,
    MORSE_VERSION, WIFI_HEAP_SIZE,
};
use esp_morse_machine::hal::{
    ChipReset, CredentialStore, EmbassyClock, GpioBank, RadioTransport, UartConsole, WifiMutex,
};
use esp_morse_machine::tasks::{
    Device, HTTP_TASKS, SharedDevice, SubmitSignal, WebPortal, dhcp_server_task,
    http_server_task, net_task,
};
use esp_morse_machine::{
    ConnectivityMachine, ConnectivityParts, ConnectivityState, SessionLog, SignalDriver,
};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
// Ohne diesen schlägt das Flashen mit "ESP-IDF App Descriptor missing" fehl
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Initialisiert Hardware und WiFi, führt den Verbindungs-Automaten bis zu
/// seinem Endzustand aus und startet danach den HTTP-Server.
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // ESP32-C6 Konfiguration: CPU auf maximale Taktfrequenz (160 MHz)
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Heap Allocator initialisieren (WiFi braucht dynamischen Speicher!)
    esp_alloc::heap_allocator!(
        #[esp_hal::ram(reclaimed)]
        size: WIFI_HEAP_SIZE
    );
    esp_alloc::heap_allocator!(size: EXTRA_HEAP_SIZE);

    // Embassy Runtime initialisieren (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    // Bediener-Konsole (UART0, GPIO16 TX / GPIO17 RX)
    let uart = Uart::new(
        peripherals.UART0,
        UartConfig::default().with_baudrate(CONSOLE_BAUDRATE),
    )
    .expect("Failed to initialize UART0")
    .with_tx(peripherals.GPIO16)
    .with_rx(peripherals.GPIO17);
    let mut console = UartConsole::new(uart);

    let _ = writeln!(console);
    let _ = writeln!(console, "=== ESP Morse Machine ===");
    let _ = writeln!(console, "Version: {}", MORSE_VERSION);
    defmt::info!("System: Booting {}", MORSE_VERSION);

    // WiFi Hardware initialisieren
    static RADIO_INIT: static_cell::StaticCell<esp_radio::Controller> =
        static_cell::StaticCell::new();
    let radio_init =
        RADIO_INIT.init(esp_radio::init().expect("Failed to initialize Wi-Fi/BLE controller"));

    let (wifi_controller, wifi_interfaces) =
        esp_radio::wifi::new(radio_init, peripherals.WIFI, Default::default())
            .expect("Failed to initialize Wi-Fi");

    let mac = wifi_interfaces.sta.mac_address();

    // Random seed für TCP/IP Stack (von Hardware RNG)
    let rng = Rng::new();
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;

    // Station-Stack: DHCP-Client
    static STA_RESOURCES: static_cell::StaticCell<StackResources<8>> =
        static_cell::StaticCell::new();
    let (sta_stack, sta_runner) = embassy_net::new(
        wifi_interfaces.sta,
        NetConfig::dhcpv4(Default::default()),
        STA_RESOURCES.init(StackResources::new()),
        seed,
    );

    // AP-Stack: statische Adresse, Clients bekommen ihre per DHCP-Server
    static AP_RESOURCES: static_cell::StaticCell<StackResources<8>> =
        static_cell::StaticCell::new();
    let (ap_stack, ap_runner) = embassy_net::new(
        wifi_interfaces.ap,
        NetConfig::ipv4_static(StaticConfigV4 {
            address: Ipv4Cidr::new(AP_ADDRESS, AP_PREFIX_LEN),
            gateway: Some(AP_ADDRESS),
            dns_servers: Default::default(),
        }),
        AP_RESOURCES.init(StackResources::new()),
        seed.wrapping_add(1),
    );

    spawner.spawn(net_task(sta_runner)).unwrap();
    spawner.spawn(net_task(ap_runner)).unwrap();
    spawner.spawn(dhcp_server_task(ap_stack)).unwrap();

    // WiFi-Controller wird von Transport und Portal geteilt
    static CONTROLLER: static_cell::StaticCell<WifiMutex> = static_cell::StaticCell::new();
    let controller = &*CONTROLLER.init(WifiMutex::new(wifi_controller));

    static SUBMITTED: static_cell::StaticCell<SubmitSignal> = static_cell::StaticCell::new();
    let submitted = &*SUBMITTED.init(SubmitSignal::new());

    let store = CredentialStore::new(FlashStorage::new(peripherals.FLASH));

    // Verbindungs-Automat bis zum Endzustand
    let parts = ConnectivityParts {
        wifi: RadioTransport::new(controller, sta_stack, store, mac),
        portal: WebPortal::new(controller, ap_stack, submitted),
        clock: EmbassyClock,
        console,
        system: ChipReset,
    };
    let mut machine = ConnectivityMachine::new(parts, DEVICE_PREFIX, CONNECTIVITY);
    let state = machine.run().await;
    defmt::info!("System: Connectivity finished in {}", state);

    let ConnectivityParts { mut console, .. } = machine.into_parts();

    if state.serves_http() {
        let (stack, address) = if state == ConnectivityState::Connected {
            let address = sta_stack.config_v4().map(|config| config.address.address());
            (sta_stack, address)
        } else {
            (ap_stack, Some(AP_ADDRESS))
        };

        match address {
            Some(address) => {
                let _ = writeln!(console, "Web server started at http://{}/", address);
                defmt::info!("HTTP: Serving at {}", defmt::Debug2Format(&address));
            }
            None => {
                let _ = writeln!(console, "Web server started");
                defmt::info!("HTTP: Serving, address not yet assigned");
            }
        }

        static DEVICE: static_cell::StaticCell<SharedDevice> = static_cell::StaticCell::new();
        let device = &*DEVICE.init(SharedDevice::new(RefCell::new(Device {
            signal: SignalDriver::new(GpioBank::new()),
            log: SessionLog::new(console),
        })));

        // HTTP Server Tasks (mehrere Instanzen für parallele Requests)
        for task_id in 0..HTTP_TASKS {
            spawner
                .spawn(http_server_task(task_id, stack, device))
                .unwrap();
        }
    }

    // Main-Loop: schläft (alle Arbeit läuft in Tasks)
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}
