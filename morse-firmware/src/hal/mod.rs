// Hardware Abstraction Layer (HAL) Module
//
// Implementiert die Traits aus morse-core für die echte Hardware.
// Die Logik selbst (und ihre Tests) liegt in morse-core / morse-tests.

pub mod console;
pub mod gpio;
pub mod radio;
pub mod storage;
pub mod system;

pub use console::UartConsole;
pub use gpio::GpioBank;
pub use radio::{RadioTransport, WifiMutex};
pub use storage::{CredentialStore, StoreError};
pub use system::{ChipReset, EmbassyClock};
