//! Morse Core - Platform-agnostic Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert nur Traits, Pure Functions und den Verbindungs-Automaten.

#![no_std]

extern crate alloc;

pub mod connectivity;
pub mod handlers;
pub mod identity;
pub mod morse;
pub mod session_log;
pub mod signal;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use connectivity::{ConnectivityConfig, ConnectivityMachine, ConnectivityParts, ConnectivityState};
pub use identity::DeviceIdentity;
pub use morse::{MorseSequence, render, transcode};
pub use session_log::SessionLog;
pub use signal::{SignalDriver, SignalError};
pub use traits::{Clock, ConfigPortal, OperatorConsole, OutputPins, SystemControl, WifiError, WifiTransport};
pub use types::{CredentialsError, LinkStatus, LogMark, MorseSymbol, NetworkCredentials, PinConfig};
