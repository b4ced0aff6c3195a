// Zeit und Neustart für den Verbindungs-Automaten

use embassy_time::{Duration, Instant, Timer};
use morse_core::{Clock, SystemControl};

/// Uhr auf Basis von embassy-time
///
/// `sleep_ms` gibt den Executor frei, damit die Netzwerk-Runner weiterlaufen.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }

    async fn sleep_ms(&mut self, ms: u64) {
        Timer::after(Duration::from_millis(ms)).await;
    }
}

/// Software-Reset des Chips
#[derive(Debug, Clone, Copy, Default)]
pub struct ChipReset;

impl SystemControl for ChipReset {
    fn restart(&mut self) {
        defmt::warn!("System: Software reset");
        esp_hal::system::software_reset()
    }
}
