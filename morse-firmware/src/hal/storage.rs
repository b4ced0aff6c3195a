// Credential Store - WLAN-Zugangsdaten im Flash
//
// Ein einzelner Eintrag an CREDENTIALS_FLASH_OFFSET:
//
//   [magic: u32 LE][len: u16 LE][JSON (serde-json-core), len Bytes]
//
// Ein fehlender oder kaputter Eintrag gilt als "keine Zugangsdaten".

use core::fmt;

use defmt::{info, warn};
use embedded_storage::{ReadStorage, Storage};
use esp_storage::FlashStorage;
use morse_core::NetworkCredentials;

use crate::config::{CREDENTIALS_FLASH_OFFSET, CREDENTIALS_MAGIC, CREDENTIALS_RECORD_SIZE};

const HEADER_LEN: usize = 6;

/// Fehler-Typ für Flash-Zugriffe
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum StoreError {
    /// Lesen oder Schreiben des Flash fehlgeschlagen
    Flash,
    /// Zugangsdaten passen nicht in den Eintrag
    Encode,
    /// Eintrag vorhanden, aber nicht lesbar
    Decode,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Flash => "flash access failed",
            Self::Encode => "credentials too large for record",
            Self::Decode => "stored record is corrupt",
        })
    }
}

/// Persistente Zugangsdaten
pub struct CredentialStore {
    flash: FlashStorage<'static>,
}

impl CredentialStore {
    pub fn new(flash: FlashStorage<'static>) -> Self {
        Self { flash }
    }

    /// Liest den Eintrag; `Ok(None)` wenn nie etwas gespeichert wurde
    pub fn load(&mut self) -> Result<Option<NetworkCredentials>, StoreError> {
        let mut record = [0u8; CREDENTIALS_RECORD_SIZE];
        self.flash
            .read(CREDENTIALS_FLASH_OFFSET, &mut record)
            .map_err(|_| StoreError::Flash)?;

        let magic = u32::from_le_bytes([record[0], record[1], record[2], record[3]]);
        if magic != CREDENTIALS_MAGIC {
            return Ok(None);
        }

        let len = u16::from_le_bytes([record[4], record[5]]) as usize;
        let json = record
            .get(HEADER_LEN..HEADER_LEN + len)
            .ok_or(StoreError::Decode)?;
        let (decoded, _) = serde_json_core::from_slice::<NetworkCredentials>(json)
            .map_err(|_| StoreError::Decode)?;

        // Längenprüfung erneut durchlaufen, der Flash-Inhalt ist nicht vertrauenswürdig
        NetworkCredentials::new(decoded.ssid(), decoded.psk())
            .map(Some)
            .map_err(|_| StoreError::Decode)
    }

    /// Schreibt den Eintrag (überschreibt den vorherigen)
    pub fn save(&mut self, credentials: &NetworkCredentials) -> Result<(), StoreError> {
        let mut record = [0xFFu8; CREDENTIALS_RECORD_SIZE];
        let len = serde_json_core::to_slice(credentials, &mut record[HEADER_LEN..])
            .map_err(|_| StoreError::Encode)?;

        record[..4].copy_from_slice(&CREDENTIALS_MAGIC.to_le_bytes());
        record[4..HEADER_LEN].copy_from_slice(&(len as u16).to_le_bytes());

        self.flash
            .write(CREDENTIALS_FLASH_OFFSET, &record)
            .map_err(|_| StoreError::Flash)?;

        info!("Store: Saved credentials for '{}'", credentials.ssid());
        Ok(())
    }

    /// Wie [`load`](Self::load), Fehler werden geloggt und als "leer" behandelt
    pub fn load_or_none(&mut self) -> Option<NetworkCredentials> {
        match self.load() {
            Ok(credentials) => credentials,
            Err(e) => {
                warn!("Store: Ignoring stored credentials: {}", e);
                None
            }
        }
    }
}
