// Bediener-Konsole über UART0
//
// Ausgabe: Prompts, Boot-Meldungen und der Session-Log
// Eingabe: einzelne Bytes für die Ja/Nein-Abfragen

use core::fmt;

use esp_hal::Blocking;
use esp_hal::uart::Uart;
use morse_core::OperatorConsole;

/// UART-Konsole mit CRLF-Zeilenenden für serielle Terminals
pub struct UartConsole {
    uart: Uart<'static, Blocking>,
}

impl UartConsole {
    pub fn new(uart: Uart<'static, Blocking>) -> Self {
        Self { uart }
    }

    fn write_bytes(&mut self, mut data: &[u8]) -> fmt::Result {
        while !data.is_empty() {
            let written = self.uart.write(data).map_err(|_| fmt::Error)?;
            data = &data[written..];
        }
        Ok(())
    }
}

impl fmt::Write for UartConsole {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut lines = s.split('\n');
        if let Some(first) = lines.next() {
            self.write_bytes(first.as_bytes())?;
        }
        for line in lines {
            self.write_bytes(b"\r\n")?;
            self.write_bytes(line.as_bytes())?;
        }
        Ok(())
    }
}

impl OperatorConsole for UartConsole {
    fn poll_input(&mut self) -> Option<u8> {
        if !self.uart.read_ready() {
            return None;
        }

        let mut byte = [0u8; 1];
        match self.uart.read(&mut byte) {
            Ok(1) => Some(byte[0]),
            _ => None,
        }
    }
}
