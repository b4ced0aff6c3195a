//! Session Log Sink
//!
//! Menschenlesbarer Trace der Wiedergabe auf der seriellen Konsole.
//! Das Timing bestimmt der Aufrufer (Browser), hier wird nur geschrieben.

use core::fmt::Write;

use crate::types::LogMark;

/// Append-only Log, eine Zeile pro `begin`/`end` Paar
///
/// Schreibfehler der Ausgabe werden ignoriert; die Konsole gilt auf dieser
/// Ebene als unfehlbar.
pub struct SessionLog<W: Write> {
    out: W,
    line_open: bool,
}

impl<W: Write> SessionLog<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            line_open: false,
        }
    }

    /// Session-Start mit dem Originaltext
    pub fn begin(&mut self, label: &str) {
        if self.line_open {
            let _ = self.out.write_char('\n');
            self.line_open = false;
        }
        let _ = writeln!(self.out, "Text: {}", label);
    }

    /// Genau ein Zeichen an die offene Zeile anhängen
    pub fn mark(&mut self, mark: LogMark) {
        let _ = self.out.write_char(mark.as_char());
        self.line_open = true;
    }

    /// Schließt die aktuelle Zeile; weitere Aufrufe sind wirkungslos
    pub fn end(&mut self) {
        if self.line_open {
            let _ = self.out.write_char('\n');
            self.line_open = false;
        }
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
