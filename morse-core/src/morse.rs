//! Morse-Transcoder
//!
//! Pure Functions ohne Hardware-Dependencies (testbar!)

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::types::MorseSymbol;

/// Morse-Tabelle: Buchstaben A–Z und Ziffern 0–9
///
/// Index-basierter Lookup statt Map, damit die Tabelle im Flash liegt.
const LETTERS: [&str; 26] = [
    ".-", "-...", "-.-.", "-..", ".", "..-.", "--.", "....", "..", ".---", "-.-", ".-..", "--",
    "-.", "---", ".--.", "--.-", ".-.", "...", "-", "..-", "...-", ".--", "-..-", "-.--", "--..",
];

const DIGITS: [&str; 10] = [
    "-----", ".----", "..---", "...--", "....-", ".....", "-....", "--...", "---..", "----.",
];

/// Liefert das Punkt/Strich-Muster für ein (bereits großgeschriebenes) Zeichen
fn pattern_for(c: char) -> Option<&'static str> {
    match c {
        'A'..='Z' => Some(LETTERS[(c as u8 - b'A') as usize]),
        '0'..='9' => Some(DIGITS[(c as u8 - b'0') as usize]),
        _ => None,
    }
}

/// Unveränderliche Folge von Morse-Symbolen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MorseSequence {
    symbols: Vec<MorseSymbol>,
}

impl MorseSequence {
    pub fn as_slice(&self) -> &[MorseSymbol] {
        &self.symbols
    }

    pub fn iter(&self) -> core::slice::Iter<'_, MorseSymbol> {
        self.symbols.iter()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl<'a> IntoIterator for &'a MorseSequence {
    type Item = &'a MorseSymbol;
    type IntoIter = core::slice::Iter<'a, MorseSymbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.symbols.iter()
    }
}

/// Darstellung wie sie der Browser erwartet (siehe [`render`])
impl fmt::Display for MorseSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in &self.symbols {
            f.write_str(match symbol {
                MorseSymbol::Dot => ".",
                MorseSymbol::Dash => "-",
                MorseSymbol::LetterGap => "  ",
                MorseSymbol::WordGap => "    ",
            })?;
        }
        Ok(())
    }
}

/// Übersetzt Text in eine Morse-Sequenz
///
/// - Groß-/Kleinschreibung egal
/// - Leerzeichen → `WordGap`
/// - Zeichen ohne Tabelleneintrag werden stillschweigend verworfen
///
/// # Beispiele
///
/// ```
/// # use morse_core::{transcode, MorseSymbol};
/// let seq = transcode("e");
/// assert_eq!(seq.as_slice(), &[MorseSymbol::Dot, MorseSymbol::LetterGap]);
/// ```
pub fn transcode(text: &str) -> MorseSequence {
    let mut symbols = Vec::with_capacity(text.len() * 5);

    for c in text.chars() {
        if c == ' ' {
            symbols.push(MorseSymbol::WordGap);
            continue;
        }

        if let Some(pattern) = pattern_for(c.to_ascii_uppercase()) {
            symbols.extend(pattern.bytes().map(|b| match b {
                b'.' => MorseSymbol::Dot,
                _ => MorseSymbol::Dash,
            }));
            symbols.push(MorseSymbol::LetterGap);
        }
    }

    MorseSequence { symbols }
}

/// Rendert eine Sequenz als Text: `.`/`-`, zwei Leerzeichen nach jedem
/// Buchstaben, vier zwischen Wörtern
///
/// ```
/// # use morse_core::{render, transcode};
/// assert_eq!(render(&transcode("SOS")), "...  ---  ...  ");
/// ```
pub fn render(sequence: &MorseSequence) -> String {
    use alloc::string::ToString;
    sequence.to_string()
}
