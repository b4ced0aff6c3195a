//! HTTP-Handler ohne Framework
//!
//! Jede Route ist eine reine Funktion, die eine [`Reply`] liefert. Die
//! Firmware übersetzt nur noch Query-Parameter hinein und die Reply hinaus.

use alloc::borrow::Cow;
use alloc::format;

use crate::morse::{render, transcode};
use crate::session_log::SessionLog;
use crate::signal::SignalDriver;
use crate::traits::OutputPins;
use crate::types::LogMark;

pub const TEXT_PLAIN: &str = "text/plain";
pub const TEXT_HTML: &str = "text/html";
pub const TEXT_CSS: &str = "text/css";
pub const APPLICATION_JAVASCRIPT: &str = "application/javascript";

/// Antwort eines Handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Cow<'static, str>,
}

impl Reply {
    pub fn ok(body: impl Into<Cow<'static, str>>) -> Self {
        Self {
            status: 200,
            content_type: TEXT_PLAIN,
            body: body.into(),
        }
    }

    pub fn bad_request(body: &'static str) -> Self {
        Self {
            status: 400,
            content_type: TEXT_PLAIN,
            body: Cow::Borrowed(body),
        }
    }

    pub fn not_found(body: impl Into<Cow<'static, str>>) -> Self {
        Self {
            status: 404,
            content_type: TEXT_PLAIN,
            body: body.into(),
        }
    }
}

// ============================================================================
// /morse
// ============================================================================

/// `GET /morse?text=...` → gerenderte Sequenz als Text
///
/// Fehlender Parameter entspricht leerem Text.
pub fn morse_reply(text: Option<&str>) -> Reply {
    let sequence = transcode(text.unwrap_or("").trim());
    Reply::ok(render(&sequence))
}

// ============================================================================
// /gpio
// ============================================================================

/// Geparste Parameter von `/gpio`
///
/// `None` heißt "Parameter fehlt" und lässt den bisherigen Wert stehen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GpioParams {
    pub pin: Option<i32>,
    pub inverted: Option<bool>,
    pub state: bool,
}

impl GpioParams {
    /// Parst die rohen Query-Werte
    ///
    /// - `gpio`: Dezimalzahl, sonst wie nicht angegeben
    /// - `inv`: `1`, `true` oder `True` → invertiert, alles andere nicht
    /// - `state`: Zahl ≠ 0 → an; fehlend oder nicht numerisch → aus
    pub fn parse(gpio: Option<&str>, inv: Option<&str>, state: Option<&str>) -> Self {
        Self {
            pin: gpio.and_then(|s| s.trim().parse().ok()),
            inverted: inv.map(|s| matches!(s, "1" | "true" | "True")),
            state: state
                .and_then(|s| s.trim().parse::<i32>().ok())
                .is_some_and(|v| v != 0),
        }
    }
}

/// `GET /gpio?gpio=..&inv=..&state=..`
///
/// Pin und Polarität werden bei jedem Request neu gesetzt (fehlende Werte
/// bleiben erhalten), danach wird der logische Zustand geschrieben.
pub fn gpio_reply<P: OutputPins>(driver: &mut SignalDriver<P>, params: GpioParams) -> Reply {
    let current = driver.config();

    let pin = match params.pin {
        Some(raw) => match u8::try_from(raw) {
            Ok(pin) => pin,
            Err(_) => return Reply::bad_request("Invalid GPIO"),
        },
        None => current.pin_number,
    };
    let inverted = params.inverted.unwrap_or(current.inverted);

    if driver.configure(pin, inverted).is_err() {
        return Reply::bad_request("Invalid GPIO");
    }
    driver.set(params.state);
    Reply::ok("OK")
}

// ============================================================================
// /serial
// ============================================================================

/// Parameter von `/serial`; genau einer wird ausgewertet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SerialParams<'a> {
    pub start: Option<&'a str>,
    pub symbol: Option<&'a str>,
    pub end: Option<&'a str>,
}

/// `GET /serial?start=<text>` | `?symbol=<.|-|SPACE|WORD>` | `?end=1`
///
/// Vorrang: `start` vor `symbol` vor `end`. Unbekannte Symbole werden
/// ignoriert, ohne Parameter gibt es 400.
pub fn serial_reply<W: core::fmt::Write>(log: &mut SessionLog<W>, params: SerialParams<'_>) -> Reply {
    if let Some(label) = params.start {
        log.begin(label);
    } else if let Some(token) = params.symbol {
        if let Some(mark) = LogMark::from_token(token) {
            log.mark(mark);
        }
    } else if params.end.is_some() {
        log.end();
    } else {
        return Reply::bad_request("Bad Request");
    }
    Reply::ok("OK")
}

// ============================================================================
// /version
// ============================================================================

pub fn version_reply(version: &'static str) -> Reply {
    Reply::ok(version)
}

// ============================================================================
// Statische Dateien
// ============================================================================

/// Quelle für die statischen Web-Dateien
pub trait AssetStore {
    /// Inhalt einer Datei (`index.html`, `style.css`, `script.js`)
    fn load(&self, name: &str) -> Option<&'static str>;
}

impl<T: AssetStore + ?Sized> AssetStore for &T {
    fn load(&self, name: &str) -> Option<&'static str> {
        (**self).load(name)
    }
}

/// Bekannte Asset-Routen: (Pfad, Dateiname, Content-Type)
const ASSET_ROUTES: [(&str, &str, &str); 3] = [
    ("/", "index.html", TEXT_HTML),
    ("/style.css", "style.css", TEXT_CSS),
    ("/script.js", "script.js", APPLICATION_JAVASCRIPT),
];

/// Liefert eine statische Datei
///
/// Fehlt die Startseite, gibt es trotzdem 200 mit einem Hinweis, damit die
/// API erreichbar bleibt; fehlendes CSS/JS ergibt 404.
pub fn asset_reply<S: AssetStore>(store: &S, path: &str) -> Reply {
    let Some(&(_, name, content_type)) = ASSET_ROUTES.iter().find(|(p, _, _)| *p == path) else {
        return Reply::not_found("Not Found");
    };

    match store.load(name) {
        Some(body) => Reply {
            status: 200,
            content_type,
            body: Cow::Borrowed(body),
        },
        None if path == "/" => Reply::ok(format!("{} missing", name)),
        None => Reply::not_found(format!("{} missing", name)),
    }
}
