//! Integration Tests für die HTTP-Handler
//!
//! Bilden die Requests des Browsers nach, ohne HTTP-Server

mod common;

use std::cell::RefCell;

use common::{MockAssets, MockPins};
use morse_core::handlers::{
    GpioParams, SerialParams, asset_reply, gpio_reply, morse_reply, serial_reply, version_reply,
};
use morse_core::{PinConfig, SessionLog, SignalDriver};

fn gpio(driver: &mut SignalDriver<MockPins>, gpio: Option<&str>, inv: Option<&str>, state: Option<&str>) -> u16 {
    gpio_reply(driver, GpioParams::parse(gpio, inv, state)).status
}

// ============================================================================
// Tests: /gpio
// ============================================================================

#[test]
fn test_gpio_inversion_is_sticky() {
    let mut driver = SignalDriver::new(MockPins::new());

    // /gpio?gpio=5&inv=true&state=1
    assert_eq!(gpio(&mut driver, Some("5"), Some("true"), Some("1")), 200);
    // /gpio?state=0
    assert_eq!(gpio(&mut driver, None, None, Some("0")), 200);
    assert_eq!(driver.pins().writes, vec![(5, false), (5, true)]);

    // /gpio?gpio=5&state=1 → Invertierung bleibt erhalten
    assert_eq!(gpio(&mut driver, Some("5"), None, Some("1")), 200);
    assert_eq!(driver.pins().last_write(), Some((5, false)));
    assert_eq!(
        driver.config(),
        PinConfig {
            pin_number: 5,
            inverted: true
        }
    );
}

#[test]
fn test_gpio_inversion_can_be_cleared() {
    let mut driver = SignalDriver::new(MockPins::new());
    gpio(&mut driver, Some("5"), Some("1"), Some("1"));
    gpio(&mut driver, None, Some("0"), Some("1"));

    assert_eq!(driver.pins().last_write(), Some((5, true)));
    assert!(!driver.config().inverted);
}

#[test]
fn test_gpio_defaults_to_factory_pin() {
    let mut driver = SignalDriver::new(MockPins::new());

    assert_eq!(gpio(&mut driver, None, None, Some("1")), 200);
    assert_eq!(driver.pins().writes, vec![(2, true)]);
}

#[test]
fn test_gpio_missing_state_is_off() {
    let mut driver = SignalDriver::new(MockPins::new());

    gpio(&mut driver, Some("4"), None, None);
    gpio(&mut driver, Some("4"), None, Some("abc"));
    gpio(&mut driver, Some("4"), None, Some("7"));

    assert_eq!(driver.pins().writes, vec![(4, false), (4, false), (4, true)]);
}

#[test]
fn test_gpio_reconfigures_on_every_request() {
    let mut driver = SignalDriver::new(MockPins::new());

    gpio(&mut driver, Some("5"), None, Some("1"));
    gpio(&mut driver, None, None, Some("0"));

    assert_eq!(driver.pins().configured, vec![5, 5]);
}

#[test]
fn test_gpio_invalid_pin() {
    let mut driver = SignalDriver::new(MockPins::new());
    gpio(&mut driver, Some("6"), None, Some("1"));

    let reply = gpio_reply(&mut driver, GpioParams::parse(Some("300"), None, Some("1")));
    assert_eq!(reply.status, 400);
    assert_eq!(reply.body, "Invalid GPIO");

    assert_eq!(gpio(&mut driver, Some("-1"), None, Some("1")), 400);
    assert_eq!(gpio(&mut driver, Some("31"), None, Some("1")), 400);

    // Nichts geschrieben, Konfiguration unverändert
    assert_eq!(driver.pins().writes, vec![(6, true)]);
    assert_eq!(driver.config().pin_number, 6);
}

#[test]
fn test_gpio_non_numeric_pin_keeps_current() {
    let mut driver = SignalDriver::new(MockPins::new());
    gpio(&mut driver, Some("8"), None, Some("0"));

    assert_eq!(gpio(&mut driver, Some("led"), None, Some("1")), 200);
    assert_eq!(driver.pins().last_write(), Some((8, true)));
}

// ============================================================================
// Tests: /serial
// ============================================================================

#[test]
fn test_serial_without_params_is_bad_request() {
    let mut log = SessionLog::new(String::new());

    let reply = serial_reply(&mut log, SerialParams::default());

    assert_eq!(reply.status, 400);
    assert_eq!(reply.body, "Bad Request");
    assert_eq!(log.writer(), "");
}

#[test]
fn test_serial_session() {
    let mut log = SessionLog::new(String::new());
    let requests = [
        SerialParams { start: Some("ET"), ..Default::default() },
        SerialParams { symbol: Some("."), ..Default::default() },
        SerialParams { symbol: Some("SPACE"), ..Default::default() },
        SerialParams { symbol: Some("-"), ..Default::default() },
        SerialParams { symbol: Some("WORD"), ..Default::default() },
        SerialParams { end: Some("1"), ..Default::default() },
    ];

    for params in requests {
        let reply = serial_reply(&mut log, params);
        assert_eq!(reply.status, 200);
        assert_eq!(reply.body, "OK");
    }

    assert_eq!(log.into_inner(), "Text: ET\n. - \n");
}

#[test]
fn test_serial_precedence() {
    let mut log = SessionLog::new(String::new());

    // start gewinnt gegen symbol und end
    serial_reply(
        &mut log,
        SerialParams {
            start: Some("A"),
            symbol: Some("-"),
            end: Some("1"),
        },
    );
    // symbol gewinnt gegen end
    serial_reply(
        &mut log,
        SerialParams {
            start: None,
            symbol: Some("."),
            end: Some("1"),
        },
    );

    assert_eq!(log.into_inner(), "Text: A\n.");
}

#[test]
fn test_serial_unknown_symbol_is_ignored() {
    let mut log = SessionLog::new(String::new());

    let reply = serial_reply(&mut log, SerialParams { symbol: Some("x"), ..Default::default() });

    assert_eq!(reply.status, 200);
    assert_eq!(log.writer(), "");
}

#[test]
fn test_parallel_pin_and_log_requests_stay_in_step() {
    // Ein Zustand für alle Server-Instanzen, wie in der Firmware
    let device = RefCell::new((
        SignalDriver::new(MockPins::new()),
        SessionLog::new(String::new()),
    ));
    let on = GpioParams { pin: None, inverted: None, state: true };
    let off = GpioParams { pin: None, inverted: None, state: false };

    let start = SerialParams { start: Some("SOS"), ..Default::default() };
    serial_reply(&mut device.borrow_mut().1, start);
    for (i, token) in [".", ".", ".", "SPACE", "-", "-", "-", "SPACE", ".", ".", "."]
        .into_iter()
        .enumerate()
    {
        let mark = SerialParams { symbol: Some(token), ..Default::default() };
        if token == "SPACE" {
            assert_eq!(serial_reply(&mut device.borrow_mut().1, mark).status, 200);
            continue;
        }

        // Die Reihenfolge der beiden gleichzeitigen Requests ist beliebig
        if i % 2 == 0 {
            assert_eq!(gpio_reply(&mut device.borrow_mut().0, on).status, 200);
            assert_eq!(serial_reply(&mut device.borrow_mut().1, mark).status, 200);
        } else {
            assert_eq!(serial_reply(&mut device.borrow_mut().1, mark).status, 200);
            assert_eq!(gpio_reply(&mut device.borrow_mut().0, on).status, 200);
        }
        assert_eq!(gpio_reply(&mut device.borrow_mut().0, off).status, 200);
    }
    let end = SerialParams { end: Some("1"), ..Default::default() };
    serial_reply(&mut device.borrow_mut().1, end);

    let (driver, log) = device.into_inner();
    assert_eq!(log.into_inner(), "Text: SOS\n... --- ...\n");
    assert_eq!(driver.pins().writes, [(2u8, true), (2, false)].repeat(9));
}

// ============================================================================
// Tests: /morse, /version
// ============================================================================

#[test]
fn test_morse_reply() {
    let reply = morse_reply(Some("SOS"));
    assert_eq!(reply.status, 200);
    assert_eq!(reply.content_type, "text/plain");
    assert_eq!(reply.body, "...  ---  ...  ");
}

#[test]
fn test_morse_reply_lowercase_and_punctuation() {
    assert_eq!(morse_reply(Some("a!b")).body, morse_reply(Some("AB")).body);
}

#[test]
fn test_version_reply() {
    let reply = version_reply("v1.2.3");
    assert_eq!(reply.status, 200);
    assert_eq!(reply.body, "v1.2.3");
}

// ============================================================================
// Tests: Statische Dateien
// ============================================================================

#[test]
fn test_assets_served_with_content_type() {
    let assets = MockAssets::default()
        .with("index.html", "<html></html>")
        .with("style.css", "body{}")
        .with("script.js", "let x;");

    let index = asset_reply(&assets, "/");
    assert_eq!((index.status, index.content_type), (200, "text/html"));
    assert_eq!(index.body, "<html></html>");

    assert_eq!(asset_reply(&assets, "/style.css").content_type, "text/css");
    assert_eq!(
        asset_reply(&assets, "/script.js").content_type,
        "application/javascript"
    );
}

#[test]
fn test_missing_index_is_placeholder() {
    let reply = asset_reply(&MockAssets::default(), "/");
    assert_eq!(reply.status, 200);
    assert_eq!(reply.body, "index.html missing");
}

#[test]
fn test_missing_css_and_js_are_not_found() {
    let assets = MockAssets::default();

    let css = asset_reply(&assets, "/style.css");
    assert_eq!(css.status, 404);
    assert_eq!(css.body, "style.css missing");

    assert_eq!(asset_reply(&assets, "/script.js").status, 404);
}

#[test]
fn test_unknown_path_is_not_found() {
    let assets = MockAssets::default().with("index.html", "x");
    assert_eq!(asset_reply(&assets, "/secret").status, 404);
}
