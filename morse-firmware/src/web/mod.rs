// Web-Modul: eingebettete Dateien und die Brücke zu picoserve

pub mod protocol;

use alloc::borrow::Cow;

use morse_core::handlers::{AssetStore, Reply};
use picoserve::io::embedded_io_async;
use picoserve::response::{IntoResponse, Response, StatusCode};

// Dateien zur Compile-Zeit einbinden (direkt im Binary)
pub const INDEX_HTML: &str = include_str!("index.html");
pub const STYLE_CSS: &str = include_str!("style.css");
pub const SCRIPT_JS: &str = include_str!("script.js");

/// Formular des Konfigurations-Portals
pub const PORTAL_HTML: &str = include_str!("portal.html");

/// Die im Firmware-Image eingebetteten Web-Dateien
pub struct EmbeddedAssets;

impl AssetStore for EmbeddedAssets {
    fn load(&self, name: &str) -> Option<&'static str> {
        match name {
            "index.html" => Some(INDEX_HTML),
            "style.css" => Some(STYLE_CSS),
            "script.js" => Some(SCRIPT_JS),
            _ => None,
        }
    }
}

/// Schreibt eine [`Reply`] aus morse-core als HTTP-Antwort
pub struct HttpReply(pub Reply);

impl IntoResponse for HttpReply {
    async fn write_to<
        R: embedded_io_async::Read,
        W: picoserve::response::ResponseWriter<Error = R::Error>,
    >(
        self,
        connection: picoserve::response::Connection<'_, R>,
        response_writer: W,
    ) -> Result<picoserve::ResponseSent, W::Error> {
        let Reply {
            status,
            content_type,
            body,
        } = self.0;
        let status = StatusCode::new(status);

        match body {
            Cow::Borrowed(body) => {
                Response::new(status, body)
                    .with_header("Content-Type", content_type)
                    .write_to(connection, response_writer)
                    .await
            }
            Cow::Owned(body) => {
                Response::new(status, body)
                    .with_header("Content-Type", content_type)
                    .write_to(connection, response_writer)
                    .await
            }
        }
    }
}
