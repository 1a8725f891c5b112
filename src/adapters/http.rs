//! HTTP server adapter (ESP-IDF only).
//!
//! Serves the remote-station protocol from [`crate::protocol`].  Handlers
//! run on the server task: they post set-valve commands to the
//! [`CommandMailbox`] and render the page from the [`StatusBoard`]; the
//! station service itself stays on the control loop.

use anyhow::Result;
use esp_idf_svc::http::Method;
use esp_idf_svc::http::server::{Configuration, EspHttpConnection, EspHttpServer, Request};
use esp_idf_svc::io::Write;
use log::{debug, info, warn};

use crate::app::commands::StationCommand;
use crate::events::{CommandMailbox, StatusBoard};
use crate::protocol::{
    QueryArgs, REDIRECT_TO_ROOT, Route, not_found_message, options_json, render_status_page,
    split_uri,
};

const HTML: &[(&str, &str)] = &[("Content-Type", "text/html")];
const JSON: &[(&str, &str)] = &[("Content-Type", "application/json")];
const TEXT: &[(&str, &str)] = &[("Content-Type", "text/plain")];

/// Start the server and register every protocol route.
///
/// The returned server must be kept alive.
pub fn start(
    mailbox: &'static CommandMailbox,
    board: &'static StatusBoard,
    firmware_version: u16,
) -> Result<EspHttpServer<'static>> {
    let mut server = EspHttpServer::new(&Configuration {
        uri_match_wildcard: true,
        ..Default::default()
    })?;

    for path in ["/", "/cm", "/_cm", "/jo", "/*"] {
        server.fn_handler::<anyhow::Error, _>(path, Method::Get, move |req| {
            handle(req, mailbox, board, firmware_version)
        })?;
    }
    info!("HTTP server started");
    Ok(server)
}

fn handle(
    req: Request<&mut EspHttpConnection<'_>>,
    mailbox: &CommandMailbox,
    board: &StatusBoard,
    firmware_version: u16,
) -> Result<()> {
    let uri = String::from(req.uri());
    let (path, query) = split_uri(&uri);
    let args = QueryArgs::parse(query);

    match Route::from_path(path) {
        Route::StatusPage => {
            let page = render_status_page(&board.snapshot());
            req.into_response(200, None, HTML)?.write_all(page.as_bytes())?;
        }
        Route::SetValve { from_web } => {
            debug!("HTTP {}", uri);
            mailbox.post(StationCommand::from_query(&args));
            let mut resp = req.into_response(200, None, HTML)?;
            if from_web {
                resp.write_all(REDIRECT_TO_ROOT.as_bytes())?;
            }
        }
        Route::Options => {
            let body = options_json(firmware_version);
            req.into_response(200, None, JSON)?.write_all(body.as_bytes())?;
        }
        Route::NotFound => {
            warn!("HTTP 404: {}", uri);
            let msg = not_found_message(path, "GET", &args);
            req.into_response(404, None, TEXT)?.write_all(msg.as_bytes())?;
        }
    }
    Ok(())
}
