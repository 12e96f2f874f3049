// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! HTTP command transport for AW cameras.
//!
//! Commands travel in the query string of a GET request:
//!
//! ```text
//! GET /cgi-bin/aw_ptz?cmd=%23APC80008000&res=1   (token starts with '#')
//! GET /cgi-bin/aw_cam?cmd=OAF%3A1&res=1          (token without '#')
//! ```
//!
//! The camera answers with a single packed token in a `text/plain` body.
//! Vendor panels send the `cmd` value unencoded; cameras accept either, and
//! this client percent-encodes to stay inside the HTTP grammar.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;
use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use super::msg::{new_response, AwRequest, AwResponse, ErrorReply};
use crate::wire::charset::trim_unprintable;
use crate::wire::pattern;

/// Default HTTP port of an AW camera.
pub const DEFAULT_PORT: u16 = 80;

/// Per-operation timeout.
pub(crate) const TIMEOUT: Duration = Duration::from_secs(3);

/// Factory default credentials for the configuration endpoints.
const DEFAULT_USER: &str = "admin";
const DEFAULT_PASSWORD: &str = "12345";

/// Bytes escaped inside a query value.
const QUERY_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'=')
    .add(b'?');

/// Errors of the AW command path.
#[derive(Debug)]
pub enum CommandError {
    /// The HTTP transport failed (refused, timed out, TLS, DNS).
    Transport(reqwest::Error),
    /// The camera answered with a non-200 status.
    Status(u16),
    /// The camera rejected the command with a typed error reply.
    Device(ErrorReply),
    /// The camera returned an unexpected content type.
    ContentType(String),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport error: {}", e),
            Self::Status(code) => write!(f, "unexpected HTTP status {}", code),
            Self::Device(e) => write!(f, "{}", e),
            Self::ContentType(ct) => write!(f, "unexpected content type {:?}", ct),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            Self::Device(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for CommandError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e)
    }
}

/// Client for one AW camera.
///
/// Usable from multiple threads; each call performs an independent HTTP
/// request with a 3 second deadline.
pub struct AwClient {
    host: String,
    port: u16,
    user: String,
    password: String,
    http: OnceLock<reqwest::blocking::Client>,
    page_seed: AtomicU32,
}

impl AwClient {
    /// Client for `host`. A `port` of 0 selects the default (80).
    #[must_use]
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            host: host.to_string(),
            port: if port == 0 { DEFAULT_PORT } else { port },
            user: DEFAULT_USER.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            http: OnceLock::new(),
            page_seed: AtomicU32::new(1),
        }
    }

    /// Override the factory default credentials used by [`set_title`].
    ///
    /// [`set_title`]: Self::set_title
    #[must_use]
    pub fn with_credentials(mut self, user: &str, password: &str) -> Self {
        self.user = user.to_string();
        self.password = password.to_string();
        self
    }

    /// The camera address this client talks to.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// One-shot transport setup: redirects off, 3 s request deadline.
    fn http(&self) -> &reqwest::blocking::Client {
        self.http.get_or_init(|| {
            reqwest::blocking::Client::builder()
                .redirect(reqwest::redirect::Policy::none())
                .timeout(TIMEOUT)
                .build()
                .unwrap_or_else(|e| {
                    log::warn!("[aw] http client options rejected ({}), using defaults", e);
                    reqwest::blocking::Client::new()
                })
        })
    }

    fn base(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// URL for a packed command token. Tokens starting with `#` go to the
    /// ptz endpoint, the rest to the cam endpoint.
    fn command_url(&self, cmd: &str) -> String {
        let endpoint = if cmd.starts_with('#') { "aw_ptz" } else { "aw_cam" };
        format!(
            "{}/cgi-bin/{}?cmd={}&res=1",
            self.base(),
            endpoint,
            utf8_percent_encode(cmd, QUERY_VALUE)
        )
    }

    /// Send a typed command and return the typed reply.
    ///
    /// A reply matching the command's expected response class is decoded
    /// into it; anything else goes through the dispatch table, so an
    /// unsolicited or unrelated token still comes back typed (or as
    /// `UnknownResponse`). A vendor error reply is returned as
    /// [`CommandError::Device`], never as a successful response.
    pub fn command(&self, req: &dyn AwRequest) -> Result<Box<dyn AwResponse>, CommandError> {
        let cmd = req.pack();
        let url = self.command_url(&cmd);
        log::debug!("[aw] {} -> {}", cmd, url);

        let resp = self.http().get(&url).send()?;
        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(CommandError::Status(status.as_u16()));
        }
        let body = resp.bytes()?;
        let text = String::from_utf8_lossy(trim_unprintable(&body)).into_owned();
        log::debug!("[aw] {} <- {}", cmd, text);

        let mut expected = req.expected_response();
        if pattern::matches(expected.signature(), text.as_bytes()) {
            expected.unpack(&text);
            return Ok(expected);
        }
        let res = new_response(&text);
        if let Some(err) = res.as_any().downcast_ref::<ErrorReply>() {
            return Err(CommandError::Device(err.clone()));
        }
        Ok(res)
    }

    /// Fetch the state batch page and type every line.
    ///
    /// `/live/camdata.html` carries one packed response token per line -
    /// the same tokens the notification transport pushes.
    pub fn batch(&self) -> Result<Vec<Box<dyn AwResponse>>, CommandError> {
        let url = format!("{}/live/camdata.html", self.base());
        let resp = self.http().get(&url).send()?;
        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(CommandError::Status(status.as_u16()));
        }
        let body = resp.text()?;
        Ok(body
            .lines()
            .map(|line| String::from_utf8_lossy(trim_unprintable(line.as_bytes())).into_owned())
            .filter(|line| !line.is_empty())
            .map(|line| new_response(&line))
            .collect())
    }

    /// Grab a JPEG still at the requested resolution (pixels across).
    ///
    /// The `page` query value is a fresh pseudorandom number per call so
    /// intermediate caches never serve a stale frame.
    pub fn screenshot(&self, resolution: u32) -> Result<Vec<u8>, CommandError> {
        let seed = self.page_seed.fetch_add(1, Ordering::Relaxed);
        let page = fastrand::Rng::with_seed(u64::from(seed)).u32(..);
        let url = format!(
            "{}/cgi-bin/camera?resolution={}&page={}",
            self.base(),
            resolution,
            page
        );
        let resp = self.http().get(&url).send()?;
        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(CommandError::Status(status.as_u16()));
        }
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.starts_with("image/jpeg") {
            return Err(CommandError::ContentType(content_type));
        }
        Ok(resp.bytes()?.to_vec())
    }

    /// Set the camera title via the Basic-authenticated config endpoint.
    /// Returns the echoed title.
    pub fn set_title(&self, title: &str) -> Result<String, CommandError> {
        let url = format!(
            "{}/cgi-bin/set_basic?cam_title={}",
            self.base(),
            utf8_percent_encode(title, QUERY_VALUE)
        );
        let resp = self
            .http()
            .get(&url)
            .basic_auth(&self.user, Some(&self.password))
            .send()?;
        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(CommandError::Status(status.as_u16()));
        }
        let body = resp.text()?;
        Ok(body
            .trim()
            .strip_prefix("cam_title=")
            .unwrap_or(body.trim())
            .to_string())
    }

    /// Manage the notification subscription for a listener on `my_port`.
    /// The camera acknowledges with 204 No Content.
    pub(crate) fn event(&self, connect: &str, my_port: u16) -> Result<(), CommandError> {
        let url = format!(
            "{}/cgi-bin/event?connect={}&my_port={}&uid=0",
            self.base(),
            connect,
            my_port
        );
        let resp = self.http().get(&url).send()?;
        let status = resp.status();
        if status != reqwest::StatusCode::NO_CONTENT {
            return Err(CommandError::Status(status.as_u16()));
        }
        Ok(())
    }
}
