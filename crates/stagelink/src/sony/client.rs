// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Digest-authenticated HTTP transport for BRC/FR cameras.
//!
//! Every request carries a `Referer` header (the cameras refuse requests
//! without one) and the query keeps space characters literal - FR-7
//! firmware rejects the `+` form-encoding of a space.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

use digest_auth::{AuthContext, WwwAuthenticateHeader};
use parking_lot::Mutex;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use super::endpoint::Endpoint;
use super::param::{new_param, SonyParam};
use crate::panasonic::client::TIMEOUT;

/// Default HTTP port of a BRC/FR camera.
pub const DEFAULT_PORT: u16 = 80;

/// Factory default credentials.
const DEFAULT_USER: &str = "admin";
const DEFAULT_PASSWORD: &str = "Admin_1234";

/// Query escaping with the space deliberately left alone.
const QUERY_VALUE: &AsciiSet = &CONTROLS
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'=')
    .add(b'?');

/// Errors of the Sony command path.
#[derive(Debug)]
pub enum SonyError {
    /// The HTTP transport failed.
    Transport(reqwest::Error),
    /// The camera answered with an unexpected status.
    Status(u16),
    /// The digest handshake could not be completed.
    Auth(String),
    /// The camera answered but the body was not what the exchange needs.
    Protocol(String),
}

impl std::fmt::Display for SonyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport error: {}", e),
            Self::Status(code) => write!(f, "unexpected HTTP status {}", code),
            Self::Auth(reason) => write!(f, "digest authentication failed: {}", reason),
            Self::Protocol(reason) => write!(f, "protocol error: {}", reason),
        }
    }
}

impl std::error::Error for SonyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SonyError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e)
    }
}

/// Client for one BRC/FR camera.
pub struct SonyClient {
    host: String,
    port: u16,
    user: String,
    password: String,
    http: OnceLock<reqwest::blocking::Client>,
    challenge: Mutex<Option<WwwAuthenticateHeader>>,
    buster: AtomicU64,
}

impl SonyClient {
    /// Client for `host` with the factory default credentials. A `port` of
    /// 0 selects the default (80).
    #[must_use]
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            host: host.to_string(),
            port: if port == 0 { DEFAULT_PORT } else { port },
            user: DEFAULT_USER.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            http: OnceLock::new(),
            challenge: Mutex::new(None),
            buster: AtomicU64::new(1),
        }
    }

    /// Override the credentials.
    #[must_use]
    pub fn with_credentials(mut self, user: &str, password: &str) -> Self {
        self.user = user.to_string();
        self.password = password.to_string();
        self
    }

    fn http(&self) -> &reqwest::blocking::Client {
        self.http.get_or_init(|| {
            reqwest::blocking::Client::builder()
                .timeout(TIMEOUT)
                .build()
                .unwrap_or_else(|e| {
                    log::warn!("[sony] http client options rejected ({}), using defaults", e);
                    reqwest::blocking::Client::new()
                })
        })
    }

    /// Answer for the cached challenge, if one has been seen.
    fn authorization(&self, uri: &str) -> Result<Option<String>, SonyError> {
        let mut guard = self.challenge.lock();
        match guard.as_mut() {
            Some(challenge) => {
                let context =
                    AuthContext::new(self.user.as_str(), self.password.as_str(), uri);
                let answer = challenge
                    .respond(&context)
                    .map_err(|e| SonyError::Auth(e.to_string()))?;
                Ok(Some(answer.to_string()))
            }
            None => Ok(None),
        }
    }

    /// GET `path_and_query`, transparently handling the digest challenge.
    fn request(&self, path_and_query: &str) -> Result<reqwest::blocking::Response, SonyError> {
        let url = format!("http://{}:{}{}", self.host, self.port, path_and_query);
        let referer = format!("http://{}/", self.host);

        let mut builder = self
            .http()
            .get(&url)
            .header(reqwest::header::REFERER, &referer);
        if let Some(auth) = self.authorization(path_and_query)? {
            builder = builder.header(reqwest::header::AUTHORIZATION, auth);
        }
        let resp = builder.send()?;
        if resp.status() != reqwest::StatusCode::UNAUTHORIZED {
            return Ok(resp);
        }

        // Fresh challenge: parse, remember, try once more.
        let www = resp
            .headers()
            .get(reqwest::header::WWW_AUTHENTICATE)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| SonyError::Auth("401 without a challenge".to_string()))?;
        let challenge =
            WwwAuthenticateHeader::parse(www).map_err(|e| SonyError::Auth(e.to_string()))?;
        *self.challenge.lock() = Some(challenge);

        let auth = self
            .authorization(path_and_query)?
            .ok_or_else(|| SonyError::Auth("challenge vanished".to_string()))?;
        let resp = self
            .http()
            .get(&url)
            .header(reqwest::header::REFERER, &referer)
            .header(reqwest::header::AUTHORIZATION, auth)
            .send()?;
        Ok(resp)
    }

    /// Apply parameters on an endpoint. The camera acknowledges with 204.
    pub fn set(&self, endpoint: Endpoint, params: &[&dyn SonyParam]) -> Result<(), SonyError> {
        let path = format!("/command/{}.cgi?{}", endpoint.name(), build_query(params));
        log::debug!("[sony] set {}", path);
        let resp = self.request(&path)?;
        let status = resp.status();
        if status != reqwest::StatusCode::NO_CONTENT {
            return Err(SonyError::Status(status.as_u16()));
        }
        Ok(())
    }

    /// Read back every parameter of an endpoint.
    ///
    /// The body is `x-www-form-urlencoded`; each pair is typed through the
    /// registry. Unknown keys come back as `UnknownParam`; duplicate keys
    /// produce one entry each.
    pub fn inquire(&self, endpoint: Endpoint) -> Result<Vec<Box<dyn SonyParam>>, SonyError> {
        let path = format!("/command/inquiry.cgi?inq={}", endpoint.name());
        let resp = self.request(&path)?;
        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(SonyError::Status(status.as_u16()));
        }
        let body = resp.text()?;
        Ok(form_urlencoded::parse(body.trim().as_bytes())
            .map(|(key, value)| new_param(endpoint, &key, &value))
            .collect())
    }

    /// Open a change-notification subscription; the camera answers with a
    /// subscription handle.
    pub fn subscribe(&self, duration_secs: u32) -> Result<String, SonyError> {
        let path = format!(
            "/command/subscribe.cgi?SubscriptionDuration={}",
            duration_secs
        );
        let resp = self.request(&path)?;
        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(SonyError::Status(status.as_u16()));
        }
        let body = resp.text()?;
        form_urlencoded::parse(body.trim().as_bytes())
            .find(|(key, _)| key == "SubscriptionId")
            .map(|(_, value)| value.into_owned())
            .ok_or_else(|| SonyError::Protocol("subscribe reply without an id".to_string()))
    }

    /// Close a subscription.
    pub fn unsubscribe(&self, id: &str) -> Result<(), SonyError> {
        let path = format!(
            "/command/unsubscribe.cgi?SubscriptionId={}",
            utf8_percent_encode(id, QUERY_VALUE)
        );
        let resp = self.request(&path)?;
        let status = resp.status();
        if status != reqwest::StatusCode::NO_CONTENT && status != reqwest::StatusCode::OK {
            return Err(SonyError::Status(status.as_u16()));
        }
        Ok(())
    }

    /// Drain the pending changes of a subscription, typed for `endpoint`.
    ///
    /// The `_` query value changes per call so intermediate caches never
    /// answer for the camera, matching the vendor's own web panel.
    pub fn pull_inquiry(
        &self,
        endpoint: Endpoint,
        id: &str,
    ) -> Result<Vec<Box<dyn SonyParam>>, SonyError> {
        let buster = self.buster.fetch_add(1, Ordering::Relaxed);
        let path = format!(
            "/command/pullinquiry.cgi?SubscriptionId={}&_={}",
            utf8_percent_encode(id, QUERY_VALUE),
            buster
        );
        let resp = self.request(&path)?;
        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(SonyError::Status(status.as_u16()));
        }
        let body = resp.text()?;
        Ok(form_urlencoded::parse(body.trim().as_bytes())
            .map(|(key, value)| new_param(endpoint, &key, &value))
            .collect())
    }
}

/// Join parameters into a query string, spaces kept literal.
fn build_query(params: &[&dyn SonyParam]) -> String {
    params
        .iter()
        .map(|p| {
            format!(
                "{}={}",
                utf8_percent_encode(p.key(), QUERY_VALUE),
                utf8_percent_encode(&p.value(), QUERY_VALUE)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sony::param::UnknownParam;
    use crate::sony::params::{AbsolutePanTiltParam, AbsoluteZoomParam, FocusModeParam};
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn test_query_preserves_spaces() {
        let spaced = UnknownParam::new("PtzTraceName", "wide shot 3");
        let zoom = AbsoluteZoomParam { position: 0x1e80 };
        let query = build_query(&[&spaced, &zoom]);
        assert_eq!(query, "PtzTraceName=wide shot 3&AbsoluteZoom=1e80");
    }

    #[test]
    fn test_query_composite_values() {
        let p = AbsolutePanTiltParam {
            pan: -40103,
            tilt: -9005,
            speed: 50,
        };
        assert_eq!(build_query(&[&p]), "AbsolutePanTilt=f6359,fdcd3,50");
    }

    /// Serve `responses` one connection each, recording request heads.
    fn serve(
        responses: Vec<&'static str>,
    ) -> (u16, thread::JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = thread::spawn(move || {
            let mut requests = Vec::new();
            for response in responses {
                let (mut stream, _) = listener.accept().unwrap();
                let mut buf = [0u8; 4096];
                let n = stream.read(&mut buf).unwrap();
                requests.push(String::from_utf8_lossy(&buf[..n]).into_owned());
                stream.write_all(response.as_bytes()).unwrap();
            }
            requests
        });
        (port, handle)
    }

    #[test]
    fn test_digest_challenge_round_trip() {
        let (port, server) = serve(vec![
            "HTTP/1.1 401 Unauthorized\r\nWWW-Authenticate: Digest realm=\"camera\", nonce=\"6e41\"\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            "HTTP/1.1 204 No Content\r\nConnection: close\r\n\r\n",
        ]);

        let client = SonyClient::new("127.0.0.1", port);
        let zoom = AbsoluteZoomParam { position: 0x1e80 };
        client.set(Endpoint::Ptzf, &[&zoom]).unwrap();

        let requests = server.join().unwrap();
        assert_eq!(requests.len(), 2);
        assert!(!requests[0].to_ascii_lowercase().contains("authorization:"));
        assert!(requests[0].contains("referer: http://127.0.0.1/")
            || requests[0].contains("Referer: http://127.0.0.1/"));
        let retry = &requests[1];
        assert!(retry.contains("Digest"));
        assert!(retry.contains("username=\"admin\""));
        assert!(retry.contains("uri=\"/command/ptzf.cgi?AbsoluteZoom=1e80\""));
    }

    #[test]
    fn test_subscription_handshake() {
        let (port, server) = serve(vec![
            "HTTP/1.1 200 OK\r\nContent-Type: application/x-www-form-urlencoded\r\nContent-Length: 21\r\nConnection: close\r\n\r\nSubscriptionId=abc123",
            "HTTP/1.1 204 No Content\r\nConnection: close\r\n\r\n",
        ]);

        let client = SonyClient::new("127.0.0.1", port);
        let id = client.subscribe(30).unwrap();
        assert_eq!(id, "abc123");
        client.unsubscribe(&id).unwrap();

        let requests = server.join().unwrap();
        assert!(requests[0].contains("/command/subscribe.cgi?SubscriptionDuration=30"));
        assert!(requests[1].contains("/command/unsubscribe.cgi?SubscriptionId=abc123"));
    }

    #[test]
    fn test_inquiry_types_parameters() {
        let (port, server) = serve(vec![
            "HTTP/1.1 200 OK\r\nContent-Type: application/x-www-form-urlencoded\r\nContent-Length: 32\r\nConnection: close\r\n\r\nAbsoluteZoom=1e80&FocusMode=auto",
        ]);

        let client = SonyClient::new("127.0.0.1", port);
        let params = client.inquire(Endpoint::Ptzf).unwrap();
        assert_eq!(params.len(), 2);
        let zoom = params[0]
            .as_any()
            .downcast_ref::<AbsoluteZoomParam>()
            .unwrap();
        assert_eq!(zoom.position, 0x1e80);
        let focus = params[1]
            .as_any()
            .downcast_ref::<FocusModeParam>()
            .unwrap();
        assert_eq!(focus.mode, "auto");
        server.join().unwrap();
    }
}
