// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Request/response typing and dispatch for the AW protocol.
//!
//! Every message class implements [`AwRequest`] or [`AwResponse`] and is
//! listed, with its signature template, in one of two ordered dispatch
//! tables. [`new_request`] and [`new_response`] walk their table in
//! registration order and build the first variant whose template matches;
//! a token nobody claims becomes [`UnknownRequest`] / [`UnknownResponse`],
//! which carries the raw string through unchanged so proxies stay
//! transparent.
//!
//! The tables are built once, by an explicit roster function in
//! [`super::commands`], on first use; they are immutable afterwards and can
//! be read from any thread without locking.

use std::any::Any;
use std::fmt;
use std::sync::OnceLock;

use crate::wire::numeric::{dec2int, int2dec};
use crate::wire::pattern;

/// The two HTTP command endpoints of an AW camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AwEndpoint {
    /// `/cgi-bin/aw_ptz` - commands starting with `#`.
    Ptz,
    /// `/cgi-bin/aw_cam` - commands without the `#` prefix.
    Cam,
}

/// Where a response is about to be serialized.
///
/// A handful of replies pack differently depending on the surface they
/// travel over; [`AwResponse::pack_for`] consults this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackContext {
    /// Direct reply on one of the command endpoints.
    Endpoint(AwEndpoint),
    /// A line of the `/live/camdata.html` batch page.
    Batch,
    /// Payload of a push notification frame.
    Notification,
}

/// A typed AW command.
///
/// `unpack` must only be called with a token already accepted by
/// `signature()`; decoders index the wire string on that guarantee.
pub trait AwRequest: Send + Sync {
    /// Signature template over the matcher alphabet.
    fn signature(&self) -> &'static [u8];

    /// Serialize for the wire.
    fn pack(&self) -> String;

    /// Load fields from a matcher-accepted token.
    fn unpack(&mut self, wire: &str);

    /// Whether every field is inside the device's documented range.
    fn acceptable(&self) -> bool {
        true
    }

    /// A fresh instance of the reply class this command is answered with.
    fn expected_response(&self) -> Box<dyn AwResponse>;

    /// Concrete-type access for tests and proxies.
    fn as_any(&self) -> &dyn Any;
}

/// A typed AW reply, batch line, or notification payload.
pub trait AwResponse: Send + Sync + fmt::Debug {
    /// Signature template over the matcher alphabet.
    fn signature(&self) -> &'static [u8];

    /// Serialize for the wire.
    fn pack(&self) -> String;

    /// Serialize for a specific surface; the default ignores the context.
    fn pack_for(&self, ctx: PackContext) -> String {
        let _ = ctx;
        self.pack()
    }

    /// Load fields from a matcher-accepted token.
    fn unpack(&mut self, wire: &str);

    /// Concrete-type access for tests and proxies.
    fn as_any(&self) -> &dyn Any;
}

/// One request dispatch entry: a signature and the factory for its variant.
pub struct RequestEntry {
    pub signature: &'static [u8],
    pub make: fn() -> Box<dyn AwRequest>,
}

/// One response dispatch entry.
pub struct ResponseEntry {
    pub signature: &'static [u8],
    pub make: fn() -> Box<dyn AwResponse>,
}

static REQUESTS: OnceLock<Vec<RequestEntry>> = OnceLock::new();
static RESPONSES: OnceLock<Vec<ResponseEntry>> = OnceLock::new();

/// The request dispatch table, in registration order.
pub fn request_table() -> &'static [RequestEntry] {
    REQUESTS.get_or_init(super::commands::request_roster)
}

/// The response dispatch table, in registration order.
pub fn response_table() -> &'static [ResponseEntry] {
    RESPONSES.get_or_init(super::commands::response_roster)
}

/// Type a raw command token. First matching registration wins; an unmatched
/// token becomes [`UnknownRequest`].
pub fn new_request(wire: &str) -> Box<dyn AwRequest> {
    for entry in request_table() {
        if pattern::matches(entry.signature, wire.as_bytes()) {
            let mut req = (entry.make)();
            req.unpack(wire);
            return req;
        }
    }
    Box::new(UnknownRequest {
        raw: wire.to_string(),
    })
}

/// Type a raw reply token. First matching registration wins; an unmatched
/// token becomes [`UnknownResponse`].
pub fn new_response(wire: &str) -> Box<dyn AwResponse> {
    for entry in response_table() {
        if pattern::matches(entry.signature, wire.as_bytes()) {
            let mut res = (entry.make)();
            res.unpack(wire);
            return res;
        }
    }
    Box::new(UnknownResponse {
        raw: wire.to_string(),
    })
}

/// Matches any token; the signature of the unknown fallbacks.
const SIG_ANY: &[u8] = b"\x7F";

/// Fallback for command tokens no registration claims. Never registered
/// itself; exists so unrecognized traffic can be proxied verbatim.
#[derive(Debug, Clone, Default)]
pub struct UnknownRequest {
    pub raw: String,
}

impl AwRequest for UnknownRequest {
    fn signature(&self) -> &'static [u8] {
        SIG_ANY
    }

    fn pack(&self) -> String {
        self.raw.clone()
    }

    fn unpack(&mut self, wire: &str) {
        self.raw = wire.to_string();
    }

    fn expected_response(&self) -> Box<dyn AwResponse> {
        Box::new(UnknownResponse::default())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Fallback for reply tokens no registration claims.
#[derive(Debug, Clone, Default)]
pub struct UnknownResponse {
    pub raw: String,
}

impl AwResponse for UnknownResponse {
    fn signature(&self) -> &'static [u8] {
        SIG_ANY
    }

    fn pack(&self) -> String {
        self.raw.clone()
    }

    fn unpack(&mut self, wire: &str) {
        self.raw = wire.to_string();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Vendor error codes carried by [`ErrorReply`].
pub mod err_no {
    /// The camera does not implement the command.
    pub const UNSUPPORTED: i64 = 1;
    /// The camera is busy (often mid pan/tilt initialization).
    pub const BUSY: i64 = 2;
    /// A field was outside the acceptable range.
    pub const UNACCEPTABLE: i64 = 3;
}

/// The camera's error reply: `ER{n}:{flag}` or `eR{n}:{flag}`.
///
/// The flag names the rejected command (up to three characters, possibly
/// empty). The capitalization of the leading letter is an endpoint quirk:
/// the ptz endpoint answers `eR...`, the cam endpoint `ER...` - see
/// [`AwResponse::pack_for`]. The client surfaces this reply as a typed
/// error, never as a successful response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReply {
    pub capitalized: bool,
    pub number: i64,
    pub flag: String,
}

impl Default for ErrorReply {
    fn default() -> Self {
        Self {
            capitalized: true,
            number: 0,
            flag: String::new(),
        }
    }
}

/// `ER{n}:` - empty flag, capitalized.
pub(crate) const SIG_ERR_UPPER: &[u8] = b"ER\x02:";
/// `ER{n}:{flag}` - at least one flag character, capitalized.
pub(crate) const SIG_ERR_UPPER_FLAG: &[u8] = b"ER\x02:\x04\x7F";
/// `eR{n}:` - empty flag, lowercase.
pub(crate) const SIG_ERR_LOWER: &[u8] = b"eR\x02:";
/// `eR{n}:{flag}` - at least one flag character, lowercase.
pub(crate) const SIG_ERR_LOWER_FLAG: &[u8] = b"eR\x02:\x04\x7F";

impl ErrorReply {
    #[must_use]
    pub fn unsupported(flag: &str) -> Self {
        Self::numbered(err_no::UNSUPPORTED, flag)
    }

    #[must_use]
    pub fn busy(flag: &str) -> Self {
        Self::numbered(err_no::BUSY, flag)
    }

    #[must_use]
    pub fn unacceptable(flag: &str) -> Self {
        Self::numbered(err_no::UNACCEPTABLE, flag)
    }

    #[must_use]
    pub fn numbered(number: i64, flag: &str) -> Self {
        Self {
            capitalized: true,
            number,
            flag: flag.to_string(),
        }
    }

    fn pack_with_case(&self, capitalized: bool) -> String {
        let lead = if capitalized { 'E' } else { 'e' };
        format!("{}R{}:{}", lead, int2dec(self.number, 1), self.flag)
    }
}

impl fmt::Display for ErrorReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let meaning = match self.number {
            err_no::UNSUPPORTED => "unsupported",
            err_no::BUSY => "busy",
            err_no::UNACCEPTABLE => "unacceptable value",
            _ => "vendor error",
        };
        write!(f, "camera error {} ({meaning}), flag {:?}", self.number, self.flag)
    }
}

impl std::error::Error for ErrorReply {}

impl AwResponse for ErrorReply {
    fn signature(&self) -> &'static [u8] {
        match (self.capitalized, self.flag.is_empty()) {
            (true, true) => SIG_ERR_UPPER,
            (true, false) => SIG_ERR_UPPER_FLAG,
            (false, true) => SIG_ERR_LOWER,
            (false, false) => SIG_ERR_LOWER_FLAG,
        }
    }

    fn pack(&self) -> String {
        self.pack_with_case(self.capitalized)
    }

    fn pack_for(&self, ctx: PackContext) -> String {
        match ctx {
            PackContext::Endpoint(AwEndpoint::Ptz) => self.pack_with_case(false),
            PackContext::Endpoint(AwEndpoint::Cam) => self.pack_with_case(true),
            PackContext::Batch | PackContext::Notification => self.pack(),
        }
    }

    fn unpack(&mut self, wire: &str) {
        let bytes = wire.as_bytes();
        self.capitalized = bytes[0] == b'E';
        self.number = dec2int(&wire[2..3]);
        self.flag = wire[4..].to_string();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_reply_pack_unpack() {
        let mut e = ErrorReply::default();
        e.unpack("ER1:APC");
        assert_eq!(e.number, err_no::UNSUPPORTED);
        assert_eq!(e.flag, "APC");
        assert!(e.capitalized);
        assert_eq!(e.pack(), "ER1:APC");

        e.unpack("eR3:");
        assert_eq!(e.number, err_no::UNACCEPTABLE);
        assert_eq!(e.flag, "");
        assert!(!e.capitalized);
        assert_eq!(e.pack(), "eR3:");
    }

    #[test]
    fn test_error_reply_endpoint_quirk() {
        let e = ErrorReply::unsupported("APC");
        assert_eq!(e.pack_for(PackContext::Endpoint(AwEndpoint::Ptz)), "eR1:APC");
        assert_eq!(e.pack_for(PackContext::Endpoint(AwEndpoint::Cam)), "ER1:APC");
        assert_eq!(e.pack_for(PackContext::Batch), e.pack());
    }

    #[test]
    fn test_error_reply_signature_tracks_state() {
        let mut e = ErrorReply::default();
        assert_eq!(e.signature(), SIG_ERR_UPPER);
        e.unpack("eR2:OSA");
        assert_eq!(e.signature(), SIG_ERR_LOWER_FLAG);
    }

    #[test]
    fn test_unknown_round_trip() {
        let mut u = UnknownResponse::default();
        u.unpack("gibberish !!");
        assert_eq!(u.pack(), "gibberish !!");
    }

    #[test]
    fn test_dispatch_falls_back_to_unknown() {
        let res = new_response("@@nonsense@@");
        assert!(res.as_any().is::<UnknownResponse>());
        assert_eq!(res.pack(), "@@nonsense@@");

        let req = new_request("");
        assert!(req.as_any().is::<UnknownRequest>());
    }

    #[test]
    fn test_error_dispatch_both_cases() {
        for wire in ["ER1:APC", "eR1:APC", "ER2:", "eR3:O"] {
            let res = new_response(wire);
            let err = res
                .as_any()
                .downcast_ref::<ErrorReply>()
                .expect("error reply");
            assert_eq!(err.pack(), wire);
        }
    }
}
