// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Push notification transport.
//!
//! AW cameras push state changes to subscribed peers as a single binary
//! frame per TCP connection: connect, write, close. The frame wraps an
//! ordinary response token in a proprietary envelope:
//!
//! ```text
//!  0                4          6                12               22
//! +----------------+----------+----------------+----------------+
//! | source IPv4    | counter  | date (6 bytes) | constant (10)  |
//! +----------------+----------+----------------+----------------+
//!  22         24         26      28    30
//! +----------+----------+-------+-----+------------------+
//! | len+8 BE | reserved | 01 00 | CRLF| payload (L bytes)|
//! +----------+----------+-------+-----+------------------+
//!  30+L   32+L        36+L         42+L    44+L         50+L
//! +-----+------------+------------+------+-------------+--------+
//! | CRLF| 00 02 00 18| source MAC | 00 01| date (again)| 00 x 6 |
//! +-----+------------+------------+------+-------------+--------+
//! ```
//!
//! The date is the sender's local wall clock, one byte per component
//! (year mod 100, month, day, hour, minute, second). Receivers only need
//! the length field and the payload; everything else is carried for
//! fidelity with the vendor's own panels.
//!
//! The server side keeps one [`NotifySession`] per subscribed peer with a
//! monotonic 16-bit frame counter and a consecutive-error count; a session
//! that fails more than twice in a row is evicted on the next sweep.

use std::collections::HashMap;
use std::io::{self, Read};
use std::net::{IpAddr, Ipv4Addr, SocketAddr, TcpListener, TcpStream, ToSocketAddrs, UdpSocket};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::{Datelike, Local, Timelike};
use parking_lot::Mutex;

use super::client::{AwClient, CommandError, TIMEOUT};
use super::msg::{new_response, AwResponse, PackContext};
use crate::wire::charset::trim_unprintable;

/// Frame bytes before the payload.
const HEADER_LEN: usize = 30;
/// Frame bytes after the payload.
const TRAILER_LEN: usize = 26;
/// A frame with an empty payload.
pub const MIN_FRAME_LEN: usize = HEADER_LEN + TRAILER_LEN;

/// The length field encodes payload length plus this bias.
const LEN_BIAS: usize = 8;

/// Fixed header bytes at offset 12.
const HEADER_CONST: [u8; 10] = [0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01];
/// Fixed trailer bytes after the payload CRLF.
const TRAILER_CONST: [u8; 4] = [0x00, 0x02, 0x00, 0x18];

/// Retry attempts per notification send.
const SEND_ATTEMPTS: u32 = 3;
/// Sleep between failed attempts, matching observed panel pacing.
const SEND_BACKOFF: Duration = Duration::from_millis(100);
/// Consecutive failures after which a session is evicted.
const EVICT_THRESHOLD: u32 = 2;

/// Framing violations of the notification envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// Fewer bytes than the smallest possible frame.
    TooShort(usize),
    /// The length field cannot describe a payload.
    InvalidLength(usize),
    /// Total size disagrees with the length field.
    LengthMismatch { declared: usize, actual: usize },
}

impl std::fmt::Display for FrameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooShort(n) => write!(f, "notification frame too short: {} bytes", n),
            Self::InvalidLength(n) => write!(f, "invalid length field: {}", n),
            Self::LengthMismatch { declared, actual } => write!(
                f,
                "frame length mismatch: header says {} bytes, got {}",
                declared, actual
            ),
        }
    }
}

impl std::error::Error for FrameError {}

/// Extract the payload token from a notification frame.
///
/// Only the length field (offset 22) and the payload bytes are consulted;
/// the payload is trimmed of padding before it is returned.
pub fn unpack_frame(buf: &[u8]) -> Result<String, FrameError> {
    if buf.len() < MIN_FRAME_LEN {
        return Err(FrameError::TooShort(buf.len()));
    }
    let declared = usize::from(u16::from_be_bytes([buf[22], buf[23]]));
    let payload_len = declared
        .checked_sub(LEN_BIAS)
        .ok_or(FrameError::InvalidLength(declared))?;
    let expected = MIN_FRAME_LEN + payload_len;
    if buf.len() != expected {
        return Err(FrameError::LengthMismatch {
            declared: expected,
            actual: buf.len(),
        });
    }
    let payload = &buf[HEADER_LEN..HEADER_LEN + payload_len];
    Ok(String::from_utf8_lossy(trim_unprintable(payload)).into_owned())
}

/// Local wall-clock date, one byte per component.
fn date_bytes() -> [u8; 6] {
    let now = Local::now();
    [
        (now.year().rem_euclid(100)) as u8,
        now.month() as u8,
        now.day() as u8,
        now.hour() as u8,
        now.minute() as u8,
        now.second() as u8,
    ]
}

/// Build a complete notification frame around `payload`.
#[must_use]
pub fn pack_frame(payload: &str, counter: u16, source_ip: Ipv4Addr, source_mac: [u8; 6]) -> Vec<u8> {
    let date = date_bytes();
    let payload = payload.as_bytes();
    let mut buf = vec![0u8; MIN_FRAME_LEN + payload.len()];

    buf[0..4].copy_from_slice(&source_ip.octets());
    buf[4..6].copy_from_slice(&counter.to_be_bytes());
    buf[6..12].copy_from_slice(&date);
    buf[12..22].copy_from_slice(&HEADER_CONST);
    #[allow(clippy::cast_possible_truncation)]
    let declared = (payload.len() + LEN_BIAS) as u16;
    buf[22..24].copy_from_slice(&declared.to_be_bytes());
    // 24..26 reserved, already zero
    buf[26] = 0x01;
    buf[28] = b'\r';
    buf[29] = b'\n';

    buf[30..30 + payload.len()].copy_from_slice(payload);

    let t = 30 + payload.len();
    buf[t] = b'\r';
    buf[t + 1] = b'\n';
    buf[t + 2..t + 6].copy_from_slice(&TRAILER_CONST);
    buf[t + 6..t + 12].copy_from_slice(&source_mac);
    buf[t + 13] = 0x01;
    buf[t + 14..t + 20].copy_from_slice(&date);
    // t+20..t+26 zero

    buf
}

/// Determine the local source address and hardware address the kernel
/// would use to reach `peer`.
///
/// A datagram socket is bound and connected (never sent on) to learn the
/// route; the interface carrying the chosen address supplies the MAC. An
/// interface without a readable hardware address yields all zeros.
fn discover_source(peer: IpAddr) -> io::Result<(Ipv4Addr, [u8; 6])> {
    let probe = UdpSocket::bind(("0.0.0.0", 0))?;
    probe.connect((peer, 1))?;
    let local = match probe.local_addr()?.ip() {
        IpAddr::V4(v4) => v4,
        IpAddr::V6(v6) => {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!("notification transport is IPv4 only, local address {}", v6),
            ))
        }
    };

    let mac = local_ip_address::list_afinet_netifas()
        .ok()
        .and_then(|netifas| {
            netifas
                .into_iter()
                .find(|(_, ip)| *ip == IpAddr::V4(local))
                .map(|(name, _)| name)
        })
        .and_then(|name| mac_address::mac_address_by_name(&name).ok().flatten())
        .map(|mac| mac.bytes())
        .unwrap_or_else(|| {
            log::debug!("[notify] no hardware address for {}, sending zeros", local);
            [0u8; 6]
        });

    Ok((local, mac))
}

/// One subscribed peer.
///
/// The frame counter is a 16-bit wrap-around held in a 32-bit cell; the
/// cell itself overflows silently. The error count is consecutive failed
/// sends and resets to zero on any success.
pub struct NotifySession {
    peer: SocketAddr,
    source_ip: Ipv4Addr,
    source_mac: [u8; 6],
    counter: AtomicU32,
    errors: AtomicU32,
}

impl NotifySession {
    /// Session for `peer`, with the source route discovered now and cached.
    pub fn new(peer: SocketAddr) -> io::Result<Self> {
        let (source_ip, source_mac) = discover_source(peer.ip())?;
        Ok(Self::with_source(peer, source_ip, source_mac))
    }

    pub(crate) fn with_source(peer: SocketAddr, source_ip: Ipv4Addr, source_mac: [u8; 6]) -> Self {
        Self {
            peer,
            source_ip,
            source_mac,
            counter: AtomicU32::new(0),
            errors: AtomicU32::new(0),
        }
    }

    /// The subscriber this session delivers to.
    #[must_use]
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Consecutive failed sends.
    #[must_use]
    pub fn error_count(&self) -> u32 {
        self.errors.load(Ordering::Relaxed)
    }

    fn next_counter(&self) -> u16 {
        #[allow(clippy::cast_possible_truncation)]
        let n = self.counter.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
        (n & 0xFFFF) as u16
    }

    /// Deliver one payload token.
    ///
    /// Up to three attempts; every attempt is a fresh connection with a 3 s
    /// deadline carrying a freshly counted frame. Failures bump the error
    /// count and pause 100 ms; any success resets the count.
    pub fn send(&self, payload: &str) -> io::Result<()> {
        let mut last = None;
        for attempt in 1..=SEND_ATTEMPTS {
            match self.try_send(payload) {
                Ok(()) => {
                    self.errors.store(0, Ordering::Relaxed);
                    return Ok(());
                }
                Err(e) => {
                    log::debug!(
                        "[notify] send to {} attempt {}/{} failed: {}",
                        self.peer,
                        attempt,
                        SEND_ATTEMPTS,
                        e
                    );
                    self.errors.fetch_add(1, Ordering::Relaxed);
                    last = Some(e);
                    thread::sleep(SEND_BACKOFF);
                }
            }
        }
        Err(last.unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "send failed")))
    }

    fn try_send(&self, payload: &str) -> io::Result<()> {
        use std::io::Write;

        let frame = pack_frame(payload, self.next_counter(), self.source_ip, self.source_mac);
        let mut stream = TcpStream::connect_timeout(&self.peer, TIMEOUT)?;
        stream.set_write_timeout(Some(TIMEOUT))?;
        stream.write_all(&frame)?;
        Ok(())
    }
}

/// Server-side subscriber registry.
///
/// Keyed by peer address and port; adding a peer that is already present
/// replaces its session (and resets the counters). The mutex protects the
/// map structure only - sends run on independent connections outside it,
/// so one slow subscriber cannot hold up the rest.
#[derive(Default)]
pub struct NotifySessions {
    sessions: Mutex<HashMap<SocketAddr, Arc<NotifySession>>>,
}

impl NotifySessions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `peer`, replacing any existing session for the same key.
    pub fn add(&self, peer: SocketAddr) -> io::Result<()> {
        let session = Arc::new(NotifySession::new(peer)?);
        self.sessions.lock().insert(peer, session);
        log::debug!("[notify] subscribed {}", peer);
        Ok(())
    }

    /// Drop the session for `peer`, if any.
    pub fn remove(&self, peer: SocketAddr) {
        if self.sessions.lock().remove(&peer).is_some() {
            log::debug!("[notify] unsubscribed {}", peer);
        }
    }

    /// Current subscriber count, after sweeping out dead sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.evict();
        self.sessions.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver a response to one subscriber.
    pub fn send(&self, peer: SocketAddr, res: &dyn AwResponse) -> io::Result<()> {
        let session = self
            .sessions
            .lock()
            .get(&peer)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no session for peer"))?;
        session.send(&res.pack_for(PackContext::Notification))
    }

    /// Deliver a response to every live subscriber.
    ///
    /// Sessions over the error threshold are evicted before the sweep.
    /// Returns how many sessions were attempted.
    pub fn send_all(&self, res: &dyn AwResponse) -> usize {
        self.evict();
        let targets: Vec<Arc<NotifySession>> = self.sessions.lock().values().cloned().collect();
        let payload = res.pack_for(PackContext::Notification);
        for session in &targets {
            if let Err(e) = session.send(&payload) {
                log::warn!("[notify] delivery to {} failed: {}", session.peer(), e);
            }
        }
        targets.len()
    }

    fn evict(&self) {
        let mut sessions = self.sessions.lock();
        sessions.retain(|peer, s| {
            let dead = s.error_count() > EVICT_THRESHOLD;
            if dead {
                log::debug!("[notify] evicting {} after {} errors", peer, s.error_count());
            }
            !dead
        });
    }
}

/// Client-side notification receiver.
///
/// Owns the TCP listener the camera connects back to. [`start`] subscribes
/// this listener's port with the camera, [`accept`] blocks for the next
/// frame and returns it as a typed response.
///
/// [`start`]: Self::start
/// [`accept`]: Self::accept
pub struct NotifyListener {
    client: AwClient,
    camera_ip: IpAddr,
    listener: TcpListener,
    port: u16,
}

impl NotifyListener {
    /// Bind a listener on `bind_addr` (e.g. `"0.0.0.0:0"` for an ephemeral
    /// port) receiving notifications from the camera behind `client`.
    pub fn bind(client: AwClient, bind_addr: &str) -> io::Result<Self> {
        let addr: SocketAddr = bind_addr
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, format!("{}", e)))?;

        let socket = socket2::Socket::new(
            socket2::Domain::IPV4,
            socket2::Type::STREAM,
            Some(socket2::Protocol::TCP),
        )?;
        socket.set_reuse_address(true)?;
        socket.bind(&addr.into())?;
        socket.listen(16)?;
        let listener: TcpListener = socket.into();

        let port = listener.local_addr()?.port();
        let camera_ip = (client.host(), 0u16)
            .to_socket_addrs()?
            .map(|a| a.ip())
            .next()
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, "camera address did not resolve")
            })?;

        Ok(Self {
            client,
            camera_ip,
            listener,
            port,
        })
    }

    /// The local port the camera pushes to.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Subscribe this listener with the camera.
    pub fn start(&self) -> Result<(), CommandError> {
        self.client.event("start", self.port)
    }

    /// Unsubscribe.
    // TODO: verify with the vendor whether connect=stop is required here;
    // shipped AW panels transmit connect=start for both directions and the
    // cameras drop the subscription either way.
    pub fn stop(&self) -> Result<(), CommandError> {
        self.client.event("start", self.port)
    }

    /// Block for the next notification and return its typed payload.
    ///
    /// Connections from anything but the camera's address are dropped and
    /// the wait continues. The frame is read to EOF under a 3 s deadline.
    pub fn accept(&self) -> io::Result<Box<dyn AwResponse>> {
        loop {
            let (mut stream, peer) = self.listener.accept()?;
            if peer.ip() != self.camera_ip {
                log::warn!("[notify] ignoring connection from {}", peer);
                continue;
            }
            stream.set_read_timeout(Some(TIMEOUT))?;
            let mut buf = Vec::with_capacity(MIN_FRAME_LEN + 64);
            stream.read_to_end(&mut buf)?;
            let payload = unpack_frame(&buf)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            log::debug!("[notify] {} <- {}", self.camera_ip, payload);
            return Ok(new_response(&payload));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panasonic::commands::PanSpeedReply;
    use crate::panasonic::values::ContinuousSpeed;
    use std::io::Write;

    const TEST_MAC: [u8; 6] = [0x00, 0x80, 0x45, 0x12, 0x34, 0x56];

    #[test]
    fn test_frame_round_trip() {
        let frame = pack_frame("pS75", 1, Ipv4Addr::new(192, 168, 0, 10), TEST_MAC);
        assert_eq!(frame.len(), MIN_FRAME_LEN + 4);
        assert_eq!(unpack_frame(&frame).unwrap(), "pS75");
    }

    #[test]
    fn test_frame_layout() {
        let frame = pack_frame("pS75", 1, Ipv4Addr::new(10, 1, 2, 3), TEST_MAC);
        assert_eq!(&frame[0..4], &[10, 1, 2, 3]);
        assert_eq!(&frame[4..6], &[0, 1]);
        assert_eq!(&frame[12..22], &HEADER_CONST);
        // payload length 4 + bias 8
        assert_eq!(&frame[22..24], &[0, 12]);
        assert_eq!(&frame[24..26], &[0, 0]);
        assert_eq!(frame[26], 0x01);
        assert_eq!(&frame[28..30], b"\r\n");
        assert_eq!(&frame[30..34], b"pS75");
        assert_eq!(&frame[34..36], b"\r\n");
        assert_eq!(&frame[36..40], &TRAILER_CONST);
        assert_eq!(&frame[40..46], &TEST_MAC);
        assert_eq!(frame[47], 0x01);
        // date duplicated into the trailer
        assert_eq!(&frame[48..54], &frame[6..12]);
        assert_eq!(&frame[54..60], &[0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_unpack_rejects_short_and_mismatched() {
        assert_eq!(
            unpack_frame(&[0u8; 10]),
            Err(FrameError::TooShort(10))
        );
        let mut frame = pack_frame("pS75", 1, Ipv4Addr::LOCALHOST, TEST_MAC);
        frame.push(0);
        assert!(matches!(
            unpack_frame(&frame),
            Err(FrameError::LengthMismatch { .. })
        ));
        let mut bad = pack_frame("", 1, Ipv4Addr::LOCALHOST, TEST_MAC);
        bad[23] = 0x01; // declares a payload shorter than the bias
        assert_eq!(unpack_frame(&bad), Err(FrameError::InvalidLength(1)));
    }

    #[test]
    fn test_counter_wraps_at_16_bits() {
        let peer: SocketAddr = "127.0.0.1:9".parse().unwrap();
        let session = NotifySession::with_source(peer, Ipv4Addr::LOCALHOST, TEST_MAC);
        session.counter.store(0xFFFE, Ordering::Relaxed);
        assert_eq!(session.next_counter(), 0xFFFF);
        assert_eq!(session.next_counter(), 0);
        assert_eq!(session.next_counter(), 1);
    }

    #[test]
    fn test_session_send_delivers_frame() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let peer = listener.local_addr().unwrap();
        let receiver = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = Vec::new();
            stream.read_to_end(&mut buf).unwrap();
            buf
        });

        let session = NotifySession::with_source(peer, Ipv4Addr::LOCALHOST, TEST_MAC);
        session.send("dA1").unwrap();
        assert_eq!(session.error_count(), 0);

        let frame = receiver.join().unwrap();
        assert_eq!(unpack_frame(&frame).unwrap(), "dA1");
        assert_eq!(&frame[4..6], &[0, 1]);
    }

    #[test]
    fn test_sessions_evict_after_repeated_failures() {
        let sessions = NotifySessions::new();
        // A port nothing listens on; connects fail fast on loopback.
        let peer: SocketAddr = "127.0.0.1:1".parse().unwrap();
        sessions
            .sessions
            .lock()
            .insert(peer, Arc::new(NotifySession::with_source(peer, Ipv4Addr::LOCALHOST, TEST_MAC)));

        let reply = PanSpeedReply {
            speed: ContinuousSpeed(25),
        };
        assert_eq!(sessions.send_all(&reply), 1);
        assert_eq!(sessions.len(), 0);
    }

    #[test]
    fn test_send_all_reaches_a_listener() {
        use crate::panasonic::commands::TallyReply;
        use crate::panasonic::values::Toggle;

        let listener =
            NotifyListener::bind(AwClient::new("127.0.0.1", 0), "127.0.0.1:0").unwrap();
        let subscriber = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), listener.port());
        let receiver = thread::spawn(move || listener.accept().unwrap());

        let sessions = NotifySessions::new();
        sessions.add(subscriber).unwrap();
        let reply = TallyReply { lamp: Toggle::ON };
        assert_eq!(sessions.send_all(&reply), 1);
        assert_eq!(sessions.len(), 1);

        let pushed = receiver.join().unwrap();
        let tally = pushed
            .as_any()
            .downcast_ref::<TallyReply>()
            .expect("typed notification");
        assert!(tally.lamp.is_on());
    }

    #[test]
    fn test_listener_accept_unpacks_and_types() {
        let client = AwClient::new("127.0.0.1", 0);
        let listener = NotifyListener::bind(client, "127.0.0.1:0").unwrap();
        let port = listener.port();

        let pusher = thread::spawn(move || {
            let mut stream = TcpStream::connect(("127.0.0.1", port)).unwrap();
            let frame = pack_frame("pS75", 7, Ipv4Addr::LOCALHOST, TEST_MAC);
            stream.write_all(&frame).unwrap();
        });

        let res = listener.accept().unwrap();
        let speed = res
            .as_any()
            .downcast_ref::<PanSpeedReply>()
            .expect("typed notification");
        assert_eq!(speed.speed, ContinuousSpeed(25));
        pusher.join().unwrap();
    }
}
