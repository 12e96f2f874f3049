// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! TCP client for CL/QL consoles.

use std::io::{self, BufRead, BufReader, Write};
use std::net::{Shutdown, TcpStream};

use parking_lot::Mutex;

use super::scp::{decode_line, Incoming, InfoMessage, IntParam, ScpError, ScpMessage, StringParam};

/// Default SCP port.
pub const DEFAULT_PORT: u16 = 49280;

/// Errors of the SCP socket.
#[derive(Debug)]
pub enum YamahaError {
    /// The TCP channel failed. The connection is closed.
    Io(io::Error),
    /// The console closed the connection.
    Closed,
    /// An `ERROR` line from the console. The connection stays usable.
    Device(String),
    /// A line outside the protocol grammar.
    Malformed(String),
}

impl std::fmt::Display for YamahaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "transport error: {}", e),
            Self::Closed => write!(f, "connection closed by console"),
            Self::Device(detail) => write!(f, "console error: {}", detail),
            Self::Malformed(line) => write!(f, "unparseable SCP line: {:?}", line),
        }
    }
}

impl std::error::Error for YamahaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for YamahaError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ScpError> for YamahaError {
    fn from(e: ScpError) -> Self {
        match e {
            ScpError::Device(detail) => Self::Device(detail),
            ScpError::Malformed(line) => Self::Malformed(line),
        }
    }
}

/// Connection to one console.
///
/// Reads are serialized by an internal mutex; writes go straight to the
/// socket and are the caller's concurrency concern.
pub struct YamahaClient {
    stream: TcpStream,
    reader: Mutex<Option<BufReader<TcpStream>>>,
}

impl YamahaClient {
    /// Connect to `host`. A `port` of 0 selects the default (49280).
    pub fn connect(host: &str, port: u16) -> io::Result<Self> {
        let port = if port == 0 { DEFAULT_PORT } else { port };
        let stream = TcpStream::connect((host, port))?;
        stream.set_nodelay(true).ok();
        log::debug!("[scp] connected to {}:{}", host, port);
        Ok(Self {
            stream,
            reader: Mutex::new(None),
        })
    }

    /// Wrap an established connection.
    #[must_use]
    pub fn from_stream(stream: TcpStream) -> Self {
        Self {
            stream,
            reader: Mutex::new(None),
        }
    }

    /// Write one message as a line.
    pub fn write(&self, msg: &ScpMessage) -> io::Result<()> {
        let mut line = msg.encode();
        line.push('\n');
        log::debug!("[scp] -> {}", line.trim_end());
        (&self.stream).write_all(line.as_bytes())
    }

    /// Set an integer parameter.
    pub fn set_int(&self, address: &str, x: i64, y: i64, value: i64) -> io::Result<()> {
        self.write(&ScpMessage::Int(IntParam {
            set: true,
            address: address.to_string(),
            x,
            y,
            value,
        }))
    }

    /// Set a string parameter.
    pub fn set_str(&self, address: &str, x: i64, y: i64, value: &str) -> io::Result<()> {
        self.write(&ScpMessage::Str(StringParam {
            set: true,
            address: address.to_string(),
            x,
            y,
            value: value.to_string(),
        }))
    }

    /// Send an information request, e.g. `devinfo productname`.
    pub fn request_info(&self, action: &str, address: &str) -> io::Result<()> {
        self.write(&ScpMessage::Info(InfoMessage {
            action: action.to_string(),
            address: address.to_string(),
            value: None,
        }))
    }

    /// Request a parameter.
    pub fn get(&self, address: &str, x: i64, y: i64) -> io::Result<()> {
        self.write(&ScpMessage::Int(IntParam {
            set: false,
            address: address.to_string(),
            x,
            y,
            value: 0,
        }))
    }

    /// Read the next line and classify it.
    ///
    /// The first read creates the buffered reader; later reads reuse it
    /// under the read mutex. A transport error closes the connection and is
    /// fatal; a console `ERROR` line is a typed error and the connection
    /// stays up.
    pub fn read(&self) -> Result<Incoming, YamahaError> {
        let mut guard = self.reader.lock();
        if guard.is_none() {
            let clone = self.stream.try_clone().inspect_err(|_| self.close())?;
            *guard = Some(BufReader::new(clone));
        }
        let reader = guard.as_mut().expect("reader just initialized");

        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => Err(YamahaError::Closed),
            Ok(_) => {
                let line = line.trim_end_matches(['\r', '\n']);
                log::debug!("[scp] <- {}", line);
                Ok(decode_line(line)?)
            }
            Err(e) => {
                self.close();
                Err(YamahaError::Io(e))
            }
        }
    }

    fn close(&self) {
        let _ = self.stream.shutdown(Shutdown::Both);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn test_round_trip_against_fake_console() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let console = thread::spawn(move || {
            use std::io::Read;
            let (mut stream, _) = listener.accept().unwrap();
            stream
                .write_all(b"\nNOTIFY set MIXER:Current/InCh/Fader/Level 0 0 -32768\n")
                .unwrap();
            let mut buf = Vec::new();
            stream.read_to_end(&mut buf).unwrap();
            String::from_utf8(buf).unwrap()
        });

        let client = YamahaClient::connect("127.0.0.1", addr.port()).unwrap();
        assert_eq!(client.read().unwrap(), Incoming::Heartbeat);
        match client.read().unwrap() {
            Incoming::Notify(ScpMessage::Int(p)) => {
                assert_eq!(p.value, -32768);
            }
            other => panic!("unexpected {other:?}"),
        }

        client.set_int("MIXER:Current/InCh/Fader/Level", 0, 0, -6000).unwrap();
        client.get("MIXER:Current/InCh/Fader/Level", 0, 0).unwrap();
        client.close();

        let written = console.join().unwrap();
        assert_eq!(
            written,
            "set MIXER:Current/InCh/Fader/Level 0 0 -6000\nget MIXER:Current/InCh/Fader/Level 0 0\n"
        );
    }

    #[test]
    fn test_error_line_surfaces_typed() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let console = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            stream.write_all(b"ERROR set AddressNotFound\n").unwrap();
        });

        let client = YamahaClient::connect("127.0.0.1", addr.port()).unwrap();
        match client.read() {
            Err(YamahaError::Device(detail)) => assert_eq!(detail, "set AddressNotFound"),
            other => panic!("unexpected {other:?}"),
        }
        // The connection is still usable after a console error.
        match client.read() {
            Err(YamahaError::Closed) => {}
            other => panic!("unexpected {other:?}"),
        }
        console.join().unwrap();
    }
}
