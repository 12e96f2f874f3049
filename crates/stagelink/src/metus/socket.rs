// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! TCP client for Metus INGEST.

use std::io::{self, BufRead, BufReader, Write};
use std::net::{Shutdown, TcpStream};

use parking_lot::Mutex;

/// Default INGEST control port.
pub const DEFAULT_PORT: u16 = 32106;

/// Channel states reported by the ingest engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestStatus {
    Unknown,
    Idle,
    Cueing,
    Cued,
    Starting,
    Recording,
    Stopping,
    Stopped,
    Paused,
    Error,
    Offline,
}

impl IngestStatus {
    /// Map a status label; anything unrecognized is `Unknown`.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            "Idle" => Self::Idle,
            "Cueing" => Self::Cueing,
            "Cued" => Self::Cued,
            "Starting" => Self::Starting,
            "Recording" => Self::Recording,
            "Stopping" => Self::Stopping,
            "Stopped" => Self::Stopped,
            "Paused" => Self::Paused,
            "Error" => Self::Error,
            "Offline" => Self::Offline,
            _ => Self::Unknown,
        }
    }
}

/// Errors of the INGEST socket.
#[derive(Debug)]
pub enum MetusError {
    /// The TCP channel failed.
    Io(io::Error),
    /// The server closed the connection mid-reply.
    Closed,
    /// The server answered something other than `OK: ...`.
    Rejected(String),
}

impl std::fmt::Display for MetusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "transport error: {}", e),
            Self::Closed => write!(f, "connection closed by server"),
            Self::Rejected(line) => write!(f, "command rejected: {}", line),
        }
    }
}

impl std::error::Error for MetusError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for MetusError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Connection to one INGEST server.
pub struct MetusClient {
    stream: TcpStream,
    reader: Mutex<Option<BufReader<TcpStream>>>,
}

impl MetusClient {
    /// Connect to `host`. A `port` of 0 selects the default (32106).
    pub fn connect(host: &str, port: u16) -> io::Result<Self> {
        let port = if port == 0 { DEFAULT_PORT } else { port };
        let stream = TcpStream::connect((host, port))?;
        stream.set_nodelay(true).ok();
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

    /// Send one command and collect its payload lines.
    ///
    /// The reply runs until `terminators` empty lines have been seen. The
    /// first payload line must acknowledge with `OK:`.
    pub fn command(&self, cmd: &str, terminators: usize) -> Result<Vec<String>, MetusError> {
        let mut guard = self.reader.lock();
        if guard.is_none() {
            let clone = self.stream.try_clone().inspect_err(|_| self.close())?;
            *guard = Some(BufReader::new(clone));
        }
        let reader = guard.as_mut().expect("reader just initialized");

        (&self.stream).write_all(format!("{}\r\n", cmd).as_bytes())?;

        let mut lines = Vec::new();
        let mut empties = 0;
        while empties < terminators {
            let mut line = String::new();
            let n = reader.read_line(&mut line)?;
            if n == 0 {
                self.close();
                return Err(MetusError::Closed);
            }
            let line = line.trim_end_matches(['\r', '\n']);
            if line.is_empty() {
                empties += 1;
                continue;
            }
            lines.push(line.to_string());
        }

        match lines.first() {
            Some(first) if first.starts_with("OK:") => Ok(lines),
            Some(first) => Err(MetusError::Rejected(first.clone())),
            None => Err(MetusError::Rejected(String::new())),
        }
    }

    /// Begin capture on a channel.
    pub fn start(&self, channel: &str) -> Result<(), MetusError> {
        self.command(&format!("START {}", channel), 1).map(|_| ())
    }

    /// Stop capture on a channel.
    pub fn stop(&self, channel: &str) -> Result<(), MetusError> {
        self.command(&format!("STOP {}", channel), 1).map(|_| ())
    }

    /// Channel status readback.
    pub fn status(&self, channel: &str) -> Result<IngestStatus, MetusError> {
        let lines = self.command(&format!("STATUS {}", channel), 1)?;
        Ok(lines
            .iter()
            .find_map(|line| line.strip_prefix("Status:"))
            .map(str::trim)
            .map_or(IngestStatus::Unknown, IngestStatus::from_label))
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
    fn test_status_command() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = thread::spawn(move || {
            use std::io::Read;
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 256];
            let n = stream.read(&mut buf).unwrap();
            assert_eq!(&buf[..n], b"STATUS CH1\r\n");
            stream
                .write_all(b"OK: STATUS\r\nStatus: Recording\r\n\r\n")
                .unwrap();
        });

        let client = MetusClient::connect("127.0.0.1", addr.port()).unwrap();
        assert_eq!(client.status("CH1").unwrap(), IngestStatus::Recording);
        server.join().unwrap();
    }

    #[test]
    fn test_rejected_reply() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = thread::spawn(move || {
            use std::io::Read;
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 256];
            let _ = stream.read(&mut buf).unwrap();
            stream.write_all(b"ERR: no such channel\r\n\r\n").unwrap();
        });

        let client = MetusClient::connect("127.0.0.1", addr.port()).unwrap();
        match client.command("STATUS CH9", 1) {
            Err(MetusError::Rejected(line)) => assert_eq!(line, "ERR: no such channel"),
            other => panic!("unexpected {other:?}"),
        }
        server.join().unwrap();
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(IngestStatus::from_label("Recording"), IngestStatus::Recording);
        assert_eq!(IngestStatus::from_label("Offline"), IngestStatus::Offline);
        assert_eq!(IngestStatus::from_label("???"), IngestStatus::Unknown);
    }
}
