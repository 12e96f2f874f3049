// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! TCP client for Videohub routers.

use std::io::{self, BufReader, Write};
use std::net::{Shutdown, TcpStream};

use parking_lot::Mutex;

use super::block::{decode_block, encode_block, Block, BlockError};
use super::framer::BlockScanner;

/// Default Videohub control port.
pub const DEFAULT_PORT: u16 = 9990;

/// Errors of the Videohub socket.
#[derive(Debug)]
pub enum VideohubError {
    /// The TCP channel failed. The connection is closed.
    Io(io::Error),
    /// The router closed the connection.
    Closed,
    /// A routing body where some lines did not parse; the block carries
    /// every entry that did. The connection stays usable.
    Partial(Block),
}

impl std::fmt::Display for VideohubError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "transport error: {}", e),
            Self::Closed => write!(f, "connection closed by router"),
            Self::Partial(_) => write!(f, "partially valid block"),
        }
    }
}

impl std::error::Error for VideohubError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for VideohubError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Connection to one router.
///
/// Reads are serialized by an internal mutex and return blocks in arrival
/// order. Writes go straight to the socket; callers sharing a client across
/// threads serialize their own writes.
pub struct VideohubClient {
    stream: TcpStream,
    reader: Mutex<Option<BlockScanner<BufReader<TcpStream>>>>,
}

impl VideohubClient {
    /// Connect to `host`. A `port` of 0 selects the default (9990).
    pub fn connect(host: &str, port: u16) -> io::Result<Self> {
        let port = if port == 0 { DEFAULT_PORT } else { port };
        let stream = TcpStream::connect((host, port))?;
        stream.set_nodelay(true).ok();
        log::debug!("[videohub] connected to {}:{}", host, port);
        Ok(Self {
            stream,
            reader: Mutex::new(None),
        })
    }

    /// Wrap an established connection (useful against a local listener).
    #[must_use]
    pub fn from_stream(stream: TcpStream) -> Self {
        Self {
            stream,
            reader: Mutex::new(None),
        }
    }

    /// Write one block, terminated by the blank line.
    pub fn write(&self, block: &Block) -> io::Result<()> {
        let mut payload = encode_block(block);
        payload.push('\n');
        (&self.stream).write_all(payload.as_bytes())
    }

    /// Read the next typed block.
    ///
    /// The first read creates the scanner; later reads reuse it under the
    /// read mutex. A transport error closes the underlying connection and
    /// is fatal; a partial routing body is returned as
    /// [`VideohubError::Partial`] and the connection stays up.
    pub fn read(&self) -> Result<Block, VideohubError> {
        let mut guard = self.reader.lock();
        if guard.is_none() {
            let clone = self.stream.try_clone().inspect_err(|_| self.close())?;
            *guard = Some(BlockScanner::new(BufReader::new(clone)));
        }
        let scanner = guard.as_mut().expect("scanner just initialized");

        loop {
            match scanner.next_block() {
                Ok(Some(text)) => match decode_block(&text) {
                    Ok(block) => return Ok(block),
                    Err(BlockError::Empty) => continue,
                    Err(BlockError::PartialBody(block)) => {
                        return Err(VideohubError::Partial(*block))
                    }
                },
                Ok(None) => return Err(VideohubError::Closed),
                Err(e) => {
                    self.close();
                    return Err(VideohubError::Io(e));
                }
            }
        }
    }

    /// Read blocks until the router's `END PRELUDE:` marker and return
    /// everything that came before it.
    ///
    /// Routers send their full state as a prelude on every new connection;
    /// this collects it. A partial routing block is kept with the entries
    /// that parsed.
    pub fn read_prelude(&self) -> Result<Vec<Block>, VideohubError> {
        let mut blocks = Vec::new();
        loop {
            match self.read() {
                Ok(Block::EndPrelude) => return Ok(blocks),
                Ok(block) => blocks.push(block),
                Err(VideohubError::Partial(block)) => blocks.push(block),
                Err(e) => return Err(e),
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
    use std::collections::BTreeMap;
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn test_read_write_against_fake_router() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let router = thread::spawn(move || {
            use std::io::Read;
            let (mut stream, _) = listener.accept().unwrap();
            stream
                .write_all(b"PROTOCOL PREAMBLE:\nVersion: 2.8\n\nACK\n\n")
                .unwrap();
            let mut buf = Vec::new();
            stream.read_to_end(&mut buf).unwrap();
            String::from_utf8(buf).unwrap()
        });

        let client = VideohubClient::connect("127.0.0.1", addr.port()).unwrap();
        match client.read().unwrap() {
            Block::Preamble(p) => assert_eq!(p.version, "2.8"),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(client.read().unwrap(), Block::Ack);

        let mut routes = BTreeMap::new();
        routes.insert(1u32, 5u32);
        client
            .write(&Block::Routing {
                kind: super::super::block::RouteKind::VideoOutput,
                routes,
            })
            .unwrap();
        client.close();

        let written = router.join().unwrap();
        assert_eq!(written, "VIDEO OUTPUT ROUTING:\n1 5\n\n");
    }

    #[test]
    fn test_read_prelude_collects_until_marker() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let router = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            stream
                .write_all(
                    b"PROTOCOL PREAMBLE:\nVersion: 2.8\n\n\
                      VIDEO OUTPUT ROUTING:\n0 3\n1 3\n\n\
                      END PRELUDE:\n\n",
                )
                .unwrap();
        });

        let client = VideohubClient::connect("127.0.0.1", addr.port()).unwrap();
        let prelude = client.read_prelude().unwrap();
        assert_eq!(prelude.len(), 2);
        assert!(matches!(prelude[0], Block::Preamble(_)));
        assert!(matches!(prelude[1], Block::Routing { .. }));
        router.join().unwrap();
    }

    #[test]
    fn test_closed_connection_reports_closed() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let router = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            drop(stream);
        });

        let client = VideohubClient::connect("127.0.0.1", addr.port()).unwrap();
        match client.read() {
            Err(VideohubError::Closed) => {}
            other => panic!("unexpected {other:?}"),
        }
        router.join().unwrap();
    }
}
