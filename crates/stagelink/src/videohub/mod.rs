// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Blackmagic Design Videohub router control.
//!
//! The Videohub protocol is ASCII blocks over TCP port 9990. A block is a
//! header line, a body, and a terminating blank line:
//!
//! ```text
//! VIDEO OUTPUT ROUTING:
//! 0 3
//! 1 3
//!
//! ```
//!
//! Bodies are either `Key: Value` lines or `{index} {rest}` lines. An empty
//! body means "send me the current state" when a client writes it and
//! "no change" when a device writes it; a partial body is a change request
//! or a change notification. The wire format does not distinguish those -
//! the application must.
//!
//! [`Block`] is the typed unit; [`BlockScanner`] cuts a byte stream into
//! blocks; [`VideohubClient`] wraps a TCP connection.

pub mod block;
pub mod framer;
pub mod socket;

pub use block::{
    decode_block, encode_block, Block, BlockError, ConfigurationBlock, DeviceBlock, LabelKind,
    LockState, PreambleBlock, RouteKind,
};
pub use framer::BlockScanner;
pub use socket::{VideohubClient, VideohubError, DEFAULT_PORT};
