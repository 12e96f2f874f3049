// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # Stagelink - broadcast-control protocol cores
//!
//! Clients, codecs, and protocol state machines for the IP control protocols
//! of four families of studio equipment, plus the Metus ingest line control:
//!
//! | Module | Equipment | Transport |
//! |--------|-----------|-----------|
//! | [`panasonic`] | AW pan/tilt/zoom cameras | ASCII tokens over HTTP, binary notification frames over one-shot TCP |
//! | [`sony`] | BRC/FR-series cameras | CGI parameters over HTTP digest |
//! | [`videohub`] | Blackmagic Design Videohub routers | blank-line-delimited ASCII blocks over TCP :9990 |
//! | [`yamaha`] | CL/QL digital mixing consoles | SCP lines over TCP :49280 |
//! | [`metus`] | Metus INGEST | command lines over TCP :32106 |
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use stagelink::panasonic::{commands::Power, values::Toggle, AwClient, AwResponse};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let camera = AwClient::new("10.0.1.20", 0);
//!     let reply = camera.command(&Power { switch: Toggle::ON })?;
//!     println!("power reply: {}", reply.pack());
//!     Ok(())
//! }
//! ```
//!
//! ## Design
//!
//! Every protocol core is the same shape: a wire codec that packs typed
//! values to bytes and back, a typing registry that turns raw tokens into
//! concrete message variants (with an Unknown fallback that carries
//! unrecognized traffic through unchanged, for transparent proxying), and a
//! thin transport wrapper. Vendor-defined error replies surface as typed
//! errors; transport failures are wrapped with their cause; unknown traffic
//! is data, never an error.
//!
//! The crate is fully synchronous. Client objects are usable from multiple
//! threads; per-connection read streams are serialized by an internal mutex,
//! writes on a shared socket are the caller's concern. The HTTP-serving
//! counterpart for camera emulation lives in the `stagelink-gateway` crate.

/// ASCII wire-format primitives: character classes, fixed-width numeric
/// codecs, and the signature template matcher.
pub mod wire;

/// Panasonic AW camera control: value codecs, command registry, HTTP client,
/// and the proprietary notification transport.
pub mod panasonic;

/// Blackmagic Design Videohub router control: block codec and TCP socket.
pub mod videohub;

/// Sony BRC/FR camera control: typed CGI parameter registry and digest
/// authenticated client.
pub mod sony;

/// Yamaha CL/QL mixer control: SCP line codec and TCP client.
pub mod yamaha;

/// Metus INGEST line control.
pub mod metus;
