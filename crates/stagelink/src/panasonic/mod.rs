// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Panasonic AW camera control.
//!
//! The AW protocol is fixed-length ASCII tokens over HTTP: a command like
//! `#APC80008000` travels in a GET query to `/cgi-bin/aw_ptz`, and the
//! camera answers with a token like `aPC80008000` in a `text/plain` body.
//! Unsolicited state changes additionally arrive as binary-framed
//! notifications over short-lived TCP connections (see [`notify`]).
//!
//! Module map:
//!
//! - [`values`] - domain scalars (positions, speeds, toggles) with wire
//!   encode/decode and device-range validity
//! - [`bits`] - preset bitmask arithmetic
//! - [`msg`] - request/response traits, dispatch registries, error replies
//! - [`commands`] - the concrete command/reply roster
//! - [`client`] - HTTP command transport
//! - [`notify`] - notification frame codec, session registry, listener
//!
//! The registries fall back to [`msg::UnknownRequest`] /
//! [`msg::UnknownResponse`] for unrecognized tokens, which carry the raw
//! string through unchanged so a proxy can forward traffic it does not
//! understand.

pub mod bits;
pub mod client;
pub mod commands;
pub mod msg;
pub mod notify;
pub mod values;

pub use client::{AwClient, CommandError};
pub use msg::{
    new_request, new_response, AwEndpoint, AwRequest, AwResponse, ErrorReply, PackContext,
    UnknownRequest, UnknownResponse,
};
pub use notify::{NotifyListener, NotifySessions};
