// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Sony BRC/FR camera control.
//!
//! These cameras speak CGI parameters over HTTP with digest
//! authentication: a set is `GET /command/ptzf.cgi?AbsoluteZoom=1e80`, an
//! inquiry returns an `x-www-form-urlencoded` body that decodes into the
//! same typed parameters.
//!
//! - [`endpoint`] - the CGI endpoints and the meta endpoints
//! - [`codec`] - the vendor's numeric wire formats (lowercase hex, unlike
//!   the Panasonic side)
//! - [`param`] - the parameter trait, registry, and passthrough variant
//! - [`params`] - the concrete typed parameters
//! - [`client`] - digest-authenticated transport

pub mod client;
pub mod codec;
pub mod endpoint;
pub mod param;
pub mod params;

pub use client::{SonyClient, SonyError};
pub use endpoint::Endpoint;
pub use param::{new_param, registered_keys, ParamError, SonyParam, UnknownParam};
