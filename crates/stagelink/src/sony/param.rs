// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed parameter trait and the endpoint-scoped registry.
//!
//! A parameter is identified by `(endpoint, key)`. The registry maps that
//! pair to a factory for the concrete variant; the naming convention is
//! mechanical - key `AbsolutePanTilt` is backed by `AbsolutePanTiltParam` -
//! so a missing registration is easy to spot.
//!
//! Keys the registry does not know come back as [`UnknownParam`] under
//! their encountered key, value untouched, so inquiry results can be
//! proxied or logged without loss.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use super::endpoint::Endpoint;

/// A typed CGI parameter.
pub trait SonyParam: Send + Sync {
    /// The query key.
    fn key(&self) -> &str;

    /// The wire value (comma-joined for composite parameters).
    fn value(&self) -> String;

    /// Load fields from a wire value. Composite parameters check their
    /// arity here and reject a wrong split length.
    fn parse(&mut self, value: &str) -> Result<(), ParamError>;

    /// Whether every field is inside the device's documented range.
    fn valid(&self) -> bool;

    /// Concrete-type access for tests and callers.
    fn as_any(&self) -> &dyn Any;
}

/// A wire value the typed parameter could not accept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamError {
    pub key: String,
    pub value: String,
}

impl ParamError {
    pub(crate) fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parameter {} rejected value {:?}", self.key, self.value)
    }
}

impl std::error::Error for ParamError {}

/// Split a composite value and require an exact arity.
pub(crate) fn split_arity<'a>(
    key: &str,
    value: &'a str,
    arity: usize,
) -> Result<Vec<&'a str>, ParamError> {
    let parts: Vec<&str> = value.split(',').collect();
    if parts.len() != arity {
        return Err(ParamError::new(key, value));
    }
    Ok(parts)
}

/// Passthrough for keys the registry does not know.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnknownParam {
    pub key: String,
    pub raw: String,
}

impl UnknownParam {
    #[must_use]
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            raw: value.to_string(),
        }
    }
}

impl SonyParam for UnknownParam {
    fn key(&self) -> &str {
        &self.key
    }

    fn value(&self) -> String {
        self.raw.clone()
    }

    fn parse(&mut self, value: &str) -> Result<(), ParamError> {
        self.raw = value.to_string();
        Ok(())
    }

    fn valid(&self) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub(crate) type Factory = fn() -> Box<dyn SonyParam>;

/// Two levels: endpoint, then parameter key.
pub(crate) type Registry = HashMap<Endpoint, HashMap<&'static str, Factory>>;

static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// The parameter registry, built once from the roster in [`super::params`].
pub(crate) fn registry() -> &'static Registry {
    REGISTRY.get_or_init(super::params::roster)
}

/// The keys registered for an endpoint, sorted. Introspection surface for
/// tooling and for the registry-wide tests.
#[must_use]
pub fn registered_keys(endpoint: Endpoint) -> Vec<&'static str> {
    let mut keys: Vec<&'static str> = registry()
        .get(&endpoint)
        .map(|m| m.keys().copied().collect())
        .unwrap_or_default();
    keys.sort_unstable();
    keys
}

/// Construct a typed parameter for `(endpoint, key)` and load `value`.
///
/// Unknown keys - and values a typed parameter rejects - come back as
/// [`UnknownParam`] so nothing is dropped.
#[must_use]
pub fn new_param(endpoint: Endpoint, key: &str, value: &str) -> Box<dyn SonyParam> {
    let factory = registry().get(&endpoint).and_then(|keys| keys.get(key));
    if let Some(factory) = factory {
        let mut param = factory();
        match param.parse(value) {
            Ok(()) => return param,
            Err(e) => {
                log::debug!("[sony] {} on {}: {}", key, endpoint, e);
            }
        }
    }
    Box::new(UnknownParam::new(key, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_param_passthrough() {
        let p = new_param(Endpoint::Network, "MysteryKey", "a,b,c");
        let unknown = p.as_any().downcast_ref::<UnknownParam>().unwrap();
        assert_eq!(unknown.key, "MysteryKey");
        assert_eq!(p.value(), "a,b,c");
        assert!(!p.valid());
    }

    #[test]
    fn test_rejected_value_falls_back_to_unknown() {
        // AbsolutePanTilt wants three fields; two arrive.
        let p = new_param(Endpoint::Ptzf, "AbsolutePanTilt", "f6359,fdcd3");
        assert!(p.as_any().is::<UnknownParam>());
        assert_eq!(p.value(), "f6359,fdcd3");
    }

    #[test]
    fn test_split_arity() {
        assert_eq!(split_arity("k", "a,b", 2).unwrap(), vec!["a", "b"]);
        assert!(split_arity("k", "a,b", 3).is_err());
        assert_eq!(split_arity("k", "a", 1).unwrap(), vec!["a"]);
    }
}
