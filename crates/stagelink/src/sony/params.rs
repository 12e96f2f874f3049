// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The concrete parameter roster.
//!
//! Pan and tilt ride the signed 20-bit field (about 235.9 units per
//! degree); zoom and focus the unsigned 16-bit field; speeds are plain
//! decimal. The meta parameters at the bottom exist only to travel in the
//! query string of the inquiry/subscription endpoints.

use std::any::Any;
use std::collections::HashMap;

use super::codec::{dec_decode, hex16_decode, hex16_encode, hex20_decode, hex20_encode};
use super::endpoint::Endpoint;
use super::param::{split_arity, ParamError, Registry, SonyParam};

/// Sony pan/tilt units per degree.
pub const UNITS_PER_DEGREE: f64 = 235.9;

macro_rules! entry {
    ($ty:ty) => {
        (|| Box::new(<$ty>::default()) as Box<dyn SonyParam>) as fn() -> Box<dyn SonyParam>
    };
}

/// The registration table consumed once by `param::registry`.
pub(crate) fn roster() -> Registry {
    let mut table: Registry = HashMap::new();

    table.insert(
        Endpoint::Ptzf,
        HashMap::from([
            ("AbsolutePanTilt", entry!(AbsolutePanTiltParam)),
            ("RelativePanTilt", entry!(RelativePanTiltParam)),
            ("PanTiltMove", entry!(PanTiltMoveParam)),
            ("AbsoluteZoom", entry!(AbsoluteZoomParam)),
            ("ZoomMove", entry!(ZoomMoveParam)),
            ("AbsoluteFocus", entry!(AbsoluteFocusParam)),
            ("FocusMode", entry!(FocusModeParam)),
        ]),
    );
    table.insert(
        Endpoint::PresetPosition,
        HashMap::from([
            ("PresetCall", entry!(PresetCallParam)),
            ("PresetSet", entry!(PresetSetParam)),
        ]),
    );
    table.insert(
        Endpoint::Imaging,
        HashMap::from([
            ("ExpCompensation", entry!(ExpCompensationParam)),
            ("WhiteBalanceMode", entry!(WhiteBalanceModeParam)),
        ]),
    );

    // Meta endpoints: hidden plumbing parameters.
    table.insert(
        Endpoint::Inquiry,
        HashMap::from([
            ("inq", entry!(InqParam)),
            ("inqjson", entry!(InqJsonParam)),
        ]),
    );
    table.insert(
        Endpoint::Subscribe,
        HashMap::from([
            ("SubscriptionDuration", entry!(SubscriptionDurationParam)),
            ("SubscriptionId", entry!(SubscriptionIdParam)),
        ]),
    );
    table.insert(
        Endpoint::Unsubscribe,
        HashMap::from([("SubscriptionId", entry!(SubscriptionIdParam))]),
    );
    table.insert(
        Endpoint::PullInquiry,
        HashMap::from([
            ("SubscriptionId", entry!(SubscriptionIdParam)),
            ("_", entry!(CacheBusterParam)),
        ]),
    );

    table
}

/// Absolute pan/tilt with transition speed: `{pan},{tilt},{speed}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AbsolutePanTiltParam {
    pub pan: i32,
    pub tilt: i32,
    pub speed: i64,
}

impl AbsolutePanTiltParam {
    /// Build from degrees at a transition speed.
    #[must_use]
    pub fn from_degrees(pan: f64, tilt: f64, speed: i64) -> Self {
        let pan = (pan * UNITS_PER_DEGREE).round() as i32;
        let tilt = (tilt * UNITS_PER_DEGREE).round() as i32;
        Self { pan, tilt, speed }
    }
}

impl SonyParam for AbsolutePanTiltParam {
    fn key(&self) -> &str {
        "AbsolutePanTilt"
    }

    fn value(&self) -> String {
        format!(
            "{},{},{}",
            hex20_encode(self.pan),
            hex20_encode(self.tilt),
            self.speed
        )
    }

    fn parse(&mut self, value: &str) -> Result<(), ParamError> {
        let parts = split_arity(self.key(), value, 3)?;
        let reject = || ParamError::new("AbsolutePanTilt", value);
        self.pan = hex20_decode(parts[0]).ok_or_else(reject)?;
        self.tilt = hex20_decode(parts[1]).ok_or_else(reject)?;
        self.speed = dec_decode(parts[2]).ok_or_else(reject)?;
        Ok(())
    }

    fn valid(&self) -> bool {
        (1..=50).contains(&self.speed)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Relative pan/tilt with transition speed: `{pan},{tilt},{speed}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelativePanTiltParam {
    pub pan: i32,
    pub tilt: i32,
    pub speed: i64,
}

impl SonyParam for RelativePanTiltParam {
    fn key(&self) -> &str {
        "RelativePanTilt"
    }

    fn value(&self) -> String {
        format!(
            "{},{},{}",
            hex20_encode(self.pan),
            hex20_encode(self.tilt),
            self.speed
        )
    }

    fn parse(&mut self, value: &str) -> Result<(), ParamError> {
        let parts = split_arity(self.key(), value, 3)?;
        let reject = || ParamError::new("RelativePanTilt", value);
        self.pan = hex20_decode(parts[0]).ok_or_else(reject)?;
        self.tilt = hex20_decode(parts[1]).ok_or_else(reject)?;
        self.speed = dec_decode(parts[2]).ok_or_else(reject)?;
        Ok(())
    }

    fn valid(&self) -> bool {
        (1..=50).contains(&self.speed)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

const MOVE_DIRECTIONS: [&str; 9] = [
    "up",
    "down",
    "left",
    "right",
    "up-left",
    "up-right",
    "down-left",
    "down-right",
    "stop",
];

/// Continuous pan/tilt drive: `{direction},{speed}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanTiltMoveParam {
    pub direction: String,
    pub speed: i64,
}

impl SonyParam for PanTiltMoveParam {
    fn key(&self) -> &str {
        "PanTiltMove"
    }

    fn value(&self) -> String {
        format!("{},{}", self.direction, self.speed)
    }

    fn parse(&mut self, value: &str) -> Result<(), ParamError> {
        let parts = split_arity(self.key(), value, 2)?;
        self.direction = parts[0].to_string();
        self.speed =
            dec_decode(parts[1]).ok_or_else(|| ParamError::new("PanTiltMove", value))?;
        Ok(())
    }

    fn valid(&self) -> bool {
        MOVE_DIRECTIONS.contains(&self.direction.as_str()) && (0..=50).contains(&self.speed)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Absolute zoom position on the 16-bit scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AbsoluteZoomParam {
    pub position: u16,
}

impl SonyParam for AbsoluteZoomParam {
    fn key(&self) -> &str {
        "AbsoluteZoom"
    }

    fn value(&self) -> String {
        hex16_encode(self.position)
    }

    fn parse(&mut self, value: &str) -> Result<(), ParamError> {
        self.position =
            hex16_decode(value).ok_or_else(|| ParamError::new("AbsoluteZoom", value))?;
        Ok(())
    }

    fn valid(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

const ZOOM_DIRECTIONS: [&str; 3] = ["tele", "wide", "stop"];

/// Continuous zoom drive: `{direction},{speed}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoomMoveParam {
    pub direction: String,
    pub speed: i64,
}

impl SonyParam for ZoomMoveParam {
    fn key(&self) -> &str {
        "ZoomMove"
    }

    fn value(&self) -> String {
        format!("{},{}", self.direction, self.speed)
    }

    fn parse(&mut self, value: &str) -> Result<(), ParamError> {
        let parts = split_arity(self.key(), value, 2)?;
        self.direction = parts[0].to_string();
        self.speed = dec_decode(parts[1]).ok_or_else(|| ParamError::new("ZoomMove", value))?;
        Ok(())
    }

    fn valid(&self) -> bool {
        ZOOM_DIRECTIONS.contains(&self.direction.as_str()) && (0..=8).contains(&self.speed)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Absolute focus position on the 16-bit scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AbsoluteFocusParam {
    pub position: u16,
}

impl SonyParam for AbsoluteFocusParam {
    fn key(&self) -> &str {
        "AbsoluteFocus"
    }

    fn value(&self) -> String {
        hex16_encode(self.position)
    }

    fn parse(&mut self, value: &str) -> Result<(), ParamError> {
        self.position =
            hex16_decode(value).ok_or_else(|| ParamError::new("AbsoluteFocus", value))?;
        Ok(())
    }

    fn valid(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Focus mode: `auto` or `manual`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusModeParam {
    pub mode: String,
}

impl SonyParam for FocusModeParam {
    fn key(&self) -> &str {
        "FocusMode"
    }

    fn value(&self) -> String {
        self.mode.clone()
    }

    fn parse(&mut self, value: &str) -> Result<(), ParamError> {
        self.mode = value.to_string();
        Ok(())
    }

    fn valid(&self) -> bool {
        matches!(self.mode.as_str(), "auto" | "manual")
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Recall a stored preset: `{number},{speed}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PresetCallParam {
    pub number: i64,
    pub speed: i64,
}

impl SonyParam for PresetCallParam {
    fn key(&self) -> &str {
        "PresetCall"
    }

    fn value(&self) -> String {
        format!("{},{}", self.number, self.speed)
    }

    fn parse(&mut self, value: &str) -> Result<(), ParamError> {
        let parts = split_arity(self.key(), value, 2)?;
        let reject = || ParamError::new("PresetCall", value);
        self.number = dec_decode(parts[0]).ok_or_else(reject)?;
        self.speed = dec_decode(parts[1]).ok_or_else(reject)?;
        Ok(())
    }

    fn valid(&self) -> bool {
        (1..=100).contains(&self.number) && (1..=25).contains(&self.speed)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Store the current position into a preset slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PresetSetParam {
    pub number: i64,
}

impl SonyParam for PresetSetParam {
    fn key(&self) -> &str {
        "PresetSet"
    }

    fn value(&self) -> String {
        self.number.to_string()
    }

    fn parse(&mut self, value: &str) -> Result<(), ParamError> {
        self.number = dec_decode(value).ok_or_else(|| ParamError::new("PresetSet", value))?;
        Ok(())
    }

    fn valid(&self) -> bool {
        (1..=100).contains(&self.number)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Exposure compensation step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpCompensationParam {
    pub step: i64,
}

impl SonyParam for ExpCompensationParam {
    fn key(&self) -> &str {
        "ExpCompensation"
    }

    fn value(&self) -> String {
        self.step.to_string()
    }

    fn parse(&mut self, value: &str) -> Result<(), ParamError> {
        self.step =
            dec_decode(value).ok_or_else(|| ParamError::new("ExpCompensation", value))?;
        Ok(())
    }

    fn valid(&self) -> bool {
        (-7..=7).contains(&self.step)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

const WB_MODES: [&str; 6] = [
    "auto",
    "indoor",
    "outdoor",
    "onepushwb",
    "atw",
    "manual",
];

/// White balance mode selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WhiteBalanceModeParam {
    pub mode: String,
}

impl SonyParam for WhiteBalanceModeParam {
    fn key(&self) -> &str {
        "WhiteBalanceMode"
    }

    fn value(&self) -> String {
        self.mode.clone()
    }

    fn parse(&mut self, value: &str) -> Result<(), ParamError> {
        self.mode = value.to_string();
        Ok(())
    }

    fn valid(&self) -> bool {
        WB_MODES.contains(&self.mode.as_str())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

macro_rules! plumbing_param {
    ($(#[$doc:meta])* $name:ident, $key:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct $name {
            pub raw: String,
        }

        impl SonyParam for $name {
            fn key(&self) -> &str {
                $key
            }

            fn value(&self) -> String {
                self.raw.clone()
            }

            fn parse(&mut self, value: &str) -> Result<(), ParamError> {
                self.raw = value.to_string();
                Ok(())
            }

            fn valid(&self) -> bool {
                !self.raw.is_empty()
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        }
    };
}

plumbing_param!(
    /// Names the endpoint an inquiry asks about.
    InqParam, "inq"
);

plumbing_param!(
    /// JSON-flavored inquiry selector.
    InqJsonParam, "inqjson"
);

plumbing_param!(
    /// Subscription lease length, seconds.
    SubscriptionDurationParam, "SubscriptionDuration"
);

plumbing_param!(
    /// Subscription handle issued by the camera.
    SubscriptionIdParam, "SubscriptionId"
);

plumbing_param!(
    /// Cache-busting timestamp the vendor's web panel appends.
    CacheBusterParam, "_"
);

#[cfg(test)]
mod tests {
    use super::super::param::new_param;
    use super::*;

    #[test]
    fn test_absolute_pan_tilt_value() {
        let p = AbsolutePanTiltParam {
            pan: -40103,
            tilt: -9005,
            speed: 50,
        };
        assert_eq!(p.value(), "f6359,fdcd3,50");
        assert!(p.valid());
    }

    #[test]
    fn test_absolute_pan_tilt_parse_round_trip() {
        let mut p = AbsolutePanTiltParam::default();
        p.parse("f6359,fdcd3,50").unwrap();
        assert_eq!(
            p,
            AbsolutePanTiltParam {
                pan: -40103,
                tilt: -9005,
                speed: 50,
            }
        );
        assert_eq!(p.value(), "f6359,fdcd3,50");
    }

    #[test]
    fn test_registry_builds_typed_params() {
        let p = new_param(Endpoint::Ptzf, "AbsoluteZoom", "1e80");
        let zoom = p.as_any().downcast_ref::<AbsoluteZoomParam>().unwrap();
        assert_eq!(zoom.position, 0x1e80);

        let p = new_param(Endpoint::PresetPosition, "PresetCall", "3,24");
        let call = p.as_any().downcast_ref::<PresetCallParam>().unwrap();
        assert_eq!((call.number, call.speed), (3, 24));
        assert!(call.valid());
    }

    #[test]
    fn test_registry_is_endpoint_scoped() {
        // The ptzf key means nothing on the imaging endpoint.
        let p = new_param(Endpoint::Imaging, "AbsoluteZoom", "1e80");
        assert!(p.as_any().is::<super::super::param::UnknownParam>());
    }

    #[test]
    fn test_uppercase_hex_rejected() {
        let mut p = AbsoluteZoomParam::default();
        assert!(p.parse("1E80").is_err());
    }

    #[test]
    fn test_meta_params() {
        let p = new_param(Endpoint::Inquiry, "inq", "ptzf");
        assert!(p.as_any().is::<InqParam>());
        assert_eq!(p.value(), "ptzf");

        let p = new_param(Endpoint::PullInquiry, "_", "1700000000");
        assert!(p.as_any().is::<CacheBusterParam>());
    }

    #[test]
    fn test_directional_moves() {
        let mut p = PanTiltMoveParam::default();
        p.parse("up-left,24").unwrap();
        assert!(p.valid());
        p.parse("sideways,24").unwrap();
        assert!(!p.valid());

        let mut z = ZoomMoveParam::default();
        z.parse("tele,4").unwrap();
        assert!(z.valid());
    }
}
