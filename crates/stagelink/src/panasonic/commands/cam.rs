// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Camera-side image controls.
//!
//! These tokens travel over `/cgi-bin/aw_cam` without the `#` prefix and use
//! a `KEY:value` shape. Set commands are echoed verbatim; the `Q??` queries
//! return the corresponding `O??:` state token.

use std::any::Any;

use super::super::msg::{AwRequest, AwResponse};
use super::super::values::{AwScalar, CenteredScale, NdFilter, Toggle};
use crate::wire::numeric::{dec2int, hex2int, int2dec, int2hex};

pub(crate) const SIG_AUTOFOCUS: &[u8] = b"OAF:\x02";
pub(crate) const SIG_AUTOFOCUS_QUERY: &[u8] = b"QAF";
pub(crate) const SIG_AUTOFOCUS_REPLY: &[u8] = b"OAF:\x02";
pub(crate) const SIG_COLOR_BAR: &[u8] = b"DCB:\x02";
pub(crate) const SIG_COLOR_BAR_REPLY: &[u8] = b"DCB:\x02";
pub(crate) const SIG_ND_FILTER: &[u8] = b"OFT:\x02";
pub(crate) const SIG_ND_FILTER_QUERY: &[u8] = b"QFT";
pub(crate) const SIG_ND_FILTER_REPLY: &[u8] = b"OFT:\x02";
pub(crate) const SIG_GAIN: &[u8] = b"OGU:\x01\x01";
pub(crate) const SIG_GAIN_QUERY: &[u8] = b"QGU";
pub(crate) const SIG_GAIN_REPLY: &[u8] = b"OGU:\x01\x01";
pub(crate) const SIG_SHUTTER: &[u8] = b"OSH:\x01";
pub(crate) const SIG_SHUTTER_REPLY: &[u8] = b"OSH:\x01";
pub(crate) const SIG_WHITE_BALANCE: &[u8] = b"OAW:\x02";
pub(crate) const SIG_WHITE_BALANCE_REPLY: &[u8] = b"OAW:\x02";
pub(crate) const SIG_MODEL_QUERY: &[u8] = b"QID";
pub(crate) const SIG_MODEL_REPLY: &[u8] = b"OID:\x04\x7F";
pub(crate) const SIG_ONE_PUSH_WB: &[u8] = b"OWS";
pub(crate) const SIG_ONE_PUSH_WB_REPLY: &[u8] = b"OWS";
pub(crate) const SIG_SHUTTER_QUERY: &[u8] = b"QSH";
pub(crate) const SIG_WHITE_BALANCE_QUERY: &[u8] = b"QAW";
pub(crate) const SIG_PEDESTAL: &[u8] = b"OTP:\x01\x01";
pub(crate) const SIG_PEDESTAL_REPLY: &[u8] = b"OTP:\x01\x01";
pub(crate) const SIG_PEDESTAL_QUERY: &[u8] = b"QTP";
pub(crate) const SIG_R_GAIN: &[u8] = b"ORI:\x01\x01";
pub(crate) const SIG_R_GAIN_REPLY: &[u8] = b"ORI:\x01\x01";
pub(crate) const SIG_B_GAIN: &[u8] = b"OBI:\x01\x01";
pub(crate) const SIG_B_GAIN_REPLY: &[u8] = b"OBI:\x01\x01";

macro_rules! toggle_cam_pair {
    (
        $(#[$req_doc:meta])* $req:ident, $field:ident, $lit:literal, $req_sig:ident,
        $(#[$res_doc:meta])* $res:ident, $res_sig:ident
    ) => {
        $(#[$req_doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $req {
            pub $field: Toggle,
        }

        impl AwRequest for $req {
            fn signature(&self) -> &'static [u8] {
                $req_sig
            }

            fn pack(&self) -> String {
                format!(concat!($lit, ":{}"), self.$field.to_wire())
            }

            fn unpack(&mut self, wire: &str) {
                self.$field = Toggle::from_wire(&wire[4..5]);
            }

            fn acceptable(&self) -> bool {
                self.$field.acceptable()
            }

            fn expected_response(&self) -> Box<dyn AwResponse> {
                Box::new($res::default())
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        }

        $(#[$res_doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $res {
            pub $field: Toggle,
        }

        impl AwResponse for $res {
            fn signature(&self) -> &'static [u8] {
                $res_sig
            }

            fn pack(&self) -> String {
                format!(concat!($lit, ":{}"), self.$field.to_wire())
            }

            fn unpack(&mut self, wire: &str) {
                self.$field = Toggle::from_wire(&wire[4..5]);
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        }
    };
}

macro_rules! bare_query {
    ($(#[$doc:meta])* $name:ident, $lit:literal, $sig:ident, $res:ty) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $name;

        impl AwRequest for $name {
            fn signature(&self) -> &'static [u8] {
                $sig
            }

            fn pack(&self) -> String {
                $lit.to_string()
            }

            fn unpack(&mut self, _wire: &str) {}

            fn expected_response(&self) -> Box<dyn AwResponse> {
                Box::new(<$res>::default())
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        }
    };
}

macro_rules! centered_cam_pair {
    (
        $(#[$req_doc:meta])* $req:ident, $field:ident, $lit:literal, $req_sig:ident,
        $(#[$res_doc:meta])* $res:ident, $res_sig:ident
    ) => {
        $(#[$req_doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $req {
            pub $field: CenteredScale,
        }

        impl AwRequest for $req {
            fn signature(&self) -> &'static [u8] {
                $req_sig
            }

            fn pack(&self) -> String {
                format!(concat!($lit, ":{}"), self.$field.to_wire())
            }

            fn unpack(&mut self, wire: &str) {
                self.$field = CenteredScale::from_wire(&wire[4..6]);
            }

            fn acceptable(&self) -> bool {
                self.$field.acceptable()
            }

            fn expected_response(&self) -> Box<dyn AwResponse> {
                Box::new($res::default())
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        }

        $(#[$res_doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $res {
            pub $field: CenteredScale,
        }

        impl AwResponse for $res {
            fn signature(&self) -> &'static [u8] {
                $res_sig
            }

            fn pack(&self) -> String {
                format!(concat!($lit, ":{}"), self.$field.to_wire())
            }

            fn unpack(&mut self, wire: &str) {
                self.$field = CenteredScale::from_wire(&wire[4..6]);
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        }
    };
}

toggle_cam_pair!(
    /// Switch autofocus on or off.
    AutoFocus, enabled, "OAF", SIG_AUTOFOCUS,
    /// Autofocus state echo.
    AutoFocusReply, SIG_AUTOFOCUS_REPLY
);

centered_cam_pair!(
    /// Set the master pedestal (black level).
    Pedestal, level, "OTP", SIG_PEDESTAL,
    /// Master pedestal echo.
    PedestalReply, SIG_PEDESTAL_REPLY
);

centered_cam_pair!(
    /// Adjust the red gain of the white balance.
    RGain, gain, "ORI", SIG_R_GAIN,
    /// Red gain echo.
    RGainReply, SIG_R_GAIN_REPLY
);

centered_cam_pair!(
    /// Adjust the blue gain of the white balance.
    BGain, gain, "OBI", SIG_B_GAIN,
    /// Blue gain echo.
    BGainReply, SIG_B_GAIN_REPLY
);

toggle_cam_pair!(
    /// Switch between camera picture and color bars.
    ColorBar, enabled, "DCB", SIG_COLOR_BAR,
    /// Color bar state echo.
    ColorBarReply, SIG_COLOR_BAR_REPLY
);

bare_query!(
    /// Ask for the autofocus state.
    AutoFocusQuery, "QAF", SIG_AUTOFOCUS_QUERY, AutoFocusReply
);

bare_query!(
    /// Ask for the ND filter position.
    NdFilterQuery, "QFT", SIG_ND_FILTER_QUERY, NdFilterReply
);

bare_query!(
    /// Ask for the master gain.
    GainQuery, "QGU", SIG_GAIN_QUERY, GainReply
);

bare_query!(
    /// Ask for the camera model identifier.
    ModelQuery, "QID", SIG_MODEL_QUERY, ModelReply
);

bare_query!(
    /// Ask for the shutter step.
    ShutterQuery, "QSH", SIG_SHUTTER_QUERY, ShutterReply
);

bare_query!(
    /// Ask for the white balance mode.
    WhiteBalanceQuery, "QAW", SIG_WHITE_BALANCE_QUERY, WhiteBalanceModeReply
);

bare_query!(
    /// Ask for the master pedestal.
    PedestalQuery, "QTP", SIG_PEDESTAL_QUERY, PedestalReply
);

/// Select the neutral density filter position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NdFilterSet {
    pub filter: NdFilter,
}

impl AwRequest for NdFilterSet {
    fn signature(&self) -> &'static [u8] {
        SIG_ND_FILTER
    }

    fn pack(&self) -> String {
        format!("OFT:{}", self.filter.to_wire())
    }

    fn unpack(&mut self, wire: &str) {
        self.filter = NdFilter::from_wire(&wire[4..5]);
    }

    fn acceptable(&self) -> bool {
        self.filter.acceptable()
    }

    fn expected_response(&self) -> Box<dyn AwResponse> {
        Box::new(NdFilterReply::default())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// ND filter position echo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NdFilterReply {
    pub filter: NdFilter,
}

impl AwResponse for NdFilterReply {
    fn signature(&self) -> &'static [u8] {
        SIG_ND_FILTER_REPLY
    }

    fn pack(&self) -> String {
        format!("OFT:{}", self.filter.to_wire())
    }

    fn unpack(&mut self, wire: &str) {
        self.filter = NdFilter::from_wire(&wire[4..5]);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Set the master gain (2 hex, centered on 0x32 = 0 dB).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GainSet {
    pub gain: CenteredScale,
}

impl AwRequest for GainSet {
    fn signature(&self) -> &'static [u8] {
        SIG_GAIN
    }

    fn pack(&self) -> String {
        format!("OGU:{}", self.gain.to_wire())
    }

    fn unpack(&mut self, wire: &str) {
        self.gain = CenteredScale::from_wire(&wire[4..6]);
    }

    fn acceptable(&self) -> bool {
        self.gain.acceptable()
    }

    fn expected_response(&self) -> Box<dyn AwResponse> {
        Box::new(GainReply::default())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Master gain echo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GainReply {
    pub gain: CenteredScale,
}

impl AwResponse for GainReply {
    fn signature(&self) -> &'static [u8] {
        SIG_GAIN_REPLY
    }

    fn pack(&self) -> String {
        format!("OGU:{}", self.gain.to_wire())
    }

    fn unpack(&mut self, wire: &str) {
        self.gain = CenteredScale::from_wire(&wire[4..6]);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Select a shutter step (one hex digit, 0 = off).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Shutter {
    pub step: u8,
}

impl AwRequest for Shutter {
    fn signature(&self) -> &'static [u8] {
        SIG_SHUTTER
    }

    fn pack(&self) -> String {
        format!("OSH:{}", int2hex(i64::from(self.step), 1))
    }

    fn unpack(&mut self, wire: &str) {
        #[allow(clippy::cast_possible_truncation)]
        {
            self.step = hex2int(&wire[4..5]) as u8;
        }
    }

    fn acceptable(&self) -> bool {
        self.step <= 0xE
    }

    fn expected_response(&self) -> Box<dyn AwResponse> {
        Box::new(ShutterReply::default())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Shutter step echo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShutterReply {
    pub step: u8,
}

impl AwResponse for ShutterReply {
    fn signature(&self) -> &'static [u8] {
        SIG_SHUTTER_REPLY
    }

    fn pack(&self) -> String {
        format!("OSH:{}", int2hex(i64::from(self.step), 1))
    }

    fn unpack(&mut self, wire: &str) {
        #[allow(clippy::cast_possible_truncation)]
        {
            self.step = hex2int(&wire[4..5]) as u8;
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Select the white balance mode (0 ATW .. 5 variable).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WhiteBalanceMode {
    pub mode: u8,
}

impl AwRequest for WhiteBalanceMode {
    fn signature(&self) -> &'static [u8] {
        SIG_WHITE_BALANCE
    }

    fn pack(&self) -> String {
        format!("OAW:{}", int2dec(i64::from(self.mode), 1))
    }

    fn unpack(&mut self, wire: &str) {
        #[allow(clippy::cast_possible_truncation)]
        {
            self.mode = dec2int(&wire[4..5]) as u8;
        }
    }

    fn acceptable(&self) -> bool {
        self.mode <= 5
    }

    fn expected_response(&self) -> Box<dyn AwResponse> {
        Box::new(WhiteBalanceModeReply::default())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// White balance mode echo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WhiteBalanceModeReply {
    pub mode: u8,
}

impl AwResponse for WhiteBalanceModeReply {
    fn signature(&self) -> &'static [u8] {
        SIG_WHITE_BALANCE_REPLY
    }

    fn pack(&self) -> String {
        format!("OAW:{}", int2dec(i64::from(self.mode), 1))
    }

    fn unpack(&mut self, wire: &str) {
        #[allow(clippy::cast_possible_truncation)]
        {
            self.mode = dec2int(&wire[4..5]) as u8;
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Execute one-push auto white balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OnePushWhiteBalance;

impl AwRequest for OnePushWhiteBalance {
    fn signature(&self) -> &'static [u8] {
        SIG_ONE_PUSH_WB
    }

    fn pack(&self) -> String {
        "OWS".to_string()
    }

    fn unpack(&mut self, _wire: &str) {}

    fn expected_response(&self) -> Box<dyn AwResponse> {
        Box::new(OnePushWhiteBalanceReply)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// One-push white balance acknowledgement; the camera echoes the token
/// once the adjustment has started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OnePushWhiteBalanceReply;

impl AwResponse for OnePushWhiteBalanceReply {
    fn signature(&self) -> &'static [u8] {
        SIG_ONE_PUSH_WB_REPLY
    }

    fn pack(&self) -> String {
        "OWS".to_string()
    }

    fn unpack(&mut self, _wire: &str) {}

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Model identifier report, e.g. `OID:AW-HE130`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelReply {
    pub model: String,
}

impl AwResponse for ModelReply {
    fn signature(&self) -> &'static [u8] {
        SIG_MODEL_REPLY
    }

    fn pack(&self) -> String {
        format!("OID:{}", self.model)
    }

    fn unpack(&mut self, wire: &str) {
        self.model = wire[4..].to_string();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_autofocus_echo() {
        let req = AutoFocus {
            enabled: Toggle::ON,
        };
        assert_eq!(req.pack(), "OAF:1");
        let mut echo = AutoFocusReply::default();
        echo.unpack("OAF:1");
        assert!(echo.enabled.is_on());
        assert_eq!(echo.pack(), "OAF:1");
    }

    #[test]
    fn test_gain_wire() {
        let req = GainSet {
            gain: CenteredScale(6),
        };
        assert_eq!(req.pack(), "OGU:38");
        let mut echo = GainReply::default();
        echo.unpack("OGU:2C");
        assert_eq!(echo.gain, CenteredScale(-6));
    }

    #[test]
    fn test_shutter_hex_digit() {
        let req = Shutter { step: 0xB };
        assert_eq!(req.pack(), "OSH:B");
        let mut echo = ShutterReply::default();
        echo.unpack("OSH:E");
        assert_eq!(echo.step, 0xE);
    }

    #[test]
    fn test_pedestal_and_gain_pairs() {
        let req = Pedestal {
            level: CenteredScale(-10),
        };
        assert_eq!(req.pack(), "OTP:28");
        let mut echo = RGainReply::default();
        echo.unpack("ORI:3C");
        assert_eq!(echo.gain, CenteredScale(10));
        let b = BGain {
            gain: CenteredScale(0),
        };
        assert_eq!(b.pack(), "OBI:32");
    }

    #[test]
    fn test_model_reply_free_text() {
        let mut m = ModelReply::default();
        m.unpack("OID:AW-UE150");
        assert_eq!(m.model, "AW-UE150");
        assert_eq!(m.pack(), "OID:AW-UE150");
    }
}
