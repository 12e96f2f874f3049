// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Zoom, focus, and iris commands.
//!
//! Speeds are signed 2-digit decimal fields centered on 50; positions ride
//! the 3-hex lens scale (wire 555..FFF). The `#G?` queries return the
//! current level with a lowercase reply token.

use std::any::Any;

use super::super::msg::{AwRequest, AwResponse};
use super::super::values::{AwScalar, ContinuousSpeed, ScaleUnit, Toggle};

pub(crate) const SIG_ZOOM_SPEED: &[u8] = b"#Z\x02\x02";
pub(crate) const SIG_ZOOM_SPEED_REPLY: &[u8] = b"zS\x02\x02";
pub(crate) const SIG_ZOOM_POSITION: &[u8] = b"#AXZ\x01\x01\x01";
pub(crate) const SIG_ZOOM_POSITION_REPLY: &[u8] = b"axz\x01\x01\x01";
pub(crate) const SIG_ZOOM_QUERY: &[u8] = b"#GZ";
pub(crate) const SIG_ZOOM_LEVEL_REPLY: &[u8] = b"gz\x01\x01\x01";
pub(crate) const SIG_FOCUS_SPEED: &[u8] = b"#F\x02\x02";
pub(crate) const SIG_FOCUS_SPEED_REPLY: &[u8] = b"fS\x02\x02";
pub(crate) const SIG_FOCUS_POSITION: &[u8] = b"#AXF\x01\x01\x01";
pub(crate) const SIG_FOCUS_POSITION_REPLY: &[u8] = b"axf\x01\x01\x01";
pub(crate) const SIG_FOCUS_QUERY: &[u8] = b"#GF";
pub(crate) const SIG_FOCUS_LEVEL_REPLY: &[u8] = b"gf\x01\x01\x01";
pub(crate) const SIG_IRIS_POSITION: &[u8] = b"#AXI\x01\x01\x01";
pub(crate) const SIG_IRIS_POSITION_REPLY: &[u8] = b"axi\x01\x01\x01";
pub(crate) const SIG_IRIS_QUERY: &[u8] = b"#GI";
pub(crate) const SIG_IRIS_LEVEL_REPLY: &[u8] = b"gi\x01\x01\x01\x02";
pub(crate) const SIG_LENS_INFO_CONTROL: &[u8] = b"#LPC\x02";
pub(crate) const SIG_LENS_INFO_CONTROL_REPLY: &[u8] = b"lPC\x02";
pub(crate) const SIG_LENS_POSITION_REPLY: &[u8] =
    b"lPC\x01\x01\x01\x01\x01\x01\x01\x01\x01";

macro_rules! speed_pair {
    (
        $(#[$req_doc:meta])* $req:ident, $req_lit:literal, $req_sig:ident, $req_skip:expr,
        $(#[$res_doc:meta])* $res:ident, $res_lit:literal, $res_sig:ident, $res_skip:expr
    ) => {
        $(#[$req_doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $req {
            pub speed: ContinuousSpeed,
        }

        impl AwRequest for $req {
            fn signature(&self) -> &'static [u8] {
                $req_sig
            }

            fn pack(&self) -> String {
                format!(concat!($req_lit, "{}"), self.speed.to_wire())
            }

            fn unpack(&mut self, wire: &str) {
                self.speed = ContinuousSpeed::from_wire(&wire[$req_skip..$req_skip + 2]);
            }

            fn acceptable(&self) -> bool {
                self.speed.acceptable()
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
            pub speed: ContinuousSpeed,
        }

        impl AwResponse for $res {
            fn signature(&self) -> &'static [u8] {
                $res_sig
            }

            fn pack(&self) -> String {
                format!(concat!($res_lit, "{}"), self.speed.to_wire())
            }

            fn unpack(&mut self, wire: &str) {
                self.speed = ContinuousSpeed::from_wire(&wire[$res_skip..$res_skip + 2]);
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        }
    };
}

macro_rules! position_pair {
    (
        $(#[$req_doc:meta])* $req:ident, $req_lit:literal, $req_sig:ident,
        $(#[$res_doc:meta])* $res:ident, $res_lit:literal, $res_sig:ident
    ) => {
        $(#[$req_doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $req {
            pub position: ScaleUnit,
        }

        impl AwRequest for $req {
            fn signature(&self) -> &'static [u8] {
                $req_sig
            }

            fn pack(&self) -> String {
                format!(concat!($req_lit, "{}"), self.position.to_wire())
            }

            fn unpack(&mut self, wire: &str) {
                self.position = ScaleUnit::from_wire(&wire[4..7]);
            }

            fn acceptable(&self) -> bool {
                self.position.acceptable()
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
            pub position: ScaleUnit,
        }

        impl AwResponse for $res {
            fn signature(&self) -> &'static [u8] {
                $res_sig
            }

            fn pack(&self) -> String {
                format!(concat!($res_lit, "{}"), self.position.to_wire())
            }

            fn unpack(&mut self, wire: &str) {
                self.position = ScaleUnit::from_wire(&wire[3..6]);
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        }
    };
}

macro_rules! level_query {
    (
        $(#[$req_doc:meta])* $req:ident, $req_lit:literal, $req_sig:ident,
        $(#[$res_doc:meta])* $res:ident, $res_lit:literal, $res_sig:ident
    ) => {
        $(#[$req_doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $req;

        impl AwRequest for $req {
            fn signature(&self) -> &'static [u8] {
                $req_sig
            }

            fn pack(&self) -> String {
                $req_lit.to_string()
            }

            fn unpack(&mut self, _wire: &str) {}

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
            pub position: ScaleUnit,
        }

        impl AwResponse for $res {
            fn signature(&self) -> &'static [u8] {
                $res_sig
            }

            fn pack(&self) -> String {
                format!(concat!($res_lit, "{}"), self.position.to_wire())
            }

            fn unpack(&mut self, wire: &str) {
                self.position = ScaleUnit::from_wire(&wire[2..5]);
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        }
    };
}

speed_pair!(
    /// Continuous zoom: 01 full wide .. 99 full tele, 50 stop.
    ZoomSpeed, "#Z", SIG_ZOOM_SPEED, 2,
    /// Zoom speed echo.
    ZoomSpeedReply, "zS", SIG_ZOOM_SPEED_REPLY, 2
);

speed_pair!(
    /// Continuous focus: 01 full near .. 99 full far, 50 stop.
    FocusSpeed, "#F", SIG_FOCUS_SPEED, 2,
    /// Focus speed echo.
    FocusSpeedReply, "fS", SIG_FOCUS_SPEED_REPLY, 2
);

position_pair!(
    /// Move zoom to an absolute lens-scale position.
    ZoomPosition, "#AXZ", SIG_ZOOM_POSITION,
    /// Absolute zoom echo (also the zoom notification).
    ZoomPositionReply, "axz", SIG_ZOOM_POSITION_REPLY
);

position_pair!(
    /// Move focus to an absolute lens-scale position.
    FocusPosition, "#AXF", SIG_FOCUS_POSITION,
    /// Absolute focus echo (also the focus notification).
    FocusPositionReply, "axf", SIG_FOCUS_POSITION_REPLY
);

position_pair!(
    /// Drive iris to an absolute lens-scale position.
    IrisPosition, "#AXI", SIG_IRIS_POSITION,
    /// Absolute iris echo.
    IrisPositionReply, "axi", SIG_IRIS_POSITION_REPLY
);

level_query!(
    /// Ask for the current zoom level.
    ZoomQuery, "#GZ", SIG_ZOOM_QUERY,
    /// Current zoom level.
    ZoomLevelReply, "gz", SIG_ZOOM_LEVEL_REPLY
);

level_query!(
    /// Ask for the current focus level.
    FocusQuery, "#GF", SIG_FOCUS_QUERY,
    /// Current focus level.
    FocusLevelReply, "gf", SIG_FOCUS_LEVEL_REPLY
);

/// Ask for the current iris level and auto/manual mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IrisQuery;

impl AwRequest for IrisQuery {
    fn signature(&self) -> &'static [u8] {
        SIG_IRIS_QUERY
    }

    fn pack(&self) -> String {
        "#GI".to_string()
    }

    fn unpack(&mut self, _wire: &str) {}

    fn expected_response(&self) -> Box<dyn AwResponse> {
        Box::new(IrisLevelReply::default())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Current iris level plus the auto-iris flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IrisLevelReply {
    pub position: ScaleUnit,
    pub auto: Toggle,
}

impl AwResponse for IrisLevelReply {
    fn signature(&self) -> &'static [u8] {
        SIG_IRIS_LEVEL_REPLY
    }

    fn pack(&self) -> String {
        format!("gi{}{}", self.position.to_wire(), self.auto.to_wire())
    }

    fn unpack(&mut self, wire: &str) {
        self.position = ScaleUnit::from_wire(&wire[2..5]);
        self.auto = Toggle::from_wire(&wire[5..6]);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Enable or disable the periodic lens position notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LensInfoControl {
    pub enabled: Toggle,
}

impl AwRequest for LensInfoControl {
    fn signature(&self) -> &'static [u8] {
        SIG_LENS_INFO_CONTROL
    }

    fn pack(&self) -> String {
        format!("#LPC{}", self.enabled.to_wire())
    }

    fn unpack(&mut self, wire: &str) {
        self.enabled = Toggle::from_wire(&wire[4..5]);
    }

    fn acceptable(&self) -> bool {
        self.enabled.acceptable()
    }

    fn expected_response(&self) -> Box<dyn AwResponse> {
        Box::new(LensInfoControlReply::default())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Lens position notification switch echo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LensInfoControlReply {
    pub enabled: Toggle,
}

impl AwResponse for LensInfoControlReply {
    fn signature(&self) -> &'static [u8] {
        SIG_LENS_INFO_CONTROL_REPLY
    }

    fn pack(&self) -> String {
        format!("lPC{}", self.enabled.to_wire())
    }

    fn unpack(&mut self, wire: &str) {
        self.enabled = Toggle::from_wire(&wire[3..4]);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// The lens position notification: zoom, focus, and iris in one token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LensPositionReply {
    pub zoom: ScaleUnit,
    pub focus: ScaleUnit,
    pub iris: ScaleUnit,
}

impl AwResponse for LensPositionReply {
    fn signature(&self) -> &'static [u8] {
        SIG_LENS_POSITION_REPLY
    }

    fn pack(&self) -> String {
        format!(
            "lPC{}{}{}",
            self.zoom.to_wire(),
            self.focus.to_wire(),
            self.iris.to_wire()
        )
    }

    fn unpack(&mut self, wire: &str) {
        self.zoom = ScaleUnit::from_wire(&wire[3..6]);
        self.focus = ScaleUnit::from_wire(&wire[6..9]);
        self.iris = ScaleUnit::from_wire(&wire[9..12]);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lens_position_notification() {
        let mut reply = LensPositionReply::default();
        reply.unpack("lPC555800FFF");
        assert_eq!(reply.zoom, ScaleUnit(0));
        assert_eq!(reply.focus, ScaleUnit(0x800 - 0x555));
        assert_eq!(reply.iris, ScaleUnit(ScaleUnit::MAX));
        assert_eq!(reply.pack(), "lPC555800FFF");
    }

    #[test]
    fn test_zoom_speed_wire() {
        let req = ZoomSpeed {
            speed: ContinuousSpeed(49),
        };
        assert_eq!(req.pack(), "#Z99");
        let mut echo = ZoomSpeedReply::default();
        echo.unpack("zS01");
        assert_eq!(echo.speed, ContinuousSpeed(-49));
    }

    #[test]
    fn test_zoom_position_round_trip() {
        let mut req = ZoomPosition::default();
        req.unpack("#AXZ800");
        assert_eq!(req.position, ScaleUnit(0x800 - 0x555));
        assert_eq!(req.pack(), "#AXZ800");
    }

    #[test]
    fn test_level_query_replies() {
        let mut z = ZoomLevelReply::default();
        z.unpack("gzFFF");
        assert_eq!(z.position, ScaleUnit(ScaleUnit::MAX));
        assert_eq!(z.pack(), "gzFFF");

        let mut i = IrisLevelReply::default();
        i.unpack("gi5551");
        assert_eq!(i.position, ScaleUnit(0));
        assert!(i.auto.is_on());
    }
}
