// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Power, install position, tally, and pan/tilt motion commands.
//!
//! All of these travel over `/cgi-bin/aw_ptz` with the `#` prefix. Replies
//! drop the prefix and lowercase the leading letter, e.g. `#PTS5050` is
//! answered by `pTS5050`.

use std::any::Any;

use super::super::msg::{AwRequest, AwResponse};
use super::super::values::{AwScalar, ContinuousSpeed, MoveUnit, SpeedUnit, Toggle};

pub(crate) const SIG_POWER: &[u8] = b"#O\x02";
pub(crate) const SIG_POWER_QUERY: &[u8] = b"#O";
pub(crate) const SIG_POWER_REPLY: &[u8] = b"p\x02";
pub(crate) const SIG_INSTALL: &[u8] = b"#INS\x02";
pub(crate) const SIG_INSTALL_QUERY: &[u8] = b"#INS";
pub(crate) const SIG_INSTALL_REPLY: &[u8] = b"iNS\x02";
pub(crate) const SIG_TALLY: &[u8] = b"#DA\x02";
pub(crate) const SIG_TALLY_QUERY: &[u8] = b"#DA";
pub(crate) const SIG_TALLY_REPLY: &[u8] = b"dA\x02";
pub(crate) const SIG_PAN_SPEED: &[u8] = b"#P\x02\x02";
pub(crate) const SIG_PAN_SPEED_REPLY: &[u8] = b"pS\x02\x02";
pub(crate) const SIG_TILT_SPEED: &[u8] = b"#T\x02\x02";
pub(crate) const SIG_TILT_SPEED_REPLY: &[u8] = b"tS\x02\x02";
pub(crate) const SIG_PAN_TILT_SPEED: &[u8] = b"#PTS\x02\x02\x02\x02";
pub(crate) const SIG_PAN_TILT_SPEED_REPLY: &[u8] = b"pTS\x02\x02\x02\x02";
pub(crate) const SIG_PAN_TILT_POSITION: &[u8] = b"#APC\x01\x01\x01\x01\x01\x01\x01\x01";
pub(crate) const SIG_PAN_TILT_POSITION_REPLY: &[u8] = b"aPC\x01\x01\x01\x01\x01\x01\x01\x01";
pub(crate) const SIG_PAN_TILT_POSITION_SPEED: &[u8] =
    b"#APS\x01\x01\x01\x01\x01\x01\x01\x01\x01\x01\x02";
pub(crate) const SIG_PAN_TILT_POSITION_SPEED_REPLY: &[u8] =
    b"aPS\x01\x01\x01\x01\x01\x01\x01\x01\x01\x01\x02";

/// Set standby/on. `#O0` standby, `#O1` on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Power {
    pub switch: Toggle,
}

impl AwRequest for Power {
    fn signature(&self) -> &'static [u8] {
        SIG_POWER
    }

    fn pack(&self) -> String {
        format!("#O{}", self.switch.to_wire())
    }

    fn unpack(&mut self, wire: &str) {
        // Raw digit kept as-is so unknown power states proxy through.
        self.switch = Toggle::from_wire(&wire[2..3]);
    }

    fn acceptable(&self) -> bool {
        self.switch.acceptable()
    }

    fn expected_response(&self) -> Box<dyn AwResponse> {
        Box::new(PowerReply::default())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Ask for the current power state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PowerQuery;

impl AwRequest for PowerQuery {
    fn signature(&self) -> &'static [u8] {
        SIG_POWER_QUERY
    }

    fn pack(&self) -> String {
        "#O".to_string()
    }

    fn unpack(&mut self, _wire: &str) {}

    fn expected_response(&self) -> Box<dyn AwResponse> {
        Box::new(PowerReply::default())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Power state report: `p0` standby, `p1` on, `p3` powering up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PowerReply {
    pub switch: Toggle,
}

impl AwResponse for PowerReply {
    fn signature(&self) -> &'static [u8] {
        SIG_POWER_REPLY
    }

    fn pack(&self) -> String {
        format!("p{}", self.switch.to_wire())
    }

    fn unpack(&mut self, wire: &str) {
        self.switch = Toggle::from_wire(&wire[1..2]);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Mounting orientation: 0 desktop, 1 hanging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallPosition {
    pub hanging: Toggle,
}

impl AwRequest for InstallPosition {
    fn signature(&self) -> &'static [u8] {
        SIG_INSTALL
    }

    fn pack(&self) -> String {
        format!("#INS{}", self.hanging.to_wire())
    }

    fn unpack(&mut self, wire: &str) {
        self.hanging = Toggle::from_wire(&wire[4..5]);
    }

    fn acceptable(&self) -> bool {
        self.hanging.acceptable()
    }

    fn expected_response(&self) -> Box<dyn AwResponse> {
        Box::new(InstallPositionReply::default())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Ask for the mounting orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallPositionQuery;

impl AwRequest for InstallPositionQuery {
    fn signature(&self) -> &'static [u8] {
        SIG_INSTALL_QUERY
    }

    fn pack(&self) -> String {
        "#INS".to_string()
    }

    fn unpack(&mut self, _wire: &str) {}

    fn expected_response(&self) -> Box<dyn AwResponse> {
        Box::new(InstallPositionReply::default())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Mounting orientation echo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallPositionReply {
    pub hanging: Toggle,
}

impl AwResponse for InstallPositionReply {
    fn signature(&self) -> &'static [u8] {
        SIG_INSTALL_REPLY
    }

    fn pack(&self) -> String {
        format!("iNS{}", self.hanging.to_wire())
    }

    fn unpack(&mut self, wire: &str) {
        self.hanging = Toggle::from_wire(&wire[3..4]);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Drive the tally lamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub lamp: Toggle,
}

impl AwRequest for Tally {
    fn signature(&self) -> &'static [u8] {
        SIG_TALLY
    }

    fn pack(&self) -> String {
        format!("#DA{}", self.lamp.to_wire())
    }

    fn unpack(&mut self, wire: &str) {
        self.lamp = Toggle::from_wire(&wire[3..4]);
    }

    fn acceptable(&self) -> bool {
        self.lamp.acceptable()
    }

    fn expected_response(&self) -> Box<dyn AwResponse> {
        Box::new(TallyReply::default())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Ask for the tally lamp state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TallyQuery;

impl AwRequest for TallyQuery {
    fn signature(&self) -> &'static [u8] {
        SIG_TALLY_QUERY
    }

    fn pack(&self) -> String {
        "#DA".to_string()
    }

    fn unpack(&mut self, _wire: &str) {}

    fn expected_response(&self) -> Box<dyn AwResponse> {
        Box::new(TallyReply::default())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Tally lamp state report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TallyReply {
    pub lamp: Toggle,
}

impl AwResponse for TallyReply {
    fn signature(&self) -> &'static [u8] {
        SIG_TALLY_REPLY
    }

    fn pack(&self) -> String {
        format!("dA{}", self.lamp.to_wire())
    }

    fn unpack(&mut self, wire: &str) {
        self.lamp = Toggle::from_wire(&wire[2..3]);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Continuous pan at a signed speed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanSpeed {
    pub speed: ContinuousSpeed,
}

impl AwRequest for PanSpeed {
    fn signature(&self) -> &'static [u8] {
        SIG_PAN_SPEED
    }

    fn pack(&self) -> String {
        format!("#P{}", self.speed.to_wire())
    }

    fn unpack(&mut self, wire: &str) {
        self.speed = ContinuousSpeed::from_wire(&wire[2..4]);
    }

    fn acceptable(&self) -> bool {
        self.speed.acceptable()
    }

    fn expected_response(&self) -> Box<dyn AwResponse> {
        Box::new(PanSpeedReply::default())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Pan speed echo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanSpeedReply {
    pub speed: ContinuousSpeed,
}

impl AwResponse for PanSpeedReply {
    fn signature(&self) -> &'static [u8] {
        SIG_PAN_SPEED_REPLY
    }

    fn pack(&self) -> String {
        format!("pS{}", self.speed.to_wire())
    }

    fn unpack(&mut self, wire: &str) {
        self.speed = ContinuousSpeed::from_wire(&wire[2..4]);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Continuous tilt at a signed speed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TiltSpeed {
    pub speed: ContinuousSpeed,
}

impl AwRequest for TiltSpeed {
    fn signature(&self) -> &'static [u8] {
        SIG_TILT_SPEED
    }

    fn pack(&self) -> String {
        format!("#T{}", self.speed.to_wire())
    }

    fn unpack(&mut self, wire: &str) {
        self.speed = ContinuousSpeed::from_wire(&wire[2..4]);
    }

    fn acceptable(&self) -> bool {
        self.speed.acceptable()
    }

    fn expected_response(&self) -> Box<dyn AwResponse> {
        Box::new(TiltSpeedReply::default())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Tilt speed echo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TiltSpeedReply {
    pub speed: ContinuousSpeed,
}

impl AwResponse for TiltSpeedReply {
    fn signature(&self) -> &'static [u8] {
        SIG_TILT_SPEED_REPLY
    }

    fn pack(&self) -> String {
        format!("tS{}", self.speed.to_wire())
    }

    fn unpack(&mut self, wire: &str) {
        self.speed = ContinuousSpeed::from_wire(&wire[2..4]);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Combined pan/tilt drive, one token per joystick sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanTiltSpeed {
    pub pan: ContinuousSpeed,
    pub tilt: ContinuousSpeed,
}

impl AwRequest for PanTiltSpeed {
    fn signature(&self) -> &'static [u8] {
        SIG_PAN_TILT_SPEED
    }

    fn pack(&self) -> String {
        format!("#PTS{}{}", self.pan.to_wire(), self.tilt.to_wire())
    }

    fn unpack(&mut self, wire: &str) {
        self.pan = ContinuousSpeed::from_wire(&wire[4..6]);
        self.tilt = ContinuousSpeed::from_wire(&wire[6..8]);
    }

    fn acceptable(&self) -> bool {
        self.pan.acceptable() && self.tilt.acceptable()
    }

    fn expected_response(&self) -> Box<dyn AwResponse> {
        Box::new(PanTiltSpeedReply::default())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Combined pan/tilt speed echo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanTiltSpeedReply {
    pub pan: ContinuousSpeed,
    pub tilt: ContinuousSpeed,
}

impl AwResponse for PanTiltSpeedReply {
    fn signature(&self) -> &'static [u8] {
        SIG_PAN_TILT_SPEED_REPLY
    }

    fn pack(&self) -> String {
        format!("pTS{}{}", self.pan.to_wire(), self.tilt.to_wire())
    }

    fn unpack(&mut self, wire: &str) {
        self.pan = ContinuousSpeed::from_wire(&wire[3..5]);
        self.tilt = ContinuousSpeed::from_wire(&wire[5..7]);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Move to an absolute pan/tilt position at the default speed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanTiltPosition {
    pub pan: MoveUnit,
    pub tilt: MoveUnit,
}

impl AwRequest for PanTiltPosition {
    fn signature(&self) -> &'static [u8] {
        SIG_PAN_TILT_POSITION
    }

    fn pack(&self) -> String {
        format!("#APC{}{}", self.pan.to_wire(), self.tilt.to_wire())
    }

    fn unpack(&mut self, wire: &str) {
        self.pan = MoveUnit::from_wire(&wire[4..8]);
        self.tilt = MoveUnit::from_wire(&wire[8..12]);
    }

    fn acceptable(&self) -> bool {
        self.pan.acceptable() && self.tilt.acceptable()
    }

    fn expected_response(&self) -> Box<dyn AwResponse> {
        Box::new(PanTiltPositionReply::default())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Absolute pan/tilt position echo (also the position notification).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanTiltPositionReply {
    pub pan: MoveUnit,
    pub tilt: MoveUnit,
}

impl AwResponse for PanTiltPositionReply {
    fn signature(&self) -> &'static [u8] {
        SIG_PAN_TILT_POSITION_REPLY
    }

    fn pack(&self) -> String {
        format!("aPC{}{}", self.pan.to_wire(), self.tilt.to_wire())
    }

    fn unpack(&mut self, wire: &str) {
        self.pan = MoveUnit::from_wire(&wire[3..7]);
        self.tilt = MoveUnit::from_wire(&wire[7..11]);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Move to an absolute pan/tilt position at a chosen speed and table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanTiltPositionSpeed {
    pub pan: MoveUnit,
    pub tilt: MoveUnit,
    pub speed: SpeedUnit,
}

impl AwRequest for PanTiltPositionSpeed {
    fn signature(&self) -> &'static [u8] {
        SIG_PAN_TILT_POSITION_SPEED
    }

    fn pack(&self) -> String {
        format!(
            "#APS{}{}{}",
            self.pan.to_wire(),
            self.tilt.to_wire(),
            self.speed.to_wire()
        )
    }

    fn unpack(&mut self, wire: &str) {
        self.pan = MoveUnit::from_wire(&wire[4..8]);
        self.tilt = MoveUnit::from_wire(&wire[8..12]);
        self.speed = SpeedUnit::from_wire(&wire[12..15]);
    }

    fn acceptable(&self) -> bool {
        self.pan.acceptable() && self.tilt.acceptable() && self.speed.acceptable()
    }

    fn expected_response(&self) -> Box<dyn AwResponse> {
        Box::new(PanTiltPositionSpeedReply::default())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Speed-qualified absolute position echo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanTiltPositionSpeedReply {
    pub pan: MoveUnit,
    pub tilt: MoveUnit,
    pub speed: SpeedUnit,
}

impl AwResponse for PanTiltPositionSpeedReply {
    fn signature(&self) -> &'static [u8] {
        SIG_PAN_TILT_POSITION_SPEED_REPLY
    }

    fn pack(&self) -> String {
        format!(
            "aPS{}{}{}",
            self.pan.to_wire(),
            self.tilt.to_wire(),
            self.speed.to_wire()
        )
    }

    fn unpack(&mut self, wire: &str) {
        self.pan = MoveUnit::from_wire(&wire[3..7]);
        self.tilt = MoveUnit::from_wire(&wire[7..11]);
        self.speed = SpeedUnit::from_wire(&wire[11..14]);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_wire_form() {
        let req = Power { switch: Toggle::ON };
        assert_eq!(req.pack(), "#O1");
        let mut reply = PowerReply::default();
        reply.unpack("p1");
        assert_eq!(reply.switch, Toggle::ON);
    }

    #[test]
    fn test_pan_tilt_speed_round_trip() {
        let mut req = PanTiltSpeed::default();
        req.unpack("#PTS2575");
        assert_eq!(req.pan, ContinuousSpeed(-25));
        assert_eq!(req.tilt, ContinuousSpeed(25));
        assert_eq!(req.pack(), "#PTS2575");
    }

    #[test]
    fn test_absolute_position_wire() {
        let req = PanTiltPosition::default();
        assert_eq!(req.pack(), "#APC80008000");
        let mut echo = PanTiltPositionReply::default();
        echo.unpack("aPC7FFF8001");
        assert_eq!(echo.pan, MoveUnit(1));
        assert_eq!(echo.tilt, MoveUnit(-1));
    }

    #[test]
    fn test_position_speed_wire() {
        let req = PanTiltPositionSpeed {
            pan: MoveUnit(0),
            tilt: MoveUnit(0),
            speed: SpeedUnit { speed: 0x1D, table: 2 },
        };
        assert_eq!(req.pack(), "#APS800080001D1");
    }

    #[test]
    fn test_tally_query_expects_state_reply() {
        let q = TallyQuery;
        assert_eq!(q.pack(), "#DA");
        let mut reply = TallyReply::default();
        reply.unpack("dA1");
        assert!(reply.lamp.is_on());
    }
}
