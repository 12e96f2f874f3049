// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Domain scalars of the AW wire format.
//!
//! Each scalar owns one fixed-width wire field. `to_wire` always produces a
//! string that matches the field's template class in the registered
//! signatures; `from_wire` is called only after the pattern matcher has
//! accepted the containing token and therefore never fails. `acceptable`
//! reports the device's documented command range, which is narrower than
//! what the wire can carry - the encoders deliberately keep out-of-range
//! values representable so a proxy can forward bad input unchanged.

use crate::wire::numeric::{dec2int, hex2int, int2dec, int2hex};

/// Common surface of every wire scalar.
pub trait AwScalar: Sized + Copy {
    /// Field width in wire bytes.
    const WIDTH: usize;

    /// Encode for the wire, saturating or substituting a sentinel when the
    /// value cannot be represented.
    fn to_wire(&self) -> String;

    /// Decode a matcher-accepted wire field.
    fn from_wire(s: &str) -> Self;

    /// Whether the value is inside the device's documented command range.
    fn acceptable(&self) -> bool;
}

/// Signed pan/tilt offset, 4 uppercase hex on the wire.
///
/// The wire is centered on 0x8000 with the axis inverted, so positive values
/// mean right/up as seen from the desk rather than from the camera.
/// 121.35 units make one degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveUnit(pub i32);

impl MoveUnit {
    pub const UNITS_PER_DEGREE: f64 = 121.35;
    const CENTER: i32 = 0x8000;

    #[must_use]
    pub fn from_degrees(deg: f64) -> Self {
        Self((deg * Self::UNITS_PER_DEGREE).round() as i32)
    }

    #[must_use]
    pub fn to_degrees(self) -> f64 {
        f64::from(self.0) / Self::UNITS_PER_DEGREE
    }
}

impl AwScalar for MoveUnit {
    const WIDTH: usize = 4;

    fn to_wire(&self) -> String {
        int2hex(i64::from(Self::CENTER - self.0), 4)
    }

    fn from_wire(s: &str) -> Self {
        Self(Self::CENTER - hex2int(s) as i32)
    }

    fn acceptable(&self) -> bool {
        (0..=0xFFFF).contains(&(Self::CENTER - self.0))
    }
}

/// Position on the lens scale, 3 uppercase hex on the wire, offset 0x555.
///
/// Zoom, focus, and iris all use this field: scale 0 is the wide/near/closed
/// stop (wire 0x555), scale 0xAAA the tele/far/open stop (wire 0xFFF).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScaleUnit(pub i32);

impl ScaleUnit {
    const OFFSET: i32 = 0x555;
    pub const MAX: i32 = 0xAAA;
}

impl AwScalar for ScaleUnit {
    const WIDTH: usize = 3;

    fn to_wire(&self) -> String {
        int2hex(i64::from(self.0 + Self::OFFSET), 3)
    }

    fn from_wire(s: &str) -> Self {
        Self(hex2int(s) as i32 - Self::OFFSET)
    }

    fn acceptable(&self) -> bool {
        (0..=Self::MAX).contains(&self.0)
    }
}

/// Signed motion speed, 2 decimal digits centered on 50.
///
/// -49 full reverse, 0 stop, +49 full forward. An out-of-range value packs
/// as the `"00"` sentinel, which decodes back to the same out-of-range
/// marker, so the wire position and width are preserved when proxying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContinuousSpeed(pub i32);

impl ContinuousSpeed {
    const CENTER: i32 = 50;
}

impl AwScalar for ContinuousSpeed {
    const WIDTH: usize = 2;

    fn to_wire(&self) -> String {
        if self.acceptable() {
            int2dec(i64::from(self.0 + Self::CENTER), 2)
        } else {
            "00".to_string()
        }
    }

    fn from_wire(s: &str) -> Self {
        Self(dec2int(s) as i32 - Self::CENTER)
    }

    fn acceptable(&self) -> bool {
        (-49..=49).contains(&self.0)
    }
}

/// Unsigned scale position, 2 decimal digits, device range 1..=99.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LimitedScaleUnit(pub i32);

impl AwScalar for LimitedScaleUnit {
    const WIDTH: usize = 2;

    fn to_wire(&self) -> String {
        if self.acceptable() {
            int2dec(i64::from(self.0), 2)
        } else {
            "00".to_string()
        }
    }

    fn from_wire(s: &str) -> Self {
        Self(dec2int(s) as i32)
    }

    fn acceptable(&self) -> bool {
        (1..=99).contains(&self.0)
    }
}

/// Preset motion speed with speed table selection: 2 hex + 1 decimal digit.
///
/// Speed 0 means "use the panel default" (effective 9). Table 0 selects the
/// fast-speed default and exists only on the request side: the wire digit is
/// `table - 1` saturating at 0, and decoding adds 1 back, so a table of 0
/// never round-trips through the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpeedUnit {
    pub speed: i32,
    pub table: i32,
}

impl SpeedUnit {
    const DEFAULT_SPEED: i32 = 9;

    /// Speed with the 0 default resolved.
    #[must_use]
    pub fn effective_speed(&self) -> i32 {
        if self.speed == 0 {
            Self::DEFAULT_SPEED
        } else {
            self.speed
        }
    }
}

impl AwScalar for SpeedUnit {
    const WIDTH: usize = 3;

    fn to_wire(&self) -> String {
        let mut out = int2hex(i64::from(self.speed), 2);
        out.push_str(&int2dec(i64::from(self.table) - 1, 1));
        out
    }

    fn from_wire(s: &str) -> Self {
        Self {
            speed: hex2int(&s[..2]) as i32,
            table: dec2int(&s[2..3]) as i32 + 1,
        }
    }

    fn acceptable(&self) -> bool {
        (0..=30).contains(&self.speed) && (0..=3).contains(&self.table)
    }
}

/// Preset transition speed, 3 decimal digits.
///
/// The device range 1..=750 maps to wire 250..=999; wire 0 is reserved.
/// Decoding a below-range wire value yields a negative scalar, which
/// re-encodes to the original wire bytes, so malformed traffic proxies
/// through unmodified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HighSpeedUnit(pub i32);

impl HighSpeedUnit {
    const OFFSET: i32 = 249;
}

impl AwScalar for HighSpeedUnit {
    const WIDTH: usize = 3;

    fn to_wire(&self) -> String {
        int2dec(i64::from(self.0 + Self::OFFSET), 3)
    }

    fn from_wire(s: &str) -> Self {
        Self(dec2int(s) as i32 - Self::OFFSET)
    }

    fn acceptable(&self) -> bool {
        (1..=750).contains(&self.0)
    }
}

/// Signed adjustment, 2 uppercase hex centered on 0x32.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CenteredScale(pub i32);

impl CenteredScale {
    const CENTER: i32 = 0x32;
}

impl AwScalar for CenteredScale {
    const WIDTH: usize = 2;

    fn to_wire(&self) -> String {
        int2hex(i64::from(self.0 + Self::CENTER), 2)
    }

    fn from_wire(s: &str) -> Self {
        Self(hex2int(s) as i32 - Self::CENTER)
    }

    fn acceptable(&self) -> bool {
        (-0x32..=0xFF - 0x32).contains(&self.0)
    }
}

/// Neutral density filter selector, one decimal digit, positions 0..=3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NdFilter(pub u8);

impl AwScalar for NdFilter {
    const WIDTH: usize = 1;

    fn to_wire(&self) -> String {
        int2dec(i64::from(self.0), 1)
    }

    fn from_wire(s: &str) -> Self {
        Self(dec2int(s) as u8)
    }

    fn acceptable(&self) -> bool {
        self.0 <= 3
    }
}

/// On/off switch, one decimal digit.
///
/// The raw digit is stored unchanged so unknown states proxy through; a
/// value that cannot fit one digit saturates to 9 on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Toggle(pub u8);

impl Toggle {
    pub const OFF: Self = Self(0);
    pub const ON: Self = Self(1);

    #[must_use]
    pub fn is_on(&self) -> bool {
        self.0 == 1
    }
}

impl From<bool> for Toggle {
    fn from(on: bool) -> Self {
        if on {
            Self::ON
        } else {
            Self::OFF
        }
    }
}

impl AwScalar for Toggle {
    const WIDTH: usize = 1;

    fn to_wire(&self) -> String {
        int2dec(i64::from(self.0), 1)
    }

    fn from_wire(s: &str) -> Self {
        Self(dec2int(s) as u8)
    }

    fn acceptable(&self) -> bool {
        self.0 <= 1
    }
}

/// Preset slot number, 2 decimal digits, 0..=99.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Preset(pub u8);

impl AwScalar for Preset {
    const WIDTH: usize = 2;

    fn to_wire(&self) -> String {
        int2dec(i64::from(self.0), 2)
    }

    fn from_wire(s: &str) -> Self {
        Self(dec2int(s) as u8)
    }

    fn acceptable(&self) -> bool {
        self.0 <= 99
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_unit_center_and_inversion() {
        assert_eq!(MoveUnit(0).to_wire(), "8000");
        // Positive is right/up, which sits below the wire center.
        assert_eq!(MoveUnit(1).to_wire(), "7FFF");
        assert_eq!(MoveUnit(-1).to_wire(), "8001");
        assert_eq!(MoveUnit::from_wire("8000"), MoveUnit(0));
        assert_eq!(MoveUnit::from_wire("7FFF"), MoveUnit(1));
    }

    #[test]
    fn test_move_unit_degrees() {
        let m = MoveUnit::from_degrees(45.0);
        assert_eq!(m.0, 5461);
        assert!((m.to_degrees() - 45.0).abs() < 0.01);
    }

    #[test]
    fn test_move_unit_wire_round_trip() {
        for wire in ["0000", "2D08", "8000", "D2F5", "FFFF"] {
            assert_eq!(MoveUnit::from_wire(wire).to_wire(), wire);
        }
    }

    #[test]
    fn test_scale_unit() {
        assert_eq!(ScaleUnit(0).to_wire(), "555");
        assert_eq!(ScaleUnit(ScaleUnit::MAX).to_wire(), "FFF");
        assert_eq!(ScaleUnit::from_wire("555"), ScaleUnit(0));
        assert!(!ScaleUnit::from_wire("000").acceptable());
        assert_eq!(ScaleUnit::from_wire("000").to_wire(), "000");
    }

    #[test]
    fn test_continuous_speed() {
        assert_eq!(ContinuousSpeed(0).to_wire(), "50");
        assert_eq!(ContinuousSpeed(25).to_wire(), "75");
        assert_eq!(ContinuousSpeed(-49).to_wire(), "01");
        assert_eq!(ContinuousSpeed(99).to_wire(), "00");
        assert_eq!(ContinuousSpeed::from_wire("75"), ContinuousSpeed(25));
        // The "00" sentinel decodes out of range and re-encodes to itself.
        let sentinel = ContinuousSpeed::from_wire("00");
        assert!(!sentinel.acceptable());
        assert_eq!(sentinel.to_wire(), "00");
    }

    #[test]
    fn test_limited_scale_unit() {
        assert_eq!(LimitedScaleUnit(42).to_wire(), "42");
        assert_eq!(LimitedScaleUnit(0).to_wire(), "00");
        assert_eq!(LimitedScaleUnit(100).to_wire(), "00");
        assert!(LimitedScaleUnit::from_wire("99").acceptable());
        assert!(!LimitedScaleUnit::from_wire("00").acceptable());
    }

    #[test]
    fn test_speed_unit() {
        let s = SpeedUnit { speed: 0x1E, table: 1 };
        assert_eq!(s.to_wire(), "1E0");
        assert_eq!(SpeedUnit::from_wire("1E0"), s);
        assert_eq!(SpeedUnit { speed: 0, table: 0 }.effective_speed(), 9);
        // Table 0 is a request-side default; the wire saturates to digit 0
        // and decodes back as table 1.
        assert_eq!(SpeedUnit { speed: 5, table: 0 }.to_wire(), "050");
        assert_eq!(SpeedUnit::from_wire("050").table, 1);
    }

    #[test]
    fn test_high_speed_unit() {
        assert_eq!(HighSpeedUnit(1).to_wire(), "250");
        assert_eq!(HighSpeedUnit(750).to_wire(), "999");
        assert_eq!(HighSpeedUnit::from_wire("250"), HighSpeedUnit(1));
        // Below-range wire values survive a round trip.
        let low = HighSpeedUnit::from_wire("100");
        assert!(!low.acceptable());
        assert_eq!(low.to_wire(), "100");
        assert_eq!(HighSpeedUnit::from_wire("000").to_wire(), "000");
    }

    #[test]
    fn test_centered_scale() {
        assert_eq!(CenteredScale(0).to_wire(), "32");
        assert_eq!(CenteredScale(-50).to_wire(), "00");
        assert_eq!(CenteredScale::from_wire("FF"), CenteredScale(0xFF - 0x32));
    }

    #[test]
    fn test_nd_filter() {
        assert_eq!(NdFilter(2).to_wire(), "2");
        assert!(NdFilter(3).acceptable());
        assert!(!NdFilter(4).acceptable());
        assert_eq!(NdFilter::from_wire("7").to_wire(), "7");
    }

    #[test]
    fn test_toggle() {
        assert_eq!(Toggle::ON.to_wire(), "1");
        assert_eq!(Toggle::OFF.to_wire(), "0");
        assert_eq!(Toggle::from(true), Toggle::ON);
        assert_eq!(Toggle(12).to_wire(), "9");
        // Unknown digits are data, not errors.
        let odd = Toggle::from_wire("5");
        assert!(!odd.acceptable());
        assert_eq!(odd.to_wire(), "5");
    }

    #[test]
    fn test_preset() {
        assert_eq!(Preset(7).to_wire(), "07");
        assert_eq!(Preset::from_wire("99"), Preset(99));
        assert!(!Preset(100).acceptable());
    }
}
