// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Preset save/recall/delete, transition speed, and entry masks.
//!
//! Save (`#M`), recall (`#R`), and delete (`#C`) all answer with the same
//! `s{slot}` token, so three request classes share one reply class. Entry
//! masks report 40 preset slots per page as ten hex digits.

use std::any::Any;

use super::super::bits::{Bits128, Bits64};
use super::super::msg::{AwRequest, AwResponse};
use super::super::values::{AwScalar, HighSpeedUnit, Preset};
use crate::wire::numeric::{dec2int, int2dec};

pub(crate) const SIG_SAVE: &[u8] = b"#M\x02\x02";
pub(crate) const SIG_RECALL: &[u8] = b"#R\x02\x02";
pub(crate) const SIG_DELETE: &[u8] = b"#C\x02\x02";
pub(crate) const SIG_DONE_REPLY: &[u8] = b"s\x02\x02";
pub(crate) const SIG_SPEED: &[u8] = b"#UPVS\x02\x02\x02";
pub(crate) const SIG_SPEED_REPLY: &[u8] = b"uPVS\x02\x02\x02";
pub(crate) const SIG_ENTRIES_QUERY: &[u8] = b"#PE0\x02";
pub(crate) const SIG_ENTRIES_REPLY: &[u8] =
    b"pE0\x02\x01\x01\x01\x01\x01\x01\x01\x01\x01\x01";

/// Bits of one entry-mask page.
const PAGE_BITS: u32 = 40;
const PAGE_MASK: u64 = (1 << PAGE_BITS) - 1;

macro_rules! slot_request {
    ($(#[$doc:meta])* $name:ident, $lit:literal, $sig:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $name {
            pub slot: Preset,
        }

        impl AwRequest for $name {
            fn signature(&self) -> &'static [u8] {
                $sig
            }

            fn pack(&self) -> String {
                format!(concat!($lit, "{}"), self.slot.to_wire())
            }

            fn unpack(&mut self, wire: &str) {
                self.slot = Preset::from_wire(&wire[2..4]);
            }

            fn acceptable(&self) -> bool {
                self.slot.acceptable()
            }

            fn expected_response(&self) -> Box<dyn AwResponse> {
                Box::new(PresetDoneReply::default())
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        }
    };
}

slot_request!(
    /// Store the current position into a preset slot.
    PresetSave, "#M", SIG_SAVE
);

slot_request!(
    /// Recall a stored preset.
    PresetRecall, "#R", SIG_RECALL
);

slot_request!(
    /// Delete a stored preset.
    PresetDelete, "#C", SIG_DELETE
);

/// Acknowledgement for save, recall, and delete: `s{slot}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PresetDoneReply {
    pub slot: Preset,
}

impl AwResponse for PresetDoneReply {
    fn signature(&self) -> &'static [u8] {
        SIG_DONE_REPLY
    }

    fn pack(&self) -> String {
        format!("s{}", self.slot.to_wire())
    }

    fn unpack(&mut self, wire: &str) {
        self.slot = Preset::from_wire(&wire[1..3]);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Set the preset transition speed (device range 1..=750).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PresetSpeed {
    pub speed: HighSpeedUnit,
}

impl AwRequest for PresetSpeed {
    fn signature(&self) -> &'static [u8] {
        SIG_SPEED
    }

    fn pack(&self) -> String {
        format!("#UPVS{}", self.speed.to_wire())
    }

    fn unpack(&mut self, wire: &str) {
        self.speed = HighSpeedUnit::from_wire(&wire[5..8]);
    }

    fn acceptable(&self) -> bool {
        self.speed.acceptable()
    }

    fn expected_response(&self) -> Box<dyn AwResponse> {
        Box::new(PresetSpeedReply::default())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Preset transition speed echo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PresetSpeedReply {
    pub speed: HighSpeedUnit,
}

impl AwResponse for PresetSpeedReply {
    fn signature(&self) -> &'static [u8] {
        SIG_SPEED_REPLY
    }

    fn pack(&self) -> String {
        format!("uPVS{}", self.speed.to_wire())
    }

    fn unpack(&mut self, wire: &str) {
        self.speed = HighSpeedUnit::from_wire(&wire[4..7]);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Ask which preset slots of a 40-slot page are occupied (pages 0..=2).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PresetEntriesQuery {
    pub page: u8,
}

impl AwRequest for PresetEntriesQuery {
    fn signature(&self) -> &'static [u8] {
        SIG_ENTRIES_QUERY
    }

    fn pack(&self) -> String {
        format!("#PE0{}", int2dec(i64::from(self.page), 1))
    }

    fn unpack(&mut self, wire: &str) {
        #[allow(clippy::cast_possible_truncation)]
        {
            self.page = dec2int(&wire[4..5]) as u8;
        }
    }

    fn acceptable(&self) -> bool {
        self.page <= 2
    }

    fn expected_response(&self) -> Box<dyn AwResponse> {
        Box::new(PresetEntriesReply::default())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// One occupied-slot page: ten hex digits, bit 0 = first slot of the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PresetEntriesReply {
    pub page: u8,
    pub mask: Bits64,
}

impl AwResponse for PresetEntriesReply {
    fn signature(&self) -> &'static [u8] {
        SIG_ENTRIES_REPLY
    }

    fn pack(&self) -> String {
        format!(
            "pE0{}{:010X}",
            int2dec(i64::from(self.page), 1),
            self.mask.0 & PAGE_MASK
        )
    }

    fn unpack(&mut self, wire: &str) {
        #[allow(clippy::cast_possible_truncation)]
        {
            self.page = dec2int(&wire[3..4]) as u8;
        }
        // The matcher guarantees ten uppercase hex digits.
        self.mask = Bits64(u64::from_str_radix(&wire[4..14], 16).unwrap_or(0));
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Combine entry pages into the full 100-slot view.
#[must_use]
pub fn combine_entry_pages(pages: &[PresetEntriesReply]) -> Bits128 {
    let mut all = Bits128::zero();
    for p in pages {
        let page = Bits64(p.mask.0 & PAGE_MASK);
        all = all.union(Bits128::from_page(page, PAGE_BITS, u32::from(p.page)));
    }
    all
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_requests_share_reply() {
        let save = PresetSave { slot: Preset(7) };
        let recall = PresetRecall { slot: Preset(7) };
        assert_eq!(save.pack(), "#M07");
        assert_eq!(recall.pack(), "#R07");
        let mut done = PresetDoneReply::default();
        done.unpack("s07");
        assert_eq!(done.slot, Preset(7));
    }

    #[test]
    fn test_preset_speed_wire() {
        let req = PresetSpeed {
            speed: HighSpeedUnit(750),
        };
        assert_eq!(req.pack(), "#UPVS999");
        let mut echo = PresetSpeedReply::default();
        echo.unpack("uPVS250");
        assert_eq!(echo.speed, HighSpeedUnit(1));
    }

    #[test]
    fn test_entries_round_trip() {
        let mut reply = PresetEntriesReply::default();
        reply.unpack("pE01800000000F");
        assert_eq!(reply.page, 1);
        assert!(reply.mask.has(0));
        assert!(reply.mask.has(39));
        assert_eq!(reply.pack(), "pE01800000000F");
    }

    #[test]
    fn test_combine_pages() {
        let p0 = PresetEntriesReply {
            page: 0,
            mask: Bits64::zero().set(3),
        };
        let p2 = PresetEntriesReply {
            page: 2,
            mask: Bits64::zero().set(19),
        };
        let all = combine_entry_pages(&[p0, p2]);
        assert!(all.has(3));
        assert!(all.has(99));
        assert!(!all.has(43));
    }
}
